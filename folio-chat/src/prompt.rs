//! Prompt assembly and answer post-processing.
//!
//! The instruction template is fixed; retrieval context and the question are
//! substituted into the user message at generation time.

use std::sync::OnceLock;

use regex::Regex;

use folio_rag::SearchResult;

/// System instructions for the portfolio assistant.
pub const SYSTEM_PROMPT: &str = "\
You are an AI assistant designed to answer questions about a user's professional portfolio and projects.
Use ONLY the provided context to answer. If you cannot find the answer in the context, clearly state: \"Sorry, I could not find that information in the current portfolio documentation.\"
Format structured answers using markdown (bullets, headings, tables) when helpful.
When referencing a project or section, start your answer with its name for clarity.
Never invent beyond the context provided, But you can improvise the answer based on the context.
Keep every answer concise, precise, professional and focused on the question asked.
When asked to elaborate, explain the relevant point in your own words using only what is present in the context. Do not supplement with outside information.
Never include any source document IDs or references in the final answer.";

/// Join retrieved chunk texts, ranked order, separated by a blank line.
pub fn context_block(results: &[SearchResult]) -> String {
    results.iter().map(|r| r.text.as_str()).collect::<Vec<_>>().join("\n\n")
}

/// Fill the user message with the context block and the question.
pub fn user_message(context: &str, question: &str) -> String {
    format!("Context:\n{context}\n\nQuestion: {question}\n\nAnswer:")
}

fn md_h1() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^# ").unwrap())
}

fn html_h1_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<h1(\s[^>]*)?>").unwrap())
}

fn html_h1_close() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</h1>").unwrap())
}

/// Downgrade top-level headings to level 2 so answers fit a chat bubble.
///
/// `# …` becomes `## …` and `<h1>` becomes `<h2>`; deeper headings are left
/// alone.
pub fn clamp_headings(text: &str) -> String {
    let clamped = md_h1().replace_all(text, "## ");
    let clamped = html_h1_open().replace_all(&clamped, "<h2$1>");
    html_h1_close().replace_all(&clamped, "</h2>").into_owned()
}
