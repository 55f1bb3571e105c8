//! Document loading from a directory tree.
//!
//! Scans a root directory recursively for supported file types (`pdf`, `md`,
//! `txt`), parses each file into one or more [`Document`]s, and records
//! per-file failures without aborting the scan. Provenance metadata (relative
//! source path, file type) is attached to every produced document.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use pulldown_cmark::{Event, Parser, TagEnd};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::document::Document;
use crate::error::{RagError, Result};

/// A file that matched a supported pattern but could not be parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadFailure {
    /// Path of the failing file, relative to the scan root.
    pub path: String,
    /// A description of the parse failure.
    pub message: String,
}

/// The result of scanning a directory tree.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    /// Documents produced across all files (one per file, one per PDF page).
    pub documents: Vec<Document>,
    /// Files that matched a pattern but failed to parse.
    pub failures: Vec<LoadFailure>,
    /// Number of files that matched the supported patterns.
    pub files_matched: usize,
}

type ParseFn = fn(&Path) -> std::result::Result<Vec<String>, String>;

/// Extension table: lower-cased extension to parse function, tried in order.
const SUPPORTED_TYPES: &[(&str, ParseFn)] =
    &[("pdf", parse_pdf), ("md", parse_markdown), ("txt", parse_text)];

/// Scan `root` recursively and load every supported file into [`Document`]s.
///
/// A file that fails to parse is recorded in [`LoadOutcome::failures`] and
/// skipped; the scan continues. Each document carries its path relative to
/// `root` and its lower-cased extension as provenance metadata.
///
/// # Errors
///
/// Returns [`RagError::NoDocumentsFound`] when zero documents were produced
/// across all patterns, including when the root directory does not exist.
pub fn load_documents(root: impl AsRef<Path>) -> Result<LoadOutcome> {
    let root = root.as_ref();
    info!(root = %root.display(), "scanning for documents");

    let mut by_type: HashMap<&str, Vec<PathBuf>> = HashMap::new();
    for entry in WalkDir::new(root).into_iter().filter_map(std::result::Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if let Some(&(file_type, _)) = SUPPORTED_TYPES.iter().find(|(t, _)| *t == ext) {
            by_type.entry(file_type).or_default().push(entry.into_path());
        }
    }

    let mut outcome = LoadOutcome::default();
    for (file_type, parse) in SUPPORTED_TYPES {
        let file_type = *file_type;
        let mut files = by_type.remove(file_type).unwrap_or_default();
        if files.is_empty() {
            warn!(file_type, "no files found for pattern");
            continue;
        }
        files.sort();
        info!(file_type, files = files.len(), "loading files");

        for path in files {
            outcome.files_matched += 1;
            let source_path = path
                .strip_prefix(root)
                .unwrap_or(path.as_path())
                .to_string_lossy()
                .into_owned();
            match parse(&path) {
                Ok(texts) => {
                    for text in texts {
                        outcome.documents.push(Document {
                            text,
                            source_path: source_path.clone(),
                            file_type: file_type.to_string(),
                        });
                    }
                }
                Err(message) => {
                    error!(path = %path.display(), error = %message, "failed to load file");
                    outcome.failures.push(LoadFailure { path: source_path, message });
                }
            }
        }
    }

    if outcome.documents.is_empty() {
        return Err(RagError::NoDocumentsFound { root: root.display().to_string() });
    }

    info!(
        documents = outcome.documents.len(),
        files = outcome.files_matched,
        "document loading complete"
    );
    if !outcome.failures.is_empty() {
        warn!(failed = outcome.failures.len(), "some files failed to load");
        for failure in &outcome.failures {
            warn!(path = %failure.path, error = %failure.message, "load failure");
        }
    }

    Ok(outcome)
}

/// One document per page, matching how paginated formats are retrieved.
///
/// `pdf_extract` panics rather than errors on some malformed files; the
/// extraction runs under `catch_unwind` so those land in the failure list
/// with the ordinary parse errors.
fn parse_pdf(path: &Path) -> std::result::Result<Vec<String>, String> {
    catch_parser_panic(|| pdf_extract::extract_text_by_pages(path).map_err(|e| e.to_string()))
}

/// Run a parser, converting a panic into a parse-failure message.
fn catch_parser_panic<T>(
    parse: impl FnOnce() -> std::result::Result<T, String> + std::panic::UnwindSafe,
) -> std::result::Result<T, String> {
    match std::panic::catch_unwind(parse) {
        Ok(result) => result,
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown cause".to_string());
            Err(format!("parser panicked: {reason}"))
        }
    }
}

fn parse_markdown(path: &Path) -> std::result::Result<Vec<String>, String> {
    let raw = fs::read_to_string(path).map_err(|e| e.to_string())?;
    Ok(vec![markdown_to_text(&raw)])
}

fn parse_text(path: &Path) -> std::result::Result<Vec<String>, String> {
    fs::read_to_string(path).map(|text| vec![text]).map_err(|e| e.to_string())
}

/// Flatten markdown to plain text, keeping block boundaries as blank lines.
fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(TagEnd::TableCell) => text.push(' '),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::BlockQuote
                | TagEnd::TableRow,
            )
            | Event::Rule => {
                if !text.is_empty() && !text.ends_with("\n\n") {
                    text.push_str("\n\n");
                }
            }
            _ => {}
        }
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_markdown_to_plain_text() {
        let text = markdown_to_text("# Title\n\nFirst *paragraph*.\n\n- one\n- two\n");
        assert_eq!(text, "Title\n\nFirst paragraph.\n\none\n\ntwo");
    }

    #[test]
    fn loads_txt_and_md_with_metadata() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("about.txt"), "Plain text about me.").unwrap();
        fs::write(root.join("nested/project.md"), "# Project\n\nDetails.").unwrap();

        let outcome = load_documents(root).unwrap();
        assert_eq!(outcome.files_matched, 2);
        assert_eq!(outcome.documents.len(), 2);
        assert!(outcome.failures.is_empty());

        let md = outcome.documents.iter().find(|d| d.file_type == "md").unwrap();
        assert_eq!(md.source_path, Path::new("nested").join("project.md").to_string_lossy());
        assert_eq!(md.text, "Project\n\nDetails.");

        let txt = outcome.documents.iter().find(|d| d.file_type == "txt").unwrap();
        assert_eq!(txt.source_path, "about.txt");
        assert_eq!(txt.text, "Plain text about me.");
    }

    #[test]
    fn records_failure_and_keeps_loading_siblings() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("broken.pdf"), b"not a real pdf").unwrap();
        fs::write(root.join("ok.txt"), "Still loads.").unwrap();

        let outcome = load_documents(root).unwrap();
        assert_eq!(outcome.documents.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].path, "broken.pdf");
        assert!(!outcome.failures[0].message.is_empty());
    }

    #[test]
    fn parser_panics_are_reported_as_failures() {
        let result: std::result::Result<Vec<String>, String> =
            catch_parser_panic(|| panic!("malformed xref at byte 12"));
        let message = result.unwrap_err();
        assert!(message.contains("malformed xref at byte 12"));
    }

    #[test]
    fn empty_tree_is_no_documents_found() {
        let temp = tempfile::tempdir().unwrap();
        let err = load_documents(temp.path()).unwrap_err();
        assert!(matches!(err, RagError::NoDocumentsFound { .. }));
    }

    #[test]
    fn unsupported_extensions_are_ignored() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("notes.txt"), "kept").unwrap();
        fs::write(root.join("image.png"), b"\x89PNG").unwrap();

        let outcome = load_documents(root).unwrap();
        assert_eq!(outcome.files_matched, 1);
        assert_eq!(outcome.documents.len(), 1);
    }
}
