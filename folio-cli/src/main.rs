//! `folio` — ingest a documents directory, then chat over it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use folio_chat::{ChatEngine, Conversation, HfTextGenerator, Submission};
use folio_rag::{
    DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_MODEL, DiskStore, EmbeddingProvider,
    HfEmbeddingProvider, RagConfig, RagPipeline, VectorStore,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Question answering over your own portfolio documents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a documents directory and build the vector index
    Ingest {
        /// Directory scanned for pdf, md, and txt files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Directory holding the persisted index
        #[arg(long, default_value = "index")]
        index_dir: PathBuf,
        /// Window size in characters
        #[arg(long, default_value_t = 1000)]
        chunk_size: usize,
        /// Overlap between consecutive windows in characters
        #[arg(long, default_value_t = 200)]
        chunk_overlap: usize,
        /// Embedding model id
        #[arg(long, default_value = DEFAULT_EMBEDDING_MODEL)]
        embedding_model: String,
        /// Dimensionality of the embedding model's vectors
        #[arg(long, default_value_t = DEFAULT_EMBEDDING_DIMENSIONS)]
        embedding_dimensions: usize,
    },
    /// Chat over a previously built index
    Chat {
        /// Directory holding the persisted index
        #[arg(long, default_value = "index")]
        index_dir: PathBuf,
        /// Number of chunks retrieved per question
        #[arg(long, default_value_t = 3)]
        top_k: usize,
        /// Chat model id
        #[arg(long, default_value = folio_chat::DEFAULT_CHAT_MODEL)]
        model: String,
        /// Output token budget per answer
        #[arg(long, default_value_t = folio_chat::DEFAULT_MAX_TOKENS)]
        max_tokens: u32,
        /// Embedding model id (must match the one the index was built with)
        #[arg(long, default_value = DEFAULT_EMBEDDING_MODEL)]
        embedding_model: String,
        /// Dimensionality of the embedding model's vectors
        #[arg(long, default_value_t = DEFAULT_EMBEDDING_DIMENSIONS)]
        embedding_dimensions: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    match Cli::parse().command {
        Command::Ingest {
            data_dir,
            index_dir,
            chunk_size,
            chunk_overlap,
            embedding_model,
            embedding_dimensions,
        } => {
            run_ingest(
                data_dir,
                index_dir,
                chunk_size,
                chunk_overlap,
                embedding_model,
                embedding_dimensions,
            )
            .await
        }
        Command::Chat {
            index_dir,
            top_k,
            model,
            max_tokens,
            embedding_model,
            embedding_dimensions,
        } => {
            run_chat(index_dir, top_k, model, max_tokens, embedding_model, embedding_dimensions)
                .await
        }
    }
}

fn hf_token() -> anyhow::Result<String> {
    std::env::var("HF_TOKEN").context("HF_TOKEN not set; export your Hugging Face API token")
}

async fn run_ingest(
    data_dir: PathBuf,
    index_dir: PathBuf,
    chunk_size: usize,
    chunk_overlap: usize,
    embedding_model: String,
    embedding_dimensions: usize,
) -> anyhow::Result<()> {
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("creating {}", data_dir.display()))?;
        println!(
            "Created {}. Place your pdf, md, and txt files there and re-run.",
            data_dir.display()
        );
        return Ok(());
    }

    let embedder = Arc::new(HfEmbeddingProvider::with_model(
        hf_token()?,
        embedding_model,
        embedding_dimensions,
    )?);
    let store = Arc::new(
        DiskStore::open(&index_dir, embedder.model_id(), embedder.dimensions()).await?,
    );
    let config =
        RagConfig::builder().chunk_size(chunk_size).chunk_overlap(chunk_overlap).build()?;
    let pipeline =
        RagPipeline::builder().embedder(embedder).store(store.clone()).config(config).build()?;

    let report = pipeline.ingest_dir(&data_dir).await?;
    println!(
        "Indexed {} file(s): {} document(s), {} chunk(s), {} unique.",
        report.files_matched, report.documents, report.chunks, report.unique_chunks
    );
    if !report.failures.is_empty() {
        println!("Skipped {} unreadable file(s):", report.failures.len());
        for failure in &report.failures {
            println!("  {}: {}", failure.path, failure.message);
        }
    }
    println!(
        "Index at {} now holds {} record(s).",
        index_dir.display(),
        store.count().await?
    );
    Ok(())
}

async fn run_chat(
    index_dir: PathBuf,
    top_k: usize,
    model: String,
    max_tokens: u32,
    embedding_model: String,
    embedding_dimensions: usize,
) -> anyhow::Result<()> {
    if !DiskStore::exists(&index_dir) {
        bail!("no index at {}; run `folio ingest` first", index_dir.display());
    }

    let token = hf_token()?;
    let embedder = Arc::new(HfEmbeddingProvider::with_model(
        token.clone(),
        embedding_model,
        embedding_dimensions,
    )?);
    let store = Arc::new(
        DiskStore::open(&index_dir, embedder.model_id(), embedder.dimensions()).await?,
    );
    if store.count().await? == 0 {
        bail!(
            "index at {} holds no records; run `folio ingest` first",
            index_dir.display()
        );
    }

    let config = RagConfig::builder().top_k(top_k).build()?;
    let pipeline =
        RagPipeline::builder().embedder(embedder).store(store).config(config).build()?;
    let generator =
        Arc::new(HfTextGenerator::with_model(token, model)?.max_tokens(max_tokens));
    let engine = ChatEngine::new(pipeline, generator);

    println!("Ask about the portfolio. /save <path> writes the transcript, /quit exits.");
    let mut editor = DefaultEditor::new()?;
    let mut conversation = Conversation::new();

    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                if line == "/quit" || line == "/exit" {
                    break;
                }
                if let Some(rest) = line.strip_prefix("/save") {
                    let path = rest.trim();
                    if path.is_empty() {
                        println!("usage: /save <path>");
                        continue;
                    }
                    match std::fs::write(path, conversation.transcript()) {
                        Ok(()) => println!("Transcript saved to {path}."),
                        Err(e) => println!("Could not save transcript: {e}"),
                    }
                    continue;
                }

                match conversation.submit(line) {
                    Submission::Accepted => {
                        let answer = engine.resolve(&mut conversation).await?;
                        println!("ai> {answer}\n");
                    }
                    Submission::RejectedEmpty => {}
                    Submission::RejectedPending => {
                        println!("still working on the previous question");
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Bye.");
    Ok(())
}
