//! Sliding-window chunking and content-hash deduplication.
//!
//! [`SlidingWindowChunker`] cuts each document into windows of at most
//! `chunk_size` characters whose starts advance by exactly
//! `chunk_size - chunk_overlap`. When a raw cut would land mid-word, the
//! emitted window is shortened to the last paragraph break, line break, or
//! space inside the overlap tail; the following window re-covers that tail,
//! so no text is lost between windows. All offsets are character offsets.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::document::{Chunk, Document};

/// Splits documents into overlapping fixed-stride windows.
#[derive(Debug, Clone)]
pub struct SlidingWindowChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SlidingWindowChunker {
    /// Create a new chunker.
    ///
    /// The window stride is `chunk_size - chunk_overlap`, saturating at zero;
    /// a zero stride emits the first window and stops.
    /// [`RagConfig`](crate::config::RagConfig) validation rejects such
    /// parameters before they reach a pipeline.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }

    /// Split a document into chunks.
    ///
    /// A document of at most `chunk_size` characters yields exactly one chunk
    /// holding the full text at offset 0. An empty document yields no chunks.
    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = document.text.chars().collect();
        let total = chars.len();
        if total <= self.chunk_size {
            return vec![Chunk {
                text: document.text.clone(),
                start_offset: 0,
                source_path: document.source_path.clone(),
                file_type: document.file_type.clone(),
            }];
        }

        let stride = self.chunk_size.saturating_sub(self.chunk_overlap);
        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let raw_end = (start + self.chunk_size).min(total);
            let end = if raw_end < total && splits_word(&chars, raw_end) {
                last_separator_at(&chars, start + stride, raw_end).unwrap_or(raw_end)
            } else {
                raw_end
            };

            chunks.push(Chunk {
                text: chars[start..end].iter().collect(),
                start_offset: start,
                source_path: document.source_path.clone(),
                file_type: document.file_type.clone(),
            });

            if raw_end == total {
                break;
            }
            if stride == 0 {
                break;
            }
            start += stride;
        }

        chunks
    }

    /// Split a sequence of documents, preserving document order.
    pub fn chunk_all(&self, documents: &[Document]) -> Vec<Chunk> {
        documents.iter().flat_map(|d| self.chunk(d)).collect()
    }
}

/// Whether cutting before `pos` would separate two non-whitespace characters.
fn splits_word(chars: &[char], pos: usize) -> bool {
    pos > 0 && !chars[pos - 1].is_whitespace() && !chars[pos].is_whitespace()
}

/// Find the best cut position in `[floor, raw_end)`, preferring paragraph
/// breaks, then line breaks, then spaces. The emitted chunk ends just before
/// the separator.
fn last_separator_at(chars: &[char], floor: usize, raw_end: usize) -> Option<usize> {
    if let Some(cut) = (floor..raw_end.saturating_sub(1))
        .rev()
        .find(|&i| chars[i] == '\n' && chars[i + 1] == '\n')
    {
        return Some(cut);
    }
    if let Some(cut) = (floor..raw_end).rev().find(|&i| chars[i] == '\n') {
        return Some(cut);
    }
    (floor..raw_end).rev().find(|&i| chars[i] == ' ')
}

/// Drop chunks whose whitespace-stripped text was already seen.
///
/// Duplicates are keyed on the SHA-256 of the stripped text; the
/// first-encountered chunk survives and input order is preserved.
pub fn dedup_chunks(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let mut seen: HashSet<[u8; 32]> = HashSet::new();
    chunks.into_iter().filter(|chunk| seen.insert(content_key(&chunk.text))).collect()
}

fn content_key(text: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(text.trim().as_bytes());
    hasher.finalize().into()
}
