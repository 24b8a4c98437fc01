use crate::config::DEFAULT_CHUNK_SIZE;
use crate::types::{Chunk, CHUNK_SEPARATOR};
use tracing::{debug, warn};

/// Packs separator-delimited pieces into chunks of at most `chunk_size` chars.
#[derive(Debug, Clone)]
pub struct DocumentSplitter {
    chunk_size: usize,
    separator: String,
}

impl DocumentSplitter {
    pub fn new(chunk_size: usize) -> Self {
        Self::with_separator(chunk_size, CHUNK_SEPARATOR)
    }

    pub fn with_separator(chunk_size: usize, separator: &str) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            separator: separator.to_string(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Splits on the separator and greedily merges consecutive pieces while
    /// the merged length (separators included) stays within the bound.
    /// Pieces are never cut; a piece longer than the bound is its own chunk.
    /// Empty pieces are dropped. Chunks do not overlap.
    pub fn create_chunks(&self, text: &str) -> Vec<Chunk> {
        let separator_len = self.separator.chars().count();
        let pieces = text.split(self.separator.as_str()).filter(|p| !p.is_empty());

        let mut merged: Vec<String> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = piece.chars().count();
            let joined_len = if current.is_empty() { 0 } else { separator_len };

            if !current.is_empty() && total + len + joined_len > self.chunk_size {
                merged.push(current.join(self.separator.as_str()));
                current.clear();
                total = 0;
            }

            if len > self.chunk_size {
                warn!(
                    "Created a chunk of size {}, which is longer than the specified {}",
                    len, self.chunk_size
                );
            }

            total += len + if current.is_empty() { 0 } else { separator_len };
            current.push(piece);
        }

        if !current.is_empty() {
            merged.push(current.join(self.separator.as_str()));
        }

        let chunks: Vec<Chunk> = merged
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk { index, text })
            .collect();

        debug!(
            "Split {} chars into {} chunks (chunk_size={})",
            text.chars().count(),
            chunks.len(),
            self.chunk_size
        );

        chunks
    }

    /// Rebuilds the text covered by `chunks`, i.e. the input minus empty pieces.
    pub fn reassemble(&self, chunks: &[Chunk]) -> String {
        chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(self.separator.as_str())
    }
}

impl Default for DocumentSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}
