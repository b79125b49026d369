//! Overlapping text chunking for embedding.
//!
//! Text is cut into windows of at most `chunk_size` characters. Each window
//! ends at the last natural boundary it contains (paragraph, line, sentence,
//! word) and only falls back to a hard character cut when none is usable.
//! Consecutive chunks share `chunk_overlap` characters.

use crate::config::ChunkerConfig;
use crate::error::Result;

/// Boundaries tried from coarsest to finest. The cut goes after the separator.
const SEPARATORS: [&str; 6] = ["\n\n", "\n", ". ", "! ", "? ", " "];

/// A chunk borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunk<'a> {
    /// The chunk text, including the overlap with the previous chunk.
    pub text: &'a str,

    /// Character offset of the chunk in the source text.
    pub start: usize,

    /// Number of leading characters shared with the previous chunk.
    pub overlap: usize,
}

impl<'a> TextChunk<'a> {
    /// The part of this chunk not already covered by the previous one.
    pub fn fresh_text(&self) -> &'a str {
        self.text
            .char_indices()
            .nth(self.overlap)
            .map_or("", |(i, _)| &self.text[i..])
    }

    /// Character offset one past the end of the chunk.
    pub fn end(&self) -> usize {
        self.start + self.text.chars().count()
    }
}

/// Splits text into overlapping chunks.
#[derive(Debug, Clone, Default)]
pub struct TextChunker {
    config: ChunkerConfig,
}

impl TextChunker {
    /// Create a chunker with the given size and overlap.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::with_config(ChunkerConfig::new(chunk_size, chunk_overlap))
    }

    /// Create a chunker from a configuration, rejecting `overlap >= size`.
    pub fn with_config(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Lazily chunk `text`. Each call starts a fresh pass over the text.
    pub fn chunk<'a>(&self, text: &'a str) -> Chunks<'a> {
        Chunks {
            text,
            size: self.config.chunk_size,
            overlap: self.config.chunk_overlap,
            start_byte: 0,
            start_char: 0,
            shared: 0,
            finished: text.is_empty(),
        }
    }
}

/// Iterator over the chunks of a text. Cloning it restarts from the same position.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    text: &'a str,
    size: usize,
    overlap: usize,
    start_byte: usize,
    start_char: usize,
    shared: usize,
    finished: bool,
}

impl Chunks<'_> {
    /// Byte length of the chunk cut from `window`.
    ///
    /// The cut must leave more than `overlap` characters in the chunk, so the
    /// next window always starts further along the text.
    fn find_cut(&self, window: &str) -> usize {
        for separator in SEPARATORS {
            if let Some(pos) = window.rfind(separator) {
                let cut = pos + separator.len();
                if window[..cut].chars().count() > self.overlap {
                    return cut;
                }
            }
        }
        window.len()
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = TextChunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let rest = &self.text[self.start_byte..];
        let window_end = rest
            .char_indices()
            .nth(self.size)
            .map_or(rest.len(), |(i, _)| i);

        if window_end == rest.len() {
            self.finished = true;
            return Some(TextChunk {
                text: rest,
                start: self.start_char,
                overlap: self.shared,
            });
        }

        let window = &rest[..window_end];
        let cut = self.find_cut(window);
        let chunk = TextChunk {
            text: &window[..cut],
            start: self.start_char,
            overlap: self.shared,
        };

        // Step back `overlap` characters from the cut for the next window.
        let chunk_chars = chunk.text.chars().count();
        let next_start = if self.overlap == 0 {
            cut
        } else {
            chunk
                .text
                .char_indices()
                .rev()
                .nth(self.overlap - 1)
                .map_or(0, |(i, _)| i)
        };

        self.start_byte += next_start;
        self.start_char += chunk_chars - self.overlap;
        self.shared = self.overlap;

        Some(chunk)
    }
}
