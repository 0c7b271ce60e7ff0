//! Sentence segmentation and offset-preserving text normalization.
//!
//! Segments carry byte offsets into the *original* text so every downstream
//! consumer can quote the source verbatim. The [`NormalizedText`] view is
//! what the static corpus matcher searches: lowercased and
//! whitespace-collapsed, with a byte-level map back to original offsets so
//! hits found in the normalized copy can be reported as original spans.

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::types::Segment;

/// Collapses repeated whitespace and trims edges. Keeps content
/// deterministic across runs.
pub fn normalize_whitespace(s: &str) -> String {
    let mut normalized = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(word);
    }
    normalized
}

/// Lowercased, whitespace-collapsed copy of a document that remembers where
/// every byte came from.
///
/// For each byte of the normalized text, `starts`/`ends` hold the byte range
/// of the original character that produced it, so a normalized range maps
/// back to `(starts[range.start], ends[range.end - 1])`. Lowercasing may
/// expand one character into several; all expanded bytes map to the same
/// original character.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    text: String,
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl NormalizedText {
    pub fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut starts = Vec::with_capacity(original.len());
        let mut ends = Vec::with_capacity(original.len());
        let mut pending_space: Option<usize> = None;

        for (offset, ch) in original.char_indices() {
            if ch.is_whitespace() {
                // Leading whitespace is dropped; interior runs collapse to
                // one space mapped to the start of the run.
                if !text.is_empty() && pending_space.is_none() {
                    pending_space = Some(offset);
                }
                continue;
            }
            if let Some(space_at) = pending_space.take() {
                text.push(' ');
                starts.push(space_at);
                ends.push(offset);
            }
            let char_end = offset + ch.len_utf8();
            for lower in ch.to_lowercase() {
                let produced = lower.len_utf8();
                text.push(lower);
                for _ in 0..produced {
                    starts.push(offset);
                    ends.push(char_end);
                }
            }
        }

        Self { text, starts, ends }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Map a half-open byte range of the normalized text back to the
    /// original text. Returns `None` for empty or out-of-bounds ranges.
    pub fn original_span(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        if start >= end || end > self.text.len() {
            return None;
        }
        Some((self.starts[start], self.ends[end - 1]))
    }
}

/// Split document text into analyzable segments.
///
/// Splits on runs of sentence-ending punctuation (`.`, `!`, `?`), trims each
/// fragment, and discards fragments below the configured word minimum.
/// Fails with a validation error when nothing survives: "document too
/// short" is a different outcome than "no matches found".
pub fn segment(text: &str, cfg: &AnalysisConfig) -> Result<Vec<Segment>, AnalysisError> {
    let mut segments = Vec::new();
    let mut fragment_start = 0usize;

    for (idx, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?') {
            push_fragment(text, fragment_start, idx, cfg, &mut segments);
            fragment_start = idx + ch.len_utf8();
        }
    }
    push_fragment(text, fragment_start, text.len(), cfg, &mut segments);

    if segments.is_empty() {
        return Err(AnalysisError::Validation(format!(
            "no sentence with at least {} words",
            cfg.min_segment_words
        )));
    }
    Ok(segments)
}

/// Trim a raw fragment to its non-whitespace core and keep it if it clears
/// the word minimum.
fn push_fragment(
    text: &str,
    start: usize,
    end: usize,
    cfg: &AnalysisConfig,
    segments: &mut Vec<Segment>,
) {
    let fragment = &text[start..end];
    let trimmed = fragment.trim_start();
    let lead = fragment.len() - trimmed.len();
    let trimmed = trimmed.trim_end();
    if trimmed.is_empty() {
        return;
    }

    let word_count = trimmed.split_whitespace().count();
    if word_count < cfg.min_segment_words {
        return;
    }

    let start_offset = start + lead;
    segments.push(Segment {
        id: segments.len(),
        text: trimmed.to_string(),
        normalized_text: normalize_whitespace(trimmed),
        start_offset,
        end_offset: start_offset + trimmed.len(),
        word_count,
    });
}
