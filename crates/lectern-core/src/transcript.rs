use std::cmp::Ordering;

use crate::types::TranscriptSegment;

/// Length of one synthesized segment when the backend only has flat text.
pub const SYNTHETIC_BLOCK_SECONDS: f64 = 5.0;

/// The transcript endpoint answers with one of two shapes: a timed
/// `timeline`, or `full_text` with no timing at all.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptPayload {
    Timeline(Vec<TranscriptSegment>),
    PlainText(String),
    Empty,
}

impl TranscriptPayload {
    /// Builds an index from the payload, or `None` when there is nothing
    /// to show.
    pub fn into_index(self) -> Option<TranscriptIndex> {
        match self {
            TranscriptPayload::Timeline(segments) if !segments.is_empty() => {
                Some(TranscriptIndex::from_timeline(segments))
            }
            TranscriptPayload::PlainText(text) if !text.trim().is_empty() => {
                Some(TranscriptIndex::from_plain_text(&text))
            }
            _ => None,
        }
    }
}

/// Whether segment timing came from the backend or was synthesized from
/// flat text. Synthesized timing is an approximation and is labeled as
/// such in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptSource {
    Timed,
    Synthesized,
}

/// Ordered, non-overlapping timed segments with playhead lookup.
#[derive(Debug, Clone)]
pub struct TranscriptIndex {
    segments: Vec<TranscriptSegment>,
    source: TranscriptSource,
}

impl TranscriptIndex {
    /// Builds the index from backend-provided timing. Degenerate segments
    /// (`start >= end`) are dropped; the rest are sorted by start.
    pub fn from_timeline(mut segments: Vec<TranscriptSegment>) -> Self {
        segments.retain(|s| s.start < s.end);
        segments.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));
        Self {
            segments,
            source: TranscriptSource::Timed,
        }
    }

    /// Synthesizes fixed 5-second segments from flat text, one per
    /// sentence, in original text order. The result is explicitly marked
    /// `Synthesized`; it is an approximation, not real timing.
    pub fn from_plain_text(text: &str) -> Self {
        let segments = text
            .split(". ")
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .enumerate()
            .map(|(i, sentence)| {
                let start = i as f64 * SYNTHETIC_BLOCK_SECONDS;
                TranscriptSegment {
                    start,
                    end: start + SYNTHETIC_BLOCK_SECONDS,
                    text: sentence.to_string(),
                }
            })
            .collect();
        Self {
            segments,
            source: TranscriptSource::Synthesized,
        }
    }

    /// The unique segment with `start <= t < end`, if any. Valid for any
    /// playhead movement, forward or backward.
    pub fn active_at(&self, t: f64) -> Option<usize> {
        let idx = self.segments.partition_point(|s| s.start <= t);
        if idx == 0 {
            return None;
        }
        let segment = &self.segments[idx - 1];
        (t < segment.end).then_some(idx - 1)
    }

    /// Seek position for click-to-seek on a segment row.
    pub fn seek_target(&self, index: usize) -> Option<f64> {
        self.segments.get(index).map(|s| s.start)
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == TranscriptSource::Synthesized
    }

    pub fn source(&self) -> TranscriptSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// End of the last segment, i.e. the covered duration.
    pub fn duration(&self) -> Option<f64> {
        self.segments.last().map(|s| s.end)
    }
}
