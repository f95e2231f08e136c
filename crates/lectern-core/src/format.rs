use crate::types::TranscriptSegment;

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format a transcript segment as a timestamped row
pub fn format_segment(segment: &TranscriptSegment) -> String {
    format!("[{}] {}", format_timestamp(segment.start), segment.text.trim())
}
