//! Lectern Core Library
//!
//! Session state and real-time coordination for the lectern learning
//! companion: transcript/playhead synchronization, quiz workflow, the
//! floating quiz panel, and the client for the AI backend.

pub mod api;
pub mod error;
pub mod format;
pub mod playback;
pub mod quiz;
pub mod session;
pub mod transcript;
pub mod types;
pub mod window;

// Re-export commonly used items at crate root
pub use api::ApiClient;
pub use error::{LearnError, Result};
pub use format::{format_segment, format_timestamp};
pub use playback::{PlaybackClock, PlaybackState, PlaybackWidget, WidgetEvent};
pub use quiz::{QuizMode, QuizSession};
pub use session::{
    CHAT_FAILED_MESSAGE, ChatView, LoadingFlags, NOTES_FAILED_MESSAGE, NotesView, StudySession,
    TRANSCRIPT_PENDING_MESSAGE,
};
pub use transcript::{TranscriptIndex, TranscriptPayload, TranscriptSource};
pub use types::{Lecture, LectureCatalog, NotesMode, QuizQuestion, TranscriptSegment};
