use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{LearnError, Result};
use crate::playback::{PlaybackClock, WidgetEvent};
use crate::quiz::{QuizMode, QuizSession};
use crate::transcript::{TranscriptIndex, TranscriptPayload};
use crate::types::{LectureCatalog, NotesMode, QuizQuestion};
use crate::window::FloatingPanel;

/// Shown in place of a transcript that failed to load or is still being
/// extracted on the backend.
pub const TRANSCRIPT_PENDING_MESSAGE: &str = "Transcript will appear after processing...";

/// Fixed failure marker for notes generation; replaces any stale view.
pub const NOTES_FAILED_MESSAGE: &str =
    "Notes generation failed. Trigger it again once the lecture has finished processing.";

/// Fixed fallback for an unanswered chatbot question.
pub const CHAT_FAILED_MESSAGE: &str = "The assistant could not answer that. Try asking again.";

/// What the notes section currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NotesView {
    #[default]
    Empty,
    Ready(String),
    Failed,
}

/// What the chat section currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChatView {
    #[default]
    Empty,
    Answered(String),
    Failed,
}

/// Loading indicators, one per in-flight feature. Each flag goes up in the
/// matching `begin_*` intent and back down on every exit path of the
/// matching `finish` intent.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadingFlags {
    pub lecture: bool,
    pub transcript: bool,
    pub quiz: bool,
    pub notes: bool,
    pub chat: bool,
}

/// Dispatch context for resolving a lecture to a playable video.
#[derive(Debug, Clone)]
pub struct LectureRequest {
    pub token: Uuid,
    pub lecture_id: String,
}

/// Dispatch context for the transcript fetch that follows resolution.
#[derive(Debug, Clone)]
pub struct TranscriptRequest {
    pub token: Uuid,
    pub video_id: String,
}

/// Dispatch context for quiz generation.
#[derive(Debug, Clone)]
pub struct QuizRequest {
    pub token: Uuid,
    pub video_id: String,
    pub watched_seconds: u64,
}

/// Dispatch context for notes generation.
#[derive(Debug, Clone)]
pub struct NotesRequest {
    pub token: Uuid,
    pub video_id: String,
    pub watched_seconds: u64,
    pub mode: NotesMode,
}

/// Dispatch context for a chatbot question.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub token: Uuid,
    pub video_id: String,
    pub question: String,
}

/// The single owner of all mutable session state.
///
/// Every mutation goes through an intent method. Network work is dispatched
/// by the caller using the `begin_*` return value; results come back
/// through the matching `*_loaded`/`*_generated` intent carrying the
/// request's context token. Results whose token no longer matches the
/// current context (the lecture changed underneath them) are discarded, so
/// a stale response can never overwrite newer state.
#[derive(Debug, Clone)]
pub struct StudySession {
    catalog: LectureCatalog,
    selected_lecture: Option<String>,
    video_id: Option<String>,
    context: Uuid,
    pub clock: PlaybackClock,
    transcript: Option<TranscriptIndex>,
    active_segment: Option<usize>,
    auto_scroll: bool,
    quiz_mode: QuizMode,
    quiz: Option<QuizSession>,
    quiz_panel_open: bool,
    pub panel: FloatingPanel,
    notes: NotesView,
    chat: ChatView,
    loading: LoadingFlags,
    status: Option<String>,
}

impl StudySession {
    pub fn new(quiz_mode: QuizMode) -> Self {
        Self {
            catalog: LectureCatalog::new(),
            selected_lecture: None,
            video_id: None,
            context: Uuid::new_v4(),
            clock: PlaybackClock::default(),
            transcript: None,
            active_segment: None,
            auto_scroll: true,
            quiz_mode,
            quiz: None,
            quiz_panel_open: false,
            panel: FloatingPanel::default(),
            notes: NotesView::Empty,
            chat: ChatView::Empty,
            loading: LoadingFlags::default(),
            status: None,
        }
    }

    // ----- catalog -----

    /// Applies the one-time catalog fetch. The catalog is read-only after.
    pub fn catalog_loaded(&mut self, result: Result<LectureCatalog>) {
        match result {
            Ok(catalog) => {
                info!(lectures = catalog.len(), "lecture catalog loaded");
                self.catalog = catalog;
            }
            Err(err) => {
                warn!(%err, "catalog fetch failed");
                self.status = Some(format!("Could not load lectures: {err}"));
            }
        }
    }

    pub fn select_lecture(&mut self, lecture_id: String) {
        self.selected_lecture = Some(lecture_id);
    }

    // ----- lecture loading -----

    /// Starts loading the selected lecture. Wholesale-resets all
    /// per-lecture state and rotates the context token, which orphans any
    /// outstanding request from the previous lecture.
    pub fn begin_load_lecture(&mut self) -> Option<LectureRequest> {
        let Some(lecture_id) = self.selected_lecture.clone() else {
            self.guard_failed(LearnError::EmptyInput("Select a lecture first"));
            return None;
        };
        self.reset_for_new_lecture();
        self.loading.lecture = true;
        info!(%lecture_id, "loading lecture");
        Some(LectureRequest {
            token: self.context,
            lecture_id,
        })
    }

    /// Rejects an intent before dispatch; the reason becomes the visible
    /// status line.
    fn guard_failed(&mut self, err: LearnError) {
        debug!(%err, "intent rejected");
        self.status = Some(err.to_string());
    }

    fn reset_for_new_lecture(&mut self) {
        self.context = Uuid::new_v4();
        self.video_id = None;
        self.transcript = None;
        self.active_segment = None;
        self.quiz = None;
        self.quiz_panel_open = false;
        self.notes = NotesView::Empty;
        self.chat = ChatView::Empty;
        self.clock.reset();
        self.loading = LoadingFlags::default();
        self.status = None;
    }

    /// Applies the video resolution result; on success returns the
    /// follow-up transcript fetch to dispatch.
    pub fn video_resolved(
        &mut self,
        token: Uuid,
        result: Result<String>,
    ) -> Option<TranscriptRequest> {
        if token != self.context {
            debug!("discarding stale video resolution");
            return None;
        }
        self.loading.lecture = false;
        match result {
            Ok(video_id) => {
                self.video_id = Some(video_id.clone());
                self.loading.transcript = true;
                Some(TranscriptRequest { token, video_id })
            }
            Err(err) => {
                warn!(%err, "video resolution failed");
                self.status = Some(format!("Could not load the lecture: {err}"));
                None
            }
        }
    }

    /// Applies the transcript fetch result. A failed or empty transcript
    /// leaves a pending notice rather than stale or bogus timing.
    pub fn transcript_loaded(&mut self, token: Uuid, result: Result<TranscriptPayload>) {
        if token != self.context {
            debug!("discarding stale transcript");
            return;
        }
        self.loading.transcript = false;
        self.active_segment = None;
        match result {
            Ok(payload) => {
                self.transcript = payload.into_index();
                if self.transcript.is_none() {
                    self.status = Some(TRANSCRIPT_PENDING_MESSAGE.to_string());
                }
            }
            Err(err) => {
                warn!(%err, "transcript fetch failed");
                self.transcript = None;
                self.status = Some(TRANSCRIPT_PENDING_MESSAGE.to_string());
            }
        }
    }

    // ----- playback -----

    pub fn widget_event(&mut self, event: WidgetEvent) {
        self.clock.on_widget_event(event);
    }

    /// Feeds one sampled playhead position. Returns the newly active
    /// segment index when it changed and auto-scroll should follow it.
    pub fn tick(&mut self, position: f64) -> Option<usize> {
        self.clock.tick(position);
        let active = self
            .transcript
            .as_ref()
            .and_then(|index| index.active_at(position));
        if active == self.active_segment {
            return None;
        }
        self.active_segment = active;
        if self.auto_scroll { active } else { None }
    }

    /// Click-to-seek: returns the seek-and-resume target for a segment row.
    pub fn segment_clicked(&mut self, index: usize) -> Option<f64> {
        let target = self.transcript.as_ref()?.seek_target(index)?;
        self.active_segment = Some(index);
        Some(target)
    }

    pub fn toggle_auto_scroll(&mut self) {
        self.auto_scroll = !self.auto_scroll;
    }

    // ----- quiz orchestration -----

    /// Starts quiz generation for the watched portion. Requires a resolved
    /// video; otherwise a visible hint is set and nothing is dispatched.
    pub fn begin_quiz(&mut self) -> Option<QuizRequest> {
        let Some(video_id) = self.video_id.clone() else {
            self.guard_failed(LearnError::EmptyInput(
                "Load a lecture before generating a quiz",
            ));
            return None;
        };
        self.loading.quiz = true;
        Some(QuizRequest {
            token: self.context,
            video_id,
            watched_seconds: self.clock.watched_seconds(),
        })
    }

    /// Applies a quiz generation result. Success atomically replaces the
    /// quiz session and opens the panel; failure or a malformed payload
    /// leaves the prior quiz untouched. The loading flag clears on every
    /// path with a matching token.
    pub fn quiz_generated(&mut self, token: Uuid, result: Result<Vec<QuizQuestion>>) {
        if token != self.context {
            debug!("discarding stale quiz");
            return;
        }
        self.loading.quiz = false;
        match result.and_then(|questions| QuizSession::load(questions, self.quiz_mode)) {
            Ok(quiz) => {
                info!(questions = quiz.len(), "quiz loaded");
                self.quiz = Some(quiz);
                self.quiz_panel_open = true;
                self.status = None;
            }
            Err(err) => {
                warn!(%err, "quiz generation failed");
                self.status = Some(format!("Quiz generation failed: {err}"));
            }
        }
    }

    pub fn close_quiz_panel(&mut self) {
        self.quiz_panel_open = false;
        self.panel.end_drag();
    }

    // ----- notes orchestration -----

    pub fn begin_notes(&mut self, mode: NotesMode) -> Option<NotesRequest> {
        let Some(video_id) = self.video_id.clone() else {
            self.guard_failed(LearnError::EmptyInput(
                "Load a lecture before generating notes",
            ));
            return None;
        };
        self.loading.notes = true;
        Some(NotesRequest {
            token: self.context,
            video_id,
            watched_seconds: self.clock.watched_seconds(),
            mode,
        })
    }

    /// Applies a notes result. Failure replaces the view with the fixed
    /// failure marker instead of leaving a stale or empty view.
    pub fn notes_ready(&mut self, token: Uuid, result: Result<String>) {
        if token != self.context {
            debug!("discarding stale notes");
            return;
        }
        self.loading.notes = false;
        match result {
            Ok(notes) => self.notes = NotesView::Ready(notes),
            Err(err) => {
                warn!(%err, "notes generation failed");
                self.notes = NotesView::Failed;
            }
        }
    }

    // ----- chatbot orchestration -----

    /// Starts a chatbot question. Requires a resolved video and non-empty
    /// question text.
    pub fn begin_chat(&mut self, question: &str) -> Option<ChatRequest> {
        let question = question.trim();
        if question.is_empty() {
            self.guard_failed(LearnError::EmptyInput("Type a question first"));
            return None;
        }
        let Some(video_id) = self.video_id.clone() else {
            self.guard_failed(LearnError::EmptyInput("Load a lecture before asking questions"));
            return None;
        };
        self.loading.chat = true;
        Some(ChatRequest {
            token: self.context,
            video_id,
            question: question.to_string(),
        })
    }

    pub fn chat_answered(&mut self, token: Uuid, result: Result<String>) {
        if token != self.context {
            debug!("discarding stale chat answer");
            return;
        }
        self.loading.chat = false;
        match result {
            Ok(answer) => self.chat = ChatView::Answered(answer),
            Err(err) => {
                warn!(%err, "chatbot failed");
                self.chat = ChatView::Failed;
            }
        }
    }

    // ----- accessors -----

    pub fn catalog(&self) -> &LectureCatalog {
        &self.catalog
    }

    pub fn selected_lecture(&self) -> Option<&str> {
        self.selected_lecture.as_deref()
    }

    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    pub fn transcript(&self) -> Option<&TranscriptIndex> {
        self.transcript.as_ref()
    }

    pub fn active_segment(&self) -> Option<usize> {
        self.active_segment
    }

    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    pub fn quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    pub fn quiz_mut(&mut self) -> Option<&mut QuizSession> {
        self.quiz.as_mut()
    }

    pub fn quiz_panel_open(&self) -> bool {
        self.quiz_panel_open
    }

    pub fn notes(&self) -> &NotesView {
        &self.notes
    }

    pub fn chat(&self) -> &ChatView {
        &self.chat
    }

    pub fn loading(&self) -> LoadingFlags {
        self.loading
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LearnError;
    use crate::types::{Lecture, TranscriptSegment};

    fn catalog() -> LectureCatalog {
        LectureCatalog::from([(
            "L1".to_string(),
            Lecture {
                title: "Intro".to_string(),
            },
        )])
    }

    fn timeline() -> TranscriptPayload {
        TranscriptPayload::Timeline(vec![
            TranscriptSegment {
                start: 0.0,
                end: 5.0,
                text: "Hello".to_string(),
            },
            TranscriptSegment {
                start: 5.0,
                end: 10.0,
                text: "World".to_string(),
            },
        ])
    }

    fn question() -> QuizQuestion {
        QuizQuestion {
            question: "Q1?".to_string(),
            options: vec!["A".to_string(), "B".to_string()],
            correct_index: 1,
            explanation: "because B".to_string(),
        }
    }

    /// Catalog -> select -> resolve -> transcript -> tick, end to end.
    #[test]
    fn test_lecture_load_scenario() {
        let mut session = StudySession::new(QuizMode::Gated);
        session.catalog_loaded(Ok(catalog()));
        assert_eq!(session.catalog()["L1"].title, "Intro");

        session.select_lecture("L1".to_string());
        let request = session.begin_load_lecture().unwrap();
        assert_eq!(request.lecture_id, "L1");
        assert!(session.loading().lecture);

        let next = session
            .video_resolved(request.token, Ok("V1".to_string()))
            .unwrap();
        assert!(!session.loading().lecture);
        assert!(session.loading().transcript);
        assert_eq!(session.video_id(), Some("V1"));
        assert_eq!(next.video_id, "V1");

        session.transcript_loaded(next.token, Ok(timeline()));
        assert!(!session.loading().transcript);

        session.widget_event(WidgetEvent::Playing);
        session.tick(6.0);
        let active = session.active_segment().unwrap();
        assert_eq!(session.transcript().unwrap().segments()[active].text, "World");
    }

    #[test]
    fn test_load_without_selection_is_empty_input() {
        let mut session = StudySession::new(QuizMode::Gated);
        assert!(session.begin_load_lecture().is_none());
        assert!(session.status().is_some());
        assert!(!session.loading().lecture);
    }

    #[test]
    fn test_failed_resolution_clears_loading() {
        let mut session = StudySession::new(QuizMode::Gated);
        session.select_lecture("L1".to_string());
        let request = session.begin_load_lecture().unwrap();
        let follow_up = session.video_resolved(
            request.token,
            Err(LearnError::Network("connection refused".to_string())),
        );
        assert!(follow_up.is_none());
        assert!(!session.loading().lecture);
        assert!(session.status().is_some());
        assert_eq!(session.video_id(), None);
    }

    #[test]
    fn test_transcript_failure_shows_pending_notice() {
        let mut session = StudySession::new(QuizMode::Gated);
        session.select_lecture("L1".to_string());
        let request = session.begin_load_lecture().unwrap();
        let next = session
            .video_resolved(request.token, Ok("V1".to_string()))
            .unwrap();
        session.transcript_loaded(next.token, Err(LearnError::Network("timeout".to_string())));
        assert!(session.transcript().is_none());
        assert_eq!(session.status(), Some(TRANSCRIPT_PENDING_MESSAGE));
        assert!(!session.loading().transcript);
    }

    fn loaded_session() -> StudySession {
        let mut session = StudySession::new(QuizMode::Gated);
        session.select_lecture("L1".to_string());
        let request = session.begin_load_lecture().unwrap();
        let next = session
            .video_resolved(request.token, Ok("V1".to_string()))
            .unwrap();
        session.transcript_loaded(next.token, Ok(timeline()));
        session
    }

    #[test]
    fn test_quiz_loading_flag_clears_on_success_and_failure() {
        let mut session = loaded_session();

        let request = session.begin_quiz().unwrap();
        assert!(session.loading().quiz);
        session.quiz_generated(request.token, Ok(vec![question()]));
        assert!(!session.loading().quiz);
        assert!(session.quiz_panel_open());
        assert_eq!(session.quiz().unwrap().len(), 1);

        let request = session.begin_quiz().unwrap();
        assert!(session.loading().quiz);
        session.quiz_generated(
            request.token,
            Err(LearnError::Network("boom".to_string())),
        );
        assert!(!session.loading().quiz);
        // Prior quiz untouched by the failure.
        assert_eq!(session.quiz().unwrap().len(), 1);
    }

    #[test]
    fn test_quiz_requires_resolved_video() {
        let mut session = StudySession::new(QuizMode::Gated);
        assert!(session.begin_quiz().is_none());
        assert!(!session.loading().quiz);
        assert!(session.status().is_some());
    }

    #[test]
    fn test_quiz_answer_scenario() {
        let mut session = loaded_session();
        let request = session.begin_quiz().unwrap();
        session.quiz_generated(request.token, Ok(vec![question()]));

        let quiz = session.quiz_mut().unwrap();
        quiz.select_option(0);
        quiz.submit();
        assert!(quiz.reveals_current());
        assert!(!quiz.is_correct(0)); // "Wrong"

        let request = session.begin_quiz().unwrap();
        session.quiz_generated(request.token, Ok(vec![question()]));
        let quiz = session.quiz_mut().unwrap();
        quiz.select_option(1);
        quiz.submit();
        assert!(quiz.is_correct(0)); // "Correct"
    }

    #[test]
    fn test_overlapping_requests_later_resolution_wins() {
        let mut session = loaded_session();
        let first = session.begin_quiz().unwrap();
        let second = session.begin_quiz().unwrap();
        assert_eq!(first.token, second.token); // same context

        // Second dispatched resolves first; the first dispatched resolves
        // last and overwrites.
        session.quiz_generated(second.token, Ok(vec![question(), question()]));
        session.quiz_generated(first.token, Ok(vec![question()]));
        assert_eq!(session.quiz().unwrap().len(), 1);
        assert!(!session.loading().quiz);
    }

    #[test]
    fn test_stale_results_discarded_after_lecture_change() {
        let mut session = loaded_session();
        let quiz_request = session.begin_quiz().unwrap();
        let notes_request = session.begin_notes(NotesMode::Watched).unwrap();

        // The lecture changes while both requests are in flight.
        session.select_lecture("L1".to_string());
        session.begin_load_lecture().unwrap();

        session.quiz_generated(quiz_request.token, Ok(vec![question()]));
        session.notes_ready(notes_request.token, Ok("stale notes".to_string()));
        assert!(session.quiz().is_none());
        assert_eq!(session.notes(), &NotesView::Empty);
    }

    #[test]
    fn test_notes_failure_sets_fixed_marker() {
        let mut session = loaded_session();
        let request = session.begin_notes(NotesMode::Full).unwrap();
        assert!(session.loading().notes);
        assert_eq!(request.mode, NotesMode::Full);

        session.notes_ready(
            request.token,
            Err(LearnError::MalformedResponse("no notes".to_string())),
        );
        assert_eq!(session.notes(), &NotesView::Failed);
        assert!(!session.loading().notes);
    }

    #[test]
    fn test_chat_requires_question_and_video() {
        let mut session = StudySession::new(QuizMode::Gated);
        assert!(session.begin_chat("   ").is_none());
        assert!(session.begin_chat("What is X?").is_none()); // no video yet

        let mut session = loaded_session();
        let request = session.begin_chat(" What is X? ").unwrap();
        assert_eq!(request.question, "What is X?");
        assert!(session.loading().chat);

        session.chat_answered(request.token, Ok("X is Y".to_string()));
        assert_eq!(session.chat(), &ChatView::Answered("X is Y".to_string()));
        assert!(!session.loading().chat);

        let request = session.begin_chat("Another?").unwrap();
        session.chat_answered(request.token, Err(LearnError::Network("down".to_string())));
        assert_eq!(session.chat(), &ChatView::Failed);
        assert!(!session.loading().chat);
    }

    #[test]
    fn test_lecture_reload_resets_session_state() {
        let mut session = loaded_session();
        let request = session.begin_quiz().unwrap();
        session.quiz_generated(request.token, Ok(vec![question()]));
        session.widget_event(WidgetEvent::Playing);
        session.tick(42.0);
        assert_eq!(session.clock.watched_seconds(), 42);

        session.begin_load_lecture().unwrap();
        assert!(session.quiz().is_none());
        assert!(!session.quiz_panel_open());
        assert!(session.transcript().is_none());
        assert_eq!(session.clock.watched_seconds(), 0);
        assert_eq!(session.notes(), &NotesView::Empty);
        assert_eq!(session.chat(), &ChatView::Empty);
    }

    #[test]
    fn test_tick_reports_changes_only_when_auto_scroll_enabled() {
        let mut session = loaded_session();
        assert_eq!(session.tick(1.0), Some(0));
        assert_eq!(session.tick(2.0), None); // same segment
        assert_eq!(session.tick(6.0), Some(1));

        session.toggle_auto_scroll();
        assert_eq!(session.tick(1.0), None);
        // Highlight still tracks even though scrolling does not.
        assert_eq!(session.active_segment(), Some(0));
    }

    #[test]
    fn test_segment_click_returns_seek_target() {
        let mut session = loaded_session();
        assert_eq!(session.segment_clicked(1), Some(5.0));
        assert_eq!(session.active_segment(), Some(1));
        assert_eq!(session.segment_clicked(7), None);
    }
}
