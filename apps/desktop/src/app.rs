use std::time::{Duration, Instant};

use iced::widget::scrollable::{self, RelativeOffset};
use iced::{Element, Event, Point, Size, Subscription, Task, Theme};
use lectern_core::{
    ApiClient, LearnError, LectureCatalog, NotesMode, PlaybackWidget, QuizMode, QuizQuestion,
    StudySession, TranscriptPayload, WidgetEvent,
};
use uuid::Uuid;

use crate::player::SimulatedPlayer;

/// Size of the floating quiz panel when not maximized.
pub const PANEL_SIZE: (f32, f32) = (380.0, 500.0);

/// Clip length the simulated player starts with, until a timed transcript
/// reveals the real duration.
const DEFAULT_CLIP_SECONDS: f64 = 600.0;

pub struct Config {
    pub api_base: String,
    pub poll_interval: Duration,
    pub quiz_mode: QuizMode,
}

/// UI messages: user intents plus tagged results of network tasks.
#[derive(Debug, Clone)]
pub enum Message {
    CatalogLoaded(Result<LectureCatalog, LearnError>),
    LectureSelected(String),
    LoadLecture,
    VideoResolved(Uuid, Result<String, LearnError>),
    TranscriptLoaded(Uuid, Result<TranscriptPayload, LearnError>),

    PlayPressed,
    PausePressed,
    PlayerScrubbed(f64),
    Tick,
    SegmentClicked(usize),
    AutoScrollToggled,

    GenerateQuiz,
    QuizGenerated(Uuid, Result<Vec<QuizQuestion>, LearnError>),
    OptionSelected(usize),
    SubmitAnswer,
    NextQuestion,
    PrevQuestion,
    RevealAnswers,
    CloseQuizPanel,
    ToggleMaximize,

    HandleHovered(Point),
    DragStarted,
    DragMoved(Point),
    DragEnded,
    ViewportResized(Size),

    NotesModeSelected(NotesMode),
    GenerateNotes,
    NotesReady(Uuid, Result<String, LearnError>),

    ChatInputChanged(String),
    AskChatbot,
    ChatAnswered(Uuid, Result<String, LearnError>),
}

pub struct App {
    api: ApiClient,
    pub session: StudySession,
    pub player: Option<SimulatedPlayer>,
    pub viewport: Size,
    pub chat_input: String,
    pub notes_mode: NotesMode,
    poll_interval: Duration,
    // Last pointer position inside the drag handle, panel-relative.
    handle_grab: (f32, f32),
}

pub fn transcript_scroll_id() -> scrollable::Id {
    scrollable::Id::new("transcript")
}

impl App {
    pub fn new(config: Config) -> (Self, Task<Message>) {
        let api = ApiClient::new(config.api_base);
        let fetch_catalog = {
            let api = api.clone();
            Task::perform(async move { api.lectures().await }, Message::CatalogLoaded)
        };
        (
            Self {
                api,
                session: StudySession::new(config.quiz_mode),
                player: None,
                viewport: Size::new(1280.0, 800.0),
                chat_input: String::new(),
                notes_mode: NotesMode::Watched,
                poll_interval: config.poll_interval,
                handle_grab: (0.0, 0.0),
            },
            fetch_catalog,
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CatalogLoaded(result) => {
                self.session.catalog_loaded(result);
            }
            Message::LectureSelected(lecture_id) => {
                self.session.select_lecture(lecture_id);
            }
            Message::LoadLecture => {
                if let Some(request) = self.session.begin_load_lecture() {
                    self.player = None;
                    let api = self.api.clone();
                    let token = request.token;
                    return Task::perform(
                        async move { api.submit_video(&request.lecture_id).await },
                        move |result| Message::VideoResolved(token, result),
                    );
                }
            }
            Message::VideoResolved(token, result) => {
                if let Some(next) = self.session.video_resolved(token, result) {
                    self.player = Some(SimulatedPlayer::new(DEFAULT_CLIP_SECONDS));
                    let api = self.api.clone();
                    let token = next.token;
                    return Task::perform(
                        async move { api.transcript(&next.video_id).await },
                        move |result| Message::TranscriptLoaded(token, result),
                    );
                }
            }
            Message::TranscriptLoaded(token, result) => {
                self.session.transcript_loaded(token, result);
                if let Some(index) = self.session.transcript() {
                    if !index.is_synthetic() {
                        if let (Some(duration), Some(player)) =
                            (index.duration(), self.player.as_mut())
                        {
                            player.set_duration(duration);
                        }
                    }
                }
            }

            Message::PlayPressed => {
                if let Some(player) = self.player.as_mut() {
                    player.play();
                    self.session.widget_event(WidgetEvent::Playing);
                }
            }
            Message::PausePressed => {
                if let Some(player) = self.player.as_mut() {
                    player.pause();
                    self.session.widget_event(WidgetEvent::Paused);
                }
            }
            Message::PlayerScrubbed(position) => {
                if let Some(player) = self.player.as_mut() {
                    player.seek(position);
                    let position = player.position();
                    if self.session.tick(position).is_some() {
                        return self.snap_transcript();
                    }
                }
            }
            Message::Tick => {
                if let Some(player) = self.player.as_mut() {
                    if let Some(event) = player.advance(Instant::now()) {
                        self.session.widget_event(event);
                    }
                    let position = player.position();
                    if self.session.tick(position).is_some() {
                        return self.snap_transcript();
                    }
                }
            }
            Message::SegmentClicked(index) => {
                if let Some(target) = self.session.segment_clicked(index) {
                    if let Some(player) = self.player.as_mut() {
                        player.seek(target);
                        player.play();
                        self.session.widget_event(WidgetEvent::Playing);
                    }
                }
            }
            Message::AutoScrollToggled => {
                self.session.toggle_auto_scroll();
            }

            Message::GenerateQuiz => {
                if let Some(request) = self.session.begin_quiz() {
                    let api = self.api.clone();
                    let token = request.token;
                    return Task::perform(
                        async move {
                            api.generate_quiz(&request.video_id, request.watched_seconds)
                                .await
                        },
                        move |result| Message::QuizGenerated(token, result),
                    );
                }
            }
            Message::QuizGenerated(token, result) => {
                self.session.quiz_generated(token, result);
            }
            Message::OptionSelected(option) => {
                if let Some(quiz) = self.session.quiz_mut() {
                    quiz.select_option(option);
                }
            }
            Message::SubmitAnswer => {
                if let Some(quiz) = self.session.quiz_mut() {
                    quiz.submit();
                }
            }
            Message::NextQuestion => {
                if let Some(quiz) = self.session.quiz_mut() {
                    quiz.next();
                }
            }
            Message::PrevQuestion => {
                if let Some(quiz) = self.session.quiz_mut() {
                    quiz.prev();
                }
            }
            Message::RevealAnswers => {
                if let Some(quiz) = self.session.quiz_mut() {
                    quiz.reveal();
                }
            }
            Message::CloseQuizPanel => {
                self.session.close_quiz_panel();
            }
            Message::ToggleMaximize => {
                self.session.panel.toggle_maximized();
            }

            Message::HandleHovered(point) => {
                self.handle_grab = (point.x, point.y);
            }
            Message::DragStarted => {
                self.session.panel.begin_drag(self.handle_grab);
            }
            Message::DragMoved(cursor) => {
                self.session.panel.drag_to(
                    (cursor.x, cursor.y),
                    (self.viewport.width, self.viewport.height),
                    self.panel_size(),
                );
            }
            Message::DragEnded => {
                self.session.panel.end_drag();
            }
            Message::ViewportResized(size) => {
                self.viewport = size;
            }

            Message::NotesModeSelected(mode) => {
                self.notes_mode = mode;
            }
            Message::GenerateNotes => {
                if let Some(request) = self.session.begin_notes(self.notes_mode) {
                    let api = self.api.clone();
                    let token = request.token;
                    return Task::perform(
                        async move {
                            api.generate_notes(
                                &request.video_id,
                                request.watched_seconds,
                                request.mode,
                            )
                            .await
                        },
                        move |result| Message::NotesReady(token, result),
                    );
                }
            }
            Message::NotesReady(token, result) => {
                self.session.notes_ready(token, result);
            }

            Message::ChatInputChanged(input) => {
                self.chat_input = input;
            }
            Message::AskChatbot => {
                let question = self.chat_input.clone();
                if let Some(request) = self.session.begin_chat(&question) {
                    self.chat_input.clear();
                    let api = self.api.clone();
                    let token = request.token;
                    return Task::perform(
                        async move { api.ask_chatbot(&request.video_id, &request.question).await },
                        move |result| Message::ChatAnswered(token, result),
                    );
                }
            }
            Message::ChatAnswered(token, result) => {
                self.session.chat_answered(token, result);
            }
        }

        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        crate::view::view(self)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![
            iced::window::resize_events().map(|(_id, size)| Message::ViewportResized(size)),
        ];
        if self.player.is_some() && self.session.clock.is_polling() {
            subscriptions.push(iced::time::every(self.poll_interval).map(|_| Message::Tick));
        }
        // Global pointer listener exists only for the duration of a drag.
        if self.session.panel.dragging() {
            subscriptions.push(iced::event::listen_with(drag_events));
        }
        Subscription::batch(subscriptions)
    }

    pub fn theme(&self) -> Theme {
        Theme::TokyoNight
    }

    pub fn panel_size(&self) -> (f32, f32) {
        if self.session.panel.is_maximized() {
            (self.viewport.width, self.viewport.height)
        } else {
            PANEL_SIZE
        }
    }

    /// Keeps the active transcript row in view. Skips silently when there
    /// is nothing to scroll.
    fn snap_transcript(&self) -> Task<Message> {
        let Some(index) = self.session.transcript() else {
            return Task::none();
        };
        let Some(active) = self.session.active_segment() else {
            return Task::none();
        };
        if index.len() < 2 {
            return Task::none();
        }
        let fraction = active as f32 / (index.len() - 1) as f32;
        scrollable::snap_to(
            transcript_scroll_id(),
            RelativeOffset {
                x: 0.0,
                y: fraction.clamp(0.0, 1.0),
            },
        )
    }
}

fn drag_events(
    event: Event,
    _status: iced::event::Status,
    _window: iced::window::Id,
) -> Option<Message> {
    match event {
        Event::Mouse(iced::mouse::Event::CursorMoved { position }) => {
            Some(Message::DragMoved(position))
        }
        Event::Mouse(iced::mouse::Event::ButtonReleased(iced::mouse::Button::Left)) => {
            Some(Message::DragEnded)
        }
        _ => None,
    }
}
