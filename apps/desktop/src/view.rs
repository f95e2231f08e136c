use std::fmt;

use iced::widget::{
    button, checkbox, column, container, horizontal_rule, horizontal_space, mouse_area, pick_list,
    radio, row, scrollable, slider, stack, text, text_input,
};
use iced::{Center, Element, Fill, Padding};
use lectern_core::{
    CHAT_FAILED_MESSAGE, ChatView, NOTES_FAILED_MESSAGE, NotesView, QuizMode, QuizSession,
    format_segment, format_timestamp,
};

use crate::app::{App, Message, transcript_scroll_id};

/// One entry in the lecture picker.
#[derive(Debug, Clone, PartialEq)]
struct LectureChoice {
    id: String,
    title: String,
}

impl fmt::Display for LectureChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

pub fn view(app: &App) -> Element<'_, Message> {
    let base = container(
        column![header(), controls(app), main_grid(app)]
            .spacing(16)
            .padding(20),
    )
    .width(Fill)
    .height(Fill);

    if app.session.quiz_panel_open() && app.session.quiz().is_some() {
        stack![base, quiz_overlay(app)].into()
    } else {
        base.into()
    }
}

fn header<'a>() -> Element<'a, Message> {
    column![
        text("Adaptive Learning Path").size(26),
        text("Learn smarter with attention-aware quizzes")
            .size(14)
            .style(text::secondary),
    ]
    .spacing(2)
    .into()
}

fn controls(app: &App) -> Element<'_, Message> {
    let choices: Vec<LectureChoice> = app
        .session
        .catalog()
        .iter()
        .map(|(id, lecture)| LectureChoice {
            id: id.clone(),
            title: lecture.title.clone(),
        })
        .collect();
    let selected = app
        .session
        .selected_lecture()
        .and_then(|id| choices.iter().find(|choice| choice.id == id).cloned());

    let loading = app.session.loading();
    let load_label = if loading.lecture || loading.transcript {
        "Loading..."
    } else {
        "Load Lecture"
    };

    let mut bar = row![
        pick_list(choices, selected, |choice| Message::LectureSelected(
            choice.id
        ))
        .placeholder("Select Lecture"),
        button(load_label)
            .style(button::primary)
            .on_press_maybe((!loading.lecture).then_some(Message::LoadLecture)),
    ]
    .spacing(10)
    .align_y(Center);

    if let Some(status) = app.session.status() {
        bar = bar.push(text(status).size(13).style(text::danger));
    }
    bar.into()
}

fn main_grid(app: &App) -> Element<'_, Message> {
    row![
        column![player_card(app), transcript_box(app)]
            .spacing(12)
            .width(Fill),
        side_panel(app),
    ]
    .spacing(16)
    .into()
}

fn player_card(app: &App) -> Element<'_, Message> {
    let Some(player) = &app.player else {
        return container(
            text("Select a lecture and press Load to start watching")
                .size(14)
                .style(text::secondary),
        )
        .padding(16)
        .width(Fill)
        .style(container::rounded_box)
        .into();
    };

    let toggle = if player.is_playing() {
        button("Pause").on_press(Message::PausePressed)
    } else {
        button("Play").on_press(Message::PlayPressed)
    };

    container(
        column![
            row![
                toggle,
                slider(
                    0.0..=player.duration(),
                    player.position(),
                    Message::PlayerScrubbed
                )
                .step(1.0),
                text(format!(
                    "{} / {}",
                    format_timestamp(player.position()),
                    format_timestamp(player.duration())
                ))
                .size(13),
            ]
            .spacing(10)
            .align_y(Center),
            text(format!(
                "Watched: {}s",
                app.session.clock.watched_seconds()
            ))
            .size(13)
            .style(text::secondary),
        ]
        .spacing(6),
    )
    .padding(12)
    .width(Fill)
    .style(container::rounded_box)
    .into()
}

fn transcript_box(app: &App) -> Element<'_, Message> {
    let synthetic = app
        .session
        .transcript()
        .is_some_and(|index| index.is_synthetic());

    let header = row![text("Video Transcript").size(16)]
        .push_maybe(synthetic.then(|| {
            // Synthesized 5-second blocks, not real timing.
            text("approximate timing").size(12).style(text::danger)
        }))
        .push(horizontal_space())
        .push(
            checkbox("Auto Scroll", app.session.auto_scroll())
                .on_toggle(|_| Message::AutoScrollToggled),
        )
        .spacing(8)
        .align_y(Center);

    let body: Element<'_, Message> = match app.session.transcript() {
        Some(index) => {
            let rows = index.segments().iter().enumerate().map(|(i, segment)| {
                let is_active = app.session.active_segment() == Some(i);
                button(text(format_segment(segment)).size(13))
                    .style(if is_active {
                        button::primary
                    } else {
                        button::text
                    })
                    .width(Fill)
                    .on_press(Message::SegmentClicked(i))
                    .into()
            });
            scrollable(column(rows).spacing(2))
                .id(transcript_scroll_id())
                .height(280.0)
                .into()
        }
        None => text(
            app.session
                .status()
                .unwrap_or("Transcript will appear here..."),
        )
        .size(13)
        .style(text::secondary)
        .into(),
    };

    container(column![header, body].spacing(8))
        .padding(12)
        .width(Fill)
        .style(container::rounded_box)
        .into()
}

fn side_panel(app: &App) -> Element<'_, Message> {
    let loading = app.session.loading();
    let watched = app.session.clock.watched_seconds();

    let quiz_button = button(if loading.quiz {
        "Generating..."
    } else {
        "Generate Smart Quiz"
    })
    .style(button::secondary)
    .on_press_maybe((!loading.quiz).then_some(Message::GenerateQuiz));

    container(
        column![
            text("AI Quiz").size(16),
            quiz_button,
            text(format!("Used duration: {watched}s"))
                .size(12)
                .style(text::secondary),
            horizontal_rule(1),
            notes_card(app),
            horizontal_rule(1),
            chat_card(app),
        ]
        .spacing(10),
    )
    .padding(12)
    .width(340.0)
    .style(container::rounded_box)
    .into()
}

fn notes_card(app: &App) -> Element<'_, Message> {
    let loading = app.session.loading();

    let controls = row![
        pick_list(
            lectern_core::NotesMode::ALL,
            Some(app.notes_mode),
            Message::NotesModeSelected
        ),
        button(if loading.notes {
            "Generating..."
        } else {
            "Generate Notes"
        })
        .on_press_maybe((!loading.notes).then_some(Message::GenerateNotes)),
    ]
    .spacing(8)
    .align_y(Center);

    let body: Element<'_, Message> = match app.session.notes() {
        NotesView::Empty => text("Notes for the lecture will appear here.")
            .size(13)
            .style(text::secondary)
            .into(),
        NotesView::Ready(notes) => scrollable(text(notes).size(13)).height(180.0).into(),
        NotesView::Failed => text(NOTES_FAILED_MESSAGE).size(13).style(text::danger).into(),
    };

    column![text("AI Notes").size(16), controls, body]
        .spacing(8)
        .into()
}

fn chat_card(app: &App) -> Element<'_, Message> {
    let loading = app.session.loading();

    let ask = row![
        text_input("Ask about the lecture...", &app.chat_input)
            .on_input(Message::ChatInputChanged)
            .on_submit(Message::AskChatbot),
        button(if loading.chat { "..." } else { "Ask" })
            .on_press_maybe((!loading.chat).then_some(Message::AskChatbot)),
    ]
    .spacing(8)
    .align_y(Center);

    let body: Element<'_, Message> = match app.session.chat() {
        ChatView::Empty => text("Answers show up here.")
            .size(13)
            .style(text::secondary)
            .into(),
        ChatView::Answered(answer) => scrollable(text(answer).size(13)).height(120.0).into(),
        ChatView::Failed => text(CHAT_FAILED_MESSAGE).size(13).style(text::danger).into(),
    };

    column![text("Ask the Lecture").size(16), ask, body]
        .spacing(8)
        .into()
}

fn quiz_overlay(app: &App) -> Element<'_, Message> {
    let Some(quiz) = app.session.quiz() else {
        return column![].into();
    };

    let size = app.panel_size();
    let (x, y) = app
        .session
        .panel
        .position((app.viewport.width, app.viewport.height), size);

    let maximize_label = if app.session.panel.is_maximized() {
        "Restore"
    } else {
        "Maximize"
    };
    let handle = mouse_area(
        container(
            row![
                text("AI Quiz").size(15),
                horizontal_space(),
                button(text(maximize_label).size(12))
                    .style(button::text)
                    .on_press(Message::ToggleMaximize),
                button(text("Close").size(12))
                    .style(button::text)
                    .on_press(Message::CloseQuizPanel),
            ]
            .spacing(6)
            .align_y(Center),
        )
        .padding(8),
    )
    .interaction(iced::mouse::Interaction::Grab)
    .on_move(Message::HandleHovered)
    .on_press(Message::DragStarted);

    let panel = container(column![handle, quiz_body(quiz)].spacing(8))
        .width(size.0)
        .height(size.1)
        .padding(10)
        .style(container::bordered_box);

    container(panel)
        .width(Fill)
        .height(Fill)
        .padding(Padding {
            top: y,
            right: 0.0,
            bottom: 0.0,
            left: x,
        })
        .into()
}

fn quiz_body(quiz: &QuizSession) -> Element<'_, Message> {
    let index = quiz.current_index();
    let question = quiz.current_question();
    let selected = quiz.answer_for(index);

    let options = column(
        question
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                radio(option.as_str(), i, selected, Message::OptionSelected)
                    .size(16)
                    .text_size(14)
                    .into()
            }),
    )
    .spacing(6);

    let mut content = column![
        text(format!("Question {} / {}", index + 1, quiz.len()))
            .size(13)
            .style(text::secondary),
        text(format!("{}. {}", index + 1, question.question)).size(15),
        options,
    ]
    .spacing(10);

    if quiz.reveals_current() {
        let correct = quiz.is_correct(index);
        content = content.push(
            text(if correct { "Correct" } else { "Wrong" })
                .size(14)
                .style(if correct { text::success } else { text::danger }),
        );
        content = content.push(
            text(format!(
                "Correct: {}",
                question.options[question.correct_index]
            ))
            .size(13),
        );
        if !question.explanation.is_empty() {
            content = content.push(
                text(question.explanation.as_str())
                    .size(13)
                    .style(text::secondary),
            );
        }
    }

    let nav: Element<'_, Message> = match quiz.mode() {
        QuizMode::Gated => row![
            button("Submit")
                .style(button::primary)
                .on_press_maybe(
                    (selected.is_some() && !quiz.is_submitted()).then_some(Message::SubmitAnswer)
                ),
            horizontal_space(),
            button("Next").on_press_maybe(
                (quiz.is_submitted() && index + 1 < quiz.len()).then_some(Message::NextQuestion)
            ),
        ]
        .align_y(Center)
        .into(),
        QuizMode::FreeNavigation => {
            let forward: Element<'_, Message> = if index + 1 < quiz.len() {
                button("Next")
                    .style(button::primary)
                    .on_press(Message::NextQuestion)
                    .into()
            } else {
                button("Finish")
                    .style(button::primary)
                    .on_press_maybe(quiz.can_reveal().then_some(Message::RevealAnswers))
                    .into()
            };
            row![
                button("Previous").on_press_maybe((index > 0).then_some(Message::PrevQuestion)),
                horizontal_space(),
            ]
            .push(forward)
            .align_y(Center)
            .into()
        }
    };
    content = content.push(nav);

    if quiz.is_complete() {
        let (correct, total) = quiz.score();
        content = content.push(
            text(format!("Score: {correct} / {total}"))
                .size(15)
                .style(text::success),
        );
    }

    scrollable(content).into()
}
