use std::time::Duration;

use clap::{Parser, ValueEnum};
use lectern_core::QuizMode;
use tracing_subscriber::EnvFilter;

use crate::app::{App, Config};

mod app;
mod player;
mod view;

/// CLI wrapper for QuizMode (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliQuizMode {
    #[default]
    Gated,
    Free,
}

impl From<CliQuizMode> for QuizMode {
    fn from(cli: CliQuizMode) -> Self {
        match cli {
            CliQuizMode::Gated => QuizMode::Gated,
            CliQuizMode::Free => QuizMode::FreeNavigation,
        }
    }
}

#[derive(Parser)]
#[command(name = "lectern")]
#[command(
    about = "Learning companion that syncs lecture playback with transcripts and AI study tools"
)]
struct Cli {
    /// Base URL of the learning backend API
    #[arg(long, default_value = "http://127.0.0.1:8000/api")]
    api_base: String,

    /// Playback position sampling interval in milliseconds
    #[arg(long, default_value_t = 1200)]
    poll_interval_ms: u64,

    /// Quiz interaction mode
    #[arg(long, value_enum, default_value = "gated")]
    quiz_mode: CliQuizMode,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!(api_base = %cli.api_base, "starting lectern");

    let config = Config {
        api_base: cli.api_base,
        poll_interval: Duration::from_millis(cli.poll_interval_ms.max(50)),
        quiz_mode: cli.quiz_mode.into(),
    };

    iced::application("Lectern", App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .window_size(iced::Size::new(1280.0, 800.0))
        .run_with(move || App::new(config))?;
    Ok(())
}
