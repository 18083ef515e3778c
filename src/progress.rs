use crate::fetch::PageReceived;
use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const TICKS_BRAILLE: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";
const TICKS_ASCII: &str = "|/-\\ ";
const TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Download,
    Aggregate,
}

impl Stage {
    const COUNT: u8 = 2;

    const fn number(self) -> u8 {
        match self {
            Self::Download => 1,
            Self::Aggregate => 2,
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Download => "Downloading",
            Self::Aggregate => "Aggregating",
        }
    }
}

pub struct Progress {
    enabled: bool,
    style: ProgressStyle,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        let ticks = if is_dumb_term() {
            TICKS_ASCII
        } else {
            TICKS_BRAILLE
        };
        let style = ProgressStyle::with_template("{spinner:.cyan.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(ticks);
        Self { enabled, style }
    }

    pub fn start(&self, stage: Stage, subject: impl Into<String>) -> StageSpinner {
        let bar = if self.enabled {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr_with_hz(15))
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(self.style.clone());
        let spinner = StageSpinner {
            bar,
            stage,
            subject: subject.into(),
        };
        spinner.bar.set_message(spinner.message(None));
        spinner.bar.enable_steady_tick(TICK_INTERVAL);
        spinner
    }
}

pub struct StageSpinner {
    bar: ProgressBar,
    stage: Stage,
    subject: String,
}

impl StageSpinner {
    pub fn page_received(&self, received: PageReceived) {
        self.bar.set_message(self.message(Some(&page_detail(received))));
    }

    pub fn finish<T>(self, result: &Result<T>, detail: impl FnOnce(&T) -> String) {
        let outcome = self.outcome_message(result, detail);
        self.bar.finish_with_message(outcome);
    }

    fn outcome_message<T>(
        &self,
        result: &Result<T>,
        detail: impl FnOnce(&T) -> String,
    ) -> String {
        match result {
            Ok(value) => format!(
                "{} {}",
                self.message(Some(&detail(value))),
                "done".bright_green().bold()
            ),
            Err(_) => format!("{} {}", self.message(None), "failed".bright_red().bold()),
        }
    }

    fn message(&self, detail: Option<&str>) -> String {
        stage_message(self.stage, &self.subject, detail)
    }
}

fn is_dumb_term() -> bool {
    std::env::var("TERM").is_ok_and(|term| term.eq_ignore_ascii_case("dumb"))
}

fn page_detail(received: PageReceived) -> String {
    format!("page {}, {} records", received.page, received.total)
}

fn stage_message(stage: Stage, subject: &str, detail: Option<&str>) -> String {
    let counter = format!("[{}/{}]", stage.number(), Stage::COUNT);
    let heading = format!(
        "{} {} {}",
        counter.bright_yellow().bold(),
        stage.verb().bright_cyan().bold(),
        subject.bright_white().bold()
    );
    match detail {
        Some(detail) => format!("{heading} ({})", detail.bright_black()),
        None => heading,
    }
}
