//! Human-readable labels for rendered records.
//!
//! State tags carry no text of their own; every string a reader sees comes
//! from a [`Labels`] table picked by [`Locale`].

use std::str::FromStr;

use dining_types::{PhilosopherState, TerminationReason};

use crate::error::ReportError;

/// Language of rendered records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    /// English labels.
    #[default]
    English,
    /// Vietnamese labels.
    Vietnamese,
}

impl FromStr for Locale {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "vi" | "vietnamese" => Ok(Self::Vietnamese),
            other => Err(ReportError::UnknownLocale {
                locale: other.to_owned(),
            }),
        }
    }
}

impl Locale {
    /// The label table for this locale.
    pub const fn labels(self) -> &'static Labels {
        match self {
            Self::English => Labels::english(),
            Self::Vietnamese => Labels::vietnamese(),
        }
    }
}

/// Every fixed string used by the renderer.
#[derive(Debug, PartialEq, Eq)]
pub struct Labels {
    /// Title line at the top of the log file.
    pub title: &'static str,
    /// Start line, before the agent count.
    pub start_prefix: &'static str,
    /// Start line, between the agent count and the timestamp.
    pub start_infix: &'static str,
    /// Status block heading, before the elapsed seconds.
    pub status_prefix: &'static str,
    /// Word for one philosopher.
    pub philosopher: &'static str,
    /// `Thinking` label.
    pub thinking: &'static str,
    /// `Hungry` label.
    pub hungry: &'static str,
    /// `Eating` label.
    pub eating: &'static str,
    /// Prefix of the held stick list.
    pub sticks: &'static str,
    /// Shown when nothing is held.
    pub no_sticks: &'static str,
    /// Completion line, before the duration.
    pub completed_prefix: &'static str,
    /// Completion line, after the duration.
    pub completed_suffix: &'static str,
    /// Line written on interrupt.
    pub interrupted: &'static str,
    /// End-time line prefix, written after a completed run.
    pub ended_at: &'static str,
}

impl Labels {
    /// The English table.
    pub const fn english() -> &'static Self {
        &ENGLISH
    }

    /// The Vietnamese table.
    pub const fn vietnamese() -> &'static Self {
        &VIETNAMESE
    }

    /// Label for a philosopher state.
    pub const fn state(&self, state: PhilosopherState) -> &'static str {
        match state {
            PhilosopherState::Thinking => self.thinking,
            PhilosopherState::Hungry => self.hungry,
            PhilosopherState::Eating => self.eating,
        }
    }

    /// Whether the termination block carries the duration and end-time
    /// lines.
    pub const fn reports_duration(reason: TerminationReason) -> bool {
        matches!(reason, TerminationReason::Completed)
    }
}

/// English label table.
pub static ENGLISH: Labels = Labels {
    title: "DINING PHILOSOPHERS SIMULATION",
    start_prefix: "Starting simulation with",
    start_infix: "philosophers at",
    status_prefix: "Status at",
    philosopher: "Philosopher",
    thinking: "thinking",
    hungry: "hungry",
    eating: "eating",
    sticks: "sticks",
    no_sticks: "no sticks",
    completed_prefix: "Simulation finished after",
    completed_suffix: "seconds",
    interrupted: "Simulation stopped by user",
    ended_at: "End time:",
};

/// Vietnamese label table.
pub static VIETNAMESE: Labels = Labels {
    title: "MÔ PHỎNG BÀI TOÁN NHỮNG TRIẾT HỌC GIA ĂN TỐI",
    start_prefix: "Bắt đầu mô phỏng với",
    start_infix: "triết học gia vào",
    status_prefix: "Trạng thái tại thời điểm",
    philosopher: "Triết học gia",
    thinking: "đang suy nghĩ",
    hungry: "đang đói",
    eating: "đang ăn",
    sticks: "đũa",
    no_sticks: "không có đũa",
    completed_prefix: "Kết thúc mô phỏng sau",
    completed_suffix: "giây",
    interrupted: "Mô phỏng đã bị dừng bởi người dùng",
    ended_at: "Thời gian kết thúc:",
};
