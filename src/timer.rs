use chrono::{Duration as ChronoDuration, NaiveDate};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::constants::DURATION_LIMITS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Running,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Focus,
    Break,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    Completed,
    Abandoned,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Started { kind: SessionKind },
    Ticked { remaining_seconds: u64 },
    Completed { kind: SessionKind },
    Paused,
    PausedByFocusLoss,
    Reset,
    DurationChanged { minutes: u64 },
}

pub struct FocusTimer {
    pub remaining_seconds: u64,
    pub duration_seconds: u64,
    pub configured_minutes: u64,
    pub phase: TimerPhase,
    pub kind: SessionKind,
    pub task_label: String,
    pub notes: String,
}

impl FocusTimer {
    pub fn new() -> Self {
        Self {
            remaining_seconds: 0,
            duration_seconds: 0,
            configured_minutes: 0,
            phase: TimerPhase::Idle,
            kind: SessionKind::Focus,
            task_label: String::new(),
            notes: String::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, TimerPhase::Running)
    }

    pub fn apply_loaded_state(
        &mut self,
        remaining_seconds: u64,
        duration_minutes: u64,
        task: String,
        notes: String,
    ) {
        self.configured_minutes =
            duration_minutes.clamp(DURATION_LIMITS.min_minutes, DURATION_LIMITS.max_minutes);
        self.duration_seconds = self.configured_minutes * 60;
        self.remaining_seconds = remaining_seconds;
        self.task_label = task;
        self.notes = notes;
        self.phase = TimerPhase::Idle;
        self.kind = SessionKind::Focus;
    }

    pub fn start(&mut self) -> Option<TimerEvent> {
        if self.is_running() {
            return None;
        }

        if self.duration_seconds == 0 {
            self.duration_seconds = match self.configured_minutes * 60 {
                0 => DURATION_LIMITS.fallback_seconds,
                seconds => seconds,
            };
        }

        self.phase = TimerPhase::Running;
        Some(TimerEvent::Started { kind: self.kind })
    }

    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.is_running() {
            return None;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.phase = TimerPhase::Complete;
            return Some(TimerEvent::Completed { kind: self.kind });
        }

        Some(TimerEvent::Ticked {
            remaining_seconds: self.remaining_seconds,
        })
    }

    pub fn pause(&mut self) -> Option<TimerEvent> {
        if !self.is_running() {
            return None;
        }
        self.phase = TimerPhase::Idle;
        Some(TimerEvent::Paused)
    }

    pub fn on_focus_lost(&mut self) -> Option<TimerEvent> {
        if !self.is_running() {
            return None;
        }
        self.phase = TimerPhase::Idle;
        Some(TimerEvent::PausedByFocusLoss)
    }

    pub fn reset(&mut self) -> Option<TimerEvent> {
        self.duration_seconds = match self.configured_minutes * 60 {
            0 => DURATION_LIMITS.fallback_seconds,
            seconds => seconds,
        };
        self.remaining_seconds = self.duration_seconds;
        self.phase = TimerPhase::Idle;
        self.kind = SessionKind::Focus;
        Some(TimerEvent::Reset)
    }

    pub fn set_duration_minutes(&mut self, minutes: u64) -> Option<TimerEvent> {
        let minutes = minutes.clamp(DURATION_LIMITS.min_minutes, DURATION_LIMITS.max_minutes);
        self.configured_minutes = minutes;

        // while a session runs the new value only arms the next one
        if self.is_running() {
            return None;
        }

        self.duration_seconds = minutes * 60;
        self.remaining_seconds = self.duration_seconds;
        self.phase = TimerPhase::Idle;
        Some(TimerEvent::DurationChanged { minutes })
    }

    pub fn begin_break(&mut self, minutes: u64) -> Option<TimerEvent> {
        if self.is_running() {
            return None;
        }

        let minutes = minutes.clamp(DURATION_LIMITS.min_minutes, DURATION_LIMITS.max_minutes);
        self.kind = SessionKind::Break;
        self.duration_seconds = minutes * 60;
        self.remaining_seconds = self.duration_seconds;
        self.phase = TimerPhase::Running;
        Some(TimerEvent::Started {
            kind: SessionKind::Break,
        })
    }

    pub fn progress(&self) -> f64 {
        if self.duration_seconds == 0 {
            return 0.0;
        }
        let progress = 1.0 - self.remaining_seconds as f64 / self.duration_seconds as f64;
        progress.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub date: String,
    pub end_time: String,
    pub kind: SessionKind,
    pub task: String,
    pub planned_minutes: u64,
    pub elapsed_seconds: u64,
    pub outcome: SessionOutcome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryPeriod {
    Today,
    Week,
    Month,
}

pub struct HistorySummary {
    pub range_label: String,
    pub entries: Vec<HistorySummaryEntry>,
    pub total_seconds: u64,
    pub total_sessions: usize,
}

pub struct HistorySummaryEntry {
    pub task: String,
    pub sessions: usize,
    pub elapsed_seconds: u64,
}

pub fn build_history_report(
    entries: &[HistoryEntry],
    period: HistoryPeriod,
    today: NaiveDate,
) -> HistorySummary {
    let start = match period {
        HistoryPeriod::Today => today,
        HistoryPeriod::Week => today - ChronoDuration::days(6),
        HistoryPeriod::Month => today - ChronoDuration::days(29),
    };

    let range_label = if start == today {
        today.format("%Y-%m-%d").to_string()
    } else {
        format!("{}..{}", start.format("%Y-%m-%d"), today.format("%Y-%m-%d"))
    };

    let grouped = entries
        .iter()
        .filter(|entry| entry.kind == SessionKind::Focus)
        .filter(|entry| {
            NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d")
                .map(|date| date >= start && date <= today)
                .unwrap_or(false)
        })
        .map(|entry| (task_key(&entry.task), entry))
        .into_group_map();

    let mut summary_entries: Vec<HistorySummaryEntry> = grouped
        .into_iter()
        .map(|(task, rows)| HistorySummaryEntry {
            task,
            sessions: rows.len(),
            elapsed_seconds: rows.iter().map(|row| row.elapsed_seconds).sum(),
        })
        .collect();
    summary_entries.sort_by(|a, b| {
        b.elapsed_seconds
            .cmp(&a.elapsed_seconds)
            .then_with(|| a.task.cmp(&b.task))
    });

    let total_seconds = summary_entries
        .iter()
        .map(|entry| entry.elapsed_seconds)
        .sum();
    let total_sessions = summary_entries.iter().map(|entry| entry.sessions).sum();

    HistorySummary {
        range_label,
        entries: summary_entries,
        total_seconds,
        total_sessions,
    }
}

fn task_key(task: &str) -> String {
    let trimmed = task.trim();
    if trimmed.is_empty() {
        "(no task)".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_duration_applies_both_fields_while_idle() {
        let mut timer = FocusTimer::new();
        for minutes in [1u64, 25, 90, 180] {
            let event = timer.set_duration_minutes(minutes);
            assert_eq!(event, Some(TimerEvent::DurationChanged { minutes }));
            assert_eq!(timer.duration_seconds, minutes * 60);
            assert_eq!(timer.remaining_seconds, minutes * 60);
        }
    }

    #[test]
    fn test_set_duration_clamps_out_of_range() {
        let mut timer = FocusTimer::new();
        timer.set_duration_minutes(500);
        assert_eq!(timer.duration_seconds, 180 * 60);
        timer.set_duration_minutes(0);
        assert_eq!(timer.duration_seconds, 60);
        assert_eq!(timer.remaining_seconds, 60);
    }

    #[test]
    fn test_set_duration_while_running_keeps_active_session() {
        let mut timer = FocusTimer::new();
        timer.set_duration_minutes(25);
        timer.start();
        timer.tick();

        assert_eq!(timer.set_duration_minutes(90), None);
        assert_eq!(timer.remaining_seconds, 1499);
        assert_eq!(timer.duration_seconds, 1500);

        // the stored minutes arm the next session
        timer.pause();
        timer.reset();
        assert_eq!(timer.duration_seconds, 90 * 60);
        assert_eq!(timer.remaining_seconds, 90 * 60);
    }

    #[test]
    fn test_start_is_idempotent_while_running() {
        let mut timer = FocusTimer::new();
        timer.set_duration_minutes(25);
        assert!(timer.start().is_some());
        assert!(timer.start().is_none());
        assert!(timer.is_running());
    }

    #[test]
    fn test_start_with_unset_duration_falls_back_to_default() {
        let mut timer = FocusTimer::new();
        let event = timer.start();
        assert_eq!(
            event,
            Some(TimerEvent::Started {
                kind: SessionKind::Focus
            })
        );
        assert_eq!(timer.duration_seconds, 1500);
    }

    #[test]
    fn test_tick_counts_down_and_completes_once() {
        let mut timer = FocusTimer::new();
        timer.set_duration_minutes(1);
        timer.start();

        for expected in (1..60).rev() {
            assert_eq!(
                timer.tick(),
                Some(TimerEvent::Ticked {
                    remaining_seconds: expected
                })
            );
        }

        assert_eq!(
            timer.tick(),
            Some(TimerEvent::Completed {
                kind: SessionKind::Focus
            })
        );
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_seconds, 0);

        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_seconds, 0);
    }

    #[test]
    fn test_pause_then_start_resumes_from_paused_remaining() {
        let mut timer = FocusTimer::new();
        timer.set_duration_minutes(25);
        timer.start();
        timer.tick();
        timer.tick();

        assert_eq!(timer.pause(), Some(TimerEvent::Paused));
        assert_eq!(timer.remaining_seconds, 1498);

        assert!(timer.start().is_some());
        timer.tick();
        assert_eq!(timer.remaining_seconds, 1497);
    }

    #[test]
    fn test_pause_while_idle_is_a_no_op() {
        let mut timer = FocusTimer::new();
        timer.set_duration_minutes(25);
        assert_eq!(timer.pause(), None);
        assert_eq!(timer.on_focus_lost(), None);
    }

    #[test]
    fn test_focus_loss_pauses_with_distinct_event() {
        let mut timer = FocusTimer::new();
        timer.set_duration_minutes(25);
        timer.start();
        assert_eq!(timer.on_focus_lost(), Some(TimerEvent::PausedByFocusLoss));
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_seconds, 1500);
    }

    #[test]
    fn test_reset_rearms_from_configured_minutes() {
        let mut timer = FocusTimer::new();
        timer.set_duration_minutes(2);
        timer.start();
        timer.tick();

        assert_eq!(timer.reset(), Some(TimerEvent::Reset));
        assert!(!timer.is_running());
        assert_eq!(timer.duration_seconds, 120);
        assert_eq!(timer.remaining_seconds, 120);
    }

    #[test]
    fn test_reset_without_configured_minutes_uses_fallback() {
        let mut timer = FocusTimer::new();
        timer.reset();
        assert_eq!(timer.duration_seconds, 1500);
        assert_eq!(timer.remaining_seconds, 1500);
    }

    #[test]
    fn test_loaded_state_resumes_partial_session() {
        let mut timer = FocusTimer::new();
        timer.apply_loaded_state(45, 10, "x".to_string(), String::new());
        assert_eq!(timer.remaining_seconds, 45);
        assert_eq!(timer.duration_seconds, 600);
        assert!(!timer.is_running());

        timer.start();
        timer.tick();
        assert_eq!(timer.remaining_seconds, 44);
    }

    #[test]
    fn test_break_session_leaves_focus_minutes_alone() {
        let mut timer = FocusTimer::new();
        timer.set_duration_minutes(25);

        assert_eq!(
            timer.begin_break(5),
            Some(TimerEvent::Started {
                kind: SessionKind::Break
            })
        );
        assert!(timer.is_running());
        assert_eq!(timer.duration_seconds, 300);

        for _ in 0..299 {
            timer.tick();
        }
        assert_eq!(
            timer.tick(),
            Some(TimerEvent::Completed {
                kind: SessionKind::Break
            })
        );

        timer.reset();
        assert_eq!(timer.kind, SessionKind::Focus);
        assert_eq!(timer.duration_seconds, 1500);
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut timer = FocusTimer::new();
        assert_eq!(timer.progress(), 0.0);

        timer.set_duration_minutes(1);
        assert_eq!(timer.progress(), 0.0);
        timer.start();
        for _ in 0..30 {
            timer.tick();
        }
        assert!((timer.progress() - 0.5).abs() < 1e-9);

        timer.apply_loaded_state(5000, 10, String::new(), String::new());
        assert_eq!(timer.progress(), 0.0);
    }

    fn history_row(
        date: &str,
        task: &str,
        elapsed_seconds: u64,
        kind: SessionKind,
        outcome: SessionOutcome,
    ) -> HistoryEntry {
        HistoryEntry {
            date: date.to_string(),
            end_time: "12:00:00".to_string(),
            kind,
            task: task.to_string(),
            planned_minutes: 25,
            elapsed_seconds,
            outcome,
        }
    }

    #[test]
    fn test_history_report_groups_focus_time_by_task() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let entries = vec![
            history_row(
                "2026-03-10",
                "draft",
                1500,
                SessionKind::Focus,
                SessionOutcome::Completed,
            ),
            history_row(
                "2026-03-10",
                "draft",
                300,
                SessionKind::Focus,
                SessionOutcome::Abandoned,
            ),
            history_row(
                "2026-03-10",
                "email",
                600,
                SessionKind::Focus,
                SessionOutcome::Completed,
            ),
            history_row(
                "2026-03-10",
                "draft",
                300,
                SessionKind::Break,
                SessionOutcome::Completed,
            ),
            history_row(
                "2026-03-09",
                "draft",
                900,
                SessionKind::Focus,
                SessionOutcome::Completed,
            ),
        ];

        let summary = build_history_report(&entries, HistoryPeriod::Today, today);

        assert_eq!(summary.range_label, "2026-03-10");
        assert_eq!(summary.entries.len(), 2);
        assert_eq!(summary.entries[0].task, "draft");
        assert_eq!(summary.entries[0].sessions, 2);
        assert_eq!(summary.entries[0].elapsed_seconds, 1800);
        assert_eq!(summary.entries[1].task, "email");
        assert_eq!(summary.total_seconds, 2400);
        assert_eq!(summary.total_sessions, 3);
    }

    #[test]
    fn test_history_report_week_window() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let entries = vec![
            history_row(
                "2026-03-04",
                "draft",
                600,
                SessionKind::Focus,
                SessionOutcome::Completed,
            ),
            history_row(
                "2026-03-03",
                "draft",
                600,
                SessionKind::Focus,
                SessionOutcome::Completed,
            ),
            history_row(
                "not-a-date",
                "draft",
                600,
                SessionKind::Focus,
                SessionOutcome::Completed,
            ),
        ];

        let summary = build_history_report(&entries, HistoryPeriod::Week, today);

        assert_eq!(summary.range_label, "2026-03-04..2026-03-10");
        assert_eq!(summary.total_seconds, 600);
        assert_eq!(summary.total_sessions, 1);
    }

    #[test]
    fn test_history_report_blank_task_gets_placeholder() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let entries = vec![history_row(
            "2026-03-10",
            "  ",
            600,
            SessionKind::Focus,
            SessionOutcome::Completed,
        )];

        let summary = build_history_report(&entries, HistoryPeriod::Today, today);
        assert_eq!(summary.entries[0].task, "(no task)");
    }
}
