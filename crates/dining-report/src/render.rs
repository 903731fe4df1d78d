//! Plain-text rendering of simulation records.
//!
//! Every function returns a complete block, newline-terminated, ready to be
//! written as-is to the console or the log file. Timestamps are shown in
//! local time with second precision.

use chrono::{DateTime, Local, Utc};
use dining_types::{AgentStatus, StartRecord, StatusRecord, TerminationRecord};

use crate::labels::Labels;

/// Width of the `=` rules framing the header and status blocks.
pub const RULE_WIDTH: usize = 70;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

/// Title and rule written once at the top of a report.
pub fn render_header(labels: &Labels) -> String {
    format!("{}\n{}\n\n", labels.title, rule())
}

/// The line announcing the table size and start time.
pub fn render_start(labels: &Labels, record: &StartRecord) -> String {
    format!(
        "{} {} {} {}\n\n",
        labels.start_prefix,
        record.agent_count,
        labels.start_infix,
        timestamp(record.started_at)
    )
}

/// One line per philosopher: id, state, held sticks.
pub fn render_agent(labels: &Labels, status: &AgentStatus) -> String {
    let sticks = if status.held.is_empty() {
        labels.no_sticks.to_owned()
    } else {
        let ids: Vec<String> = status.held.iter().map(ToString::to_string).collect();
        format!("{} {}", labels.sticks, ids.join(", "))
    };
    format!(
        "{} {}: {}, {}",
        labels.philosopher,
        status.agent_id,
        labels.state(status.state),
        sticks
    )
}

/// A status block: elapsed seconds, then every philosopher between rules.
pub fn render_status(labels: &Labels, record: &StatusRecord) -> String {
    let mut out = format!(
        "\n{} {:.3}s:\n{}\n",
        labels.status_prefix,
        record.elapsed.as_secs_f64(),
        rule()
    );
    for status in &record.snapshot.agents {
        out.push_str(&render_agent(labels, status));
        out.push('\n');
    }
    out.push_str(&rule());
    out.push('\n');
    out
}

/// The closing block. A completed run reports its duration and end time;
/// an interrupted one only says it was stopped.
pub fn render_termination(labels: &Labels, record: &TerminationRecord) -> String {
    if !Labels::reports_duration(record.reason) {
        return format!("\n{}\n", labels.interrupted);
    }
    format!(
        "\n{} {} {}\n{} {}\n",
        labels.completed_prefix,
        record.duration.as_secs(),
        labels.completed_suffix,
        labels.ended_at,
        timestamp(record.ended_at)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use dining_types::{AgentId, PhilosopherState, ResourceId, TableSnapshot, TerminationReason};

    use super::*;
    use crate::labels::{ENGLISH, VIETNAMESE};

    fn status(agent: usize, state: PhilosopherState, held: &[usize]) -> AgentStatus {
        AgentStatus {
            agent_id: AgentId::new(agent),
            state,
            held: held.iter().copied().map(ResourceId::new).collect(),
        }
    }

    #[test]
    fn header_is_title_over_rule() {
        let header = render_header(&ENGLISH);
        let lines: Vec<&str> = header.lines().collect();
        assert_eq!(lines[0], "DINING PHILOSOPHERS SIMULATION");
        assert_eq!(lines[1], "=".repeat(RULE_WIDTH));
    }

    #[test]
    fn start_line_names_the_table_size() {
        let line = render_start(
            &ENGLISH,
            &StartRecord {
                agent_count: 5,
                started_at: Utc::now(),
            },
        );
        assert!(line.starts_with("Starting simulation with 5 philosophers at "));
        assert!(line.ends_with("\n\n"));
    }

    #[test]
    fn agent_lines_list_held_sticks() {
        assert_eq!(
            render_agent(&ENGLISH, &status(0, PhilosopherState::Thinking, &[])),
            "Philosopher 0: thinking, no sticks"
        );
        assert_eq!(
            render_agent(&ENGLISH, &status(1, PhilosopherState::Hungry, &[1])),
            "Philosopher 1: hungry, sticks 1"
        );
        assert_eq!(
            render_agent(&ENGLISH, &status(4, PhilosopherState::Eating, &[4, 0])),
            "Philosopher 4: eating, sticks 4, 0"
        );
        assert_eq!(
            render_agent(&VIETNAMESE, &status(2, PhilosopherState::Eating, &[2, 3])),
            "Triết học gia 2: đang ăn, đũa 2, 3"
        );
    }

    #[test]
    fn status_block_frames_every_agent() {
        let record = StatusRecord {
            sequence: 0,
            elapsed: Duration::from_millis(1234),
            snapshot: TableSnapshot {
                agents: vec![
                    status(0, PhilosopherState::Eating, &[0, 1]),
                    status(1, PhilosopherState::Hungry, &[]),
                    status(2, PhilosopherState::Thinking, &[]),
                ],
            },
        };
        let block = render_status(&ENGLISH, &record);
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "Status at 1.234s:");
        assert_eq!(lines[2], "=".repeat(RULE_WIDTH));
        assert_eq!(lines[3], "Philosopher 0: eating, sticks 0, 1");
        assert_eq!(lines[4], "Philosopher 1: hungry, no sticks");
        assert_eq!(lines[5], "Philosopher 2: thinking, no sticks");
        assert_eq!(lines[6], "=".repeat(RULE_WIDTH));
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn termination_block_depends_on_reason() {
        let mut record = TerminationRecord {
            elapsed: Duration::from_millis(5003),
            duration: Duration::from_secs(5),
            reason: TerminationReason::Completed,
            ended_at: Utc::now(),
        };
        let completed = render_termination(&ENGLISH, &record);
        assert!(completed.contains("Simulation finished after 5 seconds\n"));
        assert!(completed.contains("End time: "));

        record.reason = TerminationReason::Interrupted;
        let interrupted = render_termination(&VIETNAMESE, &record);
        assert_eq!(interrupted, "\nMô phỏng đã bị dừng bởi người dùng\n");
        assert!(!interrupted.contains("Thời gian kết thúc"));
    }
}
