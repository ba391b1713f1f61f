//! Text schedule parsing.
//!
//! One line per channel, in channel order (`RED`, `GREEN`, `BLUE`). Each
//! whitespace-separated token is `tick:id`, e.g.
//!
//! ```text
//! 0:3 2:1
//! 0:2
//! 1:4
//! ```
//!
//! Queue order is token order; the verifier decides whether that order is
//! consistent with the ticks.

use thiserror::Error;

use crate::models::{ChannelQueues, ResourceType, TaskSet};

/// Reasons text input cannot be turned into a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected at most {expected} lines, got {got}")]
    TooManyLines { expected: usize, got: usize },

    #[error("malformed entry '{token}' on {channel}: expected tick:id")]
    MalformedToken {
        channel: ResourceType,
        token: String,
    },

    #[error("invalid tick '{tick}' for task {id} on {channel}")]
    InvalidTick {
        channel: ResourceType,
        id: String,
        tick: String,
    },

    #[error("unknown task '{id}' on {channel}")]
    UnknownTask { channel: ResourceType, id: String },

    #[error("task {id} belongs on {expected}, not {channel}")]
    WrongChannel {
        id: String,
        expected: ResourceType,
        channel: ResourceType,
    },
}

/// Parses per-channel lines into queues and records start ticks.
///
/// Start ticks are written to `tasks` only if every line parses; on error
/// the task set is left untouched.
pub fn parse_schedule<S: AsRef<str>>(
    lines: &[S],
    tasks: &mut TaskSet,
) -> Result<ChannelQueues, ParseError> {
    if lines.len() > ResourceType::COUNT {
        return Err(ParseError::TooManyLines {
            expected: ResourceType::COUNT,
            got: lines.len(),
        });
    }

    let mut queues = ChannelQueues::new();
    let mut starts: Vec<(usize, u32)> = Vec::new();

    for (channel, line) in ResourceType::ALL.into_iter().zip(lines) {
        for token in line.as_ref().split_whitespace() {
            let (index, tick) = parse_token(channel, token, tasks)?;
            queues.push(channel, index);
            starts.push((index, tick));
        }
    }

    for (index, tick) in starts {
        tasks.schedule(index, tick);
    }
    Ok(queues)
}

fn parse_token(
    channel: ResourceType,
    token: &str,
    tasks: &TaskSet,
) -> Result<(usize, u32), ParseError> {
    let (tick, id) = token
        .split_once(':')
        .filter(|(t, i)| !t.is_empty() && !i.is_empty())
        .ok_or_else(|| ParseError::MalformedToken {
            channel,
            token: token.to_string(),
        })?;

    let index = tasks.find(id).ok_or_else(|| ParseError::UnknownTask {
        channel,
        id: id.to_string(),
    })?;

    let tick: u32 = tick.parse().map_err(|_| ParseError::InvalidTick {
        channel,
        id: id.to_string(),
        tick: tick.to_string(),
    })?;

    let expected = tasks.get(index).map(|t| t.resource_type).unwrap_or(channel);
    if expected != channel {
        return Err(ParseError::WrongChannel {
            id: id.to_string(),
            expected,
            channel,
        });
    }

    Ok((index, tick))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Register, Task};

    fn sample_tasks() -> TaskSet {
        TaskSet::new(vec![
            Task::new("1", ResourceType::Red, 2).with_register(Register::A),
            Task::new("2", ResourceType::Red, 1).with_register(Register::B),
            Task::new("3", ResourceType::Green, 1).with_register(Register::C),
            Task::new("4", ResourceType::Blue, 3).with_register(Register::D),
        ])
    }

    #[test]
    fn test_parse_valid() {
        let mut tasks = sample_tasks();
        let queues = parse_schedule(&["0:1 2:2", "0:3", "1:4"], &mut tasks).unwrap();

        assert_eq!(queues.queue(ResourceType::Red), &[0, 1]);
        assert_eq!(queues.queue(ResourceType::Green), &[2]);
        assert_eq!(queues.queue(ResourceType::Blue), &[3]);
        assert_eq!(tasks.get(1).unwrap().scheduled, Some(2));
        assert_eq!(tasks.get(3).unwrap().scheduled, Some(1));
    }

    #[test]
    fn test_parse_keeps_token_order() {
        let mut tasks = sample_tasks();
        let queues = parse_schedule(&["5:1 0:2"], &mut tasks).unwrap();
        assert_eq!(queues.queue(ResourceType::Red), &[0, 1]);
    }

    #[test]
    fn test_parse_fewer_lines_and_blank() {
        let mut tasks = sample_tasks();
        let queues = parse_schedule(&["  ", "0:3"], &mut tasks).unwrap();
        assert!(queues.queue(ResourceType::Red).is_empty());
        assert_eq!(queues.len(), 1);
    }

    #[test]
    fn test_parse_errors() {
        let mut tasks = sample_tasks();

        let err = parse_schedule(&["0:1", "", "", ""], &mut tasks).unwrap_err();
        assert_eq!(
            err,
            ParseError::TooManyLines {
                expected: 3,
                got: 4,
            }
        );

        let err = parse_schedule(&["01"], &mut tasks).unwrap_err();
        assert!(matches!(err, ParseError::MalformedToken { .. }));

        let err = parse_schedule(&["x:1"], &mut tasks).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTick { .. }));

        let err = parse_schedule(&["-1:1"], &mut tasks).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTick { .. }));

        let err = parse_schedule(&["0:9"], &mut tasks).unwrap_err();
        assert!(matches!(err, ParseError::UnknownTask { ref id, .. } if id == "9"));

        let err = parse_schedule(&["", "0:1"], &mut tasks).unwrap_err();
        assert_eq!(
            err,
            ParseError::WrongChannel {
                id: "1".into(),
                expected: ResourceType::Red,
                channel: ResourceType::Green,
            }
        );
    }

    #[test]
    fn test_parse_failure_leaves_tasks_untouched() {
        let mut tasks = sample_tasks();
        let before = tasks.clone();
        assert!(parse_schedule(&["0:1 3:2", "0:nope"], &mut tasks).is_err());
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_parse_max_tick() {
        let mut tasks = sample_tasks();
        parse_schedule(&["4294967295:1"], &mut tasks).unwrap();
        assert_eq!(tasks.get(0).unwrap().scheduled, Some(u32::MAX));
        assert_eq!(tasks.get(0).unwrap().end_tick(), Some(u32::MAX));

        let err = parse_schedule(&["4294967296:1"], &mut tasks).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTick { .. }));
    }
}
