//! Execution channels and registers.
//!
//! A puzzle has exactly three channels. Each task is affined to one of
//! them, and each task holds one or two registers from a shared register
//! file for its whole execution window.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An execution channel (resource type).
///
/// Channels are processed in declaration order by the verifier:
/// `Red`, then `Green`, then `Blue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// First channel.
    Red,
    /// Second channel.
    Green,
    /// Third channel.
    Blue,
}

impl ResourceType {
    /// All channels in processing order.
    pub const ALL: [ResourceType; 3] = [ResourceType::Red, ResourceType::Green, ResourceType::Blue];

    /// Number of channels.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this channel in [`ResourceType::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ResourceType::Red => 0,
            ResourceType::Green => 1,
            ResourceType::Blue => 2,
        }
    }

    /// Upper-case channel name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ResourceType::Red => "RED",
            ResourceType::Green => "GREEN",
            ResourceType::Blue => "BLUE",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A machine register.
///
/// Registers are a conflict resource only: two tasks running at the same
/// tick, on any channels, must not share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Register {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Register {
    /// All registers.
    pub const ALL: [Register; 6] = [
        Register::A,
        Register::B,
        Register::C,
        Register::D,
        Register::E,
        Register::F,
    ];

    /// Single-letter register name.
    pub fn name(self) -> &'static str {
        match self {
            Register::A => "A",
            Register::B => "B",
            Register::C => "C",
            Register::D => "D",
            Register::E => "E",
            Register::F => "F",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_order() {
        for (i, ch) in ResourceType::ALL.iter().enumerate() {
            assert_eq!(ch.index(), i);
        }
        assert_eq!(ResourceType::COUNT, 3);
    }

    #[test]
    fn test_names() {
        assert_eq!(ResourceType::Green.to_string(), "GREEN");
        assert_eq!(Register::C.to_string(), "C");
        assert_eq!(Register::ALL.len(), 6);
    }
}
