//! Discrete commands that mutate joint state between frames.
//!
//! Commands form a closed set: adjust one named joint by one step, or dump
//! the current pose. There is no string-keyed dispatch anywhere — a
//! [`Command`] carries a [`JointId`] and application is an exhaustive match.
//! Input that maps to no command (an unbound key, say) is rejected at the
//! [`CommandSource`] boundary and simply never becomes a command.
//!
//! Hosts must apply all pending commands *before* starting a traversal;
//! joint state is read-only while a frame is being drawn.

use crate::joint::{Direction, JointId};

/// One discrete command from the host's input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Step `joint` one increment in `direction`.
    Adjust {
        joint: JointId,
        direction: Direction,
    },
    /// Log the current angle of every joint. Read-only diagnostic.
    DumpPose,
}

impl Command {
    /// Shorthand for an increase step on `joint`.
    pub fn increase(joint: JointId) -> Self {
        Command::Adjust {
            joint,
            direction: Direction::Increase,
        }
    }

    /// Shorthand for a decrease step on `joint`.
    pub fn decrease(joint: JointId) -> Self {
        Command::Adjust {
            joint,
            direction: Direction::Decrease,
        }
    }
}

/// A lazy, finite-per-frame supply of commands.
///
/// Drained to exhaustion between frames; `None` means nothing further is
/// pending for this frame.
pub trait CommandSource {
    fn next_command(&mut self) -> Option<Command>;
}

/// A plain queue of commands works as a source; handy for scripted poses
/// and tests.
impl CommandSource for std::collections::VecDeque<Command> {
    fn next_command(&mut self) -> Option<Command> {
        self.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[test]
    fn queue_drains_in_receipt_order() {
        let mut source: VecDeque<Command> = [
            Command::increase(JointId::BaseYaw),
            Command::DumpPose,
            Command::decrease(JointId::FingerOpen),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            source.next_command(),
            Some(Command::increase(JointId::BaseYaw))
        );
        assert_eq!(source.next_command(), Some(Command::DumpPose));
        assert_eq!(
            source.next_command(),
            Some(Command::decrease(JointId::FingerOpen))
        );
        assert_eq!(source.next_command(), None);
    }
}
