//! Keyboard input, translated into arm commands.
//!
//! Tracks winit key events and turns each fresh key press into at most one
//! [`Command`] via a fixed key map. Keys with no binding are rejected here
//! and never reach the arm. The pending commands drain through the
//! [`CommandSource`] trait, strictly between frames.
//!
//! Key map (each pair is increase/decrease):
//!
//! | keys  | joint       |
//! |-------|-------------|
//! | A/D   | base yaw    |
//! | W/S   | upper arm   |
//! | R/F   | lower arm   |
//! | T/G   | wrist pitch |
//! | Z/C   | wrist roll  |
//! | Q/E   | finger open |
//! | Space | dump pose   |

use std::collections::{HashSet, VecDeque};

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::command::{Command, CommandSource};
use crate::joint::JointId;

/// The command bound to `key`, or `None` for unbound keys.
pub fn binding(key: KeyCode) -> Option<Command> {
    Some(match key {
        KeyCode::KeyA => Command::increase(JointId::BaseYaw),
        KeyCode::KeyD => Command::decrease(JointId::BaseYaw),
        KeyCode::KeyW => Command::increase(JointId::UpperArm),
        KeyCode::KeyS => Command::decrease(JointId::UpperArm),
        KeyCode::KeyR => Command::increase(JointId::LowerArm),
        KeyCode::KeyF => Command::decrease(JointId::LowerArm),
        KeyCode::KeyT => Command::increase(JointId::WristPitch),
        KeyCode::KeyG => Command::decrease(JointId::WristPitch),
        KeyCode::KeyZ => Command::increase(JointId::WristRoll),
        KeyCode::KeyC => Command::decrease(JointId::WristRoll),
        KeyCode::KeyQ => Command::increase(JointId::FingerOpen),
        KeyCode::KeyE => Command::decrease(JointId::FingerOpen),
        KeyCode::Space => Command::DumpPose,
        _ => return None,
    })
}

/// Tracks keyboard state and queues commands for fresh key presses.
#[derive(Default)]
pub struct Input {
    keys_down: HashSet<KeyCode>,
    pending: VecDeque<Command>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event
            && let PhysicalKey::Code(key) = event.physical_key
        {
            match event.state {
                ElementState::Pressed => self.press(key),
                ElementState::Released => self.release(key),
            }
        }
    }

    /// Registers a key press. Key repeats (a key held down) do not queue
    /// additional commands; each press steps its joint exactly once.
    pub fn press(&mut self, key: KeyCode) {
        if self.keys_down.insert(key)
            && let Some(command) = binding(key)
        {
            self.pending.push_back(command);
        }
    }

    /// Registers a key release, re-arming the key for its next press.
    pub fn release(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }
}

impl CommandSource for Input {
    fn next_command(&mut self) -> Option<Command> {
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::Direction;

    #[test]
    fn bound_keys_produce_their_commands() {
        assert_eq!(
            binding(KeyCode::KeyW),
            Some(Command::Adjust {
                joint: JointId::UpperArm,
                direction: Direction::Increase,
            })
        );
        assert_eq!(binding(KeyCode::Space), Some(Command::DumpPose));
    }

    #[test]
    fn unbound_keys_are_rejected() {
        assert_eq!(binding(KeyCode::KeyX), None);
        assert_eq!(binding(KeyCode::Escape), None);
    }

    #[test]
    fn held_key_queues_one_command_until_released() {
        let mut input = Input::new();
        input.press(KeyCode::KeyQ);
        input.press(KeyCode::KeyQ); // repeat while held
        input.release(KeyCode::KeyQ);
        input.press(KeyCode::KeyQ);

        assert_eq!(
            input.next_command(),
            Some(Command::increase(JointId::FingerOpen))
        );
        assert_eq!(
            input.next_command(),
            Some(Command::increase(JointId::FingerOpen))
        );
        assert_eq!(input.next_command(), None);
    }

    #[test]
    fn commands_drain_in_press_order() {
        let mut input = Input::new();
        input.press(KeyCode::KeyA);
        input.press(KeyCode::Space);

        assert_eq!(
            input.next_command(),
            Some(Command::increase(JointId::BaseYaw))
        );
        assert_eq!(input.next_command(), Some(Command::DumpPose));
        assert_eq!(input.next_command(), None);
    }
}
