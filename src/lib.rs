//! # Armature
//!
//! **Forward kinematics for an articulated robot arm, rendered with wgpu.**
//!
//! The crate is built around two small primitives:
//!
//! - [`TransformStack`] — a 4×4 matrix stack whose [`scoped`](TransformStack::scoped)
//!   combinator guarantees the pre-scope transform is restored on every exit
//!   path, normal or failing.
//! - [`Armature`] — a static segment hierarchy plus per-joint angle state
//!   ([`Pose`]), walked depth-first each frame to emit one world matrix per
//!   drawable segment through a [`RenderBackend`].
//!
//! Joint angles only move through [`Command`]s applied between frames, and
//! every joint enforces its own domain: clamped joints absorb movement past
//! their stops, wrapped joints stay normalized in `[0, 360)`.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() {
//!     env_logger::init();
//!     armature::run();
//! }
//! ```
//!
//! Drive the arm with A/D (base), W/S (shoulder), R/F (elbow), T/G and Z/C
//! (wrist), Q/E (fingers); Space logs the current pose.
//!
//! ## Using the core without a window
//!
//! ```
//! use armature::{Armature, DrawQueue, MeshId};
//!
//! let arm = Armature::robot_arm(MeshId::default());
//! let mut queue = DrawQueue::new();
//! arm.draw(&mut queue).unwrap();
//! assert_eq!(queue.len(), 9); // one world matrix per segment
//! ```

mod app;
mod arm_pass;
mod armature;
mod command;
mod gpu;
mod input;
mod joint;
mod mesh;
mod projection;
mod render;
mod stack;

pub use app::run;
pub use arm_pass::ArmPass;
pub use armature::{AngleSource, Armature, Axis, Node, Rotation, Shape};
pub use command::{Command, CommandSource};
pub use gpu::GpuContext;
pub use input::{Input, binding};
pub use joint::{Direction, Joint, JointId, JointKind, Pose};
pub use mesh::{Mesh, Vertex};
pub use projection::Projection;
pub use render::{DrawQueue, MeshId, RenderBackend};
pub use stack::TransformStack;

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::keyboard::KeyCode;
