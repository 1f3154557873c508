//! Articulated-figure hierarchy and the forward-kinematic traversal.
//!
//! An [`Armature`] is a static [`Node`] tree plus the mutable [`Pose`] that
//! drives it. Each frame, [`Armature::draw`] walks the tree depth-first with
//! a fresh [`TransformStack`], composing every node's local offset and
//! rotations on the way down and emitting one world matrix per leaf [`Shape`]
//! through a [`RenderBackend`]. The tree never changes after construction;
//! only joint angles move, and only between frames.
//!
//! Per-node order inside a scope is fixed: translate by the node offset,
//! apply the node's rotations, draw the node's shapes (each in its own
//! scope), then recurse into children (each in its own scope). Scope exits
//! restore the stack, so siblings never see each other's transforms.

use glam::Vec3;

use crate::command::Command;
use crate::joint::{JointId, Pose};
use crate::render::{MeshId, RenderBackend};
use crate::stack::TransformStack;

/// Rotation axis for a node, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Where a node rotation gets its angle from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AngleSource {
    /// Driven by a joint; `sign` mirrors the angle for symmetric parts
    /// (left finger +1, right finger -1).
    Joint { id: JointId, sign: f32 },
    /// A constant angle baked into the hierarchy, in degrees.
    Fixed(f32),
}

/// One rotation applied when entering a node's scope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    pub axis: Axis,
    pub source: AngleSource,
}

impl Rotation {
    /// A joint-driven rotation.
    pub fn joint(axis: Axis, id: JointId) -> Self {
        Self {
            axis,
            source: AngleSource::Joint { id, sign: 1.0 },
        }
    }

    /// A joint-driven rotation with the angle negated, for the mirrored
    /// half of a symmetric pair.
    pub fn joint_mirrored(axis: Axis, id: JointId) -> Self {
        Self {
            axis,
            source: AngleSource::Joint { id, sign: -1.0 },
        }
    }

    /// A constant rotation in degrees.
    pub fn fixed(axis: Axis, angle_deg: f32) -> Self {
        Self {
            axis,
            source: AngleSource::Fixed(angle_deg),
        }
    }
}

/// A drawable leaf: local offset and extents applied to the shared unit
/// cube just before its world matrix is emitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shape {
    pub offset: Vec3,
    pub extents: Vec3,
}

impl Shape {
    pub fn new(offset: Vec3, extents: Vec3) -> Self {
        Self { offset, extents }
    }
}

/// A node of the static hierarchy: local placement, rotations, leaf shapes,
/// and child nodes.
#[derive(Clone, Debug, Default)]
pub struct Node {
    pub offset: Vec3,
    pub rotations: Vec<Rotation>,
    pub shapes: Vec<Shape>,
    pub children: Vec<Node>,
}

/// An articulated figure: static hierarchy + mutable pose + shared mesh.
#[derive(Clone, Debug)]
pub struct Armature {
    root: Node,
    pose: Pose,
    mesh: MeshId,
}

impl Armature {
    /// Builds an armature from an arbitrary node tree.
    pub fn new(root: Node, pose: Pose, mesh: MeshId) -> Self {
        Self { root, pose, mesh }
    }

    /// The default robotic arm: two symmetric base blocks, then a chain of
    /// upper arm, lower arm, wrist, and a two-finger gripper. Every drawable
    /// part is the shared unit cube stretched into place. Left/right parts
    /// apply identical-magnitude, opposite-sign rotations so the hand closes
    /// symmetrically.
    pub fn robot_arm(mesh: MeshId) -> Self {
        let finger_shape = Shape::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.25, 0.25, 1.0));

        let left_finger = Node {
            offset: Vec3::new(1.0, 0.0, 1.0),
            rotations: vec![Rotation::joint(Axis::Y, JointId::FingerOpen)],
            shapes: vec![finger_shape],
            children: vec![Node {
                offset: Vec3::new(0.0, 0.0, 2.0),
                rotations: vec![Rotation::fixed(Axis::Y, -45.0)],
                shapes: vec![finger_shape],
                children: vec![],
            }],
        };

        let right_finger = Node {
            offset: Vec3::new(-1.0, 0.0, 1.0),
            rotations: vec![Rotation::joint_mirrored(Axis::Y, JointId::FingerOpen)],
            shapes: vec![finger_shape],
            children: vec![Node {
                offset: Vec3::new(0.0, 0.0, 2.0),
                rotations: vec![Rotation::fixed(Axis::Y, 45.0)],
                shapes: vec![finger_shape],
                children: vec![],
            }],
        };

        let wrist = Node {
            offset: Vec3::new(0.0, 0.0, 5.0),
            rotations: vec![
                Rotation::joint(Axis::Z, JointId::WristRoll),
                Rotation::joint(Axis::X, JointId::WristPitch),
            ],
            shapes: vec![Shape::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0))],
            children: vec![left_finger, right_finger],
        };

        let lower_arm = Node {
            offset: Vec3::new(0.0, 0.0, 8.0),
            rotations: vec![Rotation::joint(Axis::X, JointId::LowerArm)],
            shapes: vec![Shape::new(
                Vec3::new(0.0, 0.0, 2.5),
                Vec3::new(0.75, 0.75, 2.5),
            )],
            children: vec![wrist],
        };

        let upper_arm = Node {
            offset: Vec3::ZERO,
            rotations: vec![Rotation::joint(Axis::X, JointId::UpperArm)],
            shapes: vec![Shape::new(
                Vec3::new(0.0, 0.0, 3.5),
                Vec3::new(1.0, 1.0, 4.5),
            )],
            children: vec![lower_arm],
        };

        let root = Node {
            offset: Vec3::new(3.0, -5.0, -40.0),
            rotations: vec![Rotation::joint(Axis::Y, JointId::BaseYaw)],
            shapes: vec![
                Shape::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 3.0)),
                Shape::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 3.0)),
            ],
            children: vec![upper_arm],
        };

        Self::new(root, Pose::arm_rest(), mesh)
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn pose_mut(&mut self) -> &mut Pose {
        &mut self.pose
    }

    /// Applies one command. Adjustments respect each joint's domain policy;
    /// [`Command::DumpPose`] logs every joint's current angle and mutates
    /// nothing. Must not be called while a traversal is in flight.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Adjust { joint, direction } => self.pose.adjust(joint, direction),
            Command::DumpPose => {
                for (name, angle) in self.pose.angles() {
                    log::info!("{}: {}", name, angle);
                }
            }
        }
    }

    /// Walks the hierarchy with a fresh stack and emits one world matrix per
    /// leaf shape. With an unchanged pose, two calls emit bit-identical
    /// matrix sequences.
    pub fn draw<B: RenderBackend>(&self, backend: &mut B) -> Result<(), B::Error> {
        let mut stack = TransformStack::new();
        self.traverse(&mut stack, backend)
    }

    /// Like [`draw`](Self::draw), but composing on top of a caller-provided
    /// stack. The stack's depth and top are identical before and after, even
    /// when the backend fails mid-walk.
    pub fn traverse<B: RenderBackend>(
        &self,
        stack: &mut TransformStack,
        backend: &mut B,
    ) -> Result<(), B::Error> {
        self.visit(&self.root, stack, backend)
    }

    fn visit<B: RenderBackend>(
        &self,
        node: &Node,
        stack: &mut TransformStack,
        backend: &mut B,
    ) -> Result<(), B::Error> {
        stack.scoped(|stack| {
            stack.translate(node.offset);
            for rotation in &node.rotations {
                let angle = match rotation.source {
                    AngleSource::Joint { id, sign } => sign * self.pose.angle(id),
                    AngleSource::Fixed(angle) => angle,
                };
                match rotation.axis {
                    Axis::X => stack.rotate_x(angle),
                    Axis::Y => stack.rotate_y(angle),
                    Axis::Z => stack.rotate_z(angle),
                }
            }
            for shape in &node.shapes {
                stack.scoped(|stack| {
                    stack.translate(shape.offset);
                    stack.scale(shape.extents);
                    backend.draw(stack.top(), self.mesh)
                })?;
            }
            for child in &node.children {
                self.visit(child, stack, backend)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::Direction;
    use crate::render::DrawQueue;
    use glam::Mat4;

    fn arm() -> Armature {
        Armature::robot_arm(MeshId(0))
    }

    fn t(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(x, y, z))
    }

    fn rx(deg: f32) -> Mat4 {
        Mat4::from_rotation_x(deg.to_radians())
    }

    fn ry(deg: f32) -> Mat4 {
        Mat4::from_rotation_y(deg.to_radians())
    }

    fn rz(deg: f32) -> Mat4 {
        Mat4::from_rotation_z(deg.to_radians())
    }

    fn s(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_scale(Vec3::new(x, y, z))
    }

    fn assert_mat4_eq(a: Mat4, b: Mat4, tolerance: f32) {
        let (a, b) = (a.to_cols_array(), b.to_cols_array());
        for i in 0..16 {
            assert!(
                (a[i] - b[i]).abs() < tolerance,
                "matrices differ at element {}: {} vs {}",
                i,
                a[i],
                b[i],
            );
        }
    }

    /// Everything up to and including the wrist rotations, from the live pose.
    fn wrist_prefix(pose: &Pose) -> Mat4 {
        t(3.0, -5.0, -40.0)
            * ry(pose.angle(JointId::BaseYaw))
            * rx(pose.angle(JointId::UpperArm))
            * t(0.0, 0.0, 8.0)
            * rx(pose.angle(JointId::LowerArm))
            * t(0.0, 0.0, 5.0)
            * rz(pose.angle(JointId::WristRoll))
            * rx(pose.angle(JointId::WristPitch))
    }

    #[test]
    fn default_arm_emits_nine_leaf_draws() {
        let mut queue = DrawQueue::new();
        arm().draw(&mut queue).unwrap();
        assert_eq!(queue.len(), 9);
    }

    #[test]
    fn draw_is_idempotent_without_commands() {
        let arm = arm();
        let mut first = DrawQueue::new();
        let mut second = DrawQueue::new();
        arm.draw(&mut first).unwrap();
        arm.draw(&mut second).unwrap();

        assert_eq!(first.len(), second.len());
        for ((mesh_a, world_a), (mesh_b, world_b)) in
            first.calls().iter().zip(second.calls().iter())
        {
            assert_eq!(mesh_a, mesh_b);
            assert_eq!(world_a.to_cols_array(), world_b.to_cols_array());
        }
    }

    #[test]
    fn base_blocks_match_reference_products() {
        let arm = arm();
        let mut queue = DrawQueue::new();
        arm.draw(&mut queue).unwrap();

        let base = t(3.0, -5.0, -40.0) * ry(arm.pose().angle(JointId::BaseYaw));
        let left = base * t(2.0, 0.0, 0.0) * s(1.0, 1.0, 3.0);
        let right = base * t(-2.0, 0.0, 0.0) * s(1.0, 1.0, 3.0);

        assert_mat4_eq(queue.calls()[0].1, left, 1e-5);
        assert_mat4_eq(queue.calls()[1].1, right, 1e-5);
    }

    #[test]
    fn arm_chain_matches_reference_products() {
        let arm = arm();
        let mut queue = DrawQueue::new();
        arm.draw(&mut queue).unwrap();
        let pose = arm.pose();

        let base = t(3.0, -5.0, -40.0) * ry(pose.angle(JointId::BaseYaw));
        let upper = base * rx(pose.angle(JointId::UpperArm));
        let lower = upper * t(0.0, 0.0, 8.0) * rx(pose.angle(JointId::LowerArm));
        let wrist = lower
            * t(0.0, 0.0, 5.0)
            * rz(pose.angle(JointId::WristRoll))
            * rx(pose.angle(JointId::WristPitch));

        assert_mat4_eq(
            queue.calls()[2].1,
            upper * t(0.0, 0.0, 3.5) * s(1.0, 1.0, 4.5),
            1e-5,
        );
        assert_mat4_eq(
            queue.calls()[3].1,
            lower * t(0.0, 0.0, 2.5) * s(0.75, 0.75, 2.5),
            1e-5,
        );
        assert_mat4_eq(queue.calls()[4].1, wrist * s(1.0, 1.0, 1.0), 1e-5);
    }

    #[test]
    fn fingers_are_mirrored_about_the_wrist() {
        let mut arm = arm();
        // Move off the rest angle so the symmetry is not trivially satisfied.
        arm.pose_mut().adjust(JointId::FingerOpen, Direction::Decrease);
        arm.pose_mut().adjust(JointId::FingerOpen, Direction::Decrease);
        let open = arm.pose().angle(JointId::FingerOpen);

        let mut queue = DrawQueue::new();
        arm.draw(&mut queue).unwrap();

        let wrist = wrist_prefix(arm.pose());
        let cube = t(0.0, 0.0, 1.0) * s(0.25, 0.25, 1.0);

        // Left finger rotates +open, right rotates -open about Y.
        let left = wrist * t(1.0, 0.0, 1.0) * ry(open) * cube;
        let right = wrist * t(-1.0, 0.0, 1.0) * ry(-open) * cube;
        assert_mat4_eq(queue.calls()[5].1, left, 1e-4);
        assert_mat4_eq(queue.calls()[7].1, right, 1e-4);

        // Lower fingers bend by equal-magnitude, opposite-sign fixed angles.
        let left_lower =
            wrist * t(1.0, 0.0, 1.0) * ry(open) * t(0.0, 0.0, 2.0) * ry(-45.0) * cube;
        let right_lower =
            wrist * t(-1.0, 0.0, 1.0) * ry(-open) * t(0.0, 0.0, 2.0) * ry(45.0) * cube;
        assert_mat4_eq(queue.calls()[6].1, left_lower, 1e-4);
        assert_mat4_eq(queue.calls()[8].1, right_lower, 1e-4);
    }

    struct FailingBackend {
        fail_at: usize,
        seen: usize,
    }

    #[derive(Debug, PartialEq)]
    struct DrawFailed;

    impl RenderBackend for FailingBackend {
        type Error = DrawFailed;

        fn draw(&mut self, _world: Mat4, _mesh: MeshId) -> Result<(), DrawFailed> {
            self.seen += 1;
            if self.seen > self.fail_at {
                Err(DrawFailed)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn failing_leaf_draw_leaves_the_stack_balanced() {
        let arm = arm();
        let mut stack = TransformStack::new();
        stack.translate(Vec3::new(0.0, 1.0, 0.0));
        let depth_before = stack.depth();
        let top_before = stack.top();

        // Fail deep in the hierarchy, with several scopes open.
        let mut backend = FailingBackend {
            fail_at: 5,
            seen: 0,
        };
        let result = arm.traverse(&mut stack, &mut backend);

        assert_eq!(result, Err(DrawFailed));
        assert_eq!(stack.depth(), depth_before);
        assert_eq!(stack.top(), top_before);
    }

    #[test]
    fn apply_adjust_moves_only_the_named_joint() {
        let mut arm = arm();
        arm.apply(Command::decrease(JointId::WristPitch));
        assert!((arm.pose().angle(JointId::WristPitch) - 56.25).abs() < 1e-5);
        assert_eq!(arm.pose().angle(JointId::WristRoll), 0.0);
    }

    #[test]
    fn dump_pose_mutates_nothing() {
        let mut arm = arm();
        let before: Vec<f32> = arm.pose().angles().map(|(_, a)| a).collect();
        arm.apply(Command::DumpPose);
        let after: Vec<f32> = arm.pose().angles().map(|(_, a)| a).collect();
        assert_eq!(before, after);
    }
}
