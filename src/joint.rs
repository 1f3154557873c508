//! Joint angle state with clamping and wraparound policies.
//!
//! A [`Joint`] is a scalar angle in degrees plus the policy that keeps it
//! inside its physical domain: [`JointKind::Clamped`] joints absorb movement
//! past a bound (hitting the stop repeatedly is idempotent, never an error),
//! while [`JointKind::Wrapped`] joints are cyclic and always normalized into
//! `[0, 360)` — including after adjustments that would naively go negative.
//!
//! [`Pose`] is the closed set of joints driving the default arm, addressed by
//! [`JointId`]. No string lookup is involved; every dispatch on a joint is an
//! exhaustive match.

/// Which way to move a joint by one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Increase,
    Decrease,
}

/// Angle domain policy for a joint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JointKind {
    /// Angle bounded to `[min, max]` degrees; movement past a bound is absorbed.
    Clamped { min: f32, max: f32 },
    /// Angle cyclic modulo 360°, kept in `[0, 360)`.
    Wrapped,
}

/// One rotational joint: current angle, domain policy, and step size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Joint {
    name: &'static str,
    angle: f32,
    kind: JointKind,
    step: f32,
}

impl Joint {
    /// Creates a clamped joint. The initial angle is clamped into `[min, max]`
    /// so the domain invariant holds from construction.
    pub fn clamped(name: &'static str, angle: f32, min: f32, max: f32, step: f32) -> Self {
        Self {
            name,
            angle: angle.clamp(min, max),
            kind: JointKind::Clamped { min, max },
            step,
        }
    }

    /// Creates a wrapped joint. The initial angle is normalized into `[0, 360)`.
    pub fn wrapped(name: &'static str, angle: f32, step: f32) -> Self {
        Self {
            name,
            angle: angle.rem_euclid(360.0),
            kind: JointKind::Wrapped,
            step,
        }
    }

    /// The joint's display name, used in pose dumps.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current angle in degrees. Always within the joint's declared domain.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Moves the angle one step in `direction`, then re-applies the domain
    /// policy. The result is always in-domain, no matter how many times the
    /// joint has been driven against a bound.
    pub fn adjust(&mut self, direction: Direction) {
        let delta = match direction {
            Direction::Increase => self.step,
            Direction::Decrease => -self.step,
        };
        self.angle = match self.kind {
            JointKind::Clamped { min, max } => (self.angle + delta).clamp(min, max),
            JointKind::Wrapped => (self.angle + delta).rem_euclid(360.0),
        };
    }
}

/// Identifies one joint of the default arm. A closed set: commands dispatch
/// over it exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JointId {
    BaseYaw,
    UpperArm,
    LowerArm,
    WristPitch,
    WristRoll,
    FingerOpen,
}

impl JointId {
    /// All joints, in the order pose dumps report them.
    pub const ALL: [JointId; 6] = [
        JointId::BaseYaw,
        JointId::UpperArm,
        JointId::LowerArm,
        JointId::WristPitch,
        JointId::WristRoll,
        JointId::FingerOpen,
    ];
}

/// The mutable joint state of an arm. This is the only state that persists
/// across frames; it is written between frames by command application and
/// read-only during traversal.
#[derive(Clone, Debug)]
pub struct Pose {
    base_yaw: Joint,
    upper_arm: Joint,
    lower_arm: Joint,
    wrist_pitch: Joint,
    wrist_roll: Joint,
    finger_open: Joint,
}

impl Pose {
    /// The default arm's resting pose, with the joint catalogue:
    ///
    /// | joint       | kind                | step  |
    /// |-------------|---------------------|-------|
    /// | base yaw    | wrapped             | 11.25 |
    /// | upper arm   | clamped [-90, 0]    | 11.25 |
    /// | lower arm   | clamped [0, 146.25] | 11.25 |
    /// | wrist pitch | clamped [0, 90]     | 11.25 |
    /// | wrist roll  | wrapped             | 11.25 |
    /// | finger open | clamped [9, 180]    | 9.0   |
    pub fn arm_rest() -> Self {
        const STEP: f32 = 11.25;
        Self {
            base_yaw: Joint::wrapped("base yaw", -45.0, STEP),
            upper_arm: Joint::clamped("upper arm", -33.75, -90.0, 0.0, STEP),
            lower_arm: Joint::clamped("lower arm", 146.25, 0.0, 146.25, STEP),
            wrist_pitch: Joint::clamped("wrist pitch", 67.5, 0.0, 90.0, STEP),
            wrist_roll: Joint::wrapped("wrist roll", 0.0, STEP),
            finger_open: Joint::clamped("finger open", 180.0, 9.0, 180.0, 9.0),
        }
    }

    pub fn joint(&self, id: JointId) -> &Joint {
        match id {
            JointId::BaseYaw => &self.base_yaw,
            JointId::UpperArm => &self.upper_arm,
            JointId::LowerArm => &self.lower_arm,
            JointId::WristPitch => &self.wrist_pitch,
            JointId::WristRoll => &self.wrist_roll,
            JointId::FingerOpen => &self.finger_open,
        }
    }

    pub fn joint_mut(&mut self, id: JointId) -> &mut Joint {
        match id {
            JointId::BaseYaw => &mut self.base_yaw,
            JointId::UpperArm => &mut self.upper_arm,
            JointId::LowerArm => &mut self.lower_arm,
            JointId::WristPitch => &mut self.wrist_pitch,
            JointId::WristRoll => &mut self.wrist_roll,
            JointId::FingerOpen => &mut self.finger_open,
        }
    }

    /// Current angle of `id` in degrees.
    pub fn angle(&self, id: JointId) -> f32 {
        self.joint(id).angle()
    }

    /// Steps `id` in `direction`, respecting its domain policy.
    pub fn adjust(&mut self, id: JointId, direction: Direction) {
        self.joint_mut(id).adjust(direction);
    }

    /// `(name, angle)` for every joint, in [`JointId::ALL`] order.
    pub fn angles(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        JointId::ALL.iter().map(|&id| {
            let joint = self.joint(id);
            (joint.name(), joint.angle())
        })
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::arm_rest()
    }
}
