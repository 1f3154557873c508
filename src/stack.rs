//! Scoped matrix stack for composing nested local-to-parent transforms.
//!
//! [`TransformStack`] maintains a current 4×4 affine transform plus a save
//! list. Every operation right-multiplies the current matrix, so transforms
//! compose in the order callers apply them: translate-then-rotate-then-scale
//! inside one scope yields `T · R · S`, the standard local-to-parent
//! convention. Joint semantics in [`crate::armature`] depend on exactly this
//! order.
//!
//! The [`scoped`](TransformStack::scoped) combinator is what makes a single
//! stack safe to thread through a recursive traversal: it pushes a copy of
//! the current matrix, runs the enclosed action, and restores the pre-scope
//! matrix on *every* exit path — normal return or propagated error — before
//! handing the result back.
//!
//! # Example
//!
//! ```
//! use armature::{TransformStack, Vec3};
//!
//! let mut stack = TransformStack::new();
//! stack.translate(Vec3::new(0.0, 0.0, -10.0));
//!
//! let _ = stack.scoped(|s| {
//!     s.rotate_y(45.0);
//!     s.scale(Vec3::new(1.0, 1.0, 3.0));
//!     // s.top() is the fully composed matrix here
//!     Ok::<(), std::convert::Infallible>(())
//! });
//!
//! // The rotation and scale are gone; only the translation remains.
//! ```

use glam::{Mat4, Vec3};

/// A matrix stack with guaranteed push/pop balance around scoped actions.
///
/// Cheap to create; traversals make a fresh one per frame and discard it.
#[derive(Clone, Debug)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::new(),
        }
    }
}

impl TransformStack {
    /// Creates a stack whose current matrix is the identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current composed transform.
    pub fn top(&self) -> Mat4 {
        self.current
    }

    /// Number of saved matrices. Equal before and after any `scoped` call.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Right-multiplies the current matrix by a rotation about X.
    ///
    /// The angle is in degrees, matching how joint state is stored.
    pub fn rotate_x(&mut self, angle_deg: f32) {
        self.current *= Mat4::from_rotation_x(angle_deg.to_radians());
    }

    /// Right-multiplies the current matrix by a rotation about Y.
    pub fn rotate_y(&mut self, angle_deg: f32) {
        self.current *= Mat4::from_rotation_y(angle_deg.to_radians());
    }

    /// Right-multiplies the current matrix by a rotation about Z.
    pub fn rotate_z(&mut self, angle_deg: f32) {
        self.current *= Mat4::from_rotation_z(angle_deg.to_radians());
    }

    /// Right-multiplies the current matrix by a translation.
    pub fn translate(&mut self, offset: Vec3) {
        self.current *= Mat4::from_translation(offset);
    }

    /// Right-multiplies the current matrix by a non-uniform diagonal scale.
    pub fn scale(&mut self, factors: Vec3) {
        self.current *= Mat4::from_scale(factors);
    }

    /// Runs `action` inside a scope.
    ///
    /// A copy of the current matrix is pushed before the action runs and the
    /// pre-scope matrix is restored afterwards, whether the action returned
    /// `Ok` or `Err`. Restoration is unconditional; the action's result is
    /// returned untouched, so errors still propagate to the caller.
    pub fn scoped<T, E>(
        &mut self,
        action: impl FnOnce(&mut TransformStack) -> Result<T, E>,
    ) -> Result<T, E> {
        self.saved.push(self.current);
        let result = action(self);
        // Cannot be empty: the push above is unmatched until here.
        if let Some(saved) = self.saved.pop() {
            self.current = saved;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn composition_order_matches_reference_product() {
        let mut stack = TransformStack::new();
        stack.translate(Vec3::new(3.0, -5.0, -40.0));
        stack.rotate_y(-45.0);

        let mut inner = Mat4::IDENTITY;
        stack
            .scoped(|s| {
                s.translate(Vec3::new(2.0, 0.0, 0.0));
                s.scale(Vec3::new(1.0, 1.0, 3.0));
                inner = s.top();
                Ok::<(), std::convert::Infallible>(())
            })
            .unwrap();

        let reference = Mat4::from_translation(Vec3::new(3.0, -5.0, -40.0))
            * Mat4::from_rotation_y((-45.0f32).to_radians())
            * Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0))
            * Mat4::from_scale(Vec3::new(1.0, 1.0, 3.0));

        assert_mat4_eq(inner, reference, 1e-5);
    }

    #[test]
    fn scoped_restores_on_normal_exit() {
        let mut stack = TransformStack::new();
        stack.translate(Vec3::new(1.0, 2.0, 3.0));
        let before = stack.top();

        stack
            .scoped(|s| {
                s.rotate_x(90.0);
                s.scale(Vec3::splat(2.0));
                Ok::<(), std::convert::Infallible>(())
            })
            .unwrap();

        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.top(), before);
    }

    #[test]
    fn scoped_restores_before_propagating_error() {
        let mut stack = TransformStack::new();
        stack.rotate_z(30.0);
        let before = stack.top();

        let result: Result<(), &str> = stack.scoped(|s| {
            s.translate(Vec3::new(5.0, 0.0, 0.0));
            Err("leaf draw failed")
        });

        assert_eq!(result, Err("leaf draw failed"));
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.top(), before);
    }

    #[test]
    fn nested_scopes_stay_balanced() {
        let mut stack = TransformStack::new();
        let before = stack.top();

        stack
            .scoped(|s| {
                s.translate(Vec3::new(0.0, 1.0, 0.0));
                s.scoped(|s| {
                    s.rotate_y(10.0);
                    s.scoped(|s| {
                        s.scale(Vec3::new(0.5, 0.5, 4.0));
                        assert_eq!(s.depth(), 3);
                        Ok::<(), std::convert::Infallible>(())
                    })
                })
            })
            .unwrap();

        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.top(), before);
    }

    #[test]
    fn inner_failure_restores_every_enclosing_scope() {
        let mut stack = TransformStack::new();
        stack.translate(Vec3::new(0.0, 0.0, -8.0));
        let before = stack.top();

        let result: Result<(), ()> = stack.scoped(|s| {
            s.rotate_x(45.0);
            s.scoped(|s| {
                s.translate(Vec3::new(0.0, 0.0, 2.5));
                Err(())
            })
        });

        assert!(result.is_err());
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.top(), before);
    }
}
