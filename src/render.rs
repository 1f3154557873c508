//! The seam between armature traversal and whatever actually draws.
//!
//! Traversal knows nothing about the GPU. At every leaf it hands a fully
//! composed world matrix plus a [`MeshId`] to a [`RenderBackend`]; the
//! production backend is [`DrawQueue`], which records the calls for the GPU
//! pass to consume after traversal finishes. Tests substitute their own
//! backends (recording, failing) through the same trait.

use glam::Mat4;
use std::convert::Infallible;

/// Type-safe handle to a mesh registered with the render pass.
///
/// Prevents mixing mesh indices up with other integers at compile time.
/// The default handle names the first registered mesh, which is convenient
/// for headless use where no mesh is ever uploaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

/// Consumes one leaf draw: a world matrix and the mesh to draw with it.
///
/// A failing draw is the backend's concern; the traversal propagates the
/// error but its transform stack is restored regardless (see
/// [`TransformStack::scoped`](crate::TransformStack::scoped)).
pub trait RenderBackend {
    type Error;

    fn draw(&mut self, world: Mat4, mesh: MeshId) -> Result<(), Self::Error>;
}

/// Records draw calls for later submission to the GPU.
///
/// Cleared and refilled every frame. Recording cannot fail, so the error
/// type is [`Infallible`].
#[derive(Clone, Debug, Default)]
pub struct DrawQueue {
    calls: Vec<(MeshId, Mat4)>,
}

impl DrawQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all recorded calls. Call at the start of each frame.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// The recorded `(mesh, world matrix)` pairs, in emission order.
    pub fn calls(&self) -> &[(MeshId, Mat4)] {
        &self.calls
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }
}

impl RenderBackend for DrawQueue {
    type Error = Infallible;

    fn draw(&mut self, world: Mat4, mesh: MeshId) -> Result<(), Infallible> {
        self.calls.push((mesh, world));
        Ok(())
    }
}
