//! Windowed demo application: event loop, frame pacing, and the
//! command-then-draw cadence.
//!
//! Each frame: drain every pending command from the input layer (joint state
//! only ever changes here, between traversals), rebuild the draw queue by
//! walking the arm, then render the queue with depth testing and present.

use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::arm_pass::ArmPass;
use crate::armature::Armature;
use crate::command::CommandSource;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::mesh::Mesh;
use crate::projection::Projection;
use crate::render::DrawQueue;

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    pass: Option<ArmPass>,
    arm: Option<Armature>,
    input: Input,
    queue: DrawQueue,
    projection: Projection,
}

impl Default for App {
    fn default() -> Self {
        Self {
            window: None,
            gpu: None,
            pass: None,
            arm: None,
            input: Input::new(),
            queue: DrawQueue::new(),
            projection: Projection::new(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(Window::default_attributes().with_title("armature"))
                .unwrap(),
        );

        let gpu = GpuContext::new(window.clone());
        let mut pass = ArmPass::new(&gpu);
        let cube = pass.register_mesh(Mesh::cube(&gpu));
        let arm = Armature::robot_arm(cube);

        self.gpu = Some(gpu);
        self.pass = Some(pass);
        self.arm = Some(arm);
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let (Some(gpu), Some(pass), Some(arm)) =
                    (&self.gpu, &mut self.pass, &mut self.arm)
                {
                    // Commands land strictly between frames.
                    while let Some(command) = self.input.next_command() {
                        arm.apply(command);
                    }

                    self.queue.clear();
                    arm.draw(&mut self.queue).unwrap();

                    pass.prepare(gpu, &self.queue);

                    let output = gpu.surface.get_current_texture().unwrap();
                    let view = output
                        .texture
                        .create_view(&wgpu::TextureViewDescriptor::default());

                    let mut encoder = gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

                    {
                        let mut render_pass =
                            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                                label: None,
                                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                    view: &view,
                                    resolve_target: None,
                                    ops: wgpu::Operations {
                                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                        store: wgpu::StoreOp::Store,
                                    },
                                    depth_slice: None,
                                })],
                                depth_stencil_attachment: Some(
                                    wgpu::RenderPassDepthStencilAttachment {
                                        view: &pass.depth_view,
                                        depth_ops: Some(wgpu::Operations {
                                            load: wgpu::LoadOp::Clear(1.0),
                                            store: wgpu::StoreOp::Store,
                                        }),
                                        stencil_ops: None,
                                    },
                                ),
                                timestamp_writes: None,
                                occlusion_query_set: None,
                            });

                        let clip = self.projection.matrix(gpu.aspect());
                        pass.render(gpu, &mut render_pass, clip, &self.queue);
                    }

                    gpu.queue.submit(std::iter::once(encoder.finish()));
                    output.present();
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }
}

/// Opens a window and runs the arm demo until the window closes.
///
/// # Panics
///
/// Panics if the event loop or window cannot be created.
pub fn run() {
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::default();
    event_loop.run_app(&mut app).unwrap();
}
