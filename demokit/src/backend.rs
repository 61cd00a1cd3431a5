use crate::prelude::*;

use std::time::Duration;

mod gl;
pub mod headless;

pub use self::gl::GlBackend;
pub use headless::HeadlessBackend;


/// Window, graphics context and UI bindings as seen by the [`FrameHost`](crate::FrameHost).
///
/// Methods are listed in the order the host calls them. Everything happens on the thread that
/// created the backend.
pub trait Backend {
	fn scale_factor(&self) -> f32;

	/// Binds platform input and the painter to `ctx`. On failure the host stays uninitialized,
	/// but still releases the window on teardown.
	fn bind_ui(&mut self, ctx: &egui::Context, scale_factor: f32) -> anyhow::Result<()>;


	/// Dispatches pending platform events without blocking.
	fn poll_events(&mut self);

	fn framebuffer_size(&self) -> [u32; 2];
	fn is_minimized(&self) -> bool;
	fn close_requested(&self) -> bool;

	/// Called instead of a frame while there is nothing to draw into.
	fn idle(&mut self, duration: Duration) {
		std::thread::sleep(duration);
	}

	fn take_ui_input(&mut self) -> egui::RawInput;

	/// Handles platform output, clears the framebuffer to `clear_color` and paints `output`.
	fn render(&mut self, ctx: &egui::Context, output: egui::FullOutput, clear_color: [f32; 4]);

	/// Only called when multi-viewport support is enabled.
	fn update_platform_windows(&mut self, _viewports: &egui::ViewportIdMap<egui::ViewportOutput>) {}

	fn swap_buffers(&mut self);


	fn shutdown_renderer(&mut self);
	fn shutdown_platform(&mut self);
	fn release_window(&mut self);

	/// Shuts the windowing subsystem down. Only called for fully initialized hosts, after
	/// [`release_window`](Backend::release_window).
	fn terminate(&mut self);
}
