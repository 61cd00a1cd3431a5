use egui_winit::winit::{event::WindowEvent, window::Window};
use egui_winit::egui::{self, FullOutput};

mod renderer;
mod textures;

pub mod fonts;
pub mod theme;

pub use fonts::{FontPaths, FontSet, PushedFont};

pub mod prelude {
	pub use egui_winit::egui;
	pub use egui::epaint;
	pub use egui::emath;
}


/// Binds an egui context to a winit window and paints its output with OpenGL.
pub struct Integration {
	state: egui_winit::State,
	ctx: egui::Context,

	renderer: renderer::Renderer,
}

impl Integration {
	/// `gl` must be current for `window`.
	pub fn new(ctx: egui::Context, window: &Window, gl: &gl::Gl, native_pixels_per_point: f32) -> anyhow::Result<Integration> {
		let renderer = renderer::Renderer::new(gl)?;

		let state = egui_winit::State::new(
			ctx.clone(),
			egui::ViewportId::ROOT,
			window,
			Some(native_pixels_per_point),
			window.theme(),
			Some(renderer.max_texture_side()),
		);

		Ok(Integration { state, ctx, renderer })
	}

	// Returns whether or not egui wants to consume the event
	pub fn on_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
		self.state.on_window_event(window, event).consumed
	}

	pub fn take_input(&mut self, window: &Window) -> egui::RawInput {
		self.state.take_egui_input(window)
	}

	/// Applies platform output, then clears the backbuffer and paints the frame's shapes into it.
	pub fn paint(&mut self, gl: &gl::Gl, window: &Window, output: FullOutput, clear_color: [f32; 4]) {
		let FullOutput { platform_output, textures_delta, shapes, pixels_per_point, .. } = output;
		self.state.handle_platform_output(window, platform_output);

		let primitives = self.ctx.tessellate(shapes, pixels_per_point);
		let screen_size: [u32; 2] = window.inner_size().into();

		self.renderer.clear(gl, screen_size, clear_color);
		self.renderer.apply_textures(gl, &textures_delta.set);
		self.renderer.paint_triangles(gl, screen_size, pixels_per_point, &primitives);
		self.renderer.free_textures(gl, &textures_delta.free);
	}

	/// Releases every GL object owned by the painter. The context must still be current.
	pub fn destroy(&mut self, gl: &gl::Gl) {
		self.renderer.destroy(gl);
	}
}
