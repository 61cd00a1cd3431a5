use crate::prelude::*;
use crate::Backend;

use host::{Host, winit::event_loop::EventLoop};
use egui_backend::Integration;

use anyhow::Context;


/// winit window with an OpenGL 4.5 context, painted by the egui GL integration.
pub struct GlBackend {
	host: Option<Host>,
	integration: Option<Integration>,
	event_loop: Option<EventLoop<()>>,
}

impl GlBackend {
	pub fn create(options: &WindowOptions, vsync: bool) -> anyhow::Result<GlBackend> {
		let host = Host::create(options, vsync)?;

		if cfg!(debug_assertions) {
			host.install_default_error_handler();
		}

		Ok(GlBackend {
			host: Some(host),
			integration: None,
			event_loop: None,
		})
	}
}

impl Backend for GlBackend {
	fn scale_factor(&self) -> f32 {
		self.host.as_ref().map_or(1.0, Host::scale_factor)
	}

	fn bind_ui(&mut self, ctx: &egui::Context, scale_factor: f32) -> anyhow::Result<()> {
		let host = self.host.as_ref()
			.context("Window was released before the UI could be bound")?;

		let integration = Integration::new(ctx.clone(), &host.window, &host.gl, scale_factor)
			.context("Failed to create egui painter")?;

		self.integration = Some(integration);
		Ok(())
	}

	fn poll_events(&mut self) {
		let GlBackend { host: Some(host), integration, .. } = self else {
			return
		};

		host.pump_events(|window, event| {
			if let Some(integration) = integration.as_mut() {
				integration.on_event(window, event);
			}
		});
	}

	fn framebuffer_size(&self) -> [u32; 2] {
		self.host.as_ref().map_or([0, 0], Host::framebuffer_size)
	}

	fn is_minimized(&self) -> bool {
		self.host.as_ref().is_some_and(Host::is_minimized)
	}

	fn close_requested(&self) -> bool {
		self.host.as_ref().is_none_or(Host::close_requested)
	}

	fn take_ui_input(&mut self) -> egui::RawInput {
		match (&self.host, &mut self.integration) {
			(Some(host), Some(integration)) => integration.take_input(&host.window),
			_ => egui::RawInput::default(),
		}
	}

	fn render(&mut self, _: &egui::Context, output: egui::FullOutput, clear_color: [f32; 4]) {
		if let (Some(host), Some(integration)) = (&self.host, &mut self.integration) {
			integration.paint(&host.gl, &host.window, output, clear_color);
		}
	}

	fn update_platform_windows(&mut self, viewports: &egui::ViewportIdMap<egui::ViewportOutput>) {
		let Some(host) = &mut self.host else {
			return
		};

		for (&viewport_id, viewport) in viewports {
			// Child viewports are embedded in the root window, so only its commands reach the platform.
			if viewport_id != egui::ViewportId::ROOT {
				continue
			}

			for command in &viewport.commands {
				match command {
					egui::ViewportCommand::Close => host.request_close(),
					egui::ViewportCommand::Title(title) => host.window.set_title(title),
					egui::ViewportCommand::Minimized(minimized) => host.window.set_minimized(*minimized),
					egui::ViewportCommand::Maximized(maximized) => host.window.set_maximized(*maximized),
					egui::ViewportCommand::Focus => host.window.focus_window(),
					command => log::trace!("Ignoring viewport command {command:?}"),
				}
			}
		}
	}

	fn swap_buffers(&mut self) {
		if let Some(host) = &self.host {
			host.swap_buffers();
		}
	}

	fn shutdown_renderer(&mut self) {
		if let (Some(host), Some(integration)) = (&self.host, &mut self.integration) {
			integration.destroy(&host.gl);
		}
	}

	fn shutdown_platform(&mut self) {
		self.integration = None;
	}

	fn release_window(&mut self) {
		if let Some(host) = self.host.take() {
			self.event_loop = Some(host.release_window());
		}
	}

	fn terminate(&mut self) {
		if self.event_loop.take().is_some() {
			log::debug!("Windowing subsystem shut down");
		}
	}
}
