use crate::prelude::*;
use crate::backend::{Backend, GlBackend};
use crate::{FrameTiming, HostSettings, Renderable};

use egui_backend::{fonts, theme};

use std::time::Instant;


/// Owns one window, the egui context bound to it and the [`Renderable`]s drawn into it.
///
/// If any part of window creation fails the host is left uninitialized: the failure is logged,
/// [`is_initialized`](FrameHost::is_initialized) reports false, and `run` and `add_renderable`
/// do nothing.
///
/// The host is not `Clone`, and neither it nor its renderables may leave the thread that created it.
pub struct FrameHost {
	options: WindowOptions,
	settings: HostSettings,

	backend: Option<Box<dyn Backend>>,
	ui: Option<egui::Context>,
	fonts: FontSet,

	renderables: Vec<Box<dyn Renderable>>,
	deferred: Vec<Box<dyn Renderable>>,
	sweep_len: Option<usize>,

	initialized: bool,
	running: bool,

	timing: FrameTiming,
}

impl FrameHost {
	/// Opens a GL window.
	pub fn new(options: WindowOptions, settings: HostSettings) -> FrameHost {
		let vsync = settings.vsync;

		FrameHost::with_backend(options, settings, move |options| {
			let backend: Box<dyn Backend> = Box::new(GlBackend::create(options, vsync)?);
			Ok(backend)
		})
	}

	#[instrument(skip_all, name="frame host create", fields(title=%options.title))]
	pub fn with_backend<F>(options: WindowOptions, settings: HostSettings, create_backend: F) -> FrameHost
		where F: FnOnce(&WindowOptions) -> anyhow::Result<Box<dyn Backend>>
	{
		let mut frame_host = FrameHost {
			options,
			settings,

			backend: None,
			ui: None,
			fonts: FontSet::default(),

			renderables: Vec::new(),
			deferred: Vec::new(),
			sweep_len: None,

			initialized: false,
			running: false,

			timing: FrameTiming::new(),
		};

		let mut backend = match create_backend(&frame_host.options) {
			Ok(backend) => backend,
			Err(err) => {
				log::error!("{err:#}");
				return frame_host
			}
		};

		let scale_factor = backend.scale_factor();

		let ui = egui::Context::default();
		theme::apply_modern_dark(&ui);

		let ui_scale = frame_host.settings.ui_scale;
		if ui_scale != 1.0 {
			ui.style_mut(|style| theme::scale_style(style, ui_scale));
		}

		let bind_result = backend.bind_ui(&ui, scale_factor);

		frame_host.backend = Some(backend);
		frame_host.ui = Some(ui.clone());

		if let Err(err) = bind_result {
			log::error!("Failed to bind UI to window: {err:#}");
			return frame_host
		}

		frame_host.fonts = fonts::install_fonts(&ui, &frame_host.settings.fonts);
		frame_host.initialized = true;

		frame_host
	}

	pub fn is_initialized(&self) -> bool {
		self.initialized
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn options(&self) -> &WindowOptions {
		&self.options
	}

	pub fn settings(&self) -> &HostSettings {
		&self.settings
	}

	/// The UI context, present from window creation until teardown.
	pub fn ui(&self) -> Option<&egui::Context> {
		self.ui.as_ref()
	}

	pub fn timing(&self) -> &FrameTiming {
		&self.timing
	}

	pub fn default_font(&self) -> egui::FontFamily {
		self.fonts.default_font()
	}

	/// Falls back to the default font if the regular font failed to load.
	pub fn regular_font(&self) -> egui::FontFamily {
		self.fonts.regular()
	}

	/// Falls back to the default font if the bold font failed to load.
	pub fn bold_font(&self) -> egui::FontFamily {
		self.fonts.bold()
	}

	/// Body text size, in points, of the regular font pushed for every sweep.
	pub fn font_size(&self) -> f32 {
		self.fonts.size()
	}

	/// Stops [`run`](FrameHost::run) once the current iteration finishes.
	pub fn close(&mut self) {
		self.running = false;
	}
}


impl FrameHost {
	/// Takes ownership of `renderable` and appends it to the draw order.
	///
	/// Called from inside a [`Renderable::draw`], the renderable is held back until the current
	/// sweep has finished and is first drawn the following frame.
	pub fn add_renderable<R>(&mut self, renderable: R)
		where R: Renderable + 'static
	{
		self.add_boxed_renderable(Box::new(renderable));
	}

	pub fn add_boxed_renderable(&mut self, renderable: Box<dyn Renderable>) {
		if !self.initialized {
			log::warn!("Ignoring renderable added to a host without a window");
			return
		}

		match self.sweep_len {
			Some(_) => self.deferred.push(renderable),
			None => self.renderables.push(renderable),
		}
	}

	/// During a sweep this counts the registry as it was when the sweep started, plus anything
	/// added since.
	pub fn renderable_count(&self) -> usize {
		match self.sweep_len {
			Some(sweep_len) => sweep_len + self.deferred.len(),
			None => self.renderables.len(),
		}
	}

	/// Draws every active renderable once, in registration order, and drops the inactive ones
	/// without drawing them.
	#[instrument(skip_all, name="renderable sweep")]
	pub fn sweep(&mut self) {
		if self.sweep_len.is_some() {
			log::warn!("Ignoring sweep requested from inside a sweep");
			return
		}

		let mut renderables = std::mem::take(&mut self.renderables);
		self.sweep_len = Some(renderables.len());

		renderables.retain_mut(|renderable| {
			if !renderable.is_active() {
				log::debug!("Removing inactive renderable");
				return false
			}

			renderable.draw(self);
			true
		});

		self.sweep_len = None;

		renderables.append(&mut self.deferred);
		self.renderables = renderables;
	}
}


impl FrameHost {
	/// Runs frames until [`close`](FrameHost::close) is called or the platform asks the window to
	/// close. Returns immediately if the host has no window.
	#[instrument(skip_all, name="frame host run")]
	pub fn run(&mut self) {
		if !self.initialized {
			log::error!("Run() called but window is not properly initialized");
			return
		}

		if self.running {
			log::warn!("Ignoring nested run");
			return
		}

		self.running = true;

		while self.running && !self.close_requested() {
			self.run_frame();
		}

		self.running = false;
	}

	fn close_requested(&self) -> bool {
		self.backend.as_ref().is_none_or(|backend| backend.close_requested())
	}

	pub(crate) fn run_frame(&mut self) {
		let Some(backend) = self.backend.as_deref_mut() else {
			return
		};

		backend.poll_events();

		let [width, height] = backend.framebuffer_size();
		if width == 0 || height == 0 || backend.is_minimized() {
			backend.idle(self.settings.idle_interval);
			return
		}

		let input = backend.take_ui_input();

		let Some(ui) = self.ui.clone() else {
			return
		};

		ui.begin_pass(input);

		let pushed_font = fonts::push_font(&ui, &self.fonts.regular(), self.fonts.size());
		self.sweep();
		fonts::pop_font(&ui, pushed_font);

		let mut output = ui.end_pass();
		let viewport_output = std::mem::take(&mut output.viewport_output);

		let Some(backend) = self.backend.as_deref_mut() else {
			return
		};

		backend.render(&ui, output, self.settings.clear_color);

		if self.settings.multi_viewport {
			backend.update_platform_windows(&viewport_output);
		}

		backend.swap_buffers();

		self.timing.tick(Instant::now());
	}
}


impl FrameHost {
	/// Releases the UI context and the window. Safe to call more than once, and on hosts that
	/// never finished initializing.
	#[instrument(skip_all, name="frame host teardown")]
	pub fn teardown(&mut self) {
		let Some(mut backend) = self.backend.take() else {
			return
		};

		log::debug!("Shutting down renderer");
		backend.shutdown_renderer();

		log::debug!("Shutting down platform bindings");
		backend.shutdown_platform();

		self.ui = None;

		log::debug!("Releasing window");
		backend.release_window();

		if self.initialized {
			log::debug!("Terminating windowing subsystem");
			backend.terminate();
		}

		self.initialized = false;
		self.running = false;
	}
}

impl Drop for FrameHost {
	fn drop(&mut self) {
		self.teardown();
	}
}
