pub use gl;
pub use winit;
pub use glutin;

use winit::{
	application::ApplicationHandler,
	dpi::LogicalSize,
	event::WindowEvent,
	event_loop::{ActiveEventLoop, EventLoop},
	platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
	window::WindowId,
};

use glutin_winit::{DisplayBuilder, GlWindow};

use glutin::prelude::*;
use glutin::config::{Api, ConfigTemplateBuilder};
use glutin::display::GetGlDisplay;
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, Version};
use glutin::surface::{SurfaceAttributesBuilder, SwapInterval, WindowSurface};

use raw_window_handle::HasWindowHandle;

use anyhow::Context;
use tracing::instrument;

use std::ffi::CString;
use std::num::NonZeroU32;
use std::time::Duration;

pub mod logging;

pub mod prelude {
	pub use gl;
	pub use winit;
	pub use glutin;

	pub use glutin::prelude::*;
}


pub use winit::window::Window;

pub type Surface = glutin::surface::Surface<WindowSurface>;
pub type GlContext = glutin::context::PossiblyCurrentContext;


/// Options for creating a [`Host`] window.
///
/// `width` and `height` are logical sizes, the platform scales them by the display scale factor.
#[derive(Debug, Clone)]
pub struct WindowOptions {
	pub title: String,
	pub width: u16,
	pub height: u16,
}

impl WindowOptions {
	pub fn new(title: impl Into<String>, width: u16, height: u16) -> WindowOptions {
		WindowOptions { title: title.into(), width, height }
	}
}


/// A native window with a current OpenGL 4.5 core context.
///
/// Fields are declared in teardown order: the context goes before the surface it is current on,
/// the surface before the window, and the event loop last.
pub struct Host {
	pub gl: gl::Gl,
	pub gl_context: GlContext,
	pub surface: Surface,
	pub window: Window,

	scale_factor: f32,
	close_requested: bool,

	event_loop: EventLoop<()>,
}


impl Host {
	#[instrument(skip_all, name="host create", fields(title=%options.title))]
	pub fn create(options: &WindowOptions, vsync: bool) -> anyhow::Result<Host> {
		let event_loop = EventLoop::new()
			.context("Failed to initialize windowing subsystem")?;

		let window_attributes = Window::default_attributes()
			.with_title(options.title.as_str())
			.with_inner_size(LogicalSize::new(options.width as f64, options.height as f64));

		let config_template = ConfigTemplateBuilder::new()
			.with_api(Api::OPENGL)
			.with_alpha_size(8);

		// Try to create our window and a config that describes a context we can create
		let (maybe_window, config) = DisplayBuilder::new()
			.with_window_attributes(Some(window_attributes))
			.build(&event_loop, config_template, pick_config)
			.map_err(|e| anyhow::format_err!("Failed to create window: {e}"))?;

		let Some(window) = maybe_window else {
			anyhow::bail!("Failed to create window")
		};

		// Wayland can't name a primary monitor, so the monitor the window landed on stands in for it.
		let monitor = window.primary_monitor()
			.or_else(|| window.current_monitor())
			.context("Failed to get primary monitor")?;

		let scale_factor = monitor.scale_factor() as f32;

		let raw_window_handle = window.window_handle()
			.map_err(|e| anyhow::format_err!("Window has no usable handle: {e}"))?
			.as_raw();

		let context_attributes = ContextAttributesBuilder::new()
			.with_debug(cfg!(debug_assertions))
			.with_profile(GlProfile::Core)
			.with_context_api(ContextApi::OpenGl(Some(Version::new(4, 5))))
			.build(Some(raw_window_handle));

		let display = config.display();

		let gl_context = unsafe {
			display.create_context(&config, &context_attributes)
				.context("Failed to create OpenGL 4.5 context")?
		};

		let surface_attributes = window.build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new())
			.map_err(|e| anyhow::format_err!("Window has no usable handle: {e}"))?;

		let surface = unsafe {
			display.create_window_surface(&config, &surface_attributes)
				.context("Failed to create window surface")?
		};

		let gl_context = gl_context.make_current(&surface)
			.context("Failed to make OpenGL context current")?;

		let swap_interval = match vsync {
			true => SwapInterval::Wait(NonZeroU32::MIN),
			false => SwapInterval::DontWait,
		};

		if let Err(err) = surface.set_swap_interval(&gl_context, swap_interval) {
			log::warn!("Failed to set swap interval {swap_interval:?}: {err}");
		}

		let gl = gl::Gl::load_with(|symbol| {
			match CString::new(symbol) {
				Ok(symbol) => display.get_proc_address(symbol.as_c_str()).cast(),
				Err(_) => std::ptr::null(),
			}
		});

		log::info!("Created window '{}' at {}x{} (scale {scale_factor})",
			options.title, options.width, options.height);

		Ok(Host {
			gl,
			gl_context,
			surface,
			window,

			scale_factor,
			close_requested: false,

			event_loop,
		})
	}

	/// Scale factor of the display the window was created for.
	pub fn scale_factor(&self) -> f32 {
		self.scale_factor
	}

	/// Whether the platform has asked for the window to close.
	pub fn close_requested(&self) -> bool {
		self.close_requested
	}

	pub fn request_close(&mut self) {
		self.close_requested = true;
	}

	pub fn framebuffer_size(&self) -> [u32; 2] {
		self.window.inner_size().into()
	}

	/// Platforms which can't report minimization are treated as never minimized.
	pub fn is_minimized(&self) -> bool {
		self.window.is_minimized().unwrap_or(false)
	}

	/// Dispatches all pending platform events without blocking.
	///
	/// Close requests are latched and resizes are applied to the surface before `on_event` sees them.
	pub fn pump_events(&mut self, mut on_event: impl FnMut(&Window, &WindowEvent)) {
		let Host { event_loop, window, surface, gl_context, close_requested, .. } = self;

		let mut handler = EventHandler {
			window,
			surface,
			gl_context,
			close_requested,
			on_event: &mut on_event,
		};

		if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), &mut handler) {
			log::info!("Event loop exited with code {code}");
			self.close_requested = true;
		}
	}

	pub fn swap_buffers(&self) {
		if let Err(err) = self.surface.swap_buffers(&self.gl_context) {
			log::error!("Failed to swap buffers: {err}");
		}
	}

	/// Drops the context, surface and window, handing back the event loop so the windowing
	/// subsystem can be shut down separately.
	pub fn release_window(self) -> EventLoop<()> {
		let Host { gl_context, surface, window, event_loop, .. } = self;

		drop(gl_context);
		drop(surface);
		drop(window);

		event_loop
	}

	pub fn install_default_error_handler(&self) {
		let gl = &self.gl;

		unsafe {
			gl.DebugMessageCallback(Some(default_gl_error_handler), std::ptr::null());
			gl.Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);

			// Disable notification messages
			gl.DebugMessageControl(
				gl::DONT_CARE,
				gl::DONT_CARE,
				gl::DEBUG_SEVERITY_NOTIFICATION,
				0, std::ptr::null(),
				gl::FALSE
			);

			// Disable marker messages
			gl.DebugMessageControl(
				gl::DONT_CARE,
				gl::DEBUG_TYPE_MARKER,
				gl::DONT_CARE,
				0, std::ptr::null(),
				gl::FALSE
			);
		}
	}
}


fn pick_config(mut configs: Box<dyn Iterator<Item = glutin::config::Config> + '_>) -> glutin::config::Config {
	let first = configs.next()
		.expect("glutin only calls the config picker with at least one config");

	// Prefer a config without multisampling, egui does its own anti-aliasing.
	configs.fold(first, |best, config| {
		if config.num_samples() < best.num_samples() { config } else { best }
	})
}


struct EventHandler<'h, F> {
	window: &'h Window,
	surface: &'h Surface,
	gl_context: &'h GlContext,
	close_requested: &'h mut bool,
	on_event: &'h mut F,
}

impl<F> ApplicationHandler for EventHandler<'_, F>
	where F: FnMut(&Window, &WindowEvent)
{
	fn resumed(&mut self, _: &ActiveEventLoop) {}

	fn window_event(&mut self, _: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
		if window_id != self.window.id() {
			return
		}

		match &event {
			WindowEvent::CloseRequested => {
				*self.close_requested = true;
			}

			WindowEvent::Resized(size) => {
				if let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
					self.surface.resize(self.gl_context, width, height);
				}
			}

			_ => {}
		}

		(self.on_event)(self.window, &event);
	}
}


extern "system" fn default_gl_error_handler(source: u32, ty: u32, _id: u32, severity: u32,
	_length: i32, msg: *const std::ffi::c_char, _ud: *mut std::ffi::c_void)
{
	let severity_str = match severity {
		gl::DEBUG_SEVERITY_HIGH => "high",
		gl::DEBUG_SEVERITY_MEDIUM => "medium",
		gl::DEBUG_SEVERITY_LOW => "low",
		_ => return,
	};

	let ty_str = match ty {
		gl::DEBUG_TYPE_ERROR => "error",
		gl::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "deprecated behaviour",
		gl::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "undefined behaviour",
		gl::DEBUG_TYPE_PORTABILITY => "portability",
		gl::DEBUG_TYPE_PERFORMANCE => "performance",
		_ => "other",
	};

	let source = match source {
		gl::DEBUG_SOURCE_API => "api",
		gl::DEBUG_SOURCE_WINDOW_SYSTEM => "window system",
		gl::DEBUG_SOURCE_SHADER_COMPILER => "shader compiler",
		gl::DEBUG_SOURCE_THIRD_PARTY => "third party",
		gl::DEBUG_SOURCE_APPLICATION => "application",
		_ => "other",
	};

	let msg = unsafe { std::ffi::CStr::from_ptr(msg) }.to_string_lossy();

	match (severity, ty) {
		(gl::DEBUG_SEVERITY_HIGH, gl::DEBUG_TYPE_ERROR | gl::DEBUG_TYPE_UNDEFINED_BEHAVIOR)
			=> log::error!(target: "gl", "[{source}/{ty_str}/{severity_str}] {msg}"),

		_ => log::warn!(target: "gl", "[{source}/{ty_str}/{severity_str}] {msg}"),
	}
}
