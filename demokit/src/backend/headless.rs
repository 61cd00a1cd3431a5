//! A windowless [`Backend`] for tests and offscreen runs.
//!
//! Every call the host makes is appended to a shared [`EventLog`], and the window state it reports
//! can be scripted per poll.

use crate::prelude::*;
use crate::Backend;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;


#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
	BindUi { scale_factor: f32 },
	PollEvents,
	Idle(Duration),
	TakeUiInput,
	Render { clear_color: [f32; 4] },
	UpdatePlatformWindows,
	SwapBuffers,
	ShutdownRenderer,
	ShutdownPlatform,
	ReleaseWindow,
	Terminate,
}

impl BackendEvent {
	pub fn is_frame(&self) -> bool {
		matches!(self, BackendEvent::SwapBuffers)
	}
}


/// Shared handle to the calls recorded by a [`HeadlessBackend`].
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<BackendEvent>>>);

impl EventLog {
	fn push(&self, event: BackendEvent) {
		self.0.borrow_mut().push(event);
	}

	pub fn events(&self) -> Vec<BackendEvent> {
		self.0.borrow().clone()
	}

	pub fn count(&self, predicate: impl Fn(&BackendEvent) -> bool) -> usize {
		self.0.borrow().iter().filter(|&event| predicate(event)).count()
	}

	pub fn frames(&self) -> usize {
		self.count(BackendEvent::is_frame)
	}

	pub fn contains(&self, event: &BackendEvent) -> bool {
		self.0.borrow().contains(event)
	}

	pub fn clear(&self) {
		self.0.borrow_mut().clear();
	}
}


pub struct HeadlessBackend {
	log: EventLog,

	scale_factor: f32,
	framebuffer_size: [u32; 2],

	minimized_polls: usize,
	zero_size_polls: usize,
	close_after_polls: Option<usize>,
	fail_bind: bool,

	scripted_input: HashMap<usize, Vec<egui::Event>>,

	polls: usize,
	inputs_taken: usize,
	window_released: bool,
}

impl Default for HeadlessBackend {
	fn default() -> HeadlessBackend {
		HeadlessBackend {
			log: EventLog::default(),

			scale_factor: 1.0,
			framebuffer_size: [800, 600],

			minimized_polls: 0,
			zero_size_polls: 0,
			close_after_polls: None,
			fail_bind: false,

			scripted_input: HashMap::new(),

			polls: 0,
			inputs_taken: 0,
			window_released: false,
		}
	}
}

impl HeadlessBackend {
	pub fn new() -> HeadlessBackend {
		HeadlessBackend::default()
	}

	/// Handle to the recorded calls. Grab it before handing the backend to the host.
	pub fn event_log(&self) -> EventLog {
		self.log.clone()
	}

	pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
		self.scale_factor = scale_factor;
		self
	}

	pub fn with_framebuffer_size(mut self, size: [u32; 2]) -> Self {
		self.framebuffer_size = size;
		self
	}

	/// The first `polls` polls report a minimized window.
	pub fn minimized_for(mut self, polls: usize) -> Self {
		self.minimized_polls = polls;
		self
	}

	/// The first `polls` polls report a zero sized framebuffer.
	pub fn zero_sized_for(mut self, polls: usize) -> Self {
		self.zero_size_polls = polls;
		self
	}

	/// The platform requests close once `polls` polls have happened.
	pub fn close_after_polls(mut self, polls: usize) -> Self {
		self.close_after_polls = Some(polls);
		self
	}

	pub fn failing_bind(mut self) -> Self {
		self.fail_bind = true;
		self
	}

	/// Delivers `events` with the UI input of frame `frame`, counting from zero.
	pub fn with_input(mut self, frame: usize, events: Vec<egui::Event>) -> Self {
		self.scripted_input.entry(frame).or_default().extend(events);
		self
	}

	pub fn boxed(self) -> Box<dyn Backend> {
		Box::new(self)
	}
}

impl Backend for HeadlessBackend {
	fn scale_factor(&self) -> f32 {
		self.scale_factor
	}

	fn bind_ui(&mut self, _: &egui::Context, scale_factor: f32) -> anyhow::Result<()> {
		self.log.push(BackendEvent::BindUi { scale_factor });
		anyhow::ensure!(!self.fail_bind, "Headless UI binding refused");
		Ok(())
	}

	fn poll_events(&mut self) {
		self.polls += 1;
		self.log.push(BackendEvent::PollEvents);
	}

	fn framebuffer_size(&self) -> [u32; 2] {
		if self.window_released || self.polls <= self.zero_size_polls {
			[0, 0]
		} else {
			self.framebuffer_size
		}
	}

	fn is_minimized(&self) -> bool {
		self.polls <= self.minimized_polls
	}

	fn close_requested(&self) -> bool {
		self.window_released
			|| self.close_after_polls.is_some_and(|limit| self.polls >= limit)
	}

	fn idle(&mut self, duration: Duration) {
		self.log.push(BackendEvent::Idle(duration));
	}

	fn take_ui_input(&mut self) -> egui::RawInput {
		self.log.push(BackendEvent::TakeUiInput);

		let [width, height] = self.framebuffer_size;
		let screen_size = egui::vec2(width as f32, height as f32) / self.scale_factor;

		let events = self.scripted_input.remove(&self.inputs_taken).unwrap_or_default();
		self.inputs_taken += 1;

		egui::RawInput {
			screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, screen_size)),
			events,
			..egui::RawInput::default()
		}
	}

	fn render(&mut self, _: &egui::Context, _: egui::FullOutput, clear_color: [f32; 4]) {
		self.log.push(BackendEvent::Render { clear_color });
	}

	fn update_platform_windows(&mut self, _: &egui::ViewportIdMap<egui::ViewportOutput>) {
		self.log.push(BackendEvent::UpdatePlatformWindows);
	}

	fn swap_buffers(&mut self) {
		self.log.push(BackendEvent::SwapBuffers);
	}

	fn shutdown_renderer(&mut self) {
		self.log.push(BackendEvent::ShutdownRenderer);
	}

	fn shutdown_platform(&mut self) {
		self.log.push(BackendEvent::ShutdownPlatform);
	}

	fn release_window(&mut self) {
		self.window_released = true;
		self.log.push(BackendEvent::ReleaseWindow);
	}

	fn terminate(&mut self) {
		self.log.push(BackendEvent::Terminate);
	}
}
