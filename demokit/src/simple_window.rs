use crate::prelude::*;
use crate::{Activity, FrameHost, Renderable};


/// Fills the main window with `contents` followed by a frame time readout.
///
/// Pressing Escape closes the host.
pub struct SimpleWindow<F> {
	contents: F,
	activity: Activity,
}

impl<F> SimpleWindow<F>
	where F: FnMut(&mut egui::Ui)
{
	pub fn new(contents: F) -> SimpleWindow<F> {
		SimpleWindow {
			contents,
			activity: Activity::new(),
		}
	}
}

impl<F> Renderable for SimpleWindow<F>
	where F: FnMut(&mut egui::Ui)
{
	fn draw(&mut self, host: &mut FrameHost) {
		let Some(ctx) = host.ui().cloned() else {
			return
		};

		let timing = host.timing();
		let frame_ms = timing.average_frame_ms();
		let framerate = timing.framerate();

		egui::CentralPanel::default()
			.frame(egui::Frame::central_panel(&ctx.style()))
			.show(&ctx, |ui| {
				(self.contents)(ui);

				ui.separator();
				ui.label(format!("Application average {frame_ms:.3} ms/frame ({framerate:.1} FPS)"));
			});

		if ctx.input(|input| input.key_pressed(egui::Key::Escape)) {
			host.close();
		}
	}

	fn activity(&self) -> &Activity { &self.activity }
}
