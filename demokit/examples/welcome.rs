use demokit::prelude::*;
use demokit::{settings, Activity, FrameHost, HostSettings, Renderable, SimpleWindow};

use std::time::{Duration, Instant};


const SPLASH_DURATION: Duration = Duration::from_secs(3);


fn main() -> anyhow::Result<()> {
	let config = cfg::Config::for_app_name("welcome")?;
	host::logging::init(settings::log_settings(&config));

	let options = settings::configure_window(&config, WindowOptions::new("demokit", 800, 600));
	let mut frame_host = FrameHost::new(options, HostSettings::from_config(&config));

	let assets_dir = assets::find_assets_dir(true);

	frame_host.add_renderable(SimpleWindow::new(move |ui: &mut egui::Ui| {
		ui.heading("Welcome");
		ui.label("Nothing is playing yet. Press Escape to quit.");

		match &assets_dir {
			Some(path) => ui.label(format!("Assets: {}", path.display())),
			None => ui.colored_label(egui::Color32::YELLOW, "No assets directory found"),
		};
	}));

	frame_host.add_renderable(Splash::new());

	frame_host.run();

	Ok(())
}


/// Floats a greeting over the main window for a few seconds, then removes itself.
struct Splash {
	shown_at: Option<Instant>,
	activity: Activity,
}

impl Splash {
	fn new() -> Splash {
		Splash { shown_at: None, activity: Activity::new() }
	}
}

impl Renderable for Splash {
	fn draw(&mut self, host: &mut FrameHost) {
		let shown_at = *self.shown_at.get_or_insert_with(Instant::now);
		let remaining = SPLASH_DURATION.saturating_sub(shown_at.elapsed());

		if remaining.is_zero() {
			self.deactivate();
			return
		}

		let Some(ctx) = host.ui().cloned() else {
			return
		};

		let bold = egui::FontId::new(host.font_size(), host.bold_font());

		egui::Area::new(egui::Id::new("splash"))
			.anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
			.show(&ctx, |ui| {
				egui::Frame::popup(ui.style()).show(ui, |ui| {
					ui.label(egui::RichText::new("demokit").font(bold));
					ui.label(format!("closing in {:.1}s", remaining.as_secs_f32()));
				});
			});
	}

	fn activity(&self) -> &Activity { &self.activity }
}
