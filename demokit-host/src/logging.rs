use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};
use log::LevelFilter;

use std::sync::Once;


/// Crates which log heavily at info and below. They only get through at `warn` or above.
const NOISY_CRATES: &[&str] = &["winit", "glutin", "egui", "calloop", "sctk", "smithay_client_toolkit"];


#[derive(Debug, Clone)]
pub struct LogSettings {
	pub level: LevelFilter,
}

impl Default for LogSettings {
	fn default() -> LogSettings {
		LogSettings { level: LevelFilter::Info }
	}
}

impl LogSettings {
	/// Accepts the usual level names ("error", "warn", "info", "debug", "trace", "off"), case insensitive.
	pub fn with_level_name(name: &str) -> LogSettings {
		let level = name.parse().unwrap_or_else(|_| {
			eprintln!("Unknown log level '{name}', using info");
			LevelFilter::Info
		});

		LogSettings { level }
	}
}


static INIT: Once = Once::new();

/// Installs the terminal logger and the panic hook. Calls after the first are ignored.
pub fn init(settings: LogSettings) {
	INIT.call_once(|| {
		let mut app_config = ConfigBuilder::new();
		app_config.set_time_level(LevelFilter::Off);

		let mut noisy_config = ConfigBuilder::new();
		noisy_config.set_time_level(LevelFilter::Off);

		for &name in NOISY_CRATES {
			app_config.add_filter_ignore_str(name);
			noisy_config.add_filter_allow_str(name);
		}

		let noisy_level = settings.level.min(LevelFilter::Warn);

		let result = CombinedLogger::init(vec![
			TermLogger::new(settings.level, app_config.build(), TerminalMode::Mixed, ColorChoice::Auto),
			TermLogger::new(noisy_level, noisy_config.build(), TerminalMode::Mixed, ColorChoice::Auto),
		]);

		if let Err(err) = result {
			eprintln!("Failed to install logger: {err}");
			return
		}

		log_panics::init();

		#[cfg(feature="tracy")]
		init_tracy();

		log::debug!("logging initialized at {}", settings.level);
	});
}


#[cfg(feature="tracy")]
fn init_tracy() {
	use tracing_subscriber::layer::SubscriberExt;

	let subscriber = tracing_subscriber::registry()
		.with(tracing_tracy::TracyLayer::default());

	if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
		log::warn!("Failed to install tracy subscriber: {err}");
	}
}


#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn level_names_parse_case_insensitively() {
		assert_eq!(LogSettings::with_level_name("DEBUG").level, LevelFilter::Debug);
		assert_eq!(LogSettings::with_level_name("off").level, LevelFilter::Off);
	}

	#[test]
	fn unknown_level_falls_back_to_info() {
		assert_eq!(LogSettings::with_level_name("chatty").level, LevelFilter::Info);
	}

	#[test]
	fn init_twice_is_harmless() {
		init(LogSettings::default());
		init(LogSettings { level: LevelFilter::Trace });
		log::info!("still logging");
	}
}
