use crate::prelude::*;

use cfg::Config;
use egui_backend::fonts;
use host::logging::LogSettings;

use std::path::{Path, PathBuf};
use std::time::Duration;


pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(10);
pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.8];

const REGULAR_FONT_FILE: &str = "fonts/lato_regular.ttf";
const BOLD_FONT_FILE: &str = "fonts/lato_bold.ttf";

/// Where fonts are looked for when no assets directory can be found.
const FALLBACK_ASSETS_DIR: &str = "../assets";


/// Everything about a [`FrameHost`](crate::FrameHost) beyond its window options.
#[derive(Debug, Clone)]
pub struct HostSettings {
	pub vsync: bool,

	/// How long to yield while there is nothing to draw into.
	pub idle_interval: Duration,

	pub clear_color: [f32; 4],
	pub multi_viewport: bool,

	/// Applied on top of the display scale factor.
	pub ui_scale: f32,

	pub fonts: FontPaths,
}

impl Default for HostSettings {
	fn default() -> HostSettings {
		HostSettings {
			vsync: true,
			idle_interval: DEFAULT_IDLE_INTERVAL,
			clear_color: DEFAULT_CLEAR_COLOR,
			multi_viewport: false,
			ui_scale: 1.0,
			fonts: font_paths_in(Path::new(FALLBACK_ASSETS_DIR)),
		}
	}
}

impl HostSettings {
	/// Reads the `window`, `host`, `ui` and `fonts` tables, falling back to defaults for anything
	/// missing or malformed.
	///
	/// Fonts default to the located assets directory.
	pub fn from_config(config: &Config) -> HostSettings {
		let defaults = HostSettings::default();

		let idle_interval = match config.get_int("host.idle_ms") {
			Some(ms) if ms >= 0 => Duration::from_millis(ms as u64),
			Some(ms) => {
				log::warn!("Ignoring negative host.idle_ms = {ms}");
				defaults.idle_interval
			}
			None => defaults.idle_interval,
		};

		let clear_color = match config.get_str("host.clear_color") {
			Some(value) => parse_clear_color(value).unwrap_or_else(|err| {
				log::warn!("Ignoring host.clear_color: {err:#}");
				defaults.clear_color
			}),
			None => defaults.clear_color,
		};

		let ui_scale = config.get_float("ui.scale")
			.map_or(defaults.ui_scale, |scale| scale as f32);

		let default_fonts = match assets::find_assets_dir(true) {
			Some(assets_dir) => font_paths_in(&assets_dir),
			None => defaults.fonts,
		};

		let fonts = FontPaths {
			regular: config.get_str("fonts.regular").map_or(default_fonts.regular, PathBuf::from),
			bold: config.get_str("fonts.bold").map_or(default_fonts.bold, PathBuf::from),
			size: config.get_float("fonts.size").map_or(default_fonts.size, |size| size as f32),
		};

		HostSettings {
			vsync: config.get_bool("window.vsync").unwrap_or(defaults.vsync),
			idle_interval,
			clear_color,
			multi_viewport: config.get_bool("host.multi_viewport").unwrap_or(defaults.multi_viewport),
			ui_scale,
			fonts,
		}
	}
}


/// Overrides `options` with `window.title`, `window.width` and `window.height`.
pub fn configure_window(config: &Config, mut options: WindowOptions) -> WindowOptions {
	if let Some(title) = config.get_str("window.title") {
		options.title = title.to_owned();
	}

	for (key, dimension) in [("window.width", &mut options.width), ("window.height", &mut options.height)] {
		let Some(value) = config.get_int(key) else {
			continue
		};

		match u16::try_from(value) {
			Ok(value) if value > 0 => *dimension = value,
			_ => log::warn!("Ignoring {key} = {value}, expected 1..={}", u16::MAX),
		}
	}

	options
}

pub fn log_settings(config: &Config) -> LogSettings {
	config.get_str("log.level")
		.map(LogSettings::with_level_name)
		.unwrap_or_default()
}


/// Parses `r,g,b,a` with each channel in `0..=1`.
pub fn parse_clear_color(value: &str) -> anyhow::Result<[f32; 4]> {
	let channels = value.split(',')
		.map(|channel| channel.trim().parse::<f32>())
		.collect::<Result<Vec<_>, _>>()?;

	let Ok(color) = <[f32; 4]>::try_from(channels) else {
		anyhow::bail!("Expected four comma separated channels in '{value}'")
	};

	anyhow::ensure!(color.iter().all(|channel| (0.0..=1.0).contains(channel)),
		"Channels must be between 0 and 1 in '{value}'");

	Ok(color)
}

fn font_paths_in(assets_dir: &Path) -> FontPaths {
	FontPaths {
		regular: assets_dir.join(REGULAR_FONT_FILE),
		bold: assets_dir.join(BOLD_FONT_FILE),
		size: fonts::DEFAULT_FONT_SIZE,
	}
}



#[cfg(test)]
mod test {
	use super::*;
	use cfg::Table;

	fn config(toml: &str) -> Config {
		Config::from_tables(Table::from_toml_str(toml).unwrap(), Table::new())
	}

	#[test]
	fn empty_config_gives_defaults() {
		let settings = HostSettings::from_config(&config(""));

		assert!(settings.vsync);
		assert!(!settings.multi_viewport);
		assert_eq!(settings.idle_interval, Duration::from_millis(10));
		assert_eq!(settings.clear_color, DEFAULT_CLEAR_COLOR);
		assert_eq!(settings.ui_scale, 1.0);
		assert!(settings.fonts.regular.ends_with(REGULAR_FONT_FILE));
		assert!(settings.fonts.bold.ends_with(BOLD_FONT_FILE));
		assert_eq!(settings.fonts.size, 24.0);
	}

	#[test]
	fn config_values_are_read() {
		let settings = HostSettings::from_config(&config(r#"
			[window]
			vsync = false

			[host]
			idle_ms = 25
			clear_color = "0.1, 0.2, 0.3, 1"
			multi_viewport = true

			[ui]
			scale = 2

			[fonts]
			regular = "custom/regular.ttf"
			size = 18
		"#));

		assert!(!settings.vsync);
		assert!(settings.multi_viewport);
		assert_eq!(settings.idle_interval, Duration::from_millis(25));
		assert_eq!(settings.clear_color, [0.1, 0.2, 0.3, 1.0]);
		assert_eq!(settings.ui_scale, 2.0);
		assert_eq!(settings.fonts.regular, PathBuf::from("custom/regular.ttf"));
		assert_eq!(settings.fonts.size, 18.0);
		assert!(settings.fonts.bold.ends_with(BOLD_FONT_FILE));
	}

	#[test]
	fn malformed_values_fall_back() {
		let settings = HostSettings::from_config(&config(r#"
			[host]
			idle_ms = -5
			clear_color = "red"
		"#));

		assert_eq!(settings.idle_interval, DEFAULT_IDLE_INTERVAL);
		assert_eq!(settings.clear_color, DEFAULT_CLEAR_COLOR);
	}

	#[test]
	fn clear_color_parsing() {
		assert_eq!(parse_clear_color("0,0,0,0.8").unwrap(), DEFAULT_CLEAR_COLOR);
		assert!(parse_clear_color("0,0,0").is_err());
		assert!(parse_clear_color("0,0,0,2").is_err());
		assert!(parse_clear_color("0,0,zero,1").is_err());
	}

	#[test]
	fn window_overrides() {
		let config = config(r#"
			[window]
			title = "Piano"
			width = 1024
			height = 0
		"#);

		let options = configure_window(&config, WindowOptions::new("demo", 800, 600));
		assert_eq!(options.title, "Piano");
		assert_eq!(options.width, 1024);
		assert_eq!(options.height, 600);
	}

	#[test]
	fn log_level_from_config() {
		assert_eq!(log_settings(&config("[log]\nlevel = \"debug\"\n")).level, log::LevelFilter::Debug);
		assert_eq!(log_settings(&config("")).level, log::LevelFilter::Info);
	}
}
