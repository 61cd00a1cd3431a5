pub mod table;
pub use table::{Table, Value};

use std::path::{Path, PathBuf};
use tracing::instrument;


/// Runtime representation of hierarchical key-value storage, intended for settings, command line config, etc.
#[derive(Debug, Clone, Default)]
pub struct Config {
	/// Config loaded and saved to disk.
	base: Table,

	/// Any config overrided by CLI args.
	arguments: Table,

	/// Config set during runtime that can be either committed to base or reverted.
	preview: Table,

	save_path: Option<PathBuf>,
}

impl Config {
	/// Loads `<preference dir>/demokit/<app_name>/config.toml`, creating it if missing, and layers
	/// the process arguments over it.
	#[instrument(name="config load")]
	pub fn for_app_name(app_name: &str) -> anyhow::Result<Self> {
		let save_path = config_path(app_name)?;

		let base = if save_path.exists() {
			Table::from_file(&save_path)?
		} else {
			let base = Table::new();
			if let Err(err) = base.save_to_file(&save_path) {
				log::warn!("Couldn't create config file '{}': {err:#}", save_path.display());
			}
			base
		};

		let config = Config {
			base,
			arguments: Table::from_cli(),
			preview: Table::new(),
			save_path: Some(save_path),
		};

		log::info!("Loaded config: {config:?}");

		Ok(config)
	}

	/// Config with no backing file.
	pub fn from_tables(base: Table, arguments: Table) -> Self {
		Config {
			base,
			arguments,
			preview: Table::new(),
			save_path: None,
		}
	}

	pub fn save_path(&self) -> Option<&Path> {
		self.save_path.as_deref()
	}

	pub fn save(&self) -> anyhow::Result<()> {
		match &self.save_path {
			Some(path) => self.base.save_to_file(path),
			None => anyhow::bail!("Config has no save path"),
		}
	}

	/// Sets a value that takes precedence over everything until committed or reverted.
	pub fn set_preview(&mut self, key: &str, value: impl Into<Value>) {
		self.preview.set_value(key, value.into());
	}

	pub fn commit(&mut self) {
		self.base.merge_from(&self.preview);
		self.arguments.remove_values_in(&self.preview);

		self.preview = Table::new();
	}

	pub fn revert(&mut self) {
		self.preview = Table::new();
	}
}

impl Config {
	pub fn get_value(&self, key: &str) -> Option<&Value> {
		[&self.preview, &self.arguments, &self.base].into_iter()
			.find_map(|table| table.get_value(key))
	}

	pub fn get_bool(&self, key: &str) -> Option<bool> {
		self.get_value(key)?.as_bool()
	}

	pub fn get_int(&self, key: &str) -> Option<i64> {
		self.get_value(key)?.as_int()
	}

	pub fn get_float(&self, key: &str) -> Option<f64> {
		self.get_value(key)?.as_float()
	}

	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.get_value(key)?.as_str()
	}
}


pub fn config_path(app_name: &str) -> anyhow::Result<PathBuf> {
	let mut dir = dirs::preference_dir()
		.ok_or_else(|| anyhow::format_err!("Couldn't get preferences dir"))?;

	dir.push("demokit");
	dir.push(app_name);
	dir.push("config.toml");

	Ok(dir)
}



#[cfg(test)]
mod test {
	use super::*;

	fn config() -> Config {
		let base = Table::from_toml_str("[window]\nwidth = 640\nheight = 480\nvsync = true\n").unwrap();
		let arguments = Table::from_args(["--window.width=1024"]);
		Config::from_tables(base, arguments)
	}

	#[test]
	fn arguments_override_base() {
		let config = config();
		assert_eq!(config.get_int("window.width"), Some(1024));
		assert_eq!(config.get_int("window.height"), Some(480));
		assert_eq!(config.get_bool("window.vsync"), Some(true));
	}

	#[test]
	fn preview_overrides_everything_until_reverted() {
		let mut config = config();
		config.set_preview("window.width", 300i64);
		assert_eq!(config.get_int("window.width"), Some(300));

		config.revert();
		assert_eq!(config.get_int("window.width"), Some(1024));
	}

	#[test]
	fn commit_moves_preview_into_base() {
		let mut config = config();
		config.set_preview("window.width", 300i64);
		config.commit();

		assert_eq!(config.get_int("window.width"), Some(300));
		assert_eq!(config.base.get_value("window.width"), Some(&Value::Integer(300)));
		assert_eq!(config.arguments.get_value("window.width"), None);
	}

	#[test]
	fn typed_getters_reject_mismatches() {
		let config = config();
		assert_eq!(config.get_str("window.width"), None);
		assert_eq!(config.get_float("window.width"), Some(1024.0));
		assert_eq!(config.get_bool("missing.key"), None);
	}

	#[test]
	fn save_without_path_fails() {
		assert!(config().save().is_err());
	}
}
