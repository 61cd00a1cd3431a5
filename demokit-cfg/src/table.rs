use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;


#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
	data: HashMap<String, Value>,
}


impl Table {
	pub fn new() -> Table {
		Table::default()
	}

	pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Table> {
		let path = path.as_ref();
		let data = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config '{}'", path.display()))?;

		Table::from_toml_str(&data)
			.with_context(|| format!("Failed to parse config '{}'", path.display()))
	}

	pub fn from_toml_str(data: &str) -> anyhow::Result<Table> {
		let raw: toml::Table = toml::from_str(data)?;
		Ok(Table::from_toml(raw))
	}

	pub fn from_cli() -> Table {
		let mut args = std::env::args();
		let _ = args.next(); // skip first arg

		Table::from_args(args)
	}

	/// Collects `key=value` and `--key=value` arguments. Anything else is ignored.
	pub fn from_args(args: impl IntoIterator<Item = impl AsRef<str>>) -> Table {
		let mut table = Table::new();

		for arg in args {
			let arg = arg.as_ref();
			let arg = arg.strip_prefix("--").unwrap_or(arg);

			let Some((key, value)) = arg.split_once('=') else {
				log::debug!("Ignoring argument '{arg}'");
				continue
			};

			let key = key.trim();
			if key.is_empty() || key.split('.').any(str::is_empty) {
				log::warn!("Ignoring argument with malformed key '{arg}'");
				continue
			}

			table.set_value(key, Value::parse_argument(value.trim()));
		}

		table
	}

	pub fn save_to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
		let path = path.as_ref();

		if let Some(parent_path) = path.parent() {
			std::fs::create_dir_all(parent_path)?;
		}

		std::fs::write(path, self.to_toml_string()?)
			.with_context(|| format!("Failed to write config '{}'", path.display()))
	}

	pub fn to_toml_string(&self) -> anyhow::Result<String> {
		toml::to_string_pretty(&self.to_toml()).map_err(Into::into)
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Copy or replace values present in `other`
	pub fn merge_from(&mut self, other: &Table) {
		for (key, value) in other.data.iter() {
			if let (Some(Value::Table(ours)), Value::Table(theirs)) = (self.data.get_mut(key), value) {
				ours.merge_from(theirs);
				continue
			}

			self.data.insert(key.clone(), value.clone());
		}
	}

	/// Recursively remove values from this table that are present in `other`
	pub fn remove_values_in(&mut self, other: &Table) {
		for (key, value) in other.data.iter() {
			let remove_key = match (self.data.get_mut(key), value) {
				(Some(Value::Table(ours)), Value::Table(theirs)) => {
					ours.remove_values_in(theirs);
					ours.is_empty()
				}

				(Some(_), _) => true,
				(None, _) => false,
			};

			if remove_key {
				self.data.remove(key);
			}
		}
	}

	pub fn get_value(&self, key: &str) -> Option<&Value> {
		if let Some((key, tail)) = key.split_once('.') {
			let subtable = self.data.get(key)?
				.as_table()?;

			subtable.get_value(tail)
		} else {
			self.data.get(key)
		}
	}

	/// Sets `key`, replacing any non-table value standing where a subtable is needed.
	pub fn set_value(&mut self, key: &str, value: Value) {
		if let Some((key, tail)) = key.split_once('.') {
			let entry = self.data.entry(key.into())
				.or_insert_with(|| Value::Table(Table::new()));

			if entry.as_table().is_none() {
				*entry = Value::Table(Table::new());
			}

			if let Value::Table(subtable) = entry {
				subtable.set_value(tail, value);
			}

		} else {
			self.data.insert(key.into(), value);
		}
	}

	fn from_toml(raw: toml::Table) -> Table {
		let mut table = Table::new();

		for (key, value) in raw {
			let value = match value {
				toml::Value::String(string) => Value::String(string),
				toml::Value::Integer(i) => Value::Integer(i),
				toml::Value::Float(f) => Value::Float(f),
				toml::Value::Boolean(b) => Value::Bool(b),
				toml::Value::Table(tbl) => Value::Table(Table::from_toml(tbl)),

				other => {
					log::warn!("Unsupported config value for '{key}': {other}. Storing as string");
					Value::String(other.to_string())
				}
			};

			table.data.insert(key, value);
		}

		table
	}

	fn to_toml(&self) -> toml::Table {
		let mut tbl = toml::Table::new();

		let mut keys: Vec<_> = self.data.keys().collect();
		keys.sort();

		for key in keys {
			let value = match &self.data[key] {
				Value::String(string) => toml::Value::String(string.clone()),
				Value::Table(table) => toml::Value::Table(table.to_toml()),
				Value::Bool(b) => toml::Value::Boolean(*b),
				Value::Integer(i) => toml::Value::Integer(*i),
				Value::Float(f) => toml::Value::Float(*f),
			};

			tbl.insert(key.clone(), value);
		}

		tbl
	}
}




#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	String(String),
	Table(Table),
	Bool(bool),
	Integer(i64),
	Float(f64),
}

impl Value {
	/// Interprets a command line value as the narrowest type it parses as.
	pub fn parse_argument(value: &str) -> Value {
		if let Ok(b) = value.parse() {
			Value::Bool(b)
		} else if let Ok(i) = value.parse() {
			Value::Integer(i)
		} else if let Ok(f) = value.parse() {
			Value::Float(f)
		} else {
			Value::String(value.to_owned())
		}
	}

	pub fn as_table(&self) -> Option<&Table> {
		match self {
			Value::Table(tbl) => Some(tbl),
			_ => None
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Integer(i) => Some(*i),
			_ => None
		}
	}

	/// Integers widen to floats.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Float(f) => Some(*f),
			Value::Integer(i) => Some(*i as f64),
			_ => None
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None
		}
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Value { Value::Bool(b) }
}

impl From<i64> for Value {
	fn from(i: i64) -> Value { Value::Integer(i) }
}

impl From<f64> for Value {
	fn from(f: f64) -> Value { Value::Float(f) }
}

impl From<&str> for Value {
	fn from(s: &str) -> Value { Value::String(s.to_owned()) }
}

impl From<String> for Value {
	fn from(s: String) -> Value { Value::String(s) }
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn dotted_keys_address_subtables() {
		let mut table = Table::new();
		table.set_value("window.width", Value::Integer(1280));
		table.set_value("window.title", "hello".into());

		assert_eq!(table.get_value("window.width"), Some(&Value::Integer(1280)));
		assert_eq!(table.get_value("window.title").and_then(Value::as_str), Some("hello"));
		assert!(table.get_value("window").and_then(Value::as_table).is_some());
		assert_eq!(table.get_value("window.height"), None);
	}

	#[test]
	fn set_value_replaces_scalar_with_subtable() {
		let mut table = Table::new();
		table.set_value("window", Value::Bool(true));
		table.set_value("window.width", Value::Integer(10));

		assert_eq!(table.get_value("window.width"), Some(&Value::Integer(10)));
	}

	#[test]
	fn arguments_are_typed() {
		let table = Table::from_args(["demo", "--window.vsync=false", "window.width=800", "ui.scale=1.5", "window.title=Piano", "noise"]);

		assert_eq!(table.get_value("window.vsync"), Some(&Value::Bool(false)));
		assert_eq!(table.get_value("window.width"), Some(&Value::Integer(800)));
		assert_eq!(table.get_value("ui.scale"), Some(&Value::Float(1.5)));
		assert_eq!(table.get_value("window.title"), Some(&Value::String("Piano".into())));
		assert_eq!(table.get_value("noise"), None);
	}

	#[test]
	fn malformed_argument_keys_are_ignored() {
		let table = Table::from_args(["=1", "window..width=3", ".x=2"]);
		assert!(table.is_empty());
	}

	#[test]
	fn toml_round_trip_preserves_nesting() {
		let table = Table::from_toml_str("[window]\nwidth = 640\nvsync = true\n[host]\nclear_color = \"0,0,0,1\"\n").unwrap();
		let reparsed = Table::from_toml_str(&table.to_toml_string().unwrap()).unwrap();

		assert_eq!(table, reparsed);
		assert_eq!(reparsed.get_value("host.clear_color").and_then(Value::as_str), Some("0,0,0,1"));
	}

	#[test]
	fn merge_is_recursive() {
		let mut base = Table::from_toml_str("[window]\nwidth = 640\nheight = 480\n").unwrap();
		let overrides = Table::from_toml_str("[window]\nwidth = 1024\n[ui]\nscale = 2.0\n").unwrap();

		base.merge_from(&overrides);

		assert_eq!(base.get_value("window.width"), Some(&Value::Integer(1024)));
		assert_eq!(base.get_value("window.height"), Some(&Value::Integer(480)));
		assert_eq!(base.get_value("ui.scale"), Some(&Value::Float(2.0)));
	}

	#[test]
	fn remove_values_prunes_empty_tables() {
		let mut table = Table::from_toml_str("[window]\nwidth = 640\n[ui]\nscale = 2.0\nextra = 1\n").unwrap();
		let other = Table::from_toml_str("[window]\nwidth = 1\n[ui]\nscale = 1.0\n").unwrap();

		table.remove_values_in(&other);

		assert_eq!(table.get_value("window"), None);
		assert_eq!(table.get_value("ui.scale"), None);
		assert_eq!(table.get_value("ui.extra"), Some(&Value::Integer(1)));
	}
}
