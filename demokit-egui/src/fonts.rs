use crate::prelude::*;

use egui::{FontData, FontDefinitions, FontFamily, FontId, TextStyle};
use anyhow::Context;
use tracing::instrument;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};


pub const REGULAR_FONT_NAME: &str = "regular";
pub const BOLD_FONT_NAME: &str = "bold";

/// Body text size in points while the regular font is pushed.
pub const DEFAULT_FONT_SIZE: f32 = 24.0;

const FONT_MAGICS: [&[u8]; 4] = [&[0, 1, 0, 0], b"OTTO", b"true", b"ttcf"];


#[derive(Debug, Clone)]
pub struct FontPaths {
	pub regular: PathBuf,
	pub bold: PathBuf,
	pub size: f32,
}


/// Font families handed out to renderables.
///
/// A family is only recorded once its data has been registered with the context, so every handle
/// returned here is safe to lay text out with.
#[derive(Debug, Clone)]
pub struct FontSet {
	regular: Option<FontFamily>,
	bold: Option<FontFamily>,
	size: f32,
}

impl Default for FontSet {
	fn default() -> FontSet {
		FontSet {
			regular: None,
			bold: None,
			size: DEFAULT_FONT_SIZE,
		}
	}
}

impl FontSet {
	pub fn default_font(&self) -> FontFamily {
		FontFamily::Proportional
	}

	pub fn regular(&self) -> FontFamily {
		self.regular.clone().unwrap_or_else(|| self.default_font())
	}

	pub fn bold(&self) -> FontFamily {
		self.bold.clone().unwrap_or_else(|| self.default_font())
	}

	pub fn size(&self) -> f32 {
		self.size
	}

	pub fn has_regular(&self) -> bool {
		self.regular.is_some()
	}

	pub fn has_bold(&self) -> bool {
		self.bold.is_some()
	}
}


#[instrument(skip_all, fields(path=%path.display()))]
pub fn load_font_data(path: &Path) -> anyhow::Result<Vec<u8>> {
	let data = std::fs::read(path)
		.with_context(|| format!("Failed to read font '{}'", path.display()))?;

	anyhow::ensure!(FONT_MAGICS.iter().any(|magic| data.starts_with(magic)),
		"'{}' is not a TrueType or OpenType font", path.display());

	Ok(data)
}


/// Registers the regular and bold fonts with `ctx`.
///
/// A font that fails to load is logged and left out; its accessor on the returned [`FontSet`]
/// then yields the default family. The new definitions take effect from the next pass.
pub fn install_fonts(ctx: &egui::Context, paths: &FontPaths) -> FontSet {
	let mut definitions = FontDefinitions::default();

	let regular = register_font(&mut definitions, REGULAR_FONT_NAME, &paths.regular);
	let bold = register_font(&mut definitions, BOLD_FONT_NAME, &paths.bold);

	ctx.set_fonts(definitions);

	let size = if paths.size > 0.0 && paths.size.is_finite() {
		paths.size
	} else {
		log::warn!("Ignoring font size {}, using {DEFAULT_FONT_SIZE}", paths.size);
		DEFAULT_FONT_SIZE
	};

	FontSet { regular, bold, size }
}

fn register_font(definitions: &mut FontDefinitions, name: &str, path: &Path) -> Option<FontFamily> {
	let data = match load_font_data(path) {
		Ok(data) => data,
		Err(err) => {
			log::warn!("{err:#}. Falling back to the default font");
			return None
		}
	};

	definitions.font_data.insert(name.to_owned(), FontData::from_owned(data));

	// Glyphs missing from the font fall through to the default proportional fonts.
	let mut fallbacks = definitions.families.get(&FontFamily::Proportional)
		.cloned()
		.unwrap_or_default();

	fallbacks.insert(0, name.to_owned());

	let family = FontFamily::Name(name.into());
	definitions.families.insert(family.clone(), fallbacks);

	log::info!("Loaded font '{name}' from {}", path.display());

	Some(family)
}


/// Text styles saved by [`push_font`], restored by [`pop_font`].
#[must_use = "pass to pop_font to restore the previous font"]
pub struct PushedFont {
	text_styles: BTreeMap<TextStyle, FontId>,
}

/// Makes `family` the font of every proportional text style, with body text at `size` points.
///
/// The other proportional styles keep their size relative to body text.
pub fn push_font(ctx: &egui::Context, family: &FontFamily, size: f32) -> PushedFont {
	let text_styles = ctx.style().text_styles.clone();

	ctx.style_mut(|style| {
		let body_size = style.text_styles.get(&TextStyle::Body).map_or(size, |font_id| font_id.size);
		let scale = if body_size > 0.0 { size / body_size } else { 1.0 };

		for font_id in style.text_styles.values_mut() {
			if font_id.family != FontFamily::Monospace {
				font_id.family = family.clone();
				font_id.size *= scale;
			}
		}
	});

	PushedFont { text_styles }
}

pub fn pop_font(ctx: &egui::Context, pushed: PushedFont) {
	ctx.style_mut(|style| style.text_styles = pushed.text_styles);
}



#[cfg(test)]
mod test {
	use super::*;

	fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
		let dir = std::env::temp_dir().join(format!("demokit-egui-fonts-{}", std::process::id()));
		std::fs::create_dir_all(&dir).unwrap();

		let path = dir.join(name);
		std::fs::write(&path, contents).unwrap();
		path
	}

	fn missing_paths() -> FontPaths {
		FontPaths {
			regular: PathBuf::from("definitely/not/here/regular.ttf"),
			bold: PathBuf::from("definitely/not/here/bold.ttf"),
			size: DEFAULT_FONT_SIZE,
		}
	}

	#[test]
	fn missing_fonts_fall_back_to_default() {
		let ctx = egui::Context::default();
		let fonts = install_fonts(&ctx, &missing_paths());

		assert!(!fonts.has_regular());
		assert!(!fonts.has_bold());
		assert_eq!(fonts.regular(), FontFamily::Proportional);
		assert_eq!(fonts.bold(), FontFamily::Proportional);
	}

	#[test]
	fn fallback_font_lays_out_text() {
		let ctx = egui::Context::default();
		let fonts = install_fonts(&ctx, &missing_paths());

		let _ = ctx.run(egui::RawInput::default(), |ctx| {
			let pushed = push_font(ctx, &fonts.regular(), fonts.size());
			egui::CentralPanel::default().show(ctx, |ui| ui.label("hello"));
			pop_font(ctx, pushed);
		});
	}

	#[test]
	fn non_font_data_is_rejected() {
		let path = temp_file("not_a_font.ttf", b"definitely not a font");
		let err = load_font_data(&path).unwrap_err();
		assert!(err.to_string().contains("not a TrueType"));
	}

	#[test]
	fn font_magic_is_accepted() {
		let path = temp_file("magic_only.otf", b"OTTO\0\0\0\0");
		assert_eq!(load_font_data(&path).unwrap().len(), 8);
	}

	#[test]
	fn push_and_pop_restore_text_styles() {
		let ctx = egui::Context::default();
		let before = ctx.style().text_styles.clone();

		let family = FontFamily::Name(REGULAR_FONT_NAME.into());
		let pushed = push_font(&ctx, &family, 24.0);

		let style = ctx.style();
		assert_eq!(style.text_styles[&TextStyle::Body].family, family);
		assert_eq!(style.text_styles[&TextStyle::Monospace].family, FontFamily::Monospace);
		assert_eq!(style.text_styles[&TextStyle::Monospace], before[&TextStyle::Monospace]);

		pop_font(&ctx, pushed);
		assert_eq!(ctx.style().text_styles, before);
	}

	#[test]
	fn pushed_font_uses_requested_size() {
		let ctx = egui::Context::default();
		let before = ctx.style().text_styles.clone();
		let heading_ratio = before[&TextStyle::Heading].size / before[&TextStyle::Body].size;

		let pushed = push_font(&ctx, &FontFamily::Proportional, DEFAULT_FONT_SIZE);

		let style = ctx.style();
		assert_eq!(style.text_styles[&TextStyle::Body].size, DEFAULT_FONT_SIZE);

		let heading = style.text_styles[&TextStyle::Heading].size;
		assert!((heading - DEFAULT_FONT_SIZE * heading_ratio).abs() < 1e-3);

		pop_font(&ctx, pushed);
		assert_eq!(ctx.style().text_styles[&TextStyle::Body].size, before[&TextStyle::Body].size);
	}

	#[test]
	fn installed_fonts_carry_their_size() {
		let ctx = egui::Context::default();

		let fonts = install_fonts(&ctx, &FontPaths { size: 18.0, ..missing_paths() });
		assert_eq!(fonts.size(), 18.0);

		let fonts = install_fonts(&ctx, &FontPaths { size: -1.0, ..missing_paths() });
		assert_eq!(fonts.size(), DEFAULT_FONT_SIZE);

		assert_eq!(FontSet::default().size(), DEFAULT_FONT_SIZE);
	}
}
