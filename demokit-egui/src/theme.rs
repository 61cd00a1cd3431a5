//! The dark theme shared by every demo, and uniform scaling of style metrics.

use crate::prelude::*;

use egui::{Color32, Margin, Rounding, Stroke, Style, Vec2};


fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color32 {
	let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
	Color32::from_rgba_unmultiplied(to_u8(r), to_u8(g), to_u8(b), to_u8(a))
}

/// Accent used for checkmarks, slider grabs, selection and hovered separators.
pub fn accent() -> Color32 {
	rgba(0.33, 0.67, 0.93, 1.0)
}


/// Replaces the style of `ctx` with the modern dark theme.
pub fn apply_modern_dark(ctx: &egui::Context) {
	// Pin the theme, otherwise a light system theme would swap in the light style.
	ctx.set_theme(egui::Theme::Dark);
	ctx.style_mut(set_modern_dark);
}

pub fn set_modern_dark(style: &mut Style) {
	let visuals = &mut style.visuals;
	visuals.dark_mode = true;
	visuals.override_text_color = Some(rgba(0.95, 0.96, 0.98, 1.0));

	visuals.window_fill = rgba(0.10, 0.11, 0.13, 1.0);
	visuals.panel_fill = rgba(0.10, 0.11, 0.13, 1.0);
	visuals.faint_bg_color = rgba(0.12, 0.12, 0.13, 0.5);
	visuals.extreme_bg_color = rgba(0.07, 0.07, 0.08, 1.0);
	visuals.code_bg_color = rgba(0.12, 0.13, 0.15, 1.0);
	visuals.window_stroke = Stroke::new(1.0, rgba(0.25, 0.25, 0.28, 0.5));
	visuals.hyperlink_color = accent();

	visuals.selection.bg_fill = rgba(0.33, 0.67, 0.93, 0.35);
	visuals.selection.stroke = Stroke::new(1.0, accent());

	let widgets = &mut visuals.widgets;

	widgets.noninteractive.bg_fill = rgba(0.12, 0.13, 0.15, 1.0);
	widgets.noninteractive.weak_bg_fill = rgba(0.12, 0.13, 0.15, 1.0);
	widgets.noninteractive.bg_stroke = Stroke::new(1.0, rgba(0.25, 0.25, 0.28, 0.5));
	widgets.noninteractive.fg_stroke = Stroke::new(1.0, rgba(0.95, 0.96, 0.98, 1.0));

	widgets.inactive.bg_fill = rgba(0.20, 0.21, 0.24, 1.0);
	widgets.inactive.weak_bg_fill = rgba(0.25, 0.27, 0.30, 1.0);
	widgets.inactive.fg_stroke = Stroke::new(1.0, rgba(0.95, 0.96, 0.98, 1.0));

	widgets.hovered.bg_fill = rgba(0.26, 0.27, 0.30, 1.0);
	widgets.hovered.weak_bg_fill = rgba(0.35, 0.37, 0.40, 1.0);
	widgets.hovered.bg_stroke = Stroke::new(1.0, accent());

	widgets.active.bg_fill = rgba(0.30, 0.32, 0.36, 1.0);
	widgets.active.weak_bg_fill = rgba(0.40, 0.42, 0.46, 1.0);
	widgets.active.bg_stroke = Stroke::new(1.0, rgba(0.47, 0.77, 1.0, 1.0));

	widgets.open.bg_fill = rgba(0.25, 0.28, 0.32, 1.0);
	widgets.open.weak_bg_fill = rgba(0.25, 0.28, 0.32, 1.0);

	for widget in [&mut widgets.noninteractive, &mut widgets.inactive, &mut widgets.hovered, &mut widgets.active, &mut widgets.open] {
		widget.rounding = Rounding::same(5.0);
	}

	visuals.window_rounding = Rounding::same(6.0);
	visuals.menu_rounding = Rounding::same(4.0);

	let spacing = &mut style.spacing;
	spacing.window_margin = Margin::same(8.0);
	spacing.item_spacing = Vec2::new(8.0, 6.0);
	spacing.button_padding = Vec2::new(6.0, 4.0);
	spacing.indent = 21.0;
	spacing.scroll.bar_width = 14.0;
}


/// Multiplies every size-like metric of `style` by `factor`.
pub fn scale_style(style: &mut Style, factor: f32) {
	if factor <= 0.0 || !factor.is_finite() {
		log::warn!("Ignoring invalid style scale {factor}");
		return
	}

	let spacing = &mut style.spacing;
	spacing.item_spacing *= factor;
	spacing.button_padding *= factor;
	spacing.interact_size *= factor;
	spacing.indent *= factor;
	spacing.slider_width *= factor;
	spacing.combo_width *= factor;
	spacing.combo_height *= factor;
	spacing.text_edit_width *= factor;
	spacing.icon_width *= factor;
	spacing.icon_width_inner *= factor;
	spacing.icon_spacing *= factor;
	spacing.tooltip_width *= factor;
	spacing.scroll.bar_width *= factor;
	scale_margin(&mut spacing.window_margin, factor);
	scale_margin(&mut spacing.menu_margin, factor);

	let visuals = &mut style.visuals;
	scale_rounding(&mut visuals.window_rounding, factor);
	scale_rounding(&mut visuals.menu_rounding, factor);

	let widgets = &mut visuals.widgets;
	for widget in [&mut widgets.noninteractive, &mut widgets.inactive, &mut widgets.hovered, &mut widgets.active, &mut widgets.open] {
		scale_rounding(&mut widget.rounding, factor);
	}
}

fn scale_margin(margin: &mut Margin, factor: f32) {
	margin.left *= factor;
	margin.right *= factor;
	margin.top *= factor;
	margin.bottom *= factor;
}

fn scale_rounding(rounding: &mut Rounding, factor: f32) {
	rounding.nw *= factor;
	rounding.ne *= factor;
	rounding.sw *= factor;
	rounding.se *= factor;
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn modern_dark_sets_palette_and_metrics() {
		let mut style = Style::default();
		set_modern_dark(&mut style);

		assert!(style.visuals.dark_mode);
		assert_eq!(style.visuals.window_fill, rgba(0.10, 0.11, 0.13, 1.0));
		assert_eq!(style.spacing.item_spacing, Vec2::new(8.0, 6.0));
		assert_eq!(style.visuals.window_rounding, Rounding::same(6.0));
	}

	#[test]
	fn scaling_multiplies_metrics() {
		let mut style = Style::default();
		set_modern_dark(&mut style);
		scale_style(&mut style, 2.0);

		assert_eq!(style.spacing.item_spacing, Vec2::new(16.0, 12.0));
		assert_eq!(style.spacing.indent, 42.0);
		assert_eq!(style.spacing.window_margin, Margin::same(16.0));
		assert_eq!(style.visuals.widgets.inactive.rounding, Rounding::same(10.0));
	}

	#[test]
	fn invalid_scale_leaves_style_untouched() {
		let mut style = Style::default();
		let before = style.spacing.item_spacing;

		scale_style(&mut style, 0.0);
		scale_style(&mut style, f32::NAN);

		assert_eq!(style.spacing.item_spacing, before);
	}

	#[test]
	fn apply_to_context() {
		let ctx = egui::Context::default();
		apply_modern_dark(&ctx);
		assert_eq!(ctx.style().visuals.panel_fill, rgba(0.10, 0.11, 0.13, 1.0));
	}
}
