use crate::prelude::*;

use egui::{Color32, TextureFilter, TextureId, TextureOptions};
use epaint::image::{ImageData, ImageDelta};

use std::collections::HashMap;
use std::ffi::c_void;


pub struct TextureManager {
	fallback_image: u32,

	managed_images: HashMap<TextureId, ManagedImage>,
}

struct ManagedImage {
	name: u32,
	allocated_size: Option<[usize; 2]>,
}


impl TextureManager {
	pub fn new(gl: &gl::Gl) -> TextureManager {
		let fallback_image = create_image(gl, TextureOptions::NEAREST);
		allocate_image(gl, fallback_image, [1, 1]);
		upload_pixels(gl, fallback_image, [0, 0], [1, 1], &[Color32::WHITE]);

		TextureManager {
			fallback_image,

			managed_images: HashMap::new(),
		}
	}

	/// Unknown ids resolve to a 1x1 white image so untextured meshes still draw.
	pub fn image_from_texture_id(&self, id: TextureId) -> u32 {
		match self.managed_images.get(&id) {
			Some(managed_image) => managed_image.name,
			None => self.fallback_image,
		}
	}

	pub fn apply_textures(&mut self, gl: &gl::Gl, deltas: &[(TextureId, ImageDelta)]) {
		for (id, delta) in deltas {
			let managed_image = self.managed_images.entry(*id)
				.or_insert_with(|| ManagedImage {
					name: create_image(gl, delta.options),
					allocated_size: None,
				});

			update_managed_image(gl, managed_image, delta);
		}
	}

	pub fn free_textures(&mut self, gl: &gl::Gl, to_free: &[TextureId]) {
		for id in to_free {
			if let Some(managed_image) = self.managed_images.remove(id) {
				unsafe {
					gl.DeleteTextures(1, &managed_image.name);
				}
			}
		}
	}

	pub fn destroy(&mut self, gl: &gl::Gl) {
		for (_, managed_image) in self.managed_images.drain() {
			unsafe {
				gl.DeleteTextures(1, &managed_image.name);
			}
		}

		unsafe {
			gl.DeleteTextures(1, &self.fallback_image);
		}

		self.fallback_image = 0;
	}
}



fn create_image(gl: &gl::Gl, options: TextureOptions) -> u32 {
	let filter = |filter| match filter {
		TextureFilter::Nearest => gl::NEAREST as i32,
		TextureFilter::Linear => gl::LINEAR as i32,
	};

	let mut name = 0;

	unsafe {
		gl.CreateTextures(gl::TEXTURE_2D, 1, &mut name);
		gl.TextureParameteri(name, gl::TEXTURE_MIN_FILTER, filter(options.minification));
		gl.TextureParameteri(name, gl::TEXTURE_MAG_FILTER, filter(options.magnification));
		gl.TextureParameteri(name, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as i32);
		gl.TextureParameteri(name, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as i32);
	}

	name
}

fn allocate_image(gl: &gl::Gl, name: u32, [width, height]: [usize; 2]) {
	unsafe {
		gl.TextureStorage2D(name, 1, gl::RGBA8, width as i32, height as i32);
	}
}

fn upload_pixels(gl: &gl::Gl, name: u32, [x, y]: [usize; 2], [width, height]: [usize; 2], pixels: &[Color32]) {
	debug_assert_eq!(pixels.len(), width * height);

	unsafe {
		gl.PixelStorei(gl::UNPACK_ALIGNMENT, 1);
		gl.TextureSubImage2D(name, 0,
			x as i32, y as i32,
			width as i32, height as i32,
			gl::RGBA, gl::UNSIGNED_BYTE,
			pixels.as_ptr() as *const c_void);
	}
}

fn update_managed_image(gl: &gl::Gl, managed_image: &mut ManagedImage, delta: &ImageDelta) {
	let delta_size = delta.image.size();
	let is_full_image_update = delta.pos.is_none();

	// Full texture update with new size requires new image, storage is immutable
	if is_full_image_update && managed_image.allocated_size.is_some_and(|size| size != delta_size) {
		unsafe {
			gl.DeleteTextures(1, &managed_image.name);
		}

		managed_image.name = create_image(gl, delta.options);
		managed_image.allocated_size = None;
	}

	if managed_image.allocated_size.is_none() {
		if !is_full_image_update {
			log::warn!("Partial update of an unallocated egui texture, ignoring");
			return
		}

		allocate_image(gl, managed_image.name, delta_size);
		managed_image.allocated_size = Some(delta_size);
	}

	let pixels: Vec<Color32> = match &delta.image {
		ImageData::Color(image) => image.pixels.clone(),
		ImageData::Font(image) => image.srgba_pixels(None).collect(),
	};

	upload_pixels(gl, managed_image.name, delta.pos.unwrap_or([0, 0]), delta_size, &pixels);
}
