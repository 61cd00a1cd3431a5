use crate::prelude::*;
use crate::textures::TextureManager;

use egui::{ClippedPrimitive, TextureId};
use epaint::{ImageDelta, Primitive, Vertex};

use anyhow::Context;

use std::ffi::c_void;


const VERTEX_SOURCE: &str = r#"#version 450

layout(location=0) uniform vec2 u_screen_size;

layout(location=0) in vec2 a_pos;
layout(location=1) in vec2 a_uv;
layout(location=2) in vec4 a_color;

out vec2 v_uv;
out vec4 v_color;

void main() {
	// egui is Y-down and in points
	gl_Position = vec4(
		2.0 * a_pos.x / u_screen_size.x - 1.0,
		1.0 - 2.0 * a_pos.y / u_screen_size.y,
		0.0,
		1.0
	);

	v_uv = a_uv;
	v_color = a_color;
}
"#;

const FRAGMENT_SOURCE: &str = r#"#version 450

layout(binding=0) uniform sampler2D u_sampler;

in vec2 v_uv;
in vec4 v_color;

out vec4 o_color;

void main() {
	// Colors and textures are premultiplied and in gamma space, as is the backbuffer.
	o_color = v_color * texture(u_sampler, v_uv);
}
"#;

const SCREEN_SIZE_LOCATION: i32 = 0;


pub struct Renderer {
	program: u32,
	vao: u32,
	vertex_buffer: u32,
	index_buffer: u32,

	texture_manager: TextureManager,
	max_texture_side: usize,
}

impl Renderer {
	pub fn new(gl: &gl::Gl) -> anyhow::Result<Renderer> {
		unsafe {
			let vertex_shader = compile_shader(gl, gl::VERTEX_SHADER, "egui vs", VERTEX_SOURCE)?;
			let fragment_shader = compile_shader(gl, gl::FRAGMENT_SHADER, "egui fs", FRAGMENT_SOURCE)
				.inspect_err(|_| gl.DeleteShader(vertex_shader))?;

			let program = link_program(gl, vertex_shader, fragment_shader);
			gl.DeleteShader(vertex_shader);
			gl.DeleteShader(fragment_shader);
			let program = program.context("Failed to link egui program")?;

			let mut vao = 0;
			let mut buffers = [0; 2];
			gl.CreateVertexArrays(1, &mut vao);
			gl.CreateBuffers(2, buffers.as_mut_ptr());

			let [vertex_buffer, index_buffer] = buffers;

			gl.VertexArrayVertexBuffer(vao, 0, vertex_buffer, 0, std::mem::size_of::<Vertex>() as i32);
			gl.VertexArrayElementBuffer(vao, index_buffer);

			// Vertex is pos: Pos2, uv: Pos2, color: Color32
			let attributes = [
				(0, 2, gl::FLOAT, gl::FALSE, 0),
				(1, 2, gl::FLOAT, gl::FALSE, 8),
				(2, 4, gl::UNSIGNED_BYTE, gl::TRUE, 16),
			];

			for (index, size, ty, normalized, offset) in attributes {
				gl.EnableVertexArrayAttrib(vao, index);
				gl.VertexArrayAttribFormat(vao, index, size, ty, normalized, offset);
				gl.VertexArrayAttribBinding(vao, index, 0);
			}

			let mut max_texture_side = 0;
			gl.GetIntegerv(gl::MAX_TEXTURE_SIZE, &mut max_texture_side);

			Ok(Renderer {
				program,
				vao,
				vertex_buffer,
				index_buffer,

				texture_manager: TextureManager::new(gl),
				max_texture_side: max_texture_side.max(2048) as usize,
			})
		}
	}

	pub fn max_texture_side(&self) -> usize {
		self.max_texture_side
	}

	pub fn clear(&mut self, gl: &gl::Gl, screen_size: [u32; 2], [r, g, b, a]: [f32; 4]) {
		let [width, height] = screen_size;

		unsafe {
			gl.Viewport(0, 0, width as i32, height as i32);
			gl.ClearColor(r, g, b, a);
			gl.Clear(gl::COLOR_BUFFER_BIT);
		}
	}

	pub fn apply_textures(&mut self, gl: &gl::Gl, deltas: &[(TextureId, ImageDelta)]) {
		self.texture_manager.apply_textures(gl, deltas);
	}

	pub fn free_textures(&mut self, gl: &gl::Gl, to_free: &[TextureId]) {
		self.texture_manager.free_textures(gl, to_free);
	}

	pub fn paint_triangles(&mut self, gl: &gl::Gl, screen_size: [u32; 2], pixels_per_point: f32, primitives: &[ClippedPrimitive]) {
		if primitives.is_empty() {
			return
		}

		let [width_px, height_px] = screen_size;

		unsafe {
			gl.Disable(gl::DEPTH_TEST);
			gl.Disable(gl::CULL_FACE);
			gl.Enable(gl::SCISSOR_TEST);
			gl.Enable(gl::BLEND);

			gl.BlendEquationSeparate(gl::FUNC_ADD, gl::FUNC_ADD);
			gl.BlendFuncSeparate(
				// egui outputs colors with premultiplied alpha:
				gl::ONE,
				gl::ONE_MINUS_SRC_ALPHA,
				// Less important, but this is technically the correct alpha blend function
				// when you want to make use of the framebuffer alpha (for screenshots, compositing, etc).
				gl::ONE_MINUS_DST_ALPHA,
				gl::ONE,
			);

			gl.UseProgram(self.program);
			gl.ProgramUniform2f(self.program, SCREEN_SIZE_LOCATION,
				width_px as f32 / pixels_per_point,
				height_px as f32 / pixels_per_point);

			gl.BindVertexArray(self.vao);
		}

		for ClippedPrimitive{clip_rect, primitive} in primitives {
			let Primitive::Mesh(mesh) = primitive else {
				log::warn!("egui paint callbacks are not supported, skipping");
				continue
			};

			if mesh.indices.is_empty() || !clip_rect.is_positive() {
				continue
			}

			// Clip rect is in points, scissor wants bottom-left origin pixels.
			let min_x = (clip_rect.min.x * pixels_per_point).round().clamp(0.0, width_px as f32) as i32;
			let min_y = (clip_rect.min.y * pixels_per_point).round().clamp(0.0, height_px as f32) as i32;
			let max_x = (clip_rect.max.x * pixels_per_point).round().clamp(min_x as f32, width_px as f32) as i32;
			let max_y = (clip_rect.max.y * pixels_per_point).round().clamp(min_y as f32, height_px as f32) as i32;

			if max_x == min_x || max_y == min_y {
				continue
			}

			let texture = self.texture_manager.image_from_texture_id(mesh.texture_id);

			unsafe {
				gl.Scissor(min_x, height_px as i32 - max_y, max_x - min_x, max_y - min_y);

				gl.NamedBufferData(self.vertex_buffer,
					std::mem::size_of_val(mesh.vertices.as_slice()) as isize,
					mesh.vertices.as_ptr() as *const c_void,
					gl::STREAM_DRAW);

				gl.NamedBufferData(self.index_buffer,
					std::mem::size_of_val(mesh.indices.as_slice()) as isize,
					mesh.indices.as_ptr() as *const c_void,
					gl::STREAM_DRAW);

				gl.BindTextureUnit(0, texture);
				gl.DrawElements(gl::TRIANGLES, mesh.indices.len() as i32, gl::UNSIGNED_INT, std::ptr::null());
			}
		}

		unsafe {
			gl.BindVertexArray(0);
			gl.Disable(gl::SCISSOR_TEST);
			gl.Disable(gl::BLEND);
		}
	}

	pub fn destroy(&mut self, gl: &gl::Gl) {
		self.texture_manager.destroy(gl);

		unsafe {
			gl.DeleteProgram(self.program);
			gl.DeleteVertexArrays(1, &self.vao);
			gl.DeleteBuffers(2, [self.vertex_buffer, self.index_buffer].as_ptr());
		}

		self.program = 0;
		self.vao = 0;
		self.vertex_buffer = 0;
		self.index_buffer = 0;
	}
}



unsafe fn compile_shader(gl: &gl::Gl, kind: u32, label: &str, source: &str) -> anyhow::Result<u32> {
	unsafe {
		let shader = gl.CreateShader(kind);
		let source_ptr = source.as_ptr() as *const gl::types::GLchar;
		let source_len = source.len() as i32;

		gl.ShaderSource(shader, 1, &source_ptr, &source_len);
		gl.CompileShader(shader);

		let mut status = 0;
		gl.GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);

		if status == 0 {
			let mut log_len = 0;
			gl.GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut log_len);

			let mut log = vec![0u8; log_len.max(1) as usize];
			gl.GetShaderInfoLog(shader, log.len() as i32, std::ptr::null_mut(), log.as_mut_ptr().cast());
			gl.DeleteShader(shader);

			anyhow::bail!("Failed to compile '{label}': {}", String::from_utf8_lossy(&log).trim_end_matches('\0'));
		}

		Ok(shader)
	}
}

unsafe fn link_program(gl: &gl::Gl, vertex_shader: u32, fragment_shader: u32) -> anyhow::Result<u32> {
	unsafe {
		let program = gl.CreateProgram();
		gl.AttachShader(program, vertex_shader);
		gl.AttachShader(program, fragment_shader);
		gl.LinkProgram(program);
		gl.DetachShader(program, vertex_shader);
		gl.DetachShader(program, fragment_shader);

		let mut status = 0;
		gl.GetProgramiv(program, gl::LINK_STATUS, &mut status);

		if status == 0 {
			let mut log_len = 0;
			gl.GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut log_len);

			let mut log = vec![0u8; log_len.max(1) as usize];
			gl.GetProgramInfoLog(program, log.len() as i32, std::ptr::null_mut(), log.as_mut_ptr().cast());
			gl.DeleteProgram(program);

			anyhow::bail!("{}", String::from_utf8_lossy(&log).trim_end_matches('\0'));
		}

		Ok(program)
	}
}
