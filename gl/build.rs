use gl_generator::{Registry, Api, Profile, Fallbacks};
use std::env;
use std::fs::File;
use std::path::Path;

fn main() {
	let dest = env::var("OUT_DIR").unwrap();
	let mut file = File::create(Path::new(&dest).join("gl_bindings.rs")).unwrap();

	println!("cargo::rerun-if-changed=build.rs");

	// 4.5 is the first core version with direct state access, which is all the painter uses.
	let mut registry = Registry::new(Api::Gl, (4, 5), Profile::Core, Fallbacks::All, Vec::<&str>::new());

	registry.cmds.retain(|cmd| USED_COMMANDS.contains(&cmd.proto.ident.as_str()));

	registry.write_bindings(gl_generator::StructGenerator, &mut file).unwrap();
}


/// Everything the host and the egui painter call.
static USED_COMMANDS: &[&str] = &[
	// Debug output
	"DebugMessageCallback",
	"DebugMessageControl",

	// State
	"BlendEquationSeparate",
	"BlendFuncSeparate",
	"Clear",
	"ClearColor",
	"Disable",
	"Enable",
	"GetIntegerv",
	"PixelStorei",
	"Scissor",
	"Viewport",

	// Shaders
	"AttachShader",
	"CompileShader",
	"CreateProgram",
	"CreateShader",
	"DeleteProgram",
	"DeleteShader",
	"DetachShader",
	"GetProgramInfoLog",
	"GetProgramiv",
	"GetShaderInfoLog",
	"GetShaderiv",
	"LinkProgram",
	"ProgramUniform2f",
	"ShaderSource",
	"UseProgram",

	// Buffers and vertex arrays
	"BindVertexArray",
	"CreateBuffers",
	"CreateVertexArrays",
	"DeleteBuffers",
	"DeleteVertexArrays",
	"EnableVertexArrayAttrib",
	"NamedBufferData",
	"VertexArrayAttribBinding",
	"VertexArrayAttribFormat",
	"VertexArrayElementBuffer",
	"VertexArrayVertexBuffer",

	// Textures
	"BindTextureUnit",
	"CreateTextures",
	"DeleteTextures",
	"TextureParameteri",
	"TextureStorage2D",
	"TextureSubImage2D",

	// Drawing
	"DrawElements",
];
