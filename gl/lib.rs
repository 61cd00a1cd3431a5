//! OpenGL 4.5 core bindings, restricted to the entry points the host and painter use.
#![allow(clippy::all, non_upper_case_globals, non_snake_case, unused_imports)]

include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
