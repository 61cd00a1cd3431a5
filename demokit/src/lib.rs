//! A small host for windowed demos: one native window with a GL context, an egui context bound to
//! it, and a registry of [`Renderable`]s that are drawn once per frame until they deactivate.

pub mod prelude;
pub use crate::prelude::*;

pub mod backend;
pub mod frame_host;
pub mod renderable;
pub mod settings;
pub mod simple_window;
pub mod timing;

pub use backend::Backend;
pub use frame_host::FrameHost;
pub use renderable::{Activity, Renderable};
pub use settings::HostSettings;
pub use simple_window::SimpleWindow;
pub use timing::FrameTiming;
