pub use demokit_host as host;
pub use demokit_egui as egui_backend;
pub use demokit_cfg as cfg;
pub use demokit_assets as assets;

pub use host::WindowOptions;
pub use egui_backend::prelude::*;
pub use egui_backend::{FontPaths, FontSet};


pub use anyhow;

pub use tracing;
#[doc(hidden)]
pub use tracing::instrument;
