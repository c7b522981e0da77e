#![warn(clippy::all, rust_2018_idioms)]

pub mod animation;
pub mod app;
pub mod config;
pub mod debounce;
pub mod drawing;
pub mod error;
pub mod export;
pub mod input;
pub mod renderer;
pub mod stroke;
pub mod surface_cache;
pub mod util;

pub use app::SketchApp;
pub use config::Config;
pub use drawing::Drawing;
pub use error::{ConfigError, ExportError};
pub use input::{BrushSettings, CoordinateMapper, InputAdapter, Viewport};
pub use renderer::{Rasterizer, Surface};
pub use stroke::{Point, Stroke, StrokeBuilder, StrokeSegment};
