#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Render: the cell/screen data model, the window compositor, and the
//! differential renderer.
//!
//! # Role
//! `vaxis-render` is the output side of the kernel: application code
//! draws into [`screen::Screen`] through [`window::Window`], and
//! [`renderer::Renderer`] walks it against a remembered
//! [`shadow::Shadow`] to emit the minimal control-sequence stream that
//! brings the terminal into agreement. It depends on `vaxis-core` only
//! for the Unicode width service and the discovered-capability type; it
//! has no dependency on the input parser.

pub mod ansi;
pub mod capability;
pub mod cell;
pub mod error;
mod logging;
pub mod renderer;
pub mod screen;
pub mod shadow;
pub mod window;

#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};

pub use cell::{Cell, Character, ImagePlacement, Scale, VerticalAlign};
pub use error::RenderError;
pub use renderer::{Renderer, SgrPolicy};
pub use screen::{CursorShape, MouseShape, Screen};
pub use shadow::{Shadow, ShadowCell};
pub use window::{BorderGlyphs, ChildOpts, PrintOptions, PrintResult, Segment, WrapMode, Window};
