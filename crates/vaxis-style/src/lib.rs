#![forbid(unsafe_code)]

//! Color, style, and hyperlink value types shared by [`vaxis_render`]'s
//! cell model.
//!
//! Every type here is a flat value type: equality is field-by-field, and
//! there is no cascading or inheritance between styles. A `Cell` composes
//! these with a grapheme and a few render-only flags in `vaxis-render`.

pub mod color;
pub mod hyperlink;
pub mod style;

pub use color::Color;
pub use hyperlink::Hyperlink;
pub use style::{Style, StyleFlags, Underline};
