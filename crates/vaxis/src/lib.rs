#![cfg_attr(not(test), forbid(unsafe_code))]

//! `vaxis`: a terminal rendering kernel.
//!
//! This crate is a thin facade over three focused crates:
//! - [`vaxis_core`] — the Unicode width service, capability-override
//!   types, and the byte-stream input parser.
//! - [`vaxis_style`] — `Color`, `Style`, and `Hyperlink` value types.
//! - [`vaxis_render`] — the `Cell`/`Screen`/`Shadow` data model, the
//!   `Window` compositor, and the differential `Renderer`.
//!
//! Most applications only need the re-exports at this crate's root;
//! reach into the sub-crates directly for less common types.

pub use vaxis_core::{
    capability_override::{Capabilities, CapabilityOverride},
    event::{ColorScheme, ColorWhich, Event, Key, Mouse, MouseButton, MouseEventKind, MouseMods, RgbColor, Winsize},
    key::{keycode, KeyCode, Modifiers},
    parser::{ParseError, ParseOutcome, Parser, ProbeReport},
    text_width::{self, Method},
};

pub use vaxis_style::{Color, Hyperlink, Style, StyleFlags, Underline};

pub use vaxis_render::{
    ansi, capability,
    cell::{Cell, Character, ImagePlacement, Rect, Scale, VerticalAlign},
    renderer::{Renderer, SgrPolicy},
    screen::{CursorShape, MouseShape, Screen},
    shadow::{Shadow, ShadowCell},
    window::{BorderGlyphs, ChildOpts, PrintOptions, PrintResult, Segment, WrapMode, Window},
    RenderError,
};
