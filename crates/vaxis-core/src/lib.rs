#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: Unicode width measurement, terminal input parsing, and the typed
//! event model that `vaxis-render` and application code consume.
//!
//! # Role
//! `vaxis-core` is the input side of the kernel. It owns the byte-stream
//! parser, the event/key/mouse types it produces, the grapheme width
//! service shared with the render crate, and the environment-variable /
//! capability-override surface used to make capability-gated behavior
//! testable without a real terminal attached.
//!
//! The render crate is independent of input; this crate is the bridge
//! between raw terminal bytes and the event stream an application drives
//! its model with.

pub mod capability_override;
pub mod env;
pub mod event;
pub mod key;
pub mod parser;
pub mod text_width;

mod logging;

#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};

pub use event::{ColorScheme, ColorWhich, Event, Mouse, MouseButton, MouseEventKind, MouseMods};
pub use key::{KeyCode, Modifiers};
pub use parser::{ParseError, ParseOutcome, Parser};
