//! Thin logging macro layer over `tracing`.
//!
//! Call sites elsewhere in this crate write `crate::{trace,debug,warn}!`
//! unconditionally; with the `tracing` feature enabled these forward to
//! the real `tracing` macros, and with it disabled they expand to
//! nothing, so no call site needs its own `#[cfg(feature = "tracing")]`.
//! Library code never installs a global subscriber; only example
//! binaries and test harnesses do.

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, info, trace, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($tt:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! info {
    ($($tt:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($tt:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! error {
    ($($tt:tt)*) => {};
}
