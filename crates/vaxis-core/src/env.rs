//! The finite enumeration of environment variables this kernel recognizes.
//!
//! Every variable that influences behavior is read through exactly one
//! accessor here; nothing else in the crate calls `std::env::var` directly,
//! so the whole configuration surface is auditable from this one file.
//!
//! Tests that need to pin a value without mutating real process
//! environment (unsound on a multi-threaded test binary) should go through
//! [`crate::capability_override`] instead of `std::env::set_var`.

use std::env;

/// Forces the renderer's SGR emission to the legacy semicolon-separated
/// form instead of the colon-subparameter form, regardless of what
/// capability discovery observed.
pub const VAXIS_FORCE_LEGACY_SGR: &str = "VAXIS_FORCE_LEGACY_SGR";

/// Pins the unicode width method to [`crate::text_width::Method::Wcwidth`].
pub const VAXIS_FORCE_WCWIDTH: &str = "VAXIS_FORCE_WCWIDTH";

/// Pins the unicode width method to [`crate::text_width::Method::Unicode`].
pub const VAXIS_FORCE_UNICODE: &str = "VAXIS_FORCE_UNICODE";

/// Set by Termux; used to disable kitty-protocol probing on terminals that
/// advertise capabilities they do not implement correctly.
pub const TERMUX_VERSION: &str = "TERMUX_VERSION";

/// Set by VHS when recording a terminal session; same disabling effect as
/// `TERMUX_VERSION`.
pub const VHS_RECORD: &str = "VHS_RECORD";

/// Identifies the hosting terminal program; only the value `"vscode"` is
/// inspected, to disable kitty-protocol probing inside the integrated
/// terminal.
pub const TERM_PROGRAM: &str = "TERM_PROGRAM";

/// Set by asciinema during recording; same disabling effect as
/// `TERMUX_VERSION`.
pub const ASCIINEMA_REC: &str = "ASCIINEMA_REC";

fn flag_set(name: &str) -> bool {
    env::var(name).map(|v| !v.is_empty()).unwrap_or(false)
}

/// `true` if `VAXIS_FORCE_LEGACY_SGR` is set to a non-empty value.
#[must_use]
pub fn force_legacy_sgr() -> bool {
    flag_set(VAXIS_FORCE_LEGACY_SGR)
}

/// `true` if `VAXIS_FORCE_WCWIDTH` is set to a non-empty value.
#[must_use]
pub fn force_wcwidth() -> bool {
    flag_set(VAXIS_FORCE_WCWIDTH)
}

/// `true` if `VAXIS_FORCE_UNICODE` is set to a non-empty value.
#[must_use]
pub fn force_unicode() -> bool {
    flag_set(VAXIS_FORCE_UNICODE)
}

/// `true` if any of the "this host cannot be trusted to honor kitty
/// protocol probes correctly" environment markers are present: a Termux
/// session, a VHS or asciinema recording, or the VS Code integrated
/// terminal.
#[must_use]
pub fn disable_kitty_probing() -> bool {
    flag_set(TERMUX_VERSION)
        || flag_set(VHS_RECORD)
        || flag_set(ASCIINEMA_REC)
        || env::var(TERM_PROGRAM).map(|v| v == "vscode").unwrap_or(false)
}

/// Resolve the width method to use, honoring the two forcing variables.
/// `VAXIS_FORCE_WCWIDTH` takes precedence if both are set (first checked).
#[must_use]
pub fn forced_width_method() -> Option<crate::text_width::Method> {
    if force_wcwidth() {
        Some(crate::text_width::Method::Wcwidth)
    } else if force_unicode() {
        Some(crate::text_width::Method::Unicode)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_set_false_when_absent() {
        env::remove_var("VAXIS_FORCE_LEGACY_SGR_TEST_PROBE_UNUSED");
        assert!(!flag_set("VAXIS_FORCE_LEGACY_SGR_TEST_PROBE_UNUSED"));
    }
}
