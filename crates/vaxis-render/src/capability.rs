//! Capability query-bundle construction (§4.6).
//!
//! `query_terminal` concatenates every probe sequence into a single
//! write so the terminal sees them as one burst; DA1's response is the
//! bundle's natural terminator since virtually every terminal implements
//! it. The caller is responsible for the actual wait/timeout primitive
//! (§5) — this module only builds the bytes and exposes the mode
//! numbers the parser's DECRPM dispatch (§4.4) needs to recognize.

use crate::ansi;

/// DECRQM mode numbers probed by the query bundle.
pub mod mode {
    pub const SGR_PIXELS: u32 = 1016;
    pub const UNICODE: u32 = 2027;
    pub const COLOR_SCHEME_UPDATES: u32 = 2031;
}

/// Build the full capability-probe bundle: DECRQM for the three private
/// modes, in-band resize enable, explicit-width and scaled-text probes,
/// XTVERSION, kitty-graphics query, and a trailing DA1 as the
/// terminator the caller's reader loop waits on.
#[must_use]
pub fn query_terminal(probe_width: u16) -> String {
    crate::debug!(probe_width, "capability probe: building query bundle");
    let mut out = String::new();
    out.push_str(&ansi::decrqm(mode::SGR_PIXELS));
    out.push_str(&ansi::decrqm(mode::UNICODE));
    out.push_str(&ansi::decrqm(mode::COLOR_SCHEME_UPDATES));
    out.push_str(ansi::IN_BAND_RESIZE_SET);
    out.push_str(&ansi::explicit_width_probe(probe_width));
    out.push_str(&ansi::scaled_text_probe());
    out.push_str(ansi::XTVERSION_QUERY);
    if vaxis_core::env::disable_kitty_probing() {
        crate::debug!("capability probe: kitty-graphics probing disabled by environment");
    } else {
        out.push_str(ansi::KITTY_GRAPHICS_QUERY);
    }
    out.push_str(ansi::DA1_QUERY);
    out
}

/// Latch a probe's observed results into a [`vaxis_core::capability_override::Capabilities`],
/// applying the spec's mode-2027-vs-explicit-width preference (§9(b)):
/// when both are supported, `unicode` mode is not additionally enabled
/// because explicit-width already provides equivalent behavior.
#[must_use]
pub fn latch(
    mut caps: vaxis_core::capability_override::Capabilities,
    explicit_width: bool,
    scaled_text: bool,
) -> vaxis_core::capability_override::Capabilities {
    caps.explicit_width = explicit_width;
    caps.scaled_text = scaled_text;
    if explicit_width {
        caps.unicode = false;
        crate::debug!("capability probe: explicit_width supported, leaving mode 2027 unlatched");
    }
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_ends_with_da1() {
        let bundle = query_terminal(80);
        assert!(bundle.ends_with(ansi::DA1_QUERY));
    }

    #[test]
    fn bundle_contains_every_decrqm_mode() {
        let bundle = query_terminal(80);
        assert!(bundle.contains(&mode::SGR_PIXELS.to_string()));
        assert!(bundle.contains(&mode::UNICODE.to_string()));
        assert!(bundle.contains(&mode::COLOR_SCHEME_UPDATES.to_string()));
    }

    #[test]
    fn explicit_width_suppresses_unicode_mode() {
        let caps = latch(vaxis_core::capability_override::Capabilities::none(), true, false);
        assert!(caps.explicit_width);
        assert!(!caps.unicode);
    }

    #[test]
    fn unicode_mode_enabled_when_no_explicit_width() {
        let mut base = vaxis_core::capability_override::Capabilities::none();
        base.unicode = true;
        let caps = latch(base, false, false);
        assert!(caps.unicode);
    }
}
