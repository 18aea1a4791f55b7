//! Thread-local capability override injection for testing.
//!
//! Capability-gated code (SGR policy, explicit-width wrapping, kitty
//! keyboard encoding) would otherwise require a real terminal's probe
//! responses to exercise in tests. This module lets a test pin a
//! [`Capabilities`] value on the current thread for the duration of a
//! closure, without touching real process environment.
//!
//! - **Thread-local**: overrides on one thread never affect another.
//! - **Stackable**: nested overrides compose, innermost wins per field.
//! - **RAII**: the override is removed when its guard drops, even on panic.

use std::cell::RefCell;

/// Capability discovery results (§4.6): the terminal features that
/// parameterize the renderer and parser. `None` on a [`CapabilityOverride`]
/// field means "don't override"; on [`Capabilities`] itself every field is
/// a plain `bool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub kitty_keyboard: bool,
    pub kitty_graphics: bool,
    pub rgb: bool,
    pub sgr_pixels: bool,
    pub unicode: bool,
    pub color_scheme_updates: bool,
    pub da1: bool,
    pub explicit_width: bool,
    pub scaled_text: bool,
}

impl Capabilities {
    /// All capabilities present (a fully modern terminal).
    #[must_use]
    pub const fn all() -> Self {
        Self {
            kitty_keyboard: true,
            kitty_graphics: true,
            rgb: true,
            sgr_pixels: true,
            unicode: true,
            color_scheme_updates: true,
            da1: true,
            explicit_width: true,
            scaled_text: true,
        }
    }

    /// No capabilities present (the minimal baseline terminal).
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kitty_keyboard: false,
            kitty_graphics: false,
            rgb: false,
            sgr_pixels: false,
            unicode: false,
            color_scheme_updates: false,
            da1: false,
            explicit_width: false,
            scaled_text: false,
        }
    }
}

/// Override specification: `Some(true)`/`Some(false)` force a capability
/// on or off; `None` leaves the base (or an outer override) untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityOverride {
    pub kitty_keyboard: Option<bool>,
    pub kitty_graphics: Option<bool>,
    pub rgb: Option<bool>,
    pub sgr_pixels: Option<bool>,
    pub unicode: Option<bool>,
    pub color_scheme_updates: Option<bool>,
    pub da1: Option<bool>,
    pub explicit_width: Option<bool>,
    pub scaled_text: Option<bool>,
}

impl CapabilityOverride {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kitty_keyboard: None,
            kitty_graphics: None,
            rgb: None,
            sgr_pixels: None,
            unicode: None,
            color_scheme_updates: None,
            da1: None,
            explicit_width: None,
            scaled_text: None,
        }
    }

    /// Force every field off (a dumb terminal).
    #[must_use]
    pub const fn dumb() -> Self {
        Self {
            kitty_keyboard: Some(false),
            kitty_graphics: Some(false),
            rgb: Some(false),
            sgr_pixels: Some(false),
            unicode: Some(false),
            color_scheme_updates: Some(false),
            da1: Some(false),
            explicit_width: Some(false),
            scaled_text: Some(false),
        }
    }

    /// Force every field on (a fully modern terminal).
    #[must_use]
    pub const fn modern() -> Self {
        Self {
            kitty_keyboard: Some(true),
            kitty_graphics: Some(true),
            rgb: Some(true),
            sgr_pixels: Some(true),
            unicode: Some(true),
            color_scheme_updates: Some(true),
            da1: Some(true),
            explicit_width: Some(true),
            scaled_text: Some(true),
        }
    }

    #[must_use]
    pub const fn kitty_keyboard(mut self, v: Option<bool>) -> Self {
        self.kitty_keyboard = v;
        self
    }

    #[must_use]
    pub const fn explicit_width(mut self, v: Option<bool>) -> Self {
        self.explicit_width = v;
        self
    }

    #[must_use]
    pub const fn scaled_text(mut self, v: Option<bool>) -> Self {
        self.scaled_text = v;
        self
    }

    #[must_use]
    pub const fn unicode(mut self, v: Option<bool>) -> Self {
        self.unicode = v;
        self
    }

    #[must_use]
    pub const fn rgb(mut self, v: Option<bool>) -> Self {
        self.rgb = v;
        self
    }

    fn apply_to(&self, mut caps: Capabilities) -> Capabilities {
        if let Some(v) = self.kitty_keyboard {
            caps.kitty_keyboard = v;
        }
        if let Some(v) = self.kitty_graphics {
            caps.kitty_graphics = v;
        }
        if let Some(v) = self.rgb {
            caps.rgb = v;
        }
        if let Some(v) = self.sgr_pixels {
            caps.sgr_pixels = v;
        }
        if let Some(v) = self.unicode {
            caps.unicode = v;
        }
        if let Some(v) = self.color_scheme_updates {
            caps.color_scheme_updates = v;
        }
        if let Some(v) = self.da1 {
            caps.da1 = v;
        }
        if let Some(v) = self.explicit_width {
            caps.explicit_width = v;
        }
        if let Some(v) = self.scaled_text {
            caps.scaled_text = v;
        }
        caps
    }
}

thread_local! {
    static OVERRIDE_STACK: RefCell<Vec<CapabilityOverride>> = const { RefCell::new(Vec::new()) };
}

/// RAII guard that pops its override when dropped.
#[must_use = "the override is removed when the guard is dropped"]
pub struct OverrideGuard {
    _marker: std::marker::PhantomData<*const ()>,
}

impl Drop for OverrideGuard {
    fn drop(&mut self) {
        OVERRIDE_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Push an override onto the thread-local stack; it is active until the
/// returned guard drops.
#[must_use = "the override is removed when the guard is dropped"]
pub fn push_override(over: CapabilityOverride) -> OverrideGuard {
    OVERRIDE_STACK.with(|stack| stack.borrow_mut().push(over));
    OverrideGuard { _marker: std::marker::PhantomData }
}

/// Run `f` with `over` active on this thread; the override is removed
/// when `f` returns, even if it panics.
pub fn with_capability_override<F, R>(over: CapabilityOverride, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = push_override(over);
    f()
}

/// Apply every override on the current thread's stack, bottom to top, to
/// `base`.
#[must_use]
pub fn apply_overrides(base: Capabilities) -> Capabilities {
    OVERRIDE_STACK.with(|stack| stack.borrow().iter().fold(base, |caps, over| over.apply_to(caps)))
}

/// `true` if any override is active on this thread.
#[must_use]
pub fn has_active_overrides() -> bool {
    OVERRIDE_STACK.with(|stack| !stack.borrow().is_empty())
}

/// Number of overrides active on this thread.
#[must_use]
pub fn override_depth() -> usize {
    OVERRIDE_STACK.with(|stack| stack.borrow().len())
}

/// Clear all overrides on this thread, bypassing any live guards. Only
/// intended for test-harness teardown between cases.
pub fn clear_all_overrides() {
    OVERRIDE_STACK.with(|stack| stack.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_forces_field() {
        let over = CapabilityOverride::new().explicit_width(Some(true));
        with_capability_override(over, || {
            let caps = apply_overrides(Capabilities::none());
            assert!(caps.explicit_width);
            assert!(!caps.scaled_text);
        });
        assert!(!has_active_overrides());
    }

    #[test]
    fn nested_overrides_inner_wins() {
        let outer = CapabilityOverride::modern();
        with_capability_override(outer, || {
            let inner = CapabilityOverride::new().rgb(Some(false));
            with_capability_override(inner, || {
                let caps = apply_overrides(Capabilities::none());
                assert!(!caps.rgb);
                assert!(caps.kitty_keyboard);
            });
            let caps = apply_overrides(Capabilities::none());
            assert!(caps.rgb);
        });
    }

    #[test]
    fn guard_drop_restores_previous_state() {
        assert_eq!(override_depth(), 0);
        {
            let _g = push_override(CapabilityOverride::dumb());
            assert_eq!(override_depth(), 1);
        }
        assert_eq!(override_depth(), 0);
    }

    #[test]
    fn clear_all_overrides_empties_stack() {
        let _g1 = push_override(CapabilityOverride::new());
        let _g2 = push_override(CapabilityOverride::new());
        clear_all_overrides();
        assert_eq!(override_depth(), 0);
        // Dropping the now-stale guards must not panic or underflow.
        drop(_g1);
        drop(_g2);
    }
}
