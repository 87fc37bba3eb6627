//! Rendering context and context-keyed caches.
//!
//! Derived display content depends on the caller's presentation state (text
//! scaling and theme). The view layer only ever compares contexts for
//! equality: same context means cached content is still valid.

/// Display theme, opaque to this crate beyond identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Sepia,
    Dark,
    Black,
}

/// The presentation state display content is derived against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// Text scale factor; 1.0 is the default content size
    pub text_scale: f32,
    pub theme: Theme,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            text_scale: 1.0,
            theme: Theme::default(),
        }
    }
}

/// Single-slot cache keyed by the last-seen [`RenderContext`].
///
/// Holds one value computed for one context; a lookup under a different
/// context recomputes and replaces the slot. All of an event's cached
/// fields therefore invalidate together when the context changes.
#[derive(Debug)]
pub struct ContextCache<T> {
    entry: Option<(RenderContext, T)>,
}

impl<T> Default for ContextCache<T> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<T: Clone> ContextCache<T> {
    /// Return the cached value for `ctx`, computing and storing it if the
    /// slot is empty or was filled under a different context.
    pub fn get_or_insert_with(&mut self, ctx: RenderContext, f: impl FnOnce() -> T) -> T {
        if let Some((last, value)) = &self.entry {
            if *last == ctx {
                return value.clone();
            }
        }
        let value = f();
        self.entry = Some((ctx, value.clone()));
        value
    }
}
