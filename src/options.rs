//! Formatting hooks applied to raw text before escaping.

use std::fmt;
use std::sync::Arc;

/// Hook mapping an attribute's raw text and name to the text to emit.
pub type AttrFormatter = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Hook mapping a scalar's raw text to the text to emit.
pub type InnerFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Optional formatting hooks for attribute values and inner content.
///
/// Hooks run on the raw stringified text, before escaping. Both are
/// optional; an unset hook leaves the text unchanged.
#[derive(Clone, Default)]
pub struct SerializeOptions {
    pub(crate) format_attr: Option<AttrFormatter>,
    pub(crate) format_inner: Option<InnerFormatter>,
}

impl SerializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attribute hook; it receives `(value, name)`.
    pub fn format_attr<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.format_attr = Some(Arc::new(hook));
        self
    }

    /// Set the inner-content hook.
    pub fn format_inner<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.format_inner = Some(Arc::new(hook));
        self
    }

    /// Merge these options over `defaults`: per hook slot, the hook from
    /// `self` wins when set, otherwise the default is used.
    ///
    /// The merge is shallow, pure, and recomputed on every call.
    pub fn merged_over(&self, defaults: &SerializeOptions) -> SerializeOptions {
        SerializeOptions {
            format_attr: self
                .format_attr
                .clone()
                .or_else(|| defaults.format_attr.clone()),
            format_inner: self
                .format_inner
                .clone()
                .or_else(|| defaults.format_inner.clone()),
        }
    }
}

impl fmt::Debug for SerializeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializeOptions")
            .field("format_attr", &self.format_attr.as_ref().map(|_| "<hook>"))
            .field("format_inner", &self.format_inner.as_ref().map(|_| "<hook>"))
            .finish()
    }
}
