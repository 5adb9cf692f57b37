//! Serialization errors.

use thiserror::Error;

/// Errors raised while converting a value to XML.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    /// A mapping with `@`-prefixed keys was serialized without an enclosing
    /// tag; attributes need an element to attach to.
    #[error("cannot add attributes without an enclosing tag")]
    AttributesWithoutTag,
}
