//! Schema-free conversion of nested values to XML fragments.
//!
//! Builds XML strings from dynamic [`Value`] trees without a schema:
//! mapping keys become elements, `@`-prefixed keys become attributes,
//! arrays become repeated sibling elements, and content containing markup
//! is CDATA-wrapped. Nesting is indented four spaces per level.
//!
//! # Example
//!
//! ```
//! use xml_easy::{to_xml, Value};
//!
//! let user: Value = [("@id", "5"), ("name", "Bob")].into_iter().collect();
//!
//! let xml = to_xml(&user, Some("user")).unwrap();
//! assert_eq!(xml, "<user id=\"5\">\n    <name>Bob</name>\n</user>");
//! ```
//!
//! Formatting hooks can rewrite attribute values and inner content before
//! escaping, either per call ([`to_xml_with`]) or captured as defaults on a
//! [`Serializer`].

mod error;
mod escape;
mod options;
mod serializer;
mod value;

pub use error::SerializeError;
pub use options::{AttrFormatter, InnerFormatter, SerializeOptions};
pub use serializer::{to_xml, to_xml_with, Serializer};
pub use value::Value;
