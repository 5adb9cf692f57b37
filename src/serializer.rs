//! Recursive value-to-XML conversion.

use indexmap::IndexMap;

use crate::escape::{escape_attr, escape_inner};
use crate::error::SerializeError;
use crate::options::SerializeOptions;
use crate::value::{is_attribute_key, Value};

/// One level of child indentation.
const INDENT: &str = "    ";

/// Convert `value` to an XML fragment enclosed in `tag`, with no
/// formatting hooks.
///
/// With `tag` as `None` the output is tag-less: scalars and dates render
/// bare, arrays render their elements without a wrapper, and `Null`
/// renders as an empty string.
pub fn to_xml(value: &Value, tag: Option<&str>) -> Result<String, SerializeError> {
    to_xml_with(value, tag, &SerializeOptions::default())
}

/// Convert `value` to an XML fragment enclosed in `tag`, applying the
/// formatting hooks in `options`.
pub fn to_xml_with(
    value: &Value,
    tag: Option<&str>,
    options: &SerializeOptions,
) -> Result<String, SerializeError> {
    log::trace!("serializing value, tag={:?}", tag);
    serialize_value(value, tag, options)
}

/// Pre-configured serializer carrying default formatting hooks.
///
/// The defaults are immutable once constructed; per-call overrides are
/// merged over them freshly on every call.
///
/// # Example
///
/// ```
/// use xml_easy::{Serializer, SerializeOptions, Value};
///
/// let quoted = Serializer::with_defaults(
///     SerializeOptions::new().format_inner(|text| format!("'{}'", text)),
/// );
/// let xml = quoted.serialize(&Value::from("hi"), Some("greeting")).unwrap();
/// assert_eq!(xml, "<greeting>'hi'</greeting>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    defaults: SerializeOptions,
}

impl Serializer {
    /// A serializer with no default hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// A serializer whose calls fall back to `defaults` for any hook the
    /// caller does not supply.
    pub fn with_defaults(defaults: SerializeOptions) -> Self {
        Serializer { defaults }
    }

    /// Serialize with the captured defaults.
    pub fn serialize(&self, value: &Value, tag: Option<&str>) -> Result<String, SerializeError> {
        to_xml_with(value, tag, &self.defaults)
    }

    /// Serialize with `overrides` merged over the captured defaults; an
    /// override wins per hook slot when present.
    pub fn serialize_with(
        &self,
        value: &Value,
        tag: Option<&str>,
        overrides: &SerializeOptions,
    ) -> Result<String, SerializeError> {
        let merged = overrides.merged_over(&self.defaults);
        to_xml_with(value, tag, &merged)
    }
}

fn serialize_value(
    value: &Value,
    tag: Option<&str>,
    options: &SerializeOptions,
) -> Result<String, SerializeError> {
    match value {
        Value::Null => Ok(match tag {
            Some(tag) => format!("<{}/>", tag),
            None => String::new(),
        }),

        // Each element becomes a sibling sharing the same tag; no wrapper.
        Value::Array(items) => {
            let fragments = items
                .iter()
                .map(|item| serialize_value(item, tag, options))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(fragments.join("\n"))
        }

        Value::DateTime(instant) => {
            let millis = instant.timestamp_millis();
            Ok(match tag {
                Some(tag) => format!("<{}>{}</{}>", tag, millis, tag),
                None => millis.to_string(),
            })
        }

        Value::Object(map) => serialize_mapping(map, tag, options),

        // Remaining variants are scalars.
        scalar => {
            let mut inner = scalar.to_text();
            if let Some(hook) = &options.format_inner {
                inner = hook(&inner);
            }
            let inner = escape_inner(&inner);
            Ok(match tag {
                Some(tag) => format!("<{}>{}</{}>", tag, inner, tag),
                None => inner,
            })
        }
    }
}

fn serialize_mapping(
    map: &IndexMap<String, Value>,
    tag: Option<&str>,
    options: &SerializeOptions,
) -> Result<String, SerializeError> {
    // Partition preserves each class's relative order from the mapping.
    let (attrs, children): (Vec<(&String, &Value)>, Vec<(&String, &Value)>) =
        map.iter().partition(|(key, _)| is_attribute_key(key.as_str()));

    if !attrs.is_empty() && tag.is_none() {
        log::debug!(
            "rejecting mapping with {} attribute key(s) and no enclosing tag",
            attrs.len()
        );
        return Err(SerializeError::AttributesWithoutTag);
    }

    let mut result = match tag {
        Some(tag) => format!("<{}", tag),
        None => String::new(),
    };

    if !attrs.is_empty() {
        let rendered = attrs
            .into_iter()
            .map(|(key, value)| {
                let name = &key[1..];
                let mut text = value.to_text();
                if let Some(hook) = &options.format_attr {
                    text = hook(&text, name);
                }
                format!("{}=\"{}\"", name, escape_attr(&text))
            })
            .collect::<Vec<_>>();
        result.push(' ');
        result.push_str(&rendered.join(" "));
    }

    if children.is_empty() {
        // Attributes only, or an entirely empty mapping.
        result.push_str(" />");
    } else {
        if tag.is_some() {
            result.push_str(">\n");
        }

        let fragments = children
            .into_iter()
            .map(|(key, value)| {
                serialize_value(value, Some(key.as_str()), options)
                    .map(|fragment| indent(&fragment))
            })
            .collect::<Result<Vec<_>, _>>()?;
        result.push_str(&fragments.join("\n"));

        if let Some(tag) = tag {
            result.push_str("\n</");
            result.push_str(tag);
            result.push('>');
        }
    }

    Ok(result)
}

/// Prefix a child fragment with one indent level, carrying the prefix onto
/// every interior line so nesting accumulates.
fn indent(fragment: &str) -> String {
    format!("{}{}", INDENT, fragment.replace('\n', "\n    "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn object(entries: &[(&str, Value)]) -> Value {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_null_with_tag_is_empty_element() {
        assert_eq!(to_xml(&Value::Null, Some("foo")).unwrap(), "<foo/>");
    }

    #[test]
    fn test_null_without_tag_is_empty_string() {
        assert_eq!(to_xml(&Value::Null, None).unwrap(), "");
    }

    #[test]
    fn test_scalar_with_tag() {
        assert_eq!(
            to_xml(&Value::from("Bob"), Some("name")).unwrap(),
            "<name>Bob</name>"
        );
        assert_eq!(to_xml(&Value::from(42), Some("n")).unwrap(), "<n>42</n>");
        assert_eq!(
            to_xml(&Value::from(true), Some("ok")).unwrap(),
            "<ok>true</ok>"
        );
    }

    #[test]
    fn test_scalar_without_tag_is_bare() {
        assert_eq!(to_xml(&Value::from("Bob"), None).unwrap(), "Bob");
    }

    #[test]
    fn test_markup_in_scalar_is_cdata_wrapped() {
        assert_eq!(
            to_xml(&Value::from("a<b"), Some("x")).unwrap(),
            "<x><![CDATA[a<b]]></x>"
        );
    }

    #[test]
    fn test_array_joins_siblings_with_newline() {
        let items = Value::from(vec!["a", "b"]);
        assert_eq!(
            to_xml(&items, Some("item")).unwrap(),
            "<item>a</item>\n<item>b</item>"
        );
    }

    #[test]
    fn test_array_equals_joined_element_fragments() {
        let a = Value::from(1);
        let b = Value::from(2);
        let both = Value::Array(vec![a.clone(), b.clone()]);
        let expected = format!(
            "{}\n{}",
            to_xml(&a, Some("item")).unwrap(),
            to_xml(&b, Some("item")).unwrap()
        );
        assert_eq!(to_xml(&both, Some("item")).unwrap(), expected);
    }

    #[test]
    fn test_empty_array_is_empty_string() {
        assert_eq!(to_xml(&Value::Array(vec![]), Some("item")).unwrap(), "");
    }

    #[test]
    fn test_date_renders_epoch_millis() {
        let instant = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(
            to_xml(&Value::from(instant), Some("at")).unwrap(),
            "<at>1700000000000</at>"
        );
        assert_eq!(to_xml(&Value::from(instant), None).unwrap(), "1700000000000");
    }

    #[test]
    fn test_attributes_and_children() {
        let user = object(&[("@id", Value::from("5")), ("name", Value::from("Bob"))]);
        assert_eq!(
            to_xml(&user, Some("user")).unwrap(),
            "<user id=\"5\">\n    <name>Bob</name>\n</user>"
        );
    }

    #[test]
    fn test_attributes_only_is_self_closing() {
        let node = object(&[("@id", Value::from("1"))]);
        assert_eq!(to_xml(&node, Some("node")).unwrap(), "<node id=\"1\" />");
    }

    #[test]
    fn test_empty_mapping_is_self_closing() {
        let empty = Value::Object(Default::default());
        assert_eq!(to_xml(&empty, Some("tag")).unwrap(), "<tag />");
    }

    #[test]
    fn test_multiple_attributes_join_with_spaces() {
        let node = object(&[("@a", Value::from("1")), ("@b", Value::from("2"))]);
        assert_eq!(
            to_xml(&node, Some("n")).unwrap(),
            "<n a=\"1\" b=\"2\" />"
        );
    }

    #[test]
    fn test_attribute_value_quotes_are_escaped() {
        let node = object(&[("@title", Value::from("say \"hi\""))]);
        let xml = to_xml(&node, Some("n")).unwrap();
        assert_eq!(xml, "<n title=\"say &#34;hi&#34;\" />");
    }

    #[test]
    fn test_attributes_without_tag_fail() {
        let orphan = object(&[("@id", Value::from(1))]);
        assert_eq!(
            to_xml(&orphan, None),
            Err(SerializeError::AttributesWithoutTag)
        );
    }

    #[test]
    fn test_attribute_error_surfaces_from_nesting() {
        // The enclosing array recurses with the same (absent) tag.
        let items = Value::Array(vec![object(&[("@id", Value::from(1))])]);
        assert_eq!(
            to_xml(&items, None),
            Err(SerializeError::AttributesWithoutTag)
        );
    }

    #[test]
    fn test_nested_indentation_accumulates() {
        let tree = object(&[(
            "outer",
            object(&[("inner", Value::from("x"))]),
        )]);
        assert_eq!(
            to_xml(&tree, Some("root")).unwrap(),
            "<root>\n    <outer>\n        <inner>x</inner>\n    </outer>\n</root>"
        );
    }

    #[test]
    fn test_tagless_mapping_emits_children_only() {
        let tree = object(&[("a", object(&[("b", Value::from("c"))]))]);
        assert_eq!(
            to_xml(&tree, None).unwrap(),
            "    <a>\n        <b>c</b>\n    </a>"
        );
    }

    #[test]
    fn test_array_of_mappings_repeats_tag() {
        let rows = Value::Array(vec![
            object(&[("@id", Value::from(1))]),
            object(&[("@id", Value::from(2))]),
        ]);
        assert_eq!(
            to_xml(&rows, Some("row")).unwrap(),
            "<row id=\"1\" />\n<row id=\"2\" />"
        );
    }

    #[test]
    fn test_format_attr_hook_receives_value_and_name() {
        let node = object(&[("@id", Value::from("7"))]);
        let options =
            SerializeOptions::new().format_attr(|value, name| format!("{}-{}", name, value));
        assert_eq!(
            to_xml_with(&node, Some("n"), &options).unwrap(),
            "<n id=\"id-7\" />"
        );
    }

    #[test]
    fn test_format_inner_hook_runs_before_escaping() {
        // The hook introduces markup, which must still be CDATA-wrapped.
        let options = SerializeOptions::new().format_inner(|text| format!("<{}>", text));
        assert_eq!(
            to_xml_with(&Value::from("x"), Some("t"), &options).unwrap(),
            "<t><![CDATA[<x>]]></t>"
        );
    }

    #[test]
    fn test_serializer_defaults_apply() {
        let upper = Serializer::with_defaults(
            SerializeOptions::new().format_inner(|text| text.to_uppercase()),
        );
        assert_eq!(
            upper.serialize(&Value::from("bob"), Some("name")).unwrap(),
            "<name>BOB</name>"
        );
    }

    #[test]
    fn test_serializer_override_wins() {
        let upper = Serializer::with_defaults(
            SerializeOptions::new().format_inner(|text| text.to_uppercase()),
        );
        let reversed =
            SerializeOptions::new().format_inner(|text| text.chars().rev().collect());
        assert_eq!(
            upper
                .serialize_with(&Value::from("abc"), Some("name"), &reversed)
                .unwrap(),
            "<name>cba</name>"
        );
    }

    #[test]
    fn test_serializer_empty_override_falls_back() {
        let upper = Serializer::with_defaults(
            SerializeOptions::new().format_inner(|text| text.to_uppercase()),
        );
        assert_eq!(
            upper
                .serialize_with(&Value::from("bob"), Some("name"), &SerializeOptions::new())
                .unwrap(),
            "<name>BOB</name>"
        );
    }
}
