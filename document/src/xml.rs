//! XML rendering and parsing for manual documents.
//!
//! A document is one `<Command name="...">` root with one child element
//! per metadata field in canonical order. Serialization is deterministic:
//! equal metadata produces byte-identical text. The parser accepts the
//! canonical six-field form and the legacy four-field form (Description,
//! Version, Example, Related) written by older generators; anything else
//! is [`DocumentError::Malformed`].
//!
//! Field text is not CDATA-wrapped, so the five reserved characters are
//! entity-escaped in both text content and the name attribute.

use command_manual_core::{CommandMetadata, FIELD_TAGS};

use crate::error::{DocumentError, Result};

/// Which field set a stored document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSchema {
    /// All six fields.
    Canonical,
    /// Description, Version, Example, Related only (older documents).
    Legacy,
}

/// A deserialized document: the metadata plus the schema it was stored in.
///
/// Legacy documents come back with empty Syntax and DocumentationLink
/// fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub metadata: CommandMetadata,
    pub schema: DocumentSchema,
}

/// Renders metadata as a manual document.
pub fn serialize(metadata: &CommandMetadata) -> String {
    let mut out = String::new();
    out.push_str("<Command name=\"");
    out.push_str(&escape(&metadata.name));
    out.push_str("\">");
    for (tag, value) in metadata.fields() {
        out.push('<');
        out.push_str(tag);
        out.push('>');
        out.push_str(&escape(value));
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
    out.push_str("</Command>");
    out
}

/// Parses a manual document back into metadata.
pub fn deserialize(text: &str) -> Result<ParsedDocument> {
    let mut rest = text.trim_start();

    // Tolerate an XML declaration even though we never write one.
    if rest.starts_with("<?") {
        let end = rest
            .find("?>")
            .ok_or_else(|| malformed("unterminated XML declaration"))?;
        rest = rest[end + 2..].trim_start();
    }

    let after_root = rest
        .strip_prefix("<Command")
        .ok_or_else(|| malformed("missing <Command> root element"))?;
    let gt = after_root
        .find('>')
        .ok_or_else(|| malformed("unterminated root tag"))?;
    let name = attribute_value(&after_root[..gt], "name")?;
    rest = &after_root[gt + 1..];

    let mut children: Vec<(String, String)> = Vec::new();
    loop {
        rest = rest.trim_start();
        if let Some(tail) = rest.strip_prefix("</Command>") {
            if !tail.trim().is_empty() {
                return Err(malformed("content after closing root tag"));
            }
            break;
        }
        let after_open = rest
            .strip_prefix('<')
            .ok_or_else(|| malformed("expected a child element"))?;
        let gt = after_open
            .find('>')
            .ok_or_else(|| malformed("unterminated element tag"))?;
        let tag_part = after_open[..gt].trim();

        // Empty-element form <Tag/> holds empty text.
        if let Some(tag) = tag_part.strip_suffix('/') {
            children.push((tag.trim().to_string(), String::new()));
            rest = &after_open[gt + 1..];
            continue;
        }

        let body = &after_open[gt + 1..];
        let closing = format!("</{tag_part}>");
        let end = body
            .find(&closing)
            .ok_or_else(|| malformed(format!("missing {closing}")))?;
        children.push((tag_part.to_string(), unescape(&body[..end])?));
        rest = &body[end + closing.len()..];
    }

    let tags: Vec<&str> = children.iter().map(|(tag, _)| tag.as_str()).collect();
    let schema = if tags[..] == FIELD_TAGS[..] {
        DocumentSchema::Canonical
    } else if tags[..] == FIELD_TAGS[..4] {
        DocumentSchema::Legacy
    } else {
        return Err(malformed(format!("unexpected element sequence {tags:?}")));
    };

    let mut values = children.into_iter().map(|(_, value)| value);
    let metadata = CommandMetadata {
        name,
        description: values.next().unwrap_or_default(),
        version: values.next().unwrap_or_default(),
        example: values.next().unwrap_or_default(),
        related: values.next().unwrap_or_default(),
        syntax: values.next().unwrap_or_default(),
        documentation_link: values.next().unwrap_or_default(),
    };

    Ok(ParsedDocument { metadata, schema })
}

fn malformed(message: impl Into<String>) -> DocumentError {
    DocumentError::Malformed(message.into())
}

fn attribute_value(attributes: &str, key: &str) -> Result<String> {
    let marker = format!("{key}=\"");
    let start = attributes
        .find(&marker)
        .ok_or_else(|| malformed(format!("missing {key} attribute on root")))?
        + marker.len();
    let tail = &attributes[start..];
    let end = tail
        .find('"')
        .ok_or_else(|| malformed("unterminated attribute value"))?;
    unescape(&tail[..end])
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = rest.find('&') {
        out.push_str(&rest[..at]);
        rest = &rest[at..];
        let end = rest
            .find(';')
            .ok_or_else(|| malformed("unterminated entity"))?;
        let replacement = match &rest[..=end] {
            "&amp;" => '&',
            "&lt;" => '<',
            "&gt;" => '>',
            "&quot;" => '"',
            "&apos;" => '\'',
            other => return Err(malformed(format!("unknown entity {other}"))),
        };
        out.push(replacement);
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_manual_core::NO_DOC_LINK;

    fn sample() -> CommandMetadata {
        CommandMetadata {
            name: "sort".to_string(),
            description: "Usage: sort [OPTION]... [FILE]...\nSort lines.".to_string(),
            version: "sort (GNU coreutils) 9.4".to_string(),
            example: "EXAMPLE for sort\n\techo -e '3\\n1\\n2' | sort\n1\n2\n3\n".to_string(),
            related: "sortmerge".to_string(),
            syntax: "SYNOPSIS\n       sort [OPTION]... [FILE]...".to_string(),
            documentation_link: NO_DOC_LINK.to_string(),
        }
    }

    #[test]
    fn serialization_is_deterministic() {
        let meta = sample();
        assert_eq!(serialize(&meta), serialize(&meta));
    }

    #[test]
    fn serialized_document_has_canonical_shape() {
        let text = serialize(&sample());
        assert!(text.starts_with("<Command name=\"sort\">"));
        assert!(text.ends_with("</Command>"));
        let mut last = 0;
        for tag in FIELD_TAGS {
            let at = text.find(&format!("<{tag}>")).unwrap();
            assert!(at > last, "element {tag} out of order");
            last = at;
        }
    }

    #[test]
    fn round_trip_reproduces_all_fields() {
        let meta = sample();
        let parsed = deserialize(&serialize(&meta)).unwrap();
        assert_eq!(parsed.metadata, meta);
        assert_eq!(parsed.schema, DocumentSchema::Canonical);
    }

    #[test]
    fn reserved_characters_are_escaped_and_restored() {
        let mut meta = sample();
        meta.description = "redirect with 2>&1 into <file> \"quoted\" 'single'".to_string();
        meta.name = "we\"ird".to_string();

        let text = serialize(&meta);
        assert!(text.contains("2&gt;&amp;1"));
        assert!(text.contains("&lt;file&gt;"));
        assert!(text.contains("name=\"we&quot;ird\""));

        let parsed = deserialize(&text).unwrap();
        assert_eq!(parsed.metadata, meta);
    }

    #[test]
    fn legacy_four_field_document_is_accepted() {
        let text = "<Command name=\"ls\">\
                    <Description>list</Description>\
                    <Version>9.4</Version>\
                    <Example>ls -l</Example>\
                    <Related>lsblk</Related>\
                    </Command>";
        let parsed = deserialize(text).unwrap();
        assert_eq!(parsed.schema, DocumentSchema::Legacy);
        assert_eq!(parsed.metadata.description, "list");
        assert_eq!(parsed.metadata.related, "lsblk");
        assert_eq!(parsed.metadata.syntax, "");
        assert_eq!(parsed.metadata.documentation_link, "");
    }

    #[test]
    fn empty_element_form_holds_empty_text() {
        let text = "<Command name=\"ls\">\
                    <Description/>\
                    <Version/>\
                    <Example/>\
                    <Related/>\
                    </Command>";
        let parsed = deserialize(text).unwrap();
        assert_eq!(parsed.metadata.description, "");
        assert_eq!(parsed.schema, DocumentSchema::Legacy);
    }

    #[test]
    fn missing_root_is_malformed() {
        let err = deserialize("<Manual name=\"ls\"></Manual>").unwrap_err();
        assert!(matches!(err, DocumentError::Malformed(_)));
    }

    #[test]
    fn out_of_order_fields_are_malformed() {
        let text = "<Command name=\"ls\">\
                    <Version>9.4</Version>\
                    <Description>list</Description>\
                    <Example>ls</Example>\
                    <Related>l</Related>\
                    </Command>";
        let err = deserialize(text).unwrap_err();
        assert!(matches!(err, DocumentError::Malformed(_)));
    }

    #[test]
    fn truncated_document_is_malformed() {
        let text = "<Command name=\"ls\"><Description>list";
        let err = deserialize(text).unwrap_err();
        assert!(matches!(err, DocumentError::Malformed(_)));
    }

    #[test]
    fn unknown_entity_is_malformed() {
        let text = "<Command name=\"ls\">\
                    <Description>&bogus;</Description>\
                    <Version>v</Version>\
                    <Example>e</Example>\
                    <Related>r</Related>\
                    </Command>";
        let err = deserialize(text).unwrap_err();
        assert!(matches!(err, DocumentError::Malformed(_)));
    }

    #[test]
    fn leading_declaration_is_tolerated() {
        let text = format!("<?xml version=\"1.0\"?>\n{}", serialize(&sample()));
        let parsed = deserialize(&text).unwrap();
        assert_eq!(parsed.metadata.name, "sort");
    }
}
