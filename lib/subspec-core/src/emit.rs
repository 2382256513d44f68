//! Text rendering of documents.

use std::io::Write;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};

use crate::document::Document;
use crate::node::Node;

/// Stem of the stand-in names given to mapping keys that must be quoted in YAML.
const KEY_PLACEHOLDER: &str = "subspec_key_";

/// Error type for YAML serialization.
pub type YamlError = serde_saphyr::ser_error::Error;

/// A supported output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, derive_more::Display)]
pub enum OutputFormat {
    /// YAML, the default.
    #[default]
    #[display("yaml")]
    Yaml,
    /// JSON indented with two spaces.
    #[display("json")]
    Json,
}

/// Errors raised while rendering a document.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum EmitError {
    /// The requested format is not supported.
    #[display("Invalid argument {value}")]
    #[from(skip)]
    InvalidFormat {
        /// The rejected selector.
        value: String,
    },

    /// JSON serialization failed.
    Json(serde_json::Error),

    /// YAML serialization failed.
    Yaml(YamlError),

    /// The output could not be written.
    Io(std::io::Error),
}

impl FromStr for OutputFormat {
    type Err = EmitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "yaml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(EmitError::InvalidFormat {
                value: other.to_owned(),
            }),
        }
    }
}

impl OutputFormat {
    /// Renders `document`, ending with a single newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    pub fn render(self, document: &Document) -> Result<String, EmitError> {
        let mut output = match self {
            Self::Yaml => render_yaml(document)?,
            Self::Json => serde_json::to_string_pretty(document)?,
        };
        if !output.ends_with('\n') {
            output.push('\n');
        }
        Ok(output)
    }
}

/// Renders YAML whose mapping keys all read back as strings.
///
/// The YAML serializer writes keys such as `200` or `yes` plain, which a reader takes
/// for a number or a boolean. Those keys are swapped for unique plain names before
/// serializing, then replaced by their double-quoted form.
fn render_yaml(document: &Document) -> Result<String, EmitError> {
    let node = Node::from(document.clone());

    let text = node.to_string();
    let mut prefix = KEY_PLACEHOLDER.to_owned();
    while text.contains(&prefix) {
        prefix.push('_');
    }

    let mut quoted = IndexSet::new();
    let node = protect_keys(node, &prefix, &mut quoted);
    let mut output = serde_saphyr::to_string(&node)?;
    for (index, key) in quoted.iter().enumerate() {
        let key = serde_json::to_string(key)?;
        output = output.replace(&format!("{prefix}{index}:"), &format!("{key}:"));
    }
    Ok(output)
}

fn protect_keys(node: Node, prefix: &str, quoted: &mut IndexSet<String>) -> Node {
    match node {
        Node::Mapping(entries) => Node::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| {
                    let value = protect_keys(value, prefix, quoted);
                    if is_ambiguous_key(&key) {
                        let (index, _) = quoted.insert_full(key);
                        (format!("{prefix}{index}"), value)
                    } else {
                        (key, value)
                    }
                })
                .collect::<IndexMap<_, _>>(),
        ),
        Node::Sequence(items) => Node::Sequence(
            items
                .into_iter()
                .map(|item| protect_keys(item, prefix, quoted))
                .collect(),
        ),
        scalar @ Node::Scalar(_) => scalar,
    }
}

/// Whether a YAML 1.1 or 1.2 reader could resolve the plain `key` to a non-string.
fn is_ambiguous_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    if matches!(
        lower.as_str(),
        "" | "~" | "null" | "y" | "n" | "yes" | "no" | "on" | "off" | "true" | "false"
    ) {
        return true;
    }

    let unsigned = lower.strip_prefix(['+', '-']).unwrap_or(&lower);
    let unsigned = unsigned.strip_prefix('.').unwrap_or(unsigned);
    unsigned.starts_with(|ch: char| ch.is_ascii_digit()) || matches!(unsigned, "inf" | "nan")
}

/// Renders `document` in `format` and writes it to `writer`.
///
/// Nothing is written when rendering fails.
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
pub fn emit<W>(document: &Document, format: OutputFormat, writer: &mut W) -> Result<(), EmitError>
where
    W: Write,
{
    let output = format.render(document)?;
    writer.write_all(output.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use rstest::rstest;

    fn sample() -> Document {
        Document::from_json_str(r#"{"a": 1}"#).expect("valid test document")
    }

    #[rstest]
    #[case("yaml", OutputFormat::Yaml)]
    #[case("json", OutputFormat::Json)]
    fn should_parse_supported_formats(#[case] value: &str, #[case] expected: OutputFormat) {
        let format = value.parse::<OutputFormat>().expect("should parse");

        assert_eq!(format, expected);
        assert_eq!(format.to_string(), value);
    }

    #[rstest]
    #[case("xml")]
    #[case("YAML")]
    #[case("")]
    fn should_reject_unknown_formats(#[case] value: &str) {
        let error = value.parse::<OutputFormat>().expect_err("should reject");

        assert_eq!(error.to_string(), format!("Invalid argument {value}"));
    }

    #[test]
    fn should_default_to_yaml() {
        assert_eq!(OutputFormat::default(), OutputFormat::Yaml);
    }

    #[test]
    fn should_emit_yaml() {
        let mut output = Vec::new();

        emit(&sample(), OutputFormat::Yaml, &mut output).expect("should emit");

        let text = String::from_utf8(output).expect("UTF-8 output");
        assert_snapshot!(text, @"a: 1");
        let reparsed = Document::from_yaml_str(&text).expect("should re-parse");
        assert_eq!(reparsed, sample());
    }

    #[test]
    fn should_emit_json_with_two_space_indent() {
        let mut output = Vec::new();

        emit(&sample(), OutputFormat::Json, &mut output).expect("should emit");

        let text = String::from_utf8(output).expect("UTF-8 output");
        assert_eq!(text, "{\n  \"a\": 1\n}\n");
        let reparsed = Document::from_json_str(&text).expect("should re-parse");
        assert_eq!(reparsed, sample());
    }

    #[test]
    fn should_render_nested_yaml() {
        let document = Document::from_json_str(
            r##"{"openapi": "3.1.0", "paths": {"/pets": {"get": {"tags": ["pets"]}}}}"##,
        )
        .expect("valid test document");

        let yaml = OutputFormat::Yaml.render(&document).expect("should render");

        let reparsed = Document::from_yaml_str(&yaml).expect("should re-parse");
        assert_eq!(reparsed, document);
    }

    #[test]
    fn should_quote_status_code_keys() {
        let document = Document::from_json_str(
            r#"{"swagger": "2.0", "responses": {"200": {"description": "OK"}, "default": {"description": "Error"}}}"#,
        )
        .expect("valid test document");

        let yaml = OutputFormat::Yaml.render(&document).expect("should render");

        assert!(yaml.contains("\"200\":"), "{yaml}");
        assert!(!yaml.contains("  200:"), "{yaml}");
        assert!(yaml.contains("  default:"), "{yaml}");
        let reparsed = Document::from_yaml_str(&yaml).expect("should re-parse");
        assert_eq!(reparsed, document);
    }

    #[test]
    fn should_keep_keys_clashing_with_placeholders() {
        let document = Document::from_json_str(
            r#"{"subspec_key_0": "plain", "codes": {"404": {}, "yes": [{"1.5": true}]}}"#,
        )
        .expect("valid test document");

        let yaml = OutputFormat::Yaml.render(&document).expect("should render");

        assert!(yaml.contains("subspec_key_0: plain"), "{yaml}");
        assert!(yaml.contains("\"404\":"), "{yaml}");
        assert!(yaml.contains("\"yes\":"), "{yaml}");
        assert!(yaml.contains("\"1.5\":"), "{yaml}");
        let reparsed = Document::from_yaml_str(&yaml).expect("should re-parse");
        assert_eq!(reparsed, document);
    }

    #[rstest]
    #[case("200", true)]
    #[case("-1", true)]
    #[case(".5", true)]
    #[case(".Inf", true)]
    #[case("Yes", true)]
    #[case("off", true)]
    #[case("~", true)]
    #[case("default", false)]
    #[case("/apis/apps/v1", false)]
    #[case("x-kubernetes-group", false)]
    fn should_detect_ambiguous_keys(#[case] key: &str, #[case] expected: bool) {
        assert_eq!(is_ambiguous_key(key), expected);
    }
}
