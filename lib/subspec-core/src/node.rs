//! Untyped document tree.
//!
//! A decoded Swagger document is made of exactly three shapes: scalars, sequences and
//! string-keyed mappings. [`Node`] captures these as a closed set of variants so that
//! every traversal is an exhaustive `match` instead of runtime shape probing.
//!
//! Decoding goes through the [`Deserialize`] implementation of [`Node`], which rejects
//! anything outside the three shapes (byte strings, tagged/enum values, non-finite
//! numbers, non-string keys) with an `Invalid argument` error.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde::de::{self, EnumAccess, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A primitive leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// The `null` value, distinct from an absent key.
    Null,
    /// A boolean.
    Bool(bool),
    /// A finite number.
    Number(serde_json::Number),
    /// A string.
    String(String),
}

/// A node of a document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A primitive leaf.
    Scalar(Scalar),
    /// An ordered list of nodes.
    Sequence(Vec<Node>),
    /// A string-keyed mapping, in insertion order.
    Mapping(IndexMap<String, Node>),
}

/// The shape of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum NodeKind {
    /// See [`Node::Scalar`].
    #[display("scalar")]
    Scalar,
    /// See [`Node::Sequence`].
    #[display("sequence")]
    Sequence,
    /// See [`Node::Mapping`].
    #[display("mapping")]
    Mapping,
}

/// Errors raised when a value cannot be represented as a [`Node`].
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum NodeError {
    /// The value is neither a scalar, a sequence nor a plain mapping.
    #[display("Invalid argument: {found}")]
    InvalidArgument {
        /// Description of the rejected value.
        found: String,
    },
}

impl Node {
    /// The `null` scalar.
    pub const NULL: Self = Self::Scalar(Scalar::Null);

    /// Classifies this node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Scalar(_) => NodeKind::Scalar,
            Self::Sequence(_) => NodeKind::Sequence,
            Self::Mapping(_) => NodeKind::Mapping,
        }
    }

    /// Creates a number node from a float.
    ///
    /// # Errors
    ///
    /// Fails with [`NodeError::InvalidArgument`] for `NaN` and infinities.
    pub fn from_f64(value: f64) -> Result<Self, NodeError> {
        serde_json::Number::from_f64(value)
            .map(|number| Self::Scalar(Scalar::Number(number)))
            .ok_or_else(|| NodeError::InvalidArgument {
                found: format!("non-finite number {value}"),
            })
    }

    /// Returns the string value if this node is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the entries if this node is a mapping.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the items if this node is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a key when this node is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|entries| entries.get(key))
    }

    /// Returns `true` for the `null` scalar.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::String(value.to_owned()))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::String(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Number(value.into()))
    }
}

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        Self::Scalar(Scalar::Number(value.into()))
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Self::Sequence(value)
    }
}

impl From<IndexMap<String, Node>> for Node {
    fn from(value: IndexMap<String, Node>) -> Self {
        Self::Mapping(value)
    }
}

impl Display for Node {
    /// Compact JSON rendering.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Number(value) => value.serialize(serializer),
            Self::String(value) => serializer.serialize_str(value),
        }
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Scalar(scalar) => scalar.serialize(serializer),
            Self::Sequence(items) => serializer.collect_seq(items),
            Self::Mapping(entries) => serializer.collect_map(entries),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

fn invalid_argument<E: de::Error>(found: impl Display) -> E {
    E::custom(NodeError::InvalidArgument {
        found: found.to_string(),
    })
}

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a scalar, a sequence or a mapping with string keys")
    }

    fn visit_bool<E>(self, value: bool) -> Result<Node, E> {
        Ok(Node::from(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Node, E> {
        Ok(Node::from(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Node, E> {
        Ok(Node::from(value))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Node, E>
    where
        E: de::Error,
    {
        Node::from_f64(value).map_err(E::custom)
    }

    fn visit_str<E>(self, value: &str) -> Result<Node, E> {
        Ok(Node::from(value))
    }

    fn visit_string<E>(self, value: String) -> Result<Node, E> {
        Ok(Node::from(value))
    }

    fn visit_bytes<E>(self, value: &[u8]) -> Result<Node, E>
    where
        E: de::Error,
    {
        Err(invalid_argument(format_args!("byte string of length {}", value.len())))
    }

    fn visit_unit<E>(self) -> Result<Node, E> {
        Ok(Node::NULL)
    }

    fn visit_none<E>(self) -> Result<Node, E> {
        Ok(Node::NULL)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or_default());
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value()?;
            entries.insert(key, value);
        }
        Ok(Node::Mapping(entries))
    }

    fn visit_enum<A>(self, _data: A) -> Result<Node, A::Error>
    where
        A: EnumAccess<'de>,
    {
        Err(invalid_argument("tagged value"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::de::value::{BytesDeserializer, Error as ValueError, F64Deserializer};

    #[rstest]
    #[case::null("null", NodeKind::Scalar)]
    #[case::boolean("true", NodeKind::Scalar)]
    #[case::integer("42", NodeKind::Scalar)]
    #[case::float("-1.5", NodeKind::Scalar)]
    #[case::string(r#""io.k8s.api.apps.v1.Deployment""#, NodeKind::Scalar)]
    #[case::sequence("[1, \"two\", null]", NodeKind::Sequence)]
    #[case::empty_sequence("[]", NodeKind::Sequence)]
    #[case::mapping(r#"{"type": "object"}"#, NodeKind::Mapping)]
    #[case::empty_mapping("{}", NodeKind::Mapping)]
    fn should_classify_every_json_shape(#[case] json: &str, #[case] expected: NodeKind) {
        let node: Node = serde_json::from_str(json).expect("should decode");

        assert_eq!(node.kind(), expected);
    }

    #[test]
    fn should_distinguish_null_from_absent() {
        let node: Node = serde_json::from_str(r#"{"default": null}"#).expect("should decode");

        assert!(node.get("default").is_some_and(Node::is_null));
        assert!(node.get("missing").is_none());
    }

    #[test]
    fn should_reject_byte_strings() {
        let deserializer = BytesDeserializer::<ValueError>::new(b"\x00\x01");

        let error = Node::deserialize(deserializer).expect_err("bytes are not a node");

        assert!(error.to_string().starts_with("Invalid argument"));
    }

    #[test]
    fn should_reject_non_finite_numbers() {
        let deserializer = F64Deserializer::<ValueError>::new(f64::NAN);

        let error = Node::deserialize(deserializer).expect_err("NaN is not a node");

        assert_eq!(error.to_string(), "Invalid argument: non-finite number NaN");
        assert!(Node::from_f64(f64::INFINITY).is_err());
        assert!(Node::from_f64(0.5).is_ok());
    }

    #[test]
    fn should_keep_mapping_insertion_order() {
        let node: Node =
            serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).expect("should decode");

        let keys = node
            .as_mapping()
            .map(|entries| entries.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(node.to_string(), r#"{"zeta":1,"alpha":2,"mid":3}"#);
    }
}
