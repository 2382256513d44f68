//! Top-level API description documents.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::node::Node;

/// A whole API description: a string-keyed mapping kept in insertion order.
///
/// Both the full source document and the extracted subset are `Document`s.
/// It dereferences to the underlying [`IndexMap`].
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_more::Deref, derive_more::DerefMut,
)]
#[serde(transparent)]
pub struct Document(IndexMap<String, Node>);

/// Errors raised while loading a [`Document`].
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum DocumentError {
    /// The source file could not be read.
    #[display("Cannot read '{}': {error}", path.display())]
    Read {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        error: std::io::Error,
    },

    /// The JSON text is malformed or contains an invalid node.
    #[display("Failed to decode JSON document at '{path}': {error}")]
    Json {
        /// Location of the failure inside the document.
        path: String,
        /// The underlying decoding error.
        error: serde_json::Error,
    },

    /// The YAML text is malformed or contains an invalid node.
    #[display("Failed to decode YAML document: {message}")]
    Yaml {
        /// Decoder message.
        message: String,
    },

    /// The root value is not a mapping.
    #[display("Invalid argument: expected a mapping at the document root, got a {kind}")]
    NotAMapping {
        /// The shape that was found instead.
        kind: crate::NodeKind,
    },
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Json`] with the failing location when the text is not a JSON
    /// object made only of scalars, arrays and objects.
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        let deserializer = &mut serde_json::Deserializer::from_str(text);
        serde_path_to_error::deserialize(deserializer).map_err(|err| DocumentError::Json {
            path: err.path().to_string(),
            error: err.into_inner(),
        })
    }

    /// Decodes a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Yaml`] when the text is not a YAML mapping made only of
    /// scalars, sequences and string-keyed mappings.
    pub fn from_yaml_str(text: &str) -> Result<Self, DocumentError> {
        serde_saphyr::from_str(text).map_err(|err| DocumentError::Yaml {
            message: err.to_string(),
        })
    }

    /// Loads a document from disk.
    ///
    /// Files ending in `.yaml` or `.yml` are decoded as YAML, anything else as JSON.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or decoded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading source document");
        let text = fs::read_to_string(path).map_err(|error| DocumentError::Read {
            path: path.to_path_buf(),
            error,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Self::from_yaml_str(&text)
        } else {
            Self::from_json_str(&text)
        }
    }

    /// Looks up a top-level key holding a mapping.
    #[must_use]
    pub fn mapping(&self, key: &str) -> Option<&IndexMap<String, Node>> {
        self.0.get(key).and_then(Node::as_mapping)
    }

    /// Returns the entries of this document.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, Node> {
        self.0
    }
}

impl From<IndexMap<String, Node>> for Document {
    fn from(entries: IndexMap<String, Node>) -> Self {
        Self(entries)
    }
}

impl From<Document> for Node {
    fn from(document: Document) -> Self {
        Self::Mapping(document.0)
    }
}

impl TryFrom<Node> for Document {
    type Error = DocumentError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match node {
            Node::Mapping(entries) => Ok(Self(entries)),
            other => Err(DocumentError::NotAMapping { kind: other.kind() }),
        }
    }
}
