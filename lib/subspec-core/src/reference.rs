//! Local `$ref` pointers of a Swagger 2.0 document.

use std::fmt::{self, Display};

use crate::node::Node;

/// The key marking a reference object.
pub const REF_KEY: &str = "$ref";

/// A partition of reusable named entities a `$ref` can point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RefCategory {
    /// Named schemas under `definitions`.
    #[display("definitions")]
    Definitions,
    /// Reusable parameters under `parameters`.
    #[display("parameters")]
    Parameters,
}

impl RefCategory {
    /// Every supported category.
    pub const ALL: [Self; 2] = [Self::Definitions, Self::Parameters];

    /// The pointer prefix for this category, e.g. `#/definitions/`.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Definitions => "#/definitions/",
            Self::Parameters => "#/parameters/",
        }
    }

    /// The top-level document key holding the entities of this category.
    #[must_use]
    pub fn table_key(self) -> &'static str {
        match self {
            Self::Definitions => "definitions",
            Self::Parameters => "parameters",
        }
    }
}

/// A resolved local reference: a category and the entity name inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    category: RefCategory,
    name: String,
}

/// Errors raised for `$ref` values the closure cannot follow.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum ReferenceError {
    /// The pointer does not target a supported category.
    #[display("Unsupported $ref: {pointer}")]
    Unsupported {
        /// The offending `$ref` value.
        pointer: String,
    },
}

impl Reference {
    /// Creates a reference to `name` in `category`.
    pub fn new(category: RefCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }

    /// Parses a `$ref` pointer such as `#/definitions/io.k8s.api.apps.v1.Deployment`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::Unsupported`] when the pointer has no supported prefix
    /// or names nothing after it.
    pub fn parse(pointer: &str) -> Result<Self, ReferenceError> {
        RefCategory::ALL
            .into_iter()
            .find_map(|category| {
                pointer
                    .strip_prefix(category.prefix())
                    .filter(|name| !name.is_empty())
                    .map(|name| Self::new(category, name))
            })
            .ok_or_else(|| ReferenceError::Unsupported {
                pointer: pointer.to_owned(),
            })
    }

    /// Parses the value found under a [`REF_KEY`] entry.
    ///
    /// # Errors
    ///
    /// Non-string values are unsupported, as are strings rejected by [`Reference::parse`].
    pub fn from_node(value: &Node) -> Result<Self, ReferenceError> {
        match value.as_str() {
            Some(pointer) => Self::parse(pointer),
            None => Err(ReferenceError::Unsupported {
                pointer: value.to_string(),
            }),
        }
    }

    /// The category this reference points into.
    #[must_use]
    pub fn category(&self) -> RefCategory {
        self.category
    }

    /// The entity name, without the category prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `$ref` pointer string.
    #[must_use]
    pub fn pointer(&self) -> String {
        self.to_string()
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.category.prefix(), self.name)
    }
}
