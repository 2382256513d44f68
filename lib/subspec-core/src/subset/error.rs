use crate::reference::ReferenceError;

/// Errors raised while extracting a subset.
///
/// None of them is recoverable: a subset with a missing root or entity would not be
/// usable on its own.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum SubsetError {
    /// A `$ref` points outside the supported categories.
    Reference(ReferenceError),

    /// The source document has no `paths` mapping.
    #[display("Invalid argument: the source document has no 'paths' mapping")]
    MissingPaths,

    /// A retained path is absent from the source document.
    #[display("Path '{path}' not found in the source document")]
    #[from(skip)]
    MissingPath {
        /// The path template.
        path: String,
    },

    /// A retained method is absent from its path item.
    #[display("Operation {method} not found on path '{path}'")]
    #[from(skip)]
    MissingOperation {
        /// The path template.
        path: String,
        /// The HTTP method.
        method: String,
    },

    /// A `$ref` names an entity the source document does not define.
    #[display("Dangling $ref: '{pointer}' does not resolve in the source document")]
    #[from(skip)]
    DanglingReference {
        /// The unresolved pointer.
        pointer: String,
    },
}
