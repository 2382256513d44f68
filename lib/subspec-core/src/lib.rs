//! # Subspec Core
//!
//! Extract a small, self-contained subset of a large Swagger 2.0 document and turn it
//! into an OpenAPI 3 document.
//!
//! The interesting part is the **reference closure**: starting from a few retained
//! operations, every `#/definitions/...` and `#/parameters/...` pointer reachable from
//! them (directly or through other definitions) is copied into the subset, exactly once,
//! even in the presence of cycles. The subset is then sent to a conversion service and
//! rendered as YAML or JSON.
//!
//! ## Pipeline
//!
//! 1. [`Document::load`] decodes the source document into a [`Node`] tree
//! 2. [`SubsetBuilder::build`] copies the [`RootOperation`]s and closes over their references
//! 3. a [`Converter`] (usually [`SwaggerConverter`]) translates the subset
//! 4. [`stamp_version`] sets `openapi` to [`TARGET_OPENAPI_VERSION`]
//! 5. [`emit`] writes the result in the chosen [`OutputFormat`]
//!
//! [`SpecGenerator`] chains steps 2 to 4.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use subspec_core::{Document, OutputFormat, RootOperation, SubsetBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Document::from_json_str(r##"{
//!     "swagger": "2.0",
//!     "paths": {
//!         "/pets": {"get": {"responses": {"200": {"schema": {"$ref": "#/definitions/Pet"}}}}},
//!         "/owners": {"get": {"responses": {"200": {"schema": {"$ref": "#/definitions/Owner"}}}}}
//!     },
//!     "definitions": {
//!         "Pet": {"properties": {"tag": {"$ref": "#/definitions/Tag"}}},
//!         "Tag": {"type": "string"},
//!         "Owner": {"type": "object"}
//!     }
//! }"##)?;
//!
//! let subset = SubsetBuilder::new([RootOperation::new("/pets", Method::GET)]).build(&source)?;
//!
//! assert_eq!(subset.stats.definitions, 2);
//! let yaml = OutputFormat::Yaml.render(&subset.document)?;
//! assert!(!yaml.contains("Owner"));
//! # Ok(())
//! # }
//! ```

mod convert;
mod document;
mod emit;
mod generator;
mod node;
mod reference;
mod subset;
pub mod walker;

pub use self::convert::{
    ConvertError, Converter, DEFAULT_CONVERTER_URL, SwaggerConverter, TARGET_OPENAPI_VERSION,
    stamp_version,
};
pub use self::document::{Document, DocumentError};
pub use self::emit::{EmitError, OutputFormat, YamlError, emit};
pub use self::generator::{GeneratorError, SpecGenerator};
pub use self::node::{Node, NodeError, NodeKind, Scalar};
pub use self::reference::{REF_KEY, RefCategory, Reference, ReferenceError};
pub use self::subset::{
    DEPLOYMENT_PATH, DEPLOYMENTS_PATH, RootOperation, Subset, SubsetBuilder, SubsetError,
    SubsetStats,
};
