//! The extraction pipeline: subset, convert, stamp.

use tracing::info;

use crate::convert::{ConvertError, Converter, stamp_version};
use crate::document::{Document, DocumentError};
use crate::emit::EmitError;
use crate::subset::{Subset, SubsetBuilder, SubsetError};

/// Errors raised by any stage of the pipeline.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum GeneratorError {
    /// Loading the source document failed.
    Document(DocumentError),
    /// Extracting the subset failed.
    Subset(SubsetError),
    /// The conversion service failed.
    Convert(ConvertError),
    /// Rendering the result failed.
    Emit(EmitError),
}

/// Produces the OpenAPI 3 subset of a Swagger 2.0 document.
///
/// ```rust,no_run
/// use subspec_core::{DEFAULT_CONVERTER_URL, Document, OutputFormat, SpecGenerator, SwaggerConverter, emit};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = Document::load("openshift-openapi.json")?;
/// let generator = SpecGenerator::new(SwaggerConverter::new(DEFAULT_CONVERTER_URL.parse()?));
///
/// let document = generator.generate(&source).await?;
/// emit(&document, OutputFormat::Json, &mut std::io::stdout())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SpecGenerator<C> {
    builder: SubsetBuilder,
    converter: C,
}

impl<C> SpecGenerator<C>
where
    C: Converter,
{
    /// Creates a generator keeping the deployment operations.
    pub fn new(converter: C) -> Self {
        Self {
            builder: SubsetBuilder::default(),
            converter,
        }
    }

    /// Replaces the subset builder.
    #[must_use]
    pub fn with_builder(mut self, builder: SubsetBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Extracts the Swagger 2.0 subset without converting it.
    ///
    /// # Errors
    ///
    /// See [`SubsetBuilder::build`].
    pub fn subset(&self, source: &Document) -> Result<Subset, GeneratorError> {
        let subset = self.builder.build(source)?;
        let stats = subset.stats;
        info!(
            operations = stats.operations,
            definitions = stats.definitions,
            parameters = stats.parameters,
            "subset extracted"
        );
        Ok(subset)
    }

    /// Extracts the subset, converts it and stamps the target `openapi` version.
    ///
    /// # Errors
    ///
    /// Fails on the first failing stage; nothing is retried.
    pub async fn generate(&self, source: &Document) -> Result<Document, GeneratorError> {
        let Subset { document, .. } = self.subset(source)?;

        let mut converted = self.converter.convert(&document).await?;
        info!(keys = converted.len(), "subset converted");

        stamp_version(&mut converted);
        Ok(converted)
    }
}
