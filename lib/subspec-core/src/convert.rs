//! Conversion of Swagger 2.0 documents to OpenAPI 3.
//!
//! The conversion itself is delegated to a remote service, see [`SwaggerConverter`].

use std::future::Future;

use http::StatusCode;
use http::header::ACCEPT;
use tracing::debug;
use url::Url;

use crate::document::Document;
use crate::node::Node;

/// Endpoint of the public swagger.io converter.
pub const DEFAULT_CONVERTER_URL: &str = "https://converter.swagger.io/api/convert";

/// The `openapi` version stamped onto converted documents.
pub const TARGET_OPENAPI_VERSION: &str = "3.1.0";

/// Maximum number of response body bytes kept in error messages.
const BODY_MAX_LENGTH: usize = 1024;

/// Translates a Swagger 2.0 document into a newer dialect.
///
/// # Example
///
/// ```rust
/// use subspec_core::{ConvertError, Converter, Document};
///
/// /// Returns documents unchanged.
/// struct Identity;
///
/// impl Converter for Identity {
///     async fn convert(&self, document: &Document) -> Result<Document, ConvertError> {
///         Ok(document.clone())
///     }
/// }
/// ```
pub trait Converter {
    /// Converts `document`, returning the translated document.
    fn convert(
        &self,
        document: &Document,
    ) -> impl Future<Output = Result<Document, ConvertError>> + Send;
}

/// Errors raised by a [`Converter`].
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ConvertError {
    /// The request could not be sent or the response could not be read.
    Request(reqwest::Error),

    /// The service answered with a non-success status.
    #[display("Converter answered {status}: {body}")]
    #[from(skip)]
    UnexpectedStatus {
        /// The response status.
        status: StatusCode,
        /// The (possibly truncated) response body.
        body: String,
    },

    /// The response body is not a JSON document.
    #[display("Converter returned an invalid document at '{path}': {error}\n{body}")]
    #[from(skip)]
    InvalidResponse {
        /// Location of the failure inside the body.
        path: String,
        /// The underlying decoding error.
        error: serde_json::Error,
        /// The (possibly truncated) response body.
        body: String,
    },
}

/// A [`Converter`] backed by the swagger.io conversion API.
///
/// The document is POSTed as JSON and the JSON response is taken as the converted
/// document. There is no retry and no timeout beyond those of the [`reqwest::Client`].
///
/// ```rust,no_run
/// use subspec_core::{Converter, Document, SwaggerConverter};
///
/// # async fn example(document: Document) -> Result<(), Box<dyn std::error::Error>> {
/// let converter = SwaggerConverter::new("http://localhost:8080/api/convert".parse()?);
/// let converted = converter.convert(&document).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SwaggerConverter {
    client: reqwest::Client,
    url: Url,
}

impl SwaggerConverter {
    /// Creates a converter posting to `url`.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// Uses a preconfigured HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The conversion endpoint.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Converter for SwaggerConverter {
    async fn convert(&self, document: &Document) -> Result<Document, ConvertError> {
        debug!(url = %self.url, "posting document to converter");
        let response = self
            .client
            .post(self.url.clone())
            .header(ACCEPT, "application/json")
            .json(document)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, length = body.len(), "converter answered");

        if !status.is_success() {
            return Err(ConvertError::UnexpectedStatus {
                status,
                body: truncate_body(body),
            });
        }

        let deserializer = &mut serde_json::Deserializer::from_str(&body);
        serde_path_to_error::deserialize(deserializer).map_err(|err| {
            ConvertError::InvalidResponse {
                path: err.path().to_string(),
                error: err.into_inner(),
                body: truncate_body(body.clone()),
            }
        })
    }
}

fn truncate_body(mut body: String) -> String {
    if body.len() > BODY_MAX_LENGTH {
        let mut end = BODY_MAX_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("... (truncated)");
    }
    body
}

/// Stamps [`TARGET_OPENAPI_VERSION`] onto the `openapi` key of `document`.
///
/// An existing key keeps its position.
pub fn stamp_version(document: &mut Document) {
    document.insert("openapi".to_owned(), Node::from(TARGET_OPENAPI_VERSION));
}
