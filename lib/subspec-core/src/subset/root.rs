//! The fixed set of operations kept in the subset.

use std::fmt::{self, Display};

use http::Method;

/// Path of the namespaced deployments collection.
pub const DEPLOYMENTS_PATH: &str = "/apis/apps/v1/namespaces/{namespace}/deployments";

/// Path of a single namespaced deployment.
pub const DEPLOYMENT_PATH: &str = "/apis/apps/v1/namespaces/{namespace}/deployments/{name}";

/// An operation retained from the source document: a path and one of its methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootOperation {
    path: String,
    method: Method,
}

impl RootOperation {
    /// Creates a root for `method` on `path`.
    pub fn new(path: impl Into<String>, method: Method) -> Self {
        Self {
            path: path.into(),
            method,
        }
    }

    /// The two deployment operations: list deployments and patch a deployment.
    #[must_use]
    pub fn deployments() -> [Self; 2] {
        [
            Self::new(DEPLOYMENTS_PATH, Method::GET),
            Self::new(DEPLOYMENT_PATH, Method::PATCH),
        ]
    }

    /// The path template.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The key of the operation inside a Swagger path item, e.g. `get`.
    #[must_use]
    pub fn method_key(&self) -> String {
        self.method.as_str().to_ascii_lowercase()
    }
}

impl Display for RootOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
