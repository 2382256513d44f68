//! Reference-closed subsets of a Swagger 2.0 document.
//!
//! A subset keeps a handful of operations from a large document, together with every
//! definition and parameter they reach through `$ref`, directly or transitively. The
//! result stands on its own: every pointer it contains resolves inside it.
//!
//! # Example
//!
//! ```rust,no_run
//! use subspec_core::{Document, SubsetBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Document::load("openshift-openapi.json")?;
//! let subset = SubsetBuilder::default().build(&source)?;
//!
//! println!("{} definitions kept", subset.stats.definitions);
//! # Ok(())
//! # }
//! ```
//!
//! # Closure
//!
//! References are followed with an explicit worklist. An entity is copied the first
//! time its name is popped and skipped afterwards, so shared and cyclic references
//! terminate with each entity copied exactly once. Entities come out in the order a
//! recursive depth-first walk would copy them.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::document::Document;
use crate::node::Node;
use crate::reference::{RefCategory, Reference};
use crate::walker;

mod error;
pub use self::error::*;

mod root;
pub use self::root::*;

const PATHS_KEY: &str = "paths";
const PATH_PARAMETERS_KEY: &str = "parameters";

/// Top-level keys copied verbatim from the source document when present.
const HEADER_KEYS: [&str; 4] = ["swagger", "info", "security", "securityDefinitions"];

/// Builds reference-closed subsets for a set of root operations.
///
/// The default builder keeps the two deployment operations of
/// [`RootOperation::deployments`].
#[derive(Debug, Clone)]
pub struct SubsetBuilder {
    roots: Vec<RootOperation>,
}

/// Counters describing an extracted subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubsetStats {
    /// Number of retained operations.
    pub operations: usize,
    /// Number of copied definitions.
    pub definitions: usize,
    /// Number of copied parameters.
    pub parameters: usize,
}

/// An extracted subset and its statistics.
#[derive(Debug, Clone)]
pub struct Subset {
    /// The self-contained subset document.
    pub document: Document,
    /// What was copied.
    pub stats: SubsetStats,
}

impl Default for SubsetBuilder {
    fn default() -> Self {
        Self::new(RootOperation::deployments())
    }
}

impl SubsetBuilder {
    /// Creates a builder retaining `roots`.
    pub fn new(roots: impl IntoIterator<Item = RootOperation>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    /// The retained operations.
    #[must_use]
    pub fn roots(&self) -> &[RootOperation] {
        &self.roots
    }

    /// Extracts the subset of `source` reachable from the root operations.
    ///
    /// The output holds, in order: the `swagger`, `info`, `security` and
    /// `securityDefinitions` entries of the source (when present), the retained
    /// `paths`, then the `definitions` and `parameters` tables filled by the closure.
    ///
    /// # Errors
    ///
    /// - [`SubsetError::MissingPaths`], [`SubsetError::MissingPath`] or
    ///   [`SubsetError::MissingOperation`] when a root cannot be found
    /// - [`SubsetError::Reference`] when a reachable `$ref` is not a supported local pointer
    /// - [`SubsetError::DanglingReference`] when a reachable `$ref` names an absent entity
    pub fn build(&self, source: &Document) -> Result<Subset, SubsetError> {
        let paths = Node::Mapping(self.select_paths(source)?);

        let mut closure = Closure::new(source);
        closure.extend_from(&paths)?;
        closure.run()?;

        let mut document = Document::new();
        for key in HEADER_KEYS {
            if let Some(value) = source.get(key) {
                document.insert(key.to_owned(), value.clone());
            }
        }
        document.insert(PATHS_KEY.to_owned(), paths);

        let stats = SubsetStats {
            operations: self.roots.len(),
            definitions: closure.definitions.len(),
            parameters: closure.parameters.len(),
        };
        let Closure {
            definitions,
            parameters,
            ..
        } = closure;
        document.insert(
            RefCategory::Definitions.table_key().to_owned(),
            Node::Mapping(definitions),
        );
        document.insert(
            RefCategory::Parameters.table_key().to_owned(),
            Node::Mapping(parameters),
        );

        Ok(Subset { document, stats })
    }

    /// Copies the root operations into a new `paths` table.
    ///
    /// Each path item keeps its path-level `parameters` followed by the selected methods.
    fn select_paths(&self, source: &Document) -> Result<IndexMap<String, Node>, SubsetError> {
        let source_paths = source.mapping(PATHS_KEY).ok_or(SubsetError::MissingPaths)?;

        let mut items: IndexMap<String, IndexMap<String, Node>> = IndexMap::new();
        for root in &self.roots {
            let path_item = source_paths
                .get(root.path())
                .and_then(Node::as_mapping)
                .ok_or_else(|| SubsetError::MissingPath {
                    path: root.path().to_owned(),
                })?;

            let method_key = root.method_key();
            let operation =
                path_item
                    .get(&method_key)
                    .ok_or_else(|| SubsetError::MissingOperation {
                        path: root.path().to_owned(),
                        method: root.method().to_string(),
                    })?;

            let item = items.entry(root.path().to_owned()).or_insert_with(|| {
                path_item
                    .get(PATH_PARAMETERS_KEY)
                    .map(|parameters| {
                        IndexMap::from([(PATH_PARAMETERS_KEY.to_owned(), parameters.clone())])
                    })
                    .unwrap_or_default()
            });
            debug!(%root, "retaining operation");
            item.insert(method_key, operation.clone());
        }

        Ok(items
            .into_iter()
            .map(|(path, item)| (path, Node::Mapping(item)))
            .collect())
    }
}

/// State of a closure computation over one source document.
///
/// The output tables double as the visited set: a name present in a table is never
/// copied nor scanned again.
struct Closure<'src> {
    source: &'src Document,
    pending: Vec<Reference>,
    definitions: IndexMap<String, Node>,
    parameters: IndexMap<String, Node>,
    /// Entities whose own references were scheduled.
    scanned: usize,
}

impl<'src> Closure<'src> {
    fn new(source: &'src Document) -> Self {
        Self {
            source,
            pending: Vec::new(),
            definitions: IndexMap::new(),
            parameters: IndexMap::new(),
            scanned: 0,
        }
    }

    fn table(&mut self, category: RefCategory) -> &mut IndexMap<String, Node> {
        match category {
            RefCategory::Definitions => &mut self.definitions,
            RefCategory::Parameters => &mut self.parameters,
        }
    }

    /// Schedules the references of `node`, keeping discovery order on the stack.
    fn extend_from(&mut self, node: &Node) -> Result<(), SubsetError> {
        let discovered = walker::collect_references(node)?;
        self.pending.extend(discovered.into_iter().rev());
        Ok(())
    }

    fn resolve(&self, reference: &Reference) -> Result<&'src Node, SubsetError> {
        self.source
            .mapping(reference.category().table_key())
            .and_then(|table| table.get(reference.name()))
            .ok_or_else(|| SubsetError::DanglingReference {
                pointer: reference.pointer(),
            })
    }

    fn run(&mut self) -> Result<(), SubsetError> {
        while let Some(reference) = self.pending.pop() {
            if self.table(reference.category()).contains_key(reference.name()) {
                trace!(%reference, "already copied");
                continue;
            }

            let entity = self.resolve(&reference)?;
            debug!(%reference, "copying referenced entity");
            self.table(reference.category())
                .insert(reference.name().to_owned(), entity.clone());
            self.extend_from(entity)?;
            self.scanned += 1;
        }
        debug!(scanned = self.scanned, "closure complete");
        Ok(())
    }
}
