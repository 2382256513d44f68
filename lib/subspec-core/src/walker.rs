//! Depth-first discovery of `$ref` occurrences in a document subtree.

use crate::node::Node;
use crate::reference::{REF_KEY, Reference, ReferenceError};

/// Visits `node` depth-first and reports every reference it contains.
///
/// Sequences are visited in order, mappings in insertion order. When a mapping entry is
/// keyed by [`REF_KEY`], its value is parsed and passed to `on_reference` before the
/// walk continues into that value and the remaining sibling entries.
///
/// The walker does not follow references: callers decide what to do with them.
///
/// # Errors
///
/// Stops at the first `$ref` whose value is not a supported local pointer.
pub fn visit<F>(node: &Node, on_reference: &mut F) -> Result<(), ReferenceError>
where
    F: FnMut(Reference),
{
    match node {
        Node::Scalar(_) => Ok(()),
        Node::Sequence(items) => {
            for item in items {
                visit(item, on_reference)?;
            }
            Ok(())
        }
        Node::Mapping(entries) => {
            for (key, value) in entries {
                if key == REF_KEY {
                    on_reference(Reference::from_node(value)?);
                }
                visit(value, on_reference)?;
            }
            Ok(())
        }
    }
}

/// Collects the references of `node` in discovery order, duplicates included.
///
/// # Errors
///
/// See [`visit`].
pub fn collect_references(node: &Node) -> Result<Vec<Reference>, ReferenceError> {
    let mut references = Vec::new();
    visit(node, &mut |reference| references.push(reference))?;
    Ok(references)
}
