//! Capability roles shared by instance nodes (DOI/SDI/DAI) and template
//! nodes (DO/SDO/DA/BDA), and the walker that descends through them.

use tracing::trace;

use crate::types::BasicType;

/// A node that can stand at the end of a reference.
pub trait DataNode {
    fn name(&self) -> &str;

    /// Declared basic type, when the node knows it.
    fn basic_type(&self) -> Option<BasicType>;
}

/// A node that has named children.
///
/// Children are looked up in one of two ways: as a *structured* child, which
/// can be descended into further (SDI, SDO, DA/BDA of type `Struct`), or as a
/// *data* child, which ends a reference (DAI, DA/BDA of any other type).
pub trait DataParentNode: DataNode + Sized {
    /// Lookup failure which is not simply "no such child".
    type Error;

    fn structured_child(&self, name: &str) -> Result<Option<Self>, Self::Error>;

    fn data_child(&self, name: &str) -> Result<Option<Self>, Self::Error>;

    fn child(&self, name: &str, kind: ChildKind) -> Result<Option<Self>, Self::Error> {
        match kind {
            ChildKind::Structured => self.structured_child(name),
            ChildKind::Data => self.data_child(name),
        }
    }
}

/// How a name is looked up by [`find_deepest_match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    Structured,
    Data,
}

/// How far [`find_deepest_match`] got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descent<N> {
    /// No names were given: the walk stays on the start node.
    Stayed(N),
    /// The first name was not found.
    NotFound,
    /// `index` is the position of the last name matched; the next one was
    /// not found.
    Partial { node: N, index: usize },
    /// Every name matched.
    Full(N),
}

impl<N> Descent<N> {
    pub fn is_full(&self) -> bool {
        matches!(self, Descent::Full(_))
    }

    /// The deepest node reached, if any.
    pub fn node(&self) -> Option<&N> {
        match self {
            Descent::Stayed(node) | Descent::Partial { node, .. } | Descent::Full(node) => {
                Some(node)
            }
            Descent::NotFound => None,
        }
    }

    pub fn into_node(self) -> Option<N> {
        match self {
            Descent::Stayed(node) | Descent::Partial { node, .. } | Descent::Full(node) => {
                Some(node)
            }
            Descent::NotFound => None,
        }
    }
}

/// Descends from `start` through `names`, as far as children exist.
///
/// Every name but the last is looked up as a structured child, the last one
/// as `last`. The walk stops at the first missing name; siblings are never
/// tried.
pub fn find_deepest_match<N, S>(start: N, names: &[S], last: ChildKind) -> Result<Descent<N>, N::Error>
where
    N: DataParentNode,
    S: AsRef<str>,
{
    if names.is_empty() {
        return Ok(Descent::Stayed(start));
    }

    let mut node = start;
    for (index, name) in names.iter().enumerate() {
        let name = name.as_ref();
        let kind = if index == names.len() - 1 {
            last
        } else {
            ChildKind::Structured
        };

        match node.child(name, kind)? {
            Some(child) => node = child,
            None if index == 0 => {
                trace!("'{}' has no {:?} child '{}'", node.name(), kind, name);
                return Ok(Descent::NotFound);
            }
            None => {
                trace!(
                    "Descent stopped under '{}', no {:?} child '{}'",
                    node.name(),
                    kind,
                    name
                );
                return Ok(Descent::Partial {
                    node,
                    index: index - 1,
                });
            }
        }
    }

    Ok(Descent::Full(node))
}
