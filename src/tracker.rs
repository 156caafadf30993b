//! Tracking of a `DO[.SDO].DA[.BDA]` reference down to its DAI.
//!
//! The instance chain mirrors the declared one:
//!
//! * a DOI instantiates a DO;
//! * an SDI instantiates an SDO, or a DA/BDA of type `Struct`;
//! * a DAI instantiates the final DA/BDA, whatever its type as long as it is
//!   not `Struct`.

use core::fmt;
use core::str::FromStr;

use tracing::{debug, trace};

use crate::bounds;
use crate::error::{TemplateError, ValidationError};
use crate::instance::{Dai, InstanceNode, LogicalNode};
use crate::node::{find_deepest_match, ChildKind, DataParentNode, Descent};
use crate::reference::{AttributePath, ObjectPath};
use crate::template::{DataTypeTemplates, TemplateNode};

/// How completely a reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchResult {
    /// Not even the DOI exists.
    Failed,
    /// The DOI exists, some SDI/DAI below it does not.
    PartialMatch,
    /// The whole chain down to the DAI exists.
    FullMatch,
}

impl MatchResult {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MatchResult::Failed => "FAILED",
            MatchResult::PartialMatch => "PARTIAL_MATCH",
            MatchResult::FullMatch => "FULL_MATCH",
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchResult {
    type Err = crate::types::UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            MatchResult::Failed,
            MatchResult::PartialMatch,
            MatchResult::FullMatch,
        ]
        .into_iter()
        .find(|r| r.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| crate::types::UnknownLiteral {
            kind: "match result",
            literal: s.to_string(),
        })
    }
}

/// How far one side (object or attribute) of a reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatch {
    /// The side was never looked at because an earlier hop failed.
    NotSearched,
    /// The first name of the side was not found.
    NotFound,
    /// The first name and the `matched` nested names after it were found,
    /// but not all of them.
    Partial { matched: usize },
    /// Every name of the side was found.
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideMatch<N> {
    /// Deepest node reached on this side.
    pub node: Option<N>,
    pub depth: PathMatch,
}

impl<N> SideMatch<N> {
    fn not_searched() -> Self {
        Self {
            node: None,
            depth: PathMatch::NotSearched,
        }
    }

    fn not_found() -> Self {
        Self {
            node: None,
            depth: PathMatch::NotFound,
        }
    }

    fn full(node: N) -> Self {
        Self {
            node: Some(node),
            depth: PathMatch::Full,
        }
    }

    /// Outcome of walking the nested names from `start`, whose own name
    /// matched.
    fn from_descent(start: N, descent: Descent<N>) -> Self {
        match descent {
            Descent::Stayed(node) | Descent::Full(node) => Self::full(node),
            Descent::NotFound => Self {
                node: Some(start),
                depth: PathMatch::Partial { matched: 0 },
            },
            Descent::Partial { node, index } => Self {
                node: Some(node),
                depth: PathMatch::Partial { matched: index + 1 },
            },
        }
    }

    pub fn is_full(&self) -> bool {
        self.depth == PathMatch::Full
    }
}

/// Outcome of [`search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord<N> {
    pub result: MatchResult,
    /// DOI or deepest SDI of the object path.
    pub object: SideMatch<N>,
    /// Deepest SDI of the attribute path, or its DAI.
    pub attribute: SideMatch<N>,
}

impl<N> MatchRecord<N> {
    pub fn is_full_match(&self) -> bool {
        self.result == MatchResult::FullMatch
    }
}

impl<'a> MatchRecord<InstanceNode<'a>> {
    /// The DAI the reference points to, on a full match.
    pub fn dai(&self) -> Option<&'a Dai> {
        if !self.is_full_match() {
            return None;
        }
        self.attribute.node.and_then(|n| n.as_dai())
    }
}

/// Looks `object` then `attribute` up under `root`.
///
/// Both the instance tree of a logical node and its `LNodeType` can be
/// searched this way. The search stops at the first hop that does not
/// resolve; the attribute side is not looked at when the object side is
/// incomplete.
pub fn search<N>(
    root: N,
    object: &ObjectPath,
    attribute: &AttributePath,
) -> Result<MatchRecord<N>, N::Error>
where
    N: DataParentNode + Clone,
{
    let mut record = MatchRecord {
        result: MatchResult::Failed,
        object: SideMatch::not_searched(),
        attribute: SideMatch::not_searched(),
    };

    let Some(doi) = root.structured_child(&object.name)? else {
        trace!("No '{}' under '{}'", object.name, root.name());
        record.object = SideMatch::not_found();
        return Ok(record);
    };
    record.result = MatchResult::PartialMatch;

    let descent = find_deepest_match(doi.clone(), &object.sdo_names, ChildKind::Structured)?;
    record.object = SideMatch::from_descent(doi, descent);
    let context = match (&record.object.node, record.object.depth) {
        (Some(node), PathMatch::Full) => node.clone(),
        _ => {
            trace!("Object path {} is incomplete", object);
            return Ok(record);
        }
    };

    if attribute.bda_names.is_empty() {
        match context.data_child(&attribute.name)? {
            Some(dai) => record.attribute = SideMatch::full(dai),
            None => {
                trace!("No DAI '{}' under '{}'", attribute.name, context.name());
                record.attribute = SideMatch::not_found();
                return Ok(record);
            }
        }
    } else {
        let Some(sdi) = context.structured_child(&attribute.name)? else {
            trace!("No SDI '{}' under '{}'", attribute.name, context.name());
            record.attribute = SideMatch::not_found();
            return Ok(record);
        };

        let descent = find_deepest_match(sdi.clone(), &attribute.bda_names, ChildKind::Data)?;
        record.attribute = SideMatch::from_descent(sdi, descent);
        if !record.attribute.is_full() {
            trace!("Attribute path {} is incomplete", attribute);
            return Ok(record);
        }
    }

    record.result = MatchResult::FullMatch;
    Ok(record)
}

/// Looks a reference up in the instance tree of `ln`.
pub fn resolve<'a>(
    ln: &'a LogicalNode,
    object: &ObjectPath,
    attribute: &AttributePath,
) -> MatchRecord<InstanceNode<'a>> {
    let record = search(ln.root(), object, attribute).unwrap_or_else(|never| match never {});
    debug!(
        "{}.{}.{}: {}",
        ln.name(),
        object,
        attribute,
        record.result
    );
    record
}

/// Looks a reference up in the declaration of `ln_type`.
pub fn resolve_template<'a>(
    templates: &'a DataTypeTemplates,
    ln_type: &str,
    object: &ObjectPath,
    attribute: &AttributePath,
) -> Result<MatchRecord<TemplateNode<'a>>, TemplateError> {
    let record = search(templates.root(ln_type)?, object, attribute)?;
    debug!("{}/{}.{}: {}", ln_type, object, attribute, record.result);
    Ok(record)
}

/// A reference into one logical node, searched and validated together.
///
/// The record returned by [`DaiTracker::search`] borrows the logical node
/// only, not the paths.
#[derive(Debug, Clone, Copy)]
pub struct DaiTracker<'ln, 'p> {
    ln: &'ln LogicalNode,
    object: &'p ObjectPath,
    attribute: &'p AttributePath,
}

impl<'ln, 'p> DaiTracker<'ln, 'p> {
    pub fn new(ln: &'ln LogicalNode, object: &'p ObjectPath, attribute: &'p AttributePath) -> Self {
        Self {
            ln,
            object,
            attribute,
        }
    }

    /// Checks whether the DOI/SDI/DAI chain of the reference is instantiated.
    pub fn search(&self) -> MatchRecord<InstanceNode<'ln>> {
        resolve(self.ln, self.object, self.attribute)
    }

    /// Checks the first value of the attribute against the bounds of its
    /// data object, see [`bounds::validate_bounds`].
    pub fn validate_bounded_dai(&self, templates: &DataTypeTemplates) -> Result<(), ValidationError> {
        bounds::validate_bounds(self.ln, templates, self.object, self.attribute)
    }
}
