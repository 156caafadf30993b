//! Instantiated data of a logical node: DOI, SDI and DAI elements.

use core::convert::Infallible;
use std::collections::BTreeMap;

use tracing::debug;

use crate::node::{DataNode, DataParentNode};
use crate::template::TemplateAttributeRef;
use crate::tracker::{self, MatchResult};
use crate::types::{BasicType, SettingGroup};

/// An `LN0` or `LN` element with its instantiated data objects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogicalNode {
    pub prefix: Option<String>,
    pub ln_class: String,
    pub inst: String,
    /// Id of the `LNodeType` describing this node.
    pub ln_type: String,
    pub dois: Vec<Doi>,
}

impl LogicalNode {
    pub fn new(ln_class: impl Into<String>, inst: impl Into<String>, ln_type: impl Into<String>) -> Self {
        Self {
            ln_class: ln_class.into(),
            inst: inst.into(),
            ln_type: ln_type.into(),
            ..Default::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_doi(mut self, doi: Doi) -> Self {
        self.dois.push(doi);
        self
    }

    pub fn doi(&self, name: &str) -> Option<&Doi> {
        self.dois.iter().find(|doi| doi.name == name)
    }

    /// `prefix + lnClass + inst`, the name of the node inside its LDevice.
    pub fn name(&self) -> String {
        format!(
            "{}{}{}",
            self.prefix.as_deref().unwrap_or_default(),
            self.ln_class,
            self.inst
        )
    }

    /// The node as the root of a reference resolution.
    pub fn root(&self) -> InstanceNode<'_> {
        InstanceNode::Ln(self)
    }

    /// Values instantiated for a template attribute.
    ///
    /// Empty unless the reference resolves completely to a DAI.
    pub fn dai_values(&self, attribute_ref: &TemplateAttributeRef) -> BTreeMap<SettingGroup, String> {
        let record = tracker::resolve(self, &attribute_ref.object, &attribute_ref.attribute);

        match (record.result, record.attribute.node) {
            (MatchResult::FullMatch, Some(InstanceNode::Dai(dai))) => dai.values.clone(),
            (result, _) => {
                debug!(
                    "No DAI for {} in {} ({})",
                    attribute_ref.reference(),
                    self.name(),
                    result
                );
                BTreeMap::new()
            }
        }
    }
}

/// A `DOI` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Doi {
    pub name: String,
    pub children: Vec<DataInstance>,
}

impl Doi {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_sdi(mut self, sdi: Sdi) -> Self {
        self.children.push(DataInstance::Sdi(sdi));
        self
    }

    pub fn with_dai(mut self, dai: Dai) -> Self {
        self.children.push(DataInstance::Dai(dai));
        self
    }
}

/// Content of a DOI or an SDI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataInstance {
    Sdi(Sdi),
    Dai(Dai),
}

/// An `SDI` element: instance of an SDO or of a `Struct` DA/BDA.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sdi {
    pub name: String,
    pub children: Vec<DataInstance>,
}

impl Sdi {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_sdi(mut self, sdi: Sdi) -> Self {
        self.children.push(DataInstance::Sdi(sdi));
        self
    }

    pub fn with_dai(mut self, dai: Dai) -> Self {
        self.children.push(DataInstance::Dai(dai));
        self
    }
}

/// A `DAI` element and its `Val` children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dai {
    pub name: String,
    pub values: BTreeMap<SettingGroup, String>,
    pub val_import: Option<bool>,
}

impl Dai {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, group: SettingGroup, value: impl Into<String>) -> Self {
        self.values.insert(group, value.into());
        self
    }

    pub fn with_val_import(mut self, val_import: bool) -> Self {
        self.val_import = Some(val_import);
        self
    }
}

fn find_sdi<'a>(children: &'a [DataInstance], name: &str) -> Option<&'a Sdi> {
    children.iter().find_map(|child| match child {
        DataInstance::Sdi(sdi) if sdi.name == name => Some(sdi),
        _ => None,
    })
}

fn find_dai<'a>(children: &'a [DataInstance], name: &str) -> Option<&'a Dai> {
    children.iter().find_map(|child| match child {
        DataInstance::Dai(dai) if dai.name == name => Some(dai),
        _ => None,
    })
}

/// Borrowed view on any node of the instance tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceNode<'a> {
    Ln(&'a LogicalNode),
    Doi(&'a Doi),
    Sdi(&'a Sdi),
    Dai(&'a Dai),
}

impl<'a> InstanceNode<'a> {
    pub fn as_dai(&self) -> Option<&'a Dai> {
        match *self {
            InstanceNode::Dai(dai) => Some(dai),
            _ => None,
        }
    }

    fn children(&self) -> &'a [DataInstance] {
        match *self {
            InstanceNode::Doi(doi) => &doi.children,
            InstanceNode::Sdi(sdi) => &sdi.children,
            InstanceNode::Ln(_) | InstanceNode::Dai(_) => &[],
        }
    }
}

impl DataNode for InstanceNode<'_> {
    fn name(&self) -> &str {
        match self {
            InstanceNode::Ln(ln) => &ln.ln_class,
            InstanceNode::Doi(doi) => &doi.name,
            InstanceNode::Sdi(sdi) => &sdi.name,
            InstanceNode::Dai(dai) => &dai.name,
        }
    }

    /// Instances do not repeat the type of their template.
    fn basic_type(&self) -> Option<BasicType> {
        None
    }
}

impl DataParentNode for InstanceNode<'_> {
    type Error = Infallible;

    fn structured_child(&self, name: &str) -> Result<Option<Self>, Infallible> {
        Ok(match *self {
            InstanceNode::Ln(ln) => ln.doi(name).map(InstanceNode::Doi),
            _ => find_sdi(self.children(), name).map(InstanceNode::Sdi),
        })
    }

    fn data_child(&self, name: &str) -> Result<Option<Self>, Infallible> {
        Ok(find_dai(self.children(), name).map(InstanceNode::Dai))
    }
}
