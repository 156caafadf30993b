//! `DataTypeTemplates`: the declared shape of logical nodes.
//!
//! Types reference each other by identifier (`LNodeType` → `DOType` →
//! `DOType`/`DAType` → `DAType` …) and one definition is usually shared by
//! many paths, so the templates are kept as one arena per kind of type and
//! every hop is an identifier lookup.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::error::{TemplateError, TypeKind};
use crate::node::{DataNode, DataParentNode};
use crate::reference::{data_reference, AttributePath, ObjectPath};
use crate::types::{BasicType, Cdc, FunctionalConstraint, SettingGroup};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataTypeTemplates {
    lnode_types: BTreeMap<String, LNodeType>,
    do_types: BTreeMap<String, DoType>,
    da_types: BTreeMap<String, DaType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LNodeType {
    pub id: String,
    pub ln_class: String,
    pub dos: Vec<DoDecl>,
}

/// A `DO` of an `LNodeType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoDecl {
    pub name: String,
    pub type_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoType {
    pub id: String,
    pub cdc: Cdc,
    pub sdos: Vec<SdoDecl>,
    pub das: Vec<AttributeDecl>,
}

/// An `SDO` of a `DOType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdoDecl {
    pub name: String,
    pub type_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaType {
    pub id: String,
    pub bdas: Vec<AttributeDecl>,
}

/// A `DA` of a `DOType` or a `BDA` of a `DAType`.
///
/// `fc` is only ever set on DAs; `type_id` names the `DAType` of a `Struct`
/// (or the `EnumType` of an `Enum`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDecl {
    pub name: String,
    pub fc: Option<FunctionalConstraint>,
    pub basic_type: BasicType,
    pub type_id: Option<String>,
    pub values: BTreeMap<SettingGroup, String>,
    pub val_import: Option<bool>,
}

impl LNodeType {
    pub fn new(id: impl Into<String>, ln_class: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ln_class: ln_class.into(),
            dos: Vec::new(),
        }
    }

    pub fn with_do(mut self, name: impl Into<String>, type_id: impl Into<String>) -> Self {
        self.dos.push(DoDecl {
            name: name.into(),
            type_id: type_id.into(),
        });
        self
    }
}

impl DoType {
    pub fn new(id: impl Into<String>, cdc: Cdc) -> Self {
        Self {
            id: id.into(),
            cdc,
            sdos: Vec::new(),
            das: Vec::new(),
        }
    }

    pub fn with_sdo(mut self, name: impl Into<String>, type_id: impl Into<String>) -> Self {
        self.sdos.push(SdoDecl {
            name: name.into(),
            type_id: type_id.into(),
        });
        self
    }

    pub fn with_da(mut self, da: AttributeDecl) -> Self {
        self.das.push(da);
        self
    }
}

impl DaType {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bdas: Vec::new(),
        }
    }

    pub fn with_bda(mut self, bda: AttributeDecl) -> Self {
        self.bdas.push(bda);
        self
    }
}

impl AttributeDecl {
    pub fn new(name: impl Into<String>, basic_type: BasicType) -> Self {
        Self {
            name: name.into(),
            fc: None,
            basic_type,
            type_id: None,
            values: BTreeMap::new(),
            val_import: None,
        }
    }

    pub fn with_fc(mut self, fc: FunctionalConstraint) -> Self {
        self.fc = Some(fc);
        self
    }

    pub fn with_type(mut self, type_id: impl Into<String>) -> Self {
        self.type_id = Some(type_id.into());
        self
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

/// One leaf attribute declared under a data object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAttributeRef {
    pub ln_type: String,
    /// Path of the data object; `cdc` is the one of the `DOType` that
    /// declares the attribute.
    pub object: ObjectPath,
    /// Basic type, fc and declared values of the leaf DA/BDA.
    pub attribute: AttributePath,
}

impl TemplateAttributeRef {
    /// `DO[.SDO].DA[.BDA]`
    pub fn reference(&self) -> String {
        data_reference(&self.object, &self.attribute)
    }
}

impl DataTypeTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lnode_type(mut self, lnode_type: LNodeType) -> Self {
        self.lnode_types.insert(lnode_type.id.clone(), lnode_type);
        self
    }

    pub fn with_do_type(mut self, do_type: DoType) -> Self {
        self.do_types.insert(do_type.id.clone(), do_type);
        self
    }

    pub fn with_da_type(mut self, da_type: DaType) -> Self {
        self.da_types.insert(da_type.id.clone(), da_type);
        self
    }

    pub fn lnode_type(&self, id: &str) -> Result<&LNodeType, TemplateError> {
        self.lnode_types
            .get(id)
            .ok_or_else(|| TemplateError::UnknownLNodeType(id.to_string()))
    }

    /// The `DOType` `type_id` referenced by the DO/SDO `name`.
    pub fn do_type(&self, name: &str, type_id: &str) -> Result<&DoType, TemplateError> {
        self.do_types
            .get(type_id)
            .ok_or_else(|| TemplateError::UndefinedTypeReference {
                kind: TypeKind::DoType,
                name: name.to_string(),
                type_id: type_id.to_string(),
            })
    }

    /// The `DAType` of a `Struct` DA/BDA.
    pub fn struct_type(&self, attribute: &AttributeDecl) -> Result<&DaType, TemplateError> {
        let type_id = attribute
            .type_id
            .as_deref()
            .ok_or_else(|| TemplateError::MissingStructType(attribute.name.clone()))?;

        self.da_types
            .get(type_id)
            .ok_or_else(|| TemplateError::UndefinedTypeReference {
                kind: TypeKind::DaType,
                name: attribute.name.clone(),
                type_id: type_id.to_string(),
            })
    }

    /// The template root of the logical nodes of type `ln_type`.
    pub fn root(&self, ln_type: &str) -> Result<TemplateNode<'_>, TemplateError> {
        Ok(TemplateNode {
            templates: self,
            kind: TemplateKind::LNodeType(self.lnode_type(ln_type)?),
        })
    }

    /// The `DOType` at the end of `object`, following the DO then each SDO.
    pub fn object_type(&self, ln_type: &str, object: &ObjectPath) -> Result<&DoType, TemplateError> {
        let unknown_object = || TemplateError::UnknownObject {
            ln_type: ln_type.to_string(),
            object: object.to_string(),
        };

        let do_decl = self
            .lnode_type(ln_type)?
            .dos
            .iter()
            .find(|d| d.name == object.name)
            .ok_or_else(unknown_object)?;
        let mut do_type = self.do_type(&do_decl.name, &do_decl.type_id)?;

        for sdo_name in &object.sdo_names {
            let sdo = do_type
                .sdos
                .iter()
                .find(|s| &s.name == sdo_name)
                .ok_or_else(unknown_object)?;
            do_type = self.do_type(&sdo.name, &sdo.type_id)?;
        }

        Ok(do_type)
    }

    /// CDC declared for `object`.
    pub fn object_cdc(&self, ln_type: &str, object: &ObjectPath) -> Result<Cdc, TemplateError> {
        self.object_type(ln_type, object).map(|t| t.cdc)
    }

    /// Every leaf DA/BDA declared under `object`, including the ones of
    /// nested SDOs.
    ///
    /// DAs of a `DOType` come before its SDOs; within each, declaration order
    /// is kept and structs are expanded depth first.
    pub fn flatten(
        &self,
        ln_type: &str,
        object: &ObjectPath,
    ) -> Result<Vec<TemplateAttributeRef>, TemplateError> {
        let do_type = self.object_type(ln_type, object)?;

        let mut flattener = Flattener {
            templates: self,
            ln_type,
            chain: Vec::new(),
            refs: Vec::new(),
        };
        flattener.do_type(
            ObjectPath {
                cdc: None,
                ..object.clone()
            },
            do_type,
        )?;

        debug!(
            "{} attributes declared under {} in LNodeType {}",
            flattener.refs.len(),
            object,
            ln_type
        );

        Ok(flattener.refs)
    }
}

struct Flattener<'a> {
    templates: &'a DataTypeTemplates,
    ln_type: &'a str,
    /// Types being expanded, outermost first.
    chain: Vec<(TypeKind, &'a str)>,
    refs: Vec<TemplateAttributeRef>,
}

impl<'a> Flattener<'a> {
    fn enter(&mut self, kind: TypeKind, name: &str, type_id: &'a str) -> Result<(), TemplateError> {
        if self.chain.contains(&(kind, type_id)) {
            return Err(TemplateError::CyclicTypeReference {
                kind,
                name: name.to_string(),
                type_id: type_id.to_string(),
            });
        }
        self.chain.push((kind, type_id));
        Ok(())
    }

    fn do_type(&mut self, object: ObjectPath, do_type: &'a DoType) -> Result<(), TemplateError> {
        self.enter(TypeKind::DoType, &object.to_string(), &do_type.id)?;

        let object = object.with_cdc(do_type.cdc);

        for da in &do_type.das {
            let attribute = AttributePath {
                name: da.name.clone(),
                bda_names: Vec::new(),
                basic_type: Some(da.basic_type),
                fc: da.fc,
                values: da.values.clone(),
                val_import: da.val_import,
            };
            self.attribute(&object, attribute, da)?;
        }

        for sdo in &do_type.sdos {
            let sdo_type = self.templates.do_type(&sdo.name, &sdo.type_id)?;
            let nested = ObjectPath {
                cdc: None,
                ..object.clone()
            }
            .with_sdo(sdo.name.as_str());
            self.do_type(nested, sdo_type)?;
        }

        self.chain.pop();
        Ok(())
    }

    fn attribute(
        &mut self,
        object: &ObjectPath,
        attribute: AttributePath,
        decl: &'a AttributeDecl,
    ) -> Result<(), TemplateError> {
        if !decl.basic_type.is_struct() {
            trace!("Declared {}.{} ({})", object, attribute, decl.basic_type);
            self.refs.push(TemplateAttributeRef {
                ln_type: self.ln_type.to_string(),
                object: object.clone(),
                attribute,
            });
            return Ok(());
        }

        let da_type = self.templates.struct_type(decl)?;
        self.enter(TypeKind::DaType, &decl.name, &da_type.id)?;

        for bda in &da_type.bdas {
            let nested = AttributePath {
                basic_type: Some(bda.basic_type),
                values: bda.values.clone(),
                val_import: bda.val_import,
                ..attribute.clone()
            }
            .with_bda(bda.name.as_str());
            self.attribute(object, nested, bda)?;
        }

        self.chain.pop();
        Ok(())
    }
}

/// Borrowed view on any declaration reachable from an `LNodeType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateNode<'a> {
    templates: &'a DataTypeTemplates,
    kind: TemplateKind<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind<'a> {
    LNodeType(&'a LNodeType),
    /// A DO or SDO, named by its declaration.
    DoType { name: &'a str, do_type: &'a DoType },
    /// A `Struct` DA/BDA.
    DaType {
        attribute: &'a AttributeDecl,
        da_type: &'a DaType,
    },
    /// Any other DA/BDA.
    Attribute(&'a AttributeDecl),
}

impl<'a> TemplateNode<'a> {
    pub fn kind(&self) -> TemplateKind<'a> {
        self.kind
    }

    /// The DA/BDA declaration behind this node, if it is one.
    pub fn attribute(&self) -> Option<&'a AttributeDecl> {
        match self.kind {
            TemplateKind::DaType { attribute, .. } | TemplateKind::Attribute(attribute) => {
                Some(attribute)
            }
            TemplateKind::LNodeType(_) | TemplateKind::DoType { .. } => None,
        }
    }

    fn with_kind(&self, kind: TemplateKind<'a>) -> Self {
        Self {
            templates: self.templates,
            kind,
        }
    }

    fn attributes(&self) -> &'a [AttributeDecl] {
        match self.kind {
            TemplateKind::DoType { do_type, .. } => &do_type.das,
            TemplateKind::DaType { da_type, .. } => &da_type.bdas,
            TemplateKind::LNodeType(_) | TemplateKind::Attribute(_) => &[],
        }
    }
}

impl DataNode for TemplateNode<'_> {
    fn name(&self) -> &str {
        match self.kind {
            TemplateKind::LNodeType(lnode_type) => &lnode_type.id,
            TemplateKind::DoType { name, .. } => name,
            TemplateKind::DaType { attribute, .. } | TemplateKind::Attribute(attribute) => {
                &attribute.name
            }
        }
    }

    fn basic_type(&self) -> Option<BasicType> {
        self.attribute().map(|a| a.basic_type)
    }
}

impl DataParentNode for TemplateNode<'_> {
    type Error = TemplateError;

    fn structured_child(&self, name: &str) -> Result<Option<Self>, TemplateError> {
        let templates = self.templates;

        match self.kind {
            TemplateKind::LNodeType(lnode_type) => {
                let Some(do_decl) = lnode_type.dos.iter().find(|d| d.name == name) else {
                    return Ok(None);
                };
                let do_type = templates.do_type(&do_decl.name, &do_decl.type_id)?;
                return Ok(Some(self.with_kind(TemplateKind::DoType {
                    name: &do_decl.name,
                    do_type,
                })));
            }
            TemplateKind::DoType { do_type, .. } => {
                if let Some(sdo) = do_type.sdos.iter().find(|s| s.name == name) {
                    let sdo_type = templates.do_type(&sdo.name, &sdo.type_id)?;
                    return Ok(Some(self.with_kind(TemplateKind::DoType {
                        name: &sdo.name,
                        do_type: sdo_type,
                    })));
                }
            }
            TemplateKind::DaType { .. } | TemplateKind::Attribute(_) => (),
        }

        match self
            .attributes()
            .iter()
            .find(|a| a.name == name && a.basic_type.is_struct())
        {
            Some(attribute) => Ok(Some(self.with_kind(TemplateKind::DaType {
                attribute,
                da_type: templates.struct_type(attribute)?,
            }))),
            None => Ok(None),
        }
    }

    fn data_child(&self, name: &str) -> Result<Option<Self>, TemplateError> {
        Ok(self
            .attributes()
            .iter()
            .find(|a| a.name == name && !a.basic_type.is_struct())
            .map(|attribute| self.with_kind(TemplateKind::Attribute(attribute))))
    }
}
