//! Resolution of data references inside the logical nodes of an SCL
//! document, and validation of bounded settings.
//!
//! A reference such as `StrVal.setMag.f` is split into an object part
//! (`DO[.SDO…]`, an [`ObjectPath`]) and an attribute part (`DA[.BDA…]`, an
//! [`AttributePath`]). It can be looked up:
//!
//! * in the instance tree of a [`LogicalNode`] (DOI/SDI/DAI), with
//!   [`resolve`], which tells how much of the chain is instantiated;
//! * in the [`DataTypeTemplates`] declaring the node, with
//!   [`resolve_template`] and [`DataTypeTemplates::flatten`].
//!
//! [`validate_bounds`] combines both to check the value of an `ING`/`ASG`
//! setting against its `minVal`, `maxVal` and `stepSize`.
//!
//! ```
//! use scl_dai_tracker::*;
//!
//! let templates = DataTypeTemplates::new()
//!     .with_lnode_type(LNodeType::new("PTOC_T", "PTOC").with_do("StrVal", "ING_T"))
//!     .with_do_type(
//!         DoType::new("ING_T", Cdc::Ing)
//!             .with_da(AttributeDecl::new("setVal", BasicType::Int32))
//!             .with_da(
//!                 AttributeDecl::new("maxVal", BasicType::Int32)
//!                     .with_value(SettingGroup::Ungrouped, "100"),
//!             ),
//!     );
//! let ln = LogicalNode::new("PTOC", "1", "PTOC_T").with_doi(
//!     Doi::new("StrVal").with_dai(Dai::new("setVal").with_value(SettingGroup::Group(1), "50")),
//! );
//!
//! let object = ObjectPath::new("StrVal");
//! let attribute = AttributePath::new("setVal");
//! assert_eq!(resolve(&ln, &object, &attribute).result, MatchResult::FullMatch);
//!
//! let too_big = attribute.clone().with_value(SettingGroup::Group(1), "150");
//! assert!(validate_bounds(&ln, &templates, &object, &attribute.with_value(SettingGroup::Group(1), "50")).is_ok());
//! assert!(validate_bounds(&ln, &templates, &object, &too_big).is_err());
//! ```

pub mod bounds;
pub mod error;
pub mod instance;
pub mod node;
pub mod reference;
pub mod template;
pub mod tracker;
pub mod types;

pub use bounds::{validate_bounds, Bounds};
pub use error::{Bound, TemplateError, TypeKind, ValidationError};
pub use instance::{Dai, DataInstance, Doi, InstanceNode, LogicalNode, Sdi};
pub use node::{find_deepest_match, ChildKind, DataNode, DataParentNode, Descent};
pub use reference::{AttributePath, ObjectPath};
pub use template::{
    AttributeDecl, DaType, DataTypeTemplates, DoType, LNodeType, TemplateAttributeRef,
    TemplateNode,
};
pub use tracker::{resolve, resolve_template, search, DaiTracker, MatchRecord, MatchResult, PathMatch};
pub use types::{BasicType, Cdc, FunctionalConstraint, SettingGroup};
