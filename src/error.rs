//! Errors of template lookups and of bounded setting validation.

use core::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Failures while walking the `DataTypeTemplates` of a document.
///
/// These are never a normal classification: the templates referenced by an
/// instance must exist and be well formed.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown LNodeType '{0}'")]
    #[diagnostic(code(scl::template::unknown_lnode_type))]
    UnknownLNodeType(String),

    #[error("LNodeType '{ln_type}' does not declare the data object '{object}'")]
    #[diagnostic(
        code(scl::template::unknown_object),
        help("Check the DO/SDO names against the LNodeType and its DOTypes")
    )]
    UnknownObject { ln_type: String, object: String },

    #[error("'{name}' references undefined {kind} '{type_id}'")]
    #[diagnostic(code(scl::template::undefined_type_reference))]
    UndefinedTypeReference {
        kind: TypeKind,
        name: String,
        type_id: String,
    },

    #[error("Struct attribute '{0}' has no type")]
    #[diagnostic(code(scl::template::missing_struct_type))]
    MissingStructType(String),

    #[error("{kind} '{type_id}' references itself through '{name}'")]
    #[diagnostic(code(scl::template::cyclic_type_reference))]
    CyclicTypeReference {
        kind: TypeKind,
        name: String,
        type_id: String,
    },
}

/// Which arena of the templates a type identifier points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    DoType,
    DaType,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::DoType => write!(f, "DOType"),
            TypeKind::DaType => write!(f, "DAType"),
        }
    }
}

/// The limit a value was compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Min(f64),
    Max(f64),
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Min(min) => write!(f, "greater than or equal to {}", min),
            Bound::Max(max) => write!(f, "less than or equal to {}", max),
        }
    }
}

/// Rejection of a bounded setting value.
///
/// `attribute` is always the dotted `DO[.SDO].DA[.BDA]` reference of the
/// attribute the failure is about, which is the bound sibling (`minVal`,
/// `maxVal`, `stepSize`) for the format errors and the subject for the
/// range errors.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid DAI value for {attribute}: {value:?}")]
    #[diagnostic(code(scl::bounds::invalid_value))]
    InvalidValue {
        attribute: String,
        value: Option<String>,
    },

    #[error("Undefined basic type for {attribute} (value '{value}')")]
    #[diagnostic(code(scl::bounds::undefined_basic_type))]
    UndefinedBasicType { attribute: String, value: String },

    #[error("Unknown numeric format for {attribute}: basic type {basic_type} (value '{value}')")]
    #[diagnostic(
        code(scl::bounds::unknown_numeric_format),
        help("Bounds must be INT8, INT16, INT32, INT64, INT8U, INT16U, INT32U, FLOAT32 or FLOAT64")
    )]
    UnknownNumericFormat {
        attribute: String,
        basic_type: String,
        value: String,
    },

    #[error("The DA {attribute} value ({value}) must be {bound}")]
    #[diagnostic(code(scl::bounds::out_of_range))]
    OutOfRange {
        attribute: String,
        value: f64,
        bound: Bound,
    },

    #[error("The DA {attribute} value ({value}) is not divisible by the step size ({step})")]
    #[diagnostic(code(scl::bounds::not_divisible_by_step))]
    NotDivisibleByStep {
        attribute: String,
        value: f64,
        step: f64,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),
}
