//! Range and step checks of `ING` and `ASG` settings.
//!
//! A bounded setting declares its limits as sibling DAs of the value:
//!
//! ```text
//! ING:  setVal        minVal        maxVal        stepSize
//! ASG:  setMag.f      minVal.f      maxVal.f      stepSize.f
//! ```
//!
//! The declared (template) value of a limit is overridden by the one of the
//! matching DAI when the logical node instantiates it.

use tracing::{debug, trace};

use crate::error::{Bound, ValidationError};
use crate::instance::LogicalNode;
use crate::reference::{data_reference, AttributePath, ObjectPath};
use crate::template::{DataTypeTemplates, TemplateAttributeRef};

pub const MIN_VAL: &str = "minVal";
pub const MAX_VAL: &str = "maxVal";
pub const STEP_SIZE: &str = "stepSize";

const STEP_TOLERANCE: f64 = 1e-9;

/// Limits of a setting. A missing limit is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl Bounds {
    /// Checks `value` against min, max then step, and reports the first
    /// violation.
    pub fn check(&self, attribute: &str, value: f64) -> Result<(), ValidationError> {
        match self.violations(attribute, value).into_iter().next() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    /// Every violation of `value`, in min, max, step order.
    pub fn violations(&self, attribute: &str, value: f64) -> Vec<ValidationError> {
        let mut violations = Vec::new();

        if let Some(min) = self.min.filter(|min| value < *min) {
            violations.push(ValidationError::OutOfRange {
                attribute: attribute.to_string(),
                value,
                bound: Bound::Min(min),
            });
        }

        if let Some(max) = self.max.filter(|max| value > *max) {
            violations.push(ValidationError::OutOfRange {
                attribute: attribute.to_string(),
                value,
                bound: Bound::Max(max),
            });
        }

        if let Some(step) = self.step.filter(|step| !is_multiple_of(value, *step)) {
            violations.push(ValidationError::NotDivisibleByStep {
                attribute: attribute.to_string(),
                value,
                step,
            });
        }

        violations
    }
}

/// Both operands are truncated to 64-bit integers before the remainder is
/// taken, so the fractional part of a value or step is not checked. A step that
/// truncates to zero accepts every value.
fn is_multiple_of(value: f64, step: f64) -> bool {
    let value = (value.trunc() as i64).unsigned_abs();
    let step = (step.trunc() as i64).unsigned_abs();

    match value.checked_rem(step) {
        Some(remainder) => remainder as f64 <= STEP_TOLERANCE,
        None => {
            trace!("Step truncates to zero, divisibility not checked");
            true
        }
    }
}

/// Numeric value of a limit.
///
/// `default` is returned when the attribute has no value at all; a value
/// must come with one of the numeric basic types and be finite.
pub fn numeric_value(
    reference: &str,
    attribute: &AttributePath,
    default: f64,
) -> Result<f64, ValidationError> {
    let Some(value) = attribute.first_value() else {
        return Ok(default);
    };

    let basic_type = attribute
        .basic_type
        .ok_or_else(|| ValidationError::UndefinedBasicType {
            attribute: reference.to_string(),
            value: value.to_string(),
        })?;

    if !basic_type.is_numeric() {
        return Err(ValidationError::UnknownNumericFormat {
            attribute: reference.to_string(),
            basic_type: basic_type.to_string(),
            value: value.to_string(),
        });
    }

    // `nan` and `inf` parse, but would disable the limit
    match value.trim().parse::<f64>() {
        Ok(limit) if limit.is_finite() => Ok(limit),
        _ => Err(ValidationError::InvalidValue {
            attribute: reference.to_string(),
            value: Some(value.to_string()),
        }),
    }
}

/// The value being validated: first setting group value of the attribute.
fn subject_value(reference: &str, attribute: &AttributePath) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidValue {
        attribute: reference.to_string(),
        value: attribute.first_value().map(str::to_string),
    };

    let value = attribute
        .first_value()
        .ok_or_else(invalid)?
        .trim()
        .parse::<f64>()
        .map_err(|_| invalid())?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// The declaration of the limit `name` matching `attribute`.
///
/// For struct limits (`minVal.f`, `minVal.i` …) the component with the same
/// BDA chain as the subject is preferred, then the first one declared.
fn find_limit<'r>(
    refs: &'r [TemplateAttributeRef],
    object: &ObjectPath,
    attribute: &AttributePath,
    name: &str,
) -> Option<&'r TemplateAttributeRef> {
    let mut candidates = refs
        .iter()
        .filter(|r| r.object.same_path(object) && r.attribute.name == name);

    let first = candidates.next()?;
    if first.attribute.bda_names == attribute.bda_names {
        return Some(first);
    }

    Some(
        candidates
            .find(|r| r.attribute.bda_names == attribute.bda_names)
            .unwrap_or(first),
    )
}

/// Limits of `object`, from its declaration merged with the DAIs of `ln`.
///
/// `value` is the subject value, used as the step when a declared
/// `stepSize` has no value.
pub fn resolve_bounds(
    ln: &LogicalNode,
    templates: &DataTypeTemplates,
    object: &ObjectPath,
    attribute: &AttributePath,
    value: f64,
) -> Result<Bounds, ValidationError> {
    let refs = templates.flatten(&ln.ln_type, object)?;

    let limit = |name: &str, default: f64| -> Result<Option<f64>, ValidationError> {
        let Some(limit_ref) = find_limit(&refs, object, attribute, name) else {
            trace!("No {} declared for {}", name, object);
            return Ok(None);
        };

        let mut merged = limit_ref.attribute.clone();
        let instantiated = ln.dai_values(limit_ref);
        if !instantiated.is_empty() {
            merged.values = instantiated;
        }

        let limit = numeric_value(&limit_ref.reference(), &merged, default)?;
        trace!("{} = {}", limit_ref.reference(), limit);
        Ok(Some(limit))
    };

    Ok(Bounds {
        min: limit(MIN_VAL, f64::NEG_INFINITY)?,
        max: limit(MAX_VAL, f64::INFINITY)?,
        step: limit(STEP_SIZE, value)?,
    })
}

/// Validates the first value of `attribute` against the limits of `object`.
///
/// Only data objects of a bounded setting CDC (`ING`, `ASG`) are checked.
/// When `object` carries no CDC the declared one is used; an object whose
/// CDC cannot be found is not a bounded setting.
pub fn validate_bounds(
    ln: &LogicalNode,
    templates: &DataTypeTemplates,
    object: &ObjectPath,
    attribute: &AttributePath,
) -> Result<(), ValidationError> {
    let cdc = match object.cdc {
        Some(cdc) => cdc,
        None => match templates.object_cdc(&ln.ln_type, object) {
            Ok(cdc) => cdc,
            Err(e) => {
                debug!("No CDC for {} in {}, bounds not checked: {}", object, ln.name(), e);
                return Ok(());
            }
        },
    };
    if !cdc.is_bounded_setting() {
        trace!("{} is a {}, no bounds to check", object, cdc);
        return Ok(());
    }

    let reference = data_reference(object, attribute);
    let value = subject_value(&reference, attribute)?;
    let bounds = resolve_bounds(ln, templates, object, attribute, value)?;

    debug!(
        "Checking {} = {} in {} against {:?}",
        reference,
        value,
        ln.name(),
        bounds
    );
    bounds.check(&reference, value)
}
