#![allow(dead_code)]

use scl_dai_tracker::types::FunctionalConstraint as Fc;
use scl_dai_tracker::*;
use tracing_subscriber::EnvFilter;

pub fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const LN_TYPE: &str = "PTOC_T";

/// Templates of a time overcurrent protection node:
///
/// * `Mod` (ENC), `Beh` (ENS)
/// * `StrVal` (ASG): `setMag`/`minVal`/`maxVal`/`stepSize` are
///   `AnalogueValue { i, f }`
/// * `OpDlTmms` (ING): limits 10..=20 by steps of 5
/// * `A` (WYE): `phsA`/`phsB` SDOs of CDC CMV
pub fn templates() -> DataTypeTemplates {
    DataTypeTemplates::new()
        .with_lnode_type(
            LNodeType::new(LN_TYPE, "PTOC")
                .with_do("Mod", "ENC_Mod")
                .with_do("Beh", "ENS_Beh")
                .with_do("StrVal", "ASG_T")
                .with_do("OpDlTmms", "ING_T")
                .with_do("A", "WYE_T"),
        )
        .with_do_type(
            DoType::new("ENC_Mod", Cdc::Enc)
                .with_da(
                    AttributeDecl::new("stVal", BasicType::Enum)
                        .with_fc(Fc::St)
                        .with_type("BehaviourModeKind"),
                )
                .with_da(
                    AttributeDecl::new("ctlModel", BasicType::Enum)
                        .with_fc(Fc::Cf)
                        .with_type("CtlModelKind")
                        .with_value(SettingGroup::Ungrouped, "status-only"),
                ),
        )
        .with_do_type(
            DoType::new("ENS_Beh", Cdc::Ens).with_da(
                AttributeDecl::new("stVal", BasicType::Enum)
                    .with_fc(Fc::St)
                    .with_type("BehaviourModeKind"),
            ),
        )
        .with_do_type(
            DoType::new("ASG_T", Cdc::Asg)
                .with_da(analogue("setMag", Fc::Sg))
                .with_da(analogue("minVal", Fc::Cf))
                .with_da(analogue("maxVal", Fc::Cf))
                .with_da(analogue("stepSize", Fc::Cf)),
        )
        .with_do_type(ing_type(Some("10"), Some("20"), Some("5")))
        .with_do_type(
            DoType::new("WYE_T", Cdc::Wye)
                .with_sdo("phsA", "CMV_T")
                .with_sdo("phsB", "CMV_T"),
        )
        .with_do_type(
            DoType::new("CMV_T", Cdc::Cmv)
                .with_da(
                    AttributeDecl::new("cVal", BasicType::Struct)
                        .with_fc(Fc::Mx)
                        .with_type("Vector"),
                )
                .with_da(AttributeDecl::new("q", BasicType::Quality).with_fc(Fc::Mx)),
        )
        .with_da_type(
            DaType::new("AnalogueValue")
                .with_bda(AttributeDecl::new("i", BasicType::Int32))
                .with_bda(AttributeDecl::new("f", BasicType::Float32)),
        )
        .with_da_type(
            DaType::new("Vector")
                .with_bda(AttributeDecl::new("mag", BasicType::Struct).with_type("AnalogueValue"))
                .with_bda(AttributeDecl::new("ang", BasicType::Struct).with_type("AnalogueValue")),
        )
}

fn analogue(name: &str, fc: Fc) -> AttributeDecl {
    AttributeDecl::new(name, BasicType::Struct)
        .with_fc(fc)
        .with_type("AnalogueValue")
}

/// The `ING_T` type, with the given declared limits.
pub fn ing_type(min: Option<&str>, max: Option<&str>, step: Option<&str>) -> DoType {
    let limit = |name: &str, basic_type: BasicType, value: Option<&str>| {
        let decl = AttributeDecl::new(name, basic_type).with_fc(Fc::Cf);
        match value {
            Some(value) => decl.with_value(SettingGroup::Ungrouped, value),
            None => decl,
        }
    };

    let mut ing = DoType::new("ING_T", Cdc::Ing)
        .with_da(AttributeDecl::new("setVal", BasicType::Int32).with_fc(Fc::Sg));
    if min.is_some() {
        ing = ing.with_da(limit("minVal", BasicType::Int32, min));
    }
    if max.is_some() {
        ing = ing.with_da(limit("maxVal", BasicType::Int32, max));
    }
    if step.is_some() {
        ing = ing.with_da(limit("stepSize", BasicType::Int32U, step));
    }
    ing
}

/// An instance of [`templates`], with `Beh` and `A.phsB` left out.
pub fn ln() -> LogicalNode {
    LogicalNode::new("PTOC", "1", LN_TYPE)
        .with_prefix("I")
        .with_doi(Doi::new("Mod").with_dai(Dai::new("ctlModel").with_value(SettingGroup::Ungrouped, "status-only")))
        .with_doi(
            Doi::new("StrVal")
                .with_sdi(Sdi::new("setMag").with_dai(Dai::new("f").with_value(SettingGroup::Group(1), "250")))
                .with_sdi(Sdi::new("minVal").with_dai(Dai::new("f").with_value(SettingGroup::Ungrouped, "0")))
                .with_sdi(Sdi::new("maxVal").with_dai(Dai::new("f").with_value(SettingGroup::Ungrouped, "1000")))
                .with_sdi(Sdi::new("stepSize").with_dai(Dai::new("f").with_value(SettingGroup::Ungrouped, "10"))),
        )
        .with_doi(
            Doi::new("OpDlTmms").with_dai(
                Dai::new("setVal")
                    .with_value(SettingGroup::Group(1), "15")
                    .with_value(SettingGroup::Group(2), "20"),
            ),
        )
        .with_doi(
            Doi::new("A").with_sdi(
                Sdi::new("phsA").with_sdi(
                    Sdi::new("cVal").with_sdi(
                        Sdi::new("mag").with_dai(Dai::new("f").with_value(SettingGroup::Ungrouped, "12.5")),
                    ),
                ),
            ),
        )
}

/// `DO.SDO…` split on dots.
pub fn object(reference: &str) -> ObjectPath {
    let mut names = reference.split('.');
    let first = ObjectPath::new(names.next().unwrap_or_default());
    names.fold(first, ObjectPath::with_sdo)
}

/// `DA.BDA…` split on dots.
pub fn attribute(reference: &str) -> AttributePath {
    let mut names = reference.split('.');
    let first = AttributePath::new(names.next().unwrap_or_default());
    names.fold(first, AttributePath::with_bda)
}
