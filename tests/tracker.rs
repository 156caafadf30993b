mod common;

use common::{attribute, object};
use rstest::rstest;
use scl_dai_tracker::*;

#[rstest]
#[case("Mod", "ctlModel", MatchResult::FullMatch)]
#[case("StrVal", "setMag.f", MatchResult::FullMatch)]
#[case("OpDlTmms", "setVal", MatchResult::FullMatch)]
#[case("A.phsA", "cVal.mag.f", MatchResult::FullMatch)]
#[case("Beh", "stVal", MatchResult::Failed)]
#[case("Health", "stVal", MatchResult::Failed)]
#[case("Mod", "stVal", MatchResult::PartialMatch)]
#[case("StrVal", "setMag.i", MatchResult::PartialMatch)]
#[case("A.phsB", "cVal.mag.f", MatchResult::PartialMatch)]
#[case("A.phsA", "cVal.ang.f", MatchResult::PartialMatch)]
#[case("A.phsA", "cVal.mag", MatchResult::PartialMatch)]
fn instance_resolution(#[case] obj: &str, #[case] attr: &str, #[case] expected: MatchResult) {
    common::init_logger();

    let ln = common::ln();
    let record = resolve(&ln, &object(obj), &attribute(attr));
    assert_eq!(record.result, expected);
    assert_eq!(record.dai().is_some(), expected == MatchResult::FullMatch);
}

#[rstest]
#[case("Mod", "stVal", MatchResult::FullMatch)]
#[case("Beh", "stVal", MatchResult::FullMatch)]
#[case("A.phsB", "cVal.mag.f", MatchResult::FullMatch)]
#[case("StrVal", "stepSize.i", MatchResult::FullMatch)]
#[case("Health", "stVal", MatchResult::Failed)]
#[case("A.phsC", "cVal.mag.f", MatchResult::PartialMatch)]
#[case("A.phsA", "cVal.mag", MatchResult::PartialMatch)]
#[case("A.phsA", "q.mag", MatchResult::PartialMatch)]
#[case("A.phsA", "cVal", MatchResult::PartialMatch)]
fn template_resolution(#[case] obj: &str, #[case] attr: &str, #[case] expected: MatchResult) {
    common::init_logger();

    let templates = common::templates();
    let record = resolve_template(&templates, common::LN_TYPE, &object(obj), &attribute(attr))
        .expect("Well formed templates");
    assert_eq!(record.result, expected);
}

#[test]
fn template_resolution_of_unknown_type() {
    let templates = common::templates();
    assert_eq!(
        resolve_template(&templates, "MMXU_T", &object("A"), &attribute("q")),
        Err(TemplateError::UnknownLNodeType("MMXU_T".into()))
    );
}

#[test]
fn every_instantiated_value_is_declared() {
    common::init_logger();

    let templates = common::templates();
    let ln = common::ln();

    for obj in ["Mod", "StrVal", "OpDlTmms", "A.phsA", "A.phsB"] {
        for attribute_ref in templates.flatten(&ln.ln_type, &object(obj)).expect("Valid") {
            let record = resolve_template(
                &templates,
                &ln.ln_type,
                &attribute_ref.object,
                &attribute_ref.attribute,
            )
            .expect("Valid");
            assert!(record.is_full_match(), "{} is declared", attribute_ref.reference());
        }
    }
}

#[test]
fn dai_values_follow_the_template_reference() {
    let templates = common::templates();
    let ln = common::ln();

    let refs = templates.flatten(&ln.ln_type, &object("A")).expect("Valid");
    let references: Vec<String> = refs.iter().map(|r| r.reference()).collect();
    assert_eq!(
        references,
        vec![
            "A.phsA.cVal.mag.i",
            "A.phsA.cVal.mag.f",
            "A.phsA.cVal.ang.i",
            "A.phsA.cVal.ang.f",
            "A.phsA.q",
            "A.phsB.cVal.mag.i",
            "A.phsB.cVal.mag.f",
            "A.phsB.cVal.ang.i",
            "A.phsB.cVal.ang.f",
            "A.phsB.q",
        ]
    );

    let values = ln.dai_values(&refs[1]);
    assert_eq!(
        values.get(&SettingGroup::Ungrouped).map(String::as_str),
        Some("12.5")
    );
    assert!(ln.dai_values(&refs[0]).is_empty());
    assert!(ln.dai_values(&refs[6]).is_empty());
}

#[test]
fn setting_groups_are_kept_per_dai() {
    let ln = common::ln();
    let record = DaiTracker::new(&ln, &object("OpDlTmms"), &attribute("setVal")).search();

    let dai = record.dai().expect("setVal is instantiated");
    let groups: Vec<_> = dai.values.keys().copied().collect();
    assert_eq!(groups, vec![SettingGroup::Group(1), SettingGroup::Group(2)]);
}

#[cfg(feature = "reference-parser")]
#[test]
fn parsed_references_resolve() {
    let ln = common::ln();

    let obj: ObjectPath = "A.phsA".parse().expect("Valid object reference");
    let attr: AttributePath = "cVal.mag.f".parse().expect("Valid attribute reference");
    assert_eq!(obj, object("A.phsA"));
    assert_eq!(attr, attribute("cVal.mag.f"));
    assert!(resolve(&ln, &obj, &attr).is_full_match());

    assert!("A..phsA".parse::<ObjectPath>().is_err());
}
