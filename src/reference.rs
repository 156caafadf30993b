//! Data object and data attribute references.
//!
//! An SCL object reference reads `LDName/LNName.DataName[.DataName[…]].DataAttributeName[.DAComponentName[…]]`.
//! Within one logical node only the part after the LN name matters, and it
//! is split in two:
//!
//! * an [`ObjectPath`]: `DO[.SDO[…]]`
//! * an [`AttributePath`]: `DA[.BDA[…]]`, which also carries the values
//!   configured for the attribute, one per setting group.

use core::fmt;
use std::collections::BTreeMap;

use crate::types::{BasicType, Cdc, FunctionalConstraint, SettingGroup};

/// `DO[.SDO[…]]` part of a data reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectPath {
    pub name: String,
    pub sdo_names: Vec<String>,
    pub cdc: Option<Cdc>,
}

impl ObjectPath {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_sdo(mut self, name: impl Into<String>) -> Self {
        self.sdo_names.push(name.into());
        self
    }

    pub fn with_cdc(mut self, cdc: Cdc) -> Self {
        self.cdc = Some(cdc);
        self
    }

    /// Compares the names only, the CDC is ignored.
    pub fn same_path(&self, other: &ObjectPath) -> bool {
        self.name == other.name && self.sdo_names == other.sdo_names
    }

    /// Parses a dotted `DO[.SDO[…]]` reference.
    ///
    /// ```
    /// use scl_dai_tracker::reference::ObjectPath;
    ///
    /// let path = ObjectPath::parse("Do.sdo1.d").expect("Valid");
    /// assert_eq!(path.name, "Do");
    /// assert_eq!(path.sdo_names, vec!["sdo1", "d"]);
    /// assert!(ObjectPath::parse("Do..d").is_err());
    /// ```
    #[cfg(feature = "reference-parser")]
    pub fn parse(input: &str) -> Result<Self, parser::ReferenceParseError> {
        let (name, sdo_names) = parser::dotted_reference(input)?;
        Ok(Self {
            name,
            sdo_names,
            cdc: None,
        })
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for sdo in &self.sdo_names {
            write!(f, ".{}", sdo)?;
        }
        Ok(())
    }
}

#[cfg(feature = "reference-parser")]
impl core::str::FromStr for ObjectPath {
    type Err = parser::ReferenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `DA[.BDA[…]]` part of a data reference, with its configured values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributePath {
    pub name: String,
    pub bda_names: Vec<String>,
    pub basic_type: Option<BasicType>,
    pub fc: Option<FunctionalConstraint>,
    pub values: BTreeMap<SettingGroup, String>,
    pub val_import: Option<bool>,
}

impl AttributePath {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_bda(mut self, name: impl Into<String>) -> Self {
        self.bda_names.push(name.into());
        self
    }

    pub fn with_basic_type(mut self, basic_type: BasicType) -> Self {
        self.basic_type = Some(basic_type);
        self
    }

    pub fn with_fc(mut self, fc: FunctionalConstraint) -> Self {
        self.fc = Some(fc);
        self
    }

    pub fn with_value(mut self, group: SettingGroup, value: impl Into<String>) -> Self {
        self.values.insert(group, value.into());
        self
    }

    /// Compares the names only.
    pub fn same_path(&self, other: &AttributePath) -> bool {
        self.name == other.name && self.bda_names == other.bda_names
    }

    /// The value of the lowest setting group, `Ungrouped` first.
    pub fn first_value(&self) -> Option<&str> {
        self.values.values().next().map(String::as_str)
    }

    /// Parses a dotted `DA[.BDA[…]]` reference. The result has no type nor
    /// values.
    ///
    /// ```
    /// use scl_dai_tracker::reference::AttributePath;
    ///
    /// let path: AttributePath = "origin.orCat".parse().expect("Valid");
    /// assert_eq!(path.name, "origin");
    /// assert_eq!(path.bda_names, vec!["orCat"]);
    /// ```
    #[cfg(feature = "reference-parser")]
    pub fn parse(input: &str) -> Result<Self, parser::ReferenceParseError> {
        let (name, bda_names) = parser::dotted_reference(input)?;
        Ok(Self {
            name,
            bda_names,
            ..Default::default()
        })
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for bda in &self.bda_names {
            write!(f, ".{}", bda)?;
        }
        Ok(())
    }
}

#[cfg(feature = "reference-parser")]
impl core::str::FromStr for AttributePath {
    type Err = parser::ReferenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The full `DO[.SDO].DA[.BDA]` text of an attribute, as used in messages.
pub fn data_reference(object: &ObjectPath, attribute: &AttributePath) -> String {
    format!("{}.{}", object, attribute)
}

#[cfg(feature = "reference-parser")]
pub mod parser {
    use miette::{Diagnostic, NamedSource, SourceSpan};
    use nom::{
        bytes::complete::{tag, take_while},
        character::complete::satisfy,
        combinator::recognize,
        error::ErrorKind,
        multi::separated_list1,
        sequence::tuple,
        IResult, Parser,
    };
    use nom_greedyerror::GreedyError;
    use nom_locate::LocatedSpan;
    use nom_supreme::ParserExt;
    use thiserror::Error;
    use tracing::warn;

    type Span<'a> = LocatedSpan<&'a str>;
    type ParseError<'a> = GreedyError<Span<'a>, ErrorKind>;

    #[derive(Error, Debug, Diagnostic)]
    #[error("Failed to parse data reference.")]
    #[diagnostic(
        code(scl::reference::parse::failure),
        help("Expected dot separated names such as `Mod.stVal` or `origin.orCat`")
    )]
    pub struct ReferenceParseError {
        #[source_code]
        pub src: NamedSource,

        #[label("Parse error location")]
        pub error_location: SourceSpan,
    }

    impl ReferenceParseError {
        fn from(input: Span<'_>, error: nom::Err<ParseError<'_>>) -> Self {
            let pos = match &error {
                nom::Err::Error(e) | nom::Err::Failure(e) => e
                    .errors
                    .iter()
                    .map(|(p, _k)| p.location_offset())
                    .max()
                    .unwrap_or(0),
                nom::Err::Incomplete(_) => input.len(),
            };

            warn!("Data reference parse error: {:?}", error);

            ReferenceParseError {
                src: NamedSource::new("data reference", input.fragment().to_string()),
                error_location: (pos, usize::from(pos < input.len())).into(),
            }
        }
    }

    /// Parses an IEC 61850 name: an ASCII letter followed by letters, digits
    /// or underscores.
    ///
    /// ```
    /// use scl_dai_tracker::reference::parser::parse_name;
    ///
    /// let result = parse_name("stVal.q".into()).expect("Valid");
    /// assert_eq!(result.0.fragment().to_string(), ".q");
    /// assert_eq!(result.1.fragment().to_string(), "stVal");
    ///
    /// assert!(parse_name("1abc".into()).is_err());
    /// ```
    pub fn parse_name(span: Span) -> IResult<Span, Span, ParseError> {
        recognize(tuple((
            satisfy(|c| c.is_ascii_alphabetic()),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        )))
        .parse(span)
    }

    /// Splits a whole `name[.name[…]]` text into its first name and the
    /// nested ones.
    pub(crate) fn dotted_reference(
        input: &str,
    ) -> Result<(String, Vec<String>), ReferenceParseError> {
        let span = Span::new(input);

        let (_, names) = separated_list1(tag("."), parse_name)
            .all_consuming()
            .parse(span)
            .map_err(|e| ReferenceParseError::from(span, e))?;

        let mut names = names.into_iter().map(|n| n.fragment().to_string());
        // separated_list1 yields at least one element
        let first = names.next().unwrap_or_default();
        Ok((first, names.collect()))
    }
}
