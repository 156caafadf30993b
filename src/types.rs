//! Enumerations shared by the instance tree and the type templates.
//!
//! Every enumeration here is spelled in SCL documents the way the IEC 61850-6
//! schema spells it (`INT32U`, `VisString255`, `ASG`, ...), so parsing and
//! displaying go through that exact literal.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

/// Failure to map an SCL literal onto one of the enumerations of this module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} literal '{literal}'")]
pub struct UnknownLiteral {
    pub kind: &'static str,
    pub literal: String,
}

macro_rules! scl_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $($variant:ident => $literal:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            /// The SCL spelling of this value.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $literal,)*
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownLiteral;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($literal => Ok(Self::$variant),)*
                    _ => Err(UnknownLiteral {
                        kind: $kind,
                        literal: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

scl_enum! {
    /// Basic type (`bType`) of a DA or BDA.
    pub enum BasicType ("basic type") {
        Boolean => "BOOLEAN",
        Int8 => "INT8",
        Int16 => "INT16",
        Int24 => "INT24",
        Int32 => "INT32",
        Int64 => "INT64",
        Int128 => "INT128",
        Int8U => "INT8U",
        Int16U => "INT16U",
        Int24U => "INT24U",
        Int32U => "INT32U",
        Float32 => "FLOAT32",
        Float64 => "FLOAT64",
        Enum => "Enum",
        Dbpos => "Dbpos",
        Tcmd => "Tcmd",
        Quality => "Quality",
        Timestamp => "Timestamp",
        VisString32 => "VisString32",
        VisString64 => "VisString64",
        VisString65 => "VisString65",
        VisString129 => "VisString129",
        VisString255 => "VisString255",
        Octet64 => "Octet64",
        Unicode255 => "Unicode255",
        Struct => "Struct",
        EntryTime => "EntryTime",
        Check => "Check",
        ObjRef => "ObjRef",
        Currency => "Currency",
        PhyComAddr => "PhyComAddr",
        TrgOps => "TrgOps",
        OptFlds => "OptFlds",
        SvOptFlds => "SvOptFlds",
        LogOptFlds => "LogOptFlds",
        EntryId => "EntryID",
    }
}

impl BasicType {
    /// Whether a value of this type can be read as a bound of a setting.
    ///
    /// `INT24`, `INT24U` and `INT128` are integers too but are not accepted
    /// as bounds.
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int8U
                | Self::Int16
                | Self::Int16U
                | Self::Int32
                | Self::Int32U
                | Self::Int64
                | Self::Float32
                | Self::Float64
        )
    }

    /// Whether the attribute has nested BDAs, i.e. is instantiated as an SDI.
    pub const fn is_struct(&self) -> bool {
        matches!(self, Self::Struct)
    }
}

scl_enum! {
    /// Common data class (`cdc`) of a DO type, IEC 61850-7-3.
    pub enum Cdc ("common data class") {
        Sps => "SPS",
        Dps => "DPS",
        Ins => "INS",
        Ens => "ENS",
        Act => "ACT",
        Acd => "ACD",
        Sec => "SEC",
        Bcr => "BCR",
        Hst => "HST",
        Vss => "VSS",
        Mv => "MV",
        Cmv => "CMV",
        Sav => "SAV",
        Wye => "WYE",
        Del => "DEL",
        Seq => "SEQ",
        Hmv => "HMV",
        Hwye => "HWYE",
        Hdel => "HDEL",
        Spc => "SPC",
        Dpc => "DPC",
        Inc => "INC",
        Enc => "ENC",
        Bsc => "BSC",
        Isc => "ISC",
        Apc => "APC",
        Bac => "BAC",
        Spg => "SPG",
        Ing => "ING",
        Eng => "ENG",
        Org => "ORG",
        Tsg => "TSG",
        Cug => "CUG",
        Vsg => "VSG",
        Asg => "ASG",
        Curve => "CURVE",
        Csg => "CSG",
        Dpl => "DPL",
        Lpl => "LPL",
        Csd => "CSD",
    }
}

impl Cdc {
    /// `ING` and `ASG` settings carry `minVal`/`maxVal`/`stepSize` siblings
    /// that constrain their `setVal`/`setMag`.
    pub const fn is_bounded_setting(&self) -> bool {
        matches!(self, Self::Ing | Self::Asg)
    }
}

scl_enum! {
    /// Functional constraint (`fc`) of a DA.
    pub enum FunctionalConstraint ("functional constraint") {
        St => "ST",
        Mx => "MX",
        Co => "CO",
        Sp => "SP",
        Sg => "SG",
        Se => "SE",
        Sv => "SV",
        Cf => "CF",
        Dc => "DC",
        Sr => "SR",
        Or => "OR",
        Bl => "BL",
        Ex => "EX",
    }
}

/// Key of one `Val` of a DAI or a declared DA.
///
/// A `Val` without `sGroup` is [`SettingGroup::Ungrouped`]; it orders before
/// every numbered group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingGroup {
    Ungrouped,
    Group(u32),
}

impl From<Option<u32>> for SettingGroup {
    fn from(s_group: Option<u32>) -> Self {
        match s_group {
            Some(g) => SettingGroup::Group(g),
            None => SettingGroup::Ungrouped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("INT32U", BasicType::Int32U)]
    #[case("FLOAT32", BasicType::Float32)]
    #[case("VisString255", BasicType::VisString255)]
    #[case("EntryID", BasicType::EntryId)]
    #[case("Struct", BasicType::Struct)]
    fn basic_type_literals(#[case] literal: &str, #[case] expected: BasicType) {
        assert_eq!(literal.parse::<BasicType>(), Ok(expected));
        assert_eq!(expected.to_string(), literal);
    }

    #[test]
    fn basic_type_is_case_sensitive() {
        assert_eq!(
            "int32".parse::<BasicType>(),
            Err(UnknownLiteral {
                kind: "basic type",
                literal: "int32".into()
            })
        );
    }

    #[rstest]
    #[case(BasicType::Int8, true)]
    #[case(BasicType::Int32U, true)]
    #[case(BasicType::Int64, true)]
    #[case(BasicType::Float64, true)]
    #[case(BasicType::Int24, false)]
    #[case(BasicType::Int128, false)]
    #[case(BasicType::Enum, false)]
    #[case(BasicType::VisString64, false)]
    #[case(BasicType::Struct, false)]
    fn numeric_kinds(#[case] basic_type: BasicType, #[case] numeric: bool) {
        assert_eq!(basic_type.is_numeric(), numeric);
    }

    #[test]
    fn bounded_settings() {
        assert!(Cdc::Ing.is_bounded_setting());
        assert!(Cdc::Asg.is_bounded_setting());
        assert!(!Cdc::Spg.is_bounded_setting());
        assert!(!Cdc::Mv.is_bounded_setting());
        assert_eq!("CURVE".parse::<Cdc>(), Ok(Cdc::Curve));
    }

    #[test]
    fn setting_groups_order_ungrouped_first() {
        let mut groups = vec![
            SettingGroup::Group(2),
            SettingGroup::Ungrouped,
            SettingGroup::Group(1),
        ];
        groups.sort();
        assert_eq!(
            groups,
            vec![
                SettingGroup::Ungrouped,
                SettingGroup::Group(1),
                SettingGroup::Group(2)
            ]
        );
        assert_eq!(SettingGroup::from(None), SettingGroup::Ungrouped);
        assert_eq!(SettingGroup::from(Some(3)), SettingGroup::Group(3));
    }
}
