//! Shared primitive IDs and call-sign related enums.

use serde::{Deserialize, Serialize};

/// DXCC entity number.
pub type DxccId = u32;
/// Position of an [`crate::index::EntityMaskIndex`] inside its [`crate::index::PrefixIndex`].
pub type EntityId = u32;
/// Caller-supplied spot identifier.
pub type SpotId = u64;
/// Caller-supplied sequence number.
pub type Sequence = u64;

/// Kind of a prefix database record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntityKind {
    /// Unclassified record.
    #[default]
    #[serde(rename = "pfNone")]
    None,
    /// Current DXCC entity.
    #[serde(rename = "pfDXCC")]
    Dxcc,
    /// Province or call area of an entity.
    #[serde(rename = "pfProvince")]
    Province,
    /// Special station.
    #[serde(rename = "pfStation")]
    Station,
    /// Deleted DXCC entity.
    #[serde(rename = "pfDelDXCC")]
    DeletedDxcc,
    /// Historical prefix.
    #[serde(rename = "pfOldPrefix")]
    OldPrefix,
    /// Entity that does not count for DXCC.
    #[serde(rename = "pfNonDXCC")]
    NonDxcc,
    /// Prefix block that is not issued.
    #[serde(rename = "pfInvalidPrefix")]
    InvalidPrefix,
    /// Deleted province.
    #[serde(rename = "pfDelProvince")]
    DeletedProvince,
    /// City.
    #[serde(rename = "pfCity")]
    City,
}

impl EntityKind {
    /// Parses the database spelling (`pfDXCC`, `pfProvince`, ...).
    pub fn from_code(code: &str) -> Option<Self> {
        let kind = match code {
            "pfNone" => Self::None,
            "pfDXCC" => Self::Dxcc,
            "pfProvince" => Self::Province,
            "pfStation" => Self::Station,
            "pfDelDXCC" => Self::DeletedDxcc,
            "pfOldPrefix" => Self::OldPrefix,
            "pfNonDXCC" => Self::NonDxcc,
            "pfInvalidPrefix" => Self::InvalidPrefix,
            "pfDelProvince" => Self::DeletedProvince,
            "pfCity" => Self::City,
            _ => return None,
        };
        Some(kind)
    }
}

/// Semantic tag derived from a call sign modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignFlag {
    /// Portable or mobile operation.
    Portable,
    /// Maritime mobile.
    Maritime,
    /// Beacon or rover.
    Beacon,
    /// Low power.
    Qrp,
    /// Prefix could not be resolved unambiguously.
    AmbiguousPrefix,
}

/// Role of one `/`-delimited token of a call sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Plausible station call sign.
    CallSign,
    /// Prefix or location override.
    Prefix,
    /// Free text.
    Text,
    /// Single call-area digit.
    Numeric,
    /// Known modifier such as `P`, `MM` or `QRP`.
    PortableSuffix,
    /// Could be a call sign or a prefix.
    Ambiguous,
    /// Not usable.
    Invalid,
}

/// Structural form of a whole call sign.
///
/// Variant names spell the token roles left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallStructureType {
    /// `C`
    Call,
    /// `C#`
    CallDigit,
    /// `C#M`
    CallDigitPortable,
    /// `C#T`
    CallDigitText,
    /// `CM`
    CallPortable,
    /// `CM#`
    CallPortableDigit,
    /// `CMM`
    CallPortablePortable,
    /// `CMP`
    CallPortablePrefix,
    /// `CMT`
    CallPortableText,
    /// `CP`
    CallPrefix,
    /// `CPM`
    CallPrefixPortable,
    /// `CT`
    CallText,
    /// `PC`
    PrefixCall,
    /// `PCM`
    PrefixCallPortable,
    /// `PCT`
    PrefixCallText,
    /// No valid form.
    Invalid,
}

impl CallStructureType {
    /// Compact role code, e.g. `C#M`.
    pub fn code(self) -> &'static str {
        match self {
            Self::Call => "C",
            Self::CallDigit => "C#",
            Self::CallDigitPortable => "C#M",
            Self::CallDigitText => "C#T",
            Self::CallPortable => "CM",
            Self::CallPortableDigit => "CM#",
            Self::CallPortablePortable => "CMM",
            Self::CallPortablePrefix => "CMP",
            Self::CallPortableText => "CMT",
            Self::CallPrefix => "CP",
            Self::CallPrefixPortable => "CPM",
            Self::CallText => "CT",
            Self::PrefixCall => "PC",
            Self::PrefixCallPortable => "PCM",
            Self::PrefixCallText => "PCT",
            Self::Invalid => "Invalid",
        }
    }

    /// True for the forms whose leading token is the prefix.
    pub fn is_prefix_first(self) -> bool {
        matches!(
            self,
            Self::PrefixCall | Self::PrefixCallPortable | Self::PrefixCallText
        )
    }

    /// True for the forms that try the portable-prefix dictionary first.
    pub fn uses_portable_prefix(self) -> bool {
        matches!(
            self,
            Self::CallPrefix
                | Self::PrefixCall
                | Self::CallPortablePrefix
                | Self::CallPrefixPortable
                | Self::PrefixCallPortable
                | Self::PrefixCallText
        )
    }
}

/// Caller correlation fields copied onto every hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Correlation {
    /// Spot identifier.
    pub spot_id: SpotId,
    /// Sequence number.
    pub sequence: Sequence,
}
