//! Enum types for generic metadata instances.
//!
//! Each string-backed enum has:
//! - Custom Serialize (as the repository's upper-case symbolic name)
//! - Custom Deserialize (known variants + catch-all `Other(String)`)
//! - `as_str()`, `is_default()`, `Display` impl

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Macro: defines an enum with known string variants + an Other(String) fallback.
// ---------------------------------------------------------------------------
macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident, custom_variant = $custom_variant:ident,
        variants: [
            $( ($variant:ident, $str:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            $custom_variant(String),
        }

        impl $name {
            /// Returns the string representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $str, )+
                    Self::$custom_variant(s) => s.as_str(),
                }
            }

            /// Returns `true` if this is the default variant.
            pub fn is_default(&self) -> bool {
                *self == Self::$default
            }

            /// Returns `true` if this is a built-in (non-custom) variant.
            pub fn is_builtin(&self) -> bool {
                !matches!(self, Self::$custom_variant(_))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from(s))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $( $str => Self::$variant, )+
                    other => Self::$custom_variant(other.to_owned()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $( $str => Self::$variant, )+
                    _ => Self::$custom_variant(s),
                }
            }
        }
    };
}

// ===========================================================================
// InstanceStatus
// ===========================================================================

define_enum! {
    /// Lifecycle status of an entity, relationship or classification.
    InstanceStatus, default = Active, custom_variant = Other,
    variants: [
        (Unknown, "UNKNOWN"),
        (Draft, "DRAFT"),
        (Prepared, "PREPARED"),
        (Proposed, "PROPOSED"),
        (Approved, "APPROVED"),
        (Rejected, "REJECTED"),
        (ApprovedConcept, "APPROVED_CONCEPT"),
        (UnderDevelopment, "UNDER_DEVELOPMENT"),
        (DevelopmentComplete, "DEVELOPMENT_COMPLETE"),
        (ApprovedForDeployment, "APPROVED_FOR_DEPLOYMENT"),
        (Standby, "STANDBY"),
        (Active, "ACTIVE"),
        (Failed, "FAILED"),
        (Disabled, "DISABLED"),
        (Complete, "COMPLETE"),
        (Deprecated, "DEPRECATED"),
        (Deleted, "DELETED"),
    ]
}

// ===========================================================================
// InstanceProvenance
// ===========================================================================

define_enum! {
    /// Where an instance came from relative to the repository that returned it.
    InstanceProvenance, default = LocalCohort, custom_variant = Other,
    variants: [
        (Unknown, "UNKNOWN"),
        (LocalCohort, "LOCAL_COHORT"),
        (ExportArchive, "EXPORT_ARCHIVE"),
        (ContentPack, "CONTENT_PACK"),
        (DeregisteredRepository, "DEREGISTERED_REPOSITORY"),
        (Configuration, "CONFIGURATION"),
        (ExternalSource, "EXTERNAL_SOURCE"),
    ]
}

// ===========================================================================
// UnmatchedRelationshipPolicy
// ===========================================================================

/// What a converter does with a relationship whose type has no place in the
/// bean being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedRelationshipPolicy {
    /// Skip it, logging at debug level only.
    Ignore,
    /// Skip it and emit a warning.
    #[default]
    Warn,
    /// Fail the conversion.
    Reject,
}

impl UnmatchedRelationshipPolicy {
    /// Returns the configuration spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Warn => "warn",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for UnmatchedRelationshipPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnmatchedRelationshipPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "warn" => Ok(Self::Warn),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown relationship policy {other:?} (expected ignore, warn or reject)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_status_default_is_active() {
        assert_eq!(InstanceStatus::default(), InstanceStatus::Active);
        assert!(InstanceStatus::Active.is_default());
        assert_eq!(InstanceStatus::Active.as_str(), "ACTIVE");
    }

    #[test]
    fn instance_status_serde() {
        let json = serde_json::to_string(&InstanceStatus::ApprovedConcept).unwrap();
        assert_eq!(json, r#""APPROVED_CONCEPT""#);
        let back: InstanceStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, InstanceStatus::ApprovedConcept);
    }

    #[test]
    fn instance_status_unknown_string_is_kept() {
        let s: InstanceStatus = serde_json::from_str(r#""ARCHIVED""#).unwrap();
        assert_eq!(s, InstanceStatus::Other("ARCHIVED".into()));
        assert!(!s.is_builtin());
        assert_eq!(s.to_string(), "ARCHIVED");
    }

    #[test]
    fn provenance_from_str() {
        assert_eq!(
            InstanceProvenance::from("CONTENT_PACK"),
            InstanceProvenance::ContentPack
        );
        assert!(InstanceProvenance::LocalCohort.is_default());
    }

    #[test]
    fn policy_parse() {
        assert_eq!(
            "Reject".parse::<UnmatchedRelationshipPolicy>().unwrap(),
            UnmatchedRelationshipPolicy::Reject
        );
        assert!("drop".parse::<UnmatchedRelationshipPolicy>().is_err());
        assert_eq!(
            UnmatchedRelationshipPolicy::default(),
            UnmatchedRelationshipPolicy::Warn
        );
    }

    #[test]
    fn policy_serde_lowercase() {
        let json = serde_json::to_string(&UnmatchedRelationshipPolicy::Ignore).unwrap();
        assert_eq!(json, r#""ignore""#);
    }
}
