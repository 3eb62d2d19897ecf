//! Closed enums stored as enum properties.
//!
//! Each enum has fixed ordinals and symbolic names that must both match the
//! stored value before a bean will accept it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::bag::PropertyEnum;

// ---------------------------------------------------------------------------
// Macro: defines a closed enum with (ordinal, symbolic name) pairs.
// ---------------------------------------------------------------------------
macro_rules! property_enum {
    (
        $(#[$meta:meta])*
        $name:ident, type_name = $type_name:expr,
        variants: [
            $( ($variant:ident, $ordinal:expr, $symbol:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            /// All variants in ordinal order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];
        }

        impl PropertyEnum for $name {
            const TYPE_NAME: &'static str = $type_name;

            fn ordinal(&self) -> i32 {
                match self {
                    $( Self::$variant => $ordinal, )+
                }
            }

            fn symbolic_name(&self) -> &'static str {
                match self {
                    $( Self::$variant => $symbol, )+
                }
            }

            fn from_symbolic_name(name: &str) -> Option<Self> {
                match name {
                    $( $symbol => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.symbolic_name())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.symbolic_name())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_symbolic_name(&s).ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown {} value {s:?}", $type_name))
                })
            }
        }
    };
}

property_enum! {
    /// Progress of a to-do.
    ToDoStatus, type_name = "ToDoStatus",
    variants: [
        (Open, 0, "OPEN"),
        (InProgress, 1, "IN_PROGRESS"),
        (Waiting, 2, "WAITING"),
        (Complete, 3, "COMPLETE"),
        (Abandoned, 99, "ABANDONED"),
    ]
}

property_enum! {
    /// Progress of work against a single action target.
    ActivityStatus, type_name = "ActivityStatus",
    variants: [
        (Requested, 0, "REQUESTED"),
        (Approved, 1, "APPROVED"),
        (Waiting, 2, "WAITING"),
        (Activating, 3, "ACTIVATING"),
        (InProgress, 4, "IN_PROGRESS"),
        (Completed, 10, "COMPLETED"),
        (Invalid, 11, "INVALID"),
        (Ignored, 12, "IGNORED"),
        (Failed, 13, "FAILED"),
        (Cancelled, 14, "CANCELLED"),
        (Other, 99, "OTHER"),
    ]
}

property_enum! {
    /// How trustworthy a collection membership is.
    MembershipStatus, type_name = "CollectionMemberStatus",
    variants: [
        (Unknown, 0, "UNKNOWN"),
        (Discovered, 1, "DISCOVERED"),
        (Proposed, 2, "PROPOSED"),
        (Imported, 3, "IMPORTED"),
        (Validated, 4, "VALIDATED"),
        (Deprecated, 5, "DEPRECATED"),
        (Obsolete, 6, "OBSOLETE"),
        (Other, 99, "OTHER"),
    ]
}

impl ToDoStatus {
    /// Returns `true` once no further work is expected.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Complete | Self::Abandoned)
    }
}
