//! Status enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table, and its label matches
//! the `name` column.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::StatusId;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant = $val ),+
        }

        impl $name {
            /// Every variant, in seed order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Resolve a database status ID, if it is known.
            pub fn from_id(id: StatusId) -> Option<Self> {
                Self::ALL.iter().copied().find(|s| s.id() == id)
            }

            /// Lower-case label, as stored in the lookup table.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL.iter().copied().find(|v| v.as_str() == s).ok_or_else(|| {
                    let valid: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                    CoreError::Validation(format!(
                        "Invalid {} '{s}'. Must be one of: {}",
                        stringify!($name),
                        valid.join(", ")
                    ))
                })
            }
        }
    };
}

define_status_enum! {
    /// Product (pitch) lifecycle status.
    ProductStatus {
        Pending = 1 => "pending",
        Approved = 2 => "approved",
        Rejected = 3 => "rejected",
        Funded = 4 => "funded",
    }
}

define_status_enum! {
    /// Mentorship lifecycle status.
    MentorshipStatus {
        Active = 1 => "active",
        Completed = 2 => "completed",
        Terminated = 3 => "terminated",
    }
}

/// Resolve a stored product status id, treating unknown ids as corruption.
pub fn product_status(id: StatusId) -> Result<ProductStatus, CoreError> {
    ProductStatus::from_id(id)
        .ok_or_else(|| CoreError::Internal(format!("Unknown product status id {id}")))
}

/// Resolve a stored mentorship status id, treating unknown ids as corruption.
pub fn mentorship_status(id: StatusId) -> Result<MentorshipStatus, CoreError> {
    MentorshipStatus::from_id(id)
        .ok_or_else(|| CoreError::Internal(format!("Unknown mentorship status id {id}")))
}
