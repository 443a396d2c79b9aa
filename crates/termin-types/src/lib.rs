//! Shared types for the TerminFinder client toolkit.
//!
//! This crate provides the record types exchanged with the TerminFinder
//! backend (the extended practice profile and its repeatable lists), the
//! advisory user type carried in the session JWT, and the error body every
//! endpoint returns on failure.
//!
//! No crate in the workspace depends on anything *except* `termin-types` for
//! cross-cutting type definitions.

use serde::{Deserialize, Deserializer, Serialize};

pub mod profile;
pub mod voice;

pub use profile::{
    EquipmentItem, FaqItem, GalleryPhoto, InsuranceItem, InsuranceKind, ProfileRecord,
    ServiceItem, SocialMedia, TransitLink,
};

/// Account type embedded in the `sub.type` claim of the session token.
///
/// Detection is advisory only: the token signature is never verified on the
/// client, so this value must not gate anything security relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// No session cookie, or a token that could not be decoded.
    #[default]
    Guest,
    /// A patient account.
    Patient,
    /// A doctor / practice account.
    Doctor,
    /// A platform administrator.
    Admin,
}

impl UserType {
    /// Parses the claim value. Unknown values map to `Guest`.
    pub fn from_claim(value: &str) -> Self {
        match value {
            "patient" => Self::Patient,
            "doctor" => Self::Doctor,
            "admin" => Self::Admin,
            _ => Self::Guest,
        }
    }

    /// Returns the claim label for this user type.
    pub fn label(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Admin => "admin",
        }
    }
}

/// Error body returned by every TerminFinder endpoint on a non-OK response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Deserializes `null` the same way as a missing field.
///
/// The backend serializes unset profile columns as `null`; the client model
/// treats those as empty strings and empty lists.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
