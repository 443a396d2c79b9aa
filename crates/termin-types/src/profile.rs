//! Extended practice profile record.
//!
//! Mirrors the JSON shape served by `GET /api/practice/profile` and accepted
//! by `PUT /api/practice/profile/extended`. Every field is optional on the
//! wire; `null` and missing values both decode to the empty value.

use crate::null_as_default;
use serde::{Deserialize, Serialize};

/// The extended profile of a medical practice.
///
/// List order reflects display order. There are no uniqueness constraints on
/// any list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emergency_phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub whatsapp_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub telegram_username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub google_business_url: String,
    /// Public URL slug of the practice page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parking_info: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub social_media: SocialMedia,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub virtual_tour_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<ServiceItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub equipment: Vec<EquipmentItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub accepted_insurances: Vec<InsuranceItem>,
    /// Feature tags such as `wheelchair_accessible` or `wifi`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub faq: Vec<FaqItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gallery_photos: Vec<GalleryPhoto>,
    /// Extra instructions for the practice chatbot.
    #[serde(default, deserialize_with = "null_as_default")]
    pub chatbot_instructions: String,
    /// Opening hours as maintained by the calendar pages. Read-only here.
    #[serde(default, skip_serializing)]
    pub opening_hours: Option<serde_json::Value>,
    /// Nearby public transport. Read-only here.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing)]
    pub public_transport: Vec<TransitLink>,
}

impl ProfileRecord {
    /// Returns true if the server reported any opening hours.
    pub fn has_opening_hours(&self) -> bool {
        match &self.opening_hours {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Object(map)) => !map.is_empty(),
            Some(serde_json::Value::Array(list)) => !list.is_empty(),
            Some(serde_json::Value::String(text)) => !text.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Returns true if the server reported any public transport links.
    pub fn has_public_transport(&self) -> bool {
        !self.public_transport.is_empty()
    }
}

/// Social media handles or URLs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default, deserialize_with = "null_as_default")]
    pub facebook: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instagram: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub linkedin: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub twitter: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub youtube: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tiktok: String,
}

impl SocialMedia {
    /// Returns true if at least one handle is filled in.
    pub fn any(&self) -> bool {
        [
            &self.facebook,
            &self.instagram,
            &self.linkedin,
            &self.twitter,
            &self.youtube,
            &self.tiktok,
        ]
        .iter()
        .any(|handle| !handle.trim().is_empty())
    }
}

/// A medical service offered by the practice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// A piece of medical equipment available at the practice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EquipmentItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Health insurance category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceKind {
    /// Statutory insurance (gesetzlich).
    #[default]
    Public,
    /// Private insurance.
    Private,
    /// Anything else the backend may send.
    #[serde(other)]
    Other,
}

impl InsuranceKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Other => "other",
        }
    }

    /// Parses a form select value; empty falls back to `Public`.
    pub fn from_form(value: &str) -> Self {
        match value.trim() {
            "" | "public" => Self::Public,
            "private" => Self::Private,
            _ => Self::Other,
        }
    }
}

/// An accepted insurance provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InsuranceItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: InsuranceKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logo_url: String,
}

/// A frequently asked question with its answer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FaqItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answer: String,
    /// Display position, assigned from the form row index on collection.
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: u32,
}

/// A gallery photo.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GalleryPhoto {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: u32,
}

/// A public transport connection near the practice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransitLink {
    /// `bus`, `train` or `tram`.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stop: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub distance: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nulls_decode_as_empty() {
        let record: ProfileRecord = serde_json::from_value(json!({
            "phone": null,
            "website": "https://praxis.example",
            "services": null,
            "social_media": null,
            "accepted_insurances": [{"name": "AOK", "type": null, "logo_url": null}],
        }))
        .unwrap();

        assert_eq!(record.phone, "");
        assert_eq!(record.website, "https://praxis.example");
        assert!(record.services.is_empty());
        assert!(!record.social_media.any());
        assert_eq!(record.accepted_insurances[0].kind, InsuranceKind::Public);
        assert_eq!(record.accepted_insurances[0].logo_url, "");
    }

    #[test]
    fn unknown_insurance_kind_is_other() {
        let item: InsuranceItem =
            serde_json::from_value(json!({"name": "BG", "type": "accident"})).unwrap();
        assert_eq!(item.kind, InsuranceKind::Other);
    }

    #[test]
    fn read_only_fields_are_not_sent_back() {
        let record = ProfileRecord {
            opening_hours: Some(json!({"monday": "08:00-12:00"})),
            public_transport: vec![TransitLink {
                kind: "bus".to_string(),
                line: "42".to_string(),
                stop: "Marktplatz".to_string(),
                distance: "200m".to_string(),
            }],
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("opening_hours").is_none());
        assert!(value.get("public_transport").is_none());
        assert_eq!(value["accepted_insurances"], json!([]));
    }

    #[test]
    fn opening_hours_presence() {
        let mut record = ProfileRecord::default();
        assert!(!record.has_opening_hours());
        record.opening_hours = Some(json!({}));
        assert!(!record.has_opening_hours());
        record.opening_hours = Some(json!({"monday": "08:00-12:00"}));
        assert!(record.has_opening_hours());
    }
}
