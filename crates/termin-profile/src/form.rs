//! Form model for the extended practice profile editor.
//!
//! `FormState` is the editable projection of a [`ProfileRecord`]: plain text
//! inputs addressed by their element id, repeatable rows for the list
//! sections, and a fixed set of feature checkboxes. [`FormState::populate`]
//! fills the form from a record and [`FormState::collect`] reads it back,
//! dropping incomplete rows.

use termin_types::{
    EquipmentItem, FaqItem, GalleryPhoto, InsuranceItem, InsuranceKind, ProfileRecord,
    ServiceItem, SocialMedia,
};

/// Feature tags offered as checkboxes on the profile page.
pub const FEATURE_OPTIONS: &[&str] = &[
    "wheelchair_accessible",
    "parking",
    "wifi",
    "elevator",
    "children_friendly",
    "online_booking",
    "video_consultation",
    "evening_hours",
    "weekend_hours",
    "multilingual",
];

/// Element ids of every plain text input, in page order.
pub const FIELD_IDS: &[&str] = &[
    "phone",
    "emergency_phone",
    "whatsapp_number",
    "telegram_username",
    "website",
    "slug",
    "description",
    "parking_info",
    "google_business_url",
    "social_facebook",
    "social_instagram",
    "social_linkedin",
    "social_twitter",
    "social_youtube",
    "social_tiktok",
    "video_url",
    "virtual_tour_url",
    "chatbot_instructions",
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceRow {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EquipmentRow {
    pub name: String,
    pub description: String,
}

/// Insurance row. `kind` holds the raw select value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsuranceRow {
    pub name: String,
    pub kind: String,
    pub logo_url: String,
}

impl Default for InsuranceRow {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: InsuranceKind::Public.label().to_string(),
            logo_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FaqRow {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GalleryRow {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCheckbox {
    pub value: String,
    pub checked: bool,
}

/// Editable state of the extended profile form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub phone: String,
    pub emergency_phone: String,
    pub whatsapp_number: String,
    pub telegram_username: String,
    pub website: String,
    pub slug: String,
    pub description: String,
    pub parking_info: String,
    pub google_business_url: String,
    pub social_facebook: String,
    pub social_instagram: String,
    pub social_linkedin: String,
    pub social_twitter: String,
    pub social_youtube: String,
    pub social_tiktok: String,
    pub video_url: String,
    pub virtual_tour_url: String,
    pub chatbot_instructions: String,
    pub services: Vec<ServiceRow>,
    pub equipment: Vec<EquipmentRow>,
    pub insurances: Vec<InsuranceRow>,
    pub faq: Vec<FaqRow>,
    pub gallery: Vec<GalleryRow>,
    pub features: Vec<FeatureCheckbox>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::with_feature_options(FEATURE_OPTIONS.iter().copied())
    }
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

impl FormState {
    /// Creates an empty form offering the given feature checkboxes.
    pub fn with_feature_options<'a>(options: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            phone: String::new(),
            emergency_phone: String::new(),
            whatsapp_number: String::new(),
            telegram_username: String::new(),
            website: String::new(),
            slug: String::new(),
            description: String::new(),
            parking_info: String::new(),
            google_business_url: String::new(),
            social_facebook: String::new(),
            social_instagram: String::new(),
            social_linkedin: String::new(),
            social_twitter: String::new(),
            social_youtube: String::new(),
            social_tiktok: String::new(),
            video_url: String::new(),
            virtual_tour_url: String::new(),
            chatbot_instructions: String::new(),
            services: Vec::new(),
            equipment: Vec::new(),
            insurances: Vec::new(),
            faq: Vec::new(),
            gallery: Vec::new(),
            features: options
                .into_iter()
                .map(|value| FeatureCheckbox {
                    value: value.to_string(),
                    checked: false,
                })
                .collect(),
        }
    }

    /// Fills every input, row list and checkbox from `record`.
    ///
    /// Existing rows are replaced. Feature tags that have no checkbox on the
    /// page are ignored.
    pub fn populate(&mut self, record: &ProfileRecord) {
        self.phone = record.phone.clone();
        self.emergency_phone = record.emergency_phone.clone();
        self.whatsapp_number = record.whatsapp_number.clone();
        self.telegram_username = record.telegram_username.clone();
        self.website = record.website.clone();
        self.slug = record.slug.clone();
        self.description = record.description.clone();
        self.parking_info = record.parking_info.clone();
        self.google_business_url = record.google_business_url.clone();

        let social = &record.social_media;
        self.social_facebook = social.facebook.clone();
        self.social_instagram = social.instagram.clone();
        self.social_linkedin = social.linkedin.clone();
        self.social_twitter = social.twitter.clone();
        self.social_youtube = social.youtube.clone();
        self.social_tiktok = social.tiktok.clone();

        self.video_url = record.video_url.clone();
        self.virtual_tour_url = record.virtual_tour_url.clone();
        self.chatbot_instructions = record.chatbot_instructions.clone();

        self.services = record
            .services
            .iter()
            .map(|s| ServiceRow {
                name: s.name.clone(),
                description: s.description.clone(),
            })
            .collect();
        self.equipment = record
            .equipment
            .iter()
            .map(|e| EquipmentRow {
                name: e.name.clone(),
                description: e.description.clone(),
            })
            .collect();
        self.insurances = record
            .accepted_insurances
            .iter()
            .map(|i| InsuranceRow {
                name: i.name.clone(),
                kind: i.kind.label().to_string(),
                logo_url: i.logo_url.clone(),
            })
            .collect();
        self.faq = record
            .faq
            .iter()
            .map(|f| FaqRow {
                question: f.question.clone(),
                answer: f.answer.clone(),
            })
            .collect();
        self.gallery = record
            .gallery_photos
            .iter()
            .map(|p| GalleryRow {
                url: p.url.clone(),
                title: p.title.clone(),
            })
            .collect();

        for checkbox in &mut self.features {
            checkbox.checked = record.features.contains(&checkbox.value);
        }
    }

    pub fn collect_social_media(&self) -> SocialMedia {
        SocialMedia {
            facebook: self.social_facebook.clone(),
            instagram: self.social_instagram.clone(),
            linkedin: self.social_linkedin.clone(),
            twitter: self.social_twitter.clone(),
            youtube: self.social_youtube.clone(),
            tiktok: self.social_tiktok.clone(),
        }
    }

    /// Builds a record from the current form.
    ///
    /// Rows without a name (services, equipment, insurances), without both
    /// question and answer (FAQ), or without a URL (gallery) are skipped. FAQ
    /// and gallery `order` is the row position, counting skipped rows.
    /// Server-owned fields are taken from `base`.
    pub fn collect(&self, base: &ProfileRecord) -> ProfileRecord {
        ProfileRecord {
            phone: self.phone.clone(),
            emergency_phone: self.emergency_phone.clone(),
            whatsapp_number: self.whatsapp_number.clone(),
            telegram_username: self.telegram_username.clone(),
            website: self.website.clone(),
            google_business_url: self.google_business_url.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            parking_info: self.parking_info.clone(),
            social_media: self.collect_social_media(),
            video_url: self.video_url.clone(),
            virtual_tour_url: self.virtual_tour_url.clone(),
            services: self.collect_services(),
            equipment: self.collect_equipment(),
            accepted_insurances: self.collect_insurances(),
            features: self.collect_features(),
            faq: self.collect_faq(),
            gallery_photos: self.collect_gallery(),
            chatbot_instructions: self.chatbot_instructions.clone(),
            opening_hours: base.opening_hours.clone(),
            public_transport: base.public_transport.clone(),
        }
    }

    pub fn collect_services(&self) -> Vec<ServiceItem> {
        self.services
            .iter()
            .filter(|row| filled(&row.name))
            .map(|row| ServiceItem {
                name: row.name.clone(),
                description: row.description.clone(),
            })
            .collect()
    }

    pub fn collect_equipment(&self) -> Vec<EquipmentItem> {
        self.equipment
            .iter()
            .filter(|row| filled(&row.name))
            .map(|row| EquipmentItem {
                name: row.name.clone(),
                description: row.description.clone(),
            })
            .collect()
    }

    pub fn collect_insurances(&self) -> Vec<InsuranceItem> {
        self.insurances
            .iter()
            .filter(|row| filled(&row.name))
            .map(|row| InsuranceItem {
                name: row.name.clone(),
                kind: InsuranceKind::from_form(&row.kind),
                logo_url: row.logo_url.clone(),
            })
            .collect()
    }

    /// Checked feature values in checkbox order.
    pub fn collect_features(&self) -> Vec<String> {
        self.features
            .iter()
            .filter(|checkbox| checkbox.checked)
            .map(|checkbox| checkbox.value.clone())
            .collect()
    }

    pub fn collect_faq(&self) -> Vec<FaqItem> {
        self.faq
            .iter()
            .enumerate()
            .filter(|(_, row)| filled(&row.question) && filled(&row.answer))
            .map(|(index, row)| FaqItem {
                question: row.question.clone(),
                answer: row.answer.clone(),
                order: index as u32,
            })
            .collect()
    }

    pub fn collect_gallery(&self) -> Vec<GalleryPhoto> {
        self.gallery
            .iter()
            .enumerate()
            .filter(|(_, row)| filled(&row.url))
            .map(|(index, row)| GalleryPhoto {
                url: row.url.clone(),
                title: row.title.clone(),
                order: index as u32,
            })
            .collect()
    }

    /// Appends a blank service row.
    pub fn add_service(&mut self) {
        self.services.push(ServiceRow::default());
    }

    pub fn add_equipment(&mut self) {
        self.equipment.push(EquipmentRow::default());
    }

    pub fn add_insurance(&mut self) {
        self.insurances.push(InsuranceRow::default());
    }

    /// Appends a pre-filled insurance row (the "quick add" buttons).
    pub fn quick_add_insurance(&mut self, name: &str, kind: InsuranceKind) {
        self.insurances.push(InsuranceRow {
            name: name.to_string(),
            kind: kind.label().to_string(),
            logo_url: String::new(),
        });
    }

    pub fn add_faq(&mut self) {
        self.faq.push(FaqRow::default());
    }

    pub fn add_gallery_photo(&mut self) {
        self.gallery.push(GalleryRow::default());
    }

    /// Removes the service row at `index`. Out-of-range indices are ignored.
    pub fn remove_service(&mut self, index: usize) -> Option<ServiceRow> {
        (index < self.services.len()).then(|| self.services.remove(index))
    }

    pub fn remove_equipment(&mut self, index: usize) -> Option<EquipmentRow> {
        (index < self.equipment.len()).then(|| self.equipment.remove(index))
    }

    pub fn remove_insurance(&mut self, index: usize) -> Option<InsuranceRow> {
        (index < self.insurances.len()).then(|| self.insurances.remove(index))
    }

    pub fn remove_faq(&mut self, index: usize) -> Option<FaqRow> {
        (index < self.faq.len()).then(|| self.faq.remove(index))
    }

    pub fn remove_gallery_photo(&mut self, index: usize) -> Option<GalleryRow> {
        (index < self.gallery.len()).then(|| self.gallery.remove(index))
    }

    /// Checks or unchecks a feature. Returns false if the page has no such
    /// checkbox.
    pub fn set_feature(&mut self, value: &str, checked: bool) -> bool {
        match self.features.iter_mut().find(|c| c.value == value) {
            Some(checkbox) => {
                checkbox.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Returns the text input with the given element id.
    pub fn field(&self, id: &str) -> Option<&str> {
        let value = match id {
            "phone" => &self.phone,
            "emergency_phone" => &self.emergency_phone,
            "whatsapp_number" => &self.whatsapp_number,
            "telegram_username" => &self.telegram_username,
            "website" => &self.website,
            "slug" => &self.slug,
            "description" => &self.description,
            "parking_info" => &self.parking_info,
            "google_business_url" => &self.google_business_url,
            "social_facebook" => &self.social_facebook,
            "social_instagram" => &self.social_instagram,
            "social_linkedin" => &self.social_linkedin,
            "social_twitter" => &self.social_twitter,
            "social_youtube" => &self.social_youtube,
            "social_tiktok" => &self.social_tiktok,
            "video_url" => &self.video_url,
            "virtual_tour_url" => &self.virtual_tour_url,
            "chatbot_instructions" => &self.chatbot_instructions,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Mutable access to the text input with the given element id.
    pub fn field_mut(&mut self, id: &str) -> Option<&mut String> {
        let value = match id {
            "phone" => &mut self.phone,
            "emergency_phone" => &mut self.emergency_phone,
            "whatsapp_number" => &mut self.whatsapp_number,
            "telegram_username" => &mut self.telegram_username,
            "website" => &mut self.website,
            "slug" => &mut self.slug,
            "description" => &mut self.description,
            "parking_info" => &mut self.parking_info,
            "google_business_url" => &mut self.google_business_url,
            "social_facebook" => &mut self.social_facebook,
            "social_instagram" => &mut self.social_instagram,
            "social_linkedin" => &mut self.social_linkedin,
            "social_twitter" => &mut self.social_twitter,
            "social_youtube" => &mut self.social_youtube,
            "social_tiktok" => &mut self.social_tiktok,
            "video_url" => &mut self.video_url,
            "virtual_tour_url" => &mut self.virtual_tour_url,
            "chatbot_instructions" => &mut self.chatbot_instructions,
            _ => return None,
        };
        Some(value)
    }
}
