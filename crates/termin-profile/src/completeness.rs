//! Profile completeness score.
//!
//! Two checklists are in use on the platform and are kept as independent
//! schemes: the extended-profile checklist (gallery, FAQ and media driven)
//! and the contact checklist (lists and reachability driven).

use crate::form::FormState;
use serde::Serialize;
use termin_types::ProfileRecord;

/// Which checklist to score against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletenessScheme {
    /// Eleven one-point checks.
    #[default]
    Extended,
    /// Six two-point checks.
    Contact,
}

impl CompletenessScheme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "extended" => Some(Self::Extended),
            "contact" => Some(Self::Contact),
            _ => None,
        }
    }
}

/// Display tier of a percentage, mapped to a badge color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletenessTier {
    /// 80% and above.
    Success,
    /// 50% and above.
    Warning,
    Danger,
}

impl CompletenessTier {
    pub fn for_percentage(percentage: u32) -> Self {
        if percentage >= 80 {
            Self::Success
        } else if percentage >= 50 {
            Self::Warning
        } else {
            Self::Danger
        }
    }

    /// Bootstrap background class for the badge.
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Success => "bg-success",
            Self::Warning => "bg-warning",
            Self::Danger => "bg-danger",
        }
    }
}

/// One checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletenessCheck {
    pub label: &'static str,
    pub weight: u32,
    pub met: bool,
}

/// Scored checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletenessReport {
    pub scheme: CompletenessScheme,
    pub checks: Vec<CompletenessCheck>,
    pub score: u32,
    pub max_score: u32,
    pub percentage: u32,
    pub tier: CompletenessTier,
}

impl CompletenessReport {
    fn from_checks(scheme: CompletenessScheme, checks: Vec<CompletenessCheck>) -> Self {
        let score: u32 = checks.iter().filter(|c| c.met).map(|c| c.weight).sum();
        let max_score: u32 = checks.iter().map(|c| c.weight).sum();
        let percentage = if max_score == 0 {
            0
        } else {
            (f64::from(score) / f64::from(max_score) * 100.0).round() as u32
        };
        Self {
            scheme,
            checks,
            score,
            max_score,
            percentage,
            tier: CompletenessTier::for_percentage(percentage),
        }
    }

    /// Badge text shown next to the form title.
    pub fn badge_text(&self) -> String {
        format!("{}% vollständig", self.percentage)
    }

    /// Labels of the checks that are not met yet.
    pub fn missing(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().filter(|c| !c.met).map(|c| c.label)
    }
}

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

fn check(label: &'static str, weight: u32, met: bool) -> CompletenessCheck {
    CompletenessCheck { label, weight, met }
}

/// Scores the current form. `record` supplies the server-owned fields
/// (opening hours, public transport) that the form does not edit.
pub fn score(scheme: CompletenessScheme, form: &FormState, record: &ProfileRecord) -> CompletenessReport {
    let checks = match scheme {
        CompletenessScheme::Extended => vec![
            check("gallery_photos", 1, form.collect_gallery().len() >= 3),
            check("description", 1, present(&form.description)),
            check("services", 1, form.collect_services().len() >= 5),
            check("opening_hours", 1, record.has_opening_hours()),
            check("insurances", 1, !form.collect_insurances().is_empty()),
            check("features", 1, !form.collect_features().is_empty()),
            check("faq", 1, form.collect_faq().len() >= 3),
            check("parking_info", 1, present(&form.parking_info)),
            check("public_transport", 1, record.has_public_transport()),
            check("video_url", 1, present(&form.video_url)),
            check("virtual_tour_url", 1, present(&form.virtual_tour_url)),
        ],
        CompletenessScheme::Contact => {
            let social = form.collect_social_media().any();
            vec![
                check("services", 2, !form.collect_services().is_empty()),
                check("equipment", 2, !form.collect_equipment().is_empty()),
                check("insurances", 2, !form.collect_insurances().is_empty()),
                check("features", 2, !form.collect_features().is_empty()),
                check(
                    "contact",
                    2,
                    present(&form.phone) || present(&form.emergency_phone),
                ),
                check("online", 2, present(&form.website) || social),
            ]
        }
    };

    let report = CompletenessReport::from_checks(scheme, checks);
    tracing::debug!(
        scheme = ?scheme,
        score = report.score,
        max = report.max_score,
        percentage = report.percentage,
        "computed profile completeness"
    );
    report
}
