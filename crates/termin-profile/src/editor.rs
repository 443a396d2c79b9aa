use crate::client::ProfileClient;
use crate::completeness::{self, CompletenessReport, CompletenessScheme};
use crate::form::FormState;
use serde::Serialize;
use termin_types::{InsuranceKind, ProfileRecord};
use tracing::{error, info};

/// Severity of an alert banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Success,
    Danger,
}

/// A user-facing alert banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Danger,
            message: message.into(),
        }
    }
}

/// The extended profile page: a form bound to the server record.
///
/// Every operation catches its own failures and reports them as a danger
/// alert; nothing is retried.
#[derive(Debug)]
pub struct ProfileEditor {
    client: ProfileClient,
    scheme: CompletenessScheme,
    record: ProfileRecord,
    pub form: FormState,
}

impl ProfileEditor {
    pub fn new(client: ProfileClient, scheme: CompletenessScheme) -> Self {
        Self {
            client,
            scheme,
            record: ProfileRecord::default(),
            form: FormState::default(),
        }
    }

    /// The record as last loaded from the server.
    pub fn record(&self) -> &ProfileRecord {
        &self.record
    }

    /// Loads the profile, fills the form and scores it.
    pub async fn load(&mut self) -> Result<CompletenessReport, Alert> {
        match self.client.fetch().await {
            Ok(record) => {
                self.form.populate(&record);
                self.record = record;
                let report = self.completeness();
                info!(percentage = report.percentage, "loaded practice profile");
                Ok(report)
            }
            Err(e) => {
                error!(error = %e, "failed to load practice profile");
                Err(Alert::danger(format!(
                    "Fehler beim Laden des Profils: {}",
                    e.user_message()
                )))
            }
        }
    }

    /// Collects the form and saves it. On success the profile is reloaded so
    /// the completeness badge reflects what the server stored.
    pub async fn save(&mut self) -> Vec<Alert> {
        let record = self.form.collect(&self.record);
        if let Err(e) = self.client.update(&record).await {
            error!(error = %e, "failed to save practice profile");
            return vec![Alert::danger(e.user_message())];
        }

        info!("saved practice profile");
        let mut alerts = vec![Alert::success("Profil erfolgreich gespeichert!")];
        if let Err(alert) = self.load().await {
            alerts.push(alert);
        }
        alerts
    }

    /// Adds a pre-filled insurance row.
    pub fn quick_add_insurance(&mut self, name: &str, kind: InsuranceKind) -> Alert {
        self.form.quick_add_insurance(name, kind);
        Alert::success(format!("{} hinzugefügt", name))
    }

    /// Scores the current form state.
    pub fn completeness(&self) -> CompletenessReport {
        completeness::score(self.scheme, &self.form, &self.record)
    }
}
