//! Extended practice profile editing for TerminFinder.
//!
//! Binds a [`termin_types::ProfileRecord`] to an editable [`FormState`],
//! scores its completeness against one of two checklists, and talks to the
//! profile endpoints. [`ProfileEditor`] ties the three together the way the
//! profile page does: load, populate, score; collect, save, reload.

pub mod client;
pub mod completeness;
pub mod editor;
pub mod error;
pub mod form;

pub use client::ProfileClient;
pub use completeness::{
    score, CompletenessCheck, CompletenessReport, CompletenessScheme, CompletenessTier,
};
pub use editor::{Alert, AlertKind, ProfileEditor};
pub use error::ProfileError;
pub use form::{FormState, FEATURE_OPTIONS, FIELD_IDS};
