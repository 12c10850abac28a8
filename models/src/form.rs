//! Form binding between records and the text drafts a screen edits.
//!
//! Form controls hold plain strings, so a missing value is `""` inside a
//! draft. These helpers are the only place that sentinel is translated to
//! and from `Option`.

use std::fmt;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};

use crate::{RecordId, ValidationError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A record type managed by an entity screen
pub trait Resource: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    /// Editable draft for this record
    type Form: FormDraft<Record = Self>;

    /// Collection path on the backend, e.g. `departments`
    const COLLECTION: &'static str;

    /// Human label used in messages, e.g. `Department`
    const LABEL: &'static str;

    fn id(&self) -> RecordId;

    fn name(&self) -> &str;
}

/// Text draft of a record as held by a form
pub trait FormDraft: Clone + Default + fmt::Debug + Send + Sync + 'static {
    type Record;

    /// Body sent on create and update
    type Payload: Serialize + fmt::Debug + Send + Sync;

    /// Copy a record into a draft, blanking null fields
    fn from_record(record: &Self::Record) -> Self;

    /// Validate the draft and convert it into a request body
    fn to_payload(&self) -> Result<Self::Payload, ValidationError>;

    /// Name as currently typed, used in success messages
    fn display_name(&self) -> &str;
}

/// Non-empty text or a validation error
pub fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(value.to_string())
}

/// Blank text becomes `None`
pub fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Blank id becomes `None`, anything else must parse as an integer
pub fn optional_id(field: &'static str, value: &str) -> Result<Option<RecordId>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<RecordId>()
        .map(Some)
        .map_err(|_| ValidationError::InvalidId {
            field,
            value: value.to_string(),
        })
}

/// Required ISO date
pub fn required_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let value = required_text(field, value)?;
    parse_date(field, &value)
}

/// Blank date becomes `None`
pub fn optional_date(field: &'static str, value: &str) -> Result<Option<NaiveDate>, ValidationError> {
    match optional_text(value) {
        Some(value) => parse_date(field, &value).map(Some),
        None => Ok(None),
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// `None` becomes `""` for display in a form control
pub fn text_or_blank(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

pub fn id_or_blank(value: Option<RecordId>) -> String {
    value.map(|id| id.to_string()).unwrap_or_default()
}

pub fn date_or_blank(value: Option<NaiveDate>) -> String {
    value
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
