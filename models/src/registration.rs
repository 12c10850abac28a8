use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::form::{required_date, required_text};
use crate::{PatientType, RecordId, ValidationError};

/// Self-registration draft. The backend registers the patient as an
/// unassigned outpatient, so only personal details are collected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub name: String,
    pub date_of_birth: String,
    pub contact_info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationPayload {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub contact_info: String,
}

/// What the backend echoes after a self-registration. Only the id is
/// promised; the name falls back to what was submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub patient_type: PatientType,
}

impl RegistrationForm {
    pub fn to_payload(&self) -> Result<RegistrationPayload, ValidationError> {
        Ok(RegistrationPayload {
            name: required_text("Full name", &self.name)?,
            date_of_birth: required_date("Date of birth", &self.date_of_birth)?,
            contact_info: required_text("Contact info", &self.contact_info)?,
        })
    }
}
