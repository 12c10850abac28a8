use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::form::{
    date_or_blank, id_or_blank, optional_date, optional_id, optional_text, required_date,
    required_text, text_or_blank,
};
use crate::{FormDraft, RecordId, Resource, ValidationError};

/// Whether a patient is admitted or visiting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatientType {
    Inpatient,
    #[default]
    Outpatient,
}

impl fmt::Display for PatientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inpatient => f.write_str("Inpatient"),
            Self::Outpatient => f.write_str("Outpatient"),
        }
    }
}

/// Patient as returned by the backend.
///
/// The variant fields are flat on the wire; only the ones matching
/// `patient_type` carry meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: RecordId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub contact_info: Option<String>,
    #[serde(default)]
    pub patient_type: PatientType,
    pub assigned_doctor_id: Option<RecordId>,
    pub assigned_department_id: Option<RecordId>,

    // Inpatient
    pub room_number: Option<String>,
    pub admission_date: Option<NaiveDate>,
    pub discharge_date: Option<NaiveDate>,

    // Outpatient
    pub last_visit_date: Option<NaiveDate>,

    // Computed by the server
    pub assigned_doctor_name: Option<String>,
    pub assigned_department_name: Option<String>,
}

/// Variant-specific part of a patient payload, tagged by `patient_type`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "patient_type", rename_all = "lowercase")]
pub enum CareDetails {
    Inpatient {
        room_number: Option<String>,
        admission_date: NaiveDate,
        discharge_date: Option<NaiveDate>,
    },
    Outpatient {
        last_visit_date: NaiveDate,
    },
}

impl CareDetails {
    pub fn patient_type(&self) -> PatientType {
        match self {
            Self::Inpatient { .. } => PatientType::Inpatient,
            Self::Outpatient { .. } => PatientType::Outpatient,
        }
    }
}

/// Body for creating or updating a patient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientPayload {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub contact_info: Option<String>,
    pub assigned_doctor_id: Option<RecordId>,
    pub assigned_department_id: Option<RecordId>,
    #[serde(flatten)]
    pub care: CareDetails,
}

/// Patient form draft. Holds both variants' fields so switching
/// `patient_type` back and forth keeps what was typed; only the active
/// variant reaches the payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientForm {
    pub name: String,
    pub date_of_birth: String,
    pub contact_info: String,
    pub patient_type: PatientType,
    pub assigned_doctor_id: String,
    pub assigned_department_id: String,
    pub room_number: String,
    pub admission_date: String,
    pub discharge_date: String,
    pub last_visit_date: String,
}

impl PatientForm {
    /// Build the payload, defaulting the admission or last-visit date to `today`
    pub fn to_payload_on(&self, today: NaiveDate) -> Result<PatientPayload, ValidationError> {
        let care = match self.patient_type {
            PatientType::Inpatient => CareDetails::Inpatient {
                room_number: optional_text(&self.room_number),
                admission_date: optional_date("Admission date", &self.admission_date)?
                    .unwrap_or(today),
                discharge_date: optional_date("Discharge date", &self.discharge_date)?,
            },
            PatientType::Outpatient => CareDetails::Outpatient {
                last_visit_date: optional_date("Last visit date", &self.last_visit_date)?
                    .unwrap_or(today),
            },
        };

        Ok(PatientPayload {
            name: required_text("Name", &self.name)?,
            date_of_birth: required_date("Date of birth", &self.date_of_birth)?,
            contact_info: optional_text(&self.contact_info),
            assigned_doctor_id: optional_id("Assigned doctor", &self.assigned_doctor_id)?,
            assigned_department_id: optional_id(
                "Assigned department",
                &self.assigned_department_id,
            )?,
            care,
        })
    }
}

impl Resource for Patient {
    type Form = PatientForm;

    const COLLECTION: &'static str = "patients";
    const LABEL: &'static str = "Patient";

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FormDraft for PatientForm {
    type Record = Patient;
    type Payload = PatientPayload;

    fn from_record(record: &Patient) -> Self {
        let mut form = Self {
            name: record.name.clone(),
            date_of_birth: date_or_blank(Some(record.date_of_birth)),
            contact_info: text_or_blank(record.contact_info.as_deref()),
            patient_type: record.patient_type,
            assigned_doctor_id: id_or_blank(record.assigned_doctor_id),
            assigned_department_id: id_or_blank(record.assigned_department_id),
            ..Self::default()
        };

        match record.patient_type {
            PatientType::Inpatient => {
                form.room_number = text_or_blank(record.room_number.as_deref());
                form.admission_date = date_or_blank(record.admission_date);
                form.discharge_date = date_or_blank(record.discharge_date);
            }
            PatientType::Outpatient => {
                form.last_visit_date = date_or_blank(record.last_visit_date);
            }
        }
        form
    }

    fn to_payload(&self) -> Result<PatientPayload, ValidationError> {
        self.to_payload_on(Local::now().date_naive())
    }

    fn display_name(&self) -> &str {
        self.name.trim()
    }
}
