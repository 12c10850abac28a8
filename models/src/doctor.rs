use serde::{Deserialize, Serialize};

use crate::form::{id_or_blank, optional_id, optional_text, required_text, text_or_blank};
use crate::{FormDraft, RecordId, Resource, ValidationError};

/// Doctor as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: RecordId,
    pub name: String,
    pub specialization: Option<String>,
    pub department_id: Option<RecordId>,

    // Computed by the server
    pub department_name: Option<String>,
    #[serde(default)]
    pub departments_headed_count: u32,
    #[serde(default)]
    pub patients_assigned_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorPayload {
    pub name: String,
    pub specialization: Option<String>,
    pub department_id: Option<RecordId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorForm {
    pub name: String,
    pub specialization: String,
    pub department_id: String,
}

impl Resource for Doctor {
    type Form = DoctorForm;

    const COLLECTION: &'static str = "doctors";
    const LABEL: &'static str = "Doctor";

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FormDraft for DoctorForm {
    type Record = Doctor;
    type Payload = DoctorPayload;

    fn from_record(record: &Doctor) -> Self {
        Self {
            name: record.name.clone(),
            specialization: text_or_blank(record.specialization.as_deref()),
            department_id: id_or_blank(record.department_id),
        }
    }

    fn to_payload(&self) -> Result<DoctorPayload, ValidationError> {
        Ok(DoctorPayload {
            name: required_text("Name", &self.name)?,
            specialization: optional_text(&self.specialization),
            department_id: optional_id("Department", &self.department_id)?,
        })
    }

    fn display_name(&self) -> &str {
        self.name.trim()
    }
}
