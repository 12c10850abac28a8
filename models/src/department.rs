use serde::{Deserialize, Serialize};

use crate::form::{id_or_blank, optional_id, optional_text, required_text, text_or_blank};
use crate::{FormDraft, RecordId, Resource, ValidationError};

/// Department as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: RecordId,
    pub name: String,
    pub specialty: Option<String>,
    pub head_doctor_id: Option<RecordId>,

    // Computed by the server
    pub head_doctor_name: Option<String>,
    #[serde(default)]
    pub num_doctors_in_dept: u32,
    #[serde(default)]
    pub num_patients_assigned: u32,
}

/// Body for creating or updating a department
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentPayload {
    pub name: String,
    pub specialty: Option<String>,
    pub head_doctor_id: Option<RecordId>,
}

/// Department form draft
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepartmentForm {
    pub name: String,
    pub specialty: String,
    pub head_doctor_id: String,
}

impl Resource for Department {
    type Form = DepartmentForm;

    const COLLECTION: &'static str = "departments";
    const LABEL: &'static str = "Department";

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FormDraft for DepartmentForm {
    type Record = Department;
    type Payload = DepartmentPayload;

    fn from_record(record: &Department) -> Self {
        Self {
            name: record.name.clone(),
            specialty: text_or_blank(record.specialty.as_deref()),
            head_doctor_id: id_or_blank(record.head_doctor_id),
        }
    }

    fn to_payload(&self) -> Result<DepartmentPayload, ValidationError> {
        Ok(DepartmentPayload {
            name: required_text("Name", &self.name)?,
            specialty: optional_text(&self.specialty),
            head_doctor_id: optional_id("Head doctor", &self.head_doctor_id)?,
        })
    }

    fn display_name(&self) -> &str {
        self.name.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_department_deserialization() {
        let body = json!({
            "id": 1,
            "name": "Cardiology",
            "specialty": "Heart",
            "head_doctor_id": null,
            "head_doctor_name": null,
            "num_doctors_in_dept": 3,
            "num_patients_assigned": 12
        });

        let department: Department = serde_json::from_value(body).unwrap();
        assert_eq!(department.id, 1);
        assert_eq!(department.specialty.as_deref(), Some("Heart"));
        assert_eq!(department.head_doctor_id, None);
        assert_eq!(department.num_doctors_in_dept, 3);
        assert_eq!(department.num_patients_assigned, 12);
    }

    #[test]
    fn test_department_tolerates_missing_counts() {
        let department: Department =
            serde_json::from_value(json!({"id": 2, "name": "Oncology"})).unwrap();
        assert_eq!(department.num_doctors_in_dept, 0);
        assert!(department.head_doctor_name.is_none());
    }

    #[test]
    fn test_payload_sends_nulls_not_blanks() {
        let form = DepartmentForm {
            name: "Cardiology".to_string(),
            specialty: "Heart".to_string(),
            head_doctor_id: String::new(),
        };

        let body = serde_json::to_value(form.to_payload().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"name": "Cardiology", "specialty": "Heart", "head_doctor_id": null})
        );
    }

    #[test]
    fn test_form_from_record_blanks_nulls() {
        let department = Department {
            id: 5,
            name: "Radiology".to_string(),
            specialty: None,
            head_doctor_id: Some(9),
            head_doctor_name: Some("Dr. House".to_string()),
            num_doctors_in_dept: 0,
            num_patients_assigned: 0,
        };

        let form = DepartmentForm::from_record(&department);
        assert_eq!(form.name, "Radiology");
        assert_eq!(form.specialty, "");
        assert_eq!(form.head_doctor_id, "9");
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let form = DepartmentForm::default();
        assert_eq!(
            form.to_payload(),
            Err(ValidationError::MissingField { field: "Name" })
        );
    }
}
