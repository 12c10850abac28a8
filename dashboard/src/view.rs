//! Plain-text rendering of each screen.

use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;
use hospital_models::{Department, Doctor, Patient, PatientType, RecordId, Resource};

use crate::router::{ReferenceData, Screen};
use crate::screens::{Banner, EditMode, RegistrationState, ScreenState};

const NOT_SET: &str = "-- None --";

/// Dropdown label for a doctor
pub fn doctor_option(doctor: &Doctor) -> String {
    format!(
        "{} ({})",
        doctor.name,
        doctor.specialization.as_deref().unwrap_or("N/A")
    )
}

/// Dropdown label for a department
pub fn department_option(department: &Department) -> String {
    format!(
        "{} ({})",
        department.name,
        department.specialty.as_deref().unwrap_or("General")
    )
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

fn date_or(value: Option<NaiveDate>, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_string(), |date| date.to_string())
}

fn write_header(f: &mut Formatter<'_>, screen: Screen) -> fmt::Result {
    writeln!(f, "=== {screen} ===")
}

fn write_banner(f: &mut Formatter<'_>, banner: Option<&Banner>, busy: bool) -> fmt::Result {
    match banner {
        Some(Banner::Error(message)) => writeln!(f, "Error! {message}")?,
        Some(Banner::Success(message)) => writeln!(f, "Success! {message}")?,
        None => {}
    }
    if busy {
        writeln!(f, "(request in progress)")?;
    }
    Ok(())
}

fn write_field(f: &mut Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    writeln!(f, "  {label}: {value}")
}

/// Label of the option a draft id selects
fn selected<'a, T: 'a>(
    raw: &str,
    lookup: impl Fn(RecordId) -> Option<&'a T>,
    label: impl Fn(&T) -> String,
) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return NOT_SET.to_string();
    }
    raw.parse::<RecordId>()
        .ok()
        .and_then(lookup)
        .map_or_else(|| raw.to_string(), label)
}

fn write_options<T: Resource>(
    f: &mut Formatter<'_>,
    label: &str,
    options: &[T],
    display: impl Fn(&T) -> String,
) -> fmt::Result {
    if options.is_empty() {
        return writeln!(f, "  {label} options: none available");
    }
    write!(f, "  {label} options:")?;
    for option in options {
        write!(f, " [{}] {}", option.id(), display(option))?;
    }
    writeln!(f)
}

/// Form heading, or `None` when no form is open
fn form_title<R: Resource>(mode: EditMode) -> Option<String> {
    match mode {
        EditMode::None => None,
        EditMode::Creating => Some(format!("Add New {}", R::LABEL)),
        EditMode::Editing(id) => Some(format!("Edit {} #{id}", R::LABEL)),
    }
}

fn write_list<R: Resource>(
    f: &mut Formatter<'_>,
    state: &ScreenState<R>,
    row: impl Fn(&mut Formatter<'_>, &R) -> fmt::Result,
) -> fmt::Result {
    writeln!(f, "--- {} ({}) ---", R::COLLECTION, state.records.len())?;
    if state.records.is_empty() {
        return if state.is_loading() {
            writeln!(f, "Loading {}...", R::COLLECTION)
        } else {
            writeln!(f, "No {} found.", R::COLLECTION)
        };
    }
    for record in &state.records {
        row(f, record)?;
    }
    Ok(())
}

pub struct DepartmentScreen<'a> {
    state: &'a ScreenState<Department>,
    reference: &'a ReferenceData,
}

impl<'a> DepartmentScreen<'a> {
    pub fn new(state: &'a ScreenState<Department>, reference: &'a ReferenceData) -> Self {
        Self { state, reference }
    }
}

impl Display for DepartmentScreen<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_header(f, Screen::Departments)?;
        write_banner(f, self.state.banner.as_ref(), self.state.busy)?;

        if let Some(title) = form_title::<Department>(self.state.mode) {
            let draft = &self.state.draft;
            writeln!(f, "--- {title} ---")?;
            write_field(f, "Name", &draft.name)?;
            write_field(f, "Specialty", &draft.specialty)?;
            let head = selected(
                &draft.head_doctor_id,
                |id| self.reference.doctor(id),
                doctor_option,
            );
            write_field(f, "Head doctor", &head)?;
            write_options(f, "Head doctor", &self.reference.doctors, doctor_option)?;
        }

        write_list(f, self.state, |f, department| {
            writeln!(
                f,
                "ID: {} - {} | Specialty: {} | Head: {} | Doctors: {} | Patients Assigned: {}",
                department.id,
                department.name,
                or_na(department.specialty.as_deref()),
                department.head_doctor_name.as_deref().unwrap_or("Unassigned"),
                department.num_doctors_in_dept,
                department.num_patients_assigned,
            )
        })
    }
}

pub struct DoctorScreen<'a> {
    state: &'a ScreenState<Doctor>,
    reference: &'a ReferenceData,
}

impl<'a> DoctorScreen<'a> {
    pub fn new(state: &'a ScreenState<Doctor>, reference: &'a ReferenceData) -> Self {
        Self { state, reference }
    }
}

impl Display for DoctorScreen<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_header(f, Screen::Doctors)?;
        write_banner(f, self.state.banner.as_ref(), self.state.busy)?;

        if let Some(title) = form_title::<Doctor>(self.state.mode) {
            let draft = &self.state.draft;
            writeln!(f, "--- {title} ---")?;
            write_field(f, "Name", &draft.name)?;
            write_field(f, "Specialization", &draft.specialization)?;
            let department = selected(
                &draft.department_id,
                |id| self.reference.department(id),
                department_option,
            );
            write_field(f, "Department", &department)?;
            write_options(f, "Department", &self.reference.departments, department_option)?;
        }

        write_list(f, self.state, |f, doctor| {
            writeln!(
                f,
                "ID: {} - {} | Specialization: {} | Department: {} | Heads: {} Depts | Assigned Patients: {}",
                doctor.id,
                doctor.name,
                or_na(doctor.specialization.as_deref()),
                doctor.department_name.as_deref().unwrap_or("Unassigned"),
                doctor.departments_headed_count,
                doctor.patients_assigned_count,
            )
        })
    }
}

pub struct PatientScreen<'a> {
    state: &'a ScreenState<Patient>,
    reference: &'a ReferenceData,
}

impl<'a> PatientScreen<'a> {
    pub fn new(state: &'a ScreenState<Patient>, reference: &'a ReferenceData) -> Self {
        Self { state, reference }
    }
}

impl Display for PatientScreen<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_header(f, Screen::Patients)?;
        write_banner(f, self.state.banner.as_ref(), self.state.busy)?;

        if let Some(title) = form_title::<Patient>(self.state.mode) {
            let draft = &self.state.draft;
            writeln!(f, "--- {title} ---")?;
            write_field(f, "Name", &draft.name)?;
            write_field(f, "Date of birth", &draft.date_of_birth)?;
            write_field(f, "Contact info", &draft.contact_info)?;
            write_field(f, "Patient type", &draft.patient_type.to_string())?;
            match draft.patient_type {
                PatientType::Inpatient => {
                    write_field(f, "Room number", &draft.room_number)?;
                    write_field(f, "Admission date", &draft.admission_date)?;
                    write_field(f, "Discharge date", &draft.discharge_date)?;
                }
                PatientType::Outpatient => {
                    write_field(f, "Last visit date", &draft.last_visit_date)?;
                }
            }
            let doctor = selected(
                &draft.assigned_doctor_id,
                |id| self.reference.doctor(id),
                doctor_option,
            );
            write_field(f, "Assigned doctor", &doctor)?;
            let department = selected(
                &draft.assigned_department_id,
                |id| self.reference.department(id),
                |department: &Department| department.name.clone(),
            );
            write_field(f, "Assigned department", &department)?;
            write_options(f, "Doctor", &self.reference.doctors, doctor_option)?;
            write_options(f, "Department", &self.reference.departments, |department| {
                department.name.clone()
            })?;
        }

        write_list(f, self.state, |f, patient| {
            write!(
                f,
                "ID: {} - {} | DOB: {} | Type: {} | Contact: {} | Doctor: {} | Department: {}",
                patient.id,
                patient.name,
                patient.date_of_birth,
                patient.patient_type,
                or_na(patient.contact_info.as_deref()),
                patient.assigned_doctor_name.as_deref().unwrap_or("Unassigned"),
                patient.assigned_department_name.as_deref().unwrap_or("Unassigned"),
            )?;
            match patient.patient_type {
                PatientType::Inpatient => writeln!(
                    f,
                    " | Room: {} | Admitted: {} | Discharged: {}",
                    or_na(patient.room_number.as_deref()),
                    date_or(patient.admission_date, "N/A"),
                    date_or(patient.discharge_date, "Not yet"),
                ),
                PatientType::Outpatient => writeln!(
                    f,
                    " | Last Visit: {}",
                    date_or(patient.last_visit_date, "N/A")
                ),
            }
        })
    }
}

pub struct RegistrationScreen<'a> {
    state: &'a RegistrationState,
}

impl<'a> RegistrationScreen<'a> {
    pub fn new(state: &'a RegistrationState) -> Self {
        Self { state }
    }
}

impl Display for RegistrationScreen<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_header(f, Screen::SelfRegistration)?;
        write_banner(f, self.state.banner.as_ref(), self.state.busy)?;
        writeln!(f, "--- Register as a New Patient ---")?;
        write_field(f, "Full name", &self.state.draft.name)?;
        write_field(f, "Date of birth", &self.state.draft.date_of_birth)?;
        write_field(f, "Contact info", &self.state.draft.contact_info)
    }
}
