use std::fmt;

use hospital_models::{Department, Doctor, Patient, RecordId, Resource};

use crate::api::{ApiClient, ApiError};
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::screens::{EntityViewModel, RegistrationViewModel};
use crate::view;

/// Top-level screens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Departments,
    Doctors,
    Patients,
    SelfRegistration,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Departments => f.write_str("Department Management"),
            Self::Doctors => f.write_str("Doctor Management"),
            Self::Patients => f.write_str("Patient Management"),
            Self::SelfRegistration => f.write_str("Patient Self-Registration"),
        }
    }
}

/// Doctor and department lists for selection controls.
///
/// Loaded once by the router and handed to screens read-only.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub doctors: Vec<Doctor>,
    pub departments: Vec<Department>,
}

impl ReferenceData {
    pub fn doctor(&self, id: RecordId) -> Option<&Doctor> {
        self.doctors.iter().find(|doctor| doctor.id == id)
    }

    pub fn department(&self, id: RecordId) -> Option<&Department> {
        self.departments.iter().find(|department| department.id == id)
    }
}

/// Owns the active screen, the reference data and one view-model per screen
#[derive(Debug)]
pub struct Dashboard {
    api: ApiClient,
    active: Screen,
    reference: ReferenceData,
    departments: EntityViewModel<Department>,
    doctors: EntityViewModel<Doctor>,
    patients: EntityViewModel<Patient>,
    registration: RegistrationViewModel,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig<'_>) -> Result<Self, ApiError> {
        Ok(Self::with_client(ApiClient::new(config)?))
    }

    pub fn with_client(api: ApiClient) -> Self {
        Self {
            active: Screen::default(),
            reference: ReferenceData::default(),
            departments: EntityViewModel::new(api.clone()),
            doctors: EntityViewModel::new(api.clone()),
            patients: EntityViewModel::new(api.clone()),
            registration: RegistrationViewModel::new(api.clone()),
            api,
        }
    }

    /// Load reference data, then show `screen`
    pub async fn start(&mut self, screen: Screen) -> Result<(), DashboardError> {
        self.load_reference().await;
        self.activate(screen).await
    }

    /// Fetch doctors and departments concurrently. A failed list is left
    /// empty so the screens stay usable.
    pub async fn load_reference(&mut self) {
        let (doctors, departments) = tokio::join!(
            self.api.get::<Vec<Doctor>>(Doctor::COLLECTION),
            self.api.get::<Vec<Department>>(Department::COLLECTION),
        );

        self.reference.doctors = doctors.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to load doctors, options left empty");
            Vec::new()
        });
        self.reference.departments = departments.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to load departments, options left empty");
            Vec::new()
        });
    }

    /// Switch screens, re-loading the new screen's collection
    pub async fn activate(&mut self, screen: Screen) -> Result<(), DashboardError> {
        tracing::debug!(%screen, "activating screen");
        self.active = screen;
        match screen {
            Screen::Departments => self.departments.load().await.map(drop),
            Screen::Doctors => self.doctors.load().await.map(drop),
            Screen::Patients => self.patients.load().await.map(drop),
            Screen::SelfRegistration => Ok(()),
        }
    }

    pub fn active(&self) -> Screen {
        self.active
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn departments(&self) -> &EntityViewModel<Department> {
        &self.departments
    }

    pub fn doctors(&self) -> &EntityViewModel<Doctor> {
        &self.doctors
    }

    pub fn patients(&self) -> &EntityViewModel<Patient> {
        &self.patients
    }

    pub fn registration(&self) -> &RegistrationViewModel {
        &self.registration
    }

    /// Whether the active screen currently shows an error banner
    pub fn has_error(&self) -> bool {
        let banner = match self.active {
            Screen::Departments => self.departments.banner(),
            Screen::Doctors => self.doctors.banner(),
            Screen::Patients => self.patients.banner(),
            Screen::SelfRegistration => self.registration.banner(),
        };
        banner.is_some_and(|banner| banner.is_error())
    }

    /// Text rendering of the active screen
    pub fn render(&self) -> String {
        match self.active {
            Screen::Departments => {
                view::DepartmentScreen::new(&self.departments.snapshot(), &self.reference).to_string()
            }
            Screen::Doctors => {
                view::DoctorScreen::new(&self.doctors.snapshot(), &self.reference).to_string()
            }
            Screen::Patients => {
                view::PatientScreen::new(&self.patients.snapshot(), &self.reference).to_string()
            }
            Screen::SelfRegistration => {
                view::RegistrationScreen::new(&self.registration.snapshot()).to_string()
            }
        }
    }
}
