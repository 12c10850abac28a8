use std::sync::{Arc, Mutex, MutexGuard};

use hospital_models::{Registration, RegistrationForm};
use serde_json::Value;

use super::{lock, Banner, BusyFlag};
use crate::api::ApiClient;
use crate::error::DashboardError;

pub const REGISTER_PATH: &str = "patients/register";

#[derive(Debug, Clone, Default)]
pub struct RegistrationState {
    pub draft: RegistrationForm,
    pub banner: Option<Banner>,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    Registered(Registration),
    Ignored,
}

/// Patient self-service: a single create form with no list
#[derive(Debug, Clone)]
pub struct RegistrationViewModel {
    api: ApiClient,
    state: Arc<Mutex<RegistrationState>>,
    busy: BusyFlag,
}

impl RegistrationViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(RegistrationState::default())),
            busy: BusyFlag::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, RegistrationState> {
        lock(&self.state)
    }

    pub fn snapshot(&self) -> RegistrationState {
        let mut snapshot = self.state().clone();
        snapshot.busy = self.busy.is_set();
        snapshot
    }

    pub fn banner(&self) -> Option<Banner> {
        self.state().banner.clone()
    }

    pub fn draft(&self) -> RegistrationForm {
        self.state().draft.clone()
    }

    /// Register the patient; the form is cleared only on success
    pub async fn submit(
        &self,
        draft: RegistrationForm,
    ) -> Result<RegistrationOutcome, DashboardError> {
        let Some(_busy) = self.busy.try_acquire() else {
            tracing::debug!("registration ignored, request in flight");
            return Ok(RegistrationOutcome::Ignored);
        };

        {
            let mut state = self.state();
            state.draft = draft.clone();
            state.banner = None;
        }

        let payload = match draft.to_payload() {
            Ok(payload) => payload,
            Err(err) => {
                self.state().banner = Some(Banner::Error(err.to_string()));
                return Err(err.into());
            }
        };

        let result = self.api.post::<_, Value>(REGISTER_PATH, &payload).await;
        match result {
            Ok(echo) => {
                let registered = receipt(echo, payload.name);
                tracing::info!(id = ?registered.id, "patient registered");
                let mut state = self.state();
                state.draft = RegistrationForm::default();
                state.banner = Some(Banner::Success(welcome(&registered)));
                Ok(RegistrationOutcome::Registered(registered))
            }
            Err(err) => {
                tracing::warn!(error = %err, "registration failed");
                self.state().banner = Some(Banner::Error(format!("Registration failed: {err}")));
                Err(err.into())
            }
        }
    }
}

/// Read the registration echo; a 2xx counts as registered whatever its body
fn receipt(echo: Value, submitted_name: String) -> Registration {
    let mut registered = serde_json::from_value::<Registration>(echo).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "unreadable registration response");
        Registration::default()
    });
    if registered.name.trim().is_empty() {
        registered.name = submitted_name;
    }
    registered
}

fn welcome(registered: &Registration) -> String {
    match registered.id {
        Some(id) => format!(
            "Registration successful! Welcome, {}. Your ID is {id}. You are an {}.",
            registered.name, registered.patient_type
        ),
        None => format!(
            "Registration successful! Welcome, {}. You are an {}.",
            registered.name, registered.patient_type
        ),
    }
}
