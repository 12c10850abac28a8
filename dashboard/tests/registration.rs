mod common;

use common::{MockBackend, PATIENTS, REGISTER};
use hospital_dashboard::{Banner, RegistrationOutcome, RegistrationViewModel};
use hospital_models::{PatientType, RegistrationForm};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn jane() -> RegistrationForm {
    RegistrationForm {
        name: "Jane Doe".to_string(),
        date_of_birth: "1990-01-01".to_string(),
        contact_info: "555-1234".to_string(),
    }
}

#[tokio::test]
async fn test_registration_welcomes_new_outpatient() {
    let backend = MockBackend::start().await;
    let screen = RegistrationViewModel::new(backend.client());

    let outcome = assert_ok!(screen.submit(jane()).await);

    let RegistrationOutcome::Registered(registered) = outcome else {
        panic!("expected a registration");
    };
    assert_eq!(registered.name, "Jane Doe");
    assert_eq!(registered.patient_type, PatientType::Outpatient);

    let request = backend.store().last_request().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/patients/register");
    assert_eq!(
        request.body,
        json!({"name": "Jane Doe", "date_of_birth": "1990-01-01", "contact_info": "555-1234"})
    );
    assert_eq!(backend.store().len(PATIENTS), 1);

    let state = screen.snapshot();
    assert_eq!(state.draft, RegistrationForm::default());
    assert_eq!(
        state.banner,
        Some(Banner::Success(format!(
            "Registration successful! Welcome, Jane Doe. Your ID is {}. You are an Outpatient.",
            registered.id.unwrap()
        )))
    );
}

#[tokio::test]
async fn test_missing_contact_sends_nothing() {
    let backend = MockBackend::start().await;
    let screen = RegistrationViewModel::new(backend.client());

    let draft = RegistrationForm {
        contact_info: String::new(),
        ..jane()
    };
    let err = assert_err!(screen.submit(draft.clone()).await);

    assert!(err.is_validation());
    assert!(backend.store().requests.is_empty());
    assert_eq!(screen.draft(), draft);
    assert_eq!(
        screen.banner(),
        Some(Banner::Error("Contact info is required".to_string()))
    );
}

#[tokio::test]
async fn test_server_failure_keeps_the_form() {
    let backend = MockBackend::start().await;
    backend.store().failing.insert(REGISTER);
    let screen = RegistrationViewModel::new(backend.client());

    let err = assert_err!(screen.submit(jane()).await);

    assert!(!err.is_validation());
    let state = screen.snapshot();
    assert_eq!(state.draft, jane());
    assert_eq!(
        state.banner,
        Some(Banner::Error(
            "Registration failed: database unavailable".to_string()
        ))
    );
    assert!(!state.busy);
    assert_eq!(backend.store().len(PATIENTS), 0);

    backend.store().failing.remove(REGISTER);
    assert_ok!(screen.submit(jane()).await);
    assert_eq!(backend.store().len(PATIENTS), 1);
}

#[tokio::test]
async fn test_id_only_echo_uses_submitted_name() {
    let backend = MockBackend::start().await;
    backend.store().id_only.insert(REGISTER);
    let screen = RegistrationViewModel::new(backend.client());

    let outcome = assert_ok!(screen.submit(jane()).await);

    let RegistrationOutcome::Registered(registered) = outcome else {
        panic!("expected a registration");
    };
    assert_eq!(registered.id, Some(1));
    assert_eq!(registered.name, "Jane Doe");
    assert_eq!(screen.draft(), RegistrationForm::default());
    assert_eq!(
        screen.banner(),
        Some(Banner::Success(
            "Registration successful! Welcome, Jane Doe. Your ID is 1. You are an Outpatient."
                .to_string()
        ))
    );
}

#[tokio::test]
async fn test_second_registration_while_busy_is_ignored() {
    let backend = MockBackend::start().await;
    let screen = RegistrationViewModel::new(backend.client());

    let (first, second) = tokio::join!(screen.submit(jane()), screen.submit(jane()));

    assert!(matches!(
        assert_ok!(first),
        RegistrationOutcome::Registered(_)
    ));
    assert_eq!(assert_ok!(second), RegistrationOutcome::Ignored);
    assert_eq!(backend.store().requests_with("POST").len(), 1);
    assert_eq!(backend.store().len(PATIENTS), 1);
}
