use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hospital_models::{
    DepartmentForm, DoctorForm, PatientForm, PatientType, RecordId, RegistrationForm, Resource,
};

use crate::config::DashboardConfig;
use crate::router::{Dashboard, Screen};
use crate::screens::{Confirmation, EntityViewModel};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "hospital-dashboard")]
#[command(about = "Hospital Dashboard - manage departments, doctors and patients")]
#[command(version)]
pub struct Cli {
    /// Backend base URL [default: $HOSPITAL_API_URL or http://localhost:5000/api]
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Department administration
    Departments {
        #[command(subcommand)]
        action: DepartmentAction,
    },
    /// Doctor administration
    Doctors {
        #[command(subcommand)]
        action: DoctorAction,
    },
    /// Patient administration
    Patients {
        #[command(subcommand)]
        action: PatientAction,
    },
    /// Register yourself as a new outpatient
    Register(RegisterArgs),
}

#[derive(Subcommand, Debug)]
pub enum DepartmentAction {
    /// List all departments
    List,
    /// Add a department
    Add(DepartmentArgs),
    /// Edit a department; omitted fields keep their value, "" clears one
    Edit {
        id: RecordId,
        #[command(flatten)]
        fields: DepartmentArgs,
    },
    /// Delete a department
    Delete {
        id: RecordId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum DoctorAction {
    /// List all doctors
    List,
    /// Add a doctor
    Add(DoctorArgs),
    /// Edit a doctor; omitted fields keep their value, "" clears one
    Edit {
        id: RecordId,
        #[command(flatten)]
        fields: DoctorArgs,
    },
    /// Delete a doctor
    Delete {
        id: RecordId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum PatientAction {
    /// List all patients
    List,
    /// Add a patient
    Add(PatientArgs),
    /// Edit a patient; omitted fields keep their value, "" clears one
    Edit {
        id: RecordId,
        #[command(flatten)]
        fields: PatientArgs,
    },
    /// Delete a patient
    Delete {
        id: RecordId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct DepartmentArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub specialty: Option<String>,
    #[arg(long)]
    pub head_doctor_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub specialization: Option<String>,
    #[arg(long)]
    pub department_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct PatientArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub dob: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long = "type", value_enum)]
    pub patient_type: Option<PatientTypeArg>,
    #[arg(long)]
    pub doctor_id: Option<String>,
    #[arg(long)]
    pub department_id: Option<String>,
    /// Inpatient room number
    #[arg(long)]
    pub room: Option<String>,
    /// Inpatient admission date [default: today]
    #[arg(long)]
    pub admitted: Option<String>,
    /// Inpatient discharge date
    #[arg(long)]
    pub discharged: Option<String>,
    /// Outpatient last visit date [default: today]
    #[arg(long)]
    pub last_visit: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Full name
    #[arg(long)]
    pub name: String,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub dob: String,
    /// Phone or email
    #[arg(long)]
    pub contact: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum PatientTypeArg {
    Inpatient,
    Outpatient,
}

impl From<PatientTypeArg> for PatientType {
    fn from(arg: PatientTypeArg) -> Self {
        match arg {
            PatientTypeArg::Inpatient => Self::Inpatient,
            PatientTypeArg::Outpatient => Self::Outpatient,
        }
    }
}

impl Cli {
    /// Environment configuration with command-line overrides
    pub fn config(&self) -> Result<DashboardConfig<'static>> {
        let mut config = DashboardConfig::from_env().map_err(|err| anyhow!(err))?;
        if let Some(url) = &self.api_url {
            config.api_base_url = Cow::Owned(url.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config.into_owned())
    }
}

// ============================================================================
// Form overrides
// ============================================================================

/// Command-line fields applied on top of a draft
pub trait FormArgs {
    type Form;

    fn apply(self, form: &mut Self::Form);
}

fn set(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl FormArgs for DepartmentArgs {
    type Form = DepartmentForm;

    fn apply(self, form: &mut DepartmentForm) {
        set(&mut form.name, self.name);
        set(&mut form.specialty, self.specialty);
        set(&mut form.head_doctor_id, self.head_doctor_id);
    }
}

impl FormArgs for DoctorArgs {
    type Form = DoctorForm;

    fn apply(self, form: &mut DoctorForm) {
        set(&mut form.name, self.name);
        set(&mut form.specialization, self.specialization);
        set(&mut form.department_id, self.department_id);
    }
}

impl FormArgs for PatientArgs {
    type Form = PatientForm;

    fn apply(self, form: &mut PatientForm) {
        set(&mut form.name, self.name);
        set(&mut form.date_of_birth, self.dob);
        set(&mut form.contact_info, self.contact);
        if let Some(patient_type) = self.patient_type {
            form.patient_type = patient_type.into();
        }
        set(&mut form.assigned_doctor_id, self.doctor_id);
        set(&mut form.assigned_department_id, self.department_id);
        set(&mut form.room_number, self.room);
        set(&mut form.admission_date, self.admitted);
        set(&mut form.discharge_date, self.discharged);
        set(&mut form.last_visit_date, self.last_visit);
    }
}

// ============================================================================
// Execution
// ============================================================================

/// Reads a y/N answer from stdin
pub struct PromptConfirmation;

impl Confirmation for PromptConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Screen-independent form of a management subcommand
enum Operation<A> {
    List,
    Add(A),
    Edit(RecordId, A),
    Delete(RecordId, bool),
}

impl From<DepartmentAction> for Operation<DepartmentArgs> {
    fn from(action: DepartmentAction) -> Self {
        match action {
            DepartmentAction::List => Self::List,
            DepartmentAction::Add(args) => Self::Add(args),
            DepartmentAction::Edit { id, fields } => Self::Edit(id, fields),
            DepartmentAction::Delete { id, yes } => Self::Delete(id, yes),
        }
    }
}

impl From<DoctorAction> for Operation<DoctorArgs> {
    fn from(action: DoctorAction) -> Self {
        match action {
            DoctorAction::List => Self::List,
            DoctorAction::Add(args) => Self::Add(args),
            DoctorAction::Edit { id, fields } => Self::Edit(id, fields),
            DoctorAction::Delete { id, yes } => Self::Delete(id, yes),
        }
    }
}

impl From<PatientAction> for Operation<PatientArgs> {
    fn from(action: PatientAction) -> Self {
        match action {
            PatientAction::List => Self::List,
            PatientAction::Add(args) => Self::Add(args),
            PatientAction::Edit { id, fields } => Self::Edit(id, fields),
            PatientAction::Delete { id, yes } => Self::Delete(id, yes),
        }
    }
}

/// Run one command against the dashboard and print the resulting screen.
///
/// Returns `false` when the screen ends with an error banner.
pub async fn run(dashboard: &mut Dashboard, command: Command) -> Result<bool> {
    dashboard.load_reference().await;

    match command {
        Command::Departments { action } => {
            let screen = dashboard.departments().clone();
            execute(dashboard, Screen::Departments, &screen, action.into()).await;
        }
        Command::Doctors { action } => {
            let screen = dashboard.doctors().clone();
            execute(dashboard, Screen::Doctors, &screen, action.into()).await;
        }
        Command::Patients { action } => {
            let screen = dashboard.patients().clone();
            execute(dashboard, Screen::Patients, &screen, action.into()).await;
        }
        Command::Register(args) => {
            dashboard.activate(Screen::SelfRegistration).await?;
            let form = RegistrationForm {
                name: args.name,
                date_of_birth: args.dob,
                contact_info: args.contact,
            };
            if let Err(err) = dashboard.registration().submit(form).await {
                tracing::debug!(error = %err, "registration rejected");
            }
        }
    }

    print!("{}", dashboard.render());
    Ok(!dashboard.has_error())
}

async fn execute<R, A>(
    dashboard: &mut Dashboard,
    screen: Screen,
    view_model: &EntityViewModel<R>,
    operation: Operation<A>,
) where
    R: Resource,
    A: FormArgs<Form = R::Form>,
{
    // Load failures stay on the screen's banner
    if let Err(err) = dashboard.activate(screen).await {
        tracing::debug!(%screen, error = %err, "initial load failed");
    }

    let result = match operation {
        Operation::List => return,
        Operation::Add(args) => {
            view_model.begin_create();
            let mut draft = view_model.draft();
            args.apply(&mut draft);
            view_model.submit(draft).await.map(drop)
        }
        Operation::Edit(id, args) => {
            // A failed load leaves its own banner, which takes precedence
            let Some(record) = view_model.find(id) else {
                view_model.show_error(format!("{} {id} not found", R::LABEL));
                return;
            };
            view_model.begin_edit(&record);
            let mut draft = view_model.draft();
            args.apply(&mut draft);
            view_model.submit(draft).await.map(drop)
        }
        Operation::Delete(id, yes) => {
            let result = if yes {
                view_model.remove(id, &|_: &str| true).await
            } else {
                view_model.remove(id, &PromptConfirmation).await
            };
            result.map(drop)
        }
    };

    if let Err(err) = result {
        tracing::debug!(%screen, error = %err, "operation failed");
    }
}
