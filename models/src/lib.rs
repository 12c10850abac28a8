pub mod department;
pub mod doctor;
pub mod error;
pub mod form;
pub mod patient;
pub mod registration;

pub use department::*;
pub use doctor::*;
pub use error::*;
pub use form::*;
pub use patient::*;
pub use registration::*;

/// Server-assigned identifier shared by every record type
pub type RecordId = i64;
