#![forbid(unsafe_code)]

pub mod error;
pub mod seq;
pub mod tutor_service;

pub use error::TutorError;
pub use seq::{RequestSequencer, RequestTicket};
pub use tutor_service::{ChatContext, Identification, TutorConfig, TutorService};
