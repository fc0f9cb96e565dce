//! Core library for contact record cleansing.
//!
//! - Request/response wire types
//! - Name, email and phone normalizers
//! - Collaborator traits for email syntax checking and phone parsing
//! - [`Cleanser`], which combines them for one record

pub mod cleanse;
pub mod email;
pub mod error;
pub mod model;
pub mod name;
pub mod phone;
pub mod str_ext;

pub use cleanse::{Cleanser, DEFAULT_COUNTRY};
pub use email::{EmailSyntaxChecker, LibEmailChecker};
pub use error::{CleanseError, CleanseResult};
pub use model::{API_VERSION, CleanseRequest, CleanseResponse, CleansedRecord, ErrorEnvelope};
pub use phone::{LibPhoneNormalizer, ParsedPhone, PhoneNormalizer, parse_region};
pub use str_ext::{OptionStrExt, StrExt};
