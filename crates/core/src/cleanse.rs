//! Record cleansing: applies the name, email and phone normalizers to one request.

use crate::email::{EmailSyntaxChecker, LibEmailChecker, normalize_email};
use crate::model::{CleanseRequest, CleansedRecord, Contact, Identity};
use crate::name::{format_name, full_name};
use crate::phone::{LibPhoneNormalizer, PhoneNormalizer};
use crate::str_ext::{OptionStrExt, StrExt};

/// Region assumed when a request carries no `country`.
pub const DEFAULT_COUNTRY: &str = "US";

/// Stateless record cleanser, shared across requests.
pub struct Cleanser {
    email_checker: Box<dyn EmailSyntaxChecker>,
    phone_normalizer: Box<dyn PhoneNormalizer>,
    default_country: String,
}

impl Default for Cleanser {
    fn default() -> Self {
        Self::new(LibEmailChecker, LibPhoneNormalizer)
    }
}

impl Cleanser {
    /// Create a cleanser over the given collaborators.
    #[must_use]
    pub fn new(
        email_checker: impl EmailSyntaxChecker + 'static,
        phone_normalizer: impl PhoneNormalizer + 'static,
    ) -> Self {
        Self {
            email_checker: Box::new(email_checker),
            phone_normalizer: Box::new(phone_normalizer),
            default_country: DEFAULT_COUNTRY.to_string(),
        }
    }

    /// Override the region used when a request omits `country`.
    #[must_use]
    pub fn with_default_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = country.into();
        self
    }

    /// Cleanse one record. Never fails: invalid fields are reported as flags.
    #[must_use]
    pub fn cleanse(&self, request: &CleanseRequest) -> CleansedRecord {
        let first_name = format_name(request.first_name.as_deref());
        let last_name = format_name(request.last_name.as_deref());
        let full_name = full_name(&first_name, &last_name);

        let email = request.email.non_empty().map(normalize_email);
        let is_email_valid = email
            .as_deref()
            .is_some_and(|e| self.email_checker.is_valid_email_syntax(e));

        let country = request.country.as_str_or_empty().or_str(&self.default_country);
        let parsed = self
            .phone_normalizer
            .parse_phone(request.phone.as_str_or_empty(), country)
            .filter(|p| p.is_valid);

        let contact = match parsed {
            Some(phone) => Contact {
                email,
                is_email_valid,
                phone_international: Some(phone.international_format),
                is_phone_valid: true,
                country_detected: phone.detected_region.unwrap_or_else(|| country.to_string()),
            },
            None => Contact {
                email,
                is_email_valid,
                phone_international: request.phone.clone(),
                is_phone_valid: false,
                country_detected: country.to_string(),
            },
        };

        CleansedRecord {
            identity: Identity {
                first_name,
                last_name,
                full_name,
            },
            contact,
        }
    }
}
