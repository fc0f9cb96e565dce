//! Wire types for `POST /api/v1/cleanse`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CleanseError, CleanseResult};

/// API version reported in every success envelope.
pub const API_VERSION: &str = "1.0.0";

/// Fixed message of the failure envelope.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Incoming contact record. Every field is optional; `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanseRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
}

impl CleanseRequest {
    /// Decode a request body. An empty (or all-whitespace) body is an empty record.
    ///
    /// # Errors
    /// Returns [`CleanseError::MalformedPayload`] if the body is not a JSON object
    /// of optional strings.
    pub fn from_slice(body: &[u8]) -> CleanseResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| CleanseError::from_json(&e))
    }
}

/// Success envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanseResponse {
    pub success: bool,
    pub meta: Meta,
    pub data: CleansedRecord,
}

impl CleanseResponse {
    /// Wrap a cleansed record, stamping the elapsed processing time.
    #[must_use]
    pub fn success(data: CleansedRecord, elapsed: Duration) -> Self {
        Self {
            success: true,
            meta: Meta {
                processing_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                version: API_VERSION,
            },
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meta {
    pub processing_ms: u64,
    pub version: &'static str,
}

/// Normalized record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleansedRecord {
    pub identity: Identity,
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub email: Option<String>,
    pub is_email_valid: bool,
    pub phone_international: Option<String>,
    pub is_phone_valid: bool,
    pub country_detected: String,
}

/// Failure envelope. Carries no detail about the cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: &'static str,
}

impl ErrorEnvelope {
    #[must_use]
    pub const fn internal() -> Self {
        Self {
            success: false,
            message: INTERNAL_ERROR_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_accepts_camel_case_and_nulls() {
        let req = CleanseRequest::from_slice(
            br#"{"firstName":"ann","lastName":null,"email":"a@b.co","extra":1}"#,
        )
        .unwrap();
        assert_eq!(req.first_name.as_deref(), Some("ann"));
        assert_eq!(req.last_name, None);
        assert_eq!(req.email.as_deref(), Some("a@b.co"));
        assert_eq!(req.country, None);
    }

    #[test]
    fn empty_body_is_empty_record() {
        assert_eq!(CleanseRequest::from_slice(b"").unwrap(), CleanseRequest::default());
        assert_eq!(CleanseRequest::from_slice(b" \n").unwrap(), CleanseRequest::default());
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(CleanseRequest::from_slice(br#"{"firstName":42}"#).is_err());
        assert!(CleanseRequest::from_slice(br#"["not","an","object"]"#).is_err());
        assert!(CleanseRequest::from_slice(b"{oops").is_err());
    }

    #[test]
    fn success_envelope_shape() {
        let record = CleansedRecord {
            identity: Identity {
                first_name: "Ann".into(),
                last_name: String::new(),
                full_name: "Ann".into(),
            },
            contact: Contact {
                email: None,
                is_email_valid: false,
                phone_international: Some("abc".into()),
                is_phone_valid: false,
                country_detected: "US".into(),
            },
        };
        let value = serde_json::to_value(CleanseResponse::success(
            record,
            Duration::from_millis(3),
        ))
        .unwrap();

        assert_eq!(
            value,
            json!({
                "success": true,
                "meta": { "processing_ms": 3, "version": "1.0.0" },
                "data": {
                    "identity": { "firstName": "Ann", "lastName": "", "fullName": "Ann" },
                    "contact": {
                        "email": null,
                        "isEmailValid": false,
                        "phoneInternational": "abc",
                        "isPhoneValid": false,
                        "countryDetected": "US"
                    }
                }
            })
        );
    }

    #[test]
    fn error_envelope_shape() {
        let value = serde_json::to_value(ErrorEnvelope::internal()).unwrap();
        assert_eq!(
            value,
            json!({ "success": false, "message": "Internal Server Error" })
        );
    }
}
