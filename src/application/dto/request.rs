//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::Deserialize;
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::domain::{parse_timestamp, VisitorEvent};
use crate::shared::error::FieldError;
use crate::shared::validation::field_errors;

/// Visitor event as posted by a client application.
///
/// Every field is optional at the parsing stage so that a missing field is
/// reported as a validation error instead of a body rejection.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct IngestEventRequest {
    #[serde(rename = "type")]
    #[validate(
        required(message = "is required"),
        custom(function = "not_blank", message = "must not be empty")
    )]
    pub event_type: Option<String>,

    #[validate(
        required(message = "is required"),
        custom(function = "not_blank", message = "must not be empty")
    )]
    pub page: Option<String>,

    #[serde(rename = "sessionId")]
    #[validate(
        required(message = "is required"),
        custom(function = "not_blank", message = "must not be empty")
    )]
    pub session_id: Option<String>,

    #[validate(
        required(message = "is required"),
        custom(function = "not_blank", message = "must not be empty")
    )]
    pub timestamp: Option<String>,

    #[validate(
        required(message = "is required"),
        custom(function = "not_blank", message = "must not be empty")
    )]
    pub country: Option<String>,

    /// Anything else the client sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IngestEventRequest {
    /// Validate the request and turn it into a domain event.
    pub fn into_event(self) -> Result<VisitorEvent, Vec<FieldError>> {
        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e, wire_name),
        };

        let occurred_at = match self.timestamp.as_deref() {
            Some(raw) if not_blank(raw).is_ok() => {
                let parsed = parse_timestamp(raw);
                if parsed.is_none() {
                    errors.push(FieldError::new(
                        "timestamp",
                        "must be an ISO-8601 timestamp",
                    ));
                }
                parsed
            }
            _ => None,
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        match (
            self.event_type,
            self.page,
            self.session_id,
            self.timestamp,
            self.country,
            occurred_at,
        ) {
            (
                Some(event_type),
                Some(page),
                Some(session_id),
                Some(timestamp),
                Some(country),
                Some(occurred_at),
            ) => Ok(VisitorEvent {
                event_type,
                page,
                session_id,
                timestamp,
                country,
                occurred_at,
                extra: self.extra,
            }),
            _ => Err(vec![FieldError::new("event", "Missing required fields")]),
        }
    }
}

/// Empty and whitespace-only values carry no information.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn wire_name(field: &str) -> &str {
    match field {
        "event_type" => "type",
        "session_id" => "sessionId",
        other => other,
    }
}
