use std::time::Instant;

use contact_intake_core::contract::{
    normalize_submission, submission_fingerprint, ContactSubmission, INTAKE_SCHEMA_VERSION,
};
use contact_intake_core::email::{build_outbound_email, DeliveryConfig};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::mailer::Mailer;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntakeReceipt {
    pub status: String,
    pub fingerprint: String,
    pub message: String,
    pub schema_version: String,
}

pub fn handle_intake_event(
    event: Value,
    delivery: Option<&DeliveryConfig>,
    mailer: &dyn Mailer,
) -> ApiGatewayResponse {
    let payload = match normalize_apigw_event(event) {
        Ok(value) => value,
        Err(message) => {
            log_intake_error("submission_rejected", json!({ "reason": message }));
            return validation_error_response(&message);
        }
    };

    let submission = match serde_json::from_value::<ContactSubmission>(payload) {
        Ok(value) => value,
        Err(error) => {
            let message = format!("Malformed submission: {error}");
            log_intake_error("submission_rejected", json!({ "reason": message }));
            return validation_error_response(&message);
        }
    };

    let normalized = match normalize_submission(submission) {
        Ok(value) => value,
        Err(error) => {
            log_intake_error("submission_rejected", json!({ "reason": error.message() }));
            return validation_error_response(error.message());
        }
    };

    let fingerprint = submission_fingerprint(&normalized);
    log_intake_info(
        "submission_received",
        json!({
            "fingerprint": fingerprint,
            "name_chars": normalized.name().chars().count(),
            "message_chars": normalized.message().chars().count(),
        }),
    );

    let Some(delivery) = delivery else {
        return error_response(
            500,
            json!({
                "error": "misconfiguration",
                "message": "CONTACT_SENDER_ADDRESS and CONTACT_RECIPIENT_ADDRESS must be configured",
            }),
        );
    };

    let outbound = build_outbound_email(delivery, &normalized);
    let started_at = Instant::now();
    if let Err(error) = mailer.send_text_email(&outbound) {
        log_intake_error(
            "email_send_failed",
            json!({
                "fingerprint": fingerprint,
                "duration_ms": started_at.elapsed().as_millis(),
                "error": error,
            }),
        );
        return error_response(
            502,
            json!({
                "error": "send_failed",
                "message": error,
                "fingerprint": fingerprint,
            }),
        );
    }

    log_intake_info(
        "email_sent",
        json!({
            "fingerprint": fingerprint,
            "duration_ms": started_at.elapsed().as_millis(),
        }),
    );

    let receipt = IntakeReceipt {
        status: "sent".to_string(),
        fingerprint,
        message: "Email sent successfully".to_string(),
        schema_version: INTAKE_SCHEMA_VERSION.to_string(),
    };
    success_response(200, receipt)
}

fn normalize_apigw_event(event: Value) -> Result<Value, String> {
    let Some(object) = event.as_object() else {
        return Err("Submission payload must be a JSON object".to_string());
    };

    let Some(body) = object.get("body") else {
        return Ok(event);
    };

    match body {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) => {
            serde_json::from_str(text).map_err(|error| format!("Malformed JSON body: {error}"))
        }
        _ => Err("Submission body must be a JSON object".to_string()),
    }
}

fn validation_error_response(message: &str) -> ApiGatewayResponse {
    error_response(
        400,
        json!({
            "error": "validation_error",
            "message": message,
        }),
    )
}

fn success_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: serde_json::to_string(&payload).expect("response payload should serialize"),
    }
}

fn error_response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: payload.to_string(),
    }
}

// Submission contents are PII and never reach the logs; only fingerprints
// and field lengths do.
fn log_intake_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "intake_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_intake_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "intake_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
