use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const INTAKE_SCHEMA_VERSION: &str = "v1";
pub const MAX_NAME_CHARS: usize = 256;
pub const MAX_EMAIL_CHARS: usize = 320;
pub const MAX_MESSAGE_CHARS: usize = 10_000;

// The name is interpolated into an outbound email, so anything that could
// smuggle a header or markup is rejected outright.
const FORBIDDEN_NAME_CHARS: [char; 9] = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];

/// Inbound contact-form record, as posted by the website.
///
/// The message field historically arrived as `desc`; both that spelling and
/// `description` are accepted on input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(alias = "desc", alias = "description")]
    pub message: String,
}

/// A submission that passed validation. Only constructible through
/// [`normalize_submission`], so every field is non-empty, trimmed, and
/// within bounds.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NormalizedContactSubmission {
    name: String,
    email: String,
    message: String,
}

impl NormalizedContactSubmission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn normalize_submission(
    payload: ContactSubmission,
) -> Result<NormalizedContactSubmission, ValidationError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ValidationError::new("name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::new(format!(
            "name exceeds MAX_NAME_CHARS={MAX_NAME_CHARS}"
        )));
    }
    if name
        .chars()
        .any(|character| FORBIDDEN_NAME_CHARS.contains(&character) || character.is_control())
    {
        return Err(ValidationError::new(
            "name contains characters that are not allowed",
        ));
    }

    let email = payload.email.trim().to_string();
    validate_email_shape(&email)?;

    let message = payload.message.trim().to_string();
    if message.is_empty() {
        return Err(ValidationError::new("message cannot be empty"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ValidationError::new(format!(
            "message exceeds MAX_MESSAGE_CHARS={MAX_MESSAGE_CHARS}"
        )));
    }

    Ok(NormalizedContactSubmission {
        name,
        email,
        message,
    })
}

fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("email cannot be empty"));
    }
    if email.chars().count() > MAX_EMAIL_CHARS {
        return Err(ValidationError::new(format!(
            "email exceeds MAX_EMAIL_CHARS={MAX_EMAIL_CHARS}"
        )));
    }
    if email
        .chars()
        .any(|character| character.is_whitespace() || character.is_control())
    {
        return Err(ValidationError::new(
            "email cannot contain whitespace or control characters",
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::new("email must contain '@'"));
    };
    if local.is_empty() {
        return Err(ValidationError::new("email is missing its local part"));
    }
    if domain.is_empty() || domain.contains('@') {
        return Err(ValidationError::new("email must contain exactly one '@'"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::new(format!(
            "email domain '{domain}' is not a plausible mail domain"
        )));
    }

    Ok(())
}

/// Hex-encoded SHA-256 over the stable JSON form of a normalized
/// submission. Identical submissions fingerprint identically across
/// processes, which is what makes it usable as a log correlation id.
pub fn submission_fingerprint(submission: &NormalizedContactSubmission) -> String {
    let mut hasher = Sha256::new();
    hasher.update(stable_contract_json(submission));
    format!("{:x}", hasher.finalize())
}

pub fn stable_contract_json(value: impl Serialize) -> String {
    serde_json::to_string(&value).expect("serialization of contract value should not fail")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_submission() -> ContactSubmission {
        ContactSubmission {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            message: "I would like to talk about your product.".to_string(),
        }
    }

    #[test]
    fn normalize_rejects_whitespace_only_name() {
        let mut submission = sample_submission();
        submission.name = "   ".to_string();

        let error = normalize_submission(submission).expect_err("submission should fail");
        assert_eq!(error.message(), "name cannot be empty");
    }

    #[test]
    fn normalize_rejects_markup_characters_in_name() {
        let mut submission = sample_submission();
        submission.name = "Jane <script>".to_string();

        let error = normalize_submission(submission).expect_err("submission should fail");
        assert_eq!(error.message(), "name contains characters that are not allowed");
    }

    #[test]
    fn normalize_rejects_embedded_newline_in_name() {
        let mut submission = sample_submission();
        submission.name = "Jane\nBcc: attacker@example.com".to_string();

        let error = normalize_submission(submission).expect_err("submission should fail");
        assert_eq!(error.message(), "name contains characters that are not allowed");
    }

    #[test]
    fn normalize_rejects_email_without_at() {
        let mut submission = sample_submission();
        submission.email = "jane.example.com".to_string();

        let error = normalize_submission(submission).expect_err("submission should fail");
        assert_eq!(error.message(), "email must contain '@'");
    }

    #[test]
    fn normalize_rejects_email_with_two_ats() {
        let mut submission = sample_submission();
        submission.email = "jane@doe@example.com".to_string();

        let error = normalize_submission(submission).expect_err("submission should fail");
        assert_eq!(error.message(), "email must contain exactly one '@'");
    }

    #[test]
    fn normalize_rejects_email_without_dotted_domain() {
        let mut submission = sample_submission();
        submission.email = "jane@localhost".to_string();

        let error = normalize_submission(submission).expect_err("submission should fail");
        assert!(error.message().contains("not a plausible mail domain"));
    }

    #[test]
    fn normalize_rejects_whitespace_inside_email() {
        let mut submission = sample_submission();
        submission.email = "jane doe@example.com".to_string();

        let error = normalize_submission(submission).expect_err("submission should fail");
        assert_eq!(
            error.message(),
            "email cannot contain whitespace or control characters"
        );
    }

    #[test]
    fn normalize_rejects_oversized_message() {
        let mut submission = sample_submission();
        submission.message = "x".repeat(MAX_MESSAGE_CHARS + 1);

        let error = normalize_submission(submission).expect_err("submission should fail");
        assert_eq!(
            error.message(),
            format!("message exceeds MAX_MESSAGE_CHARS={MAX_MESSAGE_CHARS}")
        );
    }

    #[test]
    fn normalize_trims_surrounding_whitespace() {
        let submission = ContactSubmission {
            name: "  Jane Doe  ".to_string(),
            email: " jane@example.com ".to_string(),
            message: "\tHello there\n".to_string(),
        };

        let normalized = normalize_submission(submission).expect("submission should pass");
        assert_eq!(normalized.name(), "Jane Doe");
        assert_eq!(normalized.email(), "jane@example.com");
        assert_eq!(normalized.message(), "Hello there");
    }

    #[test]
    fn message_field_accepts_desc_alias() {
        let submission: ContactSubmission = serde_json::from_value(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "desc": "posted by the legacy form"
        }))
        .expect("event should deserialize");

        assert_eq!(submission.message, "posted by the legacy form");
    }

    #[test]
    fn message_field_accepts_description_alias() {
        let submission: ContactSubmission = serde_json::from_value(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "description": "posted by the newer form"
        }))
        .expect("event should deserialize");

        assert_eq!(submission.message, "posted by the newer form");
    }

    #[test]
    fn fingerprint_is_deterministic_for_identical_submissions() {
        let first = normalize_submission(sample_submission()).expect("submission should pass");
        let second = normalize_submission(sample_submission()).expect("submission should pass");

        assert_eq!(
            submission_fingerprint(&first),
            submission_fingerprint(&second)
        );
    }

    #[test]
    fn fingerprint_changes_when_message_changes() {
        let first = normalize_submission(sample_submission()).expect("submission should pass");
        let mut other = sample_submission();
        other.message = "a different message".to_string();
        let second = normalize_submission(other).expect("submission should pass");

        assert_ne!(
            submission_fingerprint(&first),
            submission_fingerprint(&second)
        );
    }
}
