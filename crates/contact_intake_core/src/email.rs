use crate::contract::NormalizedContactSubmission;

pub const TEXT_CHARSET: &str = "UTF-8";

/// Operator-side delivery settings, resolved from the environment by the
/// Lambda binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    pub sender_address: String,
    pub recipient_address: String,
    pub site_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub sender: String,
    pub recipient: String,
    pub reply_to: String,
    pub subject: String,
    pub body_text: String,
}

pub fn render_subject(delivery: &DeliveryConfig) -> String {
    format!("New Communication From {}", delivery.site_name)
}

/// Labeled three-field body, fixed order. The single space after each
/// newline is part of the historical format and is preserved.
pub fn render_body(submission: &NormalizedContactSubmission) -> String {
    format!(
        "Name : {}\n Email : {}\n Message : {}",
        submission.name(),
        submission.email(),
        submission.message()
    )
}

/// Reply-to is the submitter's own address, so answering the notification
/// reaches the visitor directly.
pub fn build_outbound_email(
    delivery: &DeliveryConfig,
    submission: &NormalizedContactSubmission,
) -> OutboundEmail {
    OutboundEmail {
        sender: delivery.sender_address.clone(),
        recipient: delivery.recipient_address.clone(),
        reply_to: submission.email().to_string(),
        subject: render_subject(delivery),
        body_text: render_body(submission),
    }
}
