use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use contact_intake_core::email::{DeliveryConfig, OutboundEmail, TEXT_CHARSET};
use contact_intake_lambda::adapters::mailer::Mailer;
use contact_intake_lambda::handlers::intake::{handle_intake_event, ApiGatewayResponse};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

const DEFAULT_SITE_NAME: &str = "website";

struct SesMailer {
    ses_client: aws_sdk_sesv2::Client,
}

impl Mailer for SesMailer {
    fn send_text_email(&self, email: &OutboundEmail) -> Result<(), String> {
        let email = email.clone();
        let client = self.ses_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let subject = Content::builder()
                    .data(email.subject)
                    .charset(TEXT_CHARSET)
                    .build()
                    .map_err(|error| format!("failed to build email subject: {error}"))?;
                let body_text = Content::builder()
                    .data(email.body_text)
                    .charset(TEXT_CHARSET)
                    .build()
                    .map_err(|error| format!("failed to build email body: {error}"))?;
                let message = Message::builder()
                    .subject(subject)
                    .body(Body::builder().text(body_text).build())
                    .build();
                let destination = Destination::builder()
                    .to_addresses(email.recipient)
                    .build();

                client
                    .send_email()
                    .from_email_address(email.sender)
                    .destination(destination)
                    .reply_to_addresses(email.reply_to)
                    .content(EmailContent::builder().simple(message).build())
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to send email through ses: {error}"))
            })
        })
    }
}

fn delivery_from_env() -> Option<DeliveryConfig> {
    resolve_delivery(
        non_empty_env("CONTACT_SENDER_ADDRESS"),
        non_empty_env("CONTACT_RECIPIENT_ADDRESS"),
        non_empty_env("CONTACT_SITE_NAME"),
    )
}

fn resolve_delivery(
    sender_address: Option<String>,
    recipient_address: Option<String>,
    site_name: Option<String>,
) -> Option<DeliveryConfig> {
    Some(DeliveryConfig {
        sender_address: sender_address?,
        recipient_address: recipient_address?,
        site_name: site_name.unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
    })
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let mailer = SesMailer {
        ses_client: aws_sdk_sesv2::Client::new(&config),
    };

    let delivery = delivery_from_env();
    Ok(handle_intake_event(event.payload, delivery.as_ref(), &mailer))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
