use contact_intake_core::email::OutboundEmail;

pub trait Mailer {
    fn send_text_email(&self, email: &OutboundEmail) -> Result<(), String>;
}
