use rewind_core::Notifier;
use tracing::{info, warn};

/// Hands the answer to the default mail client as a prefilled `mailto:` draft
#[derive(Debug, Clone, Copy, Default)]
pub struct MailtoNotifier;

/// `mailto:` link with percent-encoded fields
pub fn mailto_url(recipient: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        urlencoding::encode(recipient),
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

impl Notifier for MailtoNotifier {
    fn notify(&self, recipient: &str, subject: &str, body: &str) {
        let url = mailto_url(recipient, subject, body);
        match open::that_detached(&url) {
            Ok(()) => info!("Opened notification draft for {recipient}"),
            Err(e) => warn!("Failed to open mail client: {e}"),
        }
    }
}
