//! Minimal TwiML messaging response, just enough for the webhook replies.

/// Builds the XML document Twilio expects back from a messaging webhook:
/// one `<Response>` wrapping one or more `<Message>` elements.
#[derive(Debug, Default)]
pub struct MessagingResponse {
    messages: Vec<String>,
}

impl MessagingResponse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&mut self, body: &str) -> &mut Self {
        self.messages.push(body.to_string());
        self
    }

    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#);
        for message in &self.messages {
            xml.push_str("<Message>");
            xml.push_str(&escape_xml(message));
            xml.push_str("</Message>");
        }
        xml.push_str("</Response>");
        xml
    }
}

fn escape_xml(body: &str) -> String {
    body.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&apos;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
