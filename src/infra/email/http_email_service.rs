use std::time::Duration;

use crate::domain::ports::EmailService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error};
use base64::{Engine as _, engine::general_purpose};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Mail relay client. The relay accepts one JSON message per request.
pub struct HttpEmailService {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpEmailService {
    pub fn new(api_url: String, api_key: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| AppError::InternalWithMsg(format!("Mail client setup failed: {}", e)))?;
        Ok(Self { client, api_url, api_key })
    }
}

#[derive(Serialize)]
struct Attachment<'a> {
    filename: &'a str,
    content_base64: String,
}

#[derive(Serialize)]
struct OutgoingMessage<'a> {
    from_alias: &'static str,
    to_addr: &'a str,
    subject: &'a str,
    html_body: &'a str,
    attachments: Vec<Attachment<'a>>,
}

#[async_trait]
impl EmailService for HttpEmailService {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachment_name: Option<&str>,
        attachment_data: Option<&[u8]>
    ) -> Result<(), AppError> {
        let attachments = match (attachment_name, attachment_data) {
            (Some(filename), Some(data)) => vec![Attachment {
                filename,
                content_base64: general_purpose::STANDARD.encode(data),
            }],
            _ => Vec::new(),
        };

        let message = OutgoingMessage {
            from_alias: "appointments",
            to_addr: recipient,
            subject,
            html_body,
            attachments,
        };

        let res = self.client.post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Mail relay unreachable: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Mail relay rejected message. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        debug!("Mail relay accepted message for {}", recipient);
        Ok(())
    }
}
