use crate::domain::model::{EmailMessage, LtvData};
use crate::domain::ports::{EmailSettings, EmailTransport};
use crate::utils::error::{DeliveryChannel, LtvError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// 模擬寄信：固定等待一段時間後成功
#[derive(Debug, Clone)]
pub struct SimulatedMailer {
    delay: Duration,
}

impl SimulatedMailer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedMailer {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

#[async_trait]
impl EmailTransport for SimulatedMailer {
    async fn deliver(&self, message: &EmailMessage) -> Result<()> {
        tracing::info!("Sending email to: {}", message.to);
        tracing::info!(
            "Recipient name: {}",
            message.display_name.as_deref().unwrap_or("Not provided")
        );
        tracing::debug!("LTV data: {:?}", message.data);

        // 模擬網路延遲
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

#[derive(Serialize)]
struct SendEmailPayload<'a> {
    email: &'a str,
    name: Option<&'a str>,
    subject: &'a str,
    data: &'a LtvData,
    content: &'a str,
}

/// 將報告 POST 到後端寄信 API
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: Client,
    endpoint: String,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EmailTransport for HttpMailer {
    async fn deliver(&self, message: &EmailMessage) -> Result<()> {
        let payload = SendEmailPayload {
            email: &message.to,
            name: message.display_name.as_deref(),
            subject: &message.subject,
            data: &message.data,
            content: &message.body,
        };

        tracing::debug!("Making email API request to: {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LtvError::delivery(DeliveryChannel::Email, e.to_string()))?;

        tracing::debug!("Email API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(LtvError::delivery(
                DeliveryChannel::Email,
                format!("Failed to send email (HTTP {})", response.status().as_u16()),
            ));
        }

        Ok(())
    }
}

/// 依設定建立對應的寄信傳輸層
pub enum Mailer {
    Simulated(SimulatedMailer),
    Http(HttpMailer),
}

impl Mailer {
    pub fn from_settings(settings: &EmailSettings) -> Result<Self> {
        match settings {
            EmailSettings::Simulated { delay } => Ok(Mailer::Simulated(SimulatedMailer::new(*delay))),
            EmailSettings::Http { endpoint, timeout } => {
                Ok(Mailer::Http(HttpMailer::new(endpoint.clone(), *timeout)?))
            }
        }
    }
}

#[async_trait]
impl EmailTransport for Mailer {
    async fn deliver(&self, message: &EmailMessage) -> Result<()> {
        match self {
            Mailer::Simulated(mailer) => mailer.deliver(message).await,
            Mailer::Http(mailer) => mailer.deliver(message).await,
        }
    }
}
