use crate::core::{projection, report::ReportFormatter};
use crate::domain::model::{EmailMessage, EmailRequest, LtvData, Report, ReportDocument};
use crate::domain::ports::{EmailTransport, Storage};
use crate::utils::error::{DeliveryChannel, LtvError, Result};
use crate::utils::validation::validate_email_address;
use std::fmt;

/// 下載與寄信兩種交付方式；只負責傳送，不重新計算
pub struct DeliveryDispatcher<S: Storage, T: EmailTransport> {
    storage: S,
    transport: T,
    formatter: ReportFormatter,
}

impl<S: Storage, T: EmailTransport> DeliveryDispatcher<S, T> {
    pub fn new(storage: S, transport: T, formatter: ReportFormatter) -> Self {
        Self {
            storage,
            transport,
            formatter,
        }
    }

    pub fn formatter(&self) -> &ReportFormatter {
        &self.formatter
    }

    /// 序列化報告並存成 `file_name`，回傳寫出的文件
    pub async fn download(&self, report: &Report, file_name: &str) -> Result<ReportDocument> {
        let document = ReportDocument {
            file_name: file_name.to_string(),
            content: self.formatter.render(report),
        };

        tracing::debug!(
            "Saving report '{}' ({} bytes)",
            document.file_name,
            document.content.len()
        );
        self.storage
            .write_file(&document.file_name, document.content.as_bytes())
            .await
            .map_err(|e| {
                tracing::warn!("Download of '{}' failed: {}", file_name, e);
                LtvError::delivery(DeliveryChannel::Download, e.to_string())
            })?;

        tracing::info!("📄 Report saved as {}", document.file_name);
        Ok(document)
    }

    /// 將逐年投影以 CSV 存檔
    pub async fn download_projection(&self, report: &Report, file_name: &str) -> Result<String> {
        let csv = projection::to_csv(&report.projection)
            .map_err(|e| LtvError::delivery(DeliveryChannel::Download, e.to_string()))?;

        self.storage
            .write_file(file_name, csv.as_bytes())
            .await
            .map_err(|e| LtvError::delivery(DeliveryChannel::Download, e.to_string()))?;

        tracing::info!(
            "📈 Projection ({} years) saved as {}",
            report.projection.len(),
            file_name
        );
        Ok(csv)
    }

    /// 寄送報告；收件者為空時在任何等待之前就回傳 MissingRecipient。不會自動重試。
    pub async fn email(&self, report: &Report, request: &EmailRequest) -> Result<()> {
        validate_email_address(&request.address)?;

        let message = EmailMessage {
            to: request.address.trim().to_string(),
            display_name: request.display_name.clone(),
            subject: format!("Your {} LTV calculation results", self.formatter.settings().brand),
            body: self.formatter.render(report),
            data: LtvData::from(report),
        };

        tracing::debug!("Sending report email to {}", message.to);
        match self.transport.deliver(&message).await {
            Ok(()) => {
                tracing::info!("📧 Report emailed to {}", message.to);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Email to {} failed: {}", message.to, e);
                Err(match e {
                    failure @ LtvError::DeliveryFailure { .. } => failure,
                    other => LtvError::delivery(DeliveryChannel::Email, other.to_string()),
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailState {
    Idle,
    Sending,
    Sent,
    Failed(String),
}

impl EmailState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EmailState::Sent | EmailState::Failed(_))
    }
}

impl fmt::Display for EmailState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmailState::Idle => write!(f, "Idle"),
            EmailState::Sending => write!(f, "Sending"),
            EmailState::Sent => write!(f, "Sent"),
            EmailState::Failed(_) => write!(f, "Failed"),
        }
    }
}

/// 單次寄信的狀態機：Idle -> Sending -> {Sent | Failed}
///
/// `send` 借用 `&mut self`，同一次寄送在進行中時無法再次提交。
/// 結束狀態不可重用，重試需要建立新的 `EmailDispatch`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDispatch {
    state: EmailState,
}

impl Default for EmailDispatch {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailDispatch {
    pub fn new() -> Self {
        Self {
            state: EmailState::Idle,
        }
    }

    pub fn state(&self) -> &EmailState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == EmailState::Sending
    }

    fn transition(&mut self, next: EmailState) {
        tracing::debug!("Email dispatch {} -> {}", self.state, next);
        self.state = next;
    }

    pub async fn send<S: Storage, T: EmailTransport>(
        &mut self,
        dispatcher: &DeliveryDispatcher<S, T>,
        report: &Report,
        request: &EmailRequest,
    ) -> Result<()> {
        if self.state != EmailState::Idle {
            return Err(LtvError::InvalidStateTransition {
                from: self.state.to_string(),
                to: EmailState::Sending.to_string(),
            });
        }

        self.transition(EmailState::Sending);
        let outcome = dispatcher.email(report, request).await;
        match &outcome {
            Ok(()) => self.transition(EmailState::Sent),
            Err(e) => self.transition(EmailState::Failed(e.to_string())),
        }
        outcome
    }
}
