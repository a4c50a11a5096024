use crate::domain::model::EmailMessage;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 寄送報告的傳輸層 (模擬或 HTTP)
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn deliver(&self, message: &EmailMessage) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub brand: String,
    pub website: String,
    pub currency_symbol: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            brand: "Value Vista Insights".to_string(),
            website: "www.valuevistainsights.com".to_string(),
            currency_symbol: "₹".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailSettings {
    Simulated { delay: Duration },
    Http { endpoint: String, timeout: Duration },
}

impl Default for EmailSettings {
    fn default() -> Self {
        EmailSettings::Simulated {
            delay: Duration::from_millis(1500),
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn file_name(&self) -> &str;
    fn report_settings(&self) -> ReportSettings;
    fn email_settings(&self) -> EmailSettings;
}
