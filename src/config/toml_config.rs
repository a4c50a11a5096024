use crate::config::{
    DEFAULT_EMAIL_DELAY_MS, DEFAULT_EMAIL_TIMEOUT_SECONDS, DEFAULT_FILE_NAME, DEFAULT_OUTPUT_PATH,
};
use crate::core::ConfigProvider;
use crate::domain::model::FormSubmission;
use crate::domain::ports::{EmailSettings, ReportSettings};
use crate::utils::error::{LtvError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: Option<ReportConfig>,
    pub delivery: Option<DeliveryConfig>,
    pub email: Option<EmailConfig>,
    /// 表單欄位的預設值，鍵名與表單相同 (例如 acquisitionCost)
    pub inputs: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub brand: Option<String>,
    pub website: Option<String>,
    pub currency_symbol: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    pub output_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailMode {
    Simulated,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub mode: EmailMode,
    pub endpoint: Option<String>,
    pub delay_ms: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LtvError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LtvError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MAIL_ENDPOINT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LtvError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_path("delivery.output_path", self.output_path())?;
        validate_file_name("report.file_name", self.file_name())?;

        if let Some(report) = &self.report {
            if let Some(symbol) = &report.currency_symbol {
                validate_non_empty_string("report.currency_symbol", symbol)?;
            }
        }

        if let Some(email) = &self.email {
            if let Some(delay) = email.delay_ms {
                validate_range("email.delay_ms", delay, 0, 60_000)?;
            }
            if let Some(timeout) = email.timeout_seconds {
                validate_range("email.timeout_seconds", timeout, 1, 300)?;
            }
            if email.mode == EmailMode::Http {
                let endpoint = email.endpoint.as_deref().ok_or_else(|| {
                    LtvError::ConfigValidationError {
                        field: "email.endpoint".to_string(),
                        message: "endpoint is required when mode = \"http\"".to_string(),
                    }
                })?;
                validate_url("email.endpoint", endpoint)?;
            }
        }

        Ok(())
    }

    /// 取得 [inputs] 表單預設值
    pub fn form(&self) -> Option<FormSubmission> {
        self.inputs.as_ref().map(|fields| FormSubmission {
            fields: fields.clone(),
        })
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        self.delivery
            .as_ref()
            .map(|d| d.output_path.as_str())
            .unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn file_name(&self) -> &str {
        self.report
            .as_ref()
            .and_then(|r| r.file_name.as_deref())
            .unwrap_or(DEFAULT_FILE_NAME)
    }

    fn report_settings(&self) -> ReportSettings {
        let defaults = ReportSettings::default();
        match &self.report {
            Some(report) => ReportSettings {
                brand: report.brand.clone().unwrap_or(defaults.brand),
                website: report.website.clone().unwrap_or(defaults.website),
                currency_symbol: report
                    .currency_symbol
                    .clone()
                    .unwrap_or(defaults.currency_symbol),
            },
            None => defaults,
        }
    }

    fn email_settings(&self) -> EmailSettings {
        match &self.email {
            Some(EmailConfig {
                mode: EmailMode::Http,
                endpoint: Some(endpoint),
                timeout_seconds,
                ..
            }) => EmailSettings::Http {
                endpoint: endpoint.clone(),
                timeout: Duration::from_secs(
                    timeout_seconds.unwrap_or(DEFAULT_EMAIL_TIMEOUT_SECONDS),
                ),
            },
            Some(email) => EmailSettings::Simulated {
                delay: Duration::from_millis(email.delay_ms.unwrap_or(DEFAULT_EMAIL_DELAY_MS)),
            },
            None => EmailSettings::default(),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
