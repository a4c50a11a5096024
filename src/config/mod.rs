pub mod cli;
pub mod toml_config;

pub const DEFAULT_FILE_NAME: &str = "LTV_Calculator_Results.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_EMAIL_DELAY_MS: u64 = 1500;
pub const DEFAULT_EMAIL_TIMEOUT_SECONDS: u64 = 30;

use crate::core::ConfigProvider;
use crate::domain::ports::{EmailSettings, ReportSettings};

/// 合併 TOML 與命令列參數後實際使用的設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub output_path: String,
    pub file_name: String,
    pub report: ReportSettings,
    pub email: EmailSettings,
}

impl EffectiveConfig {
    /// 以任一 provider 的值作為起點
    pub fn from_provider(provider: &dyn ConfigProvider) -> Self {
        Self {
            output_path: provider.output_path().to_string(),
            file_name: provider.file_name().to_string(),
            report: provider.report_settings(),
            email: provider.email_settings(),
        }
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            report: ReportSettings::default(),
            email: EmailSettings::default(),
        }
    }
}

impl ConfigProvider for EffectiveConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn report_settings(&self) -> ReportSettings {
        self.report.clone()
    }

    fn email_settings(&self) -> EmailSettings {
        self.email.clone()
    }
}

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::toml_config::TomlConfig;
    use super::{
        EffectiveConfig, DEFAULT_EMAIL_DELAY_MS, DEFAULT_EMAIL_TIMEOUT_SECONDS, DEFAULT_FILE_NAME,
        DEFAULT_OUTPUT_PATH,
    };
    use crate::core::normalizer::{
        ACQUISITION_COST, AVERAGE_PURCHASE_VALUE, CUSTOMER_LIFESPAN, PURCHASE_FREQUENCY,
    };
    use crate::core::ConfigProvider;
    use crate::domain::model::FormSubmission;
    use crate::domain::ports::{EmailSettings, ReportSettings};
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "ltv-insights")]
    #[command(about = "Customer lifetime value and ROI calculator with shareable reports")]
    pub struct CliConfig {
        /// Average purchase value (non-numeric text counts as 0)
        #[arg(long, allow_hyphen_values = true)]
        pub average_purchase_value: Option<String>,

        /// Purchases per customer per year
        #[arg(long, allow_hyphen_values = true)]
        pub purchase_frequency: Option<String>,

        /// Customer lifespan in whole years
        #[arg(long, allow_hyphen_values = true)]
        pub customer_lifespan: Option<String>,

        /// Customer acquisition cost (CAC)
        #[arg(long, allow_hyphen_values = true)]
        pub acquisition_cost: Option<String>,

        /// Output directory [default: ./output, or [delivery] output_path]
        #[arg(long)]
        pub output_path: Option<String>,

        /// Report file name [default: LTV_Calculator_Results.txt, or [report] file_name]
        #[arg(long)]
        pub file_name: Option<String>,

        /// Also save the year-by-year projection as CSV under this name
        #[arg(long)]
        pub projection_csv: Option<String>,

        #[arg(long, help = "Skip saving the report document")]
        pub no_download: bool,

        /// Recipient address; the report is emailed when set
        #[arg(long)]
        pub email: Option<String>,

        /// Recipient display name
        #[arg(long)]
        pub name: Option<String>,

        /// Send through this HTTP endpoint instead of the simulated mailer
        #[arg(long)]
        pub email_endpoint: Option<String>,

        /// Simulated send delay in milliseconds [default: 1500]
        #[arg(long)]
        pub email_delay_ms: Option<u64>,

        /// TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(long, help = "Print the analysis as JSON")]
        pub json: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub log_json: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        /// 組合表單欄位：命令列參數優先，其次是 `base` (TOML)，最後是計算器預設值
        pub fn form(&self, base: Option<&FormSubmission>) -> FormSubmission {
            let defaults = [
                (AVERAGE_PURCHASE_VALUE, &self.average_purchase_value, "2000"),
                (PURCHASE_FREQUENCY, &self.purchase_frequency, "4"),
                (CUSTOMER_LIFESPAN, &self.customer_lifespan, "3"),
                (ACQUISITION_COST, &self.acquisition_cost, "1500"),
            ];

            let mut form = base.cloned().unwrap_or_default();
            for (field, flag, default) in defaults {
                match flag {
                    Some(value) => {
                        form = form.with_field(field, value.as_str());
                    }
                    None if !form.fields.contains_key(field) => {
                        form = form.with_field(field, default);
                    }
                    None => {}
                }
            }
            form
        }

        /// 明確給定的命令列參數優先，其次是 TOML，最後是預設值
        pub fn resolve(&self, toml: Option<&TomlConfig>) -> EffectiveConfig {
            let mut effective = match toml {
                Some(toml) => EffectiveConfig::from_provider(toml),
                None => EffectiveConfig::default(),
            };

            if let Some(output_path) = &self.output_path {
                effective.output_path = output_path.clone();
            }
            if let Some(file_name) = &self.file_name {
                effective.file_name = file_name.clone();
            }
            effective.email = self.override_email(effective.email);

            tracing::debug!("Effective configuration: {:?}", effective);
            effective
        }

        fn override_email(&self, base: EmailSettings) -> EmailSettings {
            if let Some(endpoint) = &self.email_endpoint {
                let timeout = match base {
                    EmailSettings::Http { timeout, .. } => timeout,
                    EmailSettings::Simulated { .. } => {
                        Duration::from_secs(DEFAULT_EMAIL_TIMEOUT_SECONDS)
                    }
                };
                return EmailSettings::Http {
                    endpoint: endpoint.clone(),
                    timeout,
                };
            }

            match (self.email_delay_ms, base) {
                (Some(delay_ms), EmailSettings::Simulated { .. }) => EmailSettings::Simulated {
                    delay: Duration::from_millis(delay_ms),
                },
                (Some(_), http @ EmailSettings::Http { .. }) => {
                    tracing::warn!("⚠️ --email-delay-ms only applies to the simulated mailer; ignored");
                    http
                }
                (None, base) => base,
            }
        }
    }

    impl ConfigProvider for CliConfig {
        fn output_path(&self) -> &str {
            self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
        }

        fn file_name(&self) -> &str {
            self.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME)
        }

        fn report_settings(&self) -> ReportSettings {
            ReportSettings::default()
        }

        fn email_settings(&self) -> EmailSettings {
            let base = EmailSettings::Simulated {
                delay: Duration::from_millis(DEFAULT_EMAIL_DELAY_MS),
            };
            self.override_email(base)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            if let Some(output_path) = &self.output_path {
                validation::validate_path("output_path", output_path)?;
            }
            if let Some(file_name) = &self.file_name {
                validation::validate_file_name("file_name", file_name)?;
            }
            if let Some(csv_name) = &self.projection_csv {
                validation::validate_file_name("projection_csv", csv_name)?;
            }
            if let Some(endpoint) = &self.email_endpoint {
                validation::validate_url("email_endpoint", endpoint)?;
            }
            if let Some(delay_ms) = self.email_delay_ms {
                validation::validate_range("email_delay_ms", delay_ms, 0, 60_000)?;
            }
            if let Some(address) = &self.email {
                validation::validate_email_address(address)?;
            }
            Ok(())
        }
    }

}
