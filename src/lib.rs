pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpMailer, Mailer, SimulatedMailer};
pub use config::{cli::LocalStorage, toml_config::TomlConfig, EffectiveConfig};
pub use core::{
    dispatcher::{DeliveryDispatcher, EmailDispatch, EmailState},
    engine::{Analysis, LtvEngine},
    report::ReportFormatter,
};
pub use domain::model::{
    EmailRequest, FormSubmission, LtvInputs, LtvResult, ProjectionPoint, RecommendationTier,
    Report, ReportDocument,
};
pub use utils::error::{LtvError, Result};
