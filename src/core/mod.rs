pub mod calculator;
pub mod dispatcher;
pub mod engine;
pub mod normalizer;
pub mod projection;
pub mod report;

pub use crate::domain::model::{
    EmailRequest, FormSubmission, LtvInputs, LtvResult, ProjectionPoint, RecommendationTier,
    Report, ReportDocument,
};
pub use crate::domain::ports::{ConfigProvider, EmailTransport, Storage};
pub use crate::utils::error::Result;
