use std::fmt;
use thiserror::Error;

/// 交付管道：下載或電子郵件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    Download,
    Email,
}

impl fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryChannel::Download => write!(f, "download"),
            DeliveryChannel::Email => write!(f, "email"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LtvError {
    #[error("Division by zero: {context}")]
    DivisionByZero { context: String },

    #[error("Result is not a finite number: {context}")]
    NonFiniteResult { context: String },

    #[error("Recipient email address is required")]
    MissingRecipient,

    #[error("{channel} delivery failed: {message}")]
    DeliveryFailure {
        channel: DeliveryChannel,
        message: String,
    },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Calculation,
    Delivery,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LtvError {
    pub fn delivery(channel: DeliveryChannel, message: impl Into<String>) -> Self {
        LtvError::DeliveryFailure {
            channel,
            message: message.into(),
        }
    }

    pub fn division_by_zero(context: impl Into<String>) -> Self {
        LtvError::DivisionByZero {
            context: context.into(),
        }
    }

    pub fn non_finite(context: impl Into<String>) -> Self {
        LtvError::NonFiniteResult {
            context: context.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LtvError::MissingRecipient | LtvError::MissingField { .. } => ErrorCategory::Input,
            LtvError::DivisionByZero { .. } | LtvError::NonFiniteResult { .. } => {
                ErrorCategory::Calculation
            }
            LtvError::DeliveryFailure { .. }
            | LtvError::HttpError(_)
            | LtvError::InvalidStateTransition { .. } => ErrorCategory::Delivery,
            LtvError::ConfigError { .. }
            | LtvError::ConfigValidationError { .. }
            | LtvError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            LtvError::IoError(_) | LtvError::SerializationError(_) | LtvError::CsvError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 計算錯誤可由呼叫端顯示為 "N/A"
            ErrorCategory::Calculation => ErrorSeverity::Low,
            ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LtvError::DivisionByZero { .. } => {
                "ROI cannot be calculated because the acquisition cost is zero".to_string()
            }
            LtvError::NonFiniteResult { .. } => {
                "The inputs are too large (or the cost too small) to calculate a result".to_string()
            }
            LtvError::MissingRecipient => "Please enter an email address".to_string(),
            LtvError::DeliveryFailure {
                channel: DeliveryChannel::Email,
                ..
            } => "There was a problem sending your email. Please try again.".to_string(),
            LtvError::DeliveryFailure {
                channel: DeliveryChannel::Download,
                ..
            } => "There was a problem generating your report".to_string(),
            LtvError::MissingField { field } => format!("The '{}' field is required", field),
            LtvError::InvalidStateTransition { .. } => {
                "This email has already been submitted".to_string()
            }
            LtvError::HttpError(_) => "The email service could not be reached".to_string(),
            LtvError::ConfigError { .. }
            | LtvError::ConfigValidationError { .. }
            | LtvError::InvalidConfigValueError { .. } => format!("Configuration problem: {}", self),
            LtvError::IoError(_) | LtvError::SerializationError(_) | LtvError::CsvError(_) => {
                format!("Unexpected system error: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LtvError::DivisionByZero { .. } => "Enter an acquisition cost greater than zero",
            LtvError::NonFiniteResult { .. } => "Check the inputs for typos or extra digits",
            LtvError::MissingRecipient => "Provide a recipient address with --email",
            LtvError::DeliveryFailure { .. } | LtvError::HttpError(_) => {
                "Retry the delivery; it is never retried automatically"
            }
            LtvError::MissingField { .. } => "Provide all four calculator fields",
            LtvError::InvalidStateTransition { .. } => "Start a new email dispatch to retry",
            LtvError::ConfigError { .. }
            | LtvError::ConfigValidationError { .. }
            | LtvError::InvalidConfigValueError { .. } => "Check the configuration file and flags",
            LtvError::IoError(_) => "Check that the output path exists and is writable",
            LtvError::SerializationError(_) | LtvError::CsvError(_) => {
                "Re-run with --verbose and report the problem"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LtvError>;
