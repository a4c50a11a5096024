use crate::domain::model::{FormSubmission, LtvInputs};
use crate::utils::error::{LtvError, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

pub const AVERAGE_PURCHASE_VALUE: &str = "averagePurchaseValue";
pub const PURCHASE_FREQUENCY: &str = "purchaseFrequency";
pub const CUSTOMER_LIFESPAN: &str = "customerLifespan";
pub const ACQUISITION_COST: &str = "acquisitionCost";

fn numeric_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("numeric prefix pattern is a valid regex")
    })
}

/// 將原始欄位值轉為數字；無法解析時一律回傳 0 (寬鬆策略，不視為錯誤)
///
/// 字串只取開頭可解析的數字部分，例如 "12abc" -> 12。
pub fn coerce_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => numeric_prefix()
            .find(s.trim_start())
            .and_then(|m| m.as_str().parse::<f64>().ok()),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => n,
        _ => {
            tracing::debug!("Coercing non-numeric input {} to 0", value);
            0.0
        }
    }
}

fn coerce_lifespan(value: &Value) -> u32 {
    let years = coerce_number(value).trunc();
    if years <= 0.0 {
        0
    } else if years >= u32::MAX as f64 {
        u32::MAX
    } else {
        years as u32
    }
}

fn required<'a>(form: &'a FormSubmission, field: &str) -> Result<&'a Value> {
    form.fields.get(field).ok_or_else(|| LtvError::MissingField {
        field: field.to_string(),
    })
}

/// 將表單欄位轉為 [`LtvInputs`]；只有缺少欄位才會失敗
pub fn normalize(form: &FormSubmission) -> Result<LtvInputs> {
    let inputs = LtvInputs {
        average_purchase_value: coerce_number(required(form, AVERAGE_PURCHASE_VALUE)?),
        purchase_frequency: coerce_number(required(form, PURCHASE_FREQUENCY)?),
        customer_lifespan: coerce_lifespan(required(form, CUSTOMER_LIFESPAN)?),
        acquisition_cost: coerce_number(required(form, ACQUISITION_COST)?),
    };

    if inputs.acquisition_cost == 0.0 {
        // 0 成本會讓 ROI 無法計算，可能是輸入打錯
        tracing::warn!("Acquisition cost normalized to 0; ROI will be incalculable");
    }

    tracing::debug!("Normalized inputs: {:?}", inputs);
    Ok(inputs)
}
