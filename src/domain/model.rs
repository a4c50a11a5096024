use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 計算器的四個輸入欄位
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LtvInputs {
    pub average_purchase_value: f64,
    pub purchase_frequency: f64,
    pub customer_lifespan: u32,
    pub acquisition_cost: f64,
}

impl Default for LtvInputs {
    fn default() -> Self {
        Self {
            average_purchase_value: 2000.0,
            purchase_frequency: 4.0,
            customer_lifespan: 3,
            acquisition_cost: 1500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LtvResult {
    pub ltv: f64,
    /// 百分比
    pub roi: f64,
}

/// 單一年度的累積指標，供圖表使用
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub year: u32,
    pub cumulative_ltv: f64,
    pub roi: f64,
    pub acquisition_cost: f64,
    pub profit: f64,
}

/// ROI 門檻分級，由低到高排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    NeedsOptimization,
    Healthy,
    Excellent,
}

impl RecommendationTier {
    pub const EXCELLENT_ROI_THRESHOLD: f64 = 300.0;
    pub const HEALTHY_ROI_THRESHOLD: f64 = 100.0;

    /// roi > 300 為 Excellent，100 < roi <= 300 為 Healthy，其餘為 NeedsOptimization
    pub fn classify(roi: f64) -> Self {
        if roi > Self::EXCELLENT_ROI_THRESHOLD {
            RecommendationTier::Excellent
        } else if roi > Self::HEALTHY_ROI_THRESHOLD {
            RecommendationTier::Healthy
        } else {
            RecommendationTier::NeedsOptimization
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            RecommendationTier::Excellent => "excellent, invest further in acquisition",
            RecommendationTier::Healthy => "healthy, focus on retention",
            RecommendationTier::NeedsOptimization => {
                "optimize acquisition cost or increase customer value"
            }
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            RecommendationTier::Excellent => {
                "Your LTV:CAC ratio is excellent! Consider investing more in customer acquisition to accelerate growth."
            }
            RecommendationTier::Healthy => {
                "Your LTV:CAC ratio is healthy. Focus on strategies to increase customer retention and lifetime value further."
            }
            RecommendationTier::NeedsOptimization => {
                "Consider improving your LTV:CAC ratio by optimizing acquisition costs or increasing customer value through upselling and retention."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub inputs: LtvInputs,
    pub result: LtvResult,
    pub projection: Vec<ProjectionPoint>,
    pub ltv_to_cac_ratio: f64,
    pub recommendation: RecommendationTier,
    pub generated_at: DateTime<Utc>,
}

/// 外部表單送來的原始欄位值 (字串或數字)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormSubmission {
    pub fields: HashMap<String, serde_json::Value>,
}

impl FormSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }
}

/// 已序列化的下載文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub address: String,
    pub display_name: Option<String>,
}

impl EmailRequest {
    pub fn new(address: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            address: address.into(),
            display_name: display_name.filter(|name| !name.trim().is_empty()),
        }
    }
}

/// 寄信時附帶的結果資料
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LtvData {
    pub average_purchase_value: f64,
    pub purchase_frequency: f64,
    pub customer_lifespan: u32,
    pub acquisition_cost: f64,
    pub ltv: f64,
    pub roi: f64,
}

impl From<&Report> for LtvData {
    fn from(report: &Report) -> Self {
        Self {
            average_purchase_value: report.inputs.average_purchase_value,
            purchase_frequency: report.inputs.purchase_frequency,
            customer_lifespan: report.inputs.customer_lifespan,
            acquisition_cost: report.inputs.acquisition_cost,
            ltv: report.result.ltv,
            roi: report.result.roi,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub display_name: Option<String>,
    pub subject: String,
    pub body: String,
    pub data: LtvData,
}
