use crate::domain::model::{LtvInputs, LtvResult, ProjectionPoint, RecommendationTier, Report};
use crate::domain::ports::ReportSettings;
use crate::utils::error::{LtvError, Result};
use crate::utils::format::{format_currency, format_date, format_fixed2};
use chrono::{Local, Utc};

const RULE: &str = "---------------------------------------------";

/// 產生報告內容；`build` 擷取時間戳記，`render` 只依賴 Report 本身
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    settings: ReportSettings,
}

impl ReportFormatter {
    pub fn new(settings: ReportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// 結果須為有限值；否則報告會出現 "inf" / "NaN"
    pub fn build(
        &self,
        inputs: LtvInputs,
        result: LtvResult,
        projection: Vec<ProjectionPoint>,
    ) -> Result<Report> {
        if inputs.acquisition_cost == 0.0 {
            return Err(LtvError::division_by_zero(
                "LTV:CAC ratio is undefined when the acquisition cost is zero",
            ));
        }
        let ltv_to_cac_ratio = result.ltv / inputs.acquisition_cost;
        let all_finite = [result.ltv, result.roi, ltv_to_cac_ratio]
            .into_iter()
            .chain(
                projection
                    .iter()
                    .flat_map(|p| [p.cumulative_ltv, p.roi, p.profit]),
            )
            .all(f64::is_finite);
        if !all_finite {
            return Err(LtvError::non_finite("report values"));
        }

        let recommendation = RecommendationTier::classify(result.roi);
        tracing::debug!(
            "Building report: ltv={}, roi={:.2}, tier={:?}",
            result.ltv,
            result.roi,
            recommendation
        );

        Ok(Report {
            inputs,
            result,
            projection,
            ltv_to_cac_ratio,
            recommendation,
            generated_at: Utc::now(),
        })
    }

    /// 計算完成時的一行摘要，交給通知層顯示
    pub fn summary_line(&self, result: &LtvResult) -> String {
        format!(
            "Customer Lifetime Value: {}, ROI: {}%",
            self.money(result.ltv),
            format_fixed2(result.roi)
        )
    }

    fn money(&self, value: f64) -> String {
        format_currency(&self.settings.currency_symbol, value)
    }

    /// 純文字報告，段落順序固定：標題、輸入、結果、分析、建議、頁尾
    pub fn render(&self, report: &Report) -> String {
        let inputs = &report.inputs;
        let result = &report.result;
        let roi = format_fixed2(result.roi);

        let mut lines = vec![
            format!("{} - LTV Calculator Results", self.settings.brand),
            RULE.to_string(),
            String::new(),
            "CUSTOMER LIFETIME VALUE ANALYSIS".to_string(),
            String::new(),
        ];

        lines.push("Input Parameters:".to_string());
        lines.push(format!(
            "- Average Purchase Value: {}",
            self.money(inputs.average_purchase_value)
        ));
        lines.push(format!(
            "- Purchase Frequency: {} times per year",
            inputs.purchase_frequency
        ));
        lines.push(format!("- Customer Lifespan: {} years", inputs.customer_lifespan));
        lines.push(format!(
            "- Customer Acquisition Cost: {}",
            self.money(inputs.acquisition_cost)
        ));
        lines.push(String::new());

        lines.push("Results:".to_string());
        lines.push(format!("- Customer Lifetime Value (LTV): {}", self.money(result.ltv)));
        lines.push(format!("- Return on Investment (ROI): {}%", roi));
        lines.push(format!("- LTV:CAC Ratio: {}", format_fixed2(report.ltv_to_cac_ratio)));
        lines.push(String::new());

        lines.push("Analysis:".to_string());
        lines.push(format!(
            "Your average customer generates {} in revenue over their lifetime,",
            self.money(result.ltv)
        ));
        lines.push(format!(
            "which represents a {}% return on your acquisition investment.",
            roi
        ));
        if !report.projection.is_empty() {
            lines.push(String::new());
            lines.push("Year-by-year projection:".to_string());
            for point in &report.projection {
                lines.push(format!(
                    "- Year {}: LTV {}, ROI {}%, Profit {}",
                    point.year,
                    self.money(point.cumulative_ltv),
                    format_fixed2(point.roi),
                    self.money(point.profit)
                ));
            }
        }
        lines.push(String::new());

        lines.push("Recommendations:".to_string());
        lines.push(report.recommendation.advice().to_string());
        lines.push(String::new());

        let generated_on = format_date(report.generated_at.with_timezone(&Local).date_naive());
        lines.push(format!("Generated on {} by {}", generated_on, self.settings.brand));
        lines.push(self.settings.website.clone());

        let mut document = lines.join("\n");
        document.push('\n');
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{calculator::calculate, projection::project};

    fn default_report(formatter: &ReportFormatter) -> Report {
        let inputs = LtvInputs::default();
        let result = calculate(&inputs).unwrap();
        let projection = project(&inputs).unwrap();
        formatter.build(inputs, result, projection).unwrap()
    }

    #[test]
    fn test_build_computes_ratio_and_tier() {
        let formatter = ReportFormatter::default();
        let report = default_report(&formatter);

        assert_eq!(report.ltv_to_cac_ratio, 16.0);
        assert_eq!(report.recommendation, RecommendationTier::Excellent);
        assert_eq!(report.projection.len(), 3);
    }

    #[test]
    fn test_render_section_order() {
        let formatter = ReportFormatter::default();
        let text = formatter.render(&default_report(&formatter));

        let sections = [
            "Value Vista Insights - LTV Calculator Results",
            "Input Parameters:",
            "Results:",
            "Analysis:",
            "Recommendations:",
            "Generated on ",
        ];
        let positions: Vec<usize> = sections
            .iter()
            .map(|s| text.find(s).unwrap_or_else(|| panic!("missing section {}", s)))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.trim_end().ends_with("www.valuevistainsights.com"));
    }

    #[test]
    fn test_render_values() {
        let formatter = ReportFormatter::default();
        let text = formatter.render(&default_report(&formatter));

        assert!(text.contains("- Average Purchase Value: ₹2,000"));
        assert!(text.contains("- Purchase Frequency: 4 times per year"));
        assert!(text.contains("- Customer Lifespan: 3 years"));
        assert!(text.contains("- Customer Acquisition Cost: ₹1,500"));
        assert!(text.contains("- Customer Lifetime Value (LTV): ₹24,000"));
        assert!(text.contains("- Return on Investment (ROI): 1500.00%"));
        assert!(text.contains("- LTV:CAC Ratio: 16.00"));
        assert!(text.contains("- Year 1: LTV ₹8,000, ROI 433.33%, Profit ₹6,500"));
        assert!(text.contains(RecommendationTier::Excellent.advice()));
    }

    #[test]
    fn test_render_uses_custom_settings() {
        let formatter = ReportFormatter::new(ReportSettings {
            brand: "Acme Analytics".to_string(),
            website: "acme.example".to_string(),
            currency_symbol: "$".to_string(),
        });
        let text = formatter.render(&default_report(&formatter));
        assert!(text.starts_with("Acme Analytics - LTV Calculator Results"));
        assert!(text.contains("$24,000"));
        assert!(!text.contains('₹'));
    }

    #[test]
    fn test_render_is_stable_for_same_report() {
        let formatter = ReportFormatter::default();
        let report = default_report(&formatter);
        assert_eq!(formatter.render(&report), formatter.render(&report));
    }

    #[test]
    fn test_summary_line() {
        let formatter = ReportFormatter::default();
        let result = calculate(&LtvInputs::default()).unwrap();
        assert_eq!(
            formatter.summary_line(&result),
            "Customer Lifetime Value: ₹24,000, ROI: 1500.00%"
        );
    }

    #[test]
    fn test_tier_in_report_follows_roi() {
        let formatter = ReportFormatter::default();
        let inputs = LtvInputs {
            average_purchase_value: 100.0,
            purchase_frequency: 1.0,
            customer_lifespan: 2,
            acquisition_cost: 100.0,
        };
        let result = calculate(&inputs).unwrap();
        let report = formatter.build(inputs, result, vec![]).unwrap();
        assert_eq!(result.roi, 100.0);
        assert_eq!(report.recommendation, RecommendationTier::NeedsOptimization);
        assert!(!formatter.render(&report).contains("Year-by-year"));
    }

    #[test]
    fn test_build_rejects_non_finite_values() {
        let formatter = ReportFormatter::default();
        let inputs = LtvInputs::default();

        let overflowed = LtvResult {
            ltv: f64::INFINITY,
            roi: f64::INFINITY,
        };
        assert!(matches!(
            formatter.build(inputs, overflowed, vec![]),
            Err(LtvError::NonFiniteResult { .. })
        ));

        // ratio 本身溢位
        let tiny_cost = LtvInputs {
            acquisition_cost: 1e-310,
            ..inputs
        };
        let result = LtvResult {
            ltv: 24000.0,
            roi: 1500.0,
        };
        assert!(matches!(
            formatter.build(tiny_cost, result, vec![]),
            Err(LtvError::NonFiniteResult { .. })
        ));
    }
}
