use crate::core::dispatcher::DeliveryDispatcher;
use crate::core::{calculator, normalizer, projection};
use crate::domain::model::{
    EmailRequest, FormSubmission, LtvInputs, LtvResult, ProjectionPoint, Report, ReportDocument,
};
use crate::domain::ports::{EmailTransport, Storage};
use crate::utils::error::Result;
use serde::Serialize;

/// 同一組輸入的計算結果與投影
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub inputs: LtvInputs,
    pub result: LtvResult,
    pub projection: Vec<ProjectionPoint>,
}

impl Analysis {
    pub fn from_inputs(inputs: LtvInputs) -> Result<Self> {
        let result = calculator::calculate(&inputs)?;
        let projection = projection::project(&inputs)?;
        Ok(Self {
            inputs,
            result,
            projection,
        })
    }
}

/// Normalizer -> Calculator + Projection -> Report -> Dispatcher
pub struct LtvEngine<S: Storage, T: EmailTransport> {
    dispatcher: DeliveryDispatcher<S, T>,
}

impl<S: Storage, T: EmailTransport> LtvEngine<S, T> {
    pub fn new(dispatcher: DeliveryDispatcher<S, T>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &DeliveryDispatcher<S, T> {
        &self.dispatcher
    }

    pub fn analyze(&self, form: &FormSubmission) -> Result<Analysis> {
        let inputs = normalizer::normalize(form)?;
        let analysis = Analysis::from_inputs(inputs)?;
        tracing::info!(
            "✅ {}",
            self.dispatcher.formatter().summary_line(&analysis.result)
        );
        Ok(analysis)
    }

    pub fn report(&self, analysis: &Analysis) -> Result<Report> {
        self.dispatcher.formatter().build(
            analysis.inputs,
            analysis.result,
            analysis.projection.clone(),
        )
    }

    pub async fn download(&self, report: &Report, file_name: &str) -> Result<ReportDocument> {
        self.dispatcher.download(report, file_name).await
    }

    pub async fn email(&self, report: &Report, request: &EmailRequest) -> Result<()> {
        self.dispatcher.email(report, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SimulatedMailer;
    use crate::config::cli::LocalStorage;
    use crate::core::normalizer::{
        ACQUISITION_COST, AVERAGE_PURCHASE_VALUE, CUSTOMER_LIFESPAN, PURCHASE_FREQUENCY,
    };
    use crate::core::report::ReportFormatter;
    use crate::utils::error::LtvError;
    use std::time::Duration;

    fn engine(dir: &std::path::Path) -> LtvEngine<LocalStorage, SimulatedMailer> {
        LtvEngine::new(DeliveryDispatcher::new(
            LocalStorage::new(dir.to_string_lossy().to_string()),
            SimulatedMailer::new(Duration::from_millis(1)),
            ReportFormatter::default(),
        ))
    }

    fn form(cac: &str) -> FormSubmission {
        FormSubmission::new()
            .with_field(AVERAGE_PURCHASE_VALUE, "2000")
            .with_field(PURCHASE_FREQUENCY, "4")
            .with_field(CUSTOMER_LIFESPAN, "3")
            .with_field(ACQUISITION_COST, cac)
    }

    #[test]
    fn test_analyze_is_consistent() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = engine(dir.path()).analyze(&form("1500")).unwrap();

        assert_eq!(analysis.result.ltv, 24000.0);
        assert_eq!(analysis.result.roi, 1500.0);
        assert_eq!(analysis.projection.len(), 3);
        assert_eq!(
            analysis.projection.last().unwrap().cumulative_ltv,
            analysis.result.ltv
        );
    }

    #[test]
    fn test_typo_in_cost_surfaces_division_by_zero() {
        let dir = tempfile::tempdir().unwrap();
        let err = engine(dir.path()).analyze(&form("abc")).unwrap_err();
        assert!(matches!(err, LtvError::DivisionByZero { .. }));
    }

    #[tokio::test]
    async fn test_report_download_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path());
        let analysis = engine.analyze(&form("1500")).unwrap();
        let report = engine.report(&analysis).unwrap();

        let document = engine.download(&report, "results.txt").await.unwrap();
        let on_disk = std::fs::read_to_string(dir.path().join("results.txt")).unwrap();
        assert_eq!(on_disk, document.content);
    }

    #[test]
    fn test_huge_form_values_surface_non_finite_error() {
        let dir = tempfile::tempdir().unwrap();
        let huge = FormSubmission::new()
            .with_field(AVERAGE_PURCHASE_VALUE, "1e200")
            .with_field(PURCHASE_FREQUENCY, "1e200")
            .with_field(CUSTOMER_LIFESPAN, "3")
            .with_field(ACQUISITION_COST, "1500");
        let err = engine(dir.path()).analyze(&huge).unwrap_err();
        assert!(matches!(err, LtvError::NonFiniteResult { .. }));

        let err = engine(dir.path()).analyze(&form("1e-310")).unwrap_err();
        assert!(matches!(err, LtvError::NonFiniteResult { .. }));
    }

    #[test]
    fn test_analysis_json_for_chart_layer() {
        let analysis = Analysis::from_inputs(LtvInputs::default()).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["result"]["ltv"], 24000.0);
        assert_eq!(json["projection"][0]["cumulativeLtv"], 8000.0);
        assert_eq!(json["inputs"]["customerLifespan"], 3);
    }
}
