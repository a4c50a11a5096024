use crate::core::calculator::{ensure_finite, lifetime_value, roi_percent};
use crate::domain::model::{LtvInputs, ProjectionPoint};
use crate::utils::error::{LtvError, Result};

/// 逐年累積的 LTV/ROI 投影，第 1 年到 customer_lifespan 年 (含)
///
/// 營收以線性方式累積。最後一年的 `cumulative_ltv` 與 [`calculate`] 的 `ltv` 相同。
///
/// [`calculate`]: crate::core::calculator::calculate
pub fn project(inputs: &LtvInputs) -> Result<Vec<ProjectionPoint>> {
    // 先檢查成本，即使 lifespan 為 0 也回報 DivisionByZero
    if inputs.acquisition_cost == 0.0 {
        return Err(LtvError::division_by_zero(
            "projection ROI is undefined when the acquisition cost is zero",
        ));
    }

    (1..=inputs.customer_lifespan)
        .map(|year| {
            let cumulative_ltv = ensure_finite(
                lifetime_value(inputs, year),
                "projected lifetime value overflowed",
            )?;
            Ok(ProjectionPoint {
                year,
                cumulative_ltv,
                roi: roi_percent(cumulative_ltv, inputs.acquisition_cost)?,
                acquisition_cost: inputs.acquisition_cost,
                profit: cumulative_ltv - inputs.acquisition_cost,
            })
        })
        .collect()
}

#[derive(serde::Serialize)]
struct CsvRow {
    year: u32,
    cumulative_ltv: f64,
    roi: f64,
    acquisition_cost: f64,
    profit: f64,
}

/// 將投影輸出為 CSV，供圖表層下載
pub fn to_csv(points: &[ProjectionPoint]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for point in points {
        writer.serialize(CsvRow {
            year: point.year,
            cumulative_ltv: point.cumulative_ltv,
            roi: point.roi,
            acquisition_cost: point.acquisition_cost,
            profit: point.profit,
        })?;
    }

    // 空序列仍輸出標頭
    if points.is_empty() {
        writer.write_record(["year", "cumulative_ltv", "roi", "acquisition_cost", "profit"])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LtvError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| LtvError::ConfigError {
        message: format!("projection CSV is not valid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculator::calculate;

    #[test]
    fn test_default_projection() {
        let points = project(&LtvInputs::default()).unwrap();
        assert_eq!(points.len(), 3);

        assert_eq!(points[0].year, 1);
        assert_eq!(points[0].cumulative_ltv, 8000.0);
        assert!((points[0].roi - 433.333_333).abs() < 1e-5);
        assert_eq!(points[0].profit, 6500.0);

        assert_eq!(points[1].cumulative_ltv, 16000.0);
        assert!((points[1].roi - 966.666_667).abs() < 1e-5);

        assert_eq!(points[2].cumulative_ltv, 24000.0);
        assert_eq!(points[2].roi, 1500.0);
        assert!(points.iter().all(|p| p.acquisition_cost == 1500.0));
    }

    #[test]
    fn test_last_point_matches_single_shot_ltv() {
        let samples = [
            LtvInputs::default(),
            LtvInputs {
                average_purchase_value: 19.99,
                purchase_frequency: 7.3,
                customer_lifespan: 11,
                acquisition_cost: 0.37,
            },
            LtvInputs {
                average_purchase_value: 0.1,
                purchase_frequency: 0.2,
                customer_lifespan: 1,
                acquisition_cost: 3.0,
            },
        ];

        for inputs in samples {
            let points = project(&inputs).unwrap();
            let result = calculate(&inputs).unwrap();
            assert_eq!(points.len(), inputs.customer_lifespan as usize);
            let last = points.last().unwrap();
            assert_eq!(last.cumulative_ltv, result.ltv);
            assert_eq!(last.roi, result.roi);
        }
    }

    #[test]
    fn test_zero_lifespan_yields_empty_projection() {
        let inputs = LtvInputs {
            customer_lifespan: 0,
            ..LtvInputs::default()
        };
        assert!(project(&inputs).unwrap().is_empty());
    }

    #[test]
    fn test_zero_cost_is_division_by_zero() {
        let inputs = LtvInputs {
            acquisition_cost: 0.0,
            ..LtvInputs::default()
        };
        assert!(matches!(
            project(&inputs),
            Err(LtvError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_overflow_never_yields_infinite_points() {
        let inputs = LtvInputs {
            average_purchase_value: 1e200,
            purchase_frequency: 1e200,
            customer_lifespan: 3,
            acquisition_cost: 1500.0,
        };
        assert!(matches!(
            project(&inputs),
            Err(LtvError::NonFiniteResult { .. })
        ));

        let inputs = LtvInputs {
            acquisition_cost: 1e-310,
            ..LtvInputs::default()
        };
        assert!(matches!(
            project(&inputs),
            Err(LtvError::NonFiniteResult { .. })
        ));
    }

    #[test]
    fn test_projection_is_restartable() {
        let inputs = LtvInputs::default();
        assert_eq!(project(&inputs).unwrap(), project(&inputs).unwrap());
    }

    #[test]
    fn test_to_csv() {
        let points = project(&LtvInputs::default()).unwrap();
        let csv = to_csv(&points).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "year,cumulative_ltv,roi,acquisition_cost,profit");
        let last: Vec<f64> = lines[3]
            .split(',')
            .map(|field| field.parse().unwrap())
            .collect();
        assert_eq!(last, vec![3.0, 24000.0, 1500.0, 1500.0, 22500.0]);
    }

    #[test]
    fn test_to_csv_empty_has_header() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "year,cumulative_ltv,roi,acquisition_cost,profit");
    }
}
