use crate::domain::model::{LtvInputs, LtvResult};
use crate::utils::error::{LtvError, Result};

/// ((value - cost) / cost) * 100；cost 為 0 時回傳 DivisionByZero 而非 NaN/Infinity
pub fn roi_percent(value: f64, acquisition_cost: f64) -> Result<f64> {
    if acquisition_cost == 0.0 {
        return Err(LtvError::division_by_zero(
            "ROI is undefined when the acquisition cost is zero",
        ));
    }
    ensure_finite(
        ((value - acquisition_cost) / acquisition_cost) * 100.0,
        "ROI overflowed",
    )
}

/// 溢位 (inf) 或 inf * 0 (NaN) 不可流出計算層
pub(crate) fn ensure_finite(value: f64, context: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LtvError::non_finite(format!("{} ({})", context, value)))
    }
}

/// 營收累積到第 `years` 年的 LTV
pub(crate) fn lifetime_value(inputs: &LtvInputs, years: u32) -> f64 {
    inputs.average_purchase_value * inputs.purchase_frequency * years as f64
}

pub fn calculate(inputs: &LtvInputs) -> Result<LtvResult> {
    let ltv = ensure_finite(
        lifetime_value(inputs, inputs.customer_lifespan),
        "lifetime value overflowed",
    )?;
    let roi = roi_percent(ltv, inputs.acquisition_cost)?;
    Ok(LtvResult { ltv, roi })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_default_scenario() {
        let result = assert_ok!(calculate(&LtvInputs::default()));
        assert_eq!(result.ltv, 24000.0);
        assert_eq!(result.roi, 1500.0);
    }

    #[test]
    fn test_roi_matches_formula() {
        let inputs = LtvInputs {
            average_purchase_value: 37.5,
            purchase_frequency: 2.25,
            customer_lifespan: 7,
            acquisition_cost: 420.0,
        };
        let result = calculate(&inputs).unwrap();
        let ltv = 37.5 * 2.25 * 7.0;
        assert_eq!(result.ltv, ltv);
        assert_eq!(result.roi, ((ltv - 420.0) / 420.0) * 100.0);
    }

    #[test]
    fn test_zero_acquisition_cost_is_division_by_zero() {
        let inputs = LtvInputs {
            acquisition_cost: 0.0,
            ..LtvInputs::default()
        };
        let err = assert_err!(calculate(&inputs));
        assert!(matches!(err, LtvError::DivisionByZero { .. }));
    }

    #[test]
    fn test_negative_roi_when_value_below_cost() {
        let inputs = LtvInputs {
            average_purchase_value: 10.0,
            purchase_frequency: 1.0,
            customer_lifespan: 5,
            acquisition_cost: 100.0,
        };
        let result = calculate(&inputs).unwrap();
        assert_eq!(result.ltv, 50.0);
        assert_eq!(result.roi, -50.0);
    }

    #[test]
    fn test_overflowing_ltv_is_non_finite_error() {
        let inputs = LtvInputs {
            average_purchase_value: 1e200,
            purchase_frequency: 1e200,
            customer_lifespan: 3,
            acquisition_cost: 1500.0,
        };
        let err = assert_err!(calculate(&inputs));
        assert!(matches!(err, LtvError::NonFiniteResult { .. }));
    }

    #[test]
    fn test_infinity_times_zero_years_is_not_nan() {
        // inf * 0 會得到 NaN
        let inputs = LtvInputs {
            average_purchase_value: 1e300,
            purchase_frequency: 1e300,
            customer_lifespan: 0,
            acquisition_cost: 1500.0,
        };
        let err = assert_err!(calculate(&inputs));
        assert!(matches!(err, LtvError::NonFiniteResult { .. }));
    }

    #[test]
    fn test_subnormal_cost_overflows_roi() {
        let inputs = LtvInputs {
            acquisition_cost: 1e-310,
            ..LtvInputs::default()
        };
        let err = assert_err!(calculate(&inputs));
        assert!(matches!(err, LtvError::NonFiniteResult { .. }));
        assert!(roi_percent(24000.0, 1e-310).is_err());
    }
}
