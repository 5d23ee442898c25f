//! Metric trend analysis over an ordered sequence of periods.
//!
//! Slope is the least-squares fit of value against index, never the
//! head/tail difference; confidence is the regression R-squared.
//! Direction compares the slope normalized by the series mean against
//! the configured threshold: strictly above is improving, strictly
//! below the negative threshold is declining, the boundary itself is
//! stable.

use serde::{Deserialize, Serialize};

use crate::{
    config::AnalyticsConfig,
    error::{AnalyticsError, AnalyticsResult},
};

/// Points below this variance are treated as a flat series.
const VARIANCE_FLOOR: f64 = 1e-12;
const MEAN_FLOOR: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendAnalysis {
    pub metric: String,
    pub points: Vec<TrendPoint>,
    /// Least-squares slope in metric units per period.
    pub slope: f64,
    pub direction: TrendDirection,
    /// Goodness of fit of the slope estimate, in [0, 1].
    pub confidence: f64,
}

/// Fit a trend over at least two ordered points.
pub fn analyze_trend(
    metric: &str,
    points: Vec<TrendPoint>,
    config: &AnalyticsConfig,
) -> AnalyticsResult<TrendAnalysis> {
    if points.len() < 2 {
        return Err(AnalyticsError::InsufficientData {
            operation: "trend regression",
            required: 2,
            actual: points.len(),
        });
    }

    let n = points.len() as f64;
    let sum_x: f64 = (0..points.len()).map(|i| i as f64).sum();
    let sum_y: f64 = points.iter().map(|p| p.value).sum();
    let sum_xy: f64 = points
        .iter()
        .enumerate()
        .map(|(i, p)| i as f64 * p.value)
        .sum();
    let sum_x2: f64 = (0..points.len()).map(|i| (i as f64).powi(2)).sum();

    // The x values are distinct indices, so the denominator is positive
    // for every series of two or more points.
    let denominator = n * sum_x2 - sum_x.powi(2);
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    let mean = sum_y / n;

    let ss_tot: f64 = points.iter().map(|p| (p.value - mean).powi(2)).sum();
    let ss_res: f64 = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let fitted = slope * i as f64 + intercept;
            (p.value - fitted).powi(2)
        })
        .sum();

    // A zero-variance series is fitted perfectly by its own mean.
    let confidence = if ss_tot < VARIANCE_FLOOR {
        1.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    let slope_pct = if mean.abs() < MEAN_FLOOR {
        0.0
    } else {
        slope / mean * 100.0
    };

    let threshold = config.trend.direction_threshold_pct;
    let direction = if slope_pct > threshold {
        TrendDirection::Improving
    } else if slope_pct < -threshold {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    Ok(TrendAnalysis {
        metric: metric.to_string(),
        points,
        slope,
        direction,
        confidence,
    })
}
