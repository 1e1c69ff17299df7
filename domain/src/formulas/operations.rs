//! Warehouse operations formulas: takt time and lead time breakdown.

use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Result of a takt time calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaktTimeResult {
    pub available_minutes: f64,
    pub demand_units: f64,
    /// Minutes available per unit of demand
    pub takt_minutes: f64,
}

/// Takt time: available production minutes divided by customer demand.
pub fn takt_time(available_minutes: f64, demand_units: f64) -> Result<TaktTimeResult, ValidationError> {
    if !available_minutes.is_finite() || available_minutes <= 0.0 {
        return Err(ValidationError::not_positive(
            "available_minutes",
            available_minutes,
        ));
    }
    if !demand_units.is_finite() || demand_units <= 0.0 {
        return Err(ValidationError::not_positive("demand_units", demand_units));
    }

    Ok(TaktTimeResult {
        available_minutes,
        demand_units,
        takt_minutes: available_minutes / demand_units,
    })
}

/// Result of a lead time breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadTimeResult {
    pub processing_minutes: f64,
    pub queue_minutes: f64,
    pub transport_minutes: f64,
    pub total_minutes: f64,
    pub processing_pct: f64,
    pub queue_pct: f64,
    pub transport_pct: f64,
}

/// Lead time: processing + queue + transport, with each stage's share.
pub fn lead_time_breakdown(
    processing_minutes: f64,
    queue_minutes: f64,
    transport_minutes: f64,
) -> Result<LeadTimeResult, ValidationError> {
    for (name, value) in [
        ("processing_minutes", processing_minutes),
        ("queue_minutes", queue_minutes),
        ("transport_minutes", transport_minutes),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::negative(name, value));
        }
    }

    let total = processing_minutes + queue_minutes + transport_minutes;
    if total <= 0.0 {
        return Err(ValidationError::not_positive("total lead time", total));
    }

    Ok(LeadTimeResult {
        processing_minutes,
        queue_minutes,
        transport_minutes,
        total_minutes: total,
        processing_pct: processing_minutes / total * 100.0,
        queue_pct: queue_minutes / total * 100.0,
        transport_pct: transport_minutes / total * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takt_time() {
        let r = takt_time(480.0, 240.0).unwrap();
        assert_eq!(r.takt_minutes, 2.0);
    }

    #[test]
    fn test_takt_rejects_zero_demand() {
        assert!(takt_time(480.0, 0.0).is_err());
    }

    #[test]
    fn test_lead_time_breakdown() {
        let r = lead_time_breakdown(30.0, 50.0, 20.0).unwrap();
        assert_eq!(r.total_minutes, 100.0);
        assert_eq!(r.processing_pct, 30.0);
        assert_eq!(r.queue_pct, 50.0);
        assert_eq!(r.transport_pct, 20.0);
    }

    #[test]
    fn test_lead_time_rejects_all_zero() {
        assert!(lead_time_breakdown(0.0, 0.0, 0.0).is_err());
        assert!(lead_time_breakdown(-1.0, 5.0, 5.0).is_err());
    }
}
