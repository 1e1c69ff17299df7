//! Inventory management formulas: EOQ, reorder point, safety stock,
//! ABC classification.

use crate::core::error::ValidationError;
use crate::core::query::ValueItem;
use serde::{Deserialize, Serialize};

/// Result of an Economic Order Quantity calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EoqResult {
    pub eoq: f64,
    pub annual_demand: f64,
    pub order_cost: f64,
    pub holding_cost: f64,
    /// D / EOQ
    pub orders_per_year: f64,
    /// Cycle stock plus nothing: EOQ / 2
    pub average_cycle_stock: f64,
}

/// Economic Order Quantity: sqrt(2*D*S / H).
///
/// All three inputs must be strictly positive.
pub fn eoq(
    annual_demand: f64,
    order_cost: f64,
    holding_cost: f64,
) -> Result<EoqResult, ValidationError> {
    require_positive("annual_demand", annual_demand)?;
    require_positive("order_cost", order_cost)?;
    require_positive("holding_cost", holding_cost)?;

    let quantity = (2.0 * annual_demand * order_cost / holding_cost).sqrt();

    Ok(EoqResult {
        eoq: quantity,
        annual_demand,
        order_cost,
        holding_cost,
        orders_per_year: annual_demand / quantity,
        average_cycle_stock: quantity / 2.0,
    })
}

/// Result of a reorder point calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderPointResult {
    pub reorder_point: f64,
    pub lead_time_demand: f64,
    pub safety_stock: f64,
}

/// Reorder point: daily_demand * lead_time_days + safety_stock.
pub fn reorder_point(
    daily_demand: f64,
    lead_time_days: f64,
    safety_stock: f64,
) -> Result<ReorderPointResult, ValidationError> {
    require_non_negative("daily_demand", daily_demand)?;
    require_non_negative("lead_time_days", lead_time_days)?;
    require_non_negative("safety_stock", safety_stock)?;

    let lead_time_demand = daily_demand * lead_time_days;
    Ok(ReorderPointResult {
        reorder_point: lead_time_demand + safety_stock,
        lead_time_demand,
        safety_stock,
    })
}

/// Result of a safety stock calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyStockResult {
    pub safety_stock: f64,
    pub service_z: f64,
    /// Estimated daily demand standard deviation (cv * daily_demand)
    pub demand_std: f64,
}

/// Safety stock: z * sigma_d * sqrt(L), with sigma_d estimated as
/// demand_cv * daily_demand. The classic defaults are z = 1.96 (95% service
/// level) and cv = 0.20.
pub fn safety_stock(
    daily_demand: f64,
    lead_time_days: f64,
    service_z: f64,
    demand_cv: f64,
) -> Result<SafetyStockResult, ValidationError> {
    require_positive("daily_demand", daily_demand)?;
    require_positive("lead_time_days", lead_time_days)?;
    require_positive("service_z", service_z)?;
    require_positive("demand_cv", demand_cv)?;

    let demand_std = demand_cv * daily_demand;
    Ok(SafetyStockResult {
        safety_stock: service_z * demand_std * lead_time_days.sqrt(),
        service_z,
        demand_std,
    })
}

/// ABC category. Ordering follows sorted value descending, so categories
/// never regress: once an item is B, no later (smaller) item can be A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbcCategory {
    A,
    B,
    C,
}

/// One classified item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcEntry {
    pub id: String,
    pub value: f64,
    pub percentage: f64,
    pub cumulative_percentage: f64,
    pub category: AbcCategory,
}

/// Per-category rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcSummary {
    pub count: usize,
    pub value_contribution_pct: f64,
}

/// Result of an ABC classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcResult {
    pub classification: Vec<AbcEntry>,
    pub a: AbcSummary,
    pub b: AbcSummary,
    pub c: AbcSummary,
}

/// Classify items by value contribution: A up to 80% cumulative value,
/// B up to 95%, C the remainder. Ties keep input order (stable sort).
pub fn abc_classification(items: &[ValueItem]) -> Result<AbcResult, ValidationError> {
    let ranked = rank_by_value(items)?;
    let total: f64 = ranked.iter().map(|i| i.value).sum();

    let mut cumulative = 0.0;
    let mut classification = Vec::with_capacity(ranked.len());
    for item in ranked {
        let percentage = item.value / total * 100.0;
        cumulative += percentage;
        let category = if cumulative <= 80.0 {
            AbcCategory::A
        } else if cumulative <= 95.0 {
            AbcCategory::B
        } else {
            AbcCategory::C
        };
        classification.push(AbcEntry {
            id: item.id.clone(),
            value: item.value,
            percentage,
            cumulative_percentage: cumulative,
            category,
        });
    }

    let summarize = |cat: AbcCategory| {
        let entries: Vec<_> = classification.iter().filter(|e| e.category == cat).collect();
        AbcSummary {
            count: entries.len(),
            value_contribution_pct: entries.iter().map(|e| e.percentage).sum(),
        }
    };

    Ok(AbcResult {
        a: summarize(AbcCategory::A),
        b: summarize(AbcCategory::B),
        c: summarize(AbcCategory::C),
        classification,
    })
}

/// Sort items by value descending (stable), validating along the way.
pub(crate) fn rank_by_value(items: &[ValueItem]) -> Result<Vec<ValueItem>, ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyItems);
    }
    for item in items {
        if !item.value.is_finite() || item.value < 0.0 {
            return Err(ValidationError::negative(&item.id, item.value));
        }
    }
    let total: f64 = items.iter().map(|i| i.value).sum();
    if total <= 0.0 {
        return Err(ValidationError::not_positive("total value", total));
    }

    let mut ranked = items.to_vec();
    // Stable sort keeps ties in input order, which keeps the output
    // deterministic for identical input.
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    Ok(ranked)
}

fn require_positive(name: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::not_positive(name, value));
    }
    Ok(())
}

fn require_non_negative(name: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::negative(name, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eoq_classic_example() {
        // sqrt(2 * 10000 * 50 / 5) = sqrt(200000) ~ 447.2
        let r = eoq(10_000.0, 50.0, 5.0).unwrap();
        assert!((r.eoq - 447.2).abs() < 0.1);
        assert!((r.orders_per_year - 10_000.0 / r.eoq).abs() < 1e-9);
    }

    #[test]
    fn test_eoq_rejects_non_positive() {
        assert_eq!(
            eoq(0.0, 50.0, 5.0).unwrap_err().kind(),
            "not_positive"
        );
        assert!(eoq(10_000.0, -1.0, 5.0).is_err());
        assert!(eoq(10_000.0, 50.0, f64::NAN).is_err());
    }

    #[test]
    fn test_reorder_point() {
        let r = reorder_point(100.0, 3.0, 50.0).unwrap();
        assert_eq!(r.reorder_point, 350.0);
        assert_eq!(r.lead_time_demand, 300.0);
    }

    #[test]
    fn test_reorder_point_allows_zero_safety_stock() {
        assert!(reorder_point(100.0, 3.0, 0.0).is_ok());
        assert!(reorder_point(100.0, 3.0, -1.0).is_err());
    }

    #[test]
    fn test_safety_stock_95_percent() {
        // z=1.96, cv=0.2: SS = 1.96 * 20 * sqrt(4) = 78.4
        let r = safety_stock(100.0, 4.0, 1.96, 0.2).unwrap();
        assert!((r.safety_stock - 78.4).abs() < 1e-9);
    }

    fn items(values: &[f64]) -> Vec<ValueItem> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ValueItem::new(format!("SKU-{}", i + 1), *v))
            .collect()
    }

    #[test]
    fn test_abc_top_item_is_a() {
        let r = abc_classification(&items(&[50_000.0, 35_000.0, 500.0])).unwrap();
        assert_eq!(r.classification[0].id, "SKU-1");
        assert_eq!(r.classification[0].category, AbcCategory::A);
        // 50000/85500 ~ 58.5% cumulative
        assert!(r.classification[0].cumulative_percentage < 80.0);
    }

    #[test]
    fn test_abc_categories_never_regress() {
        let r = abc_classification(&items(&[40.0, 30.0, 15.0, 8.0, 4.0, 2.0, 1.0])).unwrap();
        for pair in r.classification.windows(2) {
            assert!(pair[0].category <= pair[1].category);
            assert!(pair[0].cumulative_percentage <= pair[1].cumulative_percentage);
        }
    }

    #[test]
    fn test_abc_ties_keep_input_order() {
        let tied = vec![
            ValueItem::new("first", 10.0),
            ValueItem::new("second", 10.0),
            ValueItem::new("third", 10.0),
        ];
        let r = abc_classification(&tied).unwrap();
        let ids: Vec<_> = r.classification.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn test_abc_empty_and_zero_total() {
        assert_eq!(
            abc_classification(&[]).unwrap_err(),
            ValidationError::EmptyItems
        );
        assert!(abc_classification(&items(&[0.0, 0.0])).is_err());
    }

    #[test]
    fn test_abc_summary_counts_sum_to_total() {
        let r = abc_classification(&items(&[40.0, 30.0, 15.0, 8.0, 4.0, 2.0, 1.0])).unwrap();
        assert_eq!(r.a.count + r.b.count + r.c.count, 7);
        let contribution = r.a.value_contribution_pct
            + r.b.value_contribution_pct
            + r.c.value_contribution_pct;
        assert!((contribution - 100.0).abs() < 1e-9);
    }
}
