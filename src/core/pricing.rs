//! Batch price aggregator - rolls cost components into unit and batch prices.
//!
//! Pure arithmetic over already-computed per-unit cost components. The percent
//! breakdown divides by unit cost, so a zero unit cost yields all-zero
//! percents rather than a division by zero. Results are plain data consumed
//! by the recalculation pipeline and the freeze snapshot.

use serde::{Deserialize, Serialize};

/// Full pricing result for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchPrices {
    /// Material cost per unit
    pub material_cost: f64,
    /// Machining cost per unit
    pub machining_cost: f64,
    /// Setup cost per unit (amortized)
    pub setup_cost: f64,
    /// External (subcontracted) cost per unit
    pub coop_cost: f64,
    /// Sum of the four components
    pub unit_cost: f64,
    /// Unit cost with margin applied
    pub unit_price: f64,
    /// Unit price × quantity
    pub total_price: f64,
    /// Material share of unit cost, percent rounded to 0.1
    pub material_percent: f64,
    /// Machining share of unit cost, percent rounded to 0.1
    pub machining_percent: f64,
    /// Setup share of unit cost, percent rounded to 0.1
    pub setup_percent: f64,
    /// Coop share of unit cost, percent rounded to 0.1
    pub coop_percent: f64,
}

/// Rounds to one decimal place, the resolution of the percent breakdown.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Share of `component` in `unit_cost` as a percent rounded to 0.1;
/// 0 when the unit cost is 0.
fn percent_of(component: f64, unit_cost: f64) -> f64 {
    if unit_cost == 0.0 {
        return 0.0;
    }
    round1(100.0 * component / unit_cost)
}

/// Computes unit cost, unit price, batch price, and the percent breakdown
/// from per-unit cost components.
///
/// `unit_price = unit_cost × (1 + margin_percent/100)`. A non-positive
/// quantity yields a zero batch total (the guard mirrors the setup-cost
/// division guard upstream).
#[must_use]
pub fn calculate_batch_prices(
    material_cost: f64,
    machining_cost: f64,
    setup_cost: f64,
    coop_cost: f64,
    quantity: i32,
    margin_percent: f64,
) -> BatchPrices {
    let unit_cost = material_cost + machining_cost + setup_cost + coop_cost;
    let unit_price = unit_cost * (1.0 + margin_percent / 100.0);
    let total_price = if quantity > 0 {
        unit_price * f64::from(quantity)
    } else {
        0.0
    };

    BatchPrices {
        material_cost,
        machining_cost,
        setup_cost,
        coop_cost,
        unit_cost,
        unit_price,
        total_price,
        material_percent: percent_of(material_cost, unit_cost),
        machining_percent: percent_of(machining_cost, unit_cost),
        setup_percent: percent_of(setup_cost, unit_cost),
        coop_percent: percent_of(coop_cost, unit_cost),
    }
}

/// Per-unit coop cost with the minimum-price floor applied to the batch total.
///
/// Subcontractors bill at least `minimum_price` per batch: when the priced
/// total falls below the floor, the floor is amortized across the quantity
/// instead. No coop price (≤ 0) means no coop cost.
#[must_use]
pub fn coop_cost_per_unit(coop_price_per_unit: f64, quantity: i32, minimum_price: f64) -> f64 {
    if coop_price_per_unit <= 0.0 || quantity <= 0 {
        return 0.0;
    }
    let batch_total = coop_price_per_unit * f64::from(quantity);
    if batch_total < minimum_price {
        minimum_price / f64::from(quantity)
    } else {
        coop_price_per_unit
    }
}
