//! Tiered price lookup - selects the per-kg price band for an ordered weight.
//!
//! Tiers of a category form weight bands `[min, max)` with an open-ended top
//! tier (`max = None`). Selection picks the first matching band; gaps and
//! overlaps between bands are a reference-data integrity concern and are
//! deliberately not papered over here. A weight outside every band selects
//! nothing, which the costing pipeline prices at zero with a warning.

use crate::entities::material_price_tier;

/// Selects the first tier whose `[min, max)` band contains `total_weight_kg`.
///
/// Returns `None` when the weight falls outside all bands (including an empty
/// tier set).
#[must_use]
pub fn select_tier(
    tiers: &[material_price_tier::Model],
    total_weight_kg: f64,
) -> Option<&material_price_tier::Model> {
    tiers.iter().find(|tier| {
        total_weight_kg >= tier.min_weight_kg
            && tier
                .max_weight_kg
                .is_none_or(|max| total_weight_kg < max)
    })
}

/// Looks up the per-kg price for `total_weight_kg`, `None` when no band matches.
#[must_use]
pub fn price_per_kg(
    tiers: &[material_price_tier::Model],
    total_weight_kg: f64,
) -> Option<f64> {
    select_tier(tiers, total_weight_kg).map(|tier| tier.price_per_kg)
}
