//! Material cost orchestration - stock geometry plus tiered pricing.
//!
//! Computes the per-unit material cost of a part from its non-deleted
//! material inputs. The per-kg price of each input is chosen by the total
//! ordered weight (per-unit weight × batch quantity), so larger batches reach
//! cheaper tiers. Incomplete reference data degrades to a zero-cost input
//! with a warning instead of failing the pipeline.

use crate::{
    core::{geometry, tiers},
    entities::{material_input, material_price_tier},
    errors::{Error, Result},
};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::warn;

/// Weight and cost of one stock position, per single part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockCost {
    /// Stock weight per part in kg
    pub weight_kg: f64,
    /// Material cost per part
    pub cost: f64,
}

/// Prices one material input against its category's tiers (pure).
///
/// `order_weight_kg` is the total weight across the whole order and drives
/// tier selection; the returned cost covers one part. No matching tier prices
/// the input at zero.
///
/// # Errors
/// Propagates [`Error::InvalidGeometry`] from the geometry calculator.
pub fn calculate_stock_cost(
    input: &material_input::Model,
    tier_set: &[material_price_tier::Model],
    order_weight_kg: f64,
) -> Result<StockCost> {
    let geometry = geometry::stock_geometry(input)?;
    let pieces = f64::from(input.quantity_per_part.max(0));
    let weight_kg = geometry.weight_kg * pieces;
    let cost = tiers::price_per_kg(tier_set, order_weight_kg)
        .map_or(0.0, |price| weight_kg * price);
    Ok(StockCost { weight_kg, cost })
}

/// Computes the per-unit material cost of a part for a batch of
/// `batch_quantity` units.
///
/// Inputs with missing price categories, missing tiers, or invalid geometry
/// contribute zero and are logged; they never abort the calculation.
pub async fn part_material_cost<C>(
    db: &C,
    part_id: i64,
    batch_quantity: i32,
) -> Result<f64>
where
    C: ConnectionTrait,
{
    let inputs = material_input::Entity::find()
        .filter(material_input::Column::PartId.eq(part_id))
        .filter(material_input::Column::DeletedAt.is_null())
        .all(db)
        .await?;

    let mut total = 0.0;
    for input in &inputs {
        let Some(category_id) = input.price_category_id else {
            warn!(
                material_input_id = input.id,
                "material input has no price category, priced at 0"
            );
            continue;
        };

        let tier_set = material_price_tier::Entity::find()
            .filter(material_price_tier::Column::CategoryId.eq(category_id))
            .order_by_asc(material_price_tier::Column::MinWeightKg)
            .all(db)
            .await?;
        if tier_set.is_empty() {
            warn!(
                material_input_id = input.id,
                category_id, "price category has no tiers, priced at 0"
            );
            continue;
        }

        // Tier selection uses the weight of the whole order.
        let per_part = match geometry::stock_geometry(input) {
            Ok(g) => g.weight_kg * f64::from(input.quantity_per_part.max(0)),
            Err(Error::InvalidGeometry { shape, field }) => {
                warn!(
                    material_input_id = input.id,
                    shape, field, "invalid stock geometry, priced at 0"
                );
                continue;
            }
            Err(e) => return Err(e),
        };
        let order_weight = per_part * f64::from(batch_quantity.max(0));

        match tiers::price_per_kg(&tier_set, order_weight) {
            Some(price) => total += per_part * price,
            None => {
                warn!(
                    material_input_id = input.id,
                    order_weight, "no price tier matches order weight, priced at 0"
                );
            }
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::StockShape;
    use crate::test_utils::*;

    #[test]
    fn test_calculate_stock_cost_round_bar() {
        // 0.1578 kg per piece, 2 pieces per part, 38/kg
        let input = material_input_model(StockShape::RoundBar, |m| {
            m.diameter_mm = Some(16.0);
            m.length_mm = Some(100.0);
            m.density_kg_cm3 = 0.00785;
            m.quantity_per_part = 2;
        });
        let tier_set = vec![tier_model(1, 0.0, None, 38.0)];

        let stock = calculate_stock_cost(&input, &tier_set, 100.0).unwrap();
        assert!((stock.weight_kg - 0.3157).abs() < 0.001);
        assert!((stock.cost - stock.weight_kg * 38.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_stock_cost_no_matching_tier_is_zero() {
        let input = material_input_model(StockShape::RoundBar, |m| {
            m.diameter_mm = Some(16.0);
            m.length_mm = Some(100.0);
        });
        // Tiers start above the order weight
        let tier_set = vec![tier_model(1, 500.0, None, 38.0)];

        let stock = calculate_stock_cost(&input, &tier_set, 10.0).unwrap();
        assert!(stock.weight_kg > 0.0);
        assert_eq!(stock.cost, 0.0);
    }

    #[tokio::test]
    async fn test_part_material_cost_uses_order_weight_for_tier() -> crate::errors::Result<()> {
        let (db, part) = setup_with_part().await?;
        // 45/kg below 10 kg ordered, 38/kg from 10 kg up
        let category =
            create_test_category_with_tiers(&db, &[(0.0, Some(10.0), 45.0), (10.0, None, 38.0)])
                .await?;
        // ≈ 0.1578 kg per part
        create_test_material_input(&db, part.id, Some(category.id)).await?;

        // 10 units ≈ 1.58 kg ordered: first tier
        let small = part_material_cost(&db, part.id, 10).await?;
        assert!((small - 0.157_833_6 * 45.0).abs() < 0.01);

        // 100 units ≈ 15.8 kg ordered: cheaper tier, same per-unit weight
        let large = part_material_cost(&db, part.id, 100).await?;
        assert!((large - 0.157_833_6 * 38.0).abs() < 0.01);
        assert!(large < small);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_category_priced_at_zero() -> crate::errors::Result<()> {
        let (db, part) = setup_with_part().await?;
        create_test_material_input(&db, part.id, None).await?;

        assert_eq!(part_material_cost(&db, part.id, 10).await?, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_geometry_priced_at_zero() -> crate::errors::Result<()> {
        let (db, part) = setup_with_part().await?;
        let category = create_test_category_with_tiers(&db, &[(0.0, None, 40.0)]).await?;
        let input = create_test_material_input(&db, part.id, Some(category.id)).await?;
        clear_test_input_length(&db, input.id).await?;

        assert_eq!(part_material_cost(&db, part.id, 10).await?, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_soft_deleted_input_excluded() -> crate::errors::Result<()> {
        let (db, part) = setup_with_part().await?;
        let category = create_test_category_with_tiers(&db, &[(0.0, None, 40.0)]).await?;
        let input = create_test_material_input(&db, part.id, Some(category.id)).await?;

        let before = part_material_cost(&db, part.id, 10).await?;
        assert!(before > 0.0);

        crate::core::part::soft_delete_material_input(&db, input.id, input.version).await?;
        assert_eq!(part_material_cost(&db, part.id, 10).await?, 0.0);
        Ok(())
    }
}
