//! Stock geometry calculator - volume and weight from shape and dimensions.
//!
//! Each stock shape has its own volume formula over the dimensions stored on a
//! material input. Dimensions are nullable in the database, so every formula
//! first extracts the dimensions its shape requires; a missing or non-positive
//! required dimension yields [`Error::InvalidGeometry`] naming the offending
//! field. The costing pipeline recovers from that error by pricing the input
//! at zero and logging a warning - it never aborts a recalculation.

use crate::{
    entities::{StockShape, material_input},
    errors::{Error, Result},
};

/// Volume and weight of one piece of stock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockGeometry {
    /// Stock volume in mm³
    pub volume_mm3: f64,
    /// Stock weight in kg
    pub weight_kg: f64,
}

/// Extracts a required dimension, rejecting missing and non-positive values.
fn require(
    value: Option<f64>,
    shape: StockShape,
    field: &'static str,
) -> Result<f64> {
    match value {
        Some(v) if v > 0.0 => Ok(v),
        _ => Err(Error::InvalidGeometry {
            shape: shape.as_str(),
            field,
        }),
    }
}

/// Computes the stock volume in mm³ for the input's shape and dimensions.
///
/// Formulas per shape:
/// - round bar: `π·(d/2)²·L`
/// - tube: `π·((d/2)² − (d/2 − wall)²)·L`
/// - plate: `width·thickness·length`
/// - square bar: `width²·length`
///
/// # Errors
/// Returns [`Error::InvalidGeometry`] when a required dimension is missing or
/// non-positive, or when a tube's wall thickness reaches half the diameter.
pub fn volume_mm3(input: &material_input::Model) -> Result<f64> {
    let shape = input.shape;
    match shape {
        StockShape::RoundBar => {
            let diameter = require(input.diameter_mm, shape, "diameter_mm")?;
            let length = require(input.length_mm, shape, "length_mm")?;
            let radius = diameter / 2.0;
            Ok(std::f64::consts::PI * radius * radius * length)
        }
        StockShape::Tube => {
            let diameter = require(input.diameter_mm, shape, "diameter_mm")?;
            let wall = require(input.wall_thickness_mm, shape, "wall_thickness_mm")?;
            let length = require(input.length_mm, shape, "length_mm")?;
            let outer = diameter / 2.0;
            let inner = outer - wall;
            if inner <= 0.0 {
                // A "tube" whose wall meets the axis is bad data, not a solid bar.
                return Err(Error::InvalidGeometry {
                    shape: shape.as_str(),
                    field: "wall_thickness_mm",
                });
            }
            Ok(std::f64::consts::PI * (outer * outer - inner * inner) * length)
        }
        StockShape::Plate => {
            let width = require(input.width_mm, shape, "width_mm")?;
            let thickness = require(input.thickness_mm, shape, "thickness_mm")?;
            let length = require(input.length_mm, shape, "length_mm")?;
            Ok(width * thickness * length)
        }
        StockShape::SquareBar => {
            let width = require(input.width_mm, shape, "width_mm")?;
            let length = require(input.length_mm, shape, "length_mm")?;
            Ok(width * width * length)
        }
    }
}

/// Computes volume and weight for one piece of stock.
///
/// Weight converts the mm³ volume to cm³ before applying the density
/// (kg/cm³): `weight_kg = volume_mm3 / 1000 × density`.
///
/// # Errors
/// Propagates [`Error::InvalidGeometry`] from [`volume_mm3`].
pub fn stock_geometry(input: &material_input::Model) -> Result<StockGeometry> {
    let volume = volume_mm3(input)?;
    Ok(StockGeometry {
        volume_mm3: volume,
        weight_kg: volume / 1000.0 * input.density_kg_cm3,
    })
}
