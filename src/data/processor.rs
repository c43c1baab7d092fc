//! Join Engine Module
//! Builds the joined and projected views the classifiers and aggregators consume.

use polars::prelude::*;
use thiserror::Error;

use crate::data::cell::float_values;
use crate::data::schema;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Produces the per-analysis views of the source tables.
///
/// Every view guarantees that columns used as grouping keys downstream carry
/// no nulls; rows that cannot satisfy that are dropped here, with the drop
/// counts logged as data-quality metrics.
pub struct ViewBuilder;

impl ViewBuilder {
    /// Vehicle rows with the borough of their collision attached.
    ///
    /// Left-joins the vehicles table onto the {identifier, borough} projection
    /// of the collisions table, then drops rows missing a license status or a
    /// borough. An unmatched vehicle row surfaces as a null borough and falls
    /// to the same drop: it cannot be attributed to a geography.
    pub fn license_status_view(
        crashes: &DataFrame,
        vehicles: &DataFrame,
    ) -> Result<DataFrame, ProcessorError> {
        let collision_boroughs = crashes
            .clone()
            .lazy()
            .select([col(schema::COLLISION_ID), col(schema::BOROUGH)]);

        let view = vehicles
            .clone()
            .lazy()
            .select([
                col(schema::COLLISION_ID),
                col(schema::DRIVER_LICENSE_STATUS),
                col(schema::VEHICLE_FACTOR_1),
                col(schema::VEHICLE_FACTOR_2),
            ])
            .join(
                collision_boroughs,
                [col(schema::COLLISION_ID)],
                [col(schema::COLLISION_ID)],
                JoinArgs::new(JoinType::Left),
            )
            .filter(
                col(schema::DRIVER_LICENSE_STATUS)
                    .is_not_null()
                    .and(col(schema::BOROUGH).is_not_null()),
            )
            .collect()?;

        log::debug!(
            "license status view: kept {} of {} vehicle rows",
            view.height(),
            vehicles.height()
        );
        Ok(view)
    }

    /// Crash time plus the five contributing-factor slots.
    ///
    /// Rows missing the time or the first factor slot are dropped (the
    /// dataset never populates later slots when the first is absent), and so
    /// is any row carrying the literal "Unspecified" in any slot. Null later
    /// slots are not "Unspecified" and are kept.
    pub fn crash_period_view(crashes: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let mut projection = vec![col(schema::CRASH_TIME)];
        projection.extend(schema::CRASH_FACTOR_SLOTS.iter().map(|slot| col(*slot)));

        let mut lf = crashes.clone().lazy().select(projection).filter(
            col(schema::CRASH_TIME)
                .is_not_null()
                .and(col(schema::CRASH_FACTOR_SLOTS[0]).is_not_null()),
        );
        for slot in schema::CRASH_FACTOR_SLOTS {
            lf = lf.filter(
                col(slot)
                    .is_null()
                    .or(col(slot).neq(lit("Unspecified"))),
            );
        }

        let view = lf.collect()?;
        log::debug!(
            "crash period view: kept {} of {} collision rows",
            view.height(),
            crashes.height()
        );
        Ok(view)
    }

    /// Collisions that injured or killed a pedestrian or cyclist, restricted
    /// to rows with usable coordinates.
    ///
    /// Expects the geolocation-repaired collisions frame; this is where the
    /// no-coordinates rows the repair stage left null finally drop out.
    /// Latitude 0 marks the dataset's known placeholder points and is treated
    /// as unusable.
    pub fn vulnerable_road_user_view(crashes: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let mut victim_counts = Vec::with_capacity(schema::VICTIM_COUNT_COLUMNS.len());
        for name in schema::VICTIM_COUNT_COLUMNS {
            victim_counts.push(float_values(crashes, name)?);
        }
        let latitudes = float_values(crashes, schema::LATITUDE)?;
        let longitudes = float_values(crashes, schema::LONGITUDE)?;

        let mut mask = Vec::with_capacity(crashes.height());
        for i in 0..crashes.height() {
            let involved = victim_counts
                .iter()
                .any(|counts| matches!(counts[i], Some(count) if count != 0.0));
            let located =
                matches!(latitudes[i], Some(lat) if lat != 0.0) && longitudes[i].is_some();
            mask.push(involved && located);
        }

        let view = crashes.filter(&BooleanChunked::from_slice("mask".into(), &mask))?;
        log::debug!(
            "vulnerable road user view: kept {} of {} collision rows",
            view.height(),
            crashes.height()
        );
        Ok(view)
    }
}
