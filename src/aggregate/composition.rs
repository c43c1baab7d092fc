//! Borough and population composition tables over the license-status view.

use std::collections::BTreeMap;

use polars::prelude::*;

use crate::aggregate::AggregateError;
use crate::classify::FactorClass;
use crate::data::cell::string_values;
use crate::data::schema;
use crate::stats::LinearTrend;

/// Label of the single synthetic group in the population-wide variants.
pub const POPULATION_LABEL: &str = "All NYC";

/// X column of the trend points table.
pub const UNLICENSED_SHARE: &str = "Percentage of Unlicensed/Permit Drivers";
/// Y column of the trend points table.
pub const INATTENTION_SHARE: &str = "Percentage of Inattention/Inexperience Collisions";

/// What the grouped table measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Raw row counts ("Number of occurrences").
    Count,
    /// Within-group shares summing to 1.0 ("Percentage of Collisions").
    Percentage,
}

/// Composition of collisions by contributing-factor class and by driver
/// license status, per borough or for the whole population.
///
/// The per-borough and population variants run through the same grouping and
/// normalization code, so the two are directly comparable on one chart.
pub struct CompositionAnalysis {
    view: DataFrame,
}

impl CompositionAnalysis {
    /// Takes the license-status view (vehicles with borough attached).
    pub fn new(view: DataFrame) -> Self {
        Self { view }
    }

    pub fn borough_factor_class_composition(
        &self,
        measure: Measure,
    ) -> Result<DataFrame, AggregateError> {
        let pairs = self.factor_class_pairs(false)?;
        composition_table(pairs, schema::FACTOR_CLASS, measure)
    }

    pub fn population_factor_class_composition(
        &self,
        measure: Measure,
    ) -> Result<DataFrame, AggregateError> {
        let pairs = self.factor_class_pairs(true)?;
        composition_table(pairs, schema::FACTOR_CLASS, measure)
    }

    pub fn borough_license_composition(
        &self,
        measure: Measure,
    ) -> Result<DataFrame, AggregateError> {
        let pairs = self.license_pairs(false)?;
        composition_table(pairs, schema::DRIVER_LICENSE_STATUS, measure)
    }

    pub fn population_license_composition(
        &self,
        measure: Measure,
    ) -> Result<DataFrame, AggregateError> {
        let pairs = self.license_pairs(true)?;
        composition_table(pairs, schema::DRIVER_LICENSE_STATUS, measure)
    }

    /// Per-borough scatter points relating the share of unlicensed/permit
    /// drivers to the share of inattention/inexperience collisions, with the
    /// fitted trend line the renderer draws.
    pub fn license_vs_inattention_trend(&self) -> Result<TrendPoints, AggregateError> {
        let boroughs = string_values(&self.view, schema::BOROUGH)?;
        let statuses = string_values(&self.view, schema::DRIVER_LICENSE_STATUS)?;
        let factor_1 = string_values(&self.view, schema::VEHICLE_FACTOR_1)?;
        let factor_2 = string_values(&self.view, schema::VEHICLE_FACTOR_2)?;

        // per borough: total rows, non-licensed rows, inattention rows
        let mut totals: BTreeMap<String, (u32, u32, u32)> = BTreeMap::new();
        for i in 0..self.view.height() {
            let (Some(borough), Some(status)) = (&boroughs[i], &statuses[i]) else {
                continue;
            };
            let entry = totals.entry(borough.clone()).or_default();
            entry.0 += 1;
            if status != "Licensed" {
                entry.1 += 1;
            }
            let class = FactorClass::classify(factor_1[i].as_deref(), factor_2[i].as_deref());
            if class == FactorClass::InattentionInexperience {
                entry.2 += 1;
            }
        }

        let mut names: Vec<String> = Vec::with_capacity(totals.len());
        let mut xs: Vec<f64> = Vec::with_capacity(totals.len());
        let mut ys: Vec<f64> = Vec::with_capacity(totals.len());
        for (borough, (total, unlicensed, inattention)) in &totals {
            if *total == 0 {
                continue;
            }
            names.push(borough.clone());
            xs.push(f64::from(*unlicensed) / f64::from(*total));
            ys.push(f64::from(*inattention) / f64::from(*total));
        }

        let trend = LinearTrend::fit(&xs, &ys);
        let points = DataFrame::new(vec![
            Column::new(schema::BOROUGH.into(), names),
            Column::new(UNLICENSED_SHARE.into(), xs),
            Column::new(INATTENTION_SHARE.into(), ys),
        ])?;

        Ok(TrendPoints { points, trend })
    }

    fn factor_class_pairs(
        &self,
        population: bool,
    ) -> Result<Vec<(String, String)>, AggregateError> {
        let boroughs = string_values(&self.view, schema::BOROUGH)?;
        let factor_1 = string_values(&self.view, schema::VEHICLE_FACTOR_1)?;
        let factor_2 = string_values(&self.view, schema::VEHICLE_FACTOR_2)?;

        let mut pairs = Vec::with_capacity(self.view.height());
        for i in 0..self.view.height() {
            let Some(borough) = &boroughs[i] else { continue };
            let class = FactorClass::classify(factor_1[i].as_deref(), factor_2[i].as_deref());
            let group = if population {
                POPULATION_LABEL.to_string()
            } else {
                borough.clone()
            };
            pairs.push((group, class.as_str().to_string()));
        }
        Ok(pairs)
    }

    fn license_pairs(&self, population: bool) -> Result<Vec<(String, String)>, AggregateError> {
        let boroughs = string_values(&self.view, schema::BOROUGH)?;
        let statuses = string_values(&self.view, schema::DRIVER_LICENSE_STATUS)?;

        let mut pairs = Vec::with_capacity(self.view.height());
        for i in 0..self.view.height() {
            let (Some(borough), Some(status)) = (&boroughs[i], &statuses[i]) else {
                continue;
            };
            let group = if population {
                POPULATION_LABEL.to_string()
            } else {
                borough.clone()
            };
            pairs.push((group, status.clone()));
        }
        Ok(pairs)
    }
}

/// Per-borough scatter points plus the fitted line.
pub struct TrendPoints {
    pub points: DataFrame,
    pub trend: Option<LinearTrend>,
}

/// Group (group, value) pairs and measure them.
///
/// Percentages are normalized within each group and sum to 1.0 per group.
/// Rows come out sorted by group then value, so identical inputs give
/// identical frames.
fn composition_table(
    pairs: Vec<(String, String)>,
    value_column: &str,
    measure: Measure,
) -> Result<DataFrame, AggregateError> {
    let mut counts: BTreeMap<(String, String), u32> = BTreeMap::new();
    let mut group_totals: BTreeMap<String, u32> = BTreeMap::new();
    for (group, value) in pairs {
        *group_totals.entry(group.clone()).or_default() += 1;
        *counts.entry((group, value)).or_default() += 1;
    }

    let mut groups: Vec<String> = Vec::with_capacity(counts.len());
    let mut values: Vec<String> = Vec::with_capacity(counts.len());
    for (group, value) in counts.keys() {
        groups.push(group.clone());
        values.push(value.clone());
    }

    let measure_column = match measure {
        Measure::Count => {
            let occurrences: Vec<u32> = counts.values().copied().collect();
            Column::new(schema::OCCURRENCES.into(), occurrences)
        }
        Measure::Percentage => {
            let percentages: Vec<f64> = counts
                .iter()
                .map(|((group, _), count)| f64::from(*count) / f64::from(group_totals[group]))
                .collect();
            Column::new(schema::PERCENTAGE.into(), percentages)
        }
    };

    let df = DataFrame::new(vec![
        Column::new(schema::BOROUGH.into(), groups),
        Column::new(value_column.into(), values),
        measure_column,
    ])?;
    Ok(df)
}
