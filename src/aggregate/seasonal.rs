//! Monthly counts of impairment-related collisions.

use std::collections::BTreeMap;

use polars::prelude::*;

use crate::aggregate::AggregateError;
use crate::classify::{month_name, month_ordinal};
use crate::data::cell::string_values;
use crate::data::schema;

/// The dataset spells the drug factor with both capitalizations.
const DRUG_FACTORS: [&str; 2] = ["Drugs (Illegal)", "Drugs (illegal)"];
const ALCOHOL_FACTORS: [&str; 1] = ["Alcohol Involvement"];

pub const MONTH: &str = "MONTH";
pub const DRUG_ACCIDENTS: &str = "Drug Accidents";
pub const ALCOHOL_ACCIDENTS: &str = "Alcohol Accidents";

/// Seasonal profile of collisions whose first factor slot names drug or
/// alcohol involvement.
pub struct SeasonalImpairment {
    crashes: DataFrame,
}

impl SeasonalImpairment {
    /// Takes the raw collisions table.
    pub fn new(crashes: DataFrame) -> Self {
        Self { crashes }
    }

    /// Per-month drug and alcohol collision counts, calendar-ordered.
    ///
    /// Months observed for only one of the two series are dropped; rows with
    /// unparseable dates are skipped.
    pub fn monthly_counts(&self) -> Result<DataFrame, AggregateError> {
        let dates = string_values(&self.crashes, schema::CRASH_DATE)?;
        let factors = string_values(&self.crashes, schema::CRASH_FACTOR_SLOTS[0])?;

        let mut drug_counts: BTreeMap<&'static str, u32> = BTreeMap::new();
        let mut alcohol_counts: BTreeMap<&'static str, u32> = BTreeMap::new();
        for i in 0..self.crashes.height() {
            let Some(factor) = factors[i].as_deref() else {
                continue;
            };
            let is_drug = DRUG_FACTORS.contains(&factor);
            let is_alcohol = ALCOHOL_FACTORS.contains(&factor);
            if !is_drug && !is_alcohol {
                continue;
            }
            let Some(month) = dates[i].as_deref().and_then(month_name) else {
                continue;
            };
            if is_drug {
                *drug_counts.entry(month).or_default() += 1;
            } else {
                *alcohol_counts.entry(month).or_default() += 1;
            }
        }

        let mut months: Vec<&'static str> = drug_counts
            .keys()
            .filter(|month| alcohol_counts.contains_key(*month))
            .copied()
            .collect();
        months.sort_by_key(|month| month_ordinal(month));

        let drugs: Vec<u32> = months.iter().map(|month| drug_counts[month]).collect();
        let alcohol: Vec<u32> = months.iter().map(|month| alcohol_counts[month]).collect();

        let df = DataFrame::new(vec![
            Column::new(MONTH.into(), months),
            Column::new(DRUG_ACCIDENTS.into(), drugs),
            Column::new(ALCOHOL_ACCIDENTS.into(), alcohol),
        ])?;
        Ok(df)
    }
}
