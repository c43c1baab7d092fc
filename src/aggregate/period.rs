//! Time-bucketed contributing-factor frequencies over the crash-period view.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;

use crate::aggregate::AggregateError;
use crate::classify::TimeOfDay;
use crate::data::cell::string_values;
use crate::data::schema;

/// How many factors per time bucket count as "leading".
const TOP_FACTORS_PER_BUCKET: usize = 5;

/// Frequency of contributing factors across the four blocks of the day.
pub struct PeriodFactorTrends {
    view: DataFrame,
}

impl PeriodFactorTrends {
    /// Takes the crash-period view ({crash time, five factor slots}).
    pub fn new(view: DataFrame) -> Self {
        Self { view }
    }

    /// One {time-of-day, factor} count table per factor slot, keeping each
    /// slot's original column name. Rows whose time is unclassifiable are
    /// skipped, as are empty slots.
    pub fn factor_counts_by_slot(&self) -> Result<Vec<DataFrame>, AggregateError> {
        let mut tables = Vec::with_capacity(schema::CRASH_FACTOR_SLOTS.len());
        for slot in schema::CRASH_FACTOR_SLOTS {
            let counts = self.slot_counts(slot)?;
            tables.push(counts_frame(&counts, slot)?);
        }
        Ok(tables)
    }

    /// The five slot tables under a common factor column name, concatenated,
    /// with duplicate {factor, time-of-day} pairs summed: a factor mentioned
    /// as slot 1 in one collision and slot 3 in another lands in one count.
    pub fn combined_factor_frequency(&self) -> Result<DataFrame, AggregateError> {
        let combined = self.combined_counts()?;
        combined_frame(&combined)
    }

    /// The combined frequency restricted to the union of each bucket's top
    /// factors. A factor that is top-5 in just one bucket keeps its rows in
    /// every bucket, so a chart can follow the same factor across the day.
    pub fn leading_factor_frequency(&self) -> Result<DataFrame, AggregateError> {
        let combined = self.combined_counts()?;

        let mut leading: BTreeSet<String> = BTreeSet::new();
        for bucket in TimeOfDay::ALL {
            let mut bucket_counts: Vec<(&String, u32)> = combined
                .iter()
                .filter(|((_, time), _)| *time == bucket)
                .map(|((factor, _), count)| (factor, *count))
                .collect();
            bucket_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            leading.extend(
                bucket_counts
                    .iter()
                    .take(TOP_FACTORS_PER_BUCKET)
                    .map(|(factor, _)| (*factor).clone()),
            );
        }

        let filtered: BTreeMap<(String, TimeOfDay), u32> = combined
            .into_iter()
            .filter(|((factor, _), _)| leading.contains(factor))
            .collect();
        combined_frame(&filtered)
    }

    /// Replace the occurrence column with its natural log, for renderers that
    /// plot on a compressed scale. Counts are >= 1 by construction.
    pub fn with_log_occurrences(table: &DataFrame) -> Result<DataFrame, AggregateError> {
        let cast = table.column(schema::OCCURRENCES)?.cast(&DataType::Float64)?;
        let ca = cast.f64()?;
        let logged: Vec<Option<f64>> = ca.into_iter().map(|v| v.map(f64::ln)).collect();

        let mut result = table.clone();
        result.with_column(Column::new(schema::OCCURRENCES.into(), logged))?;
        Ok(result)
    }

    fn slot_counts(
        &self,
        slot: &str,
    ) -> Result<BTreeMap<(TimeOfDay, String), u32>, AggregateError> {
        let times = string_values(&self.view, schema::CRASH_TIME)?;
        let factors = string_values(&self.view, slot)?;

        let mut counts: BTreeMap<(TimeOfDay, String), u32> = BTreeMap::new();
        for i in 0..self.view.height() {
            let Some(time) = &times[i] else { continue };
            let Some(bucket) = TimeOfDay::from_clock_text(time) else {
                continue;
            };
            let Some(factor) = &factors[i] else { continue };
            *counts.entry((bucket, factor.clone())).or_default() += 1;
        }
        Ok(counts)
    }

    fn combined_counts(&self) -> Result<BTreeMap<(String, TimeOfDay), u32>, AggregateError> {
        let mut combined: BTreeMap<(String, TimeOfDay), u32> = BTreeMap::new();
        for slot in schema::CRASH_FACTOR_SLOTS {
            for ((bucket, factor), count) in self.slot_counts(slot)? {
                *combined.entry((factor, bucket)).or_default() += count;
            }
        }
        Ok(combined)
    }
}

/// Build a per-slot count frame ordered by bucket then factor.
fn counts_frame(
    counts: &BTreeMap<(TimeOfDay, String), u32>,
    factor_column: &str,
) -> Result<DataFrame, AggregateError> {
    let mut times: Vec<&'static str> = Vec::with_capacity(counts.len());
    let mut factors: Vec<String> = Vec::with_capacity(counts.len());
    let mut occurrences: Vec<u32> = Vec::with_capacity(counts.len());
    for ((bucket, factor), count) in counts {
        times.push(bucket.as_str());
        factors.push(factor.clone());
        occurrences.push(*count);
    }

    let df = DataFrame::new(vec![
        Column::new(schema::TIME_OF_DAY.into(), times),
        Column::new(factor_column.into(), factors),
        Column::new(schema::OCCURRENCES.into(), occurrences),
    ])?;
    Ok(df)
}

/// Build the combined frame ordered by factor then bucket.
fn combined_frame(
    counts: &BTreeMap<(String, TimeOfDay), u32>,
) -> Result<DataFrame, AggregateError> {
    let mut factors: Vec<String> = Vec::with_capacity(counts.len());
    let mut times: Vec<&'static str> = Vec::with_capacity(counts.len());
    let mut occurrences: Vec<u32> = Vec::with_capacity(counts.len());
    for ((factor, bucket), count) in counts {
        factors.push(factor.clone());
        times.push(bucket.as_str());
        occurrences.push(*count);
    }

    let df = DataFrame::new(vec![
        Column::new(schema::CONTRIBUTING_FACTOR.into(), factors),
        Column::new(schema::TIME_OF_DAY.into(), times),
        Column::new(schema::OCCURRENCES.into(), occurrences),
    ])?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cell::{float_values, string_values};
    use crate::data::ViewBuilder;

    fn period_view(rows: Vec<(&str, [Option<&str>; 5])>) -> DataFrame {
        let times: Vec<&str> = rows.iter().map(|(time, _)| *time).collect();
        let mut columns = vec![Column::new(schema::CRASH_TIME.into(), times)];
        for (slot_index, slot) in schema::CRASH_FACTOR_SLOTS.iter().enumerate() {
            let values: Vec<Option<&str>> = rows.iter().map(|(_, slots)| slots[slot_index]).collect();
            columns.push(Column::new((*slot).into(), values));
        }
        DataFrame::new(columns).unwrap()
    }

    fn occurrences_for(table: &DataFrame, factor: &str, time: &str) -> Option<f64> {
        let factors = string_values(table, schema::CONTRIBUTING_FACTOR).unwrap();
        let times = string_values(table, schema::TIME_OF_DAY).unwrap();
        let occurrences = float_values(table, schema::OCCURRENCES).unwrap();
        (0..table.height())
            .find(|&i| factors[i].as_deref() == Some(factor) && times[i].as_deref() == Some(time))
            .and_then(|i| occurrences[i])
    }

    #[test]
    fn combined_counts_sum_across_slots_after_the_unspecified_filter() {
        // five collisions; two carry "Unspecified" first slots and fall to
        // the join engine's filter before aggregation
        let crashes = period_view(vec![
            ("8:00", [Some("Driver Inattention/Distraction"), None, None, None, None]),
            ("9:00", [Some("Unspecified"), None, None, None, None]),
            ("10:00", [Some("Unspecified"), None, None, None, None]),
            ("8:30", [Some("Driver Inattention/Distraction"), None, None, None, None]),
            ("9:45", [Some("Pavement Slippery"), None, None, None, None]),
        ]);
        let view = ViewBuilder::crash_period_view(&crashes).unwrap();

        let combined = PeriodFactorTrends::new(view).combined_factor_frequency().unwrap();

        assert_eq!(
            occurrences_for(&combined, "Driver Inattention/Distraction", "morning"),
            Some(2.0)
        );
        assert_eq!(
            occurrences_for(&combined, "Pavement Slippery", "morning"),
            Some(1.0)
        );
        assert_eq!(occurrences_for(&combined, "Unspecified", "morning"), None);
    }

    #[test]
    fn per_slot_tables_keep_their_slot_column() {
        let view = period_view(vec![
            ("8:00", [Some("Alcohol Involvement"), Some("Pavement Slippery"), None, None, None]),
            ("8:30", [Some("Alcohol Involvement"), None, None, None, None]),
        ]);

        let tables = PeriodFactorTrends::new(view).factor_counts_by_slot().unwrap();

        assert_eq!(tables.len(), 5);
        let slot_1 = &tables[0];
        let factors = string_values(slot_1, schema::CRASH_FACTOR_SLOTS[0]).unwrap();
        let occurrences = float_values(slot_1, schema::OCCURRENCES).unwrap();
        assert_eq!(factors[0].as_deref(), Some("Alcohol Involvement"));
        assert_eq!(occurrences[0], Some(2.0));
        // slot 2 saw one factor, slots 3-5 none
        assert_eq!(tables[1].height(), 1);
        assert_eq!(tables[4].height(), 0);
    }

    #[test]
    fn rerunning_yields_identical_tables() {
        let view = period_view(vec![
            ("8:00", [Some("Alcohol Involvement"), None, None, None, None]),
            ("20:00", [Some("Pavement Slippery"), None, None, None, None]),
        ]);
        let trends = PeriodFactorTrends::new(view);

        let first = trends.combined_factor_frequency().unwrap();
        let second = trends.combined_factor_frequency().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn factors_in_later_slots_join_the_same_count() {
        let view = period_view(vec![
            ("7:00", [Some("Alcohol Involvement"), None, None, None, None]),
            ("7:30", [Some("Pavement Slippery"), None, Some("Alcohol Involvement"), None, None]),
        ]);

        let combined = PeriodFactorTrends::new(view).combined_factor_frequency().unwrap();

        assert_eq!(
            occurrences_for(&combined, "Alcohol Involvement", "morning"),
            Some(2.0)
        );
    }

    #[test]
    fn unclassifiable_times_are_skipped_not_fatal() {
        let view = period_view(vec![
            ("abc:00", [Some("Alcohol Involvement"), None, None, None, None]),
            ("25:00", [Some("Alcohol Involvement"), None, None, None, None]),
            ("3:10", [Some("Alcohol Involvement"), None, None, None, None]),
        ]);

        let combined = PeriodFactorTrends::new(view).combined_factor_frequency().unwrap();

        assert_eq!(combined.height(), 1);
        assert_eq!(
            occurrences_for(&combined, "Alcohol Involvement", "late_night"),
            Some(1.0)
        );
    }

    #[test]
    fn a_factor_leading_in_one_bucket_is_kept_in_all_buckets() {
        let mut rows: Vec<(&str, [Option<&str>; 5])> = Vec::new();
        // night: six factors; "Fatigued/Drowsy" trails with a single mention
        for factor in ["Alcohol Involvement", "Backing Unsafely", "Driver Inexperience", "Following Too Closely", "Pavement Slippery"] {
            for _ in 0..3 {
                rows.push(("20:00", [Some(factor), None, None, None, None]));
            }
        }
        rows.push(("20:00", [Some("Fatigued/Drowsy"), None, None, None, None]));
        // a straggler that never makes any bucket's top five
        rows.push(("20:30", [Some("Oversized Vehicle"), None, None, None, None]));
        // morning: "Fatigued/Drowsy" dominates
        rows.push(("8:00", [Some("Fatigued/Drowsy"), None, None, None, None]));
        rows.push(("8:30", [Some("Fatigued/Drowsy"), None, None, None, None]));

        let leading = PeriodFactorTrends::new(period_view(rows))
            .leading_factor_frequency()
            .unwrap();

        // not top-5 at night, but top-5 in the morning keeps its night row
        assert_eq!(occurrences_for(&leading, "Fatigued/Drowsy", "night"), Some(1.0));
        assert_eq!(occurrences_for(&leading, "Fatigued/Drowsy", "morning"), Some(2.0));
        // leading nowhere: filtered out everywhere
        assert_eq!(occurrences_for(&leading, "Oversized Vehicle", "night"), None);
    }

    #[test]
    fn log_variant_maps_counts_through_ln() {
        let view = period_view(vec![
            ("8:00", [Some("Alcohol Involvement"), None, None, None, None]),
            ("8:30", [Some("Alcohol Involvement"), None, None, None, None]),
        ]);
        let combined = PeriodFactorTrends::new(view).combined_factor_frequency().unwrap();

        let logged = PeriodFactorTrends::with_log_occurrences(&combined).unwrap();

        let values = float_values(&logged, schema::OCCURRENCES).unwrap();
        assert!((values[0].unwrap() - 2.0f64.ln()).abs() < 1e-12);
    }
}
