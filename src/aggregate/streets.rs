//! Streets ranked by pedestrian and cyclist casualties.

use std::collections::BTreeMap;

use polars::prelude::*;

use crate::aggregate::AggregateError;
use crate::data::cell::{float_values, string_values};
use crate::data::schema;

pub const PEDESTRIAN_INCIDENTS: &str = "PEDESTRIANS INCIDENTS";
pub const CYCLIST_INCIDENTS: &str = "CYCLISTS INCIDENTS";
pub const GENERAL_INCIDENTS: &str = "GENERAL INCIDENTS";

/// Victim totals per street, over the vulnerable-road-user view.
pub struct StreetIncidents {
    view: DataFrame,
}

#[derive(Default, Clone, Copy)]
struct VictimTotals {
    pedestrians_injured: u32,
    pedestrians_killed: u32,
    cyclists_injured: u32,
    cyclists_killed: u32,
}

impl VictimTotals {
    fn pedestrian_incidents(&self) -> u32 {
        self.pedestrians_injured + self.pedestrians_killed
    }

    fn cyclist_incidents(&self) -> u32 {
        self.cyclists_injured + self.cyclists_killed
    }

    fn general_incidents(&self) -> u32 {
        self.pedestrian_incidents() + self.cyclist_incidents()
    }
}

impl StreetIncidents {
    /// Takes the vulnerable-road-user view.
    pub fn new(view: DataFrame) -> Self {
        Self { view }
    }

    /// Summed victim counts per street, sorted by total incidents
    /// descending. Rows without a street name are skipped.
    pub fn incidents_by_street(&self) -> Result<DataFrame, AggregateError> {
        let streets = string_values(&self.view, schema::ON_STREET_NAME)?;
        let pedestrians_injured = float_values(&self.view, schema::PEDESTRIANS_INJURED)?;
        let pedestrians_killed = float_values(&self.view, schema::PEDESTRIANS_KILLED)?;
        let cyclists_injured = float_values(&self.view, schema::CYCLISTS_INJURED)?;
        let cyclists_killed = float_values(&self.view, schema::CYCLISTS_KILLED)?;

        let mut totals: BTreeMap<String, VictimTotals> = BTreeMap::new();
        for i in 0..self.view.height() {
            let Some(street) = &streets[i] else { continue };
            let entry = totals.entry(street.clone()).or_default();
            entry.pedestrians_injured += pedestrians_injured[i].unwrap_or(0.0) as u32;
            entry.pedestrians_killed += pedestrians_killed[i].unwrap_or(0.0) as u32;
            entry.cyclists_injured += cyclists_injured[i].unwrap_or(0.0) as u32;
            entry.cyclists_killed += cyclists_killed[i].unwrap_or(0.0) as u32;
        }

        let mut rows: Vec<(String, VictimTotals)> = totals.into_iter().collect();
        rows.sort_by(|a, b| {
            b.1.general_incidents()
                .cmp(&a.1.general_incidents())
                .then_with(|| a.0.cmp(&b.0))
        });

        let df = DataFrame::new(vec![
            Column::new(
                schema::ON_STREET_NAME.into(),
                rows.iter().map(|(street, _)| street.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                GENERAL_INCIDENTS.into(),
                rows.iter().map(|(_, t)| t.general_incidents()).collect::<Vec<_>>(),
            ),
            Column::new(
                PEDESTRIAN_INCIDENTS.into(),
                rows.iter().map(|(_, t)| t.pedestrian_incidents()).collect::<Vec<_>>(),
            ),
            Column::new(
                CYCLIST_INCIDENTS.into(),
                rows.iter().map(|(_, t)| t.cyclist_incidents()).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::PEDESTRIANS_INJURED.into(),
                rows.iter().map(|(_, t)| t.pedestrians_injured).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::PEDESTRIANS_KILLED.into(),
                rows.iter().map(|(_, t)| t.pedestrians_killed).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::CYCLISTS_INJURED.into(),
                rows.iter().map(|(_, t)| t.cyclists_injured).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::CYCLISTS_KILLED.into(),
                rows.iter().map(|(_, t)| t.cyclists_killed).collect::<Vec<_>>(),
            ),
        ])?;
        Ok(df)
    }

    /// The `n` streets with the most incidents.
    pub fn top_streets(&self, n: usize) -> Result<DataFrame, AggregateError> {
        Ok(self.incidents_by_street()?.head(Some(n)))
    }
}
