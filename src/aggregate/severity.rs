//! Seat-position severity tally over the persons table.
//!
//! The hypothesis under study: which seat is most dangerous when no safety
//! equipment is used. Null safety equipment specifically denotes "no
//! equipment used"; explicit "Unknown"/"Other" values are uninformative and
//! excluded before the null filter is applied.

use std::collections::BTreeMap;

use polars::prelude::*;

use crate::aggregate::AggregateError;
use crate::classify::canonical_position;
use crate::data::cell::string_values;
use crate::data::schema;

/// Complaint values with permanent, life-altering consequences.
const SERIOUS_COMPLAINTS: [&str; 5] = [
    "Amputation",
    "Paralysis",
    "Severe Burn",
    "Severe Lacerations",
    "Severe Bleeding",
];

/// Non-fatal but requiring medical intervention.
const MODERATE_COMPLAINTS: [&str; 4] = [
    "Moderate Burn",
    "Fracture - Dislocation",
    "Internal",
    "Fracture - Distorted - Dislocation",
];

/// Treatable without extensive care.
const MINOR_COMPLAINTS: [&str; 10] = [
    "Minor Burn",
    "Crush Injuries",
    "Concussion",
    "Whiplash",
    "Abrasion",
    "Contusion - Bruise",
    "Minor Bleeding",
    "None Visible",
    "Complaint of Pain",
    "Complaint of Pain or Nausea",
];

const OUT_OF_VEHICLE_TYPES: [&str; 2] = ["Bicyclist", "Pedestrian"];
const UNINFORMATIVE_EQUIPMENT: [&str; 2] = ["Unknown", "Other"];
const UNINFORMATIVE_COMPLAINTS: [&str; 2] = ["Does Not Apply", "Unknown"];
const UNRESOLVED_POSITIONS: [&str; 3] = ["Unknown", "Does Not Apply", "nan"];

/// Severity of collisions by seat position, for occupants without safety
/// equipment.
pub struct SeatPositionSeverity {
    persons: DataFrame,
}

impl SeatPositionSeverity {
    /// Takes the raw persons table; filtering happens here.
    pub fn new(persons: DataFrame) -> Self {
        Self { persons }
    }

    /// The hypothesis population: in-vehicle occupants with a known position,
    /// an informative complaint, and no safety equipment in use.
    ///
    /// Pedestrians and bicyclists are out-of-vehicle by construction and
    /// excluded; so are rows whose equipment, complaint, or position fields
    /// are explicit but uninformative. Of what remains, only rows with a
    /// *null* equipment field (no equipment used) are kept.
    pub fn unbelted_occupants(&self) -> Result<DataFrame, AggregateError> {
        let person_types = string_values(&self.persons, schema::PERSON_TYPE)?;
        let equipment = string_values(&self.persons, schema::SAFETY_EQUIPMENT)?;
        let complaints = string_values(&self.persons, schema::COMPLAINT)?;
        let positions = string_values(&self.persons, schema::POSITION_IN_VEHICLE)?;

        let mut mask = Vec::with_capacity(self.persons.height());
        for i in 0..self.persons.height() {
            let in_vehicle = !matches!(
                person_types[i].as_deref(),
                Some(person_type) if OUT_OF_VEHICLE_TYPES.contains(&person_type)
            );
            let informative_complaint = !matches!(
                complaints[i].as_deref(),
                Some(complaint) if UNINFORMATIVE_COMPLAINTS.contains(&complaint)
            );
            let known_position = matches!(
                positions[i].as_deref(),
                Some(position) if !UNRESOLVED_POSITIONS.contains(&position)
            );
            // null means no equipment used; explicit "Unknown"/"Other" is a
            // separate exclusion, not a synonym for null
            let uninformative_equipment = matches!(
                equipment[i].as_deref(),
                Some(value) if UNINFORMATIVE_EQUIPMENT.contains(&value)
            );
            let no_equipment_used = equipment[i].is_none() && !uninformative_equipment;

            mask.push(in_vehicle && informative_complaint && known_position && no_equipment_used);
        }

        let filtered = self
            .persons
            .filter(&BooleanChunked::from_slice("mask".into(), &mask))?;
        log::debug!(
            "unbelted occupant filter: kept {} of {} person rows",
            filtered.height(),
            self.persons.height()
        );
        Ok(filtered)
    }

    /// {canonical position -> [Serious, Moderate, Minor]} counts.
    ///
    /// Each row lands in exactly one tier: a death outcome always forces
    /// Serious regardless of the complaint text, then the complaint
    /// vocabularies are checked in severity order. Complaints outside every
    /// vocabulary are left uncounted.
    pub fn tally(&self) -> Result<DataFrame, AggregateError> {
        let occupants = self.unbelted_occupants()?;
        let injuries = string_values(&occupants, schema::PERSON_INJURY)?;
        let complaints = string_values(&occupants, schema::COMPLAINT)?;
        let positions = string_values(&occupants, schema::POSITION_IN_VEHICLE)?;

        let mut counts: BTreeMap<String, [u32; 3]> = BTreeMap::new();
        for i in 0..occupants.height() {
            let Some(position) = &positions[i] else { continue };
            let tiers = counts
                .entry(canonical_position(position).to_string())
                .or_default();

            let complaint = complaints[i].as_deref();
            if injuries[i].as_deref() == Some("Killed") {
                tiers[0] += 1;
            } else if matches!(complaint, Some(c) if SERIOUS_COMPLAINTS.contains(&c)) {
                tiers[0] += 1;
            } else if matches!(complaint, Some(c) if MODERATE_COMPLAINTS.contains(&c)) {
                tiers[1] += 1;
            } else if matches!(complaint, Some(c) if MINOR_COMPLAINTS.contains(&c)) {
                tiers[2] += 1;
            }
        }

        let mut labels: Vec<String> = Vec::with_capacity(counts.len());
        let mut serious: Vec<u32> = Vec::with_capacity(counts.len());
        let mut moderate: Vec<u32> = Vec::with_capacity(counts.len());
        let mut minor: Vec<u32> = Vec::with_capacity(counts.len());
        for (position, tiers) in &counts {
            labels.push(position.clone());
            serious.push(tiers[0]);
            moderate.push(tiers[1]);
            minor.push(tiers[2]);
        }

        let df = DataFrame::new(vec![
            Column::new(schema::POSITION_IN_VEHICLE.into(), labels),
            Column::new("Serious".into(), serious),
            Column::new("Moderate".into(), moderate),
            Column::new("Minor".into(), minor),
        ])?;
        Ok(df)
    }

    /// The tally with each tier count mapped through the natural log, the
    /// scale the stacked severity chart is drawn on. Zero counts come out as
    /// negative infinity, mirroring the log of an empty tier.
    pub fn log_tally(&self) -> Result<DataFrame, AggregateError> {
        let tally = self.tally()?;
        let mut logged = tally.clone();
        for tier in ["Serious", "Moderate", "Minor"] {
            let cast = tally.column(tier)?.cast(&DataType::Float64)?;
            let values: Vec<f64> = cast.f64()?.into_iter().map(|v| v.unwrap_or(0.0).ln()).collect();
            logged.with_column(Column::new(tier.into(), values))?;
        }
        Ok(logged)
    }
}
