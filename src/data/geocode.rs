//! Geolocation Repair Module
//! Fills missing coordinate pairs from a postal-code gazetteer.

use std::collections::HashMap;

use polars::prelude::*;
use thiserror::Error;

use crate::data::cell::{float_values, string_values};
use crate::data::schema;

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("gazetteer table is missing required column '{column}'")]
    MissingColumn { column: String },
}

/// Postal-code -> (latitude, longitude) reference, loaded once and queried in bulk.
///
/// Entries without a complete coordinate pair are skipped at load time, so a
/// lookup hit always carries both values.
pub struct ZipGazetteer {
    table: HashMap<String, (f64, f64)>,
}

impl ZipGazetteer {
    pub fn from_csv(file_path: &str) -> Result<Self, GeocodeError> {
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        for column in [
            schema::GAZETTEER_POSTAL_CODE,
            schema::GAZETTEER_LATITUDE,
            schema::GAZETTEER_LONGITUDE,
        ] {
            if !present.iter().any(|name| name == column) {
                return Err(GeocodeError::MissingColumn {
                    column: column.to_string(),
                });
            }
        }

        let codes = string_values(&df, schema::GAZETTEER_POSTAL_CODE)?;
        let latitudes = float_values(&df, schema::GAZETTEER_LATITUDE)?;
        let longitudes = float_values(&df, schema::GAZETTEER_LONGITUDE)?;

        let mut table = HashMap::new();
        for i in 0..df.height() {
            if let (Some(code), Some(lat), Some(lon)) = (&codes[i], latitudes[i], longitudes[i]) {
                table.insert(code.clone(), (lat, lon));
            }
        }

        log::info!("gazetteer loaded with {} postal codes", table.len());
        Ok(Self { table })
    }

    /// Build a gazetteer from in-memory entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, (f64, f64))>,
    {
        Self {
            table: entries.into_iter().collect(),
        }
    }

    /// Resolve a batch of normalized codes; the result is aligned with the
    /// input and unknown codes yield `None`, never an error.
    pub fn bulk_lookup(&self, codes: &[String]) -> Vec<Option<(f64, f64)>> {
        codes
            .iter()
            .map(|code| self.table.get(code).copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Strip the fractional suffix numeric typing leaves on postal codes
/// ("10001.0" -> "10001"). Anything that doesn't normalize to a bare run of
/// digits is unrecognizable and reported as `None`.
pub fn normalize_postal_code(raw: &str) -> Option<String> {
    let truncated = raw.split('.').next().unwrap_or("").trim();
    if truncated.is_empty() || !truncated.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(truncated.to_string())
}

/// Fill missing coordinates on collision records that carry a postal code.
///
/// Row positions are preserved: a record is only ever repaired with its own
/// postal code's coordinates, already-present coordinates are never
/// overwritten, and rows that stay unresolved keep null coordinates for the
/// consumers to filter. Unresolved and malformed codes are data-quality
/// metrics, not errors.
pub fn fill_missing_coordinates(
    crashes: &DataFrame,
    gazetteer: &ZipGazetteer,
) -> Result<DataFrame, GeocodeError> {
    let zip_codes = string_values(crashes, schema::ZIP_CODE)?;
    let mut latitudes = float_values(crashes, schema::LATITUDE)?;
    let mut longitudes = float_values(crashes, schema::LONGITUDE)?;

    // Repair batch: rows with a postal code but no latitude yet.
    let mut row_indices: Vec<usize> = Vec::new();
    let mut lookup_codes: Vec<String> = Vec::new();
    let mut malformed = 0usize;

    for (i, zip) in zip_codes.iter().enumerate() {
        let Some(raw) = zip else { continue };
        if latitudes[i].is_some() {
            continue;
        }
        match normalize_postal_code(raw) {
            Some(code) => {
                row_indices.push(i);
                lookup_codes.push(code);
            }
            None => malformed += 1,
        }
    }

    let mut repaired = 0usize;
    let mut unresolved = 0usize;
    for (slot, coordinates) in gazetteer.bulk_lookup(&lookup_codes).iter().enumerate() {
        match coordinates {
            Some((lat, lon)) => {
                let row = row_indices[slot];
                latitudes[row] = Some(*lat);
                longitudes[row] = Some(*lon);
                repaired += 1;
            }
            None => unresolved += 1,
        }
    }

    log::info!(
        "geolocation repair: {repaired} rows filled, {unresolved} postal codes unresolved, {malformed} malformed"
    );

    let mut filled = crashes.clone();
    filled.with_column(Column::new(schema::LATITUDE.into(), latitudes))?;
    filled.with_column(Column::new(schema::LONGITUDE.into(), longitudes))?;
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gazetteer() -> ZipGazetteer {
        ZipGazetteer::from_entries([("10001".to_string(), (40.7506, -73.9972))])
    }

    #[test]
    fn normalizes_fractional_suffix_without_rounding() {
        assert_eq!(normalize_postal_code("10001.0").as_deref(), Some("10001"));
        assert_eq!(normalize_postal_code("10001.9").as_deref(), Some("10001"));
        assert_eq!(normalize_postal_code("10001").as_deref(), Some("10001"));
    }

    #[test]
    fn rejects_empty_and_non_numeric_codes() {
        assert_eq!(normalize_postal_code(""), None);
        assert_eq!(normalize_postal_code("."), None);
        assert_eq!(normalize_postal_code("1000a"), None);
        assert_eq!(normalize_postal_code("N/A"), None);
    }

    #[test]
    fn fills_only_rows_missing_coordinates() {
        let crashes = df!(
            schema::ZIP_CODE => [Some("10001.0"), Some("00000"), None::<&str>],
            schema::LATITUDE => [None::<f64>, None, Some(40.6)],
            schema::LONGITUDE => [None::<f64>, None, Some(-73.8)],
        )
        .unwrap();

        let filled = fill_missing_coordinates(&crashes, &gazetteer()).unwrap();
        let latitudes = float_values(&filled, schema::LATITUDE).unwrap();
        let longitudes = float_values(&filled, schema::LONGITUDE).unwrap();

        // "10001.0" resolves through the normalized code
        assert_eq!(latitudes[0], Some(40.7506));
        assert_eq!(longitudes[0], Some(-73.9972));
        // unknown code stays null
        assert_eq!(latitudes[1], None);
        // present coordinates are never overwritten
        assert_eq!(latitudes[2], Some(40.6));
        assert_eq!(longitudes[2], Some(-73.8));
    }

    #[test]
    fn present_coordinates_win_over_gazetteer() {
        let crashes = df!(
            schema::ZIP_CODE => [Some("10001")],
            schema::LATITUDE => [Some(1.0)],
            schema::LONGITUDE => [Some(2.0)],
        )
        .unwrap();

        let filled = fill_missing_coordinates(&crashes, &gazetteer()).unwrap();
        assert_eq!(
            float_values(&filled, schema::LATITUDE).unwrap()[0],
            Some(1.0)
        );
    }

    #[test]
    fn gazetteer_loads_from_csv_and_skips_incomplete_rows() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"postal_code,latitude,longitude\n10001,40.7506,-73.9972\n10002,,\n10003,40.7313,-73.9892\n",
        )
        .unwrap();
        file.flush().unwrap();

        let gazetteer = ZipGazetteer::from_csv(file.path().to_str().unwrap()).unwrap();

        assert_eq!(gazetteer.len(), 2);
        let hits = gazetteer.bulk_lookup(&["10001".to_string(), "10002".to_string()]);
        assert_eq!(hits[0], Some((40.7506, -73.9972)));
        assert_eq!(hits[1], None);
    }

    #[test]
    fn repair_then_victim_filter_keeps_the_right_collisions() {
        use crate::data::ViewBuilder;

        // A: pedestrian injured, repairable by postal code; B: nothing to
        // repair with and nobody hurt; C: cyclist killed, coordinates already
        // present
        let crashes = df!(
            schema::COLLISION_ID => [1i64, 2, 3],
            schema::ZIP_CODE => [Some("10001.0"), Some("00000"), None::<&str>],
            schema::LATITUDE => [None::<f64>, None, Some(40.64)],
            schema::LONGITUDE => [None::<f64>, None, Some(-73.97)],
            schema::PEDESTRIANS_INJURED => [1.0, 0.0, 0.0],
            schema::PEDESTRIANS_KILLED => [0.0, 0.0, 0.0],
            schema::CYCLISTS_INJURED => [0.0, 0.0, 0.0],
            schema::CYCLISTS_KILLED => [0.0, 0.0, 1.0],
        )
        .unwrap();

        let repaired = fill_missing_coordinates(&crashes, &gazetteer()).unwrap();
        let view = ViewBuilder::vulnerable_road_user_view(&repaired).unwrap();

        assert_eq!(view.height(), 2);
        let ids = float_values(&view, schema::COLLISION_ID).unwrap();
        assert_eq!(ids, vec![Some(1.0), Some(3.0)]);
        let latitudes = float_values(&view, schema::LATITUDE).unwrap();
        assert_eq!(latitudes[0], Some(40.7506));
        assert_eq!(latitudes[1], Some(40.64));
    }

    #[test]
    fn malformed_codes_fall_through_silently() {
        let crashes = df!(
            schema::ZIP_CODE => [Some("not-a-zip")],
            schema::LATITUDE => [None::<f64>],
            schema::LONGITUDE => [None::<f64>],
        )
        .unwrap();

        let filled = fill_missing_coordinates(&crashes, &gazetteer()).unwrap();
        assert_eq!(float_values(&filled, schema::LATITUDE).unwrap()[0], None);
    }
}
