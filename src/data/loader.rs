//! Record Loader Module
//! Loads the three collision source tables and validates their schemas.

use polars::prelude::*;
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::data::schema;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: String, column: String },
}

/// The three source tables, loaded once per run.
///
/// Loading is a pure pass-through: no rows are filtered here, and date/time
/// columns stay textual for the classifiers to interpret. The only check is
/// that every column a downstream stage projects or groups on is present, so
/// a structurally incompatible dataset fails up front instead of as a late
/// column-lookup error.
pub struct SourceTables {
    pub crashes: DataFrame,
    pub vehicles: DataFrame,
    pub persons: DataFrame,
}

impl SourceTables {
    pub fn load(config: &PipelineConfig) -> Result<Self, LoaderError> {
        let crashes = read_table(
            &config.crashes_path,
            "crashes",
            &schema::required_crash_columns(),
        )?;
        let vehicles = read_table(
            &config.vehicles_path,
            "vehicles",
            &schema::required_vehicle_columns(),
        )?;
        let persons = read_table(
            &config.persons_path,
            "persons",
            &schema::required_person_columns(),
        )?;

        log::info!(
            "loaded {} collisions, {} vehicles, {} persons",
            crashes.height(),
            vehicles.height(),
            persons.height()
        );

        Ok(Self {
            crashes,
            vehicles,
            persons,
        })
    }
}

/// Load one CSV with Polars and verify its required columns.
fn read_table(
    file_path: &str,
    table: &str,
    required_columns: &[&str],
) -> Result<DataFrame, LoaderError> {
    // Use lazy evaluation for memory efficiency, then collect
    let df = LazyCsvReader::new(file_path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    ensure_columns(&df, table, required_columns)?;
    Ok(df)
}

/// Fail with the first absent column rather than a late key-lookup error.
pub fn ensure_columns(
    df: &DataFrame,
    table: &str,
    required_columns: &[&str],
) -> Result<(), LoaderError> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for column in required_columns {
        if !present.iter().any(|name| name == column) {
            return Err(LoaderError::MissingColumn {
                table: table.to_string(),
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn read_table_accepts_complete_schema() {
        let file = write_csv(
            "COLLISION_ID,DRIVER_LICENSE_STATUS,CONTRIBUTING_FACTOR_1,CONTRIBUTING_FACTOR_2\n\
             1,Licensed,Unspecified,\n\
             2,Permit,Driver Inexperience,Unspecified\n",
        );

        let df = read_table(
            file.path().to_str().unwrap(),
            "vehicles",
            &schema::required_vehicle_columns(),
        )
        .unwrap();

        assert_eq!(df.height(), 2);
    }

    #[test]
    fn read_table_reports_missing_column() {
        let file = write_csv("COLLISION_ID,DRIVER_LICENSE_STATUS\n1,Licensed\n");

        let err = read_table(
            file.path().to_str().unwrap(),
            "vehicles",
            &schema::required_vehicle_columns(),
        )
        .unwrap_err();

        match err {
            LoaderError::MissingColumn { table, column } => {
                assert_eq!(table, "vehicles");
                assert_eq!(column, "CONTRIBUTING_FACTOR_1");
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }
}
