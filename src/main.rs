//! CrashLens - collision pipeline entry point.
//!
//! Sequences the pipeline stages and prints the finished tables; all
//! cleaning, joining, and aggregation lives in the library.

use anyhow::Result;

use crashlens::aggregate::{
    CompositionAnalysis, Measure, PeriodFactorTrends, SeasonalImpairment, SeatPositionSeverity,
    StreetIncidents,
};
use crashlens::config::PipelineConfig;
use crashlens::data::{fill_missing_coordinates, SourceTables, ViewBuilder, ZipGazetteer};

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => PipelineConfig::from_json_file(&path)?,
        None => PipelineConfig::default(),
    };

    let SourceTables {
        crashes,
        vehicles,
        persons,
    } = SourceTables::load(&config)?;
    let gazetteer = ZipGazetteer::from_csv(&config.gazetteer_path)?;
    let crashes = fill_missing_coordinates(&crashes, &gazetteer)?;

    let license_view = ViewBuilder::license_status_view(&crashes, &vehicles)?;
    let period_view = ViewBuilder::crash_period_view(&crashes)?;
    let vulnerable_view = ViewBuilder::vulnerable_road_user_view(&crashes)?;

    let composition = CompositionAnalysis::new(license_view);
    println!(
        "Collision composition by borough:\n{}",
        composition.borough_factor_class_composition(Measure::Percentage)?
    );
    println!(
        "Collision composition, all NYC:\n{}",
        composition.population_factor_class_composition(Measure::Percentage)?
    );
    println!(
        "License composition by borough:\n{}",
        composition.borough_license_composition(Measure::Percentage)?
    );
    println!(
        "License composition, all NYC:\n{}",
        composition.population_license_composition(Measure::Percentage)?
    );

    let trend = composition.license_vs_inattention_trend()?;
    println!("License status vs inattention collisions:\n{}", trend.points);
    if let Some(line) = trend.trend {
        println!(
            "Fitted trend: slope {:.4}, intercept {:.4}",
            line.slope, line.intercept
        );
    }

    let period = PeriodFactorTrends::new(period_view);
    let leading = period.leading_factor_frequency()?;
    println!(
        "Leading contributing factors by time of day (log scale):\n{}",
        PeriodFactorTrends::with_log_occurrences(&leading)?
    );

    let severity = SeatPositionSeverity::new(persons);
    println!(
        "Severity by seat position, no safety equipment:\n{}",
        severity.tally()?
    );

    let seasonal = SeasonalImpairment::new(crashes);
    println!(
        "Drug/alcohol collisions by month:\n{}",
        seasonal.monthly_counts()?
    );

    let streets = StreetIncidents::new(vulnerable_view);
    println!(
        "Most dangerous streets for pedestrians and cyclists:\n{}",
        streets.top_streets(5)?
    );

    Ok(())
}
