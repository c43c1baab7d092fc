//! CrashLens - NYC motor-vehicle collision data cleansing & aggregation.
//!
//! A batch, single-pass pipeline over the city's collision dataset: load the
//! collision/vehicle/person tables, repair missing geolocation from a
//! postal-code gazetteer, join the tables on the collision identifier,
//! classify free-text categoricals into coarse buckets, and aggregate into
//! the summary tables the chart renderers consume.
//!
//! Stages hand each other fully materialized, immutable frames; rebuilding
//! everything from the source files on every run is what makes reruns
//! reproduce identical tables.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod data;
pub mod stats;
