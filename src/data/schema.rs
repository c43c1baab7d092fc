//! Column names of the three source tables and the gazetteer.
//! Single point of truth for loader validation and downstream projections.

// Collisions table
pub const COLLISION_ID: &str = "COLLISION_ID";
pub const CRASH_DATE: &str = "CRASH DATE";
pub const CRASH_TIME: &str = "CRASH TIME";
pub const BOROUGH: &str = "BOROUGH";
pub const ZIP_CODE: &str = "ZIP CODE";
pub const LATITUDE: &str = "LATITUDE";
pub const LONGITUDE: &str = "LONGITUDE";
pub const ON_STREET_NAME: &str = "ON STREET NAME";
pub const PEDESTRIANS_INJURED: &str = "NUMBER OF PEDESTRIANS INJURED";
pub const PEDESTRIANS_KILLED: &str = "NUMBER OF PEDESTRIANS KILLED";
pub const CYCLISTS_INJURED: &str = "NUMBER OF CYCLIST INJURED";
pub const CYCLISTS_KILLED: &str = "NUMBER OF CYCLIST KILLED";

/// The five per-collision contributing-factor slots, in slot order.
pub const CRASH_FACTOR_SLOTS: [&str; 5] = [
    "CONTRIBUTING FACTOR VEHICLE 1",
    "CONTRIBUTING FACTOR VEHICLE 2",
    "CONTRIBUTING FACTOR VEHICLE 3",
    "CONTRIBUTING FACTOR VEHICLE 4",
    "CONTRIBUTING FACTOR VEHICLE 5",
];

/// Victim-count columns used by the vulnerable-road-user filter.
pub const VICTIM_COUNT_COLUMNS: [&str; 4] = [
    PEDESTRIANS_INJURED,
    PEDESTRIANS_KILLED,
    CYCLISTS_INJURED,
    CYCLISTS_KILLED,
];

// Vehicles table
pub const DRIVER_LICENSE_STATUS: &str = "DRIVER_LICENSE_STATUS";
pub const VEHICLE_FACTOR_1: &str = "CONTRIBUTING_FACTOR_1";
pub const VEHICLE_FACTOR_2: &str = "CONTRIBUTING_FACTOR_2";

// Persons table
pub const PERSON_TYPE: &str = "PERSON_TYPE";
pub const PERSON_INJURY: &str = "PERSON_INJURY";
pub const SAFETY_EQUIPMENT: &str = "SAFETY_EQUIPMENT";
pub const COMPLAINT: &str = "COMPLAINT";
pub const POSITION_IN_VEHICLE: &str = "POSITION_IN_VEHICLE";

// Gazetteer (postal-code reference) table
pub const GAZETTEER_POSTAL_CODE: &str = "postal_code";
pub const GAZETTEER_LATITUDE: &str = "latitude";
pub const GAZETTEER_LONGITUDE: &str = "longitude";

// Stable output column names of the aggregate tables
pub const TIME_OF_DAY: &str = "TIME OF DAY";
pub const CONTRIBUTING_FACTOR: &str = "CONTRIBUTING FACTOR";
pub const FACTOR_CLASS: &str = "CONTRIBUTING FACTOR CLASS";
pub const OCCURRENCES: &str = "Number of occurrences";
pub const PERCENTAGE: &str = "Percentage of Collisions";

/// Columns every downstream stage assumes the collisions table carries.
pub fn required_crash_columns() -> Vec<&'static str> {
    let mut columns = vec![
        COLLISION_ID,
        CRASH_DATE,
        CRASH_TIME,
        BOROUGH,
        ZIP_CODE,
        LATITUDE,
        LONGITUDE,
        ON_STREET_NAME,
    ];
    columns.extend(VICTIM_COUNT_COLUMNS);
    columns.extend(CRASH_FACTOR_SLOTS);
    columns
}

pub fn required_vehicle_columns() -> Vec<&'static str> {
    vec![
        COLLISION_ID,
        DRIVER_LICENSE_STATUS,
        VEHICLE_FACTOR_1,
        VEHICLE_FACTOR_2,
    ]
}

pub fn required_person_columns() -> Vec<&'static str> {
    vec![
        COLLISION_ID,
        PERSON_TYPE,
        PERSON_INJURY,
        SAFETY_EQUIPMENT,
        COMPLAINT,
        POSITION_IN_VEHICLE,
    ]
}
