//! Classifier Module
//! Pure row-wise classification of free-text categorical fields.

/// The four disjoint blocks the day is divided into, covering hours 0-23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeOfDay {
    Morning,
    MidDay,
    Night,
    LateNight,
}

impl TimeOfDay {
    /// Bucket order used for chart axes.
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::MidDay,
        TimeOfDay::Night,
        TimeOfDay::LateNight,
    ];

    /// Bucket the hour component of a "H:MM" / "HH:MM" clock string.
    ///
    /// Returns `None` when the hour cannot be parsed as an integer in 0-23;
    /// unclassifiable rows are the consumer's to skip, never an error.
    pub fn from_clock_text(clock: &str) -> Option<Self> {
        let hour: u32 = clock.split(':').next()?.trim().parse().ok()?;
        match hour {
            6..=11 => Some(TimeOfDay::Morning),
            12..=17 => Some(TimeOfDay::MidDay),
            18..=23 => Some(TimeOfDay::Night),
            0..=5 => Some(TimeOfDay::LateNight),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::MidDay => "mid_day",
            TimeOfDay::Night => "night",
            TimeOfDay::LateNight => "late_night",
        }
    }
}

/// Coarse three-way classification of a pair of contributing-factor slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactorClass {
    InattentionInexperience,
    Unspecified,
    Other,
}

/// The factors that mark a collision as inattention/inexperience related.
const IMPORTANT_FACTORS: [&str; 2] = ["Driver Inattention/Distraction", "Driver Inexperience"];

impl FactorClass {
    /// Classify two factor slots. The inattention check runs first and wins:
    /// {inattention factor, "Unspecified"} is inattention-related, not
    /// unspecified. Null slots only ever land in `Other`.
    pub fn classify(factor_1: Option<&str>, factor_2: Option<&str>) -> Self {
        let is_important = |slot: Option<&str>| {
            slot.is_some_and(|value| IMPORTANT_FACTORS.contains(&value))
        };
        if is_important(factor_1) || is_important(factor_2) {
            FactorClass::InattentionInexperience
        } else if factor_1 == Some("Unspecified") && factor_2 == Some("Unspecified") {
            FactorClass::Unspecified
        } else {
            FactorClass::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FactorClass::InattentionInexperience => "Inattention/Inexperience Related",
            FactorClass::Unspecified => "Unspecified",
            FactorClass::Other => "Other",
        }
    }
}

/// Shorten the dataset's long-form vehicle-position descriptions to canonical
/// labels. Unknown values pass through unchanged so they stay visible in
/// downstream unique-value enumeration instead of silently vanishing.
pub fn canonical_position(position: &str) -> &str {
    match position {
        "Driver" => "Driver",
        "Front passenger, if two or more persons, including the driver, are in the front seat" => {
            "Front Passenger"
        }
        "Right rear passenger or motorcycle sidecar passenger" => "Right Rear Passenger",
        "Left rear passenger, or rear passenger on a bicycle, motorcycle, snowmobile" => {
            "Left Rear Passenger"
        }
        "Any person in the rear of a station wagon, pick-up truck, all passengers on a bus, etc" => {
            "Rear Passenger"
        }
        "Middle rear seat, or passenger lying across a seat" => "Middle Rear Seat",
        "Middle front seat, or passenger lying across a seat" => "Middle Front Seat",
        "Riding/Hanging on Outside" => "Riding Outside",
        // the source data carries the HTML entity verbatim
        "If one person is seated on another person&apos;s lap" => "Sitting on Lap",
        other => other,
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar position of a month name, for sorting seasonal tables.
pub fn month_ordinal(month: &str) -> Option<usize> {
    MONTH_NAMES.iter().position(|name| *name == month)
}

/// Month name of a "MM/DD/YYYY" date string; `None` when unparseable.
pub fn month_name(date: &str) -> Option<&'static str> {
    let month: usize = date.split('/').next()?.trim().parse().ok()?;
    if (1..=12).contains(&month) {
        Some(MONTH_NAMES[month - 1])
    } else {
        None
    }
}
