use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Corn,
    Soybean,
    Cotton,
}

impl Crop {
    pub const ALL: [Crop; 3] = [Crop::Corn, Crop::Soybean, Crop::Cotton];

    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Corn => "Corn",
            Crop::Soybean => "Soybean",
            Crop::Cotton => "Cotton",
        }
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum SizeCategory {
    /// Up to 1 hectare
    #[serde(rename = "up-to-1ha")]
    #[value(name = "up-to-1ha")]
    UpToOneHectare,
    /// 1 to 3 hectares
    #[serde(rename = "1-to-3ha")]
    #[value(name = "1-to-3ha")]
    OneToThreeHectares,
    /// More than 3 hectares
    #[serde(rename = "over-3ha")]
    #[value(name = "over-3ha")]
    OverThreeHectares,
}

impl SizeCategory {
    pub const ALL: [SizeCategory; 3] = [
        SizeCategory::UpToOneHectare,
        SizeCategory::OneToThreeHectares,
        SizeCategory::OverThreeHectares,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeCategory::UpToOneHectare => "Up to 1 hectare",
            SizeCategory::OneToThreeHectares => "1 to 3 hectares",
            SizeCategory::OverThreeHectares => "More than 3 hectares",
        }
    }
}

impl std::fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Latitude: {}, Longitude: {}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Number of calendar days covered, both ends included.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Allowed date window for provider requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatePolicy {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    /// Inclusive day cap; `None` for an open historical range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_span_days: Option<u32>,
}

impl Default for DatePolicy {
    fn default() -> Self {
        Self {
            min_date: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap_or(NaiveDate::MIN),
            max_date: NaiveDate::from_ymd_opt(2024, 10, 10).unwrap_or(NaiveDate::MAX),
            max_span_days: None,
        }
    }
}

impl DatePolicy {
    pub fn validate(&self, range: &DateRange) -> Result<(), SelectionError> {
        if range.start > range.end {
            return Err(SelectionError::StartAfterEnd {
                start: range.start,
                end: range.end,
            });
        }
        if range.start < self.min_date {
            return Err(SelectionError::BeforeWindow {
                date: range.start,
                min: self.min_date,
            });
        }
        if range.end > self.max_date {
            return Err(SelectionError::AfterWindow {
                date: range.end,
                max: self.max_date,
            });
        }
        if let Some(max_days) = self.max_span_days {
            if range.span_days() > i64::from(max_days) {
                return Err(SelectionError::SpanTooLong {
                    days: range.span_days(),
                    max_days,
                });
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("You must select at least one crop type.")]
    NoCrops,

    #[error("You must select the size of your crop area.")]
    NoSize,

    #[error("Select a point on the map (latitude and longitude) before submitting.")]
    NoCoordinate,

    #[error("Coordinate out of range: {0}")]
    CoordinateOutOfRange(Coordinate),

    #[error("Both a start date and an end date are required.")]
    MissingDates,

    #[error("Start date {start} is after end date {end}.")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },

    #[error("Date {date} is before the earliest allowed date {min}.")]
    BeforeWindow { date: NaiveDate, min: NaiveDate },

    #[error("Date {date} is after the latest allowed date {max}.")]
    AfterWindow { date: NaiveDate, max: NaiveDate },

    #[error("The selected range covers {days} days; at most {max_days} days are allowed.")]
    SpanTooLong { days: i64, max_days: u32 },
}

/// Validated farmer input for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmerSelection {
    crops: BTreeSet<Crop>,
    size: SizeCategory,
    coordinate: Coordinate,
    range: DateRange,
}

impl FarmerSelection {
    pub fn crops(&self) -> &BTreeSet<Crop> {
        &self.crops
    }

    pub fn size(&self) -> SizeCategory {
        self.size
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn crop_names(&self) -> Vec<&'static str> {
        self.crops.iter().map(|c| c.as_str()).collect()
    }
}

/// Partially filled form; becomes a [`FarmerSelection`] once every field validates.
#[derive(Debug, Clone, Default)]
pub struct SelectionForm {
    pub crops: BTreeSet<Crop>,
    pub size: Option<SizeCategory>,
    pub coordinate: Option<Coordinate>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl SelectionForm {
    pub fn submit(&self, policy: &DatePolicy) -> Result<FarmerSelection, SelectionError> {
        if self.crops.is_empty() {
            return Err(SelectionError::NoCrops);
        }
        let size = self.size.ok_or(SelectionError::NoSize)?;
        let coordinate = self.coordinate.ok_or(SelectionError::NoCoordinate)?;
        if !coordinate.is_valid() {
            return Err(SelectionError::CoordinateOutOfRange(coordinate));
        }
        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(SelectionError::MissingDates),
        };
        let range = DateRange { start, end };
        policy.validate(&range)?;

        Ok(FarmerSelection {
            crops: self.crops.clone(),
            size,
            coordinate,
            range,
        })
    }
}
