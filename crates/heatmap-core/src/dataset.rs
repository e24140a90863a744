use crate::error::{HeatmapError, Result};
use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};

/// Public dataset the heatmap is built from
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/freeCodeCamp/ProjectReferenceData/master/global-temperature.json";

/// Year every month date is anchored to. Only the month component matters.
const REFERENCE_YEAR: i32 = 2000;

/// Raw response body, as served by the remote endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub base_temperature: f64,
    pub monthly_variance: Vec<RawVariance>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RawVariance {
    pub year: i32,
    /// Zero-based month index
    pub month: u32,
    pub variance: f64,
}

/// One (year, month) observation
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyVariance {
    pub year: i32,
    /// Zero-based month index (0 = January)
    pub month: u32,
    /// Offset from the base temperature, in degrees
    pub variance: f64,
    /// First day of the month in the reference year
    pub date: NaiveDate,
}

impl MonthlyVariance {
    pub fn new(year: i32, month: u32, variance: f64) -> Result<Self> {
        let date = month
            .checked_add(1)
            .and_then(|m| NaiveDate::from_ymd_opt(REFERENCE_YEAR, m, 1))
            .ok_or(HeatmapError::InvalidMonth { year, month })?;

        Ok(Self {
            year,
            month,
            variance,
            date,
        })
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month).unwrap_or("Unknown")
    }
}

/// Loaded dataset. Built once per successful load and replaced, never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub base_temperature: f64,
    pub entries: Vec<MonthlyVariance>,
}

impl Dataset {
    pub fn from_payload(payload: Payload) -> Result<Self> {
        let entries = payload
            .monthly_variance
            .into_iter()
            .map(|raw| MonthlyVariance::new(raw.year, raw.month, raw.variance))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            base_temperature: payload.base_temperature,
            entries,
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let payload: Payload = serde_json::from_str(text)?;
        let dataset = Self::from_payload(payload)?;
        log::debug!(
            "Parsed dataset: {} entries, base temperature {}",
            dataset.len(),
            dataset.base_temperature
        );
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Absolute temperature of an entry
    pub fn temperature_of(&self, entry: &MonthlyVariance) -> f64 {
        self.base_temperature + entry.variance
    }

    /// Smallest and largest year present
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.entries.iter().map(|e| e.year).min()?;
        let max = self.entries.iter().map(|e| e.year).max()?;
        Some((min, max))
    }

    pub fn coldest(&self) -> Option<&MonthlyVariance> {
        self.entries
            .iter()
            .min_by(|a, b| a.variance.total_cmp(&b.variance))
    }

    pub fn warmest(&self) -> Option<&MonthlyVariance> {
        self.entries
            .iter()
            .max_by(|a, b| a.variance.total_cmp(&b.variance))
    }

    /// Lowest and highest absolute temperature
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        let coldest = self.coldest()?;
        let warmest = self.warmest()?;
        Some((self.temperature_of(coldest), self.temperature_of(warmest)))
    }
}

/// English month name for a zero-based month index
pub fn month_name(month: u32) -> Option<&'static str> {
    let number = u8::try_from(month.checked_add(1)?).ok()?;
    Month::try_from(number).ok().map(|m| m.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const SAMPLE: &str = r#"{
        "baseTemperature": 8.66,
        "monthlyVariance": [
            { "year": 1753, "month": 0, "variance": -1.366 },
            { "year": 1753, "month": 1, "variance": -2.223 },
            { "year": 1754, "month": 11, "variance": 0.5 },
            { "year": 2015, "month": 6, "variance": 1.2 }
        ]
    }"#;

    #[test]
    fn parses_payload_and_keeps_every_entry() {
        let dataset = Dataset::from_json(SAMPLE).unwrap();

        assert_eq!(dataset.len(), 4);
        assert!((dataset.base_temperature - 8.66).abs() < f64::EPSILON);
        for entry in &dataset.entries {
            assert_eq!(entry.date.month0(), entry.month);
            assert_eq!(entry.date.year(), REFERENCE_YEAR);
        }
    }

    #[test]
    fn month_names_are_stable() {
        assert_eq!(month_name(0), Some("January"));
        assert_eq!(month_name(5), Some("June"));
        assert_eq!(month_name(11), Some("December"));
        assert_eq!(month_name(12), None);
    }

    #[test]
    fn rejects_out_of_range_month() {
        let text = r#"{"baseTemperature": 8.0, "monthlyVariance": [{"year": 1900, "month": 12, "variance": 0.1}]}"#;
        let err = Dataset::from_json(text).unwrap_err();
        assert!(matches!(
            err,
            HeatmapError::InvalidMonth {
                year: 1900,
                month: 12
            }
        ));
    }

    #[test]
    fn rejects_month_at_u32_max() {
        let text = r#"{"baseTemperature": 8.0, "monthlyVariance": [{"year": 1900, "month": 4294967295, "variance": 0.1}]}"#;
        let err = Dataset::from_json(text).unwrap_err();
        assert!(matches!(
            err,
            HeatmapError::InvalidMonth {
                year: 1900,
                month: u32::MAX
            }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Dataset::from_json("{\"baseTemperature\": ").unwrap_err();
        assert!(matches!(err, HeatmapError::Json(_)));
    }

    #[test]
    fn ranges_and_extremes() {
        let dataset = Dataset::from_json(SAMPLE).unwrap();

        assert_eq!(dataset.year_range(), Some((1753, 2015)));
        assert_eq!(dataset.coldest().map(|e| e.month), Some(1));
        assert_eq!(dataset.warmest().map(|e| e.year), Some(2015));

        let (low, high) = dataset.temperature_range().unwrap();
        assert!((low - (8.66 - 2.223)).abs() < 1e-9);
        assert!((high - (8.66 + 1.2)).abs() < 1e-9);
    }

    #[test]
    fn empty_dataset_has_no_ranges() {
        let dataset = Dataset::from_json(r#"{"baseTemperature": 8.0, "monthlyVariance": []}"#)
            .unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.year_range(), None);
        assert_eq!(dataset.temperature_range(), None);
    }
}
