use crate::error::{HeatmapError, Result};
use std::fmt;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(value: &str) -> Result<Self> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(HeatmapError::InvalidColor(value.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| HeatmapError::InvalidColor(value.to_string()))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Upper bound (exclusive) of a temperature band and its color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBucket {
    pub threshold: f64,
    pub color: Rgb,
}

const DEFAULT_BUCKETS: [(f64, &str); 9] = [
    (3.9, "#0274f5"),
    (5.0, "#21b9ff"),
    (6.1, "#70cffa"),
    (7.2, "#bee6f7"),
    (8.3, "#f0ff7a"),
    (9.5, "#fccc6d"),
    (10.6, "#fca800"),
    (11.7, "#f55b14"),
    (12.8, "#ff0000"),
];

const DEFAULT_OVERFLOW: Rgb = Rgb::new(0xa5, 0x00, 0x00);

/// Discrete color scale: ascending buckets plus an "above max" color
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    buckets: Vec<ColorBucket>,
    overflow: Rgb,
}

impl Palette {
    pub fn new(buckets: Vec<ColorBucket>, overflow: Rgb) -> Result<Self> {
        if let Some((index, bucket)) = buckets
            .iter()
            .enumerate()
            .find(|(_, bucket)| !bucket.threshold.is_finite())
        {
            return Err(HeatmapError::NonFiniteThreshold {
                index,
                threshold: bucket.threshold,
            });
        }

        for (index, pair) in buckets.windows(2).enumerate() {
            if pair[1].threshold <= pair[0].threshold {
                return Err(HeatmapError::UnorderedPalette {
                    index: index + 1,
                    threshold: pair[1].threshold,
                });
            }
        }

        Ok(Self { buckets, overflow })
    }

    pub fn buckets(&self) -> &[ColorBucket] {
        &self.buckets
    }

    pub const fn overflow(&self) -> Rgb {
        self.overflow
    }

    /// Index of the first bucket whose threshold is strictly above `temperature`
    pub fn bucket_index(&self, temperature: f64) -> Option<usize> {
        self.buckets
            .iter()
            .position(|bucket| temperature < bucket.threshold)
    }

    /// Fill color for an absolute temperature
    pub fn resolve(&self, temperature: f64) -> Rgb {
        self.bucket_index(temperature)
            .map_or(self.overflow, |index| self.buckets[index].color)
    }

    /// Human readable band label for each bucket, then the overflow band
    pub fn legend(&self) -> Vec<(String, Rgb)> {
        let mut entries = Vec::with_capacity(self.buckets.len() + 1);
        let mut lower: Option<f64> = None;

        for bucket in &self.buckets {
            let label = lower.map_or_else(
                || format!("< {:.1}", bucket.threshold),
                |low| format!("{low:.1}-{:.1}", bucket.threshold),
            );
            entries.push((label, bucket.color));
            lower = Some(bucket.threshold);
        }

        let overflow_label = lower.map_or_else(|| "all".to_string(), |low| format!(">= {low:.1}"));
        entries.push((overflow_label, self.overflow));
        entries
    }
}

impl Default for Palette {
    fn default() -> Self {
        let buckets = DEFAULT_BUCKETS
            .iter()
            .filter_map(|&(threshold, hex)| {
                Rgb::from_hex(hex)
                    .ok()
                    .map(|color| ColorBucket { threshold, color })
            })
            .collect();

        Self {
            buckets,
            overflow: DEFAULT_OVERFLOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_hex() {
        let color = Rgb::from_hex("#fccc6d").unwrap();
        assert_eq!(color, Rgb::new(0xfc, 0xcc, 0x6d));
        assert_eq!(color.to_hex(), "#fccc6d");
        assert_eq!(Rgb::from_hex("0274F5").unwrap().to_hex(), "#0274f5");
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#gggggg").is_err());
    }

    #[test]
    fn default_palette_has_nine_buckets() {
        let palette = Palette::default();
        assert_eq!(palette.buckets().len(), 9);
        assert_eq!(palette.overflow().to_hex(), "#a50000");
    }

    #[test]
    fn resolves_first_threshold_strictly_above() {
        let palette = Palette::default();
        let base = 8.0;

        assert_eq!(palette.resolve(base + 0.5).to_hex(), "#fccc6d");
        assert_eq!(palette.resolve(1.0).to_hex(), "#0274f5");
        // Equal to a threshold falls into the next bucket
        assert_eq!(palette.resolve(3.9).to_hex(), "#21b9ff");
        assert_eq!(palette.resolve(12.79).to_hex(), "#ff0000");
    }

    #[test]
    fn falls_back_above_last_threshold() {
        let palette = Palette::default();
        assert_eq!(palette.bucket_index(12.8), None);
        assert_eq!(palette.resolve(14.0).to_hex(), "#a50000");
    }

    #[test]
    fn rejects_unordered_thresholds() {
        let red = Rgb::new(255, 0, 0);
        let buckets = vec![
            ColorBucket {
                threshold: 5.0,
                color: red,
            },
            ColorBucket {
                threshold: 5.0,
                color: red,
            },
        ];
        let err = Palette::new(buckets, red).unwrap_err();
        assert!(matches!(err, HeatmapError::UnorderedPalette { index: 1, .. }));
    }

    #[test]
    fn rejects_nan_threshold() {
        let red = Rgb::new(255, 0, 0);
        let buckets = vec![
            ColorBucket {
                threshold: 5.0,
                color: red,
            },
            ColorBucket {
                threshold: f64::NAN,
                color: red,
            },
            ColorBucket {
                threshold: 7.0,
                color: red,
            },
        ];
        let err = Palette::new(buckets, red).unwrap_err();
        assert!(matches!(
            err,
            HeatmapError::NonFiniteThreshold { index: 1, threshold } if threshold.is_nan()
        ));
    }

    #[test]
    fn legend_covers_every_band() {
        let legend = Palette::default().legend();
        assert_eq!(legend.len(), 10);
        assert_eq!(legend[0].0, "< 3.9");
        assert_eq!(legend[1].0, "3.9-5.0");
        assert_eq!(legend[9].0, ">= 12.8");
    }
}
