/// Continuous linear mapping from a data domain to a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    fn ratio(&self) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            0.0
        } else {
            (self.range.1 - self.range.0) / span
        }
    }

    pub fn map(&self, value: f64) -> f64 {
        (value - self.domain.0).mul_add(self.ratio(), self.range.0)
    }

    /// Round tick values inside the domain, roughly `count` of them
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };

        let Some(step) = tick_step(start, stop, count) else {
            return vec![start];
        };

        let first = (start / step).ceil() as i64;
        let last = (stop / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Step of 1, 2 or 5 times a power of ten giving about `count` ticks
pub fn tick_step(start: f64, stop: f64, count: usize) -> Option<f64> {
    let span = stop - start;
    if count == 0 || span <= 0.0 || !span.is_finite() {
        return None;
    }

    let raw = span / count as f64;
    let power = raw.log10().floor();
    let mut step = 10f64.powf(power);
    let error = raw / step;

    if error >= 50f64.sqrt() {
        step *= 10.0;
    } else if error >= 10f64.sqrt() {
        step *= 5.0;
    } else if error >= 2f64.sqrt() {
        step *= 2.0;
    }

    Some(step)
}

/// Equal-width bands over a range, one per category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    pub count: usize,
    pub range: (f64, f64),
}

impl BandScale {
    pub const fn new(count: usize, range: (f64, f64)) -> Self {
        Self { count, range }
    }

    pub fn bandwidth(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.range.1 - self.range.0) / self.count as f64
    }

    pub fn band_start(&self, index: usize) -> f64 {
        (index as f64).mul_add(self.bandwidth(), self.range.0)
    }

    pub fn band_center(&self, index: usize) -> f64 {
        self.band_start(index) + self.bandwidth() / 2.0
    }

    /// Band under a position, if any
    pub fn index_at(&self, position: f64) -> Option<usize> {
        let width = self.bandwidth();
        if width <= 0.0 || position < self.range.0 || position >= self.range.1 {
            return None;
        }
        let index = ((position - self.range.0) / width).floor() as usize;
        (index < self.count).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}, diff {diff}");
    }

    #[test]
    fn maps_domain_onto_range() {
        let scale = LinearScale::new((1753.0, 2015.0), (60.0, 1140.0));
        assert_close(scale.map(1753.0), 60.0);
        assert_close(scale.map(2015.0), 1140.0);
        assert_close(scale.map(1884.0), 600.0);
    }

    #[test]
    fn degenerate_domain_maps_to_range_start() {
        let scale = LinearScale::new((2000.0, 2000.0), (10.0, 100.0));
        assert_close(scale.map(2000.0), 10.0);
        assert_close(scale.map(2010.0), 10.0);
    }

    #[test]
    fn year_ticks_use_nice_steps() {
        let scale = LinearScale::new((1753.0, 2015.0), (0.0, 1.0));
        let ticks = scale.ticks(10);

        assert_eq!(tick_step(1753.0, 2015.0, 10), Some(20.0));
        assert_close(ticks[0], 1760.0);
        assert_close(ticks[ticks.len() - 1], 2000.0);
        assert_eq!(ticks.len(), 13);
    }

    #[test]
    fn bands_split_range_evenly() {
        let bands = BandScale::new(12, (60.0, 540.0));
        assert_close(bands.bandwidth(), 40.0);
        assert_close(bands.band_start(0), 60.0);
        assert_close(bands.band_start(11), 500.0);
        assert_close(bands.band_center(1), 120.0);
        assert_eq!(bands.index_at(60.0), Some(0));
        assert_eq!(bands.index_at(539.9), Some(11));
        assert_eq!(bands.index_at(540.0), None);
        assert_eq!(bands.index_at(10.0), None);
    }
}
