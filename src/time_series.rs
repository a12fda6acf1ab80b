use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub t: f64,
    pub wpm: f64,
}

impl TimeSeriesPoint {
    pub fn new(t: f64, wpm: f64) -> Self {
        Self { t, wpm }
    }
}

impl From<TimeSeriesPoint> for (f64, f64) {
    fn from(p: TimeSeriesPoint) -> Self {
        (p.t, p.wpm)
    }
}

/// WPM sampled once per elapsed second.
///
/// Slot `n` holds the value recorded at second `n + 1`. Slots can stay empty
/// when a tick never arrived for that second.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WpmTimeSeries {
    slots: Vec<Option<u32>>,
}

impl WpmTimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `wpm` for the 1-based `second`, overwriting any earlier value.
    /// Second 0 has no slot and is ignored.
    pub fn record(&mut self, second: u64, wpm: u32) {
        let Some(idx) = (second as usize).checked_sub(1) else {
            return;
        };
        if self.slots.len() <= idx {
            self.slots.resize(idx + 1, None);
        }
        self.slots[idx] = Some(wpm);
    }

    pub fn get(&self, second: u64) -> Option<u32> {
        let idx = (second as usize).checked_sub(1)?;
        self.slots.get(idx).copied().flatten()
    }

    pub fn populated(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.populated() == 0
    }

    /// Samples ready for plotting over `duration` seconds.
    ///
    /// Gaps carry the previous value forward (0 before the first sample) and
    /// the series stops at the last populated slot. With more than two
    /// samples a 3-point moving average is applied. Returns `None` when
    /// fewer than two samples exist.
    pub fn chart_values(&self, duration: u64) -> Option<Vec<f64>> {
        let window = &self.slots[..self.slots.len().min(duration as usize)];
        let last_idx = window.iter().rposition(Option::is_some)?;
        if last_idx < 1 {
            return None;
        }

        let filled: Vec<f64> = window[..=last_idx]
            .iter()
            .scan(0.0, |prev, slot| {
                if let Some(v) = slot {
                    *prev = f64::from(*v);
                }
                Some(*prev)
            })
            .collect();

        if filled.len() <= 2 {
            return Some(filled);
        }

        let smoothed = (0..filled.len())
            .map(|i| {
                let v = filled[i];
                let before = if i > 0 { filled[i - 1] } else { v };
                let after = filled.get(i + 1).copied().unwrap_or(v);
                (before + v + after) / 3.0
            })
            .collect();

        Some(smoothed)
    }

    /// One point per second from 0 to `duration`.
    ///
    /// Second 0 repeats the first sample and seconds past the last sample
    /// hold the final value, so the line always spans the whole run.
    pub fn chart_points(&self, duration: u64) -> Vec<TimeSeriesPoint> {
        let values = self.chart_values(duration).unwrap_or_default();
        let (Some(first), Some(last)) = (values.first().copied(), values.last().copied()) else {
            return Vec::new();
        };

        std::iter::once(TimeSeriesPoint::new(0.0, first))
            .chain((1..=duration).map(|s| {
                let wpm = values.get(s as usize - 1).copied().unwrap_or(last);
                TimeSeriesPoint::new(s as f64, wpm)
            }))
            .collect()
    }

    /// Population standard deviation of the recorded samples, 0 when there
    /// are fewer than two.
    pub fn consistency(&self) -> f64 {
        let samples = self
            .slots
            .iter()
            .flatten()
            .map(|&v| f64::from(v))
            .collect_vec();
        if samples.len() < 2 {
            return 0.0;
        }

        let count = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / count;
        let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        variance.sqrt()
    }
}
