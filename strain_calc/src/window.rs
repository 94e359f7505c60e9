use osu_schema::{Chart, Milliseconds, StrainSeries, WindowedSeries};

use crate::config::StrainConfig;
use crate::error::WindowError;
use crate::strain::decayed;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSpec {
    size_ms: Milliseconds,
    origin_ms: Milliseconds,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            size_ms: Self::DEFAULT_SIZE_MS,
            origin_ms: 0.0,
        }
    }
}

impl WindowSpec {
    pub const DEFAULT_SIZE_MS: Milliseconds = 400.0;

    pub fn new(size_ms: Milliseconds, origin_ms: Milliseconds) -> Result<Self, WindowError> {
        if !(size_ms.is_finite() && size_ms > 0.0) {
            return Err(WindowError::InvalidSize { size_ms });
        }
        if !origin_ms.is_finite() {
            return Err(WindowError::InvalidOrigin { origin_ms });
        }
        Ok(Self { size_ms, origin_ms })
    }

    pub fn size_ms(&self) -> Milliseconds {
        self.size_ms
    }

    pub fn origin_ms(&self) -> Milliseconds {
        self.origin_ms
    }

    /// Computed from the origin each time so long charts do not accumulate drift.
    pub fn window_end(&self, index: usize) -> Milliseconds {
        self.origin_ms + (index as f64 + 1.0) * self.size_ms
    }

    /// Windows needed to reach `last_time`; at least one.
    pub fn window_count(&self, last_time: Milliseconds) -> usize {
        let spans = ((last_time - self.origin_ms) / self.size_ms).ceil();
        if spans >= 1.0 {
            spans as usize
        } else {
            1
        }
    }
}

/// Maximum strain per window, aim and speed independently.
///
/// Objects count at full strength in the window containing them (a window
/// includes its end boundary). A window with no objects holds the previous
/// object's strain decayed up to the window's start, so silences fade out
/// instead of dropping to zero. Windows before the first object stay at zero.
pub fn aggregate(
    chart: &Chart,
    strains: &StrainSeries,
    spec: WindowSpec,
    config: &StrainConfig,
) -> WindowedSeries {
    let times: Vec<Milliseconds> = chart.hit_objects.iter().map(|o| o.time).collect();
    let windows = WindowedSeries {
        origin_ms: spec.origin_ms,
        window_size_ms: spec.size_ms,
        aim: aggregate_axis(&times, &strains.aim, spec, config.aim_decay),
        speed: aggregate_axis(&times, &strains.speed, spec, config.speed_decay),
    };
    log::debug!(
        "aggregated {} objects into {} windows of {}ms",
        times.len(),
        windows.len(),
        spec.size_ms
    );
    windows
}

fn aggregate_axis(
    times: &[Milliseconds],
    strains: &[f64],
    spec: WindowSpec,
    decay_rate: f64,
) -> Vec<f64> {
    if times.is_empty() || strains.is_empty() {
        return Vec::new();
    }

    let mut windows = Vec::with_capacity(spec.window_count(times[times.len() - 1]));
    windows.push(0.0_f64);
    let mut prev: Option<(Milliseconds, f64)> = None;

    for (&time, &strain) in times.iter().zip(strains) {
        while spec.window_end(windows.len() - 1) < time {
            let current = windows.len() - 1;
            let window_end = spec.window_end(current);
            let carry = prev.map_or(0.0, |(t, s)| decayed(s, decay_rate, window_end - t));
            windows[current] = windows[current].max(carry);
            windows.push(carry);
        }

        let current = windows.len() - 1;
        windows[current] = windows[current].max(strain);
        prev = Some((time, strain));
    }

    windows
}
