use osu_schema::{Chart, StrainSeries};

use crate::config::StrainConfig;

/// Diameter of a circle at circle size 0 before the size reduction is applied.
const BASE_CIRCLE_DIAMETER: f64 = 64.0;
const SMALL_CIRCLE_BONUS_RANGE: f64 = 5.0;
const SMALL_CIRCLE_BONUS_SCALE: f64 = 50.0;

const SPEED_FACTOR_MIN: f64 = 0.95;
const SPEED_FACTOR_DIAMETER: f64 = 1.2;
const SPEED_FACTOR_STREAM: f64 = 1.6;
const SPEED_FACTOR_MAX: f64 = 2.5;

/// Strain value of the first object on both axes.
pub const SEED_STRAIN: f64 = 1.0;

pub fn circle_radius(circle_size: f64) -> f64 {
    BASE_CIRCLE_DIAMETER / 2.0 * (1.0 - 0.7 * (circle_size - 5.0) / 5.0)
}

/// Scale factor from playfield distance to distance relative to
/// `config.normalized_radius`. Radii under `config.small_circle_radius` get up
/// to a 10% boost on top.
pub fn distance_normalizer(circle_size: f64, config: &StrainConfig) -> f64 {
    let radius = circle_radius(circle_size);
    let mut scale = config.normalized_radius / radius;
    if radius < config.small_circle_radius {
        let bonus = (config.small_circle_radius - radius).min(SMALL_CIRCLE_BONUS_RANGE)
            / SMALL_CIRCLE_BONUS_SCALE;
        scale *= 1.0 + bonus;
    }
    scale
}

/// `strain` after `elapsed_ms` of exponential decay at `rate` per second.
pub fn decayed(strain: f64, rate: f64, elapsed_ms: f64) -> f64 {
    strain * rate.powf(elapsed_ms / 1000.0)
}

pub fn aim_strain(prev: f64, elapsed_ms: f64, normalized_dist: f64, config: &StrainConfig) -> f64 {
    let time_factor = 1.0 / elapsed_ms.max(config.min_delta_ms);
    let dist_factor = normalized_dist.powf(config.aim_distance_exponent);
    decayed(prev, config.aim_decay, elapsed_ms) + config.aim_base * time_factor * dist_factor
}

/// Piecewise-linear weight of the jump distance for the speed axis.
pub fn speed_distance_factor(normalized_dist: f64, config: &StrainConfig) -> f64 {
    let half = config.half_diameter();
    let d = normalized_dist;
    if d > config.single_spacing {
        SPEED_FACTOR_MAX
    } else if d > config.stream_spacing {
        lerp(
            SPEED_FACTOR_STREAM,
            SPEED_FACTOR_MAX,
            (d - config.stream_spacing) / (config.single_spacing - config.stream_spacing),
        )
    } else if d > config.almost_diameter {
        lerp(
            SPEED_FACTOR_DIAMETER,
            SPEED_FACTOR_STREAM,
            (d - config.almost_diameter) / (config.stream_spacing - config.almost_diameter),
        )
    } else if d > half {
        lerp(
            SPEED_FACTOR_MIN,
            SPEED_FACTOR_DIAMETER,
            (d - half) / (config.almost_diameter - half),
        )
    } else {
        SPEED_FACTOR_MIN
    }
}

pub fn speed_strain(prev: f64, elapsed_ms: f64, normalized_dist: f64, config: &StrainConfig) -> f64 {
    let time_factor = 1.0 / elapsed_ms.max(config.min_delta_ms);
    let dist_factor = speed_distance_factor(normalized_dist, config);
    decayed(prev, config.speed_decay, elapsed_ms) + config.speed_base * time_factor * dist_factor
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Per-object aim and speed strain. Times are not checked for monotonicity:
/// a negative gap makes the decay term grow instead of shrink.
pub fn compute(chart: &Chart, config: &StrainConfig) -> StrainSeries {
    let objects = &chart.hit_objects;
    let mut series = StrainSeries {
        aim: Vec::with_capacity(objects.len()),
        speed: Vec::with_capacity(objects.len()),
    };
    if objects.is_empty() {
        return series;
    }

    let normalizer = distance_normalizer(chart.difficulty.circle_size, config);
    let mut aim = SEED_STRAIN;
    let mut speed = SEED_STRAIN;
    series.aim.push(aim);
    series.speed.push(speed);

    for pair in objects.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let elapsed = cur.time - prev.time;
        let dist = (cur.x - prev.x).hypot(cur.y - prev.y) * normalizer;

        aim = aim_strain(aim, elapsed, dist, config);
        speed = speed_strain(speed, elapsed, dist, config);
        series.aim.push(aim);
        series.speed.push(speed);
    }

    log::debug!(
        "computed strain for {} objects (normalizer {normalizer:.4})",
        objects.len()
    );
    series
}
