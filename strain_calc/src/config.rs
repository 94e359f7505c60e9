/// Tunable constants of the strain model.
///
/// Decay rates are "fraction of strain left after one second".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrainConfig {
    pub aim_decay: f64,
    pub aim_base: f64,
    pub aim_distance_exponent: f64,

    pub speed_decay: f64,
    pub speed_base: f64,
    /// Roughly the normalized circle diameter (104 units) minus some overlap.
    pub almost_diameter: f64,
    /// Spacing past which a stream gets hard to alternate.
    pub stream_spacing: f64,
    pub single_spacing: f64,

    /// Floor on the elapsed time used by the increment terms, in ms.
    pub min_delta_ms: f64,
    /// Radius every distance is expressed relative to.
    pub normalized_radius: f64,
    /// Circles smaller than this radius get an extra distance boost.
    pub small_circle_radius: f64,
}

impl Default for StrainConfig {
    fn default() -> Self {
        Self {
            aim_decay: 0.15,
            aim_base: 26.25,
            aim_distance_exponent: 0.99,

            speed_decay: 0.3,
            speed_base: 1400.0,
            almost_diameter: 90.0,
            stream_spacing: 110.0,
            single_spacing: 125.0,

            min_delta_ms: 50.0,
            normalized_radius: 52.0,
            small_circle_radius: 30.0,
        }
    }
}

impl StrainConfig {
    pub fn half_diameter(&self) -> f64 {
        self.almost_diameter / 2.0
    }
}
