//! Aim and speed strain over a parsed chart, plus fixed-window aggregation.

pub mod config;
pub mod error;
pub mod strain;
pub mod window;

pub use config::StrainConfig;
pub use error::WindowError;
pub use strain::{aim_strain, compute, decayed, distance_normalizer, speed_distance_factor, speed_strain};
pub use window::{aggregate, WindowSpec};
