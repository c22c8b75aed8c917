//! Orbital Missions - a browser solar-system mission game
//!
//! Core modules:
//! - `sim`: Simulation (orbits, picking, mission state machine)
//! - `neo`: Near-Earth-object feed ingestion
//! - `settings`: Persisted player preferences
//! - `audio`: Procedural mission sound cues (WASM only)
//! - `error`: Ingestion error types

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod neo;
pub mod settings;
pub mod sim;

pub use error::IngestError;
pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Points awarded per mission action
    pub const MINE_POINTS: u64 = 10;
    pub const DEFLECT_POINTS: u64 = 50;
    pub const LAND_POINTS: u64 = 100;

    /// Asteroids that must be mined to leave stage 1
    pub const ASTEROIDS_TO_MINE: u32 = 3;

    /// Orbit speed multiplier applied to a deflected PHA (permanent)
    pub const DEFLECTION_FACTOR: f32 = 1.5;

    /// Landing sequence duration in seconds (wall clock, not time-scaled)
    pub const LANDING_DELAY_SECS: f32 = 2.0;

    /// Time multiplier slider bounds
    pub const TIME_MULTIPLIER_MIN: f32 = 0.0;
    pub const TIME_MULTIPLIER_MAX: f32 = 10.0;
    pub const TIME_MULTIPLIER_DEFAULT: f32 = 1.0;

    /// Feed scaling: kilometers per scene unit of orbital distance
    pub const KM_PER_UNIT: f32 = 100_000.0;
    /// Feed scaling: meters per scene unit of body radius
    pub const METERS_PER_UNIT: f32 = 1000.0;
    /// Smallest radius an ingested body may have
    pub const MIN_NEO_RADIUS: f32 = 0.1;

    /// Default orbit speed when the name lookup has no entry (rad/s)
    pub const DEFAULT_ORBIT_SPEED: f32 = 0.01;

    /// Initial camera distance along +Z
    pub const CAMERA_START_Z: f32 = 15.0;
    /// Camera vertical field of view (75 degrees)
    pub const CAMERA_FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;
}

/// Position on a planar orbit of radius `distance` at phase `angle`.
///
/// Orbits lie in the XZ plane; Y is always zero.
#[inline]
pub fn orbit_position(distance: f32, angle: f32) -> Vec3 {
    Vec3::new(distance * angle.cos(), 0.0, distance * angle.sin())
}

/// Format the HUD score line
pub fn score_text(score: u64) -> String {
    format!("Score: {}", score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_orbit_position_on_circle() {
        let pos = orbit_position(5.0, PI / 3.0);
        assert!((pos.length() - 5.0).abs() < 1e-5);
        assert_eq!(pos.y, 0.0);
    }

    #[test]
    fn test_score_text() {
        assert_eq!(score_text(0), "Score: 0");
        assert_eq!(score_text(160), "Score: 160");
    }
}
