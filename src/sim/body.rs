//! Celestial body entities
//!
//! A body knows its orbit and computes its own position each frame. The
//! renderable it owns lives in the page's scene and is referenced by handle.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_ORBIT_SPEED;
use crate::orbit_position;

/// Stable identity of a body, allocated once at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Opaque handle to the renderable the scene created for a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderHandle(pub u32);

/// Body classification (immutable after creation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Star,
    Planet,
    Asteroid,
    /// Potentially hazardous asteroid
    HazardousAsteroid,
}

impl BodyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyKind::Star => "star",
            BodyKind::Planet => "planet",
            BodyKind::Asteroid => "asteroid",
            BodyKind::HazardousAsteroid => "PHA",
        }
    }
}

/// How the scene should draw a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    /// Fallback color (0xRRGGBB)
    pub color: u32,
    /// Optional texture URL, preferred over the color when present
    pub texture: Option<String>,
}

impl Appearance {
    pub fn color(color: u32) -> Self {
        Self {
            color,
            texture: None,
        }
    }

    pub fn textured(color: u32, texture: &str) -> Self {
        Self {
            color,
            texture: Some(texture.to_string()),
        }
    }
}

/// Orbit speed lookup keyed by the body's lowercased name.
///
/// Keyed by name rather than kind, so feed bodies with real designations get
/// the default speed unless literally named "asteroid" or "pha".
pub fn orbit_speed_for_name(name: &str) -> f32 {
    match name.to_lowercase().as_str() {
        "mercury" => 0.04,
        "venus" => 0.02,
        "earth" => 0.01,
        "mars" => 0.008,
        "asteroid" => 0.015,
        "pha" => 0.012,
        _ => DEFAULT_ORBIT_SPEED,
    }
}

/// A star, planet or asteroid on a circular orbit around the origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelestialBody {
    pub id: BodyId,
    pub name: String,
    pub kind: BodyKind,
    /// Display radius in scene units
    pub radius: f32,
    pub appearance: Appearance,
    /// Orbital radius (0 for the star)
    pub distance: f32,
    /// Current orbital phase in radians (unbounded)
    pub angle: f32,
    /// Angular velocity in radians per simulated second
    pub orbit_speed: f32,
    /// Current position in scene space
    pub position: Vec3,
    /// Renderable owned by this body, once the scene has created it
    #[serde(skip)]
    pub render: Option<RenderHandle>,
}

impl CelestialBody {
    pub fn new(
        id: BodyId,
        name: &str,
        kind: BodyKind,
        radius: f32,
        appearance: Appearance,
        distance: f32,
        angle: f32,
    ) -> Self {
        let mut body = Self {
            id,
            name: name.to_string(),
            kind,
            radius,
            appearance,
            distance,
            angle,
            orbit_speed: orbit_speed_for_name(name),
            position: Vec3::ZERO,
            render: None,
        };
        body.place();
        body
    }

    /// Advance the orbit by `dt` seconds scaled by `time_multiplier`.
    /// Stars never move.
    pub fn update_position(&mut self, dt: f32, time_multiplier: f32) {
        if self.kind == BodyKind::Star {
            return;
        }
        self.angle += self.orbit_speed * dt * time_multiplier;
        self.place();
    }

    /// Recompute position from the current phase
    fn place(&mut self) {
        self.position = if self.kind == BodyKind::Star {
            Vec3::ZERO
        } else {
            orbit_position(self.distance, self.angle)
        };
    }

    /// Permanently speed up the orbit (PHA deflection)
    pub fn deflect(&mut self, factor: f32) {
        self.orbit_speed *= factor;
    }
}
