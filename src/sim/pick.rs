//! Pointer picking
//!
//! Turns a click in screen space into a ray from the camera and finds the
//! nearest body whose sphere the ray hits. Bodies are matched by identity,
//! so only live bodies in the state can ever be returned.

use glam::{Vec2, Vec3};

use super::body::BodyId;
use super::state::SimulationState;
use crate::consts::{CAMERA_FOV_Y, CAMERA_START_Z};

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Convert a pointer position to normalized device coordinates
    /// (x right, y up, both in [-1, 1])
    pub fn to_ndc(&self, pointer: Vec2) -> Vec2 {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        Vec2::new((pointer.x / w) * 2.0 - 1.0, -(pointer.y / h) * 2.0 + 1.0)
    }
}

/// Perspective camera as reported by the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_START_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: CAMERA_FOV_Y,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Ray from the eye through a point in normalized device coordinates
    pub fn ray_through(&self, ndc: Vec2, aspect: f32) -> Ray {
        let forward = (self.target - self.eye).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        let half = (self.fov_y / 2.0).tan();

        let dir = forward + right * (ndc.x * half * aspect) + up * (ndc.y * half);
        Ray {
            origin: self.eye,
            dir: dir.normalize_or_zero(),
        }
    }
}

/// A half-line with unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Distance along the ray to the front surface of the sphere, if any.
    /// A ray starting inside the sphere misses it.
    pub fn hit_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let s = disc.sqrt();
        let (near, far) = (-b - s, -b + s);
        if near < 0.0 { None } else { Some(near) }
    }
}

/// Nearest intersected body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub id: BodyId,
    pub distance: f32,
}

/// Cast a ray and return the nearest live body it hits within the far plane
pub fn pick(state: &SimulationState, ray: &Ray, far: f32) -> Option<PickHit> {
    if ray.dir == Vec3::ZERO {
        return None;
    }
    state
        .bodies()
        .filter_map(|body| {
            ray.hit_sphere(body.position, body.radius)
                .filter(|&t| t <= far)
                .map(|distance| PickHit {
                    id: body.id,
                    distance,
                })
        })
        .min_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Resolve a pointer click to the body under it
pub fn resolve(
    state: &SimulationState,
    camera: &Camera,
    viewport: &Viewport,
    pointer: Vec2,
) -> Option<BodyId> {
    let ndc = viewport.to_ndc(pointer);
    let ray = camera.ray_through(ndc, viewport.aspect());
    pick(state, &ray, camera.far).map(|hit| hit.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{Appearance, BodyKind};
    use crate::sim::mission::handle_interaction;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn set_angle(state: &mut SimulationState, id: BodyId, angle: f32) {
        let body = state.body_mut(id).unwrap();
        body.angle = angle;
        body.update_position(0.0, 0.0);
    }

    fn id_of(state: &SimulationState, name: &str) -> BodyId {
        state.bodies().find(|b| b.name == name).unwrap().id
    }

    /// Line every planet up on +X so only the sun sits on the center line
    fn clear_view(state: &mut SimulationState) {
        for name in ["Mercury", "Venus", "Earth", "Mars"] {
            let id = id_of(state, name);
            set_angle(state, id, 0.0);
        }
    }

    const VIEW: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn test_to_ndc() {
        assert_eq!(VIEW.to_ndc(Vec2::new(400.0, 300.0)), Vec2::ZERO);
        assert_eq!(VIEW.to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(VIEW.to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_hit_sphere() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            dir: Vec3::NEG_Z,
        };
        let t = ray.hit_sphere(Vec3::ZERO, 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
        assert!(ray.hit_sphere(Vec3::new(3.0, 0.0, 0.0), 1.0).is_none());
        // Sphere behind the origin
        assert!(ray.hit_sphere(Vec3::new(0.0, 0.0, 20.0), 1.0).is_none());
        // Origin inside the sphere
        assert!(ray.hit_sphere(Vec3::new(0.0, 0.0, 10.0), 2.0).is_none());
        // Origin on the surface, sphere ahead
        let t = ray.hit_sphere(Vec3::new(0.0, 0.0, 9.0), 1.0).unwrap();
        assert!(t.abs() < 1e-5);
    }

    #[test]
    fn test_center_click_hits_sun() {
        let mut state = SimulationState::new(1);
        clear_view(&mut state);
        let hit = resolve(&state, &Camera::default(), &VIEW, Vec2::new(400.0, 300.0));
        assert_eq!(hit, Some(id_of(&state, "Sun")));
    }

    #[test]
    fn test_nearest_body_wins() {
        let mut state = SimulationState::new(1);
        clear_view(&mut state);
        // Earth at (0, 0, 5): directly between camera and sun
        let earth = id_of(&state, "Earth");
        set_angle(&mut state, earth, FRAC_PI_2);
        let hit = resolve(&state, &Camera::default(), &VIEW, Vec2::new(400.0, 300.0));
        assert_eq!(hit, Some(earth));
    }

    #[test]
    fn test_click_on_offset_body() {
        let mut state = SimulationState::new(2);
        clear_view(&mut state);
        // Mars at (-7, 0, 0), left of the sun
        let mars = id_of(&state, "Mars");
        set_angle(&mut state, mars, PI);

        let camera = Camera::default();
        // Project Mars onto the screen and click there
        let half = (camera.fov_y / 2.0).tan();
        let ndc_x = -7.0 / (CAMERA_START_Z * half * VIEW.aspect());
        let px = (ndc_x + 1.0) / 2.0 * VIEW.width;
        let hit = resolve(&state, &camera, &VIEW, Vec2::new(px, 300.0));
        assert_eq!(hit, Some(mars));
    }

    #[test]
    fn test_empty_space_misses() {
        let mut state = SimulationState::new(3);
        clear_view(&mut state);
        let hit = resolve(&state, &Camera::default(), &VIEW, Vec2::new(5.0, 5.0));
        assert_eq!(hit, None);
    }

    #[test]
    fn test_body_enclosing_camera_is_not_picked() {
        let mut state = SimulationState::new(5);
        clear_view(&mut state);
        // Asteroid centered on the camera eye at (0, 0, 15)
        let rock = state.spawn_body("rock", BodyKind::Asteroid, 2.0, Appearance::color(0x808080), CAMERA_START_Z);
        set_angle(&mut state, rock, FRAC_PI_2);

        let hit = resolve(&state, &Camera::default(), &VIEW, Vec2::new(400.0, 300.0));
        assert_eq!(hit, Some(id_of(&state, "Sun")));
    }

    #[test]
    fn test_mined_asteroid_cannot_be_picked() {
        let mut state = SimulationState::new(4);
        clear_view(&mut state);
        let rock = state.spawn_body("rock", BodyKind::Asteroid, 0.5, Appearance::color(0x808080), 10.0);
        set_angle(&mut state, rock, FRAC_PI_2);

        let camera = Camera::default();
        let center = Vec2::new(400.0, 300.0);
        assert_eq!(resolve(&state, &camera, &VIEW, center), Some(rock));

        handle_interaction(&mut state, rock);
        assert_eq!(resolve(&state, &camera, &VIEW, center), Some(id_of(&state, "Sun")));
    }
}
