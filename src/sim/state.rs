//! Simulation state and core types
//!
//! All mutable game state lives in one owned aggregate that is passed
//! explicitly to the tick, the picker and the mission state machine.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{Appearance, BodyId, BodyKind, CelestialBody, RenderHandle};
use super::mission::Mission;
use crate::consts::*;

/// Sound cues the presentation shell can play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Asteroid mined
    Mine,
    /// PHA deflected
    Deflect,
    /// Landing sequence started
    Land,
}

/// Things the presentation shell must reflect, in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ScoreChanged(u64),
    MissionChanged { text: String, details: String },
    Sound(SoundEffect),
    /// Camera manipulation on/off
    ControlsEnabled(bool),
    /// Blocking user-facing message
    Notice(String),
    /// A body was created and needs a renderable
    BodySpawned(BodyId),
    /// A body was destroyed; its renderable (if any) must be detached
    BodyRemoved {
        id: BodyId,
        handle: Option<RenderHandle>,
    },
}

/// A fixed body of the starting system
struct FixedBody {
    name: &'static str,
    kind: BodyKind,
    radius: f32,
    color: u32,
    distance: f32,
    texture: &'static str,
}

const FIXED_BODIES: [FixedBody; 5] = [
    FixedBody { name: "Sun", kind: BodyKind::Star, radius: 1.5, color: 0xffff00, distance: 0.0, texture: "textures/sun.jpg" },
    FixedBody { name: "Mercury", kind: BodyKind::Planet, radius: 0.2, color: 0xb87333, distance: 2.0, texture: "textures/mercury.jpg" },
    FixedBody { name: "Venus", kind: BodyKind::Planet, radius: 0.4, color: 0xe5c67b, distance: 3.5, texture: "textures/venus.jpg" },
    FixedBody { name: "Earth", kind: BodyKind::Planet, radius: 0.5, color: 0x0000ff, distance: 5.0, texture: "textures/earth.jpg" },
    FixedBody { name: "Mars", kind: BodyKind::Planet, radius: 0.3, color: 0xff0000, distance: 7.0, texture: "textures/mars.jpg" },
];

/// Complete simulation state
#[derive(Debug)]
pub struct SimulationState {
    /// Every live body by identity
    bodies: BTreeMap<BodyId, CelestialBody>,
    /// Sun and planets (never removed)
    fixed: Vec<BodyId>,
    /// Ordinary asteroids still in play
    asteroids: Vec<BodyId>,
    /// Potentially hazardous asteroids still in play
    hazardous: Vec<BodyId>,
    /// Mission progress and score
    pub mission: Mission,
    /// Global time scale from the slider
    time_multiplier: f32,
    /// Pending events for the presentation shell
    events: Vec<GameEvent>,
    /// Seeded RNG for initial orbital phases
    rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl SimulationState {
    /// Create the starting system (sun and four planets) with the given seed
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            bodies: BTreeMap::new(),
            fixed: Vec::new(),
            asteroids: Vec::new(),
            hazardous: Vec::new(),
            mission: Mission::new(),
            time_multiplier: TIME_MULTIPLIER_DEFAULT,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        for fixed in &FIXED_BODIES {
            state.spawn_body(
                fixed.name,
                fixed.kind,
                fixed.radius,
                Appearance::textured(fixed.color, fixed.texture),
                fixed.distance,
            );
        }

        state
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a body at a random orbital phase and file it in its collection
    pub fn spawn_body(
        &mut self,
        name: &str,
        kind: BodyKind,
        radius: f32,
        appearance: Appearance,
        distance: f32,
    ) -> BodyId {
        let id = self.next_entity_id();
        let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
        let body = CelestialBody::new(id, name, kind, radius, appearance, distance, angle);
        self.bodies.insert(id, body);

        match kind {
            BodyKind::Star | BodyKind::Planet => self.fixed.push(id),
            BodyKind::Asteroid => self.asteroids.push(id),
            BodyKind::HazardousAsteroid => self.hazardous.push(id),
        }

        self.events.push(GameEvent::BodySpawned(id));
        id
    }

    /// Remove a body from the map and its collection, detaching its renderable
    pub fn remove_body(&mut self, id: BodyId) -> Option<CelestialBody> {
        let body = self.bodies.remove(&id)?;
        let collection = match body.kind {
            BodyKind::Star | BodyKind::Planet => &mut self.fixed,
            BodyKind::Asteroid => &mut self.asteroids,
            BodyKind::HazardousAsteroid => &mut self.hazardous,
        };
        collection.retain(|&other| other != id);

        self.events.push(GameEvent::BodyRemoved {
            id,
            handle: body.render,
        });
        Some(body)
    }

    pub fn body(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(&id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut CelestialBody> {
        self.bodies.get_mut(&id)
    }

    /// All live bodies in ID order
    pub fn bodies(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.values()
    }

    pub(crate) fn bodies_mut(&mut self) -> impl Iterator<Item = &mut CelestialBody> {
        self.bodies.values_mut()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Sun and planets
    pub fn fixed_bodies(&self) -> &[BodyId] {
        &self.fixed
    }

    /// Ordinary asteroids still in play
    pub fn asteroids(&self) -> &[BodyId] {
        &self.asteroids
    }

    /// PHAs still in play
    pub fn hazardous(&self) -> &[BodyId] {
        &self.hazardous
    }

    /// Record the renderable the scene created for a body
    pub fn attach_render(&mut self, id: BodyId, handle: RenderHandle) -> bool {
        match self.bodies.get_mut(&id) {
            Some(body) => {
                body.render = Some(handle);
                true
            }
            None => false,
        }
    }

    pub fn time_multiplier(&self) -> f32 {
        self.time_multiplier
    }

    /// Set the time scale, clamped to the slider range. Non-finite input is ignored.
    pub fn set_time_multiplier(&mut self, multiplier: f32) {
        if multiplier.is_finite() {
            self.time_multiplier = multiplier.clamp(TIME_MULTIPLIER_MIN, TIME_MULTIPLIER_MAX);
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_fixed_system() {
        let state = SimulationState::new(1);
        assert_eq!(state.body_count(), 5);
        assert_eq!(state.fixed_bodies().len(), 5);
        assert!(state.asteroids().is_empty());
        assert!(state.hazardous().is_empty());

        let sun = state.bodies().find(|b| b.name == "Sun").unwrap();
        assert_eq!(sun.kind, BodyKind::Star);
        assert_eq!(sun.position, glam::Vec3::ZERO);

        let mars = state.bodies().find(|b| b.name == "Mars").unwrap();
        assert!((mars.position.length() - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_files_by_kind() {
        let mut state = SimulationState::new(2);
        let a = state.spawn_body("rock", BodyKind::Asteroid, 0.1, Appearance::color(0x808080), 10.0);
        let h = state.spawn_body("pha", BodyKind::HazardousAsteroid, 0.1, Appearance::color(0x808080), 12.0);
        assert_eq!(state.asteroids(), &[a]);
        assert_eq!(state.hazardous(), &[h]);
        assert_ne!(a, h);
    }

    #[test]
    fn test_duplicate_names_get_distinct_ids() {
        let mut state = SimulationState::new(3);
        let a = state.spawn_body("(2020 A)", BodyKind::Asteroid, 0.1, Appearance::color(0), 10.0);
        let b = state.spawn_body("(2020 A)", BodyKind::Asteroid, 0.1, Appearance::color(0), 11.0);
        assert_ne!(a, b);
        assert_eq!(state.body(a).unwrap().distance, 10.0);
        assert_eq!(state.body(b).unwrap().distance, 11.0);
    }

    #[test]
    fn test_remove_emits_detach() {
        let mut state = SimulationState::new(4);
        let a = state.spawn_body("rock", BodyKind::Asteroid, 0.1, Appearance::color(0), 10.0);
        assert!(state.attach_render(a, RenderHandle(42)));
        state.drain_events();

        let removed = state.remove_body(a).unwrap();
        assert_eq!(removed.id, a);
        assert!(state.asteroids().is_empty());
        assert!(state.body(a).is_none());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::BodyRemoved {
                id: a,
                handle: Some(RenderHandle(42))
            }]
        );
        assert!(state.remove_body(a).is_none());
    }

    #[test]
    fn test_time_multiplier_clamped() {
        let mut state = SimulationState::new(5);
        state.set_time_multiplier(25.0);
        assert_eq!(state.time_multiplier(), TIME_MULTIPLIER_MAX);
        state.set_time_multiplier(-1.0);
        assert_eq!(state.time_multiplier(), TIME_MULTIPLIER_MIN);
        state.set_time_multiplier(f32::NAN);
        assert_eq!(state.time_multiplier(), TIME_MULTIPLIER_MIN);
        state.set_time_multiplier(2.5);
        assert_eq!(state.time_multiplier(), 2.5);
    }

    #[test]
    fn test_same_seed_same_phases() {
        let s1 = SimulationState::new(99);
        let s2 = SimulationState::new(99);
        for (a, b) in s1.bodies().zip(s2.bodies()) {
            assert_eq!(a.angle, b.angle);
        }
    }
}
