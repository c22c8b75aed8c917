//! Per-frame simulation tick
//!
//! Advances every live body along its orbit and counts down the landing
//! sequence. Body updates are independent of each other.

use super::mission::advance_landing;
use super::state::SimulationState;

/// Longest frame delta accepted (tab switches can produce huge gaps)
pub const MAX_FRAME_DT: f32 = 0.1;

/// Advance the simulation by one rendered frame of `dt` wall-clock seconds
pub fn tick(state: &mut SimulationState, dt: f32) {
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }
    let orbit_dt = dt.min(MAX_FRAME_DT);
    let multiplier = state.time_multiplier();

    for body in state.bodies_mut() {
        body.update_position(orbit_dt, multiplier);
    }

    // Landing delay runs on unclamped wall-clock time, independent of the slider
    advance_landing(state, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::LANDING_DELAY_SECS;
    use crate::sim::body::{Appearance, BodyKind};
    use crate::sim::mission::{MissionStage, handle_interaction};

    #[test]
    fn test_tick_moves_planets_not_sun() {
        let mut state = SimulationState::new(11);
        let before: Vec<_> = state.bodies().map(|b| (b.kind, b.angle)).collect();

        tick(&mut state, 0.05);

        for (body, (kind, angle)) in state.bodies().zip(before) {
            if kind == BodyKind::Star {
                assert_eq!(body.angle, angle);
            } else {
                assert!(body.angle > angle);
                assert!((body.position.length() - body.distance).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_tick_respects_multiplier() {
        let mut slow = SimulationState::new(3);
        let mut fast = SimulationState::new(3);
        fast.set_time_multiplier(4.0);

        let start = slow.bodies().nth(1).unwrap().angle;
        tick(&mut slow, 0.05);
        tick(&mut fast, 0.05);

        let slow_delta = slow.bodies().nth(1).unwrap().angle - start;
        let fast_delta = fast.bodies().nth(1).unwrap().angle - start;
        assert!((fast_delta - 4.0 * slow_delta).abs() < 1e-5);
    }

    #[test]
    fn test_tick_ignores_bad_dt() {
        let mut state = SimulationState::new(5);
        let before: Vec<_> = state.bodies().map(|b| b.angle).collect();
        tick(&mut state, -1.0);
        tick(&mut state, f32::NAN);
        let after: Vec<_> = state.bodies().map(|b| b.angle).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_mined_asteroid_not_updated() {
        let mut state = SimulationState::new(9);
        let rock = state.spawn_body("rock", BodyKind::Asteroid, 0.1, Appearance::color(0x808080), 10.0);
        handle_interaction(&mut state, rock);
        tick(&mut state, 0.05);
        assert!(state.bodies().all(|b| b.id != rock));
        assert_eq!(state.body_count(), 5);
    }

    fn start_landing(state: &mut SimulationState) {
        let rocks: Vec<_> = (0..3)
            .map(|i| state.spawn_body("rock", BodyKind::Asteroid, 0.1, Appearance::color(0), 10.0 + i as f32))
            .collect();
        let pha = state.spawn_body("pha", BodyKind::HazardousAsteroid, 0.1, Appearance::color(0), 20.0);
        for id in rocks {
            handle_interaction(state, id);
        }
        handle_interaction(state, pha);
        let mars = state.bodies().find(|b| b.name == "Mars").unwrap().id;
        handle_interaction(state, mars);
        assert!(state.mission.landing.is_some());
    }

    #[test]
    fn test_landing_delay_not_stretched_by_slow_frames() {
        let mut state = SimulationState::new(13);
        start_landing(&mut state);

        // 2 fps: four half-second frames are exactly the landing delay
        for _ in 0..3 {
            tick(&mut state, 0.5);
            assert_eq!(state.mission.stage, MissionStage::Land);
        }
        tick(&mut state, 0.5);
        assert_eq!(state.mission.stage, MissionStage::Completed);
        assert_eq!(state.mission.score, 30 + 50 + 100);
    }

    #[test]
    fn test_slow_frame_still_clamps_orbit_step() {
        let mut state = SimulationState::new(14);
        let mercury = state.bodies().find(|b| b.name == "Mercury").unwrap().id;
        let start = state.body(mercury).unwrap().angle;
        tick(&mut state, 0.5);
        let step = state.body(mercury).unwrap().angle - start;
        assert!((step - 0.04 * MAX_FRAME_DT).abs() < 1e-5);
    }

    #[test]
    fn test_landing_completes_while_orbits_continue() {
        let mut state = SimulationState::new(21);
        let rocks: Vec<_> = (0..3)
            .map(|i| state.spawn_body("rock", BodyKind::Asteroid, 0.1, Appearance::color(0), 10.0 + i as f32))
            .collect();
        let pha = state.spawn_body("pha", BodyKind::HazardousAsteroid, 0.1, Appearance::color(0), 20.0);
        for id in rocks {
            handle_interaction(&mut state, id);
        }
        handle_interaction(&mut state, pha);
        let earth = state.bodies().find(|b| b.name == "Earth").unwrap().id;
        handle_interaction(&mut state, earth);

        // Slider has no effect on the landing countdown
        state.set_time_multiplier(10.0);
        let start_angle = state.body(earth).unwrap().angle;
        let frames = (LANDING_DELAY_SECS / 0.05).round() as usize - 1;
        for _ in 0..frames {
            tick(&mut state, 0.05);
            assert_eq!(state.mission.stage, MissionStage::Land);
        }
        assert!(state.body(earth).unwrap().angle > start_angle);

        tick(&mut state, MAX_FRAME_DT);
        assert_eq!(state.mission.stage, MissionStage::Completed);
        assert_eq!(state.mission.score, 30 + 50 + 100);
    }
}
