//! Mission state machine
//!
//! Three ordered stages (mine, deflect, land) followed by a terminal
//! Completed stage. Clicks are validated against the current stage; the
//! landing delay is a timed sub-state of stage 3 counted down by the tick.

use super::body::{BodyId, BodyKind};
use super::state::{GameEvent, SimulationState, SoundEffect};
use crate::consts::*;

/// Current mission stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionStage {
    /// Stage 1: mine ordinary asteroids
    Mine,
    /// Stage 2: deflect one PHA
    Deflect,
    /// Stage 3: land on a planet
    Land,
    /// All missions done; nothing changes anymore
    Completed,
}

impl MissionStage {
    /// Stage number as shown in the HUD (Completed shows as 4)
    pub fn number(&self) -> u32 {
        match self {
            MissionStage::Mine => 1,
            MissionStage::Deflect => 2,
            MissionStage::Land => 3,
            MissionStage::Completed => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MissionStage::Mine => "Mine Asteroids",
            MissionStage::Deflect => "Deflect the PHA!",
            MissionStage::Land => "Explore Planets!",
            MissionStage::Completed => "All Missions Completed!",
        }
    }

    /// Guidance shown when the wrong kind of body is clicked
    fn guidance(&self) -> &'static str {
        match self {
            MissionStage::Mine => "Mission 1: You need to mine asteroids. Click on an asteroid.",
            MissionStage::Deflect => {
                "Mission 2: You need to deflect a Potentially Hazardous Asteroid (PHA). Click on a PHA."
            }
            MissionStage::Land => "Mission 3: Explore planets. Click on a planet to land.",
            MissionStage::Completed => "All missions completed! Congratulations!",
        }
    }
}

/// Landing sequence in progress
#[derive(Debug, Clone, PartialEq)]
pub struct Landing {
    pub planet: String,
    /// Seconds until resources are gathered
    pub remaining: f32,
}

/// Mission progress and score
#[derive(Debug, Clone)]
pub struct Mission {
    pub stage: MissionStage,
    pub score: u64,
    /// Asteroids mined during stage 1
    pub mined: u32,
    /// Set while stage 3 waits out the landing delay
    pub landing: Option<Landing>,
}

impl Default for Mission {
    fn default() -> Self {
        Self::new()
    }
}

impl Mission {
    pub fn new() -> Self {
        Self {
            stage: MissionStage::Mine,
            score: 0,
            mined: 0,
            landing: None,
        }
    }

    /// HUD mission line, e.g. "Mission 2: Deflect the PHA!"
    pub fn text(&self) -> String {
        format!("Mission {}: {}", self.stage.number(), self.stage.label())
    }
}

/// Result of a click on a body
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Mined,
    Deflected,
    LandingStarted,
    /// Wrong body for this stage; nothing changed
    Rejected(String),
    /// The id does not name a live body
    Unknown,
}

/// Apply a click on `id` to the mission
pub fn handle_interaction(state: &mut SimulationState, id: BodyId) -> Outcome {
    let Some(body) = state.body(id) else {
        log::warn!("Interaction with unknown body {:?}", id);
        return Outcome::Unknown;
    };
    let kind = body.kind;
    let name = body.name.clone();

    if let Some(landing) = &state.mission.landing {
        let msg = format!("Landing on {} in progress...", landing.planet);
        return reject(state, msg);
    }

    match (state.mission.stage, kind) {
        (MissionStage::Mine, BodyKind::Asteroid) => {
            mine(state, id, &name);
            Outcome::Mined
        }
        (MissionStage::Deflect, BodyKind::HazardousAsteroid) => {
            deflect(state, id, &name);
            Outcome::Deflected
        }
        (MissionStage::Land, BodyKind::Planet) => {
            begin_landing(state, name);
            Outcome::LandingStarted
        }
        (stage, _) => reject(state, stage.guidance().to_string()),
    }
}

fn reject(state: &mut SimulationState, msg: String) -> Outcome {
    state.push_event(GameEvent::Notice(msg.clone()));
    Outcome::Rejected(msg)
}

fn award(state: &mut SimulationState, points: u64) {
    state.mission.score += points;
    state.push_event(GameEvent::ScoreChanged(state.mission.score));
}

fn announce(state: &mut SimulationState, details: String) {
    let text = state.mission.text();
    state.push_event(GameEvent::MissionChanged { text, details });
}

fn mine(state: &mut SimulationState, id: BodyId, name: &str) {
    state.push_event(GameEvent::Sound(SoundEffect::Mine));
    award(state, MINE_POINTS);
    state.remove_body(id);

    state.mission.mined += 1;
    log::info!("Mined {} ({} of {})", name, state.mission.mined, ASTEROIDS_TO_MINE);

    if state.mission.mined >= ASTEROIDS_TO_MINE {
        state.mission.stage = MissionStage::Deflect;
        announce(
            state,
            "Click on a Potentially Hazardous Asteroid to deflect it and save Earth.".to_string(),
        );
    } else {
        let details = format!(
            "Mined {} out of {} required asteroids.",
            state.mission.mined, ASTEROIDS_TO_MINE
        );
        announce(state, details);
    }
}

fn deflect(state: &mut SimulationState, id: BodyId, name: &str) {
    state.push_event(GameEvent::Sound(SoundEffect::Deflect));
    award(state, DEFLECT_POINTS);

    if let Some(body) = state.body_mut(id) {
        body.deflect(DEFLECTION_FACTOR);
        log::info!("Deflected {} (orbit speed now {})", name, body.orbit_speed);
    }

    state.mission.stage = MissionStage::Land;
    announce(
        state,
        "Click on a planet to land and gather resources.".to_string(),
    );
}

fn begin_landing(state: &mut SimulationState, planet: String) {
    state.push_event(GameEvent::Sound(SoundEffect::Land));
    state.push_event(GameEvent::ControlsEnabled(false));
    state.push_event(GameEvent::Notice(format!(
        "Landing on {}... Gathering resources!",
        planet
    )));
    log::info!("Landing on {}", planet);

    state.mission.landing = Some(Landing {
        planet,
        remaining: LANDING_DELAY_SECS,
    });
}

/// Count down an active landing by `dt` wall-clock seconds and finish it
/// once the delay has elapsed.
pub fn advance_landing(state: &mut SimulationState, dt: f32) {
    let Some(landing) = state.mission.landing.as_mut() else {
        return;
    };
    landing.remaining -= dt.max(0.0);
    if landing.remaining > 0.0 {
        return;
    }

    let Some(landing) = state.mission.landing.take() else {
        return;
    };
    award(state, LAND_POINTS);
    state.push_event(GameEvent::Notice(format!(
        "Resources gathered from {}!",
        landing.planet
    )));
    state.push_event(GameEvent::ControlsEnabled(true));

    state.mission.stage = MissionStage::Completed;
    announce(
        state,
        "Congratulations! You have successfully completed all missions.".to_string(),
    );
    log::info!("All missions completed, final score {}", state.mission.score);
}
