//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Orbits advance only through `tick`
//! - Mission changes only through `handle_interaction` and the landing countdown
//! - Bodies are addressed by `BodyId`, never by name
//! - No rendering or platform dependencies

pub mod body;
pub mod mission;
pub mod pick;
pub mod state;
pub mod tick;

pub use body::{Appearance, BodyId, BodyKind, CelestialBody, RenderHandle, orbit_speed_for_name};
pub use mission::{Landing, Mission, MissionStage, Outcome, advance_landing, handle_interaction};
pub use pick::{Camera, PickHit, Ray, Viewport, pick, resolve};
pub use state::{GameEvent, SimulationState, SoundEffect};
pub use tick::{MAX_FRAME_DT, tick};
