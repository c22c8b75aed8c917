//! Near-Earth-object feed ingestion
//!
//! One-shot fetch of a 7-day NEO feed at startup. Each record becomes an
//! asteroid or PHA body. Records that cannot be read are skipped with a
//! warning; a failed fetch leaves the system without NEOs and the game
//! carries on.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::Deserialize;

use crate::consts::{KM_PER_UNIT, METERS_PER_UNIT, MIN_NEO_RADIUS};
use crate::error::IngestError;
use crate::sim::{Appearance, BodyKind, SimulationState};

/// Feed endpoint
pub const DEFAULT_FEED_URL: &str = "https://api.nasa.gov/neo/rest/v1/feed";
/// Public demo key (rate limited)
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";

const NEO_COLOR: u32 = 0x808080;
const NEO_TEXTURE: &str = "textures/asteroid.jpg";

/// Top-level feed document: date string -> records for that date
#[derive(Debug, Deserialize)]
struct Feed {
    near_earth_objects: BTreeMap<String, Vec<serde_json::Value>>,
}

/// A number the feed may send either as JSON number or as a numeric string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn value(&self) -> Option<f64> {
        let v = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

#[derive(Debug, Deserialize)]
struct RawNeo {
    name: String,
    #[serde(default)]
    is_potentially_hazardous_asteroid: bool,
    estimated_diameter: RawDiameter,
    #[serde(default)]
    close_approach_data: Vec<RawApproach>,
}

#[derive(Debug, Deserialize)]
struct RawDiameter {
    meters: RawDiameterRange,
}

#[derive(Debug, Deserialize)]
struct RawDiameterRange {
    estimated_diameter_min: Numeric,
}

#[derive(Debug, Deserialize)]
struct RawApproach {
    miss_distance: RawMissDistance,
}

#[derive(Debug, Deserialize)]
struct RawMissDistance {
    kilometers: Numeric,
}

/// A feed record scaled into scene units
#[derive(Debug, Clone, PartialEq)]
pub struct NeoRecord {
    pub name: String,
    pub hazardous: bool,
    /// Orbital distance (miss distance km / 100,000)
    pub distance: f32,
    /// Display radius (min diameter m / 1000, at least 0.1)
    pub radius: f32,
}

impl NeoRecord {
    fn from_raw(raw: RawNeo) -> Result<Self, String> {
        let approach = raw
            .close_approach_data
            .first()
            .ok_or("no close approach data")?;
        let km = approach
            .miss_distance
            .kilometers
            .value()
            .filter(|km| *km >= 0.0)
            .ok_or("miss distance is not a non-negative number")?;
        let meters = raw
            .estimated_diameter
            .meters
            .estimated_diameter_min
            .value()
            .filter(|m| *m >= 0.0)
            .ok_or("diameter is not a non-negative number")?;

        Ok(Self {
            name: raw.name,
            hazardous: raw.is_potentially_hazardous_asteroid,
            distance: (km / KM_PER_UNIT as f64) as f32,
            radius: ((meters / METERS_PER_UNIT as f64) as f32).max(MIN_NEO_RADIUS),
        })
    }

    pub fn kind(&self) -> BodyKind {
        if self.hazardous {
            BodyKind::HazardousAsteroid
        } else {
            BodyKind::Asteroid
        }
    }
}

/// Decode a feed document. Dates are visited in sorted order; unreadable
/// records are skipped.
pub fn parse_feed(json: &str) -> Result<Vec<NeoRecord>, IngestError> {
    let feed: Feed = serde_json::from_str(json)?;

    let mut records = Vec::new();
    let mut skipped = 0;
    for (date, entries) in feed.near_earth_objects {
        for entry in entries {
            let parsed = serde_json::from_value::<RawNeo>(entry)
                .map_err(|e| e.to_string())
                .and_then(NeoRecord::from_raw);
            match parsed {
                Ok(record) => records.push(record),
                Err(reason) => {
                    skipped += 1;
                    log::warn!("Skipping NEO record for {}: {}", date, reason);
                }
            }
        }
    }

    log::info!("Parsed {} NEO records ({} skipped)", records.len(), skipped);
    Ok(records)
}

/// Spawn a body for every record. Returns (ordinary, hazardous) counts.
pub fn populate(state: &mut SimulationState, records: &[NeoRecord]) -> (usize, usize) {
    let mut counts = (0, 0);
    for record in records {
        state.spawn_body(
            &record.name,
            record.kind(),
            record.radius,
            Appearance::textured(NEO_COLOR, NEO_TEXTURE),
            record.distance,
        );
        if record.hazardous {
            counts.1 += 1;
        } else {
            counts.0 += 1;
        }
    }
    counts
}

/// Parse a feed document and populate the state from it
pub fn ingest(state: &mut SimulationState, json: &str) -> Result<(usize, usize), IngestError> {
    let records = parse_feed(json)?;
    Ok(populate(state, &records))
}

/// Apply the outcome of a fetch. Errors are logged and otherwise ignored.
/// Returns the number of bodies added.
pub fn apply_fetch(
    state: &mut SimulationState,
    result: Result<Vec<NeoRecord>, IngestError>,
) -> usize {
    match result {
        Ok(records) => {
            let (ordinary, hazardous) = populate(state, &records);
            log::info!("Added {} asteroids and {} PHAs", ordinary, hazardous);
            ordinary + hazardous
        }
        Err(e) => {
            log::error!("Error fetching NEO data: {}", e);
            0
        }
    }
}

/// Build the feed request URL for a date window (dates as YYYY-MM-DD)
pub fn feed_url(base: &str, start_date: &str, end_date: &str, api_key: &str) -> String {
    format!(
        "{}?start_date={}&end_date={}&api_key={}",
        base, start_date, end_date, api_key
    )
}

/// Today's date and the date `days` ahead, as YYYY-MM-DD (UTC)
#[cfg(target_arch = "wasm32")]
pub fn date_window(days: u32) -> (String, String) {
    const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;
    let now = js_sys::Date::now();
    let iso_date = |ms: f64| -> String {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(ms));
        let iso: String = date.to_iso_string().into();
        iso.split('T').next().unwrap_or_default().to_string()
    };
    (iso_date(now), iso_date(now + days as f64 * DAY_MS))
}

/// Fetch and decode the feed
#[cfg(target_arch = "wasm32")]
pub async fn fetch_records(url: &str) -> Result<Vec<NeoRecord>, IngestError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let js_err = |e: wasm_bindgen::JsValue| IngestError::network(format!("{:?}", e));

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);
    let request = Request::new_with_str_and_init(url, &opts).map_err(js_err)?;

    let window = web_sys::window().ok_or_else(|| IngestError::network("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;

    if !response.ok() {
        return Err(IngestError::network(format!(
            "HTTP {} {}",
            response.status(),
            response.status_text()
        )));
    }

    let text = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .as_string()
        .ok_or_else(|| IngestError::parse("response body is not text"))?;

    parse_feed(&text)
}

/// Native stub: there is no browser fetch outside WASM
#[cfg(not(target_arch = "wasm32"))]
pub async fn fetch_records(url: &str) -> Result<Vec<NeoRecord>, IngestError> {
    Err(IngestError::network(format!(
        "fetching {} requires the browser build",
        url
    )))
}

/// Fetch the feed and add its bodies to the simulation owned by `target`.
///
/// Failures are logged and add nothing. The cell is only borrowed after the
/// request completes, so the frame loop keeps running while it is in flight.
/// Returns the number of bodies added.
pub async fn fetch_and_populate<T: AsMut<SimulationState>>(url: &str, target: &RefCell<T>) -> usize {
    let result = fetch_records(url).await;
    let mut owner = target.borrow_mut();
    apply_fetch(owner.as_mut(), result)
}
