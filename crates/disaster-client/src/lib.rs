// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Client library for disaster-risk heat layers.
//!
//! The library is split into layers that can be used on their own:
//!
//! - **Model**: backend points and their normalised heat form
//! - **API layer**: async HTTP fetch of `/api/disaster/{id}`
//! - **Heat layer**: gradient palette, grid clustering and rasterisation
//!
//! [`load_heat_layer`] wires the first two together for one render call.
//!
//! # Quick Start
//!
//! ```no_run
//! use disaster_client::{load_heat_layer, DisasterApi, LoadOutcome};
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = DisasterApi::new("http://127.0.0.1:5000").unwrap();
//!
//!     match load_heat_layer(&api, "fire").await {
//!         LoadOutcome::Loaded(layer) => println!("{} heat points", layer.len()),
//!         LoadOutcome::Empty => println!("no data"),
//!         LoadOutcome::Failed(e) => println!("failed: {e}"),
//!     }
//! }
//! ```
//!
//! # Heat transform only
//!
//! ```
//! use disaster_client::{to_heat_points, DisasterPoint};
//!
//! let heat = to_heat_points(&[DisasterPoint { lat: 10.0, lon: 20.0, chance: 50.0 }]);
//! assert_eq!(heat[0].as_triple(), [10.0, 20.0, 0.5]);
//! ```

pub mod api;
pub mod heat;
pub mod model;

use std::fmt::Debug;

use log::{debug, error, info, log_enabled, Level};

pub use api::{parse_payload, DisasterApi, FetchError, DEFAULT_API_BASE_URL};
pub use heat::{Gradient, HeatLayerOptions, HeatRaster, ScreenPoint};
pub use model::{to_heat_points, DisasterKind, DisasterPoint, HeatLayer, HeatPoint};

/// Points shown when a payload is logged at `info`.
const LOG_PREVIEW_POINTS: usize = 5;

/// Short form of a point list for the console: the count and the first few entries.
fn preview<T: Debug>(items: &[T]) -> String {
    let shown = items.len().min(LOG_PREVIEW_POINTS);
    let head = items[..shown]
        .iter()
        .map(|item| format!("{item:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > shown {
        format!("{} points [{head}, ...]", items.len())
    } else {
        format!("{} points [{head}]", items.len())
    }
}

/// Result of one load for a disaster identifier.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Points were received and converted.
    Loaded(HeatLayer),
    /// The backend answered with no points.
    Empty,
    /// Network, HTTP or parse failure.
    Failed(FetchError),
}

impl LoadOutcome {
    /// Classify a decoded payload.
    #[must_use]
    pub fn from_payload(disaster: &str, payload: Option<Vec<DisasterPoint>>) -> Self {
        match payload {
            Some(points) if !points.is_empty() => {
                let heat = to_heat_points(&points);
                let triples: Vec<[f64; 3]> = heat.iter().map(HeatPoint::as_triple).collect();
                info!("Formatted heat data: {}", preview(&triples));
                if log_enabled!(Level::Debug) && triples.len() > LOG_PREVIEW_POINTS {
                    debug!("Formatted heat data (full): {:?}", triples);
                }
                LoadOutcome::Loaded(HeatLayer::new(disaster.trim(), heat))
            }
            _ => LoadOutcome::Empty,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}

/// Fetch and convert the points for one disaster identifier.
///
/// Failures are logged here and returned as [`LoadOutcome::Failed`]; nothing
/// is retried.
pub async fn load_heat_layer(api: &DisasterApi, disaster: &str) -> LoadOutcome {
    info!("Loading map for disaster: {}", disaster);

    match api.fetch_points(disaster).await {
        Ok(payload) => {
            match &payload {
                Some(points) => info!("Fetched disaster data: {}", preview(points)),
                None => info!("Fetched disaster data: no payload"),
            }
            let outcome = LoadOutcome::from_payload(disaster, payload);
            if let LoadOutcome::Loaded(layer) = &outcome {
                info!("Loaded {} heat points for '{}'", layer.len(), layer.disaster);
            }
            outcome
        }
        Err(e) => {
            error!("Error loading map data for '{}': {}", disaster, e);
            LoadOutcome::Failed(e)
        }
    }
}
