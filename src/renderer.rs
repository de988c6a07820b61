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

//! Map renderer: turns a disaster identifier into a heat layer on the map.
//!
//! Each call spawns one independent fetch on the tokio runtime. Calls are
//! never cancelled or deduplicated, so overlapping loads land in whatever
//! order their responses arrive. Outcomes come back over a channel and are
//! applied to the [`MapView`] on the UI thread by [`MapRenderer::poll`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use disaster_client::{load_heat_layer, DisasterApi, FetchError, LoadOutcome};
use log::{debug, error};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::map::MapView;

/// Outcome of one `init_disaster_map` call
#[derive(Debug)]
pub struct RenderResult {
    pub disaster: String,
    pub outcome: LoadOutcome,
}

/// A result that `poll` handed to the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub disaster: String,
    pub loaded: bool,
}

#[derive(Debug)]
enum Backend {
    Ready(DisasterApi),
    /// The configured base URL was rejected; every load fails with this reason.
    Invalid { url: String, reason: String },
}

pub struct MapRenderer {
    backend: Backend,
    runtime: Handle,
    results_tx: mpsc::UnboundedSender<RenderResult>,
    results_rx: mpsc::UnboundedReceiver<RenderResult>,
    in_flight: Arc<AtomicUsize>,
    repaint: Option<egui::Context>,
}

impl MapRenderer {
    /// `api` is the result of building the client for `base_url`. A failed
    /// build keeps the map usable and reports a fetch failure on every load.
    ///
    /// `repaint` is woken when a result arrives so the UI picks it up promptly.
    pub fn new(
        api: Result<DisasterApi, FetchError>,
        base_url: &str,
        runtime: Handle,
        repaint: Option<egui::Context>,
    ) -> Self {
        let backend = match api {
            Ok(api) => Backend::Ready(api),
            Err(e) => Backend::Invalid {
                url: base_url.to_string(),
                reason: e.to_string(),
            },
        };
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            runtime,
            results_tx,
            results_rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
            repaint,
        }
    }

    /// Start loading the heat layer for `disaster`. Returns immediately.
    pub fn init_disaster_map(&self, disaster: &str) {
        let api = match &self.backend {
            Backend::Ready(api) => api.clone(),
            Backend::Invalid { url, reason } => {
                error!("Error loading map data for '{}': invalid backend URL '{}': {}", disaster, url, reason);
                let _ = self.results_tx.send(RenderResult {
                    disaster: disaster.to_string(),
                    outcome: LoadOutcome::Failed(FetchError::InvalidBaseUrl {
                        url: url.clone(),
                        reason: reason.clone(),
                    }),
                });
                return;
            }
        };

        debug!("Spawning load for '{}'", disaster);

        let disaster = disaster.to_string();
        let tx = self.results_tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let repaint = self.repaint.clone();

        in_flight.fetch_add(1, Ordering::SeqCst);
        self.runtime.spawn(async move {
            let outcome = load_heat_layer(&api, &disaster).await;
            // Receiver only goes away with the renderer
            let _ = tx.send(RenderResult { disaster, outcome });
            // A load counts as pending until its result is queued for `poll`
            in_flight.fetch_sub(1, Ordering::SeqCst);
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// Apply every finished load to the view, in arrival order.
    pub fn poll(&mut self, view: &mut MapView) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Ok(result) = self.results_rx.try_recv() {
            let loaded = result.outcome.is_loaded();
            view.apply(&result.disaster, result.outcome);
            applied.push(Applied {
                disaster: result.disaster,
                loaded,
            });
        }
        applied
    }

    /// Number of loads whose result has not been queued yet
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Backend address for display
    pub fn backend_label(&self) -> String {
        match &self.backend {
            Backend::Ready(api) => api.base_url().to_string(),
            Backend::Invalid { url, .. } => format!("{url} (invalid)"),
        }
    }
}
