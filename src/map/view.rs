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

//! The map view: base tiles, heat overlays and notices in one owned object.
//!
//! A `MapView` is created once per window and only touched from the UI
//! thread. Load outcomes produced elsewhere are handed to [`MapView::apply`].

use std::path::PathBuf;

use disaster_client::{HeatLayer, LoadOutcome};
use log::{debug, warn};
use walkers::{lat_lon, HttpOptions, HttpTiles, Map, MapMemory, Position, Tiles};

use super::esri::EsriImagerySource;
use super::heat_layer::{HeatOverlay, HeatmapPlugin};
use crate::notice::NoticeQueue;

pub const DEFAULT_CENTER_LAT: f64 = 20.0;
pub const DEFAULT_CENTER_LON: f64 = 0.0;
pub const DEFAULT_ZOOM: f64 = 2.0;

pub struct MapView {
    memory: MapMemory,
    center: Position,
    base_tiles: HttpTiles,
    overlays: Vec<HeatOverlay>,
    next_overlay_id: u64,
    notices: NoticeQueue,
}

impl MapView {
    /// Create the view centred on (20, 0) at zoom 2 with the satellite layer attached.
    pub fn new(ctx: &egui::Context, tile_cache: Option<PathBuf>) -> Self {
        let mut memory = MapMemory::default();
        if let Err(e) = memory.set_zoom(DEFAULT_ZOOM) {
            warn!("Could not set initial zoom {}: {:?}", DEFAULT_ZOOM, e);
        }

        if let Some(dir) = &tile_cache {
            debug!("Caching satellite tiles in {}", dir.display());
        }
        let http_options = HttpOptions {
            cache: tile_cache,
            ..Default::default()
        };
        let base_tiles = HttpTiles::with_options(EsriImagerySource, http_options, ctx.clone());

        Self {
            memory,
            center: lat_lon(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LON),
            base_tiles,
            overlays: Vec::new(),
            next_overlay_id: 0,
            notices: NoticeQueue::new(),
        }
    }

    /// Apply the outcome of one load: add a heat layer or raise a notice.
    pub fn apply(&mut self, disaster: &str, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded(layer) => {
                debug!("Adding heat layer '{}' with {} points", layer.disaster, layer.len());
                let id = self.next_overlay_id;
                self.next_overlay_id += 1;
                self.overlays.push(HeatOverlay::new(id, layer));
            }
            LoadOutcome::Empty => {
                warn!("No data received for '{}'", disaster);
                self.notices.empty_data(disaster);
            }
            LoadOutcome::Failed(e) => {
                warn!("Load for '{}' failed: {}", disaster, e);
                self.notices.fetch_failure(disaster);
            }
        }
    }

    pub fn heat_layers(&self) -> impl Iterator<Item = &HeatLayer> {
        self.overlays.iter().map(HeatOverlay::layer)
    }

    pub fn heat_layer_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn clear_heat_layers(&mut self) {
        self.overlays.clear();
    }

    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    /// Close a notice. Returns `false` if it was already gone.
    pub fn dismiss_notice(&mut self, id: u64) -> bool {
        self.notices.dismiss(id)
    }

    /// Draw pending notices and close the ones acknowledged this frame.
    pub fn show_notices(&mut self, ctx: &egui::Context) {
        for id in self.notices.show(ctx) {
            self.dismiss_notice(id);
        }
    }

    /// Attribution text and link of the satellite layer.
    ///
    /// The base layer is attached at construction and never removed
    pub fn base_attribution(&self) -> (&'static str, &'static str) {
        let attribution = Tiles::attribution(&self.base_tiles);
        (attribution.text, attribution.url)
    }

    pub fn zoom(&self) -> f64 {
        self.memory.zoom()
    }

    /// Return to the initial centre and zoom
    pub fn reset_view(&mut self) {
        self.memory.follow_my_position();
        if let Err(e) = self.memory.set_zoom(DEFAULT_ZOOM) {
            warn!("Could not reset zoom: {:?}", e);
        }
    }

    /// Draw the map, all heat layers and the attribution label.
    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let tiles: &mut dyn Tiles = &mut self.base_tiles;
        let mut map = Map::new(Some(tiles), &mut self.memory, self.center);
        for overlay in &mut self.overlays {
            map = map.with_plugin(HeatmapPlugin::new(overlay));
        }
        let response = ui.add(map);

        let (text, url) = self.base_attribution();
        egui::Area::new(egui::Id::new("map_attribution"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-6.0, -6.0))
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.hyperlink_to(egui::RichText::new(text).small(), url);
                });
            });

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::esri::{ATTRIBUTION_TEXT, ATTRIBUTION_URL};
    use crate::notice::NoticeLevel;
    use disaster_client::{DisasterPoint, FetchError};

    fn view() -> MapView {
        MapView::new(&egui::Context::default(), None)
    }

    fn loaded(disaster: &str) -> LoadOutcome {
        LoadOutcome::from_payload(
            disaster,
            Some(vec![DisasterPoint {
                lat: 10.0,
                lon: 20.0,
                chance: 50.0,
            }]),
        )
    }

    #[test]
    fn test_initial_view() {
        let view = view();
        assert_eq!(view.zoom(), DEFAULT_ZOOM);
        assert_eq!(view.heat_layer_count(), 0);
        assert!(view.notices().is_empty());
        assert_eq!(view.base_attribution(), (ATTRIBUTION_TEXT, ATTRIBUTION_URL));
    }

    #[test]
    fn test_loaded_adds_layer() {
        let mut view = view();
        view.apply("fire", loaded("fire"));

        assert_eq!(view.heat_layer_count(), 1);
        let layer = view.heat_layers().next().unwrap();
        assert_eq!(layer.points[0].as_triple(), [10.0, 20.0, 0.5]);
        assert!(view.notices().is_empty());
    }

    #[test]
    fn test_empty_raises_warning_without_layer() {
        let mut view = view();
        view.apply("flood", LoadOutcome::Empty);

        assert_eq!(view.heat_layer_count(), 0);
        let notice = view.notices().iter().next().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
    }

    #[test]
    fn test_failure_raises_error_without_layer() {
        let mut view = view();
        view.apply("storm", LoadOutcome::Failed(FetchError::EmptyIdentifier));

        assert_eq!(view.heat_layer_count(), 0);
        let notice = view.notices().iter().next().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(view.zoom(), DEFAULT_ZOOM);
    }

    #[test]
    fn test_base_layer_survives_every_outcome() {
        let mut view = view();
        let outcomes = [
            ("flood", LoadOutcome::Empty),
            ("storm", LoadOutcome::Failed(FetchError::EmptyIdentifier)),
            ("fire", loaded("fire")),
        ];

        for (disaster, outcome) in outcomes {
            view.apply(disaster, outcome);
            assert_eq!(
                view.base_attribution(),
                (ATTRIBUTION_TEXT, ATTRIBUTION_URL),
                "base layer after '{disaster}'"
            );
        }
        assert_eq!(view.heat_layer_count(), 1);
        assert_eq!(view.notices().len(), 2);
    }

    #[test]
    fn test_dismiss_notice() {
        let mut view = view();
        view.apply("flood", LoadOutcome::Empty);
        let id = view.notices().iter().next().unwrap().id;

        assert!(view.dismiss_notice(id));
        assert!(view.notices().is_empty());
        assert!(!view.dismiss_notice(id));
    }

    #[test]
    fn test_layers_stack_and_clear() {
        let mut view = view();
        view.apply("fire", loaded("fire"));
        view.apply("earthquake", loaded("earthquake"));

        let names: Vec<_> = view.heat_layers().map(|l| l.disaster.clone()).collect();
        assert_eq!(names, vec!["fire", "earthquake"]);

        view.clear_heat_layers();
        assert_eq!(view.heat_layer_count(), 0);
    }
}
