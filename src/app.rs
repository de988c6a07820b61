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

use std::time::Duration;

use disaster_client::{DisasterApi, DisasterKind, FetchError};
use log::{info, warn};

use crate::config::AppConfig;
use crate::map::MapView;
use crate::renderer::MapRenderer;

pub struct DisasterMapApp {
    config: AppConfig,
    view: MapView,
    renderer: MapRenderer,
    /// Identifier shown in the selector / text field
    disaster_input: String,
    // Keeps the fetch runtime alive for the lifetime of the window
    _runtime: tokio::runtime::Runtime,
}

impl DisasterMapApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        api: Result<DisasterApi, FetchError>,
        api_base_url: &str,
        runtime: tokio::runtime::Runtime,
        initial_disaster: String,
    ) -> Self {
        info!("Creating map view...");
        let view = MapView::new(&cc.egui_ctx, config.tile_cache_dir());
        let renderer = MapRenderer::new(
            api,
            api_base_url,
            runtime.handle().clone(),
            Some(cc.egui_ctx.clone()),
        );

        let app = Self {
            config,
            view,
            renderer,
            disaster_input: initial_disaster,
            _runtime: runtime,
        };
        app.renderer.init_disaster_map(&app.disaster_input);
        app
    }

    fn load(&mut self, disaster: String) {
        let disaster = disaster.trim().to_string();
        self.renderer.init_disaster_map(&disaster);
        self.disaster_input = disaster;
    }

    /// Apply finished loads. The latest one that produced a layer becomes
    /// the start-up default.
    fn apply_results(&mut self) {
        let applied = self.renderer.poll(&mut self.view);
        let Some(last) = applied.iter().rev().find(|a| a.loaded) else {
            return;
        };
        if self.config.remember_disaster(&last.disaster) {
            if let Err(e) = self.config.save() {
                warn!("Failed to save config: {}", e);
            }
        }
    }

    fn selected_label(&self) -> String {
        DisasterKind::from_identifier(&self.disaster_input)
            .map_or_else(|| self.disaster_input.clone(), |kind| kind.display_name().to_string())
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        let mut requested: Option<String> = None;

        ui.horizontal(|ui| {
            ui.heading("🌍 Disaster Heatmap");
            ui.separator();

            egui::ComboBox::from_label("Disaster")
                .selected_text(self.selected_label())
                .show_ui(ui, |ui| {
                    for kind in DisasterKind::ALL {
                        let selected = DisasterKind::from_identifier(&self.disaster_input) == Some(kind);
                        if ui.selectable_label(selected, kind.display_name()).clicked() {
                            requested = Some(kind.as_str().to_string());
                        }
                    }
                });

            let field = ui.add(
                egui::TextEdit::singleline(&mut self.disaster_input)
                    .hint_text("identifier")
                    .desired_width(120.0),
            );
            let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Load").clicked() || submitted {
                requested = Some(self.disaster_input.clone());
            }

            if ui.button("Clear layers").clicked() {
                self.view.clear_heat_layers();
            }
            if ui.button("Reset view").clicked() {
                self.view.reset_view();
            }

            ui.separator();
            let pending = self.renderer.in_flight();
            let status = if pending > 0 {
                format!("{} layer(s) · loading {}…", self.view.heat_layer_count(), pending)
            } else {
                format!("{} layer(s)", self.view.heat_layer_count())
            };
            ui.label(status)
                .on_hover_text(format!("Backend: {}", self.renderer.backend_label()));
        });

        if let Some(disaster) = requested {
            self.load(disaster);
        }
    }
}

impl eframe::App for DisasterMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_results();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar(ui);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.view.show(ui);
            });

        self.view.show_notices(ctx);

        if self.renderer.in_flight() > 0 {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}
