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

//! Heat overlay drawn on top of the map as a walkers plugin.
//!
//! Each loaded [`HeatLayer`] is rasterised into a texture covering the map
//! viewport. The texture is only rebuilt when the viewport size, zoom or pan
//! offset change.

use disaster_client::heat::{cluster, Palette};
use disaster_client::{HeatLayer, HeatRaster, ScreenPoint};
use egui::{Color32, ColorImage, Rect, TextureHandle, TextureOptions};
use walkers::{lat_lon, MapMemory, Plugin, Projector};

/// What the cached texture was rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RenderKey {
    width: u32,
    height: u32,
    zoom_bits: u64,
    // Screen offset of (0, 0), tracks panning
    anchor_x: i32,
    anchor_y: i32,
}

/// A loaded heat layer and its cached texture
pub struct HeatOverlay {
    id: u64,
    layer: HeatLayer,
    palette: Palette,
    texture: Option<TextureHandle>,
    key: Option<RenderKey>,
}

impl HeatOverlay {
    pub fn new(id: u64, layer: HeatLayer) -> Self {
        let palette = layer.options.gradient.palette();
        Self {
            id,
            layer,
            palette,
            texture: None,
            key: None,
        }
    }

    pub fn layer(&self) -> &HeatLayer {
        &self.layer
    }

    /// Project, cluster and rasterise the layer for the current viewport
    fn render(&self, rect: Rect, zoom: f64, projector: &Projector) -> ColorImage {
        let width = rect.width().max(1.0).round() as usize;
        let height = rect.height().max(1.0).round() as usize;

        let projected = self.layer.points.iter().map(|point| {
            let screen = projector.project(lat_lon(point.lat, point.lon));
            ScreenPoint::new(
                screen.x - rect.min.x,
                screen.y - rect.min.y,
                point.weight as f32,
            )
        });

        let options = &self.layer.options;
        let clustered = cluster(projected, width as f32, height as f32, zoom, options);
        let raster = HeatRaster::draw(&clustered, width, height, options);

        ColorImage::from_rgba_unmultiplied([width, height], &raster.colorize(&self.palette))
    }
}

/// Paints one heat overlay onto the map
pub struct HeatmapPlugin<'a> {
    overlay: &'a mut HeatOverlay,
}

impl<'a> HeatmapPlugin<'a> {
    pub fn new(overlay: &'a mut HeatOverlay) -> Self {
        Self { overlay }
    }
}

impl Plugin for HeatmapPlugin<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        map_memory: &MapMemory,
    ) {
        let rect = response.rect;
        if rect.width() < 1.0 || rect.height() < 1.0 {
            return;
        }

        let zoom = map_memory.zoom();
        let anchor = projector.project(lat_lon(0.0, 0.0));
        let key = RenderKey {
            width: rect.width().round() as u32,
            height: rect.height().round() as u32,
            zoom_bits: zoom.to_bits(),
            anchor_x: (anchor.x - rect.min.x).round() as i32,
            anchor_y: (anchor.y - rect.min.y).round() as i32,
        };

        let overlay = self.overlay;
        if overlay.key != Some(key) {
            let image = overlay.render(rect, zoom, projector);
            match &mut overlay.texture {
                Some(texture) => texture.set(image, TextureOptions::LINEAR),
                None => {
                    overlay.texture = Some(ui.ctx().load_texture(
                        format!("heat_layer_{}", overlay.id),
                        image,
                        TextureOptions::LINEAR,
                    ));
                }
            }
            overlay.key = Some(key);
        }

        if let Some(texture) = &overlay.texture {
            let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter()
                .with_clip_rect(rect)
                .image(texture.id(), rect, uv, Color32::WHITE);
        }
    }
}
