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

//! Heat layer rendering.
//!
//! Turns screen-projected heat points into an RGBA image:
//!
//! 1. [`cluster`] buckets points on a grid of half the stamp extent and sums
//!    their zoom-scaled intensities.
//! 2. [`HeatRaster::draw`] stamps a blurred disc per cluster into an alpha
//!    buffer using source-over compositing.
//! 3. [`HeatRaster::colorize`] maps each alpha value through the gradient
//!    palette.
//!
//! Nothing here knows about map projections; callers project lat/lon to
//! screen pixels first.

mod gradient;
mod raster;

pub use gradient::{ColorStop, Gradient, Palette, BLUE, LIME, ORANGE, PALETTE_SIZE, RED};
pub use raster::{cluster, HeatRaster, ScreenPoint};

/// Point radius in pixels
pub const DEFAULT_RADIUS: f32 = 25.0;
/// Blur width in pixels
pub const DEFAULT_BLUR: f32 = 15.0;
/// Zoom level at which points reach full intensity
pub const DEFAULT_MAX_ZOOM: f64 = 6.0;
/// Lowest alpha a visible point is drawn with
pub const DEFAULT_MIN_OPACITY: f32 = 0.05;

/// Visual parameters of a heat layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatLayerOptions {
    pub radius: f32,
    pub blur: f32,
    /// Below this zoom intensities are halved for every level.
    pub max_zoom: f64,
    /// Intensity that maps to full opacity.
    pub max: f32,
    pub min_opacity: f32,
    pub gradient: Gradient,
}

impl Default for HeatLayerOptions {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            blur: DEFAULT_BLUR,
            max_zoom: DEFAULT_MAX_ZOOM,
            max: 1.0,
            min_opacity: DEFAULT_MIN_OPACITY,
            gradient: Gradient::disaster_risk(),
        }
    }
}

impl HeatLayerOptions {
    /// Distance from a point's centre at which its stamp fades out completely.
    #[must_use]
    pub fn extent(&self) -> f32 {
        self.radius + self.blur
    }

    /// Intensity multiplier for the given zoom level.
    ///
    /// Full intensity at or above `max_zoom`, halved per level below it, and
    /// never less than 1/4096.
    #[must_use]
    pub fn zoom_scale(&self, zoom: f64) -> f32 {
        let levels = (self.max_zoom - zoom).clamp(0.0, 12.0);
        (1.0 / 2f64.powf(levels)) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = HeatLayerOptions::default();
        assert_eq!(options.radius, 25.0);
        assert_eq!(options.blur, 15.0);
        assert_eq!(options.max_zoom, 6.0);
        assert_eq!(options.extent(), 40.0);
        assert_eq!(options.gradient.stops().len(), 4);
    }

    #[test]
    fn test_zoom_scale() {
        let options = HeatLayerOptions::default();
        assert_eq!(options.zoom_scale(6.0), 1.0);
        assert_eq!(options.zoom_scale(10.0), 1.0);
        assert_eq!(options.zoom_scale(2.0), 1.0 / 16.0);
        assert_eq!(options.zoom_scale(-20.0), 1.0 / 4096.0);
    }
}
