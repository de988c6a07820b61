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

use std::collections::BTreeMap;

use super::{HeatLayerOptions, Palette, PALETTE_SIZE};

/// A point in viewport pixels with its intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub intensity: f32,
}

impl ScreenPoint {
    #[must_use]
    pub fn new(x: f32, y: f32, intensity: f32) -> Self {
        Self { x, y, intensity }
    }
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    x: f32,
    y: f32,
    intensity: f32,
}

/// Merge nearby points into grid cells.
///
/// `points` carry their raw weight as intensity. Points more than one stamp
/// extent outside the `width` x `height` viewport are dropped. Each cell ends
/// up at the intensity-weighted mean of its members, with the summed,
/// zoom-scaled intensity capped at `options.max`.
#[must_use]
pub fn cluster<I>(
    points: I,
    width: f32,
    height: f32,
    zoom: f64,
    options: &HeatLayerOptions,
) -> Vec<ScreenPoint>
where
    I: IntoIterator<Item = ScreenPoint>,
{
    let extent = options.extent();
    let cell_size = (extent / 2.0).max(1.0);
    let scale = options.zoom_scale(zoom);

    let mut grid: BTreeMap<(i32, i32), Cell> = BTreeMap::new();

    for point in points {
        if !point.x.is_finite() || !point.y.is_finite() {
            continue;
        }
        if point.x < -extent || point.y < -extent || point.x > width + extent || point.y > height + extent {
            continue;
        }

        let key = (
            (point.x / cell_size).floor() as i32,
            (point.y / cell_size).floor() as i32,
        );
        let k = point.intensity * scale;

        grid.entry(key)
            .and_modify(|cell| {
                let total = cell.intensity + k;
                if total > 0.0 {
                    cell.x = (cell.x * cell.intensity + point.x * k) / total;
                    cell.y = (cell.y * cell.intensity + point.y * k) / total;
                }
                cell.intensity = total;
            })
            .or_insert(Cell {
                x: point.x,
                y: point.y,
                intensity: k,
            });
    }

    grid.into_values()
        .map(|cell| ScreenPoint::new(cell.x.round(), cell.y.round(), cell.intensity.min(options.max)))
        .collect()
}

/// Pre-computed blurred disc.
struct Stamp {
    half: usize,
    size: usize,
    alpha: Vec<f32>,
}

impl Stamp {
    fn new(radius: f32, blur: f32) -> Self {
        let inner = (radius - blur).max(0.0);
        let outer = radius + blur;
        let half = outer.ceil().max(0.0) as usize;
        let size = half * 2 + 1;

        let mut alpha = Vec::with_capacity(size * size);
        for j in 0..size {
            for i in 0..size {
                let dx = i as f32 - half as f32;
                let dy = j as f32 - half as f32;
                alpha.push(falloff(dx.hypot(dy), inner, outer));
            }
        }

        Self { half, size, alpha }
    }
}

/// Solid inside `inner`, smoothstep fade to zero at `outer`.
fn falloff(distance: f32, inner: f32, outer: f32) -> f32 {
    if distance <= inner {
        return 1.0;
    }
    if distance >= outer {
        return 0.0;
    }
    let t = (distance - inner) / (outer - inner);
    1.0 - t * t * (3.0 - 2.0 * t)
}

/// Greyscale accumulation buffer for one heat layer.
#[derive(Debug, Clone)]
pub struct HeatRaster {
    width: usize,
    height: usize,
    alpha: Vec<f32>,
}

impl HeatRaster {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            alpha: vec![0.0; width * height],
        }
    }

    /// Stamp every clustered point into a fresh buffer.
    #[must_use]
    pub fn draw(points: &[ScreenPoint], width: usize, height: usize, options: &HeatLayerOptions) -> Self {
        let mut raster = Self::new(width, height);
        let stamp = Stamp::new(options.radius, options.blur);
        let max = if options.max > 0.0 { options.max } else { 1.0 };

        for point in points {
            let opacity = (point.intensity / max).clamp(options.min_opacity, 1.0);
            raster.stamp(&stamp, point.x, point.y, opacity);
        }

        raster
    }

    fn stamp(&mut self, stamp: &Stamp, x: f32, y: f32, opacity: f32) {
        let left = x.round() as i64 - stamp.half as i64;
        let top = y.round() as i64 - stamp.half as i64;

        for j in 0..stamp.size {
            let py = top + j as i64;
            if py < 0 || py >= self.height as i64 {
                continue;
            }
            for i in 0..stamp.size {
                let px = left + i as i64;
                if px < 0 || px >= self.width as i64 {
                    continue;
                }
                let src = stamp.alpha[j * stamp.size + i] * opacity;
                if src <= 0.0 {
                    continue;
                }
                let dst = &mut self.alpha[py as usize * self.width + px as usize];
                *dst = src + *dst * (1.0 - src);
            }
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Accumulated alpha at a pixel, 0.0 outside the buffer.
    #[must_use]
    pub fn alpha_at(&self, x: usize, y: usize) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.alpha[y * self.width + x]
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.alpha.iter().all(|a| *a <= 0.0)
    }

    /// Map alpha through the palette into unmultiplied RGBA bytes.
    #[must_use]
    pub fn colorize(&self, palette: &Palette) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.alpha.len() * 4);
        for alpha in &self.alpha {
            let level = (alpha.clamp(0.0, 1.0) * (PALETTE_SIZE - 1) as f32).round() as usize;
            if level == 0 {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            let [r, g, b] = palette[level];
            rgba.extend_from_slice(&[r, g, b, level as u8]);
        }
        rgba
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heat::{BLUE, RED};

    fn full_zoom() -> f64 {
        HeatLayerOptions::default().max_zoom
    }

    #[test]
    fn test_cluster_merges_nearby_points() {
        let options = HeatLayerOptions::default();
        let points = [ScreenPoint::new(100.0, 100.0, 0.3), ScreenPoint::new(104.0, 100.0, 0.1)];

        let clustered = cluster(points, 400.0, 400.0, full_zoom(), &options);
        assert_eq!(clustered.len(), 1);
        assert_eq!(clustered[0].x, 101.0);
        assert_eq!(clustered[0].y, 100.0);
        assert!((clustered[0].intensity - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_cluster_caps_intensity() {
        let options = HeatLayerOptions::default();
        let points = [ScreenPoint::new(50.0, 50.0, 0.8), ScreenPoint::new(51.0, 51.0, 0.9)];

        let clustered = cluster(points, 200.0, 200.0, full_zoom(), &options);
        assert_eq!(clustered.len(), 1);
        assert_eq!(clustered[0].intensity, 1.0);
    }

    #[test]
    fn test_cluster_keeps_distant_points_apart() {
        let options = HeatLayerOptions::default();
        let points = [ScreenPoint::new(10.0, 10.0, 0.5), ScreenPoint::new(300.0, 300.0, 0.5)];

        assert_eq!(cluster(points, 400.0, 400.0, full_zoom(), &options).len(), 2);
    }

    #[test]
    fn test_cluster_drops_far_offscreen_points() {
        let options = HeatLayerOptions::default();
        let points = [
            ScreenPoint::new(-30.0, 10.0, 1.0),
            ScreenPoint::new(-500.0, 10.0, 1.0),
            ScreenPoint::new(10.0, 900.0, 1.0),
            ScreenPoint::new(f32::NAN, 10.0, 1.0),
        ];

        let clustered = cluster(points, 400.0, 400.0, full_zoom(), &options);
        assert_eq!(clustered.len(), 1);
        assert_eq!(clustered[0].x, -30.0);
    }

    #[test]
    fn test_cluster_scales_by_zoom() {
        let options = HeatLayerOptions::default();
        let clustered = cluster([ScreenPoint::new(10.0, 10.0, 1.0)], 100.0, 100.0, 2.0, &options);
        assert_eq!(clustered[0].intensity, 1.0 / 16.0);
    }

    #[test]
    fn test_draw_single_point() {
        let options = HeatLayerOptions::default();
        let raster = HeatRaster::draw(&[ScreenPoint::new(50.0, 50.0, 1.0)], 100, 100, &options);

        assert_eq!(raster.alpha_at(50, 50), 1.0);
        // Solid up to radius - blur
        assert_eq!(raster.alpha_at(60, 50), 1.0);
        // Faded out beyond radius + blur
        assert_eq!(raster.alpha_at(95, 50), 0.0);
        assert_eq!(raster.alpha_at(0, 0), 0.0);
        let edge = raster.alpha_at(75, 50);
        assert!(edge > 0.0 && edge < 1.0);
    }

    #[test]
    fn test_draw_applies_min_opacity() {
        let options = HeatLayerOptions::default();
        let raster = HeatRaster::draw(&[ScreenPoint::new(20.0, 20.0, 0.0001)], 40, 40, &options);
        assert!((raster.alpha_at(20, 20) - options.min_opacity).abs() < 1e-6);
    }

    #[test]
    fn test_draw_composites_source_over() {
        let options = HeatLayerOptions::default();
        let points = [ScreenPoint::new(20.0, 20.0, 0.5), ScreenPoint::new(20.0, 20.0, 0.5)];
        let raster = HeatRaster::draw(&points, 40, 40, &options);
        assert!((raster.alpha_at(20, 20) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_draw_clips_at_edges() {
        let options = HeatLayerOptions::default();
        let raster = HeatRaster::draw(&[ScreenPoint::new(0.0, 0.0, 1.0)], 10, 10, &options);
        assert_eq!(raster.alpha_at(0, 0), 1.0);
        assert!(!raster.is_blank());
    }

    #[test]
    fn test_colorize() {
        let options = HeatLayerOptions::default();
        let palette = options.gradient.palette();
        let raster = HeatRaster::draw(&[ScreenPoint::new(50.0, 50.0, 1.0)], 100, 100, &options);
        let rgba = raster.colorize(&palette);

        assert_eq!(rgba.len(), 100 * 100 * 4);
        let centre = (50 * 100 + 50) * 4;
        assert_eq!(&rgba[centre..centre + 4], &[RED[0], RED[1], RED[2], 255]);
        assert_eq!(&rgba[0..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_colorize_faint_point_is_blue() {
        let options = HeatLayerOptions::default();
        let palette = options.gradient.palette();
        let raster = HeatRaster::draw(&[ScreenPoint::new(5.0, 5.0, 0.0)], 10, 10, &options);
        let rgba = raster.colorize(&palette);
        let centre = (5 * 10 + 5) * 4;
        assert_eq!(&rgba[centre..centre + 3], &BLUE);
        assert_eq!(rgba[centre + 3], 13);
    }
}
