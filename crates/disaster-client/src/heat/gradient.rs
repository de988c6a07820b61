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

//! Colour gradients for heat layers.

/// Number of entries in a colour lookup palette (one per alpha value).
pub const PALETTE_SIZE: usize = 256;

/// Alpha-indexed colour lookup table.
pub type Palette = [[u8; 3]; PALETTE_SIZE];

/// A colour at a position along the gradient (0.0 - 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: [u8; 3],
}

impl ColorStop {
    #[must_use]
    pub const fn new(offset: f32, color: [u8; 3]) -> Self {
        Self { offset, color }
    }
}

pub const BLUE: [u8; 3] = [0, 0, 255];
pub const LIME: [u8; 3] = [0, 255, 0];
pub const ORANGE: [u8; 3] = [255, 165, 0];
pub const RED: [u8; 3] = [255, 0, 0];

/// Piecewise-linear colour gradient.
///
/// Positions before the first stop take the first stop's colour and positions
/// after the last stop take the last stop's colour.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<ColorStop>,
}

impl Gradient {
    /// Build a gradient from stops in any order. Offsets are clamped to 0.0 - 1.0.
    #[must_use]
    pub fn new(stops: impl IntoIterator<Item = ColorStop>) -> Self {
        let mut stops: Vec<ColorStop> = stops
            .into_iter()
            .map(|stop| ColorStop::new(stop.offset.clamp(0.0, 1.0), stop.color))
            .collect();
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self { stops }
    }

    /// Blue through lime and orange to red, used for disaster-risk overlays.
    #[must_use]
    pub fn disaster_risk() -> Self {
        Self::new([
            ColorStop::new(0.4, BLUE),
            ColorStop::new(0.6, LIME),
            ColorStop::new(0.8, ORANGE),
            ColorStop::new(1.0, RED),
        ])
    }

    #[must_use]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Colour at position `t` (0.0 - 1.0).
    #[must_use]
    pub fn sample(&self, t: f32) -> [u8; 3] {
        let Some(first) = self.stops.first() else {
            return [0, 0, 0];
        };
        if t <= first.offset {
            return first.color;
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if t <= hi.offset {
                let span = hi.offset - lo.offset;
                if span <= f32::EPSILON {
                    return hi.color;
                }
                let k = (t - lo.offset) / span;
                return [
                    lerp(lo.color[0], hi.color[0], k),
                    lerp(lo.color[1], hi.color[1], k),
                    lerp(lo.color[2], hi.color[2], k),
                ];
            }
        }

        self.stops[self.stops.len() - 1].color
    }

    /// Lookup table indexed by an 8-bit alpha value.
    #[must_use]
    pub fn palette(&self) -> Palette {
        let mut palette = [[0u8; 3]; PALETTE_SIZE];
        for (i, entry) in palette.iter_mut().enumerate() {
            *entry = self.sample(i as f32 / (PALETTE_SIZE - 1) as f32);
        }
        palette
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::disaster_risk()
    }
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    let a = f32::from(a);
    let b = f32::from(b);
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_first_stop_is_blue() {
        let gradient = Gradient::disaster_risk();
        assert_eq!(gradient.sample(0.0), BLUE);
        assert_eq!(gradient.sample(0.4), BLUE);
    }

    #[test]
    fn test_exact_stops() {
        let gradient = Gradient::disaster_risk();
        assert_eq!(gradient.sample(0.6), LIME);
        assert_eq!(gradient.sample(0.8), ORANGE);
        assert_eq!(gradient.sample(1.0), RED);
    }

    #[test]
    fn test_interpolation_between_stops() {
        let gradient = Gradient::disaster_risk();
        // A quarter of the way from orange to red
        assert_eq!(gradient.sample(0.85), [255, 124, 0]);
    }

    #[test]
    fn test_stops_are_sorted() {
        let gradient = Gradient::new([ColorStop::new(1.0, RED), ColorStop::new(0.4, BLUE)]);
        assert_eq!(gradient.stops()[0].offset, 0.4);
        assert_eq!(gradient.stops()[1].color, RED);
    }

    #[test]
    fn test_palette_endpoints() {
        let palette = Gradient::disaster_risk().palette();
        assert_eq!(palette[0], BLUE);
        assert_eq!(palette[PALETTE_SIZE - 1], RED);
        // Index 102 is exactly 0.4
        assert_eq!(palette[102], BLUE);
    }

    #[test]
    fn test_empty_gradient_is_black() {
        assert_eq!(Gradient::new([]).sample(0.5), [0, 0, 0]);
    }
}
