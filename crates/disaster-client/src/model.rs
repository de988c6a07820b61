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

//! Data model for disaster-risk points.
//!
//! The backend reports raw [`DisasterPoint`]s with a `chance` between 0 and
//! 100. The heat layer works on [`HeatPoint`]s whose weight is normalised to
//! the 0.0 - 1.0 range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::heat::HeatLayerOptions;

/// A single point as served by `/api/disaster/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisasterPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Probability-like intensity, 0 - 100.
    pub chance: f64,
}

/// A weighted point ready for the heat layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    /// Normalised intensity, `chance / 100`.
    pub weight: f64,
}

impl HeatPoint {
    /// `[lat, lon, weight]` triple, the shape heat layers are usually fed with.
    #[must_use]
    pub fn as_triple(&self) -> [f64; 3] {
        [self.lat, self.lon, self.weight]
    }
}

impl From<&DisasterPoint> for HeatPoint {
    fn from(point: &DisasterPoint) -> Self {
        Self {
            lat: point.lat,
            lon: point.lon,
            weight: point.chance / 100.0,
        }
    }
}

/// Convert backend points into heat points, preserving order and count.
#[must_use]
pub fn to_heat_points(points: &[DisasterPoint]) -> Vec<HeatPoint> {
    points.iter().map(HeatPoint::from).collect()
}

/// Disaster types linked from the dashboard.
///
/// Any other identifier is still accepted by the backend, which falls back to
/// its default data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisasterKind {
    Fire,
    Flood,
    Earthquake,
    Storm,
}

impl DisasterKind {
    pub const ALL: [DisasterKind; 4] = [
        DisasterKind::Fire,
        DisasterKind::Flood,
        DisasterKind::Earthquake,
        DisasterKind::Storm,
    ];

    /// Identifier used in the request path.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DisasterKind::Fire => "fire",
            DisasterKind::Flood => "flood",
            DisasterKind::Earthquake => "earthquake",
            DisasterKind::Storm => "storm",
        }
    }

    /// Human-readable display name
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            DisasterKind::Fire => "Wildfire",
            DisasterKind::Flood => "Flood",
            DisasterKind::Earthquake => "Earthquake",
            DisasterKind::Storm => "Tropical storm",
        }
    }

    /// Look up a known kind by identifier (case-insensitive).
    #[must_use]
    pub fn from_identifier(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(id.trim()))
    }
}

/// Heat points loaded for one disaster identifier.
#[derive(Debug, Clone)]
pub struct HeatLayer {
    pub disaster: String,
    pub points: Vec<HeatPoint>,
    pub options: HeatLayerOptions,
    pub loaded_at: DateTime<Utc>,
}

impl HeatLayer {
    #[must_use]
    pub fn new(disaster: impl Into<String>, points: Vec<HeatPoint>) -> Self {
        Self {
            disaster: disaster.into(),
            points,
            options: HeatLayerOptions::default(),
            loaded_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
