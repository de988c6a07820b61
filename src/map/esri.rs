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

use walkers::sources::{Attribution, TileSource};
use walkers::TileId;

pub const ATTRIBUTION_TEXT: &str =
    "Tiles © Esri — Source: Esri, Earthstar Geographics, NASA, USGS, NOAA";
pub const ATTRIBUTION_URL: &str = "https://www.esri.com/";

/// Tile source for Esri World Imagery satellite tiles
/// Note the ArcGIS template orders the path as zoom/y/x
pub struct EsriImagerySource;

impl TileSource for EsriImagerySource {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{}/{}/{}",
            tile_id.zoom, tile_id.y, tile_id.x
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: ATTRIBUTION_TEXT,
            url: ATTRIBUTION_URL,
            logo_light: None,
            logo_dark: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_url_orders_y_before_x() {
        let url = EsriImagerySource.tile_url(TileId { x: 3, y: 5, zoom: 4 });
        assert_eq!(
            url,
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/4/5/3"
        );
    }

    #[test]
    fn test_attribution() {
        assert_eq!(EsriImagerySource.attribution().text, ATTRIBUTION_TEXT);
    }
}
