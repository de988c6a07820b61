//! Map rendering: satellite base tiles and heat overlays.
//!
//! This module provides the Esri imagery tile source, the heat layer plugin
//! and the [`MapView`] that owns both.

pub mod esri;
pub mod heat_layer;
pub mod view;

pub use view::MapView;
