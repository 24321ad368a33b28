//! Raster and vector layer definitions for the catch dashboard: WMS
//! descriptors, the base map, legend ramps and the current animation.

pub mod basemap;
pub mod layer;
pub mod streamline;
pub mod symbology;
pub mod wms;

pub use layer::*;
