//! Viewport control.
//!
//! - `ports`: Traits for the external 3D viewer and explanation overlay
//! - `controller`: Camera/marker/overlay choreography (`ViewportController`)

mod controller;
mod ports;

pub use controller::{ActiveHotspot, ViewportController, ViewportHandles};
pub use ports::{
    CameraSettle, ExplanationOverlay, MarkerId, MarkerSpec, ModelViewer, ScreenPoint, ScreenRect,
};
