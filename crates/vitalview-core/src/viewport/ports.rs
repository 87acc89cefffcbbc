//! Ports for the UI collaborators driven by the viewport controller.

use crate::target::{Orbit, Vec3};
use async_trait::async_trait;

/// Handle of a marker created by a [`ModelViewer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Marker to attach to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    /// Region the marker belongs to
    pub label: String,
    pub position: Vec3,
    pub normal: Vec3,
}

impl MarkerSpec {
    /// Value for the marker's `data-position` attribute.
    pub fn data_position(&self) -> String {
        self.position.to_string()
    }

    /// Value for the marker's `data-normal` attribute.
    pub fn data_normal(&self) -> String {
        self.normal.to_unitless()
    }
}

/// Viewport-relative position in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

/// On-screen bounding box of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Outcome of waiting for a camera transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSettle {
    /// The viewer reported the transition finished.
    Settled,
    /// The viewer cannot report completion; the caller falls back to a delay.
    Unsupported,
}

/// The external model-viewing widget.
#[async_trait]
pub trait ModelViewer: Send + Sync {
    /// Whether the model is loaded and accepts commands.
    fn is_ready(&self) -> bool {
        true
    }

    fn set_camera_target(&self, target: Vec3);

    fn set_camera_orbit(&self, orbit: Orbit);

    /// Moves the camera to its goal immediately, skipping interpolation.
    fn jump_camera_to_goal(&self);

    /// Resolves when the current camera transition has finished.
    async fn wait_camera_settled(&self) -> CameraSettle {
        CameraSettle::Unsupported
    }

    fn add_marker(&self, marker: &MarkerSpec) -> MarkerId;

    fn remove_marker(&self, id: MarkerId);

    /// Bounding box of a marker, or `None` if it is not laid out.
    fn marker_bounds(&self, id: MarkerId) -> Option<ScreenRect>;
}

/// The popup that shows an explanation next to a marker.
pub trait ExplanationOverlay: Send + Sync {
    fn show_at(&self, position: ScreenPoint, text: &str);

    fn hide(&self);
}
