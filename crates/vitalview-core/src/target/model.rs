//! Geometry types used to frame a region in the 3D viewer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point or direction in model space, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Formats the vector as a bare triple, e.g. `0 0 1`, as used for
    /// marker normals.
    pub fn to_unitless(&self) -> String {
        format!("{} {} {}", self.x, self.y, self.z)
    }
}

/// Renders as `"0m 1.35m 0.05m"`, the viewer's attribute syntax.
impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m {}m {}m", self.x, self.y, self.z)
    }
}

/// Camera position around its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    /// Horizontal angle in degrees (0 faces the front of the model).
    pub azimuth_deg: f32,
    /// Angle from the vertical axis in degrees.
    pub polar_deg: f32,
    /// Distance from the target in metres.
    pub radius_m: f32,
}

impl Orbit {
    pub const fn new(azimuth_deg: f32, polar_deg: f32, radius_m: f32) -> Self {
        Self {
            azimuth_deg,
            polar_deg,
            radius_m,
        }
    }
}

/// Renders as `"0deg 75deg 1.2m"`.
impl fmt::Display for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}deg {}deg {}m",
            self.azimuth_deg, self.polar_deg, self.radius_m
        )
    }
}

fn default_marker_normal() -> Vec3 {
    Vec3::new(0.0, 0.0, 1.0)
}

/// Camera framing and marker placement for one anatomical region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDefinition {
    /// Canonical, lower-cased region name
    pub key: String,
    /// Point the camera looks at
    pub camera_target: Vec3,
    /// Camera orbit around `camera_target`
    pub camera_orbit: Orbit,
    /// Where the interactive marker is attached
    pub marker_position: Vec3,
    /// Surface normal the marker faces
    #[serde(default = "default_marker_normal")]
    pub marker_normal: Vec3,
}

impl TargetDefinition {
    pub fn new(
        key: impl Into<String>,
        camera_target: Vec3,
        camera_orbit: Orbit,
        marker_position: Vec3,
    ) -> Self {
        Self {
            key: key.into().to_lowercase(),
            camera_target,
            camera_orbit,
            marker_position,
            marker_normal: default_marker_normal(),
        }
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.marker_normal = normal;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_attribute_formatting() {
        assert_eq!(Vec3::new(0.0, 1.35, 0.05).to_string(), "0m 1.35m 0.05m");
        assert_eq!(Orbit::new(0.0, 75.0, 1.2).to_string(), "0deg 75deg 1.2m");
        assert_eq!(Vec3::new(0.0, 0.0, 1.0).to_unitless(), "0 0 1");
    }

    #[test]
    fn test_marker_normal_defaults_when_missing() {
        let def: TargetDefinition = toml::from_str(
            r#"
key = "elbow"
camera_target = { x = 0.3, y = 1.1, z = 0.0 }
camera_orbit = { azimuth_deg = 40.0, polar_deg = 80.0, radius_m = 1.0 }
marker_position = { x = 0.32, y = 1.1, z = 0.05 }
"#,
        )
        .unwrap();
        assert_eq!(def.marker_normal, Vec3::new(0.0, 0.0, 1.0));
    }
}
