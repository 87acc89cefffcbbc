//! Terminal stand-ins for the page elements.
//!
//! The viewer prints camera commands instead of rendering; markers are laid
//! out on a fake grid so the overlay has somewhere to go.

use colored::Colorize;
use std::collections::HashMap;
use std::sync::Mutex;
use vitalview_core::chat::{FormattedReply, format_reply};
use vitalview_core::conversation::{Role, Turn};
use vitalview_core::target::{Orbit, Vec3};
use vitalview_core::ui::{InputField, MessageLog};
use vitalview_core::viewport::{
    ExplanationOverlay, MarkerId, MarkerSpec, ModelViewer, ScreenPoint, ScreenRect,
};

#[derive(Default)]
pub struct ConsoleViewer {
    next_id: Mutex<u64>,
    markers: Mutex<HashMap<MarkerId, MarkerSpec>>,
}

#[async_trait::async_trait]
impl ModelViewer for ConsoleViewer {
    fn set_camera_target(&self, target: Vec3) {
        println!("{}", format!("  [viewer] camera-target = {target}").bright_black());
    }

    fn set_camera_orbit(&self, orbit: Orbit) {
        println!("{}", format!("  [viewer] camera-orbit = {orbit}").bright_black());
    }

    fn jump_camera_to_goal(&self) {
        println!("{}", "  [viewer] jumpCameraToGoal()".bright_black());
    }

    fn add_marker(&self, marker: &MarkerSpec) -> MarkerId {
        let id = {
            let mut next = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
            *next += 1;
            MarkerId(*next)
        };
        println!(
            "{}",
            format!(
                "  [viewer] marker on {} (data-position=\"{}\" data-normal=\"{}\") - type /click to inspect",
                marker.label,
                marker.data_position(),
                marker.data_normal()
            )
            .yellow()
        );
        self.markers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, marker.clone());
        id
    }

    fn remove_marker(&self, id: MarkerId) {
        let removed = self
            .markers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
        if let Some(marker) = removed {
            println!("{}", format!("  [viewer] marker on {} removed", marker.label).bright_black());
        }
    }

    fn marker_bounds(&self, id: MarkerId) -> Option<ScreenRect> {
        let markers = self.markers.lock().unwrap_or_else(|e| e.into_inner());
        markers.get(&id).map(|_| ScreenRect {
            left: 40.0 * id.0 as f32,
            top: 120.0,
            width: 24.0,
            height: 24.0,
        })
    }
}

pub struct ConsoleOverlay;

impl ExplanationOverlay for ConsoleOverlay {
    fn show_at(&self, position: ScreenPoint, text: &str) {
        println!(
            "{}",
            format!("  [popup @ {:.0},{:.0}] {}", position.x, position.y, text).bright_magenta()
        );
    }

    fn hide(&self) {}
}

/// Prints transcript bubbles; the input field is the readline prompt itself.
pub struct ConsolePage;

impl InputField for ConsolePage {
    fn clear(&self) {}
}

impl MessageLog for ConsolePage {
    fn push(&self, turn: &Turn) {
        match turn.role() {
            // Already echoed by the prompt
            Role::User => {}
            Role::Assistant => match format_reply(turn.content()) {
                FormattedReply::Numbered(items) => {
                    for (i, item) in items.iter().enumerate() {
                        println!("{}", format!("{}. {}", i + 1, item).bright_blue());
                    }
                }
                FormattedReply::Bulleted(items) => {
                    for item in items {
                        println!("{}", format!("• {item}").bright_blue());
                    }
                }
                FormattedReply::Plain(lines) => {
                    for line in lines {
                        println!("{}", line.bright_blue());
                    }
                }
            },
        }
    }
}
