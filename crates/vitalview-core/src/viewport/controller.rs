use super::ports::{
    CameraSettle, ExplanationOverlay, MarkerId, MarkerSpec, ModelViewer, ScreenPoint,
};
use crate::config::ViewportConfig;
use crate::error::{Result, VitalViewError};
use crate::target::{TargetRegistry, Vec3};
use std::sync::Arc;
use tokio::sync::Mutex;

/// UI handles the controller drives.
///
/// Both are required. A missing handle fails construction when
/// `strict_handles` is set; otherwise the operations needing it become
/// logged no-ops.
#[derive(Clone, Default)]
pub struct ViewportHandles {
    pub viewer: Option<Arc<dyn ModelViewer>>,
    pub overlay: Option<Arc<dyn ExplanationOverlay>>,
}

impl ViewportHandles {
    pub fn new(viewer: Arc<dyn ModelViewer>, overlay: Arc<dyn ExplanationOverlay>) -> Self {
        Self {
            viewer: Some(viewer),
            overlay: Some(overlay),
        }
    }
}

/// The single marker currently placed on the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveHotspot {
    pub marker: MarkerId,
    /// Resolved region key
    pub target: String,
    pub position: Vec3,
    pub explanation: String,
    /// `show` call that created this hotspot
    pub generation: u64,
}

#[derive(Debug, Default)]
struct ViewportState {
    /// Bumped by every `show` and `clear`; a pending placement from an older
    /// generation is dropped.
    generation: u64,
    hotspot: Option<ActiveHotspot>,
    overlay_visible: bool,
    /// One-shot outside-click dismissal, armed by a marker click.
    dismiss_armed: bool,
}

struct Inner {
    viewer: Option<Arc<dyn ModelViewer>>,
    overlay: Option<Arc<dyn ExplanationOverlay>>,
    registry: Arc<TargetRegistry>,
    config: ViewportConfig,
    state: Mutex<ViewportState>,
}

/// Frames anatomical regions in the 3D viewer and manages the marker and
/// explanation overlay.
///
/// Cheap to clone; clones share state. At most one marker exists at any
/// time, even when `show` calls overlap during the settle wait.
#[derive(Clone)]
pub struct ViewportController {
    inner: Arc<Inner>,
}

impl ViewportController {
    /// Creates a controller over the given handles.
    ///
    /// # Errors
    ///
    /// Returns `MissingHandle` if a handle is absent and
    /// `config.strict_handles` is set.
    pub fn new(
        handles: ViewportHandles,
        registry: Arc<TargetRegistry>,
        config: ViewportConfig,
    ) -> Result<Self> {
        for (name, present) in [
            ("viewer", handles.viewer.is_some()),
            ("overlay", handles.overlay.is_some()),
        ] {
            if present {
                continue;
            }
            if config.strict_handles {
                return Err(VitalViewError::missing_handle(name));
            }
            tracing::warn!(
                "[ViewportController] No {} handle, related operations are disabled",
                name
            );
        }

        Ok(Self {
            inner: Arc::new(Inner {
                viewer: handles.viewer,
                overlay: handles.overlay,
                registry,
                config,
                state: Mutex::new(ViewportState::default()),
            }),
        })
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.inner.registry
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.inner.config
    }

    /// Frames `target` and, once the camera has settled, places a marker that
    /// reveals `explanation` when clicked.
    ///
    /// Returns the placed hotspot, or `None` if the viewer is unavailable or
    /// a newer `show`/`clear` superseded this call during the wait.
    pub async fn show(&self, target: &str, explanation: &str) -> Option<ActiveHotspot> {
        let generation = {
            let mut state = self.inner.state.lock().await;
            self.reset(&mut state);
            state.generation
        };

        let Some(viewer) = self.inner.viewer.as_ref() else {
            tracing::warn!("[ViewportController] show('{}') skipped: no viewer", target);
            return None;
        };
        if !viewer.is_ready() {
            tracing::debug!(
                "[ViewportController] show('{}') skipped: viewer not ready",
                target
            );
            return None;
        }

        let definition = self.inner.registry.resolve(target).clone();
        tracing::debug!(
            "[ViewportController] Framing '{}' as '{}' (orbit {}, target {})",
            target,
            definition.key,
            definition.camera_orbit,
            definition.camera_target
        );
        viewer.set_camera_orbit(definition.camera_orbit);
        viewer.set_camera_target(definition.camera_target);
        viewer.jump_camera_to_goal();

        self.wait_for_camera(viewer.as_ref()).await;

        let mut state = self.inner.state.lock().await;
        if state.generation != generation {
            tracing::debug!(
                "[ViewportController] Dropping marker for '{}': superseded",
                definition.key
            );
            return None;
        }

        let marker = viewer.add_marker(&MarkerSpec {
            label: definition.key.clone(),
            position: definition.marker_position,
            normal: definition.marker_normal,
        });
        let hotspot = ActiveHotspot {
            marker,
            target: definition.key,
            position: definition.marker_position,
            explanation: explanation.to_string(),
            generation,
        };
        tracing::debug!(
            "[ViewportController] Placed marker {:?} on '{}'",
            marker,
            hotspot.target
        );
        state.hotspot = Some(hotspot.clone());

        Some(hotspot)
    }

    /// Handles a click on a marker: reveals the explanation next to it and
    /// arms the outside-click dismissal.
    ///
    /// Returns `false` for markers that are no longer active.
    pub async fn marker_clicked(&self, marker: MarkerId) -> bool {
        let (Some(viewer), Some(overlay)) = (&self.inner.viewer, &self.inner.overlay) else {
            tracing::warn!("[ViewportController] Marker click ignored: missing handle");
            return false;
        };

        let mut state = self.inner.state.lock().await;
        let Some(hotspot) = state.hotspot.as_ref().filter(|h| h.marker == marker) else {
            tracing::debug!("[ViewportController] Click on stale marker {:?}", marker);
            return false;
        };

        let Some(bounds) = viewer.marker_bounds(marker) else {
            tracing::warn!(
                "[ViewportController] Marker {:?} has no layout, overlay not shown",
                marker
            );
            return false;
        };

        let position = ScreenPoint {
            x: bounds.left + self.inner.config.popup_offset_x,
            y: bounds.top + self.inner.config.popup_offset_y,
        };
        overlay.show_at(position, &hotspot.explanation);
        state.overlay_visible = true;
        state.dismiss_armed = true;

        true
    }

    /// Handles a click anywhere on the page.
    ///
    /// After a marker click, the next page click hides the overlay and
    /// retires the hotspot. Returns whether anything was dismissed.
    pub async fn page_clicked(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        if !state.dismiss_armed {
            return false;
        }

        self.reset(&mut state);
        tracing::debug!("[ViewportController] Overlay dismissed");
        true
    }

    /// Removes the marker, hides the overlay and cancels any pending placement.
    pub async fn clear(&self) {
        let mut state = self.inner.state.lock().await;
        self.reset(&mut state);
    }

    pub async fn active_hotspot(&self) -> Option<ActiveHotspot> {
        self.inner.state.lock().await.hotspot.clone()
    }

    pub async fn is_overlay_visible(&self) -> bool {
        self.inner.state.lock().await.overlay_visible
    }

    fn reset(&self, state: &mut ViewportState) {
        state.generation += 1;
        state.dismiss_armed = false;

        if let Some(hotspot) = state.hotspot.take() {
            if let Some(viewer) = &self.inner.viewer {
                viewer.remove_marker(hotspot.marker);
            }
        }
        if let Some(overlay) = &self.inner.overlay {
            overlay.hide();
        }
        state.overlay_visible = false;
    }

    async fn wait_for_camera(&self, viewer: &dyn ModelViewer) {
        let config = &self.inner.config;
        match tokio::time::timeout(config.settle_timeout(), viewer.wait_camera_settled()).await {
            Ok(CameraSettle::Settled) => {}
            Ok(CameraSettle::Unsupported) => tokio::time::sleep(config.settle_delay()).await,
            Err(_) => {
                tracing::warn!(
                    "[ViewportController] Camera did not report settling within {:?}",
                    config.settle_timeout()
                );
            }
        }
    }
}
