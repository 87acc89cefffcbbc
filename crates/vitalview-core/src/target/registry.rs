//! Static registry of anatomical targets.

use super::model::{Orbit, TargetDefinition, Vec3};
use crate::error::{Result, VitalViewError};
use std::collections::HashMap;

/// Region used when a requested name is not in the registry.
pub const DEFAULT_TARGET_KEY: &str = "heart";

const FRONT: Vec3 = Vec3::new(0.0, 0.0, 1.0);
const BACK: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Built-in table, in model space of a ~1.8m standing figure with its feet at
/// the origin and facing +z.
fn builtin_definitions() -> Vec<TargetDefinition> {
    let def = |key: &str, target: [f32; 3], orbit: [f32; 3], marker: [f32; 3], normal: Vec3| {
        TargetDefinition::new(
            key,
            Vec3::new(target[0], target[1], target[2]),
            Orbit::new(orbit[0], orbit[1], orbit[2]),
            Vec3::new(marker[0], marker[1], marker[2]),
        )
        .with_normal(normal)
    };

    vec![
        def("head", [0.0, 1.65, 0.0], [0.0, 80.0, 0.8], [0.0, 1.72, 0.1], FRONT),
        def("brain", [0.0, 1.7, 0.0], [20.0, 70.0, 0.7], [0.0, 1.76, 0.06], FRONT),
        def("eyes", [0.0, 1.66, 0.08], [0.0, 85.0, 0.5], [0.03, 1.67, 0.1], FRONT),
        def("throat", [0.0, 1.5, 0.04], [0.0, 85.0, 0.6], [0.0, 1.5, 0.07], FRONT),
        def("heart", [0.03, 1.35, 0.05], [0.0, 75.0, 1.2], [0.04, 1.37, 0.12], FRONT),
        def("lungs", [0.0, 1.38, 0.02], [0.0, 75.0, 1.4], [-0.08, 1.4, 0.12], FRONT),
        def("chest", [0.0, 1.35, 0.05], [0.0, 80.0, 1.3], [0.0, 1.33, 0.13], FRONT),
        def("stomach", [0.03, 1.18, 0.05], [0.0, 80.0, 1.2], [0.05, 1.18, 0.12], FRONT),
        def("liver", [-0.07, 1.2, 0.04], [-20.0, 80.0, 1.2], [-0.08, 1.21, 0.11], FRONT),
        def("kidneys", [0.0, 1.12, -0.04], [180.0, 80.0, 1.2], [0.06, 1.12, -0.1], BACK),
        def("abdomen", [0.0, 1.05, 0.05], [0.0, 85.0, 1.3], [0.0, 1.05, 0.13], FRONT),
        def("spine", [0.0, 1.25, -0.08], [180.0, 80.0, 1.6], [0.0, 1.25, -0.13], BACK),
        def("arms", [0.25, 1.2, 0.0], [40.0, 80.0, 1.8], [0.27, 1.2, 0.05], FRONT),
        def("hands", [0.3, 0.85, 0.02], [30.0, 85.0, 0.9], [0.31, 0.84, 0.06], FRONT),
        def("legs", [0.0, 0.5, 0.0], [0.0, 85.0, 2.2], [0.1, 0.55, 0.08], FRONT),
        def("knees", [0.0, 0.5, 0.04], [0.0, 85.0, 1.2], [0.1, 0.5, 0.09], FRONT),
        def("feet", [0.0, 0.05, 0.08], [0.0, 60.0, 1.0], [0.1, 0.04, 0.14], FRONT),
    ]
}

/// Read-only lookup table from region name to camera framing.
///
/// Keys are lower-cased. The default entry always exists, which is what lets
/// [`TargetRegistry::resolve`] be infallible.
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    entries: HashMap<String, TargetDefinition>,
    default_key: String,
}

impl TargetRegistry {
    /// Returns the built-in table with `heart` as the default.
    pub fn builtin() -> Self {
        let entries = builtin_definitions()
            .into_iter()
            .map(|def| (def.key.clone(), def))
            .collect();

        Self {
            entries,
            default_key: DEFAULT_TARGET_KEY.to_string(),
        }
    }

    /// Builds the built-in table extended (or overridden) by `extra`, with
    /// `default_key` as the fallback.
    ///
    /// # Errors
    ///
    /// Returns a config error if `default_key` names no entry.
    pub fn with_entries(
        extra: impl IntoIterator<Item = TargetDefinition>,
        default_key: &str,
    ) -> Result<Self> {
        let mut registry = Self::builtin();
        for mut def in extra {
            def.key = normalize(&def.key);
            registry.entries.insert(def.key.clone(), def);
        }

        let default_key = normalize(default_key);
        if !registry.entries.contains_key(&default_key) {
            return Err(VitalViewError::config(format!(
                "default target '{default_key}' is not a registered region"
            )));
        }
        registry.default_key = default_key;

        Ok(registry)
    }

    /// Resolves a region name, falling back to the default entry.
    ///
    /// Lookup is case-insensitive and ignores surrounding whitespace. An
    /// unknown name is not an error.
    pub fn resolve(&self, name: &str) -> &TargetDefinition {
        let key = normalize(name);
        match self.entries.get(&key) {
            Some(def) => def,
            None => {
                tracing::debug!(
                    "[TargetRegistry] Unknown target '{}', falling back to '{}'",
                    name,
                    self.default_key
                );
                self.default_target()
            }
        }
    }

    /// Exact lookup without the fallback.
    pub fn get(&self, name: &str) -> Option<&TargetDefinition> {
        self.entries.get(&normalize(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn default_target(&self) -> &TargetDefinition {
        // Both constructors guarantee the default key is present.
        &self.entries[&self.default_key]
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
