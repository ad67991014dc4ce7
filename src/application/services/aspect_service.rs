//! Aspect registry - Host-shared values the module may read or write

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::application::dto::AspectPermissions;

#[derive(Debug, Default)]
pub struct AspectRegistry {
    permissions: AspectPermissions,
    values: HashMap<String, Value>,
}

impl AspectRegistry {
    pub fn new(permissions: AspectPermissions) -> Self {
        Self {
            permissions,
            values: HashMap::new(),
        }
    }

    /// Store a host-pushed value. Returns false if the key was not granted.
    pub fn apply_update(&mut self, key: &str, value: Value) -> bool {
        if !self.permissions.contains_key(key) {
            warn!(aspect = key, "Ignored aspect update, not in permitted aspects");
            return false;
        }
        debug!(aspect = key, %value, "Aspect updated");
        self.values.insert(key.to_string(), value);
        true
    }

    pub fn can_write(&self, key: &str) -> bool {
        self.permissions.get(key).is_some_and(|p| p.can_write())
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}
