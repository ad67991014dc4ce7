//! Aspect permissions granted by the host at init

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AspectPermission {
    Read,
    ReadWrite,
}

impl AspectPermission {
    pub fn can_write(&self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

/// Aspect key to permission
pub type AspectPermissions = HashMap<String, AspectPermission>;
