//! Viewer context used for field visibility.

use serde::{Deserialize, Serialize};

/// An authenticated viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Viewer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Who is looking at the search form.
///
/// Starts anonymous; becomes authenticated once a viewer is established.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerContext {
    viewer: Option<Viewer>,
}

impl ViewerContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(viewer: Viewer) -> Self {
        Self {
            viewer: Some(viewer),
        }
    }

    /// Establish a viewer for the rest of the request.
    pub fn establish(&mut self, viewer: Viewer) {
        self.viewer = Some(viewer);
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.viewer.is_some()
    }
}
