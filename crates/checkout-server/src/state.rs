//! Application State

use std::sync::Arc;

use crate::goody::CommerceApi;

/// Shared application state
#[derive(Clone, Default)]
pub struct AppState {
    /// Goody Commerce client (optional - None if not configured)
    pub commerce: Option<Arc<dyn CommerceApi>>,
}

impl AppState {
    pub fn new(commerce: Arc<dyn CommerceApi>) -> Self {
        Self {
            commerce: Some(commerce),
        }
    }
}
