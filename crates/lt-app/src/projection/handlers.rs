use std::fmt;
use std::sync::Arc;

/// Zero-argument navigation step installed by the active content sequence.
pub type NavigationHandler = Arc<dyn Fn() + Send + Sync>;

/// Local-only pair of navigation steps. Never replicated.
///
/// `advance == None` means the active sequence is exhausted.
#[derive(Clone, Default)]
pub struct NavigationHandlers {
    pub advance: Option<NavigationHandler>,
    pub retreat: Option<NavigationHandler>,
}

impl NavigationHandlers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn can_advance(&self) -> bool {
        self.advance.is_some()
    }

    pub fn can_retreat(&self) -> bool {
        self.retreat.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.advance.is_none() && self.retreat.is_none()
    }
}

impl fmt::Debug for NavigationHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationHandlers")
            .field("advance", &self.can_advance())
            .field("retreat", &self.can_retreat())
            .finish()
    }
}
