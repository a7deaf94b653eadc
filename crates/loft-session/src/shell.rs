//! Bridge to the hosting UI.
//!
//! The session core never touches rendering. After a successful sign-in it
//! asks the shell to show the home tab; on logout it announces that the
//! session is over and lets the host reset itself however it likes.

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Shared,
    Settings,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Shared => "Shared",
            Tab::Settings => "Settings",
        }
    }
}

/// What the session core needs from the surrounding application.
///
/// Both calls are fire-and-forget and synchronous: the shell reacts on its
/// own schedule and reports nothing back.
pub trait Shell: Send + Sync {
    /// Move the UI to `tab`.
    fn set_active_tab(&self, tab: Tab);

    /// The session is over. The shell drops to its signed-out entry state.
    /// Fired on every logout, including the rollback after a failed key
    /// check.
    fn session_ended(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_titles() {
        assert_eq!(Tab::Home.title(), "Home");
        assert_eq!(Tab::Shared.title(), "Shared");
        assert_eq!(Tab::Settings.title(), "Settings");
    }
}
