//! Landing screen and the navigation badge.

use crate::auth_session::Session;

/// What the landing screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeView {
    /// Prompt to sign in.
    Anonymous,
    Member { name: String, points: u64 },
}

impl HomeView {
    pub fn for_session(session: &Session) -> Self {
        match session.get() {
            Some(user) => HomeView::Member {
                name: user.name,
                points: user.points,
            },
            None => HomeView::Anonymous,
        }
    }

    pub fn can_identify(&self) -> bool {
        matches!(self, HomeView::Member { .. })
    }
}

/// Unread counter on the notifications menu entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuBadge {
    unread: u32,
}

impl MenuBadge {
    pub fn for_session(session: &Session) -> Self {
        Self {
            unread: session
                .get()
                .and_then(|u| u.unread_notifications_count)
                .unwrap_or(0),
        }
    }

    pub fn unread(&self) -> u32 {
        self.unread
    }

    /// Opening the inbox clears the badge.
    pub fn open_notifications(&mut self) {
        self.unread = 0;
    }
}
