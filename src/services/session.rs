//! Current-user identity provider.
//!
//! The dashboard is multi-user: a list of identities is fetched at startup
//! and one of them is active at a time. The provider is the single owner of
//! that selection; consumers (transaction grid, insight queries) subscribe to
//! a watch channel and react to changes by invalidating their held results
//! and re-fetching. Nothing else mutates the identity.

use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use crate::core::models::UserProfile;

pub struct UserProvider {
    users: Vec<UserProfile>,
    selected: usize,
    /// Identity to select once the user list arrives (from `--user`).
    preferred: Option<Uuid>,
    tx: watch::Sender<Option<UserProfile>>,
}

impl UserProvider {
    pub fn new(preferred: Option<Uuid>) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            users: Vec::new(),
            selected: 0,
            preferred,
            tx,
        }
    }

    /// Subscribe to identity changes. The receiver's current value is the
    /// active user (or `None` before the list has loaded).
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<&UserProfile> {
        self.users.get(self.selected)
    }

    /// Active user id as the string the API expects.
    pub fn current_id(&self) -> Option<String> {
        self.current().map(|u| u.id.to_string())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Install the fetched user list and activate the first entry (or the
    /// preferred identity when it is present in the list).
    pub fn set_users(&mut self, users: Vec<UserProfile>) {
        self.users = users;
        self.selected = self
            .preferred
            .and_then(|id| self.users.iter().position(|u| u.id == id))
            .unwrap_or(0);
        self.notify();
    }

    /// Switch to the next identity in the list.
    pub fn cycle(&mut self) {
        if self.users.len() < 2 {
            return;
        }
        self.selected = (self.selected + 1) % self.users.len();
        self.notify();
    }

    fn notify(&self) {
        if let Some(user) = self.current() {
            info!(user = %user.name, "active user changed");
        }
        let _ = self.tx.send(self.current().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.net", name.to_lowercase()),
        }
    }

    #[test]
    fn test_starts_without_identity() {
        let provider = UserProvider::new(None);
        assert!(provider.current().is_none());
        assert_eq!(*provider.subscribe().borrow(), None);
    }

    #[test]
    fn test_set_users_activates_first_and_notifies() {
        let mut provider = UserProvider::new(None);
        let rx = provider.subscribe();
        provider.set_users(vec![user("Douglas"), user("Sarah")]);

        assert_eq!(provider.current().unwrap().name, "Douglas");
        assert_eq!(rx.borrow().as_ref().unwrap().name, "Douglas");
    }

    #[test]
    fn test_preferred_identity_wins_when_present() {
        let douglas = user("Douglas");
        let sarah = user("Sarah");
        let mut provider = UserProvider::new(Some(sarah.id));
        provider.set_users(vec![douglas, sarah.clone()]);
        assert_eq!(provider.current().unwrap().id, sarah.id);
    }

    #[test]
    fn test_cycle_wraps_and_notifies() {
        let mut provider = UserProvider::new(None);
        let mut rx = provider.subscribe();
        provider.set_users(vec![user("A"), user("B")]);
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();

        provider.cycle();
        assert!(rx.has_changed().unwrap());
        assert_eq!(provider.current().unwrap().name, "B");

        provider.cycle();
        assert_eq!(provider.current().unwrap().name, "A");
    }

    #[test]
    fn test_cycle_is_noop_with_single_user() {
        let mut provider = UserProvider::new(None);
        let mut rx = provider.subscribe();
        provider.set_users(vec![user("Solo")]);
        rx.mark_unchanged();

        provider.cycle();
        assert!(!rx.has_changed().unwrap());
    }
}
