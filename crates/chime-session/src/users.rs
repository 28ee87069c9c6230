//! Who may interact with a session, and how long it waits.

use std::collections::HashSet;
use std::time::Duration;

use chime_core::UserId;

/// The set of users whose events a session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedUsers {
    /// Anyone may interact.
    Everyone,
    /// Only the listed users may interact.
    Only(HashSet<UserId>),
}

impl AllowedUsers {
    /// A set holding exactly one user.
    pub fn user(id: impl Into<UserId>) -> Self {
        Self::Only(HashSet::from([id.into()]))
    }

    /// Membership test. [`AllowedUsers::Everyone`] contains every user.
    pub fn contains(&self, id: UserId) -> bool {
        match self {
            Self::Everyone => true,
            Self::Only(users) => users.contains(&id),
        }
    }
}

impl From<UserId> for AllowedUsers {
    fn from(id: UserId) -> Self {
        Self::user(id)
    }
}

impl FromIterator<UserId> for AllowedUsers {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self::Only(iter.into_iter().collect())
    }
}

/// Per-run settings of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Longest wait for the next event. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Delete the session message when finished instead of clearing its
    /// reactions.
    pub delete_after: bool,
    /// Users allowed to interact. `None` means the invoking author.
    pub allowed_users: Option<AllowedUsers>,
}

impl SessionOptions {
    /// Default options: no timeout, keep the message, author only.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn delete_after(mut self, delete_after: bool) -> Self {
        self.delete_after = delete_after;
        self
    }

    pub fn allowed_users(mut self, users: impl Into<AllowedUsers>) -> Self {
        self.allowed_users = Some(users.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everyone_contains_anyone() {
        assert!(AllowedUsers::Everyone.contains(UserId(1)));
        assert!(AllowedUsers::Everyone.contains(UserId(u64::MAX)));
    }

    #[test]
    fn test_only_listed_users() {
        let users: AllowedUsers = [UserId(1), UserId(2)].into_iter().collect();
        assert!(users.contains(UserId(2)));
        assert!(!users.contains(UserId(3)));
        assert!(AllowedUsers::user(7u64).contains(UserId(7)));
    }

    #[test]
    fn test_options_builder() {
        let options = SessionOptions::new()
            .timeout(Duration::from_secs(30))
            .delete_after(true)
            .allowed_users(AllowedUsers::Everyone);

        assert_eq!(options.timeout, Some(Duration::from_secs(30)));
        assert!(options.delete_after);
        assert_eq!(options.allowed_users, Some(AllowedUsers::Everyone));
        assert_eq!(options.no_timeout().timeout, None);
    }
}
