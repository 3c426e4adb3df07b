//! Session credential storage for the dashboard client.
//!
//! The browser keeps the token and user snapshot in exactly one of two
//! stores: a persistent one ("remember me") or a session-scoped one.
//! Writing to one always clears the other so a stale credential can never
//! shadow the live one; logout wipes both.

use serde::{Deserialize, Serialize};

use crate::db::UserResponse;

/// Token plus user snapshot as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserResponse,
}

/// A single credential slot.
pub trait SessionStore {
    fn get(&self) -> Option<Session>;
    fn set(&mut self, session: &Session);
    fn remove(&mut self);
}

/// In-memory slot, used headless and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: Option<Session>,
}

impl SessionStore for MemoryStore {
    fn get(&self) -> Option<Session> {
        self.value.clone()
    }

    fn set(&mut self, session: &Session) {
        self.value = Some(session.clone());
    }

    fn remove(&mut self) {
        self.value = None;
    }
}

/// Explicit session state shared by every view function.
///
/// The persistent/ephemeral duality is a constructor flag, not two
/// independently-mutated globals.
pub struct SessionContext<S: SessionStore> {
    persistent: S,
    ephemeral: S,
    remember: bool,
}

impl<S: SessionStore> SessionContext<S> {
    pub fn new(persistent: S, ephemeral: S, remember: bool) -> Self {
        Self {
            persistent,
            ephemeral,
            remember,
        }
    }

    /// Store a session in the slot selected at construction time, clearing
    /// the sibling slot.
    pub fn save(&mut self, session: &Session) {
        if self.remember {
            self.persistent.set(session);
            self.ephemeral.remove();
        } else {
            self.ephemeral.set(session);
            self.persistent.remove();
        }
    }

    /// The stored session, if any. The persistent slot wins when both are
    /// somehow populated.
    pub fn load(&self) -> Option<Session> {
        self.persistent.get().or_else(|| self.ephemeral.get())
    }

    /// Logout: wipe both slots.
    pub fn clear(&mut self) {
        self.persistent.remove();
        self.ephemeral.remove();
    }
}

impl SessionContext<MemoryStore> {
    pub fn in_memory(remember: bool) -> Self {
        Self::new(MemoryStore::default(), MemoryStore::default(), remember)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Role;

    fn sample_session() -> Session {
        Session {
            token: "tok".to_string(),
            user: UserResponse {
                id: "u-1".to_string(),
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                role: Role::User,
                phone: None,
                created_at: "2024-01-01T00:00:00Z".to_string(),
            },
        }
    }

    #[test]
    fn test_save_and_load_persistent() {
        let mut ctx = SessionContext::in_memory(true);
        assert!(ctx.load().is_none());

        ctx.save(&sample_session());
        assert_eq!(ctx.load().unwrap().token, "tok");
        // the ephemeral slot stays empty
        assert!(ctx.ephemeral.get().is_none());
    }

    #[test]
    fn test_save_clears_sibling_slot() {
        let mut ctx = SessionContext::in_memory(false);
        // simulate a leftover credential in the other slot
        ctx.persistent.set(&sample_session());

        let mut fresh = sample_session();
        fresh.token = "fresh".to_string();
        ctx.save(&fresh);

        assert!(ctx.persistent.get().is_none());
        assert_eq!(ctx.load().unwrap().token, "fresh");
    }

    #[test]
    fn test_clear_wipes_both() {
        let mut ctx = SessionContext::in_memory(true);
        ctx.save(&sample_session());
        ctx.ephemeral.set(&sample_session());

        ctx.clear();
        assert!(ctx.load().is_none());
    }
}
