//! Local flag store: a cache/flag surface, never a source of truth.
//!
//! Two things live here: the "already checked" wallet set used by the
//! readiness checker, and the session-presence hint used to decide whether
//! a silent reconnect is worth attempting. Neither has any authority over
//! funds or session validity.

use dashmap::DashSet;

use crate::session::WalletAddress;

/// Key under which the session-presence hint is stored.
///
/// A hint to attempt restoration, not a source of truth: actual validity is
/// always re-established through the session SDK's own handshake.
pub const SESSION_PRESENT_KEY: &str = "session-present";

/// Flag store key for a wallet's "already checked" readiness marker.
#[must_use]
pub fn readiness_key(address: &WalletAddress) -> String {
    format!("readiness-checked:{address}")
}

/// String-keyed membership store for cache markers and hints.
///
/// Append-only during a session apart from explicit disconnect cleanup.
/// Keys are namespaced per concern, so concurrent writers for different
/// wallets never contend and same-key writes are idempotent.
pub trait FlagStore: Send + Sync + 'static {
    /// Whether the key is present.
    fn contains(&self, key: &str) -> bool;

    /// Marks the key present.
    fn insert(&self, key: &str);

    /// Removes the key if present.
    fn remove(&self, key: &str);

    /// Removes every key. Used on wallet disconnect.
    fn clear(&self);
}

/// In-process [`FlagStore`] backed by a concurrent set.
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    flags: DashSet<String>,
}

impl MemoryFlagStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for MemoryFlagStore {
    fn contains(&self, key: &str) -> bool {
        self.flags.contains(key)
    }

    fn insert(&self, key: &str) {
        self.flags.insert(key.to_owned());
    }

    fn remove(&self, key: &str) {
        self.flags.remove(key);
    }

    fn clear(&self) {
        self.flags.clear();
    }
}
