//! Single-slot persisted settings with an explicit save and a confirmed reset.
//!
//! ```text
//!  Default ──edit──▶ Editing ──save──▶ Saved
//!     ▲                 │  ▲             │
//!     │              discard └───edit────┘
//!     └────── request_reset + confirm_reset(token) ──┘
//! ```
//!
//! Edits live only in memory until [`ConfigSlot::save`]. A reset needs two
//! calls: [`ConfigSlot::request_reset`] hands out a token, and only
//! [`ConfigSlot::confirm_reset`] with that same token clears the stored value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{LabelkitError, Result};
use crate::storage::{SettingsStore, SettingsStoreExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    /// Nothing persisted, value is `T::default()`
    Default,
    /// Value changed in memory and not yet saved
    Editing,
    /// Value equals what is persisted
    Saved,
}

/// Proof that a reset was asked for. Pass it back to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRequest {
    pub token: Uuid,
}

pub struct ConfigSlot<T> {
    key: String,
    store: Arc<dyn SettingsStore>,
    current: T,
    saved: Option<T>,
    state: SlotState,
    pending_reset: Option<Uuid>,
}

impl<T> ConfigSlot<T>
where
    T: Clone + Default + Serialize + DeserializeOwned,
{
    /// Load the slot stored under `key`, or start from the default.
    pub fn open(store: Arc<dyn SettingsStore>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let saved: Option<T> = store.load(&key)?;
        let (current, state) = match &saved {
            Some(value) => (value.clone(), SlotState::Saved),
            None => (T::default(), SlotState::Default),
        };
        debug!(key = %key, state = ?state, "opened settings slot");
        Ok(Self {
            key,
            store,
            current,
            saved,
            state,
            pending_reset: None,
        })
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn saved(&self) -> Option<&T> {
        self.saved.as_ref()
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    /// Replace the in-memory value.
    pub fn edit(&mut self, value: T) {
        self.current = value;
        self.state = SlotState::Editing;
        self.pending_reset = None;
    }

    /// Drop unsaved edits.
    pub fn discard(&mut self) {
        match &self.saved {
            Some(value) => {
                self.current = value.clone();
                self.state = SlotState::Saved;
            }
            None => {
                self.current = T::default();
                self.state = SlotState::Default;
            }
        }
    }

    /// Persist the current value.
    pub fn save(&mut self) -> Result<()> {
        self.store.save(&self.key, &self.current)?;
        self.saved = Some(self.current.clone());
        self.state = SlotState::Saved;
        info!(key = %self.key, "saved settings");
        Ok(())
    }

    /// First half of a reset. Any earlier token stops being valid.
    pub fn request_reset(&mut self) -> ResetRequest {
        let token = Uuid::new_v4();
        self.pending_reset = Some(token);
        ResetRequest { token }
    }

    /// Second half of a reset: clear the stored value and return to defaults.
    pub fn confirm_reset(&mut self, request: ResetRequest) -> Result<()> {
        if self.pending_reset != Some(request.token) {
            return Err(LabelkitError::InvalidInput(
                "reset was not requested or the token is stale".into(),
            ));
        }
        self.store.remove(&self.key)?;
        self.pending_reset = None;
        self.saved = None;
        self.current = T::default();
        self.state = SlotState::Default;
        info!(key = %self.key, "reset settings to defaults");
        Ok(())
    }

    /// Abandon a requested reset.
    pub fn cancel_reset(&mut self) {
        self.pending_reset = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Knob {
        level: u8,
    }

    fn slot(store: &Arc<dyn SettingsStore>) -> ConfigSlot<Knob> {
        ConfigSlot::open(store.clone(), "knob").unwrap()
    }

    #[test]
    fn test_edit_save_reload() {
        let store: Arc<dyn SettingsStore> = Arc::new(MemoryStore::new());
        let mut s = slot(&store);
        assert_eq!(s.state(), SlotState::Default);

        s.edit(Knob { level: 7 });
        assert_eq!(s.state(), SlotState::Editing);
        assert!(store.load_value("knob").unwrap().is_none());

        s.save().unwrap();
        assert_eq!(s.state(), SlotState::Saved);

        let reopened = slot(&store);
        assert_eq!(reopened.state(), SlotState::Saved);
        assert_eq!(reopened.current(), &Knob { level: 7 });
    }

    #[test]
    fn test_discard_restores_saved() {
        let store: Arc<dyn SettingsStore> = Arc::new(MemoryStore::new());
        let mut s = slot(&store);
        s.edit(Knob { level: 1 });
        s.save().unwrap();
        s.edit(Knob { level: 2 });
        s.discard();
        assert_eq!(s.current(), &Knob { level: 1 });
        assert_eq!(s.state(), SlotState::Saved);
    }

    #[test]
    fn test_reset_needs_matching_token() {
        let store: Arc<dyn SettingsStore> = Arc::new(MemoryStore::new());
        let mut s = slot(&store);
        s.edit(Knob { level: 3 });
        s.save().unwrap();

        let stale = s.request_reset();
        let fresh = s.request_reset();
        assert!(s.confirm_reset(stale).is_err());
        assert_eq!(s.state(), SlotState::Saved);

        s.confirm_reset(fresh).unwrap();
        assert_eq!(s.state(), SlotState::Default);
        assert_eq!(s.current(), &Knob::default());
        assert!(store.load_value("knob").unwrap().is_none());

        // token is single use
        assert!(s.confirm_reset(fresh).is_err());
    }

    #[test]
    fn test_edit_cancels_pending_reset() {
        let store: Arc<dyn SettingsStore> = Arc::new(MemoryStore::new());
        let mut s = slot(&store);
        let req = s.request_reset();
        s.edit(Knob { level: 9 });
        assert!(s.confirm_reset(req).is_err());
    }
}
