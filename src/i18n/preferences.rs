//! Per-user and per-guild language preferences.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::config::LanguageCode;

/// Error type preference stores may return; the resolver only logs it.
pub type PreferenceError = Box<dyn std::error::Error + Send + Sync>;

/// Source of stored language preferences (typically a settings database).
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// What: Preferred language of a user, if one is stored.
    ///
    /// # Errors
    /// - Any lookup failure; callers fall back to the default language
    async fn user_language(&self, user_id: u64) -> Result<Option<LanguageCode>, PreferenceError>;

    /// What: Configured language of a guild, if one is stored.
    ///
    /// # Errors
    /// - Any lookup failure; callers fall back to the default language
    async fn guild_language(&self, guild_id: u64)
    -> Result<Option<LanguageCode>, PreferenceError>;
}

/// Preferences kept in memory.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    users: RwLock<HashMap<u64, LanguageCode>>,
    guilds: RwLock<HashMap<u64, LanguageCode>>,
}

impl MemoryPreferences {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Record a user's language.
    pub fn set_user_language(&self, user_id: u64, lang: impl Into<LanguageCode>) {
        self.users
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(user_id, lang.into());
    }

    /// What: Record a guild's language.
    pub fn set_guild_language(&self, guild_id: u64, lang: impl Into<LanguageCode>) {
        self.guilds
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(guild_id, lang.into());
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferences {
    async fn user_language(&self, user_id: u64) -> Result<Option<LanguageCode>, PreferenceError> {
        Ok(self
            .users
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&user_id)
            .cloned())
    }

    async fn guild_language(
        &self,
        guild_id: u64,
    ) -> Result<Option<LanguageCode>, PreferenceError> {
        Ok(self
            .guilds
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&guild_id)
            .cloned())
    }
}
