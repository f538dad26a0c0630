use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{BilledError, Result};

pub mod session_keys {
    pub const USER: &str = "user";
}

/// The signed-in user as stored under [`session_keys::USER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type")]
    pub user_type: String,
}

impl SessionUser {
    pub fn employee(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            user_type: "Employee".to_string(),
        }
    }
}

/// Key/value session capability shared by the submission and listing
/// components. Populated at login, cleared at logout.
#[derive(Clone, Debug)]
pub struct Session {
    data: Arc<DashMap<String, Value>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// Session with `user` already signed in.
    pub fn with_user(user: SessionUser) -> Result<Self> {
        let session = Self::new();
        session.login(user)?;
        Ok(session)
    }

    pub fn set(&self, key: impl Into<String>, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.data.insert(key.into(), value);
        Ok(())
    }

    pub fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.data.remove(key).map(|(_, v)| v)
    }

    pub fn clear(&self) {
        self.data.clear();
    }

    pub fn login(&self, user: SessionUser) -> Result<()> {
        self.set(session_keys::USER, user)
    }

    pub fn logout(&self) {
        self.clear();
    }

    pub fn user(&self) -> Result<SessionUser> {
        self.get(session_keys::USER).ok_or(BilledError::SessionMissing)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
