use crate::domain::errors::DomainError;
use crate::domain::ports::KeyValueStore;
use crate::domain::storefront::{AuthResponse, User};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// The signed-in user, persisted as the `token` and `user` store keys.
///
/// Every method touches the store and may block; call them from
/// `web::block` in async code.
pub struct AuthSession<S> {
    store: S,
}

impl<S: KeyValueStore> AuthSession<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The stored session, if both keys are present and readable.
    pub fn current(&self) -> Option<Session> {
        let token = self.read(TOKEN_KEY)?;
        let raw_user = self.read(USER_KEY)?;
        match serde_json::from_str(&raw_user) {
            Ok(user) => Some(Session { token, user }),
            Err(e) => {
                log::warn!("Stored user is unreadable, treating as signed out: {}", e);
                None
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.token)
    }

    /// Stores the outcome of a successful login or registration.
    pub fn save(&self, auth: &AuthResponse) -> Result<(), DomainError> {
        self.store.set(TOKEN_KEY, &auth.token)?;
        self.store.set(USER_KEY, &encode(&auth.user)?)?;
        log::info!("Signed in as {}", auth.user.email);
        Ok(())
    }

    /// Replaces the stored user after a profile update, keeping the token.
    pub fn refresh_user(&self, user: &User) -> Result<(), DomainError> {
        self.store.set(USER_KEY, &encode(user)?)
    }

    pub fn logout(&self) -> Result<(), DomainError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        log::info!("Signed out");
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Could not read {} from store: {}", key, e);
                None
            }
        }
    }
}

fn encode(user: &User) -> Result<String, DomainError> {
    serde_json::to_string(user).map_err(|e| DomainError::Internal(e.to_string()))
}
