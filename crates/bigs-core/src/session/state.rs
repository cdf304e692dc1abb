//! The session record and its four mutation entry points.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::store::{
    ACCESS_TOKEN_KEY, MemoryStore, REFRESH_TOKEN_KEY, SESSION_KEYS, SessionStore, USER_EMAIL_KEY,
    USER_IMAGE_KEY, USER_NAME_KEY,
};
use crate::tokens::{AccessToken, RefreshToken, TokenPair};

use super::observer::{SessionEvent, SessionObserver, SubscriptionId};
use super::{DEFAULT_AVATAR, DEFAULT_DISPLAY_NAME, DEFAULT_EMAIL};

/// Cached profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub display_name: String,
    pub email: String,
    pub avatar: String,
}

impl Profile {
    pub fn new(
        display_name: impl Into<String>,
        email: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
            avatar: avatar.into(),
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_NAME, DEFAULT_EMAIL, DEFAULT_AVATAR)
    }
}

/// A point-in-time copy of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub profile: Profile,
    pub access_token: Option<AccessToken>,
    pub refresh_token: Option<RefreshToken>,
    /// True exactly when `access_token` is present.
    pub authenticated: bool,
}

#[derive(Debug, Clone, Default)]
struct SessionFields {
    profile: Profile,
    access_token: Option<AccessToken>,
    refresh_token: Option<RefreshToken>,
}

impl SessionFields {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            profile: self.profile.clone(),
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            authenticated: self.access_token.is_some(),
        }
    }

    fn is_anonymous(&self) -> bool {
        self.access_token.is_none()
            && self.refresh_token.is_none()
            && self.profile == Profile::default()
    }
}

/// The process-wide record of identity and credentials.
///
/// Cheap to clone (internal `Arc`); all clones see the same state. Fields are
/// only changed through [`login`](Self::login), [`clear_auth`](Self::clear_auth),
/// [`set_auth_tokens`](Self::set_auth_tokens) and
/// [`set_profile`](Self::set_profile). The token pair is always replaced under
/// one write lock, so readers never see an old access token with a new
/// refresh token.
///
/// # Example
///
/// ```
/// use bigs_core::{SessionState, TokenPair};
///
/// let session = SessionState::in_memory();
/// session.login("Alice", "a@x.com", TokenPair::new("AT1", "RT1"), None);
/// assert!(session.is_authenticated());
///
/// session.clear_auth();
/// assert!(session.access_token().is_none());
/// ```
#[derive(Clone)]
pub struct SessionState {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    fields: RwLock<SessionFields>,
    store: Arc<dyn SessionStore>,
    observers: RwLock<Vec<(SubscriptionId, Arc<dyn SessionObserver>)>>,
    next_subscription: AtomicU64,
}

impl SessionState {
    /// Create an anonymous session persisting into `store`.
    ///
    /// Existing values in the store are ignored; use [`load`](Self::load)
    /// to restore them.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::with_fields(store, SessionFields::default())
    }

    /// Create an anonymous session backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Restore a session from persisted values.
    ///
    /// Missing (or empty) keys fall back to anonymous defaults. A store that
    /// cannot be read is treated as empty.
    pub fn load(store: Arc<dyn SessionStore>) -> Self {
        let read = |key: &str| match store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "Failed to read persisted session value");
                None
            }
        };

        let defaults = Profile::default();
        let fields = SessionFields {
            profile: Profile {
                display_name: read(USER_NAME_KEY).unwrap_or(defaults.display_name),
                email: read(USER_EMAIL_KEY).unwrap_or(defaults.email),
                avatar: read(USER_IMAGE_KEY).unwrap_or(defaults.avatar),
            },
            access_token: read(ACCESS_TOKEN_KEY).map(AccessToken::new),
            refresh_token: read(REFRESH_TOKEN_KEY).map(RefreshToken::new),
        };

        debug!(
            authenticated = fields.access_token.is_some(),
            has_refresh_token = fields.refresh_token.is_some(),
            "Session restored"
        );

        Self::with_fields(store, fields)
    }

    fn with_fields(store: Arc<dyn SessionStore>, fields: SessionFields) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                fields: RwLock::new(fields),
                store,
                observers: RwLock::new(Vec::new()),
                next_subscription: AtomicU64::new(1),
            }),
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Start a session, overwriting every field.
    ///
    /// `avatar` defaults to the placeholder reference. Never fails; a store
    /// that cannot be written only costs persistence across restarts.
    pub fn login(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        tokens: TokenPair,
        avatar: Option<String>,
    ) {
        let profile = Profile::new(
            name,
            email,
            avatar.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
        );
        let (access, refresh) = tokens.into_parts();

        // The store is written under the field lock so concurrent mutations
        // reach memory and storage in the same order.
        let snapshot = {
            let mut fields = self.write_fields();
            self.persist_all(&[
                (USER_NAME_KEY, profile.display_name.as_str()),
                (USER_EMAIL_KEY, profile.email.as_str()),
                (USER_IMAGE_KEY, profile.avatar.as_str()),
                (ACCESS_TOKEN_KEY, access.as_str()),
                (REFRESH_TOKEN_KEY, refresh.as_str()),
            ]);
            *fields = SessionFields {
                profile,
                access_token: Some(access),
                refresh_token: Some(refresh),
            };
            fields.snapshot()
        };

        info!(email = %snapshot.profile.email, "Signed in");
        self.notify(SessionEvent::LoggedIn, &snapshot);
    }

    /// Reset to anonymous and forget persisted credentials.
    ///
    /// Idempotent: clearing an already anonymous session changes nothing and
    /// notifies nobody.
    pub fn clear_auth(&self) {
        let snapshot = {
            let mut fields = self.write_fields();
            if let Err(e) = self.inner.store.remove_all(&SESSION_KEYS) {
                warn!(error = %e, "Failed to remove persisted session");
            }
            if fields.is_anonymous() {
                None
            } else {
                *fields = SessionFields::default();
                Some(fields.snapshot())
            }
        };

        if let Some(snapshot) = snapshot {
            info!("Session cleared");
            self.notify(SessionEvent::Cleared, &snapshot);
        }
    }

    /// Replace the token pair, leaving the profile untouched.
    pub fn set_auth_tokens(&self, tokens: TokenPair) {
        let (access, refresh) = tokens.into_parts();

        let snapshot = {
            let mut fields = self.write_fields();
            self.persist_all(&[
                (ACCESS_TOKEN_KEY, access.as_str()),
                (REFRESH_TOKEN_KEY, refresh.as_str()),
            ]);
            fields.access_token = Some(access);
            fields.refresh_token = Some(refresh);
            fields.snapshot()
        };

        debug!("Token pair rotated");
        self.notify(SessionEvent::TokensRotated, &snapshot);
    }

    /// Replace the profile fields, leaving the tokens untouched.
    pub fn set_profile(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        avatar: impl Into<String>,
    ) {
        let profile = Profile::new(name, email, avatar);

        let snapshot = {
            let mut fields = self.write_fields();
            self.persist_all(&[
                (USER_NAME_KEY, profile.display_name.as_str()),
                (USER_EMAIL_KEY, profile.email.as_str()),
                (USER_IMAGE_KEY, profile.avatar.as_str()),
            ]);
            fields.profile = profile;
            fields.snapshot()
        };

        self.notify(SessionEvent::ProfileUpdated, &snapshot);
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn snapshot(&self) -> SessionSnapshot {
        self.read_fields().snapshot()
    }

    pub fn profile(&self) -> Profile {
        self.read_fields().profile.clone()
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.read_fields().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.read_fields().refresh_token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_fields().access_token.is_some()
    }

    /// The store this session persists into.
    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.inner.store)
    }

    // ========================================================================
    // Observers
    // ========================================================================

    /// Register an observer for every subsequent change.
    pub fn subscribe(&self, observer: impl SessionObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.inner
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self
            .inner
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    fn notify(&self, event: SessionEvent, snapshot: &SessionSnapshot) {
        // Copy the list out so observers can subscribe or mutate re-entrantly.
        let observers: Vec<Arc<dyn SessionObserver>> = self
            .inner
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer.on_session_change(event, snapshot);
        }
    }

    fn persist_all(&self, entries: &[(&str, &str)]) {
        if let Err(e) = self.inner.store.set_all(entries) {
            warn!(error = %e, "Failed to persist session");
        }
    }

    fn read_fields(&self) -> std::sync::RwLockReadGuard<'_, SessionFields> {
        self.inner
            .fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_fields(&self) -> std::sync::RwLockWriteGuard<'_, SessionFields> {
        self.inner
            .fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// Custom Debug impl that hides sensitive data
impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = self.read_fields();
        f.debug_struct("SessionState")
            .field("profile", &fields.profile)
            .field("authenticated", &fields.access_token.is_some())
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
