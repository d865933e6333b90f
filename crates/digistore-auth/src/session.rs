//! Simulated session: login, register and logout.
//!
//! Calls sleep for a configurable latency to stand in for a backend round
//! trip. Only one login or register may be in flight per engine; a second
//! call while one is pending fails with [`AuthError::OperationPending`].
//!
//! There is no account backend: an email counts as taken only if it was
//! registered through this engine or belongs to the user it was restored
//! with.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use digistore_commerce::checkout::Order;
use tracing::{debug, info, warn};

use crate::user::{RegisterRequest, User, UserUpdate};
use crate::AuthError;

/// Default simulated round-trip latency.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    loading: bool,
    /// Lowercased emails registered through this engine.
    registered: HashSet<String>,
}

/// Owns the current user and the in-flight flag.
///
/// Methods take `&self` so a pending call and a status query can overlap.
#[derive(Debug)]
pub struct SessionEngine {
    state: Mutex<SessionState>,
    latency: Duration,
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

impl SessionEngine {
    /// Create an engine with no user.
    pub fn new(latency: Duration) -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
            latency,
        }
    }

    /// Create an engine restored from a persisted user.
    ///
    /// The restored user's email is treated as registered.
    pub fn with_user(latency: Duration, user: Option<User>) -> Self {
        let mut state = SessionState::default();
        if let Some(user) = &user {
            state.registered.insert(user.email.trim().to_lowercase());
        }
        state.user = user;
        Self {
            state: Mutex::new(state),
            latency,
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Log in. Any email and password are accepted.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let _pending = self.begin()?;
        debug!(email, password_len = password.len(), "login started");

        tokio::time::sleep(self.latency).await;

        let user = User::new(email.trim());
        self.state().user = Some(user.clone());
        info!(user_id = %user.id, "logged in");
        Ok(user)
    }

    /// Register a new account and log it in.
    ///
    /// Fails if the email was already registered with this engine, leaving
    /// the current session untouched.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let _pending = self.begin()?;
        debug!(email = %request.email, "register started");

        tokio::time::sleep(self.latency).await;

        let key = request.email.trim().to_lowercase();
        let mut state = self.state();
        if state.registered.contains(&key) {
            warn!(email = %request.email, "email already registered");
            return Err(AuthError::EmailAlreadyRegistered(request.email));
        }

        let user = User::from_registration(&request);
        state.registered.insert(key);
        state.user = Some(user.clone());
        info!(user_id = %user.id, "registered");
        Ok(user)
    }

    /// Drop the current user.
    pub fn logout(&self) {
        if let Some(user) = self.state().user.take() {
            info!(user_id = %user.id, "logged out");
        }
    }

    /// Apply a profile update. Fails when nobody is logged in.
    pub fn update_user(&self, update: UserUpdate) -> Result<User, AuthError> {
        let mut state = self.state();
        let user = state.user.as_mut().ok_or(AuthError::NotAuthenticated)?;
        user.apply(update);
        Ok(user.clone())
    }

    /// Record an order as the most recent one.
    pub fn add_order(&self, order: Order) -> Result<(), AuthError> {
        let mut state = self.state();
        let user = state.user.as_mut().ok_or(AuthError::NotAuthenticated)?;
        debug!(order_id = %order.id, "order added");
        user.orders.insert(0, order);
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state()
            .user
            .as_ref()
            .map(|u| u.is_authenticated)
            .unwrap_or(false)
    }

    /// Snapshot of the current user.
    pub fn user(&self) -> Option<User> {
        self.state().user.clone()
    }

    /// Whether a login or register call is in flight.
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mark an operation as in flight, or fail if one already is.
    fn begin(&self) -> Result<PendingGuard<'_>, AuthError> {
        let mut state = self.state();
        if state.loading {
            debug!("session operation rejected, another is pending");
            return Err(AuthError::OperationPending);
        }
        state.loading = true;
        Ok(PendingGuard { engine: self })
    }
}

/// Clears the loading flag when the operation finishes, fails or is dropped.
struct PendingGuard<'a> {
    engine: &'a SessionEngine,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.engine.state().loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digistore_commerce::cart::Cart;

    fn engine() -> SessionEngine {
        SessionEngine::new(Duration::from_millis(20))
    }

    #[tokio::test]
    async fn test_login_sets_user() {
        let engine = engine();
        assert!(!engine.is_authenticated());

        let user = engine.login("amine@example.dz", "whatever").await.unwrap();
        assert_eq!(user.display_name(), "amine");
        assert!(engine.is_authenticated());
        assert!(!engine.is_loading());
        assert_eq!(engine.user().map(|u| u.email), Some("amine@example.dz".to_string()));
    }

    #[tokio::test]
    async fn test_loading_flag_during_call() {
        let engine = engine();
        let (result, was_loading) = tokio::join!(engine.login("a@b.com", "x"), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            engine.is_loading()
        });
        assert!(result.is_ok());
        assert!(was_loading);
        assert!(!engine.is_loading());
    }

    #[tokio::test]
    async fn test_second_call_while_pending_is_rejected() {
        let engine = engine();
        let (first, second) = tokio::join!(
            engine.login("first@example.com", "x"),
            engine.login("second@example.com", "x")
        );
        assert!(first.is_ok());
        assert_eq!(second.unwrap_err(), AuthError::OperationPending);
        assert_eq!(engine.user().unwrap().email, "first@example.com");
    }

    #[tokio::test]
    async fn test_register_collision_keeps_state() {
        let engine = engine();
        let request = RegisterRequest::new("Amine", "Benali", "amine@example.dz", "secret123");
        let first = engine.register(request.clone()).await.unwrap();

        let mut again = request;
        again.email = "AMINE@example.dz".into();
        let result = engine.register(again).await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyRegistered(_))));
        assert_eq!(engine.user().unwrap().id, first.id);
        assert!(!engine.is_loading());
    }

    #[tokio::test]
    async fn test_logout() {
        let engine = engine();
        engine.login("a@b.com", "x").await.unwrap();
        engine.logout();
        assert!(!engine.is_authenticated());
        assert!(engine.user().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_call_clears_loading() {
        let engine = SessionEngine::new(Duration::from_secs(60));
        let result =
            tokio::time::timeout(Duration::from_millis(10), engine.login("a@b.com", "x")).await;
        assert!(result.is_err());
        assert!(!engine.is_loading());
        assert!(engine.user().is_none());
    }

    #[test]
    fn test_update_and_orders_require_user() {
        let engine = engine();
        assert_eq!(
            engine.update_user(UserUpdate::default()).unwrap_err(),
            AuthError::NotAuthenticated
        );
        let order = Order::from_cart(&Cart::new(), "a@b.com");
        assert_eq!(engine.add_order(order).unwrap_err(), AuthError::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_restored_email_is_taken() {
        let engine = SessionEngine::with_user(Duration::ZERO, Some(User::new("Sara@Example.dz")));
        let request = RegisterRequest::new("Sara", "B", "sara@example.dz", "s3cret!pass");
        assert!(matches!(
            engine.register(request).await,
            Err(AuthError::EmailAlreadyRegistered(_))
        ));
        assert_eq!(engine.user().map(|u| u.email), Some("Sara@Example.dz".to_string()));

        let other = RegisterRequest::new("Yacine", "K", "yacine@example.dz", "s3cret!pass");
        assert!(engine.register(other).await.is_ok());
    }

    #[test]
    fn test_orders_most_recent_first() {
        let engine = SessionEngine::with_user(Duration::ZERO, Some(User::new("a@b.com")));
        let first = Order::from_cart(&Cart::new(), "a@b.com");
        let second = Order::from_cart(&Cart::new(), "a@b.com");
        engine.add_order(first.clone()).unwrap();
        engine.add_order(second.clone()).unwrap();

        let orders = engine.user().unwrap().orders;
        assert_eq!(orders[0].id, second.id);
        assert_eq!(orders[1].id, first.id);
    }

    #[test]
    fn test_update_user() {
        let engine = SessionEngine::with_user(Duration::ZERO, Some(User::new("a@b.com")));
        let user = engine
            .update_user(UserUpdate {
                name: Some("Amine".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(user.display_name(), "Amine");
    }
}
