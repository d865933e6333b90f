//! The storefront facade.
//!
//! Composes the cart, wishlist, preference and session engines over shared
//! reference data, saving each engine's state to its own record after every
//! successful mutation.

use std::sync::Arc;

use chrono::Utc;
use digistore_auth::{AuthError, RegisterRequest, SessionEngine, User, UserUpdate};
use digistore_cache::{Cache, Persisted};
use digistore_commerce::cart::{Cart, CartPricing, Coupon, CouponRejection, SelectedOptions};
use digistore_commerce::catalog::{Product, ReferenceData};
use digistore_commerce::checkout::Order;
use digistore_commerce::money::{self, Currency, Money};
use digistore_commerce::wishlist::Wishlist;
use digistore_commerce::ProductId;
use digistore_i18n::{I18nError, Language, TextDirection, Translator, UiPreferences};
use tracing::{debug, info, warn};

use crate::config::{StorageBackend, StorefrontConfig};
use crate::SdkError;

/// Record holding the cart lines and applied coupon.
pub const CART_RECORD: &str = "cart-storage";
/// Record holding the wishlist entries.
pub const WISHLIST_RECORD: &str = "wishlist-storage";
/// Record holding the language and currency preference.
pub const UI_RECORD: &str = "ui-storage";
/// Record holding the logged-in user.
pub const USER_RECORD: &str = "user-storage";

/// Storefront state for a single visitor.
pub struct Storefront {
    reference: Arc<ReferenceData>,
    translator: Arc<Translator>,
    cart: Persisted<Cart>,
    wishlist: Persisted<Wishlist>,
    prefs: Persisted<UiPreferences>,
    session: SessionEngine,
    cache: Cache,
}

impl Storefront {
    /// Restore a storefront from `cache`, starting from empty state for any
    /// record that is missing or unreadable.
    pub fn new(
        reference: Arc<ReferenceData>,
        translator: Arc<Translator>,
        cache: Cache,
        session_latency: std::time::Duration,
    ) -> Self {
        let user = match cache.get::<User>(USER_RECORD) {
            Ok(user) => user,
            Err(e) => {
                warn!(key = USER_RECORD, error = %e, "discarding unreadable state record");
                None
            }
        };

        Self {
            cart: Persisted::load(cache.clone(), CART_RECORD),
            wishlist: Persisted::load(cache.clone(), WISHLIST_RECORD),
            prefs: Persisted::load(cache.clone(), UI_RECORD),
            session: SessionEngine::with_user(session_latency, user),
            reference,
            translator,
            cache,
        }
    }

    /// Load reference data and message catalogs and open storage as
    /// configured.
    pub fn open(config: &StorefrontConfig) -> Result<Self, SdkError> {
        let reference = ReferenceData::load_dir(&config.data.dir)?;
        let translator = Translator::load_dir(config.data.messages_dir())?;

        let cache = match config.storage.backend {
            StorageBackend::Memory => Cache::memory(),
            StorageBackend::File => Cache::open_dir(&config.storage.path)?,
        };

        info!(
            data_dir = %config.data.dir.display(),
            backend = ?config.storage.backend,
            "storefront opened"
        );

        Ok(Self::new(
            Arc::new(reference),
            Arc::new(translator),
            cache,
            config.session.latency(),
        ))
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    // ---- Cart ----

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add units of a catalog product to the cart.
    pub fn add_to_cart(&mut self, product_id: &ProductId, quantity: i64) -> Result<(), SdkError> {
        self.add_to_cart_with_options(product_id, quantity, None)
    }

    /// Add units of a catalog product, recording selected options on a new line.
    pub fn add_to_cart_with_options(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
        options: Option<SelectedOptions>,
    ) -> Result<(), SdkError> {
        let product = self.reference.require_product(product_id)?;
        self.cart
            .update(|cart| cart.add_item_with_options(product, quantity, options));
        Ok(())
    }

    /// Set a line's quantity; zero or less removes it.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        self.cart.update(|cart| cart.update_quantity(product_id, quantity))
    }

    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> bool {
        self.cart.update(|cart| cart.remove_item(product_id))
    }

    pub fn clear_cart(&mut self) {
        self.cart.update(Cart::clear);
    }

    /// Apply a coupon code. Returns whether it was accepted.
    pub fn apply_coupon(&mut self, code: &str) -> bool {
        self.try_apply_coupon(code).is_ok()
    }

    /// Apply a coupon code, reporting why it was rejected.
    ///
    /// A rejected code leaves the cart and its record untouched.
    pub fn try_apply_coupon(&mut self, code: &str) -> Result<Coupon, CouponRejection> {
        let coupons = &self.reference.coupons;
        self.cart
            .try_update(|cart| cart.try_apply_coupon_at(code, coupons, Utc::now()).cloned())
    }

    pub fn remove_coupon(&mut self) -> bool {
        self.cart.update(Cart::remove_coupon)
    }

    pub fn pricing(&self) -> CartPricing {
        self.cart.pricing()
    }

    // ---- Wishlist ----

    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// Add a catalog product to the wishlist. Returns false if already there.
    pub fn add_to_wishlist(&mut self, product_id: &ProductId) -> Result<bool, SdkError> {
        let product = self.reference.require_product(product_id)?;
        let id = product.id.clone();
        Ok(self.wishlist.update(|wishlist| wishlist.add(id)))
    }

    pub fn remove_from_wishlist(&mut self, product_id: &ProductId) -> bool {
        self.wishlist.update(|wishlist| wishlist.remove(product_id))
    }

    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.wishlist.contains(product_id)
    }

    pub fn clear_wishlist(&mut self) {
        self.wishlist.update(Wishlist::clear);
    }

    /// Wishlisted products still present in the catalog, in insertion order.
    pub fn wishlist_products(&self) -> Vec<&Product> {
        self.wishlist
            .product_ids()
            .filter_map(|id| self.reference.product(id))
            .collect()
    }

    // ---- Preferences ----

    pub fn preferences(&self) -> UiPreferences {
        *self.prefs
    }

    pub fn set_language(&mut self, language: Language) {
        self.prefs.update(|prefs| prefs.set_language(language));
    }

    pub fn set_currency(&mut self, currency: Currency) {
        self.prefs.update(|prefs| prefs.set_currency(currency));
    }

    /// Set the language from a code such as `ar`.
    pub fn set_language_code(&mut self, code: &str) -> Result<Language, I18nError> {
        self.prefs.try_update(|prefs| prefs.set_language_code(code))
    }

    /// Set the currency from a code such as `EUR`.
    pub fn set_currency_code(&mut self, code: &str) -> Result<Currency, I18nError> {
        self.prefs.try_update(|prefs| prefs.set_currency_code(code))
    }

    pub fn is_rtl(&self) -> bool {
        self.prefs.is_rtl()
    }

    pub fn text_direction(&self) -> TextDirection {
        self.prefs.text_direction()
    }

    // ---- Display ----

    /// Format a base-currency amount in the preferred currency.
    pub fn format_price(&self, amount: &Money) -> String {
        money::format_money(amount, self.prefs.currency, &self.reference.rates)
    }

    /// Convert between any two supported currencies at the loaded rates.
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        money::convert(amount, from, to, &self.reference.rates)
    }

    /// Translate a key in the preferred language.
    pub fn t(&self, key: &str) -> String {
        self.translator.resolve(self.prefs.language, key)
    }

    /// Translate a key in the preferred language, filling `{name}` slots.
    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.translator.resolve_with(self.prefs.language, key, params)
    }

    /// Translate a pluralised key in the preferred language.
    pub fn t_plural(&self, key: &str, count: u64) -> String {
        self.translator.resolve_plural(self.prefs.language, key, count)
    }

    // ---- Session ----

    pub fn session(&self) -> &SessionEngine {
        &self.session
    }

    pub fn user(&self) -> Option<User> {
        self.session.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Log in. Returns whether the session now holds the user.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.try_login(email, password).await.is_ok()
    }

    pub async fn try_login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self.session.login(email, password).await?;
        self.save_user();
        Ok(user)
    }

    /// Register and log in. Returns whether the session now holds the user.
    pub async fn register(&self, request: RegisterRequest) -> bool {
        self.try_register(request).await.is_ok()
    }

    pub async fn try_register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let user = self.session.register(request).await?;
        self.save_user();
        Ok(user)
    }

    pub fn logout(&self) {
        self.session.logout();
        self.save_user();
    }

    /// Apply a profile update to the logged-in user.
    pub fn update_user(&self, update: UserUpdate) -> Result<User, AuthError> {
        let user = self.session.update_user(update)?;
        self.save_user();
        Ok(user)
    }

    /// Turn the cart into an order owned by the logged-in user.
    ///
    /// The order is recorded on the user and the cart is cleared.
    pub fn place_order(&mut self) -> Result<Order, SdkError> {
        if self.cart.is_empty() {
            return Err(SdkError::EmptyCart);
        }
        let user = self.session.user().ok_or(AuthError::NotAuthenticated)?;

        let order = Order::from_cart(&self.cart, user.email);
        self.session.add_order(order.clone())?;
        self.save_user();
        self.clear_cart();

        info!(order_id = %order.id, total = %order.total, "order placed");
        Ok(order)
    }

    fn save_user(&self) {
        let result = match self.session.user() {
            Some(user) => self.cache.set(USER_RECORD, &user),
            None => self.cache.delete(USER_RECORD),
        };
        match result {
            Ok(()) => debug!(key = USER_RECORD, "session saved"),
            Err(e) => warn!(key = USER_RECORD, error = %e, "failed to persist state"),
        }
    }
}
