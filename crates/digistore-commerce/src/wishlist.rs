//! Wishlist of saved products.

use crate::ids::{ProductId, WishlistEntryId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A saved product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub id: WishlistEntryId,
    pub product_id: ProductId,
    pub added_at: DateTime<Utc>,
}

/// Set of saved products, in the order they were added.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Wishlist {
    pub items: Vec<WishlistEntry>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a product. Returns false if it was already saved.
    pub fn add(&mut self, product_id: ProductId) -> bool {
        if self.contains(&product_id) {
            return false;
        }
        debug!(product_id = %product_id, "wishlist entry added");
        self.items.push(WishlistEntry {
            id: WishlistEntryId::generate(),
            product_id,
            added_at: Utc::now(),
        });
        true
    }

    /// Forget a product. Returns whether it was saved.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|e| &e.product_id != product_id);
        self.items.len() < len_before
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|e| &e.product_id == product_id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Saved product ids, oldest first.
    pub fn product_ids(&self) -> impl Iterator<Item = &ProductId> {
        self.items.iter().map(|e| &e.product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.add(ProductId::new("netflix")));
        assert!(!wishlist.add(ProductId::new("netflix")));
        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.items[0].id.as_str().starts_with("wsh_"));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut wishlist = Wishlist::new();
        wishlist.add(ProductId::new("a"));
        assert!(!wishlist.remove(&ProductId::new("b")));
        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.remove(&ProductId::new("a")));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_product_ids_in_order() {
        let mut wishlist = Wishlist::new();
        wishlist.add(ProductId::new("b"));
        wishlist.add(ProductId::new("a"));
        let ids: Vec<&str> = wishlist.product_ids().map(|p| p.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        wishlist.clear();
        assert!(!wishlist.contains(&ProductId::new("a")));
    }
}
