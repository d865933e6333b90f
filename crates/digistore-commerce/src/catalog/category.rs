//! Category tree for product organization.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A product category, possibly holding nested subcategories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// URL-friendly slug.
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Icon name used by the storefront.
    #[serde(default)]
    pub icon: String,
    /// CSS gradient used for the category tile.
    #[serde(default)]
    pub gradient: String,
    /// Number of products in this category.
    #[serde(default)]
    pub product_count: u32,
    /// Parent category ID (None for root categories).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<Category>,
}

impl Category {
    /// Create a new root category.
    pub fn new_root(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
            icon: String::new(),
            gradient: String::new(),
            product_count: 0,
            parent_id: None,
            subcategories: Vec::new(),
        }
    }

    /// Attach a child category, setting its parent link.
    pub fn with_child(mut self, mut child: Category) -> Self {
        child.parent_id = Some(self.id.clone());
        self.subcategories.push(child);
        self
    }

    /// Check if this is a root category.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Depth-first search of this subtree.
    pub fn find<P>(&self, predicate: &P) -> Option<&Category>
    where
        P: Fn(&Category) -> bool,
    {
        if predicate(self) {
            return Some(self);
        }
        self.subcategories.iter().find_map(|c| c.find(predicate))
    }

    /// Collect this category and all descendants, pre-order.
    pub fn flatten(&self) -> Vec<&Category> {
        let mut out = vec![self];
        for child in &self.subcategories {
            out.extend(child.flatten());
        }
        out
    }
}

/// Search a forest of categories by id.
pub fn find_by_id<'a>(roots: &'a [Category], id: &CategoryId) -> Option<&'a Category> {
    roots.iter().find_map(|c| c.find(&|cat: &Category| &cat.id == id))
}

/// Search a forest of categories by slug.
pub fn find_by_slug<'a>(roots: &'a [Category], slug: &str) -> Option<&'a Category> {
    roots.iter().find_map(|c| c.find(&|cat: &Category| cat.slug == slug))
}
