//! Category types for product organization.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A product category.
///
/// Products reference categories by `slug`, so the slug must stay unique
/// across the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL-friendly slug (unique).
    pub slug: String,
}

impl Category {
    /// Create a category with a generated id.
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: CategoryId::generate(),
            name: name.into(),
            slug: slug.into(),
        }
    }

    /// Create a category whose slug is derived from the name.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self::new(name, slug)
    }
}

/// Input for creating or renaming a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    /// Explicit slug; derived from `name` when absent or blank.
    #[serde(default)]
    pub slug: Option<String>,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// The slug to store: the explicit one normalized, or one derived from the name.
    pub fn resolved_slug(&self) -> String {
        match &self.slug {
            Some(slug) if !slug.trim().is_empty() => slugify(slug),
            _ => slugify(&self.name),
        }
    }
}

/// The categories every fresh catalog starts with.
pub fn default_categories() -> Vec<Category> {
    [
        ("cat-1", "Preenchedores", "preenchedores"),
        ("cat-2", "Toxina Botulínica", "toxinas"),
        ("cat-3", "Fios de PDO", "fios"),
        ("cat-4", "Bioestimuladores", "bioestimuladores"),
        ("cat-5", "Insumos", "insumos"),
    ]
    .into_iter()
    .map(|(id, name, slug)| Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        slug: slug.to_string(),
    })
    .collect()
}

/// Look up the display name for a slug, falling back to the slug itself.
pub fn category_label<'a>(categories: &'a [Category], slug: &'a str) -> &'a str {
    categories
        .iter()
        .find(|c| c.slug == slug)
        .map(|c| c.name.as_str())
        .unwrap_or(slug)
}

/// Turn a display name into a slug.
///
/// Lowercases, strips Latin diacritics and collapses every run of
/// characters outside `[a-z0-9]` into a single `-`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        let c = fold_diacritic(c);
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Toxina Botulínica"), "toxina-botulinica");
        assert_eq!(slugify("Fios de PDO"), "fios-de-pdo");
        assert_eq!(slugify("  Ácido -- Hialurônico!! "), "acido-hialuronico");
        assert_eq!(slugify("Insumos 2025"), "insumos-2025");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_default_categories() {
        let categories = default_categories();
        assert_eq!(categories.len(), 5);
        assert_eq!(categories[1].id.as_str(), "cat-2");
        assert_eq!(categories[1].slug, "toxinas");
    }

    #[test]
    fn test_category_label_falls_back_to_slug() {
        let categories = default_categories();
        assert_eq!(category_label(&categories, "fios"), "Fios de PDO");
        assert_eq!(category_label(&categories, "laser"), "laser");
    }

    #[test]
    fn test_input_resolves_slug() {
        assert_eq!(CategoryInput::new("Bioestimuladores").resolved_slug(), "bioestimuladores");
        assert_eq!(
            CategoryInput::new("Toxina Botulínica").with_slug("Toxinas").resolved_slug(),
            "toxinas"
        );
        assert_eq!(CategoryInput::new("Fios").with_slug("  ").resolved_slug(), "fios");
    }

    #[test]
    fn test_from_name() {
        let category = Category::from_name("Skinboosters Premium");
        assert_eq!(category.slug, "skinboosters-premium");
        assert!(category.id.as_str().starts_with("cat-"));
    }
}
