//! Static category reference data.
//!
//! Every proposal names one category from the catalog. The catalog is built
//! once and only read afterwards.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A kind of neighborhood improvement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Category {
    /// Stable identifier stored on proposals
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Icon token understood by the frontend
    pub icon: String,
    /// Color token (hex)
    pub color: String,
    pub description: String,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            description: description.into(),
        }
    }
}

/// Ordered, immutable set of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// Build a catalog from explicit entries. Later duplicates of an id are
    /// dropped so lookups stay unambiguous.
    pub fn new(categories: Vec<Category>) -> Self {
        let mut unique: Vec<Category> = Vec::with_capacity(categories.len());
        for category in categories {
            if !unique.iter().any(|c| c.id == category.id) {
                unique.push(category);
            }
        }
        Self { categories: unique }
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Categories in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::new(vec![
            Category::new(
                "iluminacao",
                "Iluminação",
                "lightbulb",
                "#F59E0B",
                "Melhoria da iluminação pública",
            ),
            Category::new(
                "arborizacao",
                "Arborização",
                "tree-pine",
                "#10B981",
                "Plantio de árvores e áreas verdes",
            ),
            Category::new(
                "acessibilidade",
                "Acessibilidade",
                "accessibility",
                "#8B5CF6",
                "Melhorias para pessoas com deficiência",
            ),
            Category::new(
                "seguranca",
                "Segurança",
                "shield",
                "#EF4444",
                "Segurança pública e equipamentos",
            ),
            Category::new(
                "transporte",
                "Transporte",
                "bus",
                "#2563EB",
                "Transporte público e mobilidade",
            ),
            Category::new(
                "lazer",
                "Lazer",
                "playground",
                "#06B6D4",
                "Espaços de lazer e recreação",
            ),
            Category::new(
                "infraestrutura",
                "Infraestrutura",
                "construction",
                "#64748B",
                "Pavimentação, saneamento e obras",
            ),
            Category::new(
                "outros",
                "Outros",
                "more-horizontal",
                "#6B7280",
                "Outras melhorias urbanas",
            ),
        ])
    }
}
