//! Toy catalog loader
//!
//! The catalog is produced by an offline extraction job and read once at
//! startup. Toys are keyed by name only; there is no surrogate id.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Label shown for a toy name that has no catalog entry
pub const UNKNOWN_TOY: &str = "unknown";

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toy {
    /// Unique name, also the key place records refer to
    pub name: String,
    /// Image shown at rest
    #[serde(alias = "idleUrl")]
    pub idle_image_ref: String,
    /// Image shown on hover
    #[serde(default, alias = "hoverUrl", skip_serializing_if = "Option::is_none")]
    pub hover_image_ref: Option<String>,
}

/// Ordered, read-only toy catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    toys: IndexMap<String, Toy>,
}

impl Catalog {
    /// Load a catalog file. `.ron` files are read as RON, anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Catalog(format!("{}: {}", path.display(), e)))?;

        let is_ron = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ron"));

        let catalog = if is_ron {
            Self::from_ron_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };
        tracing::info!(path = %path.display(), toys = catalog.len(), "toy catalog loaded");
        Ok(catalog)
    }

    /// Parse a JSON array of toys
    pub fn from_json_str(content: &str) -> Result<Self> {
        let toys: Vec<Toy> =
            serde_json::from_str(content).map_err(|e| Error::Catalog(e.to_string()))?;
        Self::from_toys(toys)
    }

    /// Parse a RON list of toys
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let toys: Vec<Toy> = ron::from_str(content).map_err(|e| Error::Catalog(e.to_string()))?;
        Self::from_toys(toys)
    }

    /// Build a catalog, rejecting nameless, imageless or duplicate entries.
    pub fn from_toys(toys: Vec<Toy>) -> Result<Self> {
        let mut map = IndexMap::with_capacity(toys.len());
        for (position, toy) in toys.into_iter().enumerate() {
            if toy.name.trim().is_empty() {
                return Err(Error::Catalog(format!("entry {} has no name", position)));
            }
            if toy.idle_image_ref.trim().is_empty() {
                return Err(Error::Catalog(format!("toy {:?} has no idle image", toy.name)));
            }
            if map.contains_key(&toy.name) {
                return Err(Error::Catalog(format!("duplicate toy name {:?}", toy.name)));
            }
            map.insert(toy.name.clone(), toy);
        }
        Ok(Self { toys: map })
    }

    /// All toys in catalog order
    pub fn list_toys(&self) -> impl Iterator<Item = &Toy> {
        self.toys.values()
    }

    /// Look up a toy by name
    pub fn get(&self, name: &str) -> Option<&Toy> {
        self.toys.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.toys.contains_key(name)
    }

    /// The name to display for a toy reference, `"unknown"` if orphaned.
    pub fn display_name<'a>(&'a self, name: &str) -> &'a str {
        self.toys
            .get_key_value(name)
            .map(|(key, _)| key.as_str())
            .unwrap_or(UNKNOWN_TOY)
    }

    pub fn len(&self) -> usize {
        self.toys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRAPED: &str = r#"[
        {"name": "Happy Meal Dino", "idleUrl": "https://www.happymeal.com/dino.png", "hoverUrl": null},
        {"name": "Toy A", "idleUrl": "https://www.happymeal.com/a.png", "hoverUrl": "https://www.happymeal.com/a-hover.png"}
    ]"#;

    #[test]
    fn test_load_scraper_output() {
        let catalog = Catalog::from_json_str(SCRAPED).unwrap();
        assert_eq!(catalog.len(), 2);

        let names: Vec<_> = catalog.list_toys().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Happy Meal Dino", "Toy A"]);

        let dino = catalog.get("Happy Meal Dino").unwrap();
        assert_eq!(dino.hover_image_ref, None);
        assert_eq!(
            catalog.get("Toy A").unwrap().hover_image_ref.as_deref(),
            Some("https://www.happymeal.com/a-hover.png")
        );
    }

    #[test]
    fn test_load_catalog_field_names() {
        let json = r#"[{"name": "Toy B", "idleImageRef": "b.png"}]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.get("Toy B").unwrap().idle_image_ref, "b.png");
    }

    #[test]
    fn test_load_ron() {
        let ron = r#"[
            (name: "Toy C", idleImageRef: "c.png"),
            (name: "Toy D", idleImageRef: "d.png", hoverImageRef: Some("d2.png")),
        ]"#;
        let catalog = Catalog::from_ron_str(ron).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("Toy D"));
    }

    #[test]
    fn test_malformed_catalog_fails() {
        assert!(Catalog::from_json_str("{not json").is_err());
        assert!(Catalog::from_json_str(r#"[{"name": "", "idleUrl": "x.png"}]"#).is_err());
        assert!(Catalog::from_json_str(r#"[{"name": "A", "idleUrl": ""}]"#).is_err());

        let duplicate = r#"[
            {"name": "A", "idleUrl": "a.png"},
            {"name": "A", "idleUrl": "a2.png"}
        ]"#;
        let err = Catalog::from_json_str(duplicate).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn test_missing_file_fails() {
        let err = Catalog::load("/nonexistent/mctoy/toys.json").unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn test_display_name_unknown() {
        let catalog = Catalog::from_json_str(SCRAPED).unwrap();
        assert_eq!(catalog.display_name("Toy A"), "Toy A");
        assert_eq!(catalog.display_name("Retired Toy"), UNKNOWN_TOY);
    }
}
