//! Asset catalog - the ordered list of overlays a user can place.
//!
//! The built-in catalog ships with the crate; a JSON file with the same shape
//! can replace it (see [`AssetCatalog::load_from`]). Image paths are relative
//! to the catalog's asset root.

use crate::error::{Error, Result};
use crate::scene::DefaultPlacement;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One placeable overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogAsset {
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "image")]
    pub image_path: PathBuf,
    #[serde(rename = "thumbnail")]
    pub thumbnail_path: PathBuf,
    #[serde(rename = "default")]
    pub default_placement: DefaultPlacement,
}

impl CatalogAsset {
    fn builtin(id: &str, display_name: &str, x: f64, y: f64, scale: f64) -> Self {
        let file = PathBuf::from(format!("{}.png", id));
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            image_path: file.clone(),
            thumbnail_path: file,
            default_placement: DefaultPlacement::new(x, y, scale),
        }
    }
}

static BUILTIN: Lazy<Vec<CatalogAsset>> = Lazy::new(|| {
    vec![
        CatalogAsset::builtin("gugo-cap", "$GUGO Cap", 150.0, 30.0, 0.3),
        CatalogAsset::builtin("gugo-helmet", "GUGO Helmet", 140.0, 25.0, 0.35),
        CatalogAsset::builtin("gugo-shades", "Deal With It Shades", 170.0, 120.0, 0.25),
        CatalogAsset::builtin("gugo-chain", "$GUGO Gold Chain", 160.0, 280.0, 0.3),
        CatalogAsset::builtin("gugo-hoodie", "\"GUGO enjoyer\" Hoodie", 120.0, 320.0, 0.4),
        CatalogAsset::builtin("gugo-sign", "Buy $GUGO Sign", 350.0, 250.0, 0.25),
        CatalogAsset::builtin("gugo-plush", "Mini GUGO Plush", 80.0, 380.0, 0.25),
        CatalogAsset::builtin("gugo-speech", "\"GUGO dips\" Bubble", 60.0, 60.0, 0.3),
    ]
});

/// Ordered, id-unique asset list plus the directory its paths resolve against.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetCatalog {
    assets: Vec<CatalogAsset>,
    root: PathBuf,
}

impl AssetCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(assets: Vec<CatalogAsset>, root: impl Into<PathBuf>) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = assets.iter().find(|asset| !seen.insert(asset.id.as_str())) {
            return Err(Error::Decode(format!("Duplicate asset id in catalog: {}", duplicate.id)));
        }
        Ok(Self {
            assets,
            root: root.into(),
        })
    }

    /// The bundled overlays, resolved against `root`.
    pub fn builtin(root: impl Into<PathBuf>) -> Self {
        Self {
            assets: BUILTIN.clone(),
            root: root.into(),
        }
    }

    /// Parse a JSON array of assets.
    pub fn from_json(json: &str, root: impl Into<PathBuf>) -> Result<Self> {
        let assets: Vec<CatalogAsset> = serde_json::from_str(json)?;
        Self::new(assets, root)
    }

    /// Load a JSON catalog file; its paths resolve against the file's directory.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_json(&content, root)
    }

    pub fn get(&self, id: &str) -> Option<&CatalogAsset> {
        self.assets.iter().find(|asset| asset.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogAsset> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute-or-root-relative location of an asset's full image.
    pub fn image_path(&self, asset: &CatalogAsset) -> PathBuf {
        self.root.join(&asset.image_path)
    }

    pub fn thumbnail_path(&self, asset: &CatalogAsset) -> PathBuf {
        self.root.join(&asset.thumbnail_path)
    }
}
