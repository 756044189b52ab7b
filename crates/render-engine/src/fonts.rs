//! Font discovery and confirmation.
//!
//! Text must not be measured with a font that has not been confirmed:
//! measuring with a silent fallback produces a card of the wrong width.
//! [`FontCatalog::confirm`] waits (bounded) for the font database and reports
//! whether the requested family was found, substituted, or unavailable.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};
use tokio::sync::OnceCell;

use subcard_common::FontConfig;
use subcard_model::FontWeight;

/// Outcome of confirming a font before measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontResolution {
    /// The requested family is available.
    Exact { family: String },
    /// The requested family is missing; another face is used instead.
    Substituted { requested: String },
    /// No usable face (empty database or confirmation timed out).
    Unavailable,
}

impl FontResolution {
    pub fn is_exact(&self) -> bool {
        matches!(self, FontResolution::Exact { .. })
    }
}

/// Raw font file bytes plus the face index inside the file.
#[derive(Debug)]
pub struct LoadedFace {
    pub data: Vec<u8>,
    pub index: u32,
}

#[derive(Debug)]
struct CatalogInner {
    font_dirs: Vec<PathBuf>,
    load_system_fonts: bool,
    timeout: Duration,
    database: OnceCell<Arc<Database>>,
    faces: Mutex<HashMap<ID, Arc<LoadedFace>>>,
}

/// Lazily loaded font database shared by preview and generation.
#[derive(Debug, Clone)]
pub struct FontCatalog {
    inner: Arc<CatalogInner>,
}

impl FontCatalog {
    /// Catalog that loads fonts on first use according to `config`.
    pub fn new(config: &FontConfig) -> Self {
        Self::with_parts(
            config.font_dirs.clone(),
            config.load_system_fonts,
            Duration::from_millis(config.confirm_timeout_ms),
            OnceCell::new(),
        )
    }

    /// Catalog over an already populated database.
    pub fn from_database(database: Database) -> Self {
        Self::with_parts(
            vec![],
            false,
            Duration::from_secs(1),
            OnceCell::new_with(Some(Arc::new(database))),
        )
    }

    /// Catalog without any fonts. Text is never drawn.
    pub fn empty() -> Self {
        Self::from_database(Database::new())
    }

    fn with_parts(
        font_dirs: Vec<PathBuf>,
        load_system_fonts: bool,
        timeout: Duration,
        database: OnceCell<Arc<Database>>,
    ) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                font_dirs,
                load_system_fonts,
                timeout,
                database,
                faces: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// The font database, waiting at most the configured timeout for it to load.
    async fn database(&self) -> Option<Arc<Database>> {
        if let Some(db) = self.inner.database.get() {
            return Some(db.clone());
        }

        let font_dirs = self.inner.font_dirs.clone();
        let load_system_fonts = self.inner.load_system_fonts;
        let init = self.inner.database.get_or_try_init(|| async move {
            tokio::task::spawn_blocking(move || load_database(&font_dirs, load_system_fonts))
                .await
                .map(Arc::new)
        });

        match tokio::time::timeout(self.inner.timeout, init).await {
            Ok(Ok(db)) => Some(db.clone()),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Font database load failed");
                None
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.inner.timeout.as_millis() as u64,
                    "Font confirmation timed out; drawing without text"
                );
                None
            }
        }
    }

    /// Confirm `family` at `weight` is usable, falling back to any available face.
    pub async fn confirm(
        &self,
        family: &str,
        weight: FontWeight,
    ) -> (FontResolution, Option<Arc<LoadedFace>>) {
        let Some(db) = self.database().await else {
            return (FontResolution::Unavailable, None);
        };

        let exact = db.query(&query(&[Family::Name(family)], weight));
        let (resolution, id) = match exact {
            Some(id) => (
                FontResolution::Exact {
                    family: family.to_string(),
                },
                Some(id),
            ),
            None => {
                let fallback = db
                    .query(&query(&[Family::SansSerif, Family::Serif], weight))
                    .or_else(|| db.faces().next().map(|face| face.id));
                match fallback {
                    Some(id) => {
                        tracing::warn!(requested = family, "Font not found; substituting");
                        (
                            FontResolution::Substituted {
                                requested: family.to_string(),
                            },
                            Some(id),
                        )
                    }
                    None => {
                        tracing::warn!(requested = family, "No fonts available");
                        (FontResolution::Unavailable, None)
                    }
                }
            }
        };

        let face = id.and_then(|id| self.face(&db, id));
        if face.is_none() && id.is_some() {
            return (FontResolution::Unavailable, None);
        }
        (resolution, face)
    }

    /// Number of faces known, loading the database if needed.
    pub async fn face_count(&self) -> usize {
        self.database().await.map(|db| db.len()).unwrap_or(0)
    }

    fn face(&self, db: &Database, id: ID) -> Option<Arc<LoadedFace>> {
        let mut faces = self
            .inner
            .faces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(face) = faces.get(&id) {
            return Some(face.clone());
        }
        let face = db.with_face_data(id, |data, index| {
            Arc::new(LoadedFace {
                data: data.to_vec(),
                index,
            })
        })?;
        faces.insert(id, face.clone());
        Some(face)
    }
}

fn query<'a>(families: &'a [Family<'a>], weight: FontWeight) -> Query<'a> {
    Query {
        families,
        weight: Weight(weight.value()),
        stretch: Stretch::Normal,
        style: Style::Normal,
    }
}

fn load_database(font_dirs: &[PathBuf], load_system_fonts: bool) -> Database {
    let mut db = Database::new();
    if load_system_fonts {
        db.load_system_fonts();
    }
    for dir in font_dirs {
        db.load_fonts_dir(dir);
    }
    tracing::info!(faces = db.len(), "Font database loaded");
    db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_catalog_is_unavailable() {
        let catalog = FontCatalog::empty();
        let (resolution, face) = catalog.confirm("Pretendard", FontWeight::Bold).await;
        assert_eq!(resolution, FontResolution::Unavailable);
        assert!(face.is_none());
        assert_eq!(catalog.face_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_font_dir_loads_empty_database() {
        let config = FontConfig {
            font_dirs: vec![PathBuf::from("/nonexistent/fonts")],
            load_system_fonts: false,
            confirm_timeout_ms: 2000,
        };
        let catalog = FontCatalog::new(&config);
        assert_eq!(catalog.face_count().await, 0);
        let (resolution, _) = catalog.confirm("Anything", FontWeight::Regular).await;
        assert_eq!(resolution, FontResolution::Unavailable);
    }

    #[tokio::test]
    async fn test_unknown_family_substitutes() {
        let mut db = Database::new();
        db.load_system_fonts();
        assert!(!db.is_empty(), "substitution needs an installed font");
        let catalog = FontCatalog::from_database(db);
        let (resolution, face) = catalog
            .confirm("Definitely Not Installed 9f2c", FontWeight::Bold)
            .await;
        assert!(matches!(resolution, FontResolution::Substituted { .. }));
        assert!(face.is_some());
    }
}
