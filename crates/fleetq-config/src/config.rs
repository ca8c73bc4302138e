use std::{
    collections::BTreeMap,
    fs,
    path::PathBuf,
    sync::{LazyLock, PoisonError, RwLock},
};

use documented::{Documented, DocumentedFields};
use fleetq_query::{Entity, FilterOptions, Sort};
use serde::{Deserialize, Serialize};
use toml_edit::{DocumentMut, Item};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    annotations::annotate_table,
    error::{ConfigError, Result},
    fields::{default_entity_fields, EntityFields},
    utils::default_config_path,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 500;

/// fleetq configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// Base URL of the update server. List requests go to `{base_url}/rest/v1/{entity}`.
    /// Default: http://localhost:8080
    pub base_url: Option<String>,

    /// Number of rows requested per page, between 1 and 500.
    /// Default: 50
    pub page_size: Option<u32>,

    /// Sort used when a request names none, written as field:ASC or field:DESC.
    pub default_sort: Option<String>,

    /// Per-entity field handling, keyed by entity name (targets, distribution-sets, ...).
    #[serde(default)]
    pub fields: BTreeMap<String, EntityFields>,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("FLEETQ_CONFIG") {
        Ok(path) => PathBuf::from(path),
        Err(_) => default_config_path(),
    })
});

pub fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

pub fn set_config_path(path: PathBuf) {
    *CONFIG_PATH.write().unwrap_or_else(PoisonError::into_inner) = path;
}

/// Loads the configuration file into the global slot.
pub fn init() -> Result<()> {
    let config = Config::new()?;
    *CONFIG.write().unwrap_or_else(PoisonError::into_inner) = Some(config);
    Ok(())
}

/// Returns the loaded configuration, or the defaults if [`init`] was never called.
pub fn get_config() -> Config {
    CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .unwrap_or_default()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            page_size: Some(DEFAULT_PAGE_SIZE),
            default_sort: None,
            fields: default_entity_fields(),
        }
    }
}

impl Config {
    /// Reads the configuration file, falling back to defaults when it is missing.
    pub fn new() -> Result<Self> {
        if std::env::var("FLEETQ_STEALTH").is_ok() {
            return Ok(Self::default());
        }

        let path = config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    /// Fills unset values with defaults and validates the rest.
    pub fn resolve(&mut self) -> Result<()> {
        let base_url = self
            .base_url
            .get_or_insert_with(|| DEFAULT_BASE_URL.to_string())
            .clone();
        Url::parse(&base_url).map_err(|source| {
            ConfigError::InvalidBaseUrl {
                url: base_url.clone(),
                source,
            }
        })?;

        let page_size = *self.page_size.get_or_insert(DEFAULT_PAGE_SIZE);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize(page_size));
        }

        if let Some(sort) = &self.default_sort {
            sort.parse::<Sort>()?;
        }

        for key in self.fields.keys() {
            if key.parse::<Entity>().is_err() {
                return Err(ConfigError::UnknownEntity(key.clone()));
            }
        }

        Ok(())
    }

    /// `FLEETQ_BASE_URL` overrides the configured value.
    pub fn base_url(&self) -> String {
        if let Ok(url) = std::env::var("FLEETQ_BASE_URL") {
            return url;
        }
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn default_sort(&self) -> Option<Sort> {
        let sort = self.default_sort.as_deref()?;
        match sort.parse() {
            Ok(sort) => Some(sort),
            Err(err) => {
                warn!("ignoring default_sort: {err}");
                None
            }
        }
    }

    /// Field table for `entity`, looked up by its name or REST path.
    pub fn entity_fields(&self, entity: Entity) -> Option<&EntityFields> {
        self.fields
            .get(entity.name())
            .or_else(|| self.fields.get(entity.path()))
    }

    pub fn filter_options(&self, entity: Entity) -> FilterOptions {
        self.entity_fields(entity)
            .map(EntityFields::filter_options)
            .unwrap_or_default()
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let mut doc = toml::to_string_pretty(self)?.parse::<DocumentMut>()?;

        annotate_table::<Config>(doc.as_table_mut(), false)?;

        if let Some(Item::Table(fields)) = doc.get_mut("fields") {
            for (_, item) in fields.iter_mut() {
                if let Item::Table(entity_table) = item {
                    annotate_table::<EntityFields>(entity_table, false)?;
                }
            }
        }

        Ok(doc)
    }
}

/// Writes the annotated default configuration, refusing to overwrite.
pub fn generate_default_config() -> Result<PathBuf> {
    let path = config_path();

    if path.exists() {
        return Err(ConfigError::ConfigAlreadyExists(path.display().to_string()));
    }

    let doc = Config::default().to_annotated_document()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&path, doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        path.display()
    );
    Ok(path)
}
