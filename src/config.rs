//! src/config.rs
//!
//! Configuration (fichier TOML optionnel, tout a une valeur par défaut).
//!
//! ```toml
//! [devises]
//! url = "https://api.exchangerate-api.com/v4/latest/USD"
//! delai_secs = 10
//! ttl_secs = 3600   # absent = cache conservé pour toute la session
//!
//! [web]
//! adresse = "127.0.0.1:5000"
//!
//! [journal]
//! niveau = "info"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::erreur::ErreurConfig;

pub const URL_TAUX_DEFAUT: &str = "https://api.exchangerate-api.com/v4/latest/USD";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub devises: ConfigDevises,
    pub web: ConfigWeb,
    pub journal: ConfigJournal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDevises {
    #[serde(default = "default_url")]
    pub url: String,
    /// Délai global de la requête HTTP.
    #[serde(default = "default_delai_secs")]
    pub delai_secs: u64,
    /// Durée de validité du cache web ; None = jamais rafraîchi.
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

impl Default for ConfigDevises {
    fn default() -> Self {
        Self {
            url: default_url(),
            delai_secs: default_delai_secs(),
            ttl_secs: None,
        }
    }
}

fn default_url() -> String {
    URL_TAUX_DEFAUT.to_string()
}

fn default_delai_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigWeb {
    #[serde(default = "default_adresse")]
    pub adresse: String,
}

impl Default for ConfigWeb {
    fn default() -> Self {
        Self {
            adresse: default_adresse(),
        }
    }
}

fn default_adresse() -> String {
    "127.0.0.1:5000".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigJournal {
    /// Filtre EnvFilter par défaut (RUST_LOG reste prioritaire).
    #[serde(default = "default_niveau")]
    pub niveau: String,
}

impl Default for ConfigJournal {
    fn default() -> Self {
        Self {
            niveau: default_niveau(),
        }
    }
}

fn default_niveau() -> String {
    "info".to_string()
}

impl Config {
    /// Charge le fichier s’il est donné, sinon les valeurs par défaut.
    pub fn charger(chemin: Option<&Path>) -> Result<Self, ErreurConfig> {
        let Some(chemin) = chemin else {
            return Ok(Self::default());
        };

        let affiche = chemin.display().to_string();
        let texte = std::fs::read_to_string(chemin).map_err(|source| ErreurConfig::Lecture {
            chemin: affiche.clone(),
            source,
        })?;
        Self::depuis_toml(&texte, &affiche)
    }

    pub fn depuis_toml(texte: &str, chemin: &str) -> Result<Self, ErreurConfig> {
        toml::from_str(texte).map_err(|source| ErreurConfig::Toml {
            chemin: chemin.to_string(),
            source,
        })
    }
}
