// src/conversion/source.rs
//
// Récupération des taux de change : UN appel HTTP GET, délai borné.
//
// Le fournisseur répond { "base": "USD", "rates": { "EUR": 0.92, ... }, ... }.
// On garde aussi le document brut : /api/currency le renvoie tel quel.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::config::ConfigDevises;
use crate::erreur::ErreurTaux;

use super::taux::TableTaux;

#[derive(Clone, Debug)]
pub struct ReponseTaux {
    pub base: Option<String>,
    pub taux: TableTaux,
    pub brut: serde_json::Value,
    pub obtenu: DateTime<Utc>,
}

/// Point d’accès aux taux (bloquant). Permet de remplacer le réseau en test.
pub trait SourceTaux: Send + Sync {
    fn recuperer(&self) -> Result<ReponseTaux, ErreurTaux>;
}

#[derive(Deserialize)]
struct CorpsTaux {
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    rates: BTreeMap<String, f64>,
}

/// Analyse le corps JSON du fournisseur.
/// Les taux non finis ou <= 0 sont écartés (ils rendraient la conversion absurde).
pub fn analyser(corps: &str) -> Result<ReponseTaux, ErreurTaux> {
    let brut: serde_json::Value = serde_json::from_str(corps).map_err(ErreurTaux::Json)?;
    let lu: CorpsTaux = serde_json::from_value(brut.clone()).map_err(ErreurTaux::Json)?;

    let taux: TableTaux = lu
        .rates
        .into_iter()
        .filter(|(_, t)| t.is_finite() && *t > 0.0)
        .collect();

    if taux.is_empty() {
        return Err(ErreurTaux::SansTaux);
    }

    Ok(ReponseTaux {
        base: lu.base,
        taux,
        brut,
        obtenu: Utc::now(),
    })
}

/// Source réelle : client ureq avec délai global.
pub struct SourceHttp {
    agent: ureq::Agent,
    url: String,
}

impl SourceHttp {
    pub fn new(config: &ConfigDevises) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.delai_secs))
            .build();
        Self {
            agent,
            url: config.url.clone(),
        }
    }
}

impl SourceTaux for SourceHttp {
    fn recuperer(&self) -> Result<ReponseTaux, ErreurTaux> {
        info!(url = %self.url, "récupération des taux de change");

        // ureq renvoie Err(ureq::Error::Status(..)) pour les 4xx/5xx
        let corps = self
            .agent
            .get(&self.url)
            .call()
            .map_err(|e| ErreurTaux::Reseau(e.to_string()))?
            .into_string()
            .map_err(ErreurTaux::Lecture)?;

        let rep = analyser(&corps)?;
        info!(
            devises = rep.taux.len(),
            base = rep.base.as_deref().unwrap_or("?"),
            "taux de change reçus"
        );
        Ok(rep)
    }
}
