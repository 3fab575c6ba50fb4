// src/web/cache.rs
//
// Cache des taux côté serveur.
//
// Contrats :
// - premier appel => UNE récupération, même sous requêtes concurrentes
//   (le verrou reste tenu pendant la récupération)
// - TTL absent => document conservé pour toute la durée du processus
// - TTL expiré + récupération en échec => ancien document servi (journalisé)
// - aucun document et échec => erreur (HTTP 500 côté handler)

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::conversion::SourceTaux;
use crate::erreur::ErreurTaux;

struct Entree {
    document: Value,
    obtenu: Instant,
}

pub struct CacheDevises {
    source: Arc<dyn SourceTaux>,
    ttl: Option<Duration>,
    entree: Mutex<Option<Entree>>,
}

impl CacheDevises {
    pub fn new(source: Arc<dyn SourceTaux>, ttl: Option<Duration>) -> Self {
        Self {
            source,
            ttl,
            entree: Mutex::new(None),
        }
    }

    /// Document JSON du fournisseur, tel quel.
    pub async fn document(&self) -> Result<Value, ErreurTaux> {
        let mut garde = self.entree.lock().await;

        if let Some(e) = garde.as_ref() {
            if !self.expiree(e) {
                return Ok(e.document.clone());
            }
            info!("cache des taux expiré");
        }

        // ureq est bloquant : hors des threads du runtime
        let source = Arc::clone(&self.source);
        let resultat = tokio::task::spawn_blocking(move || source.recuperer())
            .await
            .map_err(|e| ErreurTaux::Tache(e.to_string()))
            .and_then(|r| r);

        match resultat {
            Ok(rep) => {
                *garde = Some(Entree {
                    document: rep.brut.clone(),
                    obtenu: Instant::now(),
                });
                Ok(rep.brut)
            }
            Err(e) => match garde.as_ref() {
                Some(ancienne) => {
                    warn!(erreur = %e, "rafraîchissement des taux échoué, ancien document servi");
                    Ok(ancienne.document.clone())
                }
                None => Err(e),
            },
        }
    }

    fn expiree(&self, e: &Entree) -> bool {
        self.ttl.is_some_and(|ttl| e.obtenu.elapsed() >= ttl)
    }
}
