//! Backend web (axum)
//!
//! - routes.rs   : table des routes + injection du cache (Extension)
//! - handlers.rs : GET /, GET /static/script.js, GET /api/currency, POST /api/calc
//! - cache.rs    : cache des taux (single-flight, TTL optionnel)
//! - dto.rs      : corps JSON
//! - error.rs    : ApiError -> réponse HTTP

pub mod cache;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tracing::info;

use crate::config::Config;
use crate::conversion::SourceHttp;

use cache::CacheDevises;

pub use routes::router;

/// Routeur complet ; le cache des taux interroge le fournisseur configuré.
pub fn application(config: &Config) -> Router {
    let source = Arc::new(SourceHttp::new(&config.devises));
    let ttl = config.devises.ttl_secs.map(Duration::from_secs);
    router(Arc::new(CacheDevises::new(source, ttl)))
}

/// Sert l’application jusqu’à Ctrl-C.
pub async fn servir(config: &Config, adresse: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(adresse)
        .await
        .with_context(|| format!("écoute impossible sur {adresse}"))?;
    info!(adresse = %listener.local_addr()?, "serveur web démarré");

    axum::serve(listener, application(config))
        .with_graceful_shutdown(async {
            // Ctrl-C indisponible : on sert jusqu’à l’arrêt du processus
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
            info!("arrêt demandé");
        })
        .await
        .context("serveur web interrompu")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn application_depuis_la_configuration() {
        let config = Config::default();
        let response = application(&config)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn application_calcule_sans_reseau() {
        let requete = Request::builder()
            .method("POST")
            .uri("/api/calc")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"expression": "6*7"}"#))
            .unwrap();
        let response = application(&Config::default()).oneshot(requete).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
