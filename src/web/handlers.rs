// src/web/handlers.rs

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::Extension;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::Json;
use num_traits::ToPrimitive;
use serde_json::{Number, Value};
use tracing::debug;

use crate::erreur::ErreurEval;
use crate::noyau::{eval_expression, Valeur};

use super::cache::CacheDevises;
use super::dto::{CalcReponse, CalcRequete};
use super::error::ApiError;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const SCRIPT_JS: &str = include_str!("../../static/script.js");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}

pub async fn currency(
    Extension(cache): Extension<Arc<CacheDevises>>,
) -> Result<Json<Value>, ApiError> {
    let document = cache.document().await?;
    Ok(Json(document))
}

/// Corps illisible ou expression refusée : même réponse 400.
pub async fn calc(
    requete: Result<Json<CalcRequete>, JsonRejection>,
) -> Result<Json<CalcReponse>, ApiError> {
    let Json(requete) = requete.map_err(|e| {
        debug!(erreur = %e, "corps /api/calc illisible");
        ApiError::ExpressionInvalide
    })?;

    let result = eval_expression(&requete.expression)
        .and_then(|v| nombre_json(&v))
        .map_err(|e| {
            debug!(expression = %requete.expression, erreur = %e, "évaluation refusée");
            ApiError::ExpressionInvalide
        })?;

    Ok(Json(CalcReponse { result }))
}

/// Entier exact représentable => entier JSON ; sinon flottant.
fn nombre_json(v: &Valeur) -> Result<Number, ErreurEval> {
    if let Valeur::Exact(r) = v {
        if r.is_integer() {
            if let Some(n) = r.to_integer().to_i64() {
                return Ok(Number::from(n));
            }
        }
    }
    Number::from_f64(v.en_f64()?).ok_or(ErreurEval::Depassement)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::Ordering;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use crate::web::cache::tests::SourceComptee;
    use crate::web::router;

    fn app_avec(source: Arc<SourceComptee>) -> Router {
        router(Arc::new(CacheDevises::new(source, None)))
    }

    fn app() -> Router {
        app_avec(Arc::new(SourceComptee::new()))
    }

    async fn corps_json(response: axum::response::Response) -> Value {
        let octets = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&octets).unwrap()
    }

    fn post_calc(corps: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/calc")
            .header("content-type", "application/json")
            .body(Body::from(corps.to_string()))
            .unwrap()
    }

    async fn calc_ok(expression: &str) -> Value {
        let corps = serde_json::json!({ "expression": expression }).to_string();
        let response = app().oneshot(post_calc(&corps)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{expression}");
        corps_json(response).await["result"].clone()
    }

    async fn calc_refuse(corps: &str) {
        let response = app().oneshot(post_calc(corps)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{corps}");
        assert_eq!(
            corps_json(response).await,
            serde_json::json!({ "error": "Invalid Expression" })
        );
    }

    #[tokio::test]
    async fn calc_entier_et_flottant() {
        assert_eq!(calc_ok("2+3*4").await, 14);
        assert_eq!(calc_ok("2**10").await, 1024);
        assert_eq!(calc_ok("1/4").await, 0.25);
        assert_eq!(calc_ok("sqrt(16)").await, 4);
        assert_eq!(calc_ok("log(1000)").await, 3.0);
    }

    #[tokio::test]
    async fn calc_fonctions_transcendantes() {
        let r = calc_ok("sin(pi/2)").await.as_f64().unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        let r = calc_ok("ln(e)").await.as_f64().unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn calc_expressions_refusees() {
        calc_refuse(r#"{"expression": "2+"}"#).await;
        calc_refuse(r#"{"expression": "1/0"}"#).await;
        calc_refuse(r#"{"expression": "sqrt(-1)"}"#).await;
        calc_refuse(r#"{"expression": "__import__('os')"}"#).await;
        calc_refuse(r#"{"expression": "math.sqrt(4)"}"#).await;
    }

    #[tokio::test]
    async fn calc_corps_invalides() {
        // clé absente = expression vide
        calc_refuse("{}").await;
        calc_refuse(r#"{"expression": 42}"#).await;
        calc_refuse("pas du json").await;
    }

    #[tokio::test]
    async fn currency_document_brut_et_cache() {
        let source = Arc::new(SourceComptee::new());
        let app = app_avec(source.clone());

        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(Request::get("/api/currency").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let doc = corps_json(response).await;
            assert_eq!(doc["base"], "USD");
            assert_eq!(doc["rates"]["EUR"], 0.9);
        }
        assert_eq!(source.appels.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn currency_echec_500() {
        let source = Arc::new(SourceComptee {
            echec_apres: 0,
            ..SourceComptee::new()
        });
        let response = app_avec(source)
            .oneshot(Request::get("/api/currency").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let doc = corps_json(response).await;
        assert!(doc["error"].as_str().unwrap().contains("connexion refusée"));
    }

    #[tokio::test]
    async fn pages_statiques() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let octets = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&octets).contains("/static/script.js"));

        let response = app()
            .oneshot(Request::get("/static/script.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/javascript; charset=utf-8"
        );
    }
}
