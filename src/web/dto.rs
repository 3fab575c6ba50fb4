// src/web/dto.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalcRequete {
    /// Clé absente = expression vide (donc refusée).
    #[serde(default)]
    pub expression: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalcReponse {
    /// Entier si le résultat exact est entier, flottant sinon.
    pub result: serde_json::Number,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErreurReponse {
    pub error: String,
}
