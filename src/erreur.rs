//! src/erreur.rs
//!
//! Erreurs typées de la calculatrice (thiserror).
//!
//! Contrat UI : le détail d’une `ErreurEval` ne sort jamais vers l’utilisateur,
//! il est journalisé puis réduit à la sentinelle "Error" (bureau) ou
//! "Invalid Expression" (web).

use thiserror::Error;

/// Échec d’évaluation d’une expression (parsing ou calcul).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErreurEval {
    #[error("entrée vide")]
    EntreeVide,

    #[error("caractère inattendu: '{0}'")]
    CaractereInattendu(char),

    #[error("nombre invalide: {0}")]
    NombreInvalide(String),

    #[error("identifiant inconnu: {0}")]
    IdentifiantInconnu(String),

    #[error("parenthèses non équilibrées")]
    Parentheses,

    #[error("expression invalide")]
    Syntaxe,

    #[error("expression trop imbriquée")]
    TropImbriquee,

    #[error("division par zéro")]
    DivisionParZero,

    #[error("hors domaine: {0}")]
    Domaine(&'static str),

    #[error("résultat non fini")]
    Depassement,
}

/// Échec d’une conversion d’unités.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErreurConversion {
    #[error("unité inconnue pour {categorie}: {unite}")]
    UniteInconnue {
        categorie: &'static str,
        unite: String,
    },

    #[error("valeur d’entrée invalide: {0}")]
    ValeurInvalide(String),
}

/// Échec de récupération des taux de change.
#[derive(Error, Debug)]
pub enum ErreurTaux {
    #[error("requête HTTP échouée: {0}")]
    Reseau(String),

    #[error("lecture de la réponse impossible")]
    Lecture(#[source] std::io::Error),

    #[error("réponse JSON invalide")]
    Json(#[source] serde_json::Error),

    #[error("réponse sans taux exploitables")]
    SansTaux,

    #[error("tâche de récupération interrompue: {0}")]
    Tache(String),
}

/// Échec de chargement de la configuration.
#[derive(Error, Debug)]
pub enum ErreurConfig {
    #[error("lecture impossible: {chemin}")]
    Lecture {
        chemin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML invalide: {chemin}")]
    Toml {
        chemin: String,
        #[source]
        source: toml::de::Error,
    },
}
