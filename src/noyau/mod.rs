//! Noyau d’évaluation
//!
//! Organisation interne :
//! - jetons.rs   : tokenisation (littéraux décimaux exacts)
//! - rpn.rs      : shunting-yard + construction Expr (liste blanche)
//! - expr.rs     : AST fermé + liste blanche (fonctions, constantes)
//! - valeur.rs   : évaluation exact / f64
//! - format.rs   : affichage écran
//! - eval.rs     : pipeline complet

pub mod eval;
pub mod expr;
pub mod format;
pub mod jetons;
pub mod rpn;
pub mod valeur;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use eval::{eval_affichage, eval_expression, SENTINELLE_ERREUR};
pub use expr::{Constante, Fonction};
pub use valeur::Valeur;
