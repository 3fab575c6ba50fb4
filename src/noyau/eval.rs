//! Noyau — évaluation (pipeline réel)
//!
//! tokenize -> RPN -> Expr -> évaluation (exact / f64) -> affichage
//!
//! Un seul point d’entrée pour TOUS les chemins (bouton "=", "%", /api/calc) :
//! même liste blanche, même grammaire.

use tracing::debug;

use crate::erreur::ErreurEval;

use super::format::format_valeur;
use super::jetons::{format_tokens, tokenize};
use super::rpn::{from_rpn, to_rpn};
use super::valeur::Valeur;

/// Sentinelle affichée à la place d’un résultat quand l’évaluation échoue.
pub const SENTINELLE_ERREUR: &str = "Error";

/// API publique : évalue une expression et retourne sa valeur.
pub fn eval_expression(expr_str: &str) -> Result<Valeur, ErreurEval> {
    let s = expr_str.trim();
    if s.is_empty() {
        return Err(ErreurEval::EntreeVide);
    }

    // 1) Jetons
    let jetons = tokenize(s)?;

    // 2) RPN
    let rpn = to_rpn(&jetons)?;

    // 3) AST (Expr)
    let expr = from_rpn(&rpn)?;
    debug!(rpn = %format_tokens(&rpn), "expression analysée");

    // 4) Valeur
    expr.evaluer()
}

/// Évalue puis formate pour l’écran ; toute erreur devient la sentinelle "Error".
pub fn eval_affichage(expr_str: &str) -> String {
    match eval_expression(expr_str) {
        Ok(v) => format_valeur(&v),
        Err(e) => {
            debug!(expression = expr_str, erreur = %e, "évaluation refusée");
            SENTINELLE_ERREUR.to_string()
        }
    }
}
