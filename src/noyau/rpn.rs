// src/noyau/rpn.rs
//
// Jetons (infixe) -> RPN -> arbre Expr.
//
// - Un nom est soit une fonction de la liste blanche (suivie de '(' obligatoirement),
//   soit `pi` / `e`. Il n’existe ni variable ni attribut.
// - '-' en position d’opérande devient Tok::Neg ; '+' dans cette position est ignoré.
//   Neg passe sous ** et au-dessus de * / : -2**2 = -4, 2**-1 = 1/2.
// - Une fonction attend sur la pile d’opérateurs que sa ')' soit fermée.

use crate::erreur::ErreurEval;

use super::expr::{Constante, Expr, Fonction};
use super::jetons::Tok;

/// Garde-fou : profondeur maximale de l’arbre. Évaluation et libération sont
/// itératives ; la borne limite la mémoire, pas la pile.
const PROFONDEUR_MAX: usize = 10_000;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Neg => 3,
        Tok::Pow => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Pow | Tok::Neg)
}

fn is_fonction_ident(name: &str) -> bool {
    Fonction::depuis_nom(name).is_some()
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("sqrt"), LPar, Num(16), RPar, Plus, Num(1)]
///   rpn:    [Num(16), Ident("sqrt"), Num(1), Plus]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Tok>, ErreurEval> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();

    // true tant qu’on attend un opérande (début, après un opérateur, après '(').
    // Sert à détecter le moins unaire ET les juxtapositions invalides ("2 3", "2(3)").
    let mut attend_valeur = true;

    for (i, tok) in tokens.iter().enumerate() {
        match tok {
            Tok::Num(_) => {
                if !attend_valeur {
                    return Err(ErreurEval::Syntaxe);
                }
                out.push(tok.clone());
                attend_valeur = false;
            }

            Tok::Ident(name) => {
                if !attend_valeur {
                    return Err(ErreurEval::Syntaxe);
                }
                if is_fonction_ident(name) {
                    // fonction : on la garde sur la pile (elle sortira après son argument)
                    if !matches!(tokens.get(i + 1), Some(Tok::LPar)) {
                        return Err(ErreurEval::Syntaxe);
                    }
                    ops.push(tok.clone());
                } else if Constante::depuis_nom(name).is_some() {
                    out.push(tok.clone());
                    attend_valeur = false;
                } else {
                    return Err(ErreurEval::IdentifiantInconnu(name.clone()));
                }
            }

            Tok::LPar => {
                if !attend_valeur {
                    return Err(ErreurEval::Syntaxe);
                }
                ops.push(Tok::LPar);
            }

            Tok::RPar => {
                // "()" ou "(2+)" : rien à fermer
                if attend_valeur {
                    return Err(ErreurEval::Syntaxe);
                }

                // dépile jusqu’à '('
                loop {
                    match ops.pop() {
                        Some(Tok::LPar) => break,
                        Some(op) => out.push(op),
                        None => return Err(ErreurEval::Parentheses),
                    }
                }

                // si une fonction est au sommet, on la sort aussi
                if matches!(ops.last(), Some(Tok::Ident(_))) {
                    if let Some(f) = ops.pop() {
                        out.push(f);
                    }
                }

                attend_valeur = false;
            }

            // signes unaires
            Tok::Plus if attend_valeur => {}
            Tok::Minus if attend_valeur => ops.push(Tok::Neg),

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Pow => {
                if attend_valeur {
                    return Err(ErreurEval::Syntaxe);
                }

                // dépile tant que:
                // - on n'est pas bloqué par '(' ou une fonction
                // - et la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(top) = ops.last() {
                    if matches!(top, Tok::LPar | Tok::Ident(_)) {
                        break;
                    }

                    let p_top = precedence(top);
                    let p_tok = precedence(tok);

                    let doit_pop = if is_right_associative(tok) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    if !doit_pop {
                        break;
                    }
                    if let Some(op) = ops.pop() {
                        out.push(op);
                    }
                }

                ops.push(tok.clone());
                attend_valeur = true;
            }

            // jamais produit par tokenize()
            Tok::Neg => return Err(ErreurEval::Syntaxe),
        }
    }

    // opérateur final sans opérande ("2+") ou entrée vide
    if attend_valeur {
        return Err(ErreurEval::Syntaxe);
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err(ErreurEval::Parentheses);
        }
        out.push(op);
    }

    Ok(out)
}

/// Construit une Expr à partir d’une RPN.
///
/// Chaque entrée de pile garde la profondeur de son sous-arbre :
/// au-delà de PROFONDEUR_MAX on refuse.
pub fn from_rpn(rpn: &[Tok]) -> Result<Expr, ErreurEval> {
    let mut st: Vec<(Expr, usize)> = Vec::new();

    for tok in rpn.iter().cloned() {
        match tok {
            Tok::Num(r) => st.push((Expr::Nombre(r), 1)),

            Tok::Ident(name) => {
                if let Some(f) = Fonction::depuis_nom(&name) {
                    let (x, p) = st.pop().ok_or(ErreurEval::Syntaxe)?;
                    st.push((Expr::Appel(f, Box::new(x)), profondeur(p + 1)?));
                } else if let Some(c) = Constante::depuis_nom(&name) {
                    st.push((Expr::Constante(c), 1));
                } else {
                    return Err(ErreurEval::IdentifiantInconnu(name));
                }
            }

            Tok::Neg => {
                let (x, p) = st.pop().ok_or(ErreurEval::Syntaxe)?;
                st.push((Expr::Neg(Box::new(x)), profondeur(p + 1)?));
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Pow => {
                let (b, pb) = st.pop().ok_or(ErreurEval::Syntaxe)?;
                let (a, pa) = st.pop().ok_or(ErreurEval::Syntaxe)?;
                let (a, b) = (Box::new(a), Box::new(b));

                let e = match tok {
                    Tok::Plus => Expr::Add(a, b),
                    Tok::Minus => Expr::Sub(a, b),
                    Tok::Star => Expr::Mul(a, b),
                    Tok::Slash => Expr::Div(a, b),
                    _ => Expr::Pow(a, b),
                };

                st.push((e, profondeur(pa.max(pb) + 1)?));
            }

            Tok::LPar | Tok::RPar => return Err(ErreurEval::Parentheses),
        }
    }

    if st.len() != 1 {
        return Err(ErreurEval::Syntaxe);
    }
    st.pop().map(|(e, _)| e).ok_or(ErreurEval::Syntaxe)
}

fn profondeur(p: usize) -> Result<usize, ErreurEval> {
    if p > PROFONDEUR_MAX {
        Err(ErreurEval::TropImbriquee)
    } else {
        Ok(p)
    }
}
