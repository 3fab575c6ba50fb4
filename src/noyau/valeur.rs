// src/noyau/valeur.rs
//
// Évaluation de l’AST.
// - Exact  : rationnel (littéraux, + - * /, puissances entières bornées, √ de carrés parfaits)
// - Approx : f64 (constantes, fonctions, tout mélange avec un Approx)
//
// Contrat : une valeur retournée est toujours finie. NaN / ±inf deviennent des erreurs.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::erreur::ErreurEval;

use super::expr::{Expr, Fonction};

/// Borne sur l’exposant entier calculé exactement.
const EXPOSANT_EXACT_MAX: u32 = 1024;

/// Borne sur la taille (bits) d’un résultat exact (puissance ou opération).
const BITS_EXACT_MAX: u64 = 1 << 16;

#[derive(Clone, Debug, PartialEq)]
pub enum Valeur {
    Exact(BigRational),
    Approx(f64),
}

impl Valeur {
    /// Lecture flottante (API web, convertisseur).
    pub fn en_f64(&self) -> Result<f64, ErreurEval> {
        match self {
            Valeur::Exact(r) => rat_en_f64(r),
            Valeur::Approx(x) => Ok(*x),
        }
    }

    fn est_zero(&self) -> bool {
        match self {
            Valeur::Exact(r) => r.is_zero(),
            Valeur::Approx(x) => *x == 0.0,
        }
    }
}

fn rat_en_f64(r: &BigRational) -> Result<f64, ErreurEval> {
    r.to_f64()
        .filter(|x| x.is_finite())
        .ok_or(ErreurEval::Depassement)
}

/// Fabrique un Approx en refusant NaN / infinis.
fn approx(x: f64) -> Result<Valeur, ErreurEval> {
    if x.is_nan() {
        Err(ErreurEval::Domaine("résultat non réel"))
    } else if x.is_infinite() {
        Err(ErreurEval::Depassement)
    } else {
        Ok(Valeur::Approx(x))
    }
}

impl Expr {
    /// Évalue l’arbre en parcours postfixe avec une pile explicite :
    /// la pile d’appels ne dépend pas de la profondeur de l’expression.
    pub fn evaluer(&self) -> Result<Valeur, ErreurEval> {
        enum Etape<'a> {
            Descendre(&'a Expr),
            Combiner(&'a Expr),
        }

        let mut etapes = vec![Etape::Descendre(self)];
        let mut valeurs: Vec<Valeur> = Vec::new();

        while let Some(etape) = etapes.pop() {
            match etape {
                Etape::Descendre(e) => match e {
                    Expr::Nombre(r) => valeurs.push(Valeur::Exact(r.clone())),
                    Expr::Constante(c) => valeurs.push(approx(c.valeur())?),
                    Expr::Neg(x) | Expr::Appel(_, x) => {
                        etapes.push(Etape::Combiner(e));
                        etapes.push(Etape::Descendre(x));
                    }
                    Expr::Add(a, b)
                    | Expr::Sub(a, b)
                    | Expr::Mul(a, b)
                    | Expr::Div(a, b)
                    | Expr::Pow(a, b) => {
                        // a est évalué avant b
                        etapes.push(Etape::Combiner(e));
                        etapes.push(Etape::Descendre(b));
                        etapes.push(Etape::Descendre(a));
                    }
                },

                Etape::Combiner(e) => {
                    let v = match e {
                        Expr::Neg(_) => neg(depiler(&mut valeurs)?)?,
                        Expr::Appel(f, _) => appel(*f, depiler(&mut valeurs)?)?,
                        _ => {
                            let vb = depiler(&mut valeurs)?;
                            let va = depiler(&mut valeurs)?;
                            binaire(e, va, vb)?
                        }
                    };
                    valeurs.push(v);
                }
            }
        }

        match (valeurs.pop(), valeurs.is_empty()) {
            (Some(v), true) => Ok(v),
            _ => Err(ErreurEval::Syntaxe),
        }
    }
}

fn depiler(valeurs: &mut Vec<Valeur>) -> Result<Valeur, ErreurEval> {
    valeurs.pop().ok_or(ErreurEval::Syntaxe)
}

fn neg(x: Valeur) -> Result<Valeur, ErreurEval> {
    match x {
        Valeur::Exact(r) => Ok(Valeur::Exact(-r)),
        Valeur::Approx(v) => approx(-v),
    }
}

/// Taille (bits) d’un rationnel : max(numérateur, dénominateur).
fn taille(r: &BigRational) -> u64 {
    r.numer().bits().max(r.denom().bits())
}

fn binaire(op: &Expr, va: Valeur, vb: Valeur) -> Result<Valeur, ErreurEval> {
    if let Expr::Pow(..) = op {
        return puissance(va, vb);
    }
    if let Expr::Div(..) = op {
        if vb.est_zero() {
            return Err(ErreurEval::DivisionParZero);
        }
    }

    if let (Valeur::Exact(x), Valeur::Exact(y)) = (&va, &vb) {
        // taille(x op y) <= taille(x) + taille(y) + 1 pour + - * /
        if taille(x) + taille(y) < BITS_EXACT_MAX {
            let r = match op {
                Expr::Add(..) => x + y,
                Expr::Sub(..) => x - y,
                Expr::Mul(..) => x * y,
                _ => x / y,
            };
            return Ok(Valeur::Exact(r));
        }
    }

    // résultat exact trop gros, ou opérande flottant
    let (x, y) = (va.en_f64()?, vb.en_f64()?);
    approx(match op {
        Expr::Add(..) => x + y,
        Expr::Sub(..) => x - y,
        Expr::Mul(..) => x * y,
        _ => x / y,
    })
}

fn puissance(base: Valeur, exposant: Valeur) -> Result<Valeur, ErreurEval> {
    // 0 ** négatif : division par zéro (pas d’infini silencieux)
    if base.est_zero() && exposant.en_f64()? < 0.0 {
        return Err(ErreurEval::DivisionParZero);
    }

    if let (Valeur::Exact(b), Valeur::Exact(e)) = (&base, &exposant) {
        if let Some(n) = exposant_entier(e) {
            if bits_estimes(b, n) <= BITS_EXACT_MAX {
                return Ok(Valeur::Exact(b.pow(n)));
            }
        }
    }

    approx(base.en_f64()?.powf(exposant.en_f64()?))
}

/// Exposant entier "raisonnable" (sinon calcul flottant).
fn exposant_entier(e: &BigRational) -> Option<i32> {
    if !e.is_integer() {
        return None;
    }
    e.to_integer()
        .to_i32()
        .filter(|n| n.unsigned_abs() <= EXPOSANT_EXACT_MAX)
}

fn bits_estimes(b: &BigRational, n: i32) -> u64 {
    taille(b).saturating_mul(u64::from(n.unsigned_abs()))
}

fn appel(f: Fonction, x: Valeur) -> Result<Valeur, ErreurEval> {
    match f {
        Fonction::Sqrt => {
            if let Valeur::Exact(r) = &x {
                if r.is_negative() {
                    return Err(ErreurEval::Domaine("racine d’un négatif"));
                }
                if let Some(racine) = racine_exacte(r) {
                    return Ok(Valeur::Exact(racine));
                }
            }
            let v = x.en_f64()?;
            if v < 0.0 {
                return Err(ErreurEval::Domaine("racine d’un négatif"));
            }
            approx(v.sqrt())
        }
        Fonction::Log | Fonction::Ln => {
            let v = x.en_f64()?;
            if v <= 0.0 {
                return Err(ErreurEval::Domaine("logarithme d’un non positif"));
            }
            approx(if f == Fonction::Log { v.log10() } else { v.ln() })
        }
        Fonction::Sin => approx(x.en_f64()?.sin()),
        Fonction::Cos => approx(x.en_f64()?.cos()),
        Fonction::Tan => approx(x.en_f64()?.tan()),
    }
}

/// √(p/q) exacte si p et q sont des carrés parfaits.
fn racine_exacte(r: &BigRational) -> Option<BigRational> {
    let rp = carre_parfait(r.numer())?;
    let rq = carre_parfait(r.denom())?;
    Some(BigRational::new(rp, rq))
}

fn carre_parfait(n: &BigInt) -> Option<BigInt> {
    let s = n.sqrt();
    if &(&s * &s) == n {
        Some(s)
    } else {
        None
    }
}
