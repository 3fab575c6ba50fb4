// src/noyau/format.rs
//
// Affichage d’une Valeur (écran de la calculatrice).
// - Exact à développement décimal fini : écrit exactement (14, 0.5, -0.375)
// - sinon : plus courte écriture f64, sans ".0" final pour les entiers
// - |x| >= 1e16 ou < 1e-4 (exact ou non) : notation e, longueur bornée

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::valeur::Valeur;

/// Au-delà, on passe par f64 plutôt que d’écrire des milliers de décimales.
const DECIMALES_EXACTES_MAX: usize = 64;

/// Chiffres significatifs d’une mantisse écrite hors de portée de f64.
const CHIFFRES_MANTISSE: usize = 17;

/// Au-delà (en valeur absolue), un flottant entier s’écrit en notation scientifique.
const ENTIER_FLOTTANT_MAX: f64 = 1e16;

pub fn format_valeur(v: &Valeur) -> String {
    match v {
        Valeur::Exact(r) if hors_plage_decimale(r) => match v.en_f64() {
            Ok(x) => format_f64(x),
            Err(_) => notation_e_exacte(r),
        },
        Valeur::Exact(r) => format_exact(r).unwrap_or_else(|| match v.en_f64() {
            Ok(x) => format_f64(x),
            Err(_) => notation_e_exacte(r),
        }),
        Valeur::Approx(x) => format_f64(*x),
    }
}

/// |r| >= 1e16 ou 0 < |r| < 1e-4 : notation e, comme pour les flottants.
fn hors_plage_decimale(r: &BigRational) -> bool {
    if r.is_zero() {
        return false;
    }
    let a = r.abs();
    let grand = BigRational::from_integer(BigInt::from(10u64.pow(16)));
    let petit = BigRational::new(BigInt::one(), BigInt::from(10_000));
    a >= grand || a < petit
}

/// Notation e au-delà de f64 : chiffres de la partie entière, mantisse tronquée.
fn notation_e_exacte(r: &BigRational) -> String {
    let chiffres = r.abs().to_integer().to_string();
    let exposant = chiffres.len().saturating_sub(1);

    let (tete, reste) = chiffres.split_at(1.min(chiffres.len()));
    let reste = reste
        .get(..CHIFFRES_MANTISSE - 1)
        .unwrap_or(reste)
        .trim_end_matches('0');

    let signe = if r.is_negative() { "-" } else { "" };
    if reste.is_empty() {
        format!("{signe}{tete}e{exposant}")
    } else {
        format!("{signe}{tete}.{reste}e{exposant}")
    }
}

/// Développement décimal exact si le dénominateur n’a que des facteurs 2 et 5.
fn format_exact(r: &BigRational) -> Option<String> {
    if r.denom().is_one() {
        return Some(r.numer().to_string());
    }

    let decimales = decimales_finies(r.denom())?;
    if decimales > DECIMALES_EXACTES_MAX {
        return None;
    }

    // r * 10^k est entier
    let echelle = BigInt::from(10).pow(decimales as u32);
    let scaled = (r.numer().abs() * echelle) / r.denom();

    let mut chiffres = scaled.to_string();
    while chiffres.len() <= decimales {
        chiffres.insert(0, '0');
    }
    let (ent, frac) = chiffres.split_at(chiffres.len() - decimales);
    let frac = frac.trim_end_matches('0');

    let signe = if r.is_negative() { "-" } else { "" };
    if frac.is_empty() {
        Some(format!("{signe}{ent}"))
    } else {
        Some(format!("{signe}{ent}.{frac}"))
    }
}

/// Nombre de décimales du développement de 1/d, si fini.
fn decimales_finies(d: &BigInt) -> Option<usize> {
    let deux = BigInt::from(2);
    let cinq = BigInt::from(5);

    let mut reste = d.clone();
    let mut n2 = 0usize;
    let mut n5 = 0usize;

    while (&reste % &deux).is_zero() {
        reste /= &deux;
        n2 += 1;
    }
    while (&reste % &cinq).is_zero() {
        reste /= &cinq;
        n5 += 1;
    }

    if reste.is_one() {
        Some(n2.max(n5))
    } else {
        None
    }
}

/// Écriture f64 : entiers sans ".0", très grands / très petits en notation e.
pub fn format_f64(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    let a = x.abs();
    if a >= ENTIER_FLOTTANT_MAX || a < 1e-4 {
        return format!("{x:e}");
    }
    if x.fract() == 0.0 {
        return format!("{x:.0}");
    }
    format!("{x}")
}
