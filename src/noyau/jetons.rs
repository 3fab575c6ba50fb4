// src/noyau/jetons.rs
//
// Lexique fermé de la calculatrice.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::erreur::ErreurEval;

/// Borne sur l’exposant décimal d’un littéral (1e1024 max) : évite les big int géants.
const EXPOSANT_LITTERAL_MAX: i64 = 1024;

/// Exposant décimal sous lequel un littéral vaut 0 (f64 s’arrête vers 1e-324).
const SOUS_DEPASSEMENT: i64 = 400;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(BigRational),

    // Fonctions + constantes (normalisées en minuscules).
    // NOTE: c’est rpn.rs qui décide, via la liste blanche, si le nom est autorisé.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Pow, // ** ou ^

    // Moins unaire : jamais produit par tokenize(), seulement par to_rpn().
    Neg,

    LPar,
    RPar,
}

/// Découpe l’entrée en jetons.
///
/// Reconnaît les littéraux décimaux (`12`, `3.5`, `.5`, `2e3`, `1.5E-2`, lus
/// en rationnels exacts), `+ - * / **` avec `^` pour `**`, les parenthèses,
/// les noms ASCII (mis en minuscules) et les alias `π` / `√`.
/// Tout autre caractère est une erreur : aucune syntaxe hors de cette liste.
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ErreurEval> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        match c {
            '(' => {
                out.push(Tok::LPar);
                i += 1;
                continue;
            }
            ')' => {
                out.push(Tok::RPar);
                i += 1;
                continue;
            }
            '+' => {
                out.push(Tok::Plus);
                i += 1;
                continue;
            }
            '-' => {
                out.push(Tok::Minus);
                i += 1;
                continue;
            }
            '*' => {
                // "**" = puissance, "*" = produit
                if i + 1 < chars.len() && chars[i + 1] == '*' {
                    out.push(Tok::Pow);
                    i += 2;
                } else {
                    out.push(Tok::Star);
                    i += 1;
                }
                continue;
            }
            '/' => {
                out.push(Tok::Slash);
                i += 1;
                continue;
            }
            '^' => {
                out.push(Tok::Pow);
                i += 1;
                continue;
            }
            'π' => {
                out.push(Tok::Ident("pi".to_string()));
                i += 1;
                continue;
            }
            '√' => {
                out.push(Tok::Ident("sqrt".to_string()));
                i += 1;
                continue;
            }
            _ => {}
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Tok::Ident(word.to_lowercase()));
            continue;
        }

        // Nombre décimal : chiffres, au plus un point, exposant optionnel
        if c.is_ascii_digit() || c == '.' {
            let (rat, suivant) = lire_nombre(&chars, i)?;
            out.push(Tok::Num(rat));
            i = suivant;
            continue;
        }

        return Err(ErreurEval::CaractereInattendu(c));
    }

    Ok(out)
}

/// Lit un littéral numérique à partir de `debut`.
/// Retourne la valeur exacte et l’index du premier caractère non consommé.
fn lire_nombre(chars: &[char], debut: usize) -> Result<(BigRational, usize), ErreurEval> {
    let mut i = debut;
    let mut entier = String::new();
    let mut frac = String::new();
    let mut point = false;

    while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
        if chars[i] == '.' {
            if point {
                // "1.2.3" : deuxième point dans le même opérande
                let brut: String = chars[debut..=i].iter().collect();
                return Err(ErreurEval::NombreInvalide(brut));
            }
            point = true;
        } else if point {
            frac.push(chars[i]);
        } else {
            entier.push(chars[i]);
        }
        i += 1;
    }

    if entier.is_empty() && frac.is_empty() {
        return Err(ErreurEval::NombreInvalide(".".into()));
    }

    // mantisse = entier.frac / 10^len(frac)
    let chiffres = format!("{entier}{frac}");
    let numer = BigInt::parse_bytes(chiffres.as_bytes(), 10)
        .ok_or_else(|| ErreurEval::NombreInvalide(chiffres.clone()))?;
    let mut rat = BigRational::new(numer, puissance_dix(frac.len()));

    // exposant : e/E suivi d’un signe optionnel ET d’un chiffre (sinon "e" est la constante)
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        let mut negatif = false;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            negatif = chars[j] == '-';
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            let start = j;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            let exp_txt: String = chars[start..j].iter().collect();
            let exp = exp_txt.parse::<i64>().unwrap_or(i64::MAX);

            if exp <= EXPOSANT_LITTERAL_MAX {
                // exp <= EXPOSANT_LITTERAL_MAX : la conversion en usize est sûre
                let facteur = BigRational::from_integer(puissance_dix(exp as usize));
                rat = if negatif { rat / facteur } else { rat * facteur };
            } else if negatif
                && ordre_de_grandeur(&entier).saturating_sub(exp) < -SOUS_DEPASSEMENT
            {
                // 1e-2000 : sous la plus petite valeur f64, lu comme 0
                rat = BigRational::zero();
            } else {
                return Err(ErreurEval::NombreInvalide(chars[debut..j].iter().collect()));
            }
            i = j;
        }
    }

    Ok((rat, i))
}

/// Nombre de chiffres significatifs de la partie entière.
fn ordre_de_grandeur(entier: &str) -> i64 {
    entier.trim_start_matches('0').len() as i64
}

fn puissance_dix(n: usize) -> BigInt {
    let mut p = BigInt::one();
    let dix = BigInt::from(10);
    for _ in 0..n {
        p *= &dix;
    }
    p
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbole = match self {
            Tok::Num(r) if r.is_integer() => return write!(f, "{}", r.numer()),
            Tok::Num(r) => return write!(f, "{}/{}", r.numer(), r.denom()),
            Tok::Ident(nom) => nom.as_str(),
            Tok::Plus => "+",
            Tok::Minus => "-",
            Tok::Star => "*",
            Tok::Slash => "/",
            Tok::Pow => "**",
            Tok::Neg => "neg",
            Tok::LPar => "(",
            Tok::RPar => ")",
        };
        f.write_str(symbole)
    }
}

/// Jetons séparés par des espaces (journal debug, tests).
pub fn format_tokens(tokens: &[Tok]) -> String {
    tokens
        .iter()
        .map(Tok::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
