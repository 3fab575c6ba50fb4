// src/noyau/expr.rs
//
// AST fermé : nombres, constantes, opérateurs, appels de la liste blanche.
// Aucun autre nom n’est représentable : pas d’attribut, pas d’import, pas d’instruction.

use num_rational::BigRational;
use num_traits::One;

use std::fmt;
use std::mem;

/// Fonctions autorisées (liste blanche unique, partagée par tous les appelants).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Log, // base 10
    Ln,  // népérien
    Sqrt,
}

impl Fonction {
    pub const TOUTES: [Fonction; 6] = [
        Fonction::Sin,
        Fonction::Cos,
        Fonction::Tan,
        Fonction::Log,
        Fonction::Ln,
        Fonction::Sqrt,
    ];

    pub fn depuis_nom(nom: &str) -> Option<Self> {
        Self::TOUTES.into_iter().find(|f| f.nom() == nom)
    }

    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::Log => "log",
            Fonction::Ln => "ln",
            Fonction::Sqrt => "sqrt",
        }
    }
}

/// Constantes autorisées.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constante {
    Pi,
    E,
}

impl Constante {
    pub fn depuis_nom(nom: &str) -> Option<Self> {
        match nom {
            "pi" => Some(Constante::Pi),
            "e" => Some(Constante::E),
            _ => None,
        }
    }

    pub fn nom(self) -> &'static str {
        match self {
            Constante::Pi => "pi",
            Constante::E => "e",
        }
    }

    pub fn valeur(self) -> f64 {
        match self {
            Constante::Pi => std::f64::consts::PI,
            Constante::E => std::f64::consts::E,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Nombre(BigRational),
    Constante(Constante),

    Neg(Box<Expr>),

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>), // a ** b

    Appel(Fonction, Box<Expr>),
}

/// Libération itérative : un arbre de profondeur PROFONDEUR_MAX ne doit pas
/// épuiser la pile d’un thread de travail.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pile = Vec::new();
        detacher(self, &mut pile);
        while let Some(mut e) = pile.pop() {
            detacher(&mut e, &mut pile);
        }
    }
}

/// Remplace les enfants de `e` par des feuilles et les empile.
fn detacher(e: &mut Expr, pile: &mut Vec<Box<Expr>>) {
    let feuille = || Box::new(Expr::Constante(Constante::Pi));
    match e {
        Expr::Nombre(_) | Expr::Constante(_) => {}
        Expr::Neg(x) | Expr::Appel(_, x) => pile.push(mem::replace(x, feuille())),
        Expr::Add(a, b)
        | Expr::Sub(a, b)
        | Expr::Mul(a, b)
        | Expr::Div(a, b)
        | Expr::Pow(a, b) => {
            pile.push(mem::replace(a, feuille()));
            pile.push(mem::replace(b, feuille()));
        }
    }
}

/// Rendu entièrement parenthésé (journal debug) : rend la priorité lisible.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Nombre(r) => {
                if r.denom().is_one() {
                    write!(f, "{}", r.numer())
                } else {
                    write!(f, "{}/{}", r.numer(), r.denom())
                }
            }
            Expr::Constante(c) => write!(f, "{}", c.nom()),
            Expr::Neg(x) => write!(f, "(-{x})"),
            Expr::Add(a, b) => write!(f, "({a} + {b})"),
            Expr::Sub(a, b) => write!(f, "({a} - {b})"),
            Expr::Mul(a, b) => write!(f, "({a} * {b})"),
            Expr::Div(a, b) => write!(f, "({a} / {b})"),
            Expr::Pow(a, b) => write!(f, "({a} ** {b})"),
            Expr::Appel(fonction, x) => write!(f, "{}({x})", fonction.nom()),
        }
    }
}
