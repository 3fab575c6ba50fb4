//! Convertisseur d’unités et de devises
//!
//! - tables.rs : facteurs statiques (longueur, poids)
//! - taux.rs   : table des taux + statut (EnAttente / Pret / Echec)
//! - source.rs : récupération HTTP des taux

pub mod source;
pub mod tables;
pub mod taux;

use crate::erreur::ErreurConversion;

pub use source::{ReponseTaux, SourceHttp, SourceTaux};
pub use taux::{EtatTaux, StatutTaux, TableTaux};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Categorie {
    #[default]
    Longueur,
    Poids,
    Devise,
}

impl Categorie {
    pub const TOUTES: [Categorie; 3] = [Categorie::Longueur, Categorie::Poids, Categorie::Devise];

    pub fn libelle(self) -> &'static str {
        match self {
            Categorie::Longueur => "Length",
            Categorie::Poids => "Weight",
            Categorie::Devise => "Currency",
        }
    }
}

/// Unités proposées pour une catégorie (codes des taux chargés, sinon liste par défaut).
pub fn unites(categorie: Categorie, taux: &TableTaux) -> Vec<String> {
    match categorie {
        Categorie::Longueur => noms(tables::LONGUEUR),
        Categorie::Poids => noms(tables::POIDS),
        Categorie::Devise if taux.is_empty() => tables::DEVISES_PAR_DEFAUT
            .iter()
            .map(|c| (*c).to_string())
            .collect(),
        Categorie::Devise => taux.keys().cloned().collect(),
    }
}

fn noms(table: &[(&str, f64)]) -> Vec<String> {
    table.iter().map(|(nom, _)| (*nom).to_string()).collect()
}

/// Convertit `valeur` de l’unité `de` vers l’unité `vers`.
///
/// Devises : passage par la base USD (`valeur / taux(de) * taux(vers)`).
/// Table vide (taux pas encore chargés) => `Ok(0.0)`, résultat "indisponible"
/// documenté ; c’est à l’appelant d’afficher le statut à côté.
pub fn convertir(
    valeur: f64,
    categorie: Categorie,
    de: &str,
    vers: &str,
    taux: &TableTaux,
) -> Result<f64, ErreurConversion> {
    if !valeur.is_finite() {
        return Err(ErreurConversion::ValeurInvalide(valeur.to_string()));
    }

    match categorie {
        Categorie::Longueur => par_facteurs(valeur, categorie, tables::LONGUEUR, de, vers),
        Categorie::Poids => par_facteurs(valeur, categorie, tables::POIDS, de, vers),
        Categorie::Devise => {
            if taux.is_empty() {
                return Ok(0.0);
            }
            let t_de = taux_de(taux, de)?;
            let t_vers = taux_de(taux, vers)?;
            Ok(valeur / t_de * t_vers)
        }
    }
}

fn par_facteurs(
    valeur: f64,
    categorie: Categorie,
    table: &[(&str, f64)],
    de: &str,
    vers: &str,
) -> Result<f64, ErreurConversion> {
    let inconnue = |u: &str| ErreurConversion::UniteInconnue {
        categorie: categorie.libelle(),
        unite: u.to_string(),
    };
    let f_de = tables::facteur(table, de).ok_or_else(|| inconnue(de))?;
    let f_vers = tables::facteur(table, vers).ok_or_else(|| inconnue(vers))?;
    Ok(valeur * f_de / f_vers)
}

fn taux_de(taux: &TableTaux, code: &str) -> Result<f64, ErreurConversion> {
    taux.get(code)
        .copied()
        .ok_or_else(|| ErreurConversion::UniteInconnue {
            categorie: Categorie::Devise.libelle(),
            unite: code.to_string(),
        })
}
