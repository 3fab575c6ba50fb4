// src/conversion/taux.rs
//
// Table des taux (code devise -> taux relatif à USD) + statut de chargement.
//
// Contrats :
// - table vide = "pas encore chargée"
// - un échec de récupération ne touche PAS la table existante
// - le statut est toujours visible (jamais un 0 muet côté UI)

use std::collections::BTreeMap;

use chrono::{DateTime, Local, Utc};

use crate::erreur::ErreurTaux;

use super::source::ReponseTaux;

pub type TableTaux = BTreeMap<String, f64>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StatutTaux {
    #[default]
    EnAttente,
    Pret,
    Echec(String),
}

#[derive(Clone, Debug, Default)]
pub struct EtatTaux {
    pub table: TableTaux,
    pub statut: StatutTaux,
    pub maj: Option<DateTime<Utc>>,
}

impl EtatTaux {
    /// Dépose le résultat d’une récupération (succès ou échec).
    pub fn appliquer(&mut self, resultat: Result<ReponseTaux, ErreurTaux>) {
        match resultat {
            Ok(rep) => {
                self.table = rep.taux;
                self.maj = Some(rep.obtenu);
                self.statut = StatutTaux::Pret;
            }
            Err(e) => {
                // table conservée (peut rester vide)
                self.statut = StatutTaux::Echec(e.to_string());
            }
        }
    }

    pub fn est_charge(&self) -> bool {
        !self.table.is_empty()
    }

    /// Libellé court pour l’écran du convertisseur.
    pub fn libelle(&self) -> String {
        match &self.statut {
            StatutTaux::EnAttente => "Taux en attente…".to_string(),
            StatutTaux::Pret => match self.maj {
                Some(t) => format!(
                    "Taux du {}",
                    t.with_timezone(&Local).format("%d/%m/%Y %H:%M")
                ),
                None => "Taux chargés".to_string(),
            },
            StatutTaux::Echec(raison) if self.est_charge() => {
                format!("Taux périmés ({raison})")
            }
            StatutTaux::Echec(raison) => format!("Taux indisponibles : {raison}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reponse(paires: &[(&str, f64)]) -> ReponseTaux {
        ReponseTaux {
            base: Some("USD".into()),
            taux: paires.iter().map(|(c, t)| ((*c).to_string(), *t)).collect(),
            brut: serde_json::Value::Null,
            obtenu: Utc::now(),
        }
    }

    #[test]
    fn demarre_en_attente_et_vide() {
        let etat = EtatTaux::default();
        assert_eq!(etat.statut, StatutTaux::EnAttente);
        assert!(!etat.est_charge());
        assert!(etat.maj.is_none());
    }

    #[test]
    fn succes_remplit_la_table() {
        let mut etat = EtatTaux::default();
        etat.appliquer(Ok(reponse(&[("USD", 1.0), ("EUR", 0.9)])));
        assert_eq!(etat.statut, StatutTaux::Pret);
        assert_eq!(etat.table.get("EUR"), Some(&0.9));
        assert!(etat.maj.is_some());
        assert!(etat.libelle().starts_with("Taux du "));
    }

    #[test]
    fn echec_conserve_la_table() {
        let mut etat = EtatTaux::default();
        etat.appliquer(Ok(reponse(&[("USD", 1.0)])));
        etat.appliquer(Err(ErreurTaux::Reseau("timeout".into())));

        assert!(matches!(etat.statut, StatutTaux::Echec(_)));
        assert_eq!(etat.table.len(), 1);
        assert!(etat.libelle().starts_with("Taux périmés"));
    }

    #[test]
    fn echec_initial_reste_vide() {
        let mut etat = EtatTaux::default();
        etat.appliquer(Err(ErreurTaux::SansTaux));
        assert!(!etat.est_charge());
        assert!(etat.libelle().starts_with("Taux indisponibles"));
    }
}
