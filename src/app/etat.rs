//! src/app/etat.rs
//!
//! État de la calculatrice (sans vue).
//!
//! Rôle : contenir les deux expressions (totale + courante), le mode et la
//! sélection du convertisseur, et offrir les opérations des touches.
//!
//! Contrats :
//! - `expression_courante` = opérande en cours de saisie ;
//!   `expression_totale` = chaîne d’opérateurs déjà validée.
//! - Toute évaluation passe par le noyau (même liste blanche partout).
//! - Échec d’évaluation => sentinelle "Error" dans l’expression courante.
//! - Changer de mode efface les deux expressions, sans condition.

use flume::TryRecvError;
use tracing::{info, warn};

use crate::conversion::{self, Categorie, EtatTaux, StatutTaux};
use crate::noyau::{eval_affichage, Constante, Fonction, SENTINELLE_ERREUR};

use super::taux::MessageTaux;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Standard,
    Scientifique,
    Convertisseur,
}

impl Mode {
    pub const TOUS: [Mode; 3] = [Mode::Standard, Mode::Scientifique, Mode::Convertisseur];

    pub fn libelle(self) -> &'static str {
        match self {
            Mode::Standard => "Standard",
            Mode::Scientifique => "Scientific",
            Mode::Convertisseur => "Converter",
        }
    }
}

/// Sélection courante du convertisseur.
#[derive(Clone, Debug, Default)]
pub struct Convertisseur {
    pub categorie: Categorie,
    pub de: String,
    pub vers: String,
}

#[derive(Debug, Default)]
pub struct AppCalc {
    // --- affichage ---
    pub expression_totale: String,
    pub expression_courante: String,

    pub mode: Mode,
    pub convertisseur: Convertisseur,

    // --- taux de change (écrits UNIQUEMENT depuis le thread UI) ---
    pub taux: EtatTaux,
    recepteur: Option<flume::Receiver<MessageTaux>>,
}

impl AppCalc {
    /// Branche le canal du thread de récupération des taux.
    pub fn avec_taux(mut self, recepteur: flume::Receiver<MessageTaux>) -> Self {
        self.recepteur = Some(recepteur);
        self
    }

    /* ------------------------ Touches ------------------------ */

    /// Chiffre ou point décimal. Un second '.' dans le même opérande est ignoré.
    pub fn add_digit(&mut self, d: char) {
        self.oublier_sentinelle();

        if d == '.' && operande_final(&self.expression_courante).contains('.') {
            return;
        }
        self.expression_courante.push(d);

        if self.mode == Mode::Convertisseur {
            self.convertir();
        }
    }

    /// Valide l’opérande courant + l’opérateur dans l’expression totale.
    pub fn append_operator(&mut self, op: &str) {
        self.oublier_sentinelle();

        self.expression_totale.push_str(&self.expression_courante);
        self.expression_totale.push_str(op);
        self.expression_courante.clear();
    }

    /// AC : remise à zéro des deux expressions.
    pub fn clear(&mut self) {
        self.expression_courante.clear();
        self.expression_totale.clear();
    }

    /// DEL : retire le dernier caractère de l’expression courante.
    pub fn backspace(&mut self) {
        if self.expression_courante == SENTINELLE_ERREUR {
            self.expression_courante.clear();
        } else {
            self.expression_courante.pop();
        }

        if self.mode == Mode::Convertisseur {
            self.convertir();
        }
    }

    /// % : remplace l’opérande courant par sa valeur / 100.
    pub fn percent(&mut self) {
        let expr = format!("{}/100", self.expression_courante);
        self.expression_courante = eval_affichage(&expr);
    }

    /// () : ouvre si aucune parenthèse n’est en attente de fermeture, sinon ferme.
    pub fn brackets(&mut self) {
        self.oublier_sentinelle();

        let ouvertes = self.expression_courante.matches('(').count();
        let fermees = self.expression_courante.matches(')').count();
        if ouvertes > fermees {
            self.expression_courante.push(')');
        } else {
            self.expression_courante.push('(');
        }
    }

    /// = : évalue totale + courante ; le résultat (ou "Error") devient l’opérande courant.
    pub fn evaluate(&mut self) {
        let expr = format!("{}{}", self.expression_totale, self.expression_courante);
        self.expression_courante = eval_affichage(&expr);
        self.expression_totale.clear();
    }

    /* ------------------------ Touches scientifiques ------------------------ */

    /// "sin(", "sqrt(", ...
    pub fn inserer_fonction(&mut self, f: Fonction) {
        self.oublier_sentinelle();
        self.expression_courante.push_str(f.nom());
        self.expression_courante.push('(');
    }

    pub fn inserer_constante(&mut self, c: Constante) {
        self.oublier_sentinelle();
        self.expression_courante.push_str(c.nom());
    }

    /// Parenthèse brute (touches "(" et ")" du mode scientifique).
    pub fn inserer_parenthese(&mut self, p: char) {
        if p != '(' && p != ')' {
            return;
        }
        self.oublier_sentinelle();
        self.expression_courante.push(p);
    }

    /* ------------------------ Mode ------------------------ */

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.clear();

        if mode == Mode::Convertisseur {
            self.rafraichir_unites();
        }
    }

    /* ------------------------ Convertisseur ------------------------ */

    pub fn set_categorie(&mut self, categorie: Categorie) {
        self.convertisseur.categorie = categorie;
        self.convertisseur.de.clear();
        self.convertisseur.vers.clear();
        self.rafraichir_unites();
    }

    pub fn set_unites(&mut self, de: &str, vers: &str) {
        self.convertisseur.de = de.to_string();
        self.convertisseur.vers = vers.to_string();
        self.convertir();
    }

    pub fn unites(&self) -> Vec<String> {
        conversion::unites(self.convertisseur.categorie, &self.taux.table)
    }

    /// Garde la sélection si elle est toujours valable, sinon (1re, 2e) unité.
    /// Sans saisie, l’expression totale reste telle quelle (vide après un changement de mode).
    fn rafraichir_unites(&mut self) {
        let unites = self.unites();
        let c = &mut self.convertisseur;

        if !unites.contains(&c.de) || !unites.contains(&c.vers) {
            c.de = unites.first().cloned().unwrap_or_default();
            c.vers = unites
                .get(1)
                .or_else(|| unites.first())
                .cloned()
                .unwrap_or_default();
        }

        if !self.expression_courante.is_empty() {
            self.convertir();
        }
    }

    /// Recalcule la conversion ; le résultat s’affiche dans l’expression totale.
    pub fn convertir(&mut self) {
        let saisie = self.expression_courante.trim();
        let valeur = if saisie.is_empty() {
            Ok(0.0)
        } else {
            saisie.parse::<f64>()
        };

        let c = &self.convertisseur;
        let resultat = valeur
            .ok()
            .and_then(|v| conversion::convertir(v, c.categorie, &c.de, &c.vers, &self.taux.table).ok());

        self.expression_totale = match resultat {
            Some(r) => format!("= {r:.4}"),
            None => SENTINELLE_ERREUR.to_string(),
        };
    }

    /* ------------------------ Taux (passage thread -> UI) ------------------------ */

    /// Vide le canal du thread de récupération. Retourne true si l’état a changé.
    pub fn recevoir_taux(&mut self) -> bool {
        let Some(rx) = &self.recepteur else {
            return false;
        };

        match rx.try_recv() {
            Ok(message) => {
                if message.is_ok() {
                    info!("taux de change appliqués");
                }
                self.taux.appliquer(message);
                self.recepteur = None;

                if self.mode == Mode::Convertisseur
                    && self.convertisseur.categorie == Categorie::Devise
                {
                    self.rafraichir_unites();
                }
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                warn!("thread de récupération des taux terminé sans réponse");
                if self.taux.statut == StatutTaux::EnAttente {
                    self.taux.statut = StatutTaux::Echec("récupération interrompue".into());
                }
                self.recepteur = None;
                true
            }
        }
    }

    /* ------------------------ Utilitaires ------------------------ */

    /// Après un "Error", la saisie repart de zéro.
    fn oublier_sentinelle(&mut self) {
        if self.expression_courante == SENTINELLE_ERREUR {
            self.expression_courante.clear();
        }
    }
}

/// Dernier opérande numérique (suite finale de chiffres et de points).
fn operande_final(s: &str) -> &str {
    s.rsplit(|c: char| !(c.is_ascii_digit() || c == '.'))
        .next()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    use crate::conversion::ReponseTaux;
    use crate::erreur::ErreurTaux;

    fn saisir(app: &mut AppCalc, chiffres: &str) {
        for d in chiffres.chars() {
            app.add_digit(d);
        }
    }

    fn reponse_taux() -> MessageTaux {
        Ok(ReponseTaux {
            base: Some("USD".into()),
            taux: [("USD", 1.0), ("EUR", 0.5), ("JPY", 150.0)]
                .into_iter()
                .map(|(c, t)| (c.to_string(), t))
                .collect(),
            brut: serde_json::Value::Null,
            obtenu: Utc::now(),
        })
    }

    #[test]
    fn saisie_et_point_unique() {
        let mut app = AppCalc::default();
        saisir(&mut app, "12.3.4");
        assert_eq!(app.expression_courante, "12.34");
    }

    #[test]
    fn point_unique_par_operande() {
        let mut app = AppCalc::default();
        app.inserer_fonction(Fonction::Sqrt);
        saisir(&mut app, "2.5.");
        assert_eq!(app.expression_courante, "sqrt(2.5");

        // nouvel opérande après l’opérateur : un point est de nouveau permis
        app.append_operator("+");
        saisir(&mut app, "0.5");
        assert_eq!(app.expression_courante, "0.5");
    }

    #[test]
    fn operateur_puis_egal() {
        let mut app = AppCalc::default();
        saisir(&mut app, "2");
        app.append_operator("+");
        assert_eq!(app.expression_totale, "2+");
        assert_eq!(app.expression_courante, "");

        saisir(&mut app, "3");
        app.append_operator("*");
        saisir(&mut app, "4");
        app.evaluate();

        assert_eq!(app.expression_courante, "14");
        assert_eq!(app.expression_totale, "");
    }

    #[test]
    fn operateur_puis_egal_equivaut_a_concatenation() {
        let mut app = AppCalc::default();
        saisir(&mut app, "7");
        app.append_operator("/");
        saisir(&mut app, "2");
        let concat = format!("{}{}", app.expression_totale, app.expression_courante);
        app.evaluate();
        assert_eq!(app.expression_courante, eval_affichage(&concat));
        assert_eq!(app.expression_courante, "3.5");
    }

    #[test]
    fn division_par_zero_affiche_error() {
        let mut app = AppCalc::default();
        saisir(&mut app, "1");
        app.append_operator("/");
        saisir(&mut app, "0");
        app.evaluate();
        assert_eq!(app.expression_courante, "Error");
        assert_eq!(app.expression_totale, "");

        // la saisie suivante repart de zéro
        saisir(&mut app, "5");
        assert_eq!(app.expression_courante, "5");
    }

    #[test]
    fn resultat_reutilise_comme_operande() {
        let mut app = AppCalc::default();
        saisir(&mut app, "6");
        app.append_operator("*");
        saisir(&mut app, "7");
        app.evaluate();
        app.append_operator("+");
        saisir(&mut app, "1");
        app.evaluate();
        assert_eq!(app.expression_courante, "43");
    }

    #[test]
    fn clear_et_backspace() {
        let mut app = AppCalc::default();
        saisir(&mut app, "12");
        app.append_operator("-");
        saisir(&mut app, "34");
        app.backspace();
        assert_eq!(app.expression_courante, "3");

        app.clear();
        assert_eq!(app.expression_courante, "");
        assert_eq!(app.expression_totale, "");

        // sur vide : rien
        app.backspace();
        assert_eq!(app.expression_courante, "");
    }

    #[test]
    fn backspace_sur_error_efface_tout() {
        let mut app = AppCalc::default();
        app.expression_courante = SENTINELLE_ERREUR.to_string();
        app.backspace();
        assert_eq!(app.expression_courante, "");
    }

    #[test]
    fn pourcentage() {
        let mut app = AppCalc::default();
        saisir(&mut app, "50");
        app.percent();
        assert_eq!(app.expression_courante, "0.5");

        let mut vide = AppCalc::default();
        vide.percent();
        assert_eq!(vide.expression_courante, "Error");
    }

    #[test]
    fn parentheses_alternees() {
        let mut app = AppCalc::default();
        app.brackets();
        assert_eq!(app.expression_courante, "(");
        app.brackets();
        assert_eq!(app.expression_courante, "()");
    }

    #[test]
    fn parentheses_jamais_plus_de_fermantes() {
        let mut app = AppCalc::default();
        for _ in 0..9 {
            app.brackets();
            let s = &app.expression_courante;
            assert!(s.matches('(').count() >= s.matches(')').count(), "{s:?}");
        }
        assert_eq!(app.expression_courante, "()()()()(");
    }

    #[test]
    fn parentheses_avec_contenu() {
        let mut app = AppCalc::default();
        app.brackets();
        saisir(&mut app, "2");
        app.brackets();
        app.append_operator("*");
        saisir(&mut app, "3");
        app.evaluate();
        assert_eq!(app.expression_courante, "6");
    }

    #[test]
    fn scientifique() {
        let mut app = AppCalc::default();
        app.set_mode(Mode::Scientifique);

        app.inserer_fonction(Fonction::Sqrt);
        saisir(&mut app, "16");
        app.inserer_parenthese(')');
        app.append_operator("**");
        saisir(&mut app, "2");
        app.evaluate();
        assert_eq!(app.expression_courante, "16");

        app.clear();
        app.inserer_fonction(Fonction::Cos);
        app.inserer_constante(Constante::Pi);
        app.inserer_parenthese(')');
        app.evaluate();
        assert_eq!(app.expression_courante, "-1");
    }

    #[test]
    fn changement_de_mode_efface_tout() {
        for mode in Mode::TOUS {
            let mut app = AppCalc::default();
            saisir(&mut app, "9");
            app.append_operator("+");
            saisir(&mut app, "8");

            app.set_mode(mode);
            assert_eq!(app.mode, mode);
            assert_eq!(app.expression_courante, "");
            assert_eq!(app.expression_totale, "", "{mode:?}");
        }
    }

    #[test]
    fn convertisseur_longueur() {
        let mut app = AppCalc::default();
        app.set_mode(Mode::Convertisseur);
        assert_eq!(app.convertisseur.de, "m");
        assert_eq!(app.convertisseur.vers, "km");
        assert_eq!(app.expression_courante, "");
        assert_eq!(app.expression_totale, "");

        app.set_unites("km", "m");
        saisir(&mut app, "1.5");
        assert_eq!(app.expression_totale, "= 1500.0000");

        app.backspace();
        app.backspace();
        assert_eq!(app.expression_totale, "= 1000.0000");
    }

    #[test]
    fn convertisseur_poids() {
        let mut app = AppCalc::default();
        app.set_mode(Mode::Convertisseur);
        app.set_categorie(Categorie::Poids);
        app.set_unites("kg", "lb");
        saisir(&mut app, "1");
        assert_eq!(app.expression_totale, "= 2.2046");
    }

    #[test]
    fn convertisseur_devise_sans_taux() {
        let mut app = AppCalc::default();
        app.set_mode(Mode::Convertisseur);
        app.set_categorie(Categorie::Devise);
        assert_eq!(app.unites(), vec!["USD", "EUR", "GBP", "JPY", "INR"]);

        saisir(&mut app, "100");
        assert_eq!(app.expression_totale, "= 0.0000");
        assert_eq!(app.taux.statut, StatutTaux::EnAttente);
    }

    #[test]
    fn taux_recus_par_le_canal() {
        let (tx, rx) = flume::bounded(1);
        let mut app = AppCalc::default().avec_taux(rx);
        app.set_mode(Mode::Convertisseur);
        app.set_categorie(Categorie::Devise);
        saisir(&mut app, "10");

        assert!(!app.recevoir_taux());

        tx.send(reponse_taux()).unwrap();
        assert!(app.recevoir_taux());
        assert_eq!(app.taux.statut, StatutTaux::Pret);

        // USD -> EUR toujours présents : sélection conservée
        assert_eq!(app.unites(), vec!["EUR", "JPY", "USD"]);
        assert_eq!(app.convertisseur.de, "USD");
        assert_eq!(app.convertisseur.vers, "EUR");
        assert_eq!(app.expression_totale, "= 5.0000");

        // canal consommé : plus rien à recevoir
        assert!(!app.recevoir_taux());
    }

    #[test]
    fn selection_perimee_reinitialisee() {
        let (tx, rx) = flume::bounded(1);
        let mut app = AppCalc::default().avec_taux(rx);
        app.set_mode(Mode::Convertisseur);
        app.set_categorie(Categorie::Devise);
        app.set_unites("GBP", "INR");
        saisir(&mut app, "10");

        tx.send(reponse_taux()).unwrap();
        assert!(app.recevoir_taux());

        assert_eq!(app.convertisseur.de, "EUR");
        assert_eq!(app.convertisseur.vers, "JPY");
        assert_eq!(app.expression_totale, "= 3000.0000");
    }

    #[test]
    fn echec_des_taux_visible() {
        let (tx, rx) = flume::bounded(1);
        let mut app = AppCalc::default().avec_taux(rx);
        tx.send(Err(ErreurTaux::Reseau("dns".into()))).unwrap();
        assert!(app.recevoir_taux());
        assert!(matches!(app.taux.statut, StatutTaux::Echec(_)));
        assert!(app.taux.table.is_empty());
    }

    #[test]
    fn thread_disparu_sans_reponse() {
        let (tx, rx) = flume::bounded::<MessageTaux>(1);
        let mut app = AppCalc::default().avec_taux(rx);
        drop(tx);
        assert!(app.recevoir_taux());
        assert_eq!(
            app.taux.statut,
            StatutTaux::Echec("récupération interrompue".into())
        );
    }

    #[test]
    fn saisie_invalide_dans_le_convertisseur() {
        let mut app = AppCalc::default();
        app.set_mode(Mode::Convertisseur);
        app.expression_courante = "1.2.3".into();
        app.convertir();
        assert_eq!(app.expression_totale, "Error");
    }
}
