// src/app/vue.rs
//
// Vue (UI egui)
// -------------
// - Sélecteur de mode (Standard / Scientific / Converter)
// - Écran : expression totale (petite) + expression courante (grande)
// - Pavés : standard, scientifique, convertisseur
// - Clavier : chiffres / opérateurs en texte, Enter "=", Backspace DEL, Escape AC
//
// Toute la logique vit dans etat.rs : ici on ne fait que traduire
// clics et touches en `Touche`, puis appeler `appliquer`.

use eframe::egui;

use crate::conversion::Categorie;
use crate::noyau::{Constante, Fonction, SENTINELLE_ERREUR};

use super::etat::{AppCalc, Mode};

const TAILLE_TOUCHE: [f32; 2] = [64.0, 44.0];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        self.ui_mode(ui);
        ui.add_space(6.0);

        self.ui_ecran(ui);
        ui.add_space(8.0);

        match self.mode {
            Mode::Standard => self.ui_pave_standard(ui),
            Mode::Scientifique => {
                self.ui_fonctions(ui);
                ui.add_space(6.0);
                self.ui_pave_standard(ui);
            }
            Mode::Convertisseur => self.ui_convertisseur(ui),
        }
    }

    /// Raccourcis clavier globaux (pas de champ texte : la calculatrice a le focus).
    pub fn clavier(&mut self, ctx: &egui::Context) {
        let (texte, entree, effacer, tout) = ctx.input(|i| {
            let texte: String = i
                .events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect();
            (
                texte,
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::Backspace),
                i.key_pressed(egui::Key::Escape),
            )
        });

        for c in texte.chars() {
            if let Some(t) = touche_clavier(c, self.mode) {
                self.appliquer(t);
            }
        }
        if entree && self.mode != Mode::Convertisseur {
            self.appliquer(Touche::Egal);
        }
        if effacer {
            self.appliquer(Touche::Backspace);
        }
        if tout {
            self.appliquer(Touche::Clear);
        }
    }

    fn ui_mode(&mut self, ui: &mut egui::Ui) {
        let mut mode = self.mode;
        ui.horizontal(|ui| {
            ui.label("Mode :");
            egui::ComboBox::from_id_salt("mode_calc")
                .selected_text(mode.libelle())
                .show_ui(ui, |ui| {
                    for m in Mode::TOUS {
                        ui.selectable_value(&mut mode, m, m.libelle());
                    }
                });
        });

        if mode != self.mode {
            self.set_mode(mode);
        }
    }

    fn ui_ecran(&mut self, ui: &mut egui::Ui) {
        let erreur = self.expression_courante == SENTINELLE_ERREUR;
        let courante = if self.expression_courante.is_empty() {
            "0"
        } else {
            self.expression_courante.as_str()
        };

        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                    ui.label(egui::RichText::new(&self.expression_totale).monospace().size(16.0));

                    let mut grand = egui::RichText::new(courante).monospace().size(32.0);
                    if erreur {
                        grand = grand.color(ui.visuals().error_fg_color);
                    }
                    ui.label(grand);
                });
            });
    }

    fn ui_pave_standard(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_standard")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton(ui, "AC", Touche::Clear);
                self.bouton(ui, "()", Touche::Brackets);
                self.bouton(ui, "%", Touche::Percent);
                self.bouton(ui, "÷", Touche::Operateur("/"));
                ui.end_row();

                self.rangee_chiffres(ui, ['7', '8', '9']);
                self.bouton(ui, "×", Touche::Operateur("*"));
                ui.end_row();

                self.rangee_chiffres(ui, ['4', '5', '6']);
                self.bouton(ui, "−", Touche::Operateur("-"));
                ui.end_row();

                self.rangee_chiffres(ui, ['1', '2', '3']);
                self.bouton(ui, "+", Touche::Operateur("+"));
                ui.end_row();

                self.bouton(ui, "0", Touche::Chiffre('0'));
                self.bouton(ui, ".", Touche::Chiffre('.'));
                self.bouton(ui, "DEL", Touche::Backspace);
                self.bouton(ui, "=", Touche::Egal);
                ui.end_row();
            });
    }

    fn ui_fonctions(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_fonctions")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for (i, f) in Fonction::TOUTES.iter().enumerate() {
                    let label = if *f == Fonction::Sqrt { "√" } else { f.nom() };
                    self.bouton(ui, label, Touche::Fonction(*f));
                    if i % 4 == 3 {
                        ui.end_row();
                    }
                }
                self.bouton(ui, "π", Touche::Constante(Constante::Pi));
                self.bouton(ui, "e", Touche::Constante(Constante::E));
                ui.end_row();

                self.bouton(ui, "(", Touche::Parenthese('('));
                self.bouton(ui, ")", Touche::Parenthese(')'));
                self.bouton(ui, "^", Touche::Operateur("**"));
                ui.end_row();
            });
    }

    fn ui_convertisseur(&mut self, ui: &mut egui::Ui) {
        let mut categorie = self.convertisseur.categorie;
        egui::ComboBox::from_id_salt("conv_categorie")
            .selected_text(categorie.libelle())
            .show_ui(ui, |ui| {
                for c in Categorie::TOUTES {
                    ui.selectable_value(&mut categorie, c, c.libelle());
                }
            });
        if categorie != self.convertisseur.categorie {
            self.set_categorie(categorie);
        }

        let unites = self.unites();
        let mut de = self.convertisseur.de.clone();
        let mut vers = self.convertisseur.vers.clone();
        ui.horizontal(|ui| {
            Self::choix_unite(ui, "conv_de", &mut de, &unites);
            ui.label("→");
            Self::choix_unite(ui, "conv_vers", &mut vers, &unites);
        });
        if de != self.convertisseur.de || vers != self.convertisseur.vers {
            self.set_unites(&de, &vers);
        }

        if self.convertisseur.categorie == Categorie::Devise {
            ui.small(self.taux.libelle());
        }

        ui.add_space(6.0);

        egui::Grid::new("pave_convertisseur")
            .num_columns(3)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for rangee in [['7', '8', '9'], ['4', '5', '6'], ['1', '2', '3']] {
                    self.rangee_chiffres(ui, rangee);
                    ui.end_row();
                }
                self.bouton(ui, "0", Touche::Chiffre('0'));
                self.bouton(ui, ".", Touche::Chiffre('.'));
                self.bouton(ui, "DEL", Touche::Backspace);
                ui.end_row();
            });
    }

    fn choix_unite(ui: &mut egui::Ui, id: &str, choix: &mut String, unites: &[String]) {
        egui::ComboBox::from_id_salt(id)
            .selected_text(choix.as_str())
            .show_ui(ui, |ui| {
                for u in unites {
                    ui.selectable_value(choix, u.clone(), u.as_str());
                }
            });
    }

    fn rangee_chiffres(&mut self, ui: &mut egui::Ui, chiffres: [char; 3]) {
        for c in chiffres {
            self.bouton(ui, &c.to_string(), Touche::Chiffre(c));
        }
    }

    fn bouton(&mut self, ui: &mut egui::Ui, label: &str, touche: Touche) {
        let resp = ui.add_sized(TAILLE_TOUCHE, egui::Button::new(label));
        if resp.clicked() {
            self.appliquer(touche);
        }
    }

    fn appliquer(&mut self, touche: Touche) {
        match touche {
            Touche::Chiffre(c) => self.add_digit(c),
            Touche::Operateur(op) => self.append_operator(op),
            Touche::Clear => self.clear(),
            Touche::Backspace => self.backspace(),
            Touche::Percent => self.percent(),
            Touche::Brackets => self.brackets(),
            Touche::Egal => self.evaluate(),
            Touche::Fonction(f) => self.inserer_fonction(f),
            Touche::Constante(c) => self.inserer_constante(c),
            Touche::Parenthese(p) => self.inserer_parenthese(p),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Touche {
    Chiffre(char),
    Operateur(&'static str),
    Clear,
    Backspace,
    Percent,
    Brackets,
    Egal,
    Fonction(Fonction),
    Constante(Constante),
    Parenthese(char),
}

/// Caractère tapé -> touche. Le convertisseur n’accepte que chiffres et point.
fn touche_clavier(c: char, mode: Mode) -> Option<Touche> {
    if c.is_ascii_digit() || c == '.' {
        return Some(Touche::Chiffre(c));
    }
    if mode == Mode::Convertisseur {
        return None;
    }
    match c {
        '+' => Some(Touche::Operateur("+")),
        '-' => Some(Touche::Operateur("-")),
        '*' => Some(Touche::Operateur("*")),
        '/' => Some(Touche::Operateur("/")),
        '^' => Some(Touche::Operateur("**")),
        '%' => Some(Touche::Percent),
        '=' => Some(Touche::Egal),
        '(' | ')' => Some(Touche::Parenthese(c)),
        _ => None,
    }
}
