// src/app.rs
//
// Calculatrice — module App (racine)
// ----------------------------------
// - etat.rs : AppCalc (expressions, mode, convertisseur, taux)
// - vue.rs  : UI egui + raccourcis clavier
// - taux.rs : thread de récupération des taux (canal flume)
//
// Ici : l’impl eframe::App seulement.

pub mod etat;
pub mod taux;
pub mod vue;

pub use etat::AppCalc;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Résultat du thread des taux (le thread a déjà demandé un repaint).
        self.recevoir_taux();

        self.clavier(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
    }
}
