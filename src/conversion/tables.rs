// src/conversion/tables.rs
//
// Tables statiques : facteur de chaque unité vers l’unité de base.
// Ordre = ordre d’affichage dans les listes du convertisseur.

/// Longueur, base : mètre.
pub const LONGUEUR: &[(&str, f64)] = &[
    ("m", 1.0),
    ("km", 1000.0),
    ("ft", 0.3048),
    ("mi", 1609.34),
    ("cm", 0.01),
    ("inch", 0.0254),
];

/// Poids, base : kilogramme.
pub const POIDS: &[(&str, f64)] = &[
    ("kg", 1.0),
    ("g", 0.001),
    ("lb", 0.453592),
    ("oz", 0.0283495),
];

/// Codes proposés tant qu’aucun taux n’est chargé.
pub const DEVISES_PAR_DEFAUT: [&str; 5] = ["USD", "EUR", "GBP", "JPY", "INR"];

pub fn facteur(table: &[(&str, f64)], unite: &str) -> Option<f64> {
    table
        .iter()
        .find(|(nom, _)| *nom == unite)
        .map(|(_, f)| *f)
}
