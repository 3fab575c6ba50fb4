// src/main.rs
//
// Calculatrice — point d’entrée
// -----------------------------
// - `bureau` (défaut) : fenêtre egui (eframe::run_native)
// - `web`             : serveur axum (page + /api/currency + /api/calc)
//
// Le thread des taux est lancé une seule fois, avant la première frame.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod conversion;
mod erreur;
mod noyau;
mod web;

use app::AppCalc;
use config::Config;
use conversion::SourceHttp;

/// Titre de la fenêtre.
const TITRE_APP: &str = "Calculatrice";

#[derive(Parser, Debug)]
#[command(name = "calculatrice", version, about = "Calculatrice standard, scientifique et convertisseur")]
struct Cli {
    /// Fichier de configuration TOML
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    commande: Option<Commande>,
}

#[derive(Subcommand, Debug)]
enum Commande {
    /// Application de bureau (par défaut)
    Bureau,
    /// Serveur web
    Web {
        /// Adresse d’écoute (remplace web.adresse)
        #[arg(long)]
        adresse: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::charger(cli.config.as_deref()).context("configuration invalide")?;

    init_journal(&config.journal.niveau);

    match cli.commande.unwrap_or(Commande::Bureau) {
        Commande::Bureau => lancer_bureau(&config),
        Commande::Web { adresse } => {
            let adresse = adresse.unwrap_or_else(|| config.web.adresse.clone());
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("runtime tokio")?
                .block_on(web::servir(&config, &adresse))
        }
    }
}

/// RUST_LOG prioritaire, sinon le niveau de la configuration.
fn init_journal(niveau: &str) {
    let filtre = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(niveau));
    tracing_subscriber::fmt().with_env_filter(filtre).init();
}

fn lancer_bureau(config: &Config) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([340.0, 560.0])
            .with_min_inner_size([300.0, 480.0]),
        ..Default::default()
    };

    let source = SourceHttp::new(&config.devises);
    info!("démarrage de l’application de bureau");

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let rx = app::taux::lancer_recuperation(Box::new(source), move || ctx.request_repaint());
            Ok(Box::new(AppCalc::default().avec_taux(rx)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("fenêtre egui: {e}"))
}
