// src/app/taux.rs
//
// Récupération des taux HORS du thread UI.
//
// Un seul thread, lancé une fois au démarrage : il appelle la source,
// envoie le résultat dans un canal flume puis réveille l’UI (repaint).
// L’état (AppCalc::taux) n’est écrit que par le thread UI, qui vide le canal.

use std::thread;

use tracing::{error, warn};

use crate::conversion::{ReponseTaux, SourceTaux};
use crate::erreur::ErreurTaux;

pub type MessageTaux = Result<ReponseTaux, ErreurTaux>;

/// Lance la récupération en arrière-plan.
///
/// `reveil` est appelé après l’envoi (ex. `ctx.request_repaint()`).
/// Si le thread ne peut pas démarrer, l’émetteur est abandonné : le
/// récepteur voit le canal fermé et l’UI passe en échec.
pub fn lancer_recuperation<F>(source: Box<dyn SourceTaux>, reveil: F) -> flume::Receiver<MessageTaux>
where
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = flume::bounded(1);

    let lancement = thread::Builder::new()
        .name("taux-devises".into())
        .spawn(move || {
            let resultat = source.recuperer();
            if let Err(e) = &resultat {
                warn!(erreur = %e, "récupération des taux échouée");
            }

            // fenêtre fermée entre-temps : plus personne pour recevoir
            if tx.send(resultat).is_ok() {
                reveil();
            }
        });

    if let Err(e) = lancement {
        error!(erreur = %e, "thread de récupération des taux non démarré");
    }

    rx
}
