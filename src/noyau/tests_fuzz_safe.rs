//! Campagne aléatoire sur le pipeline complet (tokenize -> RPN -> Expr -> valeur).
//!
//! Contrats vérifiés :
//! - même graine => mêmes expressions => mêmes affichages
//! - un Ok n’est jamais NaN / infini, un Err s’affiche toujours "Error"
//! - du texte arbitraire ne fait jamais paniquer
//! - les arbres trop profonds sont refusés proprement
//! - profondeur et taille des résultats restent bornées
//!
//! Chaque test tourne sous un plafond de temps.

use std::time::{Duration, Instant};

use super::eval::{eval_affichage, eval_expression, SENTINELLE_ERREUR};
use super::valeur::Valeur;

/// Générateur congruentiel (constantes de Knuth, MMIX).
struct Lcg(u64);

impl Lcg {
    fn tirer(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Entier dans [0, n) ; n = 0 donne 0.
    fn borne(&mut self, n: u32) -> u32 {
        self.tirer().checked_rem(n).unwrap_or(0)
    }
}

fn sous_plafond(debut: Instant, plafond: Duration) {
    assert!(
        debut.elapsed() <= plafond,
        "campagne trop lente ({:?} > {plafond:?})",
        debut.elapsed()
    );
}

fn operande(g: &mut Lcg) -> String {
    match g.borne(6) {
        0 => "0".into(),
        1 => g.borne(1000).to_string(),
        2 => format!("{}.{}", g.borne(10), g.borne(1000)),
        3 => ["pi", "e", "π"][g.borne(3) as usize].into(),
        4 => format!("-{}", g.borne(10)),
        _ => format!("{}e{}", 1 + g.borne(9), g.borne(4)),
    }
}

fn expression(g: &mut Lcg, niveau: usize) -> String {
    if niveau == 0 || g.borne(5) == 0 {
        return operande(g);
    }

    let gauche = expression(g, niveau - 1);
    match g.borne(9) {
        0..=3 => {
            let op = ["+", "-", "*", "/"][g.borne(4) as usize];
            format!("({gauche}{op}{})", expression(g, niveau - 1))
        }
        4 => format!("{gauche}**{}", g.borne(5)),
        5 => format!("-({gauche})"),
        _ => {
            let f = ["sin", "cos", "tan", "log", "ln", "sqrt"][g.borne(6) as usize];
            format!("{f}({gauche})")
        }
    }
}

/// Texte quelconque : morceaux valides ou non, sans ordre.
fn bruit(g: &mut Lcg) -> String {
    const MORCEAUX: [&str; 18] = [
        "7", "0.25", ".", "..", "(", ")", "+", "-", "*", "**", "/", "^", "cos", "pi", "e",
        "y", "1e", "√",
    ];
    (0..1 + g.borne(14))
        .map(|_| MORCEAUX[g.borne(MORCEAUX.len() as u32) as usize])
        .collect()
}

/// `n` fois `terme` additionnés en arbre équilibré (profondeur log2 n).
fn somme_en_arbre(terme: &str, n: usize) -> String {
    match n {
        0 => "0".into(),
        1 => terme.into(),
        _ => format!(
            "({}+{})",
            somme_en_arbre(terme, n / 2),
            somme_en_arbre(terme, n - n / 2)
        ),
    }
}

#[test]
fn expressions_aleatoires_deterministes_et_finies() {
    let debut = Instant::now();
    let plafond = Duration::from_millis(800);

    let mut g1 = Lcg(0x5EED_CA1C);
    let mut g2 = Lcg(0x5EED_CA1C);
    let (mut nb_ok, mut nb_err) = (0usize, 0usize);

    for _ in 0..200 {
        sous_plafond(debut, plafond);

        let expr = expression(&mut g1, 4);
        assert_eq!(expr, expression(&mut g2, 4));

        let affiche = eval_affichage(&expr);
        assert_eq!(affiche, eval_affichage(&expr), "{expr:?}");

        match eval_expression(&expr) {
            Ok(Valeur::Approx(x)) => {
                assert!(x.is_finite(), "{expr:?} => {x}");
                nb_ok += 1;
            }
            Ok(Valeur::Exact(_)) => nb_ok += 1,
            Err(_) => {
                assert_eq!(affiche, SENTINELLE_ERREUR, "{expr:?}");
                nb_err += 1;
            }
        }
    }

    // les deux issues doivent apparaître, sinon la génération est mal calibrée
    assert!(nb_ok > 20, "succès: {nb_ok}");
    assert!(nb_err > 0, "aucun échec généré");
}

#[test]
fn texte_quelconque_jamais_de_panique() {
    let debut = Instant::now();
    let mut g = Lcg(42);

    for _ in 0..500 {
        let texte = bruit(&mut g);
        assert!(!eval_affichage(&texte).is_empty(), "{texte:?}");
    }
    sous_plafond(debut, Duration::from_millis(400));
}

#[test]
fn somme_equilibree_reste_exacte() {
    let debut = Instant::now();
    // 800 * (1/2), sans aucune perte flottante
    assert_eq!(eval_affichage(&somme_en_arbre("1/2", 800)), "400");
    assert_eq!(eval_affichage(&somme_en_arbre("0.1", 1000)), "100");
    sous_plafond(debut, Duration::from_millis(400));
}

#[test]
fn longue_chaine_sous_la_borne() {
    let expr = vec!["1"; 3000].join("+");
    assert_eq!(eval_affichage(&expr), "3000");
}

#[test]
fn arbre_trop_profond_refuse() {
    let expr = format!("{}1", "-".repeat(20_000));
    assert_eq!(eval_affichage(&expr), SENTINELLE_ERREUR);

    let chaine = vec!["2"; 12_000].join("*");
    assert_eq!(eval_affichage(&chaine), SENTINELLE_ERREUR);

    // parenthèses seules : aucune profondeur d’arbre ajoutée
    let parens = format!("{}3{}", "(".repeat(2000), ")".repeat(2000));
    assert_eq!(eval_affichage(&parens), "3");
}

/// Pile de 2 Mio, celle d’un thread de travail tokio.
#[test]
fn profondeur_maximale_sur_petite_pile() {
    let fil = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(|| {
            let racines = format!("{}1{}", "sqrt(".repeat(1023), ")".repeat(1023));
            let negations = format!("{}1", "-".repeat(9_999));
            let chaine = vec!["1"; 9_000].join("+");
            [
                eval_affichage(&racines),
                eval_affichage(&negations),
                eval_affichage(&chaine),
            ]
        })
        .unwrap();

    assert_eq!(fil.join().unwrap(), ["1", "-1", "9000"]);
}

#[test]
fn resultats_exacts_bornes_en_temps_et_en_taille() {
    let debut = Instant::now();

    // chaque facteur tient dans la borne, le produit non : repli f64, puis dépassement
    let produit = vec!["(2**1024)**63"; 300].join("*");
    assert_eq!(eval_affichage(&produit), SENTINELLE_ERREUR);

    // 2**18000 reste exact mais s’affiche en notation e
    let exact = vec!["(2**60)"; 300].join("*");
    assert_eq!(eval_affichage(&exact), "3.4667454295237668e5418");

    let seul = eval_affichage("(2**1024)**63");
    assert_eq!(seul, "1.1145005182212566e19420");

    sous_plafond(debut, Duration::from_secs(2));
}
