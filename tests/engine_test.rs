//! End-to-end test of the extraction and matching engine against an
//! in-memory page dump and a fixture catalog. No browser involved.

use anyhow::Result;
use pdf_to_codes::models::catalog::RawRow;
use pdf_to_codes::{
    connect_to_browser_and_page, process_booklet, Config, PageDump, SearchProvider,
};

/// Catalog stand-in: every query returns the same row set on page
/// one, like a very small admin panel would.
struct FixtureCatalog {
    rows: Vec<RawRow>,
}

impl SearchProvider for FixtureCatalog {
    async fn fetch_rows(&self, _query: &str, page: u32) -> Result<Vec<RawRow>> {
        if page == 1 {
            Ok(self.rows.clone())
        } else {
            Ok(Vec::new())
        }
    }
}

fn row(code: &str, description: &str, specialty: &str) -> RawRow {
    RawRow {
        code: code.to_string(),
        description: description.to_string(),
        specialty: specialty.to_string(),
    }
}

fn booklet() -> PageDump {
    let summary = "ÍNDICE\n\
        AULAS ........ 2\n\
        QUESTÕES EXTRAS ........ 3\n\
        COMENTÁRIOS E GABARITOS ........ 5\n";
    let lessons = "Conteúdo teórico das aulas, fora do alcance da busca.";
    let questions_a = "QUESTÕES EXTRAS\n\
        1. PROVA DE RESIDÊNCIA ACESSO DIRETO. Recém-nascido com icterícia nas primeiras 24 horas de vida exige investigação imediata.\n\
        A. CERTO.\n\
        B. ERRADO.\n";
    let questions_b = "2. Mulher de 28 anos com dor pélvica cíclica intensa há dois anos sem resposta a analgesia.\n\
        A) Dienogeste contínuo\n\
        B) Histerectomia simples\n\
        C) Agonista do GnRH\n\
        3. Curto demais.\n\
        A) x\n";
    let answers = "COMENTÁRIOS E GABARITOS\n1. CERTO\n2. A";
    PageDump::from_pages(vec![
        summary.to_string(),
        lessons.to_string(),
        questions_a.to_string(),
        questions_b.to_string(),
        answers.to_string(),
    ])
}

fn catalog() -> FixtureCatalog {
    FixtureCatalog {
        rows: vec![
            row(
                "Q9001",
                "ACESSO DIRETO\nRecém-nascido com icterícia nas primeiras 24 horas de vida exige investigação imediata.\nA) CERTO.\nB) ERRADO.",
                "Pediatria",
            ),
            row(
                "Q9002",
                "Mulher de 28 anos com dor pélvica cíclica intensa há dois anos sem resposta a analgesia.\nA) Dienogeste contínuo\nB) Histerectomia simples\nC) Agonista do GnRH",
                "Ginecologia",
            ),
            row(
                "Q9003",
                "Idoso com fratura de colo de fêmur após queda da própria altura.\nA) Prótese total\nB) Osteossíntese",
                "Ortopedia",
            ),
        ],
    }
}

#[tokio::test(start_paused = true)]
async fn booklet_resolves_to_catalog_codes() {
    let config = Config::default();
    let report = process_booklet(&catalog(), &config, &booklet())
        .await
        .expect("processamento da apostila");

    assert_eq!(report.found, 2);
    assert_eq!(report.skipped, 1);
    assert!(report.ad_not_found.is_empty());

    // ACESSO DIRETO comes first regardless of booklet order.
    assert_eq!(report.lines[0], "Q9001 (ACESSO DIRETO, Q1)");
    assert_eq!(report.lines[1], "Q9002 (ESP, Q2)");
}

#[tokio::test(start_paused = true)]
async fn unresolved_direct_access_is_reported() {
    let config = Config::default();
    let empty = FixtureCatalog { rows: Vec::new() };
    let report = process_booklet(&empty, &config, &booklet())
        .await
        .expect("processamento da apostila");

    assert_eq!(report.found, 0);
    assert_eq!(report.ad_not_found, vec![Some(1)]);
    assert!(report
        .lines
        .iter()
        .any(|l| l == "Q1 ACESSO DIRETO (NÃO ENCONTRADA)"));
}

#[tokio::test(start_paused = true)]
async fn missing_summary_markers_fail_loudly() {
    let config = Config::default();
    let dump = PageDump::from_pages(vec!["apostila sem índice".to_string()]);
    let err = process_booklet(&catalog(), &config, &dump)
        .await
        .expect_err("deveria falhar sem marcadores");
    assert!(err.to_string().contains("QUESTÕES EXTRAS"));
}

#[tokio::test]
#[ignore] // needs Chrome with --remote-debugging-port and a logged-in session
async fn browser_connection() {
    let config = Config::default();
    let (_browser, page) =
        connect_to_browser_and_page(config.browser_debug_port, &config.questions_url)
            .await
            .expect("conexão com o navegador");
    assert!(page.url().await.expect("url da aba").is_some());
}
