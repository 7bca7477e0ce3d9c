//! End-to-end pipeline tests with stubbed page sources.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use escriba::analysis::expansion::ExpansionDictionary;
use escriba::analysis::sentence::SentenceSegmenter;
use escriba::config::{
    CorpusFormat, CorrectionStrategy, CorrectorConfig, DEFAULT_SENTINEL, PipelineConfig,
    ResourceConfig, SectionFallback,
};
use escriba::error::{EscribaError, Result};
use escriba::pipeline::{Pipeline, PipelineRequest, Resources, Stage, StageResult, StageValue};
use escriba::spelling::frequency::FrequencyModel;
use escriba::web::fetch::PageSource;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Portal</title>
    <script>window.tracker = "rastreio";</script>
  </head>
  <body>
    <nav class="menu">Inicio Noticias Contato</nav>
    <div class="comentarios">
      <p>VC viu a caza nova?</p>
      <iframe src="https://ads.example.com/banner">publicidade</iframe>
      <p>Muito bon, tb achei.</p>
    </div>
    <div id="rodape">Todos os direitos reservados</div>
  </body>
</html>"#;

/// Serves the same markup for every URL.
struct StaticPage {
    body: Option<String>,
    calls: AtomicUsize,
}

impl StaticPage {
    fn new(body: Option<&str>) -> Arc<Self> {
        Arc::new(StaticPage {
            body: body.map(str::to_string),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PageSource for StaticPage {
    async fn fetch(&self, _url: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}

/// Fails like a network error.
struct UnreachablePage;

#[async_trait]
impl PageSource for UnreachablePage {
    async fn fetch(&self, url: &str) -> Result<Option<String>> {
        Err(EscribaError::fetch(format!("connection refused: {url}")))
    }
}

struct MissingModelSegmenter;

impl SentenceSegmenter for MissingModelSegmenter {
    fn segment(&self, _text: &str) -> Result<Vec<String>> {
        Err(EscribaError::tokenization("language model not installed"))
    }

    fn name(&self) -> &'static str {
        "missing_model"
    }
}

fn resources() -> Arc<Resources> {
    let expansions = ExpansionDictionary::from_pairs([("vc", "você"), ("tb", "também")]);
    let model = FrequencyModel::build(["voce viu a casa nova muito bom tambem achei casa casa"]);
    Arc::new(Resources::from_model(expansions, model))
}

fn config(strategy: CorrectionStrategy, fallback: SectionFallback) -> PipelineConfig {
    let mut config = PipelineConfig {
        corrector: CorrectorConfig {
            strategy,
            max_distance: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    config.clean.fallback = fallback;
    config
}

fn pipeline(source: Arc<dyn PageSource>) -> Pipeline {
    Pipeline::new(
        config(CorrectionStrategy::Both, SectionFallback::DocumentText),
        resources(),
    )
    .unwrap()
    .with_source(source)
}

fn request(tag: &str, section: &str) -> PipelineRequest {
    PipelineRequest::new("https://example.com/noticia", section, tag)
}

fn stage_names(results: &[StageResult]) -> Vec<Stage> {
    results.iter().map(StageResult::stage).collect()
}

fn words(value: &StageValue) -> Vec<Vec<String>> {
    value.as_words().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_full_run() {
    let source = StaticPage::new(Some(PAGE));
    let results = pipeline(source.clone()).run(&request("div", "comentarios")).await;

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(stage_names(&results), Stage::ALL.to_vec());
    assert!(results.iter().all(|r| r.erro.is_none()));
    assert!(results.iter().all(|r| r.tempo >= 0.0));

    let cleaned = results[1].saida.as_text().unwrap();
    assert_eq!(cleaned, "VC viu a caza nova? Muito bon, tb achei.");

    assert_eq!(
        results[2].saida,
        StageValue::Sentences(vec![
            "VC viu a caza nova".to_string(),
            "Muito bon tb achei".to_string()
        ])
    );

    // "VC" expands case-insensitively to the canonical form
    assert_eq!(
        words(&results[4].saida),
        vec![
            vec!["você", "viu", "a", "caza", "nova"],
            vec!["muito", "bon", "também", "achei"]
        ]
    );

    assert_eq!(
        words(&results[5].saida),
        vec![
            vec!["você", "viu", "a", "casa", "nova"],
            vec!["muito", "bom", "também", "achei"]
        ]
    );
}

#[tokio::test]
async fn test_noise_never_reaches_output() {
    let results = pipeline(StaticPage::new(Some(PAGE)))
        .run(&request("div", "comentarios"))
        .await;

    let json = serde_json::to_string(&results[1..]).unwrap();
    assert!(!json.contains("publicidade"));
    assert!(!json.contains("rastreio"));
}

#[tokio::test]
async fn test_shape_is_preserved() {
    let results = pipeline(StaticPage::new(Some(PAGE)))
        .run(&request("div", "comentarios"))
        .await;

    let tokenized = words(&results[3].saida);
    for result in &results[4..] {
        let derived = words(&result.saida);
        assert_eq!(derived.len(), tokenized.len(), "{}", result.etapa);
        for (a, b) in derived.iter().zip(&tokenized) {
            assert_eq!(a.len(), b.len(), "{}", result.etapa);
        }
    }
}

#[tokio::test]
async fn test_non_success_status_degrades() {
    let results = pipeline(StaticPage::new(None))
        .run(&request("div", "comentarios"))
        .await;

    assert_eq!(stage_names(&results), Stage::ALL.to_vec());
    assert_eq!(results[0].saida, StageValue::Missing);
    assert!(results[0].erro.is_some());
    assert_eq!(results[1].entrada, StageValue::Missing);
    for result in &results[1..] {
        assert!(result.saida.is_empty(), "{}", result.etapa);
    }
}

#[tokio::test]
async fn test_network_failure_degrades() {
    let results = pipeline(Arc::new(UnreachablePage))
        .run(&request("div", "comentarios"))
        .await;

    assert_eq!(results.len(), Stage::ALL.len());
    assert!(
        results[0]
            .erro
            .as_deref()
            .is_some_and(|e| e.contains("connection refused"))
    );
    assert!(results.iter().skip(1).all(|r| r.saida.is_empty()));
}

#[tokio::test]
async fn test_section_fallback_to_document_text() {
    let results = pipeline(StaticPage::new(Some(PAGE)))
        .run(&request("article", "comentarios"))
        .await;

    let cleaned = &results[1];
    assert!(cleaned.erro.is_some());
    let text = cleaned.saida.as_text().unwrap();
    assert!(text.contains("Inicio Noticias Contato"));
    assert!(text.contains("VC viu a caza nova?"));
    assert!(text.contains("Todos os direitos reservados"));
    assert!(!text.contains("publicidade"));
    assert!(!results[5].saida.is_empty());
}

#[tokio::test]
async fn test_section_fallback_to_sentinel() {
    let pipeline = Pipeline::new(
        config(CorrectionStrategy::Frequency, SectionFallback::Sentinel),
        resources(),
    )
    .unwrap()
    .with_source(StaticPage::new(Some(PAGE)));

    let results = pipeline.run(&request("article", "comentarios")).await;
    assert_eq!(results.len(), 6);
    assert_eq!(results[1].saida, StageValue::Text(DEFAULT_SENTINEL.to_string()));
    assert!(results[1].erro.is_some());
}

#[tokio::test]
async fn test_section_matched_by_id() {
    let results = pipeline(StaticPage::new(Some(PAGE)))
        .run(&request("div", "rodape"))
        .await;

    assert!(results[1].erro.is_none());
    assert_eq!(
        results[1].saida.as_text(),
        Some("Todos os direitos reservados")
    );
}

#[tokio::test]
async fn test_segmenter_failure_degrades() {
    let pipeline = pipeline(StaticPage::new(Some(PAGE)))
        .with_segmenter(Arc::new(MissingModelSegmenter));
    let results = pipeline.run(&request("div", "comentarios")).await;

    assert_eq!(results.len(), Stage::ALL.len());
    assert!(results[2].erro.as_deref().unwrap().contains("language model"));
    assert!(results[2].saida.is_empty());
    for result in &results[3..] {
        assert!(result.saida.is_empty(), "{}", result.etapa);
        assert!(result.erro.is_none());
    }
}

#[tokio::test]
async fn test_concurrent_runs_share_resources() {
    let pipeline = pipeline(StaticPage::new(Some(PAGE)));
    let mut handles = Vec::new();
    for _ in 0..4 {
        let pipeline = pipeline.clone();
        handles.push(tokio::spawn(async move {
            pipeline.run(&request("div", "comentarios")).await
        }));
    }

    let mut outputs = Vec::new();
    for handle in handles {
        let results = handle.await.unwrap();
        outputs.push(results[5].saida.clone());
    }
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_json_response_shape() {
    let pipeline = pipeline(StaticPage::new(None));
    let results = pipeline.process(&request("div", "comentarios"), Some(PAGE.to_string()));

    let json = serde_json::to_value(&results).unwrap();
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 7);
    for (record, stage) in records.iter().zip(Stage::ALL) {
        assert_eq!(record["etapa"], serde_json::json!(stage.label()));
        assert!(record["tempo"].is_number());
        assert!(record.get("entrada").is_some());
        assert!(record.get("saida").is_some());
    }
    assert_eq!(
        records[0]["entrada"],
        serde_json::json!("https://example.com/noticia")
    );
}

#[test]
fn test_resources_from_files() {
    let dir = TempDir::new().unwrap();
    let words = dir.path().join("words.json");
    fs::write(&words, r#"{"vc": "você", "blz": "beleza"}"#).unwrap();
    let corpus = dir.path().join("corpus.txt");
    fs::write(&corpus, "Você_PROPESS viu_V a_ART casa_N ?_? Casa_N nova_ADJ ._.").unwrap();

    let config = ResourceConfig {
        expansion_dictionary: words,
        corpus: vec![corpus],
        corpus_format: CorpusFormat::Tagged,
        spelling_dictionary: None,
    };
    let resources = Resources::load(&config).unwrap();

    assert_eq!(resources.expansions().expand("BLZ"), "beleza");
    assert_eq!(resources.frequency().count("casa"), 2);
    assert_eq!(resources.frequency().count("voce"), 1);
    assert_eq!(resources.frequency().count("propess"), 0);
}

#[test]
fn test_bundled_resources_load() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config = ResourceConfig {
        expansion_dictionary: root.join("resources/words.json"),
        corpus: vec![root.join("resources/corpus")],
        corpus_format: CorpusFormat::Tagged,
        spelling_dictionary: None,
    };

    let resources = Resources::load(&config).unwrap();
    assert_eq!(resources.expansions().expand("vc"), "você");
    assert!(resources.frequency().count("casa") > 0);
}

#[test]
fn test_missing_resources_are_fatal() {
    let config = ResourceConfig {
        expansion_dictionary: PathBuf::from("/nonexistent/words.json"),
        ..Default::default()
    };
    let error = Resources::load(&config).unwrap_err();
    assert!(error.is_fatal());
}
