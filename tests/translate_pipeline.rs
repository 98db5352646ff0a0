use async_trait::async_trait;
use header_translator::pipeline::{translate_path, RecordingProgress};
use header_translator::tabular::{read_csv, read_workbook, save_workbook, CellValue, Column};
use header_translator::{
    convert_csv_to_json, CsvSource, HeaderTranslator, HeaderTranslatorError, JsonOptions,
    JsonOrient, PipelineContext, Sheet, TranslationBackend, TranslationCache, Workbook,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Dictionary-backed backend; unknown words fail like an unreachable service.
struct Dictionary {
    words: HashMap<&'static str, &'static str>,
    calls: AtomicUsize,
}

impl Dictionary {
    fn new(words: &[(&'static str, &'static str)]) -> Arc<Self> {
        Arc::new(Self {
            words: words.iter().copied().collect(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TranslationBackend for Dictionary {
    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> header_translator::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.words
            .get(text)
            .map(|t| t.to_string())
            .ok_or_else(|| HeaderTranslatorError::ApiError(format!("no entry for {text}")))
    }
}

fn context(backend: Arc<Dictionary>) -> PipelineContext {
    PipelineContext::new(HeaderTranslator::new(backend, TranslationCache::new()))
}

#[tokio::test]
async fn csv_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ventas.csv");
    let output = dir.path().join("out.csv");
    std::fs::write(
        &input,
        "Fecha,Producto,,Cantidad,Producto,Notiz\n2024-01-02,Té,x,3,verde,a\n2024-01-03,Café,y,1,negro,b\n",
    )
    .unwrap();

    let backend = Dictionary::new(&[
        ("Fecha", "Date"),
        ("Producto", "Product"),
        ("Producto.1", "Product"),
        ("Cantidad", "Quantity"),
    ]);
    let recorder = Arc::new(RecordingProgress::new());
    let ctx = context(backend.clone())
        .with_overrides(HashMap::from([("Cantidad".to_string(), "Qty".to_string())]))
        .with_progress(recorder.clone());

    let result = translate_path(&ctx, input.to_str().unwrap(), Some(output.to_str().unwrap()))
        .await
        .unwrap();

    let written = read_csv(output.to_str().unwrap()).unwrap();
    assert_eq!(
        written.headers(),
        vec!["Date", "Product", "Qty", "Product.1", "Notiz"]
    );
    assert_eq!(written.cell(1, 1), &CellValue::Text("Café".into()));
    assert_eq!(written.cell(0, 2), &CellValue::Int(3));

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].text, "Notiz");
    // Fecha, Producto, Producto.1, Notiz; the override skipped the backend.
    assert_eq!(backend.calls.load(Ordering::SeqCst), 4);
    assert!(!recorder.snapshots().is_empty());
}

#[tokio::test]
async fn workbook_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("libro.xlsx");
    let output = dir.path().join("translated.xlsx");

    let long_name = "Inventario";
    save_workbook(
        &Workbook::new(vec![
            Sheet::new("Hoja1", vec![Column::new("Nombre", vec![CellValue::Text("Ana".into())])]),
            Sheet::new("Hoja2", vec![Column::new("Nombre", vec![CellValue::Text("Luis".into())])]),
            Sheet::new(long_name, vec![Column::new("Cantidad", vec![CellValue::Float(2.0)])]),
            Sheet::new("Otro informe", vec![Column::new("Cantidad", vec![CellValue::Float(5.0)])]),
        ]),
        input.to_str().unwrap(),
    )
    .unwrap();

    let backend = Dictionary::new(&[
        ("Hoja1", "Sheet"),
        ("Hoja2", "Sheet"),
        (long_name, "Detailed inventory report of the central warehouse"),
        ("Otro informe", "Detailed inventory report of the central warehouse annex"),
        ("Nombre", "Name"),
        ("Cantidad", "Quantity"),
    ]);
    let ctx = context(backend.clone());

    let result = translate_path(&ctx, input.to_str().unwrap(), Some(output.to_str().unwrap()))
        .await
        .unwrap();
    assert!(result.warnings.is_empty());

    let reloaded = read_workbook(output.to_str().unwrap()).unwrap();
    let names = reloaded.sheet_names();
    assert_eq!(names[0], "Sheet");
    assert_eq!(names[1], "Sheet.1");
    assert_eq!(names[2], "Detailed inventory report of th");
    assert_eq!(names[3], "Detailed inventory report of.1");
    assert!(names.iter().all(|n| n.chars().count() <= 31));

    assert_eq!(reloaded.sheets[1].headers(), vec!["Name"]);
    assert_eq!(reloaded.sheets[1].cell(0, 0), &CellValue::Text("Luis".into()));
    assert_eq!(reloaded.sheets[3].headers(), vec!["Quantity"]);

    // 4 sheet names + "Nombre" + "Cantidad", the repeats come from the cache.
    assert_eq!(backend.calls.load(Ordering::SeqCst), 6);
}

#[test]
fn csv_to_json_reads_original_headers() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("datos.csv");
    std::fs::write(&input, "Nombre,Edad\nZoë,31\n").unwrap();

    let out = convert_csv_to_json(
        CsvSource::Path(input),
        &JsonOptions {
            orient: JsonOrient::Records,
            indent: Some(2),
            ascii_only: true,
        },
    )
    .unwrap();

    assert_eq!(
        out.rendered,
        "[\n  {\n    \"Nombre\": \"Zo\\u00eb\",\n    \"Edad\": 31\n  }\n]"
    );
}

#[test]
fn missing_csv_is_a_conversion_error() {
    let err = convert_csv_to_json(
        CsvSource::Path("/no/such/input.csv".into()),
        &JsonOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, HeaderTranslatorError::ConversionError(_)));
}
