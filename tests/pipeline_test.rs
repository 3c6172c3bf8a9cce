use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use calamine::{open_workbook, Data, Reader, Xlsx};

use pdf_translate_compare::error::{AlignmentError, InputError};
use pdf_translate_compare::models::{Paragraph, PdfSource};
use pdf_translate_compare::{
    similarity_percent, ApiKey, App, AppError, ComparisonFlow, Config, PdfExtractor, Translate,
};

// ========== 测试用翻译实现 ==========

/// 原样返回
struct Identity;

impl Translate for Identity {
    fn name(&self) -> &str {
        "Identity"
    }

    async fn translate(&self, text: &str, _credential: &ApiKey) -> Result<String> {
        Ok(text.to_string())
    }
}

/// 查表翻译，查不到时失败
struct Lookup(&'static [(&'static str, &'static str)]);

impl Translate for Lookup {
    fn name(&self) -> &str {
        "Lookup"
    }

    async fn translate(&self, text: &str, _credential: &ApiKey) -> Result<String> {
        self.0
            .iter()
            .find(|(source, _)| *source == text)
            .map(|(_, target)| target.to_string())
            .ok_or_else(|| anyhow::anyhow!("no entry for {}", text))
    }
}

/// 第二次调用失败，其余原样返回
#[derive(Default)]
struct FailsOnSecond {
    calls: AtomicUsize,
}

impl Translate for FailsOnSecond {
    fn name(&self) -> &str {
        "Stub"
    }

    async fn translate(&self, text: &str, _credential: &ApiKey) -> Result<String> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 1 {
            anyhow::bail!("rate limited");
        }
        Ok(text.to_string())
    }
}

// ========== 测试用 PDF ==========

/// 生成每页一行文字的 PDF，空字符串表示空白页
fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let positioned: Vec<(&str, i32)> = pages.iter().map(|text| (*text, 720)).collect();
    build_pdf_at(&positioned)
}

/// 同上，可指定每页文字的纵坐标（页面高 792）
fn build_pdf_at(pages: &[(&str, i32)]) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + i * 2).collect();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids,
        pages.len()
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());

    for (page_id, (text, y)) in page_ids.iter().zip(pages) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            page_id + 1
        ));
        let stream = if text.is_empty() {
            String::new()
        } else {
            format!("BT /F1 24 Tf 72 {} Td ({}) Tj ET", y, text)
        };
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    out.push_str("0000000000 65535 f \n");
    for offset in offsets {
        out.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    out.into_bytes()
}

/// 在临时目录中准备两份 PDF，返回对应配置
fn setup(dir: &Path, chinese: &[&str], english: &[&str]) -> Config {
    let chinese_path = dir.join("chinese.pdf");
    let english_path = dir.join("english.pdf");
    std::fs::write(&chinese_path, build_pdf(chinese)).unwrap();
    std::fs::write(&english_path, build_pdf(english)).unwrap();

    Config {
        chinese_pdf: Some(chinese_path),
        english_pdf: Some(english_path),
        credential: ApiKey::new("test-key"),
        output_dir: dir.join("out"),
        ..Config::default()
    }
}

fn read_sheet(path: &Path) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Sheet1".to_string()]);
    let range = workbook.worksheet_range("Sheet1").unwrap();
    range.rows().map(|row| row.to_vec()).collect()
}

// ========== 测试 ==========

#[test]
fn test_extractor_drops_blank_pages() {
    let source = PdfSource::from_bytes("sample.pdf", build_pdf(&["Hello", "", "World"]));
    let extraction = PdfExtractor::new().extract(&source).unwrap();

    assert_eq!(extraction.page_count, 3);
    let texts: Vec<&str> = extraction.paragraphs.iter().map(|p| p.as_str()).collect();
    assert_eq!(texts, vec!["Hello", "World"]);
    assert!(extraction.paragraphs.len() <= extraction.page_count);
}

#[test]
fn test_extractor_ignores_text_outside_page() {
    let source = PdfSource::from_bytes(
        "offpage.pdf",
        build_pdf_at(&[("Hello", 720), ("Offpage", 1500), ("World", 720)]),
    );
    let extraction = PdfExtractor::new().extract(&source).unwrap();

    assert_eq!(extraction.page_count, 3);
    let texts: Vec<&str> = extraction.paragraphs.iter().map(|p| p.as_str()).collect();
    assert_eq!(texts, vec!["Hello", "World"]);
    assert_eq!(extraction.blank_pages(), 1);
}

#[tokio::test]
async fn test_chinese_scenario_scores_full_marks() {
    let chinese: Vec<Paragraph> = ["你好", "谢谢", "再见"]
        .iter()
        .filter_map(|t| Paragraph::new(t))
        .collect();
    let reference: Vec<Paragraph> = ["Hello", "Thanks", "Goodbye"]
        .iter()
        .filter_map(|t| Paragraph::new(t))
        .collect();
    let translator = Lookup(&[("你好", "Hello"), ("谢谢", "Thanks"), ("再见", "Goodbye")]);
    let key = ApiKey::new("test-key").unwrap();

    let table = ComparisonFlow::new(translator, false)
        .run(&chinese, &reference, &key)
        .await
        .unwrap();

    assert_eq!(table.len(), 3);
    assert!(table.rows.iter().all(|r| r.similarity == 100.0 && !r.failed));
    assert_eq!(table.rows[2].chinese, "再见");
}

#[tokio::test]
async fn test_pipeline_writes_both_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), &["Hello", "", "World"], &["Hello", "World"]);
    let excel_path = config.excel_path();
    let html_path = config.html_path();

    let app = App::initialize(config).await.unwrap();
    let table = app.run_with(Identity).await.unwrap();

    assert_eq!(table.len(), 2);
    assert!(table.rows.iter().all(|r| r.similarity == 100.0));

    let rows = read_sheet(&excel_path);
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0],
        vec![
            Data::String("Chinese Text".to_string()),
            Data::String("Machine Translation".to_string()),
            Data::String("Reference English".to_string()),
            Data::String("Similarity %".to_string()),
        ]
    );
    assert_eq!(rows[2][0], Data::String("World".to_string()));
    assert_eq!(rows[2][3], Data::Float(100.0));

    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("<table border=\"1\" class=\"dataframe\">"));
    assert!(html.contains("<td>World</td>"));
    assert!(html.contains("<td>100.0</td>"));
}

#[tokio::test]
async fn test_failed_translation_is_recorded_inline() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(
        dir.path(),
        &["One", "Two", "Three"],
        &["One", "Two", "Three"],
    );

    let app = App::initialize(config).await.unwrap();
    let table = app.run_with(FailsOnSecond::default()).await.unwrap();

    assert_eq!(table.len(), 3);
    let failed = &table.rows[1];
    assert_eq!(failed.machine_translation, "[Stub Error: rate limited]");
    assert!(failed.failed);
    assert_eq!(
        failed.similarity,
        similarity_percent("[Stub Error: rate limited]", "Two")
    );
    assert_eq!(table.rows[2].similarity, 100.0);

    let summary = table.summary();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.mean_similarity_translated, Some(100.0));
}

#[tokio::test]
async fn test_longer_reference_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), &["Hello"], &["Hello", "Extra"]);

    let app = App::initialize(config).await.unwrap();
    let table = app.run_with(Identity).await.unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0].reference, "Hello");
}

#[tokio::test]
async fn test_short_reference_aborts_before_export() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), &["Hello", "World"], &["Hello"]);
    let excel_path = config.excel_path();

    let app = App::initialize(config).await.unwrap();
    let err = app.run_with(Identity).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Alignment(AlignmentError::ReferenceTooShort {
            required: 2,
            available: 1
        })
    ));
    assert!(!excel_path.exists());
}

#[tokio::test]
async fn test_invalid_pdf_is_extraction_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup(dir.path(), &["Hello"], &["Hello"]);
    let broken = dir.path().join("broken.pdf");
    std::fs::write(&broken, b"not a pdf").unwrap();
    config.chinese_pdf = Some(broken);

    let app = App::initialize(config).await.unwrap();
    let err = app.run_with(Identity).await.unwrap_err();
    assert!(matches!(err, AppError::Extraction(_)));
}

#[tokio::test]
async fn test_missing_credential_is_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup(dir.path(), &["Hello"], &["Hello"]);
    config.credential = None;

    let result = App::initialize(config).await;
    assert!(matches!(
        result,
        Err(AppError::Input(InputError::MissingCredential { .. }))
    ));
}
