mod common;

use std::sync::Arc;

use common::ScriptedPdf;
use smart_finance::activity::{ActivityEvent, MemorySink};
use smart_finance::data::model::CellValue;
use smart_finance::{
    ChartKind, ChartRequest, Document, Pipeline, PipelineConfig, PipelineError, PriorityCategory,
    SessionContext,
};

fn pipeline(pdf: Arc<ScriptedPdf>) -> Pipeline {
    Pipeline::new(PipelineConfig::default())
        .unwrap()
        .with_pdf_backend(pdf)
}

const SPENDING: &str = "amount,category\n12.5,food\n900,rent\n40,travel\n";

#[test]
fn csv_round_trip_keeps_every_row_in_order() {
    let rows = [
        ["2024-01-02", "Coffee shop", "-4.50", "1495.50", "123456789012345678901234"],
        ["2024-01-03", "Salary", "3200", "4695.50", "42"],
        ["2024-01-05", "Rent, March", "-1150", "3545.50", "98765432109876543210"],
        ["2024-01-09", "", "-12.25", "3533.25", "7"],
    ];
    let mut text = String::from("date,description,amount,balance,ref\n");
    for row in &rows {
        let quoted: Vec<String> = row.iter().map(|c| format!("\"{c}\"")).collect();
        text.push_str(&quoted.join(","));
        text.push('\n');
    }

    let dataset = pipeline(Arc::default())
        .load(&Document::new("jan.csv", text))
        .unwrap();

    assert_eq!(dataset.len(), rows.len());
    for (i, row) in rows.iter().enumerate() {
        let expected: Vec<CellValue> = row.iter().map(|c| CellValue::parse(c)).collect();
        let actual: Vec<CellValue> = dataset.row(i).unwrap().into_iter().cloned().collect();
        assert_eq!(actual, expected, "row {i}");
    }
    assert_eq!(dataset.numeric_columns(), ["amount", "balance"]);

    // wide transaction references come back digit for digit
    let refs: Vec<String> = dataset
        .column("ref")
        .unwrap()
        .values
        .iter()
        .map(|v| v.to_string())
        .collect();
    assert_eq!(refs, rows.map(|row| row[4].to_string()));
}

#[test]
fn unsupported_extension_never_extracts() {
    let pdf = Arc::new(ScriptedPdf::default());
    let err = pipeline(pdf.clone())
        .load(&Document::new("budget.xlsx", SPENDING))
        .unwrap_err();
    assert_eq!(err, PipelineError::UnsupportedFormat(".xlsx".into()));
    assert_eq!(pdf.calls(), 0);
}

#[test]
fn identical_pdf_bytes_extract_once() {
    let pdf = Arc::new(ScriptedPdf::default());
    let pipeline = pipeline(pdf.clone());

    let first = pipeline.load(&Document::new("march.pdf", SPENDING)).unwrap();
    let second = pipeline
        .load(&Document::new("march (1).pdf", SPENDING))
        .unwrap();

    assert_eq!(pdf.calls(), 1);
    assert_eq!(first, second);
    assert_eq!(pipeline.cache().stats().hits, 1);
}

#[test]
fn pdf_tables_are_concatenated() {
    let bytes = "month,income\nJan,100\nFeb,120\n\nmonth,income\nMar,90\n";
    let dataset = pipeline(Arc::default())
        .load(&Document::new("q1.pdf", bytes))
        .unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(
        dataset.column("month").unwrap().values,
        vec![
            CellValue::Text("Jan".into()),
            CellValue::Text("Feb".into()),
            CellValue::Text("Mar".into()),
        ]
    );
    assert_eq!(dataset.numeric_columns(), ["income"]);
}

#[test]
fn pdf_without_tables_is_retried_every_time() {
    let pdf = Arc::new(ScriptedPdf::default());
    let pipeline = pipeline(pdf.clone());
    let doc = Document::new("scan.pdf", "EMPTY");

    assert_eq!(pipeline.load(&doc).unwrap_err(), PipelineError::NoTablesFound);
    assert_eq!(pipeline.load(&doc).unwrap_err(), PipelineError::NoTablesFound);
    assert_eq!(pdf.calls(), 2);
    assert!(pipeline.cache().is_empty());
}

#[test]
fn extraction_failure_carries_cause() {
    let err = pipeline(Arc::default())
        .load(&Document::new("broken.pdf", "CORRUPT"))
        .unwrap_err();
    assert_eq!(
        err,
        PipelineError::ExtractionFailure("xref table is damaged".into())
    );
    assert!(err.to_string().contains("xref table is damaged"));
}

#[test]
fn eleventh_pdf_evicts_least_recently_used() {
    let pdf = Arc::new(ScriptedPdf::default());
    let pipeline = pipeline(pdf.clone());
    let docs: Vec<Document> = (0..11)
        .map(|i| Document::new(format!("m{i}.pdf"), format!("amount\n{i}\n")))
        .collect();

    for doc in &docs[..10] {
        pipeline.load(doc).unwrap();
    }
    assert_eq!(pipeline.cache().len(), 10);

    pipeline.load(&docs[10]).unwrap();
    assert_eq!(pipeline.cache().len(), 10);
    assert!(!pipeline.cache().contains(&docs[0].id()));
    assert!(pipeline.cache().contains(&docs[1].id()));

    // the evicted document has to be extracted again
    pipeline.load(&docs[0]).unwrap();
    assert_eq!(pdf.calls(), 12);
}

#[test]
fn spending_scenario_resolves_all_chart_kinds() {
    let sink = Arc::new(MemorySink::default());
    let pipeline = pipeline(Arc::default()).with_activity_sink(sink.clone());
    let ctx = SessionContext::for_user("sam");

    let dataset = pipeline.load(&Document::new("spend.csv", SPENDING)).unwrap();
    assert_eq!(dataset.numeric_columns(), ["amount"]);
    assert_eq!(dataset.all_columns(), ["amount", "category"]);

    let bar = pipeline
        .create_chart(&ctx, &dataset, &ChartRequest::new(ChartKind::Bar).x("amount").y("amount"))
        .unwrap();
    assert_eq!(bar.kind, ChartKind::Bar);

    let pie = pipeline
        .create_chart(
            &ctx,
            &dataset,
            &ChartRequest::new(ChartKind::Pie).category("category").y("amount"),
        )
        .unwrap();
    assert_eq!(pie.category_field.as_deref(), Some("category"));

    let scatter = pipeline
        .create_chart(
            &ctx,
            &dataset,
            &ChartRequest::new(ChartKind::Scatter3d).x("amount").y("amount").z("amount"),
        )
        .unwrap();
    assert_eq!(scatter.z_field.as_deref(), Some("amount"));

    let err = pipeline
        .create_chart(&ctx, &dataset, &ChartRequest::new(ChartKind::Pie).y("amount"))
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidField(_)));

    let kinds: Vec<ChartKind> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ActivityEvent::ChartCreated { chart_kind, .. } => Some(chart_kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec![ChartKind::Bar, ChartKind::Pie, ChartKind::Scatter3d]);
}

#[test]
fn savings_advice_ignores_dataset_contents() {
    let pipeline = pipeline(Arc::default());
    let ctx = SessionContext::default();
    let expected = vec![
        "Allocate 20% of your income to savings.",
        "Track your fixed expenses to maximize savings.",
    ];

    for text in [SPENDING, "memo\nhello\n", "a,b\n1,2\n3,4\n"] {
        let dataset = pipeline.load(&Document::new("any.csv", text)).unwrap();
        let set = pipeline.recommendations(&ctx, &dataset, PriorityCategory::Savings);
        assert_eq!(set.items, expected);
    }
}
