//! Integration tests for the extraction pipeline.

use chrono::{TimeZone, Utc};
use structex::error::{Error, Result};
use structex::{
    to_json, DocumentAssembler, JsonFormat, LineClusterer, PageElement, PageRuns, Pipeline,
    PipelineOptions, SemanticSource, SourceInfo, StaticRunSource, Strategy, StructuralClassifier,
    Structex, TextRun, TextRunSource,
};

/// Semantic service mock returning a canned payload or an error.
struct MockService {
    payload: std::result::Result<&'static str, &'static str>,
}

impl SemanticSource for MockService {
    fn fetch(&self) -> Result<String> {
        match self.payload {
            Ok(payload) => Ok(payload.to_string()),
            Err(reason) => Err(Error::SourceUnavailable(reason.to_string())),
        }
    }
}

/// Decoder mock that is unreachable.
struct OfflineDecoder;

impl TextRunSource for OfflineDecoder {
    fn info(&self) -> Result<SourceInfo> {
        Err(Error::SourceUnavailable("decoder offline".to_string()))
    }

    fn page_runs(&self, _page_index: u32) -> Result<PageRuns> {
        Err(Error::SourceUnavailable("decoder offline".to_string()))
    }
}

const VALID_PAYLOAD: &str = r#"{
    "document": "service.pdf",
    "pageCount": 1,
    "processedDate": "2024-06-01T08:00:00Z",
    "pages": [{
        "pageIndex": 1,
        "elements": [{ "type": "paragraph", "content": "From the service." }]
    }]
}"#;

// ==================== Spec scenarios ====================

#[test]
fn test_header_and_paragraph_scenario() {
    let page = PageRuns::new(vec![
        TextRun::new("Chapter 1", 700.0).with_font_size(24.0),
        TextRun::new("This is body text.", 650.0).with_font_size(12.0),
    ]);
    let source = StaticRunSource::new("book.pdf", vec![page]);

    let doc = Pipeline::new().extract(&source).unwrap();
    assert_eq!(
        doc.pages[0].elements,
        vec![
            PageElement::header("Chapter 1", 1),
            PageElement::paragraph("This is body text."),
        ]
    );
}

#[test]
fn test_list_items_scenario() {
    let page = PageRuns::new(vec![
        TextRun::new("- item one", 500.0),
        TextRun::new("- item two", 480.0),
    ]);
    let source = StaticRunSource::new("list.pdf", vec![page]);

    let doc = Pipeline::new().extract(&source).unwrap();
    assert_eq!(
        doc.pages[0].elements,
        vec![
            PageElement::list_item("item one"),
            PageElement::list_item("item two"),
        ]
    );
}

#[test]
fn test_empty_page_stays_in_pages() {
    let pages = vec![
        PageRuns::new(vec![TextRun::new("Some text.", 700.0)]),
        PageRuns::default(),
        PageRuns::new(vec![TextRun::new("More text.", 700.0)]),
    ];
    let source = StaticRunSource::new("sparse.pdf", pages);

    let doc = Pipeline::new().extract(&source).unwrap();
    assert_eq!(doc.page_count, 3);
    assert_eq!(doc.pages[1].page_index, 2);
    assert!(doc.pages[1].elements.is_empty());
}

#[test]
fn test_missing_page_count_is_malformed_payload() {
    let payload = r#"{
        "document": "bad.pdf",
        "processedDate": "2024-06-01T08:00:00Z",
        "pages": []
    }"#;

    let err = Pipeline::new().ingest(payload).unwrap_err();
    match err {
        Error::MalformedPayload(msg) => assert!(msg.contains("pageCount"), "{}", msg),
        other => panic!("expected MalformedPayload, got {:?}", other),
    }
}

// ==================== Testable properties ====================

#[test]
fn test_idempotence_byte_identical() {
    let runs = vec![
        TextRun::new("REPORT", 720.0),
        TextRun::new("columns", 700.0).with_x(200.0),
        TextRun::new("swap", 700.0).with_x(40.0),
        TextRun::new("A paragraph of respectable length for the median.", 680.0),
        TextRun::new("- first point", 660.0),
        TextRun::new("- second point", 645.0),
    ];

    let render = || {
        let clusterer = LineClusterer::new();
        let classifier = StructuralClassifier::new();
        let lines = clusterer.cluster(runs.clone());
        let elements = classifier.classify(&lines, &[]);

        let stamp = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let info = SourceInfo::new("report.pdf", 1);
        let doc = DocumentAssembler::with_timestamp(stamp)
            .assemble(&info, vec![(1, elements)])
            .unwrap();
        to_json(&doc, JsonFormat::Compact).unwrap()
    };

    assert_eq!(render(), render());
}

#[test]
fn test_repeated_extraction_same_structure() {
    let source = StaticRunSource::new(
        "doc.pdf",
        vec![PageRuns::new(vec![
            TextRun::new("Heading", 700.0).with_font_size(20.0),
            TextRun::new("body body body body", 680.0).with_font_size(12.0),
            TextRun::new("body body body again", 664.0).with_font_size(12.0),
        ])],
    );

    let first = Pipeline::new().extract(&source).unwrap();
    let second = Pipeline::new().extract(&source).unwrap();
    assert_eq!(first.pages, second.pages);
}

#[test]
fn test_order_preservation() {
    let page = PageRuns::new(vec![
        // emitted out of order on purpose
        TextRun::new("third line of text", 600.0),
        TextRun::new("first line of text", 700.0),
        TextRun::new("second line of text", 650.0),
    ]);
    let source = StaticRunSource::new("order.pdf", vec![page]);

    let doc = Pipeline::new().extract(&source).unwrap();
    let combined = doc.plain_text();

    let first = combined.find("first").unwrap();
    let second = combined.find("second").unwrap();
    let third = combined.find("third").unwrap();
    assert!(first < second && second < third, "{}", combined);
}

#[test]
fn test_no_content_loss() {
    let page = PageRuns::new(vec![
        TextRun::new("OVERVIEW", 720.0),
        TextRun::new("An ordinary paragraph long enough to anchor the median.", 700.0),
        TextRun::new("- alpha", 680.0),
        TextRun::new("2. beta", 664.0),
        TextRun::new("Figure 9: gamma", 648.0),
    ]);
    let source = StaticRunSource::new("loss.pdf", vec![page]);

    let doc = Pipeline::new().extract(&source).unwrap();
    let emitted = doc.plain_text();
    for word in ["OVERVIEW", "ordinary", "anchor", "alpha", "beta", "gamma"] {
        assert!(emitted.contains(word), "lost {:?} in {:?}", word, emitted);
    }
}

#[test]
fn test_schema_invariants_hold() {
    let pages = (0..4)
        .map(|n| {
            PageRuns::new(vec![
                TextRun::new(format!("Section {}", n), 700.0).with_font_size(18.0),
                TextRun::new("Body text for this page.", 680.0).with_font_size(12.0),
                TextRun::new("More body text for this page.", 664.0).with_font_size(12.0),
            ])
        })
        .collect();
    let source = StaticRunSource::new("invariants.pdf", pages);

    let doc = Pipeline::new().extract(&source).unwrap();

    assert_eq!(doc.page_count as usize, doc.pages.len());
    for (i, page) in doc.pages.iter().enumerate() {
        assert_eq!(page.page_index, i as u32 + 1);
        for element in &page.elements {
            if let Some(level) = element.heading_level() {
                assert!(level >= 1);
            }
        }
    }
}

// ==================== Delegated path & strategy ====================

#[test]
fn test_delegated_payload_accepted() {
    let service = MockService {
        payload: Ok(VALID_PAYLOAD),
    };
    let pipeline = Pipeline::with_options(PipelineOptions::new().with_strategy(Strategy::Delegated));

    let doc = pipeline.run(Some(&service), None).unwrap();
    assert_eq!(doc.document, "service.pdf");
    assert_eq!(
        doc.pages[0].elements[0],
        PageElement::paragraph("From the service.")
    );
}

#[test]
fn test_delegated_strategy_without_service_fails() {
    let pipeline = Pipeline::with_options(PipelineOptions::new().with_strategy(Strategy::Delegated));
    let err = pipeline.run(None, None).unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable(_)));
}

#[test]
fn test_prefer_delegated_falls_back_to_local() {
    let service = MockService {
        payload: Err("service timed out"),
    };
    let decoder = StaticRunSource::new(
        "local.pdf",
        vec![PageRuns::new(vec![TextRun::new("Local text.", 700.0)])],
    );

    let doc = Structex::new()
        .with_strategy(Strategy::PreferDelegated)
        .run(Some(&service), Some(&decoder))
        .unwrap();

    assert_eq!(doc.document, "local.pdf");
}

#[test]
fn test_prefer_delegated_uses_service_when_healthy() {
    let service = MockService {
        payload: Ok(VALID_PAYLOAD),
    };
    let decoder = StaticRunSource::new("local.pdf", vec![]);

    let doc = Structex::new()
        .with_strategy(Strategy::PreferDelegated)
        .run(Some(&service), Some(&decoder))
        .unwrap();

    assert_eq!(doc.document, "service.pdf");
}

#[test]
fn test_prefer_delegated_without_fallback_surfaces_error() {
    let service = MockService {
        payload: Err("service timed out"),
    };

    let err = Structex::new()
        .with_strategy(Strategy::PreferDelegated)
        .run(Some(&service), None)
        .unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable(_)));
}

#[test]
fn test_offline_decoder_is_fatal() {
    let err = Pipeline::new().extract(&OfflineDecoder).unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable(_)));
}

// ==================== Output serialization ====================

#[test]
fn test_json_matches_canonical_schema() {
    let page = PageRuns::new(vec![
        TextRun::new("Chapter 1", 700.0).with_font_size(24.0),
        TextRun::new("This is body text.", 650.0).with_font_size(12.0),
    ]);
    let source = StaticRunSource::new("book.pdf", vec![page]);

    let doc = Pipeline::new().extract(&source).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&to_json(&doc, JsonFormat::Compact).unwrap()).unwrap();

    assert_eq!(json["document"], "book.pdf");
    assert_eq!(json["pageCount"], 1);
    assert!(json["processedDate"].is_string());
    assert_eq!(json["pages"][0]["pageIndex"], 1);
    assert_eq!(json["pages"][0]["elements"][0]["type"], "header");
    assert_eq!(json["pages"][0]["elements"][0]["metadata"]["level"], 1);
    assert_eq!(json["pages"][0]["elements"][1]["type"], "paragraph");
}

#[test]
fn test_round_trip_through_ingest() {
    let source = StaticRunSource::new(
        "trip.pdf",
        vec![PageRuns::new(vec![TextRun::new("Round trip text.", 700.0)])],
    );

    let doc = Pipeline::new().extract(&source).unwrap();
    let json = to_json(&doc, JsonFormat::Pretty).unwrap();
    let back = structex::ingest_json(&json).unwrap();

    assert_eq!(doc, back);
}
