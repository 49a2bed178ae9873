use serde_json::json;

use audit_spec::{
    GalleryImage, HiddenIds, HtmlReportRenderer, QuestionSchema, ReportDocument, WidgetPackager,
    WidgetPosition, build_report, merge, parse_answer_records,
};

fn document(answers: serde_json::Value) -> ReportDocument {
    let schema =
        QuestionSchema::from_json(include_str!("fixtures/ramp_form.json")).expect("fixture parses");
    let questions = merge(
        &schema,
        &parse_answer_records(&answers),
        &HiddenIds::defaults(),
    );
    build_report(&questions)
}

fn gallery(count: usize) -> Vec<GalleryImage> {
    (0..count)
        .map(|n| GalleryImage {
            data_uri: format!("data:image/jpeg;base64,aW1hZ2U{n}="),
            caption: "Entrance".into(),
        })
        .collect()
}

#[test]
fn html_report_lists_gallery_then_responses() {
    let report = document(json!([
        { "id": "e1", "response": "yes" },
        { "id": "n1", "response": "Step <b>free & level" }
    ]))
    .with_gallery(gallery(7));

    let html = HtmlReportRenderer::new()
        .expect("template loads")
        .render(&report)
        .expect("renders");

    assert!(html.contains("<h1>Accessibility Report</h1>"));
    assert!(html.contains("Image Gallery (max 24 images shown)"));
    let gallery_at = html.find("Image Gallery").expect("gallery heading");
    let responses_at = html.find("<h2>Form Responses</h2>").expect("responses heading");
    assert!(gallery_at < responses_at);

    assert_eq!(html.matches("<img ").count(), 7);
    assert_eq!(html.matches("page-break-before: always").count(), 1);
    assert!(html.contains(r#"src="data:image/jpeg;base64,aW1hZ2U0=""#));

    assert!(html.contains(r#"<th colspan="3""#));
    assert!(html.contains("Is there a ramp at the entrance?"));
    assert!(html.contains("Step &lt;b&gt;free &amp; level"));
    assert!(!html.contains("<b>free"));
}

#[test]
fn widget_embeds_filtered_sections_and_position() {
    let report = document(json!([
        { "id": "e1", "response": "yes" },
        { "id": "p1", "response": "Gravel" }
    ]))
    .with_gallery(gallery(1));

    let script = WidgetPackager::new()
        .expect("template loads")
        .package(&report, WidgetPosition::BottomLeft)
        .expect("packages");

    assert!(script.starts_with("(function () {"));
    assert!(script.trim_end().ends_with("})();"));
    assert!(script.contains(r#"const buttonPosition = "bottom-left";"#));
    assert!(script.contains("Open Accessibility Info"));

    let data_line = script
        .lines()
        .find_map(|line| line.strip_prefix("const data = "))
        .expect("data line");
    let data: serde_json::Value =
        serde_json::from_str(data_line.trim_end_matches(';')).expect("data is json");
    let headings: Vec<_> = data
        .as_array()
        .expect("array")
        .iter()
        .map(|section| section["heading"].as_str().unwrap_or_default())
        .collect();
    // The Toilet heading has nothing answered below it.
    assert_eq!(headings, ["Entrance", "Parking"]);
    assert_eq!(data[1]["entries"][0]["detail"], "Gravel");

    let gallery_line = script
        .lines()
        .find_map(|line| line.strip_prefix("const imageGallery = "))
        .expect("gallery line");
    let images: serde_json::Value =
        serde_json::from_str(gallery_line.trim_end_matches(';')).expect("gallery is json");
    assert_eq!(images[0]["label"], "Entrance");
}

#[test]
fn manual_widget_has_no_fixed_button_position() {
    let script = WidgetPackager::new()
        .expect("template loads")
        .package(&ReportDocument::default(), WidgetPosition::Manual)
        .expect("packages");
    assert!(script.contains(r#"const buttonPosition = "manual";"#));
    assert!(script.contains("const data = [];"));
    assert!(script.contains("getElementById(\"open-widget\")"));
}
