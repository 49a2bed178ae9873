use serde_json::json;

use audit_spec::{
    HiddenIds, Question, QuestionKind, QuestionSchema, ReportEntry, WorkingQuestion, build_report,
    merge, parse_answer_records, validate_gradients,
};

fn working(answers: serde_json::Value) -> Vec<WorkingQuestion> {
    let schema =
        QuestionSchema::from_json(include_str!("fixtures/ramp_form.json")).expect("fixture parses");
    merge(
        &schema,
        &parse_answer_records(&answers),
        &HiddenIds::defaults(),
    )
}

fn row(label: &str, answer: &str, detail: &str) -> ReportEntry {
    ReportEntry::Row {
        label: label.into(),
        answer: answer.into(),
        detail: detail.into(),
        repeats_heading: false,
    }
}

#[test]
fn report_groups_answered_questions_by_section() {
    let questions = working(json!([
        { "id": "e1", "response": "yes" },
        { "id": "e2", "response": "yes", "height": "500", "length": "5000" },
        { "id": "e3", "response": "yes", "responseDetail": "both sides" },
        { "id": "e4", "imageList": ["memory://e4-a.jpg"] },
        { "id": "t1", "response": "yes" },
        { "id": "t2", "response": "850" },
        { "id": "p1", "response": "Tarmac" },
        { "id": "n1", "response": "Level access throughout" }
    ]));
    let report = build_report(&questions);

    let headings: Vec<_> = report
        .sections
        .iter()
        .map(|section| section.heading.as_str())
        .collect();
    assert_eq!(headings, ["Entrance", "Toilet", "Parking", "General"]);

    assert_eq!(
        report.sections[0].entries,
        vec![
            ReportEntry::Subheading {
                label: "Entrance".into(),
                has_content_below: true,
            },
            row("Is there a ramp at the entrance?", "Yes", ""),
            row("Entrance ramp", "Yes", "1 : 10"),
            row("Are there handrails?", "Yes", "both sides"),
        ]
    );
    assert_eq!(
        report.sections[1].entries[1..],
        [
            row("Is there an accessible toilet?", "Yes", ""),
            row("Door width (mm)", "", "850"),
        ]
    );
    assert_eq!(
        report.sections[2].entries,
        vec![row("Parking surface", "", "Tarmac")]
    );
    assert_eq!(
        report.sections[3].entries,
        vec![row("Additional notes", "Level access throughout", "")]
    );
    assert_eq!(report.row_count(), 7);
}

#[test]
fn gradient_without_ratio_falls_back_to_detail() {
    let questions = working(json!([
        { "id": "e2", "response": "yes", "height": "0", "length": "5000", "responseDetail": "steep" }
    ]));
    let report = build_report(&questions);
    let entrance = &report.sections[0];
    assert!(entrance.entries.contains(&row("Entrance ramp", "Yes", "steep")));
}

#[test]
fn widget_sections_drop_empty_subheadings_and_repeated_labels() {
    let schema = QuestionSchema::new(vec![
        Question::new("h1", QuestionKind::Text, "Parking")
            .in_group("Parking")
            .heading(),
        Question::new("p1", QuestionKind::YesNo, "Parking").in_group("Parking"),
        Question::new("p2", QuestionKind::Text, "Surface").in_group("Parking"),
        Question::new("h2", QuestionKind::Text, "Lift")
            .in_group("Lift")
            .heading(),
        Question::new("l1", QuestionKind::YesNo, "Is there a lift?").in_group("Lift"),
    ])
    .expect("schema");
    let questions = merge(
        &schema,
        &parse_answer_records(&json!([
            { "id": "p1", "response": "yes" },
            { "id": "p2", "response": "gravel" }
        ])),
        &HiddenIds::default(),
    );
    let report = build_report(&questions);

    assert_eq!(report.sections.len(), 2);
    assert!(report.sections[0].entries.contains(&ReportEntry::Row {
        label: "Parking".into(),
        answer: "Yes".into(),
        detail: String::new(),
        repeats_heading: true,
    }));
    assert_eq!(
        report.sections[1].entries,
        vec![ReportEntry::Subheading {
            label: "Lift".into(),
            has_content_below: false,
        }]
    );

    let widget = report.widget_sections();
    assert_eq!(widget.len(), 1);
    assert_eq!(
        widget[0].entries,
        vec![
            ReportEntry::Subheading {
                label: "Parking".into(),
                has_content_below: true,
            },
            row("Surface", "gravel", ""),
        ]
    );
    assert_eq!(report.pdf_entries().count(), 4);
}

#[test]
fn gradient_validation_flags_missing_measurements() {
    let incomplete = working(json!([{ "id": "e2", "response": "yes", "height": "" , "length": "5000" }]));
    let result = validate_gradients(&incomplete);
    assert!(!result.valid);
    assert!(result.is_flagged("e2"));

    let declined = working(json!([{ "id": "e2", "response": "no" }]));
    assert!(validate_gradients(&declined).valid);

    let complete = working(json!([{ "id": "e2", "response": "yes", "height": "500", "length": "5000" }]));
    let result = validate_gradients(&complete);
    assert!(result.valid);
    assert!(result.invalid_ids.is_empty());
}
