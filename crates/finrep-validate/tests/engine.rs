//! Integration tests: executor, catalogs, and the orchestrator.

use chrono::NaiveDate;
use finrep_model::{Finding, FinrepError, Record, ReportingPeriod, ValidationContext};
use finrep_validate::{
    Cardinality, Check, MAX_FINDINGS_PER_TAB, Rule, TabCatalog, validate_fields, validate_report,
    validate_report_strict,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn context() -> ValidationContext {
    let period = ReportingPeriod::new(date(2020, 3, 1), date(2020, 12, 31), date(2021, 12, 31));
    ValidationContext::builder(period).build().unwrap()
}

fn cover_rules() -> Vec<Rule> {
    vec![
        Rule::new("name", Check::NotBlank),
        Rule::new("date", Check::ValidDate),
        Rule::new("description", Check::NotBlank).with_message("Description is required"),
    ]
}

#[test]
fn cover_sheet_example() {
    let ctx = context();
    let record = Record::new("cover", 2)
        .with_field("name", "")
        .with_field("date", "2020-10-02")
        .with_field("description", "x");
    let findings = validate_fields(&cover_rules(), &record, 2, &ctx);
    assert_eq!(
        findings,
        vec![Finding::new("Empty or invalid entry for name: \"\"", "cover").with_row(2)]
    );
}

#[test]
fn custom_message_substitutes_placeholder() {
    let ctx = context();
    let rules = vec![
        Rule::new("amount", Check::PositiveNumber).with_message("Amount {} must be positive"),
    ];
    let record = Record::new("grants", 5).with_field("amount", -3.0);
    let findings = validate_fields(&rules, &record, 5, &ctx);
    assert_eq!(findings[0].message, "Amount -3 must be positive");
    assert_eq!(findings[0].row, Some(5));
}

#[test]
fn date_values_render_as_mmddyyyy() {
    let ctx = context();
    let rules = vec![
        Rule::new("date", Check::InReportingPeriod)
            .with_message("Date {} is outside the reporting period")
            .date_value(),
    ];
    let record = Record::new("grants", 3).with_field("date", 44927.0); // 2023-01-01
    let findings = validate_fields(&rules, &record, 3, &ctx);
    assert_eq!(findings[0].message, "Date 01/01/2023 is outside the reporting period");

    // Unparseable values pass through raw.
    let record = Record::new("grants", 4).with_field("date", "soon");
    let rules = vec![
        Rule::new("date", Check::ValidDate).with_message("Bad date: {}").date_value(),
    ];
    let findings = validate_fields(&rules, &record, 4, &ctx);
    assert_eq!(findings[0].message, "Bad date: soon");
}

#[test]
fn tag_gate_is_pure_set_intersection() {
    let record = Record::new("grants", 2).with_field("name", "");
    let rules = vec![Rule::new("name", Check::NotBlank).with_tags(["X"])];
    let period = ReportingPeriod::new(date(2020, 3, 1), date(2020, 12, 31), date(2021, 12, 31));

    // No active tags: tagged rule is skipped entirely.
    let ctx = ValidationContext::builder(period).build().unwrap();
    assert!(validate_fields(&rules, &record, 2, &ctx).is_empty());

    // Disjoint tags: still skipped.
    let ctx = ValidationContext::builder(period).tags(["Y"]).build().unwrap();
    assert!(validate_fields(&rules, &record, 2, &ctx).is_empty());

    // Intersecting tags: applied.
    let ctx = ValidationContext::builder(period).tags(["X", "Y"]).build().unwrap();
    assert_eq!(validate_fields(&rules, &record, 2, &ctx).len(), 1);

    // Untagged rules always apply.
    let untagged = vec![Rule::new("name", Check::NotBlank)];
    let ctx = ValidationContext::builder(period).build().unwrap();
    assert_eq!(validate_fields(&untagged, &record, 2, &ctx).len(), 1);
}

#[test]
fn findings_follow_record_order_then_rule_order() {
    let ctx = context();
    let rules = vec![
        Rule::new("a", Check::NotBlank).with_message("a missing: {}"),
        Rule::new("b", Check::NotBlank).with_message("b missing: {}"),
    ];
    let catalog = TabCatalog::all_records("grants", rules);
    let records = vec![Record::new("grants", 2), Record::new("grants", 3)];
    let findings = validate_report(&[catalog], records, &ctx);
    let rows: Vec<Option<u32>> = findings.iter().map(|f| f.row).collect();
    assert_eq!(rows, vec![Some(2), Some(2), Some(3), Some(3)]);
    assert_eq!(findings[0].message, "a missing: ");
    assert_eq!(findings[1].message, "b missing: ");
}

#[test]
fn single_record_cardinality() {
    let ctx = context();
    let catalog = TabCatalog::single_record(
        "cover",
        "The cover sheet is missing",
        vec![Rule::new("name", Check::NotBlank)],
    );

    // Zero records: one finding, no row.
    let findings = validate_report(std::slice::from_ref(&catalog), vec![], &ctx);
    assert_eq!(
        findings,
        vec![Finding::new("The cover sheet is missing", "cover")]
    );

    // Two records: same single finding.
    let two = vec![Record::new("cover", 2), Record::new("cover", 3)];
    let findings = validate_report(std::slice::from_ref(&catalog), two, &ctx);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].row, None);

    // Exactly one: validated with the fixed first data row, even when the
    // source row disagrees.
    let one = vec![Record::new("cover", 7).with_field("name", "")];
    let findings = validate_report(std::slice::from_ref(&catalog), one, &ctx);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].row, Some(2));
}

#[test]
fn per_tab_findings_are_capped_at_100() {
    let ctx = context();
    let catalog = TabCatalog::all_records(
        "grants",
        vec![Rule::new("name", Check::NotBlank)],
    );
    let records: Vec<Record> = (0..150).map(|i| Record::new("grants", i + 2)).collect();
    let findings = validate_report(&[catalog], records, &ctx);
    assert_eq!(findings.len(), MAX_FINDINGS_PER_TAB);
    assert_eq!(findings[0].row, Some(2));
    assert_eq!(findings[99].row, Some(101));
}

#[test]
fn truncation_applies_per_tab_before_flattening() {
    let ctx = context();
    let catalogs = vec![
        TabCatalog::all_records("grants", vec![Rule::new("name", Check::NotBlank)]),
        TabCatalog::all_records("loans", vec![Rule::new("name", Check::NotBlank)]),
    ];
    let mut records: Vec<Record> = (0..150).map(|i| Record::new("grants", i + 2)).collect();
    records.push(Record::new("loans", 2));
    let findings = validate_report(&catalogs, records, &ctx);
    // 100 from grants, then the loans finding survives the flattening.
    assert_eq!(findings.len(), 101);
    assert_eq!(findings[100].tab, "loans");
}

#[test]
fn validation_is_idempotent() {
    let ctx = context();
    let catalogs = vec![
        TabCatalog::single_record("cover", "The cover sheet is missing", cover_rules()),
        TabCatalog::all_records(
            "grants",
            vec![
                Rule::new("amount", Check::PositiveNumber),
                Rule::new("total", Check::sum(["amount", "fees"])),
            ],
        ),
    ];
    let records = || {
        vec![
            Record::new("cover", 2).with_field("name", "").with_field("date", "bad"),
            Record::new("grants", 2)
                .with_field("amount", -1.0)
                .with_field("total", 10.0)
                .with_field("fees", 1.0),
            Record::new("grants", 3).with_field("amount", 5.0).with_field("total", 5.0),
        ]
    };
    let first = validate_report(&catalogs, records(), &ctx);
    let second = validate_report(&catalogs, records(), &ctx);
    assert_eq!(first, second);
    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn strict_orchestration_rejects_unconfigured_tabs() {
    let ctx = context();
    let catalogs = vec![TabCatalog::all_records("grants", vec![])];
    let records = vec![Record::new("grants", 2), Record::new("mystery", 2)];
    let err = validate_report_strict(&catalogs, records, &ctx).unwrap_err();
    assert!(matches!(err, FinrepError::UnknownTab(tab) if tab == "mystery"));

    let records = vec![Record::new("grants", 2)];
    assert!(validate_report_strict(&catalogs, records, &ctx).unwrap().is_empty());
}

#[test]
fn catalogs_round_trip_through_serde() {
    let catalog = TabCatalog::single_record(
        "cover",
        "The cover sheet is missing",
        vec![
            Rule::new("project id", Check::matches_file_part("project id")),
            Rule::new("date", Check::ValidDate).date_value(),
            Rule::new("status", Check::dropdown_includes("project status"))
                .with_tags(["monthly"])
                .with_message("Status {} is not a valid selection"),
            Rule::new(
                "cumulative amount",
                Check::cumulative_equal(
                    "amount",
                    finrep_validate::SummaryFilter::equals("award type", "grants"),
                ),
            ),
            Rule::new("name", Check::when_us("country", Check::NotBlank)),
        ],
    );
    let json = serde_json::to_string(&catalog).expect("serialize catalog");
    let round: TabCatalog = serde_json::from_str(&json).expect("deserialize catalog");
    assert_eq!(round, catalog);
    assert!(matches!(round.cardinality, Cardinality::SingleRecord { .. }));
}
