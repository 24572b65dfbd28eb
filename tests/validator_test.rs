mod common;

use common::{scripted, term_row, transcript, FakeSource};
use fieldgen::error::Error;
use fieldgen::field::FieldSpec;
use fieldgen::validator::{validate, Table};

fn entered() -> FieldSpec {
    FieldSpec {
        field_label: "Germplasm Summary".to_string(),
        module_name: "tripal_germplasm".to_string(),
        db_name: "local".to_string(),
        cv_name: "local".to_string(),
        cv_term: "germplasm_summary".to_string(),
        field_accession: "30021".to_string(),
        ..Default::default()
    }
}

#[test_log::test]
fn test_offline_skips_every_query_and_question() {
    let mut source = FakeSource::offline();
    // No input: any question would fail with end of input.
    let mut prompt = scripted("");
    let mut spec = entered();

    let outcome = validate(&mut source, &mut prompt, &mut spec).unwrap();

    assert!(outcome.offline);
    assert!(source.queries.is_empty());
    assert_eq!(spec, entered());
    let output = transcript(prompt);
    assert!(output.contains("Skipping vocabulary validation"));
    assert!(output.contains("local:30021"));
}

#[test]
fn test_missing_database_declined_cancels() {
    let mut source = FakeSource::default();
    let mut prompt = scripted("n\n");
    let mut spec = entered();

    let result = validate(&mut source, &mut prompt, &mut spec);

    assert!(matches!(result, Err(Error::UserCancelled)));
    assert_eq!(source.queries, vec!["count db local"]);
}

#[test]
fn test_missing_entries_accepted_skip_cross_reference() {
    let mut source = FakeSource::default();
    source.counts.insert("cv", 1);
    let mut prompt = scripted("y\ny\n");
    let mut spec = entered();

    let outcome = validate(&mut source, &mut prompt, &mut spec).unwrap();

    assert_eq!(outcome.missing, vec![Table::Db, Table::Cvterm]);
    assert!(!outcome.updated);
    assert_eq!(
        source.queries,
        vec!["count db local", "count cv local", "count cvterm germplasm_summary"]
    );
    assert_eq!(spec, entered());
}

#[test]
fn test_unlinked_entities_only_warn() {
    let mut source = FakeSource::with_rows(vec![]);
    let mut prompt = scripted("");
    let mut spec = entered();

    let outcome = validate(&mut source, &mut prompt, &mut spec).unwrap();

    assert!(!outcome.updated);
    assert_eq!(spec, entered());
    assert!(transcript(prompt).contains("not linked"));
}

#[test]
fn test_matching_accession_needs_no_question() {
    let mut source = FakeSource::with_rows(vec![term_row("local", "local", " 30021 ")]);
    let mut prompt = scripted("");
    let mut spec = entered();

    let outcome = validate(&mut source, &mut prompt, &mut spec).unwrap();

    assert!(!outcome.updated);
    assert_eq!(spec.field_accession, "30021");
}

#[test]
fn test_mismatched_accession_declined_is_kept() {
    let mut source = FakeSource::with_rows(vec![term_row("local", "local", "GS:0001")]);
    let mut prompt = scripted("no\n");
    let mut spec = entered();

    let outcome = validate(&mut source, &mut prompt, &mut spec).unwrap();

    assert!(!outcome.updated);
    assert_eq!(spec.field_accession, "30021");
}

#[test]
fn test_mismatched_accession_accepted_is_replaced() {
    let mut source = FakeSource::with_rows(vec![term_row("local", "local", "GS:0001")]);
    let mut prompt = scripted("yes\n");
    let mut spec = entered();

    let outcome = validate(&mut source, &mut prompt, &mut spec).unwrap();

    assert!(outcome.updated);
    assert_eq!(spec.field_accession, "GS:0001");
    assert_eq!(spec.db_name, "local");
}

#[test]
fn test_multiple_rows_pick_one() {
    let mut source = FakeSource::with_rows(vec![
        term_row("local", "local", "30021"),
        term_row("SIO", "sio_terms", "000001"),
    ]);
    let mut prompt = scripted("2\n");
    let mut spec = entered();

    let outcome = validate(&mut source, &mut prompt, &mut spec).unwrap();

    assert!(outcome.updated);
    assert_eq!(spec.db_name, "SIO");
    assert_eq!(spec.cv_name, "sio_terms");
    assert_eq!(spec.field_accession, "000001");

    let output = transcript(prompt);
    assert!(output.contains("[1] local:30021"));
    assert!(output.contains("[2] SIO:000001"));
    assert!(output.contains("[3] Keep my settings"));
    assert!(output.contains("SIO:000001 from vocabulary sio_terms"));
}

#[test]
fn test_multiple_rows_keep_settings() {
    let mut source = FakeSource::with_rows(vec![
        term_row("local", "local", "30021"),
        term_row("SIO", "sio_terms", "000001"),
    ]);
    let mut prompt = scripted("3\n");
    let mut spec = entered();

    let outcome = validate(&mut source, &mut prompt, &mut spec).unwrap();

    assert!(!outcome.updated);
    assert_eq!(spec, entered());
}

#[test]
fn test_query_errors_propagate() {
    let mut source = FakeSource { fail_queries: true, ..Default::default() };
    let mut prompt = scripted("");
    let mut spec = entered();

    let result = validate(&mut source, &mut prompt, &mut spec);
    assert!(matches!(result, Err(Error::Query { .. })));
}
