mod common;

use common::{assertion, TestCorpus};
use serde_json::json;

const EMAIL_DOC: &str = "specs/app/tables/fields/email-field.schema.json";
const ACTION_DOC: &str = "specs/app/tables/fields/button-action.schema.json";
const API_DOC: &str = "specs/api/paths/tables/{tableId}/records/get.json";

fn seed(corpus: &TestCorpus) {
    corpus.write_json(
        EMAIL_DOC,
        &json!({
            "$id": "email-field.schema.json",
            "title": "Email Field",
            "x-specs": [
                {
                    "id": "EMAIL-001",
                    "given": "field type is email",
                    "when": "invalid email is submitted",
                    "then": "validation error is returned"
                },
                {
                    "id": "EMAIL-002",
                    "given": "a required email field",
                    "when": "value is omitted",
                    "then": "returns validation error because value is required"
                }
            ]
        }),
    );
    corpus.write_json(
        ACTION_DOC,
        &json!({
            "x-specs": [
                { "id": "BTN-001", "given": "button with invalid action", "when": "saved", "then": "rejected" },
                {
                    "id": "BTN-002",
                    "given": "button with open_url action",
                    "when": "saved",
                    "then": "accepted",
                    "validation": {
                        "setup": { "fieldConfig": { "name": "action", "type": "button" } },
                        "assertions": [
                            { "description": "accepted", "validateConfig": true, "expected": { "action": "open_url" }, "expectError": null }
                        ]
                    }
                }
            ]
        }),
    );
    corpus.write_json(
        API_DOC,
        &json!({ "x-specs": [ { "id": "API-001", "given": "", "when": "", "then": "" } ] }),
    );
}

#[test]
fn full_pipeline_leaves_no_placeholders_or_conflicts() {
    let corpus = TestCorpus::new();
    seed(&corpus);

    let stdout = corpus.run_ok("pipeline", &[]);
    assert!(stdout.contains("=== ADDING VALIDATION BLOCKS TO x-specs ==="));
    assert!(stdout.contains(&format!("{EMAIL_DOC} - Added 2 validation blocks")));

    let email = corpus.read_json(EMAIL_DOC);
    assert_eq!(
        assertion(&email, 0, 0)["expectError"],
        "must be a valid email format"
    );
    assert_eq!(
        assertion(&email, 1, 0)["expectError"],
        "is required and cannot be null or empty"
    );
    assert_eq!(
        assertion(&email, 0, 0)["description"],
        "validation error is returned"
    );
    assert_eq!(assertion(&email, 0, 0)["validateConfig"], true);

    let action = corpus.read_json(ACTION_DOC);
    assert_eq!(
        assertion(&action, 0, 0)["expectError"],
        "action must be one of: update_field, open_url, trigger_automation"
    );
    let success = assertion(&action, 1, 0);
    assert!(success.get("expectError").is_none());
    assert_eq!(success["expected"], json!({ "action": "open_url" }));

    let api = corpus.read_json(API_DOC);
    assert_eq!(assertion(&api, 0, 0)["expectError"], "validation error");

    corpus.run_ok("audit", &[]);
}

#[test]
fn pipeline_preserves_unknown_keys_and_order() {
    let corpus = TestCorpus::new();
    seed(&corpus);
    corpus.run_ok("pipeline", &[]);

    let text = corpus.read_raw(EMAIL_DOC);
    assert!(text.ends_with("}\n"));
    assert!(!text.ends_with("\n\n"));
    let id_pos = text.find("\"$id\"").expect("$id kept");
    let title_pos = text.find("\"title\"").expect("title kept");
    let specs_pos = text.find("\"x-specs\"").expect("x-specs kept");
    assert!(id_pos < title_pos && title_pos < specs_pos);
}

#[test]
fn stages_run_individually_are_idempotent() {
    let corpus = TestCorpus::new();
    seed(&corpus);

    let first = corpus.run_json("annotate");
    assert_eq!(first["stages"][0]["changes"], 4);
    let after_annotate = corpus.read_raw(API_DOC);

    let second = corpus.run_json("annotate");
    assert_eq!(second["stages"][0]["changes"], 0);
    assert_eq!(second["documents_written"], 0);
    assert_eq!(corpus.read_raw(API_DOC), after_annotate);

    let classify = corpus.run_json("classify");
    assert_eq!(classify["stages"][0]["stage"], "classify");
    assert_eq!(classify["stages"][0]["changes"], 5);
    assert_eq!(classify["stages"][0]["fallbacks"], 2);
    assert_eq!(corpus.run_json("classify")["stages"][0]["changes"], 0);

    let reconcile = corpus.run_json("reconcile");
    assert_eq!(reconcile["stages"][0]["changes"], 1);
    assert_eq!(corpus.run_json("reconcile")["stages"][0]["changes"], 0);
}

#[test]
fn dry_run_leaves_documents_untouched() {
    let corpus = TestCorpus::new();
    seed(&corpus);
    let before = corpus.read_raw(EMAIL_DOC);

    let stdout = corpus.run_ok("pipeline", &["--dry-run"]);
    assert!(stdout.contains("Dry run: no files were written."));
    assert!(stdout.contains("Files that would be updated: 3"));
    assert_eq!(corpus.read_raw(EMAIL_DOC), before);
}

#[test]
fn corrupt_document_does_not_abort_the_run() {
    let corpus = TestCorpus::new();
    seed(&corpus);
    corpus.write_raw("specs/app/tables/aaa-broken.schema.json", "{ \"x-specs\": [");

    let output = corpus.run("annotate", &[]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("aaa-broken.schema.json"));
    let email = corpus.read_json(EMAIL_DOC);
    assert!(email["x-specs"][0].get("validation").is_some());
}

#[test]
fn config_file_redirects_roots_and_placeholder() {
    let corpus = TestCorpus::new();
    corpus.write_json(
        "xspecs.json",
        &json!({
            "schema_version": 1,
            "roots": [ { "path": "suite", "suffix": ".spec.json" } ],
            "placeholder_field": { "name": "amount", "type": "number" }
        }),
    );
    corpus.write_json(
        "suite/a.spec.json",
        &json!({ "x-specs": [ { "id": "A", "then": "ok" } ] }),
    );
    corpus.write_json(
        "suite/ignored.json",
        &json!({ "x-specs": [ { "id": "B", "then": "ok" } ] }),
    );

    corpus.run_ok("annotate", &[]);
    let doc = corpus.read_json("suite/a.spec.json");
    assert_eq!(
        doc["x-specs"][0]["validation"]["setup"]["fieldConfig"],
        json!({ "name": "amount", "type": "number" })
    );
    let ignored = corpus.read_json("suite/ignored.json");
    assert!(ignored["x-specs"][0].get("validation").is_none());
}

#[test]
fn unsupported_config_version_fails_the_command() {
    let corpus = TestCorpus::new();
    corpus.write_json("xspecs.json", &json!({ "schema_version": 99 }));
    let output = corpus.run("annotate", &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("schema_version 99"));
}
