use std::path::PathBuf;

use rafflegen_validate::{
    AmountOutcome, RosterViolation, ValidationError, check_amounts_file, validate_roster_file,
};

fn temp_file(label: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rafflegen_validate_{label}_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("saved.lua");
    std::fs::write(&path, contents).expect("write fixture");
    path
}

const REORDERED: &str = r#"RaffleManager_SavedVariables =
{
    ["Default"] = {
        ["@HandWritten"] = {
            ["$AccountWide"] = {
                ["roster_data"] = {
                    [1] = {
                        ["purchases10"] = 4,
                        ["rank"] = "Officer",
                        ["sales30"] = 100,
                        ["account"] = "@Someone",
                        ["purchases30"] = 3,
                        ["sales10"] = 50,
                    },
                    [2] = {
                        ["sales10"] = 101,
                        ["joined"] = 1700000000,
                        ["sales30"] = 100,
                        ["purchases30"] = 9,
                        ["purchases10"] = 9,
                    },
                },
                ["mail_data"] = {
                    [1] = {
                        ["amount"] = 2000,
                        ["id"] = "2812345678",
                    },
                },
                ["ticket_cost"] = 1000,
            },
        },
    },
}
"#;

#[test]
fn reordered_roster_fields_are_still_checked() {
    let path = temp_file("reordered", REORDERED);
    let report = validate_roster_file(&path).expect("validate");
    assert_eq!(report.entries, 2);
    assert_eq!(
        report.violations,
        vec![
            RosterViolation::Purchases { entry: 1, purchases10: 4, purchases30: 3 },
            RosterViolation::Sales { entry: 2, sales10: 101, sales30: 100 },
        ]
    );
    assert!(!report.is_consistent());
}

#[test]
fn ticket_cost_after_mail_data_is_found() {
    let path = temp_file("amounts", REORDERED);
    let outcome = check_amounts_file(&path).expect("check");
    let AmountOutcome::Checked(report) = outcome else {
        panic!("expected a report");
    };
    assert_eq!(report.ticket_cost, 1000);
    assert_eq!(report.valid, 1);
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir()
        .join(format!("rafflegen_missing_{}", uuid::Uuid::new_v4()))
        .join("nope.lua");
    let roster = validate_roster_file(&path).expect_err("missing file");
    assert!(matches!(roster, ValidationError::Io { .. }));
    let amounts = check_amounts_file(&path).expect_err("missing file");
    assert!(amounts.to_string().contains("nope.lua"));
}

#[test]
fn malformed_file_reports_position() {
    let path = temp_file("malformed", "Saved =\n{\n    [\"a\"] = ,\n}\n");
    let err = validate_roster_file(&path).expect_err("malformed");
    assert!(matches!(err, ValidationError::Core(_)));
    assert!(err.to_string().contains("line 3"), "{err}");
}

#[test]
fn hand_reordered_and_sparse_roster_indices_are_checked() {
    let path = temp_file(
        "sparse",
        r#"RaffleManager_SavedVariables =
{
    ["Default"] = {
        ["@HandEdited"] = {
            ["$AccountWide"] = {
                ["roster_data"] = {
                    [3] = {
                        ["sales10"] = 9,
                        ["sales30"] = 1,
                        ["purchases10"] = 0,
                        ["purchases30"] = 0,
                    },
                    [1] = {
                        ["sales10"] = 8,
                        ["sales30"] = 1,
                        ["purchases10"] = 0,
                        ["purchases30"] = 0,
                    },
                },
            },
        },
    },
}
"#,
    );
    let report = validate_roster_file(&path).expect("validate");
    assert_eq!(report.entries, 2);
    assert_eq!(
        report.violations,
        vec![
            RosterViolation::Sales { entry: 1, sales10: 8, sales30: 1 },
            RosterViolation::Sales { entry: 2, sales10: 9, sales30: 1 },
        ]
    );
    assert!(!report.to_string().contains("All entries are logically consistent"));
}
