use proptest::prelude::*;
use rafflegen_core::{Key, Table, Value, parse_document, parse_value, render_document, render_value};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<String>().prop_map(Value::Str),
        any::<i64>().prop_map(Value::Int),
        (-1.0e9_f64..1.0e9).prop_map(Value::Float),
        any::<bool>().prop_map(Value::Bool),
    ]
}

// Empty sequences render as `{}` and read back as empty tables, so the
// generated sequences are never empty.
fn value_tree() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(Value::Array),
            prop::collection::vec((any::<String>(), inner), 0..4).prop_map(|entries| {
                Value::Table(
                    entries
                        .into_iter()
                        .map(|(key, value)| (Key::Str(key), value))
                        .collect(),
                )
            }),
        ]
    })
}

proptest! {
    #[test]
    fn rendered_values_parse_back_unchanged(value in value_tree()) {
        let text = render_value(&value);
        let parsed = parse_value(&text).expect("rendered text should parse");
        prop_assert_eq!(parsed, value);
    }

    #[test]
    fn rendering_is_byte_identical_for_equal_inputs(value in value_tree()) {
        prop_assert_eq!(render_value(&value), render_value(&value.clone()));
    }
}

#[test]
fn document_round_trip_keeps_name_and_order() {
    let account = Table::new()
        .with("version", 1_i64)
        .with("ticket_cost", 500_i64)
        .with(
            "mail_data",
            Value::Array(vec![Value::Table(
                Table::new()
                    .with("subject", "raffle \"tix\"")
                    .with("id", "2812345678")
                    .with("amount", 1500_i64)
                    .with("user", "@BoldMage"),
            )]),
        );
    let root = Value::Table(Table::new().with(
        "Default",
        Table::new().with("@CalmDruid", Table::new().with("$AccountWide", account)),
    ));

    let text = render_document("RaffleManager_SavedVariables", &root);
    assert!(text.starts_with("RaffleManager_SavedVariables =\n{\n"));
    assert!(text.ends_with("}\n"));
    assert!(text.contains(r#"["subject"] = "raffle \"tix\"","#));

    let document = parse_document(&text).expect("parse document");
    assert_eq!(document.name, "RaffleManager_SavedVariables");
    assert_eq!(document.value, root);
}

#[test]
fn empty_mapping_and_sequence_share_token() {
    let mapping = render_value(&Value::Table(Table::new()));
    let sequence = render_value(&Value::Array(Vec::new()));
    assert_eq!(mapping, "{}");
    assert_eq!(mapping, sequence);
}
