use insta::assert_snapshot;
use meterbook::cli::output::{self, MessageKind, OutputPreferences};
use meterbook::cli::table::{Table, TableColumn};

fn plain() -> OutputPreferences {
    OutputPreferences {
        plain_mode: true,
        color: false,
    }
}

#[test]
fn plain_table_uses_ascii_rule() {
    output::set_preferences(plain());
    let mut table = Table::new(vec![
        TableColumn::left("Customer"),
        TableColumn::right("Water"),
        TableColumn::right("Total"),
    ]);
    table.push(vec!["Alice".into(), "12.00".into(), "$263.33".into()]);
    table.push(vec!["Bob".into(), "0.00".into(), "$46.72".into()]);

    assert_snapshot!(table.render(), @r"
    Customer  Water    Total
    ------------------------
    Alice     12.00  $263.33
    Bob        0.00   $46.72
    ");
}

#[test]
fn long_names_are_truncated() {
    output::set_preferences(plain());
    let mut table = Table::new(vec![
        TableColumn::left("Customer").max_width(10),
        TableColumn::right("Total"),
    ]);
    table.push(vec!["Bartholomew Jones".into(), "$1.00".into()]);

    assert_snapshot!(table.render(), @r"
    Customer    Total
    -----------------
    Bartholom…  $1.00
    ");
}

#[test]
fn plain_messages_drop_icons() {
    let prefs = plain();
    colored::control::set_override(false);
    assert_eq!(
        output::format_message(MessageKind::Warning, "careful", &prefs),
        "WARNING: careful"
    );
    assert_eq!(
        output::format_message(MessageKind::Section, " Summary ", &prefs),
        "=== Summary ==="
    );
}
