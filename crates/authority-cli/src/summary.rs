//! Table rendering for `authctl` output.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use authority_broker::{ChoiceAuthorityService, RegistrySummary};
use authority_model::{Choices, Confidence};

pub fn print_registry_summary(
    summary: &RegistrySummary,
    authorities: &[String],
    service: &ChoiceAuthorityService,
) -> anyhow::Result<()> {
    println!("Bindings: {}", summary.bindings);
    println!("Authorities: {}", summary.authorities);
    println!("Forms: {}", summary.forms);
    println!("Controlled fields: {}", summary.controlled_fields);
    println!(
        "Backends: {} value-pairs, {} vocabulary",
        summary.pairs_backends, summary.vocabulary_backends
    );
    if authorities.is_empty() {
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Authority"), header_cell("Fields")]);
    apply_table_style(&mut table);
    for authority in authorities {
        let fields = service.fields_for_authority(authority)?;
        table.add_row(vec![
            Cell::new(authority)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(fields.join(", ")),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn print_choices_page(choices: &Choices) {
    println!(
        "Confidence: {}  (start {}, total {}{})",
        confidence_label(choices.confidence),
        choices.start,
        choices.total,
        if choices.more { ", more" } else { "" },
    );
    if choices.values.is_empty() {
        println!("No candidates.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Key"),
        header_cell("Value"),
        header_cell("Label"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, choice) in choices.values.iter().enumerate() {
        let selected = choices.default_selected == Some(index);
        let marker = if selected {
            Cell::new(format!("{index} *"))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(index)
        };
        table.add_row(vec![
            marker,
            key_cell(choice.authority.as_deref()),
            Cell::new(&choice.value),
            Cell::new(&choice.label),
        ]);
    }
    println!("{table}");
}

fn confidence_label(confidence: Confidence) -> String {
    format!("{} ({})", confidence.symbol(), confidence.code())
}

fn key_cell(key: Option<&str>) -> Cell {
    match key {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
