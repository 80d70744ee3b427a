//! Displays the persisted performance records as a table.

use crate::config::AppConfig;
use crate::core::{InvestmentRecord, RecordStore};
use crate::store::FjallStore;
use crate::ui;
use anyhow::Result;
use comfy_table::Cell;

pub fn render_table(records: &[InvestmentRecord]) -> String {
    let mut records: Vec<&InvestmentRecord> = records.iter().collect();
    records.sort_by(|a, b| {
        a.order
            .unwrap_or(i64::MAX)
            .cmp(&b.order.unwrap_or(i64::MAX))
            .then_with(|| a.ticker.cmp(&b.ticker))
    });

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Ticker"),
        ui::header_cell("Label"),
        ui::header_cell("6M Change"),
        ui::header_cell("Source"),
        ui::header_cell("Fetched"),
    ]);

    for record in records {
        let change = record
            .perf_6m_percent
            .map_or_else(|| ui::na_cell(false), ui::change_cell);
        let source = ui::format_optional_cell(record.source, |s| s.to_string());
        let fetched = ui::format_optional_cell(record.last_fetched, |t| {
            t.format("%Y-%m-%d %H:%M UTC").to_string()
        });

        table.add_row(vec![
            Cell::new(&record.ticker),
            Cell::new(record.label.as_deref().unwrap_or("")),
            change,
            source,
            fetched,
        ]);
    }

    table.to_string()
}

pub async fn run(_config_path: Option<&str>) -> Result<()> {
    let store = FjallStore::open(&AppConfig::default_data_path()?)?;
    display_records(&store).await
}

pub async fn display_records(store: &dyn RecordStore) -> Result<()> {
    let records = store.list().await?;
    if records.is_empty() {
        println!("No records yet. Run `sixmo refresh` first.");
        return Ok(());
    }

    println!(
        "{}\n",
        ui::style_text("Six-month performance", ui::StyleType::Title)
    );
    println!("{}", render_table(&records));
    Ok(())
}
