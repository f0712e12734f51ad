use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use wastewater_dashboard::data::model::SelectedTable;

const ROW_HEIGHT: f32 = 18.0;

/// Grid view of the year column and the enabled series.
pub fn series_table(ui: &mut Ui, table: &SelectedTable) {
    if table.row_count() == 0 {
        ui.weak("No rows.");
        return;
    }

    let header = table.header();
    TableBuilder::new(ui)
        .id_salt("series_table")
        .striped(true)
        .column(Column::auto().at_least(60.0))
        .columns(Column::remainder().at_least(120.0), table.columns.len())
        .max_scroll_height(240.0)
        .header(ROW_HEIGHT + 2.0, |mut row| {
            for title in &header {
                row.col(|ui| {
                    ui.strong(*title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, table.row_count(), |mut row| {
                let i = row.index();
                row.col(|ui| {
                    ui.label(table.years[i].to_string());
                });
                for column in &table.columns {
                    row.col(|ui| {
                        match column.values[i] {
                            Some(v) => ui.label(format!("{v:.2}")),
                            None => ui.weak("–"),
                        };
                    });
                }
            });
        });
}
