//! Text rendering of a finished sales lookup

use crate::models::{SaleRecord, SalesReport};

const HEADERS: [&str; 4] = ["Price", "Date", "Quantity", "Condition"];

pub fn render_report(report: &SalesReport) -> String {
    let mut out = String::new();

    if report.fell_back {
        out.push_str(&format!(
            "***No search results found for condition: '{}'. Now displaying recent sales without condition filter.***\n",
            report.query.condition
        ));
    }
    out.push_str(&format!(
        "\nSales Data for: {} #{}, condition: {}\n",
        report.query.name, report.query.catalog_number, report.condition_shown
    ));
    out.push_str(&format!("Market Price: {}\n", report.candidate.market_price));
    out.push_str(&render_table(&report.sales));
    out
}

/// Bordered table with the columns Price, Date, Quantity, Condition.
pub fn render_table(sales: &[SaleRecord]) -> String {
    let rows: Vec<[&str; 4]> = sales
        .iter()
        .map(|sale| [&*sale.price, &*sale.date, &*sale.quantity, &*sale.condition])
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = widths
        .iter()
        .fold(String::from("+"), |mut line, width| {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
            line
        });

    let mut lines = vec![border.clone(), table_line(&HEADERS, &widths), border.clone()];
    lines.extend(rows.iter().map(|row| table_line(row, &widths)));
    if !rows.is_empty() {
        lines.push(border);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn table_line(cells: &[&str; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths)
        .fold(String::from("|"), |mut line, (cell, width)| {
            let pad = width - cell.chars().count();
            line.push_str(&format!(" {cell}{} |", " ".repeat(pad)));
            line
        })
}
