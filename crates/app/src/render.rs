//! Plain-text rendering of the tracker screens.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use stockroom_inventory::{StockRow, Summary, TransactionKind, TransactionLogEntry};

use crate::tracker::Tracker;

pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%d %b %Y %H:%M").to_string()
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        "Items: {}  Low/out: {}  Received: {}  Issued: {}",
        summary.total_items, summary.low_or_out, summary.total_in, summary.total_out
    )
}

/// Only shown when something needs reordering.
pub fn render_low_stock_banner(summary: &Summary) -> Option<String> {
    match summary.low_or_out {
        0 => None,
        1 => Some("! 1 item low or out of stock".to_string()),
        n => Some(format!("! {n} items low or out of stock")),
    }
}

pub fn render_stock_table(rows: &[StockRow<'_>]) -> String {
    if rows.is_empty() {
        return "No items.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:<20} {:>10} {:>6}  {:<6}  {}",
        "Name", "Category", "Qty", "Min", "Status", "Last activity"
    );

    for row in rows {
        let item = row.item;
        let qty = format!("{} {}", item.qty, item.unit.label());
        let last = row
            .last_activity
            .map(|t| format!("{} {} ({})", t.kind.as_str(), t.qty, format_date(t.date)))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<24} {:<20} {:>10} {:>6}  {:<6}  {}",
            truncate(&item.name, 24),
            item.category.label(),
            qty,
            item.min_stock,
            row.status.label(),
            last
        );
    }
    out
}

pub fn render_transaction_log(entries: &[TransactionLogEntry<'_>]) -> String {
    if entries.is_empty() {
        return "No transactions.\n".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let tx = entry.transaction;
        let sign = match tx.kind {
            TransactionKind::In => '+',
            TransactionKind::Out => '-',
        };
        let unit = entry.unit.map(|u| u.label()).unwrap_or("");
        let _ = write!(
            out,
            "{}  {sign}{} {unit}  {}  by {}",
            format_date(tx.date),
            tx.qty,
            entry.item_name.unwrap_or("(deleted item)"),
            tx.by
        );
        if !tx.note.is_empty() {
            let _ = write!(out, "  [{}]", tx.note);
        }
        out.push('\n');
    }
    out
}

/// Counters, banner, stock table and log in one report.
pub fn render_report(tracker: &Tracker) -> String {
    let summary = tracker.summary();
    let mut out = String::new();

    let _ = writeln!(out, "{}", render_summary(&summary));
    if let Some(banner) = render_low_stock_banner(&summary) {
        let _ = writeln!(out, "{banner}");
    }
    out.push('\n');
    out.push_str(&render_stock_table(&tracker.stock_rows()));
    out.push('\n');
    out.push_str(&render_transaction_log(&tracker.transaction_log()));
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stockroom_core::{ItemId, TransactionId};
    use stockroom_inventory::{Category, Item, StockStatus, Transaction, Unit};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
    }

    #[test]
    fn dates_are_day_month_year_time() {
        assert_eq!(format_date(at()), "09 Mar 2024 14:05");
    }

    #[test]
    fn banner_only_when_needed() {
        let mut summary = Summary::default();
        assert!(render_low_stock_banner(&summary).is_none());
        summary.low_or_out = 2;
        assert_eq!(
            render_low_stock_banner(&summary).unwrap(),
            "! 2 items low or out of stock"
        );
    }

    #[test]
    fn rows_and_log_lines_show_units_and_status() {
        let item = Item {
            id: ItemId::new(),
            name: "A4 Paper".to_string(),
            category: Category::PaperAndFiles,
            unit: Unit::Ream,
            qty: 2,
            min_stock: 5,
            created_at: at(),
        };
        let tx = Transaction {
            id: TransactionId::new(),
            item_id: item.id,
            kind: TransactionKind::Out,
            qty: 3,
            note: "printer room".to_string(),
            by: "Nok".to_string(),
            date: at(),
        };

        let table = render_stock_table(&[StockRow {
            item: &item,
            status: StockStatus::Low,
            last_activity: Some(&tx),
        }]);
        let line = table.lines().nth(1).unwrap();
        assert!(line.starts_with("A4 Paper"));
        assert!(line.contains("2 ream"));
        assert!(line.contains("low"));
        assert!(line.contains("out 3 (09 Mar 2024 14:05)"));

        let log = render_transaction_log(&[TransactionLogEntry {
            transaction: &tx,
            item_name: Some("A4 Paper"),
            unit: Some(Unit::Ream),
        }]);
        assert_eq!(log, "09 Mar 2024 14:05  -3 ream  A4 Paper  by Nok  [printer room]\n");
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("short", 24), "short");
        assert_eq!(truncate("abcdef", 4), "abc~");
    }
}
