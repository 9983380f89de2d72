use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use rusqlite::{Connection, params};
use std::sync::OnceLock;
use unicode_width::UnicodeWidthStr;

const OP_COLUMN_MAX: usize = 60;

fn strip_ansi(s: &str) -> String {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    let re = ANSI.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static regex"));
    re.replace_all(s, "").into_owned()
}

fn visible_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(s).as_str())
}

fn color_for_operation(op: &str) -> Colour {
    match op {
        "startShift" => Colour::Green,
        "saveDeparture" | "saveLastDrop" => Colour::Cyan,
        "saveShiftEnd" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "import" | "export" => Colour::Yellow,
        "init" => Colour::RGB(255, 153, 51),
        other if other.ends_with("_rejected") => Colour::Red,
        _ => Colour::White,
    }
}

/// Cut to `max` display columns, marking the cut with "...".
fn truncate_to_width(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > max.saturating_sub(3) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub struct LogLogic;

impl LogLogic {
    /// Audit entries, oldest first, optionally restricted to one operation
    /// and to the most recent `last` lines.
    pub fn entries(
        conn: &Connection,
        operation: Option<&str>,
        last: Option<usize>,
    ) -> AppResult<Vec<LogEntry>> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log
             WHERE ?1 IS NULL OR operation = ?1
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![operation], |row| {
            Ok(LogEntry {
                id: row.get(0)?,
                date: row.get(1)?,
                operation: row.get(2)?,
                target: row.get(3)?,
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }

        if let Some(n) = last {
            let skip = entries.len().saturating_sub(n);
            entries.drain(..skip);
        }
        Ok(entries)
    }

    pub fn print_log(conn: &Connection, operation: Option<&str>, last: Option<usize>) -> AppResult<()> {
        let entries = Self::entries(conn, operation, last)?;
        if entries.is_empty() {
            println!("No log entries.");
            return Ok(());
        }

        let rendered: Vec<(String, String)> = entries
            .iter()
            .map(|e| {
                let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| e.date.clone());

                let plain = if e.target.is_empty() {
                    e.operation.clone()
                } else {
                    format!("{} ({})", e.operation, e.target)
                };
                let plain = truncate_to_width(&plain, OP_COLUMN_MAX);

                // only the operation word is coloured
                let color = color_for_operation(&e.operation);
                let colored = match plain.split_once(' ') {
                    Some((op, rest)) => format!("{} {}", color.paint(op), rest),
                    None => color.paint(plain.as_str()).to_string(),
                };
                (date, colored)
            })
            .collect();

        let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);
        let date_w = rendered.iter().map(|(d, _)| d.width()).max().unwrap_or(10);
        let op_w = rendered
            .iter()
            .map(|(_, op)| visible_width(op))
            .max()
            .unwrap_or(10)
            .min(OP_COLUMN_MAX);

        println!("📜 Internal log:\n");

        for (e, (date, op)) in entries.iter().zip(rendered) {
            let padding = " ".repeat(op_w.saturating_sub(visible_width(&op)));
            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                date,
                op,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::log::ttlog;
    use crate::db::pool::DbPool;

    #[test]
    fn ansi_codes_do_not_count_towards_width() {
        let painted = Colour::Green.paint("startShift").to_string();
        assert_eq!(visible_width(&painted), "startShift".len());
    }

    #[test]
    fn long_targets_are_truncated() {
        let long = "x".repeat(80);
        let cut = truncate_to_width(&long, OP_COLUMN_MAX);
        assert_eq!(UnicodeWidthStr::width(cut.as_str()), OP_COLUMN_MAX);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn entries_filter_by_operation_and_tail() {
        let pool = DbPool::in_memory().unwrap();
        ttlog(&pool.conn, "startShift", "R1", "D1").unwrap();
        ttlog(&pool.conn, "saveDeparture", "R1", "09:00").unwrap();
        ttlog(&pool.conn, "startShift", "R2", "D2").unwrap();

        let starts = LogLogic::entries(&pool.conn, Some("startShift"), None).unwrap();
        assert_eq!(starts.len(), 2);

        let tail = LogLogic::entries(&pool.conn, Some("startShift"), Some(1)).unwrap();
        assert_eq!(tail[0].target, "R2");
    }
}
