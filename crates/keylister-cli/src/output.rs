use keylister_core::RunSummary;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn print_summary(summary: &RunSummary) {
    print!("{}", render_summary(summary));
}

const HEADERS: [&str; 5] = ["ACCOUNT", "ROLE", "USERS", "WITH KEYS", "KEYS"];

fn render_summary(summary: &RunSummary) -> String {
    let mut rows: Vec<[String; 5]> = summary
        .accounts
        .iter()
        .map(|a| {
            [
                a.account_id.clone(),
                a.role_name.clone(),
                a.users.to_string(),
                a.users_with_keys.to_string(),
                a.access_keys.to_string(),
            ]
        })
        .collect();
    rows.push([
        "total".to_string(),
        String::new(),
        summary.total_users.to_string(),
        summary.users_with_keys.to_string(),
        summary.access_keys.to_string(),
    ]);

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &widths, HEADERS.iter().copied());
    push_line(&mut out, &widths, widths.map(|w| "-".repeat(w)).iter().map(String::as_str));
    for row in &rows {
        push_line(&mut out, &widths, row.iter().map(String::as_str));
    }
    out
}

fn push_line<'a>(out: &mut String, widths: &[usize; 5], cells: impl Iterator<Item = &'a str>) {
    let line = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
