use serde_json::Value;
use talk2db_core::ResultSet;

fn cell(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Plain text table with a row-count footer.
pub fn render_table(rs: &ResultSet) -> String {
    let rows: Vec<Vec<String>> = rs
        .rows
        .iter()
        .map(|r| r.iter().map(cell).collect())
        .collect();

    let mut widths: Vec<usize> = rs.columns.iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (i, c) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(c.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let c = cells.get(i).map(String::as_str).unwrap_or("");
                format!("{:<width$}", c, width = *w)
            })
            .collect();
        format!("{}\n", padded.join(" | ").trim_end())
    };

    let mut s = String::new();
    if !rs.columns.is_empty() {
        s.push_str(&line(&rs.columns));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        s.push_str(&format!("{}\n", rule.join("-+-")));
    }
    for row in &rows {
        s.push_str(&line(row));
    }
    let n = rows.len();
    s.push_str(&format!("({} row{})\n", n, if n == 1 { "" } else { "s" }));
    s
}

/// Header plus one record per row.
pub fn render_csv(rs: &ResultSet) -> anyhow::Result<String> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(&rs.columns)?;
    for row in &rs.rows {
        w.write_record(row.iter().map(cell))?;
    }
    let bytes = w
        .into_inner()
        .map_err(|e| anyhow::anyhow!("csv flush failed: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}
