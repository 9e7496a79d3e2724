use crate::model::ResultSet;
use serde_json::Value;
use std::collections::HashSet;

/// Value written in place of SQL NULL.
pub const EMPTY_VALUE: &str = "";

/// Make a result set safe to ship as records.
///
/// NULL cells become [`EMPTY_VALUE`] and rows shorter than the header are padded
/// with it. A column name seen before is renamed to `name_<index>`, index being
/// its zero-based position; if that is taken too the suffix is applied again.
pub fn normalize(rs: ResultSet) -> ResultSet {
    let width = rs.columns.len();
    let columns = dedupe_columns(rs.columns);

    let rows = rs
        .rows
        .into_iter()
        .map(|row| {
            let mut cells: Vec<Value> = row
                .into_iter()
                .take(width)
                .map(|v| match v {
                    Value::Null => Value::String(EMPTY_VALUE.to_string()),
                    other => other,
                })
                .collect();
            cells.resize(width, Value::String(EMPTY_VALUE.to_string()));
            cells
        })
        .collect();

    ResultSet { columns, rows }
}

fn dedupe_columns(columns: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(columns.len());
    let mut out = Vec::with_capacity(columns.len());

    for (idx, name) in columns.into_iter().enumerate() {
        let mut candidate = name;
        while seen.contains(&candidate) {
            candidate = format!("{}_{}", candidate, idx);
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duplicate_columns_get_positional_suffix() {
        let rs = ResultSet::new(
            vec!["A".into(), "A".into()],
            vec![vec![json!(1), json!(2)], vec![json!(3), json!(4)]],
        );
        let out = normalize(rs);
        assert_eq!(out.columns, vec!["A", "A_1"]);
        let records = out.to_records();
        assert_eq!(records[0]["A"], json!(1));
        assert_eq!(records[0]["A_1"], json!(2));
        assert_eq!(records[1]["A_1"], json!(4));
    }

    #[test]
    fn suffix_collisions_are_resolved() {
        let rs = ResultSet::new(
            vec!["ID".into(), "ID".into(), "ID_1".into(), "NOME".into(), "ID".into()],
            vec![],
        );
        let cols = normalize(rs).columns;
        assert_eq!(cols, vec!["ID", "ID_1", "ID_1_2", "NOME", "ID_4"]);
        let unique: HashSet<&String> = cols.iter().collect();
        assert_eq!(unique.len(), cols.len());
    }

    #[test]
    fn nulls_become_empty() {
        let rs = ResultSet::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![Value::Null, json!("x")],
                vec![json!(0), Value::Null],
                vec![json!(true)],
            ],
        );
        let out = normalize(rs);
        for record in out.to_records() {
            assert!(record.values().all(|v| !v.is_null()));
        }
        assert_eq!(out.rows[0][0], json!(""));
        assert_eq!(out.rows[2], vec![json!(true), json!("")]);
    }

    #[test]
    fn values_pass_through_untouched() {
        let rs = ResultSet::new(
            vec!["count".into(), "ratio".into(), "ok".into()],
            vec![vec![json!(5), json!(0.25), json!(false)]],
        );
        let out = normalize(rs.clone());
        assert_eq!(out, rs);
        assert_eq!(
            serde_json::to_value(out.to_records()).unwrap(),
            json!([{"count": 5, "ratio": 0.25, "ok": false}])
        );
    }
}
