use super::SchemaContext;
use crate::model::{ProcedureInfo, TableData};
use std::fmt::Write;

pub fn render_compact(ctx: &SchemaContext) -> String {
    let mut out = String::new();
    for table in &ctx.tables {
        let cols: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        let _ = writeln!(out, "{} ({})", table.name, cols.join(", "));
    }
    push_procedures(&mut out, &ctx.procedures);
    out
}

pub fn render_annotated(ctx: &SchemaContext) -> String {
    let mut out = String::new();
    for table in &ctx.tables {
        let cols: Vec<String> = table
            .columns
            .iter()
            .map(|c| annotate_column(table, &c.name, c.primary_key))
            .collect();
        let _ = writeln!(out, "{} ({})", table.name, cols.join(", "));
    }
    push_procedures(&mut out, &ctx.procedures);
    out
}

fn annotate_column(table: &TableData, column: &str, primary_key: bool) -> String {
    let mut s = column.to_string();
    if primary_key {
        s.push_str(" PK");
    }
    for fk in table.foreign_keys.iter().filter(|fk| fk.column_name == column) {
        let _ = write!(
            s,
            " FK->{}.{}",
            fk.foreign_table_name, fk.foreign_column_name
        );
    }
    s
}

pub fn render_ddl(ctx: &SchemaContext) -> String {
    let mut out = String::new();
    for table in &ctx.tables {
        let defs: Vec<String> = table
            .columns
            .iter()
            .map(|c| {
                let mut def = format!("    {}", c.name);
                if !c.data_type.is_empty() {
                    let _ = write!(def, " {}", c.data_type);
                }
                if !c.nullable {
                    def.push_str(" NOT NULL");
                }
                if let Some(default) = &c.default {
                    let _ = write!(def, " DEFAULT {}", default);
                }
                def
            })
            .collect();
        let _ = write!(
            out,
            "CREATE TABLE {} (\n{}\n);\n\n",
            table.name,
            defs.join(",\n")
        );
    }
    push_procedures(&mut out, &ctx.procedures);
    out
}

/// `name(param type, ...)`, parameter markers already stripped by the inspector.
pub fn render_procedure(proc: &ProcedureInfo) -> String {
    let params: Vec<String> = proc
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.name, p.data_type))
        .collect();
    format!("{}({})", proc.name, params.join(", "))
}

fn push_procedures(out: &mut String, procedures: &[ProcedureInfo]) {
    for proc in procedures {
        out.push_str(&render_procedure(proc));
        out.push('\n');
    }
}
