// src/schema/sql.rs

use super::types::Column;

/// Map a declared column type token onto a DuckDB column type.
///
/// Covers:
/// - UNKNOWN                                  → VARCHAR
/// - TINYINT / SMALLINT / BIGINT / HUGEINT    → same
/// - INT, INTEGER, INT4                       → INTEGER
/// - FLOAT, REAL, FLOAT4                      → FLOAT
/// - DOUBLE*, NUMBER, NUMERIC*, DECIMAL*      → DOUBLE
/// - BOOL, BOOLEAN                            → BOOLEAN
/// - DATE                                     → DATE
/// - TIMESTAMP*, DATETIME                     → TIMESTAMP
/// - TIME*                                    → TIME
/// - BLOB, BYTEA, RAW*                        → BLOB
/// - TEXT, STRING, CHAR*, VARCHAR*, CLOB      → VARCHAR
/// - fallback                                 → VARCHAR
pub fn map_to_duckdb_type(ty: &str) -> &'static str {
    let upper = ty.trim().to_ascii_uppercase();
    if upper == "TINYINT" {
        "TINYINT"
    } else if upper == "SMALLINT" {
        "SMALLINT"
    } else if upper == "BIGINT" || upper == "INT8" {
        "BIGINT"
    } else if upper == "HUGEINT" {
        "HUGEINT"
    } else if upper == "INT" || upper == "INTEGER" || upper == "INT4" {
        "INTEGER"
    } else if upper == "FLOAT" || upper == "REAL" || upper == "FLOAT4" {
        "FLOAT"
    } else if upper.starts_with("DOUBLE")
        || upper == "NUMBER"
        || upper.starts_with("NUMERIC")
        || upper.starts_with("DECIMAL")
    {
        "DOUBLE"
    } else if upper == "BOOL" || upper == "BOOLEAN" {
        "BOOLEAN"
    } else if upper == "DATE" {
        "DATE"
    } else if upper.starts_with("TIMESTAMP") || upper == "DATETIME" {
        "TIMESTAMP"
    } else if upper.starts_with("TIME") {
        "TIME"
    } else if upper == "BLOB" || upper == "BYTEA" || upper.starts_with("RAW") {
        "BLOB"
    } else {
        // UNKNOWN, TEXT, CHAR(n), VARCHAR(n), CLOB and anything else
        "VARCHAR"
    }
}

/// Double-quote an identifier, doubling any embedded quote.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `"name" TYPE` fragment used by CREATE and ALTER statements.
pub fn column_definition(col: &Column) -> String {
    format!("{} {}", quote_ident(&col.name), map_to_duckdb_type(&col.ty))
}

pub fn create_table_sql(table: &str, columns: &[Column]) -> String {
    let defs: Vec<String> = columns
        .iter()
        .map(|c| format!("\t{}", column_definition(c)))
        .collect();
    format!("CREATE TABLE {} (\n{}\n)", quote_ident(table), defs.join(",\n"))
}

pub fn add_column_sql(table: &str, column: &Column) -> String {
    format!(
        "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {}",
        quote_ident(table),
        column_definition(column)
    )
}

/// Parameterised INSERT; every value is bound as text and cast by the engine.
pub fn insert_sql(table: &str, columns: &[Column]) -> String {
    let names: Vec<String> = columns.iter().map(|c| quote_ident(&c.name)).collect();
    let params = vec!["?::VARCHAR"; columns.len()];
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names.join(", "),
        params.join(", ")
    )
}
