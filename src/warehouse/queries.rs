use crate::warehouse::TableRef;

// The table must already exist; columns missing from the JSON rows are written as NULL.
pub fn insert_json_rows(table: &TableRef) -> String {
    let qualified = format!("\"{}\".\"{}\"", table.dataset, table.table);
    format!(
        r#"
INSERT INTO {qualified}
SELECT * FROM jsonb_populate_recordset(NULL::{qualified}, $1);
"#
    )
}
