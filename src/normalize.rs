use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::table::DataTable;

/// Columns the aggregator treats as measures; the normalizer coerces these
/// to numeric, cell by cell.
pub const NUMERIC_COLUMNS: [&str; 4] = [
    "FY25 Quota",
    "FY25 Credit",
    "FY25 Attainment",
    "Tenure (Years)",
];

lazy_static! {
    /// Known header variants folded onto canonical names. This is data, not
    /// logic: new variants go here, aggregation never changes. Keys are
    /// matched after the whitespace trim, so spacing-only variants are
    /// already folded by the time the map applies.
    static ref RENAME_MAP: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("FY 25 Quota", "FY25 Quota");
        m.insert("FY 25 Credit", "FY25 Credit");
        m.insert("FY24 Attainment2", "FY24 Attainment");
        m
    };
}

/// Reconciles uploaded headers with the canonical schema and coerces the
/// designated measure columns to numeric.
///
/// - Leading/trailing whitespace is stripped from every column name.
/// - Known header variants are renamed via the rename map; anything
///   unrecognized passes through unchanged. Deliberate tolerance policy,
///   not validation.
/// - Each [`NUMERIC_COLUMNS`] entry present in the table is coerced cell by
///   cell; unparseable cells become `Value::Missing` rather than aborting.
///   A designated column absent after renaming is tolerated here; the
///   aggregator reports it as a missing required column.
pub fn normalize(table: &mut DataTable) {
    for name in table.columns.iter_mut() {
        let trimmed = name.trim();
        let canonical = RENAME_MAP
            .get(trimmed)
            .copied()
            .unwrap_or(trimmed)
            .to_string();
        if *name != canonical {
            *name = canonical;
        }
    }

    for col_name in NUMERIC_COLUMNS {
        let Some(c) = table.column_index(col_name) else {
            log::warn!("designated numeric column '{}' not present after rename", col_name);
            continue;
        };
        for row in table.rows.iter_mut() {
            row[c] = row[c].coerce_numeric();
        }
    }
}
