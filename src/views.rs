use std::cmp::Ordering;

use serde::Serialize;

use crate::error::PipelineError;
use crate::table::{group_rows, mean, safe_div, DataTable};

/// One bar group of the quota-vs-credit view: summed quota and credit for a
/// business unit.
#[derive(Clone, Debug, Serialize)]
pub struct QuotaCreditRow {
    #[serde(rename = "BU")]
    pub bu: String,
    #[serde(rename = "FY25 Quota")]
    pub quota: f64,
    #[serde(rename = "FY25 Credit")]
    pub credit: f64,
}

/// Mean attainment-per-tenure for a business unit. `None` when no record in
/// the unit has a defined ratio.
#[derive(Clone, Debug, Serialize)]
pub struct TenurePerformanceRow {
    #[serde(rename = "BU")]
    pub bu: String,
    #[serde(rename = "Performance per Tenure")]
    pub performance_per_tenure: Option<f64>,
}

/// One row of the top-managers view, keyed by (business unit, manager).
#[derive(Clone, Debug, Serialize)]
pub struct ManagerRow {
    #[serde(rename = "BU")]
    pub bu: String,
    #[serde(rename = "Manager")]
    pub manager: String,
    #[serde(rename = "FY25 Attainment")]
    pub attainment: Option<f64>,
    #[serde(rename = "Tenure (Years)")]
    pub tenure: Option<f64>,
    #[serde(rename = "Team Size")]
    pub team_size: usize,
    #[serde(rename = "Performance per Tenure")]
    pub performance_per_tenure: Option<f64>,
}

/// Quota achievement percentage for a business unit. `None` when the summed
/// quota is zero.
#[derive(Clone, Debug, Serialize)]
pub struct AchievementRow {
    #[serde(rename = "BU")]
    pub bu: String,
    #[serde(rename = "Quota Achievement %")]
    pub achievement_pct: Option<f64>,
}

pub const TOP_MANAGER_LIMIT: usize = 10;

/// View A: group by `BU`, sum `FY25 Quota` and `FY25 Credit`, descending by
/// summed quota. Missing cells contribute nothing to the sums.
pub fn quota_credit_by_unit(table: &DataTable) -> Result<Vec<QuotaCreditRow>, PipelineError> {
    let bu = table.require_column("BU")?;
    let quota = table.require_column("FY25 Quota")?;
    let credit = table.require_column("FY25 Credit")?;

    let mut rows: Vec<QuotaCreditRow> = group_rows(table, &[bu])
        .into_iter()
        .map(|(key, members)| QuotaCreditRow {
            bu: key.into_iter().next().unwrap_or_default(),
            quota: members
                .iter()
                .filter_map(|&r| table.value(r, quota).as_number())
                .sum(),
            credit: members
                .iter()
                .filter_map(|&r| table.value(r, credit).as_number())
                .sum(),
        })
        .collect();

    rows.sort_by(|a, b| b.quota.partial_cmp(&a.quota).unwrap_or(Ordering::Equal));
    Ok(rows)
}

/// View B: per-row attainment / tenure, averaged per `BU`, descending.
///
/// A row whose tenure is zero or missing has no defined ratio; such rows are
/// excluded from the unit mean. A unit with no defined ratio at all yields
/// `None` and sorts last.
pub fn performance_per_tenure_by_unit(
    table: &DataTable,
) -> Result<Vec<TenurePerformanceRow>, PipelineError> {
    let bu = table.require_column("BU")?;
    let attainment = table.require_column("FY25 Attainment")?;
    let tenure = table.require_column("Tenure (Years)")?;

    let mut rows: Vec<TenurePerformanceRow> = group_rows(table, &[bu])
        .into_iter()
        .map(|(key, members)| TenurePerformanceRow {
            bu: key.into_iter().next().unwrap_or_default(),
            performance_per_tenure: mean(members.iter().map(|&r| {
                safe_div(
                    table.value(r, attainment).as_number(),
                    table.value(r, tenure).as_number(),
                )
            })),
        })
        .collect();

    rows.sort_by(|a, b| cmp_desc_none_last(a.performance_per_tenure, b.performance_per_tenure));
    Ok(rows)
}

/// View C: group by (`BU`, `Manager`); mean attainment, mean tenure, record
/// count, and the mean-attainment / mean-tenure ratio; descending by that
/// ratio, top 10 rows.
///
/// The sort is stable, so equal ratios keep first-seen group order.
pub fn top_managers(table: &DataTable) -> Result<Vec<ManagerRow>, PipelineError> {
    let bu = table.require_column("BU")?;
    let manager = table.require_column("Manager")?;
    let attainment = table.require_column("FY25 Attainment")?;
    let tenure = table.require_column("Tenure (Years)")?;

    let mut rows: Vec<ManagerRow> = group_rows(table, &[bu, manager])
        .into_iter()
        .map(|(key, members)| {
            let mut key = key.into_iter();
            let mean_attainment =
                mean(members.iter().map(|&r| table.value(r, attainment).as_number()));
            let mean_tenure = mean(members.iter().map(|&r| table.value(r, tenure).as_number()));
            ManagerRow {
                bu: key.next().unwrap_or_default(),
                manager: key.next().unwrap_or_default(),
                attainment: mean_attainment,
                tenure: mean_tenure,
                team_size: members.len(),
                performance_per_tenure: safe_div(mean_attainment, mean_tenure),
            }
        })
        .collect();

    rows.sort_by(|a, b| cmp_desc_none_last(a.performance_per_tenure, b.performance_per_tenure));
    rows.truncate(TOP_MANAGER_LIMIT);
    Ok(rows)
}

/// View D: quota achievement percentage per unit, from View A's sums;
/// credit / quota x 100, descending, undefined (zero quota) last.
pub fn quota_achievement_by_unit(table: &DataTable) -> Result<Vec<AchievementRow>, PipelineError> {
    let mut rows: Vec<AchievementRow> = quota_credit_by_unit(table)?
        .into_iter()
        .map(|row| AchievementRow {
            bu: row.bu,
            achievement_pct: safe_div(Some(row.credit), Some(row.quota)).map(|r| r * 100.0),
        })
        .collect();

    rows.sort_by(|a, b| cmp_desc_none_last(a.achievement_pct, b.achievement_pct));
    Ok(rows)
}

// Descending order with undefined values last; ties stay in input order
// because Vec::sort_by is stable.
fn cmp_desc_none_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn record(
        bu: &str,
        manager: &str,
        name: &str,
        quota: f64,
        credit: f64,
        attainment: Value,
        tenure: Value,
    ) -> Vec<Value> {
        vec![
            Value::Text(name.into()),
            Value::Text(manager.into()),
            Value::Text(bu.into()),
            Value::Number(quota),
            Value::Number(credit),
            attainment,
            tenure,
        ]
    }

    fn sample_table() -> DataTable {
        let mut t = DataTable::new(vec![
            "Name".into(),
            "Manager".into(),
            "BU".into(),
            "FY25 Quota".into(),
            "FY25 Credit".into(),
            "FY25 Attainment".into(),
            "Tenure (Years)".into(),
        ]);
        t.push_row(record(
            "East",
            "A",
            "x1",
            100.0,
            50.0,
            Value::Number(50.0),
            Value::Number(2.0),
        ));
        t.push_row(record(
            "East",
            "A",
            "x2",
            100.0,
            100.0,
            Value::Number(100.0),
            Value::Number(2.0),
        ));
        t
    }

    #[test]
    fn quota_credit_sums_per_unit() {
        let rows = quota_credit_by_unit(&sample_table()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bu, "East");
        assert_eq!(rows[0].quota, 200.0);
        assert_eq!(rows[0].credit, 150.0);
    }

    #[test]
    fn quota_credit_preserves_totals() {
        let mut t = sample_table();
        t.push_row(record(
            "West",
            "B",
            "y1",
            300.0,
            120.0,
            Value::Number(40.0),
            Value::Number(4.0),
        ));
        let rows = quota_credit_by_unit(&t).unwrap();
        let quota_total: f64 = rows.iter().map(|r| r.quota).sum();
        let credit_total: f64 = rows.iter().map(|r| r.credit).sum();
        assert_eq!(quota_total, 500.0);
        assert_eq!(credit_total, 270.0);
    }

    #[test]
    fn quota_credit_sorts_descending_by_quota() {
        let mut t = sample_table();
        t.push_row(record(
            "West",
            "B",
            "y1",
            900.0,
            100.0,
            Value::Number(40.0),
            Value::Number(4.0),
        ));
        let rows = quota_credit_by_unit(&t).unwrap();
        assert_eq!(rows[0].bu, "West");
        assert_eq!(rows[1].bu, "East");
    }

    #[test]
    fn missing_column_error_names_the_column() {
        let mut t = sample_table();
        t.columns[3] = "FY99 Quota".into();
        let err = quota_credit_by_unit(&t).unwrap_err();
        assert_eq!(err.to_string(), "missing required column: FY25 Quota");
    }

    #[test]
    fn top_managers_scenario_numbers() {
        let rows = top_managers(&sample_table()).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!((row.bu.as_str(), row.manager.as_str()), ("East", "A"));
        assert_eq!(row.attainment, Some(75.0));
        assert_eq!(row.tenure, Some(2.0));
        assert_eq!(row.team_size, 2);
        assert_eq!(row.performance_per_tenure, Some(37.5));
    }

    #[test]
    fn top_managers_caps_at_ten_rows_descending() {
        let mut t = DataTable::new(sample_table().columns);
        for i in 0..14 {
            t.push_row(record(
                "East",
                &format!("M{}", i),
                "n",
                10.0,
                5.0,
                Value::Number(10.0 * (i + 1) as f64),
                Value::Number(1.0),
            ));
        }
        let rows = top_managers(&t).unwrap();
        assert_eq!(rows.len(), TOP_MANAGER_LIMIT);
        for pair in rows.windows(2) {
            assert!(pair[0].performance_per_tenure >= pair[1].performance_per_tenure);
        }
        // Highest ratio first: manager M13 with attainment 140.
        assert_eq!(rows[0].manager, "M13");
    }

    #[test]
    fn top_managers_ties_keep_first_seen_order() {
        let mut t = DataTable::new(sample_table().columns);
        for m in ["Z", "A", "Q"] {
            t.push_row(record(
                "East",
                m,
                "n",
                10.0,
                5.0,
                Value::Number(50.0),
                Value::Number(2.0),
            ));
        }
        let rows = top_managers(&t).unwrap();
        let order: Vec<&str> = rows.iter().map(|r| r.manager.as_str()).collect();
        assert_eq!(order, vec!["Z", "A", "Q"]);
    }

    #[test]
    fn zero_tenure_row_is_excluded_from_unit_mean() {
        let mut t = sample_table();
        t.push_row(record(
            "East",
            "A",
            "x3",
            0.0,
            0.0,
            Value::Number(80.0),
            Value::Number(0.0),
        ));
        let rows = performance_per_tenure_by_unit(&t).unwrap();
        // Mean over the two defined ratios (25 and 50) only.
        assert_eq!(rows[0].performance_per_tenure, Some(37.5));
    }

    #[test]
    fn unit_with_no_defined_ratio_sorts_last_as_blank() {
        let mut t = sample_table();
        t.push_row(record(
            "Void",
            "B",
            "z1",
            10.0,
            5.0,
            Value::Number(80.0),
            Value::Number(0.0),
        ));
        let rows = performance_per_tenure_by_unit(&t).unwrap();
        assert_eq!(rows.last().unwrap().bu, "Void");
        assert_eq!(rows.last().unwrap().performance_per_tenure, None);
    }

    #[test]
    fn achievement_scenario_and_zero_quota() {
        let mut t = sample_table();
        t.push_row(record(
            "Void",
            "B",
            "z1",
            0.0,
            40.0,
            Value::Number(80.0),
            Value::Number(1.0),
        ));
        let rows = quota_achievement_by_unit(&t).unwrap();
        let east = rows.iter().find(|r| r.bu == "East").unwrap();
        assert_eq!(east.achievement_pct, Some(75.0));
        let void = rows.iter().find(|r| r.bu == "Void").unwrap();
        assert_eq!(void.achievement_pct, None);
        assert_eq!(rows.last().unwrap().bu, "Void");
    }
}
