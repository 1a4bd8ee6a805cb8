//! Schema validation: required columns and per-cell normalization

use crate::error::DataError;
use crate::model::{ClientRecord, ClientTable, RiskCode};
use polars::prelude::*;
use std::ops::RangeInclusive;
use tracing::{debug, warn};

/// How the cells of a recognized column are normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text, must not be empty
    Text,
    /// A 1-5 rating; any finite number is accepted
    Score,
    /// Relationship risk code
    Risk,
    /// Non-negative money amount
    Amount,
    /// Non-negative percentage, optionally suffixed with `%`
    Percent,
}

/// A recognized input column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

pub const CLIENT_NAME: ColumnSpec = ColumnSpec {
    name: "Client_Name",
    kind: ColumnKind::Text,
};
pub const STRATEGIC_IMPORTANCE: ColumnSpec = ColumnSpec {
    name: "Strategic_Importance_(1-5)",
    kind: ColumnKind::Score,
};
pub const SPEND_POTENTIAL: ColumnSpec = ColumnSpec {
    name: "Spend_Potential_(1-5)",
    kind: ColumnKind::Score,
};
pub const RELATIONSHIP_RISK: ColumnSpec = ColumnSpec {
    name: "Relationship_Risk_(R/A/G)",
    kind: ColumnKind::Risk,
};
pub const FY_REVENUE: ColumnSpec = ColumnSpec {
    name: "FY25_Revenue",
    kind: ColumnKind::Amount,
};
pub const PCT_OF_TOTAL_REVENUE: ColumnSpec = ColumnSpec {
    name: "%_of_Total_Revenue",
    kind: ColumnKind::Percent,
};

/// Every required column, in the order they are reported when missing
pub const COLUMNS: [ColumnSpec; 6] = [
    CLIENT_NAME,
    STRATEGIC_IMPORTANCE,
    SPEND_POTENTIAL,
    RELATIONSHIP_RISK,
    FY_REVENUE,
    PCT_OF_TOTAL_REVENUE,
];

/// Nominal range of the two score columns
pub const SCORE_RANGE: RangeInclusive<f64> = 1.0..=5.0;

/// Strip a trailing `%` (if any) and parse the rest as a float.
///
/// `"28%"` and `"28"` both give `28.0`.
pub fn normalize_percent(raw: &str) -> Option<f64> {
    parse_finite(raw.trim().trim_end_matches('%'))
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl ColumnSpec {
    /// Normalize a text cell (client name)
    pub fn text(&self, row: usize, raw: Option<&str>) -> Result<String, DataError> {
        self.present(row, raw).map(str::to_string)
    }

    /// Normalize a risk-code cell; unrecognized codes pass through
    pub fn risk(&self, row: usize, raw: Option<&str>) -> Result<RiskCode, DataError> {
        self.present(row, raw).map(RiskCode::parse)
    }

    /// Normalize a numeric cell according to this column's kind
    pub fn number(&self, row: usize, raw: Option<&str>) -> Result<f64, DataError> {
        let raw = self.present(row, raw)?;
        let parsed = match self.kind {
            ColumnKind::Percent => normalize_percent(raw),
            _ => parse_finite(raw),
        };
        let value = parsed.ok_or_else(|| DataError::Parse {
            column: self.name.to_string(),
            row,
            value: raw.to_string(),
        })?;

        if matches!(self.kind, ColumnKind::Amount | ColumnKind::Percent) && value < 0.0 {
            return Err(DataError::NegativeValue {
                column: self.name.to_string(),
                row,
                value,
            });
        }
        Ok(value)
    }

    fn present<'a>(&self, row: usize, raw: Option<&'a str>) -> Result<&'a str, DataError> {
        raw.map(str::trim)
            .filter(|cell| !cell.is_empty())
            .ok_or_else(|| DataError::MissingValue {
                column: self.name.to_string(),
                row,
            })
    }
}

/// Required columns absent from `df`, in [`COLUMNS`] order
pub fn missing_columns(df: &DataFrame) -> Vec<String> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    COLUMNS
        .iter()
        .filter(|spec| !present.iter().any(|name| name == spec.name))
        .map(|spec| spec.name.to_string())
        .collect()
}

/// Validate a loaded table and normalize it into client records.
///
/// Reports every missing column at once; otherwise stops at the first cell
/// that cannot be normalized. The input frame is only read.
pub fn validate(df: &DataFrame) -> Result<ClientTable, DataError> {
    let missing = missing_columns(df);
    if !missing.is_empty() {
        warn!(missing = ?missing, "table is missing required columns");
        return Err(DataError::MissingColumns { missing });
    }

    let names = text_cells(df, CLIENT_NAME.name)?;
    let importance = text_cells(df, STRATEGIC_IMPORTANCE.name)?;
    let spend = text_cells(df, SPEND_POTENTIAL.name)?;
    let risk = text_cells(df, RELATIONSHIP_RISK.name)?;
    let revenue = text_cells(df, FY_REVENUE.name)?;
    let share = text_cells(df, PCT_OF_TOTAL_REVENUE.name)?;

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let row = idx + 1;
        let record = ClientRecord {
            name: CLIENT_NAME.text(row, names[idx].as_deref())?,
            strategic_importance: STRATEGIC_IMPORTANCE.number(row, importance[idx].as_deref())?,
            spend_potential: SPEND_POTENTIAL.number(row, spend[idx].as_deref())?,
            relationship_risk: RELATIONSHIP_RISK.risk(row, risk[idx].as_deref())?,
            fy_revenue: FY_REVENUE.number(row, revenue[idx].as_deref())?,
            pct_of_total_revenue: PCT_OF_TOTAL_REVENUE.number(row, share[idx].as_deref())?,
        };
        flag_unusual_values(&record);
        records.push(record);
    }

    debug!(rows = records.len(), "validated client table");
    Ok(ClientTable::new(records))
}

/// Read a column as text cells regardless of its inferred dtype
fn text_cells(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, DataError> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let cells = series
        .str()?
        .into_iter()
        .map(|cell| cell.map(str::to_string))
        .collect();
    Ok(cells)
}

fn flag_unusual_values(record: &ClientRecord) {
    for (column, score) in [
        (STRATEGIC_IMPORTANCE.name, record.strategic_importance),
        (SPEND_POTENTIAL.name, record.spend_potential),
    ] {
        if !SCORE_RANGE.contains(&score) {
            warn!(client = %record.name, column, score, "score outside 1-5, classified as given");
        }
    }
    if !record.relationship_risk.is_recognized() {
        warn!(
            client = %record.name,
            code = record.relationship_risk.code(),
            "unrecognized relationship risk code"
        );
    }
}
