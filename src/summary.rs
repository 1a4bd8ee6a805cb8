//! Headline statistics and risk distribution

use crate::chart::format_thousands;
use crate::model::{ClientTable, Quadrant, RiskCode};
use serde::Serialize;
use std::fmt;

/// Count and share of one risk code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskShare {
    pub risk: RiskCode,
    pub count: usize,
    /// Percentage of all clients, 0-100
    pub percentage: f64,
}

impl fmt::Display for RiskShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} clients ({:.1}%)",
            self.risk.label(),
            self.count,
            self.percentage
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub client_count: usize,
    pub total_revenue: f64,
    pub high_risk_count: usize,
    /// `None` for an empty table
    pub mean_strategic_importance: Option<f64>,
    /// Only codes present in the data, most frequent first
    pub risk_distribution: Vec<RiskShare>,
    pub quadrant_counts: Vec<(Quadrant, usize)>,
}

impl SummaryStats {
    pub fn total_revenue_display(&self) -> String {
        format!("£{}", format_thousands(self.total_revenue))
    }

    pub fn mean_importance_display(&self) -> String {
        match self.mean_strategic_importance {
            Some(mean) => format!("{mean:.1}"),
            None => "n/a".to_string(),
        }
    }
}

/// Aggregate a validated table
pub fn summarize(table: &ClientTable) -> SummaryStats {
    let records = &table.records;
    let client_count = records.len();

    let total_revenue: f64 = records.iter().map(|r| r.fy_revenue).sum();
    let high_risk_count = records
        .iter()
        .filter(|r| r.relationship_risk == RiskCode::Red)
        .count();

    let mean_strategic_importance = if records.is_empty() {
        None
    } else {
        let sum: f64 = records.iter().map(|r| r.strategic_importance).sum();
        Some(sum / client_count as f64)
    };

    // First-appearance order, then a stable sort keeps ties in that order
    let mut counts: Vec<(RiskCode, usize)> = Vec::new();
    for record in records {
        match counts
            .iter_mut()
            .find(|(code, _)| *code == record.relationship_risk)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((record.relationship_risk.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let risk_distribution = counts
        .into_iter()
        .map(|(risk, count)| RiskShare {
            risk,
            count,
            percentage: count as f64 / client_count as f64 * 100.0,
        })
        .collect();

    SummaryStats {
        client_count,
        total_revenue,
        high_risk_count,
        mean_strategic_importance,
        risk_distribution,
        quadrant_counts: table.quadrant_counts().to_vec(),
    }
}
