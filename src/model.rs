//! Client records and the fixed-midpoint quadrant classifier

use serde::{Serialize, Serializer};
use std::fmt;

/// Threshold splitting both axes; a score equal to it counts as "high".
pub const MIDPOINT: f64 = 3.0;

/// Relationship health indicator.
///
/// Codes other than R/A/G are kept verbatim so they can still be displayed;
/// they simply have no color and no descriptive label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RiskCode {
    Red,
    Amber,
    Green,
    Other(String),
}

impl RiskCode {
    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "R" => RiskCode::Red,
            "A" => RiskCode::Amber,
            "G" => RiskCode::Green,
            other => RiskCode::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            RiskCode::Red => "R",
            RiskCode::Amber => "A",
            RiskCode::Green => "G",
            RiskCode::Other(code) => code,
        }
    }

    /// Marker color, `None` for unrecognized codes
    pub fn color(&self) -> Option<&'static str> {
        match self {
            RiskCode::Red => Some("#FF4444"),
            RiskCode::Amber => Some("#FFA500"),
            RiskCode::Green => Some("#00AA00"),
            RiskCode::Other(_) => None,
        }
    }

    /// Display label; unrecognized codes fall back to the literal code
    pub fn label(&self) -> &str {
        match self {
            RiskCode::Red => "Red (High Risk)",
            RiskCode::Amber => "Amber (Medium Risk)",
            RiskCode::Green => "Green (Low Risk)",
            RiskCode::Other(code) => code,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, RiskCode::Other(_))
    }
}

impl fmt::Display for RiskCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for RiskCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// The four named bands of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Quadrant {
    /// Low spend, high importance
    Bronze,
    /// Low spend, low importance
    Silver,
    /// High spend, low importance
    Gold,
    /// High spend, high importance
    Platinum,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Bronze,
        Quadrant::Silver,
        Quadrant::Gold,
        Quadrant::Platinum,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Quadrant::Bronze => "Bronze",
            Quadrant::Silver => "Silver",
            Quadrant::Gold => "Gold",
            Quadrant::Platinum => "Platinum",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a client from its two scores.
///
/// Both axes are split at [`MIDPOINT`] with `>=` meaning "high". Scores outside
/// 1..=5 are classified by the same rule, without clamping.
pub fn classify(spend_potential: f64, strategic_importance: f64) -> Quadrant {
    let high_spend = spend_potential >= MIDPOINT;
    let high_importance = strategic_importance >= MIDPOINT;

    match (high_spend, high_importance) {
        (false, true) => Quadrant::Bronze,
        (true, true) => Quadrant::Platinum,
        (false, false) => Quadrant::Silver,
        (true, false) => Quadrant::Gold,
    }
}

/// One validated row of the input table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRecord {
    pub name: String,
    pub strategic_importance: f64,
    pub spend_potential: f64,
    pub relationship_risk: RiskCode,
    pub fy_revenue: f64,
    pub pct_of_total_revenue: f64,
}

impl ClientRecord {
    /// Quadrant for this record, recomputed on every call
    pub fn quadrant(&self) -> Quadrant {
        classify(self.spend_potential, self.strategic_importance)
    }
}

/// A record paired with its derived quadrant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedClient {
    pub name: String,
    pub quadrant: Quadrant,
    pub relationship_risk: RiskCode,
}

/// Validated client table produced by the schema validator
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientTable {
    pub records: Vec<ClientRecord>,
}

impl ClientTable {
    pub fn new(records: Vec<ClientRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Classify every record, preserving input order
    pub fn classify(&self) -> Vec<ClassifiedClient> {
        self.records
            .iter()
            .map(|record| ClassifiedClient {
                name: record.name.clone(),
                quadrant: record.quadrant(),
                relationship_risk: record.relationship_risk.clone(),
            })
            .collect()
    }

    /// Client count per quadrant, in [`Quadrant::ALL`] order
    pub fn quadrant_counts(&self) -> [(Quadrant, usize); 4] {
        let mut counts = Quadrant::ALL.map(|q| (q, 0));
        for record in &self.records {
            let quadrant = record.quadrant();
            if let Some(slot) = counts.iter_mut().find(|(q, _)| *q == quadrant) {
                slot.1 += 1;
            }
        }
        counts
    }
}
