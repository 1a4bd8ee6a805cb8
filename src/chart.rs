//! Renderer-agnostic chart specification for the client matrix
//!
//! Everything here is derived deterministically from the validated table: the
//! layout constants are fixed, and the per-point encoding depends only on the
//! records themselves.

use crate::model::{ClientRecord, ClientTable, Quadrant, RiskCode, MIDPOINT};
use serde::Serialize;

pub const CHART_TITLE: &str = "Client Categorisation Matrix";
pub const CHART_WIDTH: u32 = 900;
pub const CHART_HEIGHT: u32 = 700;

/// Domain of both axes
pub const AXIS_RANGE: [f64; 2] = [0.5, 5.5];
pub const TICK_SPACING: f64 = 1.0;

pub const QUADRANT_OPACITY: f64 = 0.15;

/// Diameter given to the client with the largest revenue share
pub const MAX_BUBBLE_SIZE: f64 = 60.0;
/// Smallest diameter drawn, so zero-share clients stay visible
pub const MIN_BUBBLE_SIZE: f64 = 6.0;

pub const LEGEND_TITLE: &str = "Relationship Risk";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub range: [f64; 2],
    pub tick_spacing: f64,
}

/// Shaded background rectangle of one quadrant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantRegion {
    pub quadrant: Quadrant,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub fill_color: &'static str,
    pub opacity: f64,
}

pub const QUADRANT_REGIONS: [QuadrantRegion; 4] = [
    QuadrantRegion {
        quadrant: Quadrant::Bronze,
        x0: 0.5,
        y0: 3.0,
        x1: 3.0,
        y1: 5.5,
        fill_color: "lightgray",
        opacity: QUADRANT_OPACITY,
    },
    QuadrantRegion {
        quadrant: Quadrant::Platinum,
        x0: 3.0,
        y0: 3.0,
        x1: 5.5,
        y1: 5.5,
        fill_color: "lightblue",
        opacity: QUADRANT_OPACITY,
    },
    QuadrantRegion {
        quadrant: Quadrant::Silver,
        x0: 0.5,
        y0: 0.5,
        x1: 3.0,
        y1: 3.0,
        fill_color: "lightyellow",
        opacity: QUADRANT_OPACITY,
    },
    QuadrantRegion {
        quadrant: Quadrant::Gold,
        x0: 3.0,
        y0: 0.5,
        x1: 5.5,
        y1: 3.0,
        fill_color: "lightgreen",
        opacity: QUADRANT_OPACITY,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Solid line separating the quadrants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividerLine {
    pub orientation: Orientation,
    pub position: f64,
    pub color: &'static str,
    pub width: f64,
    pub opacity: f64,
    pub dash: &'static str,
}

/// Text placed at a data coordinate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font_size: u32,
    pub color: &'static str,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub code: RiskCode,
    pub label: String,
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: &'static str,
    pub entries: Vec<LegendEntry>,
}

/// Visual encoding of one client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    /// Spend potential
    pub x: f64,
    /// Strategic importance
    pub y: f64,
    pub quadrant: Quadrant,
    pub risk: RiskCode,
    /// `None` when the risk code has no defined color
    pub color: Option<&'static str>,
    pub size: f64,
    pub hover_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: &'static str,
    pub width: u32,
    pub height: u32,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub regions: Vec<QuadrantRegion>,
    pub dividers: Vec<DividerLine>,
    pub quadrant_labels: Vec<Annotation>,
    pub corner_labels: Vec<Annotation>,
    pub legend: Legend,
    pub points: Vec<ChartPoint>,
}

impl ChartSpec {
    /// Serialize to pretty-printed JSON for downstream renderers
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Label anchor for a quadrant: the centroid of its region
pub fn quadrant_label(quadrant: Quadrant) -> Annotation {
    let (x, y, color) = match quadrant {
        Quadrant::Bronze => (1.75, 4.25, "gray"),
        Quadrant::Platinum => (4.25, 4.25, "darkblue"),
        Quadrant::Silver => (1.75, 1.75, "gray"),
        Quadrant::Gold => (4.25, 1.75, "darkgreen"),
    };
    Annotation {
        x,
        y,
        text: quadrant.name().to_string(),
        font_size: 16,
        color,
        bold: true,
    }
}

fn corner_label(x: f64, y: f64, text: &str) -> Annotation {
    Annotation {
        x,
        y,
        text: text.to_string(),
        font_size: 12,
        color: "black",
        bold: true,
    }
}

fn divider(orientation: Orientation) -> DividerLine {
    DividerLine {
        orientation,
        position: MIDPOINT,
        color: "darkgray",
        width: 2.0,
        opacity: 0.7,
        dash: "solid",
    }
}

/// Bubble diameter for a revenue share.
///
/// Area grows linearly with the share, the largest share maps to
/// [`MAX_BUBBLE_SIZE`] and nothing goes below [`MIN_BUBBLE_SIZE`].
pub fn bubble_size(share: f64, max_share: f64) -> f64 {
    if share <= 0.0 || max_share <= 0.0 {
        return MIN_BUBBLE_SIZE;
    }
    (MAX_BUBBLE_SIZE * (share / max_share).sqrt()).clamp(MIN_BUBBLE_SIZE, MAX_BUBBLE_SIZE)
}

/// Round to a whole number and group digits by thousands: `1234567.8` -> `1,234,568`
pub fn format_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 && digits != "0" {
        grouped.insert(0, '-');
    }
    grouped
}

pub fn hover_text(record: &ClientRecord) -> String {
    format!(
        "<b>{}</b><br>Strategic Importance: {}<br>Spend Potential: {}<br>\
         Relationship Risk: {}<br>FY25 Revenue: £{}<br>% of Total Revenue: {:.1}%",
        record.name,
        record.strategic_importance,
        record.spend_potential,
        record.relationship_risk,
        format_thousands(record.fy_revenue),
        record.pct_of_total_revenue,
    )
}

fn legend(table: &ClientTable) -> Legend {
    let mut entries: Vec<LegendEntry> = Vec::new();
    for record in &table.records {
        let risk = &record.relationship_risk;
        if entries.iter().any(|entry| &entry.code == risk) {
            continue;
        }
        entries.push(LegendEntry {
            code: risk.clone(),
            label: risk.label().to_string(),
            color: risk.color(),
        });
    }
    Legend {
        title: LEGEND_TITLE,
        entries,
    }
}

/// Build the full chart specification for a validated table.
///
/// An empty table yields the fixed layout with no points.
pub fn build_chart_spec(table: &ClientTable) -> ChartSpec {
    let max_share = table
        .records
        .iter()
        .map(|record| record.pct_of_total_revenue)
        .fold(0.0_f64, f64::max);

    let points = table
        .records
        .iter()
        .map(|record| ChartPoint {
            name: record.name.clone(),
            x: record.spend_potential,
            y: record.strategic_importance,
            quadrant: record.quadrant(),
            risk: record.relationship_risk.clone(),
            color: record.relationship_risk.color(),
            size: bubble_size(record.pct_of_total_revenue, max_share),
            hover_text: hover_text(record),
        })
        .collect();

    ChartSpec {
        title: CHART_TITLE,
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
        x_axis: AxisSpec {
            title: "SPEND POTENTIAL",
            subtitle: "(how much budget available to spend with the agency?)",
            range: AXIS_RANGE,
            tick_spacing: TICK_SPACING,
        },
        y_axis: AxisSpec {
            title: "STRATEGIC IMPORTANCE",
            subtitle: "(how important is this account to the agency?)",
            range: AXIS_RANGE,
            tick_spacing: TICK_SPACING,
        },
        regions: QUADRANT_REGIONS.to_vec(),
        dividers: vec![
            divider(Orientation::Vertical),
            divider(Orientation::Horizontal),
        ],
        quadrant_labels: [
            Quadrant::Bronze,
            Quadrant::Platinum,
            Quadrant::Silver,
            Quadrant::Gold,
        ]
        .into_iter()
        .map(quadrant_label)
        .collect(),
        corner_labels: vec![
            corner_label(5.7, 0.3, "HIGH"),
            corner_label(0.3, 0.3, "LOW"),
            corner_label(0.3, 5.7, "HIGH"),
            corner_label(0.3, 0.8, "LOW"),
        ],
        legend: legend(table),
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::classify;

    fn record(name: &str, importance: f64, spend: f64, risk: &str, share: f64) -> ClientRecord {
        ClientRecord {
            name: name.to_string(),
            strategic_importance: importance,
            spend_potential: spend,
            relationship_risk: RiskCode::parse(risk),
            fy_revenue: 12345.0,
            pct_of_total_revenue: share,
        }
    }

    #[test]
    fn test_fixed_layout() {
        let spec = build_chart_spec(&ClientTable::default());

        assert_eq!(spec.x_axis.range, [0.5, 5.5]);
        assert_eq!(spec.y_axis.range, [0.5, 5.5]);
        assert_eq!(spec.x_axis.tick_spacing, 1.0);

        let bronze = &spec.regions[0];
        assert_eq!(bronze.quadrant, Quadrant::Bronze);
        assert_eq!(
            (bronze.x0, bronze.y0, bronze.x1, bronze.y1, bronze.fill_color, bronze.opacity),
            (0.5, 3.0, 3.0, 5.5, "lightgray", 0.15)
        );
        let gold = &spec.regions[3];
        assert_eq!(
            (gold.quadrant, gold.x0, gold.y0, gold.x1, gold.y1, gold.fill_color),
            (Quadrant::Gold, 3.0, 0.5, 5.5, 3.0, "lightgreen")
        );

        assert_eq!(spec.dividers.len(), 2);
        assert!(spec
            .dividers
            .iter()
            .all(|d| d.position == 3.0 && d.dash == "solid" && d.color == "darkgray"));
    }

    #[test]
    fn test_regions_agree_with_classifier() {
        for region in &QUADRANT_REGIONS {
            let cx = (region.x0 + region.x1) / 2.0;
            let cy = (region.y0 + region.y1) / 2.0;
            assert_eq!(classify(cx, cy), region.quadrant);
        }
    }

    #[test]
    fn test_quadrant_labels_sit_at_centroids() {
        let spec = build_chart_spec(&ClientTable::default());
        let anchors: Vec<(f64, f64, &str)> = spec
            .quadrant_labels
            .iter()
            .map(|a| (a.x, a.y, a.text.as_str()))
            .collect();
        assert_eq!(
            anchors,
            vec![
                (1.75, 4.25, "Bronze"),
                (4.25, 4.25, "Platinum"),
                (1.75, 1.75, "Silver"),
                (4.25, 1.75, "Gold"),
            ]
        );
    }

    #[test]
    fn test_bubble_size_scaling() {
        assert_eq!(bubble_size(28.0, 28.0), MAX_BUBBLE_SIZE);
        assert_eq!(bubble_size(0.0, 28.0), MIN_BUBBLE_SIZE);
        assert_eq!(bubble_size(0.0, 0.0), MIN_BUBBLE_SIZE);
        assert_eq!(bubble_size(7.0, 28.0), 30.0);

        let shares = [0.0, 0.1, 1.0, 2.0, 5.0, 13.0, 28.0];
        let sizes: Vec<f64> = shares.iter().map(|s| bubble_size(*s, 28.0)).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        assert!(sizes.iter().all(|s| *s >= MIN_BUBBLE_SIZE));
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(26500.0), "26,500");
        assert_eq!(format_thousands(1234567.8), "1,234,568");
        assert_eq!(format_thousands(-45000.0), "-45,000");
    }

    #[test]
    fn test_hover_text() {
        let text = hover_text(&record("Dan Air", 4.0, 5.0, "A", 4.0));
        assert_eq!(
            text,
            "<b>Dan Air</b><br>Strategic Importance: 4<br>Spend Potential: 5<br>\
             Relationship Risk: A<br>FY25 Revenue: £12,345<br>% of Total Revenue: 4.0%"
        );
    }

    #[test]
    fn test_points_carry_encoding() {
        let table = ClientTable::new(vec![
            record("big", 5.0, 5.0, "G", 20.0),
            record("none", 1.0, 4.0, "R", 0.0),
            record("odd", 2.0, 2.0, "Purple", 5.0),
        ]);
        let spec = build_chart_spec(&table);

        assert_eq!(spec.points.len(), 3);
        let big = &spec.points[0];
        assert_eq!((big.x, big.y), (5.0, 5.0));
        assert_eq!(big.quadrant, Quadrant::Platinum);
        assert_eq!(big.color, Some("#00AA00"));
        assert_eq!(big.size, MAX_BUBBLE_SIZE);

        let none = &spec.points[1];
        assert_eq!(none.quadrant, Quadrant::Gold);
        assert_eq!(none.size, MIN_BUBBLE_SIZE);

        let odd = &spec.points[2];
        assert_eq!(odd.color, None);
        assert_eq!(odd.risk.code(), "Purple");
        assert!(odd.hover_text.contains("Relationship Risk: Purple"));

        let codes: Vec<&str> = spec.legend.entries.iter().map(|e| e.code.code()).collect();
        assert_eq!(codes, vec!["G", "R", "Purple"]);
        assert_eq!(spec.legend.entries[2].label, "Purple");
    }

    #[test]
    fn test_empty_table_has_no_points() {
        let spec = build_chart_spec(&ClientTable::default());
        assert!(spec.points.is_empty());
        assert!(spec.legend.entries.is_empty());
        assert_eq!(spec.regions.len(), 4);
    }

    #[test]
    fn test_json_output() {
        let table = ClientTable::new(vec![record("x", 3.0, 3.0, "R", 1.0)]);
        let json: serde_json::Value =
            serde_json::from_str(&build_chart_spec(&table).to_json().unwrap()).unwrap();

        assert_eq!(json["points"][0]["quadrant"], "Platinum");
        assert_eq!(json["points"][0]["color"], "#FF4444");
        assert_eq!(json["dividers"][0]["orientation"], "vertical");
        assert_eq!(json["regions"][1]["fill_color"], "lightblue");
    }
}
