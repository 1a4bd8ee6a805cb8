//! Integration tests for Client Matrix

use client_matrix::data::{load_csv_file, load_demo, read_csv_bytes};
use client_matrix::{analyze, viz, DataError, Quadrant, RiskCode};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "Client_Name,Strategic_Importance_(1-5),Spend_Potential_(1-5),Relationship_Risk_(R/A/G),FY25_Revenue,%_of_Total_Revenue";

/// Create a CSV file with the required header and the given rows
fn create_test_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

#[test]
fn test_demo_dataset_end_to_end() {
    let df = load_demo().unwrap();
    let analysis = analyze(&df).unwrap();

    assert_eq!(analysis.table.len(), 13);
    assert_eq!(analysis.classified.len(), 13);
    assert_eq!(analysis.chart.points.len(), 13);

    // Every client lands in exactly one of the four bands
    let counts = &analysis.summary.quadrant_counts;
    assert_eq!(
        counts,
        &vec![
            (Quadrant::Bronze, 3),
            (Quadrant::Silver, 4),
            (Quadrant::Gold, 1),
            (Quadrant::Platinum, 5),
        ]
    );
    assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), 13);
}

#[test]
fn test_demo_classification() {
    let analysis = analyze(&load_demo().unwrap()).unwrap();
    let quadrant_of = |name: &str| {
        analysis
            .classified
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.quadrant)
            .unwrap()
    };

    assert_eq!(quadrant_of("Arctic Tours"), Quadrant::Silver);
    assert_eq!(quadrant_of("Crest Hotels"), Quadrant::Bronze);
    assert_eq!(quadrant_of("Finland Tourist Board"), Quadrant::Gold);
    assert_eq!(quadrant_of("Grange Hotel Group"), Quadrant::Platinum);
    assert_eq!(quadrant_of("Monte Carlo Yachting Group"), Quadrant::Platinum);
}

#[test]
fn test_demo_summary() {
    let analysis = analyze(&load_demo().unwrap()).unwrap();
    let summary = &analysis.summary;

    assert_eq!(summary.client_count, 13);
    assert_eq!(summary.total_revenue, 709_000.0);
    assert_eq!(summary.total_revenue_display(), "£709,000");
    assert_eq!(summary.mean_importance_display(), "3.1");

    let red: Vec<&str> = analysis
        .table
        .records
        .iter()
        .filter(|r| r.relationship_risk == RiskCode::Red)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(red, vec!["Arctic Tours", "Grange Hotel Group", "Iceland Tours"]);
    assert_eq!(summary.high_risk_count, 3);

    let lines: Vec<String> = summary
        .risk_distribution
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(
        lines,
        vec![
            "Amber (Medium Risk): 6 clients (46.2%)",
            "Green (Low Risk): 4 clients (30.8%)",
            "Red (High Risk): 3 clients (23.1%)",
        ]
    );
}

#[test]
fn test_demo_chart_encoding() {
    let analysis = analyze(&load_demo().unwrap()).unwrap();
    let points = &analysis.chart.points;

    // Arctic Tours holds the largest share (28%)
    let arctic = &points[0];
    assert_eq!(arctic.name, "Arctic Tours");
    assert_eq!(arctic.size, client_matrix::chart::MAX_BUBBLE_SIZE);
    assert_eq!(arctic.color, Some("#FF4444"));
    assert!(arctic.hover_text.contains("FY25 Revenue: £200,000"));
    assert!(arctic.hover_text.contains("% of Total Revenue: 28.0%"));
    assert!(points.iter().all(|p| p.size <= arctic.size));

    let legend: Vec<&str> = analysis
        .chart
        .legend
        .entries
        .iter()
        .map(|e| e.code.code())
        .collect();
    assert_eq!(legend, vec!["R", "A", "G"]);
}

#[test]
fn test_missing_column_stops_pipeline() {
    let csv = "Client_Name,Strategic_Importance_(1-5),Spend_Potential_(1-5),Relationship_Risk_(R/A/G),%_of_Total_Revenue\n\
               Dan Air,4,5,A,4%\n";
    let df = read_csv_bytes(csv.as_bytes().to_vec()).unwrap();

    match analyze(&df) {
        Err(DataError::MissingColumns { missing }) => {
            assert_eq!(missing, vec!["FY25_Revenue".to_string()]);
        }
        other => panic!("expected missing columns, got {other:?}"),
    }
}

#[test]
fn test_empty_table() {
    let file = create_test_csv(&[]);
    let df = load_csv_file(file.path()).unwrap();
    let analysis = analyze(&df).unwrap();

    assert!(analysis.chart.points.is_empty());
    assert!(analysis.classified.is_empty());
    assert_eq!(analysis.summary.client_count, 0);
    assert_eq!(analysis.summary.mean_strategic_importance, None);
}

#[test]
fn test_percent_with_and_without_suffix() {
    let file = create_test_csv(&["A,3,3,G,1000,28%", "B,3,3,G,1000,28"]);
    let analysis = analyze(&load_csv_file(file.path()).unwrap()).unwrap();

    let shares: Vec<f64> = analysis
        .table
        .records
        .iter()
        .map(|r| r.pct_of_total_revenue)
        .collect();
    assert_eq!(shares, vec![28.0, 28.0]);
}

#[test]
fn test_unparseable_revenue_is_an_error() {
    let file = create_test_csv(&["A,3,3,G,1000,10%", "B,3,3,G,unknown,10%"]);
    let err = analyze(&load_csv_file(file.path()).unwrap()).unwrap_err();

    assert!(matches!(
        err,
        DataError::Parse { ref column, row: 2, .. } if column == "FY25_Revenue"
    ));
}

#[test]
fn test_unrecognized_risk_passes_through() {
    let file = create_test_csv(&["Odd Co,4,4,X,5000,50%", "Fine Co,2,2,G,5000,50%"]);
    let analysis = analyze(&load_csv_file(file.path()).unwrap()).unwrap();

    let odd = &analysis.chart.points[0];
    assert_eq!(odd.risk, RiskCode::Other("X".to_string()));
    assert_eq!(odd.color, None);
    assert_eq!(analysis.summary.risk_distribution[0].to_string(), "X: 1 clients (50.0%)");
}

#[test]
fn test_out_of_range_scores_are_classified() {
    let file = create_test_csv(&["Wild,9,0,A,100,1%"]);
    let analysis = analyze(&load_csv_file(file.path()).unwrap()).unwrap();
    assert_eq!(analysis.classified[0].quadrant, Quadrant::Bronze);
}

#[test]
fn test_demo_renders_to_svg() {
    let analysis = analyze(&load_demo().unwrap()).unwrap();
    let svg = viz::render_svg(&analysis.chart).unwrap();
    assert!(svg.contains("Client Categorisation Matrix"));
}
