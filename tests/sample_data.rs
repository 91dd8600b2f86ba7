use std::path::PathBuf;

use abstract_map_canvas::diagnose::{
	ReportStatus, Severity, TensionKind, analyze_spatial_distribution, read_geojson,
};
use abstract_map_canvas::mapping::{
	Layout, MapOptions, MapSource, REQUIRED_COLUMNS, RelationshipTable, analyze_graph,
	generate_abstract_map,
};

fn data_path(name: &str) -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

#[test]
fn test_sample_csv_structure() {
	let table = RelationshipTable::from_csv_path(data_path("abstract_sample.csv")).unwrap();
	assert_eq!(table.columns(), REQUIRED_COLUMNS);
	assert!(table.len() >= 5);
}

#[test]
fn test_sample_csv_builds_in_every_layout() {
	for layout in Layout::ALL {
		let map = generate_abstract_map(
			MapSource::CsvPath(data_path("abstract_sample.csv")),
			layout.as_str(),
			&MapOptions::default(),
		)
		.unwrap();
		let metrics = analyze_graph(map.graph());
		assert_eq!(metrics.num_nodes, 7);
		assert_eq!(metrics.num_edges, 10);
		assert!((metrics.avg_degree - 20.0 / 7.0).abs() < 1e-12);
		assert!((metrics.density - 10.0 / 42.0).abs() < 1e-12);
		assert_eq!(map.positions().len(), 7);
		assert!(map.edge_widths().iter().all(|w| (1.0..=5.0).contains(w)));
	}
}

#[test]
fn test_sample_regions_report() {
	let wrapped = read_geojson(data_path("sample_regions.geojson")).unwrap();
	let report = analyze_spatial_distribution(&wrapped);
	assert_eq!(report.status, ReportStatus::Success);
	assert_eq!(report.feature_count, Some(4));
	assert_eq!(report.tensions_found, 2);
	assert_eq!(report.tensions[0].kind, TensionKind::PopulationDisparity);
	assert_eq!(report.tensions[0].severity, Severity::High);
	assert_eq!(report.tensions[1].kind, TensionKind::DataQuality);
	assert_eq!(
		report.analyzed_properties.unwrap(),
		vec!["name", "population", "state"]
	);
}
