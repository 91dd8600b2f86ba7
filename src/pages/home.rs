use leptos::prelude::*;
use log::warn;

use crate::components::abstract_map::AbstractMapCanvas;
use crate::diagnose::{analyze_spatial_distribution, generate_text_summary, parse_geojson};
use crate::mapping::{Layout, MapOptions, MapSource, analyze_graph, generate_abstract_map};

const SAMPLE_RELATIONSHIPS: &str = include_str!("../../data/abstract_sample.csv");
const SAMPLE_REGIONS: &str = include_str!("../../data/sample_regions.geojson");

/// Relationship map of the bundled sample with a layout picker.
#[component]
fn MapPanel() -> impl IntoView {
	let layout = RwSignal::new(Layout::default());
	let on_change = move |ev: leptos::ev::Event| match event_target_value(&ev).parse::<Layout>() {
		Ok(selected) => layout.set(selected),
		Err(err) => warn!("{}", err),
	};

	view! {
		<section class="map-panel">
			<select on:change=on_change>
				{Layout::ALL
					.into_iter()
					.map(|l| {
						view! {
							<option value=l.as_str() selected=move || layout.get() == l>
								{l.as_str()}
							</option>
						}
					})
					.collect_view()}
			</select>
			{move || {
				let source = MapSource::CsvText(SAMPLE_RELATIONSHIPS.into());
				match generate_abstract_map(source, layout.get().as_str(), &MapOptions::default()) {
					Ok(map) => {
						let metrics = analyze_graph(map.graph());
						view! {
							<AbstractMapCanvas map=map />
							<ul class="metrics">
								<li>{format!("Number of nodes: {}", metrics.num_nodes)}</li>
								<li>{format!("Number of edges: {}", metrics.num_edges)}</li>
								<li>{format!("Network density: {:.3}", metrics.density)}</li>
								<li>{format!("Average degree: {:.2}", metrics.avg_degree)}</li>
							</ul>
						}
							.into_any()
					}
					Err(err) => view! { <p class="error">{err.to_string()}</p> }.into_any(),
				}
			}}
		</section>
	}
}

/// Text summary and tension report of the bundled regions.
#[component]
fn DiagnosticsPanel() -> impl IntoView {
	let content = match parse_geojson(SAMPLE_REGIONS) {
		Ok(data) => {
			let report = analyze_spatial_distribution(&data);
			generate_text_summary(&data, Some(&report)).content
		}
		Err(err) => err.to_string(),
	};

	view! {
		<section class="diagnostics-panel">
			<pre>{content}</pre>
		</section>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="abstract-map">
				<h1>"Abstract Mapping"</h1>
				<p class="subtitle">
					"Relationships drawn as a directed graph, plus spatial diagnostics."
				</p>
				<MapPanel />
				<DiagnosticsPanel />
			</div>
		</ErrorBoundary>
	}
}
