use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use crate::mapping::scene::{MapScene, SceneEdge};

const NODE_FILL: &str = "lightblue";
const NODE_OUTLINE: &str = "navy";
const EDGE_COLOR: &str = "rgba(128, 128, 128, 0.6)";
const NODE_LABEL_COLOR: &str = "darkblue";
const EDGE_LABEL_COLOR: &str = "rgba(255, 0, 0, 0.7)";

pub fn render(scene: &MapScene, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("white");
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);
	let unit = scene.height / 800.0;
	draw_edges(scene, ctx, unit);
	draw_nodes(scene, ctx, unit);
	draw_title(scene, ctx, unit);
}

fn draw_edges(scene: &MapScene, ctx: &CanvasRenderingContext2d, unit: f64) {
	let (radius, arrow_size) = (scene.node_radius, 12.0 * unit);
	ctx.set_stroke_style_str(EDGE_COLOR);
	ctx.set_fill_style_str(EDGE_COLOR);

	for edge in &scene.edges {
		ctx.set_line_width(edge.width);
		if edge.is_loop {
			draw_loop(edge, ctx, radius);
			continue;
		}
		let (x1, y1, x2, y2) = (edge.from.x, edge.from.y, edge.to.x, edge.to.y);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 2.0 * radius {
			continue;
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * radius, y1 + uy * radius);
		ctx.line_to(x2 - ux * (radius + arrow_size), y2 - uy * (radius + arrow_size));
		ctx.stroke();

		let (tip_x, tip_y) = (x2 - ux * radius, y2 - uy * radius);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}

	if !scene.edge_labels {
		return;
	}
	ctx.set_fill_style_str(EDGE_LABEL_COLOR);
	ctx.set_font(&format!("{}px sans-serif", 11.0 * unit));
	ctx.set_text_align("center");
	for edge in &scene.edges {
		let (mx, my) = if edge.is_loop {
			(edge.from.x, edge.from.y - 3.0 * radius)
		} else {
			((edge.from.x + edge.to.x) / 2.0, (edge.from.y + edge.to.y) / 2.0)
		};
		let _ = ctx.fill_text(&edge.label, mx, my);
	}
}

fn draw_loop(edge: &SceneEdge, ctx: &CanvasRenderingContext2d, radius: f64) {
	let (cx, cy) = (edge.from.x, edge.from.y - radius * 1.5);
	ctx.begin_path();
	let _ = ctx.arc(cx, cy, radius * 0.8, 0.0, 2.0 * PI);
	ctx.stroke();
}

fn draw_nodes(scene: &MapScene, ctx: &CanvasRenderingContext2d, unit: f64) {
	ctx.set_line_width(2.0 * unit);
	for node in &scene.nodes {
		ctx.set_global_alpha(0.9);
		ctx.begin_path();
		let _ = ctx.arc(node.at.x, node.at.y, scene.node_radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(NODE_FILL);
		ctx.fill();
		ctx.set_global_alpha(1.0);
		ctx.set_stroke_style_str(NODE_OUTLINE);
		ctx.stroke();
	}

	if !scene.node_labels {
		return;
	}
	ctx.set_fill_style_str(NODE_LABEL_COLOR);
	ctx.set_font(&format!("bold {}px sans-serif", 13.0 * unit));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for node in &scene.nodes {
		let _ = ctx.fill_text(&node.label, node.at.x, node.at.y);
	}
	ctx.set_text_baseline("alphabetic");
}

fn draw_title(scene: &MapScene, ctx: &CanvasRenderingContext2d, unit: f64) {
	ctx.set_fill_style_str("black");
	ctx.set_font(&format!("bold {}px sans-serif", 21.0 * unit));
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&scene.title, scene.width / 2.0, 40.0 * unit);
}
