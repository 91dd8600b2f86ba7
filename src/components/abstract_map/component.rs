use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement, Window};

use super::render;
use crate::mapping::AbstractMap;
use crate::mapping::scene::MapScene;

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
	canvas
		.get_context("2d")?
		.ok_or_else(|| JsValue::from_str("2d context unavailable"))?
		.dyn_into()
		.map_err(JsValue::from)
}

/// Render the export scene on an offscreen canvas and download it as PNG.
fn export_png(map: &AbstractMap, file_name: &str) -> Result<(), JsValue> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let scene = map.export_scene();
	let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
	canvas.set_width(scene.width as u32);
	canvas.set_height(scene.height as u32);
	render::render(&scene, &context_2d(&canvas)?);

	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&canvas.to_data_url_with_type("image/png")?);
	anchor.set_download(file_name);
	anchor.click();
	info!("Map saved to: {}", file_name);
	Ok(())
}

#[component]
pub fn AbstractMapCanvas(
	map: AbstractMap,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (default_w, default_h) = map.options().canvas_size();

		let (w, h) = if fullscreen {
			let window: Option<Window> = web_sys::window();
			let inner = |v: Option<Result<JsValue, JsValue>>, fallback: f64| {
				v.and_then(Result::ok).and_then(|v| v.as_f64()).unwrap_or(fallback)
			};
			(
				inner(window.as_ref().map(Window::inner_width), default_w),
				inner(window.as_ref().map(Window::inner_height), default_h),
			)
		} else {
			(width.unwrap_or(default_w), height.unwrap_or(default_h))
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let px_per_point = map.options().dpi / 72.0 * (h / default_h).min(w / default_w);
		let scene = MapScene::build(&map, w, h, px_per_point);
		match context_2d(&canvas) {
			Ok(ctx) => render::render(&scene, &ctx),
			Err(err) => warn!("Cannot draw abstract map: {:?}", err),
		}

		if let Some(file_name) = map.options().save_path.as_deref() {
			if let Err(err) = export_png(&map, file_name) {
				warn!("Failed to save map to {}: {:?}", file_name, err);
			}
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="abstract-map-canvas"
			style="display: block;"
		/>
	}
}
