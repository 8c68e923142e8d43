use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use leptos::prelude::*;
use web_sys::{MouseEvent, TouchEvent};

use super::binding::DragBinding;
use super::dom::SvgSurface;
use super::renderer::ForceGraphRenderer;
use super::state::RenderOptions;
use super::ticker::AnimationFrameTicker;
use super::types::GraphData;

/// Default panel width in scene units.
pub const WIDTH: f64 = 500.0;
/// Default panel height in scene units.
pub const HEIGHT: f64 = 250.0;

static NEXT_GRAPH: AtomicUsize = AtomicUsize::new(0);

type Binding = DragBinding<SvgSurface, AnimationFrameTicker>;

fn first_touch(ev: &TouchEvent) -> Option<(f64, f64)> {
	let touch = ev.touches().get(0)?;
	Some((touch.client_x() as f64, touch.client_y() as f64))
}

/// Titled panel with an interactive force-directed graph. Re-renders from
/// scratch whenever `data` changes; drag nodes to reposition them.
#[component]
pub fn ForceGraph(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional, into)] title: Option<String>,
	#[prop(default = WIDTH)] width: f64,
	#[prop(default = HEIGHT)] height: f64,
	#[prop(optional)] options: RenderOptions,
) -> impl IntoView {
	let host_ref = NodeRef::<leptos::html::Div>::new();
	let binding: Rc<RefCell<Binding>> = Rc::default();
	let (error, set_error) = signal(None::<String>);
	let name = format!("force-graph-{}", NEXT_GRAPH.fetch_add(1, Ordering::Relaxed));

	let binding_fx = binding.clone();
	Effect::new(move |_| {
		let dataset = data.get();
		let Some(host) = host_ref.get() else {
			return;
		};
		let mut binding = binding_fx.borrow_mut();
		binding.release();
		let renderer = binding.renderer.get_or_insert_with(|| {
			ForceGraphRenderer::new(
				name.clone(),
				SvgSurface::new(host.into()),
				AnimationFrameTicker::default(),
				options.clone(),
			)
		});
		match renderer.render(&dataset, width, height) {
			Ok(_) => set_error.set(None),
			Err(err) => {
				log::error!("{name}: {err}");
				set_error.set(Some(err.to_string()));
			}
		}
	});

	let teardown = StoredValue::new_local(binding.clone());
	on_cleanup(move || {
		teardown.try_with_value(|binding| binding.borrow_mut().teardown());
	});

	let binding_md = binding.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if binding_md
			.borrow_mut()
			.press(ev.client_x() as f64, ev.client_y() as f64)
		{
			ev.prevent_default();
		}
	};

	let binding_mm = binding.clone();
	let on_mousemove = move |ev: MouseEvent| {
		binding_mm
			.borrow_mut()
			.drag(ev.client_x() as f64, ev.client_y() as f64);
	};

	let binding_mu = binding.clone();
	let on_mouseup = move |_: MouseEvent| binding_mu.borrow_mut().release();

	let binding_ml = binding.clone();
	let on_mouseleave = move |_: MouseEvent| binding_ml.borrow_mut().release();

	let binding_ts = binding.clone();
	let on_touchstart = move |ev: TouchEvent| {
		if let Some((x, y)) = first_touch(&ev) {
			if binding_ts.borrow_mut().press(x, y) {
				ev.prevent_default();
			}
		}
	};

	let binding_tm = binding.clone();
	let on_touchmove = move |ev: TouchEvent| {
		if let Some((x, y)) = first_touch(&ev) {
			if binding_tm.borrow_mut().drag(x, y) {
				ev.prevent_default();
			}
		}
	};

	let binding_te = binding.clone();
	let on_touchend = move |_: TouchEvent| binding_te.borrow_mut().release();

	let binding_tc = binding;
	let on_touchcancel = move |_: TouchEvent| binding_tc.borrow_mut().release();

	view! {
		<section class="graph-panel">
			{title.map(|title| view! { <h3 class="graph-title">{title}</h3> })}
			<div
				node_ref=host_ref
				class="force-graph"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:touchstart=on_touchstart
				on:touchmove=on_touchmove
				on:touchend=on_touchend
				on:touchcancel=on_touchcancel
			/>
			{move || error.get().map(|err| view! { <p class="graph-error">{err}</p> })}
		</section>
	}
}
