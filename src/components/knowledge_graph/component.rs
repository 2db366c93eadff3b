//! The Leptos component: owns the canvas, the animation loop and the
//! pointer-event wiring around [`GraphState`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::render;
use super::state::GraphState;
use super::types::{ActivatedNode, Note, ResourceSet};

fn pointer_pos(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Force-directed view of notes and the resources they link.
///
/// One simulate+draw pass runs per animation frame for as long as the
/// component is mounted; the frame callback is cancelled on cleanup. The
/// node/edge model is rebuilt wholesale whenever `notes` or `resources`
/// change. Clicks (press and release within the slop radius) invoke
/// `on_activate` with the node's category and source id; what view that
/// opens is up to the caller.
#[component]
pub fn KnowledgeGraphCanvas(
	#[prop(into)] notes: Signal<Vec<Note>>,
	#[prop(into)] resources: Signal<ResourceSet>,
	#[prop(optional, into)] on_activate: Option<Callback<ActivatedNode>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<GraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let raf_handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let (state_init, animate_init, resize_cb_init, raf_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		raf_handle.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let mut graph = GraphState::new(w, h, js_sys::Date::now() as u64);
		graph.rebuild(&notes.get_untracked(), &resources.get_untracked());
		*state_init.borrow_mut() = Some(graph);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, raf_anim) =
			(state_init.clone(), animate_init.clone(), raf_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.step();
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let id = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.unwrap();
				raf_anim.set(Some(id));
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let id = window
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.unwrap();
			raf_init.set(Some(id));
		}
	});

	// Wholesale rebuild whenever either collection changes identity. A frame
	// already in flight finishes against the old arrays; the next one sees
	// the new model.
	let state_rebuild = state.clone();
	Effect::new(move |prev: Option<()>| {
		let (notes, resources) = (notes.get(), resources.get());
		// First run only subscribes; the setup effect builds the initial model.
		if prev.is_none() {
			return;
		}
		if let Some(ref mut s) = *state_rebuild.borrow_mut() {
			s.rebuild(&notes, &resources);
		}
	});

	// Stop the redraw loop with the view; a cancelled handle plus dropped
	// closures means no dangling scheduled work after teardown.
	let cleanup_handles = leptos::__reexports::send_wrapper::SendWrapper::new((
		animate.clone(),
		resize_cb.clone(),
		raf_handle.clone(),
	));
	on_cleanup(move || {
		let (animate_cleanup, resize_cleanup, raf_cleanup) = cleanup_handles.take();
		let window = web_sys::window().unwrap();
		if let Some(id) = raf_cleanup.take() {
			let _ = window.cancel_animation_frame(id);
		}
		*animate_cleanup.borrow_mut() = None;
		if let Some(cb) = resize_cleanup.borrow_mut().take() {
			let _ = window
				.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = pointer_pos(&canvas, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_pressed(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = pointer_pos(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let over_node = s.pointer_moved(x, y);
			let _ = web_sys::HtmlElement::style(&canvas)
				.set_property("cursor", if over_node { "pointer" } else { "default" });
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = pointer_pos(&canvas, &ev);
		let activated = state_mu
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.pointer_released(x, y));
		if let (Some(node), Some(cb)) = (activated, on_activate) {
			cb.run(node);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_left();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="knowledge-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			style="display: block;"
		/>
	}
}
