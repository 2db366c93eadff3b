//! Canvas drawing for the knowledge graph: edges first, then glowing
//! category-colored circles, labels below.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::GraphState;
use super::types::NodeCategory;

const EDGE_COLOR: &str = "#e2e8f0";
const LABEL_COLOR: &str = "#1e293b";
/// Expressions keep a fixed amber; the other three follow the theme.
const EXPR_COLOR: &str = "#fbbf24";

/// Shadow blur at rest and while hovered.
const GLOW: f64 = 5.0;
const GLOW_HOVERED: f64 = 15.0;

/// Shown instead of an empty label so the node stays identifiable.
const LABEL_PLACEHOLDER: &str = "...";

struct Palette {
	note: String,
	vocab: String,
	grammar: String,
	expr: String,
}

impl Palette {
	fn color(&self, category: NodeCategory) -> &str {
		match category {
			NodeCategory::Note => &self.note,
			NodeCategory::Vocab => &self.vocab,
			NodeCategory::Grammar => &self.grammar,
			NodeCategory::Expr => &self.expr,
		}
	}
}

/// Read the category colors off the document root's custom properties.
///
/// Queried every frame rather than cached so a live theme switch shows up on
/// the very next draw.
fn theme_palette() -> Palette {
	let style = web_sys::window().and_then(|w| {
		let root = w.document()?.document_element()?;
		w.get_computed_style(&root).ok().flatten()
	});
	let var = |name: &str, fallback: &str| {
		style
			.as_ref()
			.and_then(|s| s.get_property_value(name).ok())
			.map(|v| v.trim().to_owned())
			.filter(|v| !v.is_empty())
			.unwrap_or_else(|| fallback.to_owned())
	};
	Palette {
		note: var("--primary", "#8e7dbe"),
		vocab: var("--accent", "#a6d6d6"),
		grammar: var("--secondary", "#f7cfd8"),
		expr: EXPR_COLOR.to_owned(),
	}
}

/// Draw one frame of the current simulation state.
pub fn render(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	let palette = theme_palette();
	draw_edges(state, ctx);
	draw_nodes(state, ctx, &palette);
}

fn draw_edges(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	ctx.begin_path();
	ctx.set_stroke_style_str(EDGE_COLOR);
	ctx.set_line_width(1.0);
	for edge in &state.edges {
		// Stale edges simply have nothing to connect.
		let Some((s, t)) = state.edge_endpoints(edge) else {
			continue;
		};
		ctx.move_to(state.nodes[s].x, state.nodes[s].y);
		ctx.line_to(state.nodes[t].x, state.nodes[t].y);
	}
	ctx.stroke();
}

fn draw_nodes(state: &GraphState, ctx: &CanvasRenderingContext2d, palette: &Palette) {
	for (i, node) in state.nodes.iter().enumerate() {
		let hovered = state.hovered() == Some(i);
		let radius = state.radius(i);
		let color = palette.color(node.category);

		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(color);
		ctx.set_shadow_blur(if hovered { GLOW_HOVERED } else { GLOW });
		ctx.set_shadow_color(color);
		ctx.fill();
		ctx.set_shadow_blur(0.0);

		// Note labels are always on; everything else labels on demand.
		if hovered || node.category == NodeCategory::Note {
			let text = if node.label.is_empty() {
				LABEL_PLACEHOLDER
			} else {
				&node.label
			};
			ctx.set_fill_style_str(LABEL_COLOR);
			ctx.set_font(if hovered {
				"bold 12px sans-serif"
			} else {
				"10px sans-serif"
			});
			ctx.set_text_align("center");
			let _ = ctx.fill_text(text, node.x, node.y + radius + 15.0);
		}
	}
}
