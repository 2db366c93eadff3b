//! Simulation state: force relaxation, hit-testing and the pointer state
//! machine. Everything in here is plain data and math so it can be exercised
//! without a DOM; the component owns the animation loop, this owns a frame's
//! worth of work.

use std::collections::HashMap;

use log::debug;

use super::build;
use super::types::{ActivatedNode, GraphEdge, GraphNode, NodeCategory, Note, ResourceSet};

/// Pairwise push-apart strength.
pub const REPULSION: f64 = 0.5;
/// Spring coefficient applied to the offset from rest length.
pub const ATTRACTION: f64 = 0.02;
/// Pull of every free node toward the canvas center.
pub const CENTER_PULL: f64 = 0.01;
/// Per-frame velocity damping.
pub const FRICTION: f64 = 0.9;
/// Edge length at which the spring force is zero.
pub const REST_LENGTH: f64 = 100.0;
/// Nodes farther apart than this exert no repulsion on each other.
pub const REPULSION_RADIUS: f64 = 300.0;

/// Pointer-to-node pickup distance.
pub const HIT_RADIUS: f64 = 25.0;
/// Press-to-release travel under which a release still counts as a click.
pub const CLICK_SLOP: f64 = 5.0;

/// Circle radius for note nodes.
pub const NOTE_RADIUS: f64 = 12.0;
/// Circle radius for vocabulary, grammar and expression nodes.
pub const RESOURCE_RADIUS: f64 = 8.0;
/// Extra radius while hovered.
pub const HOVER_GROWTH: f64 = 4.0;

/// Small multiplicative congruential generator for layout seeding.
/// Deterministic under a fixed seed, which is all the tests need.
pub struct Lcg(u64);

impl Lcg {
	pub fn new(seed: u64) -> Self {
		// One scramble round so nearby seeds diverge immediately.
		Self(
			seed.wrapping_mul(6364136223846793005)
				.wrapping_add(1442695040888963407),
		)
	}

	/// Next value in `[0, 1)`.
	pub fn next_f64(&mut self) -> f64 {
		self.0 = self
			.0
			.wrapping_mul(6364136223846793005)
			.wrapping_add(1442695040888963407);
		(self.0 >> 11) as f64 / (1u64 << 53) as f64
	}
}

/// What the pointer is currently doing, by node index into the working set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerState {
	Idle,
	Hovering(usize),
	Dragging(usize),
}

/// The engine's working model for one rendering session.
///
/// The node/edge vectors are owned exclusively by this struct; the only
/// outside mutation path is the pointer methods. [`rebuild`](Self::rebuild)
/// swaps the whole model rather than patching it, so a frame that started
/// against the old arrays never sees a half-built graph.
pub struct GraphState {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	index: HashMap<String, usize>,
	pub pointer: PointerState,
	press: Option<(f64, f64)>,
	pub width: f64,
	pub height: f64,
	rng: Lcg,
}

impl GraphState {
	pub fn new(width: f64, height: f64, seed: u64) -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			index: HashMap::new(),
			pointer: PointerState::Idle,
			press: None,
			width,
			height,
			rng: Lcg::new(seed),
		}
	}

	/// Replace the whole node/edge model from fresh input collections.
	///
	/// Positions are re-seeded and velocities zeroed; node indices from the
	/// previous model are invalid afterwards, so hover/drag state is reset.
	pub fn rebuild(&mut self, notes: &[Note], resources: &ResourceSet) {
		let (nodes, edges) = build::build(notes, resources, self.width, self.height, &mut self.rng);
		self.index = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
		self.nodes = nodes;
		self.edges = edges;
		self.pointer = PointerState::Idle;
		debug!(
			"knowledge graph rebuilt: {} nodes, {} edges",
			self.nodes.len(),
			self.edges.len()
		);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn hovered(&self) -> Option<usize> {
		match self.pointer {
			PointerState::Hovering(i) | PointerState::Dragging(i) => Some(i),
			PointerState::Idle => None,
		}
	}

	fn dragged(&self) -> Option<usize> {
		match self.pointer {
			PointerState::Dragging(i) => Some(i),
			_ => None,
		}
	}

	/// Nearest node within [`HIT_RADIUS`] of the given point, by Euclidean
	/// distance. Linear scan; the graphs here are tens of nodes.
	pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
		let mut best: Option<(usize, f64)> = None;
		for (i, n) in self.nodes.iter().enumerate() {
			let d = ((n.x - x).powi(2) + (n.y - y).powi(2)).sqrt();
			if d < HIT_RADIUS && best.is_none_or(|(_, bd)| d < bd) {
				best = Some((i, d));
			}
		}
		best.map(|(i, _)| i)
	}

	/// Advance the relaxation by one frame.
	///
	/// Phase order matters: repulsion, then edge springs, then center pull,
	/// then damping and integration, each reading the velocities the earlier
	/// phases accumulated. A dragged node keeps collecting phase-1/2 forces
	/// (so it still pushes and pulls its neighbors) but is pinned by the
	/// pointer, so phases 3 and 4 leave it alone.
	pub fn step(&mut self) {
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let dx = self.nodes[j].x - self.nodes[i].x;
				let dy = self.nodes[j].y - self.nodes[i].y;
				// Floor at 1 so coincident nodes cannot divide by zero.
				let dist = (dx * dx + dy * dy).sqrt().max(1.0);
				if dist < REPULSION_RADIUS {
					let force = REPULSION / (dist * 0.01);
					let (ux, uy) = (dx / dist, dy / dist);
					self.nodes[i].vx -= ux * force;
					self.nodes[i].vy -= uy * force;
					self.nodes[j].vx += ux * force;
					self.nodes[j].vy += uy * force;
				}
			}
		}

		for edge in &self.edges {
			let (Some(&s), Some(&t)) = (self.index.get(&edge.source), self.index.get(&edge.target))
			else {
				continue;
			};
			let dx = self.nodes[t].x - self.nodes[s].x;
			let dy = self.nodes[t].y - self.nodes[s].y;
			let dist = (dx * dx + dy * dy).sqrt().max(1.0);
			// Spring toward the rest length: contracts long edges, expands
			// short ones.
			let force = (dist - REST_LENGTH) * ATTRACTION;
			let (ux, uy) = (dx / dist, dy / dist);
			self.nodes[s].vx += ux * force;
			self.nodes[s].vy += uy * force;
			self.nodes[t].vx -= ux * force;
			self.nodes[t].vy -= uy * force;
		}

		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		let dragged = self.dragged();
		for (i, node) in self.nodes.iter_mut().enumerate() {
			if dragged == Some(i) {
				continue;
			}
			node.vx += (cx - node.x) * CENTER_PULL;
			node.vy += (cy - node.y) * CENTER_PULL;
			node.vx *= FRICTION;
			node.vy *= FRICTION;
			node.x += node.vx;
			node.y += node.vy;
		}
	}

	/// Pointer moved to `(x, y)`. Returns whether a node is under the
	/// pointer, for the cursor affordance.
	pub fn pointer_moved(&mut self, x: f64, y: f64) -> bool {
		if let PointerState::Dragging(i) = self.pointer {
			if let Some(node) = self.nodes.get_mut(i) {
				node.x = x;
				node.y = y;
			}
			return true;
		}
		match self.node_at(x, y) {
			Some(i) => {
				self.pointer = PointerState::Hovering(i);
				true
			}
			None => {
				self.pointer = PointerState::Idle;
				false
			}
		}
	}

	/// Pointer pressed at `(x, y)`; a hovered node becomes the drag target.
	pub fn pointer_pressed(&mut self, x: f64, y: f64) {
		self.press = Some((x, y));
		if let PointerState::Hovering(i) = self.pointer {
			self.pointer = PointerState::Dragging(i);
		}
	}

	/// Pointer released at `(x, y)`. Returns the activated node when the
	/// pointer traveled less than [`CLICK_SLOP`] since the press while a
	/// node was held; always ends any drag.
	pub fn pointer_released(&mut self, x: f64, y: f64) -> Option<ActivatedNode> {
		let travel = self
			.press
			.take()
			.map_or(f64::INFINITY, |(px, py)| ((x - px).powi(2) + (y - py).powi(2)).sqrt());
		let held = self.hovered();
		self.pointer = PointerState::Idle;
		if travel < CLICK_SLOP {
			held.and_then(|i| self.nodes.get(i)).map(GraphNode::activation)
		} else {
			None
		}
	}

	/// Pointer left the canvas: drop any hover or drag in progress.
	pub fn pointer_left(&mut self) {
		self.pointer = PointerState::Idle;
		self.press = None;
	}

	/// Display radius for a node, accounting for hover growth.
	pub fn radius(&self, i: usize) -> f64 {
		let base = match self.nodes[i].category {
			NodeCategory::Note => NOTE_RADIUS,
			_ => RESOURCE_RADIUS,
		};
		if self.hovered() == Some(i) {
			base + HOVER_GROWTH
		} else {
			base
		}
	}

	/// Resolve an edge to its endpoint indices, if both still exist.
	pub fn edge_endpoints(&self, edge: &GraphEdge) -> Option<(usize, usize)> {
		Some((*self.index.get(&edge.source)?, *self.index.get(&edge.target)?))
	}

	#[cfg(test)]
	fn set_model(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) {
		self.index = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
		self.nodes = nodes;
		self.edges = edges;
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::VocabEntry;
	use super::*;

	const EPS: f64 = 1e-9;

	fn raw_node(category: NodeCategory, source_id: i64, x: f64, y: f64) -> GraphNode {
		GraphNode {
			id: format!("{}-{}", category.prefix(), source_id),
			source_id,
			category,
			label: String::new(),
			x,
			y,
			vx: 0.0,
			vy: 0.0,
		}
	}

	// 800x600 canvas, center at (400, 300).
	fn state_with(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> GraphState {
		let mut s = GraphState::new(800.0, 600.0, 42);
		s.set_model(nodes, edges);
		s
	}

	fn edge(source: &str, target: &str) -> GraphEdge {
		GraphEdge {
			source: source.into(),
			target: target.into(),
		}
	}

	#[test]
	fn repulsion_is_equal_and_opposite() {
		// Mirror the pair around the center so the center pull is symmetric
		// too and the total velocities must cancel exactly. At 50 apart the
		// repulsion (1.0) outweighs the center pull (0.25), so the pair
		// drifts outward.
		let mut s = state_with(
			vec![
				raw_node(NodeCategory::Note, 1, 375.0, 300.0),
				raw_node(NodeCategory::Vocab, 2, 425.0, 300.0),
			],
			vec![],
		);
		s.step();
		let (a, b) = (&s.nodes[0], &s.nodes[1]);
		assert!((a.vx + b.vx).abs() < EPS, "vx {} vs {}", a.vx, b.vx);
		assert!((a.vy + b.vy).abs() < EPS);
		assert!(a.vx < 0.0, "left node should be pushed further left");
	}

	#[test]
	fn no_repulsion_beyond_activation_radius() {
		// 400 apart: only the center pull acts, so each node's first-step
		// velocity is exactly (center - pos) * 0.01 * 0.9.
		let mut s = state_with(
			vec![
				raw_node(NodeCategory::Note, 1, 200.0, 300.0),
				raw_node(NodeCategory::Vocab, 2, 600.0, 300.0),
			],
			vec![],
		);
		s.step();
		let expected = (400.0 - 200.0) * CENTER_PULL * FRICTION;
		assert!((s.nodes[0].vx - expected).abs() < EPS);
		assert!((s.nodes[1].vx + expected).abs() < EPS);
	}

	#[test]
	fn coincident_nodes_do_not_produce_nan() {
		let mut s = state_with(
			vec![
				raw_node(NodeCategory::Note, 1, 400.0, 300.0),
				raw_node(NodeCategory::Vocab, 2, 400.0, 300.0),
			],
			vec![edge("note-1", "vocab-2")],
		);
		for _ in 0..10 {
			s.step();
		}
		for n in &s.nodes {
			assert!(n.x.is_finite() && n.y.is_finite());
			assert!(n.vx.is_finite() && n.vy.is_finite());
		}
	}

	#[test]
	fn spring_contracts_edges_longer_than_rest_length() {
		// Nodes at 300/500, 200 apart, mirrored around center 400.
		// Left node, first step:
		//   repulsion  -0.5 / (200 * 0.01)      = -0.25
		//   spring     +(200 - 100) * 0.02      = +2.0
		//   center     +(400 - 300) * 0.01      = +1.0
		//   friction   (2.75) * 0.9             = +2.475
		let mut s = state_with(
			vec![
				raw_node(NodeCategory::Note, 1, 300.0, 300.0),
				raw_node(NodeCategory::Vocab, 2, 500.0, 300.0),
			],
			vec![edge("note-1", "vocab-2")],
		);
		s.step();
		assert!((s.nodes[0].vx - 2.475).abs() < EPS);
		assert!((s.nodes[1].vx + 2.475).abs() < EPS);
	}

	#[test]
	fn spring_expands_edges_shorter_than_rest_length() {
		// 50 apart: spring pushes apart (-1.0), repulsion pushes apart
		// (1.0), center pulls in (0.25); net motion is outward.
		let mut s = state_with(
			vec![
				raw_node(NodeCategory::Note, 1, 375.0, 300.0),
				raw_node(NodeCategory::Vocab, 2, 425.0, 300.0),
			],
			vec![edge("note-1", "vocab-2")],
		);
		s.step();
		assert!(s.nodes[0].vx < 0.0);
		assert!(s.nodes[1].vx > 0.0);
	}

	#[test]
	fn edge_with_missing_endpoint_exerts_no_force() {
		// A single node parked exactly at the center feels no center pull;
		// if the dangling edge were applied anyway the velocity would move.
		let mut s = state_with(
			vec![raw_node(NodeCategory::Note, 1, 400.0, 300.0)],
			vec![edge("note-1", "vocab-99")],
		);
		s.step();
		assert_eq!((s.nodes[0].vx, s.nodes[0].vy), (0.0, 0.0));
	}

	#[test]
	fn isolated_node_decays_toward_center_without_growing_swings() {
		let mut s = state_with(vec![raw_node(NodeCategory::Note, 1, 100.0, 300.0)], vec![]);
		let start = (400.0 - s.nodes[0].x).abs();
		let mut offsets = Vec::new();
		for _ in 0..600 {
			s.step();
			offsets.push(400.0 - s.nodes[0].x);
		}
		// Never swings wider than where it started.
		for off in &offsets {
			assert!(off.abs() <= start + EPS);
		}
		// Each oscillation peak is smaller than the one before.
		let mut peaks = Vec::new();
		for w in offsets.windows(3) {
			if w[1].abs() > w[0].abs() && w[1].abs() >= w[2].abs() {
				peaks.push(w[1].abs());
			}
		}
		for pair in peaks.windows(2) {
			assert!(pair[1] < pair[0]);
		}
		// And it ends up essentially at the center.
		assert!(offsets.last().unwrap().abs() < 1e-3);
	}

	#[test]
	fn dragged_node_is_pinned_but_still_repels() {
		let mut s = state_with(
			vec![
				raw_node(NodeCategory::Note, 1, 300.0, 300.0),
				raw_node(NodeCategory::Vocab, 2, 350.0, 300.0),
			],
			vec![],
		);
		assert!(s.pointer_moved(300.0, 300.0));
		s.pointer_pressed(300.0, 300.0);
		assert_eq!(s.pointer, PointerState::Dragging(0));

		s.step();
		// Pinned: no center pull, no integration.
		assert_eq!((s.nodes[0].x, s.nodes[0].y), (300.0, 300.0));
		// Its neighbor still got pushed away.
		assert!(s.nodes[1].vx > 0.0);

		s.pointer_moved(120.0, 80.0);
		assert_eq!((s.nodes[0].x, s.nodes[0].y), (120.0, 80.0));
	}

	#[test]
	fn hover_picks_the_nearest_node_within_the_hit_radius() {
		let mut s = state_with(
			vec![
				raw_node(NodeCategory::Note, 1, 100.0, 100.0),
				raw_node(NodeCategory::Vocab, 2, 110.0, 100.0),
				raw_node(NodeCategory::Grammar, 3, 400.0, 400.0),
			],
			vec![],
		);
		assert!(s.pointer_moved(104.0, 100.0));
		assert_eq!(s.pointer, PointerState::Hovering(0));

		assert!(s.pointer_moved(109.0, 100.0));
		assert_eq!(s.pointer, PointerState::Hovering(1));

		assert!(!s.pointer_moved(200.0, 200.0));
		assert_eq!(s.pointer, PointerState::Idle);
	}

	#[test]
	fn release_within_slop_over_a_node_is_a_click() {
		let mut s = state_with(vec![raw_node(NodeCategory::Vocab, 10, 100.0, 100.0)], vec![]);
		s.pointer_moved(100.0, 100.0);
		s.pointer_pressed(100.0, 100.0);
		let hit = s.pointer_released(103.0, 100.0);
		assert_eq!(
			hit,
			Some(ActivatedNode {
				category: NodeCategory::Vocab,
				source_id: 10,
			})
		);
		assert_eq!(s.pointer, PointerState::Idle);
		// The press was consumed; a stray second release is not a click.
		assert_eq!(s.pointer_released(103.0, 100.0), None);
	}

	#[test]
	fn release_after_a_real_drag_is_not_a_click() {
		let mut s = state_with(
			vec![
				raw_node(NodeCategory::Note, 1, 100.0, 100.0),
				raw_node(NodeCategory::Vocab, 2, 500.0, 100.0),
			],
			vec![],
		);
		s.pointer_moved(100.0, 100.0);
		s.pointer_pressed(100.0, 100.0);
		// Drag the note on top of the vocab node and let go there.
		s.pointer_moved(500.0, 100.0);
		assert_eq!(s.pointer_released(500.0, 100.0), None);
		assert_eq!(s.pointer, PointerState::Idle);
	}

	#[test]
	fn press_on_empty_canvas_never_clicks() {
		let mut s = state_with(vec![raw_node(NodeCategory::Note, 1, 100.0, 100.0)], vec![]);
		s.pointer_moved(300.0, 300.0);
		s.pointer_pressed(300.0, 300.0);
		assert_eq!(s.pointer_released(301.0, 300.0), None);
	}

	#[test]
	fn rebuild_replaces_the_model_and_resets_interaction() {
		let notes = vec![Note {
			id: 1,
			title: "Day 1".into(),
			vocab_rel: vec![VocabEntry {
				id: 10,
				surface_form: "학생".into(),
			}],
			..Note::default()
		}];
		let resources = ResourceSet {
			vocabulary: vec![VocabEntry {
				id: 10,
				surface_form: "학생".into(),
			}],
			..ResourceSet::default()
		};

		let mut s = GraphState::new(800.0, 600.0, 42);
		s.rebuild(&notes, &resources);
		assert_eq!(s.nodes.len(), 2);
		assert_eq!(s.edges.len(), 1);

		// Start a drag, then rebuild under it.
		let (x, y) = (s.nodes[0].x, s.nodes[0].y);
		s.pointer_moved(x, y);
		s.pointer_pressed(x, y);
		let before: Vec<(f64, f64)> = s.nodes.iter().map(|n| (n.x, n.y)).collect();

		s.rebuild(&notes, &resources);
		assert_eq!(s.pointer, PointerState::Idle);
		let ids: Vec<&str> = s.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["note-1", "vocab-10"]);
		let after: Vec<(f64, f64)> = s.nodes.iter().map(|n| (n.x, n.y)).collect();
		assert_ne!(before, after, "positions are re-seeded on rebuild");
		assert!(s.nodes.iter().all(|n| n.vx == 0.0 && n.vy == 0.0));
	}

	#[test]
	fn hovered_note_grows_by_the_hover_bonus() {
		let mut s = state_with(
			vec![
				raw_node(NodeCategory::Note, 1, 100.0, 100.0),
				raw_node(NodeCategory::Expr, 2, 500.0, 100.0),
			],
			vec![],
		);
		assert_eq!(s.radius(0), NOTE_RADIUS);
		assert_eq!(s.radius(1), RESOURCE_RADIUS);
		s.pointer_moved(100.0, 100.0);
		assert_eq!(s.radius(0), NOTE_RADIUS + HOVER_GROWTH);
		assert_eq!(s.radius(1), RESOURCE_RADIUS);
	}
}
