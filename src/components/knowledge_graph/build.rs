//! Builds the node/edge model from the notes and resource collections.
//!
//! The build is a pure function of its inputs plus the position rng: node
//! ids and the edge set are fully determined by the collections, only the
//! seeded coordinates vary. Rebuilds replace the whole model; nothing is
//! patched incrementally.

use std::collections::HashSet;

use super::state::Lcg;
use super::types::{GraphEdge, GraphNode, NodeCategory, Note, ResourceSet};

fn node(
	category: NodeCategory,
	source_id: i64,
	label: &str,
	width: f64,
	height: f64,
	rng: &mut Lcg,
) -> GraphNode {
	GraphNode {
		id: format!("{}-{}", category.prefix(), source_id),
		source_id,
		category,
		label: label.to_owned(),
		x: rng.next_f64() * width,
		y: rng.next_f64() * height,
		vx: 0.0,
		vy: 0.0,
	}
}

/// Create one node per note and per resource record, then one edge per
/// relation entry whose resource still exists in `resources`.
///
/// Order is notes, vocabulary, grammar, expressions, each in input order.
/// Relations to ids absent from the resource collections produce no edge and
/// no error; the upstream store may hold stale links mid-edit. Duplicate
/// relation entries yield duplicate edges on purpose.
pub fn build(
	notes: &[Note],
	resources: &ResourceSet,
	width: f64,
	height: f64,
	rng: &mut Lcg,
) -> (Vec<GraphNode>, Vec<GraphEdge>) {
	let mut nodes = Vec::new();

	for n in notes {
		nodes.push(node(NodeCategory::Note, n.id, &n.title, width, height, rng));
	}
	for v in &resources.vocabulary {
		nodes.push(node(
			NodeCategory::Vocab,
			v.id,
			&v.surface_form,
			width,
			height,
			rng,
		));
	}
	for g in &resources.grammar {
		nodes.push(node(NodeCategory::Grammar, g.id, &g.name, width, height, rng));
	}
	for e in &resources.expressions {
		nodes.push(node(NodeCategory::Expr, e.id, &e.text, width, height, rng));
	}

	let vocab_ids: HashSet<i64> = resources.vocabulary.iter().map(|v| v.id).collect();
	let grammar_ids: HashSet<i64> = resources.grammar.iter().map(|g| g.id).collect();
	let expr_ids: HashSet<i64> = resources.expressions.iter().map(|e| e.id).collect();

	let mut edges = Vec::new();
	for n in notes {
		let note_id = format!("{}-{}", NodeCategory::Note.prefix(), n.id);
		for v in &n.vocab_rel {
			if vocab_ids.contains(&v.id) {
				edges.push(GraphEdge {
					source: note_id.clone(),
					target: format!("{}-{}", NodeCategory::Vocab.prefix(), v.id),
				});
			}
		}
		for g in &n.grammar_rel {
			if grammar_ids.contains(&g.id) {
				edges.push(GraphEdge {
					source: note_id.clone(),
					target: format!("{}-{}", NodeCategory::Grammar.prefix(), g.id),
				});
			}
		}
		for e in &n.expression_rel {
			if expr_ids.contains(&e.id) {
				edges.push(GraphEdge {
					source: note_id.clone(),
					target: format!("{}-{}", NodeCategory::Expr.prefix(), e.id),
				});
			}
		}
	}

	(nodes, edges)
}
