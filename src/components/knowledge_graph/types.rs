//! Input records and the node/edge model of the knowledge graph.

use std::fmt;

/// A vocabulary entry; `surface_form` is its display text.
#[derive(Clone, Debug, PartialEq)]
pub struct VocabEntry {
	pub id: i64,
	pub surface_form: String,
}

/// A grammar rule; `name` is its display text.
#[derive(Clone, Debug, PartialEq)]
pub struct GrammarRule {
	pub id: i64,
	pub name: String,
}

/// An expression; `text` is its display text.
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
	pub id: i64,
	pub text: String,
}

/// A free-text note with hydrated relation lists.
///
/// The relation lists hold full resource records (joined upstream), not raw
/// ids, so a relation to a deleted resource simply never matches anything in
/// the current [`ResourceSet`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Note {
	pub id: i64,
	pub title: String,
	pub topic: String,
	pub vocab_rel: Vec<VocabEntry>,
	pub grammar_rel: Vec<GrammarRule>,
	pub expression_rel: Vec<Expression>,
}

/// The three resource collections of one language.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceSet {
	pub vocabulary: Vec<VocabEntry>,
	pub grammar: Vec<GrammarRule>,
	pub expressions: Vec<Expression>,
}

/// The four node kinds, driving color, radius and id prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeCategory {
	Note,
	Vocab,
	Grammar,
	Expr,
}

impl NodeCategory {
	/// Prefix used when deriving node ids (`note-7`, `vocab-12`, ...).
	pub fn prefix(self) -> &'static str {
		match self {
			NodeCategory::Note => "note",
			NodeCategory::Vocab => "vocab",
			NodeCategory::Grammar => "grammar",
			NodeCategory::Expr => "expr",
		}
	}
}

impl fmt::Display for NodeCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.prefix())
	}
}

/// A positioned, labeled point in the simulation.
#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: String,
	pub source_id: i64,
	pub category: NodeCategory,
	pub label: String,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
}

impl GraphNode {
	/// The identity handed to the activation callback.
	pub fn activation(&self) -> ActivatedNode {
		ActivatedNode {
			category: self.category,
			source_id: self.source_id,
		}
	}
}

/// An undirected link between a note node and a resource node, stored as the
/// two node ids. Duplicates are legal; the relation lists are the source of
/// truth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
}

/// Identity of an activated node. Resolving it into a view change (reopen
/// the note, switch to a resource list) is the host's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivatedNode {
	pub category: NodeCategory,
	pub source_id: i64,
}
