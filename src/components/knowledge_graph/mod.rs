mod build;
mod component;
mod render;
mod state;
mod types;

pub use component::KnowledgeGraphCanvas;
pub use types::{
	ActivatedNode, Expression, GrammarRule, NodeCategory, Note, ResourceSet, VocabEntry,
};
