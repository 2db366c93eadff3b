use leptos::prelude::*;
use log::info;

use crate::components::knowledge_graph::{
	ActivatedNode, Expression, GrammarRule, KnowledgeGraphCanvas, NodeCategory, Note, ResourceSet,
	VocabEntry,
};

fn vocab(id: i64, surface_form: &str) -> VocabEntry {
	VocabEntry {
		id,
		surface_form: surface_form.into(),
	}
}

fn grammar(id: i64, name: &str) -> GrammarRule {
	GrammarRule {
		id,
		name: name.into(),
	}
}

fn expression(id: i64, text: &str) -> Expression {
	Expression {
		id,
		text: text.into(),
	}
}

/// Legend rows: category, display name, and the CSS color the canvas draws
/// it with. The first three are theme tokens so the chips stay in sync with
/// the graph across a theme switch; expressions are fixed amber.
const LEGEND: [(NodeCategory, &str, &str); 4] = [
	(NodeCategory::Note, "Notes", "var(--primary)"),
	(NodeCategory::Vocab, "Vocabulary", "var(--accent)"),
	(NodeCategory::Grammar, "Grammar", "var(--secondary)"),
	(NodeCategory::Expr, "Expressions", "#fbbf24"),
];

/// Sample Korean study data standing in for the backing store.
fn sample_resources() -> ResourceSet {
	ResourceSet {
		vocabulary: vec![
			vocab(1, "학생"),
			vocab(2, "선생님"),
			vocab(3, "학교"),
			vocab(4, "친구"),
			vocab(5, "한국어"),
		],
		grammar: vec![
			grammar(1, "-은/는 (topic marker)"),
			grammar(2, "-을/를 (object marker)"),
			grammar(3, "-에서 (location)"),
		],
		expressions: vec![
			expression(1, "잘 부탁드립니다"),
			expression(2, "오랜만이에요"),
		],
	}
}

fn sample_notes() -> Vec<Note> {
	vec![
		Note {
			id: 1,
			title: "Day 1 — introductions".into(),
			topic: "greetings".into(),
			vocab_rel: vec![vocab(1, "학생"), vocab(2, "선생님")],
			grammar_rel: vec![grammar(1, "-은/는 (topic marker)")],
			expression_rel: vec![expression(1, "잘 부탁드립니다")],
		},
		Note {
			id: 2,
			title: "Day 2 — around school".into(),
			topic: "places".into(),
			vocab_rel: vec![vocab(3, "학교"), vocab(4, "친구")],
			grammar_rel: vec![grammar(3, "-에서 (location)")],
			expression_rel: vec![],
		},
		Note {
			id: 3,
			title: "Classroom phrases".into(),
			topic: "phrases".into(),
			vocab_rel: vec![vocab(5, "한국어")],
			grammar_rel: vec![grammar(2, "-을/를 (object marker)")],
			expression_rel: vec![expression(2, "오랜만이에요")],
		},
	]
}

/// Default Home Page: the knowledge graph over the sample study data.
#[component]
pub fn Home() -> impl IntoView {
	let notes = Signal::derive(sample_notes);
	let resources = Signal::derive(sample_resources);
	let (status, set_status) = signal(String::from("Click a node to open it."));

	// In the full application a note click reopens the note in the editor
	// and a resource click switches to that resource's list view; here we
	// just report what would happen.
	let on_activate = Callback::new(move |node: ActivatedNode| {
		info!("node activated: {}-{}", node.category, node.source_id);
		let destination = match node.category {
			NodeCategory::Note => format!("note editor, note {}", node.source_id),
			NodeCategory::Vocab => "vocabulary list".into(),
			NodeCategory::Grammar => "grammar list".into(),
			NodeCategory::Expr => "expressions list".into(),
		};
		set_status.set(format!("Would open: {destination}."));
	});

	view! {
		<div class="fullscreen-graph">
			<KnowledgeGraphCanvas
				notes=notes
				resources=resources
				on_activate=on_activate
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Knowledge Graph"</h1>
				<p class="subtitle">
					"Notes link the vocabulary, grammar and expressions they use. Drag nodes to reposition; click to open."
				</p>
				<p class="status">{status}</p>
				<div class="legend">
					{LEGEND
						.iter()
						.map(|(_, name, color)| {
							view! {
								<div class="legend-entry">
									<span
										class="legend-chip"
										style=format!("background: {color}")
									></span>
									{*name}
								</div>
							}
						})
						.collect_view()}
				</div>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn legend_names_every_category_once() {
		let categories: Vec<NodeCategory> = LEGEND.iter().map(|(c, _, _)| *c).collect();
		assert_eq!(
			categories,
			[
				NodeCategory::Note,
				NodeCategory::Vocab,
				NodeCategory::Grammar,
				NodeCategory::Expr,
			]
		);
	}

	#[test]
	fn legend_chips_follow_the_theme_tokens() {
		// The themed categories point at the same custom properties the
		// renderer reads at draw time; expressions keep their fixed amber.
		assert!(
			LEGEND
				.iter()
				.take(3)
				.all(|(_, _, color)| color.starts_with("var(--"))
		);
		assert_eq!(LEGEND[3].2, "#fbbf24");
	}
}
