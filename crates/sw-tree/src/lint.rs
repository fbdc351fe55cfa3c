//! Graph diagnostics for decision trees.
//!
//! Report-only: the builder saves any shape, so none of these findings block
//! anything. Orphans and dangling references are normal intermediate states
//! while an author restructures a tree; cycles would trap a reader.

use crate::model::DecisionTree;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::HashMap;
use sw_core::{Id, LintDiagnostic, LintSeverity};

/// Diagnose one tree: unreachable nodes, dangling answer references, cycles,
/// empty questions.
pub fn lint_tree(tree: &DecisionTree) -> Vec<LintDiagnostic> {
    let mut out = Vec::new();

    let mut graph: DiGraph<Id, ()> = DiGraph::new();
    let mut index: HashMap<Id, NodeIndex> = HashMap::new();
    for node in tree.all_nodes() {
        index.insert(node.id, graph.add_node(node.id));
    }
    for node in tree.all_nodes() {
        for answer in &node.answers {
            let Some(target) = answer.next_node else {
                continue;
            };
            match index.get(&target) {
                Some(&to) => {
                    graph.add_edge(index[&node.id], to, ());
                }
                None => out.push(LintDiagnostic {
                    entity: answer.id,
                    message: format!("answer \"{}\" points to a deleted node", answer.text),
                    severity: LintSeverity::Warning,
                    rule: "dangling-answer",
                }),
            }
        }
    }

    let mut reached = vec![false; graph.node_count()];
    let mut dfs = Dfs::new(&graph, index[&tree.root.id]);
    while let Some(ix) = dfs.next(&graph) {
        reached[ix.index()] = true;
    }
    for node in &tree.nodes {
        if !reached[index[&node.id].index()] {
            out.push(LintDiagnostic {
                entity: node.id,
                message: "node is not reachable from the root".to_string(),
                severity: LintSeverity::Info,
                rule: "unreachable-node",
            });
        }
    }

    // A strongly connected component of more than one node, or a self-loop,
    // is a cycle a reader could get stuck in.
    for scc in tarjan_scc(&graph) {
        let cyclic = scc.len() > 1
            || (scc.len() == 1 && graph.find_edge(scc[0], scc[0]).is_some());
        if cyclic {
            out.push(LintDiagnostic {
                entity: graph[scc[0]],
                message: format!("{} node(s) form a cycle", scc.len()),
                severity: LintSeverity::Warning,
                rule: "cycle",
            });
        }
    }

    for node in tree.all_nodes() {
        if node.question.trim().is_empty() && !node.answers.is_empty() {
            out.push(LintDiagnostic {
                entity: node.id,
                message: "node has answers but no question text".to_string(),
                severity: LintSeverity::Info,
                rule: "empty-question",
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(diags: &[LintDiagnostic]) -> Vec<&'static str> {
        diags.iter().map(|d| d.rule).collect()
    }

    #[test]
    fn clean_tree_has_no_findings() {
        let mut tree = DecisionTree::new("t");
        let root = tree.root.id;
        tree.set_question(root, "q?");
        tree.add_answer(root);
        let child = tree.add_node(root, 0).unwrap();
        tree.set_question(child, "q2?");
        assert!(lint_tree(&tree).is_empty());
    }

    #[test]
    fn detached_subtree_reports_unreachable() {
        let mut tree = DecisionTree::new("t");
        let root = tree.root.id;
        tree.set_question(root, "q?");
        let ans = tree.add_answer(root).unwrap();
        let child = tree.add_node(root, 0).unwrap();
        tree.set_question(child, "q2?");
        tree.detach_answer(root, ans);
        let diags = lint_tree(&tree);
        assert_eq!(rules(&diags), vec!["unreachable-node"]);
        assert_eq!(diags[0].entity, child);
    }

    #[test]
    fn deleted_target_reports_dangling_answer() {
        let mut tree = DecisionTree::new("t");
        let root = tree.root.id;
        tree.set_question(root, "q?");
        tree.add_answer(root);
        let child = tree.add_node(root, 0).unwrap();
        tree.nodes.retain(|n| n.id != child);
        assert!(rules(&lint_tree(&tree)).contains(&"dangling-answer"));
    }

    #[test]
    fn manual_back_edge_reports_cycle() {
        let mut tree = DecisionTree::new("t");
        let root = tree.root.id;
        tree.set_question(root, "q?");
        tree.add_answer(root);
        let child = tree.add_node(root, 0).unwrap();
        tree.set_question(child, "q2?");
        // Wire the child back to the root by hand.
        let back = tree.add_answer(child).unwrap();
        if let Some(a) = tree
            .node_mut(child)
            .and_then(|n| n.answers.iter_mut().find(|a| a.id == back))
        {
            a.next_node = Some(root);
        }
        assert!(rules(&lint_tree(&tree)).contains(&"cycle"));
    }

    #[test]
    fn blank_question_with_answers_reports_info() {
        let mut tree = DecisionTree::new("t");
        tree.add_answer(tree.root.id);
        let diags = lint_tree(&tree);
        assert!(rules(&diags).contains(&"empty-question"));
        assert_eq!(diags[0].severity, LintSeverity::Info);
    }
}
