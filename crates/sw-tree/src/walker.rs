//! Live preview walker: step through a decision tree as a reader would.
//!
//! The walker is defensive by construction. Trees are saved in any shape the
//! builder produces, so a walk can meet dangling references, missing answers,
//! even a vanished current node; all of those end the walk gracefully. It
//! never panics and never returns an error.

use crate::model::DecisionTree;
use log::debug;
use serde::{Deserialize, Serialize};
use sw_core::Id;

/// One breadcrumb of the walk: the question shown and the answer chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub question: String,
    pub answer: String,
}

/// A walk in progress over one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewWalker {
    current: Id,
    path: Vec<PathEntry>,
    ended: bool,
}

impl PreviewWalker {
    /// Start a walk at the tree's root.
    pub fn start(tree: &DecisionTree) -> Self {
        Self {
            current: tree.root.id,
            path: Vec::new(),
            ended: false,
        }
    }

    /// The node the walker is standing on, or `None` once the walk ended.
    pub fn current(&self) -> Option<Id> {
        (!self.ended).then_some(self.current)
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    /// The ordered question/answer log so far.
    pub fn path(&self) -> &[PathEntry] {
        &self.path
    }

    /// Choose the answer at `answer_index` on the current node. Transitions
    /// to the referenced node when it exists; otherwise the walk ends. A
    /// choice on an ended walk or a missing answer index is ignored.
    pub fn choose(&mut self, tree: &DecisionTree, answer_index: usize) {
        if self.ended {
            return;
        }
        let Some(node) = tree.node(self.current) else {
            // The node was deleted out from under a live preview.
            debug!("walker node {} vanished, ending walk", self.current);
            self.ended = true;
            return;
        };
        let Some(answer) = node.answers.get(answer_index) else {
            return;
        };
        self.path.push(PathEntry {
            question: node.question.clone(),
            answer: answer.text.clone(),
        });
        match answer.next_node {
            Some(next) if tree.node(next).is_some() => self.current = next,
            // Terminal answer, or a dangling reference; same outcome.
            _ => self.ended = true,
        }
    }

    /// Back to the root with an empty path. The only way the log resets.
    pub fn restart(&mut self, tree: &DecisionTree) {
        *self = Self::start(tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn two_level_tree() -> DecisionTree {
        let mut tree = DecisionTree::new("t");
        let root = tree.root.id;
        tree.set_question(root, "Does it power on?");
        let yes = tree.add_answer(root).unwrap();
        tree.set_answer_text(root, yes, "Yes");
        let child = tree.add_node(root, 0).unwrap();
        tree.set_question(child, "Any error shown?");
        let none = tree.add_answer(child).unwrap();
        tree.set_answer_text(child, none, "No error");
        tree
    }

    #[test]
    fn walk_accumulates_the_path_in_order() {
        let tree = two_level_tree();
        let mut w = PreviewWalker::start(&tree);
        w.choose(&tree, 0);
        assert!(!w.ended());
        w.choose(&tree, 0); // terminal (next_node is None)
        assert!(w.ended());
        assert_eq!(
            w.path(),
            &[
                PathEntry {
                    question: "Does it power on?".into(),
                    answer: "Yes".into()
                },
                PathEntry {
                    question: "Any error shown?".into(),
                    answer: "No error".into()
                },
            ]
        );
    }

    #[test]
    fn dangling_reference_ends_like_a_terminal() {
        let mut tree = two_level_tree();
        // Point the root's answer at a node that does not exist.
        tree.root.answers[0].next_node = Some(Id::intern("gone"));
        let mut w = PreviewWalker::start(&tree);
        w.choose(&tree, 0);
        assert!(w.ended());
        assert_eq!(w.path().len(), 1);
        // Further choices are ignored, not errors.
        w.choose(&tree, 0);
        assert_eq!(w.path().len(), 1);
    }

    #[test]
    fn missing_answer_index_is_ignored() {
        let tree = two_level_tree();
        let mut w = PreviewWalker::start(&tree);
        w.choose(&tree, 9);
        assert!(!w.ended());
        assert!(w.path().is_empty());
    }

    #[test]
    fn restart_is_the_only_reset() {
        let tree = two_level_tree();
        let mut w = PreviewWalker::start(&tree);
        w.choose(&tree, 0);
        w.restart(&tree);
        assert!(w.path().is_empty());
        assert_eq!(w.current(), Some(tree.root.id));
    }

    #[test]
    fn node_deleted_mid_walk_ends_gracefully() {
        let mut tree = two_level_tree();
        let mut w = PreviewWalker::start(&tree);
        w.choose(&tree, 0); // now standing on the child
        tree.nodes.clear();
        w.choose(&tree, 0);
        assert!(w.ended());
    }
}
