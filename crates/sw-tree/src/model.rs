//! Decision tree document model.
//!
//! A tree is a flat node array plus a distinguished root. Answers reference
//! their next node by id; a reference to a node that does not (or no longer)
//! exist is *representable state*, not an error — removal never cascades, and
//! the preview walker treats a dangling reference as a terminal. Builder
//! operations therefore never validate graph shape; `lint` reports on it
//! instead.

use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use sw_core::Id;

/// The root node id. It is fixed, lives outside `nodes`, and every tree has
/// exactly one.
pub const ROOT_ID: &str = "root";

/// One selectable answer on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: Id,
    pub text: String,
    /// The node this answer leads to. `None` is a terminal; a dangling id
    /// behaves the same at walk time.
    pub next_node: Option<Id>,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Id::generate("ans"),
            text: text.into(),
            next_node: None,
        }
    }
}

/// A question node with its outgoing answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: Id,
    pub question: String,
    pub answers: SmallVec<[Answer; 4]>,
}

impl TreeNode {
    pub fn new(id: Id) -> Self {
        Self {
            id,
            question: String::new(),
            answers: SmallVec::new(),
        }
    }
}

/// A decision tree: the root node plus every non-root node it ever grew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub id: Id,
    pub title: String,
    /// The entry node. Its id is always [`ROOT_ID`].
    pub root: TreeNode,
    /// Non-root nodes, in creation order. Orphans stay here until deleted.
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Id::generate("tree"),
            title: title.into(),
            root: TreeNode::new(Id::intern(ROOT_ID)),
            nodes: Vec::new(),
        }
    }

    /// Look up a node by id, root included.
    pub fn node(&self, id: Id) -> Option<&TreeNode> {
        if self.root.id == id {
            return Some(&self.root);
        }
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: Id) -> Option<&mut TreeNode> {
        if self.root.id == id {
            return Some(&mut self.root);
        }
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Append an empty answer to `node`. Returns the answer id, or `None`
    /// when the node does not exist.
    pub fn add_answer(&mut self, node: Id) -> Option<Id> {
        let n = self.node_mut(node)?;
        let answer = Answer::new("");
        let id = answer.id;
        n.answers.push(answer);
        Some(id)
    }

    /// Create a fresh node and point `parent`'s answer at `answer_index` to
    /// it. This is the only operation that creates an edge to a *new* node.
    /// Returns the new node's id, or `None` when the parent or index is
    /// missing.
    pub fn add_node(&mut self, parent: Id, answer_index: usize) -> Option<Id> {
        let node = TreeNode::new(Id::generate("node"));
        let id = node.id;
        let answer = self.node_mut(parent)?.answers.get_mut(answer_index)?;
        answer.next_node = Some(id);
        self.nodes.push(node);
        debug!("added node {id} under {parent} answer {answer_index}");
        Some(id)
    }

    /// Remove an answer. The node it pointed to is untouched; if nothing else
    /// reaches it, it becomes an orphan.
    pub fn remove_answer(&mut self, node: Id, answer: Id) {
        if let Some(n) = self.node_mut(node) {
            n.answers.retain(|a| a.id != answer);
        }
    }

    /// Clear an answer's target without removing the answer. The downstream
    /// node stays in `nodes`.
    pub fn detach_answer(&mut self, node: Id, answer: Id) {
        if let Some(a) = self.answer_mut(node, answer) {
            a.next_node = None;
        }
    }

    pub fn set_question(&mut self, node: Id, question: impl Into<String>) {
        if let Some(n) = self.node_mut(node) {
            n.question = question.into();
        }
    }

    pub fn set_answer_text(&mut self, node: Id, answer: Id, text: impl Into<String>) {
        if let Some(a) = self.answer_mut(node, answer) {
            a.text = text.into();
        }
    }

    fn answer_mut(&mut self, node: Id, answer: Id) -> Option<&mut Answer> {
        self.node_mut(node)?.answers.iter_mut().find(|a| a.id == answer)
    }

    /// Iterate every node, root first.
    pub fn all_nodes(&self) -> impl Iterator<Item = &TreeNode> {
        std::iter::once(&self.root).chain(self.nodes.iter())
    }
}

/// The decision trees attached to one step, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeCollection {
    pub trees: Vec<DecisionTree>,
}

impl TreeCollection {
    pub fn add(&mut self, title: impl Into<String>) -> Id {
        let tree = DecisionTree::new(title);
        let id = tree.id;
        self.trees.push(tree);
        id
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.trees.len() {
            self.trees.remove(index);
        }
    }

    pub fn get(&self, id: Id) -> Option<&DecisionTree> {
        self.trees.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut DecisionTree> {
        self.trees.iter_mut().find(|t| t.id == id)
    }
}
