//! Step-level collection operations — the block primitives one level up.
//!
//! Same immutable-snapshot discipline as `collection`: fresh `Vec<Step>` out,
//! input untouched. Two extra rules apply at this level: a document must
//! retain at least one step, and `order` is renumbered 0..n-1 after every
//! structural change so array position and stored order never drift apart.

use crate::id::Id;
use crate::model::Step;
use log::debug;

/// Renumber `order` to match array position.
fn renumber(steps: &mut [Step]) {
    for (i, step) in steps.iter_mut().enumerate() {
        step.order = i as u32;
    }
}

/// Append a step and renumber.
pub fn add_step(steps: &[Step], step: Step) -> Vec<Step> {
    let mut out = steps.to_vec();
    out.push(step);
    renumber(&mut out);
    out
}

/// Insert a step immediately after position `index` (`-1` prepends, clamped)
/// and renumber.
pub fn insert_step_after(steps: &[Step], step: Step, index: isize) -> Vec<Step> {
    let len = steps.len() as isize;
    let at = (index + 1).clamp(0, len) as usize;
    let mut out = steps.to_vec();
    out.insert(at, step);
    renumber(&mut out);
    out
}

/// Remove the step with `id` and renumber. Rejected (input returned
/// unchanged) when it would leave the document with zero steps; no-op when
/// the id is missing.
pub fn delete_step(steps: &[Step], id: Id) -> Vec<Step> {
    if steps.len() <= 1 {
        debug!("refusing to delete the last remaining step {id}");
        return steps.to_vec();
    }
    let mut out: Vec<Step> = steps.iter().filter(|s| s.id != id).cloned().collect();
    if out.len() == steps.len() {
        return out;
    }
    renumber(&mut out);
    out
}

/// Move the step `from` to the position occupied by `to` (array-move, not
/// swap) and renumber. No-op if either id is missing or they are equal.
pub fn move_step(steps: &[Step], from: Id, to: Id) -> Vec<Step> {
    let mut out = steps.to_vec();
    if from == to {
        return out;
    }
    let (Some(from_idx), Some(to_idx)) = (
        out.iter().position(|s| s.id == from),
        out.iter().position(|s| s.id == to),
    ) else {
        return out;
    };
    let moved = out.remove(from_idx);
    out.insert(to_idx, moved);
    renumber(&mut out);
    out
}

/// Replace one step's block sequence with a new snapshot (the output of a
/// `collection` operation). No-op if the id is missing.
pub fn replace_blocks(steps: &[Step], id: Id, blocks: Vec<crate::model::Block>) -> Vec<Step> {
    steps
        .iter()
        .map(|s| {
            if s.id == id {
                let mut updated = s.clone();
                updated.blocks = blocks.clone();
                updated
            } else {
                s.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn titled(title: &str) -> Step {
        Step::new(title)
    }

    fn titles(steps: &[Step]) -> Vec<&str> {
        steps.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn add_step_renumbers() {
        let steps = add_step(&[titled("one")], titled("two"));
        assert_eq!(titles(&steps), vec!["one", "two"]);
        assert_eq!(
            steps.iter().map(|s| s.order).collect::<Vec<_>>(),
            vec![0, 1]
        );
    }

    #[test]
    fn delete_last_step_is_rejected() {
        let steps = vec![titled("only")];
        let id = steps[0].id;
        let out = delete_step(&steps, id);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, id);
    }

    #[test]
    fn delete_renumbers_survivors() {
        let steps = add_step(&add_step(&[titled("a")], titled("b")), titled("c"));
        let b = steps[1].id;
        let out = delete_step(&steps, b);
        assert_eq!(titles(&out), vec!["a", "c"]);
        assert_eq!(out.iter().map(|s| s.order).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn move_step_is_array_move() {
        let steps = add_step(
            &add_step(&add_step(&[titled("A")], titled("B")), titled("C")),
            titled("D"),
        );
        let a = steps[0].id;
        let c = steps[2].id;
        let out = move_step(&steps, a, c);
        assert_eq!(titles(&out), vec!["B", "C", "A", "D"]);
        assert_eq!(
            out.iter().map(|s| s.order).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn move_step_missing_id_is_noop() {
        let steps = add_step(&[titled("a")], titled("b"));
        let out = move_step(&steps, steps[0].id, Id::generate("stp"));
        assert_eq!(out, steps);
    }

    #[test]
    fn insert_step_after_clamps() {
        let steps = vec![titled("a")];
        let out = insert_step_after(&steps, titled("x"), -10);
        assert_eq!(titles(&out), vec!["x", "a"]);
        let out = insert_step_after(&steps, titled("y"), 10);
        assert_eq!(titles(&out), vec!["a", "y"]);
    }

    #[test]
    fn replace_blocks_targets_one_step() {
        use crate::model::{Block, BlockKind};
        let steps = add_step(&[titled("a")], titled("b"));
        let target = steps[1].id;
        let out = replace_blocks(&steps, target, vec![Block::new(BlockKind::Text)]);
        assert_eq!(out[0].blocks.len(), 0);
        assert_eq!(out[1].blocks.len(), 1);
        // input untouched
        assert_eq!(steps[1].blocks.len(), 0);
    }
}
