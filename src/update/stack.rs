//! Child-stack primitives
//!
//! Insert, replace and remove on a node's `children`, keeping the
//! `parent`/`root` back-references and a split's slider boundaries in step.

use crate::model::{Edge, NodeId, Registry};

/// Position of `child` in `parent`'s stack
pub fn find(registry: &Registry, parent: NodeId, child: NodeId) -> Option<usize> {
    registry.children(parent).iter().position(|&c| c == child)
}

/// Put `child` into `parent`'s stack at `index` (appended when out of range).
///
/// Sliders are not touched; splits go through [`insert_beside`].
pub fn insert(registry: &mut Registry, parent: NodeId, child: NodeId, index: Option<usize>) {
    let Some(parent_node) = registry.get_mut(parent) else {
        return;
    };
    let root = parent_node.root;
    match index {
        Some(i) if i < parent_node.children.len() => parent_node.children.insert(i, child),
        _ => parent_node.children.push(child),
    }
    if let Some(node) = registry.get_mut(child) {
        node.parent = Some(parent);
        node.root = root;
    }
}

/// Insert `new` next to `target` inside the split `split`, on the side named
/// by `edge`, and give it a share of `target`'s slider segment proportional
/// to the two nodes' split weights.
pub fn insert_beside(
    registry: &mut Registry,
    split: NodeId,
    target: NodeId,
    new: NodeId,
    edge: Edge,
) -> bool {
    let Some(t) = find(registry, split, target) else {
        return false;
    };
    let wt = registry.get(target).map_or(1.0, |n| n.split_weight);
    let wn = registry.get(new).map_or(1.0, |n| n.split_weight);
    let Some(split_node) = registry.get_mut(split) else {
        return false;
    };
    let root = split_node.root;
    let count = split_node.children.len();
    let Some(data) = split_node.split_mut() else {
        return false;
    };
    if data.sliders.len() != count + 1 {
        reset_uniform(&mut data.sliders, count);
    }

    let (start, end) = (data.sliders[t], data.sliders[t + 1]);
    let share = if edge.is_leading() {
        weight_fraction(wn, wt)
    } else {
        weight_fraction(wt, wn)
    };
    data.sliders.insert(t + 1, start + (end - start) * share);

    let index = if edge.is_leading() { t } else { t + 1 };
    split_node.children.insert(index, new);

    if let Some(node) = registry.get_mut(new) {
        node.parent = Some(split);
        node.root = root;
        node.split_hint = Some(edge);
    }
    true
}

/// Swap `old` for `new` in `parent`'s stack, keeping its slot and sliders
pub fn replace(registry: &mut Registry, parent: NodeId, old: NodeId, new: NodeId) -> bool {
    let Some(i) = find(registry, parent, old) else {
        return false;
    };
    let Some(parent_node) = registry.get_mut(parent) else {
        return false;
    };
    let root = parent_node.root;
    parent_node.children[i] = new;

    if let Some(node) = registry.get_mut(new) {
        node.parent = Some(parent);
        node.root = root;
    }
    if let Some(node) = registry.get_mut(old) {
        node.parent = None;
        node.root = None;
    }
    true
}

/// Take `child` out of `parent`'s stack.
///
/// In a split, the boundary on the side the child was inserted against is
/// dropped, so the neighbor it was split from gets its space back.
pub fn remove(registry: &mut Registry, parent: NodeId, child: NodeId) -> bool {
    let Some(i) = find(registry, parent, child) else {
        return false;
    };
    let hint = registry.get(child).and_then(|n| n.split_hint);
    let Some(parent_node) = registry.get_mut(parent) else {
        return false;
    };
    let n = parent_node.children.len();
    parent_node.children.remove(i);

    if let Some(data) = parent_node.split_mut() {
        if n <= 1 || data.sliders.len() != n + 1 {
            reset_uniform(&mut data.sliders, n.saturating_sub(1));
        } else {
            let leading = hint.is_some_and(Edge::is_leading);
            let boundary = if leading { i + 1 } else { i };
            data.sliders.remove(boundary.clamp(1, n - 1));
        }
    }

    if let Some(node) = registry.get_mut(child) {
        node.parent = None;
        node.root = None;
    }
    true
}

/// Fraction of a segment that goes to `first` when shared with `second`
pub fn weight_fraction(first: f32, second: f32) -> f32 {
    let total = first + second;
    if total > 0.0 {
        first / total
    } else {
        0.5
    }
}

/// Boundaries weighted by `weights`: first 0, last 1
pub fn weighted_sliders(weights: &[f32]) -> Vec<f32> {
    let total: f32 = weights.iter().map(|w| w.max(0.0)).sum();
    if weights.is_empty() {
        return vec![0.0, 1.0];
    }
    if total <= 0.0 {
        let mut sliders = Vec::new();
        reset_uniform(&mut sliders, weights.len());
        return sliders;
    }
    let mut sliders = Vec::with_capacity(weights.len() + 1);
    let mut acc = 0.0;
    sliders.push(0.0);
    for w in &weights[..weights.len() - 1] {
        acc += w.max(0.0);
        sliders.push(acc / total);
    }
    sliders.push(1.0);
    sliders
}

fn reset_uniform(sliders: &mut Vec<f32>, count: usize) {
    sliders.clear();
    if count == 0 {
        sliders.extend([0.0, 1.0]);
        return;
    }
    sliders.extend((0..=count).map(|i| i as f32 / count as f32));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Kind;

    fn split_with(registry: &mut Registry, labels: &[&str]) -> (NodeId, Vec<NodeId>) {
        let split = registry.find_or_create("S", Kind::VSplit);
        let ids: Vec<NodeId> = labels
            .iter()
            .map(|l| registry.find_or_create(l, Kind::Container))
            .collect();
        for &id in &ids {
            insert(registry, split, id, None);
        }
        if let Some(data) = registry.get_mut(split).and_then(|n| n.split_mut()) {
            data.sliders = weighted_sliders(&vec![1.0; ids.len()]);
        }
        (split, ids)
    }

    fn sliders(registry: &Registry, split: NodeId) -> Vec<f32> {
        registry.get(split).unwrap().sliders().to_vec()
    }

    #[test]
    fn test_insert_after_splits_target_segment() {
        let mut registry = Registry::new();
        let (split, ids) = split_with(&mut registry, &["A", "B"]);
        let c = registry.find_or_create("C", Kind::Container);

        assert!(insert_beside(&mut registry, split, ids[1], c, Edge::Right));
        assert_eq!(registry.children(split), &[ids[0], ids[1], c]);
        assert_eq!(sliders(&registry, split), vec![0.0, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_insert_before_uses_weights() {
        let mut registry = Registry::new();
        let (split, ids) = split_with(&mut registry, &["A", "B"]);
        let c = registry.find_or_create("C", Kind::Container);
        registry.get_mut(c).unwrap().split_weight = 3.0;

        assert!(insert_beside(&mut registry, split, ids[0], c, Edge::Left));
        assert_eq!(registry.children(split), &[c, ids[0], ids[1]]);
        assert_eq!(sliders(&registry, split), vec![0.0, 0.375, 0.5, 1.0]);
    }

    #[test]
    fn test_remove_undoes_insert_on_either_side() {
        for edge in [Edge::Left, Edge::Right] {
            let mut registry = Registry::new();
            let (split, ids) = split_with(&mut registry, &["A", "B", "D"]);
            let before = sliders(&registry, split);
            let c = registry.find_or_create("C", Kind::Container);

            insert_beside(&mut registry, split, ids[1], c, edge);
            remove(&mut registry, split, c);

            assert_eq!(registry.children(split), ids.as_slice());
            assert_eq!(sliders(&registry, split), before, "edge {edge:?}");
            assert_eq!(registry.get(c).unwrap().parent, None);
        }
    }

    #[test]
    fn test_remove_first_and_last_keep_endpoints() {
        let mut registry = Registry::new();
        let (split, ids) = split_with(&mut registry, &["A", "B", "C", "D"]);
        remove(&mut registry, split, ids[0]);
        assert_eq!(sliders(&registry, split), vec![0.0, 0.5, 0.75, 1.0]);
        remove(&mut registry, split, ids[3]);
        assert_eq!(sliders(&registry, split), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_replace_keeps_slot() {
        let mut registry = Registry::new();
        let (split, ids) = split_with(&mut registry, &["A", "B"]);
        let c = registry.find_or_create("C", Kind::Container);
        assert!(replace(&mut registry, split, ids[0], c));
        assert_eq!(registry.children(split), &[c, ids[1]]);
        assert_eq!(registry.get(c).unwrap().parent, Some(split));
        assert_eq!(registry.get(ids[0]).unwrap().parent, None);
        assert!(!replace(&mut registry, split, ids[0], c));
    }

    #[test]
    fn test_weighted_sliders() {
        assert_eq!(weighted_sliders(&[1.0, 1.0]), vec![0.0, 0.5, 1.0]);
        assert_eq!(weighted_sliders(&[1.0, 3.0]), vec![0.0, 0.25, 1.0]);
        assert_eq!(weighted_sliders(&[0.0, 0.0]), vec![0.0, 0.5, 1.0]);
        assert_eq!(weighted_sliders(&[2.0]), vec![0.0, 1.0]);
    }
}
