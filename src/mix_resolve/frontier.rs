use std::{cmp::Ordering, collections::BinaryHeap};

use crate::basis::Color;

/// 探索の候補. `priority` は `cost` に残りの見積もりを足したもの.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchNode {
    pub(crate) state: Color,
    pub(crate) cost: u16,
    pub(crate) priority: f64,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// `BinaryHeap` は最大ヒープなので, 先に取り出したいものほど大きくなるように比べる.
///
/// `priority` が小さいほど先. 同じなら `cost` が大きい (深い) ほど先. 対称な平坦部を幅優先のように広げるのを避け, 一つの方向に潜らせる.
impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| self.cost.cmp(&other.cost))
    }
}

/// `Frontier` は未展開のノードを見積もりの小さい順に取り出す二分ヒープ.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    heap: BinaryHeap<SearchNode>,
}

impl Frontier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, node: SearchNode) {
        self.heap.push(node);
    }

    /// 最も優先度の高いノードを取り出す. 空なら `None`.
    pub(crate) fn extract_min(&mut self) -> Option<SearchNode> {
        self.heap.pop()
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
