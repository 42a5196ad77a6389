use crate::{
    basis::Color,
    space::{Space, VecOnSpace},
};

/// `VisitedStore` は探索中に各色へ着いた最小コストを, 空間全体の密な配列で持つ.
///
/// 世代番号が現在の探索と一致する記録だけが有効で, 古い世代の記録はコストに関わらず未訪問として扱う. これで探索ごとに配列全体を消さずに使い回せる.
/// 世代 0 は一度も訪れていないことを表すので探索には使わない.
#[derive(Debug, Clone)]
pub struct VisitedStore {
    cost: VecOnSpace<u16>,
    generation: VecOnSpace<u16>,
    current: u16,
}

impl VisitedStore {
    pub fn new(space: Space) -> Self {
        Self {
            cost: VecOnSpace::with_init(space, 0),
            generation: VecOnSpace::with_init(space, 0),
            current: 0,
        }
    }

    pub fn space(&self) -> Space {
        self.cost.space()
    }

    pub fn generation(&self) -> u16 {
        self.current
    }

    /// 新しい探索を始める. 世代番号が上限に達したら世代の配列を全て消して 1 からやり直す.
    pub fn begin_run(&mut self) -> u16 {
        self.current += 1;
        if self.current == u16::MAX {
            self.generation.fill(0);
            self.current = 1;
        }
        self.current
    }

    /// 現在の探索で記録された最小コスト. 記録が無ければ `None`.
    pub fn best(&self, index: usize) -> Option<u16> {
        if *self.generation.at(index) == self.current {
            Some(*self.cost.at(index))
        } else {
            None
        }
    }

    /// `cost` が今の記録より良ければ記録して `true` を返す.
    pub fn improve(&mut self, index: usize, cost: u16) -> bool {
        if self.best(index).map_or(false, |best| best <= cost) {
            return false;
        }
        *self.cost.at_mut(index) = cost;
        *self.generation.at_mut(index) = self.current;
        true
    }

    /// 取り出したノードが古い (より良いコストで既に記録されている) か.
    pub fn is_stale(&self, index: usize, cost: u16) -> bool {
        self.best(index).map_or(false, |best| cost > best)
    }

    pub fn best_of(&self, color: Color) -> Option<u16> {
        self.best(self.space().index(color))
    }
}
