use std::ops;

use super::Space;
use crate::basis::Color;

/// `VecOnSpace` は `Space` 上の全ての色に値を対応付けて格納し, `Color` でアクセスできるコンテナを提供する.
///
/// 空間全体の大きさを確保するので, ゲームの空間では 9 千万要素を超える.
#[derive(Clone, PartialEq, Eq)]
pub struct VecOnSpace<T> {
    vec: Vec<T>,
    space: Space,
}

impl<T> VecOnSpace<T> {
    pub fn with_init(space: Space, init: T) -> Self
    where
        T: Clone,
    {
        Self {
            vec: vec![init; space.len()],
            space,
        }
    }

    pub fn space(&self) -> Space {
        self.space
    }

    /// 全要素を `value` で埋める.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.vec.fill(value)
    }

    /// 添字で直接アクセスする. 添字は `Space::index` で得たものに限る.
    pub fn at(&self, index: usize) -> &T {
        &self.vec[index]
    }

    pub fn at_mut(&mut self, index: usize) -> &mut T {
        &mut self.vec[index]
    }

    /// 借用のイテレータを作る.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.vec.iter()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for VecOnSpace<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VecOnSpace")
            .field("space", &self.space)
            .field("len", &self.vec.len())
            .finish()
    }
}

impl<T> ops::Index<Color> for VecOnSpace<T> {
    type Output = T;

    fn index(&self, index: Color) -> &Self::Output {
        &self.vec[self.space.index(index)]
    }
}

impl<T> ops::IndexMut<Color> for VecOnSpace<T> {
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        let index = self.space.index(index);
        &mut self.vec[index]
    }
}

#[test]
fn test_vec_on_space() {
    let space = Space::new(3);
    let mut costs = VecOnSpace::with_init(space, 0u16);
    assert_eq!(costs.iter().count(), 64);

    costs[Color::new(1, 2, 3)] = 7;
    assert_eq!(costs[Color::new(1, 2, 3)], 7);
    assert_eq!(*costs.at(space.index(Color::new(1, 2, 3))), 7);
    assert_eq!(costs[Color::new(3, 2, 1)], 0);

    costs.fill(9);
    assert!(costs.iter().all(|&c| c == 9));
}
