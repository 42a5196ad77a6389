use anyhow::{ensure, Result};

use crate::basis::{Color, Delta, MAX_CHANNEL};

mod vec_on_space;

pub use vec_on_space::VecOnSpace;

/// `Space` は各チャンネルを `[0, max]` に制限した色空間を表す. `Color` の添字付けと範囲への切り詰めはこれを介して行う.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Space {
    max: u16,
}

impl Default for Space {
    fn default() -> Self {
        Self::LIVLY
    }
}

impl Space {
    /// ゲームの色空間. 各チャンネルは `0..=450`.
    pub const LIVLY: Space = Space { max: MAX_CHANNEL };

    pub fn new(max: u16) -> Self {
        Self { max }
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    /// 一辺の長さ `max + 1`.
    pub fn side(&self) -> usize {
        self.max as usize + 1
    }

    /// 空間に含まれる色の総数 `(max + 1)^3`.
    pub fn len(&self) -> usize {
        self.side() * self.side() * self.side()
    }

    pub fn contains(&self, color: Color) -> bool {
        color.r <= self.max && color.g <= self.max && color.b <= self.max
    }

    /// 範囲外の色を拒否する. 添字を計算する前に呼び出し側の入力はこれで検査する.
    pub fn check(&self, color: Color) -> Result<Color> {
        ensure!(
            self.contains(color),
            "color {} is out of domain: every channel must be in 0..={}",
            color,
            self.max
        );
        Ok(color)
    }

    /// 範囲内の色を `r + g * side + b * side^2` の一意な添字に写す. 範囲外の色を渡してはいけない.
    pub fn index(&self, color: Color) -> usize {
        debug_assert!(self.contains(color), "{:?} is out of {:?}", color, self);
        let side = self.side();
        color.r as usize + color.g as usize * side + color.b as usize * side * side
    }

    /// `index` の逆写像.
    pub fn color_at(&self, index: usize) -> Color {
        debug_assert!(index < self.len());
        let side = self.side();
        Color {
            r: (index % side) as u16,
            g: (index / side % side) as u16,
            b: (index / (side * side)) as u16,
        }
    }

    /// 各チャンネルを `[0, max]` に切り詰めて色を作る.
    pub fn clamping_color(&self, r: i32, g: i32, b: i32) -> Color {
        let max = self.max as i32;
        Color {
            r: r.clamp(0, max) as u16,
            g: g.clamp(0, max) as u16,
            b: b.clamp(0, max) as u16,
        }
    }

    /// `color` に `delta` を足して切り詰める.
    pub fn apply(&self, color: Color, delta: Delta) -> Color {
        self.clamping_color(
            color.r as i32 + delta.r as i32,
            color.g as i32 + delta.g as i32,
            color.b as i32 + delta.b as i32,
        )
    }

    pub fn all_colors(&self) -> impl Iterator<Item = Color> + '_ {
        (0..self.len()).map(move |index| self.color_at(index))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_index_is_injective() {
        let space = Space::new(12);
        let mut seen = HashSet::new();
        for color in space.all_colors() {
            let index = space.index(color);
            assert!(index < space.len());
            assert!(seen.insert(index), "collision at {:?}", color);
            assert_eq!(space.color_at(index), color);
        }
        assert_eq!(seen.len(), 13 * 13 * 13);
    }

    #[test]
    fn test_livly_corners() {
        let space = Space::LIVLY;
        assert_eq!(space.index(Color::new(0, 0, 0)), 0);
        assert_eq!(space.index(Color::new(1, 0, 0)), 1);
        assert_eq!(space.index(Color::new(0, 1, 0)), 451);
        assert_eq!(space.index(Color::new(0, 0, 1)), 451 * 451);
        assert_eq!(space.index(Color::new(450, 450, 450)), space.len() - 1);
        assert_eq!(
            space.color_at(space.index(Color::new(17, 300, 449))),
            Color::new(17, 300, 449)
        );
    }

    #[test]
    fn test_apply_clamps_each_channel() {
        let space = Space::LIVLY;
        let ant = Delta::new(-2, -2, -2);
        let larva = Delta::new(7, 0, 0);
        assert_eq!(space.apply(Color::new(1, 0, 5), ant), Color::new(0, 0, 3));
        assert_eq!(space.apply(Color::new(448, 3, 3), larva), Color::new(450, 3, 3));
    }

    #[test]
    fn test_check_rejects_out_of_domain() {
        let space = Space::LIVLY;
        assert!(space.check(Color::new(450, 0, 450)).is_ok());
        let err = space.check(Color::new(451, 0, 0)).unwrap_err();
        assert!(err.to_string().contains("out of domain"));
        assert!(Space::new(20).check(Color::new(0, 21, 0)).is_err());
    }
}
