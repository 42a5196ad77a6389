use crate::{basis::Color, catalog::Rates};

/// 同点を崩すための副次項の重み. 許容性を壊さないよう十分に小さくする.
const TIE_BREAK_SCALE: f64 = 1e-6;

/// `Heuristic` は目標色までに必要な餌の数を下から見積もる.
#[derive(Debug, Clone)]
pub(crate) struct Heuristic {
    target: Color,
    rates: Rates,
    weight: f64,
}

impl Heuristic {
    pub(crate) fn new(target: Color, rates: Rates, weight: f64) -> Self {
        Self {
            target,
            rates,
            weight,
        }
    }

    /// 三つの下界の最大値. どれも許容的なので最大値も許容的.
    pub(crate) fn lower_bound(&self, state: Color) -> f64 {
        let gap = state.gap_to(self.target);
        let rates = &self.rates;

        // チャンネルごとに独立に詰めるとしたときの, 最も遅いチャンネル.
        let per_axis = gap
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                if d > 0 {
                    d as f64 / rates.raise[i]
                } else {
                    -d as f64 / rates.lower[i]
                }
            })
            .fold(0.0, f64::max);

        // 合計値の差は一つの餌で動かせる合計の上限でしか詰められない.
        let mass: i32 = gap.iter().sum();
        let by_mass = if mass > 0 {
            mass as f64 / rates.mass_raise
        } else {
            -mass as f64 / rates.mass_lower
        };

        let by_distance = state.distance(self.target) / rates.stride;

        per_axis.max(by_mass).max(by_distance)
    }

    /// 探索で使う見積もり. 重みを掛け, マンハッタン距離と合計値の差による小さな項で同点を崩す.
    pub(crate) fn estimate(&self, state: Color) -> f64 {
        let gap = state.gap_to(self.target);
        let manhattan: i32 = gap.iter().map(|d| d.abs()).sum();
        let mass: i32 = gap.iter().sum();
        let secondary = (manhattan + mass.abs()) as f64 * TIE_BREAK_SCALE;
        self.lower_bound(state) * self.weight + secondary
    }
}
