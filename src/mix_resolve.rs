use anyhow::Result;
use serde::Serialize;

use self::{a_star::a_star, greedy::presolve, visited::VisitedStore, yield_point::Never};
use crate::{
    basis::{Color, Mode, Tolerance},
    catalog::{ActionId, Catalog},
    config::SolverConfig,
    space::Space,
};

mod a_star;
mod frontier;
mod greedy;
mod heuristic;
pub mod visited;
pub mod yield_point;

pub use yield_point::{Deadline, Progress, YieldPoint};

/// 探索の終わり方.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// 許容誤差内の色に着いた.
    Reached,
    /// 予算を使い切った, または候補が尽きた. 経路は最も近かった色へ向かう.
    Exhausted,
    /// `YieldPoint` に打ち切られた. 経路は最も近かった色へ向かう.
    Cancelled,
}

/// 一回の問い合わせ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub start: Color,
    pub target: Color,
    pub tolerance: Tolerance,
    pub mode: Mode,
}

/// `Solution` は与える餌の順番と, それで着く色を表す.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub path: Vec<ActionId>,
    /// `path` のうち貪欲法で決めた先頭部分の長さ.
    pub prefix_len: usize,
    pub reached: Color,
    pub outcome: Outcome,
    pub iterations: u64,
}

impl Solution {
    pub fn converged(&self) -> bool {
        self.outcome == Outcome::Reached
    }
}

/// `Solver` はカタログと, 探索の間で使い回す訪問記録を持つ.
///
/// 訪問記録は世代番号で探索ごとに分離されるが, 二つの探索が同時に同じ記録を使うことはできない. `solve` が `&mut self` を取るのはそのため.
/// 並行に解くなら `Solver` を別々に作る.
#[derive(Debug)]
pub struct Solver {
    space: Space,
    catalog: Catalog,
    store: VisitedStore,
}

impl Solver {
    pub fn new(space: Space, catalog: Catalog) -> Self {
        Self {
            space,
            catalog,
            store: VisitedStore::new(space),
        }
    }

    /// ゲームの色空間と餌で作る.
    pub fn livly() -> Self {
        Self::new(Space::LIVLY, Catalog::livly())
    }

    pub fn space(&self) -> Space {
        self.space
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// モードの標準設定で解く.
    pub fn solve(&mut self, request: &Request) -> Result<Solution> {
        let config = SolverConfig::for_mode(request.mode);
        self.solve_with(request, &config, &mut Never)
    }

    /// `start` から `target` の許容誤差内へ着く最短の餌の列を求める.
    ///
    /// 予算内に着けなかった場合も `Err` にはならず, 最も近かった色への経路を `Outcome::Exhausted` で返す. 範囲外の色は `Err`.
    pub fn solve_with(
        &mut self,
        request: &Request,
        config: &SolverConfig,
        yield_point: &mut dyn YieldPoint,
    ) -> Result<Solution> {
        let start = self.space.check(request.start)?;
        let target = self.space.check(request.target)?;

        let greedy = presolve(self.space, &self.catalog, config, start, target);
        tracing::debug!(
            prefix = greedy.prefix.len(),
            reduced = ?greedy.reduced,
            "greedy phase done"
        );

        let search = a_star(
            &self.catalog,
            config,
            &mut self.store,
            greedy.reduced,
            target,
            request.tolerance,
            yield_point,
        );

        let prefix_len = greedy.prefix.len();
        let mut path = greedy.prefix;
        path.extend(search.suffix);

        tracing::info!(
            mode = %request.mode,
            start = %start,
            target = %target,
            steps = path.len(),
            outcome = ?search.outcome,
            "solved"
        );

        Ok(Solution {
            path,
            prefix_len,
            reached: search.reached,
            outcome: search.outcome,
            iterations: search.iterations,
        })
    }
}
