use std::{collections::HashMap, ops::ControlFlow};

use super::{
    frontier::{Frontier, SearchNode},
    heuristic::Heuristic,
    visited::VisitedStore,
    yield_point::{Progress, YieldPoint},
    Outcome,
};
use crate::{
    basis::{Color, Tolerance},
    catalog::{ActionId, Catalog},
    config::SolverConfig,
};

/// ある色に最後に着いたときの, 一つ前の色とそこで与えた餌.
type BackPath = HashMap<usize, (Color, ActionId)>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchResult {
    pub(crate) suffix: Vec<ActionId>,
    pub(crate) reached: Color,
    pub(crate) outcome: Outcome,
    pub(crate) iterations: u64,
}

/// 貪欲法の後に残った差を A* で詰める.
///
/// 目標から許容誤差内の色に着けばそこまでの経路を, 予算を使い切るか打ち切られたら最も近かった色への経路を返す.
pub(crate) fn a_star(
    catalog: &Catalog,
    config: &SolverConfig,
    store: &mut VisitedStore,
    start: Color,
    target: Color,
    tolerance: Tolerance,
    yield_point: &mut dyn YieldPoint,
) -> SearchResult {
    let space = store.space();
    let heuristic = Heuristic::new(target, *catalog.rates(), config.weight);
    let goal_radius = tolerance.goal_radius();

    store.begin_run();
    let mut back_path = BackPath::new();
    let mut frontier = Frontier::new();

    store.improve(space.index(start), 0);
    frontier.insert(SearchNode {
        state: start,
        cost: 0,
        priority: heuristic.estimate(start),
    });

    let mut closest = start;
    let mut closest_distance = f64::INFINITY;
    let mut iterations = 0u64;
    let mut outcome = Outcome::Exhausted;

    while let Some(node) = frontier.extract_min() {
        iterations += 1;
        if config.yield_every != 0 && iterations % config.yield_every == 0 {
            let progress = Progress {
                iterations,
                frontier: frontier.len(),
                closest,
                closest_distance,
            };
            tracing::trace!(?progress, "yield");
            if let ControlFlow::Break(()) = yield_point.suspend(progress) {
                outcome = Outcome::Cancelled;
                break;
            }
        }

        let index = space.index(node.state);
        if store.is_stale(index, node.cost) {
            continue;
        }

        let distance = node.state.distance(target);
        if distance < closest_distance {
            closest_distance = distance;
            closest = node.state;
        }

        if distance <= goal_radius {
            outcome = Outcome::Reached;
            break;
        }

        if iterations > config.max_iterations {
            break;
        }
        if node.cost >= config.max_depth {
            continue;
        }

        let next_cost = node.cost + 1;
        for &id in catalog.expansion_order() {
            let next = space.apply(node.state, catalog.delta(id));
            let next_index = space.index(next);
            if store.improve(next_index, next_cost) {
                back_path.insert(next_index, (node.state, id));
                frontier.insert(SearchNode {
                    state: next,
                    cost: next_cost,
                    priority: next_cost as f64 + heuristic.estimate(next),
                });
            }
        }
    }

    tracing::debug!(
        ?outcome,
        iterations,
        ?closest,
        closest_distance,
        left = frontier.len(),
        drained = frontier.is_empty(),
        "search finished"
    );

    let guard = config.max_depth as usize + 1;
    SearchResult {
        suffix: extract_back_path(space.index(closest), &back_path, store, guard),
        reached: closest,
        outcome,
        iterations,
    }
}

/// `back_path` を終点から遡り, 前のない色 (探索の始点) までの餌を順に並べる.
///
/// `back_path` は常にコストの小さい方へ向かうので閉路は無いが, 念のため `guard` 手で打ち切る.
pub(crate) fn extract_back_path(
    mut index: usize,
    back_path: &BackPath,
    store: &VisitedStore,
    guard: usize,
) -> Vec<ActionId> {
    let space = store.space();
    let mut history = vec![];
    while let Some(&(prev, id)) = back_path.get(&index) {
        if history.len() >= guard {
            tracing::warn!(guard, "back path did not reach the start; truncated");
            break;
        }
        history.push(id);
        index = space.index(prev);
    }
    history.reverse();
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        basis::Mode,
        mix_resolve::yield_point::Never,
        space::Space,
    };

    fn replay(space: Space, catalog: &Catalog, start: Color, path: &[ActionId]) -> Color {
        path.iter()
            .fold(start, |c, &id| space.apply(c, catalog.delta(id)))
    }

    #[test]
    fn test_finds_single_step() {
        let catalog = Catalog::livly();
        let config = SolverConfig::for_mode(Mode::Optimal);
        let mut store = VisitedStore::new(Space::LIVLY);
        let start = Color::new(100, 100, 100);
        let target = Color::new(104, 98, 98);

        let result = a_star(&catalog, &config, &mut store, start, target, Tolerance::EXACT, &mut Never);
        assert_eq!(result.outcome, Outcome::Reached);
        assert_eq!(result.reached, target);
        assert_eq!(result.suffix, vec![catalog.find("Ladybug").unwrap()]);
    }

    #[test]
    fn test_optimal_matches_bfs_on_small_space() {
        let space = Space::new(20);
        let catalog = Catalog::livly();
        let config = SolverConfig::for_mode(Mode::Optimal);
        let mut store = VisitedStore::new(space);

        let start = Color::new(3, 17, 9);
        let target = Color::new(15, 2, 11);
        let result = a_star(&catalog, &config, &mut store, start, target, Tolerance::EXACT, &mut Never);
        assert_eq!(result.outcome, Outcome::Reached);
        assert_eq!(replay(space, &catalog, start, &result.suffix), target);

        // 幅優先で最小手数を求めて比べる.
        let mut frontier = vec![start];
        let mut seen = std::collections::HashSet::new();
        seen.insert(start);
        let mut depth = 0;
        while !frontier.contains(&target) {
            depth += 1;
            frontier = frontier
                .iter()
                .flat_map(|&c| catalog.ids().map(move |id| (c, id)))
                .map(|(c, id)| space.apply(c, catalog.delta(id)))
                .filter(|&c| seen.insert(c))
                .collect();
            assert!(!frontier.is_empty());
        }
        assert_eq!(result.suffix.len(), depth);
    }

    #[test]
    fn test_depth_budget_returns_closest() {
        let catalog = Catalog::livly();
        let mut config = SolverConfig::for_mode(Mode::Optimal);
        config.max_depth = 3;
        let mut store = VisitedStore::new(Space::LIVLY);
        let start = Color::new(100, 100, 100);
        let target = Color::new(200, 100, 100);

        let result = a_star(&catalog, &config, &mut store, start, target, Tolerance::EXACT, &mut Never);
        assert_eq!(result.outcome, Outcome::Exhausted);
        assert!(result.suffix.len() <= 3);
        assert_eq!(replay(Space::LIVLY, &catalog, start, &result.suffix), result.reached);
        assert_eq!(result.reached, Color::new(121, 100, 100));
    }

    #[test]
    fn test_cancel_at_yield_point() {
        let catalog = Catalog::livly();
        let mut config = SolverConfig::for_mode(Mode::Optimal);
        config.yield_every = 50;
        let mut store = VisitedStore::new(Space::LIVLY);
        let start = Color::new(0, 0, 0);
        let target = Color::new(300, 300, 300);

        let mut calls = 0;
        let mut cancel = |_: Progress| -> ControlFlow<()> {
            calls += 1;
            ControlFlow::Break(())
        };
        let result = a_star(&catalog, &config, &mut store, start, target, Tolerance::EXACT, &mut cancel);
        assert_eq!(calls, 1);
        assert_eq!(result.outcome, Outcome::Cancelled);
        assert_eq!(result.iterations, 50);
        assert_eq!(replay(Space::LIVLY, &catalog, start, &result.suffix), result.reached);
    }

    #[test]
    fn test_extract_back_path_guard() {
        let space = Space::new(2);
        let store = VisitedStore::new(space);
        let a = Color::new(0, 0, 0);
        let b = Color::new(1, 0, 0);
        let id = Catalog::livly().ids().next().unwrap();
        let mut back_path = BackPath::new();
        back_path.insert(space.index(a), (b, id));
        back_path.insert(space.index(b), (a, id));

        assert_eq!(extract_back_path(space.index(a), &back_path, &store, 5).len(), 5);
        assert!(extract_back_path(space.index(Color::new(2, 2, 2)), &back_path, &store, 5).is_empty());
    }
}
