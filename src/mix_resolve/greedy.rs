use crate::{
    basis::{Channel, Channels, Color},
    catalog::{ActionId, Catalog},
    config::SolverConfig,
    space::Space,
};

/// 貪欲法の結果. `prefix` を `start` に順に適用すると `reduced` になる.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GreedyOutcome {
    pub(crate) prefix: Vec<ActionId>,
    pub(crate) reduced: Color,
}

/// 探索の前に試す規則. `CASCADE` の順に評価し, 最初に当てはまったものを適用する.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
    /// 一つの餌の符号が三つの差の符号と全て一致する.
    AlignedMove,
    /// 差の合計が大きく負なので, 全体を下げる.
    MassReduction,
    /// 二つの差が大きく, 残りの一つを犠牲にしてでも一つの餌で詰める.
    LooseAlignment,
    /// 余っているチャンネルだけを, 他をおおよそ保ったまま減らす組み合わせ.
    SafeMacro,
}

impl Rule {
    pub(crate) const CASCADE: [Rule; 4] = [
        Rule::AlignedMove,
        Rule::MassReduction,
        Rule::LooseAlignment,
        Rule::SafeMacro,
    ];

    /// 条件を満たすなら適用する餌の列を返す.
    pub(crate) fn fire(
        self,
        catalog: &Catalog,
        config: &SolverConfig,
        current: Color,
        target: Color,
    ) -> Option<Vec<ActionId>> {
        let gap = current.gap_to(target);
        match self {
            Rule::AlignedMove => {
                let t = config.align_threshold;
                catalog
                    .pivots()
                    .find(|&(_, up)| {
                        Channel::ALL.iter().all(|&c| {
                            if c == up {
                                gap[c.index()] > t
                            } else {
                                gap[c.index()] < -t
                            }
                        })
                    })
                    .map(|(id, _)| vec![id])
            }
            Rule::MassReduction => {
                let mass: i32 = gap.iter().sum();
                if mass < config.mass_trigger {
                    catalog.shrink().map(|id| vec![id])
                } else {
                    None
                }
            }
            Rule::LooseAlignment => {
                let t = config.major_threshold;
                catalog
                    .pivots()
                    .find(|&(_, up)| {
                        gap[up.index()] > t
                            && Channel::ALL
                                .iter()
                                .any(|&c| c != up && gap[c.index()] < -t)
                    })
                    .map(|(id, _)| vec![id])
            }
            Rule::SafeMacro => {
                let surplus = Channel::ALL
                    .iter()
                    .copied()
                    .filter(|&c| -gap[c.index()] > config.reduction_threshold)
                    .fold(Channels::empty(), |set, c| set | Channels::of(c));
                reduce_surplus(catalog, surplus)
            }
        }
    }
}

/// 余っているチャンネルの集合 `surplus` だけを減らす餌の組み合わせ.
///
/// - 三つとも: 全体を下げる餌一つ.
/// - 二つ: 残りのチャンネルを上げる餌一つと全体を下げる餌二つ. ゲームの餌では (-6, -6, 0).
/// - 一つ: そのチャンネル以外を上げる餌二つと全体を下げる餌一つ. ゲームの餌では (-6, 0, 0).
fn reduce_surplus(catalog: &Catalog, surplus: Channels) -> Option<Vec<ActionId>> {
    let shrink = catalog.shrink()?;
    let keep = Channels::all() - surplus;
    match surplus.count() {
        3 => Some(vec![shrink]),
        2 => {
            let kept = keep.iter().next()?;
            Some(vec![catalog.pivot_raising(kept)?, shrink, shrink])
        }
        1 => {
            let mut actions = keep
                .iter()
                .map(|c| catalog.pivot_raising(c))
                .collect::<Option<Vec<_>>>()?;
            actions.push(shrink);
            Some(actions)
        }
        _ => None,
    }
}

/// 大きな差を探索せずに詰めてから, 残りを探索に渡す.
///
/// 規則の連鎖を不動点まで繰り返した後, 足りないチャンネルを単色の餌で埋める. 失敗はせず, 探索に残す仕事の量を減らすだけ.
pub(crate) fn presolve(
    space: Space,
    catalog: &Catalog,
    config: &SolverConfig,
    start: Color,
    target: Color,
) -> GreedyOutcome {
    let mut current = start;
    let mut prefix = vec![];

    'cascade: while prefix.len() < config.greedy_limit {
        for rule in Rule::CASCADE.iter().copied() {
            if let Some(actions) = rule.fire(catalog, config, current, target) {
                let before = current;
                for &id in &actions {
                    current = space.apply(current, catalog.delta(id));
                }
                if current == before {
                    // 端に張り付いて動かない.
                    break 'cascade;
                }
                tracing::trace!(?rule, ?current, "greedy rule fired");
                prefix.extend(actions);
                continue 'cascade;
            }
        }
        break;
    }

    for channel in Channel::ALL.iter().copied() {
        let larva = match catalog.single_raise(channel) {
            Some(id) => id,
            None => continue,
        };
        while target.channel(channel) as i32 - current.channel(channel) as i32
            > config.addition_threshold
            && prefix.len() < config.greedy_limit
        {
            let next = space.apply(current, catalog.delta(larva));
            if next == current {
                break;
            }
            current = next;
            prefix.push(larva);
        }
    }

    GreedyOutcome {
        prefix,
        reduced: current,
    }
}
