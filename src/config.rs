use std::str::FromStr;

use anyhow::{Context as _, Result};

use crate::basis::Mode;

/// 貪欲法と探索の閾値と予算.
///
/// `for_mode` の値が基準. どれも経験的に決めた値なので, 環境変数 `LIVLY_*` で上書きして調整できる.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub mode: Mode,
    /// この差を超えて足りないチャンネルは, 探索の前に単色の餌で埋める.
    pub addition_threshold: i32,
    /// この差を超えて余っているチャンネルは, 探索の前に組み合わせで減らす.
    pub reduction_threshold: i32,
    /// 一つの餌で三つの差をまとめて詰めるとき, 各差がこれを超えている必要がある.
    pub align_threshold: i32,
    /// 差の合計がこれより小さければ全体を下げる餌を使う.
    pub mass_trigger: i32,
    /// 二つの差がこれを超えていれば, 残りの一つを犠牲にしてでも詰める.
    pub major_threshold: i32,
    /// 貪欲法で積む餌の数の上限.
    pub greedy_limit: usize,
    pub max_iterations: u64,
    pub max_depth: u16,
    /// 見積もりに掛ける重み. 1.0 なら許容的.
    pub weight: f64,
    /// この回数ごとに呼び出し側へ制御を返す.
    pub yield_every: u64,
}

impl SolverConfig {
    pub fn for_mode(mode: Mode) -> Self {
        let (threshold, max_iterations, max_depth, weight) = match mode {
            Mode::Optimal => (120, 5_000_000, 500, 1.0),
            Mode::Fast => (35, 500_000, 400, 1.02),
        };
        Self {
            mode,
            addition_threshold: threshold,
            reduction_threshold: threshold,
            align_threshold: 5,
            mass_trigger: -100,
            major_threshold: 40,
            greedy_limit: 2_000,
            max_iterations,
            max_depth,
            weight,
            yield_every: 10_000,
        }
    }

    /// `for_mode` の値に環境変数の上書きを適用する.
    pub fn from_env(mode: Mode) -> Result<Self> {
        let mut config = Self::for_mode(mode);
        override_from_env("LIVLY_ADDITION_THRESHOLD", &mut config.addition_threshold)?;
        override_from_env("LIVLY_REDUCTION_THRESHOLD", &mut config.reduction_threshold)?;
        override_from_env("LIVLY_MAX_ITERATIONS", &mut config.max_iterations)?;
        override_from_env("LIVLY_MAX_DEPTH", &mut config.max_depth)?;
        override_from_env("LIVLY_WEIGHT", &mut config.weight)?;
        override_from_env("LIVLY_YIELD_EVERY", &mut config.yield_every)?;
        Ok(config)
    }
}

fn override_from_env<T>(key: &str, slot: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Ok(raw) = std::env::var(key) {
        *slot = raw
            .trim()
            .parse()
            .with_context(|| format!("failed to parse {}='{}'", key, raw))?;
    }
    Ok(())
}

#[test]
fn test_mode_constants() {
    let fast = SolverConfig::for_mode(Mode::Fast);
    let optimal = SolverConfig::for_mode(Mode::Optimal);
    assert_eq!(fast.weight, 1.02);
    assert_eq!(optimal.weight, 1.0);
    assert!(optimal.addition_threshold > fast.addition_threshold);
    assert!(optimal.max_iterations > fast.max_iterations);
    assert!(optimal.max_depth > fast.max_depth);
    assert_eq!(optimal.align_threshold, fast.align_threshold);
}

#[test]
fn test_override_from_env() {
    let mut depth = 400u16;
    std::env::set_var("LIVLY_TEST_DEPTH", " 12 ");
    override_from_env("LIVLY_TEST_DEPTH", &mut depth).unwrap();
    assert_eq!(depth, 12);

    std::env::set_var("LIVLY_TEST_DEPTH", "deep");
    let err = override_from_env("LIVLY_TEST_DEPTH", &mut depth).unwrap_err();
    assert!(format!("{:#}", err).contains("LIVLY_TEST_DEPTH"));
    assert_eq!(depth, 12);

    std::env::remove_var("LIVLY_TEST_DEPTH");
    override_from_env("LIVLY_TEST_DEPTH", &mut depth).unwrap();
    assert_eq!(depth, 12);
}
