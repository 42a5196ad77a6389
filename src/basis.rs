use serde::{Deserialize, Serialize};

/// 各チャンネルが取りうる最大値.
pub const MAX_CHANNEL: u16 = 450;

/// `Color` は餌を与えて変化させる 3 チャンネルの色を表す.
///
/// 値は `Space` の範囲 `[0, max]` に収まるように `Space` を通して作る. 一度作った値は書き換えず, 操作を適用すると新しい `Color` ができる.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl std::fmt::Debug for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(R{}, G{}, B{})", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{} G{} B{}", self.r, self.g, self.b)
    }
}

impl Color {
    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [u16; 3] {
        [self.r, self.g, self.b]
    }

    pub fn channel(self, channel: Channel) -> u16 {
        match channel {
            Channel::R => self.r,
            Channel::G => self.g,
            Channel::B => self.b,
        }
    }

    /// `target - self` をチャンネルごとに求める. 正なら増やす必要がある.
    pub fn gap_to(self, target: Self) -> [i32; 3] {
        [
            target.r as i32 - self.r as i32,
            target.g as i32 - self.g as i32,
            target.b as i32 - self.b as i32,
        ]
    }

    pub fn distance(self, other: Self) -> f64 {
        let [dr, dg, db] = self.gap_to(other);
        ((dr * dr + dg * dg + db * db) as f64).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    R,
    G,
    B,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::R, Channel::G, Channel::B];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// `Delta` はある餌を一つ与えたときの各チャンネルの変化量を表す.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delta {
    pub r: i16,
    pub g: i16,
    pub b: i16,
}

impl Delta {
    pub const fn new(r: i16, g: i16, b: i16) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [i16; 3] {
        [self.r, self.g, self.b]
    }

    pub fn get(self, channel: Channel) -> i16 {
        self.channels()[channel.index()]
    }

    /// 全チャンネルの変化量の和.
    pub fn mass(self) -> i32 {
        self.r as i32 + self.g as i32 + self.b as i32
    }

    pub fn length(self) -> f64 {
        let [r, g, b] = self.channels();
        ((r as i32 * r as i32 + g as i32 * g as i32 + b as i32 * b as i32) as f64).sqrt()
    }

    /// 変化させるチャンネルの数.
    pub fn touched(self) -> usize {
        self.channels().iter().filter(|&&d| d != 0).count()
    }
}

/// 探索の動作モード.
///
/// `Fast` は最短性の保証を捨てて早く答えを返す. `Optimal` は許容的な見積もりのまま大きな予算で探索する.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Fast,
    Optimal,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Fast
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Fast => write!(f, "fast"),
            Mode::Optimal => write!(f, "optimal"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(Mode::Fast),
            "optimal" => Ok(Mode::Optimal),
            other => anyhow::bail!("unknown mode {:?}, expected \"fast\" or \"optimal\"", other),
        }
    }
}

/// ゴール判定に足す余裕.
pub const GOAL_EPSILON: f64 = 0.3;

/// `Tolerance` は目標色との距離の許容誤差を表す. ゲームの「誤差 ±2 を許す」は `Tolerance(2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tolerance(pub u16);

impl Tolerance {
    pub const EXACT: Tolerance = Tolerance(0);

    /// ゴールとみなすユークリッド距離の上限.
    pub fn goal_radius(self) -> f64 {
        if self.0 == 0 {
            GOAL_EPSILON
        } else {
            self.0 as f64 + GOAL_EPSILON
        }
    }

    pub fn accepts(self, reached: Color, target: Color) -> bool {
        reached.distance(target) <= self.goal_radius()
    }
}

#[test]
fn test_goal_radius() {
    assert_eq!(Tolerance::EXACT.goal_radius(), GOAL_EPSILON);
    assert!((Tolerance(2).goal_radius() - 2.3).abs() < 1e-9);
    assert!(Tolerance(2).accepts(Color::new(1, 1, 0), Color::new(0, 0, 0)));
    assert!(!Tolerance::EXACT.accepts(Color::new(1, 0, 0), Color::new(0, 0, 0)));
}

#[test]
fn test_mode_from_str() {
    assert_eq!("Optimal".parse::<Mode>().unwrap(), Mode::Optimal);
    assert_eq!(" fast".parse::<Mode>().unwrap(), Mode::Fast);
    assert!("slow".parse::<Mode>().is_err());
}

#[test]
fn test_gap_and_distance() {
    let from = Color::new(100, 100, 100);
    let to = Color::new(104, 98, 98);
    assert_eq!(from.gap_to(to), [4, -2, -2]);
    assert_eq!(from.distance(to), 24f64.sqrt());
    assert_eq!(Delta::new(4, -2, -2).mass(), 0);
    assert_eq!(Delta::new(7, 0, 0).touched(), 1);
}

bitflags::bitflags! {
    /// チャンネルの集合.
    pub struct Channels: u8 {
        const R = 0b001;
        const G = 0b010;
        const B = 0b100;
    }
}

impl Channels {
    pub fn of(channel: Channel) -> Self {
        match channel {
            Channel::R => Channels::R,
            Channel::G => Channels::G,
            Channel::B => Channels::B,
        }
    }

    /// 含まれるチャンネルを R, G, B の順に列挙する.
    pub fn iter(self) -> impl Iterator<Item = Channel> {
        Channel::ALL
            .iter()
            .copied()
            .filter(move |&c| self.contains(Channels::of(c)))
    }

    pub fn count(self) -> usize {
        self.bits().count_ones() as usize
    }
}

#[test]
fn test_channels() {
    let set = Channels::R | Channels::B;
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![Channel::R, Channel::B]);
    assert_eq!(set.count(), 2);
    assert_eq!(Channels::all().count(), 3);
    assert_eq!((Channels::all() - set).iter().next(), Some(Channel::G));
}
