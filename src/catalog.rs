use anyhow::{ensure, Context as _, Result};
use serde::{Deserialize, Serialize};

use crate::basis::{Channel, Delta};

#[cfg(test)]
mod tests;

/// `ActionId` は `Catalog` 内での餌の位置を表す. 経路はこれの列として扱う.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(u8);

impl ActionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// `Action` は与えられる餌一つを表す. 表示用の名前と画像は探索には使わない.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(rename = "nameEn")]
    pub name_en: String,
    #[serde(flatten)]
    pub delta: Delta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Action {
    fn new(name: &str, name_en: &str, r: i16, g: i16, b: i16, image: &str) -> Self {
        Self {
            name: name.to_owned(),
            name_en: name_en.to_owned(),
            delta: Delta::new(r, g, b),
            image: Some(image.to_owned()),
        }
    }
}

/// 見積もりに使う, 餌一つで動かせる量の上限.
///
/// 切り詰めが起きても各チャンネルの変化は符号を保ったまま小さくなるだけなので, これらは切り詰めを含めても上限になる.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    /// チャンネルごとの最大の増加量.
    pub raise: [f64; 3],
    /// チャンネルごとの最大の減少量 (正の値).
    pub lower: [f64; 3],
    /// 合計値の最大の増加量.
    pub mass_raise: f64,
    /// 合計値の最大の減少量 (正の値).
    pub mass_lower: f64,
    /// 一歩で動けるユークリッド距離の最大値.
    pub stride: f64,
}

impl Rates {
    fn new(actions: &[Action]) -> Self {
        let mut rates = Rates {
            raise: [0.0; 3],
            lower: [0.0; 3],
            mass_raise: 0.0,
            mass_lower: 0.0,
            stride: 0.0,
        };
        for delta in actions.iter().map(|a| a.delta) {
            let mut up = 0;
            let mut down = 0;
            for channel in Channel::ALL.iter().copied() {
                let d = delta.get(channel) as i32;
                let i = channel.index();
                if d > 0 {
                    rates.raise[i] = rates.raise[i].max(d as f64);
                    up += d;
                } else {
                    rates.lower[i] = rates.lower[i].max(-d as f64);
                    down -= d;
                }
            }
            rates.mass_raise = rates.mass_raise.max(up as f64);
            rates.mass_lower = rates.mass_lower.max(down as f64);
            rates.stride = rates.stride.max(delta.length());
        }
        rates
    }
}

/// 貪欲法の規則が使う役割.
#[derive(Debug, Clone, Default)]
struct Roles {
    /// 一つのチャンネルだけを上げて残り二つを下げる餌. 上げるチャンネルと組で, カタログ順.
    pivots: Vec<(ActionId, Channel)>,
    /// 全チャンネルを下げる餌のうち合計の減少が最大のもの.
    shrink: Option<ActionId>,
    /// そのチャンネルだけを上げる餌のうち増加量が最大のもの.
    single_raise: [Option<ActionId>; 3],
}

impl Roles {
    fn new(actions: &[Action]) -> Self {
        let mut roles = Roles::default();
        let mut shrink_mass = 0;
        let mut raise_amount = [0i16; 3];

        for (i, action) in actions.iter().enumerate() {
            let id = ActionId(i as u8);
            let delta = action.delta;
            let channels = delta.channels();
            let ups = channels.iter().filter(|&&d| d > 0).count();
            let downs = channels.iter().filter(|&&d| d < 0).count();

            if ups == 1 && downs == 2 {
                if let Some(up) = Channel::ALL.iter().copied().find(|&c| delta.get(c) > 0) {
                    roles.pivots.push((id, up));
                }
            }
            if downs == 3 && delta.mass() < shrink_mass {
                shrink_mass = delta.mass();
                roles.shrink = Some(id);
            }
            if delta.touched() == 1 {
                for channel in Channel::ALL.iter().copied() {
                    let d = delta.get(channel);
                    if d > raise_amount[channel.index()] {
                        raise_amount[channel.index()] = d;
                        roles.single_raise[channel.index()] = Some(id);
                    }
                }
            }
        }
        roles
    }
}

/// `Catalog` は使える餌の一覧を表す. 一度作ったら変更せず, 全ての探索で共有する.
#[derive(Debug, Clone)]
pub struct Catalog {
    actions: Vec<Action>,
    expansion_order: Vec<ActionId>,
    roles: Roles,
    rates: Rates,
}

impl Catalog {
    pub fn new(actions: Vec<Action>) -> Result<Self> {
        ensure!(!actions.is_empty(), "the catalog must have at least one action");
        ensure!(
            actions.len() <= u8::MAX as usize,
            "the catalog has {} actions, but at most {} are supported",
            actions.len(),
            u8::MAX
        );

        let rates = Rates::new(&actions);
        for channel in Channel::ALL.iter().copied() {
            ensure!(
                rates.raise[channel.index()] > 0.0 && rates.lower[channel.index()] > 0.0,
                "the catalog must be able to both raise and lower channel {:?}",
                channel
            );
        }

        // 変化させるチャンネルの少ない餌から展開する. 同じコストで同じ色に着くなら, 端での切り詰めに頼らない方の経路を残す.
        let mut expansion_order = (0..actions.len())
            .map(|i| ActionId(i as u8))
            .collect::<Vec<_>>();
        expansion_order.sort_by_key(|id| actions[id.index()].delta.touched());

        let roles = Roles::new(&actions);

        Ok(Self {
            actions,
            expansion_order,
            roles,
            rates,
        })
    }

    /// ゲームの 8 種類の餌.
    pub fn livly() -> Self {
        let actions = vec![
            Action::new("瓢蟲", "Ladybug", 4, -2, -2, "img/ladybug.png"),
            Action::new("長額負蝗", "Longheaded Locust", -2, 4, -2, "img/locust.png"),
            Action::new("雪隱金龜子", "Lapis Lazuli Dor Beetle", -2, -2, 4, "img/dorbeetle.png"),
            Action::new("斐豹蛺蝶的幼蟲", "Indian Fritillary Larva", 7, 0, 0, "img/larva_red.png"),
            Action::new("白粉蝶的幼蟲", "Cabbage Butterfly Larva", 0, 7, 0, "img/larva_green.png"),
            Action::new("雙線條紋天蛾的幼蟲", "Hawk Moth Larva", 0, 0, 7, "img/larva_blue.png"),
            Action::new("獨角仙的幼蟲", "Rhinoceros Beetle Larva", 2, 2, 2, "img/rhino.png"),
            Action::new("日本山蟻", "Japanese Wood Ant", -2, -2, -2, "img/ant.png"),
        ];
        Self::new(actions).expect("the built-in catalog is well formed")
    }

    /// JSON 配列 `[{"name", "nameEn", "r", "g", "b", "image"}, ...]` から読み込む.
    pub fn from_json(json: &str) -> Result<Self> {
        let actions: Vec<Action> =
            serde_json::from_str(json).context("failed to parse the catalog json")?;
        Self::new(actions)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, id: ActionId) -> &Action {
        &self.actions[id.index()]
    }

    pub fn delta(&self, id: ActionId) -> Delta {
        self.actions[id.index()].delta
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn ids(&self) -> impl Iterator<Item = ActionId> {
        (0..self.actions.len()).map(|i| ActionId(i as u8))
    }

    /// 名前 (どちらの言語でもよい) から餌を探す. 英語名は大文字小文字を区別しない.
    pub fn find(&self, name: &str) -> Option<ActionId> {
        let name = name.trim();
        self.actions
            .iter()
            .position(|a| a.name == name || a.name_en.eq_ignore_ascii_case(name))
            .map(|i| ActionId(i as u8))
    }

    /// 探索で子を展開する順番.
    pub fn expansion_order(&self) -> &[ActionId] {
        &self.expansion_order
    }

    pub fn rates(&self) -> &Rates {
        &self.rates
    }

    /// `channel` だけを上げ, 残り二つを下げる餌をカタログ順に列挙する.
    pub fn pivots(&self) -> impl Iterator<Item = (ActionId, Channel)> + '_ {
        self.roles.pivots.iter().copied()
    }

    pub fn pivot_raising(&self, channel: Channel) -> Option<ActionId> {
        self.pivots().find(|&(_, c)| c == channel).map(|(id, _)| id)
    }

    pub fn shrink(&self) -> Option<ActionId> {
        self.roles.shrink
    }

    pub fn single_raise(&self, channel: Channel) -> Option<ActionId> {
        self.roles.single_raise[channel.index()]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::livly()
    }
}
