use std::fmt::Write as _;

use serde::Serialize;

use crate::{
    basis::{Color, Tolerance},
    catalog::{ActionId, Catalog},
    space::Space,
};

/// `path` を `start` から順に適用した色. 解が本当に目標に届いたかはこれで確かめる.
pub fn simulate(space: Space, catalog: &Catalog, start: Color, path: &[ActionId]) -> Color {
    path.iter()
        .fold(start, |color, &id| space.apply(color, catalog.delta(id)))
}

/// 表示に使う言語.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Zh,
    En,
}

/// `Recipe` は経路を餌ごとの個数にまとめたもの. 順番はカタログ順.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub items: Vec<RecipeItem>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeItem {
    pub action: ActionId,
    pub name: String,
    #[serde(rename = "nameEn")]
    pub name_en: String,
    pub count: usize,
}

impl Recipe {
    pub fn new(catalog: &Catalog, path: &[ActionId]) -> Self {
        let mut counts = vec![0; catalog.len()];
        for id in path {
            counts[id.index()] += 1;
        }
        let items = catalog
            .ids()
            .zip(counts)
            .filter(|&(_, count)| count > 0)
            .map(|(action, count)| {
                let a = catalog.get(action);
                RecipeItem {
                    action,
                    name: a.name.clone(),
                    name_en: a.name_en.clone(),
                    count,
                }
            })
            .collect();
        Self {
            items,
            total: path.len(),
        }
    }

    /// 餌の一覧と合計を行ごとに書き出す.
    ///
    /// `reached` は経路を適用して着いた色, `accepted` はそれが目標の許容誤差内か. 空の経路でも着けていなければ失敗と書く.
    pub fn render(&self, lang: Lang, reached: Color, accepted: bool) -> String {
        let mut result = String::new();
        for item in &self.items {
            let name = match lang {
                Lang::Zh => &item.name,
                Lang::En => &item.name_en,
            };
            let _ = writeln!(result, "{} ×{}", name, item.count);
        }

        if self.total == 0 && !accepted {
            let _ = writeln!(result, "{}", failure_message(lang));
            return result;
        }

        let _ = match (lang, self.total) {
            (Lang::Zh, 0) => writeln!(result, "顏色已經達到目標（或在允許誤差內）！"),
            (Lang::En, 0) => writeln!(result, "Target color reached (within allowed error)!"),
            (Lang::Zh, n) => writeln!(result, "總共需要餵食 {} 個飼料", n),
            (Lang::En, n) => writeln!(result, "Total fruits needed: {}", n),
        };
        let label = match lang {
            Lang::Zh => "最終結果:",
            Lang::En => "Final Result:",
        };
        let _ = writeln!(
            result,
            "{} R:{} / G:{} / B:{}",
            label, reached.r, reached.g, reached.b
        );
        if !accepted {
            let _ = writeln!(result, "{}", failure_message(lang));
        }
        result
    }
}

fn failure_message(lang: Lang) -> &'static str {
    match lang {
        Lang::Zh => "無法找到完美的配方，請嘗試調整目標顏色或分階段進行。",
        Lang::En => "Could not find a perfect recipe. Try adjusting target or doing it in steps.",
    }
}

/// 着いた色が目標の許容誤差内か.
pub fn within(reached: Color, target: Color, tolerance: Tolerance) -> bool {
    tolerance.accepts(reached, target)
}
