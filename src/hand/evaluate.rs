use std::fmt;

use serde::Serialize;

use crate::model::*;

use super::parse::*;
use super::win::{is_seven_pairs_win, is_thirteen_orphans_win, WinShape};
use super::yaku::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YakuMatch {
    pub yaku: Yaku,
    pub fan: usize,
}

impl fmt::Display for YakuMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.yaku, self.fan)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringResult {
    pub yakus: Vec<YakuMatch>, // 役一覧 (役なしの場合は空)
    pub total_fan: usize,      // 翻数 役満の場合は13 * 役満の数
    pub yakuman: usize,        // 役満倍率 (役満でない場合は0)
}

impl ScoringResult {
    pub fn no_yaku() -> Self {
        Self {
            yakus: vec![],
            total_fan: 0,
            yakuman: 0,
        }
    }

    #[inline]
    pub fn is_no_yaku(&self) -> bool {
        self.yakus.is_empty()
    }

    #[inline]
    pub fn is_yakuman(&self) -> bool {
        self.yakuman != 0
    }

    // 役名の一覧 役なしの場合は["役なし"]
    pub fn rule_names(&self) -> Vec<&'static str> {
        if self.is_no_yaku() {
            return vec![NO_YAKU_NAME];
        }
        self.yakus.iter().map(|m| m.yaku.name()).collect()
    }

    // 和了の宣言として有効な結果のみを返却
    pub fn into_win(self) -> Result<Self, HandError> {
        if self.is_no_yaku() {
            Err(HandError::NoYaku)
        } else {
            Ok(self)
        }
    }

    pub fn contains(&self, yaku: Yaku) -> bool {
        self.yakus.iter().any(|m| m.yaku == yaku)
    }
}

impl fmt::Display for ScoringResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.rule_names().join(", ");
        if self.is_yakuman() {
            write!(f, "{} 役満x{} ({}翻)", names, self.yakuman, self.total_fan)
        } else {
            write!(f, "{} ({}翻)", names, self.total_fan)
        }
    }
}

// 成立した役の一覧から最終的な役と翻数を決定
// 1. 手牌の形による役満がある場合: その役満 + 第一巡の役満
// 2. 第一巡の役満のみの場合: 第一巡の役満
// 3. 通常役のみ: 翻数の合計 (13翻以上は数え役満)
pub fn aggregate(matched: &[Yaku]) -> ScoringResult {
    let has = |c: YakuClass| matched.iter().any(|y| y.class() == c);

    let yakus: Vec<Yaku> = if has(YakuClass::Yakuman) {
        matched
            .iter()
            .copied()
            .filter(|y| y.class() != YakuClass::Ordinary)
            .collect()
    } else if has(YakuClass::FirstTurn) {
        matched
            .iter()
            .copied()
            .filter(|y| y.class() == YakuClass::FirstTurn)
            .collect()
    } else {
        let ordinary: Vec<Yaku> = matched
            .iter()
            .copied()
            .filter(|y| y.class() == YakuClass::Ordinary)
            .collect();
        let fan: usize = ordinary.iter().map(|y| y.fan()).sum();
        if fan >= YAKUMAN_FAN {
            vec![Yaku::CountedYakuman]
        } else {
            ordinary
        }
    };

    if yakus.is_empty() {
        return ScoringResult::no_yaku();
    }

    let yakus: Vec<YakuMatch> = yakus
        .into_iter()
        .map(|yaku| YakuMatch {
            yaku,
            fan: yaku.fan(),
        })
        .collect();
    let total_fan = yakus.iter().map(|m| m.fan).sum();
    let yakuman = yakus
        .iter()
        .filter(|m| m.yaku.class() != YakuClass::Ordinary)
        .count();

    ScoringResult {
        yakus,
        total_fan,
        yakuman,
    }
}

// 手牌の役判定
// 和了形の分解が複数存在する場合は翻数が最も高くなるものを採用 (同点の場合は通常形を優先)
// 和了形でない手牌(和了牌なしを含む)は分解を必要としない役のみで判定
pub fn evaluate(snapshot: &HandSnapshot, ctx: &TurnContext) -> Result<ScoringResult, HandError> {
    snapshot.validate()?;

    let all = tiles_to_tile_table(&snapshot.all_tiles());
    let is_concealed = snapshot.is_concealed();

    let mut best: Option<ScoringResult> = None;
    if let Some(winning_tile) = snapshot.winning_tile {
        for (shape, ph) in decompose(snapshot) {
            let yc = YakuContext::new(all, shape, ph, winning_tile, is_concealed, *ctx);
            let res = aggregate(&yc.calc_yaku());
            if best.as_ref().map_or(true, |b| res.total_fan > b.total_fan) {
                best = Some(res);
            }
        }
    }

    Ok(best.unwrap_or_else(|| {
        aggregate(&YakuContext::in_progress(all, is_concealed, *ctx).calc_yaku())
    }))
}

// 和了形のすべての分解 (通常形, 七対子, 国士無双の順)
fn decompose(snapshot: &HandSnapshot) -> Vec<(WinShape, ParsedHand)> {
    let closed = tiles_to_tile_table(&snapshot.closed_tiles());
    let mut wins = vec![];

    // 和了(通常)
    let pm = parse_melds(&snapshot.melds);
    for mut ph in parse_into_normal_win(&closed) {
        ph.extend_from_slice(&pm);
        wins.push((WinShape::Standard, ph));
    }

    if snapshot.melds.is_empty() {
        // 和了(七対子)
        if is_seven_pairs_win(&closed) {
            wins.push((WinShape::SevenPairs, parse_into_seven_pairs(&closed)));
        }
        // 和了(国士無双)
        if is_thirteen_orphans_win(&closed) {
            wins.push((WinShape::ThirteenOrphans, vec![]));
        }
    }

    wins
}

// 七対子の分解 (対子7つ)
fn parse_into_seven_pairs(hand: &TileTable) -> ParsedHand {
    Tile::all()
        .filter(|&t| count_tile(hand, t) == 2)
        .map(|t| SetPair(SetPairType::Pair, t))
        .collect()
}

#[cfg(test)]
fn snapshot(exp: &str, melds: Vec<Meld>) -> HandSnapshot {
    let mut tiles = tiles_from_string(exp).unwrap();
    let wt = tiles.pop();
    HandSnapshot::new(tiles, wt, melds)
}

#[cfg(test)]
fn yakus(res: &ScoringResult) -> Vec<Yaku> {
    res.yakus.iter().map(|m| m.yaku).collect()
}

#[test]
fn test_evaluate_seven_pairs() {
    let ctx = TurnContext::default().claimed();
    let res = evaluate(&snapshot("m1133p2244s66z5577", vec![]), &ctx).unwrap();
    assert_eq!(yakus(&res), vec![Yaku::SevenPairs]);
    assert_eq!(res.total_fan, 2);
    assert!(!res.is_yakuman());

    // 断么九と複合
    let res = evaluate(&snapshot("m2233p4466s6688m77", vec![]), &ctx).unwrap();
    assert_eq!(yakus(&res), vec![Yaku::AllSimples, Yaku::SevenPairs]);
    assert_eq!(res.total_fan, 3);
}

#[test]
fn test_evaluate_best_decomposition() {
    // 平和 断么九 一盃口 と 七対子 断么九 は同点 -> 通常形
    let ctx = TurnContext::default().claimed();
    let res = evaluate(&snapshot("m223344p223344s55", vec![]), &ctx).unwrap();
    assert_eq!(
        yakus(&res),
        vec![Yaku::Pinfu, Yaku::AllSimples, Yaku::PureDoubleSequence]
    );
    assert_eq!(res.total_fan, 3);
}

#[test]
fn test_evaluate_yakuman_suppresses_ordinary() {
    // 天和 + 清一色 の形 -> 天和のみ
    let ctx = TurnContext::with_winds(Wind::East, Wind::East).self_drawn();
    let ctx = TurnContext {
        is_first_uninterrupted_turn: true,
        ..ctx
    };
    let res = evaluate(&snapshot("s11123455678999", vec![]), &ctx).unwrap();
    assert_eq!(yakus(&res), vec![Yaku::HeavenlyHand]);
    assert_eq!(res.total_fan, 13);
    assert_eq!(res.yakuman, 1);
    assert_eq!(res.rule_names(), vec!["天和"]);

    // 手牌の形による役満は第一巡の役満と複合
    let res = evaluate(&snapshot("m19p19s19z12345677", vec![]), &ctx).unwrap();
    assert_eq!(yakus(&res), vec![Yaku::ThirteenOrphans, Yaku::HeavenlyHand]);
    assert_eq!(res.total_fan, 26);
}

#[test]
fn test_evaluate_shape_yakuman() {
    let ctx = TurnContext::default().claimed();
    let res = evaluate(&snapshot("m234z555666777p11", vec![]), &ctx).unwrap();
    assert_eq!(yakus(&res), vec![Yaku::BigThreeDragons]);

    let res = evaluate(&snapshot("z11122233377555", vec![]), &ctx).unwrap();
    assert_eq!(yakus(&res), vec![Yaku::AllHonors]);

    let m1 = Tile::from_symbol("m1").unwrap();
    let res = evaluate(
        &snapshot("m999p111s999p99", vec![Meld::pung(m1, ACROSS).unwrap()]),
        &ctx,
    )
    .unwrap();
    assert_eq!(yakus(&res), vec![Yaku::AllTerminals]);
}

#[test]
fn test_evaluate_counted_yakuman() {
    // 立直 門前清自摸和 平和 断么九 一盃口 混一色 清一色 = 14翻 -> 数え役満
    let ctx = TurnContext {
        is_riichi: true,
        ..TurnContext::default().self_drawn()
    };
    let res = evaluate(&snapshot("p22334455667788", vec![]), &ctx).unwrap();
    assert_eq!(yakus(&res), vec![Yaku::CountedYakuman]);
    assert_eq!(res.total_fan, 13);
    assert_eq!(res.yakuman, 1);

    // 鳴きありの清一色は混一色と複合して9翻
    let [s7, s8, s9] = ["s7", "s8", "s9"].map(|s| Tile::from_symbol(s).unwrap());
    let ctx = TurnContext::default().claimed();
    let chow = Meld::chow(s7, s8, s9).unwrap();
    let res = evaluate(&snapshot("s12345678999", vec![chow]), &ctx).unwrap();
    assert_eq!(yakus(&res), vec![Yaku::HalfFlush, Yaku::FullFlush]);
    assert_eq!(res.total_fan, 9);

    let res = aggregate(&[
        Yaku::Riichi,
        Yaku::FullyConcealedSelfDraw,
        Yaku::Pinfu,
        Yaku::AllSimples,
        Yaku::PureDoubleSequence,
        Yaku::HalfFlush,
        Yaku::FullFlush,
    ]);
    assert_eq!(yakus(&res), vec![Yaku::CountedYakuman]);
}

#[test]
fn test_evaluate_in_progress() {
    // 和了形でなくても第一巡の役満は状況だけで成立
    let ctx = TurnContext {
        is_first_uninterrupted_turn: true,
        ..TurnContext::with_winds(Wind::East, Wind::East).self_drawn()
    };
    let res = evaluate(&snapshot("m1357p2468s13579z1", vec![]), &ctx).unwrap();
    assert_eq!(yakus(&res), vec![Yaku::HeavenlyHand]);
    assert_eq!(res.total_fan, 13);

    // 和了牌なしの13枚
    let tiles = tiles_from_string("s1112345678999").unwrap();
    let s = HandSnapshot::new(tiles, None, vec![]);
    let res = evaluate(&s, &ctx).unwrap();
    assert_eq!(yakus(&res), vec![Yaku::HeavenlyHand]);

    let res = evaluate(&s, &TurnContext::default()).unwrap();
    assert_eq!(yakus(&res), vec![Yaku::HalfFlush, Yaku::FullFlush]);
    assert_eq!(res.total_fan, 9);

    // 門前限定の役や手牌の形による役満は不成立, 字牌の刻子は成立
    let ctx = TurnContext {
        is_riichi: true,
        ..TurnContext::with_winds(Wind::East, Wind::South).self_drawn()
    };
    let res = evaluate(&snapshot("z55566677722m2p3", vec![]), &ctx).unwrap();
    assert_eq!(
        yakus(&res),
        vec![Yaku::WhiteDragon, Yaku::GreenDragon, Yaku::RedDragon]
    );
}

#[test]
fn test_evaluate_no_yaku() {
    let p9 = Tile::from_symbol("p9").unwrap();
    let ctx = TurnContext::with_winds(Wind::East, Wind::South).claimed();
    let s = snapshot("m234p567s23411", vec![Meld::pung(p9, LEFT).unwrap()]);
    let res = evaluate(&s, &ctx).unwrap();
    assert!(res.is_no_yaku());
    assert_eq!(res.rule_names(), vec![NO_YAKU_NAME]);
    assert_eq!(res.into_win(), Err(HandError::NoYaku));

    // 和了形でない
    let res = evaluate(&snapshot("m234p567s234z1234", vec![]), &ctx).unwrap();
    assert!(res.is_no_yaku());

    // 枚数不正
    let res = evaluate(&snapshot("m234p567s234", vec![]), &ctx);
    assert!(matches!(res, Err(HandError::InvalidDeal(_))));
}
