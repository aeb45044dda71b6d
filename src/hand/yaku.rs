use std::fmt;

use serde::Serialize;

use crate::model::*;

use super::parse::{ParsedHand, SetPair, SetPairType};
use super::win::WinShape;

use SetPairType::*;

// 役判定に必要な情報 和了形の分解1通りごとに生成
// 和了形でない手牌は分解なし(shape: None)で1つだけ生成し,牌の構成と状況だけで決まる役を判定する
#[derive(Debug)]
pub struct YakuContext {
    all: TileTable,             // 鳴きを含むすべての牌 (槓子は4枚)
    shape: Option<WinShape>,    // 和了形 (途中の手牌はNone)
    parsed_hand: ParsedHand,    // 鳴きを含むすべての面子 (七対子は対子7つ, 国士無双と途中の手牌は空)
    winning_tile: Option<Tile>, // 和了牌
    is_concealed: bool,         // 門前 (暗槓のみの場合も含む)
    turn: TurnContext,          // 和了の状況
    counts: Counts,             // 面子や牌種別のカウント
    yakuhai_check: TileRow,     // 3枚以上ある字牌に1をセット
}

impl YakuContext {
    pub fn new(
        all: TileTable,
        shape: WinShape,
        parsed_hand: ParsedHand,
        winning_tile: Tile,
        is_concealed: bool,
        turn: TurnContext,
    ) -> Self {
        Self::build(
            all,
            Some(shape),
            parsed_hand,
            Some(winning_tile),
            is_concealed,
            turn,
        )
    }

    // 和了形でない手牌 (聴牌前, 和了牌なし)
    pub fn in_progress(all: TileTable, is_concealed: bool, turn: TurnContext) -> Self {
        Self::build(all, None, vec![], None, is_concealed, turn)
    }

    fn build(
        all: TileTable,
        shape: Option<WinShape>,
        parsed_hand: ParsedHand,
        winning_tile: Option<Tile>,
        is_concealed: bool,
        turn: TurnContext,
    ) -> Self {
        let counts = count_type(&all, &parsed_hand);
        let yakuhai_check = check_yakuhai(&all);
        Self {
            all,
            shape,
            parsed_hand,
            winning_tile,
            is_concealed,
            turn,
            counts,
            yakuhai_check,
        }
    }

    #[inline]
    fn is_complete(&self) -> bool {
        self.shape.is_some()
    }

    // 成立している役の一覧 (Yaku::ALLの順)
    pub fn calc_yaku(&self) -> Vec<Yaku> {
        Yaku::ALL
            .iter()
            .copied()
            .filter(|y| (y.define().func)(self))
            .collect()
    }

    fn pair_tile(&self) -> Option<Tile> {
        if self.shape != Some(WinShape::Standard) {
            return None;
        }
        self.parsed_hand
            .iter()
            .find(|SetPair(tp, _)| *tp == Pair)
            .map(|sp| sp.1)
    }

    fn has_tile(&self, pred: impl Fn(Tile) -> bool) -> bool {
        Tile::all().any(|t| count_tile(&self.all, t) != 0 && pred(t))
    }

    fn all_tiles(&self, pred: impl Fn(Tile) -> bool) -> bool {
        !self.has_tile(|t| !pred(t))
    }
}

#[derive(Debug, Default)]
struct Counts {
    run: usize,
    triplet: usize,
    concealed_kong: usize,
    tis: [usize; TYPE], // 牌種別の枚数
}

fn count_type(all: &TileTable, ph: &ParsedHand) -> Counts {
    let mut cnt = Counts::default();
    for SetPair(tp, _) in ph {
        match tp {
            Run => cnt.run += 1,
            Triplet => cnt.triplet += 1,
            ConcealedKong => cnt.concealed_kong += 1,
            _ => {}
        }
    }
    for ti in 0..TYPE {
        cnt.tis[ti] = all[ti][1..TNUM].iter().sum();
    }
    cnt
}

// 字牌は順子にならないので,3枚以上あれば和了形では必ず刻子か槓子
fn check_yakuhai(all: &TileTable) -> TileRow {
    let mut tr = TileRow::default();
    for ni in 1..=TNUM_MAX[TZ] {
        if all[TZ][ni] >= 3 {
            tr[ni] = 1;
        }
    }
    tr
}

// 役の分類 (得点集計時の優先順位に使用)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum YakuClass {
    Ordinary,  // 通常役
    Yakuman,   // 手牌の形による役満
    FirstTurn, // 第一巡の役満 (天和,地和,人和) 他の役満と複合可
    Counted,   // 数え役満
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Yaku {
    Riichi,
    FullyConcealedSelfDraw,
    Pinfu,
    AllSimples,
    PureDoubleSequence,
    SeatWind,
    PrevalentWind,
    WhiteDragon,
    GreenDragon,
    RedDragon,
    SevenPairs,
    HalfFlush,
    FullFlush,
    ThirteenOrphans,
    BigThreeDragons,
    AllHonors,
    AllTerminals,
    FourConcealedTriplets,
    HeavenlyHand,
    EarthlyHand,
    HumanHand,
    CountedYakuman,
}

pub struct YakuDefine {
    pub name: &'static str,
    pub fan: usize,
    pub class: YakuClass,
    pub func: fn(&YakuContext) -> bool,
}

impl fmt::Debug for YakuDefine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {:?})", self.name, self.fan, self.class)
    }
}

macro_rules! yaku {
    ($n: expr, $c: ident, $fan: expr, $f: expr) => {
        YakuDefine {
            name: $n,
            fan: $fan,
            class: YakuClass::$c,
            func: $f,
        }
    };
}

pub const YAKUMAN_FAN: usize = 13;

// 役なしの場合の表示名
pub const NO_YAKU_NAME: &str = "役なし";

impl Yaku {
    // 判定対象の役 (数え役満は集計時に付与するため含まない)
    pub const ALL: [Yaku; 21] = [
        Yaku::Riichi,
        Yaku::FullyConcealedSelfDraw,
        Yaku::Pinfu,
        Yaku::AllSimples,
        Yaku::PureDoubleSequence,
        Yaku::SeatWind,
        Yaku::PrevalentWind,
        Yaku::WhiteDragon,
        Yaku::GreenDragon,
        Yaku::RedDragon,
        Yaku::SevenPairs,
        Yaku::HalfFlush,
        Yaku::FullFlush,
        Yaku::ThirteenOrphans,
        Yaku::BigThreeDragons,
        Yaku::AllHonors,
        Yaku::AllTerminals,
        Yaku::FourConcealedTriplets,
        Yaku::HeavenlyHand,
        Yaku::EarthlyHand,
        Yaku::HumanHand,
    ];

    pub fn define(self) -> YakuDefine {
        use Yaku::*;
        match self {
            Riichi => yaku!("立直", Ordinary, 1, is_riichi),
            FullyConcealedSelfDraw => yaku!("門前清自摸和", Ordinary, 1, is_menzentsumo),
            Pinfu => yaku!("平和", Ordinary, 1, is_pinfu),
            AllSimples => yaku!("断么九", Ordinary, 1, is_tanyaochuu),
            PureDoubleSequence => yaku!("一盃口", Ordinary, 1, is_iipeikou),
            SeatWind => yaku!("自風", Ordinary, 1, is_jikaze),
            PrevalentWind => yaku!("場風", Ordinary, 1, is_bakaze),
            WhiteDragon => yaku!("白", Ordinary, 1, is_haku),
            GreenDragon => yaku!("發", Ordinary, 1, is_hatsu),
            RedDragon => yaku!("中", Ordinary, 1, is_chun),
            SevenPairs => yaku!("七対子", Ordinary, 2, is_chiitoitsu),
            HalfFlush => yaku!("混一色", Ordinary, 3, is_honiisou),
            FullFlush => yaku!("清一色", Ordinary, 6, is_chiniisou),
            ThirteenOrphans => yaku!("国士無双", Yakuman, YAKUMAN_FAN, is_kokushimusou),
            BigThreeDragons => yaku!("大三元", Yakuman, YAKUMAN_FAN, is_daisangen),
            AllHonors => yaku!("字一色", Yakuman, YAKUMAN_FAN, is_tuuiisou),
            AllTerminals => yaku!("清老頭", Yakuman, YAKUMAN_FAN, is_chinroutou),
            FourConcealedTriplets => yaku!("四暗刻", Yakuman, YAKUMAN_FAN, is_suuankou),
            HeavenlyHand => yaku!("天和", FirstTurn, YAKUMAN_FAN, is_tenhou),
            EarthlyHand => yaku!("地和", FirstTurn, YAKUMAN_FAN, is_tiihou),
            HumanHand => yaku!("人和", FirstTurn, YAKUMAN_FAN, is_renhou),
            CountedYakuman => yaku!("数え役満", Counted, YAKUMAN_FAN, |_| false),
        }
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.define().name
    }

    #[inline]
    pub fn fan(self) -> usize {
        self.define().fan
    }

    #[inline]
    pub fn class(self) -> YakuClass {
        self.define().class
    }
}

impl fmt::Display for Yaku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// 役の優先順位 =================================================================
// * 手牌の形による役満が存在する場合は役満以外の役は削除 (第一巡の役満は複合)
// * 清一色は混一色と複合する
// * 鳴きによる食い下がりはなし (門前限定の役は鳴きありで不成立)
// * 和了形でない手牌では面子の分解や和了牌が必要な役は不成立

// 立直
fn is_riichi(ctx: &YakuContext) -> bool {
    ctx.is_complete() && ctx.is_concealed && ctx.turn.is_riichi
}

// 門前清自摸和
fn is_menzentsumo(ctx: &YakuContext) -> bool {
    ctx.is_complete() && ctx.is_concealed && ctx.turn.won_by_self_draw
}

// 平和 (待ちの形は判定しない)
fn is_pinfu(ctx: &YakuContext) -> bool {
    ctx.is_concealed
        && ctx.shape == Some(WinShape::Standard)
        && ctx.counts.run == 4
        && ctx.all_tiles(|t| !t.is_honor())
}

// 断么九
fn is_tanyaochuu(ctx: &YakuContext) -> bool {
    ctx.all_tiles(|t| t.is_simple())
}

// 一盃口
fn is_iipeikou(ctx: &YakuContext) -> bool {
    if !ctx.is_concealed || ctx.counts.run < 2 {
        return false;
    }

    let mut runs = TileTable::default();
    for &SetPair(tp, t) in &ctx.parsed_hand {
        if tp == Run {
            inc_tile(&mut runs, t);
            if count_tile(&runs, t) == 2 {
                return true;
            }
        }
    }
    false
}

// 自風
fn is_jikaze(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[ctx.turn.seat_wind.tnum()] == 1
}

// 場風
fn is_bakaze(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[ctx.turn.prevalent_wind.tnum()] == 1
}

// 白
fn is_haku(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[DW] == 1
}

// 發
fn is_hatsu(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[DG] == 1
}

// 中
fn is_chun(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[DR] == 1
}

// 七対子
fn is_chiitoitsu(ctx: &YakuContext) -> bool {
    ctx.shape == Some(WinShape::SevenPairs)
}

fn count_suits(ctx: &YakuContext) -> usize {
    [TM, TP, TS].iter().filter(|&&ti| ctx.counts.tis[ti] != 0).count()
}

// 混一色 (字牌はあってもなくてもよい)
fn is_honiisou(ctx: &YakuContext) -> bool {
    count_suits(ctx) == 1
}

// 清一色
fn is_chiniisou(ctx: &YakuContext) -> bool {
    count_suits(ctx) == 1 && ctx.counts.tis[TZ] == 0
}

// 国士無双
fn is_kokushimusou(ctx: &YakuContext) -> bool {
    ctx.shape == Some(WinShape::ThirteenOrphans)
}

// 大三元
fn is_daisangen(ctx: &YakuContext) -> bool {
    ctx.is_complete()
        && Tile::all()
            .filter(|t| t.is_dragon())
            .all(|t| ctx.yakuhai_check[t.number()] == 1)
}

// 字一色
fn is_tuuiisou(ctx: &YakuContext) -> bool {
    ctx.is_complete() && ctx.all_tiles(|t| t.is_honor())
}

// 清老頭
fn is_chinroutou(ctx: &YakuContext) -> bool {
    ctx.is_complete() && ctx.all_tiles(|t| t.is_terminal())
}

// 四暗刻
// ロン和了の場合,和了牌で完成した刻子は暗刻とみなさない(単騎待ちのみ成立)
fn is_suuankou(ctx: &YakuContext) -> bool {
    if ctx.counts.triplet + ctx.counts.concealed_kong != 4 {
        return false;
    }
    !ctx.turn.won_by_claim || (ctx.winning_tile.is_some() && ctx.pair_tile() == ctx.winning_tile)
}

// 天和
fn is_tenhou(ctx: &YakuContext) -> bool {
    let t = &ctx.turn;
    t.is_dealer && t.is_first_uninterrupted_turn && t.won_by_self_draw
}

// 地和
fn is_tiihou(ctx: &YakuContext) -> bool {
    let t = &ctx.turn;
    !t.is_dealer && t.is_first_uninterrupted_turn && t.won_by_self_draw
}

// 人和
fn is_renhou(ctx: &YakuContext) -> bool {
    let t = &ctx.turn;
    !t.is_dealer && t.is_first_uninterrupted_turn && t.won_by_claim
}

#[cfg(test)]
fn standard_context(exp: &str, melds: Vec<Meld>, turn: TurnContext) -> YakuContext {
    use super::parse::{parse_into_normal_win, parse_melds};

    let closed = tiles_from_string(exp).unwrap();
    let winning_tile = *closed.last().unwrap();
    let is_concealed = melds.iter().all(Meld::is_concealed);
    let mut all = closed.clone();
    for m in &melds {
        all.extend_from_slice(m.tiles());
    }
    let mut ph = parse_into_normal_win(&tiles_to_tile_table(&closed))
        .pop()
        .unwrap();
    ph.extend(parse_melds(&melds));
    YakuContext::new(
        tiles_to_tile_table(&all),
        WinShape::Standard,
        ph,
        winning_tile,
        is_concealed,
        turn,
    )
}

#[test]
fn test_yaku_define() {
    for y in Yaku::ALL {
        let d = y.define();
        assert!(d.fan >= 1);
        assert_ne!(d.class, YakuClass::Counted);
    }
    assert_eq!(Yaku::FullFlush.fan(), 6);
    assert_eq!(Yaku::HalfFlush.fan(), 3);
    assert_eq!(Yaku::SevenPairs.fan(), 2);
    assert_eq!(Yaku::CountedYakuman.class(), YakuClass::Counted);
    assert_eq!(Yaku::HumanHand.to_string(), "人和");
}

#[test]
fn test_yaku_simples_pinfu() {
    let turn = TurnContext::default().claimed();
    let ctx = standard_context("m234567p234s56788", vec![], turn);
    assert_eq!(ctx.calc_yaku(), vec![Yaku::Pinfu, Yaku::AllSimples]);
}

#[test]
fn test_yaku_honors() {
    // 東場の南家: 東は場風, 南は自風
    let turn = TurnContext::with_winds(Wind::East, Wind::South).claimed();
    let ctx = standard_context("m234p567z111222z55", vec![], turn);
    assert_eq!(ctx.calc_yaku(), vec![Yaku::SeatWind, Yaku::PrevalentWind]);

    let p2 = Tile::from_symbol("p2").unwrap();
    let ctx = standard_context(
        "p345678z55566",
        vec![Meld::pung(p2, RIGHT).unwrap()],
        turn,
    );
    assert_eq!(ctx.calc_yaku(), vec![Yaku::WhiteDragon, Yaku::HalfFlush]);
}

#[test]
fn test_yaku_flush() {
    let turn = TurnContext::default().self_drawn();
    let ctx = standard_context("s11123455678999", vec![], turn);
    let yaku = ctx.calc_yaku();
    assert!(yaku.contains(&Yaku::FullFlush));
    assert!(yaku.contains(&Yaku::FullyConcealedSelfDraw));
    assert!(yaku.contains(&Yaku::HalfFlush));
}

#[test]
fn test_yaku_in_progress() {
    // 和了形でない手牌は牌の構成と状況だけで判定
    let turn = TurnContext {
        is_riichi: true,
        ..TurnContext::with_winds(Wind::East, Wind::South).self_drawn()
    };
    let all = tiles_to_tile_table(&tiles_from_string("p2345677z111s234").unwrap());
    let ctx = YakuContext::in_progress(all, true, turn);
    assert_eq!(ctx.calc_yaku(), vec![Yaku::PrevalentWind]);

    let all = tiles_to_tile_table(&tiles_from_string("z1112223334445").unwrap());
    let ctx = YakuContext::in_progress(all, true, turn);
    assert_eq!(
        ctx.calc_yaku(),
        vec![Yaku::SeatWind, Yaku::PrevalentWind]
    );

    let all = tiles_to_tile_table(&tiles_from_string("z5556667772233").unwrap());
    let ctx = YakuContext::in_progress(all, true, TurnContext::default());
    assert_eq!(
        ctx.calc_yaku(),
        vec![Yaku::WhiteDragon, Yaku::GreenDragon, Yaku::RedDragon]
    );
}

#[test]
fn test_yaku_pure_double_sequence() {
    let turn = TurnContext::default().claimed();
    let ctx = standard_context("m223344p567s678z11", vec![], turn);
    assert_eq!(ctx.calc_yaku(), vec![Yaku::PureDoubleSequence]);
}

#[test]
fn test_yaku_four_concealed_triplets() {
    let exp = "m111p999s555z22333";
    let ctx = standard_context(exp, vec![], TurnContext::default().self_drawn());
    assert!(ctx.calc_yaku().contains(&Yaku::FourConcealedTriplets));
    // ロンで刻子が完成した場合は不成立
    let ctx = standard_context(exp, vec![], TurnContext::default().claimed());
    assert!(!ctx.calc_yaku().contains(&Yaku::FourConcealedTriplets));
    // 単騎待ちならロンでも成立
    let ctx = standard_context("m111p999s555z22233", vec![], TurnContext::default().claimed());
    assert!(ctx.calc_yaku().contains(&Yaku::FourConcealedTriplets));
}
