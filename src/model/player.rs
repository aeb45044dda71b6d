use super::*;
use crate::hand::{evaluate, win_shape, ScoringResult};
use crate::util::misc::vec_to_string;
use crate::warn;

use HandError::*;
use HandState::*;

// 手牌の状態遷移
// AwaitingDraw -(draw)-> TileDrawn -(discard, 暗槓)-> AwaitingDraw
// AwaitingDraw -(ポン, チー)-> MeldDeclared -(discard)-> AwaitingDraw
// AwaitingDraw -(大明槓)-> AwaitingDraw (嶺上牌のツモ待ち)
// TileDrawn -(ツモ和了)-> HandComplete, AwaitingDraw -(ロン和了)-> HandComplete
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HandState {
    #[default]
    AwaitingDraw,
    TileDrawn,
    MeldDeclared,
    HandComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Discard {
    pub tile: Tile,
    pub drawn: bool, // ツモ切りフラグ
}

impl fmt::Display for Discard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tile)
    }
}

// 1人のプレイヤーの手牌 (1局の間のみ存在)
// 操作の呼び出しは外部で直列化されていることを前提とする
#[derive(Debug, Default, Clone, Serialize)]
pub struct Hand {
    concealed: Vec<Tile>,       // 手牌(鳴き,ツモ牌を除く) 常にソート済み
    drawn: Option<Tile>,        // ツモ牌
    melds: Vec<Meld>,           // 鳴き一覧(暗槓を含む)
    discards: Vec<Discard>,     // 捨て牌一覧
    state: HandState,           // 現在の状態
    is_concealed: bool,         // 門前 鳴きが入った時点で局の終了までfalse
    winning_tile: Option<Tile>, // 和了牌 (HandCompleteの場合のみ)
}

impl Hand {
    pub fn new() -> Self {
        Self {
            is_concealed: true,
            ..Default::default()
        }
    }

    // 配牌 鳴き,ツモ牌,捨て牌はリセット
    pub fn deal_initial(&mut self, tiles: &[Tile]) -> Result<(), HandError> {
        if tiles.len() != HAND {
            return Err(InvalidDeal(format!("{} tiles dealt", tiles.len())));
        }
        if let Some(t) = find_overflow(&tiles_to_tile_table(tiles)) {
            return Err(InvalidDeal(format!("more than {} copies of {}", TILE, t)));
        }

        let mut concealed = tiles.to_vec();
        concealed.sort();
        *self = Self {
            concealed,
            ..Self::new()
        };
        Ok(())
    }

    pub fn draw(&mut self, tile: Tile) -> Result<(), HandError> {
        self.check_state("draw", &[AwaitingDraw])?;
        if self.drawn.is_some() || self.tile_count() != HAND {
            return Err(IllegalState("draw", self.state));
        }
        self.check_overflow(tile)?;

        self.drawn = Some(tile);
        self.state = TileDrawn;
        Ok(())
    }

    // from_drawn: ツモ切り
    pub fn discard(&mut self, tile: Tile, from_drawn: bool) -> Result<(), HandError> {
        self.check_state("discard", &[TileDrawn, MeldDeclared])?;

        if from_drawn {
            if self.drawn != Some(tile) {
                return Err(TileMismatch(self.drawn, tile));
            }
            self.drawn = None;
        } else {
            let i = self
                .concealed
                .iter()
                .position(|&t| t == tile)
                .ok_or(TileNotInHand(tile))?;
            self.concealed.remove(i);
            if let Some(d) = self.drawn.take() {
                insert_sorted(&mut self.concealed, d);
            }
        }

        self.discards.push(Discard {
            tile,
            drawn: from_drawn,
        });
        self.state = AwaitingDraw;
        Ok(())
    }

    // 面子の構成に必要な牌を手牌から取り除いて鳴き一覧に追加
    // 鳴きの可否(tool::claimable_actions)は呼び出し側でチェック済みであること
    pub fn apply_meld(&mut self, meld: Meld) -> Result<(), HandError> {
        match meld.claim() {
            Some(c) => {
                // 他家の捨て牌に対するポン,チー,大明槓
                self.check_state("apply_meld", &[AwaitingDraw])?;
                let concealed = remove_tiles(&self.concealed, &meld.tiles_from_hand())?;
                self.check_overflow(c.tile)?;

                self.concealed = concealed;
                self.is_concealed = false;
                self.state = if meld.kind() == MeldKind::Kong {
                    AwaitingDraw
                } else {
                    MeldDeclared
                };
            }
            None => {
                // 暗槓 ツモ牌を含めてよい
                self.check_state("apply_meld", &[TileDrawn])?;
                let mut pool = self.concealed.clone();
                if let Some(d) = self.drawn {
                    insert_sorted(&mut pool, d);
                }
                let concealed = remove_tiles(&pool, meld.tiles())?;

                self.concealed = concealed;
                self.drawn = None;
                self.state = AwaitingDraw;
            }
        }

        self.melds.push(meld);
        Ok(())
    }

    // ツモ和了の宣言 和了形かつ役が存在する場合のみ受理
    pub fn declare_self_draw_win(&mut self, ctx: &TurnContext) -> Result<ScoringResult, HandError> {
        self.check_state("declare_self_draw_win", &[TileDrawn])?;
        let snapshot = self.snapshot();
        let score = judge_win(&snapshot, &ctx.self_drawn())?;

        self.winning_tile = self.drawn;
        self.state = HandComplete;
        Ok(score)
    }

    // 他家の捨て牌によるロン和了の宣言
    pub fn declare_claimed_win(
        &mut self,
        tile: Tile,
        ctx: &TurnContext,
    ) -> Result<ScoringResult, HandError> {
        self.check_state("declare_claimed_win", &[AwaitingDraw])?;
        self.check_overflow(tile)?;
        let snapshot = self.snapshot_with_claimed(tile);
        let score = judge_win(&snapshot, &ctx.claimed())?;

        self.winning_tile = Some(tile);
        self.state = HandComplete;
        Ok(score)
    }

    // 現在の手牌の役判定用のスナップショット (ツモ牌または和了牌を含む)
    pub fn snapshot(&self) -> HandSnapshot {
        HandSnapshot {
            concealed: self.concealed.clone(),
            winning_tile: self.winning_tile.or(self.drawn),
            melds: self.melds.clone(),
        }
    }

    // 他家の捨て牌を加えた場合のスナップショット
    pub fn snapshot_with_claimed(&self, tile: Tile) -> HandSnapshot {
        HandSnapshot {
            concealed: self.concealed.clone(),
            winning_tile: Some(tile),
            melds: self.melds.clone(),
        }
    }

    #[inline]
    pub fn concealed(&self) -> &[Tile] {
        &self.concealed
    }

    #[inline]
    pub fn drawn(&self) -> Option<Tile> {
        self.drawn
    }

    #[inline]
    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    #[inline]
    pub fn discards(&self) -> &[Discard] {
        &self.discards
    }

    #[inline]
    pub fn state(&self) -> HandState {
        self.state
    }

    #[inline]
    pub fn is_concealed(&self) -> bool {
        self.is_concealed
    }

    #[inline]
    pub fn winning_tile(&self) -> Option<Tile> {
        self.winning_tile
    }

    // 手牌の枚数 槓子は3枚として数える (ツモ前13枚, ツモ後14枚)
    pub fn tile_count(&self) -> usize {
        self.concealed.len() + self.drawn.iter().count() + self.melds.len() * 3
    }

    // 手牌,ツモ牌,鳴きに含まれるtの枚数
    pub fn count_tile(&self, t: Tile) -> usize {
        let n = self.concealed.iter().filter(|&&t2| t2 == t).count();
        let d = self.drawn.iter().filter(|&&t2| t2 == t).count();
        let m: usize = self
            .melds
            .iter()
            .map(|m| m.tiles().iter().filter(|&&t2| t2 == t).count())
            .sum();
        n + d + m
    }

    // 手牌(ツモ牌を除く)に含まれるtの枚数
    pub fn count_concealed(&self, t: Tile) -> usize {
        self.concealed.iter().filter(|&&t2| t2 == t).count()
    }

    fn check_state(&self, op: &'static str, states: &[HandState]) -> Result<(), HandError> {
        if states.contains(&self.state) {
            Ok(())
        } else {
            Err(IllegalState(op, self.state))
        }
    }

    fn check_overflow(&self, t: Tile) -> Result<(), HandError> {
        if self.count_tile(t) >= TILE {
            return Err(InvalidDeal(format!("more than {} copies of {}", TILE, t)));
        }
        Ok(())
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let drawn = if let Some(d) = self.drawn {
            d.to_string()
        } else {
            "None".to_string()
        };
        writeln!(
            f,
            "state: {:?}, concealed: {}, drawn: {}",
            self.state, self.is_concealed, drawn,
        )?;
        writeln!(f, "hand: {}", vec_to_string(&self.concealed))?;
        writeln!(f, "melds: {}", vec_to_string(&self.melds))?;
        write!(f, "discards: {}", vec_to_string(&self.discards))
    }
}

// [HandSnapshot]
// 役判定の入力 (手牌の変更はできない)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandSnapshot {
    pub concealed: Vec<Tile>,       // 手牌(鳴き,和了牌を除く)
    pub winning_tile: Option<Tile>, // ツモ牌または和了牌
    pub melds: Vec<Meld>,           // 鳴き(暗槓を含む)
}

impl HandSnapshot {
    pub fn new(concealed: Vec<Tile>, winning_tile: Option<Tile>, melds: Vec<Meld>) -> Self {
        Self {
            concealed,
            winning_tile,
            melds,
        }
    }

    // 鳴き以外の牌 (和了牌を含む)
    pub fn closed_tiles(&self) -> Vec<Tile> {
        let mut v = self.concealed.clone();
        v.extend(self.winning_tile);
        v
    }

    // 鳴きを含むすべての牌 (槓子は4枚)
    pub fn all_tiles(&self) -> Vec<Tile> {
        let mut v = self.closed_tiles();
        for m in &self.melds {
            v.extend_from_slice(m.tiles());
        }
        v
    }

    // 門前 (暗槓は門前を崩さない)
    pub fn is_concealed(&self) -> bool {
        self.melds.iter().all(Meld::is_concealed)
    }

    // 槓子を3枚として数えた枚数
    pub fn tile_count(&self) -> usize {
        self.concealed.len() + self.winning_tile.iter().count() + self.melds.len() * 3
    }

    // 枚数(13 or 14)と同種牌の上限をチェック
    pub fn validate(&self) -> Result<(), HandError> {
        let n = self.tile_count();
        if n != HAND && n != HAND + 1 {
            return Err(InvalidDeal(format!("snapshot holds {} tiles", n)));
        }
        if let Some(t) = find_overflow(&tiles_to_tile_table(&self.all_tiles())) {
            return Err(InvalidDeal(format!("more than {} copies of {}", TILE, t)));
        }
        Ok(())
    }
}

impl fmt::Display for HandSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", vec_to_string(&self.concealed))?;
        if let Some(t) = self.winning_tile {
            write!(f, " {}", t)?;
        }
        if !self.melds.is_empty() {
            write!(f, " {}", vec_to_string(&self.melds))?;
        }
        Ok(())
    }
}

fn judge_win(snapshot: &HandSnapshot, ctx: &TurnContext) -> Result<ScoringResult, HandError> {
    snapshot.validate()?;
    if win_shape(snapshot).is_none() {
        warn!("win rejected (not a winning shape): {}", snapshot);
        return Err(NotWinningShape);
    }
    let score = evaluate(snapshot, ctx)?;
    if score.is_no_yaku() {
        warn!("win rejected (no yaku): {}", snapshot);
    }
    score.into_win()
}

fn insert_sorted(v: &mut Vec<Tile>, t: Tile) {
    let i = v.partition_point(|&t2| t2 < t);
    v.insert(i, t);
}

// poolからtilesを1枚ずつ取り除いたリストを返却 (poolは変更しない)
fn remove_tiles(pool: &[Tile], tiles: &[Tile]) -> Result<Vec<Tile>, HandError> {
    let mut v = pool.to_vec();
    for &t in tiles {
        let i = v.iter().position(|&t2| t2 == t).ok_or(InsufficientTiles(t))?;
        v.remove(i);
    }
    Ok(v)
}

#[cfg(test)]
fn dealt(exp: &str) -> Hand {
    let mut h = Hand::new();
    h.deal_initial(&tiles_from_string(exp).unwrap()).unwrap();
    h
}

#[cfg(test)]
fn tile(s: &str) -> Tile {
    Tile::from_symbol(s).unwrap()
}

#[test]
fn test_deal_initial() {
    let h = dealt("m123456789p1234");
    assert_eq!(h.concealed().len(), 13);
    assert_eq!(h.drawn(), None);
    assert_eq!(h.state(), AwaitingDraw);
    assert!(h.is_concealed());

    let mut h = Hand::new();
    let e = h.deal_initial(&tiles_from_string("m123456789p123").unwrap());
    assert!(matches!(e, Err(InvalidDeal(_))));
    let e = h.deal_initial(&tiles_from_string("z11111m23456789").unwrap());
    assert!(matches!(e, Err(InvalidDeal(_))));
    assert!(h.concealed().is_empty());
}

#[test]
fn test_draw_discard() {
    let mut h = dealt("m123456789p1234");
    h.draw(tile("s5")).unwrap();
    assert_eq!(h.state(), TileDrawn);
    assert_eq!(h.tile_count(), 14);
    assert_eq!(h.draw(tile("s6")), Err(IllegalState("draw", TileDrawn)));

    h.discard(tile("s5"), true).unwrap();
    assert_eq!(h.concealed().len(), 13);
    assert_eq!(h.drawn(), None);
    assert_eq!(h.state(), AwaitingDraw);

    // 手出し ツモ牌は手牌に加わる
    h.draw(tile("z1")).unwrap();
    h.discard(tile("m1"), false).unwrap();
    assert_eq!(h.concealed().len(), 13);
    assert_eq!(*h.concealed().last().unwrap(), tile("z1"));
    assert_eq!(h.discards().len(), 2);
    assert!(!h.discards()[1].drawn);
}

#[test]
fn test_discard_errors() {
    let mut h = dealt("m123456789p1234");
    assert_eq!(h.discard(tile("m1"), false), Err(IllegalState("discard", AwaitingDraw)));

    h.draw(tile("s5")).unwrap();
    let before = h.clone();
    assert_eq!(h.discard(tile("s6"), true), Err(TileMismatch(Some(tile("s5")), tile("s6"))));
    assert_eq!(h.discard(tile("s5"), false), Err(TileNotInHand(tile("s5"))));
    assert_eq!(h.concealed(), before.concealed());
    assert_eq!(h.drawn(), before.drawn());
    assert_eq!(h.state(), TileDrawn);
}

#[test]
fn test_draw_overflow() {
    let mut h = dealt("z1111m123456789");
    let e = h.draw(tile("z1"));
    assert!(matches!(e, Err(InvalidDeal(_))));
    assert_eq!(h.state(), AwaitingDraw);
    assert_eq!(h.drawn(), None);

    // 配牌前はツモ不可
    let mut h = Hand::new();
    assert_eq!(h.draw(tile("z1")), Err(IllegalState("draw", AwaitingDraw)));
}

#[test]
fn test_apply_meld_pung() {
    let mut h = dealt("m123456789p1255");
    let meld = Meld::pung(tile("p5"), ACROSS).unwrap();
    h.apply_meld(meld).unwrap();
    assert_eq!(h.concealed().len(), 11);
    assert_eq!(h.melds().len(), 1);
    assert_eq!(h.tile_count(), 14);
    assert_eq!(h.state(), MeldDeclared);
    assert!(!h.is_concealed());

    // 鳴いた後はツモ不可, 手出しのみ
    assert_eq!(h.draw(tile("s1")), Err(IllegalState("draw", MeldDeclared)));
    h.discard(tile("m1"), false).unwrap();
    assert_eq!(h.tile_count(), 13);
    assert_eq!(h.state(), AwaitingDraw);
}

#[test]
fn test_apply_meld_chow_and_kong() {
    let mut h = dealt("m123456789p4666");
    let meld = Meld::chow(tile("p5"), tile("p4"), tile("p6")).unwrap();
    h.apply_meld(meld).unwrap();
    assert_eq!(h.concealed().len(), 11);
    h.discard(tile("m9"), false).unwrap();

    let mut h = dealt("m123456789p4666");
    h.apply_meld(Meld::kong(tile("p6"), RIGHT).unwrap()).unwrap();
    assert_eq!(h.concealed().len(), 10);
    assert_eq!(h.tile_count(), 13);
    assert_eq!(h.state(), AwaitingDraw);
    h.draw(tile("s1")).unwrap(); // 嶺上牌
    assert_eq!(h.tile_count(), 14);
}

#[test]
fn test_apply_meld_insufficient() {
    let mut h = dealt("m123456789p1235");
    let e = h.apply_meld(Meld::pung(tile("p5"), ACROSS).unwrap());
    assert_eq!(e, Err(InsufficientTiles(tile("p5"))));
    assert_eq!(h.concealed().len(), 13);
    assert!(h.melds().is_empty());
    assert!(h.is_concealed());
}

#[test]
fn test_concealed_kong() {
    let mut h = dealt("m123456789z1112");
    assert_eq!(
        h.apply_meld(Meld::concealed_kong(tile("z1")).unwrap()),
        Err(IllegalState("apply_meld", AwaitingDraw))
    );

    h.draw(tile("z1")).unwrap();
    h.apply_meld(Meld::concealed_kong(tile("z1")).unwrap()).unwrap();
    assert_eq!(h.concealed().len(), 10);
    assert_eq!(h.drawn(), None);
    assert_eq!(h.tile_count(), 13);
    assert!(h.is_concealed());
    assert!(h.snapshot().is_concealed());
}

#[test]
fn test_declare_self_draw_win() {
    let mut h = dealt("m1133p2244s66z557");
    h.draw(tile("z1")).unwrap();
    assert_eq!(
        h.declare_self_draw_win(&TurnContext::default()),
        Err(NotWinningShape)
    );
    assert_eq!(h.state(), TileDrawn);
    h.discard(tile("z1"), true).unwrap();

    h.draw(tile("z7")).unwrap();
    let score = h.declare_self_draw_win(&TurnContext::default()).unwrap();
    assert_eq!(score.total_fan, 3); // 七対子 + 門前自摸
    assert_eq!(h.state(), HandComplete);
    assert_eq!(h.winning_tile(), Some(tile("z7")));
}

#[test]
fn test_declare_claimed_win() {
    let mut h = dealt("m1133p2244s66z55z7");
    let ctx = TurnContext::with_winds(Wind::East, Wind::South);
    let score = h.declare_claimed_win(tile("z7"), &ctx).unwrap();
    assert_eq!(score.total_fan, 2);
    assert_eq!(h.state(), HandComplete);
    assert_eq!(h.winning_tile(), Some(tile("z7")));
    assert_eq!(h.draw(tile("m1")), Err(IllegalState("draw", HandComplete)));
}

#[test]
fn test_declare_no_yaku() {
    // 完成形だが役なし (鳴きあり,ロン)
    let mut h = dealt("m234p567s23499z12");
    let ctx = TurnContext::with_winds(Wind::East, Wind::South);
    h.apply_meld(Meld::pung(tile("s9"), ACROSS).unwrap()).unwrap();
    h.discard(tile("z2"), false).unwrap();
    assert_eq!(h.declare_claimed_win(tile("z1"), &ctx), Err(NoYaku));
    assert_eq!(h.state(), AwaitingDraw);
    assert_eq!(h.winning_tile(), None);
}
