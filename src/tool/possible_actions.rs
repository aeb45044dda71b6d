use serde::Serialize;

use crate::model::*;
use crate::util::misc::vec_to_string;

// [Claim Action Check]
// 他家の捨て牌に対して可能な鳴きをチェックする (手牌は変更しない)
// fn(&Hand, Tile, SeatOffset) -> Vec<MeldOption>

// 鳴きの候補 consumedは手牌から使用する牌
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeldOption {
    pub meld: Meld,
    pub consumed: Vec<Tile>,
}

impl MeldOption {
    fn new(meld: Meld) -> Self {
        let consumed = meld.tiles_from_hand();
        Self { meld, consumed }
    }
}

impl std::fmt::Display for MeldOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} {} (hand: {})",
            self.meld.kind(),
            self.meld,
            vec_to_string(&self.consumed)
        )
    }
}

// claimant_seat_offsetは鳴くプレイヤーから見た捨てたプレイヤーの席 (1: 上家, 2: 対面, 3: 下家)
// 自分の捨て牌(0)や範囲外の場合は空
pub fn claimable_actions(
    hand: &Hand,
    discarded: Tile,
    claimant_seat_offset: SeatOffset,
) -> Vec<MeldOption> {
    if claimant_seat_offset == 0 || claimant_seat_offset >= SEAT {
        return vec![];
    }

    let mut acts = vec![];
    acts.append(&mut check_pung(hand, discarded, claimant_seat_offset));
    acts.append(&mut check_kong(hand, discarded, claimant_seat_offset));
    if claimant_seat_offset == LEFT {
        acts.append(&mut check_chow(hand, discarded));
    }
    acts
}

fn check_pung(hand: &Hand, d: Tile, from: SeatOffset) -> Vec<MeldOption> {
    if hand.count_concealed(d) < 2 {
        return vec![];
    }
    Meld::pung(d, from).map(MeldOption::new).into_iter().collect()
}

fn check_kong(hand: &Hand, d: Tile, from: SeatOffset) -> Vec<MeldOption> {
    if hand.count_concealed(d) != 3 {
        return vec![];
    }
    Meld::kong(d, from).map(MeldOption::new).into_iter().collect()
}

fn check_chow(hand: &Hand, d: Tile) -> Vec<MeldOption> {
    if d.is_honor() {
        return vec![];
    }

    let check = [
        (-2, -1), // 右端をチー
        (-1, 1),  // 嵌張をチー
        (1, 2),   // 左端をチー
    ];

    let mut acts = vec![];
    for (d0, d1) in check {
        let (t0, t1) = match (d.shifted(d0), d.shifted(d1)) {
            (Some(t0), Some(t1)) => (t0, t1),
            _ => continue,
        };
        if hand.count_concealed(t0) == 0 || hand.count_concealed(t1) == 0 {
            continue;
        }
        if let Ok(m) = Meld::chow(d, t0, t1) {
            acts.push(MeldOption::new(m));
        }
    }
    acts
}

// [Turn Action Check]
// ツモ後に可能な暗槓をチェックする (手牌とツモ牌で4枚)
pub fn self_kong_options(hand: &Hand) -> Vec<MeldOption> {
    if hand.state() != HandState::TileDrawn {
        return vec![];
    }

    let mut pool = hand.concealed().to_vec();
    pool.extend(hand.drawn());
    let tt = tiles_to_tile_table(&pool);
    Tile::all()
        .filter(|&t| count_tile(&tt, t) == TILE)
        .filter_map(|t| Meld::concealed_kong(t).ok())
        .map(MeldOption::new)
        .collect()
}

#[cfg(test)]
fn hand(exp: &str) -> Hand {
    let mut h = Hand::new();
    h.deal_initial(&tiles_from_string(exp).unwrap()).unwrap();
    h
}

#[cfg(test)]
fn tile(s: &str) -> Tile {
    Tile::from_symbol(s).unwrap()
}

#[test]
fn test_claim_pung() {
    let h = hand("m123789p55s1239z1");
    let acts = claimable_actions(&h, tile("p5"), ACROSS);
    assert_eq!(acts.len(), 1);
    assert_eq!(acts[0].meld.kind(), MeldKind::Pung);
    assert_eq!(acts[0].consumed, vec![tile("p5"), tile("p5")]);

    assert!(claimable_actions(&h, tile("p5"), 0).is_empty());
    assert!(claimable_actions(&h, tile("p5"), SEAT).is_empty());
}

#[test]
fn test_claim_kong() {
    let h = hand("m123789p555s129z1");
    let acts = claimable_actions(&h, tile("p5"), RIGHT);
    let kinds: Vec<MeldKind> = acts.iter().map(|a| a.meld.kind()).collect();
    assert_eq!(kinds, vec![MeldKind::Pung, MeldKind::Kong]);
    assert_eq!(acts[1].consumed.len(), 3);
    assert_eq!(acts[1].meld.claim().map(|c| c.from), Some(RIGHT));
}

#[test]
fn test_claim_chow() {
    let h = hand("m123789p46s1239z1");
    let acts = claimable_actions(&h, tile("p5"), LEFT);
    assert_eq!(acts.len(), 1);
    assert_eq!(acts[0].meld.kind(), MeldKind::Chow);
    assert_eq!(acts[0].meld.tiles(), &[tile("p4"), tile("p5"), tile("p6")]);
    assert_eq!(acts[0].consumed, vec![tile("p4"), tile("p6")]);

    // 上家以外からはチー不可
    assert!(claimable_actions(&h, tile("p5"), ACROSS).is_empty());
    assert!(claimable_actions(&h, tile("p5"), RIGHT).is_empty());

    // 両面,辺張,嵌張
    let h = hand("m1245p11s999z1234");
    let acts = claimable_actions(&h, tile("m3"), LEFT);
    assert_eq!(acts.len(), 3);
    let acts = claimable_actions(&h, tile("m6"), LEFT);
    assert_eq!(acts.len(), 1);
}

#[test]
fn test_claim_honor() {
    let h = hand("m123789p46s123z11");
    let acts = claimable_actions(&h, tile("z1"), LEFT);
    assert_eq!(acts.len(), 1);
    assert_eq!(acts[0].meld.kind(), MeldKind::Pung);
    assert!(claimable_actions(&h, tile("z2"), LEFT).is_empty());
}

#[test]
fn test_self_kong_options() {
    let mut h = hand("m1112345678p99z1");
    assert!(self_kong_options(&h).is_empty());
    h.draw(tile("m1")).unwrap();
    let acts = self_kong_options(&h);
    assert_eq!(acts.len(), 1);
    assert!(acts[0].meld.is_concealed());
    assert_eq!(acts[0].consumed, vec![tile("m1"); 4]);
}
