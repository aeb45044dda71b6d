use serde::Serialize;

use crate::model::*;

// [完成形判定 (面子, 雀頭)]

// 1種類の列が面子(順子,刻子)だけで構成できるかの判定
// 小さい数字から走査し,3枚ずつ刻子にできない余りは順子の先頭として後ろの2つから差し引く
pub fn is_sets(tr: &TileRow, ti: Type) -> bool {
    let mut row = *tr;
    for ni in 1..TNUM {
        let rest = row[ni] % 3;
        if rest == 0 {
            continue;
        }
        if ti == TZ || ni + 2 >= TNUM || row[ni + 1] < rest || row[ni + 2] < rest {
            return false;
        }
        row[ni + 1] -= rest;
        row[ni + 2] -= rest;
    }
    true
}

// 雀頭として抜き出すと残りがすべて面子になる牌の一覧 (表示順)
// 1112345678999 + 9 のように複数の候補を持つ形がある
pub fn calc_possible_pairs(hand: &TileTable) -> Vec<Tile> {
    Tile::all()
        .filter(|&t| count_tile(hand, t) >= 2)
        .filter(|&t| {
            let mut rest = *hand;
            dec_tile(&mut rest, t);
            dec_tile(&mut rest, t);
            (0..TYPE).all(|ti| is_sets(&rest[ti], ti))
        })
        .collect()
}

// [和了形判定]

// 通常形
pub fn is_normal_win(hand: &TileTable) -> bool {
    !calc_possible_pairs(hand).is_empty()
}

// 七対子 (同じ牌4枚は2対子とみなさない)
pub fn is_seven_pairs_win(hand: &TileTable) -> bool {
    let mut n_pair = 0;
    for t in Tile::all() {
        match count_tile(hand, t) {
            0 => {}
            2 => n_pair += 1,
            _ => return false,
        }
    }
    n_pair == 7
}

// 国士無双
pub fn is_thirteen_orphans_win(hand: &TileTable) -> bool {
    let mut count = 0;
    for t in Tile::all() {
        let n = count_tile(hand, t);
        if t.is_end() {
            if n == 0 {
                return false;
            }
            count += n;
        } else if n != 0 {
            return false;
        }
    }
    count == 14
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WinShape {
    Standard,        // 4面子1雀頭
    SevenPairs,      // 七対子
    ThirteenOrphans, // 国士無双
}

// 和了形の判定 和了形でない場合はNone
pub fn win_shape(snapshot: &HandSnapshot) -> Option<WinShape> {
    let closed = snapshot.closed_tiles();
    if closed.len() + snapshot.melds.len() * 3 != HAND + 1 {
        return None;
    }

    let hand = tiles_to_tile_table(&closed);
    if is_normal_win(&hand) {
        return Some(WinShape::Standard);
    }
    if snapshot.melds.is_empty() {
        if is_seven_pairs_win(&hand) {
            return Some(WinShape::SevenPairs);
        }
        if is_thirteen_orphans_win(&hand) {
            return Some(WinShape::ThirteenOrphans);
        }
    }
    None
}

#[cfg(test)]
fn table(exp: &str) -> TileTable {
    tiles_to_tile_table(&tiles_from_string(exp).unwrap())
}

#[test]
fn test_normal_win() {
    assert!(is_normal_win(&table("m123456789p11z222")));
    assert!(is_normal_win(&table("m11123455678999")));
    assert!(!is_normal_win(&table("m11123456789p19")));
    assert!(is_normal_win(&table("m11123456789999")));
    assert!(is_normal_win(&table("z11122233344455")));
    assert!(!is_normal_win(&table("z11122233344456")));
    assert!(is_normal_win(&table("p22")));
}

#[test]
fn test_is_sets() {
    let row = |exp: &str| table(exp)[TM];
    assert!(is_sets(&row(""), TM));
    assert!(is_sets(&row("m111234"), TM));
    assert!(is_sets(&row("m112233"), TM));
    assert!(is_sets(&row("m111122223333"), TM));
    assert!(!is_sets(&row("m1123"), TM));
    assert!(!is_sets(&row("m789"), TZ));
    assert!(!is_sets(&row("m899"), TM));
}

#[test]
fn test_possible_pairs() {
    let pairs = calc_possible_pairs(&table("m11123z111"));
    assert_eq!(pairs, vec![Tile::from_symbol("m1").unwrap()]);
    // 3113形は雀頭候補が2つ
    let pairs = calc_possible_pairs(&table("m11123444z111"));
    assert_eq!(pairs.len(), 2);
    assert!(calc_possible_pairs(&table("m11123445z111")).is_empty());
}

#[test]
fn test_special_wins() {
    assert!(is_seven_pairs_win(&table("m1133p2244s66z5577")));
    assert!(!is_seven_pairs_win(&table("m1111p2244s66z5577")));
    assert!(is_thirteen_orphans_win(&table("m19p19s19z12345677")));
    assert!(!is_thirteen_orphans_win(&table("m159p19s19z1234567")));
}

#[test]
fn test_win_shape() {
    let snapshot = |exp: &str| {
        let mut tiles = tiles_from_string(exp).unwrap();
        let wt = tiles.pop();
        HandSnapshot::new(tiles, wt, vec![])
    };
    assert_eq!(win_shape(&snapshot("m123456789p11z222")), Some(WinShape::Standard));
    assert_eq!(win_shape(&snapshot("m1133p2244s66z5577")), Some(WinShape::SevenPairs));
    assert_eq!(
        win_shape(&snapshot("m19p19s19z12345677")),
        Some(WinShape::ThirteenOrphans)
    );
    assert_eq!(win_shape(&snapshot("m123456789p12z222")), None);
    assert_eq!(win_shape(&snapshot("m123456789p1z222")), None);

    let p5 = Tile::from_symbol("p5").unwrap();
    let mut s = snapshot("m123456789p11");
    s.melds.push(Meld::pung(p5, LEFT).unwrap());
    assert_eq!(win_shape(&s), Some(WinShape::Standard));
}
