use crate::model::*;
use crate::util::misc::cartesian_product;

use super::win::calc_possible_pairs;

use SetPairType::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetPairType {
    Pair,          // 雀頭
    Run,           // 順子
    Triplet,       // 刻子 (手牌内, ロンの和了牌を含む場合もある)
    Chow,          // チー
    Pung,          // ポン
    Kong,          // 明槓
    ConcealedKong, // 暗槓
}

// Tileは順子、チーの場合は先頭の牌
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPair(pub SetPairType, pub Tile);

pub type ParsedHand = Vec<SetPair>;

// 鳴きをSetPairに変換したリストを返却
pub fn parse_melds(melds: &[Meld]) -> ParsedHand {
    melds
        .iter()
        .map(|m| {
            let tp = match m.kind() {
                MeldKind::Chow => Chow,
                MeldKind::Pung => Pung,
                MeldKind::Kong if m.is_concealed() => ConcealedKong,
                MeldKind::Kong => Kong,
            };
            SetPair(tp, m.first())
        })
        .collect()
}

// 1種類の列を面子に分解するすべてのパターン 分解できない列は空のVec
// 残っている最小の牌は刻子か順子の先頭のどちらかになるので,その2通りに分岐して再帰
// 111222333のような三連刻は刻子3つと順子3つの両方が返る
// 空の列は面子0個の分解が1通り([[]])
fn parse_row_into_sets(tr: &TileRow, ti: Type) -> Vec<ParsedHand> {
    let ni = match (1..TNUM).find(|&ni| tr[ni] != 0) {
        Some(ni) => ni,
        None => return vec![vec![]],
    };
    let head = Tile::from_index(ti, ni);

    let mut res = vec![];
    if tr[ni] >= 3 {
        let mut rest = *tr;
        rest[ni] -= 3;
        for mut ph in parse_row_into_sets(&rest, ti) {
            ph.insert(0, SetPair(Triplet, head));
            res.push(ph);
        }
    }
    if ti != TZ && ni + 2 < TNUM && tr[ni + 1] != 0 && tr[ni + 2] != 0 {
        let mut rest = *tr;
        for n in &mut rest[ni..ni + 3] {
            *n -= 1;
        }
        for mut ph in parse_row_into_sets(&rest, ti) {
            ph.insert(0, SetPair(Run, head));
            res.push(ph);
        }
    }
    res
}

// 通常形(4面子1雀頭)のすべての分解 七対子・国士無双は対象外
// handは鳴きを除いた手牌(和了牌を含む) 雀頭は各分解の末尾
pub fn parse_into_normal_win(hand: &TileTable) -> Vec<ParsedHand> {
    let mut res = vec![];
    for pair in calc_possible_pairs(hand) {
        let mut rest = *hand;
        dec_tile(&mut rest, pair);
        dec_tile(&mut rest, pair);

        // 牌種ごとの分解の直積
        let rows: Vec<Vec<ParsedHand>> = (0..TYPE)
            .map(|ti| parse_row_into_sets(&rest[ti], ti))
            .collect();
        for sets in cartesian_product(&rows) {
            let mut ph: ParsedHand = sets.into_iter().flatten().copied().collect();
            ph.push(SetPair(Pair, pair));
            res.push(ph);
        }
    }
    res
}

#[cfg(test)]
fn parse(exp: &str) -> Vec<ParsedHand> {
    parse_into_normal_win(&tiles_to_tile_table(&tiles_from_string(exp).unwrap()))
}

#[test]
fn test_parse_normal_win() {
    let phs = parse("m123456789p11z222");
    assert_eq!(phs.len(), 1);
    let ph = &phs[0];
    assert_eq!(ph.len(), 5);
    assert_eq!(ph.iter().filter(|sp| sp.0 == Run).count(), 3);
    assert!(ph.contains(&SetPair(Pair, Tile::from_symbol("p1").unwrap())));
    assert!(ph.contains(&SetPair(Triplet, Tile::from_symbol("z2").unwrap())));

    assert!(parse("m123456789p12z222").is_empty());
}

#[test]
fn test_parse_three_consecutive_triplets() {
    // 刻子3つ または 順子3つ
    let phs = parse("m111222333p11s789");
    assert_eq!(phs.len(), 2);
    assert!(phs.iter().any(|ph| ph.iter().filter(|sp| sp.0 == Triplet).count() == 3));
    assert!(phs.iter().any(|ph| ph.iter().filter(|sp| sp.0 == Run).count() == 4));
}

#[test]
fn test_parse_melds() {
    let p5 = Tile::from_symbol("p5").unwrap();
    let melds = vec![
        Meld::pung(p5, LEFT).unwrap(),
        Meld::concealed_kong(Tile::wind(Wind::East)).unwrap(),
    ];
    let ph = parse_melds(&melds);
    assert_eq!(ph, vec![SetPair(Pung, p5), SetPair(ConcealedKong, Tile::wind(Wind::East))]);
}
