use serde::{de, ser};

use super::*;

// [Suit, Wind, Dragon]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Characters, // 萬子
    Circles,    // 筒子
    Bamboos,    // 索子
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Wind {
    #[default]
    East,
    South,
    West,
    North,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dragon {
    White,
    Green,
    Red,
}

// 種別,数字のIndexとの対応表 (起動後に変更されることはない)
pub const SUITS: [Suit; 3] = [Suit::Characters, Suit::Circles, Suit::Bamboos];
pub const WINDS: [Wind; 4] = [Wind::East, Wind::South, Wind::West, Wind::North];
pub const DRAGONS: [Dragon; 3] = [Dragon::White, Dragon::Green, Dragon::Red];

impl Suit {
    #[inline]
    pub fn index(self) -> Type {
        self as Type
    }
}

impl Wind {
    #[inline]
    pub fn tnum(self) -> Tnum {
        WE + self as Tnum
    }

    pub fn from_char(c: char) -> Result<Self, HandError> {
        Ok(match c {
            'E' => Wind::East,
            'S' => Wind::South,
            'W' => Wind::West,
            'N' => Wind::North,
            _ => return Err(HandError::InvalidTile(format!("invalid wind symbol: {}", c))),
        })
    }
}

impl Dragon {
    #[inline]
    pub fn tnum(self) -> Tnum {
        DW + self as Tnum
    }
}

// 牌の分類 パターンマッチ用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Suited(Suit, Tnum),
    Wind(Wind),
    Dragon(Dragon),
}

// [Tile]
// (種別index, 数字index) 生成時に値域をチェックするためフィールドは非公開
// 導出した順序がそのまま表示用の並び順になる(萬子,筒子,索子,東南西北白發中)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile(Type, Tnum);

impl Tile {
    pub fn new(ti: Type, ni: Tnum) -> Result<Self, HandError> {
        if ti >= TYPE || ni == 0 || ni > TNUM_MAX[ti] {
            return Err(HandError::InvalidTile(format!("({}, {})", ti, ni)));
        }
        Ok(Self(ti, ni))
    }

    // 値域チェック済みのindexからの生成 (手牌テーブルの走査用)
    #[inline]
    pub(crate) fn from_index(ti: Type, ni: Tnum) -> Self {
        debug_assert!(ti < TYPE && 1 <= ni && ni <= TNUM_MAX[ti]);
        Self(ti, ni)
    }

    pub fn suited(suit: Suit, rank: Tnum) -> Result<Self, HandError> {
        Self::new(suit.index(), rank)
    }

    #[inline]
    pub fn wind(w: Wind) -> Self {
        Self(TZ, w.tnum())
    }

    #[inline]
    pub fn dragon(d: Dragon) -> Self {
        Self(TZ, d.tnum())
    }

    pub fn from_symbol(s: &str) -> Result<Self, HandError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return Err(HandError::InvalidTile(s.to_string()));
        }
        let ti = TYPE_SYMBOLS
            .iter()
            .position(|&c| c == chars[0])
            .ok_or_else(|| HandError::InvalidTile(s.to_string()))?;
        let ni = chars[1]
            .to_digit(10)
            .ok_or_else(|| HandError::InvalidTile(s.to_string()))? as Tnum;
        Self::new(ti, ni)
    }

    // 34種すべての牌を表示順に返却
    pub fn all() -> impl Iterator<Item = Tile> {
        (0..TYPE).flat_map(|ti| (1..=TNUM_MAX[ti]).map(move |ni| Tile(ti, ni)))
    }

    #[inline]
    pub fn type_index(&self) -> Type {
        self.0
    }

    #[inline]
    pub fn number(&self) -> Tnum {
        self.1
    }

    pub fn kind(&self) -> TileKind {
        if self.0 == TZ {
            if self.1 <= WN {
                TileKind::Wind(WINDS[self.1 - WE])
            } else {
                TileKind::Dragon(DRAGONS[self.1 - DW])
            }
        } else {
            TileKind::Suited(SUITS[self.0], self.1)
        }
    }

    // 同じ種別でdだけ数字をずらした牌 字牌や範囲外の場合はNone
    pub fn shifted(&self, d: isize) -> Option<Tile> {
        if self.is_honor() {
            return None;
        }
        let ni = self.1 as isize + d;
        if (1..=9).contains(&ni) {
            Some(Tile(self.0, ni as Tnum))
        } else {
            None
        }
    }

    // 数牌
    #[inline]
    pub fn is_suit(&self) -> bool {
        self.0 != TZ
    }

    // 字牌
    #[inline]
    pub fn is_honor(&self) -> bool {
        self.0 == TZ
    }

    // 1,9牌
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.0 != TZ && (self.1 == 1 || self.1 == 9)
    }

    // 么九牌
    #[inline]
    pub fn is_end(&self) -> bool {
        self.0 == TZ || self.1 == 1 || self.1 == 9
    }

    // 中張牌
    #[inline]
    pub fn is_simple(&self) -> bool {
        !self.is_end()
    }

    // 三元牌
    #[inline]
    pub fn is_dragon(&self) -> bool {
        self.0 == TZ && DW <= self.1 && self.1 <= DR
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", TYPE_SYMBOLS[self.0], self.1)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl ser::Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct TileVisitor;

impl<'de> de::Visitor<'de> for TileVisitor {
    type Value = Tile;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("tile symbol")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Tile::from_symbol(v).map_err(E::custom)
    }
}

impl<'de> de::Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as de::Deserializer<'de>>::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(TileVisitor)
    }
}

// [TileTable]
// 牌種ごとの枚数表 table[種別index][数字index]
pub type TileRow = [usize; TNUM];
pub type TileTable = [TileRow; TYPE];

#[inline]
pub fn count_tile(tt: &TileTable, t: Tile) -> usize {
    tt[t.0][t.1]
}

#[inline]
pub fn inc_tile(tt: &mut TileTable, t: Tile) {
    tt[t.0][t.1] += 1;
}

#[inline]
pub fn dec_tile(tt: &mut TileTable, t: Tile) {
    tt[t.0][t.1] -= 1;
}

pub fn tiles_to_tile_table(tiles: &[Tile]) -> TileTable {
    let mut tt = TileTable::default();
    for &t in tiles {
        inc_tile(&mut tt, t);
    }
    tt
}

pub fn tiles_from_tile_table(tt: &TileTable) -> Vec<Tile> {
    let mut tiles = vec![];
    for t in Tile::all() {
        for _ in 0..count_tile(tt, t) {
            tiles.push(t);
        }
    }
    tiles
}

// 枚数が上限(4枚)を超えている牌を返却
pub fn find_overflow(tt: &TileTable) -> Option<Tile> {
    Tile::all().find(|&t| count_tile(tt, t) > TILE)
}

// "m123p456z11" 形式の文字列を牌のリストに変換
pub fn tiles_from_string(exp: &str) -> Result<Vec<Tile>, HandError> {
    let mut tiles = vec![];
    let mut ti = None;
    for c in exp.chars() {
        match c {
            'm' | 'p' | 's' | 'z' => ti = TYPE_SYMBOLS.iter().position(|&s| s == c),
            '0'..='9' => {
                let ti = ti.ok_or_else(|| {
                    HandError::InvalidTile(format!("tile number before tile type: {}", exp))
                })?;
                tiles.push(Tile::new(ti, c as usize - '0' as usize)?);
            }
            _ => return Err(HandError::InvalidTile(format!("invalid char: '{}'", c))),
        }
    }
    Ok(tiles)
}

#[test]
fn test_tile_universe() {
    assert_eq!(Tile::all().count(), 34);
    assert!(Tile::new(TM, 0).is_err());
    assert!(Tile::new(TZ, 8).is_err());
    assert!(Tile::new(4, 1).is_err());
    assert!(Tile::from_symbol("z9").is_err());
    assert!(Tile::from_symbol("x1").is_err());
    assert_eq!(Tile::from_symbol("z5").unwrap(), Tile::dragon(Dragon::White));
    assert_eq!(Tile::suited(Suit::Circles, 9).unwrap(), Tile::from_symbol("p9").unwrap());
    assert!(Tile::suited(Suit::Bamboos, 10).is_err());
    assert!(Tile::dragon(Dragon::Green).is_dragon());
    assert!(!Tile::wind(Wind::North).is_dragon());
    assert_eq!(Tile::from_symbol("z4").unwrap().kind(), TileKind::Wind(Wind::North));
    assert_eq!(
        Tile::from_symbol("s7").unwrap().kind(),
        TileKind::Suited(Suit::Bamboos, 7)
    );
}

#[test]
fn test_tile_order() {
    let mut tiles = tiles_from_string("z71s9p1m9z1m1").unwrap();
    tiles.sort();
    assert_eq!(tiles, tiles_from_string("m19p1s9z117").unwrap());
}

#[test]
fn test_tile_shifted() {
    let t = Tile::from_symbol("p8").unwrap();
    assert_eq!(t.shifted(1), Some(Tile::from_symbol("p9").unwrap()));
    assert_eq!(t.shifted(2), None);
    assert_eq!(Tile::wind(Wind::East).shifted(1), None);
}

#[test]
fn test_tiletable() {
    let hand = tiles_from_string("p34777s1235567z66").unwrap();
    let tt = tiles_to_tile_table(&hand);
    assert_eq!(tiles_from_tile_table(&tt), hand);
    assert_eq!(find_overflow(&tt), None);
    let tt = tiles_to_tile_table(&tiles_from_string("z11111").unwrap());
    assert_eq!(find_overflow(&tt), Some(Tile::wind(Wind::East)));
}

#[test]
fn test_tile_serde() {
    let t = Tile::from_symbol("s3").unwrap();
    assert_eq!(serde_json::to_string(&t).unwrap(), "\"s3\"");
    let t2: Tile = serde_json::from_str("\"s3\"").unwrap();
    assert_eq!(t, t2);
    assert!(serde_json::from_str::<Tile>("\"m0\"").is_err());
}
