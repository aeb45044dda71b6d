use super::*;
use crate::util::misc::vec_to_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeldKind {
    Pung, // ポン (刻子)
    Chow, // チー (順子)
    Kong, // カン (槓子)
}

impl MeldKind {
    #[inline]
    pub fn tile_count(self) -> usize {
        match self {
            MeldKind::Pung | MeldKind::Chow => 3,
            MeldKind::Kong => 4,
        }
    }
}

// 鳴いた牌と捨てたプレイヤー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub tile: Tile,
    pub from: SeatOffset,
}

// 鳴き(副露)および暗槓
// 生成時に構成をチェックするためフィールドは非公開
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meld {
    kind: MeldKind,
    tiles: Vec<Tile>,     // 数字順にソート済み
    claim: Option<Claim>, // 暗槓の場合はNone
}

impl Meld {
    pub fn new(
        kind: MeldKind,
        mut tiles: Vec<Tile>,
        claim: Option<Claim>,
    ) -> Result<Self, HandError> {
        let invalid = |tiles: &[Tile], msg: &str| {
            Err(HandError::InvalidMeld(format!("{:?}{} {}", kind, vec_to_string(tiles), msg)))
        };

        if tiles.len() != kind.tile_count() {
            return invalid(&tiles, "wrong number of tiles");
        }
        tiles.sort();

        let t0 = tiles[0];
        match kind {
            MeldKind::Pung | MeldKind::Kong => {
                if tiles.iter().any(|&t| t != t0) {
                    return invalid(&tiles, "tiles are not identical");
                }
            }
            MeldKind::Chow => {
                if t0.shifted(1) != Some(tiles[1]) || t0.shifted(2) != Some(tiles[2]) {
                    return invalid(&tiles, "tiles are not a run");
                }
            }
        }

        match claim {
            Some(c) => {
                if !tiles.contains(&c.tile) {
                    return invalid(&tiles, "claimed tile is not in the meld");
                }
                if c.from == 0 || c.from >= SEAT {
                    return invalid(&tiles, "claimed from own seat");
                }
                if kind == MeldKind::Chow && c.from != LEFT {
                    return invalid(&tiles, "chow must be claimed from the left seat");
                }
            }
            None => {
                if kind != MeldKind::Kong {
                    return invalid(&tiles, "only a kong can be declared without a claim");
                }
            }
        }

        Ok(Self { kind, tiles, claim })
    }

    pub fn pung(t: Tile, from: SeatOffset) -> Result<Self, HandError> {
        Self::new(MeldKind::Pung, vec![t; 3], Some(Claim { tile: t, from }))
    }

    pub fn kong(t: Tile, from: SeatOffset) -> Result<Self, HandError> {
        Self::new(MeldKind::Kong, vec![t; 4], Some(Claim { tile: t, from }))
    }

    pub fn concealed_kong(t: Tile) -> Result<Self, HandError> {
        Self::new(MeldKind::Kong, vec![t; 4], None)
    }

    // 鳴いた牌dと手牌の2枚でチー
    pub fn chow(d: Tile, t0: Tile, t1: Tile) -> Result<Self, HandError> {
        Self::new(MeldKind::Chow, vec![d, t0, t1], Some(Claim { tile: d, from: LEFT }))
    }

    #[inline]
    pub fn kind(&self) -> MeldKind {
        self.kind
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    pub fn claim(&self) -> Option<Claim> {
        self.claim
    }

    // 他家の捨て牌を含まない面子(暗槓)
    #[inline]
    pub fn is_concealed(&self) -> bool {
        self.claim.is_none()
    }

    // 先頭(最小)の牌
    #[inline]
    pub fn first(&self) -> Tile {
        self.tiles[0]
    }

    // 面子の構成に手牌から使用する牌 (鳴いた牌1枚を除く)
    pub fn tiles_from_hand(&self) -> Vec<Tile> {
        let mut v = self.tiles.clone();
        if let Some(c) = self.claim {
            if let Some(i) = v.iter().position(|&t| t == c.tile) {
                v.remove(i);
            }
        }
        v
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<String> = self
            .tiles
            .iter()
            .map(|t| match self.claim {
                Some(c) if c.tile == *t => format!("{}({})", t, c.from),
                _ => t.to_string(),
            })
            .collect();
        write!(f, "{}", s.join("|"))
    }
}

#[test]
fn test_meld_new() {
    let p5 = Tile::from_symbol("p5").unwrap();
    let p4 = Tile::from_symbol("p4").unwrap();
    let p6 = Tile::from_symbol("p6").unwrap();

    let m = Meld::chow(p5, p6, p4).unwrap();
    assert_eq!(m.tiles(), &[p4, p5, p6]);
    assert_eq!(m.tiles_from_hand(), vec![p4, p6]);

    let m = Meld::kong(p5, ACROSS).unwrap();
    assert_eq!(m.tiles_from_hand(), vec![p5, p5, p5]);
    assert!(!m.is_concealed());
    assert!(Meld::concealed_kong(p5).unwrap().is_concealed());

    let z1 = Tile::wind(Wind::East);
    let z2 = Tile::wind(Wind::South);
    let z3 = Tile::wind(Wind::West);
    assert!(Meld::chow(z1, z2, z3).is_err());
    assert!(Meld::new(MeldKind::Chow, vec![p4, p5, p6], Some(Claim { tile: p5, from: RIGHT })).is_err());
    assert!(Meld::new(MeldKind::Pung, vec![p5, p5, p6], Some(Claim { tile: p5, from: LEFT })).is_err());
    assert!(Meld::new(MeldKind::Pung, vec![p5; 3], None).is_err());
    assert!(Meld::new(MeldKind::Kong, vec![p5; 3], None).is_err());
    assert!(Meld::pung(p5, 0).is_err());
}

#[test]
fn test_meld_chow_across_suits() {
    let m9 = Tile::from_symbol("m9").unwrap();
    let p1 = Tile::from_symbol("p1").unwrap();
    let p2 = Tile::from_symbol("p2").unwrap();
    assert!(Meld::chow(p1, m9, p2).is_err());
}
