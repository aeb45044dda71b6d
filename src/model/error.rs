use super::*;

// 手牌操作と役判定のエラー
// いずれのエラーも手牌を変更しない(操作は全て適用されるか全て棄却される)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandError {
    InvalidTile(String),            // 牌の定義外の値
    InvalidDeal(String),            // 配牌枚数の不正, 同種牌が5枚以上
    IllegalState(&'static str, HandState), // 現在の状態では実行できない操作
    TileMismatch(Option<Tile>, Tile), // ツモ切り指定の牌がツモ牌と不一致 (ツモ牌, 指定牌)
    TileNotInHand(Tile),            // 手牌に存在しない牌の打牌
    InsufficientTiles(Tile),        // 鳴きに必要な牌が手牌に不足
    InvalidMeld(String),            // 面子の構成が不正
    NotWinningShape,                // 和了形ではない
    NoYaku,                         // 和了形だが無役
}

impl fmt::Display for HandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use HandError::*;
        match self {
            InvalidTile(s) => write!(f, "invalid tile: {}", s),
            InvalidDeal(s) => write!(f, "invalid deal: {}", s),
            IllegalState(op, st) => write!(f, "illegal state: {} is not allowed in {:?}", op, st),
            TileMismatch(Some(d), t) => write!(f, "tile mismatch: drawn {}, requested {}", d, t),
            TileMismatch(None, t) => write!(f, "tile mismatch: no drawn tile, requested {}", t),
            TileNotInHand(t) => write!(f, "tile not in hand: {}", t),
            InsufficientTiles(t) => write!(f, "insufficient tiles: {} is missing", t),
            InvalidMeld(s) => write!(f, "invalid meld: {}", s),
            NotWinningShape => write!(f, "not a winning shape"),
            NoYaku => write!(f, "no yaku"),
        }
    }
}

impl std::error::Error for HandError {}

#[test]
fn test_error_message() {
    let e = HandError::TileNotInHand(Tile::from_symbol("p5").unwrap());
    assert_eq!(e.to_string(), "tile not in hand: p5");
    let e = HandError::IllegalState("draw", HandState::TileDrawn);
    assert_eq!(e.to_string(), "illegal state: draw is not allowed in TileDrawn");
}
