// 型エイリアス
pub type Type = usize; // 牌の種別部分 (萬子,筒子,索子,字牌)
pub type Tnum = usize; // 牌の数字部分 (数牌: 1~9, 字牌: 1~7)
pub type SeatOffset = usize; // 鳴くプレイヤーから見て捨て牌を出したプレイヤーが何席前か (0: 自分, 1: 上家)

// Number
pub const SEAT: usize = 4; // 座席の数
pub const TYPE: usize = 4; // 牌の種別部分の数 (萬子,筒子,索子,字牌)
pub const TNUM: usize = 10; // 牌の数字部分の配列長 (0は未使用)
pub const TILE: usize = 4; // 同種の牌の数
pub const HAND: usize = 13; // 配牌の枚数

// Type Index
pub const TM: usize = 0; // Type: Manzu (萬子)
pub const TP: usize = 1; // Type: Pinzu (筒子)
pub const TS: usize = 2; // Type: Souzu (索子)
pub const TZ: usize = 3; // Type: Zihai (字牌)

// Tnum Index
pub const WE: usize = 1; // Wind:   East  (東)
pub const WS: usize = 2; // Wind:   South (南)
pub const WW: usize = 3; // Wind:   West  (西)
pub const WN: usize = 4; // Wind:   North (北)
pub const DW: usize = 5; // Dragon: White (白)
pub const DG: usize = 6; // Dragon: Green (發)
pub const DR: usize = 7; // Dragon: Red   (中)

// SeatOffset
pub const LEFT: SeatOffset = 1; // 上家の捨て牌 (チー可能)
pub const ACROSS: SeatOffset = 2; // 対面の捨て牌
pub const RIGHT: SeatOffset = 3; // 下家の捨て牌

// 牌の種別ごとの数字の上限
pub const TNUM_MAX: [Tnum; TYPE] = [9, 9, 9, 7];

// 表示用の記号
pub const TYPE_SYMBOLS: [char; TYPE] = ['m', 'p', 's', 'z'];
