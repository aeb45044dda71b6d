// 手牌の和了判定と役判定を行うモジュール
mod evaluate;
mod parse;
mod win;
mod yaku;

pub use self::{
    evaluate::{aggregate, evaluate, ScoringResult, YakuMatch},
    parse::{parse_into_normal_win, parse_melds, ParsedHand, SetPair, SetPairType},
    win::{
        calc_possible_pairs, is_normal_win, is_seven_pairs_win, is_thirteen_orphans_win,
        win_shape, WinShape,
    },
    yaku::{Yaku, YakuClass, YakuContext, YakuDefine, NO_YAKU_NAME, YAKUMAN_FAN},
};
