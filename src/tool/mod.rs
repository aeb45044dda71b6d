// 手牌に対して可能な操作を列挙するモジュール
mod possible_actions;

pub use possible_actions::{claimable_actions, self_kong_options, MeldOption};
