// 手牌のデータモデル
mod define;
mod error;
mod meld;
mod player;
mod tile;
mod turn_context;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use define::*;
pub use error::*;
pub use meld::*;
pub use player::*;
pub use tile::*;
pub use turn_context::*;
