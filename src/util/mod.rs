// 汎用的なユーティリティ
pub mod log;
pub mod misc;
