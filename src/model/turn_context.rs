use super::*;

// 役判定時に外部(局の進行管理側)から与えられる和了の状況
// 手牌の組み合わせ以外で成立する役(天和,地和,人和,立直,門前自摸)の判定に使用
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnContext {
    pub is_dealer: bool,                  // 親番
    pub is_first_uninterrupted_turn: bool, // 配牌後,鳴きの入っていない第一巡
    pub won_by_self_draw: bool,           // ツモ和了
    pub won_by_claim: bool,               // ロン和了
    pub is_riichi: bool,                  // リーチ宣言済み
    pub seat_wind: Wind,                  // 自風
    pub prevalent_wind: Wind,             // 場風
}

impl TurnContext {
    // 自風から親番を決定
    pub fn with_winds(prevalent_wind: Wind, seat_wind: Wind) -> Self {
        Self {
            is_dealer: seat_wind == Wind::East,
            seat_wind,
            prevalent_wind,
            ..Default::default()
        }
    }

    #[inline]
    pub fn self_drawn(self) -> Self {
        Self {
            won_by_self_draw: true,
            won_by_claim: false,
            ..self
        }
    }

    #[inline]
    pub fn claimed(self) -> Self {
        Self {
            won_by_self_draw: false,
            won_by_claim: true,
            ..self
        }
    }
}

#[test]
fn test_turn_context() {
    let ctx = TurnContext::with_winds(Wind::East, Wind::South).self_drawn();
    assert!(!ctx.is_dealer);
    assert!(ctx.won_by_self_draw && !ctx.won_by_claim);
    let ctx = ctx.claimed();
    assert!(!ctx.won_by_self_draw && ctx.won_by_claim);
    assert!(TurnContext::with_winds(Wind::South, Wind::East).is_dealer);
}
