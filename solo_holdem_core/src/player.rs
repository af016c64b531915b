use crate::error::GameError;
use crate::state::{DecisionContext, PlayerAction, Seat, SeatKind};
use std::collections::VecDeque;

/// 座位的决策能力。下注引擎只通过这个接口取得动作，不关心座位背后是人还是 AI。
pub trait Decider {
    fn decide(&mut self, seat: &Seat, ctx: &DecisionContext<'_>) -> Result<PlayerAction, GameError>;
}

/// 确认座位类型，不符合时立即报错
pub fn expect_kind(seat: &Seat, expected: SeatKind) -> Result<(), GameError> {
    if seat.kind == expected {
        Ok(())
    } else {
        Err(GameError::InvalidSeatKind { seat: seat.id, expected })
    }
}

/// 按预设顺序出牌的玩家，用于复盘与测试。
/// 预设动作用完后一律弃牌。
#[derive(Debug, Clone, Default)]
pub struct ScriptedPlayer {
    actions: VecDeque<PlayerAction>,
}

impl ScriptedPlayer {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        ScriptedPlayer { actions: actions.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl Decider for ScriptedPlayer {
    fn decide(&mut self, _seat: &Seat, _ctx: &DecisionContext<'_>) -> Result<PlayerAction, GameError> {
        Ok(self.actions.pop_front().unwrap_or(PlayerAction::Fold))
    }
}
