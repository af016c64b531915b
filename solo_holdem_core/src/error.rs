use crate::state::{SeatId, SeatKind};
use thiserror::Error;

/// 核心库的统一错误类型
#[derive(Debug, Error)]
pub enum GameError {
    /// 牌堆已空。52 张牌对最多 10 名玩家足够，出现即说明发牌逻辑有误。
    #[error("no cards left in deck")]
    DeckExhausted,

    /// 决策者被派发到了错误类型的座位上 (例如 AI 策略被用于人类座位)
    #[error("seat {seat} is not a {expected:?} seat")]
    InvalidSeatKind { seat: SeatId, expected: SeatKind },

    #[error("hand evaluation needs 5 to 7 cards, got {0}")]
    InvalidHandSize(usize),

    #[error("invalid card: {0:?}")]
    InvalidCard(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// 有筹码的座位少于 2 个，无法开局
    #[error("at least two seats with chips are required to start a hand")]
    NotEnoughPlayers,

    /// 摊牌时没有任何未弃牌的座位
    #[error("no seat left to award the pot to")]
    NoContenders,

    /// 人类玩家的输入流已关闭
    #[error("player input closed")]
    InputClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
