use crate::card::Card;
use crate::evaluator::HandCategory;
use crate::state::{PlayerAction, SeatId, Street, Table};
use serde::{Deserialize, Serialize};

// --- 牌桌事件 ---
// 游戏状态每次发生可见变化时，向观察者发布一个事件。

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum TableEvent {
    /// 新的一局开始
    HandStarted {
        hand_number: u32,
        dealer: SeatId,
    },

    BlindPosted {
        seat: SeatId,
        blind: Blind,
        amount: u32,
    },

    /// 发出底牌。展示前应通过 [`TableEvent::for_viewer`] 隐藏他人的牌。
    HoleCardsDealt {
        seat: SeatId,
        cards: Option<[Card; 2]>,
    },

    /// 新的下注轮开始，`board` 为目前全部公共牌
    StreetStarted {
        street: Street,
        board: Vec<Card>,
        pot: u32,
    },

    /// 轮到某个座位行动
    TurnStarted {
        seat: SeatId,
    },

    PlayerActed {
        seat: SeatId,
        action: PlayerAction,
        /// 本次动作实际投入的筹码
        added: u32,
        /// 动作后该座位在本轮的总下注额
        total_bet_this_round: u32,
        new_stack: u32,
        new_pot: u32,
    },

    /// 摊牌，公布所有未弃牌座位的牌
    Showdown {
        results: Vec<ShowdownResult>,
    },

    PotAwarded {
        seat: SeatId,
        amount: u32,
        /// 未经摊牌赢下的底池为 None
        category: Option<HandCategory>,
    },

    /// 座位筹码输光
    SeatBusted {
        seat: SeatId,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blind {
    Small,
    Big,
}

/// 摊牌时单个座位的结果
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ShowdownResult {
    pub seat: SeatId,
    pub cards: [Card; 2],
    pub category: HandCategory,
}

impl TableEvent {
    /// 从 `viewer` 的视角看到的事件：他人的底牌被隐藏
    pub fn for_viewer(&self, viewer: &SeatId) -> TableEvent {
        match self {
            TableEvent::HoleCardsDealt { seat, .. } if seat != viewer => {
                TableEvent::HoleCardsDealt { seat: *seat, cards: None }
            }
            other => other.clone(),
        }
    }
}

/// 牌桌事件的接收者
pub trait TableObserver {
    fn on_event(&mut self, table: &Table, event: &TableEvent);
}

/// 记录全部事件
impl TableObserver for Vec<TableEvent> {
    fn on_event(&mut self, _table: &Table, event: &TableEvent) {
        self.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};
    use uuid::Uuid;

    #[test]
    fn test_for_viewer_hides_other_hole_cards() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let cards = Some([Card::new(Rank::Ace, Suit::Spade), Card::new(Rank::King, Suit::Heart)]);

        let mine = TableEvent::HoleCardsDealt { seat: me, cards };
        assert_eq!(mine.for_viewer(&me), mine);

        let theirs = TableEvent::HoleCardsDealt { seat: other, cards };
        assert_eq!(theirs.for_viewer(&me), TableEvent::HoleCardsDealt { seat: other, cards: None });
    }

    #[test]
    fn test_event_serializes_as_json() {
        let event = TableEvent::PotAwarded { seat: Uuid::nil(), amount: 90, category: Some(HandCategory::Flush) };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.starts_with("{\"PotAwarded\""));
        assert!(json.contains("\"Flush\""));
    }
}
