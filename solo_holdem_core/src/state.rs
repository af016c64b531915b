use crate::card::Card;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

pub type SeatId = Uuid;

/// 座位由谁控制
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SeatKind {
    Human,
    Automated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub name: String,
    pub stack: u32,          // 剩余筹码
    pub hand: Vec<Card>,     // 底牌，一局中为 0 或 2 张
    pub folded: bool,
    pub current_bet: u32,    // 本轮 (当前街) 已投入的筹码，每轮开始时清零
    pub kind: SeatKind,
}

impl Seat {
    pub fn new(name: impl Into<String>, stack: u32, kind: SeatKind) -> Self {
        Seat {
            id: Uuid::new_v4(),
            name: name.into(),
            stack,
            hand: Vec::with_capacity(2),
            folded: false,
            current_bet: 0,
            kind,
        }
    }

    /// 还能在本街行动：未弃牌且有筹码
    pub fn is_live(&self) -> bool {
        !self.folded && self.stack > 0
    }

    pub fn is_all_in(&self) -> bool {
        !self.folded && self.stack == 0
    }

    /// 从筹码中投入最多 `amount`，不足时全下。返回实际投入的数量。
    pub fn commit(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.current_bet += paid;
        paid
    }

    /// 清空本局相关的字段
    pub fn clear_hand(&mut self) {
        self.hand.clear();
        self.folded = false;
        self.current_bet = 0;
    }
}

/// 下注轮 (街)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub const ALL: [Street; 4] = [Street::PreFlop, Street::Flop, Street::Turn, Street::River];

    /// 进入这条街之前需要翻开的公共牌数量
    pub fn cards_to_deal(self) -> usize {
        match self {
            Street::PreFlop => 0,
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Street::PreFlop => "pre-flop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        })
    }
}

/// 玩家动作
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerAction {
    Fold,
    /// 跟注；无需跟注时即过牌
    Call,
    /// 加注，金额为加注后本轮的总下注额
    Raise(u32),
}

/// 轮到某个座位决策时它能看到的信息
#[derive(Debug, Clone)]
pub struct DecisionContext<'a> {
    pub street: Street,
    pub amount_to_call: u32,
    pub pot: u32,
    pub board: &'a [Card],
    pub current_bet: u32,      // 全桌当前最高下注
    pub seat_current_bet: u32, // 该座位本轮已下注
    pub available_chips: u32,
    pub min_raise: u32,        // 最小加注到的总额
}

/// 固定座位数的牌桌，轮转按座位索引取模
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub seats: Vec<Seat>,
    pub dealer: usize, // 庄家按钮所在的座位索引
    #[serde(skip)]
    indices: HashMap<SeatId, usize>,
}

impl Table {
    pub fn new(seats: Vec<Seat>) -> Self {
        let indices = seats.iter().enumerate().map(|(i, s)| (s.id, i)).collect();
        Table { seats, dealer: 0, indices }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// 从 `from` 开始偏移 `offset` 个座位的索引
    pub fn offset(&self, from: usize, offset: usize) -> usize {
        (from + offset) % self.seats.len()
    }

    pub fn index_of(&self, id: &SeatId) -> Option<usize> {
        self.indices.get(id).copied()
    }

    pub fn seat_by_id(&self, id: &SeatId) -> Option<&Seat> {
        self.index_of(id).map(|idx| &self.seats[idx])
    }

    /// 未弃牌且有筹码的座位数
    pub fn live_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_live()).count()
    }

    /// 未弃牌 (含全下) 的座位数
    pub fn unfolded_count(&self) -> usize {
        self.seats.iter().filter(|s| !s.folded).count()
    }

    pub fn total_chips(&self) -> u32 {
        self.seats.iter().map(|s| s.stack).sum()
    }

    pub fn advance_dealer(&mut self) {
        self.dealer = self.offset(self.dealer, 1);
    }
}
