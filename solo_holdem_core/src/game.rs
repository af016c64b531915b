//! 一局牌的流程编排：开局清理、盲注、发牌、四条街下注、摊牌，最后移动庄家按钮。

use crate::betting::BettingRound;
use crate::card::{Card, CardSource, Deck};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::evaluator::{HandCategory, StandardEvaluator};
use crate::event::{ShowdownResult, TableEvent, TableObserver};
use crate::player::Decider;
use crate::policy::AiPolicy;
use crate::showdown::resolve_showdown;
use crate::state::{Seat, SeatId, SeatKind, Street, Table};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const HUMAN_NAME: &str = "You";

/// 一局结束后的摘要
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HandSummary {
    pub hand_number: u32,
    pub dealer: SeatId,
    pub pot: u32,
    pub winner: SeatId,
    pub category: Option<HandCategory>,
    pub results: Vec<ShowdownResult>,
}

pub struct Game {
    table: Table,
    players: Vec<Box<dyn Decider>>, // 与 table.seats 一一对应
    deck: Box<dyn CardSource>,
    board: Vec<Card>,
    betting: BettingRound,
    evaluator: StandardEvaluator,
    hands_played: u32,
}

impl Game {
    /// 一个人类座位 (索引 0) 加 `config.ai_players` 个电脑座位
    pub fn new(config: &GameConfig, human: Box<dyn Decider>) -> Result<Self, GameError> {
        config.validate()?;

        let mut seats = Vec::with_capacity(config.seat_count());
        let mut players: Vec<Box<dyn Decider>> = Vec::with_capacity(config.seat_count());
        seats.push(Seat::new(HUMAN_NAME, config.starting_stack, SeatKind::Human));
        players.push(human);

        for i in 1..=config.ai_players {
            seats.push(Seat::new(format!("AI Player {i}"), config.starting_stack, SeatKind::Automated));
            let policy = match config.seed {
                Some(seed) => AiPolicy::seeded(seed.wrapping_add(i as u64)),
                None => AiPolicy::new(),
            };
            players.push(Box::new(policy));
        }

        let deck: Box<dyn CardSource> = match config.seed {
            Some(seed) => Box::new(Deck::seeded(seed)),
            None => Box::new(Deck::new()),
        };

        Self::with_parts(Table::new(seats), players, deck, config.small_blind, config.big_blind)
    }

    /// 用现成的牌桌、决策者和牌堆组装，`players[i]` 为 `table.seats[i]` 做决策
    pub fn with_parts(
        table: Table,
        players: Vec<Box<dyn Decider>>,
        deck: Box<dyn CardSource>,
        small_blind: u32,
        big_blind: u32,
    ) -> Result<Self, GameError> {
        if players.len() != table.len() {
            return Err(GameError::InvalidConfig(format!(
                "{} deciders for {} seats",
                players.len(),
                table.len()
            )));
        }
        Ok(Game {
            table,
            players,
            deck,
            board: Vec::with_capacity(5),
            betting: BettingRound::new(small_blind, big_blind),
            evaluator: StandardEvaluator,
            hands_played: 0,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn board(&self) -> &[Card] {
        &self.board
    }

    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }

    /// 还有筹码的座位数
    pub fn seats_with_chips(&self) -> usize {
        self.table.seats.iter().filter(|s| s.stack > 0).count()
    }

    /// 完整地打一局，结束后庄家按钮移到下一个座位
    pub fn play_hand(&mut self, observer: &mut dyn TableObserver) -> Result<HandSummary, GameError> {
        self.start_hand()?;
        let chips_before = self.table.total_chips();
        let dealer = self.table.seats[self.table.dealer].id;
        self.hands_played += 1;
        info!(hand = self.hands_played, dealer = %self.table.seats[self.table.dealer].name, "hand started");
        observer.on_event(&self.table, &TableEvent::HandStarted { hand_number: self.hands_played, dealer });

        self.betting.post_blinds(&mut self.table, observer);
        self.deal_hole_cards(observer)?;

        let mut betting_open = true;
        for street in Street::ALL {
            if self.table.unfolded_count() <= 1 {
                break;
            }
            for _ in 0..street.cards_to_deal() {
                self.board.push(self.deck.draw()?);
            }
            observer.on_event(
                &self.table,
                &TableEvent::StreetStarted { street, board: self.board.clone(), pot: self.betting.pot },
            );

            // 下注停止后若仍有两人以上未弃牌，直接发完公共牌
            if betting_open {
                let offset = if street == Street::PreFlop { 3 } else { 1 };
                let start_from = self.table.offset(self.table.dealer, offset);
                betting_open = self.betting.handle_betting_round(
                    street,
                    start_from,
                    &self.board,
                    &mut self.table,
                    &mut self.players,
                    observer,
                )?;
            }
        }

        let pot = self.betting.pot;
        let outcome = resolve_showdown(&mut self.table, &self.board, pot, &self.evaluator, observer)?;
        self.betting.reset();

        for idx in 0..self.table.len() {
            let seat = &self.table.seats[idx];
            if seat.stack == 0 && !seat.hand.is_empty() {
                info!(seat = %seat.name, "seat busted");
                observer.on_event(&self.table, &TableEvent::SeatBusted { seat: seat.id });
            }
        }

        let chips_after = self.table.total_chips();
        if chips_after != chips_before {
            warn!(chips_before, chips_after, "chip total changed during hand");
        }

        self.table.advance_dealer();
        Ok(HandSummary {
            hand_number: self.hands_played,
            dealer,
            pot,
            winner: outcome.winner,
            category: outcome.category,
            results: outcome.results,
        })
    }

    /// 重置牌堆、公共牌和座位状态。没有筹码的座位本局不参与。
    fn start_hand(&mut self) -> Result<(), GameError> {
        self.deck.reset();
        self.deck.shuffle();
        self.board.clear();
        self.betting.reset();

        for seat in self.table.seats.iter_mut() {
            seat.clear_hand();
            if seat.stack == 0 {
                seat.folded = true;
            }
        }

        if self.seats_with_chips() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }
        Ok(())
    }

    /// 从小盲位开始每人一张，发两轮
    fn deal_hole_cards(&mut self, observer: &mut dyn TableObserver) -> Result<(), GameError> {
        let n = self.table.len();
        for _ in 0..2 {
            for i in 1..=n {
                let idx = self.table.offset(self.table.dealer, i);
                if self.table.seats[idx].folded {
                    continue;
                }
                let card = self.deck.draw()?;
                self.table.seats[idx].hand.push(card);
            }
        }

        for i in 1..=n {
            let seat = &self.table.seats[self.table.offset(self.table.dealer, i)];
            if let [a, b] = seat.hand[..] {
                observer.on_event(&self.table, &TableEvent::HoleCardsDealt { seat: seat.id, cards: Some([a, b]) });
            }
        }
        Ok(())
    }
}
