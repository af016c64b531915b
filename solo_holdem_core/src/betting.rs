//! 下注轮状态机
//!
//! 一次 [`BettingRound::handle_betting_round`] 调用驱动一条街的下注直到收敛：
//! 所有仍有筹码的未弃牌座位都跟平了全桌最高下注，或者只剩一个未弃牌座位。
//! 底池是单一的累计值，没有边池。

use crate::card::Card;
use crate::error::GameError;
use crate::event::{Blind, TableEvent, TableObserver};
use crate::player::Decider;
use crate::state::{DecisionContext, PlayerAction, Street, Table};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct BettingRound {
    pub small_blind: u32,
    pub big_blind: u32,
    pub pot: u32,         // 本局累计底池，包含各条街的全部下注
    pub current_bet: u32, // 本轮全桌最高下注，所有座位都要跟到这个数
}

impl BettingRound {
    pub fn new(small_blind: u32, big_blind: u32) -> Self {
        BettingRound { small_blind, big_blind, pot: 0, current_bet: 0 }
    }

    /// 新的一局开始时清空底池
    pub fn reset(&mut self) {
        self.pot = 0;
        self.current_bet = 0;
    }

    /// 最小加注到的总额
    pub fn min_raise(&self) -> u32 {
        self.current_bet + self.big_blind
    }

    /// 庄家下家下小盲，再下家下大盲，金额不超过各自的筹码
    pub fn post_blinds(&mut self, table: &mut Table, observer: &mut dyn TableObserver) {
        let sb_idx = table.offset(table.dealer, 1);
        let bb_idx = table.offset(table.dealer, 2);

        let sb_bet = self.post_blind(table, sb_idx, Blind::Small, observer);
        let bb_bet = self.post_blind(table, bb_idx, Blind::Big, observer);

        self.current_bet = sb_bet.max(bb_bet);
    }

    fn post_blind(&mut self, table: &mut Table, idx: usize, blind: Blind, observer: &mut dyn TableObserver) -> u32 {
        let amount = match blind {
            Blind::Small => self.small_blind,
            Blind::Big => self.big_blind,
        };
        let seat = &mut table.seats[idx];
        let paid = seat.commit(amount);
        self.pot += paid;
        let (id, bet) = (seat.id, seat.current_bet);
        if paid == 0 {
            // 没有筹码的座位本局不参与，不算下盲注
            debug!(seat = %seat.name, ?blind, "blind seat is sitting out");
            return bet;
        }
        info!(seat = %seat.name, ?blind, paid, "posted blind");

        observer.on_event(table, &TableEvent::BlindPosted { seat: id, blind, amount: paid });
        bet
    }

    /// 驱动一条街的下注直到结束。
    ///
    /// 从 `start_from` 开始按座位索引递增 (取模) 依次行动，弃牌或无筹码的座位直接跳过。
    /// 除翻牌前以外，开始时清零全桌与各座位的本轮下注；之前各轮的下注已经计入 `pot`。
    ///
    /// 收敛条件：控制权回到最近一次加注的座位 (没有人加注时回到 `start_from`)，
    /// 并且所有仍有筹码的未弃牌座位本轮下注都等于 `current_bet`。
    ///
    /// 返回值表示下一条街是否还需要下注：有筹码的未弃牌座位不超过 1 个时为 `false`。
    pub fn handle_betting_round(
        &mut self,
        street: Street,
        start_from: usize,
        board: &[Card],
        table: &mut Table,
        players: &mut [Box<dyn Decider>],
        observer: &mut dyn TableObserver,
    ) -> Result<bool, GameError> {
        if players.len() != table.len() {
            return Err(GameError::InvalidConfig(format!(
                "{} deciders for {} seats",
                players.len(),
                table.len()
            )));
        }

        if table.live_count() <= 1 {
            debug!(%street, "fewer than two live seats, no further betting");
            return Ok(false);
        }

        if street != Street::PreFlop {
            self.current_bet = 0;
            table.seats.iter_mut().for_each(|seat| seat.current_bet = 0);
        }

        let start_from = start_from % table.len();
        let mut pos = start_from;
        let mut last_raiser: Option<usize> = None;
        let mut acted = 0usize;

        loop {
            // 收敛判断在到达每个座位时进行，包括会被跳过的座位
            if acted > 0 && pos == last_raiser.unwrap_or(start_from) && self.all_matched(table) {
                debug!(%street, acted, "betting round converged");
                break;
            }

            if !table.seats[pos].is_live() {
                pos = table.offset(pos, 1);
                continue;
            }

            if self.act(street, pos, board, table, players, observer)? {
                last_raiser = Some(pos);
            }
            acted += 1;

            if table.unfolded_count() <= 1 {
                debug!(%street, "everyone else folded");
                break;
            }
            pos = table.offset(pos, 1);
        }

        info!(%street, pot = self.pot, current_bet = self.current_bet, "betting round finished");
        Ok(table.live_count() > 1)
    }

    /// 所有仍有筹码的未弃牌座位都已跟平
    fn all_matched(&self, table: &Table) -> bool {
        table
            .seats
            .iter()
            .filter(|seat| seat.is_live())
            .all(|seat| seat.current_bet == self.current_bet)
    }

    /// 让 `idx` 座位行动一次，返回是否抬高了全桌最高下注
    fn act(
        &mut self,
        street: Street,
        idx: usize,
        board: &[Card],
        table: &mut Table,
        players: &mut [Box<dyn Decider>],
        observer: &mut dyn TableObserver,
    ) -> Result<bool, GameError> {
        observer.on_event(table, &TableEvent::TurnStarted { seat: table.seats[idx].id });

        let seat = &table.seats[idx];
        let ctx = DecisionContext {
            street,
            amount_to_call: self.current_bet.saturating_sub(seat.current_bet),
            pot: self.pot,
            board,
            current_bet: self.current_bet,
            seat_current_bet: seat.current_bet,
            available_chips: seat.stack,
            min_raise: self.min_raise(),
        };
        let action = players[idx].decide(seat, &ctx)?;

        let previous_bet = self.current_bet;
        let min_raise = self.min_raise();
        let seat = &mut table.seats[idx];
        let added = match action {
            PlayerAction::Fold => {
                seat.folded = true;
                0
            }
            PlayerAction::Call => seat.commit(previous_bet.saturating_sub(seat.current_bet)),
            PlayerAction::Raise(to) => {
                // 低于最小加注额的加注按最小加注处理，筹码不足时全下
                let target = to.max(min_raise);
                seat.commit(target.saturating_sub(seat.current_bet))
            }
        };
        self.pot += added;
        self.current_bet = self.current_bet.max(seat.current_bet);

        debug!(
            seat = %seat.name,
            ?action,
            added,
            seat_bet = seat.current_bet,
            stack = seat.stack,
            pot = self.pot,
            "seat acted"
        );
        let event = TableEvent::PlayerActed {
            seat: seat.id,
            action,
            added,
            total_bet_this_round: seat.current_bet,
            new_stack: seat.stack,
            new_pot: self.pot,
        };
        observer.on_event(table, &event);

        Ok(self.current_bet > previous_bet)
    }
}

// --- 单元测试 ---
