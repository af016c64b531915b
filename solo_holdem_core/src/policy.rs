//! 电脑玩家的决策策略
//!
//! 先把牌力折算成 0..1 的 "好坏" 值，再按分档阈值决定弃牌、跟注或加注。
//! 加注额以 "跟注额 × 倍数" 表示并限制在自身筹码内，最小加注额由下注引擎补足。

use crate::card::Card;
use crate::error::GameError;
use crate::evaluator::{HandEvaluator, HandScore, StandardEvaluator};
use crate::player::{Decider, expect_kind};
use crate::state::{DecisionContext, PlayerAction, Seat, SeatKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// 跟注额超过筹码的这个比例时降低信心
const CAUTION_SHARE: u32 = 3;
const CAUTION_DISCOUNT: f64 = 0.7;
/// 弱牌在跟注额超过筹码的 1/5 时弃牌
const WEAK_FOLD_SHARE: u32 = 5;

const VERY_STRONG: f64 = 0.8;
const STRONG: f64 = 0.6;
const MEDIUM: f64 = 0.4;

const VERY_STRONG_RAISE_ODDS: f64 = 0.7;
const STRONG_RAISE_ODDS: f64 = 0.4;
const BLUFF_ODDS: f64 = 0.2;

pub struct AiPolicy<R = StdRng, E = StandardEvaluator> {
    rng: R,
    evaluator: E,
}

impl AiPolicy<StdRng, StandardEvaluator> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for AiPolicy<StdRng, StandardEvaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> AiPolicy<R, StandardEvaluator> {
    pub fn with_rng(rng: R) -> Self {
        AiPolicy { rng, evaluator: StandardEvaluator }
    }
}

impl<R: Rng, E: HandEvaluator> AiPolicy<R, E> {
    pub fn with_evaluator(rng: R, evaluator: E) -> Self {
        AiPolicy { rng, evaluator }
    }

    /// 当前牌力分数。没有公共牌时按底牌组成粗略估计。
    pub fn hand_strength(&self, hole: &[Card], board: &[Card]) -> Result<HandScore, GameError> {
        if board.is_empty() {
            return Ok(preflop_strength(hole));
        }
        self.evaluator.evaluate(board, hole)
    }
}

impl<R: Rng, E: HandEvaluator> Decider for AiPolicy<R, E> {
    fn decide(&mut self, seat: &Seat, ctx: &DecisionContext<'_>) -> Result<PlayerAction, GameError> {
        expect_kind(seat, SeatKind::Automated)?;

        let score = self.hand_strength(&seat.hand, ctx.board)?;
        let roll: f64 = self.rng.random();
        let action = choose_action(score.goodness(), ctx.amount_to_call, seat.stack, roll);
        debug!(seat = %seat.name, score = score.0, to_call = ctx.amount_to_call, ?action, "ai decided");
        Ok(action)
    }
}

/// 翻牌前的粗略牌力：口袋对子 > 两张大牌 > 一张大牌 > 其它
fn preflop_strength(hole: &[Card]) -> HandScore {
    match hole {
        [a, b] if a.rank == b.rank => HandScore(2000),
        [a, b] if a.rank.is_face_or_ace() && b.rank.is_face_or_ace() => HandScore(3000),
        [a, b] if a.rank.is_face_or_ace() || b.rank.is_face_or_ace() => HandScore(4000),
        _ => HandScore(5000),
    }
}

/// 分档决策。`roll` 为 0..1 的随机数，`stack` 为决策前的筹码。
pub fn choose_action(goodness: f64, to_call: u32, stack: u32, roll: f64) -> PlayerAction {
    let raise = |multiplier: u32| PlayerAction::Raise(to_call.saturating_mul(multiplier).min(stack));

    let goodness = if to_call > stack / CAUTION_SHARE {
        goodness * CAUTION_DISCOUNT
    } else {
        goodness
    };

    if goodness > VERY_STRONG {
        if roll < VERY_STRONG_RAISE_ODDS { raise(3) } else { PlayerAction::Call }
    } else if goodness > STRONG {
        if roll < STRONG_RAISE_ODDS { raise(2) } else { PlayerAction::Call }
    } else if goodness > MEDIUM {
        if to_call > stack / CAUTION_SHARE { PlayerAction::Fold } else { PlayerAction::Call }
    } else if to_call > stack / WEAK_FOLD_SHARE {
        PlayerAction::Fold
    } else if roll < BLUFF_ODDS {
        raise(2)
    } else {
        PlayerAction::Call
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Street;

    fn cards(text: &str) -> Vec<Card> {
        text.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    fn context(board: &[Card], amount_to_call: u32) -> DecisionContext<'_> {
        DecisionContext {
            street: if board.is_empty() { Street::PreFlop } else { Street::Flop },
            amount_to_call,
            pot: 100,
            board,
            current_bet: amount_to_call,
            seat_current_bet: 0,
            available_chips: 1000,
            min_raise: amount_to_call + 20,
        }
    }

    #[test]
    fn test_very_strong_hand_raises_three_times_call() {
        assert_eq!(choose_action(0.95, 40, 1000, 0.1), PlayerAction::Raise(120));
        assert_eq!(choose_action(0.95, 40, 1000, 0.9), PlayerAction::Call);
    }

    #[test]
    fn test_raise_is_capped_to_stack() {
        assert_eq!(choose_action(0.95, 200, 1000, 0.1), PlayerAction::Raise(600));
        // 跟注额超过筹码的 1/3 时信心打折：0.95 * 0.7 = 0.665，落入强牌档
        assert_eq!(choose_action(0.95, 400, 1000, 0.1), PlayerAction::Raise(800));
        assert_eq!(choose_action(0.95, 450, 500, 0.1), PlayerAction::Raise(500));
    }

    #[test]
    fn test_medium_hand_folds_to_large_bet() {
        assert_eq!(choose_action(0.5, 100, 1000, 0.0), PlayerAction::Call);
        // 打折后 0.63 * 0.7 < 0.6 仍为中档，但跟注太大而弃牌
        assert_eq!(choose_action(0.63, 400, 1000, 0.0), PlayerAction::Fold);
    }

    #[test]
    fn test_weak_hand_folds_bluffs_or_calls() {
        assert_eq!(choose_action(0.2, 250, 1000, 0.0), PlayerAction::Fold);
        assert_eq!(choose_action(0.2, 50, 1000, 0.1), PlayerAction::Raise(100));
        assert_eq!(choose_action(0.2, 50, 1000, 0.5), PlayerAction::Call);
        assert_eq!(choose_action(0.2, 0, 1000, 0.5), PlayerAction::Call);
    }

    #[test]
    fn test_preflop_heuristic() {
        assert_eq!(preflop_strength(&cards("9s 9h")), HandScore(2000));
        assert_eq!(preflop_strength(&cards("Ks Qh")), HandScore(3000));
        assert_eq!(preflop_strength(&cards("As 7h")), HandScore(4000));
        assert_eq!(preflop_strength(&cards("8s 3h")), HandScore(5000));
        assert_eq!(preflop_strength(&[]), HandScore(5000));
    }

    #[test]
    fn test_uses_evaluator_once_board_is_visible() {
        let policy = AiPolicy::seeded(1);
        let board = cards("Ah Kh Qh 2c 3d");
        let score = policy.hand_strength(&cards("Jh Th"), &board).unwrap();
        assert_eq!(score, HandScore(1));
    }

    #[test]
    fn test_decide_rejects_human_seat() {
        let mut policy = AiPolicy::seeded(1);
        let seat = Seat::new("You", 1000, SeatKind::Human);
        let result = policy.decide(&seat, &context(&[], 20));
        assert!(matches!(result, Err(GameError::InvalidSeatKind { expected: SeatKind::Automated, .. })));
    }

    #[test]
    fn test_decide_is_reproducible_with_seed() {
        let mut seat = Seat::new("AI Player 1", 1000, SeatKind::Automated);
        seat.hand = cards("As Ah");
        let board = cards("Ad 7c 2s");

        let first: Vec<_> = {
            let mut policy = AiPolicy::seeded(42);
            (0..10).map(|_| policy.decide(&seat, &context(&board, 20)).unwrap()).collect()
        };
        let second: Vec<_> = {
            let mut policy = AiPolicy::seeded(42);
            (0..10).map(|_| policy.decide(&seat, &context(&board, 20)).unwrap()).collect()
        };
        assert_eq!(first, second);
        // 三条 A 永远不会弃牌
        assert!(first.iter().all(|a| *a != PlayerAction::Fold));
    }
}
