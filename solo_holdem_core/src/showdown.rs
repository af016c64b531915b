//! 摊牌与派彩
//!
//! 底池是单一的累计值：赢家拿走全部，没有边池，也不平分。

use crate::card::Card;
use crate::error::GameError;
use crate::evaluator::{HandCategory, HandEvaluator, HandScore};
use crate::event::{ShowdownResult, TableEvent, TableObserver};
use crate::state::{SeatId, Table};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// 一次摊牌的结果
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ShowdownOutcome {
    pub winner: SeatId,
    pub amount: u32,
    /// 其他人都弃牌时为 None
    pub category: Option<HandCategory>,
    /// 参与比牌的座位，按座位顺序
    pub results: Vec<ShowdownResult>,
}

/// 决出赢家并把 `pot` 全部加到赢家筹码上。
///
/// 只剩一个未弃牌座位时直接获胜，不做牌力计算。
/// 否则分数最小者获胜；分数相同时座位索引靠前者获胜。
/// 不修改座位的其他状态，留给下一局开始时清理。
pub fn resolve_showdown<E: HandEvaluator + ?Sized>(
    table: &mut Table,
    board: &[Card],
    pot: u32,
    evaluator: &E,
    observer: &mut dyn TableObserver,
) -> Result<ShowdownOutcome, GameError> {
    let contenders: Vec<usize> = (0..table.len()).filter(|&idx| !table.seats[idx].folded).collect();

    let outcome = match contenders.as_slice() {
        [] => return Err(GameError::NoContenders),
        [only] => ShowdownOutcome {
            winner: table.seats[*only].id,
            amount: pot,
            category: None,
            results: Vec::new(),
        },
        _ => {
            let mut scored: Vec<(usize, HandScore)> = Vec::with_capacity(contenders.len());
            let mut results = Vec::with_capacity(contenders.len());
            for &idx in &contenders {
                let seat = &table.seats[idx];
                let cards: [Card; 2] = seat
                    .hand
                    .as_slice()
                    .try_into()
                    .map_err(|_| GameError::InvalidHandSize(seat.hand.len() + board.len()))?;
                let score = evaluator.evaluate(board, &cards)?;
                scored.push((idx, score));
                results.push(ShowdownResult { seat: seat.id, cards, category: evaluator.classify(score) });
            }

            // min_by_key 在并列时返回第一个
            let (winner_idx, best) = scored
                .iter()
                .copied()
                .min_by_key(|&(_, score)| score)
                .ok_or(GameError::NoContenders)?;

            let tied = scored.iter().filter(|&&(_, score)| score == best).count();
            if tied > 1 {
                warn!(tied, score = best.0, "tied hands, whole pot goes to the first seat in order");
            }

            observer.on_event(table, &TableEvent::Showdown { results: results.clone() });
            ShowdownOutcome {
                winner: table.seats[winner_idx].id,
                amount: pot,
                category: Some(evaluator.classify(best)),
                results,
            }
        }
    };

    let winner_idx = table.index_of(&outcome.winner).ok_or(GameError::NoContenders)?;
    let seat = &mut table.seats[winner_idx];
    seat.stack += pot;
    info!(winner = %seat.name, pot, category = ?outcome.category, "pot awarded");

    observer.on_event(
        table,
        &TableEvent::PotAwarded { seat: outcome.winner, amount: pot, category: outcome.category },
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::StandardEvaluator;
    use crate::state::{Seat, SeatKind};
    use std::cell::Cell;

    fn cards(text: &str) -> Vec<Card> {
        text.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    fn setup_table(hands: &[&str]) -> Table {
        let seats = hands
            .iter()
            .enumerate()
            .map(|(i, hand)| {
                let mut seat = Seat::new(format!("P{i}"), 1000, SeatKind::Automated);
                seat.hand = cards(hand);
                seat
            })
            .collect();
        Table::new(seats)
    }

    /// 记录被调用次数的评估器
    struct CountingEvaluator {
        calls: Cell<usize>,
    }

    impl HandEvaluator for CountingEvaluator {
        fn evaluate(&self, board: &[Card], hole: &[Card]) -> Result<HandScore, GameError> {
            self.calls.set(self.calls.get() + 1);
            StandardEvaluator.evaluate(board, hole)
        }

        fn classify(&self, score: HandScore) -> HandCategory {
            StandardEvaluator.classify(score)
        }
    }

    #[test]
    fn test_pair_of_aces_beats_king_high() {
        let mut table = setup_table(&["As Ah", "Kd Qc"]);
        let board = cards("2d 3h 4s 5c 7d");
        let mut events: Vec<TableEvent> = Vec::new();

        let outcome = resolve_showdown(&mut table, &board, 200, &StandardEvaluator, &mut events).unwrap();

        assert_eq!(outcome.winner, table.seats[0].id);
        assert_eq!(table.seats[0].stack, 1200);
        assert_eq!(table.seats[1].stack, 1000);
        assert_eq!(outcome.results.len(), 2);
        assert!(matches!(events.first(), Some(TableEvent::Showdown { .. })));
        assert!(matches!(events.last(), Some(TableEvent::PotAwarded { amount: 200, .. })));
    }

    #[test]
    fn test_last_seat_standing_wins_without_evaluation() {
        let mut table = setup_table(&["As Ah", "Kd Qc", "9c 8s"]);
        table.seats[0].folded = true;
        table.seats[2].folded = true;
        let evaluator = CountingEvaluator { calls: Cell::new(0) };
        let mut events: Vec<TableEvent> = Vec::new();

        let outcome = resolve_showdown(&mut table, &[], 90, &evaluator, &mut events).unwrap();

        assert_eq!(evaluator.calls.get(), 0);
        assert_eq!(outcome.winner, table.seats[1].id);
        assert_eq!(outcome.category, None);
        assert_eq!(table.seats[1].stack, 1090);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_flush_beats_higher_cards() {
        let mut table = setup_table(&["Ah Kh", "Ad Kd", "Qc Js"]);
        let board = cards("2h 3h 4h 5d 7c");
        let mut events: Vec<TableEvent> = Vec::new();

        let outcome = resolve_showdown(&mut table, &board, 300, &StandardEvaluator, &mut events).unwrap();

        assert_eq!(outcome.winner, table.seats[0].id);
        // 第二个座位是 A-5 顺子，同花更大
        assert_eq!(outcome.category, Some(HandCategory::Flush));
        assert_eq!(table.seats[0].stack, 1300);
    }

    #[test]
    fn test_tie_goes_to_first_seat_in_order() {
        let mut table = setup_table(&["Kh Qd", "Ks Qc"]);
        let board = cards("2h 3d 9s Jc 7d");
        let mut events: Vec<TableEvent> = Vec::new();

        let outcome = resolve_showdown(&mut table, &board, 100, &StandardEvaluator, &mut events).unwrap();

        assert_eq!(outcome.winner, table.seats[0].id);
        assert_eq!(table.seats[0].stack, 1100);
        assert_eq!(table.seats[1].stack, 1000);
    }

    #[test]
    fn test_everyone_folded_is_an_error() {
        let mut table = setup_table(&["As Ah", "Kd Qc"]);
        table.seats.iter_mut().for_each(|s| s.folded = true);
        let mut events: Vec<TableEvent> = Vec::new();
        let result = resolve_showdown(&mut table, &[], 30, &StandardEvaluator, &mut events);
        assert!(matches!(result, Err(GameError::NoContenders)));
    }
}
