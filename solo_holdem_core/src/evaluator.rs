//! 牌力评分
//!
//! 把结构化的 [`HandRank`] 压缩成 1..=7462 的稠密整数分数，数值越小牌越大。
//! 下注策略和摊牌只比较分数，从不直接展示分数。

use crate::card::{Card, HandRank, Rank, find_best_hand};
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// 不同的 5 张牌牌力等价类总数
pub const DISTINCT_HANDS: u16 = 7462;

/// 各牌型分数区间的上界
const MAX_ROYAL_FLUSH: u16 = 1;
const MAX_STRAIGHT_FLUSH: u16 = 10;
const MAX_FOUR_OF_A_KIND: u16 = 166;
const MAX_FULL_HOUSE: u16 = 322;
const MAX_FLUSH: u16 = 1599;
const MAX_STRAIGHT: u16 = 1609;
const MAX_THREE_OF_A_KIND: u16 = 2467;
const MAX_TWO_PAIR: u16 = 3325;
const MAX_PAIR: u16 = 6185;

/// 牌力分数，越小越强
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HandScore(pub u16);

impl HandScore {
    /// 归一化到 0..1，1 表示最强
    pub fn goodness(self) -> f64 {
        f64::from(DISTINCT_HANDS - self.0) / f64::from(DISTINCT_HANDS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    RoyalFlush,
    StraightFlush,
    FourOfAKind,
    FullHouse,
    Flush,
    Straight,
    ThreeOfAKind,
    TwoPair,
    Pair,
    HighCard,
}

impl HandCategory {
    pub fn name(self) -> &'static str {
        match self {
            HandCategory::RoyalFlush => "Royal Flush",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::FullHouse => "Full House",
            HandCategory::Flush => "Flush",
            HandCategory::Straight => "Straight",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::Pair => "Pair",
            HandCategory::HighCard => "High Card",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 牌力评估能力：公共牌 + 底牌 -> 全序分数
pub trait HandEvaluator {
    fn evaluate(&self, board: &[Card], hole: &[Card]) -> Result<HandScore, GameError>;
    fn classify(&self, score: HandScore) -> HandCategory;
}

/// 基于 [`find_best_hand`] 与预计算分数表的评估器
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEvaluator;

impl StandardEvaluator {
    pub fn score_of(&self, rank: &HandRank) -> HandScore {
        // 分数表覆盖了全部合法牌型
        HandScore(score_table().get(rank).copied().unwrap_or(DISTINCT_HANDS))
    }
}

impl HandEvaluator for StandardEvaluator {
    fn evaluate(&self, board: &[Card], hole: &[Card]) -> Result<HandScore, GameError> {
        let mut all_cards = Vec::with_capacity(board.len() + hole.len());
        all_cards.extend_from_slice(board);
        all_cards.extend_from_slice(hole);
        let rank = find_best_hand(&all_cards)?;
        Ok(self.score_of(&rank))
    }

    fn classify(&self, score: HandScore) -> HandCategory {
        match score.0 {
            0..=MAX_ROYAL_FLUSH => HandCategory::RoyalFlush,
            ..=MAX_STRAIGHT_FLUSH => HandCategory::StraightFlush,
            ..=MAX_FOUR_OF_A_KIND => HandCategory::FourOfAKind,
            ..=MAX_FULL_HOUSE => HandCategory::FullHouse,
            ..=MAX_FLUSH => HandCategory::Flush,
            ..=MAX_STRAIGHT => HandCategory::Straight,
            ..=MAX_THREE_OF_A_KIND => HandCategory::ThreeOfAKind,
            ..=MAX_TWO_PAIR => HandCategory::TwoPair,
            ..=MAX_PAIR => HandCategory::Pair,
            _ => HandCategory::HighCard,
        }
    }
}

fn score_table() -> &'static HashMap<HandRank, u16> {
    static TABLE: OnceLock<HashMap<HandRank, u16>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut ranks = all_hand_ranks();
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        ranks.into_iter().zip(1..).collect()
    })
}

/// 枚举所有牌力等价类
fn all_hand_ranks() -> Vec<HandRank> {
    let mut ranks = Vec::with_capacity(usize::from(DISTINCT_HANDS));

    let high_first: Vec<Rank> = Rank::ALL.iter().rev().copied().collect();
    let straight_highs = &high_first[..10]; // A .. 5

    for &high in straight_highs {
        ranks.push(match high {
            Rank::Ace => HandRank::RoyalFlush,
            _ => HandRank::StraightFlush(high),
        });
        ranks.push(HandRank::Straight(high));
    }

    for &a in &high_first {
        for &b in high_first.iter().filter(|&&b| b != a) {
            ranks.push(HandRank::FourOfAKind(a, b));
            ranks.push(HandRank::FullHouse(a, b));
        }
    }

    for combo in descending_combinations(&high_first, 5) {
        let [r0, r1, r2, r3, r4] = [combo[0], combo[1], combo[2], combo[3], combo[4]];
        let is_straight = r0 as u8 - r4 as u8 == 4
            || combo == [Rank::Ace, Rank::Five, Rank::Four, Rank::Three, Rank::Two];
        if !is_straight {
            ranks.push(HandRank::Flush(r0, r1, r2, r3, r4));
            ranks.push(HandRank::HighCard(r0, r1, r2, r3, r4));
        }
    }

    for &paired in &high_first {
        let kickers: Vec<Rank> = high_first.iter().copied().filter(|&r| r != paired).collect();
        for k in descending_combinations(&kickers, 2) {
            ranks.push(HandRank::ThreeOfAKind(paired, k[0], k[1]));
        }
        for k in descending_combinations(&kickers, 3) {
            ranks.push(HandRank::OnePair(paired, k[0], k[1], k[2]));
        }
    }

    for pair in descending_combinations(&high_first, 2) {
        for &kicker in high_first.iter().filter(|&&r| !pair.contains(&r)) {
            ranks.push(HandRank::TwoPair(pair[0], pair[1], kicker));
        }
    }

    ranks
}

/// `items` 已从大到小排列，返回的每个组合保持这个顺序
fn descending_combinations(items: &[Rank], k: usize) -> Vec<Vec<Rank>> {
    if k == 0 {
        return vec![vec![]];
    }
    let mut result = Vec::new();
    for (i, &first) in items.iter().enumerate() {
        for mut rest in descending_combinations(&items[i + 1..], k - 1) {
            rest.insert(0, first);
            result.push(rest);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(text: &str) -> Vec<Card> {
        text.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    #[test]
    fn test_table_covers_every_distinct_hand() {
        assert_eq!(score_table().len(), usize::from(DISTINCT_HANDS));
        assert_eq!(StandardEvaluator.score_of(&HandRank::RoyalFlush), HandScore(1));
        let worst = HandRank::HighCard(Rank::Seven, Rank::Five, Rank::Four, Rank::Three, Rank::Two);
        assert_eq!(StandardEvaluator.score_of(&worst), HandScore(DISTINCT_HANDS));
    }

    #[test]
    fn test_category_ranges_match_table() {
        let evaluator = StandardEvaluator;
        for (rank, &score) in score_table() {
            let expected = match rank {
                HandRank::RoyalFlush => HandCategory::RoyalFlush,
                HandRank::StraightFlush(_) => HandCategory::StraightFlush,
                HandRank::FourOfAKind(..) => HandCategory::FourOfAKind,
                HandRank::FullHouse(..) => HandCategory::FullHouse,
                HandRank::Flush(..) => HandCategory::Flush,
                HandRank::Straight(_) => HandCategory::Straight,
                HandRank::ThreeOfAKind(..) => HandCategory::ThreeOfAKind,
                HandRank::TwoPair(..) => HandCategory::TwoPair,
                HandRank::OnePair(..) => HandCategory::Pair,
                HandRank::HighCard(..) => HandCategory::HighCard,
            };
            assert_eq!(evaluator.classify(HandScore(score)), expected, "{rank:?} scored {score}");
        }
    }

    #[test]
    fn test_lower_score_is_stronger() {
        let evaluator = StandardEvaluator;
        let board = cards("2d 3h 4s 5c 7d");
        let aces = evaluator.evaluate(&board, &cards("As Ah")).unwrap();
        let king_high = evaluator.evaluate(&board, &cards("Kd Qc")).unwrap();
        // A 与 2-3-4-5 组成最小顺子
        assert!(aces < king_high);
        assert_eq!(evaluator.classify(aces), HandCategory::Straight);
        assert_eq!(evaluator.classify(king_high), HandCategory::HighCard);
    }

    #[test]
    fn test_flush_outranks_high_cards() {
        let evaluator = StandardEvaluator;
        let board = cards("2h 3h 4h 5d 7c");
        let flush = evaluator.evaluate(&board, &cards("Ah Kh")).unwrap();
        let suited_diamonds = evaluator.evaluate(&board, &cards("Ad Kd")).unwrap();
        assert_eq!(evaluator.classify(flush), HandCategory::Flush);
        assert!(flush < suited_diamonds);
    }

    #[test]
    fn test_goodness_bounds() {
        assert_eq!(HandScore(DISTINCT_HANDS).goodness(), 0.0);
        assert!(HandScore(1).goodness() > 0.99);
    }

    #[test]
    fn test_evaluate_rejects_short_board() {
        let result = StandardEvaluator.evaluate(&cards("2h"), &cards("Ah Kh"));
        assert!(matches!(result, Err(GameError::InvalidHandSize(3))));
    }
}
