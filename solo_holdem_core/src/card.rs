use crate::error::GameError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- 核心数据结构定义 ---

/// 花色 (Suit)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    Spade,   // 黑桃
    Heart,   // 红心
    Diamond, // 方块
    Club,    // 梅花
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];
}

/// 点数 (Rank)
/// Ord 的派生让 Ace 默认是最大的，A-2-3-4-5 顺子在评估时单独处理
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// 从小到大排列的全部点数
    pub const ALL: [Rank; 13] = [
        Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven, Rank::Eight,
        Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace,
    ];

    /// J、Q、K、A 视为大牌
    pub fn is_face_or_ace(self) -> bool {
        self >= Rank::Jack
    }
}

/// 单张扑克牌 (Card)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }
}

/// 牌型等级 (HandRank)
/// 1. 变体按从小到大排列，可以直接利用 `Ord` 比较。
/// 2. 变体内部存储比较所需的全部点数 (对子大小、踢脚牌等)，均按从大到小存放。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
pub enum HandRank {
    HighCard(Rank, Rank, Rank, Rank, Rank),
    OnePair(Rank, Rank, Rank, Rank),
    TwoPair(Rank, Rank, Rank),
    ThreeOfAKind(Rank, Rank, Rank),
    Straight(Rank),                      // 最高牌的点数
    Flush(Rank, Rank, Rank, Rank, Rank),
    FullHouse(Rank, Rank),               // (三条的点数, 对子的点数)
    FourOfAKind(Rank, Rank),             // (四条的点数, 踢脚牌)
    StraightFlush(Rank),
    RoyalFlush,
}

// --- 显示与解析 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Suit::Spade => "♠",
            Suit::Heart => "♥",
            Suit::Diamond => "♦",
            Suit::Club => "♣",
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HandRank::HighCard(r1, ..) => write!(f, "High Card ({r1})"),
            HandRank::OnePair(r1, ..) => write!(f, "Pair of {r1}"),
            HandRank::TwoPair(r1, r2, ..) => write!(f, "Two Pair ({r1}, {r2})"),
            HandRank::ThreeOfAKind(r1, ..) => write!(f, "Three of a Kind ({r1})"),
            HandRank::Straight(r1) => write!(f, "Straight ({r1} high)"),
            HandRank::Flush(r1, ..) => write!(f, "Flush ({r1} high)"),
            HandRank::FullHouse(r1, r2) => write!(f, "Full House ({r1} over {r2})"),
            HandRank::FourOfAKind(r1, _) => write!(f, "Four of a Kind ({r1})"),
            HandRank::StraightFlush(r1) => write!(f, "Straight Flush ({r1} high)"),
            HandRank::RoyalFlush => f.write_str("Royal Flush"),
        }
    }
}

/// 解析简写形式的牌，如 `As`、`Td`、`10h`、`7♣`
impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().trim_end_matches('\u{fe0f}');
        let invalid = || GameError::InvalidCard(s.to_string());

        let suit_char = text.chars().last().ok_or_else(invalid)?;
        let suit = match suit_char.to_ascii_lowercase() {
            's' | '♠' => Suit::Spade,
            'h' | '♥' => Suit::Heart,
            'd' | '♦' => Suit::Diamond,
            'c' | '♣' => Suit::Club,
            _ => return Err(invalid()),
        };
        let rank = match text[..text.len() - suit_char.len_utf8()].to_ascii_uppercase().as_str() {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return Err(invalid()),
        };
        Ok(Card { rank, suit })
    }
}

// --- 牌堆 ---

/// 发牌来源。`draw` 从牌堆顶取一张牌，牌堆为空时返回 [`GameError::DeckExhausted`]。
pub trait CardSource {
    /// 恢复完整的一副牌
    fn reset(&mut self);
    fn shuffle(&mut self);
    fn draw(&mut self) -> Result<Card, GameError>;
    fn remaining(&self) -> usize;
}

/// 按花色、点数顺序排列的 52 张牌
pub fn ordered_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card { rank, suit }))
        .collect()
}

/// 标准 52 张牌堆，使用可设定种子的随机数生成器洗牌
pub struct Deck<R = StdRng> {
    cards: Vec<Card>,
    rng: R,
}

impl Deck<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// 固定种子，便于复现牌局
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Deck<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Deck<R> {
    pub fn with_rng(rng: R) -> Self {
        Deck { cards: ordered_deck(), rng }
    }
}

impl<R: Rng> CardSource for Deck<R> {
    fn reset(&mut self) {
        self.cards = ordered_deck();
    }

    fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }

    fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::DeckExhausted)
    }

    fn remaining(&self) -> usize {
        self.cards.len()
    }
}

/// 预设发牌顺序的牌堆，用于复盘与测试。
/// `reset` 恢复预设顺序，`shuffle` 不改变顺序。
#[derive(Debug, Clone)]
pub struct StackedDeck {
    order: Vec<Card>,
    cards: Vec<Card>,
}

impl StackedDeck {
    /// `order[0]` 是第一张被发出的牌
    pub fn new(order: Vec<Card>) -> Self {
        let mut cards = order.clone();
        cards.reverse();
        StackedDeck { order, cards }
    }
}

impl CardSource for StackedDeck {
    fn reset(&mut self) {
        self.cards = self.order.iter().rev().copied().collect();
    }

    fn shuffle(&mut self) {}

    fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::DeckExhausted)
    }

    fn remaining(&self) -> usize {
        self.cards.len()
    }
}

// --- 牌型评估逻辑 ---

/// 从 5 到 7 张牌中找出最优的 5 张牌组合牌力。
/// 枚举所有 5 张牌的组合，贪心地丢弃小牌可能会破坏顺子或同花。
pub fn find_best_hand(all_cards: &[Card]) -> Result<HandRank, GameError> {
    let n = all_cards.len();
    if !(5..=7).contains(&n) {
        return Err(GameError::InvalidHandSize(n));
    }

    let mut five = [all_cards[0]; 5];
    (0u32..1 << n)
        .filter(|mask| mask.count_ones() == 5)
        .map(|mask| {
            let picked = all_cards.iter().enumerate().filter(|(i, _)| mask & (1 << i) != 0);
            for (slot, (_, card)) in five.iter_mut().zip(picked) {
                *slot = *card;
            }
            evaluate_five(&five)
        })
        .max()
        .ok_or(GameError::InvalidHandSize(n))
}

/// 评估恰好 5 张牌的牌型
fn evaluate_five(hand: &[Card; 5]) -> HandRank {
    let mut ranks = hand.map(|c| c.rank);
    ranks.sort_unstable_by(|a, b| b.cmp(a));

    let is_flush = hand.iter().all(|c| c.suit == hand[0].suit);
    let straight = straight_high(&ranks);

    match (straight, is_flush) {
        (Some(Rank::Ace), true) => return HandRank::RoyalFlush,
        (Some(high), true) => return HandRank::StraightFlush(high),
        _ => {}
    }

    // (出现次数, 点数)，先按次数再按点数从大到小
    let mut groups: Vec<(u8, Rank)> = Vec::with_capacity(5);
    for &rank in &ranks {
        match groups.iter_mut().find(|(_, r)| *r == rank) {
            Some((count, _)) => *count += 1,
            None => groups.push((1, rank)),
        }
    }
    groups.sort_unstable_by(|a, b| b.cmp(a));

    // 同花与顺子只可能出现在 5 个点数互不相同的情况下
    match groups.as_slice() {
        [(4, quad), (1, kicker)] => HandRank::FourOfAKind(*quad, *kicker),
        [(3, trips), (2, pair)] => HandRank::FullHouse(*trips, *pair),
        [(3, trips), (1, k1), (1, k2)] => HandRank::ThreeOfAKind(*trips, *k1, *k2),
        [(2, high), (2, low), (1, kicker)] => HandRank::TwoPair(*high, *low, *kicker),
        [(2, pair), (1, k1), (1, k2), (1, k3)] => HandRank::OnePair(*pair, *k1, *k2, *k3),
        _ => match (is_flush, straight) {
            (true, _) => HandRank::Flush(ranks[0], ranks[1], ranks[2], ranks[3], ranks[4]),
            (false, Some(high)) => HandRank::Straight(high),
            (false, None) => HandRank::HighCard(ranks[0], ranks[1], ranks[2], ranks[3], ranks[4]),
        },
    }
}

/// 已按从大到小排好的 5 个点数若构成顺子，返回最高牌；A-2-3-4-5 的最高牌是 5
fn straight_high(ranks: &[Rank; 5]) -> Option<Rank> {
    let distinct = ranks.windows(2).all(|w| w[0] > w[1]);
    if !distinct {
        return None;
    }
    if ranks[0] as u8 - ranks[4] as u8 == 4 {
        Some(ranks[0])
    } else if *ranks == [Rank::Ace, Rank::Five, Rank::Four, Rank::Three, Rank::Two] {
        Some(Rank::Five)
    } else {
        None
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use Rank::*;
    use Suit::*;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    fn five(cards: [Card; 5]) -> HandRank {
        evaluate_five(&cards)
    }

    // --- 5张牌评估测试 ---
    #[test]
    fn test_royal_flush() {
        let hand = [card(Ten, Spade), card(Ace, Spade), card(Queen, Spade), card(King, Spade), card(Jack, Spade)];
        assert_eq!(five(hand), HandRank::RoyalFlush);
    }

    #[test]
    fn test_ace_low_straight_flush() {
        let hand = [card(Ace, Club), card(Two, Club), card(Three, Club), card(Four, Club), card(Five, Club)];
        assert_eq!(five(hand), HandRank::StraightFlush(Five));
    }

    #[test]
    fn test_four_of_a_kind() {
        let hand = [card(Ace, Spade), card(Ace, Heart), card(Ace, Diamond), card(Ace, Club), card(King, Spade)];
        assert_eq!(five(hand), HandRank::FourOfAKind(Ace, King));
    }

    #[test]
    fn test_full_house() {
        let hand = [card(Queen, Club), card(King, Spade), card(Queen, Spade), card(King, Heart), card(King, Diamond)];
        assert_eq!(five(hand), HandRank::FullHouse(King, Queen));
    }

    #[test]
    fn test_flush() {
        let hand = [card(Two, Diamond), card(Five, Diamond), card(Eight, Diamond), card(Jack, Diamond), card(Ace, Diamond)];
        assert_eq!(five(hand), HandRank::Flush(Ace, Jack, Eight, Five, Two));
    }

    #[test]
    fn test_ace_low_straight() {
        let hand = [card(Ace, Spade), card(Two, Heart), card(Three, Diamond), card(Four, Club), card(Five, Spade)];
        assert_eq!(five(hand), HandRank::Straight(Five));
    }

    #[test]
    fn test_pairs_and_kickers() {
        let trips = [card(Ten, Spade), card(Ten, Heart), card(Ten, Diamond), card(Jack, Club), card(Two, Spade)];
        assert_eq!(five(trips), HandRank::ThreeOfAKind(Ten, Jack, Two));

        let two_pair = [card(Jack, Spade), card(Nine, Heart), card(Nine, Diamond), card(Jack, Club), card(Ten, Spade)];
        assert_eq!(five(two_pair), HandRank::TwoPair(Jack, Nine, Ten));

        let pair = [card(Ace, Spade), card(Ace, Heart), card(King, Diamond), card(Queen, Club), card(Jack, Spade)];
        assert_eq!(five(pair), HandRank::OnePair(Ace, King, Queen, Jack));

        let high = [card(King, Spade), card(Queen, Heart), card(Jack, Diamond), card(Nine, Club), card(Seven, Spade)];
        assert_eq!(five(high), HandRank::HighCard(King, Queen, Jack, Nine, Seven));
    }

    // --- 7选5评估测试 ---

    #[test]
    fn test_best_hand_from_seven_is_flush() {
        let cards = [
            card(Ace, Heart), card(King, Heart),
            card(Ten, Heart), card(Two, Heart), card(Five, Heart),
            card(Ace, Spade), card(Ten, Club),
        ];
        assert_eq!(find_best_hand(&cards).unwrap(), HandRank::Flush(Ace, King, Ten, Five, Two));
    }

    #[test]
    fn test_best_hand_from_seven_plays_the_board() {
        let cards = [
            card(Two, Spade), card(Two, Heart),
            card(Ten, Club), card(Jack, Diamond), card(Queen, Heart),
            card(King, Spade), card(Ace, Club),
        ];
        assert_eq!(find_best_hand(&cards).unwrap(), HandRank::Straight(Ace));
    }

    #[test]
    fn test_best_hand_rejects_bad_sizes() {
        let cards = [card(Two, Spade), card(Two, Heart), card(Ten, Club), card(Jack, Diamond)];
        assert!(matches!(find_best_hand(&cards), Err(GameError::InvalidHandSize(4))));
    }

    #[test]
    fn test_parse_cards() {
        assert_eq!("As".parse::<Card>().unwrap(), card(Ace, Spade));
        assert_eq!("10h".parse::<Card>().unwrap(), card(Ten, Heart));
        assert_eq!("td".parse::<Card>().unwrap(), card(Ten, Diamond));
        assert_eq!("7♣".parse::<Card>().unwrap(), card(Seven, Club));
        assert!("1s".parse::<Card>().is_err());
        assert!("A".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());
    }

    #[test]
    fn test_deck_draws_all_unique_then_exhausts() {
        let mut deck = Deck::seeded(7);
        deck.shuffle();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..52 {
            assert!(seen.insert(deck.draw().unwrap()));
        }
        assert!(matches!(deck.draw(), Err(GameError::DeckExhausted)));

        deck.reset();
        assert_eq!(deck.remaining(), 52);
    }

    #[test]
    fn test_stacked_deck_keeps_order_across_reset() {
        let order = vec![card(Ace, Spade), card(King, Heart), card(Two, Club)];
        let mut deck = StackedDeck::new(order);
        deck.shuffle();
        assert_eq!(deck.draw().unwrap(), card(Ace, Spade));
        assert_eq!(deck.draw().unwrap(), card(King, Heart));
        deck.reset();
        assert_eq!(deck.draw().unwrap(), card(Ace, Spade));
        assert_eq!(deck.remaining(), 2);
    }
}
