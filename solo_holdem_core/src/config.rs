use crate::error::GameError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_AI_PLAYERS: usize = 3;
pub const DEFAULT_STARTING_STACK: u32 = 1000;
pub const DEFAULT_SMALL_BLIND: u32 = 10;
pub const DEFAULT_BIG_BLIND: u32 = 20;
pub const DEFAULT_AI_DELAY_MS: u64 = 700;
pub const MAX_AI_PLAYERS: usize = 9;

/// 一场游戏的参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub ai_players: usize,
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// 固定种子时洗牌和电脑决策都可复现
    pub seed: Option<u64>,
    /// 电脑行动前的展示停顿，0 表示不停顿
    pub ai_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            ai_players: DEFAULT_AI_PLAYERS,
            starting_stack: DEFAULT_STARTING_STACK,
            small_blind: DEFAULT_SMALL_BLIND,
            big_blind: DEFAULT_BIG_BLIND,
            seed: None,
            ai_delay_ms: DEFAULT_AI_DELAY_MS,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if !(1..=MAX_AI_PLAYERS).contains(&self.ai_players) {
            return Err(GameError::InvalidConfig(format!(
                "ai_players must be between 1 and {MAX_AI_PLAYERS}, got {}",
                self.ai_players
            )));
        }
        if self.starting_stack == 0 {
            return Err(GameError::InvalidConfig("starting_stack must be positive".into()));
        }
        if self.small_blind == 0 {
            return Err(GameError::InvalidConfig("small_blind must be positive".into()));
        }
        if self.big_blind < self.small_blind {
            return Err(GameError::InvalidConfig(format!(
                "big_blind ({}) must not be below small_blind ({})",
                self.big_blind, self.small_blind
            )));
        }
        Ok(())
    }

    /// 总座位数，含人类玩家
    pub fn seat_count(&self) -> usize {
        self.ai_players + 1
    }
}
