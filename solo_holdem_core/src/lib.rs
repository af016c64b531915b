//! # 单人德州扑克核心逻辑库
//!
//! 一个人类座位对若干电脑座位的德州扑克。这个 crate 包含牌与牌堆、牌力评估、
//! 座位与牌桌状态、下注轮状态机、电脑决策策略、摊牌派彩以及单局流程编排。
//! 它不做任何输入输出：人类座位的决策和事件的展示都通过
//! [`Decider`] 与 [`TableObserver`] 由上层应用提供。

mod betting;
mod card;
mod config;
mod error;
mod evaluator;
mod event;
mod game;
mod player;
mod policy;
mod showdown;
mod state;

pub use betting::*;

pub use card::*;

pub use config::*;

pub use error::*;

pub use evaluator::*;

pub use event::*;

pub use game::*;

pub use player::*;

pub use policy::*;

pub use showdown::*;

pub use state::*;
