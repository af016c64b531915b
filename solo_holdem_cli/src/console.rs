use crossterm::style::Stylize;
use solo_holdem_core::{
    Card, DecisionContext, Decider, GameError, HandEvaluator, PlayerAction, Seat, SeatKind,
    StandardEvaluator, expect_kind,
};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

/// 人类玩家输入的错误，提示后重新输入，不会离开输入循环
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("please enter an action")]
    Empty,

    #[error("unknown action {0:?}")]
    UnknownCommand(String),

    #[error("raise needs an amount, e.g. `raise 100`")]
    MissingAmount,

    #[error("{0:?} is not a valid amount")]
    InvalidAmount(String),

    #[error("cannot check, {0} to call")]
    CannotCheck(u32),

    #[error("raise must be to at least {min}")]
    RaiseTooSmall { min: u32 },

    #[error("you only have enough to raise to {max}")]
    RaiseTooLarge { max: u32 },
}

/// 终端的输入与输出
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// 输出提示并读一行，输入结束时返回 None
    pub fn prompt(&mut self, prompt: &str) -> Result<Option<String>, GameError> {
        write!(self.output, "{}", prompt.yellow())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// y 继续，其它输入或输入结束都视为否
    pub fn confirm(&mut self, prompt: &str) -> Result<bool, GameError> {
        Ok(self.prompt(prompt)?.is_some_and(|answer| answer.eq_ignore_ascii_case("y")))
    }
}

pub type SharedConsole<R, W> = Rc<RefCell<Console<R, W>>>;

/// 在终端前的人类玩家
pub struct ConsolePlayer<R, W> {
    console: SharedConsole<R, W>,
    evaluator: StandardEvaluator,
}

impl<R: BufRead, W: Write> ConsolePlayer<R, W> {
    pub fn new(console: SharedConsole<R, W>) -> Self {
        ConsolePlayer { console, evaluator: StandardEvaluator }
    }

    fn show_situation(&self, console: &mut Console<R, W>, seat: &Seat, ctx: &DecisionContext<'_>) -> Result<(), GameError> {
        let out = console.output();
        writeln!(out)?;
        writeln!(out, "{}", format!("--- Your turn ({}) ---", ctx.street).cyan().bold())?;
        writeln!(out, "Your hand: {}", join_cards(&seat.hand).bold())?;
        if !ctx.board.is_empty() {
            writeln!(out, "Board: {}", join_cards(ctx.board))?;
            // 翻牌后才有完整牌型
            let score = self.evaluator.evaluate(ctx.board, &seat.hand)?;
            writeln!(out, "You have: {}", self.evaluator.classify(score).to_string().green())?;
        }
        writeln!(
            out,
            "Pot: {} | Current bet: {} | Your bet: {} | Your chips: {}",
            ctx.pot, ctx.current_bet, ctx.seat_current_bet, ctx.available_chips
        )?;
        if ctx.amount_to_call > 0 {
            writeln!(out, "To call: {}", ctx.amount_to_call.to_string().red())?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Decider for ConsolePlayer<R, W> {
    fn decide(&mut self, seat: &Seat, ctx: &DecisionContext<'_>) -> Result<PlayerAction, GameError> {
        expect_kind(seat, SeatKind::Human)?;

        let mut console = self.console.borrow_mut();
        self.show_situation(&mut console, seat, ctx)?;
        let prompt = action_prompt(ctx);

        loop {
            let Some(line) = console.prompt(&prompt)? else {
                return Err(GameError::InputClosed);
            };
            match parse_action(&line, ctx) {
                Ok(action) => {
                    debug!(?action, "human decided");
                    return Ok(action);
                }
                Err(e) => {
                    debug!(input = %line, error = %e, "rejected human input");
                    writeln!(console.output(), "{}", e.to_string().red())?;
                }
            }
        }
    }
}

fn join_cards(cards: &[Card]) -> String {
    cards.iter().map(Card::to_string).collect::<Vec<_>>().join(" ")
}

fn action_prompt(ctx: &DecisionContext<'_>) -> String {
    let max = ctx.seat_current_bet + ctx.available_chips;
    let passive = if ctx.amount_to_call == 0 {
        "check".to_string()
    } else {
        format!("call {}", ctx.amount_to_call.min(ctx.available_chips))
    };
    if ctx.min_raise <= max {
        format!("Action [fold, {passive}, raise <{}-{max}>, allin]: ", ctx.min_raise)
    } else {
        format!("Action [fold, {passive}, allin]: ")
    }
}

/// 解析人类输入。加注金额为加注后本轮的总下注额。
pub fn parse_action(line: &str, ctx: &DecisionContext<'_>) -> Result<PlayerAction, InputError> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Err(InputError::Empty);
    };
    let max = ctx.seat_current_bet + ctx.available_chips;

    match command.to_ascii_lowercase().as_str() {
        "f" | "fold" => Ok(PlayerAction::Fold),
        "k" | "check" if ctx.amount_to_call > 0 => Err(InputError::CannotCheck(ctx.amount_to_call)),
        "k" | "check" | "c" | "call" => Ok(PlayerAction::Call),
        "a" | "allin" | "all-in" => Ok(PlayerAction::Raise(max)),
        "r" | "raise" | "b" | "bet" => {
            let text = parts.next().ok_or(InputError::MissingAmount)?;
            let amount: u32 = text.parse().map_err(|_| InputError::InvalidAmount(text.to_string()))?;
            if amount > max {
                Err(InputError::RaiseTooLarge { max })
            } else if amount < ctx.min_raise && amount < max {
                Err(InputError::RaiseTooSmall { min: ctx.min_raise.min(max) })
            } else {
                Ok(PlayerAction::Raise(amount))
            }
        }
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}
