use crossterm::style::Stylize;
use solo_holdem_core::{Blind, PlayerAction, SeatId, SeatKind, Street, Table, TableEvent, TableObserver};
use std::io::Write;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// 把牌桌事件渲染到终端。只显示 `viewer` 能看到的信息。
pub struct ConsoleObserver<W> {
    out: W,
    viewer: SeatId,
    ai_delay: Duration,
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(out: W, viewer: SeatId, ai_delay: Duration) -> Self {
        ConsoleObserver { out, viewer, ai_delay }
    }

    fn render(&mut self, table: &Table, event: &TableEvent) -> std::io::Result<()> {
        let name = |id: &SeatId| table.seat_by_id(id).map_or("?", |s| s.name.as_str()).to_string();

        match event {
            TableEvent::HandStarted { hand_number, dealer } => {
                writeln!(self.out)?;
                writeln!(self.out, "{}", format!("=== Hand #{hand_number} ===").green().bold())?;
                writeln!(self.out, "{}", format!("Dealer: {}", name(dealer)).cyan())?;
            }
            TableEvent::BlindPosted { seat, blind, amount } => {
                let blind = match blind {
                    Blind::Small => "small",
                    Blind::Big => "big",
                };
                writeln!(self.out, "{} posts the {blind} blind ({amount})", name(seat))?;
            }
            TableEvent::HoleCardsDealt { cards: Some([a, b]), .. } => {
                writeln!(self.out, "Your cards: {}", format!("{a} {b}").bold())?;
            }
            TableEvent::HoleCardsDealt { cards: None, .. } => {}
            TableEvent::StreetStarted { street: Street::PreFlop, .. } => {}
            TableEvent::StreetStarted { street, board, pot } => {
                let board = board.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ");
                writeln!(self.out)?;
                writeln!(self.out, "{}", format!("--- {street}: {board} (pot {pot}) ---").cyan())?;
            }
            TableEvent::TurnStarted { seat } => {
                let automated = table.seat_by_id(seat).is_some_and(|s| s.kind == SeatKind::Automated);
                if automated && !self.ai_delay.is_zero() {
                    self.out.flush()?;
                    thread::sleep(self.ai_delay);
                }
            }
            TableEvent::PlayerActed { seat, action, added, total_bet_this_round, new_stack, new_pot } => {
                let verb = match action {
                    PlayerAction::Fold => "folds".to_string(),
                    PlayerAction::Call if *added == 0 => "checks".to_string(),
                    PlayerAction::Call => format!("calls {added}"),
                    PlayerAction::Raise(_) => format!("raises to {total_bet_this_round}"),
                };
                let all_in = if *new_stack == 0 && *action != PlayerAction::Fold { " (all-in)" } else { "" };
                writeln!(self.out, "{} {verb}{all_in}, pot {new_pot}", name(seat))?;
            }
            TableEvent::Showdown { results } => {
                writeln!(self.out)?;
                writeln!(self.out, "{}", "=== Showdown ===".magenta().bold())?;
                for result in results {
                    let [a, b] = result.cards;
                    writeln!(self.out, "{}: {a} {b} ({})", name(&result.seat), result.category)?;
                }
            }
            TableEvent::PotAwarded { seat, amount, category } => {
                let winner = if *seat == self.viewer { "You win".to_string() } else { format!("{} wins", name(seat)) };
                let line = match category {
                    Some(category) => format!("{winner} {amount} with {category}"),
                    None => format!("{winner} {amount}"),
                };
                writeln!(self.out, "{}", line.yellow().bold())?;
            }
            TableEvent::SeatBusted { seat } => {
                writeln!(self.out, "{}", format!("{} is out of chips", name(seat)).red())?;
            }
        }
        Ok(())
    }
}

impl<W: Write> TableObserver for ConsoleObserver<W> {
    fn on_event(&mut self, table: &Table, event: &TableEvent) {
        let event = event.for_viewer(&self.viewer);
        match serde_json::to_string(&event) {
            Ok(json) => debug!(event = %json, "table event"),
            Err(e) => warn!(error = %e, "failed to serialize table event"),
        }
        if let Err(e) = self.render(table, &event) {
            warn!(error = %e, "failed to render table event");
        }
    }
}

/// 每局结束后显示全桌筹码
pub fn show_chip_counts<W: Write>(out: &mut W, table: &Table) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "Chip counts:".cyan())?;
    for seat in &table.seats {
        let line = format!("  {}: {}", seat.name, seat.stack);
        if seat.stack == 0 {
            writeln!(out, "{}", line.dark_grey())?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}
