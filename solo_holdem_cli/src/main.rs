mod console;
mod observer;

use clap::Parser;
use crossterm::style::Stylize;
use solo_holdem_core::{
    DEFAULT_AI_DELAY_MS, DEFAULT_AI_PLAYERS, DEFAULT_BIG_BLIND, DEFAULT_SMALL_BLIND, DEFAULT_STARTING_STACK, Game,
    GameConfig, GameError,
};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use console::{Console, ConsolePlayer};
use observer::{ConsoleObserver, show_chip_counts};

#[derive(Parser, Debug)]
#[command(name = "solo_holdem", version)]
#[command(about = "Play Texas Hold'em against computer players")]
struct Args {
    /// Number of computer players
    #[arg(long, default_value_t = DEFAULT_AI_PLAYERS)]
    ai_players: usize,

    /// Chips every seat starts with
    #[arg(long, default_value_t = DEFAULT_STARTING_STACK)]
    starting_stack: u32,

    #[arg(long, default_value_t = DEFAULT_SMALL_BLIND)]
    small_blind: u32,

    #[arg(long, default_value_t = DEFAULT_BIG_BLIND)]
    big_blind: u32,

    /// RNG seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Pause before each computer action, in milliseconds (0 disables)
    #[arg(long, default_value_t = DEFAULT_AI_DELAY_MS)]
    ai_delay_ms: u64,
}

impl From<Args> for GameConfig {
    fn from(args: Args) -> Self {
        GameConfig {
            ai_players: args.ai_players,
            starting_stack: args.starting_stack,
            small_blind: args.small_blind,
            big_blind: args.big_blind,
            seed: args.seed,
            ai_delay_ms: args.ai_delay_ms,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 日志写到 stderr，不和牌桌输出混在一起
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = GameConfig::from(Args::parse());
    info!(?config, "starting game");

    let console = Rc::new(RefCell::new(Console::new(io::stdin().lock(), io::stdout())));
    let mut game = Game::new(&config, Box::new(ConsolePlayer::new(Rc::clone(&console))))?;
    let human = game.table().seats[0].id;
    let mut observer = ConsoleObserver::new(io::stdout(), human, Duration::from_millis(config.ai_delay_ms));
    let mut stdout = io::stdout();

    println!("{}", "Welcome to Texas Hold'em!".green().bold());
    println!("Blinds are {}/{}. Raise amounts are the total you put in this round.", config.small_blind, config.big_blind);

    loop {
        let summary = match game.play_hand(&mut observer) {
            Ok(summary) => summary,
            Err(GameError::InputClosed) => {
                println!();
                println!("Input closed, leaving the table.");
                break;
            }
            Err(e) => return Err(e.into()),
        };
        debug!(hand = summary.hand_number, pot = summary.pot, winner = %summary.winner, category = ?summary.category, "hand finished");

        show_chip_counts(&mut stdout, game.table())?;
        stdout.flush()?;

        let human_stack = game.table().seat_by_id(&human).map_or(0, |s| s.stack);
        if human_stack == 0 {
            println!("{}", "You are out of chips. Game over.".red().bold());
            break;
        }
        if game.seats_with_chips() < 2 {
            println!("{}", "You won every chip on the table!".green().bold());
            break;
        }
        if !console.borrow_mut().confirm("Play another round? (y/n): ")? {
            break;
        }
    }

    println!("Thanks for playing! {} hands played.", game.hands_played());
    Ok(())
}
