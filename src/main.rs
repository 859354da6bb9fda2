use std::io::{self, BufRead, Write};
use std::thread;
use std::time::UNIX_EPOCH;

use chrono::{Local, TimeZone};
use itertools::Itertools;
use log::{debug, info};

use rps_arena::game::{FileStore, GameEngine, KeyValueStore, OpponentSelector, PersistenceGateway};
use rps_arena::game::{RandomOpponent, Settings};
use rps_arena::model::{Choice, GameCommand, RoundRecord, Statistics};

fn init_logging() {
    env_logger::init();
}

fn format_time(record: &RoundRecord) -> String {
    let millis = record
        .occurred_at
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn render_stats(stats: &Statistics) -> String {
    format!(
        "🏆 {} points | {} wins | {} losses | {} ties | {} games | {}% win rate",
        stats.points,
        stats.wins,
        stats.losses,
        stats.ties,
        stats.total_games,
        stats.win_rate()
    )
}

fn render_round(record: &RoundRecord) -> String {
    format!(
        "You {} {}  vs  {} {} Bot\n{}  (+{} points earned)",
        record.player_choice.emoji(),
        record.player_choice,
        record.opponent_choice,
        record.opponent_choice.emoji(),
        record.outcome.message(),
        record.points_earned()
    )
}

fn render_history<'a>(records: impl Iterator<Item = &'a RoundRecord>) -> String {
    records
        .map(|r| {
            format!(
                "  {}  {} {} vs {} {}  [{}]",
                format_time(r),
                r.player_choice.emoji(),
                r.player_choice,
                r.opponent_choice,
                r.opponent_choice.emoji(),
                r.outcome.badge()
            )
        })
        .join("\n")
}

fn render_rules() -> String {
    let beats = Choice::ALL
        .iter()
        .map(|c| format!("  • {} beats {}", c, c.beats()))
        .join("\n");
    format!(
        "📖 Game Rules & Scoring\n{}\n  Points: Win = 3 points, Tie = 1 point, Loss = 0 points",
        beats
    )
}

fn prompt(stdout: &mut impl Write, text: &str) -> io::Result<()> {
    write!(stdout, "{}", text)?;
    stdout.flush()
}

fn run<O, S>(engine: &mut GameEngine<O, S>, settings: &Settings) -> io::Result<()>
where
    O: OpponentSelector,
    S: KeyValueStore,
{
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    writeln!(stdout, "🎮 Rock Paper Scissors")?;
    writeln!(stdout, "Play against the bot and earn points! Type 'help' for commands.")?;
    writeln!(stdout, "{}", render_stats(&engine.statistics()))?;

    loop {
        prompt(&mut stdout, "🎯 Make your choice (rock/paper/scissors): ")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        if let Ok(choice) = input.parse::<Choice>() {
            writeln!(stdout, "🤖 Bot is thinking...")?;
            thread::sleep(settings.reveal_delay());
            if let Some(record) = engine.handle_command(GameCommand::Play(choice)) {
                writeln!(stdout, "{}", render_round(&record))?;
                writeln!(stdout, "{}", render_stats(&engine.statistics()))?;
            }
            continue;
        }

        match input.to_lowercase().as_str() {
            "" => (),
            "stats" => writeln!(stdout, "{}", render_stats(&engine.statistics()))?,
            "history" => {
                if engine.history().is_empty() {
                    writeln!(stdout, "No games yet.")?;
                } else {
                    writeln!(stdout, "📝 Recent Games")?;
                    writeln!(stdout, "{}", render_history(engine.history().iter()))?;
                }
            }
            "last" => match engine.last_round() {
                Some(record) => writeln!(stdout, "{}", render_round(record))?,
                None => writeln!(stdout, "No round played this session.")?,
            },
            "rules" => writeln!(stdout, "{}", render_rules())?,
            "reset" => {
                if engine.statistics().is_empty() && engine.history().is_empty() {
                    writeln!(stdout, "Nothing to reset.")?;
                    continue;
                }
                if settings.confirm_reset {
                    prompt(&mut stdout, "🔄 Reset all stats? [y/N] ")?;
                    let answer = match lines.next() {
                        Some(answer) => answer?,
                        None => break,
                    };
                    if !answer.trim().eq_ignore_ascii_case("y") {
                        continue;
                    }
                }
                engine.handle_command(GameCommand::ResetAll);
                writeln!(stdout, "{}", render_stats(&engine.statistics()))?;
            }
            "help" => writeln!(
                stdout,
                "Commands: rock (r), paper (p), scissors (s), stats, history, last, rules, reset, quit"
            )?,
            "quit" | "exit" => break,
            other => {
                debug!(target: "shell", "Unrecognised input {:?}", other);
                writeln!(stdout, "Unknown command {:?}; type 'help'.", other)?;
            }
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    init_logging();

    let data_dir = Settings::data_dir();
    let settings = Settings::load_from(&data_dir);
    let seed = Settings::seed_from_env();
    if Settings::is_debug_mode() {
        info!("Debug mode; data dir {:?}; seed {:?}", data_dir, seed);
    }

    let gateway = PersistenceGateway::new(FileStore::new(&data_dir));
    let mut engine = GameEngine::new(RandomOpponent::new(seed), gateway);

    run(&mut engine, &settings)
}
