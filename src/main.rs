use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use directories::ProjectDirs;
use quest_battle::battle::{Battle, BattleEvent, BattleInput};
use quest_battle::catalog::GameData;
use quest_battle::character::Player;
use quest_battle::combat::{CombatRecord, Combatant, Faction, Stats};
use quest_battle::constants::FRAME_MS;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

fn main() -> io::Result<()> {
    let mut duo = false;
    let mut party = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--duo" => duo = true,
            "--party" => party = true,
            "--help" | "-h" => {
                println!("Quest Battle - a single turn-based encounter\n");
                println!("Usage: quest-battle [options]\n");
                println!("Options:");
                println!("  --duo      Fight Daryl and Chicken George");
                println!("  --party    Bring two drinking buddies along");
                println!("  --help     Show this help message");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'quest-battle --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = setup_logging() {
        eprintln!("Warning: file logging disabled: {}", e);
    }

    let data = match GameData::embedded() {
        Ok(data) => Arc::new(data),
        Err(e) => {
            eprintln!("Failed to load game data: {}", e);
            std::process::exit(1);
        }
    };

    let enemy_tags: &[&str] = if duo {
        &["daryl_ledeay", "chicken_george"]
    } else {
        &["slime", "goblin"]
    };
    let enemies = enemy_tags
        .iter()
        .filter_map(|tag| data.bestiary.create_enemy(tag))
        .collect();
    let allies = if party {
        vec![drinking_buddy("Bubba"), drinking_buddy("Earl")]
    } else {
        Vec::new()
    };
    let mut battle = Battle::new(Arc::clone(&data), Player::hero(&data), enemies, allies);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut battle);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    let rewards = battle.rewards().clone();
    let player = battle.into_player();
    println!(
        "{} finished at level {} with {}/{} HP.",
        player.name(),
        player.level,
        player.record().hp(),
        player.record().max_hp()
    );
    println!(
        "Earned {} XP and {} gold this battle ({} item drops).",
        rewards.xp,
        rewards.gold,
        rewards.items.len()
    );
    Ok(())
}

fn drinking_buddy(name: &str) -> Combatant {
    Combatant::new(
        name,
        Faction::Ally,
        CombatRecord::new(40, 0, Stats::new(4, 2, 1, 2)),
    )
}

/// Runs the 60 Hz loop until the battle hands control back.
fn run(terminal: &mut Term, battle: &mut Battle) -> io::Result<()> {
    let frame_time = Duration::from_millis(FRAME_MS);
    let mut last_frame = Instant::now();

    while battle.is_active() {
        if event::poll(frame_time)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        tracing::info!("battle abandoned");
                        break;
                    }
                    battle.handle_input(BattleInput::from(key));
                }
            }
        }

        let now = Instant::now();
        battle.update(now.duration_since(last_frame).as_secs_f64());
        last_frame = now;

        for event in battle.drain_events() {
            log_event(&event);
        }

        terminal.draw(|frame| battle.draw(frame))?;
    }
    Ok(())
}

fn log_event(event: &BattleEvent) {
    match event {
        BattleEvent::Sound(sound) => tracing::trace!(%sound, "sound cue"),
        BattleEvent::CombatLog(line) => tracing::info!(target: "combat", "{}", line),
        BattleEvent::SystemLog(line) => tracing::info!(target: "system", "{}", line),
        BattleEvent::EnemyKilled { type_tag } => tracing::info!(%type_tag, "enemy killed"),
        BattleEvent::ReturnToTitle => tracing::info!("returning to title"),
    }
}

/// Sends diagnostics to a file in the cache directory; the terminal
/// belongs to the UI.
fn setup_logging() -> io::Result<()> {
    let Some(dirs) = ProjectDirs::from("", "", "quest-battle") else {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "could not determine cache directory",
        ));
    };
    let log_dir = dirs.cache_dir();
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, "battle.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Keep the writer alive for the whole process.
    std::mem::forget(guard);
    Ok(())
}
