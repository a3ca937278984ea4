//! Sky Flap entry point
//!
//! Headless native runner: drives a full session with the demo autopilot,
//! persists highscores and prints the board when done.

use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use sky_flap::audio::{AudioManager, LogSink};
use sky_flap::persistence::{self, HighScoreStore, JsonFileStore, MemoryStore};
use sky_flap::platform::{
    FixedStep, Intent, InterstitialPlayer, SkipInterstitial, TimedInterstitial,
};
use sky_flap::sim::{self, GamePhase};
use sky_flap::{DifficultyPreset, Services, Session, Settings, Tuning};

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 60.0;
/// Game-over card stays up this long before the demo restarts
const RESTART_DELAY: f32 = 1.5;

/// Side-scrolling bird vs. pipes arcade game (headless demo runner).
#[derive(Debug, Parser)]
#[command(name = "sky-flap", version, about)]
struct Args {
    /// Session seed (random if not set)
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds of game time to simulate
    #[arg(short, long, default_value = "60")]
    seconds: f32,

    /// Player name highscores are recorded under
    #[arg(short, long)]
    player: Option<String>,

    /// Difficulty: easy, normal, hard
    #[arg(short, long, value_parser = parse_difficulty)]
    difficulty: Option<DifficultyPreset>,

    /// Tuning overrides (JSON)
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,

    /// Highscore file (defaults to the platform data dir)
    #[arg(long, value_name = "FILE")]
    highscores: Option<PathBuf>,

    /// Settings file; created or updated on exit
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Keep highscores in memory only
    #[arg(long)]
    no_save: bool,

    /// Pace frames to wall-clock time
    #[arg(long)]
    realtime: bool,

    /// Don't fly the bird; it will just fall
    #[arg(long)]
    no_autopilot: bool,
}

fn parse_difficulty(s: &str) -> Result<DifficultyPreset, String> {
    DifficultyPreset::from_str(s)
        .filter(|p| *p != DifficultyPreset::Custom)
        .ok_or_else(|| format!("unknown difficulty '{s}' (expected easy, normal or hard)"))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Sky Flap (native) starting...");

    let tuning = match &args.tuning {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(player) = &args.player {
        settings.player_name = player.trim().to_string();
    }
    if let Some(preset) = args.difficulty {
        settings.difficulty = preset;
    }

    let store: Box<dyn HighScoreStore> = if args.no_save {
        Box::new(MemoryStore::new())
    } else {
        let path = args
            .highscores
            .clone()
            .or_else(persistence::default_highscores_path)
            .ok_or("no data directory available; pass --highscores or --no-save")?;
        Box::new(JsonFileStore::new(path))
    };

    let interstitial: Box<dyn InterstitialPlayer> = if args.realtime {
        Box::new(TimedInterstitial::new(tuning.interstitial_seconds))
    } else {
        Box::new(SkipInterstitial)
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let services = Services {
        audio: AudioManager::new(Box::new(LogSink)),
        store,
        interstitial,
    };
    let mut session = Session::new(tuning, settings, services, seed);
    session.handle_intent(Intent::StartGame);

    let (runs, best_run) = run(&mut session, &args);

    let scores = session.shutdown();
    if let Some(path) = &args.settings {
        session.settings().save(path);
    }

    let rank = scores
        .rank_of(session.player())
        .map_or_else(|| "unranked".to_string(), |r| format!("#{r}"));
    println!(
        "{} run(s), best this session {best_run}, {}'s best {} ({rank})",
        runs,
        session.player(),
        scores.best(session.player())
    );
    println!("\n  #  {:<16} {:>6}", "PLAYER", "BEST");
    for (rank, (name, best)) in scores.ranked().iter().take(10).enumerate() {
        println!("{:>3}  {:<16} {:>6}", rank + 1, name, best);
    }
    Ok(())
}

/// Main loop; returns (runs finished, best score seen)
fn run(session: &mut Session, args: &Args) -> (u32, u64) {
    let mut stepper = FixedStep::default();
    let total_frames = (args.seconds.max(0.0) / FRAME_DT) as u64;
    let mut game_over_for = 0.0;
    let mut runs = 0;
    let mut best_run = 0;

    for _ in 0..total_frames {
        let frame_start = Instant::now();

        for _ in 0..stepper.advance(FRAME_DT) {
            if !args.no_autopilot {
                if let Some(intent) = sim::autopilot(session.state()) {
                    session.handle_intent(intent);
                }
            }
            session.update(stepper.step());
        }

        let state = session.state();
        if state.phase == GamePhase::GameOver {
            if game_over_for == 0.0 {
                runs += 1;
                best_run = best_run.max(state.score);
            }
            game_over_for += FRAME_DT;
            if game_over_for >= RESTART_DELAY {
                game_over_for = 0.0;
                session.handle_intent(Intent::Restart);
            }
        }

        let frame = session.frame();
        log::trace!(
            "score {} | bird y {:.1} (+{:.2} step) | {} pipes | {} particles",
            frame.hud.score,
            frame.bird.pos[1],
            stepper.alpha(),
            frame.pipes.len(),
            frame.particles.len()
        );

        if args.realtime {
            let budget = Duration::from_secs_f32(FRAME_DT);
            if let Some(rest) = budget.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    if session.state().phase == GamePhase::Playing {
        best_run = best_run.max(session.state().score);
    }
    (runs, best_run)
}
