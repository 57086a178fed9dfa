//! Arcade Suite entry point
//!
//! Headless attract mode: plays every game with a seeded random intent
//! stream at 60 fps of simulated time and logs how each one ends. Run with
//! `RUST_LOG=info` (or `debug` for per-event detail).

use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use arcade_suite::sim::{Intent, SessionStatus};
use arcade_suite::{Arcade, GameKind, Settings};

/// Simulated frame length
const FRAME_SECS: f32 = 1.0 / 60.0;
/// Simulated seconds per game
const DEMO_SECS: f32 = 90.0;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Arcade Suite (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };
    let mut rng = Pcg32::seed_from_u64(settings.seed);
    let mut arcade = Arcade::new(settings);

    for kind in GameKind::ALL {
        arcade.select(kind);
        let (status, score, ticks) = attract(&mut arcade, &mut rng);
        log::info!(
            "{}: {} after {} tick(s), score {}",
            kind.as_str(),
            status.as_str(),
            ticks,
            score
        );
        println!("{:<14} {:<10} score {}", kind.as_str(), status.as_str(), score);
    }
}

/// Mash random keys until the game ends or the demo time runs out
fn attract(arcade: &mut Arcade, rng: &mut Pcg32) -> (SessionStatus, u64, u32) {
    let frames = (DEMO_SECS / FRAME_SECS) as u32;
    let mut ticks = 0;

    for _ in 0..frames {
        // Roughly a key event every 8 frames
        if rng.random_range(0..8) == 0 {
            let intent = Intent::ALL[rng.random_range(0..Intent::ALL.len())];
            if rng.random_bool(0.7) {
                arcade.apply_intent(intent);
            } else {
                arcade.release_intent(intent);
            }
        }

        ticks += arcade.advance(FRAME_SECS);

        if arcade.status().is_terminal() {
            break;
        }
    }

    (arcade.status(), arcade.score(), ticks)
}
