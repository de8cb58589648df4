//! Lane Rush entry point
//!
//! Native builds run one headless round with a simple autopilot, logging
//! events and audio cues. Usage: `lane-rush [tuning.json] [seed]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lane Rush (native) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `Game` directly; nothing to do here
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use lane_rush::Settings;
    use lane_rush::audio::{AudioDirector, LogSink};
    use lane_rush::input::IntentSource;
    use lane_rush::sim::{FrameClock, Game, GameEvent, LaneGeometry, RoundError};
    use lane_rush::Tuning;

    /// 60 Hz host frames
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Safety stop for runaway tunings
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    pub fn run() -> Result<(), RoundError> {
        let mut args = std::env::args().skip(1);

        let tuning = match args.next() {
            Some(path) => {
                log::info!("Loading tuning from {}", path);
                Tuning::load(&path)?
            }
            None => Tuning::default(),
        };
        let seed = args
            .next()
            .and_then(|s| match s.parse::<u64>() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    log::warn!("Ignoring invalid seed {:?}", s);
                    None
                }
            })
            .unwrap_or_else(clock_seed);

        let lanes = LaneGeometry::from_tuning(&tuning);
        let mut game = Game::new(tuning, seed)?;
        let mut input = IntentSource::new();
        let mut audio = AudioDirector::new(LogSink::default(), Settings::default());
        let mut clock = FrameClock::new();

        log::info!("Seed: {}", seed);
        game.start_round()?;

        let mut now = 0.0;
        let mut result = None;
        for _ in 0..MAX_FRAMES {
            steer(&game, &lanes, &mut input);
            let dt = clock.delta(now);
            now += FRAME_MS;

            let tick = game.tick(dt, &input.intent());
            audio.handle(&tick);
            let mut done = false;
            for event in &tick.events {
                match event {
                    GameEvent::Crash { lives_left } => {
                        log::info!("Crash! {} lives left", lives_left)
                    }
                    GameEvent::RoundFinished { won, score } => {
                        result = Some((*won, *score));
                    }
                    GameEvent::ReturnedToIdle => done = true,
                    _ => log::trace!("{:?}", event),
                }
            }
            if done {
                break;
            }
        }

        match result {
            Some((won, score)) => {
                let verdict = if won { "survived" } else { "crashed out" };
                println!("Autopilot {}: score {}", verdict, score);
            }
            None => log::warn!(
                "Round still running after {} frames ({:.1} s left)",
                MAX_FRAMES,
                game.round().time_left
            ),
        }
        log::info!("{} cues played", audio.sink().played);
        Ok(())
    }

    /// Press keys toward the lane whose nearest oncoming car is furthest away
    fn steer(game: &Game, lanes: &LaneGeometry, input: &mut IntentSource) {
        input.release_all();

        let player = game.player_rect();
        let threat = |lane: u32| {
            game.enemies()
                .iter()
                .filter(|e| e.lane == lane && e.pos.y < player.bottom())
                .map(|e| player.top() - (e.pos.y + e.size.y))
                .fold(f32::INFINITY, f32::min)
        };

        let current = (0..lanes.lane_count)
            .min_by(|&a, &b| {
                let da = (lanes.lane_center(a) - player.pos.x).abs();
                let db = (lanes.lane_center(b) - player.pos.x).abs();
                da.total_cmp(&db)
            })
            .unwrap_or(0);
        let mut target = current;
        for lane in 0..lanes.lane_count {
            if threat(lane) > threat(target) {
                target = lane;
            }
        }

        let goal = lanes.lane_center(target);
        let tolerance = game.tuning().player_lateral_speed;
        if player.pos.x < goal - tolerance {
            input.key_down("ArrowRight");
        } else if player.pos.x > goal + tolerance {
            input.key_down("ArrowLeft");
        }
        // Ease off when the chosen lane is tight
        if threat(target) < player.size.y * 2.0 {
            input.key_down("ArrowDown");
        }
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
