//! Star Greeting entry point
//!
//! Native builds run a headless autopilot session and log how it went.
//! The browser build is driven from JS through `GreetingHandle`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use star_greeting::consts::SIM_DT_MS;
    use star_greeting::sim::GameEvent;
    use star_greeting::{RecordingAudio, Session, Settings, Tuning};

    env_logger::init();
    log::info!("Star Greeting (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed: {}", e);
            std::process::exit(1);
        }
        None => 42,
    };

    let tuning = match args.next() {
        Some(path) => {
            let json = match std::fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) => {
                    log::error!("Failed to read {}: {}", path, e);
                    std::process::exit(1);
                }
            };
            match Tuning::from_json(&json) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("Bad tuning in {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => Tuning::default(),
    };
    let tuning = tuning.with_settings(&Settings::load());

    // Ten simulated minutes is plenty for any sane phrase
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    let mut session = match Session::new(tuning, seed, RecordingAudio::default()) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Bad tuning: {}", e);
            std::process::exit(1);
        }
    };
    session.set_idle_mode(true);

    let mut missed = 0u32;
    let mut shots = 0u32;
    let mut frames = 0u32;
    while frames < MAX_FRAMES && !session.snapshot().show_overlay {
        session.frame(f64::from(frames) * SIM_DT_MS);
        for event in session.take_events() {
            match event {
                GameEvent::TokenMissed { .. } => missed += 1,
                GameEvent::ProjectileFired { .. } => shots += 1,
                _ => {}
            }
        }
        frames += 1;
    }

    let snapshot = session.snapshot();
    if snapshot.show_overlay {
        log::info!(
            "'{}' complete after {} ticks ({:.1}s): {} shots, {} misses, {} tones",
            snapshot.phrase,
            session.state().time_ticks,
            f64::from(frames) * SIM_DT_MS / 1000.0,
            shots,
            missed,
            session.audio().tones,
        );
    } else {
        log::warn!(
            "Gave up after {} frames with {}/{} letters",
            frames,
            snapshot.collected.len(),
            session.state().phrase.required(),
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
