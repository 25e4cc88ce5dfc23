//! Synchronous single-player loop: read a line, dispatch it, tick, print.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use colored::Colorize;
use mr_core::EntityId;
use mr_engine::{Builtin, Dispatch, Engine, EngineConfig};
use tracing::{debug, info};

use crate::render::render;

/// Client name the local player's output is addressed to.
const LOCAL_CLIENT: &str = "local";

pub struct PlayOptions {
    pub world: Option<PathBuf>,
    pub save: Option<PathBuf>,
    pub player: String,
    pub config: Option<PathBuf>,
    pub tick_seconds: Option<f64>,
    pub strict: bool,
    pub ticks_per_command: u64,
}

fn engine_config(options: &PlayOptions) -> Result<EngineConfig, String> {
    let mut config = match &options.config {
        Some(path) => super::load_config(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seconds) = options.tick_seconds {
        config = config.with_tick_seconds(seconds);
    }
    if options.strict {
        config = config.with_require_entitlement(true);
    }
    // Checked after merging so a bad value from the file is caught too.
    let seconds = config.tick_seconds;
    if !(seconds.is_finite() && seconds >= 0.0) {
        return Err(format!("invalid tick length: {seconds}"));
    }
    Ok(config)
}

pub fn run(options: PlayOptions) -> Result<(), String> {
    let config = engine_config(&options)?;
    let mut engine = match &options.world {
        Some(path) => super::engine_from_file(config, path)?,
        None => {
            mr_content::starter(config)
                .map_err(|e| format!("cannot build starter world: {e}"))?
                .0
        }
    };

    let player = EntityId::from(options.player.as_str());
    if engine.get(&player).is_none() {
        return Err(format!("no entity '{player}' to play as"));
    }

    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    let mut stdout = io::stdout().lock();
    session(
        &mut engine,
        &player,
        stdin.lock(),
        &mut stdout,
        options.ticks_per_command,
        prompt,
    )
    .map_err(|e| format!("session failed: {e}"))?;

    if let Some(path) = &options.save {
        super::save(&engine, path)?;
        info!(path = %path.display(), "world saved");
    }
    Ok(())
}

fn flush_output(engine: &mut Engine, out: &mut impl Write) -> io::Result<()> {
    for delivery in engine.drain_output() {
        writeln!(out, "{}", render(&delivery.message))?;
    }
    out.flush()
}

/// Drive one player until `quit` or end of input. Errors are I/O failures or
/// content misconfiguration reported by the engine.
fn session(
    engine: &mut Engine,
    player: &EntityId,
    input: impl BufRead,
    out: &mut impl Write,
    ticks_per_command: u64,
    prompt: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    engine.outbox_mut().associate(player.clone(), LOCAL_CLIENT);

    writeln!(out, "{}", "Try help if you need help.".cyan())?;
    engine.use_skill(mr_content::skills::LOOK, player)?;
    flush_output(engine, out)?;

    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            debug!("end of input");
            break;
        };
        let line = line?;

        let outcome = engine.parse(line.trim(), player)?;
        engine.run(ticks_per_command)?;
        flush_output(engine, out)?;

        if outcome == Dispatch::Builtin(Builtin::Quit) {
            break;
        }
    }

    engine.outbox_mut().dissociate_client(LOCAL_CLIENT);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(script: &str, ticks: u64) -> (Engine, String) {
        colored::control::set_override(false);
        let (mut engine, hero) = mr_content::starter(EngineConfig::default()).unwrap();
        let mut out = Vec::new();
        session(&mut engine, &hero, script.as_bytes(), &mut out, ticks, false).unwrap();
        (engine, String::from_utf8(out).unwrap())
    }

    #[test]
    fn session_greets_and_looks() {
        let (_, out) = play("", 1);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Try help if you need help."));
        assert_eq!(lines.next(), Some("Room"));
    }

    #[test]
    fn session_stops_at_quit() {
        let (engine, out) = play("go door\nquit\ngo door\n", 1);
        assert!(out.contains("Big Room"));
        let hero = engine.get(&"hero".into()).unwrap();
        assert_eq!(hero.get_str("location"), Some("big-room"));
        assert_eq!(engine.clock().tick(), 2);
    }

    #[test]
    fn ticks_per_command_advances_the_clock() {
        let (engine, _) = play("look\nlook\n", 10);
        assert_eq!(engine.clock().tick(), 20);
        assert_eq!(engine.outbox().client_count(), 0);
    }

    #[test]
    fn config_flags_override_the_file() {
        let options = PlayOptions {
            world: None,
            save: None,
            player: "hero".into(),
            config: None,
            tick_seconds: Some(1.0),
            strict: true,
            ticks_per_command: 1,
        };
        let config = engine_config(&options).unwrap();
        assert!((config.tick_seconds - 1.0).abs() < f64::EPSILON);
        assert!(config.require_entitlement);

        let bad = PlayOptions {
            tick_seconds: Some(-1.0),
            ..options
        };
        assert!(engine_config(&bad).is_err());
    }

    #[test]
    fn negative_tick_in_config_file_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"tick_seconds": -1}"#).unwrap();
        let options = PlayOptions {
            world: None,
            save: None,
            player: "hero".into(),
            config: Some(path),
            tick_seconds: None,
            strict: false,
            ticks_per_command: 1,
        };
        let err = engine_config(&options).unwrap_err();
        assert!(err.contains("invalid tick length"), "{err}");

        // A valid flag overrides the bad file value.
        let fixed = PlayOptions {
            tick_seconds: Some(0.5),
            ..options
        };
        assert!(engine_config(&fixed).is_ok());
    }
}
