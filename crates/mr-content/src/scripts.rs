use mr_core::{EntityId, Value};
use mr_engine::{Engine, EngineResult, EventPayload, Script};
use tracing::trace;

/// Script name: periodically shouts on tick.
pub const SHOUTER_ON_TICK: &str = "shouter_on_tick";

/// State key: phase within the shout period at the previous tick.
pub const LAST_TICK: &str = "last_tick";
/// State key: shout period in simulated seconds.
pub const SHOUT_FREQUENCY: &str = "shout_frequency";

const DEFAULT_FREQUENCY: f64 = 5.0;

/// All reference scripts.
pub fn all() -> Vec<Script> {
    vec![Script::new(SHOUTER_ON_TICK, shouter_on_tick)]
}

/// Shout once every `shout_frequency` simulated seconds.
///
/// The listener remembers its phase within the period in `last_tick`; a
/// shout happens whenever the phase wraps around.
pub fn shouter_on_tick(
    engine: &mut Engine,
    listener: &EntityId,
    payload: &EventPayload,
) -> EngineResult<()> {
    let Some(time) = payload.time() else {
        return Ok(());
    };
    let Some(shouter) = engine.get(listener) else {
        trace!(%listener, "shouter is gone");
        return Ok(());
    };

    let frequency = shouter
        .get(SHOUT_FREQUENCY)
        .and_then(Value::as_f64)
        .filter(|f| *f > 0.0)
        .unwrap_or(DEFAULT_FREQUENCY);
    let last = shouter.get(LAST_TICK).and_then(Value::as_f64).unwrap_or(0.0);

    let phase = time % frequency;
    if phase < last % frequency {
        engine.use_skill(r#"say "I can shout!""#, listener)?;
    }
    engine.entity_mut(listener)?.set(LAST_TICK, phase);
    Ok(())
}
