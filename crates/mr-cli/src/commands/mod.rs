pub mod inspect;
pub mod new;
pub mod play;

use std::fs;
use std::path::Path;

use mr_core::Snapshot;
use mr_engine::{Engine, EngineConfig};

/// Read an engine configuration file.
pub fn load_config(path: &Path) -> Result<EngineConfig, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid config {}: {e}", path.display()))
}

/// Read a snapshot file.
fn load_snapshot(path: &Path) -> Result<Snapshot, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Snapshot::from_json(&text).map_err(|e| format!("invalid snapshot {}: {e}", path.display()))
}

/// An engine with the reference content installed and the snapshot at
/// `path` restored into it.
fn engine_from_file(config: EngineConfig, path: &Path) -> Result<Engine, String> {
    let snapshot = load_snapshot(path)?;
    let mut engine = Engine::new(config);
    mr_content::install(&mut engine).map_err(|e| format!("content setup failed: {e}"))?;
    engine
        .load_state(&snapshot)
        .map_err(|e| format!("cannot restore {}: {e}", path.display()))?;
    Ok(engine)
}

/// Write the engine's snapshot to `path` as indented JSON.
fn save(engine: &Engine, path: &Path) -> Result<(), String> {
    let snapshot = engine
        .dump_state()
        .map_err(|e| format!("cannot snapshot world: {e}"))?;
    let json = snapshot
        .to_json_pretty()
        .map_err(|e| format!("cannot encode snapshot: {e}"))?;
    fs::write(path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))
}
