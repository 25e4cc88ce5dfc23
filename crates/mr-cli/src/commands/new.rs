use std::path::Path;

use mr_engine::EngineConfig;

pub fn run(path: &Path, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    let (engine, _) = mr_content::starter(EngineConfig::default())
        .map_err(|e| format!("cannot build starter world: {e}"))?;
    super::save(&engine, path)?;

    println!(
        "  Wrote {} objects to {}",
        engine.registry().len(),
        path.display()
    );
    Ok(())
}
