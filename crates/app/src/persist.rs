//! Favourite flags on disk.
//!
//! The registry's extension map is bitcode-encoded into `command_hud.sav` in
//! the working directory: read once at startup, written atomically on exit.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use bevy::prelude::*;

use simulation::SaveableRegistry;

pub const SAVE_PATH: &str = "command_hud.sav";

#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Decode(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "I/O error: {e}"),
            PersistError::Decode(msg) => write!(f, "Decoding error: {msg}"),
        }
    }
}

impl std::error::Error for PersistError {}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::Io(e)
    }
}

pub struct PersistPlugin;

impl Plugin for PersistPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_favorites)
            .add_systems(Last, save_favorites_on_exit);
    }
}

/// Write to `{path}.tmp`, flush, then rename over `path`.
fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");

    let mut file = File::create(&tmp)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn encode_extensions(world: &mut World) -> Option<Vec<u8>> {
    let registry = world.remove_resource::<SaveableRegistry>()?;
    let extensions = registry.save_all(world);
    world.insert_resource(registry);
    Some(bitcode::encode(&extensions))
}

pub fn decode_extensions(world: &mut World, bytes: &[u8]) -> Result<(), PersistError> {
    let extensions: BTreeMap<String, Vec<u8>> =
        bitcode::decode(bytes).map_err(|e| PersistError::Decode(e.to_string()))?;
    let Some(registry) = world.remove_resource::<SaveableRegistry>() else {
        return Ok(());
    };
    registry.load_all(world, &extensions);
    world.insert_resource(registry);
    Ok(())
}

pub fn save_to(world: &mut World, path: &Path) -> Result<(), PersistError> {
    let Some(bytes) = encode_extensions(world) else {
        return Ok(());
    };
    atomic_write(path, &bytes)?;
    Ok(())
}

pub fn load_from(world: &mut World, path: &Path) -> Result<(), PersistError> {
    let bytes = fs::read(path)?;
    decode_extensions(world, &bytes)
}

fn load_favorites(world: &mut World) {
    let path = Path::new(SAVE_PATH);
    if !path.exists() {
        return;
    }
    match load_from(world, path) {
        Ok(()) => info!("Loaded favourites from {}", SAVE_PATH),
        Err(e) => warn!("Ignoring {}: {}", SAVE_PATH, e),
    }
}

fn save_favorites_on_exit(world: &mut World) {
    let exiting = world
        .get_resource::<Events<AppExit>>()
        .is_some_and(|events| !events.is_empty());
    if !exiting {
        return;
    }
    if let Err(e) = save_to(world, Path::new(SAVE_PATH)) {
        error!("Failed to save favourites: {}", e);
    }
}
