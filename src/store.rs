use std::{fs, io, path::Path};

use crate::models::Db;

pub const DB_PATH: &str = "data/db.json";

pub fn load_db() -> io::Result<Db> {
    load_db_from(Path::new(DB_PATH))
}

// A missing file is an empty datastore, not an error.
pub fn load_db_from(path: &Path) -> io::Result<Db> {
    if !path.exists() {
        return Ok(Db::default());
    }
    let text = fs::read_to_string(path)?;
    let db: Db =
        serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(db)
}

pub fn save_db(db: &Db) -> io::Result<()> {
    save_db_to(Path::new(DB_PATH), db)
}

// Write-then-rename so a crash mid-save never truncates the datastore.
pub fn save_db_to(path: &Path, db: &Db) -> io::Result<()> {
    let text = serde_json::to_string_pretty(db)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, text)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
