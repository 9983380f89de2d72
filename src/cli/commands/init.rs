use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::photo::DirPhotoStore;
use std::fs;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (the file is skipped in test mode)
///  - the SQLite database with all pending migrations
///  - the photo directory
pub fn handle(cli: &Cli) -> AppResult<()> {
    let mut cfg = Config::init_all(cli.db.as_deref(), cli.test)?;
    if let Some(dir) = &cli.photos {
        cfg.photo_dir = dir.clone();
    }

    eprintln!("⚙️  Initializing drivershift…");
    if !cli.test {
        eprintln!("📄 Config file : {}", Config::config_file().display());
    }
    eprintln!("🗄️  Database   : {}", &cfg.database);

    let pool = DbPool::open(&cfg.database)?;

    let photos = DirPhotoStore::new(&cfg.photo_dir, &cfg.photo_base_url);
    fs::create_dir_all(photos.dir())?;
    eprintln!("🖼️  Photos     : {}", photos.dir().display());

    log::ttlog_quiet(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &cfg.database),
    );

    eprintln!("🎉 drivershift initialization completed!");
    Ok(())
}
