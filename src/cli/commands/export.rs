use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::store::SqliteShiftStore;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        force,
    } = cmd
    {
        let pool = DbPool::open(&cfg.database)?;
        let store = SqliteShiftStore::new(&pool.conn);

        let n = ExportLogic::export(&store, *format, file, range.as_deref(), *force)?;
        if n > 0 {
            ttlog_quiet(
                &pool.conn,
                "export",
                file,
                &format!("{n} shifts as {}", format.as_str()),
            );
        }
    }
    Ok(())
}
