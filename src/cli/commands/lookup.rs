use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::lookup::LookupLogic;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Lookup { import } = cmd {
        let pool = DbPool::open(&cfg.database)?;

        if let Some(file) = import {
            let n = LookupLogic::import_csv(&pool.conn, Path::new(file))?;
            ttlog_quiet(&pool.conn, "import", file, &format!("{n} reference rows"));
            success(format!("Imported {n} reference rows from {file}"));
        }

        let data = LookupLogic::load(&pool.conn)?;
        println!("{}", serde_json::to_string_pretty(&data)?);
    }
    Ok(())
}
