use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{applied_versions, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::db::store::SqliteShiftStore;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        // opening already applies pending migrations
        let pool = DbPool::open(&cfg.database)?;

        if *migrate {
            eprintln!("{}▶ Running migrations…{}", CYAN, RESET);
            run_pending_migrations(&pool.conn)?;
            let versions = applied_versions(&pool.conn)?;
            eprintln!(
                "{}✔ Migration completed ({} applied).{}\n",
                GREEN,
                versions.len(),
                RESET
            );
        }

        if *info {
            let store = SqliteShiftStore::new(&pool.conn);
            stats::print_db_info(&store, &cfg.database)?;
        }

        if *check {
            eprintln!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                eprintln!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                eprintln!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }

        if *vacuum {
            eprintln!("{}▶ Running VACUUM…{}", CYAN, RESET);
            pool.conn.execute_batch("VACUUM;")?;
            eprintln!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
