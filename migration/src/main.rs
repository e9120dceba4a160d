use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    // 未设置 DATABASE_URL 时使用本地开发库
    if std::env::var("DATABASE_URL").is_err() {
        let db_path = if std::env::current_dir().is_ok_and(|dir| dir.ends_with("migration")) {
            "../data/dev.db"
        } else {
            "data/dev.db"
        };
        unsafe {
            std::env::set_var("DATABASE_URL", format!("sqlite://{db_path}?mode=rwc"));
        }
    }
    cli::run_cli(migration::Migrator).await;
}
