//! # 测试辅助函数

use super::LogFixture;
use entity::logs;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// 创建已迁移的内存数据库
pub async fn create_test_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect sqlite memory db");
    migration::Migrator::up(&db, None)
        .await
        .expect("run migrations");
    Arc::new(db)
}

/// 批量写入 fixtures
pub async fn seed_logs(db: &DatabaseConnection, fixtures: Vec<LogFixture>) -> Vec<logs::Model> {
    let mut rows = Vec::with_capacity(fixtures.len());
    for fixture in fixtures {
        rows.push(fixture.insert(db).await);
    }
    rows
}
