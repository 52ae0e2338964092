// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// マイグレーションモジュール
mod m20260801_000001_create_incidents_table;
mod m20260801_000002_create_response_steps_table;
mod m20260801_000003_create_response_actions_table;
mod m20260801_000004_create_response_evidence_table;
mod m20260801_000005_create_response_logs_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル作成（依存関係なし）
            Box::new(m20260801_000001_create_incidents_table::Migration),
            // 2. 依存テーブル作成（incidentsテーブルに依存）
            Box::new(m20260801_000002_create_response_steps_table::Migration),
            Box::new(m20260801_000003_create_response_actions_table::Migration),
            Box::new(m20260801_000004_create_response_evidence_table::Migration),
            Box::new(m20260801_000005_create_response_logs_table::Migration),
        ]
    }
}
