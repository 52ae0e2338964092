use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Incidents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incidents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Incidents::Title)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incidents::Description).text().not_null())
                    .col(
                        ColumnDef::new(Incidents::Severity)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Incidents::Status)
                            .string_len(20)
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(Incidents::ReportedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Incidents::ReportedByName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incidents::AssignedTo).uuid().null())
                    .col(
                        ColumnDef::new(Incidents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Incidents::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // インデックス作成
        manager
            .create_index(
                Index::create()
                    .name("idx_incidents_status")
                    .table(Incidents::Table)
                    .col(Incidents::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incidents_created_at")
                    .table(Incidents::Table)
                    .col(Incidents::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Incidents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Incidents {
    Table,
    Id,
    Title,
    Description,
    Severity,
    Status,
    ReportedBy,
    ReportedByName,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
}
