use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ResponseLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResponseLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ResponseLogs::IncidentId).uuid().not_null())
                    .col(
                        ColumnDef::new(ResponseLogs::StepId)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseLogs::Action)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseLogs::UserName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ResponseLogs::Details).text().not_null())
                    .col(
                        ColumnDef::new(ResponseLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_response_logs_incident_id")
                            .from(ResponseLogs::Table, ResponseLogs::IncidentId)
                            .to(Incidents::Table, Incidents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // インデックス作成
        manager
            .create_index(
                Index::create()
                    .name("idx_response_logs_incident_step")
                    .table(ResponseLogs::Table)
                    .col(ResponseLogs::IncidentId)
                    .col(ResponseLogs::StepId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_response_logs_created_at")
                    .table(ResponseLogs::Table)
                    .col(ResponseLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ResponseLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ResponseLogs {
    Table,
    Id,
    IncidentId,
    StepId,
    Action,
    UserName,
    Details,
    CreatedAt,
}

#[derive(Iden)]
enum Incidents {
    Table,
    Id,
}
