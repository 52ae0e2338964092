use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ResponseSteps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResponseSteps::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ResponseSteps::IncidentId).uuid().not_null())
                    .col(
                        ColumnDef::new(ResponseSteps::StepId)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseSteps::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(ResponseSteps::Notes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ResponseSteps::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(ResponseSteps::AssignedTo).uuid().null())
                    .col(
                        ColumnDef::new(ResponseSteps::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ResponseSteps::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_response_steps_incident_id")
                            .from(ResponseSteps::Table, ResponseSteps::IncidentId)
                            .to(Incidents::Table, Incidents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // (incident_id, step_id)ごとに高々1行
        manager
            .create_index(
                Index::create()
                    .name("idx_response_steps_incident_step")
                    .table(ResponseSteps::Table)
                    .col(ResponseSteps::IncidentId)
                    .col(ResponseSteps::StepId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ResponseSteps::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ResponseSteps {
    Table,
    Id,
    IncidentId,
    StepId,
    Status,
    Notes,
    CompletedAt,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Incidents {
    Table,
    Id,
}
