use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ResponseActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResponseActions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ResponseActions::IncidentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseActions::StepId)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseActions::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseActions::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ResponseActions::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ResponseActions::CompletedById)
                            .uuid()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ResponseActions::CompletedByName)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ResponseActions::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ResponseActions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_response_actions_incident_id")
                            .from(ResponseActions::Table, ResponseActions::IncidentId)
                            .to(Incidents::Table, Incidents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_response_actions_incident_step")
                    .table(ResponseActions::Table)
                    .col(ResponseActions::IncidentId)
                    .col(ResponseActions::StepId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ResponseActions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ResponseActions {
    Table,
    Id,
    IncidentId,
    StepId,
    Description,
    Completed,
    CompletedAt,
    CompletedById,
    CompletedByName,
    Position,
    CreatedAt,
}

#[derive(Iden)]
enum Incidents {
    Table,
    Id,
}
