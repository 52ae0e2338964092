use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ResponseEvidence::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResponseEvidence::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ResponseEvidence::IncidentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseEvidence::StepId)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseEvidence::Filename)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseEvidence::StorageKey)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseEvidence::FileType)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseEvidence::FileSize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseEvidence::UploadedById)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseEvidence::UploadedByName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResponseEvidence::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_response_evidence_incident_id")
                            .from(ResponseEvidence::Table, ResponseEvidence::IncidentId)
                            .to(Incidents::Table, Incidents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_response_evidence_incident_step")
                    .table(ResponseEvidence::Table)
                    .col(ResponseEvidence::IncidentId)
                    .col(ResponseEvidence::StepId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ResponseEvidence::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ResponseEvidence {
    Table,
    Id,
    IncidentId,
    StepId,
    Filename,
    StorageKey,
    FileType,
    FileSize,
    UploadedById,
    UploadedByName,
    UploadedAt,
}

#[derive(Iden)]
enum Incidents {
    Table,
    Id,
}
