use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Cases {
    Table,
    ClientId,
    LawyerId,
    Status,
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    CaseId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on cases.client_id for a client's case list
        manager
            .create_index(
                Index::create()
                    .name("idx_cases_client_id")
                    .table(Cases::Table)
                    .col(Cases::ClientId)
                    .to_owned(),
            )
            .await?;

        // Index on cases.lawyer_id for a lawyer's assigned cases
        manager
            .create_index(
                Index::create()
                    .name("idx_cases_lawyer_id")
                    .table(Cases::Table)
                    .col(Cases::LawyerId)
                    .to_owned(),
            )
            .await?;

        // Available-case listing and closed-case counts filter on status
        manager
            .create_index(
                Index::create()
                    .name("idx_cases_status")
                    .table(Cases::Table)
                    .col(Cases::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_documents_case_id")
                    .table(Documents::Table)
                    .col(Documents::CaseId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_documents_case_id")
                    .table(Documents::Table)
                    .to_owned(),
            )
            .await?;

        for name in ["idx_cases_status", "idx_cases_lawyer_id", "idx_cases_client_id"] {
            manager
                .drop_index(Index::drop().name(name).table(Cases::Table).to_owned())
                .await?;
        }

        Ok(())
    }
}
