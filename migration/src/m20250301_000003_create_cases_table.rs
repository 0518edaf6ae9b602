use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `cases` table and its columns.
#[derive(DeriveIden)]
enum Cases {
    Table,
    Id,
    Title,
    Description,
    Category,
    Status,
    Urgency,
    CommunicationMethod,
    SpecialRequirements,
    CreatedAt,
    UpdatedAt,
    ClientId,
    LawyerId,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Lawyers {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cases::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Cases::Description).text().not_null())
                    .col(ColumnDef::new(Cases::Category).string_len(100).null())
                    .col(
                        ColumnDef::new(Cases::Status)
                            .string_len(20)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(Cases::Urgency)
                            .string_len(20)
                            .not_null()
                            .default("low"),
                    )
                    .col(
                        ColumnDef::new(Cases::CommunicationMethod)
                            .string_len(100)
                            .not_null()
                            .default("Email"),
                    )
                    .col(ColumnDef::new(Cases::SpecialRequirements).text().null())
                    .col(
                        ColumnDef::new(Cases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Cases::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Cases::LawyerId).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cases_client_id")
                            .from(Cases::Table, Cases::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cases_lawyer_id")
                            .from(Cases::Table, Cases::LawyerId)
                            .to(Lawyers::Table, Lawyers::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cases::Table).to_owned())
            .await
    }
}
