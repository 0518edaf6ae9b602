use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Client-specific columns, keyed by the owning user's id.
#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
    Phone,
    Address,
    Location,
}

/// Lawyer-specific columns, keyed by the owning user's id.
#[derive(DeriveIden)]
enum Lawyers {
    Table,
    Id,
    Specialization,
    BarNumber,
    ActiveCases,
    Rating,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Clients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Clients::Phone).string_len(20).null())
                    .col(ColumnDef::new(Clients::Address).string_len(255).null())
                    .col(ColumnDef::new(Clients::Location).string_len(100).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clients_user_id")
                            .from(Clients::Table, Clients::Id)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Lawyers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Lawyers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Lawyers::Specialization).string_len(100).null())
                    .col(
                        ColumnDef::new(Lawyers::BarNumber)
                            .string_len(50)
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Lawyers::ActiveCases)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Lawyers::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lawyers_user_id")
                            .from(Lawyers::Table, Lawyers::Id)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lawyers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await
    }
}
