use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Providers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Providers::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Providers::Uuid).string_len(36).not_null().unique_key())
                    .col(ColumnDef::new(Providers::Name).string_len(30).not_null().unique_key())
                    .col(ColumnDef::new(Providers::ProviderType).string_len(10).not_null())
                    .to_owned(),
            )
            .await?;

        // Fields are owned by their provider and replaced wholesale on update.
        manager
            .create_table(
                Table::create()
                    .table(ProviderFields::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProviderFields::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(ProviderFields::ProviderId).integer().not_null())
                    .col(ColumnDef::new(ProviderFields::Position).integer().not_null())
                    .col(ColumnDef::new(ProviderFields::Key).string_len(50).not_null())
                    .col(ColumnDef::new(ProviderFields::Value).string_len(200).not_null())
                    .col(ColumnDef::new(ProviderFields::FieldType).string_len(10).not_null())
                    .col(ColumnDef::new(ProviderFields::Required).boolean().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_fields_provider_id")
                            .from(ProviderFields::Table, ProviderFields::ProviderId)
                            .to(Providers::Table, Providers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_provider_fields_provider_id")
                    .table(ProviderFields::Table)
                    .col(ProviderFields::ProviderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProviderFields::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Providers::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Providers {
    Table,
    Id,
    Uuid,
    Name,
    ProviderType,
}

#[derive(DeriveIden)]
enum ProviderFields {
    Table,
    Id,
    ProviderId,
    Position,
    Key,
    Value,
    FieldType,
    Required,
}
