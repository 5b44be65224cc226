use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_directory_tables::Teams;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HostMachines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(HostMachines::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(HostMachines::Uuid).string_len(36).not_null().unique_key())
                    .col(ColumnDef::new(HostMachines::Hostname).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(HostMachines::Os).string_len(20).not_null())
                    .col(ColumnDef::new(HostMachines::Ip4).string_len(15).null())
                    .col(ColumnDef::new(HostMachines::Ip6).string_len(39).null())
                    .col(ColumnDef::new(HostMachines::TeamId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_host_machines_team_id")
                            .from(HostMachines::Table, HostMachines::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_host_machines_team_id")
                    .table(HostMachines::Table)
                    .col(HostMachines::TeamId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HostMachines::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum HostMachines {
    Table,
    Id,
    Uuid,
    Hostname,
    Os,
    Ip4,
    Ip6,
    TeamId,
}
