use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_directory_tables::{Teams, Users};
use crate::m20250301_000002_create_host_machines::HostMachines;

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
                    .col(ColumnDef::new(Incidents::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Incidents::Uuid).string_len(36).not_null().unique_key())
                    .col(ColumnDef::new(Incidents::Summary).string_len(100).not_null())
                    .col(ColumnDef::new(Incidents::Description).string_len(500).not_null())
                    .col(ColumnDef::new(Incidents::Hash).string_len(64).not_null().unique_key())
                    .col(ColumnDef::new(Incidents::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Incidents::ResolvedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Incidents::ResolvedById).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incidents_resolved_by_id")
                            .from(Incidents::Table, Incidents::ResolvedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IncidentHosts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IncidentHosts::IncidentId).integer().not_null())
                    .col(ColumnDef::new(IncidentHosts::HostId).integer().not_null())
                    .primary_key(Index::create().col(IncidentHosts::IncidentId).col(IncidentHosts::HostId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_hosts_incident_id")
                            .from(IncidentHosts::Table, IncidentHosts::IncidentId)
                            .to(Incidents::Table, Incidents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_hosts_host_id")
                            .from(IncidentHosts::Table, IncidentHosts::HostId)
                            .to(HostMachines::Table, HostMachines::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IncidentResolutionTeams::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IncidentResolutionTeams::IncidentId).integer().not_null())
                    .col(ColumnDef::new(IncidentResolutionTeams::TeamId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(IncidentResolutionTeams::IncidentId)
                            .col(IncidentResolutionTeams::TeamId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_resolution_teams_incident_id")
                            .from(IncidentResolutionTeams::Table, IncidentResolutionTeams::IncidentId)
                            .to(Incidents::Table, Incidents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_resolution_teams_team_id")
                            .from(IncidentResolutionTeams::Table, IncidentResolutionTeams::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IncidentComments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IncidentComments::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(IncidentComments::Uuid).string_len(36).not_null().unique_key())
                    .col(ColumnDef::new(IncidentComments::IncidentId).integer().not_null())
                    .col(ColumnDef::new(IncidentComments::CommentedById).integer().not_null())
                    .col(ColumnDef::new(IncidentComments::Comment).string_len(200).not_null())
                    .col(ColumnDef::new(IncidentComments::CommentedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_comments_incident_id")
                            .from(IncidentComments::Table, IncidentComments::IncidentId)
                            .to(Incidents::Table, Incidents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_comments_commented_by_id")
                            .from(IncidentComments::Table, IncidentComments::CommentedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incident_comments_incident_id")
                    .table(IncidentComments::Table)
                    .col(IncidentComments::IncidentId)
                    .col(IncidentComments::CommentedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incident_hosts_host_id")
                    .table(IncidentHosts::Table)
                    .col(IncidentHosts::HostId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incident_resolution_teams_team_id")
                    .table(IncidentResolutionTeams::Table)
                    .col(IncidentResolutionTeams::TeamId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IncidentComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncidentResolutionTeams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncidentHosts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incidents::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Incidents {
    Table,
    Id,
    Uuid,
    Summary,
    Description,
    Hash,
    CreatedAt,
    ResolvedAt,
    ResolvedById,
}

#[derive(DeriveIden)]
enum IncidentHosts {
    Table,
    IncidentId,
    HostId,
}

#[derive(DeriveIden)]
enum IncidentResolutionTeams {
    Table,
    IncidentId,
    TeamId,
}

#[derive(DeriveIden)]
enum IncidentComments {
    Table,
    Id,
    Uuid,
    IncidentId,
    CommentedById,
    Comment,
    CommentedAt,
}
