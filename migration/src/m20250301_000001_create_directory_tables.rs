use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Teams::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Teams::Uuid).string_len(36).not_null().unique_key())
                    .col(ColumnDef::new(Teams::Name).string_len(30).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::Uuid).string_len(36).not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).string_len(30).not_null())
                    .col(ColumnDef::new(Users::Email).string_len(30).not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Admin).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::SlackId).string_len(30).null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        // Membership rows go away with either side; the team delete guard lives in the entity hook.
        manager
            .create_table(
                Table::create()
                    .table(TeamUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TeamUsers::TeamId).integer().not_null())
                    .col(ColumnDef::new(TeamUsers::UserId).integer().not_null())
                    .primary_key(Index::create().col(TeamUsers::TeamId).col(TeamUsers::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_users_team_id")
                            .from(TeamUsers::Table, TeamUsers::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_users_user_id")
                            .from(TeamUsers::Table, TeamUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_team_users_user_id")
                    .table(TeamUsers::Table)
                    .col(TeamUsers::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TeamUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Teams {
    Table,
    Id,
    Uuid,
    Name,
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Uuid,
    Name,
    Email,
    PasswordHash,
    Admin,
    SlackId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeamUsers {
    Table,
    TeamId,
    UserId,
}
