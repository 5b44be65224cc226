// Bootstrap command: first admin account plus their team, in one transaction

use sea_orm::TransactionTrait;

use crate::app_data::AppData;
use crate::coordinators::UserCoordinator;
use crate::errors::InternalError;
use crate::errors::internal::DatabaseError;
use crate::types::dto::user::CreateUserRequest;
use crate::types::internal::RequestContext;

/// Input of `aims-backend bootstrap`
#[derive(Debug, Clone)]
pub struct BootstrapRequest {
    pub email: String,
    pub name: String,
    pub team: String,
    pub password: Option<String>,
}

/// What was created; `generated_password` is set only when none was supplied
#[derive(Debug)]
pub struct BootstrapOutcome {
    pub user_uuid: String,
    pub team_uuid: String,
    pub generated_password: Option<String>,
}

/// Create the admin and (if needed) the team; nothing is kept on failure
pub async fn bootstrap_admin(
    app_data: &AppData,
    request: BootstrapRequest,
) -> Result<BootstrapOutcome, Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("bootstrap");

    let (password, generated_password) = match request.password {
        Some(password) => (password, None),
        None => {
            let password = app_data.crypto_provider.generate_secure_password();
            (password.clone(), Some(password))
        }
    };

    let txn = app_data
        .db
        .begin()
        .await
        .map_err(|source| InternalError::Database(DatabaseError::TransactionBegin { source }))?;

    let team = match app_data.team_store.find_by_name(&txn, &request.team).await? {
        Some(team) => team,
        None => app_data.team_store.create(&txn, &request.team).await?,
    };

    let user = UserCoordinator::new(app_data)
        .create(
            &ctx,
            &txn,
            CreateUserRequest {
                name: request.name,
                email: request.email,
                password,
                teams: vec![team.uuid.clone()],
                slack_id: None,
                admin: true,
            },
        )
        .await?;

    txn.commit()
        .await
        .map_err(|source| InternalError::Database(DatabaseError::TransactionCommit { source }))?;

    tracing::info!(request_id = %ctx.request_id, user_uuid = %user.uuid, team_uuid = %team.uuid, "admin bootstrapped");

    Ok(BootstrapOutcome {
        user_uuid: user.uuid,
        team_uuid: team.uuid,
        generated_password,
    })
}

/// CLI entry: run the bootstrap and print the result
pub async fn run(app_data: &AppData, request: BootstrapRequest) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== AIMS Bootstrap ===\n");
    let email = request.email.clone();
    let outcome = bootstrap_admin(app_data, request).await?;

    println!("Admin created: {} ({})", email, outcome.user_uuid);
    println!("Team: {}", outcome.team_uuid);
    if let Some(password) = outcome.generated_password {
        println!("\nGenerated password (shown once): {}", password);
    }
    Ok(())
}
