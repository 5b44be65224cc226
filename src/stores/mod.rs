// Stores layer - data access; every call runs on the caller's connection or transaction
pub mod host_store;
pub mod incident_store;
pub mod provider_store;
pub mod team_store;
pub mod user_store;

pub use host_store::HostStore;
pub use incident_store::{IncidentFilter, IncidentStore};
pub use provider_store::ProviderStore;
pub use team_store::TeamStore;
pub use user_store::UserStore;

use sea_orm::{ConnectionTrait, PaginatorTrait, SelectorTrait};

use crate::errors::InternalError;
use crate::types::internal::PageParams;

/// Run `select` as one page plus the total row count
pub(crate) async fn fetch_page<'db, C, S>(
    conn: &'db C,
    select: S,
    params: PageParams,
    operation: &str,
) -> Result<(Vec<<S::Selector as SelectorTrait>::Item>, u64), InternalError>
where
    C: ConnectionTrait,
    S: PaginatorTrait<'db, C>,
{
    let paginator = select.paginate(conn, params.page_size);
    let total = paginator
        .num_items()
        .await
        .map_err(|e| InternalError::database(operation, e))?;
    let items = paginator
        .fetch_page(params.page - 1)
        .await
        .map_err(|e| InternalError::database(operation, e))?;

    Ok((items, total))
}
