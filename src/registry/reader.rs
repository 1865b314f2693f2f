use ethers::utils::to_checksum;
use futures::future::try_join_all;

use super::Registry;
use crate::error::RegistryError;
use crate::state::MintEntry;

/// Fetch every registered name with its record and owner.
///
/// Per-name lookups run concurrently, but the result is only returned once
/// all of them have completed. Any failure fails the whole fetch.
pub async fn fetch_all(registry: &dyn Registry) -> Result<Vec<MintEntry>, RegistryError> {
    let names = registry.all_names().await?;

    let lookups = names.into_iter().enumerate().map(|(id, name)| async move {
        let (record, owner) = futures::try_join!(registry.record(&name), registry.owner(&name))?;
        Ok::<_, RegistryError>(MintEntry {
            id,
            name,
            record,
            owner: to_checksum(&owner, None),
        })
    });

    try_join_all(lookups).await
}
