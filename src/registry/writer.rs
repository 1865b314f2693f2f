use ethers::types::{H256, U256};

use super::{Registry, TxOutcome};
use crate::error::RegistryError;
use crate::wallet::Chain;

/// Result of a mint attempt that reached the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintOutcome {
    /// Name registered and record set
    Minted { register_tx: H256, record_tx: H256 },
    /// Registration mined with a failure status; no record was set
    Reverted { register_tx: H256 },
    /// Registered, but the caller no longer wanted the record set
    Abandoned { register_tx: H256 },
}

/// Register `name` and then set its record.
///
/// The record transaction is only submitted after the registration is
/// confirmed with a success status, and only while `still_wanted` holds.
pub async fn register_with_record(
    registry: &dyn Registry,
    chain: Chain,
    name: &str,
    record: &str,
    fee: U256,
    still_wanted: impl Fn() -> bool,
) -> Result<MintOutcome, RegistryError> {
    tracing::info!(domain = %name, fee = %fee, "Submitting registration, waiting for wallet");

    let registered = registry.register(name, fee).await?;
    if !registered.succeeded {
        tracing::warn!(domain = %name, tx = ?registered.hash, "Registration reverted");
        return Ok(MintOutcome::Reverted {
            register_tx: registered.hash,
        });
    }
    log_confirmed(chain, "Domain minted", name, &registered);

    if !still_wanted() {
        tracing::info!(domain = %name, "Skipping record, mint was abandoned");
        return Ok(MintOutcome::Abandoned {
            register_tx: registered.hash,
        });
    }

    let recorded = registry.set_record(name, record).await?;
    log_confirmed(chain, "Record set", name, &recorded);

    Ok(MintOutcome::Minted {
        register_tx: registered.hash,
        record_tx: recorded.hash,
    })
}

/// Set the record of an existing name.
///
/// The receipt status is passed through but not checked here.
pub async fn update_record(
    registry: &dyn Registry,
    chain: Chain,
    name: &str,
    record: &str,
) -> Result<TxOutcome, RegistryError> {
    tracing::info!(domain = %name, record = %record, "Updating domain record");

    let outcome = registry.set_record(name, record).await?;
    log_confirmed(chain, "Record set", name, &outcome);
    Ok(outcome)
}

fn log_confirmed(chain: Chain, what: &str, name: &str, outcome: &TxOutcome) {
    match chain.tx_url(outcome.hash) {
        Some(url) => tracing::info!(domain = %name, %url, "{what}"),
        None => tracing::info!(domain = %name, tx = ?outcome.hash, "{what}"),
    }
}
