use std::sync::Arc;

use ethers::{
    abi::{self, ParamType, Token},
    providers::{ens, Middleware},
    types::{Address, TransactionRequest},
};
use thiserror::Error;

use crate::error::BoxError;

#[derive(Debug, Error)]
pub enum EnsError {
    /// The registry has no resolver for the name.
    #[error("ENS name not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Provider(BoxError),
}

impl EnsError {
    fn provider(err: impl Into<BoxError>) -> Self {
        EnsError::Provider(err.into())
    }
}

/// Resolves ENS names against one network's registry, over that network's
/// shared connection.
pub struct EnsResolver<M> {
    client: Arc<M>,
    registry: Address,
}

/// Normalise a name the way ENS hashes it: UTS-46 mapping (lowercasing included),
/// non-transitional, STD3 rules.
pub fn normalize_name(name: &str) -> Result<String, EnsError> {
    let (normalized, checked) = idna::Config::default()
        .use_std3_ascii_rules(true)
        .transitional_processing(false)
        .to_unicode(name);

    checked.map_err(|errors| {
        EnsError::provider(format!("invalid ENS name {name:?}: {errors:?}"))
    })?;

    Ok(normalized)
}

impl<M> EnsResolver<M> {
    pub fn new(client: Arc<M>, registry: Address) -> Self {
        Self { client, registry }
    }

    pub fn registry(&self) -> Address {
        self.registry
    }
}

impl<M> EnsResolver<M>
where
    M: Middleware + 'static,
    M::Error: 'static,
{
    /// `registry.resolver(node)` then `resolver.addr(node)`, with `node` the namehash of
    /// the normalised name. A name that fails normalisation is a provider error.
    ///
    /// A resolver that exists but holds no address record answers with the zero address,
    /// which is passed through as is.
    pub async fn resolve_address(&self, name: &str) -> Result<Address, EnsError> {
        let normalized = normalize_name(name)?;

        let resolver = self
            .call_for_address(ens::get_resolver(self.registry, &normalized))
            .await?;

        if resolver == Address::zero() {
            return Err(EnsError::NotFound(name.to_owned()));
        }

        self.call_for_address(ens::resolve(
            resolver,
            ens::ADDR_SELECTOR,
            &normalized,
            None,
        ))
        .await
    }

    async fn call_for_address(&self, tx: TransactionRequest) -> Result<Address, EnsError> {
        let data = self
            .client
            .call(&tx.into(), None)
            .await
            .map_err(EnsError::provider)?;

        let tokens =
            abi::decode(&[ParamType::Address], data.as_ref()).map_err(EnsError::provider)?;

        tokens
            .into_iter()
            .next()
            .and_then(Token::into_address)
            .ok_or_else(|| EnsError::provider("ENS call did not return an address"))
    }
}
