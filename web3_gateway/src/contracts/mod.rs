pub mod aragon_app;

use std::{fmt, sync::Arc};

use dashmap::{mapref::entry::Entry, DashMap};

use crate::config::Network;

/// Identifies one cached contract handle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContractCacheKey {
    pub context: String,
    pub network: Network,
    pub address: String,
}

impl ContractCacheKey {
    pub fn new(context: &str, network: Network, address: &str) -> Self {
        Self {
            context: context.to_owned(),
            network,
            address: address.to_owned(),
        }
    }
}

impl fmt::Display for ContractCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.context, self.network, self.address)
    }
}

/// Contract handles, bound lazily and kept for the life of the cache. Nothing is evicted.
pub struct ContractCache<C> {
    contracts: DashMap<ContractCacheKey, Arc<C>>,
}

impl<C> ContractCache<C> {
    pub fn new() -> Self {
        Self {
            contracts: DashMap::new(),
        }
    }

    pub fn get(&self, key: &ContractCacheKey) -> Option<Arc<C>> {
        self.contracts.get(key).map(|contract| contract.clone())
    }

    /// Return the cached handle for `key`, or bind and cache a new one.
    ///
    /// `bind` runs while the key's shard is locked, so concurrent callers for the same key
    /// bind at most once and all get the same handle. A failed bind caches nothing.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: ContractCacheKey,
        bind: impl FnOnce() -> Result<C, E>,
    ) -> Result<Arc<C>, E> {
        match self.contracts.entry(key) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                tracing::debug!(key = %entry.key(), "binding contract");
                let contract = Arc::new(bind()?);
                entry.insert(contract.clone());
                Ok(contract)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

impl<C> Default for ContractCache<C> {
    fn default() -> Self {
        Self::new()
    }
}
