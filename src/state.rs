// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{saml::RelyingPartyRegistry, wallet::WalletApi};

#[derive(Clone)]
pub struct AppState {
    /// Built once at startup, read-only afterwards.
    pub registry: Arc<RelyingPartyRegistry>,
    pub wallet: Arc<dyn WalletApi>,
}

impl AppState {
    pub fn new(registry: RelyingPartyRegistry, wallet: Arc<dyn WalletApi>) -> Self {
        Self {
            registry: Arc::new(registry),
            wallet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{TokenImage, WalletFuture};

    struct EmptyWallet;

    impl WalletApi for EmptyWallet {
        fn token_image(&self) -> WalletFuture<'_> {
            Box::pin(async {
                Ok(TokenImage {
                    bytes: Vec::new(),
                    content_type: None,
                })
            })
        }
    }

    #[test]
    fn clones_share_registry_and_wallet() {
        let state = AppState::new(RelyingPartyRegistry::default(), Arc::new(EmptyWallet));
        let cloned = state.clone();

        assert!(Arc::ptr_eq(&state.registry, &cloned.registry));
        assert!(Arc::ptr_eq(&state.wallet, &cloned.wallet));
        assert!(cloned.registry.is_empty());
    }
}
