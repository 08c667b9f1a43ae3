use std::sync::Arc;
use tower_auth_metrics::MetricsService;
use tower_auth_models::Settings;
use tower_auth_store::{SessionCache, UserStore};
use tower_auth_tokens::TokenSigner;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: UserStore,
    pub cache: SessionCache,
    pub signer: TokenSigner,
    pub metrics: Arc<MetricsService>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        store: UserStore,
        cache: SessionCache,
        metrics: Arc<MetricsService>,
    ) -> Self {
        let signer = TokenSigner::new(&settings.token_key);
        Self {
            settings: Arc::new(settings),
            store,
            cache,
            signer,
            metrics,
        }
    }
}
