// Application state shared across all modules

use std::sync::Arc;

use crate::auth::token::TokenAuthority;
use crate::config::AppConfig;
use crate::db::Store;
use crate::services::MediaUploader;

/// Immutable per-process state handed to every request.
///
/// Built once in `main` and never mutated afterwards, so it is shared as
/// `Arc<AppState>` without a lock.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenAuthority>,
    pub uploader: Arc<dyn MediaUploader>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn Store>,
        tokens: TokenAuthority,
        uploader: Arc<dyn MediaUploader>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            tokens: Arc::new(tokens),
            uploader,
        }
    }
}
