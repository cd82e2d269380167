use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CommentService, LikeService, RecipeService, SeaOrmAuthService,
    SeaOrmCommentService, SeaOrmLikeService, SeaOrmRecipeService,
};

/// Everything a request handler can reach. The database is the only
/// mutable state; nothing here caches across requests.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub recipe_service: Arc<dyn RecipeService>,

    pub comment_service: Arc<dyn CommentService>,

    pub like_service: Arc<dyn LikeService>,

    pub auth_service: Arc<dyn AuthService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;
        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let config = Arc::new(RwLock::new(config));

        let recipe_service = Arc::new(SeaOrmRecipeService::new(store.clone(), config.clone()))
            as Arc<dyn RecipeService>;
        let comment_service =
            Arc::new(SeaOrmCommentService::new(store.clone())) as Arc<dyn CommentService>;
        let like_service = Arc::new(SeaOrmLikeService::new(store.clone())) as Arc<dyn LikeService>;
        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), config.clone()))
            as Arc<dyn AuthService>;

        Self {
            config,
            store,
            recipe_service,
            comment_service,
            like_service,
            auth_service,
        }
    }
}
