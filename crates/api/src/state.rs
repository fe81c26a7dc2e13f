use std::sync::Arc;

use lodge_core::clock::Clock;
use lodge_core::photo_order::PhotoOrderService;
use lodge_core::store::{OrderStore, TrashStore};
use lodge_core::trash::TrashService;
use lodge_db::{DbPool, PgOrderStore, PgTrashStore};
use lodge_docstore::{DocumentBackend, DocumentOrderStore, DocumentTrashStore};

use crate::config::ServerConfig;
use crate::media::MediaClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Primary database pool, absent when no `DATABASE_URL` is configured.
    pub pool: Option<DbPool>,
    pub config: Arc<ServerConfig>,
    pub photo_orders: Arc<PhotoOrderService>,
    pub trash: Arc<TrashService>,
    /// Photo upload forwarding, absent while no media host is configured.
    pub media: Option<Arc<MediaClient>>,
}

impl AppState {
    /// Wire both services over the primary pool (if any) and the fallback
    /// document.
    pub fn new(
        config: ServerConfig,
        pool: Option<DbPool>,
        document: Arc<dyn DocumentBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let primary_orders = pool
            .clone()
            .map(|pool| Arc::new(PgOrderStore::new(pool)) as Arc<dyn OrderStore>);
        let primary_trash = pool
            .clone()
            .map(|pool| Arc::new(PgTrashStore::new(pool)) as Arc<dyn TrashStore>);

        let photo_orders = PhotoOrderService::new(
            primary_orders,
            Arc::new(DocumentOrderStore::new(Arc::clone(&document))),
        );
        let trash = TrashService::new(
            primary_trash,
            Arc::new(DocumentTrashStore::new(document)),
            clock,
        );

        Self {
            pool,
            config: Arc::new(config),
            photo_orders: Arc::new(photo_orders),
            trash: Arc::new(trash),
            media: None,
        }
    }

    /// Enable photo uploads through `media`.
    pub fn with_media(mut self, media: MediaClient) -> Self {
        self.media = Some(Arc::new(media));
        self
    }
}
