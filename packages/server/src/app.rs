//! Dependency wiring shared by the binary and the integration tests.

use std::{sync::Arc, time::Duration};

use lectern_shared::time::{Clock, SystemClock};

use crate::{
    config::ServerConfig,
    domain::{BlobStore, BookRepository, ChatRepository, PageRenderer, RepositoryError},
    infrastructure::{
        ChatHub, HttpBlobStore, InMemoryBlobStore, InMemoryBookRepository, InMemoryChatRepository,
        PdfiumRenderer, PgBookRepository, PgChatRepository, TaskExecutor, connect_pool,
    },
    ui::{LOCAL_BLOB_PATH, state::AppState},
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetBookUseCase,
        GetChatHistoryUseCase, GetChatStatsUseCase, GetOnlineUsersUseCase, ProcessBookUseCase,
        SendMessageUseCase, UploadBookUseCase,
    },
};

/// External collaborators
pub struct Collaborators {
    pub chat_repository: Arc<dyn ChatRepository>,
    pub book_repository: Arc<dyn BookRepository>,
    pub blob_store: Arc<dyn BlobStore>,
    /// Set when `blob_store` is in-memory; its objects are then served by this server
    pub local_objects: Option<Arc<InMemoryBlobStore>>,
    pub renderer: Arc<dyn PageRenderer>,
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    /// In-memory stores and the system clock
    ///
    /// Object URLs are `{public_base_url}/blobs/{bucket}/{path}`.
    pub fn in_memory(public_base_url: &str, renderer: Arc<dyn PageRenderer>) -> Self {
        let objects = local_blob_store(public_base_url);
        Self {
            chat_repository: Arc::new(InMemoryChatRepository::new()),
            book_repository: Arc::new(InMemoryBookRepository::new()),
            blob_store: objects.clone(),
            local_objects: Some(objects),
            renderer,
            clock: Arc::new(SystemClock),
        }
    }

    /// Collaborators selected by the configuration
    pub async fn from_config(config: &ServerConfig) -> Result<Self, RepositoryError> {
        let chat_repository: Arc<dyn ChatRepository>;
        let book_repository: Arc<dyn BookRepository>;
        match &config.database_url {
            Some(url) => {
                let pool = connect_pool(url, config.max_connections).await?;
                chat_repository = Arc::new(PgChatRepository::new(pool.clone()));
                book_repository = Arc::new(PgBookRepository::new(pool));
            }
            None => {
                tracing::warn!("DATABASE_URL is not set; using in-memory repositories");
                chat_repository = Arc::new(InMemoryChatRepository::new());
                book_repository = Arc::new(InMemoryBookRepository::new());
            }
        }

        let blob_store: Arc<dyn BlobStore>;
        let mut local_objects = None;
        match &config.blob_endpoint {
            Some(endpoint) => blob_store = Arc::new(HttpBlobStore::new(endpoint.as_str())),
            None => {
                tracing::warn!("Blob endpoint is not set; using an in-memory object store");
                let objects = local_blob_store(&config.public_base_url());
                blob_store = objects.clone();
                local_objects = Some(objects);
            }
        }

        Ok(Self {
            chat_repository,
            book_repository,
            blob_store,
            local_objects,
            renderer: Arc::new(PdfiumRenderer::new(config.pdfium_dir.clone())),
            clock: Arc::new(SystemClock),
        })
    }
}

fn local_blob_store(public_base_url: &str) -> Arc<InMemoryBlobStore> {
    Arc::new(InMemoryBlobStore::new(format!(
        "{}{}",
        public_base_url.trim_end_matches('/'),
        LOCAL_BLOB_PATH
    )))
}

/// Tunables of the wired application
#[derive(Debug, Clone)]
pub struct Settings {
    pub workers: usize,
    pub mailbox_capacity: usize,
    pub book_timeout: Duration,
    pub pdf_bucket: String,
    pub pages_bucket: String,
    pub heartbeat_interval: Duration,
}

impl From<&ServerConfig> for Settings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            workers: config.workers,
            mailbox_capacity: config.mailbox_capacity,
            book_timeout: config.book_timeout(),
            pdf_bucket: config.pdf_bucket.clone(),
            pages_bucket: config.pages_bucket.clone(),
            heartbeat_interval: config.heartbeat_interval(),
        }
    }
}

/// The wired application
pub struct App {
    pub executor: Arc<TaskExecutor>,
    pub hub: Arc<ChatHub>,
    pub state: AppState,
}

impl App {
    // Initialize dependencies in order:
    // 1. Executor
    // 2. Hub
    // 3. UseCases
    // 4. AppState
    pub fn build(settings: &Settings, collaborators: Collaborators) -> Self {
        let Collaborators {
            chat_repository,
            book_repository,
            blob_store,
            local_objects,
            renderer,
            clock,
        } = collaborators;

        // 1. Executor (shared by presence notices and book processing)
        let executor = TaskExecutor::new(settings.workers);

        // 2. Hub
        let hub = ChatHub::new(chat_repository.clone(), executor.clone(), clock.clone());

        // 3. UseCases
        let process_book_usecase = Arc::new(ProcessBookUseCase::new(
            book_repository.clone(),
            blob_store.clone(),
            renderer,
            settings.pages_bucket.clone(),
            settings.book_timeout,
        ));
        let state = AppState {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                hub.clone(),
                settings.mailbox_capacity,
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                hub.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(hub.clone(), clock)),
            get_chat_history_usecase: Arc::new(GetChatHistoryUseCase::new(chat_repository)),
            get_chat_stats_usecase: Arc::new(GetChatStatsUseCase::new(hub.clone())),
            get_online_users_usecase: Arc::new(GetOnlineUsersUseCase::new(hub.clone())),
            upload_book_usecase: Arc::new(UploadBookUseCase::new(
                book_repository.clone(),
                blob_store,
                executor.clone(),
                process_book_usecase,
                settings.pdf_bucket.clone(),
            )),
            get_book_usecase: Arc::new(GetBookUseCase::new(book_repository)),
            local_objects,
            heartbeat_interval: settings.heartbeat_interval,
        };

        Self {
            executor,
            hub,
            state,
        }
    }
}

