pub mod serve;

// re-export
pub use serve::serve;

use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::AppConfig, templ_manager::TemplateManager, NewsletterClient, Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    pub async fn build_from_config(config: &AppConfig) -> Result<Self> {
        let tm = TemplateManager::init();
        let newsletter_config = config.newsletter_config.clone();
        let newsletter_timeout = newsletter_config.timeout();
        let newsletter_client = NewsletterClient::new(
            &newsletter_config.url,
            newsletter_config.group_id,
            newsletter_config.api_key,
            newsletter_timeout,
        )?;

        let app_state = AppState::new(tm, newsletter_client);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }
}

pub struct InternalState {
    pub templ_mgr: TemplateManager,
    pub newsletter_client: NewsletterClient,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(templ_mgr: TemplateManager, newsletter_client: NewsletterClient) -> Self {
        AppState(Arc::new(InternalState {
            templ_mgr,
            newsletter_client,
        }))
    }
}
