//! CLI execution context.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use mart_cache::Cache;
use mart_commerce::prelude::*;
use mart_data::Credentials;

use crate::config::MartConfig;
use crate::output::Output;

/// Execution context for CLI commands.
///
/// Holds one instance of each store, built once per invocation and shared
/// by reference with the command that runs.
pub struct Context {
    /// CLI configuration.
    pub config: MartConfig,
    /// Where the configuration was loaded from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Local storage for the token, comparison list and recent searches.
    pub cache: Cache,
    pub credentials: Credentials,
    pub cart: Arc<CartStore>,
    pub catalog: CatalogService,
    pub orders: OrderService,
    pub addresses: AddressService,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(resolve(&cwd, path)),
            // Try to find config in current directory or parent directories
            None => MartConfig::find(&cwd),
        };
        let mut config = match &config_path {
            Some(path) => MartConfig::load(path)?,
            None => MartConfig::default(),
        };
        config.apply_env();
        match &config_path {
            Some(path) => output.debug(&format!("Config: {}", path.display())),
            None => output.debug("No config file, using defaults"),
        }

        let data_dir = config.data_dir();
        let cache = Cache::open(&data_dir)
            .with_context(|| format!("Failed to open local storage: {}", data_dir.display()))?;
        output.debug(&format!("Local storage: {}", data_dir.display()));

        let credentials = match std::env::var("MART_TOKEN").ok().filter(|t| !t.is_empty()) {
            Some(token) => Credentials::with_token(token),
            None => Credentials::persistent(cache.clone()),
        };

        let api = ApiClient::from_config(&config.api_config(), credentials.clone())
            .context("Failed to create API client")?;
        let api = Arc::new(api);

        Ok(Self {
            cart: Arc::new(CartStore::new(api.clone())),
            catalog: CatalogService::new(api.clone()),
            orders: OrderService::new(api.clone()),
            addresses: AddressService::new(api),
            config,
            config_path,
            output,
            cwd,
            cache,
            credentials,
        })
    }

    /// The persisted comparison list.
    pub fn comparison(&self) -> ComparisonSelector {
        ComparisonSelector::new(self.cache.clone())
    }

    /// The persisted recent search terms.
    pub fn recent_searches(&self) -> RecentSearches {
        RecentSearches::load(self.cache.clone())
    }

    /// Load the server cart into the store, showing a spinner.
    pub async fn load_cart(&self) -> Cart {
        let spinner = self.output.spinner("Loading cart...");
        let cart = self.cart.fetch_cart().await;
        spinner.finish_and_clear();
        cart
    }

    /// Fetch one product, showing a spinner.
    pub async fn product(&self, id: &str) -> Result<Product> {
        let spinner = self.output.spinner("Loading product...");
        let product = self.catalog.product(&ProductId::from(id)).await;
        spinner.finish_and_clear();
        product.with_context(|| format!("Failed to load product {}", id))
    }

    /// Fail early with a hint when a command needs a signed-in buyer.
    pub fn require_login(&self) -> Result<()> {
        if !self.credentials.is_authenticated() {
            anyhow::bail!("Not logged in. Run `mart login --token <TOKEN>` first.");
        }
        Ok(())
    }
}

fn resolve(cwd: &std::path::Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
