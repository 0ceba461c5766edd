use crate::models::settings::DashboardSettings;

use super::coincap::CoinCapProvider;
use super::coingecko::CoinGeckoProvider;
use super::traits::{HistoryProvider, SpotPriceProvider};
use super::yahoo_finance::YahooFinanceProvider;

/// Registry of the available spot and history providers.
///
/// Providers are tried in registration order; later ones are fallbacks.
/// New providers can be added without touching the services that use them.
pub struct ProviderRegistry {
    spot: Vec<Box<dyn SpotPriceProvider>>,
    history: Vec<Box<dyn HistoryProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            spot: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Create a registry with the default public providers.
    pub fn new_with_defaults(settings: &DashboardSettings) -> Self {
        let timeout = settings.timeout();
        let mut registry = Self::new();

        // Primary spot source, any supported currency
        registry.register_spot(Box::new(CoinGeckoProvider::new(timeout)));

        // Fallback spot source, USD only
        registry.register_spot(Box::new(CoinCapProvider::new(timeout)));

        // Daily OHLCV history
        match YahooFinanceProvider::new() {
            Ok(yahoo) => registry.register_history(Box::new(yahoo)),
            Err(e) => tracing::warn!(error = %e, "Yahoo Finance provider unavailable"),
        }

        registry
    }

    pub fn register_spot(&mut self, provider: Box<dyn SpotPriceProvider>) {
        self.spot.push(provider);
    }

    pub fn register_history(&mut self, provider: Box<dyn HistoryProvider>) {
        self.history.push(provider);
    }

    /// Spot providers able to quote in `currency`, in priority order.
    pub fn spot_providers_for(&self, currency: &str) -> Vec<&dyn SpotPriceProvider> {
        self.spot
            .iter()
            .filter(|p| p.supports_currency(currency))
            .map(|p| p.as_ref())
            .collect()
    }

    /// History providers in priority order.
    pub fn history_providers(&self) -> Vec<&dyn HistoryProvider> {
        self.history.iter().map(|p| p.as_ref()).collect()
    }

    pub fn spot_provider_names(&self) -> Vec<String> {
        self.spot.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn history_provider_names(&self) -> Vec<String> {
        self.history.iter().map(|p| p.name().to_string()).collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
