use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::api::MarketSource;
use crate::config::Config;
use crate::poller::RefreshTimer;
use crate::state::{Action, Effect, ViewState};
use crate::theme::{self, Theme};
use crate::types::*;

/// Top-level view: owns the view state, runs the fetches the reducer asks
/// for and keeps the cursor/scroll bookkeeping for the table.
pub struct App {
    pub state: ViewState,
    pub config: Config,
    pub input_mode: InputMode,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub page_height: usize,
    pub last_refresh_display: String,
    pub quit: bool,
    source: Arc<dyn MarketSource>,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
    timer: Option<RefreshTimer>,
}

impl App {
    pub fn new(config: Config, source: Arc<dyn MarketSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let selected = Some(config.default_asset.clone()).filter(|id| !id.is_empty());
        Self {
            state: ViewState::new(config.currency, config.theme, selected),
            config,
            input_mode: InputMode::Normal,
            cursor: 0,
            scroll_offset: 0,
            page_height: 20,
            last_refresh_display: String::new(),
            quit: false,
            source,
            tx,
            rx,
            timer: None,
        }
    }

    pub fn theme(&self) -> Theme {
        theme::for_mode(self.state.theme)
    }

    /// Initial load plus the periodic refresh. Pair with [`App::unmount`].
    pub fn mount(&mut self) {
        info!(
            currency = self.state.currency.code(),
            refresh_secs = self.config.refresh_interval_secs,
            "mounting dashboard"
        );
        self.dispatch(Action::Mounted);
        self.timer = Some(RefreshTimer::start(self.config.refresh_interval(), self.tx.clone()));
    }

    pub fn unmount(&mut self) {
        if self.timer.take().is_some() {
            info!("dashboard unmounted");
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        for effect in self.state.dispatch(action) {
            self.run(effect);
        }
        self.clamp_selection();
    }

    /// Applies every fetch result and timer tick that arrived since the last call.
    pub fn drain_outcomes(&mut self) {
        while let Ok(action) = self.rx.try_recv() {
            self.dispatch(action);
        }
    }

    fn run(&self, effect: Effect) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        match effect {
            Effect::FetchListing(ticket) => {
                let limit = self.config.listing_limit;
                tokio::spawn(async move {
                    let action = match source.fetch_markets(ticket.currency, limit).await {
                        Ok(assets) => {
                            info!(currency = ticket.currency.code(), count = assets.len(), "listing loaded");
                            Action::ListingLoaded {
                                ticket,
                                assets,
                                at: Instant::now(),
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, kind = e.kind(), currency = ticket.currency.code(), "listing fetch failed");
                            Action::ListingFailed {
                                ticket,
                                at: Instant::now(),
                            }
                        }
                    };
                    let _ = tx.send(action);
                });
            }
            Effect::FetchHistory(ticket) => {
                let days = self.config.history_days;
                let asset_id = ticket.asset_id.clone().unwrap_or_default();
                tokio::spawn(async move {
                    let action = match source.fetch_history(&asset_id, ticket.currency, days).await {
                        Ok(points) => {
                            info!(asset = %asset_id, count = points.len(), "history loaded");
                            Action::HistoryLoaded { ticket, points }
                        }
                        Err(e) => {
                            warn!(error = %e, kind = e.kind(), asset = %asset_id, "history fetch failed");
                            Action::HistoryFailed {
                                ticket,
                                at: Instant::now(),
                            }
                        }
                    };
                    let _ = tx.send(action);
                });
            }
        }
    }

    pub fn visible_assets(&self) -> Vec<&Asset> {
        self.state.visible_assets()
    }

    pub fn cursor_asset(&self) -> Option<&Asset> {
        self.visible_assets().get(self.cursor).copied()
    }

    pub fn select_cursor(&mut self) {
        if let Some(id) = self.cursor_asset().map(|a| a.id.clone()) {
            self.dispatch(Action::AssetSelected(id));
        }
    }

    pub fn cursor_down(&mut self, n: usize) {
        let len = self.visible_assets().len();
        if len > 0 {
            self.cursor = (self.cursor + n).min(len - 1);
        }
        self.adjust_scroll();
    }

    pub fn cursor_up(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
        self.adjust_scroll();
    }

    pub fn cursor_top(&mut self) {
        self.cursor = 0;
        self.adjust_scroll();
    }

    pub fn cursor_bottom(&mut self) {
        self.cursor = self.visible_assets().len().saturating_sub(1);
        self.adjust_scroll();
    }

    pub fn clamp_selection(&mut self) {
        let len = self.visible_assets().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
        self.adjust_scroll();
    }

    pub fn adjust_scroll(&mut self) {
        if self.page_height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + self.page_height {
            self.scroll_offset = self.cursor - self.page_height + 1;
        }
    }

    pub fn push_query_char(&mut self, c: char) {
        let mut query = self.state.query.clone();
        query.push(c);
        self.set_query(query);
    }

    pub fn pop_query_char(&mut self) {
        let mut query = self.state.query.clone();
        query.pop();
        self.set_query(query);
    }

    pub fn set_query(&mut self, query: String) {
        self.dispatch(Action::QueryChanged(query));
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    pub fn cycle_currency(&mut self, forward: bool) {
        let next = if forward {
            self.state.currency.next()
        } else {
            self.state.currency.prev()
        };
        self.dispatch(Action::CurrencyChanged(next));
    }

    pub fn update_refresh_display(&mut self) {
        if let Some(inst) = self.state.last_listing_at {
            let secs = inst.elapsed().as_secs();
            if secs < 60 {
                self.last_refresh_display = format!("{}s ago", secs);
            } else {
                self.last_refresh_display = format!("{}m ago", secs / 60);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::state::{StatusKind, LISTING_ERROR};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeSource {
        listings: Mutex<VecDeque<Result<Vec<Asset>, FetchError>>>,
        histories: Mutex<VecDeque<Result<Vec<HistoryPoint>, FetchError>>>,
        listing_calls: Mutex<Vec<(Currency, u32)>>,
        history_calls: Mutex<Vec<(String, Currency, u32)>>,
    }

    impl FakeSource {
        fn push_listing(&self, r: Result<Vec<Asset>, FetchError>) {
            self.listings.lock().unwrap().push_back(r);
        }

        fn push_history(&self, r: Result<Vec<HistoryPoint>, FetchError>) {
            self.histories.lock().unwrap().push_back(r);
        }
    }

    #[async_trait]
    impl MarketSource for FakeSource {
        async fn fetch_markets(&self, currency: Currency, limit: u32) -> Result<Vec<Asset>, FetchError> {
            self.listing_calls.lock().unwrap().push((currency, limit));
            self.listings
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Malformed("no canned listing".into())))
        }

        async fn fetch_history(
            &self,
            asset_id: &str,
            currency: Currency,
            days: u32,
        ) -> Result<Vec<HistoryPoint>, FetchError> {
            self.history_calls
                .lock()
                .unwrap()
                .push((asset_id.to_string(), currency, days));
            self.histories
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Malformed("no canned history".into())))
        }
    }

    fn asset(id: &str, symbol: &str, name: &str, price: f64, change: f64) -> Asset {
        Asset {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            current_price: price,
            price_change_percentage_24h: change,
            market_cap: 0.0,
            total_volume: 0.0,
            image: String::new(),
            market_cap_rank: None,
        }
    }

    fn two_assets() -> Vec<Asset> {
        vec![
            asset("bitcoin", "btc", "Bitcoin", 50000.0, 1.23),
            asset("ethereum", "eth", "Ethereum", 3000.0, -0.5),
        ]
    }

    fn week() -> Vec<HistoryPoint> {
        (1..=7)
            .map(|d| HistoryPoint {
                timestamp: Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap(),
                price: 40000.0 + d as f64 * 100.0,
            })
            .collect()
    }

    async fn settle(app: &mut App, n: usize) {
        for _ in 0..n {
            let action = tokio::time::timeout(Duration::from_secs(2), app.rx.recv())
                .await
                .expect("fetch result should arrive")
                .expect("channel should stay open");
            app.dispatch(action);
        }
    }

    async fn mounted(source: Arc<FakeSource>) -> App {
        source.push_listing(Ok(two_assets()));
        source.push_history(Ok(week()));
        let mut app = App::new(Config::default(), source);
        app.mount();
        settle(&mut app, 2).await;
        app
    }

    #[tokio::test]
    async fn test_mount_loads_listing_and_default_chart() {
        let source = Arc::new(FakeSource::default());
        let mut app = mounted(source.clone()).await;

        assert!(app.timer.is_some());
        assert_eq!(app.state.assets.len(), 2);
        let chart = app.state.chart.as_ref().expect("chart should be loaded");
        assert_eq!(chart.points.len(), 7);
        assert_eq!(*source.listing_calls.lock().unwrap(), vec![(Currency::Usd, 100)]);
        assert_eq!(
            *source.history_calls.lock().unwrap(),
            vec![("bitcoin".to_string(), Currency::Usd, 7)]
        );

        app.unmount();
        assert!(app.timer.is_none());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_assets_and_shows_error() {
        let source = Arc::new(FakeSource::default());
        let mut app = mounted(source.clone()).await;

        source.push_listing(Err(FetchError::Status {
            status: 500,
            body: "boom".into(),
        }));
        app.dispatch(Action::RefreshRequested);
        settle(&mut app, 1).await;

        assert_eq!(app.state.assets, two_assets());
        let status = app.state.status.clone().expect("error should be shown");
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, LISTING_ERROR);
        app.unmount();
    }

    #[tokio::test]
    async fn test_selecting_row_fetches_history_once() {
        let source = Arc::new(FakeSource::default());
        let mut app = mounted(source.clone()).await;

        source.push_history(Ok(week()));
        app.cursor_down(1);
        assert_eq!(app.cursor_asset().map(|a| a.id.as_str()), Some("ethereum"));
        app.select_cursor();
        settle(&mut app, 1).await;

        // same row again is not a new selection
        app.select_cursor();
        tokio::task::yield_now().await;

        let calls = source.history_calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], ("ethereum".to_string(), Currency::Usd, 7));
        assert_eq!(app.state.chart.as_ref().map(|c| c.asset_id.as_str()), Some("ethereum"));
        app.unmount();
    }

    #[tokio::test]
    async fn test_currency_cycle_replaces_listing() {
        let source = Arc::new(FakeSource::default());
        let mut app = mounted(source.clone()).await;

        let eur = vec![asset("bitcoin", "btc", "Bitcoin", 46000.0, 1.0)];
        source.push_listing(Ok(eur.clone()));
        source.push_history(Ok(week()));
        app.cycle_currency(true);
        assert_eq!(app.state.currency, Currency::Eur);
        assert!(app.state.chart.is_none());
        settle(&mut app, 2).await;

        assert_eq!(app.state.assets, eur);
        assert_eq!(app.state.chart.as_ref().map(|c| c.currency), Some(Currency::Eur));
        let calls = source.listing_calls.lock().unwrap().clone();
        assert_eq!(calls.last(), Some(&(Currency::Eur, 100)));
        app.unmount();
    }

    #[tokio::test]
    async fn test_search_filters_and_resets_cursor() {
        let source = Arc::new(FakeSource::default());
        let mut app = mounted(source).await;

        app.cursor_bottom();
        assert_eq!(app.cursor, 1);
        for c in "ETH".chars() {
            app.push_query_char(c);
        }
        assert_eq!(app.cursor, 0);
        let visible: Vec<&str> = app.visible_assets().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(visible, vec!["ethereum"]);

        app.pop_query_char();
        app.pop_query_char();
        app.pop_query_char();
        assert_eq!(app.visible_assets().len(), 2);
        app.unmount();
    }

    #[tokio::test]
    async fn test_cursor_stays_in_bounds() {
        let source = Arc::new(FakeSource::default());
        let mut app = mounted(source).await;

        app.cursor_down(50);
        assert_eq!(app.cursor, 1);
        app.cursor_up(50);
        assert_eq!(app.cursor, 0);
        app.set_query("nothing matches".into());
        assert!(app.cursor_asset().is_none());
        app.select_cursor();
        assert_eq!(app.state.selected.as_deref(), Some("bitcoin"));
        app.unmount();
    }
}
