//! View state and the reducer that drives it.
//!
//! Every user intent and every fetch result is an [`Action`]. Applying an
//! action mutates the [`ViewState`] and returns the fetches ([`Effect`]s) the
//! caller should start. Nothing in here touches the network or the clock.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::chart::ChartSeries;
use crate::filter;
use crate::types::{Asset, Currency, HistoryPoint, ThemeMode};

/// How long a success message stays on screen.
pub const SUCCESS_TTL: Duration = Duration::from_secs(3);

pub const LISTING_OK: &str = "Market data updated";
pub const LISTING_ERROR: &str = "Could not load market data";
pub const HISTORY_ERROR: &str = "Could not load price history";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Listing,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub kind: StatusKind,
    pub source: FetchKind,
    pub text: String,
    pub at: Instant,
}

impl Status {
    /// Errors stay until replaced, successes fade after [`SUCCESS_TTL`].
    pub fn is_visible(&self, now: Instant) -> bool {
        match self.kind {
            StatusKind::Error => true,
            StatusKind::Success => now.saturating_duration_since(self.at) < SUCCESS_TTL,
        }
    }
}

/// Tag attached to each outgoing request so late responses can be recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub seq: u64,
    pub currency: Currency,
    /// Set for history requests only.
    pub asset_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchListing(Ticket),
    FetchHistory(Ticket),
}

#[derive(Debug, Clone)]
pub enum Action {
    Mounted,
    RefreshRequested,
    HistoryReloadRequested,
    CurrencyChanged(Currency),
    AssetSelected(String),
    QueryChanged(String),
    ThemeToggled,
    ListingLoaded {
        ticket: Ticket,
        assets: Vec<Asset>,
        at: Instant,
    },
    ListingFailed {
        ticket: Ticket,
        at: Instant,
    },
    HistoryLoaded {
        ticket: Ticket,
        points: Vec<HistoryPoint>,
    },
    HistoryFailed {
        ticket: Ticket,
        at: Instant,
    },
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub currency: Currency,
    pub selected: Option<String>,
    pub query: String,
    pub theme: ThemeMode,
    pub assets: Vec<Asset>,
    pub chart: Option<ChartSeries>,
    pub status: Option<Status>,
    pub last_listing_at: Option<Instant>,
    /// Outstanding listing failure, shown again once a history error clears.
    listing_error: Option<Status>,
    listing_issued: u64,
    listing_applied: u64,
    history_issued: u64,
    history_applied: u64,
}

impl ViewState {
    pub fn new(currency: Currency, theme: ThemeMode, selected: Option<String>) -> Self {
        Self {
            currency,
            selected,
            query: String::new(),
            theme,
            assets: Vec::new(),
            chart: None,
            status: None,
            last_listing_at: None,
            listing_error: None,
            listing_issued: 0,
            listing_applied: 0,
            history_issued: 0,
            history_applied: 0,
        }
    }

    pub fn listing_in_flight(&self) -> bool {
        self.listing_issued > self.listing_applied
    }

    pub fn history_in_flight(&self) -> bool {
        self.history_issued > self.history_applied
    }

    pub fn visible_assets(&self) -> Vec<&Asset> {
        filter::filter_assets(&self.assets, &self.query)
    }

    pub fn selected_asset(&self) -> Option<&Asset> {
        let id = self.selected.as_deref()?;
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Mounted => {
                let mut effects = vec![self.issue_listing()];
                effects.extend(self.issue_history());
                effects
            }
            Action::RefreshRequested => vec![self.issue_listing()],
            Action::HistoryReloadRequested => self.issue_history().into_iter().collect(),
            Action::CurrencyChanged(currency) => {
                if currency == self.currency {
                    return Vec::new();
                }
                self.currency = currency;
                self.chart = None;
                let mut effects = vec![self.issue_listing()];
                effects.extend(self.issue_history());
                effects
            }
            Action::AssetSelected(id) => {
                if self.selected.as_deref() == Some(id.as_str()) {
                    return Vec::new();
                }
                self.selected = Some(id);
                self.chart = None;
                self.issue_history().into_iter().collect()
            }
            Action::QueryChanged(query) => {
                self.query = query;
                Vec::new()
            }
            Action::ThemeToggled => {
                self.theme = self.theme.toggled();
                Vec::new()
            }
            Action::ListingLoaded { ticket, assets, at } => {
                if self.accept_listing(&ticket) {
                    self.assets = assets;
                    self.last_listing_at = Some(at);
                    self.listing_error = None;
                    self.status = Some(Status {
                        kind: StatusKind::Success,
                        source: FetchKind::Listing,
                        text: LISTING_OK.to_string(),
                        at,
                    });
                }
                Vec::new()
            }
            Action::ListingFailed { ticket, at } => {
                if self.accept_listing(&ticket) {
                    let status = Status {
                        kind: StatusKind::Error,
                        source: FetchKind::Listing,
                        text: LISTING_ERROR.to_string(),
                        at,
                    };
                    self.listing_error = Some(status.clone());
                    self.status = Some(status);
                }
                Vec::new()
            }
            Action::HistoryLoaded { ticket, points } => {
                if self.accept_history(&ticket) {
                    let asset_id = ticket.asset_id.as_deref().unwrap_or_default();
                    self.chart = Some(ChartSeries::from_history(asset_id, ticket.currency, points));
                    let history_error = self
                        .status
                        .as_ref()
                        .is_some_and(|s| s.kind == StatusKind::Error && s.source == FetchKind::History);
                    if history_error {
                        self.status = self.listing_error.clone();
                    }
                }
                Vec::new()
            }
            Action::HistoryFailed { ticket, at } => {
                if self.accept_history(&ticket) {
                    self.status = Some(Status {
                        kind: StatusKind::Error,
                        source: FetchKind::History,
                        text: HISTORY_ERROR.to_string(),
                        at,
                    });
                }
                Vec::new()
            }
        }
    }

    fn issue_listing(&mut self) -> Effect {
        self.listing_issued += 1;
        Effect::FetchListing(Ticket {
            seq: self.listing_issued,
            currency: self.currency,
            asset_id: None,
        })
    }

    fn issue_history(&mut self) -> Option<Effect> {
        let asset_id = self.selected.clone()?;
        self.history_issued += 1;
        Some(Effect::FetchHistory(Ticket {
            seq: self.history_issued,
            currency: self.currency,
            asset_id: Some(asset_id),
        }))
    }

    /// Listing responses count if nothing newer has landed and the currency
    /// still matches.
    fn accept_listing(&mut self, ticket: &Ticket) -> bool {
        if ticket.seq <= self.listing_applied || ticket.currency != self.currency {
            debug!(seq = ticket.seq, applied = self.listing_applied, "dropping stale listing response");
            return false;
        }
        self.listing_applied = ticket.seq;
        true
    }

    /// Only the most recent history request is ever applied.
    fn accept_history(&mut self, ticket: &Ticket) -> bool {
        if ticket.seq != self.history_issued {
            debug!(seq = ticket.seq, latest = self.history_issued, "dropping stale history response");
            return false;
        }
        self.history_applied = ticket.seq;
        true
    }
}
