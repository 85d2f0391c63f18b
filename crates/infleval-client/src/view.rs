//! Report view model: one brief's scored influencers, fetched once per brief
//! identifier and projected through the selected sort.
//!
//! Fetching is split into [`ReportView::begin`] and [`ReportView::complete`]
//! so a caller can keep several fetches in flight. Each fetch carries a
//! [`RequestTicket`]; only the ticket issued last may commit, so a slow
//! response for a brief the user has already navigated away from is dropped.

use async_trait::async_trait;
use chrono::NaiveDate;

use infleval_core::{
    export_csv, radar_points, sort_report, BriefId, CsvExport, ExportError, RadarInput,
    RadarPoint, ScoredInfluencer, SortKey,
};

use crate::client::ApiClient;
use crate::error::ApiError;

pub const INVALID_BRIEF_MESSAGE: &str = "Invalid brief.";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load report";

/// Anything that can produce a brief's report.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch_report(&self, brief_id: BriefId) -> Result<Vec<ScoredInfluencer>, ApiError>;
}

#[async_trait]
impl ReportSource for ApiClient {
    async fn fetch_report(&self, brief_id: BriefId) -> Result<Vec<ScoredInfluencer>, ApiError> {
        ApiClient::fetch_report(self, brief_id).await
    }
}

/// Identity of one fetch: the brief it targets and the view generation that
/// issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
    brief_id: BriefId,
}

impl RequestTicket {
    #[must_use]
    pub fn brief_id(&self) -> BriefId {
        self.brief_id
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportState {
    /// Nothing requested yet.
    Idle,
    /// The identifier was missing or malformed; no fetch was made.
    InvalidBrief,
    Loading,
    Loaded(Vec<ScoredInfluencer>),
    /// Fetch failed; holds the text shown to the user.
    Failed(String),
}

#[derive(Debug)]
pub struct ReportView {
    target: Option<BriefId>,
    generation: u64,
    state: ReportState,
    sort_key: SortKey,
}

impl Default for ReportView {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: None,
            generation: 0,
            state: ReportState::Idle,
            sort_key: SortKey::default(),
        }
    }

    /// Points the view at a brief and returns the ticket for the fetch to
    /// run, if one is needed.
    ///
    /// An unusable identifier moves the view to [`ReportState::InvalidBrief`]
    /// and returns `None`. Re-targeting the brief that is already loading or
    /// loaded also returns `None`.
    pub fn begin(&mut self, raw_brief_id: Option<&str>) -> Option<RequestTicket> {
        let Ok(brief_id) = BriefId::parse_opt(raw_brief_id) else {
            tracing::warn!(raw = raw_brief_id, "invalid brief identifier; not fetching");
            // Orphan anything still in flight.
            self.generation += 1;
            self.target = None;
            self.state = ReportState::InvalidBrief;
            return None;
        };

        if self.target == Some(brief_id)
            && !matches!(self.state, ReportState::Idle | ReportState::InvalidBrief)
        {
            return None;
        }
        Some(self.issue(brief_id))
    }

    /// Issues a fresh ticket for the current brief, e.g. on an explicit
    /// user reload. Returns `None` when no brief is targeted.
    pub fn reload(&mut self) -> Option<RequestTicket> {
        let brief_id = self.target?;
        Some(self.issue(brief_id))
    }

    fn issue(&mut self, brief_id: BriefId) -> RequestTicket {
        self.generation += 1;
        self.target = Some(brief_id);
        self.state = ReportState::Loading;
        tracing::debug!(brief_id = %brief_id, generation = self.generation, "report fetch started");
        RequestTicket {
            generation: self.generation,
            brief_id,
        }
    }

    /// Applies a fetch result. Returns `false` and leaves the view unchanged
    /// when the ticket has been superseded.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<ScoredInfluencer>, ApiError>,
    ) -> bool {
        if ticket.generation != self.generation || self.target != Some(ticket.brief_id) {
            tracing::debug!(
                brief_id = %ticket.brief_id,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale report response"
            );
            return false;
        }

        self.state = match result {
            Ok(rows) => {
                tracing::info!(brief_id = %ticket.brief_id, rows = rows.len(), "report loaded");
                ReportState::Loaded(rows)
            }
            Err(err) => {
                tracing::warn!(brief_id = %ticket.brief_id, error = %err, "report fetch failed");
                ReportState::Failed(err.detail().unwrap_or(FETCH_FAILED_MESSAGE).to_string())
            }
        };
        true
    }

    /// Runs [`begin`](Self::begin), the fetch, and [`complete`](Self::complete)
    /// in sequence. Returns whether a fetch result was committed.
    pub async fn load<S>(&mut self, source: &S, raw_brief_id: Option<&str>) -> bool
    where
        S: ReportSource + ?Sized,
    {
        let Some(ticket) = self.begin(raw_brief_id) else {
            return false;
        };
        let result = source.fetch_report(ticket.brief_id).await;
        self.complete(ticket, result)
    }

    #[must_use]
    pub fn state(&self) -> &ReportState {
        &self.state
    }

    #[must_use]
    pub fn brief_id(&self) -> Option<BriefId> {
        self.target
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, ReportState::Loading)
    }

    /// User-facing error text for the invalid and failed states.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ReportState::InvalidBrief => Some(INVALID_BRIEF_MESSAGE),
            ReportState::Failed(message) => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    /// Records as fetched. Empty unless loaded.
    #[must_use]
    pub fn rows(&self) -> &[ScoredInfluencer] {
        match &self.state {
            ReportState::Loaded(rows) => rows,
            _ => &[],
        }
    }

    /// Records ordered by the current sort key, recomputed from the fetched
    /// list on every call.
    #[must_use]
    pub fn sorted(&self) -> Vec<&ScoredInfluencer> {
        sort_report(self.rows(), self.sort_key)
    }

    /// Highest-ranked record under the current sort.
    #[must_use]
    pub fn top(&self) -> Option<&ScoredInfluencer> {
        self.sorted().first().copied()
    }

    /// Radar axes for the highest-ranked record.
    #[must_use]
    pub fn radar(&self) -> Option<Vec<RadarPoint>> {
        self.top().map(|row| radar_points(&RadarInput::from(row)))
    }

    /// CSV of the current sorted view, named for the targeted brief and `date`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NothingToExport`] when there are no rows.
    pub fn export(&self, date: NaiveDate) -> Result<CsvExport, ExportError> {
        let Some(brief_id) = self.target else {
            return Err(ExportError::NothingToExport);
        };
        export_csv(brief_id, self.sorted(), date)
    }
}
