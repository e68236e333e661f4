use crate::core::CatalogActions;
use crate::domain::{FetchError, TileSummary};
use crate::infrastructure::RuntimeCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PollTarget {
    Tiles,
    Tile(String),
}

/// Catalog state plus the queue of worker commands it produced.
///
/// Every fetch activation gets a new generation; results carrying an older
/// generation are dropped so a stopped fetch can never repopulate state.
#[derive(Debug, Default)]
pub struct CatalogStore {
    all_tiles: Vec<TileSummary>,
    tiles: Vec<TileSummary>,
    search_criteria: Option<String>,
    pub detail: Option<TileSummary>,
    pub is_loading: bool,
    pub fetch_tiles_error: Option<FetchError>,
    pub fetch_tile_error: Option<FetchError>,
    pub refreshed_static_apis_error: Option<FetchError>,
    pub static_refresh_pending: bool,
    pub selected_enabler: Option<String>,
    pub wizard_visible: bool,
    pub confirm_visible: bool,
    pub session: Option<String>,
    pub login_error: Option<FetchError>,
    pub login_pending: bool,
    generation: u64,
    error_seq: u64,
    poll_target: Option<PollTarget>,
    pending: Vec<RuntimeCommand>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiles after applying the search criteria
    pub fn tiles(&self) -> &[TileSummary] {
        &self.tiles
    }

    pub fn all_tiles(&self) -> &[TileSummary] {
        &self.all_tiles
    }

    pub fn search_criteria(&self) -> Option<&str> {
        self.search_criteria.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Occurrence number of the tile list error, `None` while there is none.
    /// Every recorded failure gets a new number, even when the previous error
    /// was never observed as cleared.
    pub fn tiles_error_occurrence(&self) -> Option<u64> {
        self.fetch_tiles_error.as_ref().map(|_| self.error_seq)
    }

    /// Same as [`Self::tiles_error_occurrence`] for the single tile fetch
    pub fn tile_error_occurrence(&self) -> Option<u64> {
        self.fetch_tile_error.as_ref().map(|_| self.error_seq)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Drain worker commands queued since the last call
    pub fn take_commands(&mut self) -> Vec<RuntimeCommand> {
        std::mem::take(&mut self.pending)
    }

    // === Session ===

    pub fn start_session(&mut self, username: impl Into<String>) {
        self.session = Some(username.into());
        self.login_error = None;
        self.login_pending = false;
    }

    pub fn login(&mut self, username: &str, password: &str) {
        self.login_pending = true;
        self.login_error = None;
        self.pending.push(RuntimeCommand::Login {
            username: username.trim().to_string(),
            password: password.to_string(),
        });
    }

    pub fn logout(&mut self) {
        self.expire_session();
        self.pending.push(RuntimeCommand::Logout);
    }

    /// Forget the session without telling the server, e.g. after a 401
    pub fn expire_session(&mut self) {
        self.session = None;
        self.wizard_visible = false;
        self.confirm_visible = false;
    }

    pub fn apply_login(&mut self, result: Result<String, FetchError>) {
        self.login_pending = false;
        match result {
            Ok(username) => self.start_session(username),
            Err(error) => {
                self.session = None;
                self.login_error = Some(error);
            }
        }
    }

    // === Worker results ===

    /// Returns false when the result belongs to a stopped activation
    pub fn apply_tiles(&mut self, generation: u64, tiles: Vec<TileSummary>) -> bool {
        if generation != self.generation || self.poll_target != Some(PollTarget::Tiles) {
            tracing::debug!(generation, current = self.generation, "dropping stale tiles");
            return false;
        }
        self.all_tiles = tiles;
        self.is_loading = false;
        self.fetch_tiles_error = None;
        self.recompute_visible();
        true
    }

    pub fn apply_tile(&mut self, generation: u64, tile: TileSummary) -> bool {
        let Some(PollTarget::Tile(requested)) = &self.poll_target else {
            return false;
        };
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "dropping stale tile");
            return false;
        }
        if *requested != tile.id {
            tracing::debug!(requested = %requested, received = %tile.id, "tile id differs");
        }
        self.detail = Some(tile);
        self.is_loading = false;
        self.fetch_tile_error = None;
        true
    }

    pub fn apply_fetch_failure(&mut self, generation: u64, error: FetchError) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.poll_target {
            Some(PollTarget::Tiles) => self.fetch_tiles_error = Some(error),
            Some(PollTarget::Tile(_)) => self.fetch_tile_error = Some(error),
            None => return false,
        }
        self.is_loading = false;
        self.error_seq += 1;
        true
    }

    pub fn apply_static_refresh(&mut self, result: Result<(), FetchError>) {
        self.static_refresh_pending = false;
        self.refreshed_static_apis_error = result.err();
    }

    fn recompute_visible(&mut self) {
        let needle = self
            .search_criteria
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();
        self.tiles = self
            .all_tiles
            .iter()
            .filter(|tile| tile.matches(&needle))
            .cloned()
            .collect();
    }

    // === Dialogs ===

    pub fn open_confirm(&mut self) {
        self.confirm_visible = true;
    }

    pub fn close_confirm(&mut self) {
        self.confirm_visible = false;
    }
}

impl CatalogActions for CatalogStore {
    fn clear_service(&mut self) {
        self.all_tiles.clear();
        self.tiles.clear();
        self.detail = None;
        self.fetch_tile_error = None;
    }

    fn fetch_tiles_start(&mut self) {
        self.generation += 1;
        self.poll_target = Some(PollTarget::Tiles);
        self.is_loading = true;
        self.fetch_tiles_error = None;
        self.pending.push(RuntimeCommand::FetchTilesStart {
            generation: self.generation,
        });
    }

    fn fetch_tiles_stop(&mut self) {
        self.stop_polling();
    }

    fn clear(&mut self) {
        self.search_criteria = None;
        self.fetch_tiles_error = None;
        self.recompute_visible();
    }

    fn filter_text(&mut self, value: &str) {
        self.search_criteria = Some(value.to_string());
        self.recompute_visible();
    }

    fn refreshed_static_api(&mut self) {
        self.static_refresh_pending = true;
        self.refreshed_static_apis_error = None;
        self.pending.push(RuntimeCommand::RefreshStaticApis);
    }

    fn select_enabler(&mut self, id: &str) {
        self.selected_enabler = Some(id.to_string());
    }

    fn wizard_toggle_display(&mut self) {
        self.wizard_visible = !self.wizard_visible;
        if !self.wizard_visible {
            self.confirm_visible = false;
        }
    }

    fn fetch_tile_start(&mut self, tile_id: &str) {
        self.generation += 1;
        self.poll_target = Some(PollTarget::Tile(tile_id.to_string()));
        self.is_loading = true;
        self.fetch_tile_error = None;
        if self.detail.as_ref().map(|d| d.id.as_str()) != Some(tile_id) {
            self.detail = None;
        }
        self.pending.push(RuntimeCommand::FetchTileStart {
            generation: self.generation,
            tile_id: tile_id.to_string(),
        });
    }

    fn fetch_tile_stop(&mut self) {
        self.stop_polling();
    }

    fn clear_error(&mut self) {
        self.refreshed_static_apis_error = None;
    }
}

impl CatalogStore {
    fn stop_polling(&mut self) {
        self.generation += 1;
        self.is_loading = false;
        self.pending.push(RuntimeCommand::FetchStop);
    }
}
