//! Contract between the views and the state-owning store

/// Intents the views relay to whoever owns catalog state.
///
/// Views never mutate catalog state directly; they only call these.
pub trait CatalogActions {
    /// Drop cached tile and service state before a new fetch starts
    fn clear_service(&mut self);
    /// Begin loading tiles; eventually sets tiles or a fetch error
    fn fetch_tiles_start(&mut self);
    /// Stop the current load; late responses must be ignored
    fn fetch_tiles_stop(&mut self);
    /// Reset dashboard-derived state on teardown
    fn clear(&mut self);
    /// Update the search criteria used to filter tiles
    fn filter_text(&mut self, value: &str);
    /// Ask the catalog to re-scan static API definitions
    fn refreshed_static_api(&mut self);
    /// Record the chosen onboarding method
    fn select_enabler(&mut self, id: &str);
    /// Flip wizard visibility
    fn wizard_toggle_display(&mut self);
    /// Begin loading a single tile for the detail page
    fn fetch_tile_start(&mut self, tile_id: &str);
    /// Stop loading the single tile
    fn fetch_tile_stop(&mut self);
    /// Dismiss the static refresh error
    fn clear_error(&mut self);
}
