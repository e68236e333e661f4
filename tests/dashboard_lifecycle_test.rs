//! Dashboard and dropdown contracts against a recording action sink

use apicat::core::CatalogActions;
use apicat::domain::{FetchError, TileSummary};
use apicat::modules::dashboard::{
    decide, Dashboard, DashboardProps, DashboardView, DialogDropdown, DropdownState, NO_MATCHES,
};
use serde_json::{json, Value};

/// Records every relayed intent in call order
#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<String>,
}

impl Recorder {
    fn count(&self, name: &str) -> usize {
        self.calls.iter().filter(|call| call.as_str() == name).count()
    }
}

impl CatalogActions for Recorder {
    fn clear_service(&mut self) {
        self.calls.push("clear_service".into());
    }
    fn fetch_tiles_start(&mut self) {
        self.calls.push("fetch_tiles_start".into());
    }
    fn fetch_tiles_stop(&mut self) {
        self.calls.push("fetch_tiles_stop".into());
    }
    fn clear(&mut self) {
        self.calls.push("clear".into());
    }
    fn filter_text(&mut self, value: &str) {
        self.calls.push(format!("filter_text:{value}"));
    }
    fn refreshed_static_api(&mut self) {
        self.calls.push("refreshed_static_api".into());
    }
    fn select_enabler(&mut self, id: &str) {
        self.calls.push(format!("select_enabler:{id}"));
    }
    fn wizard_toggle_display(&mut self) {
        self.calls.push("wizard_toggle_display".into());
    }
    fn fetch_tile_start(&mut self, tile_id: &str) {
        self.calls.push(format!("fetch_tile_start:{tile_id}"));
    }
    fn fetch_tile_stop(&mut self) {
        self.calls.push("fetch_tile_stop".into());
    }
    fn clear_error(&mut self) {
        self.calls.push("clear_error".into());
    }
}

fn tile(id: &str) -> TileSummary {
    TileSummary {
        id: id.into(),
        title: id.to_uppercase(),
        ..Default::default()
    }
}

fn props<'a>(
    tiles: &'a [TileSummary],
    search: Option<&'a str>,
    error: Option<&'a FetchError>,
) -> DashboardProps<'a> {
    DashboardProps {
        tiles,
        search_criteria: search,
        is_loading: false,
        fetch_tiles_error: error,
        static_refresh_pending: false,
    }
}

#[test]
fn test_mount_clears_before_fetching() {
    let mut dashboard = Dashboard::new(json!([]), None);
    let mut actions = Recorder::default();

    dashboard.mount(&mut actions);
    assert_eq!(actions.calls, vec!["clear_service", "fetch_tiles_start"]);
    assert!(dashboard.is_mounted());

    // Entering twice is one activation
    dashboard.mount(&mut actions);
    assert_eq!(actions.calls.len(), 2);
}

#[test]
fn test_unmount_clears_before_stopping() {
    let mut dashboard = Dashboard::new(json!([]), None);
    let mut actions = Recorder::default();

    dashboard.unmount(&mut actions);
    assert!(actions.calls.is_empty(), "unmount without mount relays nothing");

    dashboard.mount(&mut actions);
    actions.calls.clear();
    dashboard.unmount(&mut actions);
    assert_eq!(actions.calls, vec!["clear", "fetch_tiles_stop"]);

    dashboard.unmount(&mut actions);
    assert_eq!(actions.calls.len(), 2);
}

#[test]
fn test_relays_pass_values_through() {
    let mut dashboard = Dashboard::new(json!([]), None);
    let mut actions = Recorder::default();

    dashboard.handle_search("gateway", &mut actions);
    dashboard.handle_search("", &mut actions);
    dashboard.refresh_static_apis(&mut actions);
    dashboard.toggle_wizard(&mut actions);

    assert_eq!(
        actions.calls,
        vec![
            "filter_text:gateway",
            "filter_text:",
            "refreshed_static_api",
            "wizard_toggle_display"
        ]
    );
}

#[test]
fn test_render_decision_table() {
    let tiles = vec![tile("a")];
    let error = FetchError::new(Some(500), "boom");

    for search in [None, Some(""), Some("foo")] {
        assert!(matches!(
            decide(&props(&tiles, search, Some(&error))),
            DashboardView::Error(_)
        ));
        assert!(matches!(
            decide(&props(&[], search, Some(&error))),
            DashboardView::Error(_)
        ));
        assert_eq!(decide(&props(&tiles, search, None)), DashboardView::Tiles);
    }

    assert_eq!(decide(&props(&[], Some("foo"), None)), DashboardView::NoMatches);
    assert_eq!(decide(&props(&[], Some(""), None)), DashboardView::Empty);
    assert_eq!(decide(&props(&[], None, None)), DashboardView::Empty);
    println!("✓ {NO_MATCHES} only with a non-empty search");
}

#[test]
fn test_error_block_carries_formatted_message() {
    let tiles = vec![tile("a")];
    let error = FetchError::new(Some(500), "boom");

    let DashboardView::Error(display) = decide(&props(&tiles, None, Some(&error))) else {
        panic!("error must win over tiles");
    };
    assert_eq!(display.status, Some(500));
    assert!(display.text().contains("boom"));
}

#[test]
fn test_error_stops_fetch_once_per_appearance() {
    let mut dashboard = Dashboard::new(json!([]), None);
    let mut actions = Recorder::default();
    dashboard.mount(&mut actions);
    actions.calls.clear();

    dashboard.observe_error(None, &mut actions);
    assert_eq!(actions.count("fetch_tiles_stop"), 0);

    // The error persists over several frames
    for _ in 0..5 {
        dashboard.observe_error(Some(1), &mut actions);
    }
    assert_eq!(actions.count("fetch_tiles_stop"), 1);

    // Cleared, then a second error
    dashboard.observe_error(None, &mut actions);
    dashboard.observe_error(Some(2), &mut actions);
    dashboard.observe_error(Some(2), &mut actions);
    assert_eq!(actions.count("fetch_tiles_stop"), 2);
}

#[test]
fn test_error_replaced_between_frames_stops_again() {
    let mut dashboard = Dashboard::new(json!([]), None);
    let mut actions = Recorder::default();
    dashboard.mount(&mut actions);
    actions.calls.clear();

    dashboard.observe_error(Some(1), &mut actions);
    // The clear in between was never observed
    dashboard.observe_error(Some(2), &mut actions);
    assert_eq!(actions.count("fetch_tiles_stop"), 2);
}

#[test]
fn test_error_before_mount_is_not_acted_on() {
    let mut dashboard = Dashboard::new(json!([]), None);
    let mut actions = Recorder::default();
    dashboard.observe_error(Some(1), &mut actions);
    assert!(actions.calls.is_empty());
}

#[test]
fn test_dropdown_hidden_renders_nothing() {
    for data in [
        json!([{ "label": "A" }]),
        Value::Null,
        json!({ "label": "A" }),
        json!("A"),
    ] {
        let mut dropdown = DialogDropdown::new(data, false);
        dropdown.mount();
        assert!(!dropdown.is_rendered());
        dropdown.toggle_menu();
        assert!(!dropdown.is_open());
    }

    // Hiding an open menu closes it
    let mut dropdown = DialogDropdown::new(json!([{ "label": "A" }]), true);
    dropdown.mount();
    dropdown.toggle_menu();
    assert!(dropdown.is_open());
    dropdown.set_visible(false);
    assert!(!dropdown.is_rendered());
    assert!(!dropdown.is_open());
}

#[test]
fn test_dropdown_non_list_renders_nothing() {
    for data in [Value::Null, json!({ "label": "A" }), json!("A"), json!(3)] {
        let mut dropdown = DialogDropdown::new(data, true);
        dropdown.mount();
        assert_eq!(dropdown.state(), &DropdownState::Attached(None));
        assert!(!dropdown.is_rendered());

        let mut actions = Recorder::default();
        assert!(!dropdown.handle_click(0, &mut actions));
        assert!(actions.calls.is_empty());
    }
}

#[test]
fn test_dropdown_click_selects_then_toggles() {
    let mut dropdown = DialogDropdown::new(json!([{ "label": "A" }, { "label": "B" }]), true);
    assert_eq!(dropdown.state(), &DropdownState::Unattached);

    dropdown.mount();
    assert!(dropdown.is_rendered());

    let mut actions = Recorder::default();
    assert!(dropdown.handle_click(0, &mut actions));
    assert_eq!(
        actions.calls,
        vec!["select_enabler:A", "wizard_toggle_display"]
    );
}

#[test]
fn test_dropdown_dispatches_id_not_label() {
    let data = json!([
        { "id": "plain-java", "label": "Plain Java Enabler" },
        { "id": "static", "label": "Static Definition" }
    ]);
    let mut dropdown = DialogDropdown::new(data, true);
    dropdown.mount();

    let mut actions = Recorder::default();
    dropdown.handle_click(1, &mut actions);
    assert_eq!(actions.calls[0], "select_enabler:static");

    actions.calls.clear();
    assert!(!dropdown.handle_click(7, &mut actions));
    assert!(actions.calls.is_empty());
}

#[test]
fn test_dropdown_rebinds_on_new_data() {
    let mut dropdown = DialogDropdown::new(json!([{ "label": "A" }]), true);
    dropdown.mount();
    dropdown.set_data(json!([{ "label": "C" }]));

    let mut actions = Recorder::default();
    dropdown.handle_click(0, &mut actions);
    assert_eq!(actions.calls[0], "select_enabler:C");

    dropdown.set_data(Value::Null);
    assert!(!dropdown.is_rendered());
}
