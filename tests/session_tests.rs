use std::cell::RefCell;
use std::rc::Rc;

use geo_types::Geometry;
use trailmap::{
    constants::{
        CURRENT_LOCATION_LAYER_ID, MAX_GRID_ZOOM, POSITION_HISTORY_LAYER_ID, SAMPLES_LAYER_ID,
    },
    layers::kml::KmlLoader,
    tiles::TileGrid,
    HostBridge, MapSession, Point, Projection, Result, TileUrl,
};

const MOCK_MAP: &str = r#"{"map":{"name":"mock","projection":"EPSG:4326",
    "minZoomLevel":"2","maxZoomLevel":"10",
    "minX":"-10","maxX":"10","minY":"-20","maxY":"20"}}"#;

const OTHER_MAP: &str = r#"{"map":{"name":"other","projection":"EPSG:4326",
    "minZoomLevel":"4","maxZoomLevel":"12",
    "minX":"0","maxX":"5","minY":"0","maxY":"5"}}"#;

const MERCATOR_MAP: &str = r#"{"map":{"name":"moffett","projection":"EPSG:900913",
    "minZoomLevel":"12","maxZoomLevel":"17",
    "minX":"37.40","maxX":"37.42","minY":"-122.07","maxY":"-122.04"}}"#;

const TRAIL: &str = r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Document>
  <Placemark><name>Spring</name><Point><coordinates>1.5,1.5,0</coordinates></Point></Placemark>
  <Placemark><LineString><coordinates>0,0,0 4,4,0</coordinates></LineString></Placemark>
</Document></kml>"#;

/// In-memory host answering with the same fixtures the web test suite used
struct MockBridge {
    state: Rc<RefCell<MockState>>,
}

struct MockState {
    map: String,
    samples: String,
    orientation: String,
    current_location: String,
    position_history: String,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            map: MOCK_MAP.to_string(),
            samples: r#"{"points":[{"x":1,"y":1},{"x":2,"y":2},{"x":3,"y":3}]}"#.to_string(),
            orientation: r#"{"orientation":[{"azimuth":12.5},{"azimuth":90}]}"#.to_string(),
            current_location: r#"{"points":[{"x":1,"y":1}]}"#.to_string(),
            position_history: r#"{"points":[{"x":1,"y":1},{"x":2,"y":2},{"x":3,"y":3}]}"#
                .to_string(),
        }
    }
}

impl HostBridge for MockBridge {
    fn current_map(&self) -> Result<String> {
        Ok(self.state.borrow().map.clone())
    }

    fn kmls(&self) -> Result<String> {
        Ok(r#"{"kmls":[{"path":"trail.kml"}]}"#.to_string())
    }

    fn samples(&self) -> Result<String> {
        Ok(self.state.borrow().samples.clone())
    }

    fn current_location(&self) -> Result<String> {
        Ok(self.state.borrow().current_location.clone())
    }

    fn position_history(&self) -> Result<String> {
        Ok(self.state.borrow().position_history.clone())
    }

    fn orientation(&self) -> Result<String> {
        Ok(self.state.borrow().orientation.clone())
    }
}

struct StaticLoader;

impl KmlLoader for StaticLoader {
    fn load(&self, _url: &str) -> Result<String> {
        Ok(TRAIL.to_string())
    }
}

fn session() -> (MapSession, Rc<RefCell<MockState>>) {
    let state = Rc::new(RefCell::new(MockState::default()));
    let bridge = MockBridge {
        state: Rc::clone(&state),
    };
    let session = MapSession::builder()
        .with_kml_loader(Box::new(StaticLoader))
        .init(Box::new(bridge))
        .unwrap();
    (session, state)
}

fn feature_count(session: &MapSession, layer_id: &str) -> usize {
    session.layer(layer_id).map(|l| l.len()).unwrap_or(0)
}

fn point_at(session: &MapSession, layer_id: &str, index: usize) -> (f64, f64) {
    match &session.layer(layer_id).unwrap().features()[index].geometry {
        Geometry::Point(p) => (p.x(), p.y()),
        other => panic!("expected a point, got {:?}", other),
    }
}

#[test]
fn test_init_creates_overlays() {
    let (session, _) = session();
    assert_eq!(session.layers().len(), 3);
    for id in [SAMPLES_LAYER_ID, CURRENT_LOCATION_LAYER_ID, POSITION_HISTORY_LAYER_ID] {
        assert_eq!(feature_count(&session, id), 0);
    }
    assert_eq!(session.config().name, "mock");
    assert_eq!(session.view().zoom, 3);
    assert!(session.view().restricted_extent().is_some());
}

#[test]
fn test_samples_display_and_hide() {
    let (mut session, _) = session();
    session.dispatch("DisplaySamples");
    assert_eq!(feature_count(&session, SAMPLES_LAYER_ID), 3);
    assert_eq!(point_at(&session, SAMPLES_LAYER_ID, 0), (1.0, 1.0));
    assert_eq!(point_at(&session, SAMPLES_LAYER_ID, 1), (2.0, 2.0));
    assert_eq!(point_at(&session, SAMPLES_LAYER_ID, 2), (3.0, 3.0));

    session.dispatch("HideSamples");
    assert_eq!(feature_count(&session, SAMPLES_LAYER_ID), 0);
}

#[test]
fn test_display_samples_twice_appends() {
    let (mut session, _) = session();
    session.dispatch("DisplaySamples");
    session.dispatch("DisplaySamples");
    assert_eq!(feature_count(&session, SAMPLES_LAYER_ID), 6);
}

#[test]
fn test_current_location_carries_azimuth() {
    let (mut session, state) = session();
    session.dispatch("DisplayCurrentLocation");
    assert_eq!(feature_count(&session, CURRENT_LOCATION_LAYER_ID), 1);
    assert_eq!(point_at(&session, CURRENT_LOCATION_LAYER_ID, 0), (1.0, 1.0));
    let feature = &session.layer(CURRENT_LOCATION_LAYER_ID).unwrap().features()[0];
    assert_eq!(feature.style.rotation, 90.0);

    session.dispatch("HideCurrentLocation");
    assert_eq!(feature_count(&session, CURRENT_LOCATION_LAYER_ID), 0);

    state.borrow_mut().orientation = r#"{"orientation":[]}"#.to_string();
    session.dispatch("DisplayCurrentLocation");
    let feature = &session.layer(CURRENT_LOCATION_LAYER_ID).unwrap().features()[0];
    assert_eq!(feature.style.rotation, -1.0);
}

#[test]
fn test_position_history_is_one_track() {
    let (mut session, _) = session();
    session.dispatch("DisplayPositionHistory");
    let layer = session.layer(POSITION_HISTORY_LAYER_ID).unwrap();
    assert_eq!(layer.len(), 1);
    match &layer.features()[0].geometry {
        Geometry::LineString(line) => {
            let coords: Vec<(f64, f64)> = line.coords().map(|c| (c.x, c.y)).collect();
            assert_eq!(coords, vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        }
        other => panic!("expected a track, got {:?}", other),
    }

    session.dispatch("HidePositionHistory");
    assert_eq!(feature_count(&session, POSITION_HISTORY_LAYER_ID), 0);
}

#[test]
fn test_select_then_unselect_shows_and_hides_popup() {
    let (mut session, _) = session();
    session.dispatch("DisplaySamples");
    session.select_feature(SAMPLES_LAYER_ID, "samples.0").unwrap();
    assert_eq!(session.popups_len(), 1);
    assert_eq!(
        session.popup().unwrap().content,
        "<div class=\"markerContent\">default popup</div>"
    );

    assert!(session.unselect_feature("samples.0"));
    assert_eq!(session.popups_len(), 0);
    assert!(session.selected().is_none());
}

#[test]
fn test_selecting_second_feature_leaves_one_popup() {
    let (mut session, _) = session();
    session.dispatch("DisplaySamples");
    session.select_feature(SAMPLES_LAYER_ID, "samples.0").unwrap();
    session.select_feature(SAMPLES_LAYER_ID, "samples.1").unwrap();
    assert_eq!(session.popups_len(), 1);
    assert_eq!(session.popup().unwrap().feature_id, "samples.1");
}

/// The legacy unselect handler removed the feature's own popup but cleared
/// the feature link of whichever popup was created last. Unselecting here
/// only touches the popup the feature owns, so another feature's popup keeps
/// its owner.
#[test]
fn test_unselect_of_non_owner_keeps_popup() {
    let (mut session, _) = session();
    session.dispatch("DisplaySamples");
    session.select_feature(SAMPLES_LAYER_ID, "samples.0").unwrap();
    session.select_feature(SAMPLES_LAYER_ID, "samples.1").unwrap();
    assert!(!session.unselect_feature("samples.0"));
    assert_eq!(session.popups_len(), 1);
    assert_eq!(session.popup().unwrap().feature_id, "samples.1");

    // The close box still reaches the owner.
    assert_eq!(session.selected().unwrap().feature_id, "samples.1");
    session.close_popup().unwrap();
    assert!(session.selected().is_none());
}

#[test]
fn test_layers_without_popups_select_silently() {
    let (mut session, _) = session();
    session.dispatch("DisplayCurrentLocation");
    session
        .select_feature(CURRENT_LOCATION_LAYER_ID, "current_location.0")
        .unwrap();
    assert_eq!(session.popups_len(), 0);
    assert_eq!(
        session.selected().unwrap().feature_id,
        "current_location.0"
    );
}

#[test]
fn test_hide_closes_popup_on_layer() {
    let (mut session, _) = session();
    session.dispatch("DisplaySamples");
    session.select_feature(SAMPLES_LAYER_ID, "samples.2").unwrap();
    session.dispatch("HideSamples");
    assert_eq!(session.popups_len(), 0);
    assert!(session.selected().is_none());
}

#[test]
fn test_close_popup_unselects_feature() {
    let (mut session, _) = session();
    session.dispatch("DisplaySamples");
    session.select_feature(SAMPLES_LAYER_ID, "samples.0").unwrap();
    let closed = session.close_popup().unwrap();
    assert_eq!(closed.feature_id, "samples.0");
    assert!(session.selected().is_none());
    assert!(session.close_popup().is_none());
}

#[test]
fn test_click_selects_nearest_and_click_out_clears() {
    let (mut session, _) = session();
    session.dispatch("DisplaySamples");

    let hit = session.click(Point::new(2.1, 1.9)).unwrap().unwrap();
    assert_eq!(hit.feature_id, "samples.1");
    assert_eq!(session.popups_len(), 1);

    assert!(session.click(Point::new(15.0, -8.0)).unwrap().is_none());
    assert_eq!(session.popups_len(), 0);
    assert!(session.selected().is_none());
}

#[test]
fn test_click_inside_track_bounds_picks_sample() {
    let (mut session, state) = session();
    {
        let mut state = state.borrow_mut();
        state.samples = r#"{"points":[{"x":2,"y":8}]}"#.to_string();
        state.position_history =
            r#"{"points":[{"x":0,"y":0},{"x":10,"y":0},{"x":10,"y":10}]}"#.to_string();
    }
    session.dispatch("DisplaySamples");
    session.dispatch("DisplayPositionHistory");

    // Zoom 3 on the mock grid: 8 px is about 1.4 degrees.
    let hit = session.click(Point::new(2.1, 8.0)).unwrap().unwrap();
    assert_eq!(hit.layer_id, SAMPLES_LAYER_ID);
    assert_eq!(hit.feature_id, "samples.0");
    assert_eq!(session.popups_len(), 1);
    assert_eq!(session.popup().unwrap().feature_id, "samples.0");

    // Near the track's vertical leg; the sample is 8 away.
    let hit = session.click(Point::new(9.5, 6.0)).unwrap().unwrap();
    assert_eq!(hit.layer_id, POSITION_HISTORY_LAYER_ID);
    assert_eq!(session.popups_len(), 0);

    // Inside the track's box but far from both.
    assert!(session.click(Point::new(5.0, 5.0)).unwrap().is_none());
    assert!(session.selected().is_none());
}

#[test]
fn test_kml_popup_shows_placemark_name() {
    let (mut session, _) = session();
    session.dispatch("DisplayKML");
    let layer_id = session.kml_layer_ids()[0].clone();
    let layer = session.layer(&layer_id).unwrap();
    let named = layer.features().iter().find(|f| f.name().is_some()).unwrap();
    assert_eq!(named.name(), Some("Spring"));
    let feature_id = named.id().to_string();

    session.select_feature(&layer_id, &feature_id).unwrap();
    assert_eq!(
        session.popup().unwrap().content,
        "<div class=\"markerContent\">Spring</div><div>1.500000, 1.500000</div>"
    );
}

#[test]
fn test_kml_display_and_hide() {
    let (mut session, _) = session();
    session.dispatch("DisplayKML");
    let kml_layers = session.kml_layer_ids().to_vec();
    assert_eq!(kml_layers.len(), 1);
    let layer_id = &kml_layers[0];
    assert_eq!(feature_count(&session, layer_id), 2);

    let feature_id = session.layer(layer_id).unwrap().feature_ids()[0].clone();
    session.select_feature(layer_id, &feature_id).unwrap();
    assert_eq!(session.popups_len(), 1);

    session.dispatch("HideKML");
    assert!(session.kml_layer_ids().is_empty());
    assert!(session.layer(layer_id).is_none());
    assert_eq!(session.popups_len(), 0);
    assert_eq!(session.layers().len(), 3);
}

#[test]
fn test_pan_to_current_location() {
    let (mut session, state) = session();
    session.zoom_to(6);
    session.dispatch("PanToCurrentLocation");
    assert_eq!(session.view().center, Point::new(1.0, 1.0));

    state.borrow_mut().current_location = r#"{"points":[]}"#.to_string();
    session.dispatch("PanToCurrentLocation");
    assert_eq!(session.view().center, Point::new(1.0, 1.0));
}

#[test]
fn test_zoom_below_minimum_snaps_back() {
    let (mut session, _) = session();
    session.zoom_to(0);
    assert_eq!(session.view().zoom, 2);
}

#[test]
fn test_zoom_past_map_maximum_shows_empty_tiles() {
    let (mut session, _) = session();
    session.zoom_to(14);
    assert_eq!(session.view().zoom, 14);
    let tiles = session.redraw().to_vec();
    assert!(!tiles.is_empty());
    assert!(tiles.iter().all(|t| t.is_empty_tile()));

    session.zoom_to(10);
    assert!(session.redraw().iter().any(|t| !t.is_empty_tile()));

    session.zoom_to(40);
    assert_eq!(session.view().zoom, MAX_GRID_ZOOM);
}

#[test]
fn test_change_base_map_to_mercator_rebuilds_view() {
    let (mut session, state) = session();
    state.borrow_mut().map = MERCATOR_MAP.to_string();
    session.dispatch("ChangeBaseMap");

    assert_eq!(session.config().name, "moffett");
    assert_eq!(session.config().projection, Projection::WebMercator);
    assert_eq!(session.base_layer().redraw_count(), 1);

    let mercator = TileGrid::for_projection(Projection::WebMercator, 256);
    let view = session.view();
    assert_eq!(view.zoom, 13);
    assert_eq!(view.resolution(), mercator.resolution(13));

    // Restricted to the package, in metres.
    let extent = *view.restricted_extent().unwrap();
    assert!((extent.left() + 13_588_770.0).abs() < 10.0);
    assert!((extent.right() + 13_585_431.0).abs() < 10.0);
    assert!(extent.bottom() > 4_494_000.0 && extent.top() < 4_498_000.0);

    let tiles = session.base_layer().visible_tiles();
    assert!(tiles.iter().any(|t| !t.is_empty_tile()));
    assert!(tiles
        .iter()
        .filter(|t| !t.is_empty_tile())
        .all(|t| t.as_str().contains("/maps/moffett/tiles/13/")));
}

#[test]
fn test_change_base_map_replaces_config_and_redraws() {
    let (mut session, state) = session();
    assert_eq!(session.base_layer().redraw_count(), 0);

    state.borrow_mut().map = OTHER_MAP.to_string();
    session.dispatch("ChangeBaseMap");

    assert_eq!(session.config().name, "other");
    assert_eq!((session.config().min_zoom, session.config().max_zoom), (4, 12));
    assert_eq!(session.base_layer().redraw_count(), 1);
    assert!(session.view().zoom >= 4);

    let extent = *session.view().restricted_extent().unwrap();
    assert_eq!(extent.left(), 0.0);
    assert_eq!(extent.right(), 5.0);

    let tiles = session.base_layer().visible_tiles();
    assert!(tiles
        .iter()
        .filter(|t| !t.is_empty_tile())
        .all(|t| t.as_str().contains("/maps/other/tiles/")));
}

#[test]
fn test_unknown_command_is_ignored() {
    let (mut session, _) = session();
    session.dispatch("DisplaySamples");
    session.dispatch("Explode");
    session.dispatch("displaysamples");
    assert_eq!(feature_count(&session, SAMPLES_LAYER_ID), 3);
    assert_eq!(session.config().name, "mock");
}

#[test]
fn test_malformed_host_json_is_ignored() {
    let (mut session, state) = session();
    state.borrow_mut().samples = "not json".to_string();
    session.dispatch("DisplaySamples");
    assert_eq!(feature_count(&session, SAMPLES_LAYER_ID), 0);

    state.borrow_mut().map = r#"{"map":{"name":""}}"#.to_string();
    session.dispatch("ChangeBaseMap");
    assert_eq!(session.config().name, "mock");
    assert_eq!(session.base_layer().redraw_count(), 0);
}

#[test]
fn test_tile_url_uses_current_map() {
    let (session, _) = session();
    let inside = trailmap::Bounds::from_coords(-180.0, -90.0, 0.0, 90.0);
    match session.tile_url(&inside, 2) {
        TileUrl::Local { url, .. } => assert!(url.contains("/maps/mock/tiles/2/")),
        other => panic!("expected a local tile, got {:?}", other),
    }
}
