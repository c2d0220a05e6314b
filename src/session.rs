//! The map session: one context object owning the view, the base map, the
//! overlays, the popups and the host bridge.

use crate::{
    bridge::{fetch, Command, FetchContext, HostBridge, Update},
    core::{
        bounds::Bounds,
        builder::SessionBuilder,
        config::{MapConfig, SessionOptions},
        constants::{CURRENT_LOCATION_LAYER_ID, POSITION_HISTORY_LAYER_ID, SAMPLES_LAYER_ID},
        geo::Point,
        viewport::MapView,
    },
    layers::{
        base::LayerTrait,
        kml::{KmlLoader, KmlOverlayManager},
        manager::LayerManager,
        tile::TmsLayer,
        vector::{overlay, VectorLayer},
    },
    spatial::{SpatialIndex, SpatialItem},
    tiles::{OfflineTileSource, TileSource, TileUrl},
    ui::popup::{popup_content, Popup, PopupController},
    MapError, Result,
};

/// Address of a feature on the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRef {
    pub layer_id: String,
    pub feature_id: String,
}

impl FeatureRef {
    pub fn new(layer_id: &str, feature_id: &str) -> Self {
        Self {
            layer_id: layer_id.to_string(),
            feature_id: feature_id.to_string(),
        }
    }
}

pub struct MapSession {
    options: SessionOptions,
    config: MapConfig,
    view: MapView,
    base: TmsLayer,
    layers: LayerManager,
    kmls: KmlOverlayManager,
    popups: PopupController,
    selected: Option<FeatureRef>,
    bridge: Box<dyn HostBridge>,
}

impl MapSession {
    /// Starts a session with default options against `bridge`
    pub fn init(bridge: Box<dyn HostBridge>) -> Result<Self> {
        SessionBuilder::new().init(bridge)
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Fetches the current map from the host and sets up the view, the base
    /// layer and the built-in overlays.
    pub(crate) fn start(
        options: SessionOptions,
        kml_loader: Box<dyn KmlLoader>,
        bridge: Box<dyn HostBridge>,
    ) -> Result<Self> {
        options.validate()?;
        let config = MapConfig::from_host_json(&bridge.current_map()?)?;

        let base = TmsLayer::new(&config, &options);
        let view = fit_view(base.source(), &config, &options);

        let mut layers = LayerManager::new();
        layers.add_layer(overlay(POSITION_HISTORY_LAYER_ID, "PositionHistory", 1, false))?;
        layers.add_layer(overlay(SAMPLES_LAYER_ID, "Samples", 2, true))?;
        layers.add_layer(overlay(CURRENT_LOCATION_LAYER_ID, "CurrentLocation", 3, false))?;

        log::info!(
            "session started on map '{}' ({}, zoom {}..={})",
            config.name,
            config.projection,
            config.min_zoom,
            config.max_zoom
        );

        Ok(Self {
            options,
            config,
            view,
            base,
            layers,
            kmls: KmlOverlayManager::new(kml_loader),
            popups: PopupController::new(),
            selected: None,
            bridge,
        })
    }

    /// Handles a command string from the host UI. Unknown commands and
    /// failed host calls leave the session unchanged.
    pub fn dispatch(&mut self, message: &str) {
        let command: Command = match message.parse() {
            Ok(command) => command,
            Err(e) => {
                log::debug!("ignoring message: {}", e);
                return;
            }
        };

        let ctx = FetchContext::new(self.options.display_projection, self.config.projection);
        let update = match fetch(command, self.bridge.as_ref(), ctx) {
            Ok(update) => update,
            Err(e) => {
                log::warn!("{} skipped: {}", command, e);
                return;
            }
        };

        if let Err(e) = self.apply(update) {
            log::warn!("{} failed: {}", command, e);
        }
    }

    /// Applies an update to the view and layers
    pub fn apply(&mut self, update: Update) -> Result<()> {
        match update {
            Update::AddFeatures { layer_id, features } => {
                self.layers
                    .get_mut(&layer_id)
                    .ok_or_else(|| unknown_layer(&layer_id))?
                    .add_features(features);
            }
            Update::ClearLayer(layer_id) => {
                self.hide_layer(&layer_id)?;
            }
            Update::ShowKml(names) => {
                for name in names {
                    self.kmls
                        .display(&name, &self.options, self.config.projection, &mut self.layers)?;
                }
            }
            Update::ClearKml => {
                let removed = self.kmls.hide_all(&mut self.layers);
                self.forget_features(&removed);
            }
            Update::PanTo(center) => self.view.pan_to(center),
            Update::ReplaceMap(config) => self.change_base_map(config)?,
        }
        Ok(())
    }

    /// Resolves the tile with `bounds` (map projection) at `zoom`
    pub fn tile_url(&self, bounds: &Bounds, zoom: u8) -> TileUrl {
        self.base.source().resolve(bounds, zoom)
    }

    /// Selects a feature, unselecting the previous one. Opens a popup when
    /// the feature's layer shows popups.
    pub fn select_feature(&mut self, layer_id: &str, feature_id: &str) -> Result<()> {
        let layer = self
            .layers
            .get(layer_id)
            .ok_or_else(|| unknown_layer(layer_id))?;
        if !layer.is_selectable() {
            return Err(MapError::Layer(format!("layer '{}' is not selectable", layer_id)));
        }
        let feature = layer.feature(feature_id).ok_or_else(|| {
            MapError::Layer(format!("no feature '{}' on layer '{}'", feature_id, layer_id))
        })?;

        let popup = match (layer.shows_popups(), feature.anchor()) {
            (true, Some(anchor)) => {
                let content =
                    popup_content(feature, self.config.projection, self.options.display_projection);
                Some(Popup::new(feature_id, layer_id, anchor, content))
            }
            _ => None,
        };

        if let Some(previous) = self.selected.take() {
            if previous.feature_id != feature_id {
                self.popups.close_for_feature(&previous.feature_id);
            }
        }
        if let Some(popup) = popup {
            self.popups.open(popup);
        }
        self.selected = Some(FeatureRef::new(layer_id, feature_id));
        Ok(())
    }

    /// Unselects a feature and closes the popup it owns. A popup owned by
    /// another feature stays open. Returns whether a popup was closed.
    pub fn unselect_feature(&mut self, feature_id: &str) -> bool {
        if self
            .selected
            .as_ref()
            .map(|s| s.feature_id == feature_id)
            .unwrap_or(false)
        {
            self.selected = None;
        }
        self.popups.close_for_feature(feature_id).is_some()
    }

    /// Closes the open popup via its close box, unselecting its feature
    pub fn close_popup(&mut self) -> Option<Popup> {
        let popup = self.popups.close()?;
        if self
            .selected
            .as_ref()
            .map(|s| s.feature_id == popup.feature_id)
            .unwrap_or(false)
        {
            self.selected = None;
        }
        Some(popup)
    }

    /// Handles a tap at `point` (map projection). Selects the selectable
    /// feature whose geometry lies closest to the tap, within the click
    /// tolerance, or clears the selection when nothing is hit.
    pub fn click(&mut self, point: Point) -> Result<Option<FeatureRef>> {
        let tolerance = self.options.click_tolerance_px * self.view.resolution();
        let items: Vec<SpatialItem<FeatureRef>> = self
            .layers
            .layers()
            .filter(|layer| layer.is_visible() && layer.is_selectable())
            .flat_map(|layer| {
                layer.features().iter().filter_map(move |feature| {
                    feature.bounds().map(|bounds| {
                        SpatialItem::new(
                            feature.id().to_string(),
                            bounds,
                            FeatureRef::new(layer.id(), feature.id()),
                        )
                    })
                })
            })
            .collect();
        let index = SpatialIndex::from_items(items);

        let hit = index
            .candidates_near(&point, tolerance)
            .into_iter()
            .filter_map(|item| {
                let feature = self
                    .layers
                    .get(&item.data.layer_id)?
                    .feature(&item.data.feature_id)?;
                Some((feature.distance_to(point), &item.data))
            })
            .filter(|(distance, _)| *distance <= tolerance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, hit)| hit.clone());

        match hit {
            Some(hit) => {
                self.select_feature(&hit.layer_id, &hit.feature_id)?;
                Ok(Some(hit))
            }
            None => {
                if let Some(previous) = self.selected.take() {
                    self.popups.close_for_feature(&previous.feature_id);
                }
                Ok(None)
            }
        }
    }

    /// Closes popups on the layer's features, then removes the features.
    /// Returns how many were removed.
    pub fn hide_layer(&mut self, layer_id: &str) -> Result<usize> {
        let ids = self
            .layers
            .get(layer_id)
            .ok_or_else(|| unknown_layer(layer_id))?
            .feature_ids();
        self.forget_features(&ids);
        let removed = self
            .layers
            .get_mut(layer_id)
            .ok_or_else(|| unknown_layer(layer_id))?
            .remove_all_features();
        Ok(removed.len())
    }

    /// Switches the base map. Overlay features are kept as they are.
    pub fn change_base_map(&mut self, config: MapConfig) -> Result<()> {
        config.validate()?;
        let source = OfflineTileSource::new(&config, &self.options);

        if config.projection != self.config.projection {
            self.view = fit_view(&source, &config, &self.options);
        } else {
            self.view.set_min_zoom(config.min_zoom);
            self.view.set_restricted_extent(Some(*source.extent()));
        }

        log::info!("base map '{}' -> '{}'", self.config.name, config.name);
        self.base.set_source(source);
        self.config = config;
        self.base.redraw(&self.view);
        Ok(())
    }

    fn forget_features(&mut self, feature_ids: &[String]) {
        self.popups.close_for_features(feature_ids);
        if self
            .selected
            .as_ref()
            .map(|s| feature_ids.contains(&s.feature_id))
            .unwrap_or(false)
        {
            self.selected = None;
        }
    }

    pub fn layer(&self, layer_id: &str) -> Option<&VectorLayer> {
        self.layers.get(layer_id)
    }

    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    pub fn kml_layer_ids(&self) -> &[String] {
        self.kmls.layer_ids()
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popups.current()
    }

    pub fn popups_len(&self) -> usize {
        self.popups.len()
    }

    pub fn selected(&self) -> Option<&FeatureRef> {
        self.selected.as_ref()
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    /// Zooms the view; zooming out past the map's minimum snaps back to it
    pub fn zoom_to(&mut self, zoom: u8) {
        self.view.zoom_to(zoom);
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn base_layer(&self) -> &TmsLayer {
        &self.base
    }

    /// Re-resolves the tiles covering the current view
    pub fn redraw(&mut self) -> &[TileUrl] {
        self.base.redraw(&self.view)
    }
}

/// A view zoomed to and restricted to the map's extent
fn fit_view(source: &OfflineTileSource, config: &MapConfig, options: &SessionOptions) -> MapView {
    let extent = *source.extent();
    let mut view = MapView::new(source.grid(), options.viewport_size);
    view.set_min_zoom(config.min_zoom);
    view.zoom_to_extent(&extent);
    view.set_restricted_extent(Some(extent));
    view
}

fn unknown_layer(layer_id: &str) -> MapError {
    MapError::Layer(format!("no layer '{}'", layer_id))
}
