use crate::{
    core::geo::{Point, Projection},
    layers::vector::Feature,
};
use instant::Instant;

const DEFAULT_CONTENT: &str = "default popup";

/// An info bubble anchored on a selected feature
#[derive(Debug, Clone)]
pub struct Popup {
    pub id: String,
    pub feature_id: String,
    pub layer_id: String,
    /// Anchor in map projection units
    pub anchor: Point,
    /// HTML body
    pub content: String,
    pub closable: bool,
    pub created_at: Instant,
}

impl Popup {
    pub fn new(feature_id: &str, layer_id: &str, anchor: Point, content: String) -> Self {
        Self {
            id: format!("popup.{}", feature_id),
            feature_id: feature_id.to_string(),
            layer_id: layer_id.to_string(),
            anchor,
            content,
            closable: true,
            created_at: Instant::now(),
        }
    }
}

/// Keeps the map down to a single open popup
#[derive(Debug, Default)]
pub struct PopupController {
    current: Option<Popup>,
}

impl PopupController {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Shows `popup`, closing whichever popup was open. Returns the closed one.
    pub fn open(&mut self, popup: Popup) -> Option<Popup> {
        let previous = self.current.take();
        if let Some(prev) = &previous {
            log::debug!("closing popup for '{}'", prev.feature_id);
        }
        log::debug!("opening popup for '{}'", popup.feature_id);
        self.current = Some(popup);
        previous
    }

    /// Closes the popup only if it belongs to `feature_id`
    pub fn close_for_feature(&mut self, feature_id: &str) -> Option<Popup> {
        match &self.current {
            Some(popup) if popup.feature_id == feature_id => self.current.take(),
            _ => None,
        }
    }

    /// Closes the popup if it belongs to any of `feature_ids`
    pub fn close_for_features<S: AsRef<str>>(&mut self, feature_ids: &[S]) -> Option<Popup> {
        let owned = self
            .current
            .as_ref()
            .map(|popup| feature_ids.iter().any(|id| id.as_ref() == popup.feature_id))
            .unwrap_or(false);
        if owned {
            self.current.take()
        } else {
            None
        }
    }

    pub fn close(&mut self) -> Option<Popup> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&Popup> {
        self.current.as_ref()
    }

    pub fn len(&self) -> usize {
        usize::from(self.current.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

/// HTML shown for a feature: its name and display coordinates when it has a
/// name, a fixed placeholder otherwise.
pub fn popup_content(feature: &Feature, map_projection: Projection, display: Projection) -> String {
    match (feature.name(), feature.anchor()) {
        (Some(name), Some(anchor)) => {
            let shown = Projection::transform(anchor, map_projection, display);
            format!(
                "<div class=\"markerContent\">{}</div><div>{:.6}, {:.6}</div>",
                name, shown.y, shown.x
            )
        }
        _ => format!("<div class=\"markerContent\">{}</div>", DEFAULT_CONTENT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::vector::FeatureStyle;
    use geo_types::point;

    fn popup(feature_id: &str) -> Popup {
        Popup::new(feature_id, "samples", Point::new(1.0, 1.0), "x".into())
    }

    #[test]
    fn test_open_replaces_previous() {
        let mut popups = PopupController::new();
        assert!(popups.open(popup("samples.0")).is_none());
        let closed = popups.open(popup("samples.1")).unwrap();
        assert_eq!(closed.feature_id, "samples.0");
        assert_eq!(popups.len(), 1);
        assert_eq!(popups.current().unwrap().feature_id, "samples.1");
    }

    #[test]
    fn test_close_for_other_feature_keeps_popup() {
        let mut popups = PopupController::new();
        popups.open(popup("samples.1"));
        assert!(popups.close_for_feature("samples.0").is_none());
        assert_eq!(popups.len(), 1);
        assert!(popups.close_for_feature("samples.1").is_some());
        assert!(popups.is_empty());
    }

    #[test]
    fn test_close_for_features() {
        let mut popups = PopupController::new();
        popups.open(popup("kml.0.3"));
        assert!(popups.close_for_features(&["kml.0.1", "kml.0.2"]).is_none());
        assert!(popups.close_for_features(&["kml.0.2", "kml.0.3"]).is_some());
        assert_eq!(popups.len(), 0);
    }

    #[test]
    fn test_content_for_named_feature() {
        let feature = Feature::new(point!(x: -122.5, y: 37.25).into(), FeatureStyle::marker_red())
            .with_property("name", "Oak");
        let html = popup_content(&feature, Projection::Geographic, Projection::Geographic);
        assert_eq!(
            html,
            "<div class=\"markerContent\">Oak</div><div>37.250000, -122.500000</div>"
        );
    }

    #[test]
    fn test_content_falls_back_to_default() {
        let feature = Feature::new(point!(x: 1.0, y: 1.0).into(), FeatureStyle::marker_red());
        let html = popup_content(&feature, Projection::WebMercator, Projection::Geographic);
        assert_eq!(html, "<div class=\"markerContent\">default popup</div>");
    }
}
