#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Tile,
    Vector,
    Kml,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::Vector => write!(f, "vector"),
            LayerType::Kml => write!(f, "kml"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
    pub visible: bool,
    /// Features can be picked by taps
    pub selectable: bool,
    /// Selecting a feature opens an info popup
    pub shows_popups: bool,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType) -> Self {
        Self {
            id,
            name,
            layer_type,
            z_index: 0,
            visible: true,
            selectable: layer_type != LayerType::Tile,
            shows_popups: false,
        }
    }

    pub fn with_popups(mut self, shows_popups: bool) -> Self {
        self.shows_popups = shows_popups;
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

/// Properties every layer on the map exposes
pub trait LayerTrait {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn layer_type(&self) -> LayerType;

    fn z_index(&self) -> i32;

    fn set_z_index(&mut self, z_index: i32);

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    fn shows_popups(&self) -> bool;

    fn is_selectable(&self) -> bool;

    /// JSON description of the layer, for hosts and debugging
    fn options(&self) -> serde_json::Value;
}
