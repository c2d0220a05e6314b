//! Macros shared by the layer implementations
//!
//! Every concrete layer keeps its common state in a `LayerProperties` field;
//! these macros generate the `LayerTrait` accessors over that field.

/// Implements the `LayerTrait` property accessors over a `LayerProperties`
/// field.
///
/// Usage:
/// ```ignore
/// impl LayerTrait for MyLayer {
///     impl_layer_trait!(MyLayer, properties);
/// }
/// ```
#[macro_export]
macro_rules! impl_layer_trait {
    ($layer_type:ty, $properties_field:ident) => {
        fn id(&self) -> &str {
            &self.$properties_field.id
        }

        fn name(&self) -> &str {
            &self.$properties_field.name
        }

        fn layer_type(&self) -> $crate::layers::base::LayerType {
            self.$properties_field.layer_type
        }

        fn z_index(&self) -> i32 {
            self.$properties_field.z_index
        }

        fn set_z_index(&mut self, z_index: i32) {
            self.$properties_field.z_index = z_index;
        }

        fn is_visible(&self) -> bool {
            self.$properties_field.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.$properties_field.visible = visible;
        }

        fn shows_popups(&self) -> bool {
            self.$properties_field.shows_popups
        }

        fn is_selectable(&self) -> bool {
            self.$properties_field.selectable
        }
    };
}

/// Implements `options()` as a JSON summary of the layer's properties
#[macro_export]
macro_rules! impl_default_options_serialization {
    ($properties_field:ident) => {
        fn options(&self) -> serde_json::Value {
            serde_json::json!({
                "id": self.$properties_field.id,
                "name": self.$properties_field.name,
                "layer_type": self.$properties_field.layer_type.to_string(),
                "z_index": self.$properties_field.z_index,
                "visible": self.$properties_field.visible,
                "shows_popups": self.$properties_field.shows_popups,
                "selectable": self.$properties_field.selectable
            })
        }
    };
}
