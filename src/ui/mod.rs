pub mod popup;

pub use popup::{popup_content, Popup, PopupController};
