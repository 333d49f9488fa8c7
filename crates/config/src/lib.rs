// Configuration loading

pub mod settings;
pub mod store;
pub mod theme;

pub use settings::Settings;
pub use store::FileStore;
pub use theme::{EditorTheme, THEME_KEY};
