pub mod app;
pub mod context;
pub mod store;
pub mod views;
pub mod vm;

pub use app::{App, Phase};
pub use context::{AppContext, UiApp, build_app_context};
pub use store::SessionStore;
