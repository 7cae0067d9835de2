// Modpack Manager - modpack registry, mod change tracking and plain-text persistence
//
// This is the library crate containing the data-management layer. A presentation
// layer (GUI or otherwise) drives it through the ModpackManager facade.

pub mod config;
pub mod logging;
pub mod manager;
pub mod models;
pub mod persistence;
pub mod store;
pub mod tracking;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use manager::{CollectionChange, ModpackManager};
pub use models::Settings;
pub use persistence::{FileStorage, LoadOutcome, PersistenceError, Storage};
pub use store::ModCollectionStore;
pub use tracking::ChangeTracker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
