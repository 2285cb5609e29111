//! Library entry for sitelang: the translation engine of a static multi-page
//! site, usable from the bundled CLI and from integration tests.
//!
//! - [`i18n`]: languages, preference storage, catalog loading, switching
//! - [`dom`]: page document model and catalog application
//! - [`settings`]: site configuration

pub mod dom;
pub mod i18n;
pub mod settings;
pub mod util;

pub use i18n::SwitchController;
pub use settings::SiteSettings;
