//! Page document model and translation application.
//!
//! - [`PageDocument`]: editable HTML tree parsed with `scraper`
//! - [`Markup`]: the attribute/class names pages use to flag translatable content
//! - [`DomApplier`]: writes a catalog into a document

mod apply;
mod document;
mod markup;

pub use apply::{ApplyReport, DomApplier};
pub use document::{DomNode, ElementData, PageDocument};
pub use ego_tree::NodeId;
pub use markup::Markup;
