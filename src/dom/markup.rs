//! Attribute and class names the engine recognizes in page markup.

/// The markup contract between page authors and the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    /// Element text is replaced by the catalog value for this attribute's key.
    pub content_attr: String,
    /// The placeholder attribute is replaced by the value for this key.
    pub placeholder_attr: String,
    /// The first element with this attribute names the document title key.
    pub title_attr: String,
    /// Marks a switch control; the value is the language it selects.
    pub switch_attr: String,
    /// Class present on the switch control of the current language only.
    pub active_class: String,
    /// Attribute written for placeholder bindings.
    pub placeholder_target: String,
    /// `name` of the `<meta>` element holding the page description.
    pub description_meta: String,
}

impl Default for Markup {
    fn default() -> Self {
        Self {
            content_attr: "data-i18n".to_string(),
            placeholder_attr: "data-i18n-placeholder".to_string(),
            title_attr: "data-i18n-title".to_string(),
            switch_attr: "data-lang".to_string(),
            active_class: "lang-active".to_string(),
            placeholder_target: "placeholder".to_string(),
            description_meta: "description".to_string(),
        }
    }
}
