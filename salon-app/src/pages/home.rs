//! Home and About pages

use serde::Serialize;

use crate::i18n::Translator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticPage {
    pub title: String,
    pub paragraphs: Vec<String>,
    /// Call to action: label and target path
    pub action: Option<(String, String)>,
}

pub fn home(t: &Translator) -> StaticPage {
    StaticPage {
        title: t.t("home.welcome"),
        paragraphs: vec![t.t("home.subtitle")],
        action: Some((t.t("navigation.book_now"), "/book".to_string())),
    }
}

pub fn about(t: &Translator) -> StaticPage {
    StaticPage {
        title: t.t("about.title"),
        paragraphs: vec![t.t("about.paragraph1"), t.t("about.paragraph2")],
        action: None,
    }
}
