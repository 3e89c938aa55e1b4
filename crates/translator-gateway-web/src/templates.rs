//! Askama templates for the HTML pages.
//!
//! ## Template Structure
//!
//! - `base.html` - Common layout with CSS/JS and navigation
//! - `home.html` - Translation form (submitted by `static/app.js`)
//! - `languages.html` - Supported languages table
//! - `history.html` - The caller's past translations with delete buttons

use askama::Template;
use askama_web::WebTemplate;
use translator_gateway_core::{DEFAULT_TARGET_LANG, HistoryPage, LanguageEntry, TranslationRecord};

/// Home page with the translation form.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<String>,
    pub languages: Vec<LanguageEntry>,
    pub default_target: &'static str,
}

impl HomeTemplate {
    pub const fn new(user: Option<String>, languages: Vec<LanguageEntry>) -> Self {
        Self {
            user,
            languages,
            default_target: DEFAULT_TARGET_LANG,
        }
    }

    /// Whether `code` is preselected as the target. Used in the form template.
    pub fn is_default_target(&self, code: &str) -> bool {
        code == self.default_target
    }
}

/// Supported languages page.
#[derive(Template, WebTemplate)]
#[template(path = "languages.html")]
pub struct LanguagesTemplate {
    pub user: Option<String>,
    pub languages: Vec<LanguageEntry>,
}

/// One page of the caller's translation history.
#[derive(Template, WebTemplate)]
#[template(path = "history.html")]
pub struct HistoryTemplate {
    pub user: Option<String>,
    pub records: Vec<TranslationRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

impl HistoryTemplate {
    pub fn from_page(user: Option<String>, page: HistoryPage) -> Self {
        Self {
            user,
            records: page.records,
            page: page.page,
            total_pages: page.total_pages,
            total: page.total,
        }
    }

    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Previous page number (clamped to 1). Used in pagination template.
    pub const fn prev_page(&self) -> usize {
        if self.page > 1 { self.page - 1 } else { 1 }
    }

    /// Next page number (clamped to last page). Used in pagination template.
    pub const fn next_page(&self) -> usize {
        if self.page < self.total_pages {
            self.page + 1
        } else {
            self.page
        }
    }
}
