//! Category index and search filter of the settings manager.
//!
//! Categories and their items come from a `menu.toml` file:
//!
//! ```toml
//! [[category]]
//! name = "Personal"
//!
//! [[category.item]]
//! name = "Appearance"
//! comment = "Customize the look of your desktop"
//! icon = "preferences-desktop-theme"
//! command = "blade-appearance-settings"
//! ```

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use blsettings_types::error::{BlsettingsError, Result};

/// A launchable settings dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsItem {
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default, rename = "icon")]
    pub icon_name: String,
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default, rename = "item")]
    pub items: Vec<SettingsItem>,
}

#[derive(Debug, Deserialize)]
struct MenuFile {
    #[serde(default)]
    category: Vec<Category>,
}

/// An item plus its precomputed search text.
#[derive(Debug, Clone)]
struct IndexedItem {
    item: SettingsItem,
    /// Lower-cased `"name\ncomment"`.
    search_text: String,
}

#[derive(Debug, Clone)]
struct IndexedCategory {
    name: String,
    items: Vec<IndexedItem>,
}

/// A category with the items matching the current filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleCategory<'a> {
    pub name: &'a str,
    pub items: Vec<&'a SettingsItem>,
}

/// What pressing Return in the search entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnAction<'a> {
    /// Exactly one item is visible: launch it.
    Activate(&'a SettingsItem),
    /// Several items are visible: move focus to the first.
    Focus(&'a SettingsItem),
    Nothing,
}

fn compare_items(a: &SettingsItem, b: &SettingsItem) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Searchable overview of all settings dialogs.
#[derive(Debug, Clone, Default)]
pub struct SettingsIndex {
    categories: Vec<IndexedCategory>,
    filter: Option<String>,
}

impl SettingsIndex {
    /// Build an index. Empty categories are dropped and items sorted by
    /// name; category order is kept.
    pub fn new(categories: Vec<Category>) -> Self {
        let categories = categories
            .into_iter()
            .filter(|c| !c.items.is_empty())
            .map(|c| {
                let mut items = c.items;
                items.sort_by(compare_items);
                IndexedCategory {
                    name: c.name,
                    items: items
                        .into_iter()
                        .map(|item| IndexedItem {
                            search_text: fold(&format!("{}\n{}", item.name, item.comment)),
                            item,
                        })
                        .collect(),
                }
            })
            .collect();
        Self {
            categories,
            filter: None,
        }
    }

    /// Parse a `menu.toml` document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let menu: MenuFile =
            toml::from_str(text).map_err(|e| BlsettingsError::Config(format!("menu.toml: {e}")))?;
        Ok(Self::new(menu.category))
    }

    /// Load a `menu.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let index = Self::from_toml(&text)?;
        log::debug!(
            "Loaded {} categories from {}",
            index.categories.len(),
            path.display()
        );
        Ok(index)
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Update the search text. Returns whether the filter changed.
    pub fn set_filter(&mut self, text: &str) -> bool {
        let filter = (!text.is_empty()).then(|| fold(text));
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        true
    }

    fn matches(&self, item: &IndexedItem) -> bool {
        self.filter
            .as_deref()
            .is_none_or(|f| item.search_text.contains(f))
    }

    /// Categories with at least one matching item, in order.
    pub fn visible(&self) -> Vec<VisibleCategory<'_>> {
        self.categories
            .iter()
            .filter_map(|c| {
                let items: Vec<&SettingsItem> = c
                    .items
                    .iter()
                    .filter(|i| self.matches(i))
                    .map(|i| &i.item)
                    .collect();
                (!items.is_empty()).then_some(VisibleCategory {
                    name: &c.name,
                    items,
                })
            })
            .collect()
    }

    pub fn on_return(&self) -> ReturnAction<'_> {
        let mut visible = self
            .categories
            .iter()
            .flat_map(|c| c.items.iter())
            .filter(|i| self.matches(i))
            .map(|i| &i.item);
        match (visible.next(), visible.next()) {
            (Some(only), None) => ReturnAction::Activate(only),
            (Some(first), Some(_)) => ReturnAction::Focus(first),
            (None, _) => ReturnAction::Nothing,
        }
    }

    /// Clear a non-empty filter. Returns whether the key was consumed.
    pub fn on_escape(&mut self) -> bool {
        self.filter.take().is_some()
    }
}

/// Canonical decomposition followed by full case folding, applied to both
/// the filter and the searched text.
fn fold(text: &str) -> String {
    caseless::default_case_fold_str(&text.nfd().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, comment: &str) -> SettingsItem {
        SettingsItem {
            name: name.into(),
            comment: comment.into(),
            icon_name: String::new(),
            command: format!("run-{}", name.to_lowercase()),
        }
    }

    fn sample() -> SettingsIndex {
        SettingsIndex::new(vec![
            Category {
                name: "Personal".into(),
                items: vec![
                    item("Window Manager", "Configure window behavior"),
                    item("Appearance", "Customize the look of your desktop"),
                    item("appearance tweaks", "Extra theme options"),
                ],
            },
            Category {
                name: "Empty".into(),
                items: vec![],
            },
            Category {
                name: "Hardware".into(),
                items: vec![
                    item("Mouse", "Pointer speed and acceleration"),
                    item("Display", "Resolution and monitors"),
                ],
            },
        ])
    }

    fn names<'a>(cat: &VisibleCategory<'a>) -> Vec<&'a str> {
        cat.items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn empty_categories_dropped_items_sorted() {
        let idx = sample();
        let visible = idx.visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].name, "Personal");
        assert_eq!(
            names(&visible[0]),
            vec!["Appearance", "appearance tweaks", "Window Manager"]
        );
        assert_eq!(names(&visible[1]), vec!["Display", "Mouse"]);
    }

    #[test]
    fn filter_matches_name_and_comment() {
        let mut idx = sample();
        assert!(idx.set_filter("THEME"));
        let visible = idx.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(names(&visible[0]), vec!["appearance tweaks"]);

        assert!(idx.set_filter("pointer"));
        assert_eq!(names(&idx.visible()[0]), vec!["Mouse"]);
    }

    #[test]
    fn filter_does_not_span_name_and_comment() {
        let mut idx = sample();
        idx.set_filter("mouse pointer");
        assert!(idx.visible().is_empty());
    }

    #[test]
    fn filter_ignores_composition() {
        let mut idx = SettingsIndex::new(vec![Category {
            name: "Personal".into(),
            items: vec![
                item("Caf\u{e9} Theme", "Composed accent"),
                item("Ne\u{301}on", "Decomposed accent"),
            ],
        }]);
        idx.set_filter("cafe\u{301}");
        assert_eq!(names(&idx.visible()[0]), vec!["Caf\u{e9} Theme"]);
        idx.set_filter("N\u{c9}ON");
        assert_eq!(names(&idx.visible()[0]), vec!["Ne\u{301}on"]);
    }

    #[test]
    fn filter_uses_full_case_folding() {
        let mut idx = SettingsIndex::new(vec![Category {
            name: "System".into(),
            items: vec![item("Stra\u{df}e", "Street layout"), item("Keyboard", "")],
        }]);
        idx.set_filter("STRASSE");
        assert_eq!(names(&idx.visible()[0]), vec!["Stra\u{df}e"]);
        idx.set_filter("stra\u{df}");
        assert_eq!(names(&idx.visible()[0]), vec!["Stra\u{df}e"]);
        assert_eq!(idx.filter(), Some("strass"));
    }

    #[test]
    fn set_filter_reports_changes() {
        let mut idx = sample();
        assert!(!idx.set_filter(""));
        assert!(idx.set_filter("dis"));
        assert!(!idx.set_filter("DIS"));
        assert_eq!(idx.filter(), Some("dis"));
        assert!(idx.set_filter(""));
        assert_eq!(idx.filter(), None);
    }

    #[test]
    fn return_activates_single_item() {
        let mut idx = sample();
        idx.set_filter("resolution");
        match idx.on_return() {
            ReturnAction::Activate(i) => assert_eq!(i.command, "run-display"),
            other => panic!("expected Activate, got {other:?}"),
        }
    }

    #[test]
    fn return_focuses_first_of_many() {
        let mut idx = sample();
        idx.set_filter("a");
        match idx.on_return() {
            ReturnAction::Focus(i) => assert_eq!(i.name, "Appearance"),
            other => panic!("expected Focus, got {other:?}"),
        }
        idx.set_filter("zzz");
        assert_eq!(idx.on_return(), ReturnAction::Nothing);
    }

    #[test]
    fn escape_clears_filter_once() {
        let mut idx = sample();
        assert!(!idx.on_escape());
        idx.set_filter("mouse");
        assert!(idx.on_escape());
        assert_eq!(idx.filter(), None);
        assert_eq!(idx.visible().len(), 2);
        assert!(!idx.on_escape());
    }

    #[test]
    fn loads_menu_toml() {
        let text = r#"
[[category]]
name = "Personal"

[[category.item]]
name = "Appearance"
comment = "Customize the look of your desktop"
icon = "preferences-desktop-theme"
command = "blade-appearance-settings"

[[category]]
name = "System"
"#;
        let idx = SettingsIndex::from_toml(text).unwrap();
        let visible = idx.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].items[0].icon_name, "preferences-desktop-theme");
    }

    #[test]
    fn bad_menu_toml_is_config_error() {
        let err = SettingsIndex::from_toml("[[category]]\nname = 3").unwrap_err();
        assert!(matches!(err, BlsettingsError::Config(ref m) if m.starts_with("menu.toml:")));

        let err = SettingsIndex::from_toml("[[category\nname =").unwrap_err();
        assert!(matches!(err, BlsettingsError::Config(ref m) if m.starts_with("menu.toml:")));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn filtered_is_subset(filter in "[a-zA-Z ]{0,6}") {
                let mut idx = sample();
                idx.set_filter(&filter);
                let total: usize = idx.visible().iter().map(|c| c.items.len()).sum();
                prop_assert!(total <= 5);
                for cat in idx.visible() {
                    prop_assert!(!cat.items.is_empty());
                }
            }

            #[test]
            fn escape_restores_everything(filter in "[a-z]{1,6}") {
                let mut idx = sample();
                idx.set_filter(&filter);
                prop_assert!(idx.on_escape());
                prop_assert_eq!(idx.visible().len(), 2);
            }
        }
    }
}
