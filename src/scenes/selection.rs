//! Scene selection from command-line flags

use std::collections::BTreeSet;

/// Which scenes of the registry a run processes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every scene
    All,
    /// Exactly the named scenes
    Only(BTreeSet<String>),
    /// Scenes whose name starts with the marker
    Prefix(String),
}

impl Selection {
    /// Selection for the layout dump driver
    ///
    /// `--only` wins over `--all`; with neither, only scenes carrying the
    /// default prefix are selected. An empty `--only` list counts as absent.
    pub fn for_layout(only: Option<Vec<String>>, all: bool, default_prefix: &str) -> Self {
        match only.filter(|names| !names.is_empty()) {
            Some(names) => Selection::Only(names.into_iter().collect()),
            None if all => Selection::All,
            None => Selection::Prefix(default_prefix.to_string()),
        }
    }

    /// Selection for the screenshot driver: `--only`, else everything
    pub fn for_screenshot(only: Option<Vec<String>>) -> Self {
        match only.filter(|names| !names.is_empty()) {
            Some(names) => Selection::Only(names.into_iter().collect()),
            None => Selection::All,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(names) => names.contains(name),
            Selection::Prefix(prefix) => name.starts_with(prefix.as_str()),
        }
    }
}
