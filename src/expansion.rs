use crate::config::ExpandableConfig;
use crate::selection::KeyUniverse;

/// Expanded row keys. Independent of filtering: a hidden row keeps its flag.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    controlled: Option<Vec<String>>,
    expanded: Vec<String>,
}

impl ExpansionState {
    pub fn new(config: Option<&ExpandableConfig>, universe: &KeyUniverse) -> Self {
        match config {
            Some(config) => Self {
                controlled: config.expanded_keys.clone(),
                expanded: if config.default_expand_all_rows {
                    universe.all_keys.clone()
                } else {
                    config.default_expanded_keys.clone()
                },
            },
            None => Self::default(),
        }
    }

    pub fn set_controlled(&mut self, keys: Option<Vec<String>>) {
        self.controlled = keys;
    }

    pub fn expanded_keys(&self) -> &[String] {
        self.controlled.as_deref().unwrap_or(&self.expanded)
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded_keys().iter().any(|k| k == key)
    }

    /// Flip one key, returning the new expanded set
    pub fn toggle(&mut self, key: &str) -> Vec<String> {
        let mut keys = self.expanded_keys().to_vec();
        match keys.iter().position(|k| k == key) {
            Some(pos) => {
                keys.remove(pos);
            }
            None => keys.push(key.to_string()),
        }

        if self.controlled.is_none() {
            self.expanded = keys.clone();
        }
        keys
    }
}
