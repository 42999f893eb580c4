use std::collections::HashSet;

use crate::config::{RowSelectionConfig, SelectionKind};
use crate::record::Record;

/// Every key of the unfiltered tree, plus the disabled ones
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyUniverse {
    pub all_keys: Vec<String>,
    pub disabled_keys: HashSet<String>,
}

impl KeyUniverse {
    /// Depth-first walk over the whole tree
    pub fn compute(records: &[Record]) -> Self {
        let mut universe = Self::default();
        universe.travel(records);
        universe
    }

    fn travel(&mut self, records: &[Record]) {
        for record in records {
            self.all_keys.push(record.key.clone());
            if record.disabled {
                self.disabled_keys.insert(record.key.clone());
            }
            if let Some(children) = &record.children {
                self.travel(children);
            }
        }
    }

    pub fn is_disabled(&self, key: &str) -> bool {
        self.disabled_keys.contains(key)
    }
}

/// Aggregate check state of the "select all" box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Indeterminate,
    Checked,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    kind: SelectionKind,
    controlled: Option<Vec<String>>,
    selected: Vec<String>,
}

impl SelectionState {
    pub fn new(config: &RowSelectionConfig) -> Self {
        Self {
            kind: config.kind,
            controlled: config.selected_keys.clone(),
            selected: config.default_selected_keys.clone(),
        }
    }

    pub fn kind(&self) -> SelectionKind {
        self.kind
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled.is_some()
    }

    pub fn set_controlled(&mut self, keys: Option<Vec<String>>) {
        self.controlled = keys;
    }

    pub fn selected_keys(&self) -> &[String] {
        self.controlled.as_deref().unwrap_or(&self.selected)
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected_keys().iter().any(|k| k == key)
    }

    /// Toggle one row. Disabled rows are left alone and yield `None`.
    pub fn select(&mut self, key: &str, checked: bool, universe: &KeyUniverse) -> Option<Vec<String>> {
        if universe.is_disabled(key) {
            return None;
        }

        let keys = match self.kind {
            SelectionKind::Radio if checked => vec![key.to_string()],
            SelectionKind::Radio => Vec::new(),
            SelectionKind::Checkbox => {
                let mut keys: Vec<String> = self.selected_keys().iter().filter(|k| *k != key).cloned().collect();
                if checked {
                    keys.push(key.to_string());
                }
                keys
            }
        };

        self.commit(keys.clone());
        Some(keys)
    }

    /// Check or uncheck every visible enabled row. Keys outside that set
    /// keep their state. Radio tables have no select-all and yield `None`.
    pub fn select_all(&mut self, checked: bool, visible_enabled: &[String]) -> Option<Vec<String>> {
        if self.kind == SelectionKind::Radio {
            return None;
        }

        let current = self.selected_keys();
        let keys: Vec<String> = if checked {
            let mut keys = current.to_vec();
            for key in visible_enabled {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
            keys
        } else {
            current.iter().filter(|k| !visible_enabled.contains(k)).cloned().collect()
        };

        self.commit(keys.clone());
        Some(keys)
    }

    fn commit(&mut self, keys: Vec<String>) {
        if self.controlled.is_none() {
            self.selected = keys;
        }
    }

    /// Selected keys among the visible rows
    pub fn current_selected(&self, visible: &[String]) -> Vec<String> {
        self.selected_keys().iter().filter(|k| visible.contains(k)).cloned().collect()
    }

    pub fn check_state(&self, visible_enabled: &[String]) -> CheckState {
        let selected = visible_enabled.iter().filter(|k| self.is_selected(k)).count();
        if selected == 0 {
            CheckState::Unchecked
        } else if selected == visible_enabled.len() {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn tree() -> Vec<Record> {
        vec![
            Record::new("1"),
            Record::new("2").with_children(vec![Record::new("2-1").disabled(), Record::new("2-2")]),
            Record::new("3").disabled(),
        ]
    }

    fn checkbox() -> SelectionState {
        SelectionState::new(&RowSelectionConfig::default())
    }

    #[test]
    fn universe_is_depth_first() {
        let universe = KeyUniverse::compute(&tree());
        assert_eq!(universe.all_keys, keys(&["1", "2", "2-1", "2-2", "3"]));
        assert!(universe.is_disabled("2-1"));
        assert!(universe.is_disabled("3"));
        assert!(!universe.is_disabled("2"));
    }

    #[test]
    fn checkbox_adds_and_removes() {
        let universe = KeyUniverse::compute(&tree());
        let mut sel = checkbox();
        assert_eq!(sel.select("1", true, &universe), Some(keys(&["1"])));
        assert_eq!(sel.select("2", true, &universe), Some(keys(&["1", "2"])));
        assert_eq!(sel.select("1", false, &universe), Some(keys(&["2"])));
        assert_eq!(sel.selected_keys(), keys(&["2"]).as_slice());
    }

    #[test]
    fn radio_holds_one_key() {
        let universe = KeyUniverse::compute(&tree());
        let mut sel = SelectionState::new(&RowSelectionConfig {
            kind: SelectionKind::Radio,
            ..Default::default()
        });
        sel.select("1", true, &universe);
        assert_eq!(sel.select("2", true, &universe), Some(keys(&["2"])));
        assert_eq!(sel.select("2", false, &universe), Some(Vec::new()));
    }

    #[test]
    fn radio_has_no_select_all() {
        let universe = KeyUniverse::compute(&tree());
        let mut sel = SelectionState::new(&RowSelectionConfig {
            kind: SelectionKind::Radio,
            ..Default::default()
        });
        sel.select("1", true, &universe);
        assert_eq!(sel.select_all(true, &keys(&["1", "2"])), None);
        assert_eq!(sel.select_all(false, &keys(&["1", "2"])), None);
        assert_eq!(sel.selected_keys(), keys(&["1"]).as_slice());
    }

    #[test]
    fn disabled_select_is_noop() {
        let universe = KeyUniverse::compute(&tree());
        let mut sel = checkbox();
        sel.select("1", true, &universe);
        assert_eq!(sel.select("3", true, &universe), None);
        assert_eq!(sel.selected_keys(), keys(&["1"]).as_slice());
    }

    #[test]
    fn select_all_round_trip_keeps_outside_keys() {
        let universe = KeyUniverse::compute(&tree());
        let mut sel = checkbox();
        sel.select("2-2", true, &universe);
        let before = sel.selected_keys().to_vec();

        let visible = keys(&["1", "2"]);
        assert_eq!(sel.select_all(true, &visible), Some(keys(&["2-2", "1", "2"])));
        assert_eq!(sel.check_state(&visible), CheckState::Checked);
        sel.select_all(false, &visible);
        assert_eq!(sel.selected_keys(), before.as_slice());
    }

    #[test]
    fn check_state_partial() {
        let universe = KeyUniverse::compute(&tree());
        let mut sel = checkbox();
        let visible = keys(&["1", "2"]);
        assert_eq!(sel.check_state(&visible), CheckState::Unchecked);
        sel.select("1", true, &universe);
        assert_eq!(sel.check_state(&visible), CheckState::Indeterminate);
        assert_eq!(sel.current_selected(&keys(&["2"])), Vec::<String>::new());
    }

    #[test]
    fn controlled_selection_is_not_persisted() {
        let universe = KeyUniverse::compute(&tree());
        let mut sel = SelectionState::new(&RowSelectionConfig {
            selected_keys: Some(keys(&["1"])),
            ..Default::default()
        });
        assert!(sel.is_controlled());
        assert_eq!(sel.select("2", true, &universe), Some(keys(&["1", "2"])));
        assert_eq!(sel.selected_keys(), keys(&["1"]).as_slice());
    }
}
