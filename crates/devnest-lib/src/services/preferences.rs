// IDE preference list
// Ordered, de-duplicated, capped set of IDE ids (most preferred first)

use std::collections::VecDeque;

/// Maximum number of remembered IDE ids per project
pub const MAX_IDE_PREFERENCES: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceList {
    ids: VecDeque<String>,
}

impl PreferenceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a ranked list (first = most preferred).
    /// Later duplicates and entries past the cap are dropped.
    pub fn from_ranked<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new();
        for id in ids {
            if list.ids.len() == MAX_IDE_PREFERENCES {
                break;
            }
            let id = id.into();
            let id = id.trim();
            if id.is_empty() || list.contains(id) {
                continue;
            }
            list.ids.push_back(id.to_string());
        }
        list
    }

    /// Move `id` to the front, evicting the least preferred entry when full
    pub fn promote(&mut self, id: &str) {
        self.ids.retain(|existing| existing != id);
        self.ids.push_front(id.to_string());
        self.ids.truncate(MAX_IDE_PREFERENCES);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ids.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ranked_dedupes_and_caps() {
        let list = PreferenceList::from_ranked(["a", "b", "a", "c", "d"]);
        assert_eq!(list.into_vec(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_from_ranked_skips_blank_ids() {
        let list = PreferenceList::from_ranked(["", " b ", "b"]);
        assert_eq!(list.into_vec(), vec!["b"]);
    }

    #[test]
    fn test_promote_moves_to_front_and_evicts() {
        let mut list = PreferenceList::from_ranked(["a", "b", "c"]);
        list.promote("b");
        assert_eq!(list.clone().into_vec(), vec!["b", "a", "c"]);

        list.promote("d");
        assert_eq!(list.into_vec(), vec!["d", "b", "a"]);
    }
}
