//! Scoped definitions with TeX-like grouping semantics
//!
//! A `Namespace` holds nameable things (here: macros) that can be set either
//! globally or local to the innermost group. Leaving a group undoes every
//! local change made inside it, using an undo stack the way TeX does.

use rapidhash::{RapidHashMap, RapidHashSet};

use crate::types::ParseError;

/// Hash map used for every runtime table in the crate.
pub type KeyMap<K, V> = RapidHashMap<K, V>;
/// Hash set counterpart of [`KeyMap`].
pub type KeySet<K> = RapidHashSet<K>;
/// Mapping from names to values.
pub type Mapping<V> = KeyMap<String, V>;

/// Scoped name table backed by an immutable builtin table.
///
/// `get` and local `set` are O(1); global `set` is O(depth) in the group
/// nesting level.
#[derive(Debug)]
pub struct Namespace<V: Clone + 'static> {
    current: Mapping<V>,
    builtins: &'static phf::Map<&'static str, V>,
    /// One map per open group: the value each name had before the group
    /// changed it (`None` meaning it was undefined).
    undef_stack: Vec<KeyMap<String, Option<V>>>,
}

impl<V: Clone> Namespace<V> {
    /// Namespace over the builtins with `global` as the outermost user scope.
    #[must_use]
    pub const fn new(builtins: &'static phf::Map<&'static str, V>, global: Mapping<V>) -> Self {
        Self {
            current: global,
            builtins,
            undef_stack: Vec::new(),
        }
    }

    /// Open a nested group; later local `set`s are undone by its `end_group`.
    pub fn begin_group(&mut self) {
        self.undef_stack.push(KeyMap::default());
    }

    fn restore_changes(&mut self, undefs: KeyMap<String, Option<V>>) {
        for (name, previous) in undefs {
            match previous {
                Some(v) => {
                    self.current.insert(name, v);
                }
                None => {
                    self.current.remove(&name);
                }
            }
        }
    }

    /// Close the innermost group, restoring the values it shadowed.
    pub fn end_group(&mut self) -> Result<(), ParseError> {
        let undefs = self.undef_stack.pop().ok_or_else(|| {
            ParseError::new("Unbalanced namespace destruction: more endGroups than beginGroups")
        })?;
        self.restore_changes(undefs);
        Ok(())
    }

    /// Close every open group. Returns how many were open.
    pub fn end_groups(&mut self) -> usize {
        let mut count = 0;
        while let Some(undefs) = self.undef_stack.pop() {
            self.restore_changes(undefs);
            count += 1;
        }
        count
    }

    /// Number of open groups.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.undef_stack.len()
    }

    /// Whether `name` is defined, by the user or as a builtin.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.current.contains_key(name) || self.builtins.contains_key(name)
    }

    /// The current value of `name`, user definitions shadowing builtins.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.current.get(name).or_else(|| self.builtins.get(name))
    }

    /// Set `name` in the innermost group, or in every group when `global`.
    /// `None` deletes the definition.
    pub fn set(&mut self, name: &str, value: Option<V>, global: bool) {
        if global {
            // Drop every scheduled undo for this name and schedule one that
            // restores the new value, in case it is later reset locally.
            for level in &mut self.undef_stack {
                level.remove(name);
            }
            if let Some(top) = self.undef_stack.last_mut() {
                top.insert(name.to_owned(), value.clone());
            }
        } else if let Some(top) = self.undef_stack.last_mut()
            && !top.contains_key(name)
        {
            let prev = self.current.get(name).cloned();
            top.insert(name.to_owned(), prev);
        }

        match value {
            Some(v) => {
                self.current.insert(name.to_owned(), v);
            }
            None => {
                self.current.remove(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static BUILTINS: phf::Map<&'static str, &'static str> = phf::phf_map! {
        "\\lq" => "`",
    };

    fn namespace() -> Namespace<&'static str> {
        Namespace::new(&BUILTINS, Mapping::default())
    }

    #[test]
    fn builtins_are_visible_and_shadowable() {
        let mut ns = namespace();
        assert_eq!(ns.get("\\lq"), Some(&"`"));
        ns.begin_group();
        ns.set("\\lq", Some("'"), false);
        assert_eq!(ns.get("\\lq"), Some(&"'"));
        ns.end_group().unwrap();
        assert_eq!(ns.get("\\lq"), Some(&"`"));
    }

    #[test]
    fn local_set_is_undone_at_end_of_group() {
        let mut ns = namespace();
        ns.set("\\x", Some("outer"), false);
        ns.begin_group();
        ns.set("\\x", Some("inner"), false);
        ns.set("\\x", Some("inner again"), false);
        assert_eq!(ns.get("\\x"), Some(&"inner again"));
        ns.end_group().unwrap();
        assert_eq!(ns.get("\\x"), Some(&"outer"));
    }

    #[test]
    fn global_set_survives_every_group() {
        let mut ns = namespace();
        ns.begin_group();
        ns.begin_group();
        ns.set("\\y", Some("global"), true);
        ns.end_group().unwrap();
        ns.end_group().unwrap();
        assert_eq!(ns.get("\\y"), Some(&"global"));
    }

    #[test]
    fn local_reset_after_global_restores_the_global_value() {
        let mut ns = namespace();
        ns.begin_group();
        ns.set("\\z", Some("global"), true);
        ns.begin_group();
        ns.set("\\z", Some("local"), false);
        ns.end_group().unwrap();
        assert_eq!(ns.get("\\z"), Some(&"global"));
        assert_eq!(ns.end_groups(), 1);
        assert_eq!(ns.get("\\z"), Some(&"global"));
    }

    #[test]
    fn unbalanced_end_group_fails() {
        let mut ns = namespace();
        assert!(ns.end_group().is_err());
    }
}
