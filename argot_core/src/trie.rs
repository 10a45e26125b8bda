use std::collections::HashMap;
use thiserror::Error;

/// Failure to insert into a [`Trie`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrieError {
    /// Keys must contain at least one character.
    #[error("Trie keys must not be empty.")]
    EmptyKey,
}

/// A prefix index mapping string keys to (possibly many) values.
///
/// Lookups resolve the *longest* inserted key which prefixes the query.
/// The tokenizer uses this to resolve per-option short name prefixes (ex: a custom `-b` alongside the default `-`).
///
/// ### Example
/// ```
/// # use argot_core as argot;
/// use argot::Trie;
///
/// let mut trie = Trie::default();
/// trie.add("-", 'a').unwrap();
/// trie.add("-b", 'x').unwrap();
///
/// assert_eq!(trie.get_values("-bx"), Some((&['x'][..], 2)));
/// assert_eq!(trie.get_values("-a"), Some((&['a'][..], 1)));
/// assert_eq!(trie.get_values("a"), None);
/// ```
#[derive(Debug)]
pub struct Trie<V> {
    root: TrieNode<V>,
    len: usize,
}

#[derive(Debug)]
struct TrieNode<V> {
    children: HashMap<char, TrieNode<V>>,
    values: Vec<V>,
}

impl<V> Default for TrieNode<V> {
    fn default() -> Self {
        Self {
            children: HashMap::default(),
            values: Vec::default(),
        }
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self {
            root: TrieNode::default(),
            len: 0,
        }
    }
}

impl<V> Trie<V> {
    /// Make `value` reachable by precisely `key`.
    /// Multiple values may share the same key.
    pub fn add(&mut self, key: &str, value: V) -> Result<(), TrieError> {
        if key.is_empty() {
            return Err(TrieError::EmptyKey);
        }

        let mut node = &mut self.root;

        for c in key.chars() {
            node = node.children.entry(c).or_default();
        }

        node.values.push(value);
        self.len += 1;
        Ok(())
    }

    /// Find the values of the longest inserted key which prefixes `query`.
    /// Returns the values along with the matched prefix length (in bytes).
    pub fn get_values(&self, query: &str) -> Option<(&[V], usize)> {
        let mut node = &self.root;
        let mut longest: Option<(&[V], usize)> = None;

        for (offset, c) in query.char_indices() {
            match node.children.get(&c) {
                Some(child) => {
                    node = child;

                    if !node.values.is_empty() {
                        longest.replace((&node.values, offset + c.len_utf8()));
                    }
                }
                None => break,
            }
        }

        longest
    }

    /// The number of values inserted.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no values have been inserted.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The inserted keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::default();
        let mut pending = vec![(String::default(), &self.root)];

        while let Some((prefix, node)) = pending.pop() {
            if !node.values.is_empty() {
                keys.push(prefix.clone());
            }

            for (c, child) in &node.children {
                let mut key = prefix.clone();
                key.push(*c);
                pending.push((key, child));
            }
        }

        keys.sort();
        keys
    }
}
