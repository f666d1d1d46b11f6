//! Interned region/category labels.
//!
//! Each distinct code is stored once and referred to by a small [`LabelId`].
//! Ids are assigned in ascending code order, so comparing ids orders rows the
//! same way comparing the codes would.
//!
//! Display names are interned separately as [`NameId`]s. A code may appear
//! under several names over time; every name stays addressable.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

/// Index into a [`Dictionary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LabelId(pub u32);

/// Index into a [`Dictionary`]'s display names. Ids follow name order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NameId(pub u32);

/// A code plus its human-readable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    labels: Vec<Label>,
    by_code: HashMap<String, LabelId>,
    names: Vec<String>,
    by_name: HashMap<String, NameId>,
}

impl Dictionary {
    pub fn get(&self, id: LabelId) -> Option<&Label> {
        self.labels.get(id.0 as usize)
    }

    /// First name seen for the code behind `id`; empty if the id is unknown.
    pub fn name(&self, id: LabelId) -> &str {
        self.get(id).map(|l| l.name.as_str()).unwrap_or("")
    }

    pub fn lookup(&self, code: &str) -> Option<LabelId> {
        self.by_code.get(code).copied()
    }

    pub fn name_id(&self, name: &str) -> Option<NameId> {
        self.by_name.get(name).copied()
    }

    /// Display name behind `id`; empty if the id is unknown.
    pub fn display(&self, id: NameId) -> &str {
        self.names.get(id.0 as usize).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LabelId, &Label)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, l)| (LabelId(i as u32), l))
    }

    /// Distinct display names, ascending.
    pub fn names(&self) -> Vec<String> {
        self.names.clone()
    }
}

/// Collects `(code, name)` pairs and freezes them into a [`Dictionary`].
///
/// The first name seen for a code becomes its [`Label`] name; every name
/// seen is kept in the name table.
#[derive(Debug, Default)]
pub struct DictionaryBuilder {
    entries: BTreeMap<String, String>,
    names: BTreeSet<String>,
}

impl DictionaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: &str, name: &str) {
        if !self.entries.contains_key(code) {
            self.entries.insert(code.to_string(), name.to_string());
        }
        if !self.names.contains(name) {
            self.names.insert(name.to_string());
        }
    }

    pub fn build(self) -> Dictionary {
        let mut labels = Vec::with_capacity(self.entries.len());
        let mut by_code = HashMap::with_capacity(self.entries.len());
        for (idx, (code, name)) in self.entries.into_iter().enumerate() {
            by_code.insert(code.clone(), LabelId(idx as u32));
            labels.push(Label { code, name });
        }
        let names: Vec<String> = self.names.into_iter().collect();
        let by_name = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), NameId(idx as u32)))
            .collect();
        Dictionary {
            labels,
            by_code,
            names,
            by_name,
        }
    }
}
