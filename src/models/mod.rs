use serde::{Deserialize, Serialize};

/// Group label used for residents that do not belong to any "tổ".
pub const DEFAULT_GROUP: &str = "Không có tổ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub id: String,
    pub full_name: String,
    pub unit: Option<String>,
    #[serde(default)]
    pub has_voted: bool,
}

impl Resident {
    pub fn new(id: impl Into<String>, unit: Option<&str>, has_voted: bool) -> Self {
        Self {
            id: id.into(),
            full_name: String::new(),
            unit: unit.map(str::to_string),
            has_voted,
        }
    }

    /// The aggregation key for this resident. Missing or blank labels fall
    /// into the default bucket.
    pub fn group(&self) -> &str {
        group_label(self.unit.as_deref())
    }
}

pub fn group_label(unit: Option<&str>) -> &str {
    match unit.map(str::trim) {
        Some(label) if !label.is_empty() => label,
        _ => DEFAULT_GROUP,
    }
}

/// Transient record of one toggle, kept only until the remote write resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteRecord<'a> {
    pub resident_id: &'a str,
    pub previous_flag: bool,
    pub requested_flag: bool,
}

impl<'a> VoteRecord<'a> {
    pub fn toggle(resident_id: &'a str, current_flag: bool) -> Self {
        Self {
            resident_id,
            previous_flag: current_flag,
            requested_flag: !current_flag,
        }
    }
}

/// Local view of the residents currently shown on the admin screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentSet {
    residents: Vec<Resident>,
}

impl ResidentSet {
    pub fn new(residents: Vec<Resident>) -> Self {
        Self { residents }
    }

    pub fn len(&self) -> usize {
        self.residents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resident> {
        self.residents.iter()
    }

    pub fn get(&self, resident_id: &str) -> Option<&Resident> {
        self.residents.iter().find(|r| r.id == resident_id)
    }

    pub fn flag(&self, resident_id: &str) -> Option<bool> {
        self.get(resident_id).map(|r| r.has_voted)
    }

    /// Sets the flag of the matching resident only. Returns the flag it
    /// replaced, or `None` when no resident has that id.
    pub fn set_flag(&mut self, resident_id: &str, flag: bool) -> Option<bool> {
        self.residents
            .iter_mut()
            .find(|r| r.id == resident_id)
            .map(|r| std::mem::replace(&mut r.has_voted, flag))
    }

    pub fn as_slice(&self) -> &[Resident] {
        &self.residents
    }
}

impl From<Vec<Resident>> for ResidentSet {
    fn from(residents: Vec<Resident>) -> Self {
        Self::new(residents)
    }
}
