// Which checks the user wants run

use crate::error::{AuditError, Result};
use crate::registry::{self, AUDIT_CHECKS};
use std::collections::BTreeSet;

/// Mutable set of selected check ids. Runs never read it directly; they take
/// a [`CheckSelection::frozen`] snapshot at invocation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSelection {
    ids: BTreeSet<&'static str>,
}

impl Default for CheckSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl CheckSelection {
    pub fn all() -> Self {
        Self {
            ids: AUDIT_CHECKS.iter().map(|c| c.id).collect(),
        }
    }

    pub fn none() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }

    /// Build a selection from user-supplied ids, rejecting any id the
    /// registry does not know.
    pub fn from_ids<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::none();
        for id in ids {
            let id = id.as_ref().trim();
            if id.is_empty() {
                continue;
            }
            let check =
                registry::find(id).ok_or_else(|| AuditError::UnknownCheck(id.to_string()))?;
            selection.ids.insert(check.id);
        }
        Ok(selection)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Check or uncheck a single id. Unknown ids are an error.
    pub fn toggle(&mut self, id: &str, checked: bool) -> Result<()> {
        let check = registry::find(id).ok_or_else(|| AuditError::UnknownCheck(id.to_string()))?;
        if checked {
            self.ids.insert(check.id);
        } else {
            self.ids.remove(check.id);
        }
        Ok(())
    }

    /// Select everything, or clear everything when all are already selected.
    pub fn toggle_all(&mut self) {
        if self.is_all_selected() {
            self.ids.clear();
        } else {
            *self = Self::all();
        }
    }

    pub fn is_all_selected(&self) -> bool {
        self.ids.len() == AUDIT_CHECKS.len()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// This selection minus the given ids.
    pub fn without<I, S>(mut self, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            let id = id.as_ref().trim();
            if !id.is_empty() {
                self.toggle(id, false)?;
            }
        }
        Ok(self)
    }

    /// Selected ids in registry order.
    pub fn frozen(&self) -> Vec<&'static str> {
        AUDIT_CHECKS
            .iter()
            .map(|c| c.id)
            .filter(|id| self.ids.contains(id))
            .collect()
    }
}
