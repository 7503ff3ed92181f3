use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

/// Files marked for batch delete or single-file rename.
///
/// An empty set means the user is not in selection mode. Transitions return
/// a new value so snapshots can be published as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: BTreeSet<PathBuf>,
}

impl SelectionSet {
    /// Flip the mark on `file`.
    #[must_use]
    pub fn toggle(&self, file: &Path) -> Self {
        let selected = !self.is_selected(file);
        self.set_selected(file, selected)
    }

    /// Mark or unmark `file`.
    #[must_use]
    pub fn set_selected(&self, file: &Path, selected: bool) -> Self {
        let mut next = self.clone();
        if selected {
            next.selected.insert(file.to_path_buf());
        } else {
            next.selected.remove(file);
        }
        next
    }

    /// Leave selection mode.
    #[must_use]
    pub fn clear(&self) -> Self {
        Self::default()
    }

    /// Whether `file` is marked.
    pub fn is_selected(&self, file: &Path) -> bool {
        self.selected.contains(file)
    }

    /// Whether anything is marked.
    pub fn is_in_selection_mode(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Whether exactly one file is marked, the only case rename allows.
    pub fn is_single_selection(&self) -> bool {
        self.selected.len() == 1
    }

    /// The marked file when exactly one is marked.
    pub fn single(&self) -> Option<&Path> {
        if self.is_single_selection() {
            self.selected.first().map(PathBuf::as_path)
        } else {
            None
        }
    }

    /// Number of marked files.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Marked files in path order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.selected.iter().map(PathBuf::as_path)
    }
}
