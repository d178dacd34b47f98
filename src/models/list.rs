use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single entry in an object listing.
///
/// Names are relative to the listing prefix; directory entries keep their
/// trailing separator. Immutable once received from the backend.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectEntry {
    pub name: String,
    pub size: i64,
    pub last_modified: Option<DateTime<Utc>>,
    pub is_directory: bool,
    pub content_type: Option<String>,
}

impl ObjectEntry {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            last_modified: None,
            is_directory: true,
            content_type: None,
        }
    }

    pub fn file(name: impl Into<String>, size: i64, last_modified: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            size,
            last_modified,
            is_directory: false,
            content_type: None,
        }
    }
}

/// One page of listing results as returned by the backend.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub entries: Vec<ObjectEntry>,
    pub continuation_token: Option<String>,
    pub truncated: bool,
}

/// Per-column sort order flags. Toggling one column leaves the others
/// alone; all flags reset to defaults on navigation-target change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub by_name: bool,
    pub by_size: bool,
    pub by_date: bool,
}

/// Stable sort by name, case-insensitive. Directories and files are not
/// segregated; any directories-first convention is a presentation concern.
pub fn sort_by_name(entries: &mut [ObjectEntry], ascending: bool) {
    entries.sort_by(|a, b| {
        let ord = a.name.to_lowercase().cmp(&b.name.to_lowercase());
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}

/// Stable sort by size.
pub fn sort_by_size(entries: &mut [ObjectEntry], ascending: bool) {
    entries.sort_by(|a, b| {
        let ord = a.size.cmp(&b.size);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}

/// Stable sort by last-modified timestamp.
pub fn sort_by_date(entries: &mut [ObjectEntry], ascending: bool) {
    entries.sort_by(|a, b| {
        let ord = a.last_modified.cmp(&b.last_modified);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<ObjectEntry> {
        vec![
            ObjectEntry::file("beta.txt", 10, None),
            ObjectEntry::directory("alpha/"),
            ObjectEntry::file("Alpha.txt", 30, None),
            ObjectEntry::file("gamma.txt", 10, None),
        ]
    }

    #[test]
    fn name_sort_is_case_insensitive() {
        let mut list = entries();
        sort_by_name(&mut list, true);
        let names: Vec<_> = list.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha.txt", "alpha/", "beta.txt", "gamma.txt"]);
    }

    #[test]
    fn size_sort_keeps_equal_keys_in_relative_order() {
        let mut list = entries();
        sort_by_size(&mut list, true);
        let names: Vec<_> = list.iter().map(|e| e.name.as_str()).collect();
        // beta and gamma both weigh 10 and keep their original order
        assert_eq!(names, vec!["alpha/", "beta.txt", "gamma.txt", "Alpha.txt"]);

        sort_by_size(&mut list, false);
        let names: Vec<_> = list.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha.txt", "beta.txt", "gamma.txt", "alpha/"]);
    }

    #[test]
    fn directories_are_not_segregated() {
        let mut list = entries();
        sort_by_name(&mut list, false);
        let names: Vec<_> = list.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["gamma.txt", "beta.txt", "alpha/", "Alpha.txt"]);
    }

    #[test]
    fn sort_flags_toggle_independently() {
        let mut sort = SortState::default();
        sort.by_name = !sort.by_name;
        assert!(sort.by_name);
        assert!(!sort.by_size);
        assert!(!sort.by_date);
    }
}
