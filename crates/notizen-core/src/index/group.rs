use crate::config::Depth;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

pub const OTHER_NOTES_LABEL: &str = "Other notes";
pub const OTHER_NOTES_IDENTIFIER: &str = "other";

lazy_static::lazy_static! {
    static ref DATE_PATH: Regex =
        Regex::new(r"^([0-9]{4})/(?:([0-9]{2})/)?(?:([0-9]{2})/)?").expect("valid date path regex");
}

/// Ordering key of a group. `Other` compares below every dated key, so a
/// descending sort puts it last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Other,
    Dated(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub name: String,
    /// Relative to the index directory, `/`-separated.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    #[serde(skip)]
    pub sort_key: SortKey,
    pub label: String,
    pub identifier: String,
    pub notes: Vec<Note>,
    pub children: Vec<Group>,
}

impl Group {
    fn new(label: impl Into<String>, identifier: impl Into<String>, sort_key: SortKey) -> Self {
        Self {
            sort_key,
            label: label.into(),
            identifier: identifier.into(),
            notes: Vec::new(),
            children: Vec::new(),
        }
    }

    fn child_mut(&mut self, label: &str, identifier: String, sort_key: SortKey) -> &mut Group {
        let position = match self.children.iter().position(|c| c.label == label) {
            Some(position) => position,
            None => {
                self.children.push(Group::new(label, identifier, sort_key));
                self.children.len() - 1
            }
        };
        &mut self.children[position]
    }

    /// Children ascending by key, notes by name.
    fn finalize(&mut self) {
        self.children.sort_by_key(|c| c.sort_key);
        self.notes
            .sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        for child in &mut self.children {
            child.finalize();
        }
    }

    pub fn note_count(&self) -> usize {
        self.notes.len() + self.children.iter().map(Group::note_count).sum::<usize>()
    }
}

/// Builds the index tree for `paths`, most recent year first and
/// "Other notes" last. "Other notes" is present even when empty.
///
/// Dates come from the `year/[month/[day/]]` directories of each path
/// relative to `root`. Duplicate paths are counted once.
pub fn group_paths(paths: &[PathBuf], root: &Path, depth: Depth) -> Vec<Group> {
    let unique: BTreeSet<&Path> = paths.iter().map(PathBuf::as_path).collect();

    let mut groups: Vec<Group> = vec![Group::new(
        OTHER_NOTES_LABEL,
        OTHER_NOTES_IDENTIFIER,
        SortKey::Other,
    )];

    for path in unique {
        let relative = relative_path(path, root);
        let note = Note {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| relative.clone()),
            path: relative,
        };

        let Some(caps) = DATE_PATH.captures(&note.path) else {
            groups[0].notes.push(note);
            continue;
        };
        let year = caps[1].to_string();
        let month = caps.get(2).map(|m| m.as_str().to_string());
        let day = caps.get(3).map(|m| m.as_str().to_string());

        let year_group = top_level_mut(&mut groups, &year);
        match placement(&year, month.as_deref(), day.as_deref(), depth) {
            Some((label, identifier, key)) => year_group
                .child_mut(&label, identifier, SortKey::Dated(key))
                .notes
                .push(note),
            None => year_group.notes.push(note),
        }
    }

    groups.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
    for group in &mut groups {
        group.finalize();
    }
    groups
}

fn top_level_mut<'a>(groups: &'a mut Vec<Group>, year: &str) -> &'a mut Group {
    let position = match groups.iter().position(|g| g.label == year) {
        Some(position) => position,
        None => {
            let key = year.parse().unwrap_or(0);
            groups.push(Group::new(year, year, SortKey::Dated(key)));
            groups.len() - 1
        }
    };
    &mut groups[position]
}

/// Label, identifier and key of the child group a dated path belongs to, or
/// `None` when it sits directly under its year.
fn placement(
    year: &str,
    month: Option<&str>,
    day: Option<&str>,
    depth: Depth,
) -> Option<(String, String, u32)> {
    let year_num: i32 = year.parse().ok()?;
    let month_str = month?;
    let month_num: u32 = month_str.parse().ok()?;

    match depth {
        Depth::Year => None,
        Depth::Month => {
            let date = NaiveDate::from_ymd_opt(year_num, month_num, 1)?;
            Some((
                date.format("%B").to_string(),
                format!("{}{}", year, month_str),
                month_num,
            ))
        }
        Depth::Week => {
            let day_num: u32 = day?.parse().ok()?;
            let week = NaiveDate::from_ymd_opt(year_num, month_num, day_num)?
                .iso_week()
                .week();
            Some((week.to_string(), format!("{}{:02}", year, week), week))
        }
    }
}

fn relative_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(|p| Path::new("/notes").join(p)).collect()
    }

    fn labels(groups: &[Group]) -> Vec<&str> {
        groups.iter().map(|g| g.label.as_str()).collect()
    }

    fn names(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_month_grouping() {
        let groups = group_paths(&paths(&["2023/06/15/x.md"]), Path::new("/notes"), Depth::Month);
        assert_eq!(labels(&groups), vec!["2023", OTHER_NOTES_LABEL]);
        let year = &groups[0];
        assert!(year.notes.is_empty());
        assert_eq!(year.children.len(), 1);
        let june = &year.children[0];
        assert_eq!(june.label, "June");
        assert_eq!(june.sort_key, SortKey::Dated(6));
        assert_eq!(june.identifier, "202306");
        assert_eq!(
            june.notes,
            vec![Note {
                name: "x.md".into(),
                path: "2023/06/15/x.md".into()
            }]
        );
    }

    #[test]
    fn test_week_grouping_uses_iso_week() {
        let groups = group_paths(&paths(&["2023/06/15/x.md"]), Path::new("/notes"), Depth::Week);
        let week = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap().iso_week().week();
        assert_eq!(week, 24);
        let child = &groups[0].children[0];
        assert_eq!(child.label, "24");
        assert_eq!(child.sort_key, SortKey::Dated(24));
        assert_eq!(child.identifier, "202324");
        assert_eq!(names(&child.notes), vec!["x.md"]);
    }

    #[test]
    fn test_leaf_placement_under_year() {
        let input = paths(&["2023/a.md", "2023/06/b.md", "2023/06/15/c.md"]);

        let by_year = group_paths(&input, Path::new("/notes"), Depth::Year);
        assert_eq!(names(&by_year[0].notes), vec!["a.md", "b.md", "c.md"]);
        assert!(by_year[0].children.is_empty());

        // Without a day no week can be computed.
        let by_week = group_paths(&input, Path::new("/notes"), Depth::Week);
        assert_eq!(names(&by_week[0].notes), vec!["a.md", "b.md"]);
        assert_eq!(names(&by_week[0].children[0].notes), vec!["c.md"]);

        let by_month = group_paths(&input, Path::new("/notes"), Depth::Month);
        assert_eq!(names(&by_month[0].notes), vec!["a.md"]);
        assert_eq!(names(&by_month[0].children[0].notes), vec!["b.md", "c.md"]);
    }

    #[test]
    fn test_invalid_date_stays_under_year() {
        let groups = group_paths(&paths(&["2023/13/40/x.md"]), Path::new("/notes"), Depth::Week);
        assert_eq!(names(&groups[0].notes), vec!["x.md"]);
        let groups = group_paths(&paths(&["2023/13/x.md"]), Path::new("/notes"), Depth::Month);
        assert_eq!(names(&groups[0].notes), vec!["x.md"]);
    }

    #[test]
    fn test_top_level_descending_other_last() {
        let input = paths(&[
            "readme.txt",
            "2021/01/01/a.md",
            "2023/02/01/b.md",
            "projects/c.md",
            "2022/d.md",
        ]);
        let groups = group_paths(&input, Path::new("/notes"), Depth::Month);
        assert_eq!(labels(&groups), vec!["2023", "2022", "2021", OTHER_NOTES_LABEL]);
        assert_eq!(groups[3].identifier, "other");
        assert_eq!(names(&groups[3].notes), vec!["c.md", "readme.txt"]);
        assert_eq!(groups[3].notes[0].path, "projects/c.md");
    }

    #[test]
    fn test_children_ascending() {
        let input = paths(&["2023/11/01/a.md", "2023/02/01/b.md", "2023/06/01/c.md"]);
        let groups = group_paths(&input, Path::new("/notes"), Depth::Month);
        assert_eq!(
            labels(&groups[0].children),
            vec!["February", "June", "November"]
        );
    }

    #[test]
    fn test_other_group_kept_when_empty() {
        let groups = group_paths(&paths(&["2023/a.md"]), Path::new("/notes"), Depth::Month);
        assert_eq!(labels(&groups), vec!["2023", OTHER_NOTES_LABEL]);
        assert!(groups[1].notes.is_empty());
        assert_eq!(groups[1].identifier, OTHER_NOTES_IDENTIFIER);

        let groups = group_paths(&[], Path::new("/notes"), Depth::Week);
        assert_eq!(labels(&groups), vec![OTHER_NOTES_LABEL]);
    }

    #[test]
    fn test_iso_week_of_neighbouring_year_stays_under_path_year() {
        // 2023-01-01 is a Sunday in ISO week 52 of 2022.
        let input = paths(&["2023/01/01/new-year.md", "2023/01/02/monday.md"]);
        let groups = group_paths(&input, Path::new("/notes"), Depth::Week);

        assert_eq!(labels(&groups), vec!["2023", OTHER_NOTES_LABEL]);
        let year = &groups[0];
        assert_eq!(labels(&year.children), vec!["1", "52"]);
        let week52 = &year.children[1];
        assert_eq!(week52.sort_key, SortKey::Dated(52));
        assert_eq!(week52.identifier, "202352");
        assert_eq!(names(&week52.notes), vec!["new-year.md"]);
        assert_eq!(names(&year.children[0].notes), vec!["monday.md"]);
    }

    #[test]
    fn test_duplicates_counted_once() {
        let input = paths(&["2023/06/15/x.md", "2023/06/15/x.md", "readme.txt", "readme.txt"]);
        let groups = group_paths(&input, Path::new("/notes"), Depth::Week);
        let total: usize = groups.iter().map(Group::note_count).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_never_drops_a_path() {
        let input = paths(&[
            "2020/01/01/a.md",
            "2020/01/02/a.md",
            "2020/12/31/b.md",
            "2020/12/c.md",
            "2020/d.md",
            "1999x/e.md",
            "misc/f.md",
            "g.md",
        ]);
        for depth in [Depth::Year, Depth::Month, Depth::Week] {
            let groups = group_paths(&input, Path::new("/notes"), depth);
            let total: usize = groups.iter().map(Group::note_count).sum();
            assert_eq!(total, input.len(), "depth {}", depth);
        }
    }

    #[test]
    fn test_same_name_notes_ordered_by_path() {
        let input = paths(&["2023/06/16/x.md", "2023/06/15/x.md"]);
        let groups = group_paths(&input, Path::new("/notes"), Depth::Month);
        let june = &groups[0].children[0];
        assert_eq!(june.notes[0].path, "2023/06/15/x.md");
        assert_eq!(june.notes[1].path, "2023/06/16/x.md");
    }
}
