use regex::Regex;
use std::path::PathBuf;

lazy_static::lazy_static! {
    static ref DATE_PREFIX: Regex =
        Regex::new(r"^([0-9]{4})([0-9]{2})?([0-9]{2})?").expect("valid date prefix regex");
}

/// Date components read from the leading digits of a note's file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDate {
    pub year: String,
    pub month: Option<String>,
    pub day: Option<String>,
}

impl NoteDate {
    /// `year[/month[/day]]`, absent components omitted.
    pub fn relative_dir(&self) -> PathBuf {
        let mut dir = PathBuf::from(&self.year);
        if let Some(month) = &self.month {
            dir.push(month);
        }
        if let Some(day) = &self.day {
            dir.push(day);
        }
        dir
    }
}

/// Returns the date prefix of `file_name`, or `None` if it is not a dated note.
pub fn classify(file_name: &str) -> Option<NoteDate> {
    let caps = DATE_PREFIX.captures(file_name)?;
    Some(NoteDate {
        year: caps[1].to_string(),
        month: caps.get(2).map(|m| m.as_str().to_string()),
        day: caps.get(3).map(|m| m.as_str().to_string()),
    })
}
