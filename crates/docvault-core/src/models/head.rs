use std::fmt;
use std::str::FromStr;

/// Top-level document category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MajorHead {
    Personal,
    Professional,
}

const PERSONAL_MINOR_HEADS: [&str; 5] = ["John", "Tom", "Emily", "Sarah", "David"];
const PROFESSIONAL_MINOR_HEADS: [&str; 5] = ["Accounts", "HR", "IT", "Finance", "Marketing"];

impl MajorHead {
    pub const ALL: [MajorHead; 2] = [MajorHead::Personal, MajorHead::Professional];

    pub fn as_str(&self) -> &'static str {
        match self {
            MajorHead::Personal => "Personal",
            MajorHead::Professional => "Professional",
        }
    }

    /// Subcategories offered under this head
    pub fn minor_heads(&self) -> &'static [&'static str] {
        match self {
            MajorHead::Personal => &PERSONAL_MINOR_HEADS,
            MajorHead::Professional => &PROFESSIONAL_MINOR_HEADS,
        }
    }

    /// Canonical spelling of a subcategory under this head, if it belongs
    pub fn minor_head(&self, name: &str) -> Option<&'static str> {
        self.minor_heads()
            .iter()
            .find(|m| m.eq_ignore_ascii_case(name.trim()))
            .copied()
    }
}

impl fmt::Display for MajorHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MajorHead {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MajorHead::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown major head: {}", s))
    }
}
