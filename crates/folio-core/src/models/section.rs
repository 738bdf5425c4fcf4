use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FolioError;

/// Named section of the portal document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    About,
    Education,
    Projects,
    Courses,
    Research,
    Openings,
    Blogs,
    Categories,
    Gallery,
    Certifications,
}

impl Section {
    /// Every section, in document order
    pub const ALL: [Section; 10] = [
        Section::About,
        Section::Education,
        Section::Projects,
        Section::Courses,
        Section::Research,
        Section::Openings,
        Section::Blogs,
        Section::Categories,
        Section::Gallery,
        Section::Certifications,
    ];

    /// Wire name used in documents, URLs and the CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::About => "about",
            Section::Education => "education",
            Section::Projects => "projects",
            Section::Courses => "courses",
            Section::Research => "research",
            Section::Openings => "openings",
            Section::Blogs => "blogs",
            Section::Categories => "categories",
            Section::Gallery => "gallery",
            Section::Certifications => "certifications",
        }
    }

    /// Whether the section holds an ordered list of records
    pub fn is_list(&self) -> bool {
        !matches!(self, Section::About)
    }

    /// All list sections
    pub fn lists() -> impl Iterator<Item = Section> {
        Self::ALL.into_iter().filter(Section::is_list)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "about" => Ok(Section::About),
            "education" => Ok(Section::Education),
            "projects" | "project" => Ok(Section::Projects),
            "courses" | "course" => Ok(Section::Courses),
            "research" | "papers" => Ok(Section::Research),
            "openings" | "opening" => Ok(Section::Openings),
            "blogs" | "blog" => Ok(Section::Blogs),
            "categories" | "category" => Ok(Section::Categories),
            "gallery" => Ok(Section::Gallery),
            "certifications" | "certification" => Ok(Section::Certifications),
            _ => Err(FolioError::UnknownSection { name: s.to_string() }),
        }
    }
}
