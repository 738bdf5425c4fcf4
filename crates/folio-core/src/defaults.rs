//! The fixed demo document
//!
//! Written on first load when a backend holds no document, and restored by
//! reset. Ids are fixed so repeated resets produce identical documents.

use std::collections::BTreeMap;

use crate::models::{
    About, BlogCategory, BlogPost, Course, EducationItem, GalleryItem, Opening, OpeningKind,
    OpeningStatus, PaperKind, PortalData, Project, ResearchPaper,
};
use crate::patch::Fields;

/// Build the default portal document
pub fn default_portal() -> PortalData {
    let mut social = BTreeMap::new();
    social.insert("github".to_string(), "https://github.com/your-handle".to_string());
    social.insert("scholar".to_string(), "https://scholar.google.com".to_string());

    PortalData {
        about: About {
            name: "Your Name".to_string(),
            title: "Assistant Professor of Computer Science".to_string(),
            bio: "Write a short biography here. It is shown on the landing page.".to_string(),
            email: "you@example.edu".to_string(),
            phone: None,
            location: "University Campus".to_string(),
            avatar: None,
            resume_url: None,
            interests: vec![
                "Distributed Systems".to_string(),
                "Programming Languages".to_string(),
            ],
            social,
            extra: Fields::new(),
        },
        education: vec![EducationItem {
            id: "edu-1".to_string(),
            degree: "Ph.D. in Computer Science".to_string(),
            institution: "Example University".to_string(),
            year: "2020".to_string(),
            field: Some("Systems".to_string()),
            gpa: None,
            description: "Dissertation on fault-tolerant storage.".to_string(),
            extra: Fields::new(),
        }],
        projects: vec![Project {
            id: "proj-1".to_string(),
            title: "Portfolio Backend".to_string(),
            description: "The service powering this site.".to_string(),
            technologies: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            github_url: None,
            demo_url: None,
            image: None,
            featured: true,
            extra: Fields::new(),
        }],
        courses: vec![Course {
            id: "course-1".to_string(),
            code: "CS 101".to_string(),
            title: "Introduction to Programming".to_string(),
            semester: "Fall".to_string(),
            role: "Instructor".to_string(),
            description: "Fundamentals of programming and problem solving.".to_string(),
            materials_url: None,
            extra: Fields::new(),
        }],
        research: vec![ResearchPaper {
            id: "paper-1".to_string(),
            title: "A Sample Paper Title".to_string(),
            authors: vec!["Your Name".to_string(), "Co Author".to_string()],
            venue: "Journal of Examples".to_string(),
            year: "2021".to_string(),
            citations: 0,
            kind: PaperKind::Journal,
            abstract_text: None,
            url: None,
            doi: None,
            bib_key: None,
            extra: Fields::new(),
        }],
        openings: vec![Opening {
            id: "opening-1".to_string(),
            kind: OpeningKind::Project,
            title: "Undergraduate Research Assistant".to_string(),
            description: "Help build and evaluate research prototypes.".to_string(),
            requirements: vec!["Programming experience".to_string()],
            location: "On campus".to_string(),
            deadline: None,
            status: OpeningStatus::Open,
            extra: Fields::new(),
        }],
        blogs: vec![BlogPost {
            id: "blog-1".to_string(),
            title: "Welcome".to_string(),
            excerpt: "First post.".to_string(),
            content: "This site is up and running.".to_string(),
            category_id: Some("cat-1".to_string()),
            tags: vec!["news".to_string()],
            published_at: None,
            published: true,
            extra: Fields::new(),
        }],
        categories: vec![BlogCategory {
            id: "cat-1".to_string(),
            name: "News".to_string(),
            description: "Announcements and updates".to_string(),
            extra: Fields::new(),
        }],
        gallery: vec![GalleryItem {
            id: "gallery-1".to_string(),
            title: "Lab".to_string(),
            image: "/images/lab.jpg".to_string(),
            caption: "Our research lab".to_string(),
            date: None,
            extra: Fields::new(),
        }],
        certifications: Vec::new(),
    }
}
