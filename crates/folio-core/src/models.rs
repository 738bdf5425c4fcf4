pub mod content;
pub mod inbox;
pub mod portal;
pub mod section;

pub use content::{
    About, BlogCategory, BlogPost, Certification, Course, EducationItem, GalleryItem, Opening,
    OpeningKind, OpeningStatus, PaperKind, Project, ResearchPaper,
};
pub use inbox::{
    transition, ApplicationData, ApplicationStatus, ContactMessage, InboxRecord, InboxStatus,
    MessageStatus,
};
pub use portal::{Entity, PortalData};
pub use section::Section;
