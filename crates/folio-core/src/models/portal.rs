use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::{
    About, BlogCategory, BlogPost, Certification, Course, EducationItem, GalleryItem, Opening,
    Project, ResearchPaper,
};
use super::Section;
use crate::error::{FolioError, Result};
use crate::patch::{self, Fields, ID_KEY};

/// The aggregate document holding every content section of the site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalData {
    pub about: About,
    #[serde(default)]
    pub education: Vec<EducationItem>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub research: Vec<ResearchPaper>,
    #[serde(default)]
    pub openings: Vec<Opening>,
    #[serde(default)]
    pub blogs: Vec<BlogPost>,
    #[serde(default)]
    pub categories: Vec<BlogCategory>,
    #[serde(default)]
    pub gallery: Vec<GalleryItem>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

/// A record type stored in one list section of [`PortalData`]
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Section holding records of this type
    const SECTION: Section;

    fn id(&self) -> &str;

    fn list(data: &PortalData) -> &Vec<Self>;

    fn list_mut(data: &mut PortalData) -> &mut Vec<Self>;
}

macro_rules! entity {
    ($ty:ty, $section:ident, $field:ident) => {
        impl Entity for $ty {
            const SECTION: Section = Section::$section;

            fn id(&self) -> &str {
                &self.id
            }

            fn list(data: &PortalData) -> &Vec<Self> {
                &data.$field
            }

            fn list_mut(data: &mut PortalData) -> &mut Vec<Self> {
                &mut data.$field
            }
        }
    };
}

entity!(EducationItem, Education, education);
entity!(Project, Projects, projects);
entity!(Course, Courses, courses);
entity!(ResearchPaper, Research, research);
entity!(Opening, Openings, openings);
entity!(BlogPost, Blogs, blogs);
entity!(BlogCategory, Categories, categories);
entity!(GalleryItem, Gallery, gallery);
entity!(Certification, Certifications, certifications);

/// Run a generic record operation against the entity type of `section`
macro_rules! dispatch {
    ($section:expr, $func:ident ( $($arg:expr),* $(,)? )) => {
        match $section {
            Section::Education => $func::<EducationItem>($($arg),*),
            Section::Projects => $func::<Project>($($arg),*),
            Section::Courses => $func::<Course>($($arg),*),
            Section::Research => $func::<ResearchPaper>($($arg),*),
            Section::Openings => $func::<Opening>($($arg),*),
            Section::Blogs => $func::<BlogPost>($($arg),*),
            Section::Categories => $func::<BlogCategory>($($arg),*),
            Section::Gallery => $func::<GalleryItem>($($arg),*),
            Section::Certifications => $func::<Certification>($($arg),*),
            Section::About => Err(FolioError::NotAList { section: Section::About }),
        }
    };
}

impl PortalData {
    /// Records of a list section as JSON objects, in stored order
    pub fn records(&self, section: Section) -> Result<Vec<Value>> {
        dispatch!(section, records_of(self))
    }

    /// Number of records in a list section
    pub fn section_len(&self, section: Section) -> Result<usize> {
        dispatch!(section, len_of(self))
    }

    /// Whether a list section holds a record with this id
    pub fn contains_id(&self, section: Section, id: &str) -> Result<bool> {
        dispatch!(section, contains_of(self, id))
    }

    /// Append a new record built from `fields` under the given id
    ///
    /// Any id present in `fields` is replaced. Fails if the fields do not
    /// describe a valid record of the section.
    pub fn create_record(&mut self, section: Section, id: String, fields: Fields) -> Result<Value> {
        dispatch!(section, create_in(self, id, fields))
    }

    /// Shallow-merge `patch` into the record with this id
    ///
    /// Returns `None` and leaves the section untouched when no record matches.
    pub fn update_record(
        &mut self,
        section: Section,
        id: &str,
        patch: &Fields,
    ) -> Result<Option<Value>> {
        dispatch!(section, update_in(self, id, patch))
    }

    /// Remove the first record with this id, reporting whether one was removed
    pub fn delete_record(&mut self, section: Section, id: &str) -> Result<bool> {
        dispatch!(section, delete_in(self, id))
    }

    /// Replace the record sharing `record`'s id, or append it
    pub fn put_record(&mut self, section: Section, record: Value) -> Result<()> {
        dispatch!(section, put_in(self, record))
    }

    /// First id that appears twice within one section, if any
    pub fn duplicate_id(&self) -> Option<(Section, String)> {
        Section::lists().find_map(|section| {
            dispatch!(section, duplicate_in(self))
                .ok()
                .flatten()
                .map(|id| (section, id))
        })
    }

    /// Shallow-merge `patch` into the singleton about record
    pub fn update_about(&mut self, patch: &Fields) -> Result<About> {
        let mut fields = patch::to_fields(&self.about)?;
        patch::merge(&mut fields, patch);
        let about: About = decode(Section::About, fields)?;
        self.about = about.clone();
        Ok(about)
    }
}

/// Null clears a field: declared fields fall back to their default and
/// undeclared keys are dropped
fn decode<T: DeserializeOwned>(section: Section, mut fields: Fields) -> Result<T> {
    fields.retain(|_, value| !value.is_null());
    serde_json::from_value(Value::Object(fields)).map_err(|e| FolioError::InvalidRecord {
        section,
        reason: e.to_string(),
    })
}

fn records_of<T: Entity>(data: &PortalData) -> Result<Vec<Value>> {
    T::list(data)
        .iter()
        .map(|record| serde_json::to_value(record).map_err(FolioError::from))
        .collect()
}

fn len_of<T: Entity>(data: &PortalData) -> Result<usize> {
    Ok(T::list(data).len())
}

fn contains_of<T: Entity>(data: &PortalData, id: &str) -> Result<bool> {
    Ok(T::list(data).iter().any(|record| record.id() == id))
}

fn duplicate_in<T: Entity>(data: &PortalData) -> Result<Option<String>> {
    let mut seen = std::collections::HashSet::new();
    Ok(T::list(data)
        .iter()
        .find(|record| !seen.insert(record.id()))
        .map(|record| record.id().to_string()))
}

fn create_in<T: Entity>(data: &mut PortalData, id: String, mut fields: Fields) -> Result<Value> {
    fields.insert(ID_KEY.to_string(), Value::String(id));
    let record: T = decode(T::SECTION, fields)?;
    let value = serde_json::to_value(&record)?;
    T::list_mut(data).push(record);
    Ok(value)
}

fn update_in<T: Entity>(data: &mut PortalData, id: &str, patch: &Fields) -> Result<Option<Value>> {
    let Some(slot) = T::list_mut(data).iter_mut().find(|record| record.id() == id) else {
        return Ok(None);
    };

    let mut fields = patch::to_fields(&*slot)?;
    patch::merge(&mut fields, patch);
    let merged: T = decode(T::SECTION, fields)?;
    let value = serde_json::to_value(&merged)?;
    *slot = merged;
    Ok(Some(value))
}

fn delete_in<T: Entity>(data: &mut PortalData, id: &str) -> Result<bool> {
    let list = T::list_mut(data);
    match list.iter().position(|record| record.id() == id) {
        Some(index) => {
            list.remove(index);
            Ok(true)
        }
        None => Ok(false),
    }
}

fn put_in<T: Entity>(data: &mut PortalData, record: Value) -> Result<()> {
    let Value::Object(fields) = record else {
        return Err(FolioError::InvalidRecord {
            section: T::SECTION,
            reason: "record must be a JSON object".to_string(),
        });
    };
    let record: T = decode(T::SECTION, fields)?;
    let list = T::list_mut(data);
    match list.iter_mut().find(|existing| existing.id() == record.id()) {
        Some(slot) => *slot = record,
        None => list.push(record),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    fn sample() -> PortalData {
        PortalData {
            about: About {
                name: "Ada".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_create_assigns_given_id() {
        let mut data = sample();
        let record = data
            .create_record(
                Section::Education,
                "edu-1".to_string(),
                fields(json!({"id": "caller", "degree": "PhD", "institution": "X", "year": "2020"})),
            )
            .unwrap();

        assert_eq!(record["id"], "edu-1");
        assert_eq!(data.education.len(), 1);
        assert_eq!(data.education[0].id, "edu-1");
    }

    #[test]
    fn test_create_rejects_invalid_fields() {
        let mut data = sample();
        let err = data
            .create_record(Section::Projects, "p".to_string(), fields(json!({"featured": true})))
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidRecord { section: Section::Projects, .. }));
        assert!(data.projects.is_empty());
    }

    #[test]
    fn test_about_is_not_a_list() {
        let mut data = sample();
        assert!(matches!(
            data.create_record(Section::About, "x".to_string(), Fields::new()),
            Err(FolioError::NotAList { .. })
        ));
        assert!(data.records(Section::About).is_err());
    }

    #[test]
    fn test_update_merges_and_keeps_other_fields() {
        let mut data = sample();
        data.create_record(
            Section::Courses,
            "c1".to_string(),
            fields(json!({"code": "CS101", "title": "Intro", "semester": "Fall"})),
        )
        .unwrap();

        let updated = data
            .update_record(Section::Courses, "c1", &fields(json!({"semester": "Spring"})))
            .unwrap()
            .unwrap();

        assert_eq!(updated["semester"], "Spring");
        assert_eq!(updated["code"], "CS101");
        assert_eq!(data.courses[0].semester, "Spring");
    }

    #[test]
    fn test_undeclared_keys_survive_create_and_update() {
        let mut data = sample();
        let created = data
            .create_record(
                Section::Education,
                "e".to_string(),
                fields(json!({"degree": "PhD", "institution": "X", "year": "2020", "advisor": "Knuth"})),
            )
            .unwrap();
        assert_eq!(created["advisor"], "Knuth");

        let updated = data
            .update_record(Section::Education, "e", &fields(json!({"thesis": "On Things"})))
            .unwrap()
            .unwrap();

        assert_eq!(updated["advisor"], "Knuth");
        assert_eq!(updated["thesis"], "On Things");
        assert_eq!(updated["degree"], "PhD");
        assert_eq!(data.records(Section::Education).unwrap()[0], updated);
    }

    #[test]
    fn test_update_result_is_record_with_patch_applied() {
        let mut data = sample();
        let before = data
            .create_record(
                Section::Projects,
                "p".to_string(),
                fields(json!({"title": "Folio", "stars": 3})),
            )
            .unwrap();
        let patch = fields(json!({"title": "Folio 2", "stars": 4, "license": "MIT"}));

        let updated = data.update_record(Section::Projects, "p", &patch).unwrap().unwrap();

        let mut expected = before.as_object().cloned().unwrap();
        crate::patch::merge(&mut expected, &patch);
        assert_eq!(updated, Value::Object(expected));
    }

    #[test]
    fn test_null_clears_field() {
        let mut data = sample();
        data.create_record(
            Section::Education,
            "e".to_string(),
            fields(json!({"degree": "PhD", "institution": "X", "description": "Long", "advisor": "K"})),
        )
        .unwrap();

        let updated = data
            .update_record(
                Section::Education,
                "e",
                &fields(json!({"description": null, "advisor": null})),
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated["description"], "");
        assert!(updated.get("advisor").is_none());

        let err = data
            .update_record(Section::Education, "e", &fields(json!({"degree": null})))
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidRecord { .. }));
    }

    #[test]
    fn test_about_keeps_undeclared_keys() {
        let mut data = sample();
        let about = data.update_about(&fields(json!({"orcid": "0000-0001"}))).unwrap();
        assert_eq!(about.extra["orcid"], "0000-0001");
        assert_eq!(about.name, "Ada");
    }

    #[test]
    fn test_update_missing_id_is_none() {
        let mut data = sample();
        let before = data.clone();
        let result = data
            .update_record(Section::Gallery, "nope", &fields(json!({"title": "t"})))
            .unwrap();
        assert!(result.is_none());
        assert_eq!(data, before);
    }

    #[test]
    fn test_invalid_update_leaves_record_unchanged() {
        let mut data = sample();
        data.create_record(Section::Research, "r".to_string(), fields(json!({"title": "T"})))
            .unwrap();
        let err = data
            .update_record(Section::Research, "r", &fields(json!({"citations": "many"})))
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidRecord { .. }));
        assert_eq!(data.research[0].citations, 0);
    }

    #[test]
    fn test_delete_removes_once() {
        let mut data = sample();
        data.create_record(Section::Categories, "k".to_string(), fields(json!({"name": "Notes"})))
            .unwrap();
        assert!(data.delete_record(Section::Categories, "k").unwrap());
        assert!(!data.delete_record(Section::Categories, "k").unwrap());
        assert_eq!(data.section_len(Section::Categories).unwrap(), 0);
    }

    #[test]
    fn test_put_record_replaces_or_appends() {
        let mut data = sample();
        data.put_record(Section::Blogs, json!({"id": "b1", "title": "One"})).unwrap();
        data.put_record(Section::Blogs, json!({"id": "b1", "title": "Uno"})).unwrap();
        data.put_record(Section::Blogs, json!({"id": "b2", "title": "Two"})).unwrap();

        assert_eq!(data.blogs.len(), 2);
        assert_eq!(data.blogs[0].title, "Uno");
    }

    #[test]
    fn test_update_about_shallow_merge() {
        let mut data = sample();
        let about = data.update_about(&fields(json!({"title": "Professor"}))).unwrap();
        assert_eq!(about.name, "Ada");
        assert_eq!(about.title, "Professor");
        assert_eq!(data.about, about);
    }

    #[test]
    fn test_missing_optional_sections_default() {
        let data: PortalData = serde_json::from_value(json!({"about": {"name": "Ada"}})).unwrap();
        assert!(data.certifications.is_empty());
        assert!(data.categories.is_empty());
    }

    #[test]
    fn test_duplicate_id_detection() {
        let mut data = sample();
        assert!(data.duplicate_id().is_none());

        data.put_record(Section::Gallery, json!({"id": "g", "title": "A", "image": "a.png"}))
            .unwrap();
        data.create_record(
            Section::Gallery,
            "g".to_string(),
            fields(json!({"title": "B", "image": "b.png"})),
        )
        .unwrap();

        assert_eq!(data.duplicate_id(), Some((Section::Gallery, "g".to_string())));
    }

    #[test]
    fn test_blog_category_reference_is_unvalidated() {
        let mut data = sample();
        let post = data
            .create_record(
                Section::Blogs,
                "b".to_string(),
                fields(json!({"title": "Post", "categoryId": "gone"})),
            )
            .unwrap();
        assert_eq!(post["categoryId"], "gone");
    }
}
