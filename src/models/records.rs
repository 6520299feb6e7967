//! Record types stored in the list fields of the site document.
//!
//! Every field has a serde default so partial records from the dashboard
//! deserialize cleanly; absence means "not configured".

use serde::{Deserialize, Serialize};

/// An entity that lives inside a list field and is addressed by id.
pub trait Record: Clone + Default + Serialize + serde::de::DeserializeOwned {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! impl_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )+
    };
}

/// Kind of file attached to a notice or result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentType {
    #[default]
    Image,
    Video,
    Pdf,
    Document,
}

/// Gallery media kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

impl MediaType {
    /// Classify by MIME type; only `image/*` and `video/*` are accepted.
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime.starts_with("video") {
            Some(MediaType::Video)
        } else if mime.starts_with("image") {
            Some(MediaType::Image)
        } else {
            None
        }
    }
}

/// Target of a class information link.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassLinkType {
    #[default]
    Spreadsheet,
    Form,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DriveCategory {
    #[default]
    Academic,
    Office,
    Financial,
    Archive,
    Personal,
}

/// Category of an office profile link.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfileType {
    Drive,
    #[default]
    GovtPortal,
    Other,
}

impl ProfileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::Drive => "drive",
            ProfileType::GovtPortal => "govt_portal",
            ProfileType::Other => "other",
        }
    }

    /// Display label shown on public profile cards.
    pub fn label(&self) -> &'static str {
        match self {
            ProfileType::Drive => "Cloud Drive",
            ProfileType::GovtPortal => "Govt. Portal",
            ProfileType::Other => "Other Resource",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ProfileType::Drive => "☁️",
            ProfileType::GovtPortal => "🏛️",
            ProfileType::Other => "🔗",
        }
    }
}

/// How an image is fitted into its frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub date: String,
    pub content: String,
    pub important: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_type: Option<AttachmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_section: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsEvent {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// A syllabus or class routine file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AcademicFile {
    pub id: String,
    pub title: String,
    pub target_class: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassTeacherAssignment {
    pub id: String,
    pub target_class: String,
    pub section: String,
    pub teacher_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassInfoLink {
    pub id: String,
    pub title: String,
    pub target_class: String,
    pub url: String,
    #[serde(rename = "type")]
    pub link_type: ClassLinkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Exam {
    pub id: String,
    pub title: String,
    pub date: String,
    pub subject: String,
    pub target_class: String,
    pub target_section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// A published exam result for one student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamResult {
    pub id: String,
    pub student_name: String,
    pub student_roll: String,
    pub target_class: String,
    pub target_section: String,
    pub gpa: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_type: Option<AttachmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryItem {
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub caption: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Banner {
    pub id: String,
    pub image_url: String,
    pub title: String,
    pub subtitle: String,
}

/// Free-form text block such as the head master's message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionContent {
    pub id: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Faculty {
    pub id: String,
    pub name: String,
    pub designation: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AdmissionApplication {
    pub id: String,
    pub student_name: String,
    pub parent_name: String,
    pub applied_class: String,
    pub phone: String,
    pub date: String,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DriveFolder {
    pub id: String,
    pub folder_name: String,
    pub folder_url: String,
    pub category: DriveCategory,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OfficeProfileItem {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub profile_type: ProfileType,
    pub description: String,
}

impl_record!(
    Notice,
    NewsEvent,
    AcademicFile,
    ClassTeacherAssignment,
    ClassInfoLink,
    Exam,
    ExamResult,
    GalleryItem,
    Banner,
    SectionContent,
    Faculty,
    AdmissionApplication,
    DriveFolder,
    OfficeProfileItem,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_notice_deserializes() {
        let notice: Notice = serde_json::from_str(r#"{"title":"Exam"}"#).unwrap();
        assert_eq!(notice.title, "Exam");
        assert!(notice.id.is_empty());
        assert!(!notice.important);
    }

    #[test]
    fn test_profile_type_wire_names() {
        let item: OfficeProfileItem =
            serde_json::from_str(r#"{"id":"1","type":"govt_portal"}"#).unwrap();
        assert_eq!(item.profile_type, ProfileType::GovtPortal);
        assert_eq!(item.profile_type.label(), "Govt. Portal");

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "govt_portal");
    }

    #[test]
    fn test_media_type_from_mime() {
        assert_eq!(MediaType::from_mime("video/mp4"), Some(MediaType::Video));
        assert_eq!(MediaType::from_mime("image/png"), Some(MediaType::Image));
        assert_eq!(MediaType::from_mime("application/pdf"), None);
    }
}
