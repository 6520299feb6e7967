//! The site document: one aggregate holding all content and settings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    AcademicFile, AdmissionApplication, Banner, ClassInfoLink, ClassTeacherAssignment,
    DriveFolder, Exam, ExamResult, Faculty, GalleryItem, ImageFit, NewsEvent, Notice,
    OfficeProfileItem, SectionContent,
};

/// Current document schema. Documents written by this service carry it as a
/// presence marker; anything below 1 is treated as a placeholder.
pub const SCHEMA_VERSION: u32 = 1;

/// Keys removed from the public projection of the document.
const PRIVATE_KEYS: &[&str] = &[
    "adminUsername",
    "adminPassword",
    "adminResetCode",
    "officeAccessUser",
    "officeAccessPass",
    "officeDriveLinks",
    "officeProfiles",
    "applications",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TickerConfig {
    pub speed: u32,
    pub background_color: String,
    pub text_color: String,
    pub font_size: String,
    pub font_weight: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeConfig {
    pub primary_text_color: String,
    pub secondary_text_color: String,
    pub heading_color: String,
    pub nav_text_color: String,
    pub footer_text_color: String,
    pub accent_color: String,
    pub is_dark_mode: bool,
}

/// Headline numbers shown on the home page. Kept as display strings ("3000+").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SchoolStats {
    pub students: String,
    pub teachers: String,
    pub staff: String,
    pub buildings: String,
}

/// The root aggregate. Exactly one exists; it is replaced wholesale on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    /// Presence marker, see [`SCHEMA_VERSION`].
    pub schema_version: u32,
    /// Incremented on every save.
    pub revision: i64,

    pub school_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub motto: String,
    pub eiin: String,

    pub location_text: String,
    pub location_map_url: String,
    pub national_anthem_youtube_id: String,

    pub admin_username: String,
    pub admin_password: String,
    pub admin_reset_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_profile_pic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_profile_pic_fit: Option<ImageFit>,

    pub office_access_user: String,
    pub office_access_pass: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_size: Option<String>,

    pub logo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_fit: Option<ImageFit>,
    pub marquee_text: String,
    pub ticker_config: TickerConfig,
    pub theme_config: ThemeConfig,

    pub stats: SchoolStats,
    pub news_events: Vec<NewsEvent>,

    pub about_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about_pdf_url: Option<String>,
    pub administration_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administration_pdf_url: Option<String>,
    pub academics_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academics_pdf_url: Option<String>,

    pub syllabuses: Vec<AcademicFile>,
    pub class_routines: Vec<AcademicFile>,
    pub class_teachers: Vec<ClassTeacherAssignment>,
    pub class_info_links: Vec<ClassInfoLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_student_info_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_calculated_student_count: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_teacher: Option<Faculty>,
    pub assistant_head_teachers: Vec<Faculty>,
    pub committee_members: Vec<Faculty>,
    pub governing_body: Vec<Faculty>,

    pub co_curricular_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co_curricular_pdf_url: Option<String>,

    pub admission_info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_pdf_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_form_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_button_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admission_open: Option<bool>,

    pub banners: Vec<Banner>,
    pub notices: Vec<Notice>,
    pub exams: Vec<Exam>,
    pub results: Vec<ExamResult>,
    pub sections: Vec<SectionContent>,
    pub faculty: Vec<Faculty>,
    pub gallery: Vec<GalleryItem>,
    pub applications: Vec<AdmissionApplication>,
    pub office_drive_links: Vec<DriveFolder>,
    pub office_profiles: Vec<OfficeProfileItem>,
}

impl Document {
    /// Whether this looks like a real stored document rather than an empty
    /// or placeholder payload.
    pub fn has_presence_marker(&self) -> bool {
        self.schema_version >= SCHEMA_VERSION && !self.school_name.trim().is_empty()
    }

    /// Student count, either the configured display value or the sum of
    /// class link counts when auto-calculation is enabled.
    pub fn student_count(&self) -> String {
        if self.use_calculated_student_count.unwrap_or(false) {
            let total: u32 = self
                .class_info_links
                .iter()
                .map(|link| link.student_count.unwrap_or(0))
                .sum();
            total.to_string()
        } else {
            self.stats.students.clone()
        }
    }

    /// JSON view of the document with credentials and office-only data removed.
    pub fn public_view(&self) -> Result<Value, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            for key in PRIVATE_KEYS {
                map.remove(*key);
            }
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::initial_document;

    #[test]
    fn test_empty_object_has_no_marker() {
        let doc: Document = serde_json::from_str("{}").unwrap();
        assert!(!doc.has_presence_marker());
    }

    #[test]
    fn test_marker_requires_school_name() {
        let doc = Document {
            schema_version: SCHEMA_VERSION,
            ..Document::default()
        };
        assert!(!doc.has_presence_marker());
        assert!(initial_document().has_presence_marker());
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let json = serde_json::to_value(initial_document()).unwrap();
        assert!(json["schoolName"].is_string());
        assert!(json["themeConfig"]["isDarkMode"].is_boolean());
        assert!(json["coCurricularContent"].is_string());
        assert!(json["nationalAnthemYoutubeId"].is_string());
    }

    #[test]
    fn test_public_view_strips_credentials() {
        let view = initial_document().public_view().unwrap();
        assert!(view.get("adminPassword").is_none());
        assert!(view.get("officeAccessPass").is_none());
        assert!(view.get("officeProfiles").is_none());
        assert!(view["schoolName"].is_string());
    }

    #[test]
    fn test_calculated_student_count() {
        let mut doc = initial_document();
        doc.stats.students = "3000+".to_string();
        assert_eq!(doc.student_count(), "3000+");

        doc.use_calculated_student_count = Some(true);
        doc.class_info_links = vec![
            ClassInfoLink {
                id: "a".to_string(),
                student_count: Some(40),
                ..ClassInfoLink::default()
            },
            ClassInfoLink {
                id: "b".to_string(),
                student_count: None,
                ..ClassInfoLink::default()
            },
            ClassInfoLink {
                id: "c".to_string(),
                student_count: Some(35),
                ..ClassInfoLink::default()
            },
        ];
        assert_eq!(doc.student_count(), "75");
    }
}
