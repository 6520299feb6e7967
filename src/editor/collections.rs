//! Typed bindings between document list fields and their record types.

use serde_json::{Map, Value};

use super::{shallow_merge, RecordEditor};
use crate::errors::AppError;
use crate::models::{
    AcademicFile, AdmissionApplication, Banner, ClassInfoLink, ClassTeacherAssignment, Document,
    DriveFolder, Exam, ExamResult, Faculty, GalleryItem, NewsEvent, Notice, OfficeProfileItem,
    Record, SectionContent,
};

/// A list field of the document holding one record type.
pub trait Collection {
    type Item: Record;

    /// Wire name of the field.
    const FIELD: &'static str;

    fn items(doc: &Document) -> &Vec<Self::Item>;
    fn items_mut(doc: &mut Document) -> &mut Vec<Self::Item>;
}

macro_rules! collections {
    ($( $marker:ident => $field:ident : $item:ty = $name:literal; )+) => {
        $(
            pub struct $marker;

            impl Collection for $marker {
                type Item = $item;
                const FIELD: &'static str = $name;

                fn items(doc: &Document) -> &Vec<$item> {
                    &doc.$field
                }

                fn items_mut(doc: &mut Document) -> &mut Vec<$item> {
                    &mut doc.$field
                }
            }
        )+

        /// Runtime name of a list field, for HTTP dispatch.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum CollectionKind {
            $( $marker, )+
        }

        impl CollectionKind {
            pub const ALL: &'static [CollectionKind] = &[$( CollectionKind::$marker, )+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( CollectionKind::$marker => $name, )+
                }
            }

            pub fn parse(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(CollectionKind::$marker), )+
                    _ => None,
                }
            }
        }

        impl RecordEditor {
            /// Add a partial record to the named list.
            pub fn add_json(
                &self,
                kind: CollectionKind,
                doc: &Document,
                partial: &Map<String, Value>,
            ) -> Result<Document, AppError> {
                match kind {
                    $( CollectionKind::$marker => {
                        let record = record_from_partial::<$marker>(partial)?;
                        Ok(self.add::<$marker>(doc, record))
                    } )+
                }
            }

            /// Shallow-merge a patch into the record with `id`.
            pub fn update_json(
                &self,
                kind: CollectionKind,
                doc: &Document,
                id: &str,
                patch: &Map<String, Value>,
            ) -> Result<Document, AppError> {
                match kind {
                    $( CollectionKind::$marker => self.update::<$marker>(doc, id, patch), )+
                }
            }

            /// Remove the record with `id` from the named list.
            pub fn delete_by_kind(&self, kind: CollectionKind, doc: &Document, id: &str) -> Document {
                match kind {
                    $( CollectionKind::$marker => self.delete::<$marker>(doc, id), )+
                }
            }
        }

        /// Serialize the named list.
        pub fn list_json(kind: CollectionKind, doc: &Document) -> Result<Value, serde_json::Error> {
            match kind {
                $( CollectionKind::$marker => serde_json::to_value($marker::items(doc)), )+
            }
        }
    };
}

collections! {
    NewsEvents => news_events: NewsEvent = "newsEvents";
    Syllabuses => syllabuses: AcademicFile = "syllabuses";
    ClassRoutines => class_routines: AcademicFile = "classRoutines";
    ClassTeachers => class_teachers: ClassTeacherAssignment = "classTeachers";
    ClassInfoLinks => class_info_links: ClassInfoLink = "classInfoLinks";
    AssistantHeadTeachers => assistant_head_teachers: Faculty = "assistantHeadTeachers";
    CommitteeMembers => committee_members: Faculty = "committeeMembers";
    GoverningBody => governing_body: Faculty = "governingBody";
    Banners => banners: Banner = "banners";
    Notices => notices: Notice = "notices";
    Exams => exams: Exam = "exams";
    Results => results: ExamResult = "results";
    Sections => sections: SectionContent = "sections";
    FacultyMembers => faculty: Faculty = "faculty";
    Gallery => gallery: GalleryItem = "gallery";
    Applications => applications: AdmissionApplication = "applications";
    OfficeDriveLinks => office_drive_links: DriveFolder = "officeDriveLinks";
    OfficeProfiles => office_profiles: OfficeProfileItem = "officeProfiles";
}

fn record_from_partial<C: Collection>(partial: &Map<String, Value>) -> Result<C::Item, AppError> {
    shallow_merge(&C::Item::default(), partial)
        .map_err(|e| AppError::BadRequest(format!("Invalid {} record: {}", C::FIELD, e)))
}

/// Fields that hold a single optional record rather than a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingletonField {
    HeadTeacher,
}

impl SingletonField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "headTeacher" => Some(SingletonField::HeadTeacher),
            _ => None,
        }
    }

    pub(crate) fn slot(self, doc: &mut Document) -> &mut Option<Faculty> {
        match self {
            SingletonField::HeadTeacher => &mut doc.head_teacher,
        }
    }
}

/// Embedded configuration objects, updated by field replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Theme,
    Ticker,
    Stats,
}

impl BlockKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "themeConfig" | "theme" => Some(BlockKind::Theme),
            "tickerConfig" | "ticker" => Some(BlockKind::Ticker),
            "stats" => Some(BlockKind::Stats),
            _ => None,
        }
    }
}
