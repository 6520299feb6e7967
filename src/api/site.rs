//! Public site endpoints.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    AcademicFile, Banner, ClassInfoLink, ClassTeacherAssignment, Document, Exam, ExamResult,
    Faculty, GalleryItem, NewsEvent, Notice, SchoolStats, SectionContent, ThemeConfig,
    TickerConfig, ALL_TARGETS, CLASS_LIST, SECTION_LIST,
};
use crate::sync::{SaveReport, SyncSnapshot};
use crate::AppState;

/// Notices shown on the home page.
const HOME_NOTICE_LIMIT: usize = 4;
/// News and events shown on the home page.
const HOME_NEWS_LIMIT: usize = 3;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub school_name: String,
    pub motto: String,
    pub eiin: String,
    pub logo_url: String,
    pub marquee_text: String,
    pub ticker_config: TickerConfig,
    pub theme_config: ThemeConfig,
    pub banners: Vec<Banner>,
    pub notices: Vec<Notice>,
    pub news_events: Vec<NewsEvent>,
    pub sections: Vec<SectionContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_teacher: Option<Faculty>,
    pub stats: SchoolStats,
    pub national_anthem_youtube_id: String,
    pub location_text: String,
    pub location_map_url: String,
}

/// GET / - Home page summary.
pub async fn home(State(state): State<AppState>) -> ApiResult<HomeView> {
    let doc = state.store.snapshot().await;
    success(home_view(&doc), doc.revision)
}

fn home_view(doc: &Document) -> HomeView {
    HomeView {
        school_name: doc.school_name.clone(),
        motto: doc.motto.clone(),
        eiin: doc.eiin.clone(),
        logo_url: doc.logo_url.clone(),
        marquee_text: doc.marquee_text.clone(),
        ticker_config: doc.ticker_config.clone(),
        theme_config: doc.theme_config.clone(),
        banners: doc.banners.clone(),
        notices: doc.notices.iter().take(HOME_NOTICE_LIMIT).cloned().collect(),
        news_events: doc.news_events.iter().take(HOME_NEWS_LIMIT).cloned().collect(),
        sections: doc.sections.clone(),
        head_teacher: doc.head_teacher.clone(),
        stats: stats_of(doc),
        national_anthem_youtube_id: doc.national_anthem_youtube_id.clone(),
        location_text: doc.location_text.clone(),
        location_map_url: doc.location_map_url.clone(),
    }
}

/// GET /api/site - The document without credentials or office-only data.
pub async fn get_site(State(state): State<AppState>) -> ApiResult<Value> {
    let doc = state.store.snapshot().await;
    match doc.public_view() {
        Ok(view) => success(view, doc.revision),
        Err(e) => error(AppError::Internal(e.to_string()), doc.revision),
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academics: Option<AcademicsExtras>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission: Option<AdmissionExtras>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicsExtras {
    pub syllabuses: Vec<AcademicFile>,
    pub class_routines: Vec<AcademicFile>,
    pub class_teachers: Vec<ClassTeacherAssignment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub class_info_links: Vec<ClassInfoLink>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionExtras {
    pub is_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_url: Option<String>,
    pub button_text: String,
}

fn page_view(doc: &Document, page: &str) -> Option<PageView> {
    let view = match page {
        "about" => PageView {
            title: "About Us".to_string(),
            content: doc.about_content.clone(),
            pdf_url: doc.about_pdf_url.clone(),
            ..PageView::default()
        },
        "administration" => PageView {
            title: "Administration".to_string(),
            content: doc.administration_content.clone(),
            pdf_url: doc.administration_pdf_url.clone(),
            ..PageView::default()
        },
        "academics" => PageView {
            title: "Academics".to_string(),
            content: doc.academics_content.clone(),
            pdf_url: doc.academics_pdf_url.clone(),
            academics: Some(AcademicsExtras {
                syllabuses: doc.syllabuses.clone(),
                class_routines: doc.class_routines.clone(),
                class_teachers: doc.class_teachers.clone(),
                class_info_links: if doc.is_student_info_enabled.unwrap_or(false) {
                    doc.class_info_links.clone()
                } else {
                    Vec::new()
                },
            }),
            ..PageView::default()
        },
        "co-curricular" => PageView {
            title: "Co-Curricular".to_string(),
            content: doc.co_curricular_content.clone(),
            pdf_url: doc.co_curricular_pdf_url.clone(),
            ..PageView::default()
        },
        "admission" => PageView {
            title: "Admission".to_string(),
            content: doc.admission_info.clone(),
            pdf_url: doc.admission_pdf_url.clone(),
            admission: Some(AdmissionExtras {
                is_open: doc.is_admission_open.unwrap_or(false),
                form_url: doc.admission_form_url.clone(),
                button_text: doc
                    .admission_button_text
                    .clone()
                    .unwrap_or_else(|| "Apply Online Now".to_string()),
            }),
            ..PageView::default()
        },
        _ => return None,
    };
    Some(view)
}

/// GET /api/pages/{page} - Content page.
pub async fn get_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> ApiResult<PageView> {
    let doc = state.store.snapshot().await;
    match page_view(&doc, &page) {
        Some(view) => success(view, doc.revision),
        None => error(
            AppError::NotFound(format!("Page {} not found", page)),
            doc.revision,
        ),
    }
}

/// Class, section and roll filters for the student corner.
#[derive(Debug, Default, Deserialize)]
pub struct CornerQuery {
    pub class: Option<String>,
    pub section: Option<String>,
    pub roll: Option<String>,
}

impl CornerQuery {
    fn class(&self) -> &str {
        selected(&self.class)
    }

    fn section(&self) -> &str {
        selected(&self.section)
    }
}

fn selected(value: &Option<String>) -> &str {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => ALL_TARGETS,
    }
}

/// A record target of "All" matches any selection.
fn notice_matches(target: Option<&str>, selection: &str) -> bool {
    selection == ALL_TARGETS || target == Some(selection) || target == Some(ALL_TARGETS)
}

fn exact_matches(target: &str, selection: &str) -> bool {
    selection == ALL_TARGETS || target == selection
}

pub fn filter_notices<'a>(notices: &'a [Notice], query: &CornerQuery) -> Vec<&'a Notice> {
    notices
        .iter()
        .filter(|n| {
            notice_matches(n.target_class.as_deref(), query.class())
                && notice_matches(n.target_section.as_deref(), query.section())
        })
        .collect()
}

pub fn filter_exams<'a>(exams: &'a [Exam], query: &CornerQuery) -> Vec<&'a Exam> {
    exams
        .iter()
        .filter(|e| {
            exact_matches(&e.target_class, query.class())
                && exact_matches(&e.target_section, query.section())
        })
        .collect()
}

pub fn filter_results<'a>(results: &'a [ExamResult], query: &CornerQuery) -> Vec<&'a ExamResult> {
    let roll = query
        .roll
        .as_deref()
        .map(|r| r.trim().to_lowercase())
        .unwrap_or_default();
    results
        .iter()
        .filter(|r| {
            exact_matches(&r.target_class, query.class())
                && exact_matches(&r.target_section, query.section())
                && (roll.is_empty() || r.student_roll.to_lowercase().contains(&roll))
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct CornerFilters {
    pub classes: &'static [&'static str],
    pub sections: &'static [&'static str],
}

/// GET /api/corner/filters - Selectable classes and sections.
pub async fn corner_filters(State(state): State<AppState>) -> ApiResult<CornerFilters> {
    success(
        CornerFilters {
            classes: CLASS_LIST,
            sections: SECTION_LIST,
        },
        state.store.revision().await,
    )
}

/// GET /api/notices - Notice board, filtered by class and section.
pub async fn list_notices(
    State(state): State<AppState>,
    Query(query): Query<CornerQuery>,
) -> ApiResult<Vec<Notice>> {
    let doc = state.store.snapshot().await;
    let notices = filter_notices(&doc.notices, &query)
        .into_iter()
        .cloned()
        .collect();
    success(notices, doc.revision)
}

/// GET /api/exams - Exam schedule, filtered by class and section.
pub async fn list_exams(
    State(state): State<AppState>,
    Query(query): Query<CornerQuery>,
) -> ApiResult<Vec<Exam>> {
    let doc = state.store.snapshot().await;
    let exams = filter_exams(&doc.exams, &query).into_iter().cloned().collect();
    success(exams, doc.revision)
}

/// GET /api/results - Results, filtered by class, section and roll.
pub async fn list_results(
    State(state): State<AppState>,
    Query(query): Query<CornerQuery>,
) -> ApiResult<Vec<ExamResult>> {
    let doc = state.store.snapshot().await;
    let results = filter_results(&doc.results, &query)
        .into_iter()
        .cloned()
        .collect();
    success(results, doc.revision)
}

/// GET /api/gallery
pub async fn list_gallery(State(state): State<AppState>) -> ApiResult<Vec<GalleryItem>> {
    let doc = state.store.snapshot().await;
    success(doc.gallery.clone(), doc.revision)
}

/// GET /api/teachers
pub async fn list_teachers(State(state): State<AppState>) -> ApiResult<Vec<Faculty>> {
    let doc = state.store.snapshot().await;
    success(doc.faculty.clone(), doc.revision)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrationView {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_teacher: Option<Faculty>,
    pub assistant_head_teachers: Vec<Faculty>,
    pub committee_members: Vec<Faculty>,
    pub governing_body: Vec<Faculty>,
}

/// GET /api/administration - Leadership and governing bodies.
pub async fn get_administration(State(state): State<AppState>) -> ApiResult<AdministrationView> {
    let doc = state.store.snapshot().await;
    let view = AdministrationView {
        content: doc.administration_content.clone(),
        head_teacher: doc.head_teacher.clone(),
        assistant_head_teachers: doc.assistant_head_teachers.clone(),
        committee_members: doc.committee_members.clone(),
        governing_body: doc.governing_body.clone(),
    };
    success(view, doc.revision)
}

fn stats_of(doc: &Document) -> SchoolStats {
    SchoolStats {
        students: doc.student_count(),
        ..doc.stats.clone()
    }
}

/// GET /api/stats - Headline numbers.
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<SchoolStats> {
    let doc = state.store.snapshot().await;
    success(stats_of(&doc), doc.revision)
}

/// One card on the office profiles page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCard {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: String,
    #[serde(rename = "type")]
    pub profile_type: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

/// GET /api/office-profiles - Office resource cards (office session required).
pub async fn list_office_profiles(State(state): State<AppState>) -> ApiResult<Vec<ProfileCard>> {
    let doc = state.store.snapshot().await;
    let cards = doc
        .office_profiles
        .iter()
        .map(|item| ProfileCard {
            id: item.id.clone(),
            title: item.title.clone(),
            url: item.url.clone(),
            description: item.description.clone(),
            profile_type: item.profile_type.as_str(),
            label: item.profile_type.label(),
            icon: item.profile_type.icon(),
        })
        .collect();
    success(cards, doc.revision)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeToggled {
    pub is_dark_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save: Option<SaveReport>,
}

/// POST /api/theme/toggle - Flip dark mode and persist it.
pub async fn toggle_theme(State(state): State<AppState>) -> ApiResult<ThemeToggled> {
    let result = state
        .store
        .modify(&state.coordinator, |doc| {
            let mut next = doc.clone();
            next.theme_config.is_dark_mode = !next.theme_config.is_dark_mode;
            Ok(next)
        })
        .await;

    let doc = state.store.snapshot().await;
    match result {
        Ok(committed) => success(
            ThemeToggled {
                is_dark_mode: doc.theme_config.is_dark_mode,
                save: committed.map(|c| c.report),
            },
            doc.revision,
        ),
        Err(e) => error(e, doc.revision),
    }
}

/// GET /api/sync/status - Connectivity and last save outcome.
pub async fn sync_status(State(state): State<AppState>) -> ApiResult<SyncSnapshot> {
    let revision_id = state.store.revision().await;
    success(state.coordinator.snapshot().await, revision_id)
}

/// Fallback for unknown paths.
pub async fn redirect_home() -> Redirect {
    Redirect::to("/")
}
