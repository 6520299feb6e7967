//! Compiled-in document used when neither store holds a copy.

use super::{
    Banner, Document, Faculty, GalleryItem, ImageFit, MediaType, NewsEvent, Notice,
    OfficeProfileItem, ProfileType, SchoolStats, SectionContent, ThemeConfig, TickerConfig,
    SCHEMA_VERSION,
};

/// Class filter values offered on the notice board.
pub const CLASS_LIST: &[&str] = &[
    "All", "KG", "Class 1", "Class 2", "Class 3", "Class 4", "Class 5", "Class 6", "Class 7",
    "Class 8", "Class 9", "Class 10", "HSC 1st", "HSC 2nd",
];

/// Section filter values offered on the notice board.
pub const SECTION_LIST: &[&str] = &["All", "Morning", "Day"];

/// Filter value that matches every class or section.
pub const ALL_TARGETS: &str = "All";

const SCHOOL_NAME: &str = "Bagpur Masum Ali Pramanik High School";
const MOTTO: &str = "Education | Discipline | Character";
const CAMPUS_PHOTO: &str = "https://images.unsplash.com/photo-1562774053-701939374585";
const HEAD_PORTRAIT: &str = "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?q=80&w=200&auto=format&fit=crop";
const ASSISTANT_PORTRAIT: &str = "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?q=80&w=200&auto=format&fit=crop";

fn s(value: &str) -> String {
    value.to_string()
}

fn head_master() -> Faculty {
    Faculty {
        id: s("f1"),
        name: s("Md. Head Master Name"),
        designation: s("Head Master"),
        image: s(HEAD_PORTRAIT),
    }
}

fn assistant_head_master() -> Faculty {
    Faculty {
        id: s("f2"),
        name: s("Md. Assistant Head Master"),
        designation: s("Assistant Head Master"),
        image: s(ASSISTANT_PORTRAIT),
    }
}

fn office_profile(id: &str, title: &str, url: &str, description: &str) -> OfficeProfileItem {
    OfficeProfileItem {
        id: s(id),
        title: s(title),
        url: s(url),
        profile_type: ProfileType::GovtPortal,
        description: s(description),
    }
}

/// Build the default document.
pub fn initial_document() -> Document {
    Document {
        schema_version: SCHEMA_VERSION,
        revision: 0,

        school_name: s(SCHOOL_NAME),
        address: s("Bagpur, Pirganj, Rangpur, Bangladesh"),
        phone: s("017XX-XXXXXX"),
        email: s("contact@bmahs.edu.bd"),
        motto: s(MOTTO),
        eiin: s("127260"),

        location_text: s("Bagpur, Pirganj, Rangpur, Bangladesh"),
        location_map_url: s("https://www.google.com/maps/embed?pb=!1m18!1m12!1m3!1d115041.56581121081!2d89.17641888069695!3d25.752355447171544!2m3!1f0!2f0!3f0!3m2!1i1024!2i768!4f13.1!3m3!1m2!1s0x39ed09689452b46d%3A0xc3b53f6834d9a40!2sRangpur!5e0!3m2!1sen!2sbd!4v1710000000000!5m2!1sen!2sbd"),
        national_anthem_youtube_id: s("UoX7o_SkaS0"),

        admin_username: s("127260"),
        admin_password: s("Bmahs127260"),
        admin_reset_code: s("998877"),
        admin_profile_pic: Some(format!("{CAMPUS_PHOTO}?q=80&w=800")),
        admin_profile_pic_fit: Some(ImageFit::Cover),

        office_access_user: s("office"),
        office_access_pass: s("office123"),

        app_download_url: Some(s("https://example.com/app.apk")),
        app_version: Some(s("1.0.2")),
        app_size: Some(s("15.4 MB")),

        logo_url: format!("{CAMPUS_PHOTO}?q=80&w=500"),
        logo_fit: Some(ImageFit::Cover),
        marquee_text: s("২০২৬ শিক্ষাবর্ষে ষষ্ঠ থেকে নবম শ্রেণিতে ভর্তি বিজ্ঞপ্তি প্রকাশিত হয়েছে। এস.এস.সি প্রি-টেস্ট পরীক্ষা ২০২৬ এর রুটিন দেখুন।"),
        ticker_config: TickerConfig {
            speed: 25,
            background_color: s("#f8fafc"),
            text_color: s("#004071"),
            font_size: s("14px"),
            font_weight: s("900"),
        },
        theme_config: ThemeConfig {
            primary_text_color: s("#334155"),
            secondary_text_color: s("#64748b"),
            heading_color: s("#004071"),
            nav_text_color: s("#ffffff"),
            footer_text_color: s("#ffffff"),
            accent_color: s("#4ade80"),
            is_dark_mode: false,
        },

        stats: SchoolStats {
            students: s("3000+"),
            teachers: s("70"),
            staff: s("25"),
            buildings: s("4"),
        },
        news_events: vec![
            NewsEvent {
                id: s("e1"),
                title: s("Inauguration of New Building"),
                date: s("March 15, 2024"),
                image_url: Some(format!("{CAMPUS_PHOTO}?q=80&w=800")),
                content: s("We are proud to announce the formal inauguration of our newly constructed 4-story academic building."),
                ..NewsEvent::default()
            },
            NewsEvent {
                id: s("e2"),
                title: s("Book Distribution Festival"),
                date: s("January 1, 2024"),
                image_url: Some(s("https://images.unsplash.com/photo-1544377193-33dcf4d68fb5?q=80&w=800")),
                content: s("Textbook festival for the new academic session was celebrated with enthusiasm."),
                ..NewsEvent::default()
            },
        ],

        about_content: format!("{SCHOOL_NAME} is one of the most prestigious and important educational institutions in Rangpur. It is located in the heart of the Rangpur City, comprising of an area of 1.00 acres of land. {SCHOOL_NAME} was established in 1998."),
        about_pdf_url: None,
        administration_content: s("The institution is governed by a Board of Directors headed by the Deputy Commissioner (DC) of Rangpur. Our administrative team ensures smooth operations and maintains the highest standards of educational integrity."),
        administration_pdf_url: None,
        academics_content: s("We follow the national curriculum of Bangladesh (NCTB) for both School and College sections. Our academic program is designed to foster critical thinking, creativity, and a deep understanding of core subjects."),
        academics_pdf_url: None,

        syllabuses: Vec::new(),
        class_routines: Vec::new(),
        class_teachers: Vec::new(),
        class_info_links: Vec::new(),
        is_student_info_enabled: Some(true),
        use_calculated_student_count: Some(false),

        head_teacher: Some(head_master()),
        assistant_head_teachers: vec![assistant_head_master()],
        committee_members: Vec::new(),
        governing_body: Vec::new(),

        co_curricular_content: format!("At {SCHOOL_NAME}, we believe in the all-round development of students. Our co-curricular activities include debate, scouting, sports, cultural programs, and science clubs."),
        co_curricular_pdf_url: None,

        admission_info: format!("Admission to {SCHOOL_NAME} is based on merit. For primary classes (KG to Class 5), admission is typically through a lottery or test. For higher classes, a formal admission test is conducted annually in December."),
        admission_pdf_url: None,
        admission_form_url: Some(s("https://docs.google.com/forms/u/0/")),
        admission_button_text: Some(s("Apply Online Now")),
        is_admission_open: Some(true),

        banners: vec![Banner {
            id: s("1"),
            image_url: format!("{CAMPUS_PHOTO}?q=80&w=1200"),
            title: s(SCHOOL_NAME),
            subtitle: s(MOTTO),
        }],
        notices: vec![Notice {
            id: s("n1"),
            title: s("২০২৬ শিক্ষাবর্ষে মাধ্যমিক শাখায় ভর্তি পরীক্ষার ফলাফল ও ভর্তি সংক্রান্ত বিজ্ঞপ্তি"),
            date: s("December 20, 2025"),
            content: s("ফলাফল ও ভর্তি সংক্রান্ত বিস্তারিত তথ্য এখানে পাওয়া যাবে।"),
            important: true,
            ..Notice::default()
        }],
        exams: Vec::new(),
        results: Vec::new(),
        sections: vec![
            SectionContent {
                id: s("headMasterMsg"),
                title: s("Head Master Message"),
                body: s("Welcome to our institution. We are committed to providing the best education and building a brighter future for our students."),
            },
            SectionContent {
                id: s("assistantHeadMasterMsg"),
                title: s("Assistant Head Master Message"),
                body: s("Education is the light that guides us. Our mission is to illuminate the minds of our students through discipline and academic excellence."),
            },
        ],
        faculty: vec![head_master(), assistant_head_master()],
        gallery: vec![
            GalleryItem {
                id: s("g1"),
                url: format!("{CAMPUS_PHOTO}?q=80&w=1200"),
                media_type: MediaType::Image,
                caption: s("Main Academic Building Campus View"),
            },
            GalleryItem {
                id: s("g2"),
                url: s("https://images.unsplash.com/photo-1544377193-33dcf4d68fb5?q=80&w=1200"),
                media_type: MediaType::Image,
                caption: s("School Campus Activity"),
            },
        ],
        applications: Vec::new(),
        office_drive_links: Vec::new(),
        office_profiles: vec![
            office_profile(
                "1",
                "NCTB Official",
                "https://nctb.gov.bd/",
                "Curriculum and Textbook Board",
            ),
            office_profile(
                "2",
                "DSHE Portal",
                "https://dshe.gov.bd/",
                "Secondary and Higher Education",
            ),
        ],
    }
}
