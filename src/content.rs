//! Portfolio content and page layout.
//!
//! [`Profile`] is what the user writes in the `[profile]` table of the config
//! file. [`Page::build`] turns it into a flat list of one-line [`Row`]s for a
//! given terminal width, recording where each section starts (navigation
//! anchors) and which row each counter sits on (for the viewport observer).

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::counter::CounterConfig;
use crate::viewport::RowSpan;

/// Sections in page order. `Highlights` holds the counters and has no nav
/// link of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Home,
    Highlights,
    About,
    Skills,
    Projects,
    Experience,
    Education,
    Contact,
}

impl SectionId {
    /// Sections reachable from the navbar, in link order.
    pub const NAV: [SectionId; 7] = [
        SectionId::Home,
        SectionId::About,
        SectionId::Skills,
        SectionId::Projects,
        SectionId::Experience,
        SectionId::Education,
        SectionId::Contact,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SectionId::Home => "Home",
            SectionId::Highlights => "Highlights",
            SectionId::About => "About",
            SectionId::Skills => "Skills",
            SectionId::Projects => "Projects",
            SectionId::Experience => "Experience",
            SectionId::Education => "Education",
            SectionId::Contact => "Contact",
        }
    }

    /// Heading shown at the top of the section, if any.
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            SectionId::Home => None,
            SectionId::Highlights => Some("At a Glance"),
            SectionId::About => Some("About Me"),
            SectionId::Skills => Some("Technical Arsenal"),
            SectionId::Projects => Some("Featured Projects"),
            SectionId::Experience => Some("Experience"),
            SectionId::Education => Some("Education & Certifications"),
            SectionId::Contact => Some("Ready to build intelligent systems together?"),
        }
    }

    /// Position in the navbar (0-based), `None` for sections without a link.
    pub fn nav_index(&self) -> Option<usize> {
        Self::NAV.iter().position(|s| s == self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub kicker: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub stack: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub period: String,
    pub title: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub period: String,
    pub title: String,
    pub institution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Link {
    fn new(label: &str, url: &str) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub headline: String,
    /// Text shown before the typewriter phrase.
    pub typewriter_prefix: String,
    pub tagline: String,
    pub badge: Option<String>,
    pub about: String,
    pub resume: Option<String>,
    pub skills: Vec<SkillGroup>,
    pub projects: Vec<Project>,
    pub experience: Vec<Role>,
    pub education: Vec<Education>,
    pub contact: Vec<Link>,
}

impl Default for Profile {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            name: "Alex Rivera".to_string(),
            headline: "Aspiring AI/ML Engineer".to_string(),
            typewriter_prefix: "Building with ".to_string(),
            tagline: "Building vision systems that turn pixels into intelligence: object \
                      detection, segmentation, and real-time analytics."
                .to_string(),
            badge: Some("Open to Computer Vision Roles".to_string()),
            about: "AI/ML engineer with practical expertise in natural language processing \
                    and computer vision. Comfortable across the stack from data annotation and \
                    model training to deployment, with a focus on practical systems for \
                    robotics and healthcare."
                .to_string(),
            resume: Some("resume.pdf".to_string()),
            skills: vec![
                SkillGroup {
                    category: "Programming".to_string(),
                    items: strings(&["Python", "Rust", "SQL"]),
                },
                SkillGroup {
                    category: "Machine Learning".to_string(),
                    items: strings(&[
                        "Scikit-learn",
                        "Random Forest",
                        "SVM",
                        "Feature Engineering",
                    ]),
                },
                SkillGroup {
                    category: "Deep Learning".to_string(),
                    items: strings(&[
                        "PyTorch",
                        "TensorFlow",
                        "YOLOv8",
                        "CNNs",
                        "Transfer Learning",
                    ]),
                },
                SkillGroup {
                    category: "Computer Vision".to_string(),
                    items: strings(&["OpenCV", "Segment Anything", "COCO", "OCR"]),
                },
                SkillGroup {
                    category: "NLP".to_string(),
                    items: strings(&["BERT", "spaCy", "Transformers"]),
                },
                SkillGroup {
                    category: "Deployment & Tools".to_string(),
                    items: strings(&["Docker", "Flask", "Git", "Streamlit"]),
                },
            ],
            projects: vec![
                Project {
                    title: "Object Segmentation for Robot Grasping".to_string(),
                    kicker: "Computer Vision • Robotics".to_string(),
                    highlights: strings(&[
                        "Real-time instance segmentation pipeline with YOLOv8 + SAM",
                        "Polygon annotations for precise masks",
                    ]),
                    stack: strings(&["YOLOv8", "SAM", "PyTorch"]),
                    link: Some("https://github.com/example".to_string()),
                },
                Project {
                    title: "Prescription Digitization".to_string(),
                    kicker: "OCR • NLP • Healthcare".to_string(),
                    highlights: strings(&[
                        "OCR + NLP pipeline for printed and handwritten prescriptions",
                        "90% accuracy on printed text",
                    ]),
                    stack: strings(&["OpenCV", "TrOCR", "spaCy", "Streamlit"]),
                    link: Some("https://github.com/example".to_string()),
                },
                Project {
                    title: "Campus Recruitment Matcher".to_string(),
                    kicker: "Machine Learning • Placement".to_string(),
                    highlights: strings(&[
                        "SVM-based job matching engine with 89% accuracy",
                        "Increased placement efficiency by 35%",
                    ]),
                    stack: strings(&["SVM", "Python", "SQL"]),
                    link: None,
                },
            ],
            experience: vec![Role {
                period: "2025 – 2026".to_string(),
                title: "AI/ML Intern @ Robotics Lab".to_string(),
                highlights: strings(&[
                    "Designed segmentation pipelines for semi-humanoid robots",
                    "Built healthcare AI prototypes for OCR and biomedical NLP",
                ]),
            }],
            education: vec![
                Education {
                    period: "2025 – 2026".to_string(),
                    title: "PG Diploma in AI & ML".to_string(),
                    institution: "School of Learning".to_string(),
                },
                Education {
                    period: "2021 – 2025".to_string(),
                    title: "B.Tech Computer Science".to_string(),
                    institution: "Engineering College".to_string(),
                },
            ],
            contact: vec![
                Link::new("Email", "mailto:alex@example.com"),
                Link::new("LinkedIn", "https://linkedin.com/in/example"),
                Link::new("GitHub", "https://github.com/example"),
            ],
        }
    }
}

impl Profile {
    /// Two-letter monogram for the navbar.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// One terminal line of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Blank,
    Badge(String),
    Name(String),
    Headline(String),
    /// The live typewriter line; the prefix is static text before it.
    Typewriter { prefix: String },
    Tagline(String),
    Actions(Vec<String>),
    ScrollHint,
    SectionTitle(String),
    Text(String),
    Kicker(String),
    ItemTitle(String),
    Bullet(String),
    Tags(Vec<String>),
    Meta(String),
    Link(Link),
    /// Index into the configured counters.
    Counter(usize),
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub rows: Vec<Row>,
    anchors: Vec<(SectionId, usize)>,
    counter_rows: Vec<usize>,
}

/// Width used before the first resize arrives.
pub const DEFAULT_WIDTH: usize = 80;

const GUTTER: usize = 4;

impl Page {
    pub fn build(profile: &Profile, counters: &[CounterConfig], width: usize) -> Self {
        let mut b = PageBuilder {
            page: Page::default(),
            text_width: width.saturating_sub(GUTTER).max(20),
        };

        b.section(SectionId::Home);
        b.push(Row::Blank);
        if let Some(badge) = &profile.badge {
            b.push(Row::Badge(badge.clone()));
            b.push(Row::Blank);
        }
        b.push(Row::Name(profile.name.clone()));
        b.push(Row::Headline(profile.headline.clone()));
        b.push(Row::Typewriter {
            prefix: profile.typewriter_prefix.clone(),
        });
        b.push(Row::Blank);
        b.wrapped(&profile.tagline, Row::Tagline);
        b.push(Row::Blank);
        let mut actions = vec!["View Projects →".to_string()];
        if let Some(resume) = &profile.resume {
            actions.push(format!("Download CV ({})", resume));
        }
        b.push(Row::Actions(actions));
        b.push(Row::Blank);
        b.push(Row::ScrollHint);

        if !counters.is_empty() {
            b.section(SectionId::Highlights);
            for index in 0..counters.len() {
                b.page.counter_rows.push(b.page.rows.len());
                b.push(Row::Counter(index));
            }
        }

        b.section(SectionId::About);
        b.wrapped(&profile.about, Row::Text);

        b.section(SectionId::Skills);
        for group in &profile.skills {
            b.push(Row::Kicker(group.category.clone()));
            b.push(Row::Tags(group.items.clone()));
            b.push(Row::Blank);
        }

        b.section(SectionId::Projects);
        for project in &profile.projects {
            if !project.kicker.is_empty() {
                b.push(Row::Kicker(project.kicker.clone()));
            }
            b.push(Row::ItemTitle(project.title.clone()));
            for line in &project.highlights {
                b.wrapped(line, Row::Bullet);
            }
            if !project.stack.is_empty() {
                b.push(Row::Tags(project.stack.clone()));
            }
            if let Some(url) = &project.link {
                b.push(Row::Link(Link::new("View on GitHub", url)));
            }
            b.push(Row::Blank);
        }

        b.section(SectionId::Experience);
        for role in &profile.experience {
            b.push(Row::Meta(role.period.clone()));
            b.push(Row::ItemTitle(role.title.clone()));
            for line in &role.highlights {
                b.wrapped(line, Row::Bullet);
            }
            b.push(Row::Blank);
        }

        b.section(SectionId::Education);
        for entry in &profile.education {
            b.push(Row::Meta(entry.period.clone()));
            b.push(Row::ItemTitle(entry.title.clone()));
            b.push(Row::Text(entry.institution.clone()));
            b.push(Row::Blank);
        }

        b.section(SectionId::Contact);
        for link in &profile.contact {
            b.push(Row::Link(link.clone()));
        }
        b.push(Row::Blank);

        b.page
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row of `section`, if the page has it.
    pub fn anchor(&self, section: SectionId) -> Option<usize> {
        self.anchors
            .iter()
            .find(|(id, _)| *id == section)
            .map(|(_, row)| *row)
    }

    /// Section that `row` belongs to.
    pub fn section_at(&self, row: usize) -> SectionId {
        self.anchors
            .iter()
            .take_while(|(_, start)| *start <= row)
            .last()
            .map(|(id, _)| *id)
            .unwrap_or(SectionId::Home)
    }

    /// Start of the first section strictly below `row`.
    pub fn next_anchor(&self, row: usize) -> Option<usize> {
        self.anchors
            .iter()
            .map(|(_, start)| *start)
            .find(|start| *start > row)
    }

    /// Start of the last section strictly above `row`.
    pub fn prev_anchor(&self, row: usize) -> Option<usize> {
        self.anchors
            .iter()
            .map(|(_, start)| *start)
            .filter(|start| *start < row)
            .last()
    }

    /// Where counter `index` sits on the page.
    pub fn counter_span(&self, index: usize) -> Option<RowSpan> {
        self.counter_rows.get(index).map(|row| RowSpan::row(*row))
    }

    pub fn counter_count(&self) -> usize {
        self.counter_rows.len()
    }

    pub fn typewriter_row(&self) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| matches!(r, Row::Typewriter { .. }))
    }
}

struct PageBuilder {
    page: Page,
    text_width: usize,
}

impl PageBuilder {
    fn push(&mut self, row: Row) {
        self.page.rows.push(row);
    }

    fn section(&mut self, id: SectionId) {
        if id != SectionId::Home {
            self.push(Row::Blank);
        }
        self.page.anchors.push((id, self.page.rows.len()));
        if let Some(heading) = id.heading() {
            self.push(Row::SectionTitle(heading.to_string()));
            self.push(Row::Blank);
        }
    }

    fn wrapped(&mut self, text: &str, make: fn(String) -> Row) {
        for line in wrap(text, self.text_width) {
            self.push(make(line));
        }
    }
}

/// Greedy word wrap measured in terminal cells. Words wider than `width`
/// are broken between graphemes.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if line_width > 0 && line_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }

        if word_width > width && width > 0 {
            for grapheme in word.graphemes(true) {
                let grapheme_width = grapheme.width();
                if line_width > 0 && line_width + grapheme_width > width {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push_str(grapheme);
                line_width += grapheme_width;
            }
            continue;
        }

        if line_width > 0 {
            line.push(' ');
            line_width += 1;
        }
        line.push_str(word);
        line_width += word_width;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
