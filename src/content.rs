//! Section content lookup.

use bevy::prelude::Resource;
use hashbrown::HashMap;

use crate::config::SectionConfig;
use crate::markers::SectionId;

/// Body shown for sections without catalogue content.
pub const FALLBACK_BODY: &str = "Section coming soon!";

/// Rendered text of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionContent {
    /// Panel heading.
    pub title: String,
    /// Panel body, plain text with line breaks.
    pub body: String,
}

impl SectionContent {
    /// Builds content from borrowed text.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Maps a section to what the panel should show.
#[cfg_attr(test, mockall::automock)]
pub trait ContentPresenter {
    /// Content for `section`. `label` is the marker caption, used as the
    /// heading when the section is unknown.
    fn content_for(&self, section: &SectionId, label: &str) -> SectionContent;
}

/// Static section catalogue.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct SectionCatalog {
    entries: HashMap<SectionId, SectionContent>,
}

impl Default for SectionCatalog {
    fn default() -> Self {
        Self::from_entries(DEFAULT_SECTIONS.iter().map(|(id, title, body)| {
            (SectionId::from(*id), SectionContent::new(*title, *body))
        }))
    }
}

impl SectionCatalog {
    /// An empty catalogue; every lookup falls back.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Builds a catalogue from pairs; later duplicates replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = (SectionId, SectionContent)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// The default catalogue overridden by configured sections.
    #[must_use]
    pub fn from_config(sections: &[SectionConfig]) -> Self {
        let mut catalog = Self::default();
        for section in sections {
            catalog.insert(
                SectionId::new(section.id.as_str()),
                SectionContent::new(section.title.as_str(), section.body.as_str()),
            );
        }
        catalog
    }

    /// Adds or replaces a section.
    pub fn insert(&mut self, id: SectionId, content: SectionContent) -> Option<SectionContent> {
        self.entries.insert(id, content)
    }

    /// Stored content, without fallback.
    #[must_use]
    pub fn get(&self, id: &SectionId) -> Option<&SectionContent> {
        self.entries.get(id)
    }

    /// Number of stored sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ContentPresenter for SectionCatalog {
    fn content_for(&self, section: &SectionId, label: &str) -> SectionContent {
        self.entries
            .get(section)
            .cloned()
            .unwrap_or_else(|| SectionContent::new(label, FALLBACK_BODY))
    }
}

const DEFAULT_SECTIONS: &[(&str, &str, &str)] = &[
    (
        "home",
        "Welcome!",
        "Explore the portfolio by driving the car to each section or by pressing \
         the number keys.\n\nCONTROLS\nW  Forward\nS  Backward\nD  Right\nA  Left\n\
         (Arrow keys also work!)",
    ),
    (
        "about",
        "About Me",
        "Computer Science student with a minor in CIS.\n\
         Into competitive racing and working towards a racing licence.\n\
         Outside of coding: training, staying active and car photography at the track.",
    ),
    (
        "skills",
        "Technical Skills",
        "JavaScript, CSS, HTML\nPython, Java, PHP\nC++, C#, SQL\n\
         Visual Studio, VS Code, Unity",
    ),
    (
        "aspirations",
        "My Aspirations",
        "I aim to become a software engineer and contribute to impactful projects.",
    ),
    (
        "projects",
        "Completed CS Projects",
        "Box Two Tracking Solution: web and Windows applications over a shared \
         database for tracking graduation requirements (C#, SQL, HTML, CSS).\n\n\
         What Car Brand are You?: a quiz game matching players to a car brand \
         (JavaScript, HTML, CSS).",
    ),
    (
        "special",
        "Special Topics",
        "Presentation or content on a special CS topic.",
    ),
    (
        "contact",
        "Contact Me",
        "LinkedIn and GitHub links live here.",
    ),
];
