//! Classification of OpenTox resource URIs by their path shape

use crate::domain::ontology::OtClass;
use once_cell::sync::Lazy;
use regex::Regex;

/// Kinds of OpenTox resources recognised from a URI path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenToxType {
    Compound,
    Conformer,
    Feature,
    Dataset,
    Algorithm,
    BibTeX,
    Model,
    Task,
}

impl OpenToxType {
    /// All kinds in matching order. The first matching kind wins.
    pub const ALL: [OpenToxType; 8] = [
        OpenToxType::Compound,
        OpenToxType::Conformer,
        OpenToxType::Feature,
        OpenToxType::Dataset,
        OpenToxType::Algorithm,
        OpenToxType::BibTeX,
        OpenToxType::Model,
        OpenToxType::Task,
    ];

    /// Path segment naming the resource collection
    pub fn segment(&self) -> &'static str {
        match self {
            OpenToxType::Compound => "compound",
            OpenToxType::Conformer => "conformer",
            OpenToxType::Feature => "feature",
            OpenToxType::Dataset => "dataset",
            OpenToxType::Algorithm => "algorithm",
            OpenToxType::BibTeX => "bibtex",
            OpenToxType::Model => "model",
            OpenToxType::Task => "task",
        }
    }

    pub fn ontological_class(&self) -> OtClass {
        match self {
            OpenToxType::Compound => OtClass::Compound,
            OpenToxType::Conformer => OtClass::Conformer,
            OpenToxType::Feature => OtClass::Feature,
            OpenToxType::Dataset => OtClass::Dataset,
            OpenToxType::Algorithm => OtClass::Algorithm,
            OpenToxType::BibTeX => OtClass::BibTeX,
            OpenToxType::Model => OtClass::Model,
            OpenToxType::Task => OtClass::Task,
        }
    }

    /// Compounds and conformers only qualify when the URI has no query
    pub fn requires_empty_query(&self) -> bool {
        matches!(self, OpenToxType::Compound | OpenToxType::Conformer)
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            OpenToxType::Compound => &*COMPOUND,
            OpenToxType::Conformer => &*CONFORMER,
            OpenToxType::Feature => &*FEATURE,
            OpenToxType::Dataset => &*DATASET,
            OpenToxType::Algorithm => &*ALGORITHM,
            OpenToxType::BibTeX => &*BIBTEX,
            OpenToxType::Model => &*MODEL,
            OpenToxType::Task => &*TASK,
        }
    }

    /// Whether `base` (a URI without query) has the path shape of this kind
    pub fn matches(&self, base: &str, query: &str) -> bool {
        if self.requires_empty_query() && !query.is_empty() {
            return false;
        }
        self.pattern().is_match(base)
            || (*self == OpenToxType::Compound && QUERY_COMPOUND.is_match(base))
    }

    /// First kind whose shape matches, if any
    pub fn classify(base: &str, query: &str) -> Option<OpenToxType> {
        Self::ALL.into_iter().find(|kind| kind.matches(base, query))
    }
}

/// Path shape regexes (compiled once)
static COMPOUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^.+/compounds?/[^/]+/?$").unwrap());

static QUERY_COMPOUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^.+/query/compound/[^/]+/[^/]+/?$").unwrap());

static CONFORMER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^.+/compounds?/[^/]+/conformers?/[^/]+/?$").unwrap());

static FEATURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^.+/features?/[^/]+/?$").unwrap());

static DATASET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^.+/datasets?/[^/]+/?$").unwrap());

static ALGORITHM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^.+/algorithms?/[^/]+/?$").unwrap());

static BIBTEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^.+/bibtex/[^/]+/?$").unwrap());

static MODEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^.+/models?/[^/]+/?$").unwrap());

static TASK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^.+/tasks?/[^/]+/?$").unwrap());
