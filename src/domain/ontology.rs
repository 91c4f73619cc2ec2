//! OpenTox ontology terms referenced by URI classification and error reports

/// OpenTox 1.1 namespace
pub const OT_NS: &str = "http://www.opentox.org/api/1.1#";

/// BibTeX namespace used by OpenTox bibliographic references
pub const BIBTEX_NS: &str = "http://purl.org/net/nknouf/ns/bibtex#";

/// `rdf:type`
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Ontology classes of the OpenTox resources a VRI can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtClass {
    Compound,
    Conformer,
    Feature,
    Dataset,
    Algorithm,
    BibTeX,
    Model,
    Task,
    ErrorReport,
}

impl OtClass {
    pub fn name(&self) -> &'static str {
        match self {
            OtClass::Compound => "Compound",
            OtClass::Conformer => "Conformer",
            OtClass::Feature => "Feature",
            OtClass::Dataset => "Dataset",
            OtClass::Algorithm => "Algorithm",
            OtClass::BibTeX => "Entry",
            OtClass::Model => "Model",
            OtClass::Task => "Task",
            OtClass::ErrorReport => "ErrorReport",
        }
    }

    pub fn namespace(&self) -> &'static str {
        match self {
            OtClass::BibTeX => BIBTEX_NS,
            _ => OT_NS,
        }
    }

    /// Full IRI of the class
    pub fn iri(&self) -> String {
        format!("{}{}", self.namespace(), self.name())
    }
}

/// Properties of `ot:ErrorReport`
pub mod error_report {
    pub const ACTOR: &str = "http://www.opentox.org/api/1.1#actor";
    pub const MESSAGE: &str = "http://www.opentox.org/api/1.1#message";
    pub const DETAILS: &str = "http://www.opentox.org/api/1.1#details";
    pub const ERROR_CODE: &str = "http://www.opentox.org/api/1.1#errorCode";
    pub const HTTP_STATUS: &str = "http://www.opentox.org/api/1.1#httpStatus";
    pub const ERROR_CAUSE: &str = "http://www.opentox.org/api/1.1#errorCause";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_iris() {
        assert_eq!(
            OtClass::Dataset.iri(),
            "http://www.opentox.org/api/1.1#Dataset"
        );
        assert_eq!(
            OtClass::BibTeX.iri(),
            "http://purl.org/net/nknouf/ns/bibtex#Entry"
        );
        assert!(error_report::MESSAGE.starts_with(OT_NS));
    }
}
