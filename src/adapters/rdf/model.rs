//! RDF graph adapter
//! Wraps a sophia in-memory graph behind the small query surface the client needs

use crate::domain::errors::{ClientError, Result};
use crate::domain::ontology::RDF_TYPE;
use sophia_api::graph::Graph;
use sophia_api::source::TripleSource;
use sophia_api::term::matcher::{Any, TermMatcher};
use sophia_api::term::{BnodeId, IriRef, Term, TermKind};
use sophia_api::triple::Triple;
use sophia_inmem::graph::FastGraph;
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

/// RDF serializations accepted when parsing a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RdfFormat {
    #[default]
    RdfXml,
    Turtle,
    NTriples,
    /// Read with the Turtle parser; only the Turtle subset of N3 is supported
    N3,
}

impl RdfFormat {
    /// Name used to select the format ("RDF/XML", "TTL", "N-TRIPLE", "N3")
    pub fn name(&self) -> &'static str {
        match self {
            RdfFormat::RdfXml => "RDF/XML",
            RdfFormat::Turtle => "TTL",
            RdfFormat::NTriples => "N-TRIPLE",
            RdfFormat::N3 => "N3",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            RdfFormat::RdfXml => "application/rdf+xml",
            RdfFormat::Turtle => "text/turtle",
            RdfFormat::NTriples => "application/n-triples",
            RdfFormat::N3 => "text/n3",
        }
    }

    /// Format matching a `Content-Type` value, parameters ignored
    pub fn from_media_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
        match essence.as_str() {
            "application/rdf+xml" => Some(RdfFormat::RdfXml),
            "text/turtle" | "application/x-turtle" => Some(RdfFormat::Turtle),
            "application/n-triples" | "text/plain" => Some(RdfFormat::NTriples),
            "text/n3" | "text/rdf+n3" => Some(RdfFormat::N3),
            _ => None,
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RdfFormat {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RDF/XML" | "RDF/XML-ABBREV" | "RDFXML" | "XML" => Ok(RdfFormat::RdfXml),
            "TTL" | "TURTLE" => Ok(RdfFormat::Turtle),
            "N-TRIPLE" | "N-TRIPLES" | "NTRIPLES" | "NT" => Ok(RdfFormat::NTriples),
            "N3" => Ok(RdfFormat::N3),
            other => Err(ClientError::MalformedInput(format!(
                "Unsupported RDF serialization: {}",
                other
            ))),
        }
    }
}

/// A node of the graph, reduced to what the readers need
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Iri(String),
    Blank(String),
    /// Lexical form of a literal; datatype and language are dropped
    Literal(String),
}

impl Node {
    pub fn iri(iri: impl Into<String>) -> Self {
        Node::Iri(iri.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Node::Literal(lexical) => Some(lexical),
            _ => None,
        }
    }

    fn from_term<T: Term>(term: &T) -> Option<Self> {
        match term.kind() {
            TermKind::Iri => term.iri().map(|iri| Node::Iri(iri.as_str().to_string())),
            TermKind::BlankNode => term
                .bnode_id()
                .map(|id| Node::Blank(id.as_str().to_string())),
            TermKind::Literal => term
                .lexical_form()
                .map(|lexical| Node::Literal(lexical.to_string())),
            _ => None,
        }
    }
}

/// One statement of the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: Node,
    pub predicate: String,
    pub object: Node,
}

/// In-memory RDF graph parsed from a service response
pub struct OntModel {
    graph: FastGraph,
}

impl fmt::Debug for OntModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OntModel")
            .field("triples", &self.len())
            .finish()
    }
}

impl OntModel {
    /// Parse `reader` in the given serialization
    pub fn parse<R: BufRead>(reader: R, format: RdfFormat) -> Result<Self> {
        let unparseable = |e: String| {
            ClientError::BadRequest(format!("{} parse failed: {}", format.name(), e))
        };

        let graph: FastGraph = match format {
            RdfFormat::RdfXml => sophia_xml::parser::parse_bufread(reader)
                .collect_triples()
                .map_err(|e| unparseable(e.to_string()))?,
            RdfFormat::Turtle | RdfFormat::N3 => {
                sophia_turtle::parser::turtle::parse_bufread(reader)
                    .collect_triples()
                    .map_err(|e| unparseable(e.to_string()))?
            }
            RdfFormat::NTriples => sophia_turtle::parser::nt::parse_bufread(reader)
                .collect_triples()
                .map_err(|e| unparseable(e.to_string()))?,
        };

        let model = Self { graph };
        tracing::debug!("Parsed {} triple(s) as {}", model.len(), format);
        Ok(model)
    }

    pub fn parse_str(data: &str, format: RdfFormat) -> Result<Self> {
        Self::parse(data.as_bytes(), format)
    }

    pub fn len(&self) -> usize {
        self.graph.triples().count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.triples().next().is_none()
    }

    /// All statements, in graph order
    pub fn statements(&self) -> Vec<Statement> {
        self.graph
            .triples()
            .filter_map(|t| t.ok())
            .filter_map(|t| {
                let subject = Node::from_term(t.s())?;
                let predicate = t.p().iri()?.as_str().to_string();
                let object = Node::from_term(t.o())?;
                Some(Statement {
                    subject,
                    predicate,
                    object,
                })
            })
            .collect()
    }

    /// Subjects declared `rdf:type` of `class_iri`
    pub fn subjects_of_type(&self, class_iri: &str) -> Vec<Node> {
        let mut subjects: Vec<Node> = Vec::new();
        let matching = self.graph.triples_matching(
            Any,
            [IriRef::new_unchecked(RDF_TYPE)],
            [IriRef::new_unchecked(class_iri)],
        );
        for subject in matching
            .filter_map(|t| t.ok())
            .filter_map(|t| Node::from_term(t.s()))
        {
            if !subjects.contains(&subject) {
                subjects.push(subject);
            }
        }
        subjects
    }

    /// Objects of `subject predicate ?o`
    pub fn objects(&self, subject: &Node, predicate: &str) -> Vec<Node> {
        match subject {
            Node::Iri(iri) => {
                self.objects_matching([IriRef::new_unchecked(iri.as_str())], predicate)
            }
            Node::Blank(id) => {
                self.objects_matching([BnodeId::new_unchecked(id.as_str())], predicate)
            }
            Node::Literal(_) => Vec::new(),
        }
    }

    fn objects_matching<S: TermMatcher>(&self, subject: S, predicate: &str) -> Vec<Node> {
        self.graph
            .triples_matching(subject, [IriRef::new_unchecked(predicate)], Any)
            .filter_map(|t| t.ok())
            .filter_map(|t| Node::from_term(t.o()))
            .collect()
    }

    /// First literal value of `subject predicate ?o`
    pub fn literal(&self, subject: &Node, predicate: &str) -> Option<String> {
        self.objects(subject, predicate)
            .into_iter()
            .find_map(|o| o.as_literal().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TURTLE: &str = r#"
@prefix ot: <http://www.opentox.org/api/1.1#> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix dc: <http://purl.org/dc/elements/1.1/> .

<http://host/dataset/1> rdf:type ot:Dataset ;
    dc:title "Training set" .
<http://host/dataset/2> a ot:Dataset .
"#;

    const RDF_XML: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:ot="http://www.opentox.org/api/1.1#"
         xmlns:dc="http://purl.org/dc/elements/1.1/">
  <ot:Model rdf:about="http://host/model/1">
    <dc:title>MLR model</dc:title>
  </ot:Model>
</rdf:RDF>"#;

    #[test]
    fn test_format_names() {
        assert_eq!("RDF/XML".parse::<RdfFormat>().unwrap(), RdfFormat::RdfXml);
        assert_eq!("ttl".parse::<RdfFormat>().unwrap(), RdfFormat::Turtle);
        assert_eq!("N-TRIPLE".parse::<RdfFormat>().unwrap(), RdfFormat::NTriples);
        assert_eq!("N3".parse::<RdfFormat>().unwrap(), RdfFormat::N3);
        assert!("JSON".parse::<RdfFormat>().is_err());
        assert_eq!(RdfFormat::default(), RdfFormat::RdfXml);
        assert_eq!(RdfFormat::default().media_type(), "application/rdf+xml");
        assert_eq!(
            RdfFormat::from_media_type("text/turtle; charset=UTF-8"),
            Some(RdfFormat::Turtle)
        );
        assert_eq!(RdfFormat::from_media_type("text/html"), None);
    }

    #[test]
    fn test_parse_turtle_and_query() {
        let model = OntModel::parse_str(TURTLE, RdfFormat::Turtle).unwrap();
        assert_eq!(model.len(), 3);

        let datasets = model.subjects_of_type("http://www.opentox.org/api/1.1#Dataset");
        assert_eq!(datasets.len(), 2);

        let title = model.literal(
            &Node::iri("http://host/dataset/1"),
            "http://purl.org/dc/elements/1.1/title",
        );
        assert_eq!(title.as_deref(), Some("Training set"));
    }

    #[test]
    fn test_parse_rdf_xml() {
        let model = OntModel::parse_str(RDF_XML, RdfFormat::RdfXml).unwrap();
        assert!(!model.is_empty());
        assert_eq!(
            model.subjects_of_type("http://www.opentox.org/api/1.1#Model"),
            vec![Node::iri("http://host/model/1")]
        );
    }

    #[test]
    fn test_parse_ntriples() {
        let nt = "<http://host/task/1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.opentox.org/api/1.1#Task> .\n";
        let model = OntModel::parse_str(nt, RdfFormat::NTriples).unwrap();
        assert_eq!(model.len(), 1);
        assert_eq!(
            model.statements(),
            vec![Statement {
                subject: Node::iri("http://host/task/1"),
                predicate: RDF_TYPE.to_string(),
                object: Node::iri("http://www.opentox.org/api/1.1#Task"),
            }]
        );
    }

    #[test]
    fn test_objects_of_blank_subject() {
        let ttl = r#"
@prefix ot: <http://www.opentox.org/api/1.1#> .
<http://host/error/1> ot:errorCause _:cause .
_:cause ot:message "inner" .
"#;
        let model = OntModel::parse_str(ttl, RdfFormat::Turtle).unwrap();
        let causes = model.objects(
            &Node::iri("http://host/error/1"),
            "http://www.opentox.org/api/1.1#errorCause",
        );
        assert_eq!(causes.len(), 1);
        assert_eq!(
            model
                .literal(&causes[0], "http://www.opentox.org/api/1.1#message")
                .as_deref(),
            Some("inner")
        );
        assert!(model
            .objects(&Node::Literal("inner".into()), "http://www.opentox.org/api/1.1#message")
            .is_empty());
    }

    #[test]
    fn test_n3_reads_turtle_subset() {
        let model = OntModel::parse_str(TURTLE, RdfFormat::N3).unwrap();
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn test_unparseable_is_bad_request() {
        let err = OntModel::parse_str("this is not rdf", RdfFormat::Turtle).unwrap_err();
        assert!(matches!(err, ClientError::BadRequest(_)));
        assert!(err.to_string().contains("TTL parse failed"));

        let err = OntModel::parse_str("<http://a> <http://b> .", RdfFormat::NTriples).unwrap_err();
        assert!(matches!(err, ClientError::BadRequest(_)));
    }
}
