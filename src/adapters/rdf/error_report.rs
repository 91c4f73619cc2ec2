//! Reads `ot:ErrorReport` resources out of a parsed model

use crate::adapters::rdf::model::{Node, OntModel};
use crate::domain::error_report::ErrorReport;
use crate::domain::ontology::{error_report as props, OtClass};

// Services occasionally produce cyclic cause chains
const MAX_CAUSE_DEPTH: usize = 8;

/// Extract the top-level error report of `model`.
///
/// When several reports are present the one that is not the cause of
/// another is returned.
pub fn read_error_report(model: &OntModel) -> Option<ErrorReport> {
    let reports = model.subjects_of_type(&OtClass::ErrorReport.iri());
    let causes: Vec<Node> = reports
        .iter()
        .flat_map(|r| model.objects(r, props::ERROR_CAUSE))
        .collect();

    let root = reports
        .iter()
        .find(|r| !causes.contains(r))
        .or_else(|| reports.first())?;

    Some(read_node(model, root, 0))
}

fn read_node(model: &OntModel, node: &Node, depth: usize) -> ErrorReport {
    let error_cause = if depth + 1 < MAX_CAUSE_DEPTH {
        model
            .objects(node, props::ERROR_CAUSE)
            .first()
            .map(|cause| Box::new(read_node(model, cause, depth + 1)))
    } else {
        None
    };

    ErrorReport {
        actor: model.literal(node, props::ACTOR),
        message: model.literal(node, props::MESSAGE),
        details: model.literal(node, props::DETAILS),
        error_code: model.literal(node, props::ERROR_CODE),
        http_status: model
            .literal(node, props::HTTP_STATUS)
            .and_then(|s| s.trim().parse().ok()),
        error_cause,
    }
}
