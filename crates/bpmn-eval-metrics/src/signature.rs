//! Element-level comparison of two documents.

use std::collections::BTreeSet;

use bpmn_eval_xml::Document;
use serde::{Deserialize, Serialize};

/// Identity of one element for set comparison: local tag name, `id`
/// attribute (empty when absent) and every attribute pair in name order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementSignature {
    /// Tag name without namespace prefix.
    pub tag: String,
    /// Value of the `id` attribute, or empty.
    pub id: String,
    /// `(name, value)` pairs sorted by name.
    pub attributes: Vec<(String, String)>,
}

/// Collects the signature of every element in `xml`.
///
/// Namespace declarations are not attributes of the element and are left
/// out. An unparsable document has no signatures.
pub fn element_signatures(xml: &str) -> BTreeSet<ElementSignature> {
    let Ok(doc) = Document::parse(xml) else {
        return BTreeSet::new();
    };
    doc.root()
        .descendants()
        .into_iter()
        .map(|element| {
            let mut attributes: Vec<(String, String)> = element
                .attributes
                .iter()
                .filter(|(key, _)| !is_namespace_declaration(key))
                .cloned()
                .collect();
            attributes.sort();
            ElementSignature {
                tag: element.local_name().to_string(),
                id: element.attribute("id").unwrap_or_default().to_string(),
                attributes,
            }
        })
        .collect()
}

fn is_namespace_declaration(key: &str) -> bool {
    key == "xmlns" || key.starts_with("xmlns:")
}

/// Precision, recall and F1 over element signatures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementMetrics {
    /// Matched / predicted.
    pub precision: f64,
    /// Matched / ground truth.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Distinct signatures in the prediction.
    pub predicted_elements: usize,
    /// Distinct signatures in the ground truth.
    pub ground_truth_elements: usize,
    /// Signatures present in both.
    pub matched_elements: usize,
}

/// Compares the element signatures of a prediction against a reference.
pub fn element_metrics(predicted: &str, ground_truth: &str) -> ElementMetrics {
    let predicted_set = element_signatures(predicted);
    let truth_set = element_signatures(ground_truth);
    let matched = predicted_set.intersection(&truth_set).count();

    let precision = ratio(matched, predicted_set.len());
    let recall = ratio(matched, truth_set.len());
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    ElementMetrics {
        precision,
        recall,
        f1,
        predicted_elements: predicted_set.len(),
        ground_truth_elements: truth_set.len(),
        matched_elements: matched,
    }
}

pub(crate) fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_ignore_prefix_and_attribute_order() {
        let a = element_signatures(r#"<bpmn:task id="T" name="x"/>"#);
        let b = element_signatures(r#"<task name="x" id="T"/>"#);
        assert_eq!(a, b);
    }

    #[test]
    fn namespace_declarations_are_not_attributes() {
        let predicted = r#"<bpmn:definitions xmlns:bpmn="u" xmlns:di="v" id="D"><bpmn:process id="P"/></bpmn:definitions>"#;
        let truth = r#"<bpmn:definitions xmlns:bpmn="u" id="D"><bpmn:process id="P"/></bpmn:definitions>"#;
        let signatures = element_signatures(predicted);
        assert!(signatures
            .iter()
            .all(|sig| sig.attributes.iter().all(|(key, _)| !key.starts_with("xmlns"))));

        let metrics = element_metrics(predicted, truth);
        assert_eq!(metrics.matched_elements, 2);
        assert_eq!(metrics.f1, 1.0);
    }

    #[test]
    fn missing_id_is_empty() {
        let set = element_signatures("<a/>");
        assert_eq!(set.iter().next().unwrap().id, "");
    }

    #[test]
    fn unparsable_has_no_signatures() {
        assert!(element_signatures("<a>").is_empty());
    }

    #[test]
    fn partial_overlap() {
        let metrics = element_metrics(
            r#"<p id="P"><t id="A"/><t id="B"/><t id="X"/></p>"#,
            r#"<p id="P"><t id="A"/><t id="B"/></p>"#,
        );
        assert_eq!(metrics.matched_elements, 3);
        assert_eq!(metrics.predicted_elements, 4);
        assert_eq!(metrics.ground_truth_elements, 3);
        assert!((metrics.precision - 0.75).abs() < 1e-9);
        assert!((metrics.recall - 1.0).abs() < 1e-9);
        assert!((metrics.f1 - 6.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn nothing_in_common_scores_zero() {
        let metrics = element_metrics("<a/>", "<b/>");
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1, 0.0);
    }
}
