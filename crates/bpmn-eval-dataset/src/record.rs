//! Conversion of raw generation records into training pairs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pii::{redact_pii, PiiKind};

const BPMN_SYSTEM_PROMPT: &str = r#"You are a BPMN 2.0 XML expert. Generate valid BPMN 2.0 XML based on user descriptions.

CRITICAL RULES:
1. Return ONLY valid BPMN 2.0 XML format
2. Use namespace: xmlns="http://www.omg.org/spec/BPMN/20100524/MODEL"
3. Use elements: startEvent, task, userTask, serviceTask, exclusiveGateway, parallelGateway, endEvent
4. Include sequenceFlow with sourceRef and targetRef
5. Add bpmndi:BPMNDiagram section for visual layout
6. ALL di:waypoint tags MUST be self-closing: <di:waypoint x="..." y="..."/>
7. Return ONLY XML, no markdown or explanations"#;

const PID_SYSTEM_PROMPT: &str = r#"You are a P&ID expert. Generate BPMN 2.0 XML with P&ID attributes for process diagrams.

CRITICAL RULES:
1. EVERY element MUST have pid:type, pid:symbol, pid:category attributes
2. Equipment (task): pid:type="equipment", pid:symbol="tank|pump|filter|heat_exchanger", pid:category="mechanical"
3. Valves (exclusiveGateway): pid:type="valve", pid:symbol="valve_control|valve_check|valve_gate|valve_solenoid", pid:category="mechanical"
4. Return ONLY XML, no markdown."#;

const DEFAULT_COMPLEXITY: u64 = 3;
const COMPLETED_STATUS: &str = "completed";

/// Which diagram flavour a dataset targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    /// Plain BPMN 2.0 process diagrams.
    #[default]
    Bpmn,
    /// BPMN annotated with P&ID attributes.
    Pid,
}

impl DiagramType {
    /// System prompt prepended to every user prompt.
    pub fn system_prompt(self) -> &'static str {
        match self {
            DiagramType::Bpmn => BPMN_SYSTEM_PROMPT,
            DiagramType::Pid => PID_SYSTEM_PROMPT,
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramType::Bpmn => write!(f, "bpmn"),
            DiagramType::Pid => write!(f, "pid"),
        }
    }
}

impl FromStr for DiagramType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bpmn" => Ok(DiagramType::Bpmn),
            "pid" => Ok(DiagramType::Pid),
            other => Err(format!("unknown diagram type '{}' (expected bpmn or pid)", other)),
        }
    }
}

/// Metadata carried alongside each training pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Diagram flavour.
    pub diagram_type: DiagramType,
    /// Complexity score as stored upstream (default 3).
    pub complexity_score: Value,
    /// Creation time as stored upstream.
    pub timestamp: Option<String>,
    /// PII kinds redacted from the prompt.
    pub pii_detected: Vec<PiiKind>,
    /// Model that produced the document.
    pub model_used: String,
}

/// One fine-tuning example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    /// System prompt plus redacted user prompt.
    pub input: String,
    /// Generated document.
    pub output: String,
    /// Provenance.
    pub metadata: RecordMetadata,
}

/// Whether a raw record finished generating. Records without a status
/// are treated as completed.
pub fn is_completed(record: &Value) -> bool {
    match record.get("status").and_then(Value::as_str) {
        Some(status) => status == COMPLETED_STATUS,
        None => true,
    }
}

/// Converts a raw record into a training pair.
///
/// Returns `None` when the record has no prompt or no document.
pub fn process_record(record: &Value, diagram_type: DiagramType) -> Option<TrainingRecord> {
    let prompt = first_non_empty(record, &["prompt", "user_prompt"])?;
    let output = first_non_empty(record, &["bpmn_xml", "bpmnXml"])?;

    let (redacted, pii_detected) = redact_pii(prompt);
    if !pii_detected.is_empty() {
        tracing::debug!(kinds = ?pii_detected, "redacted PII from prompt");
    }

    let input = format!(
        "System: {}\n\nUser: {}",
        diagram_type.system_prompt(),
        redacted
    );

    let timestamp = ["created_at", "timestamp"]
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
        .map(str::to_string);

    Some(TrainingRecord {
        input,
        output: output.to_string(),
        metadata: RecordMetadata {
            diagram_type,
            complexity_score: record
                .get("complexity_score")
                .cloned()
                .unwrap_or_else(|| Value::from(DEFAULT_COMPLEXITY)),
            timestamp,
            pii_detected,
            model_used: record
                .get("model_used")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
        },
    })
}

fn first_non_empty<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_training_pair_with_defaults() {
        let record = json!({
            "user_prompt": "Email bob@example.com when stock is low",
            "bpmnXml": "<bpmn:definitions/>",
            "created_at": "2025-01-01T00:00:00Z"
        });
        let processed = process_record(&record, DiagramType::Bpmn).unwrap();

        assert!(processed.input.starts_with("System: You are a BPMN 2.0 XML expert."));
        assert!(processed.input.ends_with("\n\nUser: Email [EMAIL] when stock is low"));
        assert_eq!(processed.output, "<bpmn:definitions/>");
        assert_eq!(processed.metadata.complexity_score, json!(3));
        assert_eq!(processed.metadata.timestamp.as_deref(), Some("2025-01-01T00:00:00Z"));
        assert_eq!(processed.metadata.pii_detected, vec![PiiKind::Email]);
        assert_eq!(processed.metadata.model_used, "unknown");
    }

    #[test]
    fn pid_records_use_the_pid_prompt() {
        let record = json!({"prompt": "Tank feeding a pump", "bpmn_xml": "<x/>", "model_used": "m1"});
        let processed = process_record(&record, DiagramType::Pid).unwrap();
        assert!(processed.input.starts_with("System: You are a P&ID expert."));
        assert_eq!(processed.metadata.model_used, "m1");
        assert_eq!(processed.metadata.diagram_type, DiagramType::Pid);
    }

    #[test]
    fn empty_prompt_falls_back_then_rejects() {
        let fallback = json!({"prompt": "", "user_prompt": "hi", "bpmn_xml": "<x/>"});
        assert!(process_record(&fallback, DiagramType::Bpmn).is_some());

        let missing_xml = json!({"prompt": "hi", "bpmn_xml": ""});
        assert!(process_record(&missing_xml, DiagramType::Bpmn).is_none());
        assert!(process_record(&json!({}), DiagramType::Bpmn).is_none());
    }

    #[test]
    fn status_filter() {
        assert!(is_completed(&json!({"status": "completed"})));
        assert!(is_completed(&json!({})));
        assert!(!is_completed(&json!({"status": "pending"})));
    }

    #[test]
    fn diagram_type_parses_case_insensitively() {
        assert_eq!("PID".parse::<DiagramType>().unwrap(), DiagramType::Pid);
        assert!("svg".parse::<DiagramType>().is_err());
        assert_eq!(DiagramType::Bpmn.to_string(), "bpmn");
    }
}
