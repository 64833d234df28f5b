//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use colored::*;
use rationale_domain::{Decision, DecisionId, Edge, Outcome, SimilarityEdge};
use rationale_graph::{
    topic_color, ClusterReport, GraphPayload, OutcomeColor, OutcomeUpdate, SimilarResponse,
};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const MAX_TEXT_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a list of decisions.
    pub fn format_decisions(&self, decisions: &[&Decision]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(decisions)?),
            OutputFormat::Table => Ok(self.decision_table(decisions)),
            OutputFormat::Quiet => Ok(quiet_ids(decisions.iter().map(|d| &d.id))),
        }
    }

    /// Format a single decision.
    pub fn format_decision(&self, decision: &Decision) -> Result<String> {
        self.format_decisions(&[decision])
    }

    /// Format an assembled graph.
    pub fn format_graph(&self, payload: &GraphPayload) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(payload)?),
            OutputFormat::Quiet => Ok(quiet_ids(payload.nodes.iter().map(|d| &d.id))),
            OutputFormat::Table => {
                let nodes: Vec<&Decision> = payload.nodes.iter().collect();
                let mut sections = vec![self.decision_table(&nodes)];
                if !payload.edges.is_empty() {
                    sections.push(self.edge_table(&payload.edges));
                }
                if !payload.similarity_edges.is_empty() {
                    sections.push(self.similarity_table(&payload.similarity_edges));
                }
                sections.push(self.info(&format!(
                    "{} decision(s), {} edge(s), {} similarity edge(s); topics: {}",
                    payload.meta.total_nodes,
                    payload.meta.total_edges,
                    payload.meta.similarity_edges,
                    if payload.meta.topics.is_empty() {
                        "-".to_string()
                    } else {
                        payload.meta.topics.join(", ")
                    }
                )));
                Ok(sections.join("\n"))
            }
        }
    }

    /// Format the neighbors of one decision.
    pub fn format_similar(&self, response: &SimilarResponse) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
            OutputFormat::Quiet => Ok(quiet_ids(response.similar.iter().map(|s| &s.id))),
            OutputFormat::Table => {
                if response.similar.is_empty() {
                    return Ok(self.colorize("No similar decisions found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Topic", "Decision", "Similarity", "Outcome"]);
                for node in &response.similar {
                    builder.push_record([
                        node.id.to_string(),
                        node.topic.clone(),
                        truncate(&node.decision, MAX_TEXT_WIDTH),
                        format!("{:.3}", node.similarity),
                        self.outcome_label(node.outcome),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format the decisions reachable from `root`.
    pub fn format_neighborhood(
        &self,
        root: &DecisionId,
        depth: usize,
        decisions: &[&Decision],
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "root": root,
                    "depth": depth,
                    "nodes": decisions,
                    "count": decisions.len(),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(quiet_ids(decisions.iter().map(|d| &d.id))),
            OutputFormat::Table => Ok(format!(
                "{}\n{}",
                self.decision_table(decisions),
                self.info(&format!(
                    "{} decision(s) within {} hop(s) of {}",
                    decisions.len(),
                    depth,
                    root
                ))
            )),
        }
    }

    /// Format text search matches, marking the one under the cursor.
    pub fn format_search(
        &self,
        query: &str,
        matches: &[&Decision],
        current: Option<&DecisionId>,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "query": query,
                    "matches": matches,
                    "count": matches.len(),
                    "current": current,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(quiet_ids(matches.iter().map(|d| &d.id))),
            OutputFormat::Table => {
                if matches.is_empty() {
                    return Ok(self.colorize(&format!("No matches for '{}'.", query), "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["", "ID", "Topic", "Decision"]);
                for decision in matches {
                    let marker = if current == Some(&decision.id) { ">" } else { "" };
                    builder.push_record([
                        marker.to_string(),
                        decision.id.to_string(),
                        self.topic_label(&decision.topic),
                        truncate(&decision.decision, MAX_TEXT_WIDTH),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format a clustering report.
    pub fn format_cluster_report(&self, report: &ClusterReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "edges": report.edges,
                    "anchors_sampled": report.anchors_sampled,
                    "anchors_processed": report.anchors_processed,
                    "anchors_failed": report.anchors_failed,
                    "neighbors_discarded": report.neighbors_discarded,
                    "duplicates_skipped": report.duplicates_skipped,
                    "cancelled": report.cancelled,
                    "elapsed_ms": report.elapsed.as_millis() as u64,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(report.edge_count().to_string()),
            OutputFormat::Table => {
                let mut sections = Vec::new();
                if !report.edges.is_empty() {
                    sections.push(self.similarity_table(&report.edges));
                }
                let summary = report.summary();
                sections.push(if report.is_partial() {
                    self.colorize(&summary, "yellow")
                } else {
                    summary
                });
                Ok(sections.join("\n"))
            }
        }
    }

    /// Format an applied outcome change.
    pub fn outcome_changed(&self, update: &OutcomeUpdate) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "id": update.id,
                "outcome": update.outcome,
                "reason": update.reason,
            }))?),
            OutputFormat::Quiet => Ok(update.id.to_string()),
            OutputFormat::Table => Ok(self.success(&format!(
                "Outcome of {} set to {}",
                update.id,
                self.outcome_label(Some(update.outcome))
            ))),
        }
    }

    /// Format a recorded decision.
    pub fn decision_recorded(&self, decision: &Decision) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.success(&format!("Decision recorded: {}", decision.id))),
            _ => self.format_decision(decision),
        }
    }

    /// Format an added edge.
    pub fn edge_added(&self, edge: &Edge) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(edge)?),
            OutputFormat::Quiet => Ok(String::new()),
            OutputFormat::Table => Ok(self.success(&format!(
                "Linked {} -[{}]-> {}",
                edge.from, edge.relationship, edge.to
            ))),
        }
    }

    /// Format a command failure for the selected format.
    pub fn failure(&self, err: &CliError) -> String {
        match self.format {
            OutputFormat::Json => serde_json::json!({
                "error": err.code(),
                "message": err.to_string(),
            })
            .to_string(),
            _ => self.error(&err.to_string()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn decision_table(&self, decisions: &[&Decision]) -> String {
        if decisions.is_empty() {
            return self.colorize("No decisions found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Topic", "Decision", "Outcome", "Confidence"]);
        for decision in decisions {
            builder.push_record([
                decision.id.to_string(),
                self.topic_label(&decision.topic),
                truncate(&decision.decision, MAX_TEXT_WIDTH),
                self.outcome_label(decision.outcome),
                decision
                    .confidence
                    .map(|c| format!("{:.2}", c.value()))
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }
        render(builder)
    }

    fn edge_table(&self, edges: &[Edge]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["From", "Relationship", "To", "Reason"]);
        for edge in edges {
            builder.push_record([
                edge.from.to_string(),
                edge.relationship.to_string(),
                edge.to.to_string(),
                edge.reason.clone().unwrap_or_default(),
            ]);
        }
        render(builder)
    }

    fn similarity_table(&self, edges: &[SimilarityEdge]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["From", "To", "Similarity"]);
        for edge in edges {
            builder.push_record([
                edge.from.to_string(),
                edge.to.to_string(),
                format!("{:.3}", edge.similarity),
            ]);
        }
        render(builder)
    }

    fn outcome_label(&self, outcome: Option<Outcome>) -> String {
        let label = outcome.map(|o| o.as_str()).unwrap_or("-");
        let color = match OutcomeColor::for_outcome(outcome) {
            OutcomeColor::Success => "green",
            OutcomeColor::Failure => "red",
            OutcomeColor::Warning => "yellow",
            OutcomeColor::Neutral => "",
        };
        self.colorize(label, color)
    }

    fn topic_label(&self, topic: &str) -> String {
        if !self.color_enabled {
            return topic.to_string();
        }
        match parse_hex(topic_color(topic)) {
            Some((r, g, b)) => topic.truecolor(r, g, b).to_string(),
            None => topic.to_string(),
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn quiet_ids<'a>(ids: impl Iterator<Item = &'a DecisionId>) -> String {
    ids.map(DecisionId::as_str).collect::<Vec<_>>().join("\n")
}

/// Shorten `text` to at most `max` characters, marking the cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Parse `#rrggbb`.
fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rationale_domain::{Confidence, Relationship};
    use rationale_graph::{GraphAssembler, SimilarNode};

    fn decisions() -> Vec<Decision> {
        vec![
            Decision::new("d2", "infra", "Add a read replica", "load", 2)
                .with_outcome(Outcome::Success)
                .with_confidence(Confidence::new(0.9).unwrap()),
            Decision::new("d1", "infra", "Use Postgres", "team knows it", 1),
        ]
    }

    fn payload() -> GraphPayload {
        GraphAssembler::default().assemble(
            decisions(),
            vec![Edge::new("d2", "d1", Relationship::BuildsOn)],
            None,
            vec![SimilarityEdge::new("d1".into(), "d2".into(), 0.82)],
        )
    }

    #[test]
    fn test_json_graph_uses_wire_names() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_graph(&payload()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["meta"]["total_nodes"], 2);
        assert_eq!(value["meta"]["similarity_edges"], 1);
        assert_eq!(value["nodes"][0]["outcome"], "SUCCESS");
        assert_eq!(value["edges"][0]["relationship"], "builds_on");
    }

    #[test]
    fn test_table_graph_sections() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_graph(&payload()).unwrap();
        assert!(output.contains("Topic"));
        assert!(output.contains("builds_on"));
        assert!(output.contains("0.820"));
        assert!(output.contains("2 decision(s), 1 edge(s), 1 similarity edge(s); topics: infra"));
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let decisions = decisions();
        let refs: Vec<&Decision> = decisions.iter().collect();
        assert_eq!(formatter.format_decisions(&refs).unwrap(), "d2\nd1");
    }

    #[test]
    fn test_empty_results() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert!(formatter
            .format_decisions(&[])
            .unwrap()
            .contains("No decisions found"));

        let response = SimilarResponse {
            id: "d1".into(),
            similar: vec![],
            count: 0,
        };
        assert!(formatter
            .format_similar(&response)
            .unwrap()
            .contains("No similar decisions found"));
    }

    #[test]
    fn test_similar_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let response = SimilarResponse {
            id: "d1".into(),
            similar: vec![SimilarNode {
                id: "d2".into(),
                topic: "infra".to_string(),
                decision: "Add a read replica".to_string(),
                similarity: 0.8123,
                outcome: Some(Outcome::Failed),
            }],
            count: 1,
        };
        let output = formatter.format_similar(&response).unwrap();
        assert!(output.contains("0.812"));
        assert!(output.contains("FAILED"));
    }

    #[test]
    fn test_search_marks_current_match() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let decisions = decisions();
        let refs: Vec<&Decision> = decisions.iter().collect();
        let output = formatter
            .format_search("infra", &refs, Some(&DecisionId::new("d1")))
            .unwrap();
        let marked = output.lines().find(|l| l.contains('>')).unwrap();
        assert!(marked.contains("d1"));
    }

    #[test]
    fn test_failure_json_carries_code() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.failure(&CliError::InvalidInput("bad".to_string()));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["error"], "invalid_input");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.topic_label("infra"), "infra");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ff8000"), Some((255, 128, 0)));
        assert_eq!(parse_hex("ff8000"), None);
        assert_eq!(parse_hex("#fff"), None);
    }
}
