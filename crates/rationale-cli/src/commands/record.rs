//! Record command implementation.

use crate::backend::Service;
use crate::cli::RecordArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rationale_domain::{Confidence, Decision, NewDecision};

/// Execute the record command.
pub async fn execute_record(
    args: RecordArgs,
    service: &Service,
    formatter: &Formatter,
) -> Result<Decision> {
    let new = build_decision(args)?;
    let decision = service.record_decision(new).await?;
    println!("{}", formatter.decision_recorded(&decision)?);
    Ok(decision)
}

fn build_decision(args: RecordArgs) -> Result<NewDecision> {
    let mut new = NewDecision::new(args.topic.trim(), args.decision.trim(), args.reasoning);
    if let Some(value) = args.confidence {
        new.confidence = Some(Confidence::new(value).map_err(CliError::InvalidInput)?);
    }
    Ok(new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(confidence: Option<f64>) -> RecordArgs {
        RecordArgs {
            topic: " infra ".to_string(),
            decision: "Use Postgres".to_string(),
            reasoning: "team knows it".to_string(),
            confidence,
        }
    }

    #[test]
    fn test_build_decision_trims_and_sets_confidence() {
        let new = build_decision(args(Some(0.75))).unwrap();
        assert_eq!(new.topic, "infra");
        assert_eq!(new.confidence.map(|c| c.value()), Some(0.75));
    }

    #[test]
    fn test_build_decision_rejects_bad_confidence() {
        let err = build_decision(args(Some(1.5))).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }
}
