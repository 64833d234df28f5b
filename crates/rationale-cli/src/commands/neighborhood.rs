//! Neighborhood command implementation.

use crate::backend::Service;
use crate::cli::NeighborhoodArgs;
use crate::error::Result;
use crate::output::Formatter;
use rationale_domain::Decision;
use rationale_graph::{require_node_id, GraphError, GraphRequest, GraphSession};

/// Execute the neighborhood command.
pub async fn execute_neighborhood(
    args: NeighborhoodArgs,
    service: &Service,
    formatter: &Formatter,
) -> Result<()> {
    let session = service.open_session(&GraphRequest::all()).await?;
    let depth = args.depth.unwrap_or(service.config().default_depth);
    println!("{}", render_neighborhood(&session, &args.id, depth, formatter)?);
    Ok(())
}

/// Render the decisions within `depth` hops of `node_id`, newest first.
pub fn render_neighborhood(
    session: &GraphSession,
    node_id: &str,
    depth: usize,
    formatter: &Formatter,
) -> Result<String> {
    let root = require_node_id(node_id)?;
    if session.node(&root).is_none() {
        return Err(GraphError::NotFound(root).into());
    }

    let reachable = session.reachable(&root, depth);
    let nodes: Vec<&Decision> = session
        .payload()
        .nodes
        .iter()
        .filter(|d| reachable.contains(&d.id))
        .collect();

    formatter.format_neighborhood(&root, depth, &nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use rationale_domain::{Edge, Relationship};
    use rationale_graph::GraphAssembler;

    fn session() -> GraphSession {
        let decisions = vec![
            Decision::new("c", "ops", "Page on replica lag", "", 3),
            Decision::new("b", "infra", "Add read replica", "", 2),
            Decision::new("a", "infra", "Use Postgres", "", 1),
        ];
        let edges = vec![
            Edge::new("b", "a", Relationship::BuildsOn),
            Edge::new("c", "b", Relationship::BuildsOn),
        ];
        GraphSession::new(GraphAssembler::default().assemble(decisions, edges, None, vec![]))
    }

    #[test]
    fn test_render_neighborhood_depth() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let session = session();
        assert_eq!(render_neighborhood(&session, "a", 1, &formatter).unwrap(), "b\na");
        assert_eq!(render_neighborhood(&session, "a", 2, &formatter).unwrap(), "c\nb\na");
        assert_eq!(render_neighborhood(&session, "a", 0, &formatter).unwrap(), "a");
    }

    #[test]
    fn test_render_neighborhood_errors() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let session = session();

        let err = render_neighborhood(&session, " ", 1, &formatter).unwrap_err();
        assert_eq!(err.code(), "missing_node_id");

        let err = render_neighborhood(&session, "zzz", 1, &formatter).unwrap_err();
        assert!(matches!(err, CliError::Graph(GraphError::NotFound(_))));
    }
}
