//! Search command implementation.

use crate::backend::Service;
use crate::cli::SearchArgs;
use crate::error::Result;
use crate::output::Formatter;
use rationale_domain::Decision;
use rationale_graph::{GraphRequest, GraphSession};

/// Execute the search command.
pub async fn execute_search(args: SearchArgs, service: &Service, formatter: &Formatter) -> Result<()> {
    let mut request = GraphRequest::all();
    if let Some(topic) = args.topic {
        request = request.topic(topic);
    }

    let mut session = service.open_session(&request).await?;
    session.search(&args.query);
    println!("{}", render_matches(&session, formatter)?);
    Ok(())
}

/// Render the session's current search matches with the cursor marked.
pub fn render_matches(session: &GraphSession, formatter: &Formatter) -> Result<String> {
    let search = session.search_index();
    let matches: Vec<&Decision> = search
        .matches()
        .iter()
        .filter_map(|id| session.node(id))
        .collect();
    formatter.format_search(search.query(), &matches, search.current())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use rationale_graph::GraphAssembler;

    #[test]
    fn test_render_matches_follows_cursor() {
        let decisions = vec![
            Decision::new("b", "infra", "Add read replica", "postgres load", 2),
            Decision::new("a", "infra", "Use Postgres", "", 1),
            Decision::new("c", "ui", "Adopt Tailwind", "", 0),
        ];
        let mut session =
            GraphSession::new(GraphAssembler::default().assemble(decisions, vec![], None, vec![]));

        let formatter = Formatter::new(OutputFormat::Json, false);
        assert_eq!(session.search("POSTGRES"), 2);
        session.next_match();

        let value: serde_json::Value =
            serde_json::from_str(&render_matches(&session, &formatter).unwrap()).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["current"], "a");
        assert_eq!(value["matches"][0]["id"], "b");
    }
}
