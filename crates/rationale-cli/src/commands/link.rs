//! Link command implementation.

use crate::backend::Service;
use crate::cli::LinkArgs;
use crate::error::Result;
use crate::output::Formatter;
use rationale_domain::{Edge, Relationship};

/// Execute the link command.
pub async fn execute_link(args: LinkArgs, service: &Service, formatter: &Formatter) -> Result<()> {
    let mut edge = Edge::new(
        args.from.trim(),
        args.to.trim(),
        Relationship::parse(&args.relationship),
    );
    if let Some(reason) = args.reason.filter(|r| !r.trim().is_empty()) {
        edge = edge.with_reason(reason);
    }

    service.link(edge.clone()).await?;
    println!("{}", formatter.edge_added(&edge)?);
    Ok(())
}
