//! Similar command implementation.

use crate::backend::{load_index, Service};
use crate::cli::SimilarArgs;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the similar command.
pub async fn execute_similar(
    args: SimilarArgs,
    service: &Service,
    formatter: &Formatter,
) -> Result<()> {
    load_index(service).await?;
    let response = service.get_similar_to(&args.id).await?;
    println!("{}", formatter.format_similar(&response)?);
    Ok(())
}
