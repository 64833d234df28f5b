//! Outcome command implementation.

use crate::backend::Service;
use crate::cli::OutcomeArgs;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the outcome command.
pub async fn execute_outcome(
    args: OutcomeArgs,
    service: &Service,
    formatter: &Formatter,
) -> Result<()> {
    let update = service
        .set_outcome(&args.id, &args.outcome, args.reason.as_deref())
        .await?;
    println!("{}", formatter.outcome_changed(&update)?);
    Ok(())
}
