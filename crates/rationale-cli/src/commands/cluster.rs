//! Cluster command implementation.

use crate::backend::{load_index, Service};
use crate::commands::Interrupt;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the cluster command.
///
/// A preset from the command line is applied to the configuration before
/// the service is opened.
pub async fn execute_cluster(service: &Service, formatter: &Formatter) -> Result<()> {
    load_index(service).await?;

    let interrupt = Interrupt::listen();
    let report = service.cluster(interrupt.token()).await?;
    println!("{}", formatter.format_cluster_report(&report)?);
    Ok(())
}
