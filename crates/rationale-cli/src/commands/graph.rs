//! Graph command implementation.

use crate::backend::{load_index, Service};
use crate::cli::GraphArgs;
use crate::commands::Interrupt;
use crate::error::Result;
use crate::output::Formatter;
use rationale_graph::GraphRequest;

/// Execute the graph command.
pub async fn execute_graph(args: GraphArgs, service: &Service, formatter: &Formatter) -> Result<()> {
    let mut request = GraphRequest::all();
    if let Some(topic) = args.topic {
        request = request.topic(topic);
    }
    if args.cluster {
        load_index(service).await?;
        request = request.clustered();
    }

    let interrupt = Interrupt::listen();
    let build = service.build_graph(&request, interrupt.token()).await?;

    println!("{}", formatter.format_graph(&build.payload)?);
    if let Some(report) = build.report.filter(|r| r.is_partial()) {
        eprintln!(
            "{}",
            formatter.warning(&format!(
                "Similarity edges are partial ({} of {} anchors failed{})",
                report.anchors_failed,
                report.anchors_sampled,
                if report.cancelled { ", run cancelled" } else { "" }
            ))
        );
    }
    Ok(())
}
