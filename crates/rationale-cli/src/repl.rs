//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! The REPL keeps one [`GraphSession`] between commands so search cursors and
//! outcome edits survive until the next `reload`.

use crate::backend::{load_index, Service};
use crate::commands::neighborhood::render_neighborhood;
use crate::commands::search::render_matches;
use crate::commands::Interrupt;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rationale_domain::DecisionId;
use rationale_graph::{GraphRequest, GraphSession};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing::debug;

/// REPL state between commands.
struct Repl<'a> {
    service: &'a Service,
    formatter: &'a Formatter,
    session: Option<GraphSession>,
    indexed: bool,
}

/// Run the interactive REPL.
pub async fn run_repl(service: &Service, config: &Config, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("Rationale REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    // Initialize readline editor
    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut repl = Repl {
        service,
        formatter,
        session: None,
        indexed: false,
    };
    if let Err(e) = repl.reload(None, false).await {
        eprintln!("{}", formatter.failure(&e));
    }

    loop {
        match editor.readline(&repl.prompt()) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) = repl.execute(cmd).await {
                            eprintln!("{}", formatter.failure(&e));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.failure(&e));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Exit,
    Help,
    Reload { topic: Option<String>, cluster: bool },
    Graph,
    Search(String),
    Next,
    Prev,
    Focus { id: String, depth: Option<usize> },
    Similar(String),
    Outcome { id: String, outcome: String, reason: Option<String> },
}

impl Repl<'_> {
    fn prompt(&self) -> String {
        match &self.session {
            Some(session) => match session.search_index().position() {
                Some((index, total)) => format!("rationale [{}/{}]> ", index + 1, total),
                None => "rationale> ".to_string(),
            },
            None => "rationale (no graph)> ".to_string(),
        }
    }

    fn session(&self) -> Result<&GraphSession> {
        self.session.as_ref().ok_or(CliError::NoGraph)
    }

    async fn ensure_index(&mut self) -> Result<()> {
        if !self.indexed {
            load_index(self.service).await?;
            self.indexed = true;
        }
        Ok(())
    }

    async fn reload(&mut self, topic: Option<String>, cluster: bool) -> Result<()> {
        let request = GraphRequest {
            topic,
            include_cluster: cluster,
        };
        if cluster {
            self.ensure_index().await?;
        }

        let interrupt = Interrupt::listen();
        let build = self.service.build_graph(&request, interrupt.token()).await?;
        let meta = &build.payload.meta;
        println!(
            "{}",
            self.formatter.info(&format!(
                "Loaded {} decision(s), {} edge(s), {} similarity edge(s)",
                meta.total_nodes, meta.total_edges, meta.similarity_edges
            ))
        );
        if let Some(report) = build.report.as_ref().filter(|r| r.is_partial()) {
            println!("{}", self.formatter.warning(&report.summary()));
        }

        self.session = Some(
            GraphSession::new(build.payload)
                .with_default_depth(self.service.config().default_depth),
        );
        Ok(())
    }

    fn step(&mut self, forward: bool) -> Result<()> {
        let session = self.session.as_mut().ok_or(CliError::NoGraph)?;
        let current = if forward {
            session.next_match()
        } else {
            session.previous_match()
        };
        match current {
            Some(decision) => println!("{}", self.formatter.format_decision(decision)?),
            None => println!("{}", self.formatter.warning("No active search")),
        }
        Ok(())
    }

    async fn execute(&mut self, cmd: ReplCommand) -> Result<()> {
        debug!(?cmd, "repl command");
        match cmd {
            ReplCommand::Exit | ReplCommand::Help => {}
            ReplCommand::Reload { topic, cluster } => self.reload(topic, cluster).await?,
            ReplCommand::Graph => {
                let session = self.session()?;
                println!("{}", self.formatter.format_graph(session.payload())?);
            }
            ReplCommand::Search(query) => {
                let session = self.session.as_mut().ok_or(CliError::NoGraph)?;
                session.search(&query);
                println!("{}", render_matches(session, self.formatter)?);
            }
            ReplCommand::Next => self.step(true)?,
            ReplCommand::Prev => self.step(false)?,
            ReplCommand::Focus { id, depth } => {
                let session = self.session()?;
                let depth = depth.unwrap_or(self.service.config().default_depth);
                println!("{}", render_neighborhood(session, &id, depth, self.formatter)?);

                let highlight = session.highlight(&DecisionId::new(id.trim()), depth);
                let payload = session.payload();
                println!(
                    "{}",
                    self.formatter.info(&format!(
                        "{} edge(s) and {} similarity edge(s) highlighted",
                        highlight.edges(&payload.edges).count(),
                        highlight.similarity_edges(&payload.similarity_edges).count()
                    ))
                );
            }
            ReplCommand::Similar(id) => {
                self.ensure_index().await?;
                let response = self.service.get_similar_to(&id).await?;
                println!("{}", self.formatter.format_similar(&response)?);
            }
            ReplCommand::Outcome {
                id,
                outcome,
                reason,
            } => {
                let update = match self.session.as_mut() {
                    Some(session) => {
                        self.service
                            .set_outcome_in(session, &id, &outcome, reason.as_deref())
                            .await?
                    }
                    None => {
                        self.service
                            .set_outcome(&id, &outcome, reason.as_deref())
                            .await?
                    }
                };
                println!("{}", self.formatter.outcome_changed(&update)?);
            }
        }
        Ok(())
    }
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match parts[0] {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "reload" => parse_reload_command(&parts[1..]),
        "graph" => Ok(ReplCommand::Graph),
        "search" | "/" => {
            if parts.len() < 2 {
                return Err(CliError::InvalidInput("Usage: search <text>".to_string()));
            }
            Ok(ReplCommand::Search(parts[1..].join(" ")))
        }
        "next" | "n" => Ok(ReplCommand::Next),
        "prev" | "p" => Ok(ReplCommand::Prev),
        "focus" => parse_focus_command(&parts[1..]),
        "similar" => match parts.get(1) {
            Some(id) => Ok(ReplCommand::Similar(id.to_string())),
            None => Err(CliError::InvalidInput("Usage: similar <id>".to_string())),
        },
        "outcome" => parse_outcome_command(&parts[1..]),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ))),
    }
}

fn parse_reload_command(args: &[&str]) -> Result<ReplCommand> {
    let mut topic = None;
    let mut cluster = false;
    for arg in args {
        match *arg {
            "--cluster" | "-c" => cluster = true,
            flag if flag.starts_with('-') => {
                return Err(CliError::InvalidInput(format!(
                    "Unknown flag: {}. Usage: reload [topic] [--cluster]",
                    flag
                )))
            }
            value => topic = Some(value.to_string()),
        }
    }
    Ok(ReplCommand::Reload { topic, cluster })
}

fn parse_focus_command(args: &[&str]) -> Result<ReplCommand> {
    let id = args
        .first()
        .ok_or_else(|| CliError::InvalidInput("Usage: focus <id> [depth]".to_string()))?;
    let depth = match args.get(1) {
        Some(raw) => Some(raw.parse().map_err(|_| {
            CliError::InvalidInput(format!("Depth must be a non-negative integer, got '{}'", raw))
        })?),
        None => None,
    };
    Ok(ReplCommand::Focus {
        id: id.to_string(),
        depth,
    })
}

fn parse_outcome_command(args: &[&str]) -> Result<ReplCommand> {
    if args.len() < 2 {
        return Err(CliError::InvalidInput(
            "Usage: outcome <id> <pending|success|failed|partial> [reason]".to_string(),
        ));
    }
    let reason = (args.len() > 2).then(|| args[2..].join(" "));
    Ok(ReplCommand::Outcome {
        id: args[0].to_string(),
        outcome: args[1].to_string(),
        reason,
    })
}

fn editor_error(err: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!(
        "Failed to initialize editor: {}",
        err
    )))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::home_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  reload [topic] [--cluster]     - Rebuild the graph, optionally with similarity edges");
    println!("  graph                          - Show the loaded graph");
    println!("  search <text>                  - Find decisions containing text");
    println!("  next, n                        - Move to the next search match");
    println!("  prev, p                        - Move to the previous search match");
    println!("  focus <id> [depth]             - Show decisions reachable from <id>");
    println!("  similar <id>                   - Find decisions similar to <id>");
    println!("  outcome <id> <value> [reason]  - Set an outcome (pending|success|failed|partial)");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}
