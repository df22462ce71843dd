use crate::reader::Record;
use crate::tower::{Departure, Policy};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tabled::settings::Style;

mod heap;
mod reader;
mod request;
mod time;
mod tower;

#[derive(Parser)]
struct Args {
    /// Path to the takeoff request file
    #[arg(value_name = "FILE")]
    requests: PathBuf,

    /// Prioritization policy: 1 (arrival), 2 (fullest) or 3 (clocked);
    /// omit to open the interactive tower console
    #[arg(value_name = "POLICY")]
    policy: Option<Policy>,

    /// Also write the departure log as JSON
    #[arg(short, long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let spawned = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    // No pager at all: dump straight to stdout
    let Ok(mut pager) = spawned else {
        println!("{}", content);
        return;
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

/// One stdout line per departure; the shape depends on the active policy.
fn render(policy: Policy, departure: &Departure) -> String {
    match (policy, departure.released_at) {
        (Policy::Fullest, _) => format!("{} {}", departure.name, departure.passengers),
        (Policy::Clocked, Some(released_at)) => {
            format!("{} departed at {}", departure.name, released_at)
        }
        _ => departure.name.to_string(),
    }
}

fn write_report(path: &Path, departures: &[Departure]) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(departures)?;
    std::fs::write(path, json)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(policy) = args.policy {
        let departures = tower::run(&args.requests, policy)?;
        for departure in &departures {
            println!("{}", render(policy, departure));
        }
        if let Some(report) = &args.report {
            write_report(report, &departures)?;
        }
        return Ok(());
    }

    console(&args.requests)
}

fn console(requests: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{}",
        format!("Tower online. Requests loaded from {}", requests.display()).green()
    );

    let mut records: Vec<Record> = match reader::read_records(requests) {
        Ok(records) => records,
        Err(e) => {
            println!("{}", format!("Could not read {}: {}", requests.display(), e).red());
            Vec::new()
        }
    };
    let mut last_run: Option<(Policy, Vec<Departure>)> = None;

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "ls".to_string(),
            "run".to_string(),
            "save".to_string(),
            "reload".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => {
                        if records.is_empty() {
                            println!("No requests loaded.");
                        } else {
                            let mut table = tabled::Table::new(&records);
                            table.with(Style::rounded());
                            table.with(tabled::settings::Alignment::left());
                            if records.len() > 20 {
                                paginate(table.to_string());
                            } else {
                                println!("{}", table);
                            }
                        }
                    },
                    "run" => {
                        let Some(selector) = parts.get(1) else {
                            println!("Usage: run <1|2|3>");
                            continue;
                        };
                        match selector.parse::<Policy>() {
                            Ok(policy) => match tower::run(requests, policy) {
                                Ok(departures) => {
                                    for departure in &departures {
                                        println!("{}", render(policy, departure));
                                    }
                                    println!(
                                        "{}",
                                        format!("{} flights released under the {} policy.", departures.len(), policy).green()
                                    );
                                    last_run = Some((policy, departures));
                                },
                                Err(e) => println!("{}", e.to_string().red()),
                            },
                            Err(e) => println!("{}", e.red()),
                        }
                    },
                    "save" => {
                        let Some(target) = parts.get(1) else {
                            println!("Usage: save <file>");
                            continue;
                        };
                        match &last_run {
                            Some((policy, departures)) => match write_report(Path::new(target), departures) {
                                Ok(()) => println!("Saved the {} departure log to {}.", policy, target),
                                Err(e) => println!("{}", e.to_string().red()),
                            },
                            None => println!("Nothing to save yet; use 'run' first."),
                        }
                    },
                    "reload" => {
                        match reader::read_records(requests) {
                            Ok(reloaded) => {
                                println!("Reloaded {} requests.", reloaded.len());
                                records = reloaded;
                            },
                            Err(e) => println!("{}", e.to_string().red()),
                        }
                    },
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls              - List the loaded takeoff requests in a table");
                        println!("  run <1|2|3>     - Release flights under a policy: 1 - arrival, 2 - fullest, 3 - clocked");
                        println!("  save <file>     - Write the last run's departure log as JSON");
                        println!("  reload          - Re-read the request file");
                        println!("  help / ?        - Show this help menu");
                        println!("  exit / quit     - Leave the console\n");
                    },
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
