use std::io::{self, Write};
use ragstore::pipeline::DefaultPipeline;

#[derive(Debug, PartialEq)]
pub enum Command {
    Add { payload: String, vec: Vec<f64> },
    Search { vec: Vec<f64>, top_k: usize },
    Doc { text: String },
    Ingest { path: String },
    Ask { question: String, top_k: usize },
    Count,
}

/// Parse a REPL line already split into words
/// args[0] is the program name, args[1] the command
pub fn parse_command_from_args(args: &[String], default_top_k: usize) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("No command provided. Use: add, search, doc, ingest, ask, count".to_string());
    }

    let command = &args[1];

    match command.as_str() {
        "add" => parse_add(args),
        "search" => parse_search(args, default_top_k),
        "doc" => parse_doc(args),
        "ingest" => parse_ingest(args),
        "ask" => parse_ask(args, default_top_k),
        "count" => parse_count(args),
        _ => Err(format!("Unknown command: {}. Available: add, search, doc, ingest, ask, count", command)),
    }
}

/// Parse the 'add' command
/// Usage: add <payload> <v1> <v2> ...
fn parse_add(args: &[String]) -> Result<Command, String> {
    if args.len() < 4 {
        return Err("'add' command requires a payload and a vector. Usage: add <payload> <v1> <v2> ...".to_string());
    }

    let payload = args[2].clone();
    let vec = parse_vector(&args[3..])?;

    Ok(Command::Add { payload, vec })
}

/// Parse the 'search' command
/// Usage: search <v1> <v2> ... [--top_k <number>]
fn parse_search(args: &[String], default_top_k: usize) -> Result<Command, String> {
    let (rest, top_k) = split_top_k(&args[2..], default_top_k)?;

    if rest.is_empty() {
        return Err("'search' command requires at least one vector component. Usage: search <v1> <v2> ... [--top_k <number>]".to_string());
    }

    let vec = parse_vector(rest)?;
    Ok(Command::Search { vec, top_k })
}

/// Parse the 'doc' command
/// Usage: doc <text ...>
fn parse_doc(args: &[String]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("'doc' command requires some text. Usage: doc <text>".to_string());
    }

    Ok(Command::Doc { text: args[2..].join(" ") })
}

/// Parse the 'ingest' command
/// Usage: ingest <path>
fn parse_ingest(args: &[String]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("'ingest' command requires a file path. Usage: ingest <path>".to_string());
    }

    Ok(Command::Ingest { path: args[2].clone() })
}

/// Parse the 'ask' command
/// Usage: ask <question ...> [--top_k <number>]
fn parse_ask(args: &[String], default_top_k: usize) -> Result<Command, String> {
    let (rest, top_k) = split_top_k(&args[2..], default_top_k)?;

    if rest.is_empty() {
        return Err("'ask' command requires a question. Usage: ask <question> [--top_k <number>]".to_string());
    }

    Ok(Command::Ask { question: rest.join(" "), top_k })
}

/// Parse the 'count' command
/// Usage: count
fn parse_count(args: &[String]) -> Result<Command, String> {
    if args.len() > 2 {
        eprintln!("Warning: 'count' command takes no arguments, ignoring extras");
    }

    Ok(Command::Count)
}

/// Strips a trailing `--top_k <number>` pair
fn split_top_k(args: &[String], default_top_k: usize) -> Result<(&[String], usize), String> {
    if args.len() >= 2 && args[args.len() - 2] == "--top_k" {
        let value = &args[args.len() - 1];
        return match value.parse::<usize>() {
            Ok(k) if k >= 1 => Ok((&args[..args.len() - 2], k)),
            _ => Err(format!("Invalid --top_k value: '{}'. Must be a positive integer.", value)),
        };
    }

    Ok((args, default_top_k))
}

fn parse_vector(args: &[String]) -> Result<Vec<f64>, String> {
    args.iter()
        .map(|s| s.parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|_| "Failed to parse vector components as numbers".to_string())
}

/// REPL mode - interactive session over one in-memory store
pub fn run_repl(pipeline: &DefaultPipeline, default_top_k: usize) -> io::Result<()> {
    println!("ragstore - Vector Store");
    println!("Type 'help' for commands, 'exit' or 'quit' to quit\n");

    loop {
        print!("ragstore> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input == "exit" || input == "quit" {
            println!("Goodbye!");
            break;
        }

        if input == "help" {
            print_help();
            continue;
        }

        let mut args: Vec<String> = vec!["ragstore".to_string()];
        args.extend(input.split_whitespace().map(|s| s.to_string()));

        match parse_command_from_args(&args, default_top_k) {
            Ok(command) => execute_command(pipeline, command),
            Err(error) => eprintln!("Error: {}", error),
        }
    }

    Ok(())
}

pub fn execute_command(pipeline: &DefaultPipeline, command: Command) {
    match command {
        Command::Add { payload, vec } => {
            match pipeline.store().add(vec, payload) {
                Ok(()) => println!("Added ({} records)", pipeline.store().len()),
                Err(error) => eprintln!("Error: {}", error),
            }
        }

        Command::Search { vec, top_k } => {
            match pipeline.store().search_scored_owned(&vec, top_k) {
                Ok(hits) => {
                    if hits.is_empty() {
                        println!("No results found");
                    } else {
                        println!("Top {} results:", hits.len());
                        for (rank, (payload, score)) in hits.iter().enumerate() {
                            println!("{}. Score: {:.4}, Payload: {}", rank + 1, score, payload);
                        }
                    }
                }
                Err(error) => eprintln!("Error: {}", error),
            }
        }

        Command::Doc { text } => {
            match pipeline.ingest([text]) {
                Ok(added) => println!("Added {} document(s)", added),
                Err(error) => eprintln!("Error: {}", error),
            }
        }

        Command::Ingest { path } => {
            match pipeline.ingest_file(&path) {
                Ok(added) => println!("Ingested {} document(s) from '{}'", added, path),
                Err(error) => eprintln!("Error: {}", error),
            }
        }

        Command::Ask { question, top_k } => {
            match pipeline.ask(&question, top_k) {
                Ok(answer) => {
                    for (rank, passage) in answer.context.passages().iter().enumerate() {
                        println!("{}. {}", rank + 1, passage);
                    }
                    println!("\nAnswer: {}", answer.text);
                }
                Err(error) => eprintln!("Error: {}", error),
            }
        }

        Command::Count => println!("{}", pipeline.store().len()),
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  add <payload> <v1> <v2> ...        - Add a raw vector with a one-word payload");
    println!("  search <v1> <v2> ... [--top_k N]   - Search with a raw query vector");
    println!("  doc <text ...>                     - Embed and add one document");
    println!("  ingest <path>                      - Embed and add every line of a file");
    println!("  ask <question ...> [--top_k N]     - Answer from the closest documents");
    println!("  count                              - Show record count");
    println!("  help                               - Show this help");
    println!("  exit, quit                         - Exit the program");
}

#[cfg(test)]
mod cli_test {
    use super::*;
    use ragstore::{ExtractiveSynthesizer, HashingEmbedder};

    fn args(line: &str) -> Vec<String> {
        std::iter::once("ragstore")
            .chain(line.split_whitespace())
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_parse_add() {
        let cmd = parse_command_from_args(&args("add docA 1 0.5"), 2).unwrap();
        assert_eq!(cmd, Command::Add { payload: "docA".to_string(), vec: vec![1.0, 0.5] });

        assert!(parse_command_from_args(&args("add docA"), 2).is_err());
        assert!(parse_command_from_args(&args("add docA 1 x"), 2).is_err());
    }

    #[test]
    fn test_parse_search_top_k() {
        let cmd = parse_command_from_args(&args("search 1 0"), 2).unwrap();
        assert_eq!(cmd, Command::Search { vec: vec![1.0, 0.0], top_k: 2 });

        let cmd = parse_command_from_args(&args("search 1 0 --top_k 5"), 2).unwrap();
        assert_eq!(cmd, Command::Search { vec: vec![1.0, 0.0], top_k: 5 });

        assert!(parse_command_from_args(&args("search 1 0 --top_k 0"), 2).is_err());
        assert!(parse_command_from_args(&args("search --top_k 3"), 2).is_err());
    }

    #[test]
    fn test_parse_ask_and_doc() {
        let cmd = parse_command_from_args(&args("ask where is it --top_k 1"), 2).unwrap();
        assert_eq!(cmd, Command::Ask { question: "where is it".to_string(), top_k: 1 });

        let cmd = parse_command_from_args(&args("doc some text here"), 2).unwrap();
        assert_eq!(cmd, Command::Doc { text: "some text here".to_string() });
    }

    #[test]
    fn test_parse_unknown_and_missing() {
        assert!(parse_command_from_args(&args(""), 2).is_err());
        assert!(parse_command_from_args(&args("delete x"), 2).is_err());
        assert_eq!(parse_command_from_args(&args("count"), 2).unwrap(), Command::Count);
    }

    #[test]
    fn test_execute_add_then_ask() {
        let pipeline = DefaultPipeline::new(HashingEmbedder::new(16).unwrap(), ExtractiveSynthesizer);

        execute_command(&pipeline, Command::Doc { text: "rust vector store".to_string() });
        execute_command(&pipeline, Command::Add { payload: "bad".to_string(), vec: vec![1.0] });
        assert_eq!(pipeline.store().len(), 1);

        let answer = pipeline.ask("vector store", 2).unwrap();
        assert_eq!(answer.context.passages(), &["rust vector store".to_string()]);
    }
}
