//! `ytag` — expand a `!Tag` vocabulary in a YAML file against a variable
//! environment, emitting plain YAML, JSON, or a debug-style rendering.
//!
//! Usage:
//!   ytag process <file>... [--var-file/-f FILE]... [--output/-o FILE]
//!                [--output-format json|yaml|pprint] [--include-env/-e]
//!                [--define/-D KEY=VALUE]...
//!
//! Mirrors `examples/original_source/cmd/emrichen/main.go`'s flag surface.

use serde_json::Map;
use std::process::ExitCode;
use ytag::config::{apply_define, include_env, load_var_file};
use ytag::environment::Environment;
use ytag::node::node_to_value;
use ytag::yaml_io::{process_stream, render_stream};
use ytag::Interpreter;

struct Args {
    command: String,
    inputs: Vec<String>,
    var_files: Vec<String>,
    output: Option<String>,
    output_format: String,
    include_env: bool,
    defines: Vec<String>,
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let command = raw.get(1).cloned().unwrap_or_default();
    let mut inputs = Vec::new();
    let mut var_files = Vec::new();
    let mut output = None;
    let mut output_format = "yaml".to_string();
    let mut include_env = false;
    let mut defines = Vec::new();

    let mut i = 2;
    while i < raw.len() {
        match raw[i].as_str() {
            "--var-file" | "-f" => {
                i += 1;
                let value = raw.get(i).ok_or("--var-file requires an argument")?;
                var_files.push(value.clone());
            }
            "--output" | "-o" => {
                i += 1;
                let value = raw.get(i).ok_or("--output requires an argument")?;
                output = Some(value.clone());
            }
            "--output-format" => {
                i += 1;
                let value = raw.get(i).ok_or("--output-format requires an argument")?;
                output_format = value.clone();
            }
            "--include-env" | "-e" => {
                include_env = true;
            }
            "--define" | "-D" => {
                i += 1;
                let value = raw.get(i).ok_or("--define requires an argument")?;
                defines.push(value.clone());
            }
            other => inputs.push(other.to_string()),
        }
        i += 1;
    }

    Ok(Args { command, inputs, var_files, output, output_format, include_env, defines })
}

fn run(args: &Args) -> Result<String, String> {
    if args.command != "process" {
        return Err(format!("unknown command '{}', expected 'process'", args.command));
    }
    if args.inputs.is_empty() {
        return Err("process requires at least one input file".to_string());
    }
    if !matches!(args.output_format.as_str(), "json" | "yaml" | "pprint") {
        return Err(format!("unsupported --output-format '{}'", args.output_format));
    }

    let mut bottom = Map::new();
    for path in &args.var_files {
        load_var_file(&mut bottom, path).map_err(|e| e.to_string())?;
    }
    if args.include_env {
        include_env(&mut bottom);
    }
    for define in &args.defines {
        apply_define(&mut bottom, define).map_err(|e| e.to_string())?;
    }

    let mut interp = Interpreter::new(Environment::new(bottom));
    let mut documents = Vec::new();
    for path in &args.inputs {
        let source = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
        let evaluated = process_stream(&mut interp, &source).map_err(|e| format!("{path}: {e}"))?;
        documents.extend(evaluated);
    }

    Ok(match args.output_format.as_str() {
        "json" => {
            let values: Vec<_> = documents.iter().map(node_to_value).collect();
            if values.len() == 1 {
                serde_json::to_string_pretty(&values[0]).map_err(|e| e.to_string())?
            } else {
                serde_json::to_string_pretty(&values).map_err(|e| e.to_string())?
            }
        }
        "pprint" => documents.iter().map(node_to_value).map(|v| format!("{v:#?}")).collect::<Vec<_>>().join("\n"),
        _ => render_stream(&documents),
    })
}

fn main() -> ExitCode {
    let raw: Vec<String> = std::env::args().collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("ytag: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(rendered) => {
            match &args.output {
                Some(path) => {
                    if let Err(e) = std::fs::write(path, rendered) {
                        eprintln!("ytag: {path}: {e}");
                        return ExitCode::FAILURE;
                    }
                }
                None => print!("{rendered}"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ytag: {e}");
            ExitCode::FAILURE
        }
    }
}
