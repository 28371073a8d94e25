mod sources;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cangen_codegen::{CEmitter, CompiledSet, Compiler, Generator};
use cangen_schema::ByteOrder;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cangen")]
#[command(about = "Compile CAN message schemas into frame layouts and Rust/C code.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Worker threads used to compile messages (default: all cores).
    #[arg(long, global = true)]
    jobs: Option<usize>,
    /// Byte order of float32 payload bytes.
    #[arg(long, global = true, default_value = "little", value_parser = parse_byte_order)]
    float_order: ByteOrder,
    /// Log compiler progress to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate schemas and report every error.
    Check {
        /// Schema files or directories of `*.json` schemas.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print compiled layouts as JSON.
    Layout {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output file (default: stdout).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a Rust module.
    Rust {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output file (default: stdout).
        #[arg(long)]
        out: Option<PathBuf>,
        /// If set, fail if output differs; do not write.
        #[arg(long, default_value_t = false, requires = "out")]
        check: bool,
    },
    /// Generate a C header.
    C {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output file (default: stdout).
        #[arg(long)]
        out: Option<PathBuf>,
        /// If set, fail if output differs; do not write.
        #[arg(long, default_value_t = false, requires = "out")]
        check: bool,
        /// Include guard macro.
        #[arg(long, default_value = "CANGEN_MESSAGES_H")]
        guard: String,
    },
}

fn main() -> Result<()> {
    try_main().map_err(|err| {
        eprintln!("{err:#}");
        err
    })
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn parse_byte_order(s: &str) -> Result<ByteOrder, String> {
    ByteOrder::parse(s).ok_or_else(|| format!("unknown byte order {s:?} (expected 'little' or 'big')"))
}

fn run(cli: Cli) -> Result<()> {
    let mut builder = Compiler::builder().float_order(cli.float_order);
    if let Some(jobs) = cli.jobs {
        builder = builder.workers(jobs);
    }
    let compiler = builder.build();

    match cli.command {
        Command::Check { paths } => {
            let set = compile(&compiler, &paths)?;
            println!(
                "ok: {} message(s), {} identifier(s)",
                set.codecs.len(),
                set.identifiers.len()
            );
            Ok(())
        }
        Command::Layout { paths, out } => {
            let set = compile(&compiler, &paths)?;
            let dump = serde_json::json!({
                "messages": set.codecs,
                "identifiers": set.identifiers,
            });
            let mut text = serde_json::to_string_pretty(&dump).context("serialize layouts")?;
            text.push('\n');
            write_output(out.as_deref(), &text, false)
        }
        Command::Rust { paths, out, check } => {
            let set = compile(&compiler, &paths)?;
            let code = Generator::new(&set).generate_rust()?;
            write_output(out.as_deref(), &code, check)
        }
        Command::C {
            paths,
            out,
            check,
            guard,
        } => {
            let set = compile(&compiler, &paths)?;
            let header = CEmitter::new(&set).with_guard(guard).emit()?;
            write_output(out.as_deref(), &header, check)
        }
    }
}

/// Loads and compiles every schema, printing each error to stderr.
fn compile(compiler: &Compiler, paths: &[PathBuf]) -> Result<CompiledSet> {
    let sources = sources::load(paths)?;
    let report = compiler.compile_sources(
        sources
            .iter()
            .map(|source| (source.path.display().to_string(), source.text.as_str())),
    );

    match report.into_result() {
        Ok(set) => Ok(set),
        Err(errors) => {
            for error in &errors {
                eprintln!("error: {error}");
            }
            anyhow::bail!(
                "{} error(s) in {} schema file(s)",
                errors.len(),
                sources.len()
            )
        }
    }
}

fn write_output(out: Option<&Path>, text: &str, check: bool) -> Result<()> {
    let Some(out_path) = out else {
        print!("{text}");
        return Ok(());
    };

    if check {
        let cur = std::fs::read_to_string(out_path)
            .with_context(|| format!("read existing output: {}", out_path.display()))?;
        if cur != text {
            anyhow::bail!("generated output differs: {}", out_path.display());
        }
        return Ok(());
    }

    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }
    std::fs::write(out_path, text.as_bytes())
        .with_context(|| format!("write output: {}", out_path.display()))?;
    tracing::info!("wrote {}", out_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{ "packets": [
        { "name": "heartbeat", "id": 16, "description": "liveness",
          "data": [
            { "type": "uint8_t", "name": "status" },
            { "type": "bitfield", "name": "flags",
              "bits": [ { "name": "armed" }, { "name": "mode", "bitnum": 3 } ] }
          ] }
    ] }"#;

    const BROKEN: &str = r#"{ "packets": [
        { "name": "wide", "id": 2048, "data": [ { "type": "uint8_t", "name": "x" } ] }
    ] }"#;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cangen").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    fn schema_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, text) in files {
            std::fs::write(dir.path().join(name), text).unwrap();
        }
        dir
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = cli(&["check", "a.json", "--jobs", "3", "--float-order", "big", "-v"]);
        assert_eq!(cli.jobs, Some(3));
        assert_eq!(cli.float_order, ByteOrder::BigEndian);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Check { ref paths } if paths.len() == 1));
    }

    #[test]
    fn test_parse_rejects_unknown_byte_order() {
        let err = Cli::try_parse_from(["cangen", "check", "a.json", "--float-order", "middle"])
            .unwrap_err();
        assert!(err.to_string().contains("unknown byte order"));
    }

    #[test]
    fn test_parse_check_requires_out() {
        assert!(Cli::try_parse_from(["cangen", "rust", "a.json", "--check"]).is_err());
    }

    #[test]
    fn test_check_directory() {
        let dir = schema_dir(&[("heartbeat.json", SCHEMA)]);
        let path = dir.path().to_str().unwrap();
        run(cli(&["check", path])).expect("schema should check");
    }

    #[test]
    fn test_check_reports_errors() {
        let dir = schema_dir(&[("heartbeat.json", SCHEMA), ("wide.json", BROKEN)]);
        let path = dir.path().to_str().unwrap();

        let err = run(cli(&["check", path])).unwrap_err();
        assert_eq!(err.to_string(), "1 error(s) in 2 schema file(s)");
    }

    #[test]
    fn test_rust_writes_and_checks_output() {
        let dir = schema_dir(&[("heartbeat.json", SCHEMA)]);
        let schema = dir.path().join("heartbeat.json");
        let out = dir.path().join("gen").join("messages.rs");
        let (schema, out_arg) = (schema.to_str().unwrap(), out.to_str().unwrap());

        run(cli(&["rust", schema, "--out", out_arg])).expect("should generate");
        let code = std::fs::read_to_string(&out).unwrap();
        assert!(code.contains("impl CanMessage for Heartbeat {"));

        run(cli(&["rust", schema, "--out", out_arg, "--check"])).expect("output is current");

        std::fs::write(&out, "stale").unwrap();
        let err = run(cli(&["rust", schema, "--out", out_arg, "--check"])).unwrap_err();
        assert!(err.to_string().starts_with("generated output differs"));
    }

    #[test]
    fn test_c_uses_guard() {
        let dir = schema_dir(&[("heartbeat.json", SCHEMA)]);
        let schema = dir.path().join("heartbeat.json");
        let out = dir.path().join("can.h");

        run(cli(&[
            "c",
            schema.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--guard",
            "HEARTBEAT_H",
        ]))
        .expect("should generate");

        let header = std::fs::read_to_string(&out).unwrap();
        assert!(header.contains("#ifndef HEARTBEAT_H"));
        assert!(header.contains("CAN_PACKET_HEARTBEAT = 0x010,"));
        assert!(header.contains("#define CAN_LENGTH_HEARTBEAT 2"));
    }

    #[test]
    fn test_layout_dump() {
        let dir = schema_dir(&[("heartbeat.json", SCHEMA)]);
        let schema = dir.path().join("heartbeat.json");
        let out = dir.path().join("layout.json");

        run(cli(&["layout", schema.to_str().unwrap(), "--out", out.to_str().unwrap()]))
            .expect("should dump");

        let dump: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        let message = &dump["messages"][0];
        assert_eq!(message["name"], "heartbeat");
        assert_eq!(message["identifier"], 16);
        assert_eq!(message["dlc"], 2);
        assert_eq!(message["slots"][1]["kind"], "packed_bits");
        assert_eq!(message["slots"][1]["placements"][1]["offset"], 1);
        assert_eq!(dump["identifiers"]["entries"][0]["symbol"], "HEARTBEAT");
    }
}
