//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing::info;

use docflow_frontmatter::{FrontmatterDocument, ParseOptions};
use docflow_shared::{AppConfig, ReferenceFile, Value, init_config, load_config};
use docflow_workflow::parse_steps_with_titles;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Docflow — turn workflow markdown into a typed, queryable model.
#[derive(Parser)]
#[command(
    name = "docflow",
    version,
    about = "Parse workflow documents: frontmatter, steps, data-flow edges, reference groups.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Summarize a document: frontmatter fields and step structure.
    Inspect {
        /// Path to the workflow markdown file.
        file: PathBuf,
    },

    /// Print a document's parsed step records.
    Steps {
        /// Path to the workflow markdown file.
        file: PathBuf,

        /// Emit JSON instead of a text summary.
        #[arg(long)]
        json: bool,
    },

    /// Print a document's inferred step I/O and connection edges as JSON.
    Graph {
        /// Path to the workflow markdown file.
        file: PathBuf,
    },

    /// Classify a directory of reference files into subdirectory groups.
    Refs {
        /// Directory containing the reference files.
        dir: PathBuf,
    },

    /// Re-serialize a document through the frontmatter codec.
    Normalize {
        /// Path to the markdown file.
        file: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docflow=info",
        1 => "docflow=debug",
        _ => "docflow=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Inspect { file } => cmd_inspect(&file),
        Command::Steps { file, json } => cmd_steps(&file, json),
        Command::Graph { file } => cmd_graph(&file),
        Command::Refs { dir } => cmd_refs(&dir),
        Command::Normalize { file } => cmd_normalize(&file),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Read and parse a document, honoring the configured parse options.
fn load_document(file: &Path) -> Result<FrontmatterDocument> {
    let raw = std::fs::read_to_string(file)
        .map_err(|e| eyre!("cannot read '{}': {e}", file.display()))?;

    let config = load_config()?;
    let opts = ParseOptions {
        coerce_numeric_scalars: config.parsing.coerce_numeric_scalars,
    };

    Ok(docflow_frontmatter::parse_with(&raw, &opts))
}

/// Step titles listed in the frontmatter `steps:` field, if any.
fn metadata_titles(doc: &FrontmatterDocument) -> Vec<String> {
    doc.fields
        .get("steps")
        .and_then(Value::as_list)
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        Value::Num(n) => n.to_string(),
        Value::List(items) => items.join(", "),
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_inspect(file: &Path) -> Result<()> {
    let doc = load_document(file)?;
    let steps = parse_steps_with_titles(&doc.body, &metadata_titles(&doc));

    info!(
        field_count = doc.fields.len(),
        step_count = steps.len(),
        "document parsed"
    );

    println!();
    println!("  {}", file.display());
    println!();

    if doc.fields.is_empty() {
        println!("  (no frontmatter)");
    } else {
        for (key, value) in &doc.fields {
            println!("  {key}: {}", render_value(value));
        }
    }

    println!();
    println!("  Steps: {}", steps.len());
    for step in &steps {
        let mut extras: Vec<String> = Vec::new();
        if !step.skills.is_empty() {
            extras.push(format!("{} skills", step.skills.len()));
        }
        if !step.tools.is_empty() {
            extras.push(format!("{} tools", step.tools.len()));
        }
        if !step.deliverable.is_empty() {
            extras.push("deliverable".to_string());
        }
        let suffix = if extras.is_empty() {
            String::new()
        } else {
            format!(" ({})", extras.join(", "))
        };
        println!("  {}. {}{suffix}", step.number, step.title);
    }
    println!();

    Ok(())
}

fn cmd_steps(file: &Path, json: bool) -> Result<()> {
    let doc = load_document(file)?;
    let steps = parse_steps_with_titles(&doc.body, &metadata_titles(&doc));

    if json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }

    for step in &steps {
        println!("Step {}: {}", step.number, step.title);
        if !step.instruction.is_empty() {
            println!("  instruction: {}", step.instruction);
        }
        if !step.deliverable.is_empty() {
            println!("  deliverable: {}", step.deliverable);
        }
        if !step.note.is_empty() {
            println!("  note: {}", step.note);
        }
    }

    Ok(())
}

fn cmd_graph(file: &Path) -> Result<()> {
    let doc = load_document(file)?;
    let steps = parse_steps_with_titles(&doc.body, &metadata_titles(&doc));

    let ios = docflow_graph::infer_all(&steps);
    let connections = docflow_graph::resolve_connections(&ios);

    info!(
        step_count = steps.len(),
        edge_count = connections.len(),
        "graph derived"
    );

    let nodes: Vec<serde_json::Value> = steps
        .iter()
        .zip(&ios)
        .map(|(step, io)| {
            serde_json::json!({
                "number": step.number,
                "title": step.title,
                "inputs": io.inputs,
                "outputs": io.outputs,
            })
        })
        .collect();

    let graph = serde_json::json!({
        "steps": nodes,
        "connections": connections,
    });

    println!("{}", serde_json::to_string_pretty(&graph)?);
    Ok(())
}

fn cmd_refs(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(eyre!("'{}' is not a directory", dir.display()));
    }

    let mut files: Vec<ReferenceFile> = Vec::new();
    collect_reference_files(dir, "", &mut files)?;
    files.sort_by(|a, b| a.path.cmp(&b.path));

    info!(file_count = files.len(), "reference files collected");

    let groups = docflow_references::classify(files);

    println!();
    for group in &groups {
        println!("  {} {} ({})", group.icon, group.display_name, group.path);
        for file in &group.files {
            println!("    {}", file.name);
        }
    }
    println!();

    Ok(())
}

/// Walk a directory tree, building reference files with paths relative to
/// the walk root. Markdown files get their frontmatter parsed; other
/// files are tracked by name only.
fn collect_reference_files(dir: &Path, prefix: &str, out: &mut Vec<ReferenceFile>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| eyre!("cannot read directory '{}': {e}", dir.display()))?;

    for entry in entries {
        let entry = entry.map_err(|e| eyre!("cannot read entry in '{}': {e}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().to_string();
        let rel_path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };

        let path = entry.path();
        if path.is_dir() {
            collect_reference_files(&path, &rel_path, out)?;
            continue;
        }

        let is_markdown = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));

        let (content, frontmatter) = if is_markdown {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| eyre!("cannot read '{}': {e}", path.display()))?;
            let parsed = docflow_frontmatter::parse(&raw);
            (Some(parsed.body), parsed.fields)
        } else {
            (None, Default::default())
        };

        out.push(ReferenceFile {
            name,
            path: rel_path,
            is_markdown,
            content,
            frontmatter,
            group_path: String::new(),
        });
    }

    Ok(())
}

fn cmd_normalize(file: &Path) -> Result<()> {
    let doc = load_document(file)?;
    print!("{}", docflow_frontmatter::serialize(&doc.fields, &doc.body));
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
