use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use pdx_script::escape::unquote;
use pdx_script::{
    io::strip_bom, parse_json, to_json_string, PathGuard, Script, ScriptConfig, ScriptError,
    ScriptParser, ScriptWriter, Value,
};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Parser, formatter and converter for Paradox game scripts
#[derive(Parser)]
#[command(name = "pdxs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Configuration file path (JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a script in canonical layout
    Fmt {
        /// Input file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Output file (use '-' for stdout)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        output: String,
    },

    /// Parse script files and report errors
    Check {
        /// Files to check
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },

    /// Convert a script to JSON
    ToJson {
        /// Input file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Output file (use '-' for stdout)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        output: String,

        /// Indent the JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Convert JSON back to a script
    FromJson {
        /// Input file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Output file (use '-' for stdout)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        output: String,
    },

    /// Print the values found at a keyword path such as 'focus_tree/focus/id'
    Get {
        /// Input file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Slash-separated keyword path
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Display statistics about a script
    Info {
        /// Input file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity flags
    setup_logging(cli.verbose, cli.quiet);

    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else {
        ScriptConfig::default()
    };

    match cli.command {
        Commands::Fmt { input, output } => {
            fmt_command(&input, &output, &config, cli.quiet)?;
        }
        Commands::Check { files } => {
            check_command(&files, &config, cli.quiet)?;
        }
        Commands::ToJson {
            input,
            output,
            pretty,
        } => {
            to_json_command(&input, &output, pretty, &config, cli.quiet)?;
        }
        Commands::FromJson { input, output } => {
            from_json_command(&input, &output, &config, cli.quiet)?;
        }
        Commands::Get { input, path } => {
            get_command(&input, &path, &config, cli.quiet)?;
        }
        Commands::Info { input } => {
            info_command(&input, &config, cli.verbose, cli.quiet)?;
        }
    }

    Ok(())
}

/// Set up logging based on verbosity flags
fn setup_logging(verbose: bool, quiet: bool) {
    let log_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("Logging initialized at {} level", log_level);
}

/// Load configuration from a JSON file
fn load_config(path: &Path) -> Result<ScriptConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = ScriptConfig::from_json(&text)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Read input from file or stdin, without a byte order mark
fn read_input(input: &str) -> Result<String> {
    let text = if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read input file: {}", input))?
    };
    Ok(strip_bom(&text).to_string())
}

/// Write output to file or stdout
///
/// File destinations are checked against the protected paths first.
fn write_output(output: &str, content: &str, config: &ScriptConfig) -> Result<()> {
    if output == "-" {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        io::stdout().flush().context("Failed to flush stdout")?;
    } else {
        PathGuard::from_config(&config.io)
            .check(output)
            .map_err(|e| map_script_error(e, "Writing output"))?;
        fs::write(output, content)
            .with_context(|| format!("Failed to write output file: {}", output))?;
    }
    Ok(())
}

/// Render a script for `output`, adding the byte order mark for files
fn render_for(output: &str, script: &Script, config: &ScriptConfig) -> String {
    if output == "-" {
        ScriptWriter::with_config(config.writer.clone()).write(script)
    } else {
        pdx_script::render_script(script, config)
    }
}

fn parse_script(text: &str, config: &ScriptConfig, context: &str) -> Result<Script> {
    ScriptParser::with_config(config.parser.clone())
        .parse(text)
        .map_err(|e| map_script_error(e, context))
}

/// Execute the fmt command
fn fmt_command(input: &str, output: &str, config: &ScriptConfig, quiet: bool) -> Result<()> {
    let start_time = Instant::now();

    info!("Formatting: {} -> {}", input, output);

    let progress = create_progress_bar(quiet, "Reading input");
    let text = read_input(input)?;
    progress.finish_and_clear();

    let input_size = text.len();
    debug!("Read {} bytes from input", input_size);

    let progress = create_progress_bar(quiet, "Parsing");
    let script = parse_script(&text, config, "Parsing script")?;
    progress.finish_and_clear();

    if script.is_empty() {
        warn!("Input has no statements");
    }

    let formatted = render_for(output, &script, config);

    let progress = create_progress_bar(quiet, "Writing output");
    write_output(output, &formatted, config)?;
    progress.finish_and_clear();

    let total_duration = start_time.elapsed();

    if !quiet && output != "-" {
        eprintln!("✓ Format complete");
        eprintln!("  Statements:  {}", script.statement_count());
        eprintln!("  Input:       {}", format_bytes(input_size));
        eprintln!("  Output:      {}", format_bytes(formatted.len()));
        eprintln!("  Time:        {:.3}s", total_duration.as_secs_f64());
    }

    info!("Format completed in {:.3}s", total_duration.as_secs_f64());

    Ok(())
}

/// Execute the check command
fn check_command(files: &[PathBuf], config: &ScriptConfig, quiet: bool) -> Result<()> {
    let mut failed = 0;

    for path in files {
        match pdx_script::read_script(path, config) {
            Ok(script) => {
                if !quiet {
                    println!(
                        "ok    {} ({} statements)",
                        path.display(),
                        script.statement_count()
                    );
                }
            }
            Err(e) => {
                failed += 1;
                error!("{}: {}", path.display(), e);
                println!("error {}: {}", path.display(), e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} files failed to parse", failed, files.len());
    }

    info!("All {} files parsed", files.len());
    Ok(())
}

/// Execute the to-json command
fn to_json_command(
    input: &str,
    output: &str,
    pretty: bool,
    config: &ScriptConfig,
    quiet: bool,
) -> Result<()> {
    info!("Converting to JSON: {} -> {}", input, output);

    let progress = create_progress_bar(quiet, "Reading input");
    let text = read_input(input)?;
    progress.finish_and_clear();

    let script = parse_script(&text, config, "Parsing script")?;
    let mut json =
        to_json_string(&script, pretty).map_err(|e| map_script_error(e, "Writing JSON"))?;
    json.push('\n');

    write_output(output, &json, config)?;
    debug!("Wrote {} bytes of JSON", json.len());

    Ok(())
}

/// Execute the from-json command
fn from_json_command(input: &str, output: &str, config: &ScriptConfig, quiet: bool) -> Result<()> {
    info!("Converting from JSON: {} -> {}", input, output);

    let progress = create_progress_bar(quiet, "Reading input");
    let text = read_input(input)?;
    progress.finish_and_clear();

    let script = parse_json(&text).map_err(|e| map_script_error(e, "Reading JSON"))?;
    let rendered = render_for(output, &script, config);

    write_output(output, &rendered, config)?;
    debug!("Wrote {} statements", script.statement_count());

    Ok(())
}

/// Execute the get command
fn get_command(input: &str, path: &str, config: &ScriptConfig, quiet: bool) -> Result<()> {
    let progress = create_progress_bar(quiet, "Reading input");
    let text = read_input(input)?;
    progress.finish_and_clear();

    let script = parse_script(&text, config, "Parsing script")?;
    let found = script.find_path(path);

    if found.is_empty() {
        warn!("Nothing found at '{}'", path);
    }

    let mut stdout = io::stdout().lock();
    for statement in found {
        match statement.value() {
            Value::Scalar(word) => writeln!(stdout, "{}", unquote(word))?,
            Value::List(items) => {
                let words: Vec<_> = items.iter().map(|item| unquote(item)).collect();
                writeln!(stdout, "{}", words.join(" "))?;
            }
            Value::Block(children) => write!(stdout, "{}", children)?,
        }
    }
    stdout.flush().context("Failed to flush stdout")?;

    Ok(())
}

/// Execute the info command
fn info_command(input: &str, config: &ScriptConfig, verbose: bool, quiet: bool) -> Result<()> {
    let start_time = Instant::now();

    info!("Reading script info from {}", input);

    let progress = create_progress_bar(quiet, "Reading input");
    let text = read_input(input)?;
    progress.finish_and_clear();

    let progress = create_progress_bar(quiet, "Parsing");
    let parse_start = Instant::now();
    let script = parse_script(&text, config, "Parsing script")?;
    let parse_duration = parse_start.elapsed();
    progress.finish_and_clear();

    debug!("Parsed script in {:.3}s", parse_duration.as_secs_f64());

    if !quiet {
        display_script_info(&script, text.len(), verbose);
    }

    debug!(
        "Info command completed in {:.3}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Display statistics about a script
fn display_script_info(script: &Script, size: usize, verbose: bool) {
    println!("=== Script Information ===\n");

    println!("Size: {}", format_bytes(size));
    println!("Top-level statements: {}", script.len());
    println!("Total statements: {}", script.statement_count());
    println!("Max depth: {}", script.depth());

    let stats = analyze_shapes(script);
    println!("\n--- Value Shapes ---");
    println!("  Scalars: {}", stats.scalars);
    println!("  Lists: {} ({} items)", stats.lists, stats.list_items);
    println!("  Blocks: {} ({} empty)", stats.blocks, stats.empty_blocks);

    if verbose && !script.is_empty() {
        println!("\n--- Top-level Keywords ---");
        for (keyword, count) in keyword_counts(script) {
            println!("  {}: {}", keyword, count);
        }
    }

    println!();
}

/// Value shape statistics for a script
#[derive(Debug, Default)]
struct ShapeStats {
    scalars: usize,
    lists: usize,
    list_items: usize,
    blocks: usize,
    empty_blocks: usize,
}

/// Count value shapes across the whole tree
fn analyze_shapes(script: &Script) -> ShapeStats {
    let mut stats = ShapeStats::default();
    let mut pending = vec![script];

    while let Some(current) = pending.pop() {
        for statement in current {
            match statement.value() {
                Value::Scalar(_) => stats.scalars += 1,
                Value::List(items) => {
                    stats.lists += 1;
                    stats.list_items += items.len();
                }
                Value::Block(children) => {
                    stats.blocks += 1;
                    if children.is_empty() {
                        stats.empty_blocks += 1;
                    }
                    pending.push(children);
                }
            }
        }
    }

    stats
}

/// Top-level keywords with their number of occurrences, in first-seen order
fn keyword_counts(script: &Script) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for statement in script {
        let keyword = statement.keyword();
        match index.get(keyword) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(keyword, counts.len());
                counts.push((keyword, 1));
            }
        }
    }
    counts
}

/// Create a progress bar (spinner) for operations
fn create_progress_bar(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Format bytes in human-readable format
fn format_bytes(bytes: usize) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Map ScriptError to anyhow::Error with context
fn map_script_error(error: ScriptError, context: &str) -> anyhow::Error {
    match error {
        ScriptError::UnclosedBlock { position, message } => {
            anyhow::anyhow!(
                "{}: unbalanced braces at token {}: {}",
                context,
                position,
                message
            )
        }
        ScriptError::Syntax { position, message } => {
            anyhow::anyhow!("{}: syntax error at token {}: {}", context, position, message)
        }
        ScriptError::MixedBlock { position, keyword } => {
            anyhow::anyhow!(
                "{}: block '{}' closed at token {} mixes statements and bare values",
                context,
                keyword,
                position
            )
        }
        ScriptError::DepthLimitExceeded { depth, limit } => {
            anyhow::anyhow!(
                "{}: nesting depth {} exceeds the limit of {} (raise parser.max_depth in the config)",
                context,
                depth,
                limit
            )
        }
        ScriptError::ProtectedDestination { path } => {
            anyhow::anyhow!(
                "{}: refusing to write into protected location {} (see io.protected_paths in the config)",
                context,
                path
            )
        }
        other => anyhow::Error::new(other).context(context.to_string()),
    }
}
