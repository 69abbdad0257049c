use anyhow::{Context, Result};
use cell_cst::config::{load_from_path, Config};
use cell_cst::geometry::{Position, Range};
use cell_cst::repair::{locate, repair, EditDescriptor};
use cell_cst::tree::{CellTree, NodeId, SyntaxTree};
use cell_cst::zip::{zip_output, ParseOutput};
use cell_cst::ParserProcess;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "cell-cst")]
#[command(about = "Range-accurate syntax trees for notebook cells", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Zip a parser dump, or every .json dump in a directory
    Zip {
        path: PathBuf,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the configured parser on a source file and zip its output
    Parse {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Find the narrowest node containing a range of a parser dump
    Locate {
        dump: PathBuf,

        /// Zero-based range, `line:col-line:col`
        #[arg(short, long, value_parser = parse_range)]
        range: Range,

        #[arg(long)]
        json: bool,
    },

    /// Replace a range of a parser dump's source and repair the tree
    Repair {
        dump: PathBuf,

        /// Zero-based range to replace, `line:col-line:col`
        #[arg(short, long, value_parser = parse_range)]
        range: Range,

        /// Replacement text
        #[arg(short, long, default_value = "")]
        text: String,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_from_path(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Zip { path, json } => cmd_zip(&config, &path, json),
        Commands::Parse { file, json } => cmd_parse(&config, &file, json),
        Commands::Locate { dump, range, json } => cmd_locate(&config, &dump, range, json),
        Commands::Repair {
            dump,
            range,
            text,
            json,
        } => cmd_repair(&config, &dump, range, &text, json),
    }
}

fn parse_position(input: &str) -> Result<Position, String> {
    let (line, column) = input
        .split_once(':')
        .ok_or_else(|| format!("expected line:col, got '{input}'"))?;
    let line = line
        .trim()
        .parse()
        .map_err(|_| format!("invalid line '{line}'"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{column}'"))?;
    Ok(Position::new(line, column))
}

fn parse_range(input: &str) -> Result<Range, String> {
    match input.split_once('-') {
        Some((start, end)) => Ok(Range::new(parse_position(start)?, parse_position(end)?)),
        None => parse_position(input).map(Range::point),
    }
}

/// Read a dump and return its source text, if the parser sent one, with the
/// zipped tree.
fn load_dump(config: &Config, path: &Path) -> Result<(Option<String>, CellTree)> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let Some(mut output) = ParseOutput::from_json(&contents)
        .with_context(|| format!("failed to decode {}", path.display()))?
    else {
        return Ok((None, CellTree::Empty));
    };
    output.rebase_lines(config.parser.line_base);
    let source = output.source.clone();
    let tree = zip_output(output, &config.tokens)
        .with_context(|| format!("failed to zip {}", path.display()))?;
    Ok((source, tree))
}

fn dump_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("json")
        {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

fn print_tree(tree: &CellTree, json: bool) -> Result<()> {
    let Some(tree) = tree.as_tree() else {
        if json {
            println!("null");
        } else {
            println!("{}", "(empty cell)".dimmed());
        }
        return Ok(());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&tree.to_view())?);
    } else {
        print_outline(tree, tree.root(), 0);
    }
    Ok(())
}

fn print_outline(tree: &SyntaxTree, id: NodeId, depth: usize) {
    let node = tree.node(id);
    println!(
        "{}{} {} {}",
        "  ".repeat(depth),
        node.kind.bold(),
        format!("[{}]", node.range).cyan(),
        format!("{:?}", tree.first_line(id)).dimmed()
    );
    for &child in &node.children {
        print_outline(tree, child, depth + 1);
    }
}

fn cmd_zip(config: &Config, path: &Path, json: bool) -> Result<()> {
    if !path.is_dir() {
        let (_, tree) = load_dump(config, path)?;
        return print_tree(&tree, json);
    }

    let files = dump_files(path)?;
    if files.is_empty() {
        anyhow::bail!("No .json dumps found in {}", path.display());
    }

    let mut failed = 0;
    for file in &files {
        match load_dump(config, file) {
            Ok((_, CellTree::Empty)) => {
                println!("{} {}: empty cell", "⊙".yellow(), file.display());
            }
            Ok((_, CellTree::Tree(tree))) => {
                println!(
                    "{} {}: {} nodes, {} tokens, {:016x}",
                    "✓".green(),
                    file.display(),
                    tree.node_count(),
                    tree.tokens().len(),
                    tree.fingerprint(tree.root())
                );
            }
            Err(e) => {
                eprintln!("{} {}: {:#}", "✗".red(), file.display(), e);
                failed += 1;
            }
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} zipped", format!("{}", files.len() - failed).green());
    println!("  {} failed", format!("{}", failed).red());
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_parse(config: &Config, file: &Path, json: bool) -> Result<()> {
    let source =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let backend = ParserProcess::new(config);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let tree = runtime
        .block_on(backend.zip(&source))
        .with_context(|| format!("failed to parse {}", file.display()))?;
    print_tree(&tree, json)
}

fn cmd_locate(config: &Config, dump: &Path, range: Range, json: bool) -> Result<()> {
    let (_, tree) = load_dump(config, dump)?;
    let Some(tree) = tree.as_tree() else {
        anyhow::bail!("{} is an empty cell", dump.display());
    };

    let located = locate(tree, &range);
    let node = tree.node(located.node);
    if json {
        let value = serde_json::json!({
            "type": node.kind,
            "index": located.index,
            "start": node.range.start,
            "end": node.range.end,
            "text": tree.text(located.node),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!(
            "{} {} (sibling {})",
            node.kind.bold(),
            format!("[{}]", node.range).cyan(),
            located.index
        );
        println!("{}", tree.text(located.node));
    }
    Ok(())
}

fn cmd_repair(config: &Config, dump: &Path, range: Range, text: &str, json: bool) -> Result<()> {
    let (source, mut tree) = load_dump(config, dump)?;
    let Some(syntax) = tree.as_tree_mut() else {
        anyhow::bail!("{} is an empty cell", dump.display());
    };
    // token literals alone lose the spacing the edit's columns refer to
    let Some(source) = source else {
        anyhow::bail!("{} has no source text to edit", dump.display());
    };

    let edit = EditDescriptor::replace(&source, range, text);
    let new_text = edit.apply(&source);
    let repaired = repair(syntax, &edit, &new_text);

    if json {
        let value = serde_json::json!({
            "repair": repaired,
            "tree": syntax.to_view(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Repaired".green(),
        repaired.kind.bold(),
        format!("[{}]", repaired.range).cyan()
    );
    println!("{}", repaired.text);
    println!();
    print_tree(&tree, false)
}
