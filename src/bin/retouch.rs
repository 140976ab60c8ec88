use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "retouch", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an edit script over an image and write the result as PNG.
    Apply(ApplyArgs),
    /// Print the dimensions of an image.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Edit script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Editor config JSON. `RETOUCH_*` environment variables override it.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn read_image(path: &Path) -> anyhow::Result<retouch::RasterBuffer> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    retouch::decode_image(&bytes, None).with_context(|| format!("decode image '{}'", path.display()))
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => retouch::EditorConfig::from_path(path)?,
        None => retouch::EditorConfig::default(),
    }
    .with_env_overrides()?;

    let script = retouch::EditScript::from_path(&args.script)?;
    let mut session = retouch::EditorSession::new(&config);
    session.load_raster(read_image(&args.in_path)?);

    let script_dir = args.script.parent().unwrap_or_else(|| Path::new("."));
    let report = retouch::replay(&mut session, &script, script_dir)
        .with_context(|| format!("replay script '{}'", args.script.display()))?;
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    let png = session.export_png()?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png).with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} steps, revision {} -> {})",
        args.out.display(),
        report.steps,
        report.start_revision,
        report.end_revision
    );
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let raster = read_image(&args.in_path)?;
    println!("{}x{}", raster.width(), raster.height());
    Ok(())
}
