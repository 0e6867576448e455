use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tabplot::runtime::{self, PlotState, Status};
use tabplot::transpose::{HttpTransport, TransposeCoordinator, TransportConfig, DEFAULT_SERVER};
use tabplot::{classify, graph, OutputFormat, RenderOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "tabplot")]
#[command(about = "Pick two columns of a CSV/JSON dataset and turn them into a chart", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List columns with their inferred types and the default selection
    Columns {
        /// Input file (.csv or .json records, - for CSV on stdin)
        input: PathBuf,
    },
    /// Build a chart from two columns
    Plot {
        /// Input file (.csv or .json records, - for CSV on stdin)
        input: PathBuf,
        /// X column (defaults to the first column)
        #[arg(short, long)]
        x: Option<String>,
        /// Y column (defaults to the second column)
        #[arg(short, long)]
        y: Option<String>,
        /// Chart kind: scatter, bar or box
        #[arg(short, long, default_value = "scatter")]
        kind: String,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long, default_value_t = 600)]
        height: u32,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Send the dataset to the transpose service and print the result
    Transpose {
        /// Input file (.csv or .json records, - for CSV on stdin)
        input: PathBuf,
        /// Base URL of the transpose service
        #[arg(long, env = "TABPLOT_SERVER", default_value = DEFAULT_SERVER)]
        server: String,
        /// Request timeout in seconds (none by default)
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabplot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let ok = match args.command {
        Command::Columns { input } => columns(&input)?,
        Command::Plot {
            input,
            x,
            y,
            kind,
            format,
            width,
            height,
            output,
        } => {
            let options = RenderOptions { width, height, format };
            plot(&input, x.as_deref(), y.as_deref(), &kind, &options, output.as_deref())?
        }
        Command::Transpose {
            input,
            server,
            timeout_secs,
            output,
        } => {
            let config = TransportConfig { server, timeout_secs };
            transpose(&input, &config, output.as_deref())?
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn load(input: &Path) -> Result<Option<PlotState>> {
    let mut state = PlotState::new();
    let status = runtime::load_action(&mut state, input);
    if status.is_error() {
        report(&status);
        return Ok(None);
    }
    Ok(Some(state))
}

fn columns(input: &Path) -> Result<bool> {
    let Some(state) = load(input)? else {
        return Ok(false);
    };
    let Some(dataset) = state.dataset() else {
        return Ok(false);
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for column in state.registry().columns() {
        writeln!(handle, "{}\t{}", column, classify(dataset, column))
            .context("Failed to write to stdout")?;
    }
    let written = match state.registry().selection() {
        Some(sel) => writeln!(handle, "default selection: x={} y={}", sel.x, sel.y),
        None => writeln!(handle, "default selection: none (fewer than two columns)"),
    };
    written.context("Failed to write to stdout")?;

    Ok(true)
}

fn plot(
    input: &Path,
    x: Option<&str>,
    y: Option<&str>,
    kind: &str,
    options: &RenderOptions,
    output: Option<&Path>,
) -> Result<bool> {
    let Some(mut state) = load(input)? else {
        return Ok(false);
    };

    let x = x
        .map(str::to_string)
        .or_else(|| state.registry().x().map(str::to_string));
    let y = y
        .map(str::to_string)
        .or_else(|| state.registry().y().map(str::to_string));
    if let (Some(x), Some(y)) = (&x, &y) {
        if let Err(err) = state.select_columns(x, y) {
            report(&Status::error(err.to_string()));
            return Ok(false);
        }
    }

    let (figure, status) = runtime::plot_action(&state, kind);
    report(&status);
    let Some(figure) = figure else {
        return Ok(false);
    };

    let bytes = graph::render_figure(&figure, options).context("Failed to render plot")?;
    write_output(&bytes, output)?;
    Ok(true)
}

fn transpose(input: &Path, config: &TransportConfig, output: Option<&Path>) -> Result<bool> {
    let Some(mut state) = load(input)? else {
        return Ok(false);
    };

    let transport = HttpTransport::new(config).context("Failed to build HTTP client")?;
    tracing::info!("using transpose endpoint {}", transport.endpoint());
    let mut coordinator = TransposeCoordinator::new(transport);

    let status = runtime::transpose_action(&mut coordinator, &mut state, &mut |s: &Status| report(s));
    if status.is_error() {
        return Ok(false);
    }

    let Some(dataset) = state.dataset() else {
        return Ok(false);
    };
    eprintln!("columns: {}", state.registry().columns().join(", "));
    let json = dataset.to_json_string().context("Failed to serialize dataset")?;
    write_output(json.as_bytes(), output)?;
    Ok(true)
}

fn report(status: &Status) {
    eprintln!("{}", status.message);
}

fn write_output(bytes: &[u8], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, bytes)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(bytes).context("Failed to write to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
            Ok(())
        }
    }
}
