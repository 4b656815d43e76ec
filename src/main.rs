use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdtext::{RenderOptions, debug, render::Renderer, resolve};

/// Render a parsed markdown tree (JSON) as fixed-width plain text.
#[derive(Debug, Parser)]
#[command(name = "mdtext", version, about)]
struct Cli {
    /// Tree JSON file; reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Wrap every node's output in `<kind>` markers.
    #[arg(long, env = "MDTEXT_DEBUG")]
    debug: bool,

    /// Column budget for wrapped text.
    #[arg(long, default_value_t = 80)]
    width: usize,

    /// Print the resolved tree structure instead of rendering it.
    #[arg(long)]
    dump_tree: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let root = match mdtext::read_tree(cli.input.as_deref()) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("mdtext: {e}");
            return ExitCode::FAILURE;
        }
    };

    let resolved = resolve::resolve(root);
    if cli.dump_tree {
        print!("{}", debug::dump_tree(&resolved.root));
        return ExitCode::SUCCESS;
    }

    let opts = RenderOptions {
        max_width: cli.width,
        debug: cli.debug,
        ..RenderOptions::default()
    };
    match Renderer::new(&resolved, &opts).render() {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("mdtext: {e}");
            ExitCode::FAILURE
        }
    }
}
