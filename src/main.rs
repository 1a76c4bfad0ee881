//! themekit - page passes and packaging for the Ember and Slate themes

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use themekit::lightbox::{GalleryDocument, ViewState};
use themekit::theme::{Theme, ThemeConfig, process_document};
use themekit::{dom, package};

#[derive(Parser)]
#[command(name = "themekit")]
#[command(version, about = "Page passes and packaging for the Ember and Slate themes", long_about = None)]
#[command(after_help = "EXAMPLES:
    themekit render --host example.com page.html out.html   Apply Ember passes
    themekit package ./Ember                                Build dist/ember-x.y.z.zip
    themekit gallery page.html                              List Slate gallery items")]
struct Cli {
    /// JSON theme config; command-line options override it
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output (repeat for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a theme's page passes over an HTML file
    Render {
        /// Theme to apply (ember or slate)
        #[arg(long)]
        theme: Option<Theme>,

        /// Host of the page; links elsewhere open in a new tab
        #[arg(long)]
        host: Option<String>,

        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Zip a theme directory for distribution
    Package {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output directory (defaults to DIR/dist); never packaged itself
        #[arg(long, value_name = "DIST")]
        out: Option<PathBuf>,
    },

    /// List the gallery items and lightbox markup found in a page
    Gallery {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Render {
            theme,
            host,
            input,
            output,
        } => load_config(cli.config.as_deref()).and_then(|mut config| {
            if let Some(theme) = theme {
                config.theme = theme;
            }
            if let Some(host) = host {
                config.host = host;
            }
            render(&config, &input, output.as_deref())
        }),
        Command::Package { dir, out } => {
            let out = out.unwrap_or_else(|| dir.join(package::DIST_DIR));
            package::package_theme(&dir, &out).map(|path| println!("{}", path.display()))
        }
        Command::Gallery { input } => {
            load_config(cli.config.as_deref()).and_then(|config| gallery(&config, &input))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> themekit::Result<ThemeConfig> {
    match path {
        Some(path) => ThemeConfig::load(path),
        None => Ok(ThemeConfig::default()),
    }
}

fn render(config: &ThemeConfig, input: &Path, output: Option<&Path>) -> themekit::Result<()> {
    let bytes = fs::read(input)?;
    let mut page = dom::parse_html_bytes(&bytes);
    let report = process_document(&mut page, config)?;
    let html = dom::to_html(&page);

    match output {
        Some(path) => {
            fs::write(path, html)?;
            eprintln!(
                "{}: {} linked posts, {} external links, {} app entries",
                path.display(),
                report.linked_posts,
                report.external_links,
                report.app_entries
            );
        }
        None => println!("{html}"),
    }
    Ok(())
}

fn gallery(config: &ThemeConfig, input: &Path) -> themekit::Result<()> {
    let bytes = fs::read(input)?;
    let page = dom::parse_html_bytes(&bytes);
    let doc = GalleryDocument::from_dom(&page)?;

    for (index, item) in doc.items.iter().enumerate() {
        let title = if item.title.is_empty() {
            "(untitled)"
        } else {
            &item.title
        };
        match &item.link_url {
            Some(link) => println!("{index}\t{}\t{title}\t{link}", item.image_url),
            None => println!("{index}\t{}\t{title}", item.image_url),
        }
    }
    let lightbox = config.lightbox(doc.items.clone(), ViewState::default());
    println!(
        "{} items, lightbox {}, swipe threshold {}px",
        lightbox.len(),
        if doc.elements.is_some() {
            "present"
        } else {
            "missing"
        },
        lightbox.swipe_threshold()
    );
    Ok(())
}
