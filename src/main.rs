use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use vitae::pipeline::{self, BuildError, BuildOptions, Publication};
use vitae::{config, output, seo};

#[derive(Parser)]
#[command(name = "vitae")]
#[command(about = "Compile a personal profile into a publication dataset")]
#[command(long_about = "\
Compile a personal profile into a publication dataset

Your data directory is the source of truth. Four structured files describe the
person, Markdown directories hold free-form pages and blog posts, and a
visibility policy in site.yml decides what reaches the web and what reaches
print.

Data layout:

  data/
  ├── site.yml                 # Language, visibility, SEO, documents
  ├── resume.yml               # Name, tagline, contact, experience, ...
  ├── skills.yml               # Categorised skill catalog
  ├── projects.yml             # Projects, each naming the skills it used
  ├── i18n.yml                 # Optional custom language pack (lang: custom)
  ├── pages/                   # One page per .md file (front-matter optional)
  │   └── about.md
  └── blog/                    # One post per .md file
      └── 2026-03-01-hello.md  # Date prefix is dropped from the slug

Any of the four files may be .yml, .yaml, .toml or .json.

Output layout:

  dist/
  ├── data/                    # JSON dataset: web projection, crossref,
  │   ├── blog/                #   i18n bundle, manifest, pages and posts
  │   ├── pages/
  │   └── print/               # Print projection for document exporters
  ├── robots.txt
  ├── sitemap.xml              # Needs a site URL
  ├── llms.txt
  └── feed.xml                 # Needs a site URL and at least one post

Run 'vitae gen-config' to generate a documented site.yml.")]
#[command(version)]
struct Cli {
    /// Data directory
    #[arg(long, default_value = "data", global = true)]
    data: PathBuf,

    /// Pages directory [default: <data>/pages when present]
    #[arg(long, global = true)]
    pages: Option<PathBuf>,

    /// Blog directory [default: <data>/blog when present]
    #[arg(long, global = true)]
    blog: Option<PathBuf>,

    /// Directory of extra language packs (<code>.yml)
    #[arg(long, global = true)]
    i18n_dir: Option<PathBuf>,

    /// Reference date for post scheduling, YYYY-MM-DD [default: today]
    #[arg(long, global = true)]
    build_date: Option<NaiveDate>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Compile the profile and write the dataset
    Build {
        /// Output directory
        #[arg(long = "output", default_value = "dist")]
        out: PathBuf,

        /// Public site URL [default: site.yml url, then GITHUB_REPOSITORY]
        #[arg(long)]
        site_url: Option<String>,
    },
    /// Validate and compile without writing anything
    Check,
    /// Print a stock site.yml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    match &cli.command {
        Command::Build { out, site_url } => {
            let options = build_options(&cli);
            let Some(publication) = compile_or_report(&options)? else {
                std::process::exit(1);
            };
            let site_url = seo::resolve_site_url(
                site_url.as_deref().or(publication.site.url.as_deref()),
                std::env::var("GITHUB_REPOSITORY").ok().as_deref(),
            );
            output::print_publication(&publication);
            println!("==> Writing dataset \u{2192} {}", out.display());
            let report =
                pipeline::write_dataset(&publication, out, &site_url, options.build_date)?;
            output::print_write_report(&report);
        }
        Command::Check => {
            let options = build_options(&cli);
            println!("==> Checking {}", options.data_dir.display());
            let Some(publication) = compile_or_report(&options)? else {
                std::process::exit(1);
            };
            output::print_publication(&publication);
            println!("==> Profile is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_site_config());
        }
    }

    Ok(())
}

/// Compile, printing validation errors instead of propagating them.
fn compile_or_report(options: &BuildOptions) -> Result<Option<Publication>, BuildError> {
    match pipeline::compile(options) {
        Ok(publication) => Ok(Some(publication)),
        Err(BuildError::Validation(errors)) => {
            output::print_validation_errors(&errors);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn build_options(cli: &Cli) -> BuildOptions {
    BuildOptions {
        data_dir: cli.data.clone(),
        pages_dir: content_dir(cli.pages.as_ref(), &cli.data, "pages"),
        blog_dir: content_dir(cli.blog.as_ref(), &cli.data, "blog"),
        build_date: cli
            .build_date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        i18n_dir: cli.i18n_dir.clone(),
    }
}

/// An explicit directory, or the conventional one under the data dir if it exists.
fn content_dir(explicit: Option<&PathBuf>, data: &Path, name: &str) -> Option<PathBuf> {
    match explicit {
        Some(dir) => Some(dir.clone()),
        None => Some(data.join(name)).filter(|d| d.is_dir()),
    }
}

/// Logs go to stderr so stdout stays a clean inventory.
fn init_tracing(verbose: u8, format: LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default = match verbose {
        0 => "vitae=warn",
        1 => "vitae=info",
        _ => "vitae=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    match format {
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}
