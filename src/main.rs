//! # Labelkit CLI
//!
//! Command-line interface for bulk barcode, QR and label generation.
//!
//! ## Usage
//!
//! ```bash
//! # Render one PNG per unit into ./out
//! labelkit generate --input products.json --out out
//!
//! # QR codes, zipped
//! labelkit generate --input products.json --mode qrcode --out out --zip
//!
//! # Open a print-ready label sheet in the browser
//! labelkit generate --input products.json --open
//!
//! # Search a catalog file
//! labelkit search --catalog catalog.json oat
//!
//! # Preview an invoice design
//! labelkit invoice-preview --theme elegant --template 3 --out invoice.html
//!
//! # Start the HTTP service
//! labelkit serve --listen 0.0.0.0:8080 --data-dir ./labelkit-data
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use labelkit::{
    AppConfig, LabelkitError,
    batch::generate,
    catalog::{Catalog, JsonCatalog, SelectionStore},
    export::{
        ArchiveCapability, ArchiveOutcome, BrowserSurface, DirectorySaver, FileSurface,
        download_all, download_all_as_zip, print_batch,
    },
    invoice::{InvoiceTemplate, SampleInvoice, Theme, render_preview},
    server::{ServerConfig, serve},
    symbology::{BarcodeFormat, CodeMode, SymbolRenderer},
};

/// Labelkit - bulk barcode, QR code and label generator
#[derive(Parser, Debug)]
#[command(name = "labelkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file with initial settings
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render codes for every product in a JSON file
    Generate {
        /// JSON array of products (name, sku, barcode, quantity, ...)
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// barcode or qrcode
        #[arg(long)]
        mode: Option<CodeMode>,

        /// Linear symbology, e.g. CODE128, EAN13, UPC
        #[arg(long)]
        format: Option<BarcodeFormat>,

        /// Directory for the PNG files or archive
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Bundle the files into one zip archive
        #[arg(long, requires = "out")]
        zip: bool,

        /// Write a print-ready HTML sheet to FILE
        #[arg(long, value_name = "FILE", conflicts_with = "open")]
        print: Option<PathBuf>,

        /// Open the print-ready sheet in the browser
        #[arg(long)]
        open: bool,
    },

    /// Search a product catalog file
    Search {
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,

        term: String,
    },

    /// List the invoice design themes
    Themes,

    /// Render an invoice preview to an HTML file
    InvoicePreview {
        #[arg(long, default_value = "classic")]
        theme: String,

        /// Layout, 1 to 5
        #[arg(long, default_value = "1")]
        template: u8,

        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },

    /// Start the HTTP service
    Serve {
        /// Address to listen on
        #[arg(long)]
        listen: Option<String>,

        /// Directory for saved templates and invoice settings
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Product catalog to expose for search
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,labelkit=debug".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<(), LabelkitError> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            input,
            mode,
            format,
            out,
            zip,
            print,
            open,
        } => {
            let mut settings = config.code.clone();
            if let Some(mode) = mode {
                settings.mode = mode;
            }
            if let Some(format) = format {
                settings.format = format;
            }

            let catalog = JsonCatalog::load(&input)?;
            let mut selection = SelectionStore::new();
            for product in catalog.products() {
                selection.add(product.clone());
            }

            let batch = generate(selection.snapshot(), &settings, &SymbolRenderer)?;
            println!("{}", batch.report().summary());

            if let Some(dir) = out {
                let mut saver = DirectorySaver::new(&dir)?;
                if zip {
                    let capability = ArchiveCapability::detect(config.archive_enabled);
                    match download_all_as_zip(&batch, &capability, &mut saver)? {
                        ArchiveOutcome::Archived { name, entries } => {
                            println!("Wrote {} ({} files)", dir.join(name).display(), entries);
                        }
                        ArchiveOutcome::FellBack { files } => {
                            println!(
                                "Archive unavailable; wrote {} files to {}",
                                files,
                                dir.display()
                            );
                        }
                    }
                } else {
                    let files = download_all(&batch, &mut saver)?;
                    println!("Wrote {} files to {}", files, dir.display());
                }
            }

            if let Some(path) = print {
                let doc = print_batch(&batch, &config.label, &FileSurface { path: path.clone() })?;
                println!("Wrote {} labels to {}", doc.labels, path.display());
            } else if open {
                let doc = print_batch(&batch, &config.label, &BrowserSurface)?;
                println!("Opened {} labels for printing", doc.labels);
            }
        }

        Commands::Search { catalog, term } => {
            let catalog = JsonCatalog::load(&catalog)?;
            let results = catalog.search(&term);
            if results.is_empty() {
                println!("No products match '{}'", term);
            }
            for p in results {
                let code = if p.barcode.is_empty() { &p.sku } else { &p.barcode };
                println!("{:<32} {:<16} {}", p.name, p.sku, code);
            }
        }

        Commands::Themes => {
            println!("Available themes:");
            for theme in Theme::all() {
                let c = theme.config();
                println!(
                    "  {:<10} {} / {}  {}",
                    theme.name(),
                    c.primary_color.to_hex(),
                    c.accent_color.to_hex(),
                    c.font_family
                );
            }
        }

        Commands::InvoicePreview {
            theme,
            template,
            out,
        } => {
            let theme = Theme::by_name(&theme)
                .ok_or_else(|| LabelkitError::InvalidInput(format!("unknown theme '{theme}'")))?;
            let template = InvoiceTemplate::new(template)?;
            let html = render_preview(&theme.config(), template, &SampleInvoice::demo());
            std::fs::write(&out, html)?;
            println!("Wrote {}", out.display());
        }

        Commands::Serve {
            listen,
            data_dir,
            catalog,
        } => {
            let mut server_config = ServerConfig::from(config);
            if let Some(listen) = listen {
                server_config.listen_addr = listen;
            }
            if let Some(dir) = data_dir {
                server_config.data_dir = dir;
            }
            server_config.catalog = catalog;

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve(server_config))?;
        }
    }

    Ok(())
}
