use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pagepaint::{PdfiumConfig, RenderOptions};

#[derive(Debug, Parser)]
#[command(name = "pagepaint", version, about = "Rasterize PDF pages")]
pub struct Cli {
    #[command(flatten)]
    pub pdfium: PdfiumArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct PdfiumArgs {
    /// Path to the pdfium shared library.
    #[arg(long = "pdfium", value_name = "LIB", env = "PDFIUM_LIBRARY_PATH", global = true)]
    pub library_path: Option<PathBuf>,

    /// Additional font directory, may be given multiple times.
    #[arg(long = "font-dir", value_name = "DIR", global = true)]
    pub font_dirs: Vec<PathBuf>,
}

impl Command {
    /// Framing requested for the `render` command.
    pub fn render_options(&self) -> Option<RenderOptions> {
        match self {
            Command::Render { crop, scale_factor, .. } => Some(RenderOptions {
                crop: *crop,
                scale_factor: *scale_factor,
            }),
            Command::Info { .. } => None,
        }
    }
}

impl PdfiumArgs {
    pub fn config(&self) -> PdfiumConfig {
        let user_font_paths = if self.font_dirs.is_empty() {
            None
        } else {
            Some(self.font_dirs.clone())
        };

        PdfiumConfig {
            library_path: self.library_path.clone(),
            user_font_paths,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a page into a PNG file.
    Render {
        /// Path or file:// URI of the document.
        #[arg(value_name = "LOCATOR")]
        locator: String,

        /// Zero-based page index.
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Output file, defaults to `page-<N>.png`.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Crop the page to its content, keeping a small margin.
        #[arg(long)]
        crop: bool,

        /// Output pixels per page point.
        #[arg(
            long,
            value_name = "N",
            default_value_t = 1,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        scale_factor: u32,
    },

    /// Print the page count and page sizes of a document.
    Info {
        /// Path or file:// URI of the document.
        #[arg(value_name = "LOCATOR")]
        locator: String,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_defaults() {
        let cli = Cli::try_parse_from(["pagepaint", "render", "doc.pdf"]).unwrap();

        assert_eq!(cli.command.render_options(), Some(RenderOptions::default()));

        match cli.command {
            Command::Render { locator, page, output, .. } => {
                assert_eq!(locator, "doc.pdf");
                assert_eq!(page, 0);
                assert_eq!(output, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_render_framing() {
        let cli = Cli::try_parse_from([
            "pagepaint",
            "render",
            "doc.pdf",
            "--crop",
            "--scale-factor",
            "2",
        ])
        .unwrap();

        let options = cli.command.render_options().unwrap();
        assert!(options.crop);
        assert_eq!(options.scale_factor, 2);

        let cli = Cli::try_parse_from(["pagepaint", "info", "doc.pdf"]).unwrap();
        assert_eq!(cli.command.render_options(), None);
    }

    #[test]
    fn test_rejects_zero_scale_factor() {
        let result = Cli::try_parse_from(["pagepaint", "render", "doc.pdf", "--scale-factor", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_pdfium_args() {
        let cli = Cli::try_parse_from([
            "pagepaint",
            "info",
            "file:///tmp/doc.pdf",
            "--pdfium",
            "/opt/pdfium/libpdfium.so",
            "--font-dir",
            "/usr/share/fonts",
        ])
        .unwrap();

        let config = cli.pdfium.config();
        assert_eq!(config.library_path, Some(PathBuf::from("/opt/pdfium/libpdfium.so")));
        assert_eq!(config.user_font_paths, Some(vec![PathBuf::from("/usr/share/fonts")]));
    }

    #[test]
    fn test_rejects_negative_page() {
        assert!(Cli::try_parse_from(["pagepaint", "render", "doc.pdf", "--page", "-1"]).is_err());
    }
}
