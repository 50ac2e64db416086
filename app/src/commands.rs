use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cairo::{Format, ImageSurface};
use pagepaint::policy;
use pagepaint::{
    DocumentHandle, DocumentLibrary, PageHandle, PageRasterizer, PdfiumLibrary, Rect,
    RenderOptions,
};

use crate::cli::{Cli, Command};

pub fn run(cli: Cli) -> Result<()> {
    let library = PdfiumLibrary::init(&cli.pdfium.config()).context("failed to initialize pdfium")?;

    let options = cli.command.render_options().unwrap_or_default();

    match cli.command {
        Command::Render { locator, page, output, .. } => {
            let output = output.unwrap_or_else(|| default_output(page));
            render(&library, &locator, page, &output, &options)
        }
        Command::Info { locator } => info(&library, &locator),
    }
}

fn default_output(page: u32) -> PathBuf {
    PathBuf::from(format!("page-{page}.png"))
}

/// Target size in pixels for a page region given in points.
fn target_size(region: Rect, options: &RenderOptions) -> Result<(i32, i32)> {
    let factor = options.scale_factor.max(1) as f64;

    let extent = |points| {
        let pixels = policy::pixels_for(points, options.render_dpi());
        let extent = (pixels as f64 * options.composite_scale() * factor).ceil();

        i32::try_from(extent as u32).context("page too large")
    };

    Ok((extent(region.width())?, extent(region.height())?))
}

fn render(
    library: &PdfiumLibrary,
    locator: &str,
    index: u32,
    output: &Path,
    options: &RenderOptions,
) -> Result<()> {
    let region = {
        let doc = library
            .open(locator)
            .with_context(|| format!("unable to load document: {locator}"))?;

        let count = doc.page_count();
        if index >= count {
            anyhow::bail!("unable to create page: {index} (document has {count} pages)");
        }

        let page = doc.page(index).with_context(|| format!("unable to create page: {index}"))?;
        options.region(&page)
    };

    let (width, height) = target_size(region, options)?;
    let surface = ImageSurface::create(Format::ARgb32, width, height)
        .context("failed to create target surface")?;

    {
        let mut ctx = cairo::Context::new(&surface)?;
        ctx.set_source_rgb(1.0, 1.0, 1.0);
        ctx.paint()?;

        let factor = options.scale_factor.max(1) as f64;
        ctx.scale(factor, factor);

        let raster = PageRasterizer::new(library);
        let painted = raster.try_render_doc_page_with(locator, index, &mut ctx, options)?;

        tracing::info!(
            locator,
            page = index,
            width = painted.width,
            height = painted.height,
            "page rendered"
        );
    }

    let mut file = File::create(output)
        .with_context(|| format!("failed to create '{}'", output.display()))?;

    surface
        .write_to_png(&mut file)
        .with_context(|| format!("failed to write '{}'", output.display()))?;

    println!("{}", output.display());
    Ok(())
}

fn info(library: &PdfiumLibrary, locator: &str) -> Result<()> {
    let doc = library
        .open(locator)
        .with_context(|| format!("unable to load document: {locator}"))?;

    let count = doc.page_count();
    println!("{locator}: {count} pages");

    for index in 0..count {
        let page = doc.page(index).with_context(|| format!("unable to create page: {index}"))?;
        let (width, height) = page.size();

        println!("  page {index}: {width:.2} x {height:.2} pt");
    }

    Ok(())
}
