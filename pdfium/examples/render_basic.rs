use pdfium::bitmap::{Bitmap, BitmapFormat, Color};
use pdfium::render::{PageRenderLayout, RenderFlags};
use pdfium::{Library, Result};

const DPI: f32 = 96.0;

fn main() -> Result<()> {
    let Some(file) = std::env::args_os().nth(1) else {
        eprintln!("usage: render_basic <FILE>");
        std::process::exit(2);
    };

    let lib = Library::init()?;
    let doc = lib.load_file(file, None)?;
    let pages = doc.pages();

    for i in 0..pages.count() {
        let page = pages.get(i)?;
        let size = page.size() * (DPI / 72.0);

        let width = size.x.round() as u32;
        let height = size.y.round() as u32;

        let mut bmp = Bitmap::filled(lib.clone(), width, height, BitmapFormat::Bgra, Color::WHITE)?;

        // pdfium renders BGRA, the image crate wants RGBA
        let flags = RenderFlags::Annotations | RenderFlags::ReverseByteOrder;
        page.render(&mut bmp, &PageRenderLayout::full_page(width, height), flags);

        let pixels: Vec<u8> = bmp.rows().flatten().copied().collect();
        let img = image::RgbaImage::from_raw(width, height, pixels).expect("pixel buffer too small");

        let out = format!("out-{i}.png");
        img.save(&out).expect("failed to write image");
        println!("page {i}: {width}x{height} -> {out}");
    }

    Ok(())
}
