use image::DynamicImage;
use tracing::warn;

use crate::app::catalog::Catalog;

pub const PLACEHOLDER_POSTER_URL: &str =
    "https://placehold.co/500x750/21262d/e6edf3?text=Image+Not+Found";

/// Downloads and decodes a poster, falling back to the placeholder image
/// when the real one is missing, unreachable or not an image.
pub fn load_poster(catalog: &dyn Catalog, poster_url: &str, placeholder_url: &str) -> Option<DynamicImage> {
    if !poster_url.trim().is_empty() {
        match download(catalog, poster_url) {
            Ok(img) => return Some(img),
            Err(e) => warn!(url = %poster_url, error = %e, "poster failed to load, using placeholder"),
        }
    }

    match download(catalog, placeholder_url) {
        Ok(img) => Some(img),
        Err(e) => {
            warn!(url = %placeholder_url, error = %e, "placeholder poster failed to load");
            None
        }
    }
}

fn download(catalog: &dyn Catalog, url: &str) -> Result<DynamicImage, Box<dyn std::error::Error>> {
    let bytes = catalog.fetch_bytes(url)?;
    let dyn_img = image::load_from_memory(&bytes)?;
    Ok(dyn_img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::catalog::fake::FakeCatalog;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn real_poster_wins_when_it_decodes() {
        let catalog = FakeCatalog::new()
            .image("https://img/p.jpg", png(2, 3))
            .image(PLACEHOLDER_POSTER_URL, png(5, 5));

        let img = load_poster(&catalog, "https://img/p.jpg", PLACEHOLDER_POSTER_URL).unwrap();
        assert_eq!((img.width(), img.height()), (2, 3));
    }

    #[test]
    fn broken_poster_falls_back_to_placeholder() {
        let catalog = FakeCatalog::new()
            .image("https://img/p.jpg", b"not an image".to_vec())
            .image(PLACEHOLDER_POSTER_URL, png(5, 5));

        let img = load_poster(&catalog, "https://img/p.jpg", PLACEHOLDER_POSTER_URL).unwrap();
        assert_eq!(img.width(), 5);
    }

    #[test]
    fn blank_url_goes_straight_to_placeholder() {
        let catalog = FakeCatalog::new().image(PLACEHOLDER_POSTER_URL, png(1, 1));

        assert!(load_poster(&catalog, "  ", PLACEHOLDER_POSTER_URL).is_some());
        assert_eq!(catalog.requests(), vec![PLACEHOLDER_POSTER_URL.to_string()]);
    }

    #[test]
    fn nothing_loads_gives_none() {
        let catalog = FakeCatalog::new();
        assert!(load_poster(&catalog, "https://img/p.jpg", PLACEHOLDER_POSTER_URL).is_none());
    }
}
