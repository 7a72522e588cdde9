//! Reconstruct an imported PDF from its hex form and hand it to the browser.

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::types::{AppError, AppResult};

/// Decode stored raw content (`\x`-prefixed or bare hex) into bytes.
pub fn decode_raw_content(encoded: &str) -> AppResult<Vec<u8>> {
    let trimmed = encoded.trim();
    let digits = trimmed.strip_prefix("\\x").unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| AppError::Decode(format!("Raw content is not valid hex: {}", e)))
}

/// Offer `bytes` as a PDF download named `file_name`.
pub fn download_pdf(file_name: &str, bytes: &[u8]) -> AppResult<()> {
    let js_err = |what: &str| {
        let what = what.to_string();
        move |e: wasm_bindgen::JsValue| AppError::Browser(format!("{}: {:?}", what, e))
    };

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type("application/pdf");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(js_err("Failed to create blob"))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(js_err("Failed to create object URL"))?;

    let link = gloo_utils::document()
        .create_element("a")
        .map_err(js_err("Failed to create link"))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| AppError::Browser("Created element is not an anchor".to_string()))?;
    link.set_href(&url);
    link.set_download(file_name);
    link.click();

    Url::revoke_object_url(&url).map_err(js_err("Failed to revoke object URL"))?;
    log::info!("📥 Downloaded {} ({} bytes)", file_name, bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_prefixed_hex() {
        assert_eq!(decode_raw_content("\\x25504446").unwrap(), b"%PDF".to_vec());
        assert_eq!(decode_raw_content("25504446").unwrap(), b"%PDF".to_vec());
        assert_eq!(decode_raw_content("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_rejects_bad_hex() {
        assert!(matches!(decode_raw_content("\\x2550zz"), Err(AppError::Decode(_))));
        assert!(decode_raw_content("abc").is_err());
    }
}
