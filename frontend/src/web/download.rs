//! 文件下载模块
//!
//! 把内存中的字节包装成 Blob，借助临时 `<a download>` 触发浏览器保存。

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// 触发浏览器下载
pub fn save_bytes(filename: &str, mime: &str, bytes: &[u8]) -> Result<(), String> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));

    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| format!("{:?}", e))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|e| format!("{:?}", e))?;

    let result = click_anchor(&url, filename);
    // 无论点击是否成功都要释放对象 URL
    let _ = Url::revoke_object_url(&url);
    result
}

fn click_anchor(url: &str, filename: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| format!("{:?}", e))?
        .dyn_into()
        .map_err(|_| "created element is not an anchor".to_string())?;

    anchor.set_href(url);
    anchor.set_download(filename);
    anchor.click();
    Ok(())
}
