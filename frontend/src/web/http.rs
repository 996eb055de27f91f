//! 浏览器 fetch 封装
//!
//! 使用 `web_sys::fetch` 替代 `gloo-net`。响应体一律按字节读取，
//! JSON 与 CSV 由上层决定如何解码。

use crate::error::HttpError;
use crate::request::{HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn build_failed(what: &str, e: JsValue) -> HttpError {
    HttpError::RequestBuildFailed(format!("{}: {:?}", what, e))
}

fn to_request(req: &HttpRequest) -> Result<Request, HttpError> {
    let headers = Headers::new().map_err(|e| build_failed("create headers", e))?;
    for (key, value) in &req.headers {
        headers
            .set(key, value)
            .map_err(|e| build_failed("set header", e))?;
    }

    let init = RequestInit::new();
    init.set_method(req.method.as_str());
    init.set_headers(&headers.into());
    if let Some(body) = &req.body {
        init.set_body(&JsValue::from_str(body));
    }

    Request::new_with_str_and_init(&req.url, &init).map_err(|e| build_failed("create request", e))
}

async fn read_body(resp: &Response) -> Result<Vec<u8>, HttpError> {
    let promise = resp
        .array_buffer()
        .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
    let buffer = JsFuture::from(promise)
        .await
        .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// 发送请求并读取完整响应
///
/// 只有拿不到响应时才返回错误；非 2xx 状态原样交给调用方。
pub async fn fetch(req: HttpRequest) -> Result<HttpResponse, HttpError> {
    let request = to_request(&req)?;
    let window = web_sys::window()
        .ok_or_else(|| HttpError::NetworkError("window is not available".to_string()))?;

    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| HttpError::NetworkError(format!("{:?}", e)))?;
    let resp: Response = value
        .dyn_into()
        .map_err(|e| HttpError::ResponseParseFailed(format!("not a Response: {:?}", e)))?;

    Ok(HttpResponse {
        status: resp.status(),
        body: read_body(&resp).await?,
    })
}
