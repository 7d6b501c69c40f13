//! ブラウザの画像取得手段

pub mod camera;
pub mod file;

use wasm_bindgen::JsValue;

/// JS例外の `name` と文字列表現
pub(crate) fn describe_js_error(value: &JsValue) -> (Option<String>, String) {
    let name = js_sys::Reflect::get(value, &JsValue::from_str("name"))
        .ok()
        .and_then(|v| v.as_string());
    let text = value.as_string().unwrap_or_else(|| format!("{:?}", value));
    (name, text)
}
