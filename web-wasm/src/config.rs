//! ページに埋め込んだ設定の読み込み
//!
//! `<script type="application/json" id="facescan-config">{...}</script>` があればそれを使い、
//! なければ既定値。

use facescan_common::AppConfig;

const CONFIG_ELEMENT_ID: &str = "facescan-config";

pub fn load() -> AppConfig {
    let text = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|e| e.text_content());

    match text {
        Some(json) if !json.trim().is_empty() => match AppConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                gloo::console::warn!(format!("設定を読み込めませんでした（既定値を使用）: {}", e));
                AppConfig::default()
            }
        },
        _ => AppConfig::default(),
    }
}

pub fn user_agent() -> String {
    web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default()
}

pub fn page_url() -> String {
    web_sys::window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default()
}
