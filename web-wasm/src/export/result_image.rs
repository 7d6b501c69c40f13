//! 診断結果の画像化と保存
//!
//! [`ResultLayout`] の座標に従ってキャンバスへ描き、PNGのData URLにする。

use facescan_common::layout::Background;
use facescan_common::ResultLayout;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement, HtmlImageElement};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for ExportError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

fn document() -> Result<web_sys::Document, ExportError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ExportError::JsError("no document".into()))
}

/// 背景画像を読み込む。失敗したら None
async fn load_image(src: &str) -> Option<HtmlImageElement> {
    let img = HtmlImageElement::new().ok()?;
    img.set_src(src);
    match JsFuture::from(img.decode()).await {
        Ok(_) => Some(img),
        Err(e) => {
            gloo::console::warn!(format!("背景画像を読み込めません: {}", src), e);
            None
        }
    }
}

/// 結果テキストを描いたPNGのData URLを返す
pub async fn render(layout: &ResultLayout, text: &str) -> Result<String, ExportError> {
    let canvas: HtmlCanvasElement = document()?
        .create_element("canvas")?
        .dyn_into()
        .map_err(JsValue::from)?;
    canvas.set_width(layout.width);
    canvas.set_height(layout.height);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| ExportError::JsError("2d context unavailable".into()))?
        .dyn_into()
        .map_err(JsValue::from)?;

    let (w, h) = (layout.width as f64, layout.height as f64);
    match &layout.background {
        Background::Color(color) => {
            ctx.set_fill_style_str(color);
            ctx.fill_rect(0.0, 0.0, w, h);
        }
        Background::Image { src, fallback } => match load_image(src).await {
            Some(img) => ctx.draw_image_with_html_image_element_and_dw_and_dh(&img, 0.0, 0.0, w, h)?,
            None => {
                ctx.set_fill_style_str(fallback);
                ctx.fill_rect(0.0, 0.0, w, h);
            }
        },
    }

    let title = layout.title_line();
    ctx.set_fill_style_str(&layout.title_style.color);
    ctx.set_font(&layout.title_style.font);
    ctx.fill_text(title.text, title.x, title.y)?;

    ctx.set_fill_style_str(&layout.body_style.color);
    ctx.set_font(&layout.body_style.font);
    for line in layout.body_lines(text) {
        ctx.fill_text(line.text, line.x, line.y)?;
    }

    Ok(canvas.to_data_url_with_type("image/png")?)
}

/// `<a download>` をクリックして保存させる
pub fn download(data_url: &str, filename: &str) -> Result<(), ExportError> {
    let document = document()?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(JsValue::from)?;
    anchor.set_href(data_url);
    anchor.set_download(filename);

    let body = document
        .body()
        .ok_or_else(|| ExportError::JsError("no document body".into()))?;
    body.append_child(&anchor)?;
    anchor.click();
    let _ = body.remove_child(&anchor);
    Ok(())
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn wasm_render_share_layout_is_png() {
        let url = render(&ResultLayout::share(), "美人度: 90\n推定年齢: 24")
            .await
            .expect("render failed");
        assert!(url.starts_with("data:image/png;base64,"));
    }
}
