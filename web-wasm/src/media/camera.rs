//! getUserMedia によるカメラ

use super::describe_js_error;
use async_trait::async_trait;
use facescan_common::{Camera, CaptureSettings, DataUrl, Error, LiveStream, Result, VideoConstraints};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

/// 映像を `<video>` に流すカメラ
pub struct BrowserCamera {
    video: HtmlVideoElement,
}

impl BrowserCamera {
    pub fn new(video: HtmlVideoElement) -> Self {
        Self { video }
    }
}

fn constraint_value(constraints: &VideoConstraints) -> Result<JsValue> {
    if constraints.is_unconstrained() {
        return Ok(JsValue::TRUE);
    }
    serde_wasm_bindgen::to_value(constraints).map_err(|e| Error::Config(e.to_string()))
}

fn camera_error(value: JsValue) -> Error {
    match describe_js_error(&value) {
        (Some(name), text) if name == "OverconstrainedError" => Error::ConstraintRejected(text),
        (Some(name), text) => Error::CameraUnavailable(format!("{}: {}", name, text)),
        (None, text) => Error::CameraUnavailable(text),
    }
}

#[async_trait(?Send)]
impl Camera for BrowserCamera {
    type Stream = BrowserStream;

    async fn open(&mut self, constraints: VideoConstraints) -> Result<BrowserStream> {
        let window = web_sys::window().ok_or_else(|| Error::CameraUnavailable("no window".into()))?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(camera_error)?;

        let request = MediaStreamConstraints::new();
        request.set_video(&constraint_value(&constraints)?);
        let promise = devices
            .get_user_media_with_constraints(&request)
            .map_err(camera_error)?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(camera_error)?
            .dyn_into()
            .map_err(camera_error)?;

        self.video.set_muted(true);
        let _ = self.video.set_attribute("playsinline", "");
        self.video.set_src_object(Some(&stream));
        if let Ok(play) = self.video.play() {
            // 自動再生が拒否されても映像自体は取れている
            if let Err(e) = JsFuture::from(play).await {
                gloo::console::warn!("video.play() rejected", e);
            }
        }

        Ok(BrowserStream {
            stream,
            video: self.video.clone(),
        })
    }
}

/// 開いているカメラ。JSオブジェクトへの参照なので複製しても同じストリームを指す
#[derive(Clone)]
pub struct BrowserStream {
    stream: MediaStream,
    video: HtmlVideoElement,
}

impl BrowserStream {
    fn canvas(&self, width: u32, height: u32) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d)> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| Error::CameraUnavailable("no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(camera_error)?
            .dyn_into()
            .map_err(|e| camera_error(e.into()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(camera_error)?
            .ok_or_else(|| Error::CameraUnavailable("2d context unavailable".into()))?
            .dyn_into()
            .map_err(|e| camera_error(e.into()))?;
        Ok((canvas, ctx))
    }
}

#[async_trait(?Send)]
impl LiveStream for BrowserStream {
    async fn grab_frame(&mut self, settings: &CaptureSettings) -> Result<DataUrl> {
        let source = facescan_common::FrameSize::new(self.video.video_width(), self.video.video_height());
        if source.width == 0 || source.height == 0 {
            return Err(Error::CameraUnavailable("映像の準備ができていません".into()));
        }
        let size = settings.target_size(source);
        let (canvas, ctx) = self.canvas(size.width, size.height)?;
        ctx.draw_image_with_html_video_element_and_dw_and_dh(
            &self.video,
            0.0,
            0.0,
            size.width as f64,
            size.height as f64,
        )
        .map_err(camera_error)?;

        let url = canvas
            .to_data_url_with_type_and_encoder_options(&settings.mime_type, &JsValue::from_f64(settings.quality as f64))
            .map_err(|e| Error::Encode(describe_js_error(&e).1))?;
        DataUrl::parse(url)
    }

    fn stop(&mut self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        self.video.set_src_object(None);
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_user_facing_constraint_is_object() {
        let value = constraint_value(&VideoConstraints::user_facing()).expect("serialize failed");
        let facing = js_sys::Reflect::get(&value, &JsValue::from_str("facingMode")).unwrap();
        assert_eq!(facing.as_string().as_deref(), Some("user"));
    }

    #[wasm_bindgen_test]
    fn wasm_unconstrained_is_true() {
        let value = constraint_value(&VideoConstraints::any()).expect("serialize failed");
        assert_eq!(value.as_bool(), Some(true));
    }

    #[wasm_bindgen_test]
    fn wasm_overconstrained_maps_to_rejected() {
        let err = js_sys::Error::new("no such camera");
        err.set_name("OverconstrainedError");
        assert!(matches!(camera_error(err.into()), Error::ConstraintRejected(_)));

        let err = js_sys::Error::new("denied");
        err.set_name("NotAllowedError");
        assert!(matches!(camera_error(err.into()), Error::CameraUnavailable(_)));
    }
}
