//! カメラ映像・プレビュー

use leptos::html;
use leptos::prelude::*;

/// `<video>` は常にDOMに置き、表示だけ切り替える（ストリームの接続先を保つため）
#[component]
pub fn CameraView(video_ref: NodeRef<html::Video>, visible: Memo<bool>) -> impl IntoView {
    view! {
        <video
            class="camera-view"
            node_ref=video_ref
            style:display=move || if visible.get() { "block" } else { "none" }
        ></video>
    }
}

/// 撮影・選択した画像
#[component]
pub fn Preview(src: Memo<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || src.with(|s| s.is_some())>
            <img class="preview" src=move || src.get().unwrap_or_default() alt="プレビュー" />
        </Show>
    }
}
