//! 処理中表示とメッセージ

use facescan_common::Action;
use leptos::prelude::*;

/// 実行中の操作
#[component]
pub fn BusyIndicator(pending: Memo<Option<Action>>) -> impl IntoView {
    let text = move || match pending.get() {
        Some(Action::Diagnose) => "診断中...",
        Some(Action::Start) | Some(Action::Retake) => "カメラを起動しています...",
        Some(Action::Capture) => "撮影中...",
        Some(Action::SelectFile) => "画像を読み込んでいます...",
        _ => "",
    };
    view! {
        <Show when=move || pending.with(|p| p.is_some())>
            <div class="progress-container">
                <div class="progress-bar indeterminate">
                    <div class="progress-fill" />
                </div>
                <p class="progress-text">{text}</p>
            </div>
        </Show>
    }
}

/// エラー・案内メッセージ（クリックで閉じる）
#[component]
pub fn MessageBanner(message: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(|m| m.is_some())>
            <div class="message-banner" on:click=move |_| message.set(None)>
                {move || message.get().unwrap_or_default()}
            </div>
        </Show>
    }
}
