//! 操作ボタンコンポーネント

use facescan_common::{Action, Controls, Mode};
use leptos::prelude::*;

fn button_class(action: Action) -> &'static str {
    match action {
        Action::Start | Action::Diagnose => "btn btn-primary",
        _ => "btn btn-secondary",
    }
}

/// 現在の状態で押せる操作だけを並べる
#[component]
pub fn ControlBar(
    controls: Memo<Controls>,
    mode: Memo<Mode>,
    busy: Memo<bool>,
    on_action: Callback<Action>,
) -> impl IntoView {
    view! {
        <div class="control-bar">
            {move || {
                let mode = mode.get();
                controls
                    .get()
                    .actions
                    .into_iter()
                    .map(|action| {
                        view! {
                            <button
                                class=button_class(action)
                                disabled=move || busy.get()
                                on:click=move |_| on_action.run(action)
                            >
                                {action.label_in(mode)}
                            </button>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
