//! 保存・シェアボタン

use facescan_common::{Controls, ShareTarget};
use leptos::prelude::*;

#[component]
pub fn ShareButtons(
    controls: Memo<Controls>,
    on_save: Callback<()>,
    on_share: Callback<ShareTarget>,
) -> impl IntoView {
    view! {
        <div class="share-buttons">
            <Show when=move || controls.with(|c| c.save_image)>
                <button class="btn btn-secondary" on:click=move |_| on_save.run(())>
                    "診断結果を画像で保存"
                </button>
            </Show>
            {move || {
                controls
                    .get()
                    .share_targets
                    .into_iter()
                    .map(|target| {
                        view! {
                            <button class="btn btn-share" on:click=move |_| on_share.run(target)>
                                {target.label()}
                            </button>
                        }
                    })
                    .collect_view()
            }}
            {move || controls.get().save_hint.map(|hint| view! { <p class="save-hint">{hint}</p> })}
        </div>
    }
}
