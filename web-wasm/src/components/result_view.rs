//! 診断結果の表示

use facescan_common::policy::ResultStyle;
use facescan_common::{Field, ResultCard};
use leptos::prelude::*;

fn field_view(field: Field) -> impl IntoView {
    let class = format!("result-line {}", field.slot.css_class());
    view! {
        <p class=class>
            {field.label.map(|label| view! { <span class="result-label">{label}</span> })}
            <span class="result-value">{field.value}</span>
        </p>
    }
}

/// 結果をスロットごとの要素、またはキャンバス画像で表示する
#[component]
pub fn ResultView(
    text: Memo<String>,
    style: ResultStyle,
    image: RwSignal<Option<String>>,
) -> impl IntoView {
    let fields = Memo::new(move |_| {
        text.with(|t| ResultCard::from_text(t).fields().into_iter().cloned().collect::<Vec<Field>>())
    });

    match style {
        ResultStyle::Markup => view! {
            <div class="result-card">
                <h2 class="result-title">"【診断結果】"</h2>
                {move || fields.get().into_iter().map(field_view).collect_view()}
            </div>
        }
        .into_any(),
        ResultStyle::Canvas => view! {
            <Show
                when=move || image.with(|i| i.is_some())
                fallback=|| view! { <p class="text-muted">"結果画像を作成中..."</p> }
            >
                <img class="result-image" src=move || image.get().unwrap_or_default() alt="診断結果" />
            </Show>
        }
        .into_any(),
    }
}
