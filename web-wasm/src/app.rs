//! メインアプリケーションコンポーネント
//!
//! 状態は [`Session`] が一元的に持つ。ボタン操作は `begin` で受け付け、
//! 非同期処理を `spawn_local` で走らせてから `finish` で反映する。
//! リセット後に届いた結果は `finish` が破棄する。

use crate::api::diagnosis::FetchDiagnosisClient;
use crate::components::{
    camera_view::{CameraView, Preview},
    control_bar::ControlBar,
    header::Header,
    result_view::ResultView,
    share_buttons::ShareButtons,
    status::{BusyIndicator, MessageBanner},
};
use crate::config;
use crate::export::result_image;
use crate::media::camera::{BrowserCamera, BrowserStream};
use crate::media::file::BrowserFile;
use facescan_common::capture::open_with_fallback;
use facescan_common::data_url::is_image_mime;
use facescan_common::policy::ResultStyle;
use facescan_common::{
    Action, AppConfig, Completion, Controls, DeviceClass, DiagnosisService, Effect, Error, ErrorKind,
    LiveStream, Mode, PickedFile, ResultLayout, Session, ShareAction, ShareTarget, Step, Ticket,
};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 画面全体で共有するハンドル（すべて Copy）
#[derive(Clone, Copy)]
struct Handles {
    session: RwSignal<Session>,
    stream: StoredValue<Option<BrowserStream>, LocalStorage>,
    config: StoredValue<AppConfig>,
    message: RwSignal<Option<String>>,
    result_image: RwSignal<Option<String>>,
    video_ref: NodeRef<html::Video>,
}

impl Handles {
    /// エラーを利用者に伝える。無視してよいものはログだけ
    fn report(self, error: Error) {
        if error.kind() == ErrorKind::Ignored {
            gloo::console::debug!(format!("ignored: {}", error));
            return;
        }
        gloo::console::error!(format!("{}", error));
        if let Some(text) = error.user_message() {
            if error.kind() == ErrorKind::Capability {
                gloo::dialogs::alert(text);
            }
            self.message.set(Some(text.to_string()));
        }
    }

    fn release_camera(self) {
        self.stream.update_value(|stream| {
            if let Some(mut stream) = stream.take() {
                stream.stop();
            }
        });
    }

    fn reset(self) {
        let report = self.session.try_update(|s| s.reset()).unwrap_or_default();
        if let Some(action) = report.cancelled {
            gloo::console::debug!(format!("cancelled: {:?}", action));
        }
        self.release_camera();
        self.result_image.set(None);
        self.message.set(None);
    }

    /// 操作を受け付け、必要なら非同期処理を開始する
    fn dispatch(self, action: Action) {
        if action == Action::Reset {
            self.reset();
            return;
        }
        self.message.set(None);
        match self.session.try_update(|s| s.begin(action)) {
            Some(Ok(Step::Await(ticket))) => spawn_local(self.run(ticket)),
            Some(Ok(Step::Done(_))) => {
                if !self.session.with_untracked(|s| s.camera_live()) {
                    self.release_camera();
                }
            }
            None => {}
            Some(Err(e)) => self.report(e),
        }
    }

    async fn run(self, ticket: Ticket) {
        match ticket.task() {
            Effect::OpenCamera => self.open_camera(ticket).await,
            Effect::GrabFrame => {
                let outcome = match self.stream.get_value() {
                    Some(mut stream) => {
                        let settings = self.config.with_value(|c| c.capture.clone());
                        stream.grab_frame(&settings).await.map(Completion::Image)
                    }
                    None => Err(Error::CameraUnavailable("stream not open".into())),
                };
                self.finish(ticket, outcome);
            }
            Effect::PostDiagnosis => {
                let outcome = match ticket.image() {
                    Some(image) => {
                        let client = self.config.with_value(|c| FetchDiagnosisClient::new(&c.diagnosis));
                        client.diagnose(image).await.map(Completion::Diagnosis)
                    }
                    None => Err(Error::NoImage),
                };
                if let Some(Mode::Result) = self.finish(ticket, outcome) {
                    self.render_result_image();
                }
            }
            _ => {
                let mode = self.session.with_untracked(|s| s.mode());
                let action = ticket.action();
                self.finish(ticket, Err(Error::InvalidTransition { mode, action }));
            }
        }
    }

    /// ストリームは finish が通ったときだけ保持する。破棄済みなら即停止
    async fn open_camera(self, ticket: Ticket) {
        let Some(video) = self.video_ref.get_untracked() else {
            self.finish(ticket, Err(Error::CameraUnavailable("video element missing".into())));
            return;
        };
        let mut camera = BrowserCamera::new(video);
        match open_with_fallback(&mut camera).await {
            Ok(mut stream) => match self.session.try_update(|s| s.finish(ticket, Ok(Completion::CameraOpened))) {
                Some(Ok(_)) => self.stream.set_value(Some(stream)),
                other => {
                    stream.stop();
                    if let Some(Err(e)) = other {
                        self.report(e);
                    }
                }
            },
            Err(e) => {
                self.finish(ticket, Err(e));
            }
        }
    }

    fn finish(self, ticket: Ticket, outcome: facescan_common::Result<Completion>) -> Option<Mode> {
        match self.session.try_update(|s| s.finish(ticket, outcome))? {
            Ok(mode) => Some(mode),
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    /// ファイル選択。未選択なら何もしない
    fn select_file(self, file: Option<web_sys::File>) {
        let Some(file) = file.map(BrowserFile::new) else {
            return;
        };
        let mime_type = file.mime_type();
        if !mime_type.is_empty() && !is_image_mime(&mime_type) {
            self.report(Error::UnsupportedFile(format!("{} ({})", file.name(), mime_type)));
            return;
        }
        self.message.set(None);
        match self.session.try_update(|s| s.begin(Action::SelectFile)) {
            Some(Ok(Step::Await(ticket))) => spawn_local(async move {
                let outcome = file.read_data_url().await.map(Completion::Image);
                self.finish(ticket, outcome);
            }),
            Some(Ok(Step::Done(_))) | None => {}
            Some(Err(e)) => self.report(e),
        }
    }

    fn render_result_image(self) {
        if self.config.with_value(|c| c.ui.result_style) != ResultStyle::Canvas {
            return;
        }
        let text = self.session.with_untracked(|s| s.result_text().to_string());
        spawn_local(async move {
            match result_image::render(&ResultLayout::preview(), &text).await {
                Ok(url) => self.result_image.set(Some(url)),
                Err(e) => gloo::console::error!(format!("結果画像の作成に失敗: {}", e)),
            }
        });
    }

    fn save_image(self) {
        let text = self.session.with_untracked(|s| s.result_text().to_string());
        let filename = self.config.with_value(|c| c.share.download_filename.clone());
        spawn_local(async move {
            let saved = match result_image::render(&ResultLayout::share(), &text).await {
                Ok(url) => result_image::download(&url, &filename),
                Err(e) => Err(e),
            };
            if let Err(e) = saved {
                gloo::console::error!(format!("保存に失敗: {}", e));
            }
        });
    }

    fn share(self, target: ShareTarget) {
        let text = self.session.with_untracked(|s| s.result_text().to_string());
        let action = self
            .config
            .with_value(|c| c.share.compose(target, &config::page_url(), &text));
        match action {
            Ok(ShareAction::Open(url)) => {
                if let Some(window) = web_sys::window() {
                    let _ = window.open_with_url_and_target(&url, "_blank");
                }
            }
            Ok(ShareAction::Notice(notice)) => gloo::dialogs::alert(notice),
            Err(e) => self.report(e),
        }
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let app_config = config::load();
    let device = DeviceClass::from_user_agent(&config::user_agent());
    let result_style = app_config.ui.result_style;

    let handles = Handles {
        session: RwSignal::new(Session::new()),
        stream: StoredValue::new_local(None),
        config: StoredValue::new(app_config),
        message: RwSignal::new(None),
        result_image: RwSignal::new(None),
        video_ref: NodeRef::new(),
    };
    let file_ref = NodeRef::<html::Input>::new();
    let session = handles.session;

    let mode = Memo::new(move |_| session.with(|s| s.mode()));
    let busy = Memo::new(move |_| session.with(|s| s.is_busy()));
    let pending = Memo::new(move |_| session.with(|s| s.pending().map(|p| p.action)));
    let image = Memo::new(move |_| session.with(|s| s.image().map(|i| i.as_str().to_string())));
    let result_text = Memo::new(move |_| session.with(|s| s.result_text().to_string()));
    let controls = Memo::new(move |_| {
        let mode = mode.get();
        handles
            .config
            .with_value(|c| Controls::for_state(mode, device, &c.ui, &c.share.targets))
    });
    let show_video = Memo::new(move |_| controls.with(|c| c.video));
    let show_preview = Memo::new(move |_| if controls.with(|c| c.preview) { image.get() } else { None });

    let on_action = Callback::new(move |action: Action| {
        if action == Action::SelectFile {
            // ファイルダイアログを開き、選択は on:change で受け取る
            if let Some(input) = file_ref.get_untracked() {
                input.click();
            }
            return;
        }
        handles.dispatch(action);
    });
    let on_file_change = move |_| {
        let Some(input) = file_ref.get_untracked() else {
            return;
        };
        let file = input.files().and_then(|files| files.get(0));
        // 同じファイルを続けて選んでも change が発火するように
        input.set_value("");
        handles.select_file(file);
    };
    let on_save = Callback::new(move |()| handles.save_image());
    let on_share = Callback::new(move |target: ShareTarget| handles.share(target));

    on_cleanup(move || handles.release_camera());

    view! {
        <div class="container">
            <Header />

            <MessageBanner message=handles.message />

            <CameraView video_ref=handles.video_ref visible=show_video />
            <Preview src=show_preview />

            <input
                type="file"
                accept="image/*"
                style:display="none"
                node_ref=file_ref
                on:change=on_file_change
            />

            <BusyIndicator pending=pending />

            <Show when=move || controls.with(|c| c.result)>
                <ResultView text=result_text style=result_style image=handles.result_image />
                <ShareButtons controls=controls on_save=on_save on_share=on_share />
            </Show>

            <ControlBar controls=controls mode=mode busy=busy on_action=on_action />
        </div>
    }
}
