//! 撮影→診断コントローラ
//!
//! [`Session`] とカメラ・診断サービスを束ね、各操作を async メソッドとして提供する。
//! `&mut self` を取るので、同じコントローラで操作が重なることはない。

use crate::capture::{open_with_fallback, Camera, CaptureSettings, LiveStream, PickedFile};
use crate::data_url::is_image_mime;
use crate::diagnosis::DiagnosisService;
use crate::error::{Error, Result};
use crate::session::{Completion, ResetReport, Session, Step, Ticket};
use crate::transition::{Action, Effect, Mode};

pub struct Controller<C: Camera, D: DiagnosisService> {
    session: Session,
    camera: C,
    stream: Option<C::Stream>,
    service: D,
    settings: CaptureSettings,
}

impl<C: Camera, D: DiagnosisService> Controller<C, D> {
    pub fn new(camera: C, service: D, settings: CaptureSettings) -> Self {
        Self {
            session: Session::new(),
            camera,
            stream: None,
            service,
            settings,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    pub fn result_text(&self) -> &str {
        self.session.result_text()
    }

    /// カメラを起動する（診断を開始）
    pub async fn start(&mut self) -> Result<Mode> {
        self.dispatch(Action::Start).await
    }

    /// 現在のフレームを撮影する
    pub async fn capture(&mut self) -> Result<Mode> {
        self.dispatch(Action::Capture).await
    }

    /// 選択されたファイルを読み込む。未選択（None）なら何もしない
    pub async fn select_file<F: PickedFile>(&mut self, file: Option<F>) -> Result<Mode> {
        let Some(file) = file else {
            return Ok(self.session.mode());
        };
        let mime_type = file.mime_type();
        if !mime_type.is_empty() && !is_image_mime(&mime_type) {
            return Err(Error::UnsupportedFile(format!("{} ({})", file.name(), mime_type)));
        }

        let ticket = match self.session.begin(Action::SelectFile)? {
            Step::Done(mode) => return Ok(mode),
            Step::Await(ticket) => ticket,
        };
        tracing::debug!(file = %file.name(), "reading selected file");
        let outcome = file.read_data_url().await.map(Completion::Image);
        self.session.finish(ticket, outcome)
    }

    /// 取得済みの画像で診断する
    pub async fn diagnose(&mut self) -> Result<Mode> {
        self.dispatch(Action::Diagnose).await
    }

    /// 画像と結果を捨てて撮影に戻る
    pub async fn retake(&mut self) -> Result<Mode> {
        self.dispatch(Action::Retake).await
    }

    /// 画像と結果を捨ててファイル選択に戻る
    pub async fn reselect(&mut self) -> Result<Mode> {
        self.dispatch(Action::Reselect).await
    }

    /// すべて破棄して初期状態へ。カメラも解放する
    pub fn reset(&mut self) -> ResetReport {
        let report = self.session.reset();
        self.release_stream();
        report
    }

    /// ファイルを伴わない操作を実行する
    pub async fn dispatch(&mut self, action: Action) -> Result<Mode> {
        if action == Action::Reset {
            self.reset();
            return Ok(self.session.mode());
        }
        match self.session.begin(action)? {
            Step::Done(mode) => {
                if !self.session.camera_live() {
                    self.release_stream();
                }
                Ok(mode)
            }
            Step::Await(ticket) => self.run(ticket).await,
        }
    }

    async fn run(&mut self, ticket: Ticket) -> Result<Mode> {
        let outcome = match ticket.task() {
            Effect::OpenCamera => self.open_stream().await.map(|_| Completion::CameraOpened),
            Effect::GrabFrame => match self.stream.as_mut() {
                Some(stream) => stream.grab_frame(&self.settings).await.map(Completion::Image),
                None => Err(Error::CameraUnavailable("ストリームがありません".into())),
            },
            Effect::PostDiagnosis => match ticket.image() {
                Some(image) => self.service.diagnose(image).await.map(Completion::Diagnosis),
                None => Err(Error::NoImage),
            },
            _ => Err(Error::InvalidTransition {
                mode: self.session.mode(),
                action: ticket.action(),
            }),
        };
        self.session.finish(ticket, outcome)
    }

    async fn open_stream(&mut self) -> Result<()> {
        if self.stream.is_none() {
            self.stream = Some(open_with_fallback(&mut self.camera).await?);
        }
        Ok(())
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!("camera stream released");
        }
    }
}

impl<C: Camera, D: DiagnosisService> Drop for Controller<C, D> {
    fn drop(&mut self) {
        self.release_stream();
    }
}
