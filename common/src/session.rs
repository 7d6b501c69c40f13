//! セッション状態
//!
//! 1回の撮影→診断サイクルの状態を1つの値で持つ。遷移は [`crate::transition::TABLE`] に従い、
//! 非同期処理は `begin` で発行した [`Ticket`] を `finish` に返して確定させる。
//! UI側はチケットを持ったまま await できるので、可変借用を跨がせずに済む。

use crate::data_url::DataUrl;
use crate::error::{Error, Result};
use crate::transition::{lookup, Action, Effect, Mode, Rule};

/// 非同期処理の完了内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// カメラ起動完了
    CameraOpened,
    /// 撮影またはファイル読み込みで得た画像
    Image(DataUrl),
    /// 診断APIの `result` フィールド
    Diagnosis(String),
}

/// 実行中の非同期処理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    pub action: Action,
    pub task: Effect,
}

/// `begin` の結果
#[derive(Debug)]
pub enum Step {
    /// 同期的に遷移済み
    Done(Mode),
    /// 非同期処理の完了待ち
    Await(Ticket),
}

/// 非同期処理1件分の引換券
#[derive(Debug)]
pub struct Ticket {
    rule: &'static Rule,
    task: Effect,
    generation: u64,
    image: Option<DataUrl>,
}

impl Ticket {
    pub fn action(&self) -> Action {
        self.rule.action
    }

    /// 呼び出し側が実行すべき処理
    pub fn task(&self) -> Effect {
        self.task
    }

    /// 診断に送る画像（PostDiagnosisのみ）
    pub fn image(&self) -> Option<&DataUrl> {
        self.image.as_ref()
    }
}

/// reset() で解放すべきもの
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResetReport {
    /// カメラのトラックを止める必要がある
    pub release_camera: bool,
    /// 破棄した実行中の操作
    pub cancelled: Option<Action>,
}

/// セッション状態
#[derive(Debug, Clone, Default)]
pub struct Session {
    mode: Mode,
    image: Option<DataUrl>,
    result_text: String,
    pending: Option<Pending>,
    generation: u64,
    camera_live: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn image(&self) -> Option<&DataUrl> {
        self.image.as_ref()
    }

    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn camera_live(&self) -> bool {
        self.camera_live
    }

    /// 操作を開始する
    ///
    /// `Step::Done` の後に [`Session::camera_live`] が false なら、呼び出し側はストリームを止める。
    ///
    /// - 処理中なら [`Error::Busy`]（呼び出し側は無視してよい）
    /// - 画像なしの診断は [`Error::NoImage`]（通信しない・状態も変えない）
    /// - 表にない遷移は [`Error::InvalidTransition`]
    ///
    /// Reset は [`Session::reset`] を使う。
    pub fn begin(&mut self, action: Action) -> Result<Step> {
        if action == Action::Reset {
            self.reset();
            return Ok(Step::Done(self.mode));
        }
        if self.pending.is_some() {
            tracing::debug!(?action, pending = ?self.pending, "busy; action ignored");
            return Err(Error::Busy);
        }
        if action == Action::Diagnose && self.image.is_none() {
            return Err(Error::NoImage);
        }
        let rule = lookup(self.mode, action).ok_or(Error::InvalidTransition {
            mode: self.mode,
            action,
        })?;

        let task = match rule.async_effect() {
            Some(Effect::OpenCamera) if self.camera_live => None,
            other => other,
        };

        match task {
            None => {
                self.commit(rule, None);
                Ok(Step::Done(self.mode))
            }
            Some(task) => {
                self.pending = Some(Pending { action, task });
                tracing::debug!(?action, ?task, generation = self.generation, "operation started");
                Ok(Step::Await(Ticket {
                    rule,
                    task,
                    generation: self.generation,
                    image: match task {
                        Effect::PostDiagnosis => self.image.clone(),
                        _ => None,
                    },
                }))
            }
        }
    }

    /// 非同期処理の結果を反映する
    ///
    /// 失敗時は状態を一切変えずにエラーを返す（直前の安定状態に留まる）。
    /// reset() 後に届いた完了通知は [`Error::Stale`] として捨てる。
    pub fn finish(&mut self, ticket: Ticket, outcome: Result<Completion>) -> Result<Mode> {
        if ticket.generation != self.generation {
            tracing::debug!(action = ?ticket.action(), "stale completion discarded");
            return Err(Error::Stale);
        }
        self.pending = None;

        let completion = match outcome {
            Ok(completion) => completion,
            Err(e) => {
                tracing::warn!(action = ?ticket.action(), error = %e, "operation failed");
                return Err(e);
            }
        };

        let payload = match (ticket.task, completion) {
            (Effect::OpenCamera, Completion::CameraOpened) => {
                self.camera_live = true;
                None
            }
            (Effect::GrabFrame, Completion::Image(image)) => Some(Completion::Image(image)),
            (Effect::ReadFile, Completion::Image(image)) => {
                if !image.is_image() {
                    return Err(Error::UnsupportedFile(image.mime_type().to_string()));
                }
                Some(Completion::Image(image))
            }
            (Effect::PostDiagnosis, Completion::Diagnosis(text)) => Some(Completion::Diagnosis(text)),
            _ => {
                return Err(Error::InvalidTransition {
                    mode: self.mode,
                    action: ticket.action(),
                })
            }
        };

        self.commit(ticket.rule, payload);
        Ok(self.mode)
    }

    /// どの状態からでも初期状態へ戻す
    pub fn reset(&mut self) -> ResetReport {
        let report = ResetReport {
            release_camera: self.camera_live,
            cancelled: self.pending.map(|p| p.action),
        };
        self.generation = self.generation.wrapping_add(1);
        self.mode = Mode::Idle;
        self.image = None;
        self.result_text.clear();
        self.pending = None;
        self.camera_live = false;
        tracing::debug!(?report, "session reset");
        report
    }

    fn commit(&mut self, rule: &Rule, payload: Option<Completion>) {
        if rule.has(Effect::StopCamera) {
            self.camera_live = false;
        }
        if rule.has(Effect::ClearImage) {
            self.image = None;
        }
        if rule.has(Effect::ClearResult) {
            self.result_text.clear();
        }
        match payload {
            Some(Completion::Image(image)) => self.image = Some(image),
            Some(Completion::Diagnosis(text)) => self.result_text = text,
            _ => {}
        }
        tracing::debug!(from = ?self.mode, to = ?rule.next, action = ?rule.action, "transition");
        self.mode = rule.next;
    }
}
