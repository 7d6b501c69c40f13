//! 状態遷移表
//!
//! `{mode, action} → {next, effects}` を静的な表として持つ。
//! ボタンの表示可否もこの表から導出する。

use serde::{Deserialize, Serialize};

/// セッションのモード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// 初期状態（診断開始ボタンのみ）
    #[default]
    Idle,
    /// カメラ映像を表示中
    Capturing,
    /// 撮影済み
    Captured,
    /// 画像ファイル選択済み
    FileSelected,
    /// 診断結果を表示中
    Result,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Idle,
        Mode::Capturing,
        Mode::Captured,
        Mode::FileSelected,
        Mode::Result,
    ];

    /// 診断に出せる画像を持っている状態か
    pub fn is_acquired(self) -> bool {
        matches!(self, Mode::Captured | Mode::FileSelected)
    }

    /// このモードで受け付ける操作（表の定義順）
    pub fn allowed_actions(self) -> Vec<Action> {
        TABLE
            .iter()
            .filter(|rule| rule.from.contains(&self))
            .map(|rule| rule.action)
            .collect()
    }
}

/// 利用者の操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// 診断を開始（カメラ起動）
    Start,
    /// 撮影
    Capture,
    /// 画像ファイルを参照
    SelectFile,
    /// この写真で診断
    Diagnose,
    /// 再撮影する / 写真を撮影する
    Retake,
    /// 画像を選びなおす
    Reselect,
    /// もう一回診断する（全体リセット）
    Reset,
}

impl Action {
    /// ボタン表示名
    pub fn label(self) -> &'static str {
        match self {
            Action::Start => "診断を開始",
            Action::Capture => "撮影",
            Action::SelectFile => "画像を参照",
            Action::Diagnose => "この写真で診断",
            Action::Retake => "再撮影する",
            Action::Reselect => "画像を選びなおす",
            Action::Reset => "もう一回診断する",
        }
    }

    /// 状態に応じたボタン表示名（ファイル選択後の Retake は「写真を撮影する」）
    pub fn label_in(self, mode: Mode) -> &'static str {
        match (self, mode) {
            (Action::Retake, Mode::FileSelected) => "写真を撮影する",
            _ => self.label(),
        }
    }
}

/// 遷移に伴う副作用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// カメラを開く（既に開いていれば何もしない）
    OpenCamera,
    /// カメラのトラックを停止する
    StopCamera,
    /// 映像から1フレーム取得してエンコード
    GrabFrame,
    /// 選択されたファイルを読み込む
    ReadFile,
    /// 診断APIへ送信
    PostDiagnosis,
    ClearImage,
    ClearResult,
    /// 実行中の非同期処理を破棄
    CancelPending,
}

impl Effect {
    /// 完了を待つ必要がある副作用か
    pub fn is_async(self) -> bool {
        matches!(
            self,
            Effect::OpenCamera | Effect::GrabFrame | Effect::ReadFile | Effect::PostDiagnosis
        )
    }
}

/// 遷移規則
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub from: &'static [Mode],
    pub action: Action,
    pub next: Mode,
    pub effects: &'static [Effect],
}

impl Rule {
    pub fn has(&self, effect: Effect) -> bool {
        self.effects.contains(&effect)
    }

    /// 非同期の副作用（最大1つ）
    pub fn async_effect(&self) -> Option<Effect> {
        self.effects.iter().copied().find(|e| e.is_async())
    }
}

const ACQUIRED: &[Mode] = &[Mode::Captured, Mode::FileSelected];
const ACQUIRED_OR_RESULT: &[Mode] = &[Mode::Captured, Mode::FileSelected, Mode::Result];

/// 遷移表。同じ `{mode, action}` に複数の規則を置かないこと
pub const TABLE: &[Rule] = &[
    Rule {
        from: &[Mode::Idle],
        action: Action::Start,
        next: Mode::Capturing,
        effects: &[Effect::OpenCamera],
    },
    Rule {
        from: &[Mode::Capturing],
        action: Action::Capture,
        next: Mode::Captured,
        effects: &[Effect::GrabFrame],
    },
    Rule {
        from: &[Mode::Idle, Mode::Capturing, Mode::Captured, Mode::FileSelected],
        action: Action::SelectFile,
        next: Mode::FileSelected,
        effects: &[Effect::ReadFile],
    },
    Rule {
        from: ACQUIRED,
        action: Action::Diagnose,
        next: Mode::Result,
        effects: &[Effect::PostDiagnosis],
    },
    Rule {
        from: ACQUIRED_OR_RESULT,
        action: Action::Retake,
        next: Mode::Capturing,
        effects: &[Effect::ClearImage, Effect::ClearResult, Effect::OpenCamera],
    },
    Rule {
        from: ACQUIRED_OR_RESULT,
        action: Action::Reselect,
        next: Mode::Idle,
        effects: &[Effect::StopCamera, Effect::ClearImage, Effect::ClearResult],
    },
    Rule {
        from: &Mode::ALL,
        action: Action::Reset,
        next: Mode::Idle,
        effects: &[
            Effect::CancelPending,
            Effect::StopCamera,
            Effect::ClearImage,
            Effect::ClearResult,
        ],
    },
];

/// `{mode, action}` に対応する規則を引く
pub fn lookup(mode: Mode, action: Action) -> Option<&'static Rule> {
    TABLE
        .iter()
        .find(|rule| rule.action == action && rule.from.contains(&mode))
}
