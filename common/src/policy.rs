//! 画面の表示ポリシー
//!
//! どのボタンをどの状態で出すかは製品側の方針なので、コードの分岐ではなく設定データとして持つ。

use crate::share::ShareTarget;
use crate::transition::{Action, Mode};
use serde::{Deserialize, Serialize};

/// 端末種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    /// User-Agentに "Mobi" か "Android" を含めばモバイル（大文字小文字は区別しない）
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if ua.contains("mobi") || ua.contains("android") {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

/// 状態ごとに隠す操作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenActions {
    pub mode: Mode,
    pub actions: Vec<Action>,
}

/// 結果の描き方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStyle {
    /// スロットごとの要素で表示
    #[default]
    Markup,
    /// 固定サイズのキャンバス画像で表示
    Canvas,
}

/// 表示ポリシー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiPolicy {
    /// 遷移表上は可能でもボタンを出さない操作
    pub hidden_actions: Vec<HiddenActions>,
    /// モバイルでもシェアボタンを出す
    pub share_on_mobile: bool,
    /// モバイルで「画像を長押しで保存」を出す
    pub save_hint_on_mobile: bool,
    pub result_style: ResultStyle,
}

impl Default for UiPolicy {
    fn default() -> Self {
        Self {
            // 「もう一回診断する」は結果画面だけに出す
            hidden_actions: vec![
                HiddenActions {
                    mode: Mode::Idle,
                    actions: vec![Action::Reset],
                },
                HiddenActions {
                    mode: Mode::Capturing,
                    actions: vec![Action::Reset],
                },
                HiddenActions {
                    mode: Mode::Captured,
                    actions: vec![Action::Reselect, Action::SelectFile, Action::Reset],
                },
                HiddenActions {
                    mode: Mode::FileSelected,
                    actions: vec![Action::SelectFile, Action::Reset],
                },
                HiddenActions {
                    mode: Mode::Result,
                    actions: vec![Action::Retake, Action::Reselect],
                },
            ],
            share_on_mobile: false,
            save_hint_on_mobile: true,
            result_style: ResultStyle::Markup,
        }
    }
}

impl UiPolicy {
    fn is_hidden(&self, mode: Mode, action: Action) -> bool {
        self.hidden_actions
            .iter()
            .any(|h| h.mode == mode && h.actions.contains(&action))
    }
}

pub const MOBILE_SAVE_HINT: &str = "画像を長押しで保存";

/// 画面要素の表示状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Controls {
    /// 表示する操作ボタン（遷移表の順）
    pub actions: Vec<Action>,
    /// カメラ映像
    pub video: bool,
    /// 撮影・選択画像のプレビュー
    pub preview: bool,
    /// 診断結果
    pub result: bool,
    /// 結果画像保存ボタン
    pub save_image: bool,
    pub share_targets: Vec<ShareTarget>,
    pub save_hint: Option<&'static str>,
}

impl Controls {
    /// 状態・端末・ポリシーから表示内容を決める
    pub fn for_state(mode: Mode, device: DeviceClass, policy: &UiPolicy, targets: &[ShareTarget]) -> Self {
        let actions = mode
            .allowed_actions()
            .into_iter()
            .filter(|action| !policy.is_hidden(mode, *action))
            .collect();

        let mut controls = Controls {
            actions,
            video: mode == Mode::Capturing,
            preview: mode.is_acquired(),
            result: mode == Mode::Result,
            ..Default::default()
        };

        if mode == Mode::Result {
            let show_share = device == DeviceClass::Desktop || policy.share_on_mobile;
            if show_share {
                controls.save_image = true;
                controls.share_targets = targets.to_vec();
            }
            if device == DeviceClass::Mobile && policy.save_hint_on_mobile {
                controls.save_hint = Some(MOBILE_SAVE_HINT);
            }
        }
        controls
    }

    pub fn shows(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGETS: &[ShareTarget] = &[ShareTarget::X, ShareTarget::Facebook];

    fn controls(mode: Mode, device: DeviceClass) -> Controls {
        Controls::for_state(mode, device, &UiPolicy::default(), TARGETS)
    }

    #[test]
    fn test_device_class() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
        let pixel = "Mozilla/5.0 (Linux; ANDROID 14; Pixel 8)";
        let mac = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15 Safari/605.1.15";
        assert_eq!(DeviceClass::from_user_agent(iphone), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_user_agent(pixel), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_user_agent(mac), DeviceClass::Desktop);
    }

    #[test]
    fn test_idle_controls() {
        let c = controls(Mode::Idle, DeviceClass::Desktop);
        assert_eq!(c.actions, vec![Action::Start, Action::SelectFile]);
        assert!(!c.video && !c.preview && !c.result);
    }

    #[test]
    fn test_capturing_controls() {
        let c = controls(Mode::Capturing, DeviceClass::Desktop);
        assert_eq!(c.actions, vec![Action::Capture, Action::SelectFile]);
        assert!(c.video);
    }

    #[test]
    fn test_captured_controls() {
        let c = controls(Mode::Captured, DeviceClass::Desktop);
        assert_eq!(c.actions, vec![Action::Diagnose, Action::Retake]);
        assert!(c.preview);
    }

    #[test]
    fn test_file_selected_controls() {
        let c = controls(Mode::FileSelected, DeviceClass::Desktop);
        assert_eq!(c.actions, vec![Action::Diagnose, Action::Retake, Action::Reselect]);
    }

    #[test]
    fn test_result_desktop_shares() {
        let c = controls(Mode::Result, DeviceClass::Desktop);
        assert_eq!(c.actions, vec![Action::Reset]);
        assert!(c.result && c.save_image);
        assert_eq!(c.share_targets, TARGETS.to_vec());
        assert_eq!(c.save_hint, None);
    }

    #[test]
    fn test_result_mobile_hint() {
        let c = controls(Mode::Result, DeviceClass::Mobile);
        assert!(!c.save_image);
        assert!(c.share_targets.is_empty());
        assert_eq!(c.save_hint, Some(MOBILE_SAVE_HINT));
    }

    #[test]
    fn test_policy_from_json() {
        let policy: UiPolicy = serde_json::from_str(r#"{"shareOnMobile": true, "hiddenActions": []}"#).unwrap();
        let c = Controls::for_state(Mode::Result, DeviceClass::Mobile, &policy, TARGETS);
        assert!(c.save_image);
        assert!(c.shows(Action::Retake));
        assert_eq!(c.save_hint, Some(MOBILE_SAVE_HINT));
    }

    #[test]
    fn test_reset_visibility_comes_from_policy() {
        for mode in Mode::ALL {
            assert_eq!(controls(mode, DeviceClass::Desktop).shows(Action::Reset), mode == Mode::Result);
        }

        // 隠す操作を空にすれば、どの状態でもリセットを出せる
        let policy: UiPolicy = serde_json::from_str(r#"{"hiddenActions": []}"#).unwrap();
        let c = Controls::for_state(Mode::Capturing, DeviceClass::Desktop, &policy, TARGETS);
        assert_eq!(c.actions, vec![Action::Capture, Action::SelectFile, Action::Reset]);
    }
}
