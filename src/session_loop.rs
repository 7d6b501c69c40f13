//! 対話式の撮影・診断セッション
//!
//! 画面のボタンと同じく、状態ごとに押せる操作だけをメニューに出す。

use crate::device::LocalFile;
use crate::error::{FaceScanError, Result};
use crate::report;
use dialoguer::{Input, Select};
use facescan_common::{
    Action, AppConfig, Camera, Controller, Controls, DeviceClass, DiagnosisService, ErrorKind,
    Mode, ResultCard,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// メニュー項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Run(Action),
    ShowShare,
    Quit,
}

/// 状態と表示ポリシーからメニューを組み立てる
pub fn menu_items(mode: Mode, controls: &Controls) -> Vec<(String, MenuChoice)> {
    let mut items: Vec<(String, MenuChoice)> = controls
        .actions
        .iter()
        .map(|action| (action.label_in(mode).to_string(), MenuChoice::Run(*action)))
        .collect();
    if !controls.share_targets.is_empty() {
        items.push(("シェア用リンクを表示".into(), MenuChoice::ShowShare));
    }
    items.push(("終了".into(), MenuChoice::Quit));
    items
}

fn describe(mode: Mode) -> &'static str {
    match mode {
        Mode::Idle => "待機中",
        Mode::Capturing => "カメラ起動中",
        Mode::Captured => "撮影済み",
        Mode::FileSelected => "画像選択済み",
        Mode::Result => "診断結果",
    }
}

/// セッションを実行する
pub async fn run_session<C, D>(
    controller: &mut Controller<C, D>,
    config: &AppConfig,
    page_url: &str,
) -> Result<()>
where
    C: Camera,
    D: DiagnosisService,
{
    loop {
        let mode = controller.mode();
        let controls = Controls::for_state(mode, DeviceClass::Desktop, &config.ui, &config.share.targets);
        let items = menu_items(mode, &controls);
        let labels: Vec<&str> = items.iter().map(|(label, _)| label.as_str()).collect();

        println!("\n[{}]", describe(mode));
        let index = Select::new()
            .with_prompt("操作を選択")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| FaceScanError::Prompt(e.to_string()))?;

        let outcome = match items[index].1 {
            MenuChoice::Quit => break,
            MenuChoice::ShowShare => {
                print!("{}", report::render_share(&config.share, page_url, controller.result_text())?);
                continue;
            }
            MenuChoice::Run(Action::SelectFile) => {
                let path: String = Input::new()
                    .with_prompt("画像ファイルのパス（空欄でキャンセル）")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(|e| FaceScanError::Prompt(e.to_string()))?;
                let file = Some(path.trim())
                    .filter(|p| !p.is_empty())
                    .map(LocalFile::new);
                controller.select_file(file).await
            }
            MenuChoice::Run(Action::Diagnose) => {
                let spinner = spinner("診断中...");
                let outcome = controller.diagnose().await;
                spinner.finish_and_clear();
                outcome
            }
            MenuChoice::Run(action) => controller.dispatch(action).await,
        };

        match outcome {
            Ok(Mode::Result) if mode != Mode::Result => {
                println!("{}", report::render_card(&ResultCard::from_text(controller.result_text())));
            }
            Ok(next) => tracing::debug!(?mode, ?next, "transition"),
            Err(e) if e.kind() == ErrorKind::Ignored => tracing::debug!(error = %e, "ignored"),
            Err(e) => {
                tracing::warn!(error = %e, "action failed");
                println!("⚠ {}", e.user_message().map(str::to_string).unwrap_or_else(|| e.to_string()));
            }
        }
    }

    controller.reset();
    Ok(())
}

/// 処理中スピナー
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use facescan_common::{ShareTarget, UiPolicy};

    fn items(mode: Mode) -> Vec<MenuChoice> {
        let controls = Controls::for_state(mode, DeviceClass::Desktop, &UiPolicy::default(), &[ShareTarget::X]);
        menu_items(mode, &controls).into_iter().map(|(_, c)| c).collect()
    }

    #[test]
    fn test_idle_menu() {
        assert_eq!(
            items(Mode::Idle),
            vec![
                MenuChoice::Run(Action::Start),
                MenuChoice::Run(Action::SelectFile),
                MenuChoice::Quit
            ]
        );
    }

    #[test]
    fn test_result_menu_has_share() {
        assert_eq!(
            items(Mode::Result),
            vec![MenuChoice::Run(Action::Reset), MenuChoice::ShowShare, MenuChoice::Quit]
        );
    }

    #[test]
    fn test_file_selected_labels() {
        let controls = Controls::for_state(Mode::FileSelected, DeviceClass::Desktop, &UiPolicy::default(), &[]);
        let labels: Vec<String> = menu_items(Mode::FileSelected, &controls)
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert!(labels.contains(&"写真を撮影する".to_string()));
    }
}
