//! 診断結果の端末表示

use facescan_common::{Field, ResultCard, ShareAction, ShareSettings, Slot};
use std::fmt::Write as _;

/// 結果カードを端末向けテキストにする
pub fn render_card(card: &ResultCard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "【診断結果】");
    for field in card.fields() {
        let _ = writeln!(out, "{}", render_field(field));
    }
    out
}

fn render_field(field: &Field) -> String {
    let body = match &field.label {
        Some(label) => format!("{}: {}", label, field.value),
        None => field.value.clone(),
    };
    match field.slot {
        Slot::Headline => format!("✨ {}", body),
        Slot::Score | Slot::Age => format!("  {}", body),
        Slot::SubScore(n) => format!("  [{}] {}", n, body),
        Slot::CelebrityHeader => format!("\n{}", body),
        Slot::Celebrity => format!("  - {}", body),
        Slot::Comment => format!("\n💬 {}", body),
        Slot::Footnote => format!("\n{}", body),
    }
}

/// シェア先ごとのリンク／案内を1行ずつ
pub fn render_share(settings: &ShareSettings, page_url: &str, result_text: &str) -> facescan_common::Result<String> {
    let mut out = String::new();
    for target in &settings.targets {
        let line = match settings.compose(*target, page_url, result_text)? {
            ShareAction::Open(url) => url,
            ShareAction::Notice(notice) => notice.to_string(),
        };
        let _ = writeln!(out, "{}: {}", target.label(), line);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_card() {
        let card = ResultCard::from_text("キャッチフレーズ: 透明感\n美人度: 90\n目元\n似ている芸能人\n- 誰か\n※個人の感想です");
        let text = render_card(&card);
        assert!(text.starts_with("【診断結果】\n✨ キャッチフレーズ: 透明感\n"));
        assert!(text.contains("  美人度: 90\n"));
        assert!(text.contains("  [1] 目元\n"));
        assert!(text.contains("  - 誰か\n"));
        assert!(text.contains("※個人の感想です"));
    }

    #[test]
    fn test_render_share() {
        let settings = ShareSettings::default();
        let text = render_share(&settings, "https://example.com/", "キャッチフレーズ: A").unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Xでシェア: https://twitter.com/intent/tweet?"));
        assert!(lines[1].contains("sharer.php?u=https%3A%2F%2Fexample.com%2F"));
        assert!(lines[2].contains("Instagramアプリ"));
    }
}
