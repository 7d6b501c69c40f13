//! 診断結果テキストの行分類
//!
//! 1行ずつ見出し語で意味スロットに振り分ける。まず行頭の見出し語、次に芸能人欄の箇条書き、
//! 最後に部分一致の順で見て、先に一致した規則が優先される。
//! どのスロットにも当たらない行と区切り線は捨てる。
//!
//! ```text
//! キャッチフレーズ: Cool      → Headline
//! 美人度: 88                  → Score
//! 推定年齢: 24                → Age
//! A / B / C                   → SubScore(1..=3)
//! ----------------            → (区切り線・破棄)
//! 似ている芸能人              → CelebrityHeader
//! - X                         → Celebrity
//! コメント: nice              → Comment
//! ※注記                       → Footnote
//! ```

use serde::Serialize;

const HEADLINE_MARKER: &str = "キャッチフレーズ";
const SCORE_MARKER: &str = "美人度";
const AGE_MARKER: &str = "推定年齢";
const CELEBRITY_MARKER: &str = "似ている芸能人";
const COMMENT_MARKER: &str = "コメント";
const FOOTNOTE_MARKER: &str = "※";

/// 見出しなしでスコア欄に置ける行数
pub const MAX_SUB_SCORES: u8 = 3;

/// 結果スロット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    Headline,
    Score,
    Age,
    /// 1始まり
    SubScore(u8),
    CelebrityHeader,
    Celebrity,
    Comment,
    Footnote,
}

impl Slot {
    /// 描画時のCSSクラス
    pub fn css_class(self) -> &'static str {
        match self {
            Slot::Headline => "result-headline",
            Slot::Score => "result-score",
            Slot::Age => "result-age",
            Slot::SubScore(_) => "result-subscore",
            Slot::CelebrityHeader => "result-celebrity-header",
            Slot::Celebrity => "result-celebrity",
            Slot::Comment => "result-comment",
            Slot::Footnote => "result-footnote",
        }
    }
}

/// 分類済みの1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub slot: Slot,
    /// `:` より前の見出し
    pub label: Option<String>,
    pub value: String,
}

impl Field {
    /// 値の先頭の数値（"88点" → 88）
    pub fn number(&self) -> Option<u32> {
        let digits: String = self
            .value
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Scores,
    AfterSeparator,
    Celebrities,
}

/// 区切り線か（`-` `ー` `―` `=` `─` の3文字以上）
pub fn is_separator(line: &str) -> bool {
    let line = line.trim();
    line.chars().count() >= 3 && line.chars().all(|c| matches!(c, '-' | 'ー' | '―' | '=' | '─' | '━'))
}

fn bullet_body(line: &str) -> Option<&str> {
    ["- ", "-", "・", "•", "* "]
        .iter()
        .find_map(|bullet| line.strip_prefix(bullet))
        .map(str::trim)
        .filter(|body| !body.is_empty())
}

fn split_label(line: &str) -> (Option<String>, String) {
    match line.find([':', '：']) {
        Some(pos) => {
            let (label, rest) = line.split_at(pos);
            let value = rest.chars().skip(1).collect::<String>();
            (Some(label.trim().to_string()), value.trim().to_string())
        }
        None => (None, line.to_string()),
    }
}

/// 結果テキストを行ごとに分類する
///
/// 同じ入力には常に同じ出力を返す。
pub fn classify(text: &str) -> Vec<Field> {
    let mut fields = Vec::new();
    let mut section = Section::Scores;
    let mut sub_scores = 0u8;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if is_separator(line) {
            if section == Section::Scores {
                section = Section::AfterSeparator;
            }
            continue;
        }

        let field = classify_line(line, &mut section, &mut sub_scores);
        match field {
            Some(field) => fields.push(field),
            None => tracing::trace!(line, "unclassified line dropped"),
        }
    }

    fields
}

/// 箇条書き記号と括弧を外した行頭
fn line_head(line: &str) -> &str {
    let body = bullet_body(line).unwrap_or(line);
    body.trim_start_matches(['【', '[', '［', '「', '■', '◆', '●', '★'])
        .trim_start()
}

/// 見出し語が行頭にある規則。順に評価する
const PREFIX_RULES: &[(&str, Slot)] = &[
    (HEADLINE_MARKER, Slot::Headline),
    (SCORE_MARKER, Slot::Score),
    (AGE_MARKER, Slot::Age),
    (CELEBRITY_MARKER, Slot::CelebrityHeader),
    (COMMENT_MARKER, Slot::Comment),
    (FOOTNOTE_MARKER, Slot::Footnote),
];

/// 行頭で当たらなかった行だけが対象の部分一致
const CONTAINS_RULES: &[(&str, Slot)] = &[
    (HEADLINE_MARKER, Slot::Headline),
    (SCORE_MARKER, Slot::Score),
    (AGE_MARKER, Slot::Age),
    (CELEBRITY_MARKER, Slot::CelebrityHeader),
];

fn classify_line(line: &str, section: &mut Section, sub_scores: &mut u8) -> Option<Field> {
    let head = line_head(line);
    if let Some(&(_, slot)) = PREFIX_RULES.iter().find(|(marker, _)| head.starts_with(marker)) {
        return slot_field(slot, head, section);
    }
    if *section == Section::Celebrities {
        if let Some(body) = bullet_body(line) {
            return Some(Field {
                slot: Slot::Celebrity,
                label: None,
                value: body.to_string(),
            });
        }
    }
    if let Some(&(_, slot)) = CONTAINS_RULES.iter().find(|(marker, _)| line.contains(marker)) {
        return slot_field(slot, line, section);
    }
    if *section == Section::Scores && *sub_scores < MAX_SUB_SCORES {
        *sub_scores += 1;
        let (label, value) = split_label(line);
        return Some(Field {
            slot: Slot::SubScore(*sub_scores),
            label,
            value,
        });
    }
    None
}

fn slot_field(slot: Slot, line: &str, section: &mut Section) -> Option<Field> {
    match slot {
        Slot::CelebrityHeader => {
            *section = Section::Celebrities;
            Some(Field {
                slot,
                label: None,
                value: line.trim_end_matches([':', '：']).to_string(),
            })
        }
        Slot::Footnote => Some(Field {
            slot,
            label: None,
            value: line.to_string(),
        }),
        _ => labelled(slot, line),
    }
}

fn labelled(slot: Slot, line: &str) -> Option<Field> {
    let (label, value) = split_label(line);
    Some(Field { slot, label, value })
}

/// 描画用にまとめた診断結果
///
/// 1つしか持てないスロットは最初に現れた行を採用する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultCard {
    pub headline: Option<Field>,
    pub score: Option<Field>,
    pub age: Option<Field>,
    pub sub_scores: Vec<Field>,
    pub celebrity_header: Option<Field>,
    pub celebrities: Vec<Field>,
    pub comment: Option<Field>,
    pub footnote: Option<Field>,
}

impl ResultCard {
    pub fn from_text(text: &str) -> Self {
        Self::from_fields(classify(text))
    }

    pub fn from_fields(fields: Vec<Field>) -> Self {
        let mut card = Self::default();
        for field in fields {
            let slot = field.slot;
            let single = match slot {
                Slot::Headline => &mut card.headline,
                Slot::Score => &mut card.score,
                Slot::Age => &mut card.age,
                Slot::CelebrityHeader => &mut card.celebrity_header,
                Slot::Comment => &mut card.comment,
                Slot::Footnote => &mut card.footnote,
                Slot::SubScore(_) => {
                    card.sub_scores.push(field);
                    continue;
                }
                Slot::Celebrity => {
                    card.celebrities.push(field);
                    continue;
                }
            };
            if single.is_none() {
                *single = Some(field);
            }
        }
        card
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// 表示順に並べたフィールド。見つからなかったスロットは含まない
    pub fn fields(&self) -> Vec<&Field> {
        let mut out: Vec<&Field> = Vec::new();
        out.extend(self.headline.iter());
        out.extend(self.score.iter());
        out.extend(self.age.iter());
        out.extend(self.sub_scores.iter());
        out.extend(self.celebrity_header.iter());
        out.extend(self.celebrities.iter());
        out.extend(self.comment.iter());
        out.extend(self.footnote.iter());
        out
    }
}
