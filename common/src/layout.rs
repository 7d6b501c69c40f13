//! 結果画像のレイアウト
//!
//! 診断結果テキストを固定サイズのキャンバスへ1行ずつ描くための座標計算。
//! 実際の描画はWASM側（CanvasRenderingContext2d）で行う。

use serde::{Deserialize, Serialize};

/// 背景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Background {
    /// 塗りつぶし色
    Color(String),
    /// 画像パス（読み込めなければ fallback 色）
    Image { src: String, fallback: String },
}

/// 文字スタイル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// CSSフォント指定（例: "30px Arial"）
    pub font: String,
    pub color: String,
}

/// 描画する1行
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine<'a> {
    pub text: &'a str,
    pub x: f64,
    /// ベースライン
    pub y: f64,
}

/// 結果画像レイアウト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultLayout {
    pub width: u32,
    pub height: u32,
    pub background: Background,
    pub title: String,
    pub title_style: TextStyle,
    pub title_x: f64,
    pub title_y: f64,
    pub body_style: TextStyle,
    pub body_x: f64,
    pub first_line_y: f64,
    pub line_height: f64,
}

impl ResultLayout {
    /// 画面表示用（背景画像あり、600×900）
    pub fn preview() -> Self {
        Self {
            width: 600,
            height: 900,
            background: Background::Image {
                src: "background.png".into(),
                fallback: "#ffffff".into(),
            },
            title: "【診断結果】".into(),
            title_style: TextStyle {
                font: "30px Arial".into(),
                color: "#333".into(),
            },
            title_x: 40.0,
            title_y: 100.0,
            body_style: TextStyle {
                font: "30px Arial".into(),
                color: "#333".into(),
            },
            body_x: 40.0,
            first_line_y: 180.0,
            line_height: 40.0,
        }
    }

    /// 保存・シェア用（単色背景、600×900）
    pub fn share() -> Self {
        Self {
            width: 600,
            height: 900,
            background: Background::Color("#f9f9f9".into()),
            title: "Face Scan Result".into(),
            title_style: TextStyle {
                font: "28px Arial".into(),
                color: "#333".into(),
            },
            title_x: 30.0,
            title_y: 50.0,
            body_style: TextStyle {
                font: "24px Arial".into(),
                color: "#333".into(),
            },
            body_x: 30.0,
            first_line_y: 100.0,
            line_height: 40.0,
        }
    }

    pub fn title_line(&self) -> TextLine<'_> {
        TextLine {
            text: &self.title,
            x: self.title_x,
            y: self.title_y,
        }
    }

    /// 収まる本文の行数
    pub fn max_lines(&self) -> usize {
        if self.line_height <= 0.0 || self.first_line_y > self.height as f64 {
            return 0;
        }
        ((self.height as f64 - self.first_line_y) / self.line_height).floor() as usize + 1
    }

    /// 本文を改行ごとに配置する。空行も1行分進め、キャンバス外の行は落とす
    pub fn body_lines<'a>(&self, text: &'a str) -> Vec<TextLine<'a>> {
        text.split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .take(self.max_lines())
            .enumerate()
            .map(|(i, line)| TextLine {
                text: line,
                x: self.body_x,
                y: self.first_line_y + self.line_height * i as f64,
            })
            .collect()
    }
}
