use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

/// シェアリンクに載せる既定のページURL
pub const DEFAULT_PAGE_URL: &str = "https://facescan.example.com/";

#[derive(Parser)]
#[command(name = "facescan")]
#[command(about = "顔写真診断クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（省略時は ~/.config/facescan/config.json）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像ファイルを1枚診断
    Diagnose {
        /// 画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 診断APIのURL（設定より優先）
        #[arg(short, long, env = "FACESCAN_ENDPOINT")]
        endpoint: Option<String>,

        /// サービスの返したテキストをそのまま表示
        #[arg(long)]
        raw: bool,

        /// シェア用リンクも表示
        #[arg(long)]
        share: bool,

        /// シェアリンクに載せるページURL
        #[arg(long, default_value = DEFAULT_PAGE_URL)]
        page_url: String,
    },

    /// 結果テキストをスロットに分類してJSONで出力
    Classify {
        /// 入力ファイル（省略時は標準入力）
        file: Option<PathBuf>,
    },

    /// 対話的に撮影・選択・診断
    Session {
        /// カメラ映像として使う画像
        #[arg(long)]
        camera_frame: Option<PathBuf>,

        /// シェアリンクに載せるページURL
        #[arg(long, default_value = DEFAULT_PAGE_URL)]
        page_url: String,
    },

    /// 設定を表示/編集
    Config {
        /// 診断APIのURLを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
