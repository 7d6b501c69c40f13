//! FaceScan Common Library
//!
//! CLIとWeb(WASM)で共有するセッション状態・遷移表・結果分類・シェア組み立て

pub mod capture;
pub mod classify;
pub mod config;
pub mod controller;
pub mod data_url;
pub mod diagnosis;
pub mod error;
pub mod layout;
pub mod policy;
pub mod session;
pub mod share;
pub mod transition;

pub use capture::{Camera, CaptureSettings, FrameSize, LiveStream, PickedFile, VideoConstraints};
pub use classify::{classify, Field, ResultCard, Slot};
pub use config::AppConfig;
pub use controller::Controller;
pub use data_url::DataUrl;
pub use diagnosis::{DiagnosisConfig, DiagnosisService};
pub use error::{Error, ErrorKind, Result};
pub use layout::ResultLayout;
pub use policy::{Controls, DeviceClass, UiPolicy};
pub use session::{Completion, Session, Step, Ticket};
pub use share::{ShareAction, ShareSettings, ShareTarget};
pub use transition::{Action, Effect, Mode};
