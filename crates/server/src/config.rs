//! Command-line configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use sheetview_core::{Locale, ViewerConfig, DEFAULT_WORKBOOK_PATH};

/// sheetview - browse the sheets of an Excel workbook in the browser
#[derive(Parser, Debug)]
#[command(name = "sheetview-server")]
#[command(author, version, about = "Interactive Excel workbook viewer", long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Workbook opened by the "use default file" button (empty to disable)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_WORKBOOK_PATH)]
    pub default_path: String,

    /// Message language (en, ar)
    #[arg(long, default_value = "en")]
    pub lang: Locale,

    /// Largest accepted upload, in megabytes
    #[arg(long, default_value_t = 200)]
    pub max_upload_mb: usize,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn viewer_config(&self) -> ViewerConfig {
        let default_path = self.default_path.trim();
        ViewerConfig {
            default_path: (!default_path.is_empty()).then(|| PathBuf::from(default_path)),
            locale: self.lang,
        }
    }

    /// Request body limit in bytes.
    #[must_use]
    pub fn body_limit(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
