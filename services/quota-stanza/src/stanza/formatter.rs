use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use super::aggregator::{LimitRecord, UsersLimits};
use super::error::StanzaError;

pub const STANZA_HEADER: &str = "%quota:";
pub const STANZA_COMMAND: &str = "setquota";
pub const STANZA_TYPE: &str = "USR";

/// Rendered form of one (device, user) quota entry.
#[derive(Debug, Clone, Copy)]
pub struct StanzaBlock<'a> {
    pub device: &'a str,
    pub user: &'a str,
    pub limits: &'a LimitRecord,
}

impl StanzaBlock<'_> {
    /// Header, ten tab-indented fields and the trailing blank separator.
    pub fn lines(&self) -> [String; 12] {
        let limits = self.limits;
        [
            STANZA_HEADER.to_string(),
            format!("\tdevice={}", self.device),
            format!("\tcommand={STANZA_COMMAND}"),
            format!("\ttype={STANZA_TYPE}"),
            format!("\tid={}", self.user),
            format!("\tblockQuota={}{}", limits.block_soft, limits.block_unit),
            format!("\tblockLimit={}{}", limits.block_hard, limits.block_unit),
            format!("\tblockGrace={}{}", limits.block_grace, limits.block_grace_unit),
            // consumers key on the doubled "a"
            format!("\tfilesQuotaa={}{}", limits.files_soft, limits.files_unit),
            format!("\tfilesLimit={}{}", limits.files_hard, limits.files_unit),
            format!("\tfilesGrace={}{}", limits.files_grace, limits.files_grace_unit),
            String::new(),
        ]
    }
}

/// Flattens the mapping into stanza lines, devices and users in insertion order.
pub fn render_stanza(limits: &UsersLimits) -> Vec<String> {
    let mut lines = Vec::new();
    for (device, users) in limits {
        for (user, record) in users {
            let block = StanzaBlock {
                device,
                user,
                limits: record,
            };
            lines.extend(block.lines());
        }
    }
    lines
}

/// Writes every line followed by a newline, replacing any existing file.
pub fn write_stanza_file(lines: &[String], path: &Path) -> Result<(), StanzaError> {
    let write_failed = |source| StanzaError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_failed)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{line}").map_err(write_failed)?;
    }
    writer.flush().map_err(write_failed)?;

    info!(path = %path.display(), lines = lines.len(), "wrote stanza file");
    Ok(())
}
