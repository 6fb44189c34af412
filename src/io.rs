use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::constants::LIST_SEPARATOR;
use crate::error::{ConfigError, ConfigResult};
use crate::simulation::{Report, SimulationConfig};

/// Parse a comma-separated list of numbers, e.g. `"8192, 4096,4096"`
///
/// Blank input is an empty list. `field` names the list in error messages.
pub fn parse_list<T: FromStr>(field: &'static str, text: &str) -> ConfigResult<Vec<T>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(LIST_SEPARATOR)
        .map(|token| parse_number(field, token))
        .collect()
}

/// Parse a single number, trimming surrounding whitespace
pub fn parse_number<T: FromStr>(field: &'static str, token: &str) -> ConfigResult<T> {
    let token = token.trim();
    token.parse().map_err(|_| ConfigError::InvalidNumber {
        field,
        token: token.to_string(),
    })
}

impl SimulationConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse `key = value` lines on top of the defaults
    ///
    /// ```text
    /// # memory
    /// page_size = 4096
    /// total_memory = 16384
    /// segments = 8192, 4096, 4096
    /// algorithm = optimal
    /// pages = 1, 2, 3, 4
    /// segment_ids = 0, 0, 1, 2
    /// ```
    ///
    /// Missing keys keep their default value. The result is not validated.
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let mut config = SimulationConfig::default();

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::MalformedLine {
                    line: line_no,
                    content: raw.to_string(),
                });
            };

            match key.trim() {
                "page_size" => config.page_size = parse_number("page size", value)?,
                "total_memory" => config.total_memory = parse_number("total memory", value)?,
                "segments" | "segment_sizes" => {
                    config.segment_sizes = parse_list("segment sizes", value)?
                }
                "algorithm" => config.algorithm = value.parse()?,
                "pages" | "page_sequence" => config.access_sequence = parse_list("pages", value)?,
                "segment_ids" => config.segment_ids = parse_list("segment ids", value)?,
                other => {
                    return Err(ConfigError::UnknownKey {
                        key: other.to_string(),
                        line: line_no,
                    })
                }
            }
        }

        Ok(config)
    }
}

/// Write the textual reports, each followed by its per-access trace when
/// `with_trace` is set
pub fn write_reports<P: AsRef<Path>>(path: P, reports: &[Report], with_trace: bool) -> ConfigResult<()> {
    let mut content = String::new();
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            content.push('\n');
        }
        content.push_str(&report.to_string());
        if with_trace {
            content.push_str("\nAccess Trace:\n");
            for record in &report.trace {
                content.push_str(&record.to_string());
                content.push('\n');
            }
        }
    }
    fs::write(path.as_ref(), content).map_err(|source| ConfigError::Io {
        path: path.as_ref().display().to_string(),
        source,
    })
}
