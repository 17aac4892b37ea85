//! Parser for the system resolver configuration (`/etc/resolv.conf`).
//!
//! The file is read exactly once at startup; its first `nameserver`
//! entry becomes the fixed upstream address for the whole process
//! lifetime. The grammar is deliberately small: `search`, `nameserver`
//! and `options` directives, plus `sortlist` which switches the parser
//! into a mode where later unrecognized lines are collected as
//! sortlist entries instead of being rejected.

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolvConfError {
    #[error("Unknown resolver directive '{directive}' on line {line}")]
    UnknownDirective { directive: String, line: usize },

    #[error("Directive '{directive}' on line {line} is missing a parameter")]
    MissingParameter { directive: String, line: usize },

    #[error("Invalid nameserver address '{address}' on line {line}")]
    InvalidNameserver { address: String, line: usize },

    #[error("No nameserver entries found in resolver configuration")]
    NoNameserver,

    #[error("Failed to read resolver configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Value of an `options` entry: a bare flag (`debug`) or a
/// `name:value` pair (`ndots:2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvOption {
    Flag,
    Value(String),
}

/// Parsed resolver configuration. Load-once, read-only thereafter.
#[derive(Debug, Clone, Default)]
pub struct ResolvConf {
    pub search: Vec<String>,
    pub nameservers: Vec<IpAddr>,
    pub sortlist: Vec<String>,
    pub options: HashMap<String, ResolvOption>,
}

impl ResolvConf {
    /// Read and parse a resolv.conf file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ResolvConfError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse resolv.conf text.
    ///
    /// Comments start at `#` and run to end of line. Every remaining
    /// non-empty line must start with a recognized directive, except
    /// after a `sortlist` directive has been seen: from then on,
    /// unrecognized lines are recorded whole as sortlist entries.
    /// Line numbers in errors are 1-based.
    pub fn parse(text: &str) -> Result<Self, ResolvConfError> {
        let mut conf = Self::default();
        let mut in_sortlist = false;

        for (index, raw_line) in text.lines().enumerate() {
            let line_no = index + 1;

            let line = match raw_line.find('#') {
                Some(pos) => &raw_line[..pos],
                None => raw_line,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut tokens = line.split_whitespace();
            // Non-empty line, so at least one token exists.
            let directive = tokens.next().unwrap_or_default();

            match directive {
                "search" => {
                    conf.search.extend(tokens.map(str::to_string));
                }
                "nameserver" => {
                    // Only the first address on the line is honored.
                    let address =
                        tokens
                            .next()
                            .ok_or_else(|| ResolvConfError::MissingParameter {
                                directive: directive.to_string(),
                                line: line_no,
                            })?;
                    let address = address.parse().map_err(|_| {
                        ResolvConfError::InvalidNameserver {
                            address: address.to_string(),
                            line: line_no,
                        }
                    })?;
                    conf.nameservers.push(address);
                }
                "options" => {
                    for token in tokens {
                        match token.split_once(':') {
                            Some((name, value)) => {
                                conf.options.insert(
                                    name.to_string(),
                                    ResolvOption::Value(value.to_string()),
                                );
                            }
                            None => {
                                conf.options.insert(token.to_string(), ResolvOption::Flag);
                            }
                        }
                    }
                }
                "sortlist" => {
                    in_sortlist = true;
                    conf.sortlist.extend(tokens.map(str::to_string));
                }
                other => {
                    if in_sortlist {
                        conf.sortlist.push(line.to_string());
                    } else {
                        return Err(ResolvConfError::UnknownDirective {
                            directive: other.to_string(),
                            line: line_no,
                        });
                    }
                }
            }
        }

        Ok(conf)
    }

    /// The upstream resolver address: the first `nameserver` entry.
    ///
    /// An empty nameserver list is an error, not a latent panic; a
    /// resolver with no upstream cannot start.
    pub fn primary_nameserver(&self) -> Result<IpAddr, ResolvConfError> {
        self.nameservers
            .first()
            .copied()
            .ok_or(ResolvConfError::NoNameserver)
    }
}
