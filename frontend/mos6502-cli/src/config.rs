use anyhow::{Context, anyhow};
use mos6502_emu::CpuVariant;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    pub path: PathBuf,
    pub load_address: u16,
}

impl FromStr for ImageConfig {
    type Err = anyhow::Error;

    /// Parses `PATH@ADDRESS`, with the address in hex (optionally prefixed with `$` or `0x`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, address) =
            s.rsplit_once('@').ok_or_else(|| anyhow!("expected PATH@ADDRESS, was '{s}'"))?;
        let load_address = parse_hex_u16(address)?;

        Ok(Self { path: path.into(), load_address })
    }
}

pub fn parse_hex_u16(s: &str) -> anyhow::Result<u16> {
    let digits = s.strip_prefix('$').or_else(|| s.strip_prefix("0x")).unwrap_or(s);
    u16::from_str_radix(digits, 16).with_context(|| format!("invalid 16-bit hex address '{s}'"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub variant: CpuVariant,
    #[serde(default)]
    pub images: Vec<ImageConfig>,
    /// Written to $FFFC-$FFFD before reset if set
    #[serde(default)]
    pub reset_vector: Option<u16>,
    /// 0 means no limit
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,
    #[serde(default = "true_fn")]
    pub stop_on_self_jump: bool,
    #[serde(default)]
    pub trace: bool,
}

fn default_max_steps() -> u64 {
    DEFAULT_MAX_STEPS
}

fn true_fn() -> bool {
    true
}

impl CliConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Unable to read config file '{}'", path.display()))?;
        toml::from_str(&config_str)
            .with_context(|| format!("Unable to parse config file '{}'", path.display()))
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            variant: CpuVariant::default(),
            images: Vec::new(),
            reset_vector: None,
            max_steps: DEFAULT_MAX_STEPS,
            stop_on_self_jump: true,
            trace: false,
        }
    }
}
