use core::fmt;
use core::str::FromStr;
use log::warn;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};




/// Key prefix used in configuration text, e.g.
/// `DistributionMapping.strategy = KNAPSACK`.
pub const PREFIX: &str = "DistributionMapping";




#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]


/**
 * The load balancing algorithm used to assign boxes to ranks.
 */
pub enum Strategy {
    RoundRobin,
    Knapsack,
    Sfc,
    RrSfc,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Sfc
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ROUNDROBIN" | "ROUND_ROBIN" => Ok(Strategy::RoundRobin),
            "KNAPSACK" => Ok(Strategy::Knapsack),
            "SFC" => Ok(Strategy::Sfc),
            "RRSFC" | "RR_SFC" => Ok(Strategy::RrSfc),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::RoundRobin => "ROUNDROBIN",
            Strategy::Knapsack => "KNAPSACK",
            Strategy::Sfc => "SFC",
            Strategy::RrSfc => "RRSFC",
        };
        write!(f, "{}", name)
    }
}




#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]


/**
 * The space-filling curve used to order box centroids.
 */
pub enum CurveKind {
    Hilbert,
    Morton,
}

impl Default for CurveKind {
    fn default() -> Self {
        CurveKind::Hilbert
    }
}

impl FromStr for CurveKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hilbert" => Ok(CurveKind::Hilbert),
            "morton" | "z" | "zorder" | "z-order" => Ok(CurveKind::Morton),
            _ => Err(Error::UnknownCurve(s.to_string())),
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveKind::Hilbert => write!(f, "hilbert"),
            CurveKind::Morton => write!(f, "morton"),
        }
    }
}




#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]


/**
 * Tuning for the knapsack strategy.
 *
 * `full` enables the swap refinement after the greedy pass, bounded by
 * `max_iterations` passes. `max_boxes_per_rank` caps the number of boxes a
 * bin may receive during the greedy pass.
 */
pub struct KnapsackOptions {
    pub full: bool,
    pub max_iterations: usize,
    pub max_boxes_per_rank: Option<usize>,
}

impl Default for KnapsackOptions {
    fn default() -> Self {
        Self {
            full: true,
            max_iterations: usize::MAX,
            max_boxes_per_rank: None,
        }
    }
}




#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]


/**
 * Everything that controls how a `DistributionMapping` is built. A value of
 * this type is passed to each construction; there is no process-wide
 * setting.
 *
 * - `sfc_threshold`: with the SFC strategy, box arrays with fewer than
 *   `nprocs * sfc_threshold` boxes are balanced with knapsack instead
 * - `team_size`: number of consecutive ranks forming one team; 1 disables
 *   team-aware balancing
 * - `verbose`: log the achieved efficiency of each mapping
 */
pub struct DistributionConfig {
    pub strategy: Strategy,
    pub sfc_threshold: usize,
    pub team_size: usize,
    pub curve: CurveKind,
    pub knapsack: KnapsackOptions,
    pub verbose: bool,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            sfc_threshold: 0,
            team_size: 1,
            curve: CurveKind::default(),
            knapsack: KnapsackOptions::default(),
            verbose: false,
        }
    }
}




// ============================================================================
impl DistributionConfig {


    pub fn with_strategy(strategy: Strategy) -> Self {
        Self { strategy, ..Self::default() }
    }


    /**
     * Build a configuration from already separated key-value pairs, starting
     * from the defaults. Keys may carry the `DistributionMapping.` prefix.
     * Keys that are not recognized are logged and skipped.
     */
    pub fn from_key_values<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();

        for (key, value) in pairs {
            config.set(key, value)?;
        }
        Ok(config)
    }


    /**
     * Apply a single key-value setting.
     */
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let key = key.trim();
        let value = value.trim();
        let name = key.strip_prefix(PREFIX).and_then(|k| k.strip_prefix('.')).unwrap_or(key);

        match name {
            "strategy" => self.strategy = value.parse()?,
            "sfc_threshold" | "SFC_Threshold" => self.sfc_threshold = parse_value(name, value)?,
            "team_size" | "node_size" => {
                self.team_size = parse_value(name, value)?;
                if self.team_size == 0 {
                    return Err(invalid(name, value));
                }
            }
            "curve" => self.curve = value.parse()?,
            "verbose" => self.verbose = parse_bool(name, value)?,
            "do_full_knapsack" => self.knapsack.full = parse_bool(name, value)?,
            "knapsack_nmax" => self.knapsack.max_iterations = parse_value(name, value)?,
            "max_boxes_per_rank" => self.knapsack.max_boxes_per_rank = Some(parse_value(name, value)?),
            _ => warn!("ignoring unknown configuration key {}", key),
        }
        Ok(())
    }
}

impl FromStr for DistributionConfig {
    type Err = Error;

    /**
     * Parse lines of the form `key = value`. Everything after a `#` is a
     * comment and blank lines are skipped.
     */
    fn from_str(s: &str) -> Result<Self> {
        let mut config = Self::default();

        for (n, line) in s.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();

            if line.is_empty() {
                continue;
            }
            match line.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => config.set(key, value)?,
                _ => {
                    return Err(Error::MalformedLine {
                        line: n + 1,
                        text: line.to_string(),
                    })
                }
            }
        }
        Ok(config)
    }
}




fn invalid(key: &str, value: &str) -> Error {
    Error::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| invalid(key, value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}
