//! Runtime configuration for the layout pipeline.

use crate::error::InvalidInputKind;

/// Flow direction of the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDir {
    /// Ranks increase downward.
    TopToBottom,
    /// Ranks increase upward.
    BottomToTop,
    /// Ranks increase to the right.
    LeftToRight,
    /// Ranks increase to the left.
    RightToLeft,
}

impl RankDir {
    pub fn parse(s: &str) -> Result<Self, InvalidInputKind> {
        match s {
            "TB" => Ok(RankDir::TopToBottom),
            "BT" => Ok(RankDir::BottomToTop),
            "LR" => Ok(RankDir::LeftToRight),
            "RL" => Ok(RankDir::RightToLeft),
            other => Err(InvalidInputKind::UnknownRankDir(other.to_string())),
        }
    }
}

/// Tunables for the pipeline. Construct via [`ConfigBuilder`] or
/// `Config::default()`.
#[derive(Debug, Clone)]
pub struct Config {
    pub node_sep: f64,
    pub edge_sep: f64,
    pub universal_sep: f64,
    pub rank_sep: f64,
    pub rank_dir: RankDir,
    /// 0 = silent, 1 = per-stage timing, 2 = per-node/edge trace.
    pub debug_level: u8,
    pub order_max_sweeps: usize,
    /// Gate for the network-simplex refinement (§4.3.3). When `false`, the
    /// initial feasible ranking from §4.3.2 is used as-is.
    pub use_simplex: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_sep: 50.0,
            edge_sep: 10.0,
            universal_sep: 0.0,
            rank_sep: 50.0,
            rank_dir: RankDir::TopToBottom,
            debug_level: 0,
            order_max_sweeps: 24,
            use_simplex: true,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for [`Config`], in the same `with_*` style as the teacher crate's
/// `Edge::with_min_rank_len`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    inner: OptionalConfig,
}

#[derive(Debug, Clone, Default)]
struct OptionalConfig {
    node_sep: Option<f64>,
    edge_sep: Option<f64>,
    universal_sep: Option<f64>,
    rank_sep: Option<f64>,
    rank_dir: Option<RankDir>,
    debug_level: Option<u8>,
    order_max_sweeps: Option<usize>,
    use_simplex: Option<bool>,
}

impl ConfigBuilder {
    pub fn node_sep(mut self, v: f64) -> Self {
        self.inner.node_sep = Some(v);
        self
    }

    pub fn edge_sep(mut self, v: f64) -> Self {
        self.inner.edge_sep = Some(v);
        self
    }

    pub fn universal_sep(mut self, v: f64) -> Self {
        self.inner.universal_sep = Some(v);
        self
    }

    pub fn rank_sep(mut self, v: f64) -> Self {
        self.inner.rank_sep = Some(v);
        self
    }

    pub fn rank_dir(mut self, v: RankDir) -> Self {
        self.inner.rank_dir = Some(v);
        self
    }

    pub fn debug_level(mut self, v: u8) -> Self {
        self.inner.debug_level = Some(v);
        self
    }

    pub fn order_max_sweeps(mut self, v: usize) -> Self {
        self.inner.order_max_sweeps = Some(v);
        self
    }

    pub fn use_simplex(mut self, v: bool) -> Self {
        self.inner.use_simplex = Some(v);
        self
    }

    pub fn build(self) -> Config {
        let default = Config::default();
        Config {
            node_sep: self.inner.node_sep.unwrap_or(default.node_sep),
            edge_sep: self.inner.edge_sep.unwrap_or(default.edge_sep),
            universal_sep: self.inner.universal_sep.unwrap_or(default.universal_sep),
            rank_sep: self.inner.rank_sep.unwrap_or(default.rank_sep),
            rank_dir: self.inner.rank_dir.unwrap_or(default.rank_dir),
            debug_level: self.inner.debug_level.unwrap_or(default.debug_level),
            order_max_sweeps: self
                .inner
                .order_max_sweeps
                .unwrap_or(default.order_max_sweeps),
            use_simplex: self.inner.use_simplex.unwrap_or(default.use_simplex),
        }
    }
}
