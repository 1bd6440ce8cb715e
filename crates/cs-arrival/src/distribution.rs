//! Per-node inter-arrival distributions.
//!
//! # Sampling contract
//!
//! [`ArrivalDistribution::sample`] always returns a finite delay of at least
//! [`MIN_DELAY_SECS`].  Parameters are sanitized whenever they are set:
//! degenerate values (`λ <= 0`, normal `μ <= 0`, `σ <= 0`, `shape <= 0`,
//! `scale <= 0`) are replaced by safe defaults with a warning.  A draw that
//! still comes out non-positive or non-finite falls back to
//! [`FALLBACK_DELAY_SECS`].
//!
//! # Parsing
//!
//! [`DistributionSpec`] is the strict external form (`kind` + parameter
//! list).  Unknown kinds, wrong arity, and non-finite parameters are
//! rejected there; only finite degenerate values reach the sanitizer.

use std::fmt;
use std::str::FromStr;

use rand_distr::{Distribution, Exp, Gamma, LogNormal, Normal, Weibull};
use serde::{Deserialize, Serialize};
use tracing::warn;

use cs_core::SimRng;

use crate::{ArrivalError, ArrivalResult};

/// Floor applied to every sampled delay, seconds.
pub const MIN_DELAY_SECS: f64 = 1e-3;

/// Delay used when a draw is not a finite number, seconds.
pub const FALLBACK_DELAY_SECS: f64 = 1.0;

// ── DistributionKind ──────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DistributionKind {
    Exponential,
    Normal,
    LogNormal,
    Gamma,
    Weibull,
}

impl DistributionKind {
    pub const ALL: [DistributionKind; 5] = [
        DistributionKind::Exponential,
        DistributionKind::Normal,
        DistributionKind::LogNormal,
        DistributionKind::Gamma,
        DistributionKind::Weibull,
    ];

    /// Number of parameters the kind takes.
    pub fn arity(self) -> usize {
        match self {
            DistributionKind::Exponential => 1,
            _ => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistributionKind::Exponential => "exponential",
            DistributionKind::Normal      => "normal",
            DistributionKind::LogNormal   => "lognormal",
            DistributionKind::Gamma       => "gamma",
            DistributionKind::Weibull     => "weibull",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionKind {
    type Err = ArrivalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exponential" | "exp" | "poisson"           => Ok(DistributionKind::Exponential),
            "normal" | "gaussian"                      => Ok(DistributionKind::Normal),
            "lognormal" | "log-normal" | "log_normal"  => Ok(DistributionKind::LogNormal),
            "gamma"                                    => Ok(DistributionKind::Gamma),
            "weibull"                                  => Ok(DistributionKind::Weibull),
            _ => Err(ArrivalError::UnknownKind(s.to_owned())),
        }
    }
}

// ── DistributionSpec ──────────────────────────────────────────────────────────

/// External, unvalidated description of a distribution.
///
/// | `kind`        | `params`          |
/// |---------------|-------------------|
/// | `exponential` | `[λ]`             |
/// | `normal`      | `[μ, σ]`          |
/// | `lognormal`   | `[μ, σ]`          |
/// | `gamma`       | `[shape, scale]`  |
/// | `weibull`     | `[shape, scale]`  |
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistributionSpec {
    pub kind:   String,
    pub params: Vec<f64>,
}

impl DistributionSpec {
    pub fn new(kind: impl Into<String>, params: Vec<f64>) -> Self {
        Self { kind: kind.into(), params }
    }

    /// Parse strictly, then sanitize degenerate values.
    pub fn build(&self) -> ArrivalResult<ArrivalDistribution> {
        let kind: DistributionKind = self.kind.parse()?;
        ArrivalDistribution::from_params(kind, &self.params)
    }
}

// ── ArrivalDistribution ───────────────────────────────────────────────────────

/// Inter-arrival delay distribution bound to one node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ArrivalDistribution {
    /// Poisson arrivals at rate `rate` per second.
    Exponential { rate: f64 },
    Normal { mean: f64, std_dev: f64 },
    /// Log-space parameters.
    LogNormal { mu: f64, sigma: f64 },
    Gamma { shape: f64, scale: f64 },
    Weibull { shape: f64, scale: f64 },
}

impl ArrivalDistribution {
    pub fn exponential(rate: f64) -> Self {
        ArrivalDistribution::Exponential { rate }.sanitized()
    }

    pub fn normal(mean: f64, std_dev: f64) -> Self {
        ArrivalDistribution::Normal { mean, std_dev }.sanitized()
    }

    pub fn log_normal(mu: f64, sigma: f64) -> Self {
        ArrivalDistribution::LogNormal { mu, sigma }.sanitized()
    }

    pub fn gamma(shape: f64, scale: f64) -> Self {
        ArrivalDistribution::Gamma { shape, scale }.sanitized()
    }

    pub fn weibull(shape: f64, scale: f64) -> Self {
        ArrivalDistribution::Weibull { shape, scale }.sanitized()
    }

    /// Build from a kind and raw parameter list.  Arity and finiteness are
    /// checked; degenerate finite values are sanitized.
    pub fn from_params(kind: DistributionKind, params: &[f64]) -> ArrivalResult<Self> {
        if params.len() != kind.arity() {
            return Err(ArrivalError::Arity {
                kind:     kind.as_str(),
                expected: kind.arity(),
                got:      params.len(),
            });
        }
        if let Some(bad) = params.iter().find(|p| !p.is_finite()) {
            return Err(ArrivalError::InvalidParameter(format!("{kind} parameter {bad} is not finite")));
        }
        Ok(match kind {
            DistributionKind::Exponential => Self::exponential(params[0]),
            DistributionKind::Normal      => Self::normal(params[0], params[1]),
            DistributionKind::LogNormal   => Self::log_normal(params[0], params[1]),
            DistributionKind::Gamma       => Self::gamma(params[0], params[1]),
            DistributionKind::Weibull     => Self::weibull(params[0], params[1]),
        })
    }

    pub fn kind(&self) -> DistributionKind {
        match self {
            ArrivalDistribution::Exponential { .. } => DistributionKind::Exponential,
            ArrivalDistribution::Normal { .. }      => DistributionKind::Normal,
            ArrivalDistribution::LogNormal { .. }   => DistributionKind::LogNormal,
            ArrivalDistribution::Gamma { .. }       => DistributionKind::Gamma,
            ArrivalDistribution::Weibull { .. }     => DistributionKind::Weibull,
        }
    }

    pub fn params(&self) -> Vec<f64> {
        match *self {
            ArrivalDistribution::Exponential { rate }          => vec![rate],
            ArrivalDistribution::Normal { mean, std_dev }      => vec![mean, std_dev],
            ArrivalDistribution::LogNormal { mu, sigma }       => vec![mu, sigma],
            ArrivalDistribution::Gamma { shape, scale }        => vec![shape, scale],
            ArrivalDistribution::Weibull { shape, scale }      => vec![shape, scale],
        }
    }

    /// Replace the parameters, keeping the kind.  Same validation as
    /// [`from_params`](Self::from_params).
    pub fn reconfigure(&mut self, params: &[f64]) -> ArrivalResult<()> {
        *self = Self::from_params(self.kind(), params)?;
        Ok(())
    }

    fn sanitized(self) -> Self {
        let fixed = match self {
            ArrivalDistribution::Exponential { rate } => ArrivalDistribution::Exponential {
                rate: positive_or(rate, 1.0),
            },
            ArrivalDistribution::Normal { mean, std_dev } => ArrivalDistribution::Normal {
                mean:    positive_or(mean, 1.0),
                std_dev: positive_or(std_dev, 1.0),
            },
            ArrivalDistribution::LogNormal { mu, sigma } => ArrivalDistribution::LogNormal {
                mu:    if mu.is_finite() { mu } else { 0.0 },
                sigma: positive_or(sigma, 1.0),
            },
            ArrivalDistribution::Gamma { shape, scale } => ArrivalDistribution::Gamma {
                shape: positive_or(shape, 1.0),
                scale: positive_or(scale, 1.0),
            },
            ArrivalDistribution::Weibull { shape, scale } => ArrivalDistribution::Weibull {
                shape: positive_or(shape, 1.0),
                scale: positive_or(scale, 1.0),
            },
        };
        if fixed != self {
            warn!(requested = %self, using = %fixed, "degenerate distribution parameters replaced");
        }
        fixed
    }

    /// Draw one inter-arrival delay in seconds.  Always finite and at least
    /// [`MIN_DELAY_SECS`]; a non-positive draw becomes [`FALLBACK_DELAY_SECS`].
    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        let raw = match *self {
            ArrivalDistribution::Exponential { rate }     => draw(Exp::new(rate), rng),
            ArrivalDistribution::Normal { mean, std_dev } => draw(Normal::new(mean, std_dev), rng),
            ArrivalDistribution::LogNormal { mu, sigma }  => draw(LogNormal::new(mu, sigma), rng),
            ArrivalDistribution::Gamma { shape, scale }   => draw(Gamma::new(shape, scale), rng),
            ArrivalDistribution::Weibull { shape, scale } => draw(Weibull::new(scale, shape), rng),
        };
        if raw.is_finite() && raw > 0.0 { raw.max(MIN_DELAY_SECS) } else { FALLBACK_DELAY_SECS }
    }

    /// Expected delay in seconds.
    pub fn mean(&self) -> f64 {
        let m = match *self {
            ArrivalDistribution::Exponential { rate }  => 1.0 / rate,
            ArrivalDistribution::Normal { mean, .. }   => mean,
            ArrivalDistribution::LogNormal { mu, sigma } => (mu + sigma * sigma / 2.0).exp(),
            ArrivalDistribution::Gamma { shape, scale }  => shape * scale,
            ArrivalDistribution::Weibull { shape, scale } => scale * gamma_fn(1.0 + 1.0 / shape),
        };
        if m.is_finite() { m.max(MIN_DELAY_SECS) } else { FALLBACK_DELAY_SECS }
    }

    /// Arrivals per second: `λ` for exponential, `1 / mean` otherwise.
    pub fn implied_rate(&self) -> f64 {
        match *self {
            ArrivalDistribution::Exponential { rate } => rate,
            _ => 1.0 / self.mean(),
        }
    }

    /// Short human-readable form, e.g. `Exponential(λ=0.50)`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArrivalDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ArrivalDistribution::Exponential { rate }     => write!(f, "Exponential(λ={rate:.2})"),
            ArrivalDistribution::Normal { mean, std_dev } => write!(f, "Normal(μ={mean:.2}, σ={std_dev:.2})"),
            ArrivalDistribution::LogNormal { mu, sigma }  => write!(f, "LogNormal(μ={mu:.2}, σ={sigma:.2})"),
            ArrivalDistribution::Gamma { shape, scale }   => write!(f, "Gamma(k={shape:.2}, θ={scale:.2})"),
            ArrivalDistribution::Weibull { shape, scale } => write!(f, "Weibull(k={shape:.2}, λ={scale:.2})"),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn positive_or(v: f64, default: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { default }
}

fn draw<D: Distribution<f64>, E>(dist: Result<D, E>, rng: &mut SimRng) -> f64 {
    match dist {
        Ok(d) => d.sample(rng.inner()),
        Err(_) => f64::NAN,
    }
}

/// Lanczos approximation of Γ(x), g = 7.
fn gamma_fn(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEF: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection: Γ(x) Γ(1 - x) = π / sin(πx)
        return std::f64::consts::PI / ((std::f64::consts::PI * x).sin() * gamma_fn(1.0 - x));
    }
    let x = x - 1.0;
    let mut a = COEF[0];
    let t = x + G + 0.5;
    for (i, c) in COEF.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    (2.0 * std::f64::consts::PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * a
}

