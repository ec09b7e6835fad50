//! Process-wide SIMD capability report.
//!
//! The report is resolved lazily on first access and is immutable for the
//! rest of the process. It drives tier selection for [`crate::Backend::Auto`]
//! but never changes results beyond floating-point noise.

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use crate::simd_native::SimdLevel;

/// Resolved once; `None` means the probe has not run yet.
static CAPABILITIES: OnceLock<Capabilities> = OnceLock::new();

/// Immutable descriptor of the acceleration available to this process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    tier: SimdLevel,
    lane_width: usize,
    arch: &'static str,
    features: Vec<&'static str>,
}

impl Capabilities {
    /// Probes the running CPU.
    fn detect() -> Self {
        let features = detect_features();
        let tier = select_tier(&features);
        Self {
            tier,
            lane_width: tier.lane_width(),
            arch: std::env::consts::ARCH,
            features,
        }
    }

    /// Active acceleration tier.
    #[must_use]
    pub fn tier(&self) -> SimdLevel {
        self.tier
    }

    /// Number of `f32` lanes per SIMD operation in the active tier.
    #[must_use]
    pub fn lane_width(&self) -> usize {
        self.lane_width
    }

    /// Target architecture (`x86_64`, `aarch64`, ...).
    #[must_use]
    pub fn arch(&self) -> &'static str {
        self.arch
    }

    /// CPU feature flags detected at runtime, in probe order.
    #[must_use]
    pub fn features(&self) -> &[&'static str] {
        &self.features
    }

    /// Whether `name` was among the detected feature flags.
    #[must_use]
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| *f == name)
    }

    /// True if the detected tier is not scalar.
    ///
    /// Describes the hardware; an engine built with a forced scalar backend
    /// can still run scalar kernels on an accelerated CPU.
    #[must_use]
    pub fn is_accelerated(&self) -> bool {
        self.tier.is_accelerated()
    }

    /// Machine-readable rendering of the report.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "tier": self.tier,
            "lane_width": self.lane_width,
            "arch": self.arch,
            "features": self.features,
            "accelerated": self.is_accelerated(),
        })
        .to_string()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lightning-simd tier={} lanes={} arch={} features={} accelerated={}",
            self.tier,
            self.lane_width,
            self.arch,
            if self.features.is_empty() {
                "none".to_string()
            } else {
                self.features.join(",")
            },
            self.is_accelerated()
        )
    }
}

#[cfg(target_arch = "x86_64")]
fn detect_features() -> Vec<&'static str> {
    let mut features = Vec::with_capacity(8);
    if is_x86_feature_detected!("sse2") {
        features.push("sse2");
    }
    if is_x86_feature_detected!("sse4.1") {
        features.push("sse4.1");
    }
    if is_x86_feature_detected!("sse4.2") {
        features.push("sse4.2");
    }
    if is_x86_feature_detected!("avx") {
        features.push("avx");
    }
    if is_x86_feature_detected!("avx2") {
        features.push("avx2");
    }
    if is_x86_feature_detected!("fma") {
        features.push("fma");
    }
    if is_x86_feature_detected!("avx512f") {
        features.push("avx512f");
    }
    features
}

#[cfg(target_arch = "aarch64")]
fn detect_features() -> Vec<&'static str> {
    let mut features = vec!["neon"];
    if std::arch::is_aarch64_feature_detected!("fp16") {
        features.push("fp16");
    }
    if std::arch::is_aarch64_feature_detected!("dotprod") {
        features.push("dotprod");
    }
    features
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn detect_features() -> Vec<&'static str> {
    Vec::new()
}

/// Picks the best tier that has kernels for the detected features.
pub(crate) fn select_tier(features: &[&'static str]) -> SimdLevel {
    let has = |name: &str| features.iter().any(|f| *f == name);
    if cfg!(target_arch = "x86_64") && has("avx2") && has("fma") {
        SimdLevel::Avx2
    } else if cfg!(target_arch = "aarch64") && has("neon") {
        SimdLevel::Neon
    } else {
        SimdLevel::Scalar
    }
}

/// Returns the process-wide capability report, probing the CPU on first call.
pub fn capabilities() -> &'static Capabilities {
    CAPABILITIES.get_or_init(|| {
        let caps = Capabilities::detect();
        if caps.is_accelerated() {
            tracing::info!(
                tier = %caps.tier,
                lanes = caps.lane_width,
                arch = caps.arch,
                "SIMD distance kernels active"
            );
        } else {
            tracing::warn!(
                arch = caps.arch,
                "No supported SIMD tier detected, using scalar distance kernels"
            );
        }
        caps
    })
}

/// Whether the capability probe has already run in this process.
#[must_use]
pub fn capabilities_resolved() -> bool {
    CAPABILITIES.get().is_some()
}

/// True if the CPU supports a non-scalar tier.
///
/// This is the hardware view. The crate-level [`crate::is_accelerated`]
/// reports what the default engine actually runs.
#[must_use]
pub fn is_accelerated() -> bool {
    capabilities().is_accelerated()
}
