use crate::error::{DashboardError, DashboardResult};

/// Continuous linear mapping from a data domain onto a pixel range.
///
/// A zero-width domain is accepted: every input then maps to `range_start`,
/// which keeps single-valued and all-zero datasets drawable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> DashboardResult<Self> {
        validate_pair("scale domain", domain)?;
        validate_pair("scale range", range)?;
        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    /// Domain `[0, max * headroom]`, the padded shape used by every chart axis.
    ///
    /// A finite `max` whose padded end overflows saturates at `f64::MAX`.
    pub fn padded_from_zero(
        max: f64,
        headroom: f64,
        range: (f64, f64),
    ) -> DashboardResult<Self> {
        if !headroom.is_finite() || headroom < 1.0 {
            return Err(DashboardError::InvalidData(
                "scale headroom must be finite and >= 1".to_owned(),
            ));
        }
        let end = if max.is_finite() {
            (max * headroom).min(f64::MAX)
        } else {
            max
        };
        Self::new((0.0, end), range)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        if span == 0.0 {
            return self.range_start;
        }
        let normalized = (value - self.domain_start) / span;
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    /// Round-number ticks covering the domain, at most roughly `count` of them.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain_start, self.domain_end, count)
    }
}

/// Square-root mapping: output *area* grows linearly with the input.
///
/// Inputs below the domain start clamp to it, so the scale never yields a
/// value smaller than `range_start` for non-negative ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    sqrt_domain_start: f64,
    sqrt_domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> DashboardResult<Self> {
        validate_pair("sqrt scale domain", domain)?;
        validate_pair("sqrt scale range", range)?;
        if domain.0 < 0.0 || domain.1 < 0.0 {
            return Err(DashboardError::InvalidData(
                "sqrt scale domain must be >= 0".to_owned(),
            ));
        }
        Ok(Self {
            sqrt_domain_start: domain.0.sqrt(),
            sqrt_domain_end: domain.1.sqrt(),
            range_start: range.0,
            range_end: range.1,
        })
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.sqrt_domain_end - self.sqrt_domain_start;
        if span == 0.0 || !value.is_finite() {
            return self.range_start;
        }
        let normalized = (value.max(0.0).sqrt() - self.sqrt_domain_start) / span;
        self.range_start + normalized * (self.range_end - self.range_start)
    }
}

fn validate_pair(label: &str, pair: (f64, f64)) -> DashboardResult<()> {
    if !pair.0.is_finite() || !pair.1.is_finite() {
        return Err(DashboardError::InvalidData(format!(
            "{label} must be finite"
        )));
    }
    Ok(())
}

/// Step between round-number ticks (1, 2 or 5 times a power of ten).
#[must_use]
pub fn nice_tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let span = (stop - start).abs();
    if count == 0 || !span.is_finite() || span == 0.0 {
        return 0.0;
    }

    let raw_step = span / count as f64;
    let magnitude = 10.0_f64.powf(raw_step.log10().floor());
    let error = raw_step / magnitude;
    let factor = if error >= 50.0_f64.sqrt() {
        10.0
    } else if error >= 10.0_f64.sqrt() {
        5.0
    } else if error >= 2.0_f64.sqrt() {
        2.0
    } else {
        1.0
    };
    let step = factor * magnitude;
    if step.is_finite() { step } else { 0.0 }
}

/// Multiples of [`nice_tick_step`] inside `[start, stop]`, ascending.
#[must_use]
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let (low, high) = if start <= stop { (start, stop) } else { (stop, start) };
    if !low.is_finite() || !high.is_finite() {
        return Vec::new();
    }
    if low == high {
        return if count == 0 { Vec::new() } else { vec![low] };
    }

    let step = nice_tick_step(low, high, count);
    if step <= 0.0 {
        return Vec::new();
    }

    let first = (low / step).ceil() as i64;
    let last = (high / step).floor() as i64;
    (first..=last).map(|index| index as f64 * step).collect()
}

/// Smallest tick-aligned value `>= max`, for axes that must end on a label.
#[must_use]
pub fn nice_upper_bound(max: f64, count: usize) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }
    let step = nice_tick_step(0.0, max, count);
    if step <= 0.0 {
        return max;
    }
    (max / step).ceil() * step
}
