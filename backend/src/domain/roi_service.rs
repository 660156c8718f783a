use shared::{FieldError, RoiRequest, RoiResponse};
use std::str::FromStr;
use tracing::info;

use crate::domain::error::{DomainError, DomainResult, FieldErrors};
use crate::domain::validation::non_negative;

/// How often interest is compounded per year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundingFrequency {
    Yearly,
    Quarterly,
    Monthly,
}

impl CompoundingFrequency {
    pub fn periods_per_year(&self) -> f64 {
        match self {
            CompoundingFrequency::Yearly => 1.0,
            CompoundingFrequency::Quarterly => 4.0,
            CompoundingFrequency::Monthly => 12.0,
        }
    }
}

impl FromStr for CompoundingFrequency {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yearly" | "annually" | "" => Ok(CompoundingFrequency::Yearly),
            "quarterly" => Ok(CompoundingFrequency::Quarterly),
            "monthly" => Ok(CompoundingFrequency::Monthly),
            _ => Err(FieldError::new(
                "frequency",
                "Frequency must be yearly, quarterly or monthly",
            )),
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compound interest: `principal * (1 + rate / (100 * n)) ^ (n * years)`
pub fn compound(principal: f64, rate_percent: f64, years: f64, frequency: CompoundingFrequency) -> RoiResponse {
    let n = frequency.periods_per_year();
    let final_amount = principal * (1.0 + rate_percent / (100.0 * n)).powf(n * years);
    let interest_earned = final_amount - principal;
    let roi_percentage = if principal > 0.0 {
        interest_earned / principal * 100.0
    } else {
        0.0
    };

    RoiResponse {
        final_amount: round_cents(final_amount),
        interest_earned: round_cents(interest_earned),
        roi_percentage: round_cents(roi_percentage),
    }
}

/// Stateless return-on-investment calculator
#[derive(Clone, Default)]
pub struct RoiService;

impl RoiService {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(&self, request: &RoiRequest) -> DomainResult<RoiResponse> {
        let mut errors = FieldErrors::new();
        let principal = errors.check(non_negative(
            "principal",
            request.principal.as_ref(),
            "Principal must be a positive number",
        ));
        let rate = errors.check(non_negative(
            "rate",
            request.rate.as_ref(),
            "Rate must be a positive number",
        ));
        let years = errors.check(non_negative(
            "years",
            request.years.as_ref(),
            "Years must be a positive number",
        ));
        let frequency = errors.check(CompoundingFrequency::from_str(
            request.frequency.as_deref().unwrap_or("yearly"),
        ));
        errors.into_result()?;

        match (principal, rate, years, frequency) {
            (Some(principal), Some(rate), Some(years), Some(frequency)) => {
                let result = compound(principal, rate, years, frequency);
                let finite = [result.final_amount, result.interest_earned, result.roi_percentage]
                    .iter()
                    .all(|v| v.is_finite());
                if !finite {
                    return Err(DomainError::invalid("years", "Result is too large to calculate"));
                }
                info!(
                    "ROI for {:.2} at {}% over {} years ({:?}): {:.2}",
                    principal, rate, years, frequency, result.final_amount
                );
                Ok(result)
            }
            _ => Err(DomainError::invalid("request", "Incomplete ROI request")),
        }
    }
}
