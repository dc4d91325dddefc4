//! Common validation utilities for campaign and donation input.

use chrono::{DateTime, Duration, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

/// Largest goal amount a campaign may ask for.
pub const MAX_GOAL_AMOUNT: u64 = 10_000_000;

/// Largest single donation accepted.
pub const MAX_DONATION_AMOUNT: u64 = 1_000_000;

/// Furthest-out campaign deadline, in days (roughly two years).
const MAX_CAMPAIGN_DURATION_DAYS: i64 = 730;

lazy_static! {
    /// http(s) URLs only; rejects javascript: and data: schemes outright.
    static ref HTTP_URL_RE: Regex =
        Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("valid URL regex");
}

/// Validates a campaign goal amount: strictly positive, capped.
pub fn validate_goal_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        let mut err = ValidationError::new("goal_amount_positive");
        err.message = Some("Goal amount must be greater than zero".into());
        return Err(err);
    }
    if *amount > Decimal::from(MAX_GOAL_AMOUNT) {
        let mut err = ValidationError::new("goal_amount_max");
        err.message = Some("Goal amount exceeds the allowed maximum".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a donation amount: strictly positive, capped.
pub fn validate_donation_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        let mut err = ValidationError::new("donation_amount_positive");
        err.message = Some("Donation amount must be greater than zero".into());
        return Err(err);
    }
    if *amount > Decimal::from(MAX_DONATION_AMOUNT) {
        let mut err = ValidationError::new("donation_amount_max");
        err.message = Some("Donation amount exceeds the allowed maximum".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a campaign end date: in the future, within the allowed horizon.
pub fn validate_end_date(end_date: &DateTime<Utc>) -> Result<(), ValidationError> {
    let now = Utc::now();

    if *end_date <= now {
        let mut err = ValidationError::new("end_date_past");
        err.message = Some("End date must be in the future".into());
        return Err(err);
    }

    if *end_date > now + Duration::days(MAX_CAMPAIGN_DURATION_DAYS) {
        let mut err = ValidationError::new("end_date_too_far");
        err.message = Some("End date is too far in the future".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a media reference is an http(s) URL.
pub fn validate_media_url(url: &str) -> Result<(), ValidationError> {
    if HTTP_URL_RE.is_match(url) {
        Ok(())
    } else {
        let mut err = ValidationError::new("media_url_format");
        err.message = Some("Media URL must be an http(s) URL".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    #[test]
    fn test_goal_amount_positive() {
        assert!(validate_goal_amount(&dec("1")).is_ok());
        assert!(validate_goal_amount(&dec("2500.50")).is_ok());
        assert!(validate_goal_amount(&dec("0")).is_err());
        assert!(validate_goal_amount(&dec("-10")).is_err());
    }

    #[test]
    fn test_goal_amount_cap() {
        assert!(validate_goal_amount(&Decimal::from(MAX_GOAL_AMOUNT)).is_ok());
        assert!(validate_goal_amount(&Decimal::from(MAX_GOAL_AMOUNT + 1)).is_err());
    }

    #[test]
    fn test_goal_amount_error_message() {
        let err = validate_goal_amount(&dec("0")).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Goal amount must be greater than zero"
        );
    }

    #[test]
    fn test_donation_amount_bounds() {
        assert!(validate_donation_amount(&dec("0.01")).is_ok());
        assert!(validate_donation_amount(&dec("100")).is_ok());
        assert!(validate_donation_amount(&dec("0")).is_err());
        assert!(validate_donation_amount(&Decimal::from(MAX_DONATION_AMOUNT + 1)).is_err());
    }

    #[test]
    fn test_end_date_must_be_future() {
        let yesterday = Utc::now() - Duration::days(1);
        assert!(validate_end_date(&yesterday).is_err());

        let next_month = Utc::now() + Duration::days(30);
        assert!(validate_end_date(&next_month).is_ok());
    }

    #[test]
    fn test_end_date_horizon() {
        let three_years = Utc::now() + Duration::days(3 * 365);
        assert!(validate_end_date(&three_years).is_err());

        let one_year = Utc::now() + Duration::days(365);
        assert!(validate_end_date(&one_year).is_ok());
    }

    #[test]
    fn test_media_url_accepts_http_and_https() {
        assert!(validate_media_url("https://cdn.example.com/img/cover.jpg").is_ok());
        assert!(validate_media_url("http://example.com/video").is_ok());
    }

    #[test]
    fn test_media_url_rejects_other_schemes() {
        assert!(validate_media_url("javascript:alert(1)").is_err());
        assert!(validate_media_url("data:text/html;base64,xyz").is_err());
        assert!(validate_media_url("ftp://example.com/file").is_err());
        assert!(validate_media_url("not a url").is_err());
    }
}
