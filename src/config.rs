//! Offset configuration.
//!
//! Listing times are wall-clock times at a fixed UTC offset. The offset
//! defaults to +09:00 and can be overridden with the `YTV_UTC_OFFSET`
//! environment variable or explicitly by the caller.

use chrono::FixedOffset;
use regex::Regex;

use crate::errors::*;

pub const OFFSET_ENV_VAR: &str = "YTV_UTC_OFFSET";
pub const DEFAULT_OFFSET_HOURS: i32 = 9;

/// The default listing offset (+09:00). Computed on every call.
pub fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_OFFSET_HOURS * 3600).expect("+09:00 is a valid offset")
}

/// Parse a UTC offset such as `+09:00`, `+0900`, `+9`, `-05:30`, `Z` or `UTC`.
pub fn parse_offset(input: &str) -> Result<FixedOffset> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("z") || input.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).context("offset is invalid: UTC");
    }

    // Minutes are only allowed after a two digit hour, so `+030` is rejected.
    let re = Regex::new(r"^([+-])(?:([0-9]{2}):?([0-9]{2})|([0-9]{1,2}))$")?;
    let message = format!("offset is invalid: {}", input);
    let invalid = || Error::invalid(message.as_str());
    let caps = re.captures(input).ok_or_else(invalid)?;

    let hours = caps
        .get(2)
        .or_else(|| caps.get(4))
        .context(&message)?
        .as_str()
        .parse::<i32>()
        .context(&message)?;
    let minutes = match caps.get(3) {
        Some(m) => m.as_str().parse::<i32>().context(&message)?,
        None => 0,
    };
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    let seconds = hours * 3600 + minutes * 60;
    let seconds = if &caps[1] == "-" { -seconds } else { seconds };
    FixedOffset::east_opt(seconds).ok_or_else(invalid)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub offset: FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            offset: default_offset(),
        }
    }
}

impl Config {
    /// Read the offset from `YTV_UTC_OFFSET`, falling back to the default when unset.
    pub fn from_env() -> Result<Self> {
        Self::from_env_value(std::env::var(OFFSET_ENV_VAR).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Result<Self> {
        match value {
            Some(v) if !v.trim().is_empty() => {
                let offset = parse_offset(v)?;
                log::debug!("Using offset {} from {}", offset, OFFSET_ENV_VAR);
                Ok(Config { offset })
            }
            _ => Ok(Config::default()),
        }
    }

    /// Apply an explicit override, e.g. from a command line flag.
    pub fn with_offset_override(self, offset: Option<&str>) -> Result<Self> {
        match offset {
            Some(text) => Ok(Config {
                offset: parse_offset(text)?,
            }),
            None => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(h: i32) -> FixedOffset {
        FixedOffset::east_opt(h * 3600).unwrap()
    }

    #[test]
    fn test_default_offset_is_plus_nine() {
        assert_eq!(default_offset(), hours(9));
        assert_eq!(Config::default().offset, hours(9));
    }

    #[test]
    fn test_parse_offset_forms() {
        assert_eq!(parse_offset("+09:00").unwrap(), hours(9));
        assert_eq!(parse_offset("+0900").unwrap(), hours(9));
        assert_eq!(parse_offset("+9").unwrap(), hours(9));
        assert_eq!(parse_offset("-3").unwrap(), hours(-3));
        assert_eq!(
            parse_offset("+1030").unwrap(),
            FixedOffset::east_opt(10 * 3600 + 30 * 60).unwrap()
        );
        assert_eq!(parse_offset(" +09 ").unwrap(), hours(9));
        assert_eq!(parse_offset("Z").unwrap(), hours(0));
        assert_eq!(parse_offset("utc").unwrap(), hours(0));
        assert_eq!(
            parse_offset("-05:30").unwrap(),
            FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap()
        );
    }

    #[test]
    fn test_parse_offset_invalid() {
        for input in [
            "", "9", "+24:00", "+09:60", "JST", "+09:0", "++09", "+030", "+9:00", "+09:000",
        ] {
            let err = parse_offset(input).unwrap_err();
            assert!(err.is_invalid_argument(), "{input:?} gave {err}");
        }
    }

    #[test]
    fn test_from_env_value() {
        assert_eq!(Config::from_env_value(None).unwrap().offset, hours(9));
        assert_eq!(Config::from_env_value(Some("")).unwrap().offset, hours(9));
        assert_eq!(
            Config::from_env_value(Some("+01:00")).unwrap().offset,
            hours(1)
        );
        assert!(Config::from_env_value(Some("bogus")).is_err());
    }

    #[test]
    fn test_override_wins() {
        let config = Config::from_env_value(Some("+01:00")).unwrap();
        assert_eq!(
            config.with_offset_override(Some("-03:00")).unwrap().offset,
            hours(-3)
        );
        assert_eq!(config.with_offset_override(None).unwrap().offset, hours(1));
    }
}
