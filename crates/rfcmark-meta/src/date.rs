//! Partial publication dates.

use serde::{Deserialize, Deserializer};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Publication date where every component may be missing.
///
/// RFC XML lets a draft carry only a year, or a year and a month, and the
/// renderer omits each missing attribute individually.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DocDate {
    /// Four-digit year.
    pub year: Option<u16>,
    /// Month (1-12).
    pub month: Option<u8>,
    /// Day of month (1-31).
    pub day: Option<u8>,
}

impl DocDate {
    /// English month name, as expected by the `month` attribute.
    ///
    /// ```
    /// use rfcmark_meta::DocDate;
    ///
    /// let date = DocDate { year: Some(2014), month: Some(12), day: None };
    /// assert_eq!(date.month_name(), Some("December"));
    /// ```
    #[must_use]
    pub fn month_name(&self) -> Option<&'static str> {
        let month = self.month?;
        MONTH_NAMES.get(usize::from(month).checked_sub(1)?).copied()
    }

    /// Whether no component is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }

    /// Parse `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub(crate) fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }

        let mut parts = text.splitn(3, '-');
        let year = parts
            .next()
            .map(|y| y.parse::<u16>().map_err(|_| format!("invalid year in date '{text}'")))
            .transpose()?;
        let month = parts
            .next()
            .map(|m| parse_bounded(m, 12, "month", text))
            .transpose()?;
        let day = parts
            .next()
            // Accept full RFC 3339 timestamps, keep only the date part
            .map(|d| d.split(['T', ' ']).next().unwrap_or(d))
            .map(|d| parse_bounded(d, 31, "day", text))
            .transpose()?;

        Ok(Self { year, month, day })
    }
}

fn parse_bounded(value: &str, max: u8, what: &str, text: &str) -> Result<u8, String> {
    match value.parse::<u8>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(format!("invalid {what} in date '{text}'")),
    }
}

/// Deserialize a date from either a TOML datetime or a string.
pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<DocDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<toml::Value>::deserialize(deserializer)?;
    match value {
        None => Ok(DocDate::default()),
        Some(toml::Value::Datetime(datetime)) => Ok(datetime.date.map_or_else(
            DocDate::default,
            |date| DocDate {
                year: Some(date.year),
                month: Some(date.month),
                day: Some(date.day),
            },
        )),
        Some(toml::Value::String(text)) => DocDate::parse(&text).map_err(serde::de::Error::custom),
        Some(toml::Value::Integer(year)) => u16::try_from(year)
            .map(|year| DocDate {
                year: Some(year),
                ..DocDate::default()
            })
            .map_err(|_| serde::de::Error::custom(format!("invalid year {year}"))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a date, found {}",
            other.type_str()
        ))),
    }
}
