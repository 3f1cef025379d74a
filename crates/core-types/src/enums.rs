use crate::error::CoreError;
use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The sampling frequency of a series.
///
/// Parsed from the short codes used throughout the toolkit (`d`, `w`, `m`, `q`, `y`),
/// with `a` accepted as an alias for annual since that is the provider's code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    /// Number of observations in one year at this frequency.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Daily => 252,
            Frequency::Weekly => 52,
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::Annual => 1,
        }
    }

    /// The single-letter code used in derived column labels.
    pub fn code(&self) -> char {
        match self {
            Frequency::Daily => 'd',
            Frequency::Weekly => 'w',
            Frequency::Monthly => 'm',
            Frequency::Quarterly => 'q',
            Frequency::Annual => 'y',
        }
    }

    /// The last calendar day of the period containing `date`.
    ///
    /// Weekly periods end on Sunday.
    pub fn period_end(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Daily => date,
            Frequency::Weekly => {
                let days_to_sunday = (Weekday::Sun.num_days_from_monday() + 7
                    - date.weekday().num_days_from_monday())
                    % 7;
                date + chrono::Duration::days(i64::from(days_to_sunday))
            }
            Frequency::Monthly => month_end(date.year(), date.month()).unwrap_or(date),
            Frequency::Quarterly => {
                let quarter_end_month = ((date.month() - 1) / 3 + 1) * 3;
                month_end(date.year(), quarter_end_month).unwrap_or(date)
            }
            Frequency::Annual => month_end(date.year(), 12).unwrap_or(date),
        }
    }

    /// The end of the period immediately following the one that ends at `period_end`.
    pub fn next_period_end(&self, period_end: NaiveDate) -> Option<NaiveDate> {
        period_end.succ_opt().map(|next| self.period_end(next))
    }
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "daily" => Ok(Frequency::Daily),
            "w" | "weekly" => Ok(Frequency::Weekly),
            "m" | "monthly" => Ok(Frequency::Monthly),
            "q" | "quarterly" => Ok(Frequency::Quarterly),
            "y" | "a" | "annual" | "yearly" => Ok(Frequency::Annual),
            _ => Err(CoreError::UnsupportedFrequency(s.to_string())),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.code().to_string()
    }
}

/// How the provider collapses higher-frequency observations into one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AggregationMethod {
    Average,
    Sum,
    #[default]
    EndOfPeriod,
}

impl AggregationMethod {
    pub fn code(&self) -> &'static str {
        match self {
            AggregationMethod::Average => "avg",
            AggregationMethod::Sum => "sum",
            AggregationMethod::EndOfPeriod => "eop",
        }
    }
}

impl fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AggregationMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avg" | "average" => Ok(AggregationMethod::Average),
            "sum" => Ok(AggregationMethod::Sum),
            "eop" | "end_of_period" => Ok(AggregationMethod::EndOfPeriod),
            _ => Err(CoreError::UnsupportedAggregation(s.to_string())),
        }
    }
}

impl TryFrom<String> for AggregationMethod {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AggregationMethod> for String {
    fn from(value: AggregationMethod) -> Self {
        value.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("d", Frequency::Daily)]
    #[case("W", Frequency::Weekly)]
    #[case("m", Frequency::Monthly)]
    #[case("quarterly", Frequency::Quarterly)]
    #[case("y", Frequency::Annual)]
    #[case("a", Frequency::Annual)]
    fn parses_frequency_codes(#[case] input: &str, #[case] expected: Frequency) {
        assert_eq!(input.parse::<Frequency>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_frequency() {
        let err = "h".parse::<Frequency>().unwrap_err();
        assert_eq!(err, CoreError::UnsupportedFrequency("h".to_string()));
    }

    #[rstest]
    #[case(Frequency::Daily, 252)]
    #[case(Frequency::Weekly, 52)]
    #[case(Frequency::Monthly, 12)]
    #[case(Frequency::Quarterly, 4)]
    #[case(Frequency::Annual, 1)]
    fn periods_per_year_table(#[case] frequency: Frequency, #[case] expected: u32) {
        assert_eq!(frequency.periods_per_year(), expected);
    }

    #[rstest]
    #[case(Frequency::Monthly, date(2024, 2, 1), date(2024, 2, 29))]
    #[case(Frequency::Monthly, date(2023, 12, 15), date(2023, 12, 31))]
    #[case(Frequency::Quarterly, date(2023, 4, 1), date(2023, 6, 30))]
    #[case(Frequency::Quarterly, date(2023, 12, 1), date(2023, 12, 31))]
    #[case(Frequency::Annual, date(1999, 1, 1), date(1999, 12, 31))]
    #[case(Frequency::Weekly, date(2024, 1, 1), date(2024, 1, 7))]
    #[case(Frequency::Weekly, date(2024, 1, 7), date(2024, 1, 7))]
    fn maps_dates_to_period_end(
        #[case] frequency: Frequency,
        #[case] input: NaiveDate,
        #[case] expected: NaiveDate,
    ) {
        assert_eq!(frequency.period_end(input), expected);
    }

    #[test]
    fn steps_to_following_period_end() {
        let next = Frequency::Monthly.next_period_end(date(2024, 1, 31));
        assert_eq!(next, Some(date(2024, 2, 29)));
    }

    #[test]
    fn aggregation_round_trips_through_code() {
        let method: AggregationMethod = "eop".parse().unwrap();
        assert_eq!(method, AggregationMethod::EndOfPeriod);
        assert_eq!(String::from(method), "eop");
        assert!("median".parse::<AggregationMethod>().is_err());
    }
}
