//! Fixed-width date parsing.
//!
//! NITF carries dates as fixed-width character fields whose layout depends on the file
//! version. File and image header dates are mandatory and parsed strictly. Dates in TREs
//! and text subheaders are often legitimately blank and are parsed leniently by callers
//! that want `None` instead of a failure.

use std::fmt;

use winnow::{
    error::ContextError,
    stream::AsChar,
    token::{literal, take, take_while},
    PResult, Parser,
};

#[cfg(feature = "serde")]
use serde::Serialize;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Layout of a fixed-width date field
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DatePattern {
    /// `CCYYMMDDhhmmss`, used by NITF 2.1 and NSIF 1.0 headers
    CenturyDateTime,
    /// `DDhhmmssZMONYY`, used by NITF 2.0 headers
    DayTimeMonthYear,
    /// `CCYYMMDD`
    CenturyDate,
    /// `YYMMDD`
    ShortDate,
}

impl DatePattern {
    /// Number of characters a value in this layout occupies
    pub const fn width(&self) -> usize {
        match self {
            DatePattern::CenturyDateTime | DatePattern::DayTimeMonthYear => 14,
            DatePattern::CenturyDate => 8,
            DatePattern::ShortDate => 6,
        }
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DatePattern::CenturyDateTime => "CCYYMMDDhhmmss",
            DatePattern::DayTimeMonthYear => "DDhhmmssZMONYY",
            DatePattern::CenturyDate => "CCYYMMDD",
            DatePattern::ShortDate => "YYMMDD",
        })
    }
}

/// A calendar date with an optional time of day, in UTC
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    /// Build a date, returning `None` if any component is out of range
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        let valid = (1..=12).contains(&month)
            && (1..=days_in_month(year, month)).contains(&day)
            && hour < 24
            && minute < 60
            // leap seconds
            && second <= 60;

        valid.then_some(DateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Parse `input` against `pattern`, requiring the whole input to match
    pub fn parse(input: &str, pattern: DatePattern) -> Option<Self> {
        let parsed = match pattern {
            DatePattern::CenturyDateTime => century_date_time.parse(input),
            DatePattern::DayTimeMonthYear => day_time_month_year.parse(input),
            DatePattern::CenturyDate => century_date.parse(input),
            DatePattern::ShortDate => short_date.parse(input),
        };

        parsed
            .ok()
            .and_then(|(year, month, day, hour, minute, second)| {
                DateTime::new(year, month, day, hour, minute, second)
            })
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Two digit years pivot at 1970
fn expand_year(yy: u16) -> u16 {
    if yy < 70 {
        2000 + yy
    } else {
        1900 + yy
    }
}

type Parts = (u16, u8, u8, u8, u8, u8);

fn number<'s>(width: usize) -> impl Parser<&'s str, u16, ContextError> {
    take_while(width, AsChar::is_dec_digit).parse_to::<u16>()
}

fn small<'s>(width: usize) -> impl Parser<&'s str, u8, ContextError> {
    take_while(width, AsChar::is_dec_digit).parse_to::<u8>()
}

fn month_name(input: &mut &str) -> PResult<u8> {
    take(3usize)
        .verify_map(|name: &str| {
            MONTHS
                .iter()
                .position(|m| *m == name)
                .map(|index| index as u8 + 1)
        })
        .parse_next(input)
}

fn century_date_time(input: &mut &str) -> PResult<Parts> {
    (number(4), small(2), small(2), small(2), small(2), small(2)).parse_next(input)
}

fn day_time_month_year(input: &mut &str) -> PResult<Parts> {
    let (day, hour, minute, second, _, month, year) = (
        small(2),
        small(2),
        small(2),
        small(2),
        literal("Z"),
        month_name,
        number(2),
    )
        .parse_next(input)?;

    Ok((expand_year(year), month, day, hour, minute, second))
}

fn century_date(input: &mut &str) -> PResult<Parts> {
    let (year, month, day) = (number(4), small(2), small(2)).parse_next(input)?;
    Ok((year, month, day, 0, 0, 0))
}

fn short_date(input: &mut &str) -> PResult<Parts> {
    let (year, month, day) = (number(2), small(2), small(2)).parse_next(input)?;
    Ok((expand_year(year), month, day, 0, 0, 0))
}
