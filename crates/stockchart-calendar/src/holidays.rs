//! Holiday and early-close rules.
//!
//! Rules are computed per year from fixed dates, weekday positions and the
//! Gregorian Easter date. Nothing here touches time zones; [`crate::exchange`]
//! turns the resulting local times into UTC instants.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

/// Holiday rule set attached to an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayRules {
    /// Deutsche Boerse Xetra.
    Xetra,
    /// NYSE and NASDAQ.
    UnitedStates,
    /// London Stock Exchange.
    London,
    /// Euronext Paris.
    Euronext,
}

impl HolidayRules {
    /// Check whether `date` is a full-day closure. Weekends are not holidays.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        if is_weekend(date) {
            return false;
        }
        match self {
            HolidayRules::Xetra => is_xetra_holiday(date),
            HolidayRules::UnitedStates => is_us_holiday(date),
            HolidayRules::London => is_london_holiday(date),
            HolidayRules::Euronext => is_euronext_holiday(date),
        }
    }

    /// Local closing time of a shortened session, if `date` has one.
    ///
    /// The caller decides whether `date` is a session at all.
    pub fn early_close(&self, date: NaiveDate) -> Option<NaiveTime> {
        let (month, day) = (date.month(), date.day());
        match self {
            HolidayRules::UnitedStates => {
                let day_after_thanksgiving = thanksgiving(date.year()).and_then(|d| d.succ_opt());
                if (month, day) == (7, 3)
                    || (month, day) == (12, 24)
                    || Some(date) == day_after_thanksgiving
                {
                    NaiveTime::from_hms_opt(13, 0, 0)
                } else {
                    None
                }
            }
            HolidayRules::London => match (month, day) {
                (12, 24) | (12, 31) => NaiveTime::from_hms_opt(12, 30, 0),
                _ => None,
            },
            HolidayRules::Euronext => match (month, day) {
                (12, 24) | (12, 31) => NaiveTime::from_hms_opt(14, 5, 0),
                _ => None,
            },
            HolidayRules::Xetra => None,
        }
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Easter Sunday in the Gregorian calendar (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// The `n`th (1-based) `weekday` of a month.
pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

/// The last `weekday` of a month.
pub fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let mut date = first_of_next.pred_opt()?;
    while date.weekday() != weekday {
        date = date.pred_opt()?;
    }
    Some(date)
}

fn easter_offset(date: NaiveDate, days: i64) -> bool {
    easter_sunday(date.year())
        .map(|easter| date == easter + Duration::days(days))
        .unwrap_or(false)
}

fn is_good_friday(date: NaiveDate) -> bool {
    easter_offset(date, -2)
}

fn is_easter_monday(date: NaiveDate) -> bool {
    easter_offset(date, 1)
}

fn md(date: NaiveDate) -> (u32, u32) {
    (date.month(), date.day())
}

fn is_xetra_holiday(date: NaiveDate) -> bool {
    matches!(md(date), (1, 1) | (5, 1) | (12, 24) | (12, 25) | (12, 26) | (12, 31))
        || is_good_friday(date)
        || is_easter_monday(date)
}

fn is_euronext_holiday(date: NaiveDate) -> bool {
    matches!(md(date), (1, 1) | (5, 1) | (12, 25) | (12, 26))
        || is_good_friday(date)
        || is_easter_monday(date)
}

// ---------------------------------------------------------------------------
// United States (NYSE / NASDAQ)
// ---------------------------------------------------------------------------

/// Saturday moves to Friday, Sunday to Monday.
fn us_observed(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date.pred_opt().unwrap_or(date),
        Weekday::Sun => date.succ_opt().unwrap_or(date),
        _ => date,
    }
}

fn thanksgiving(year: i32) -> Option<NaiveDate> {
    nth_weekday(year, 11, Weekday::Thu, 4)
}

/// Unscheduled closures.
const US_SPECIAL_CLOSURES: [(i32, u32, u32); 10] = [
    (2001, 9, 11),
    (2001, 9, 12),
    (2001, 9, 13),
    (2001, 9, 14),
    (2004, 6, 11),
    (2007, 1, 2),
    (2012, 10, 29),
    (2012, 10, 30),
    (2018, 12, 5),
    (2025, 1, 9),
];

fn is_us_holiday(date: NaiveDate) -> bool {
    let year = date.year();
    let on = |d: Option<NaiveDate>| d == Some(date);

    // New Year falling on Saturday is not observed on the prior Friday.
    let new_year = NaiveDate::from_ymd_opt(year, 1, 1).map(|d| match d.weekday() {
        Weekday::Sun => d.succ_opt().unwrap_or(d),
        _ => d,
    });

    on(new_year)
        || on(nth_weekday(year, 1, Weekday::Mon, 3))
        || on(nth_weekday(year, 2, Weekday::Mon, 3))
        || is_good_friday(date)
        || on(last_weekday(year, 5, Weekday::Mon))
        || (year >= 2022 && on(NaiveDate::from_ymd_opt(year, 6, 19).map(us_observed)))
        || on(NaiveDate::from_ymd_opt(year, 7, 4).map(us_observed))
        || on(nth_weekday(year, 9, Weekday::Mon, 1))
        || on(thanksgiving(year))
        || on(NaiveDate::from_ymd_opt(year, 12, 25).map(us_observed))
        || US_SPECIAL_CLOSURES
            .iter()
            .any(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d) == Some(date))
}

// ---------------------------------------------------------------------------
// United Kingdom (LSE)
// ---------------------------------------------------------------------------

/// Saturday or Sunday moves to the following Monday.
fn uk_observed(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

/// Christmas and Boxing Day substitutes.
fn uk_christmas(year: i32) -> Vec<NaiveDate> {
    let Some(christmas) = NaiveDate::from_ymd_opt(year, 12, 25) else {
        return Vec::new();
    };
    let boxing = christmas + Duration::days(1);
    match christmas.weekday() {
        // Christmas -> Mon 27, Boxing Day (Sun 26) -> Tue 28
        Weekday::Sat => vec![christmas + Duration::days(2), christmas + Duration::days(3)],
        // Christmas -> Tue 27, Boxing Day stays Mon 26
        Weekday::Sun => vec![boxing, christmas + Duration::days(2)],
        // Boxing Day on Saturday -> Mon 28
        Weekday::Fri => vec![christmas, christmas + Duration::days(3)],
        _ => vec![christmas, boxing],
    }
}

fn early_may_bank_holiday(year: i32) -> Option<NaiveDate> {
    match year {
        2020 => NaiveDate::from_ymd_opt(2020, 5, 8),
        _ => nth_weekday(year, 5, Weekday::Mon, 1),
    }
}

fn spring_bank_holiday(year: i32) -> Option<NaiveDate> {
    match year {
        2002 => NaiveDate::from_ymd_opt(2002, 6, 4),
        2012 => NaiveDate::from_ymd_opt(2012, 6, 4),
        2022 => NaiveDate::from_ymd_opt(2022, 6, 2),
        _ => last_weekday(year, 5, Weekday::Mon),
    }
}

/// One-off closures: jubilees, royal weddings and state funerals.
const UK_SPECIAL_CLOSURES: [(i32, u32, u32); 6] = [
    (2002, 6, 3),
    (2011, 4, 29),
    (2012, 6, 5),
    (2022, 6, 3),
    (2022, 9, 19),
    (2023, 5, 8),
];

fn is_london_holiday(date: NaiveDate) -> bool {
    let year = date.year();
    let on = |d: Option<NaiveDate>| d == Some(date);

    on(NaiveDate::from_ymd_opt(year, 1, 1).map(uk_observed))
        || is_good_friday(date)
        || is_easter_monday(date)
        || on(early_may_bank_holiday(year))
        || on(spring_bank_holiday(year))
        || on(last_weekday(year, 8, Weekday::Mon))
        || uk_christmas(year).contains(&date)
        || UK_SPECIAL_CLOSURES
            .iter()
            .any(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d) == Some(date))
}
