//! Time value model: clock mode, meridiem, and the selected time.
//!
//! ## Usage
//!
//! [`TimeValue`] holds the selected time in canonical 24-hour form and knows
//! how to step, format, and parse itself for either clock convention.
use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

use thiserror::Error;

/// Clock convention used to display and step the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    /// 1-12 hours with an AM/PM designator.
    #[default]
    TwelveHour,
    /// 0-23 hours, no designator.
    TwentyFourHour,
}

/// AM/PM designator used by the 12-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    /// Ante meridiem (before noon).
    Am,
    /// Post meridiem (after noon).
    Pm,
}

impl Meridiem {
    /// Returns the opposite designator.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_timepicker::time_value::Meridiem;
    ///
    /// assert_eq!(Meridiem::Am.toggled(), Meridiem::Pm);
    /// assert_eq!(Meridiem::Am.toggled().toggled(), Meridiem::Am);
    /// ```
    pub fn toggled(self) -> Self {
        match self {
            Meridiem::Am => Meridiem::Pm,
            Meridiem::Pm => Meridiem::Am,
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridiem::Am => f.write_str("AM"),
            Meridiem::Pm => f.write_str("PM"),
        }
    }
}

/// Error produced when text cannot be read back as a formatted time.
///
/// The picker treats every variant as a soft failure: the prior value is kept
/// and no error surfaces to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseTimeError {
    /// The text does not match the `H : MM` / `H : MM AM|PM` shape.
    #[error("text does not match the expected time format")]
    Malformed,
    /// The hour component is outside the legal range for the clock mode.
    #[error("hour {0} is out of range for the clock mode")]
    HourOutOfRange(u8),
    /// The minute component is outside 0-59.
    #[error("minute {0} is out of range")]
    MinuteOutOfRange(u8),
}

/// The selected time, stored canonically as hour 0-23 and minute 0-59.
///
/// The 12-hour view (display hour 1-12 plus [`Meridiem`]) is derived from the
/// canonical hour, so a value can be shown under either [`ClockMode`] without
/// conversion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeValue {
    hour: u8,
    minute: u8,
}

impl TimeValue {
    /// Creates a time value, clamping out-of-range components.
    pub fn new(hour: u8, minute: u8) -> Self {
        Self {
            hour: hour.min(23),
            minute: minute.min(59),
        }
    }

    /// Derives the UTC wall-clock time of a timestamp.
    pub fn from_timestamp(timestamp: SystemTime) -> Self {
        let secs = timestamp
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self {
            hour: ((secs / 3_600) % 24) as u8,
            minute: ((secs / 60) % 60) as u8,
        }
    }

    /// The current UTC wall-clock time.
    pub fn now() -> Self {
        Self::from_timestamp(SystemTime::now())
    }

    /// Returns the hour in canonical 24-hour form (0-23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the derived AM/PM designator. Meaningless under
    /// [`ClockMode::TwentyFourHour`], where it is simply unused.
    pub fn meridiem(&self) -> Meridiem {
        if self.hour >= 12 {
            Meridiem::Pm
        } else {
            Meridiem::Am
        }
    }

    /// Returns the hour to display: 1-12 in 12-hour mode, 0-23 otherwise.
    pub fn hour_for_display(&self, mode: ClockMode) -> u8 {
        match mode {
            ClockMode::TwentyFourHour => self.hour,
            ClockMode::TwelveHour => {
                let hour = self.hour % 12;
                if hour == 0 { 12 } else { hour }
            }
        }
    }

    /// Steps the hour forward by one, wrapping around.
    ///
    /// In 12-hour mode the display hour wraps 12 → 1 and the meridiem is left
    /// untouched; crossing noon or midnight happens only through
    /// [`TimeValue::toggle_meridiem`].
    pub fn increment_hour(&mut self, mode: ClockMode) {
        match mode {
            ClockMode::TwentyFourHour => self.hour = (self.hour + 1) % 24,
            ClockMode::TwelveHour => {
                let next = self.hour_for_display(ClockMode::TwelveHour) % 12 + 1;
                self.set_display_hour(next);
            }
        }
    }

    /// Steps the hour backward by one, wrapping around.
    pub fn decrement_hour(&mut self, mode: ClockMode) {
        match mode {
            ClockMode::TwentyFourHour => {
                self.hour = ((self.hour as i16 - 1).rem_euclid(24)) as u8;
            }
            ClockMode::TwelveHour => {
                let current = self.hour_for_display(ClockMode::TwelveHour);
                let next = if current == 1 { 12 } else { current - 1 };
                self.set_display_hour(next);
            }
        }
    }

    /// Steps the minute forward by one, wrapping 59 → 0.
    pub fn increment_minute(&mut self) {
        self.minute = (self.minute + 1) % 60;
    }

    /// Steps the minute backward by one, wrapping 0 → 59.
    pub fn decrement_minute(&mut self) {
        self.minute = ((self.minute as i16 - 1).rem_euclid(60)) as u8;
    }

    /// Flips the AM/PM designator, keeping the display hour.
    pub fn toggle_meridiem(&mut self) {
        self.hour = if self.hour >= 12 {
            self.hour - 12
        } else {
            self.hour + 12
        };
    }

    /// Replaces the 12-hour display hour (1-12), keeping the meridiem.
    fn set_display_hour(&mut self, display: u8) {
        let base = display % 12;
        self.hour = match self.meridiem() {
            Meridiem::Pm => base + 12,
            Meridiem::Am => base,
        };
    }

    /// Formats the value: `"H : MM"` in 24-hour mode, `"H : MM AM|PM"` in
    /// 12-hour mode. No leading zero on the hour, two-digit minute.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_timepicker::time_value::{ClockMode, TimeValue};
    ///
    /// let value = TimeValue::new(14, 5);
    /// assert_eq!(value.format(ClockMode::TwelveHour), "2 : 05 PM");
    /// assert_eq!(value.format(ClockMode::TwentyFourHour), "14 : 05");
    /// ```
    pub fn format(&self, mode: ClockMode) -> String {
        match mode {
            ClockMode::TwentyFourHour => format!("{} : {:02}", self.hour, self.minute),
            ClockMode::TwelveHour => format!(
                "{} : {:02} {}",
                self.hour_for_display(mode),
                self.minute,
                self.meridiem()
            ),
        }
    }

    /// Parses text produced by [`TimeValue::format`] back into a value.
    ///
    /// Whitespace around the separator is optional, so `"9:30 AM"` is
    /// accepted alongside `"9 : 30 AM"`. The meridiem token is required in
    /// 12-hour mode and rejected in 24-hour mode.
    pub fn parse(text: &str, mode: ClockMode) -> Result<Self, ParseTimeError> {
        let (hour_part, rest) = text.split_once(':').ok_or(ParseTimeError::Malformed)?;
        let hour: u8 = hour_part
            .trim()
            .parse()
            .map_err(|_| ParseTimeError::Malformed)?;

        let mut rest = rest.split_whitespace();
        let minute: u8 = rest
            .next()
            .ok_or(ParseTimeError::Malformed)?
            .parse()
            .map_err(|_| ParseTimeError::Malformed)?;
        let meridiem = rest.next();
        if rest.next().is_some() {
            return Err(ParseTimeError::Malformed);
        }
        if minute > 59 {
            return Err(ParseTimeError::MinuteOutOfRange(minute));
        }

        match mode {
            ClockMode::TwentyFourHour => {
                if meridiem.is_some() {
                    return Err(ParseTimeError::Malformed);
                }
                if hour > 23 {
                    return Err(ParseTimeError::HourOutOfRange(hour));
                }
                Ok(Self { hour, minute })
            }
            ClockMode::TwelveHour => {
                let meridiem = match meridiem {
                    Some("AM") => Meridiem::Am,
                    Some("PM") => Meridiem::Pm,
                    _ => return Err(ParseTimeError::Malformed),
                };
                if !(1..=12).contains(&hour) {
                    return Err(ParseTimeError::HourOutOfRange(hour));
                }
                let base = hour % 12;
                let hour = match meridiem {
                    Meridiem::Pm => base + 12,
                    Meridiem::Am => base,
                };
                Ok(Self { hour, minute })
            }
        }
    }
}

impl Default for TimeValue {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn at(hour: u8, minute: u8) -> TimeValue {
        TimeValue::new(hour, minute)
    }

    #[test]
    fn constructor_clamps_out_of_range_components() {
        let value = TimeValue::new(99, 99);
        assert_eq!(value.hour(), 23);
        assert_eq!(value.minute(), 59);
    }

    #[test]
    fn timestamp_maps_to_utc_wall_clock() {
        let stamp = UNIX_EPOCH + Duration::from_secs(14 * 3_600 + 5 * 60);
        let value = TimeValue::from_timestamp(stamp);
        assert_eq!((value.hour(), value.minute()), (14, 5));
    }

    #[test]
    fn minute_cycle_returns_to_start() {
        for start in 0..60 {
            let mut value = at(0, start);
            for _ in 0..60 {
                value.increment_minute();
            }
            assert_eq!(value.minute(), start);
        }
    }

    #[test]
    fn twelve_hour_cycle_returns_to_start() {
        for start in 0..24 {
            let mut value = at(start, 0);
            let display = value.hour_for_display(ClockMode::TwelveHour);
            for _ in 0..12 {
                value.increment_hour(ClockMode::TwelveHour);
            }
            assert_eq!(value.hour_for_display(ClockMode::TwelveHour), display);
            assert_eq!(value.hour(), start);
        }
    }

    #[test]
    fn twenty_four_hour_cycle_returns_to_start() {
        for start in 0..24 {
            let mut value = at(start, 0);
            for _ in 0..24 {
                value.increment_hour(ClockMode::TwentyFourHour);
            }
            assert_eq!(value.hour(), start);
        }
    }

    #[test]
    fn decrement_is_inverse_of_increment() {
        for mode in [ClockMode::TwelveHour, ClockMode::TwentyFourHour] {
            let mut value = at(7, 30);
            value.increment_hour(mode);
            value.decrement_hour(mode);
            assert_eq!(value, at(7, 30));
        }
        let mut value = at(7, 0);
        value.increment_minute();
        value.decrement_minute();
        assert_eq!(value, at(7, 0));
        value.decrement_minute();
        assert_eq!(value.minute(), 59);
    }

    #[test]
    fn meridiem_toggle_is_an_involution() {
        for hour in 0..24 {
            let mut value = at(hour, 0);
            let before = value.meridiem();
            value.toggle_meridiem();
            assert_eq!(value.meridiem(), before.toggled());
            value.toggle_meridiem();
            assert_eq!(value, at(hour, 0));
        }
    }

    #[test]
    fn hour_wraparound_keeps_meridiem() {
        // 11 PM + 1 shows 12 but stays PM (noon), never rolls the day.
        let mut value = at(23, 0);
        value.increment_hour(ClockMode::TwelveHour);
        assert_eq!(value.hour_for_display(ClockMode::TwelveHour), 12);
        assert_eq!(value.meridiem(), Meridiem::Pm);

        // 12 AM - 1 shows 11 and stays AM.
        let mut value = at(0, 0);
        value.decrement_hour(ClockMode::TwelveHour);
        assert_eq!(value.hour_for_display(ClockMode::TwelveHour), 11);
        assert_eq!(value.meridiem(), Meridiem::Am);
    }

    #[test]
    fn ten_increments_from_noon_display_ten() {
        let mut value = at(12, 0);
        for _ in 0..10 {
            value.increment_hour(ClockMode::TwelveHour);
        }
        assert_eq!(value.hour_for_display(ClockMode::TwelveHour), 10);
    }

    #[test]
    fn format_matches_expected_shapes() {
        assert_eq!(at(14, 5).format(ClockMode::TwelveHour), "2 : 05 PM");
        assert_eq!(at(14, 5).format(ClockMode::TwentyFourHour), "14 : 05");
        assert_eq!(at(0, 30).format(ClockMode::TwelveHour), "12 : 30 AM");
        assert_eq!(at(0, 30).format(ClockMode::TwentyFourHour), "0 : 30");
        assert_eq!(at(12, 0).format(ClockMode::TwelveHour), "12 : 00 PM");
    }

    #[test]
    fn parse_round_trips_formatted_output() {
        for mode in [ClockMode::TwelveHour, ClockMode::TwentyFourHour] {
            for hour in 0..24 {
                for minute in [0, 5, 9, 30, 59] {
                    let value = at(hour, minute);
                    let text = value.format(mode);
                    let parsed = TimeValue::parse(&text, mode).expect("formatted text parses");
                    assert_eq!(parsed, value, "round trip failed for {text:?}");
                    assert_eq!(parsed.format(mode), text);
                }
            }
        }
    }

    #[test]
    fn parse_accepts_compact_separator() {
        let parsed = TimeValue::parse("9:30 AM", ClockMode::TwelveHour).expect("compact form");
        assert_eq!(parsed, at(9, 30));
    }

    #[test]
    fn parse_rejects_garbage_and_out_of_range() {
        let twelve = ClockMode::TwelveHour;
        let twenty_four = ClockMode::TwentyFourHour;

        assert_eq!(
            TimeValue::parse("garbage", twelve),
            Err(ParseTimeError::Malformed)
        );
        assert_eq!(TimeValue::parse("", twelve), Err(ParseTimeError::Malformed));
        assert_eq!(
            TimeValue::parse("9 : 30", twelve),
            Err(ParseTimeError::Malformed),
            "12-hour mode requires a meridiem token"
        );
        assert_eq!(
            TimeValue::parse("9 : 30 AM", twenty_four),
            Err(ParseTimeError::Malformed),
            "24-hour mode rejects a meridiem token"
        );
        assert_eq!(
            TimeValue::parse("9 : 30 XM", twelve),
            Err(ParseTimeError::Malformed)
        );
        assert_eq!(
            TimeValue::parse("0 : 30 AM", twelve),
            Err(ParseTimeError::HourOutOfRange(0))
        );
        assert_eq!(
            TimeValue::parse("13 : 30 PM", twelve),
            Err(ParseTimeError::HourOutOfRange(13))
        );
        assert_eq!(
            TimeValue::parse("25 : 30", twenty_four),
            Err(ParseTimeError::HourOutOfRange(25))
        );
        assert_eq!(
            TimeValue::parse("9 : 61 AM", twelve),
            Err(ParseTimeError::MinuteOutOfRange(61))
        );
    }
}
