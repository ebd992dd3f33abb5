// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The set of fields a pattern assigns, tracked at compile time.

use bitflags::bitflags;

use crate::error::PatternError;

bitflags! {
    /// Bitmask of the temporal fields a pattern reads or writes.
    ///
    /// The builder records every field a handler registers and rejects a
    /// second registration of the same field, so the runtime parse steps
    /// never have to re-check uniqueness.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PatternFields: u32 {
        /// Era designator.
        const ERA = 1 << 0;
        /// Signed absolute year.
        const YEAR = 1 << 1;
        /// Year within the era.
        const YEAR_OF_ERA = 1 << 2;
        /// Two-digit year, completed from the template century.
        const YEAR_TWO_DIGITS = 1 << 3;
        /// Month as a number.
        const MONTH_OF_YEAR_NUMERIC = 1 << 4;
        /// Month as a name.
        const MONTH_OF_YEAR_TEXT = 1 << 5;
        /// Day of month.
        const DAY_OF_MONTH = 1 << 6;
        /// Day of week as a name.
        const DAY_OF_WEEK = 1 << 7;
        /// Hour on the 12-hour clock.
        const HOURS_12 = 1 << 8;
        /// Hour on the 24-hour clock.
        const HOURS_24 = 1 << 9;
        /// AM/PM designator.
        const AM_PM = 1 << 10;
        /// Minute of hour.
        const MINUTES = 1 << 11;
        /// Second of minute.
        const SECONDS = 1 << 12;
        /// Sub-second fraction.
        const FRACTIONAL_SECONDS = 1 << 13;
        /// Sign of a signed value kind.
        const SIGN = 1 << 14;
        /// An offset parsed by an embedded pattern.
        const EMBEDDED_OFFSET = 1 << 15;
        /// Date fields parsed by an embedded pattern.
        const EMBEDDED_DATE = 1 << 16;
        /// Time fields parsed by an embedded pattern.
        const EMBEDDED_TIME = 1 << 17;
        /// Time-zone identifier.
        const ZONE = 1 << 18;
        /// Time-zone abbreviation (format only).
        const ZONE_ABBREVIATION = 1 << 19;
        /// Calendar identifier.
        const CALENDAR = 1 << 20;
        /// A total-valued duration field (capital `D`/`H`/`M`/`S`).
        const TOTAL_DURATION = 1 << 21;

        /// Every date-carrying field.
        const ALL_DATE_FIELDS = Self::ERA.bits()
            | Self::YEAR.bits()
            | Self::YEAR_OF_ERA.bits()
            | Self::YEAR_TWO_DIGITS.bits()
            | Self::MONTH_OF_YEAR_NUMERIC.bits()
            | Self::MONTH_OF_YEAR_TEXT.bits()
            | Self::DAY_OF_MONTH.bits()
            | Self::DAY_OF_WEEK.bits()
            | Self::EMBEDDED_DATE.bits()
            | Self::CALENDAR.bits();

        /// Every time-carrying field.
        const ALL_TIME_FIELDS = Self::HOURS_12.bits()
            | Self::HOURS_24.bits()
            | Self::AM_PM.bits()
            | Self::MINUTES.bits()
            | Self::SECONDS.bits()
            | Self::FRACTIONAL_SECONDS.bits()
            | Self::EMBEDDED_TIME.bits();
    }
}

impl PatternFields {
    /// Record `field` as assigned by the pattern character `character`.
    ///
    /// # Errors
    ///
    /// Fails with [`PatternError::RepeatedFieldInPattern`] if the field was
    /// already assigned.
    pub fn add(&mut self, field: PatternFields, character: char) -> Result<(), PatternError> {
        if self.intersects(field) {
            return Err(PatternError::RepeatedFieldInPattern { character });
        }
        self.insert(field);
        Ok(())
    }

    /// Cross-field checks applied once the whole pattern is compiled.
    ///
    /// # Errors
    ///
    /// Fails when the era field is present without a year-of-era field, when
    /// a calendar field is combined with an era field, or when two kinds of
    /// absolute year are both present.
    pub fn validate_combination(self) -> Result<(), PatternError> {
        if self.contains(PatternFields::ERA) && !self.contains(PatternFields::YEAR_OF_ERA) {
            return Err(PatternError::EraWithoutYearOfEra);
        }
        if self.contains(PatternFields::ERA) && self.contains(PatternFields::CALENDAR) {
            return Err(PatternError::CalendarAndEra);
        }
        if self.contains(PatternFields::YEAR) && self.contains(PatternFields::YEAR_TWO_DIGITS) {
            return Err(PatternError::RepeatedFieldInPattern { character: 'y' });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_field_is_rejected() {
        let mut fields = PatternFields::empty();
        fields.add(PatternFields::DAY_OF_MONTH, 'd').unwrap();
        let err = fields.add(PatternFields::DAY_OF_MONTH, 'd').unwrap_err();
        assert_eq!(err, PatternError::RepeatedFieldInPattern { character: 'd' });
    }

    #[test]
    fn era_requires_year_of_era() {
        let fields = PatternFields::ERA | PatternFields::YEAR;
        assert_eq!(
            fields.validate_combination(),
            Err(PatternError::EraWithoutYearOfEra)
        );

        let fields = PatternFields::ERA | PatternFields::YEAR_OF_ERA;
        assert_eq!(fields.validate_combination(), Ok(()));
    }

    #[test]
    fn calendar_and_era_are_exclusive() {
        let fields = PatternFields::ERA | PatternFields::YEAR_OF_ERA | PatternFields::CALENDAR;
        assert_eq!(
            fields.validate_combination(),
            Err(PatternError::CalendarAndEra)
        );
    }

    #[test]
    fn category_masks() {
        assert!(PatternFields::ALL_DATE_FIELDS.contains(PatternFields::DAY_OF_MONTH));
        assert!(PatternFields::ALL_TIME_FIELDS.contains(PatternFields::FRACTIONAL_SECONDS));
        assert!(!PatternFields::ALL_TIME_FIELDS.intersects(PatternFields::ALL_DATE_FIELDS));
    }
}
