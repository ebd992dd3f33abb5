// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Culture-dependent data consumed by the pattern engine.
//!
//! A [`Locale`] is an immutable bundle of month/day names, designators,
//! separators and canonical pattern texts. It is cheap to clone (the data is
//! behind an `Arc`) and safe to share between threads, so a single locale can
//! back any number of compiled patterns.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::calendar::Era;

/// The four canonical lengths of an offset pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum OffsetPatternLength {
    /// The most precise form. The offset value kind stores whole seconds,
    /// so this coincides with [`OffsetPatternLength::Long`].
    #[strum(serialize = "full")]
    Full,
    /// Hours, minutes and seconds.
    #[strum(serialize = "long")]
    Long,
    /// Hours and minutes.
    #[strum(serialize = "medium")]
    Medium,
    /// Hours only.
    #[strum(serialize = "short")]
    Short,
}

#[derive(Debug)]
struct LocaleData {
    month_names_full: Vec<String>,
    month_names_abbreviated: Vec<String>,
    month_genitive_full: Vec<String>,
    month_genitive_abbreviated: Vec<String>,
    day_names_full: Vec<String>,
    day_names_abbreviated: Vec<String>,
    am_designator: String,
    pm_designator: String,
    date_separator: String,
    time_separator: String,
    short_date_pattern: String,
    long_date_pattern: String,
    short_time_pattern: String,
    long_time_pattern: String,
    offset_full: String,
    offset_long: String,
    offset_medium: String,
    offset_short: String,
    era_names: HashMap<&'static str, String>,
}

/// Localization data for compiling patterns.
#[derive(Debug, Clone)]
pub struct Locale {
    data: Arc<LocaleData>,
}

impl Locale {
    /// The culture-independent locale: English month and day names, `AM`/`PM`
    /// designators, `:` and `-` separators and ISO-leaning canonical
    /// patterns.
    #[must_use]
    pub fn invariant() -> Self {
        static INVARIANT: OnceLock<Locale> = OnceLock::new();
        INVARIANT.get_or_init(|| Locale::builder().build()).clone()
    }

    /// Start building a locale from the invariant data.
    #[must_use]
    pub fn builder() -> LocaleBuilder {
        LocaleBuilder::default()
    }

    /// Full month names, January first.
    #[must_use]
    pub fn month_names_full(&self) -> &[String] {
        &self.data.month_names_full
    }

    /// Abbreviated month names, January first.
    #[must_use]
    pub fn month_names_abbreviated(&self) -> &[String] {
        &self.data.month_names_abbreviated
    }

    /// Genitive full month names. Defaults to the nominative names for
    /// locales that do not distinguish the two.
    #[must_use]
    pub fn month_genitive_full(&self) -> &[String] {
        &self.data.month_genitive_full
    }

    /// Genitive abbreviated month names.
    #[must_use]
    pub fn month_genitive_abbreviated(&self) -> &[String] {
        &self.data.month_genitive_abbreviated
    }

    /// Full day-of-week names, Monday first.
    #[must_use]
    pub fn day_names_full(&self) -> &[String] {
        &self.data.day_names_full
    }

    /// Abbreviated day-of-week names, Monday first.
    #[must_use]
    pub fn day_names_abbreviated(&self) -> &[String] {
        &self.data.day_names_abbreviated
    }

    /// The AM designator.
    #[must_use]
    pub fn am_designator(&self) -> &str {
        &self.data.am_designator
    }

    /// The PM designator.
    #[must_use]
    pub fn pm_designator(&self) -> &str {
        &self.data.pm_designator
    }

    /// The date separator matched and emitted by the `/` pattern character.
    #[must_use]
    pub fn date_separator(&self) -> &str {
        &self.data.date_separator
    }

    /// The time separator matched and emitted by the `:` pattern character.
    #[must_use]
    pub fn time_separator(&self) -> &str {
        &self.data.time_separator
    }

    /// Canonical short date pattern, expanded from the standard `d` pattern.
    #[must_use]
    pub fn short_date_pattern(&self) -> &str {
        &self.data.short_date_pattern
    }

    /// Canonical long date pattern, expanded from the standard `D` pattern.
    #[must_use]
    pub fn long_date_pattern(&self) -> &str {
        &self.data.long_date_pattern
    }

    /// Canonical short time pattern, expanded from the standard `t` pattern.
    #[must_use]
    pub fn short_time_pattern(&self) -> &str {
        &self.data.short_time_pattern
    }

    /// Canonical long time pattern, expanded from the standard `T` pattern.
    #[must_use]
    pub fn long_time_pattern(&self) -> &str {
        &self.data.long_time_pattern
    }

    /// The canonical offset pattern of the given length.
    #[must_use]
    pub fn offset_pattern(&self, length: OffsetPatternLength) -> &str {
        match length {
            OffsetPatternLength::Full => &self.data.offset_full,
            OffsetPatternLength::Long => &self.data.offset_long,
            OffsetPatternLength::Medium => &self.data.offset_medium,
            OffsetPatternLength::Short => &self.data.offset_short,
        }
    }

    /// The display name of an era, falling back to the era's canonical name
    /// when the locale carries no override.
    #[must_use]
    pub fn era_name<'a>(&'a self, era: &'a Era) -> &'a str {
        self.data
            .era_names
            .get(era.id())
            .map_or_else(|| era.canonical_name(), String::as_str)
    }

    /// Every name accepted for an era on parse: the locale override (if
    /// any), the canonical name and the registered aliases.
    #[must_use]
    pub fn era_parse_names<'a>(&'a self, era: &'a Era) -> Vec<&'a str> {
        let mut names = Vec::with_capacity(2 + era.aliases().len());
        if let Some(name) = self.data.era_names.get(era.id()) {
            names.push(name.as_str());
        }
        names.push(era.canonical_name());
        names.extend(era.aliases().iter().copied());
        names
    }
}

/// Builder for [`Locale`] values, seeded with the invariant data.
#[derive(Debug)]
pub struct LocaleBuilder {
    data: LocaleData,
}

impl Default for LocaleBuilder {
    fn default() -> Self {
        let months_full = [
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
        let months_abbreviated = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        let days_full = [
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ];
        let days_abbreviated = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

        let to_strings = |names: &[&str]| names.iter().map(ToString::to_string).collect();

        Self {
            data: LocaleData {
                month_names_full: to_strings(&months_full),
                month_names_abbreviated: to_strings(&months_abbreviated),
                month_genitive_full: to_strings(&months_full),
                month_genitive_abbreviated: to_strings(&months_abbreviated),
                day_names_full: to_strings(&days_full),
                day_names_abbreviated: to_strings(&days_abbreviated),
                am_designator: "AM".to_string(),
                pm_designator: "PM".to_string(),
                date_separator: "-".to_string(),
                time_separator: ":".to_string(),
                short_date_pattern: "uuuu'-'MM'-'dd".to_string(),
                long_date_pattern: "dddd',' dd MMMM uuuu".to_string(),
                short_time_pattern: "HH':'mm".to_string(),
                long_time_pattern: "HH':'mm':'ss".to_string(),
                offset_full: "+HH:mm:ss".to_string(),
                offset_long: "+HH:mm:ss".to_string(),
                offset_medium: "+HH:mm".to_string(),
                offset_short: "+HH".to_string(),
                era_names: HashMap::new(),
            },
        }
    }
}

impl LocaleBuilder {
    /// Replace the full month names. `names` must hold twelve entries,
    /// January first.
    #[must_use]
    pub fn month_names_full(mut self, names: [&str; 12]) -> Self {
        self.data.month_names_full = names.iter().map(ToString::to_string).collect();
        self
    }

    /// Replace the abbreviated month names.
    #[must_use]
    pub fn month_names_abbreviated(mut self, names: [&str; 12]) -> Self {
        self.data.month_names_abbreviated = names.iter().map(ToString::to_string).collect();
        self
    }

    /// Replace the genitive full month names.
    #[must_use]
    pub fn month_genitive_full(mut self, names: [&str; 12]) -> Self {
        self.data.month_genitive_full = names.iter().map(ToString::to_string).collect();
        self
    }

    /// Replace the genitive abbreviated month names.
    #[must_use]
    pub fn month_genitive_abbreviated(mut self, names: [&str; 12]) -> Self {
        self.data.month_genitive_abbreviated = names.iter().map(ToString::to_string).collect();
        self
    }

    /// Replace the full day names, Monday first.
    #[must_use]
    pub fn day_names_full(mut self, names: [&str; 7]) -> Self {
        self.data.day_names_full = names.iter().map(ToString::to_string).collect();
        self
    }

    /// Replace the abbreviated day names, Monday first.
    #[must_use]
    pub fn day_names_abbreviated(mut self, names: [&str; 7]) -> Self {
        self.data.day_names_abbreviated = names.iter().map(ToString::to_string).collect();
        self
    }

    /// Replace the AM/PM designators.
    #[must_use]
    pub fn am_pm_designators(mut self, am: &str, pm: &str) -> Self {
        self.data.am_designator = am.to_string();
        self.data.pm_designator = pm.to_string();
        self
    }

    /// Replace the date separator.
    #[must_use]
    pub fn date_separator(mut self, separator: &str) -> Self {
        self.data.date_separator = separator.to_string();
        self
    }

    /// Replace the time separator.
    #[must_use]
    pub fn time_separator(mut self, separator: &str) -> Self {
        self.data.time_separator = separator.to_string();
        self
    }

    /// Replace the canonical short and long date patterns.
    #[must_use]
    pub fn date_patterns(mut self, short: &str, long: &str) -> Self {
        self.data.short_date_pattern = short.to_string();
        self.data.long_date_pattern = long.to_string();
        self
    }

    /// Replace the canonical short and long time patterns.
    #[must_use]
    pub fn time_patterns(mut self, short: &str, long: &str) -> Self {
        self.data.short_time_pattern = short.to_string();
        self.data.long_time_pattern = long.to_string();
        self
    }

    /// Override the display name of an era.
    #[must_use]
    pub fn era_name(mut self, era_id: &'static str, name: &str) -> Self {
        self.data.era_names.insert(era_id, name.to_string());
        self
    }

    /// Finish building the locale.
    #[must_use]
    pub fn build(self) -> Locale {
        Locale {
            data: Arc::new(self.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Calendar;

    #[test]
    fn invariant_designators() {
        let locale = Locale::invariant();
        assert_eq!(locale.am_designator(), "AM");
        assert_eq!(locale.pm_designator(), "PM");
        assert_eq!(locale.time_separator(), ":");
    }

    #[test]
    fn era_name_falls_back_to_canonical() {
        let locale = Locale::invariant();
        let era = &Calendar::iso().eras()[1];
        assert_eq!(locale.era_name(era), "CE");

        let locale = Locale::builder().era_name("ce", "AD").build();
        assert_eq!(locale.era_name(era), "AD");
        assert!(locale.era_parse_names(era).contains(&"CE"));
    }

    #[test]
    fn builder_overrides_are_isolated() {
        let base = Locale::invariant();
        let custom = Locale::builder()
            .month_names_full([
                "styczeń",
                "luty",
                "marzec",
                "kwiecień",
                "maj",
                "czerwiec",
                "lipiec",
                "sierpień",
                "wrzesień",
                "październik",
                "listopad",
                "grudzień",
            ])
            .build();
        assert_eq!(base.month_names_full()[0], "January");
        assert_eq!(custom.month_names_full()[0], "styczeń");
    }
}
