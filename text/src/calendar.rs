// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar systems as the engine sees them: an identifier, an ordered era
//! list, and year bounds.
//!
//! The arithmetic of the supported calendars is the proleptic Gregorian
//! calendar of `jiff::civil`; the registered identifiers differ only in
//! name. Era handling maps the signed absolute year onto `BCE`/`CE`
//! year-of-era values.

/// An era of a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Era {
    id: &'static str,
    canonical_name: &'static str,
    aliases: &'static [&'static str],
}

impl Era {
    /// Stable identifier, used for locale-name overrides.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// The canonical display name.
    #[must_use]
    pub fn canonical_name(&self) -> &'static str {
        self.canonical_name
    }

    /// Alternative names accepted on parse.
    #[must_use]
    pub fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }
}

const BCE: Era = Era {
    id: "bce",
    canonical_name: "BCE",
    aliases: &["BC", "B.C."],
};

const CE: Era = Era {
    id: "ce",
    canonical_name: "CE",
    aliases: &["AD", "A.D."],
};

/// A calendar system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    id: &'static str,
    eras: &'static [Era],
    min_year: i64,
    max_year: i64,
}

impl Calendar {
    /// The ISO-8601 calendar.
    #[must_use]
    pub fn iso() -> &'static Calendar {
        &ISO
    }

    /// Every registered calendar, in registration order.
    #[must_use]
    pub fn all() -> &'static [&'static Calendar] {
        static ALL: [&Calendar; 2] = [&ISO, &GREGORIAN];
        &ALL
    }

    /// Look up a calendar by its exact identifier.
    #[must_use]
    pub fn by_id(id: &str) -> Option<&'static Calendar> {
        Calendar::all().iter().copied().find(|c| c.id == id)
    }

    /// The calendar whose identifier is the longest prefix of `text`, if
    /// any. Supports parsing identifiers out of a longer input.
    #[must_use]
    pub fn longest_prefix_of(text: &str) -> Option<&'static Calendar> {
        Calendar::all()
            .iter()
            .copied()
            .filter(|c| text.starts_with(c.id))
            .max_by_key(|c| c.id.len())
    }

    /// The registered identifier.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// The eras of this calendar, earliest first.
    #[must_use]
    pub fn eras(&self) -> &'static [Era] {
        self.eras
    }

    /// Smallest supported absolute year.
    #[must_use]
    pub fn min_year(&self) -> i64 {
        self.min_year
    }

    /// Largest supported absolute year.
    #[must_use]
    pub fn max_year(&self) -> i64 {
        self.max_year
    }

    /// The era a signed absolute year falls in, as an index into
    /// [`Calendar::eras`].
    #[must_use]
    pub fn era_of(&self, year: i64) -> usize {
        usize::from(year > 0)
    }

    /// The year within its era: `CE` years map to themselves, `BCE` year
    /// *n* is the absolute year `1 - n`.
    #[must_use]
    pub fn year_of_era(&self, year: i64) -> i64 {
        if year > 0 { year } else { 1 - year }
    }

    /// Recombine a year-of-era with an era index into the signed absolute
    /// year. Returns `None` when the result is outside the calendar bounds
    /// or the year-of-era is not positive.
    #[must_use]
    pub fn absolute_year(&self, year_of_era: i64, era: usize) -> Option<i64> {
        if year_of_era < 1 {
            return None;
        }
        let year = match era {
            0 => 1 - year_of_era,
            1 => year_of_era,
            _ => return None,
        };
        (self.min_year..=self.max_year).contains(&year).then_some(year)
    }
}

static ISO: Calendar = Calendar {
    id: "ISO",
    eras: &[BCE, CE],
    min_year: -9999,
    max_year: 9999,
};

static GREGORIAN: Calendar = Calendar {
    id: "Gregorian",
    eras: &[BCE, CE],
    min_year: -9999,
    max_year: 9999,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_of_era_round_trips() {
        let iso = Calendar::iso();

        #[rustfmt::skip]
        let cases = [
            // (absolute, era index, year of era)
            ( 2024, 1, 2024),
            (    1, 1,    1),
            (    0, 0,    1),
            (  -10, 0,   11),
        ];
        for (absolute, era, year_of_era) in cases {
            assert_eq!(iso.era_of(absolute), era);
            assert_eq!(iso.year_of_era(absolute), year_of_era);
            assert_eq!(iso.absolute_year(year_of_era, era), Some(absolute));
        }
    }

    #[test]
    fn absolute_year_rejects_out_of_bounds() {
        let iso = Calendar::iso();
        assert_eq!(iso.absolute_year(10_000, 1), None);
        assert_eq!(iso.absolute_year(0, 1), None);
        assert_eq!(iso.absolute_year(5, 2), None);
    }

    #[test]
    fn longest_prefix_match() {
        assert_eq!(Calendar::longest_prefix_of("ISO-rest"), Some(Calendar::iso()));
        assert_eq!(
            Calendar::longest_prefix_of("Gregorian)").map(Calendar::id),
            Some("Gregorian")
        );
        assert_eq!(Calendar::longest_prefix_of("Julian"), None);
    }
}
