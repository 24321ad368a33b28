use chrono::{Datelike, NaiveDate};

pub const DEFAULT_SPECIES: &str = "squid";

/// Inclusive month/day range during which fishing the species is banned.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClosedSeason {
    pub start: (u32, u32),
    pub end: (u32, u32),
}

impl ClosedSeason {
    pub fn contains(&self, date: NaiveDate) -> bool {
        let md = (date.month(), date.day());
        self.start <= md && md <= self.end
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Species {
    pub id: &'static str,
    pub name: &'static str,
    pub closed_season: ClosedSeason,
}

impl Species {
    /// Dropdown label, e.g. `살오징어 (금어기 4/1 ~ 5/31)`.
    pub fn label(&self) -> String {
        let ClosedSeason { start, end } = self.closed_season;
        format!(
            "{} (금어기 {}/{} ~ {}/{})",
            self.name, start.0, start.1, end.0, end.1
        )
    }
}

pub const SPECIES: [Species; 4] = [
    Species {
        id: "squid",
        name: "살오징어",
        closed_season: ClosedSeason { start: (4, 1), end: (5, 31) },
    },
    Species {
        id: "cutlassfish",
        name: "갈치",
        closed_season: ClosedSeason { start: (7, 1), end: (7, 31) },
    },
    Species {
        id: "anchovy",
        name: "멸치",
        closed_season: ClosedSeason { start: (4, 1), end: (6, 30) },
    },
    Species {
        id: "mackerel",
        name: "고등어",
        closed_season: ClosedSeason { start: (4, 1), end: (4, 30) },
    },
];

pub fn species(id: &str) -> Option<&'static Species> {
    SPECIES.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_SPECIES, species};
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).expect("date")
    }

    #[test]
    fn labels_carry_the_closed_season() {
        let squid = species(DEFAULT_SPECIES).expect("squid");
        assert_eq!(squid.label(), "살오징어 (금어기 4/1 ~ 5/31)");
        assert!(species("tuna").is_none());
    }

    #[test]
    fn closed_season_bounds_are_inclusive() {
        let anchovy = species("anchovy").expect("anchovy").closed_season;
        assert!(!anchovy.contains(date(3, 31)));
        assert!(anchovy.contains(date(4, 1)));
        assert!(anchovy.contains(date(6, 30)));
        assert!(!anchovy.contains(date(7, 1)));
    }
}
