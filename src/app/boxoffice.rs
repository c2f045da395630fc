use std::collections::HashSet;

use chrono::NaiveDate;

use crate::app::error::FetchError;

/// How a movie got to its current position in the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankType {
    /// First day on the chart.
    New,
    /// Already ranked yesterday; positive delta means it climbed.
    Old(i64),
}

/// One ranked entry of a day's box office.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxofficeRecode {
    pub rank: u32,
    pub rank_type: RankType,
    pub movie_code: String,
    pub movie_name: String,
    pub audience_count: u64,
    pub audience_accumulation: u64,
}

/// The full ranking for one calendar day, ordered by rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxofficeSnapshot {
    date: NaiveDate,
    recodes: Vec<BoxofficeRecode>,
}

impl BoxofficeSnapshot {
    /// Sorts by rank and checks that ranks run 1..=n without gaps and that
    /// every movie code appears once.
    pub fn new(date: NaiveDate, mut recodes: Vec<BoxofficeRecode>) -> Result<Self, FetchError> {
        recodes.sort_by_key(|recode| recode.rank);

        for (index, recode) in recodes.iter().enumerate() {
            let expected = index as u32 + 1;
            if recode.rank != expected {
                return Err(FetchError::InvalidSnapshot(format!(
                    "expected rank {} but found {} ({})",
                    expected, recode.rank, recode.movie_name
                )));
            }
        }

        let mut codes = HashSet::new();
        for recode in &recodes {
            if !codes.insert(recode.movie_code.as_str()) {
                return Err(FetchError::InvalidSnapshot(format!(
                    "duplicate movie code {}",
                    recode.movie_code
                )));
            }
        }

        Ok(Self { date, recodes })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn recodes(&self) -> &[BoxofficeRecode] {
        &self.recodes
    }
}

/// Detailed information about a single movie.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieInfo {
    pub movie_code: String,
    pub movie_name: String,
    pub movie_name_en: String,
    pub production_year: String,
    pub show_time_minutes: Option<u32>,
    pub open_date: Option<NaiveDate>,
    pub production_status: String,
    pub type_name: String,
    pub genres: Vec<String>,
    pub nations: Vec<String>,
    pub directors: Vec<String>,
    pub actors: Vec<Actor>,
    pub watch_grade: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub cast: String,
}

#[cfg(test)]
pub fn recode(rank: u32, rank_type: RankType, code: &str, name: &str, count: u64, acc: u64) -> BoxofficeRecode {
    BoxofficeRecode {
        rank,
        rank_type,
        movie_code: code.to_string(),
        movie_name: name.to_string(),
        audience_count: count,
        audience_accumulation: acc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()
    }

    #[test]
    fn snapshot_is_sorted_by_rank() {
        let snapshot = BoxofficeSnapshot::new(
            day(),
            vec![
                recode(2, RankType::Old(-1), "B", "Beta", 800, 20000),
                recode(1, RankType::New, "A", "Alpha", 1000, 5000),
            ],
        )
        .unwrap();

        let codes: Vec<_> = snapshot.recodes().iter().map(|r| r.movie_code.as_str()).collect();
        assert_eq!(codes, vec!["A", "B"]);
        assert_eq!(snapshot.date(), day());
    }

    #[test]
    fn empty_snapshot_is_allowed() {
        let snapshot = BoxofficeSnapshot::new(day(), Vec::new()).unwrap();
        assert!(snapshot.recodes().is_empty());
    }

    #[test]
    fn gap_in_ranks_is_rejected() {
        let result = BoxofficeSnapshot::new(
            day(),
            vec![
                recode(1, RankType::New, "A", "Alpha", 1, 1),
                recode(3, RankType::New, "C", "Gamma", 1, 1),
            ],
        );
        assert!(matches!(result, Err(FetchError::InvalidSnapshot(_))));
    }

    #[test]
    fn repeated_rank_is_rejected() {
        let result = BoxofficeSnapshot::new(
            day(),
            vec![
                recode(1, RankType::New, "A", "Alpha", 1, 1),
                recode(1, RankType::New, "B", "Beta", 1, 1),
            ],
        );
        assert!(matches!(result, Err(FetchError::InvalidSnapshot(_))));
    }

    #[test]
    fn duplicate_movie_code_is_rejected() {
        let result = BoxofficeSnapshot::new(
            day(),
            vec![
                recode(1, RankType::New, "A", "Alpha", 1, 1),
                recode(2, RankType::Old(0), "A", "Alpha again", 1, 1),
            ],
        );
        assert!(matches!(result, Err(FetchError::InvalidSnapshot(_))));
    }
}
