use crate::app::boxoffice::{BoxofficeRecode, BoxofficeSnapshot, RankType};

pub const NEW_ENTRY_MARKER: &str = "신규";
pub const PLACEHOLDER: &str = "-";
pub const UP_GLYPH: &str = "▲";
pub const DOWN_GLYPH: &str = "▼";

/// How rows are laid out on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationMode {
    /// One line per movie.
    Compact,
    /// Bordered cards in a two-column grid.
    #[default]
    Card,
}

impl PresentationMode {
    pub fn toggled(self) -> Self {
        match self {
            PresentationMode::Compact => PresentationMode::Card,
            PresentationMode::Card => PresentationMode::Compact,
        }
    }
}

/// Movement in the ranking since the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankChange {
    NewEntry,
    Steady,
    Up(u64),
    Down(u64),
}

impl RankChange {
    pub fn from_rank_type(rank_type: RankType) -> Self {
        match rank_type {
            RankType::New => RankChange::NewEntry,
            RankType::Old(0) => RankChange::Steady,
            RankType::Old(delta) if delta > 0 => RankChange::Up(delta.unsigned_abs()),
            RankType::Old(delta) => RankChange::Down(delta.unsigned_abs()),
        }
    }

    pub fn glyph(&self) -> Option<&'static str> {
        match self {
            RankChange::Up(_) => Some(UP_GLYPH),
            RankChange::Down(_) => Some(DOWN_GLYPH),
            RankChange::NewEntry | RankChange::Steady => None,
        }
    }

    /// Text shown next to the glyph, if any.
    pub fn label(&self) -> String {
        match self {
            RankChange::NewEntry => NEW_ENTRY_MARKER.to_string(),
            RankChange::Steady => PLACEHOLDER.to_string(),
            RankChange::Up(n) | RankChange::Down(n) => n.to_string(),
        }
    }
}

/// Turns a count into display text. `None` means the value could not be
/// formatted.
pub trait NumberFormat: Send {
    fn format(&self, value: u64) -> Option<String>;
}

/// Decimal digits grouped by thousands with commas.
pub struct DecimalFormat;

impl NumberFormat for DecimalFormat {
    fn format(&self, value: u64) -> Option<String> {
        let digits = value.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, ch) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        Some(grouped)
    }
}

/// Display data for one box office row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowViewModel {
    pub rank: String,
    pub rank_change: RankChange,
    pub title: String,
    pub audience: String,
    pub movie_code: Option<String>,
    pub movie_name: Option<String>,
    pub mode: PresentationMode,
}

pub struct ListRenderer {
    formatter: Box<dyn NumberFormat>,
}

impl Default for ListRenderer {
    fn default() -> Self {
        Self::new(Box::new(DecimalFormat))
    }
}

impl ListRenderer {
    pub fn new(formatter: Box<dyn NumberFormat>) -> Self {
        Self { formatter }
    }

    /// Projects a snapshot into rows, keeping rank order.
    pub fn render(&self, snapshot: &BoxofficeSnapshot, mode: PresentationMode) -> Vec<RowViewModel> {
        snapshot
            .recodes()
            .iter()
            .map(|recode| self.render_row(recode, mode))
            .collect()
    }

    fn render_row(&self, recode: &BoxofficeRecode, mode: PresentationMode) -> RowViewModel {
        RowViewModel {
            rank: recode.rank.to_string(),
            rank_change: RankChange::from_rank_type(recode.rank_type),
            title: recode.movie_name.clone(),
            audience: self.audience_text(recode.audience_count, recode.audience_accumulation),
            movie_code: non_empty(&recode.movie_code),
            movie_name: non_empty(&recode.movie_name),
            mode,
        }
    }

    fn audience_text(&self, count: u64, accumulation: u64) -> String {
        let count = self
            .formatter
            .format(count)
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let accumulation = self
            .formatter
            .format(accumulation)
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        format!("오늘 {} / 총 {}", count, accumulation)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::boxoffice::recode;
    use chrono::NaiveDate;

    fn scenario() -> BoxofficeSnapshot {
        BoxofficeSnapshot::new(
            NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
            vec![
                recode(1, RankType::New, "A", "Alpha", 1000, 5000),
                recode(2, RankType::Old(-1), "B", "Beta", 800, 20000),
            ],
        )
        .unwrap()
    }

    #[test]
    fn scenario_rows() {
        let rows = ListRenderer::default().render(&scenario(), PresentationMode::Card);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rank, "1");
        assert_eq!(rows[0].rank_change, RankChange::NewEntry);
        assert_eq!(rows[0].rank_change.label(), "신규");
        assert_eq!(rows[0].audience, "오늘 1,000 / 총 5,000");

        assert_eq!(rows[1].rank_change, RankChange::Down(1));
        assert_eq!(rows[1].rank_change.glyph(), Some(DOWN_GLYPH));
        assert_eq!(rows[1].rank_change.label(), "1");
        assert_eq!(rows[1].audience, "오늘 800 / 총 20,000");
    }

    #[test]
    fn rows_follow_rank_order() {
        let recodes: Vec<_> = (1..=10)
            .rev()
            .map(|rank| recode(rank, RankType::Old(0), &format!("M{}", rank), "Movie", 1, 1))
            .collect();
        let snapshot =
            BoxofficeSnapshot::new(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(), recodes).unwrap();

        let rows = ListRenderer::default().render(&snapshot, PresentationMode::Compact);
        let ranks: Vec<_> = rows.iter().map(|row| row.rank.clone()).collect();
        let expected: Vec<_> = (1..=10).map(|rank: u32| rank.to_string()).collect();
        assert_eq!(ranks, expected);
        assert!(rows.iter().all(|row| row.mode == PresentationMode::Compact));
    }

    #[test]
    fn rank_change_markers() {
        assert_eq!(RankChange::from_rank_type(RankType::Old(0)), RankChange::Steady);
        assert_eq!(RankChange::Steady.label(), "-");
        assert_eq!(RankChange::Steady.glyph(), None);

        assert_eq!(RankChange::from_rank_type(RankType::Old(3)), RankChange::Up(3));
        assert_eq!(RankChange::Up(3).glyph(), Some(UP_GLYPH));

        assert_eq!(RankChange::from_rank_type(RankType::Old(-7)), RankChange::Down(7));
        assert_eq!(RankChange::Down(7).label(), "7");

        assert_eq!(RankChange::from_rank_type(RankType::New), RankChange::NewEntry);
        assert_eq!(RankChange::NewEntry.glyph(), None);
    }

    #[test]
    fn rendering_is_idempotent() {
        let renderer = ListRenderer::default();
        let snapshot = scenario();
        assert_eq!(
            renderer.render(&snapshot, PresentationMode::Card),
            renderer.render(&snapshot, PresentationMode::Card)
        );
    }

    #[test]
    fn failed_format_uses_placeholder_for_that_value_only() {
        struct SmallOnly;
        impl NumberFormat for SmallOnly {
            fn format(&self, value: u64) -> Option<String> {
                (value < 10_000).then(|| value.to_string())
            }
        }

        let rows = ListRenderer::new(Box::new(SmallOnly)).render(&scenario(), PresentationMode::Card);
        assert_eq!(rows[0].audience, "오늘 1000 / 총 5000");
        assert_eq!(rows[1].audience, "오늘 800 / 총 -");
    }

    #[test]
    fn decimal_grouping() {
        let format = DecimalFormat;
        assert_eq!(format.format(0).as_deref(), Some("0"));
        assert_eq!(format.format(999).as_deref(), Some("999"));
        assert_eq!(format.format(1000).as_deref(), Some("1,000"));
        assert_eq!(format.format(1234567).as_deref(), Some("1,234,567"));
    }

    #[test]
    fn blank_movie_code_is_absent() {
        let snapshot = BoxofficeSnapshot::new(
            NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
            vec![recode(1, RankType::New, "", "Alpha", 1, 1)],
        )
        .unwrap();
        let rows = ListRenderer::default().render(&snapshot, PresentationMode::Card);
        assert_eq!(rows[0].movie_code, None);
        assert_eq!(rows[0].movie_name.as_deref(), Some("Alpha"));
    }

    #[test]
    fn mode_toggles() {
        assert_eq!(PresentationMode::Card.toggled(), PresentationMode::Compact);
        assert_eq!(PresentationMode::Compact.toggled(), PresentationMode::Card);
    }
}
