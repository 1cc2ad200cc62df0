use std::fmt::{self, Display};

use chrono::NaiveDate;

/// `999`, `15.3K`, `1.5M`. One decimal, halves round up.
pub fn format_view_count(views: u64) -> String {
    if views >= 1_000_000 {
        one_decimal(views, 1_000_000, 'M')
    } else if views >= 1_000 {
        one_decimal(views, 1_000, 'K')
    } else {
        views.to_string()
    }
}

fn one_decimal(views: u64, unit: u64, suffix: char) -> String {
    let step = unit / 10;
    let tenths = views.saturating_add(step / 2) / step;

    format!("{}.{}{suffix}", tenths / 10, tenths % 10)
}

/// Popularity shown as one to five fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FireRating(u8);

impl FireRating {
    pub const MAX: FireRating = FireRating(5);
}

impl Display for FireRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.0 {
            f.write_str("🔥")?;
        }

        Ok(())
    }
}

pub fn fire_rating_tier(views: u64) -> FireRating {
    match views {
        45_000.. => FireRating::MAX,
        35_000.. => FireRating(4),
        25_000.. => FireRating(3),
        15_000.. => FireRating(2),
        _ => FireRating(1),
    }
}

/// Age of `date` as of `today`: `Today`, `Yesterday`, `3d ago`, `2w ago`, `5mo ago`, `1y ago`.
///
/// Dates in the future count as today.
pub fn relative_age(date: NaiveDate, today: NaiveDate) -> String {
    let days = (today - date).num_days();

    match days {
        ..=0 => "Today".to_owned(),
        1 => "Yesterday".to_owned(),
        2..=6 => format!("{days}d ago"),
        7..=29 => format!("{}w ago", days / 7),
        30..=364 => format!("{}mo ago", days / 30),
        _ => format!("{}y ago", days / 365),
    }
}

/// [`relative_age`] of a `YYYY-MM-DD` string. `None` when it does not parse.
pub fn relative_age_of(date: &str, today: NaiveDate) -> Option<String> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .map(|date| relative_age(date, today))
}
