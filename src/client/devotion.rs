//! Public devotion page: one week of devotions with the latest featured

use super::state::LoadState;
use super::{ApiClient, ListQuery};
use crate::core::entity::Document;
use crate::entities::Devotion;
use chrono::{Datelike, Duration, NaiveDate};

/// Monday and Sunday of the week containing `today`
pub fn current_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

pub struct DevotionView {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Sorted by `date`, newest first
    pub devotions: Vec<Document<Devotion>>,
    pub state: LoadState,
}

impl DevotionView {
    /// A view over the week containing `today`
    pub fn new(today: NaiveDate) -> Self {
        let (from, to) = current_week(today);
        Self {
            from,
            to,
            devotions: Vec::new(),
            state: LoadState::Idle,
        }
    }

    /// Override the range; takes effect on the next `load`
    pub fn set_range(&mut self, from: NaiveDate, to: NaiveDate) {
        self.from = from;
        self.to = to;
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.state = LoadState::Loading;

        match client
            .list_all::<Devotion>(&ListQuery::range(self.from, self.to))
            .await
        {
            Ok(mut devotions) => {
                devotions.sort_by(|a, b| b.content.date.cmp(&a.content.date));
                self.devotions = devotions;
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load devotions");
                self.state = LoadState::failed(&err);
            }
        }
    }

    /// The most recent devotion in range
    pub fn featured(&self) -> Option<&Document<Devotion>> {
        self.devotions.first()
    }

    /// Everything after the featured devotion
    pub fn others(&self) -> &[Document<Devotion>] {
        self.devotions.get(1..).unwrap_or_default()
    }
}
