//! Leaderboard presentation: a live view fed by store notifications, and the
//! plain-text table printed by `hivecheck leaderboard`.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use hivecheck_engine::{LeaderboardRecord, LeaderboardStore, SubscriptionToken};

/// Ranked rows kept current by a store subscription.
pub struct LeaderboardView {
    store: Arc<LeaderboardStore>,
    rows: Arc<Mutex<Vec<LeaderboardRecord>>>,
    token: SubscriptionToken,
}

impl LeaderboardView {
    pub fn attach(store: &Arc<LeaderboardStore>) -> Self {
        let rows = Arc::new(Mutex::new(store.leaderboard()));
        let weak: Weak<LeaderboardStore> = Arc::downgrade(store);
        let sink = Arc::clone(&rows);
        let token = store.subscribe(move |event| {
            tracing::debug!(?event, "Refreshing leaderboard view");
            if let Some(store) = weak.upgrade() {
                *sink.lock().unwrap_or_else(PoisonError::into_inner) = store.leaderboard();
            }
        });
        Self {
            store: Arc::clone(store),
            rows,
            token,
        }
    }

    pub fn rows(&self) -> Vec<LeaderboardRecord> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for LeaderboardView {
    fn drop(&mut self) {
        self.store.unsubscribe(self.token);
    }
}

pub fn format_table(records: &[LeaderboardRecord]) -> String {
    if records.is_empty() {
        return "No sessions recorded yet.\n".to_string();
    }
    let name_width = records
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:>3}  {:<name_width$}  {:>7}  {:>8}", "#", "Name", "Correct", "Reviewed");
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<name_width$}  {:>7}  {:>8}",
            i + 1,
            record.name.as_str(),
            record.best_correct,
            record.best_reviewed
        );
    }
    out
}

/// Ask before wiping the leaderboard. Only an explicit "y"/"yes" confirms.
pub fn confirm_reset(mut input: impl BufRead, mut out: impl Write) -> io::Result<bool> {
    write!(out, "Are you sure you want to clear all scores? [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use hivecheck_engine::MemoryStorage;

    use super::*;

    #[tokio::test]
    async fn view_follows_store_updates() {
        let store = Arc::new(LeaderboardStore::open(Arc::new(MemoryStorage::new())).await);
        let view = LeaderboardView::attach(&store);
        assert!(view.rows().is_empty());

        store.record_session("Ann", 3, 5).unwrap();
        store.record_session("Bo", 4, 4).unwrap();
        let names: Vec<String> = view.rows().iter().map(|r| r.name.to_string()).collect();
        assert_eq!(names, ["Bo", "Ann"]);

        store.reset();
        assert!(view.rows().is_empty());
    }

    #[tokio::test]
    async fn dropping_view_unsubscribes() {
        let store = Arc::new(LeaderboardStore::open(Arc::new(MemoryStorage::new())).await);
        let view = LeaderboardView::attach(&store);
        let token = view.token;
        drop(view);
        assert!(!store.unsubscribe(token));
    }

    #[tokio::test]
    async fn table_lists_ranked_rows() {
        let store = LeaderboardStore::open(Arc::new(MemoryStorage::new())).await;
        store.record_session("Ann", 3, 5).unwrap();
        store.record_session("Cy", 4, 10).unwrap();

        let table = format_table(&store.leaderboard());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Cy") && lines[1].trim_start().starts_with('1'));
        assert!(lines[2].contains("Ann") && lines[2].ends_with('5'));
    }

    #[test]
    fn reset_prompt_accepts_only_yes() {
        for (answer, expected) in [
            ("y\n", true),
            ("YES\n", true),
            ("n\n", false),
            ("\n", false),
            ("", false),
            ("maybe\n", false),
        ] {
            let mut out = Vec::new();
            let confirmed = confirm_reset(answer.as_bytes(), &mut out).unwrap();
            assert_eq!(confirmed, expected, "answer {answer:?}");
            assert!(String::from_utf8(out).unwrap().ends_with("[y/N] "));
        }
    }

    #[test]
    fn empty_table_has_placeholder() {
        assert_eq!(format_table(&[]), "No sessions recorded yet.\n");
    }
}
