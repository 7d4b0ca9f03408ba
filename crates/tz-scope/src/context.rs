//! Request-scoped timezone context.
//!
//! Each logical unit of work (one request, one task) owns an isolated
//! timezone slot. Async units enter a slot with [`with_timezone`] (the tower
//! middleware does this per request); sync units use [`with_timezone_sync`].
//! Outside any scope the slot falls back to thread-local storage, so
//! thread-per-request servers and plain test code work without a runtime.
//!
//! Writes inside one scope are never visible to a concurrently running
//! sibling. Tokio task-locals do not propagate into `tokio::spawn`; to hand
//! the active zone to a spawned child, wrap the child future explicitly:
//!
//! ```
//! # async fn doc() {
//! use tz_scope::{get_timezone, with_timezone};
//!
//! let child = with_timezone(get_timezone(), async {
//!     // sees a snapshot of the parent's zone, never a live link
//! });
//! # child.await;
//! # }
//! ```

use std::cell::Cell;
use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::Result;
use crate::registry::resolve_timezone;

tokio::task_local! {
    static TASK_TIMEZONE: Cell<Tz>;
}

std::thread_local! {
    static THREAD_TIMEZONE: Cell<Tz> = const { Cell::new(Tz::UTC) };
}

/// Install the active timezone for the current logical unit, fail-open.
///
/// Resolution failure silently installs UTC — no error, no warning. Use
/// [`set_timezone_strict`] when invalid names must surface.
pub fn set_timezone(name: &str) {
    install(resolve_timezone(name).unwrap_or(Tz::UTC));
}

/// Install the active timezone for the current logical unit.
///
/// # Errors
///
/// Returns [`TimezoneError::InvalidTimezone`](crate::TimezoneError::InvalidTimezone)
/// when `name` does not resolve; the previously active zone is left in place.
pub fn set_timezone_strict(name: &str) -> Result<()> {
    install(resolve_timezone(name)?);
    Ok(())
}

/// The active timezone for the current logical unit.
///
/// Returns UTC when no zone was ever set on this unit.
pub fn get_timezone() -> Tz {
    TASK_TIMEZONE
        .try_with(Cell::get)
        .unwrap_or_else(|_| THREAD_TIMEZONE.with(Cell::get))
}

fn install(tz: Tz) {
    if TASK_TIMEZONE.try_with(|slot| slot.set(tz)).is_err() {
        THREAD_TIMEZONE.with(|slot| slot.set(tz));
    }
}

/// Run `future` inside a fresh timezone slot seeded with `tz`.
///
/// The slot is isolated: [`set_timezone`] calls inside the scope affect only
/// this unit, and the slot is dropped when the future completes.
pub async fn with_timezone<F: Future>(tz: Tz, future: F) -> F::Output {
    TASK_TIMEZONE.scope(Cell::new(tz), future).await
}

/// Run `f` inside a fresh timezone slot seeded with `tz`, synchronously.
pub fn with_timezone_sync<R>(tz: Tz, f: impl FnOnce() -> R) -> R {
    TASK_TIMEZONE.sync_scope(Cell::new(tz), f)
}

/// The current instant expressed in the active timezone.
pub fn now_local() -> DateTime<Tz> {
    Utc::now().with_timezone(&get_timezone())
}

/// Today's date in the active timezone.
pub fn today_local() -> NaiveDate {
    now_local().date_naive()
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_is_utc() {
        with_timezone_sync(Tz::UTC, || {
            assert_eq!(get_timezone(), Tz::UTC);
        });
    }

    #[test]
    fn test_set_then_get_round_trips() {
        with_timezone_sync(Tz::UTC, || {
            set_timezone("Asia/Kolkata");
            assert_eq!(get_timezone(), chrono_tz::Asia::Kolkata);
        });
    }

    #[test]
    fn test_invalid_timezone_falls_back_to_utc() {
        with_timezone_sync(chrono_tz::Europe::London, || {
            set_timezone("Invalid/Timezone");
            assert_eq!(get_timezone(), Tz::UTC);
        });
    }

    #[test]
    fn test_invalid_timezone_strict_errors_and_keeps_previous() {
        with_timezone_sync(chrono_tz::Europe::London, || {
            assert!(set_timezone_strict("Invalid/Timezone").is_err());
            assert_eq!(get_timezone(), chrono_tz::Europe::London);
        });
    }

    #[test]
    fn test_thread_fallback_without_scope() {
        // no scope entered: the thread-local slot carries the zone
        set_timezone("America/New_York");
        assert_eq!(get_timezone(), chrono_tz::America::New_York);
    }

    #[test]
    fn test_threads_are_isolated() {
        let a = std::thread::spawn(|| {
            set_timezone("Asia/Kolkata");
            std::thread::sleep(Duration::from_millis(20));
            get_timezone().to_string()
        });
        let b = std::thread::spawn(|| {
            set_timezone("Europe/London");
            get_timezone().to_string()
        });
        assert_eq!(a.join().unwrap(), "Asia/Kolkata");
        assert_eq!(b.join().unwrap(), "Europe/London");
    }

    #[tokio::test]
    async fn test_concurrent_tasks_are_isolated() {
        async fn worker(name: &str, delay_ms: u64) -> String {
            with_timezone(Tz::UTC, async move {
                set_timezone(name);
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                get_timezone().to_string()
            })
            .await
        }

        let results = tokio::join!(
            worker("Asia/Kolkata", 40),
            worker("America/New_York", 20),
            worker("Europe/London", 60),
        );

        assert_eq!(
            results,
            (
                "Asia/Kolkata".to_string(),
                "America/New_York".to_string(),
                "Europe/London".to_string(),
            )
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_spawned_tasks_are_isolated() {
        let mut handles = Vec::new();
        for name in ["Asia/Tokyo", "America/Chicago", "Australia/Sydney"] {
            handles.push(tokio::spawn(with_timezone(Tz::UTC, async move {
                set_timezone(name);
                tokio::time::sleep(Duration::from_millis(10)).await;
                get_timezone().to_string()
            })));
        }
        let mut observed = Vec::new();
        for handle in handles {
            observed.push(handle.await.unwrap());
        }
        assert_eq!(observed, ["Asia/Tokyo", "America/Chicago", "Australia/Sydney"]);
    }

    #[tokio::test]
    async fn test_child_inherits_snapshot_not_live_link() {
        with_timezone(Tz::UTC, async {
            set_timezone("Asia/Kolkata");

            // snapshot at spawn time
            let child = tokio::spawn(with_timezone(get_timezone(), async {
                let inherited = get_timezone();
                set_timezone("Europe/Paris");
                inherited
            }));

            assert_eq!(child.await.unwrap(), chrono_tz::Asia::Kolkata);
            // the child's later write never reaches the parent
            assert_eq!(get_timezone(), chrono_tz::Asia::Kolkata);
        })
        .await;
    }

    #[test]
    fn test_today_local_matches_active_zone() {
        with_timezone_sync(chrono_tz::Pacific::Auckland, || {
            let expected = Utc::now()
                .with_timezone(&chrono_tz::Pacific::Auckland)
                .date_naive();
            assert_eq!(today_local(), expected);
        });
    }
}
