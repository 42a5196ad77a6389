use std::{
    ops::ControlFlow,
    time::{Duration, Instant},
};

use crate::basis::Color;

/// 探索の途中経過.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub iterations: u64,
    pub frontier: usize,
    /// これまでに見た中で目標に最も近い色.
    pub closest: Color,
    pub closest_distance: f64,
}

/// `YieldPoint` は探索が一定回数ごとに制御を返す先.
///
/// `ControlFlow::Break` を返すと探索を打ち切り, その時点で最も近い色への経路を返させる.
pub trait YieldPoint {
    fn suspend(&mut self, progress: Progress) -> ControlFlow<()>;
}

impl<F> YieldPoint for F
where
    F: FnMut(Progress) -> ControlFlow<()>,
{
    fn suspend(&mut self, progress: Progress) -> ControlFlow<()> {
        self(progress)
    }
}

/// 何もせず探索を続ける. 専用スレッドで同期的に解くときに使う.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl YieldPoint for Never {
    fn suspend(&mut self, _: Progress) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// 期限を過ぎたら探索を打ち切る.
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }
}

impl YieldPoint for Deadline {
    fn suspend(&mut self, progress: Progress) -> ControlFlow<()> {
        if Instant::now() >= self.0 {
            tracing::debug!(
                iterations = progress.iterations,
                closest = ?progress.closest,
                "deadline passed"
            );
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress() -> Progress {
        Progress {
            iterations: 10,
            frontier: 3,
            closest: Color::new(1, 2, 3),
            closest_distance: 4.0,
        }
    }

    #[test]
    fn test_deadline() {
        let mut passed = Deadline::at(Instant::now());
        assert_eq!(passed.suspend(progress()), ControlFlow::Break(()));

        let mut later = Deadline::after(Duration::from_secs(3600));
        assert_eq!(later.suspend(progress()), ControlFlow::Continue(()));
        assert_eq!(Never.suspend(progress()), ControlFlow::Continue(()));
    }

    #[test]
    fn test_closure_yield_point() {
        let mut seen = vec![];
        let mut stop_second = |p: Progress| {
            seen.push(p.iterations);
            if seen.len() >= 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        };
        assert_eq!(stop_second.suspend(progress()), ControlFlow::Continue(()));
        assert_eq!(stop_second.suspend(progress()), ControlFlow::Break(()));
        drop(stop_second);
        assert_eq!(seen, vec![10, 10]);
    }
}
