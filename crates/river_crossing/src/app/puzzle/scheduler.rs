use engine::Vec2;

use super::board::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reveal {
    RestartButton,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TaskKind {
    MoveActor {
        actor: ActorId,
        from: Vec2,
        to: Vec2,
    },
    CrossRaft {
        from: Vec2,
        to: Vec2,
    },
    Dim {
        from_alpha: u8,
        to_alpha: u8,
    },
    Reveal(Reveal),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Task {
    id: TaskId,
    kind: TaskKind,
    started_at_ms: u64,
    duration_ms: u64,
}

impl Task {
    pub(crate) fn id(&self) -> TaskId {
        self.id
    }

    pub(crate) fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub(crate) fn elapsed_fraction(&self, now_ms: u64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.started_at_ms);
        (elapsed as f64 / self.duration_ms as f64).min(1.0) as f32
    }
}

pub(crate) trait TaskTarget {
    fn advance(&mut self, kind: &TaskKind, t: f32);
}

#[derive(Debug, Default)]
pub(crate) struct TaskScheduler {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskScheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn schedule(&mut self, kind: TaskKind, now_ms: u64, duration_ms: u64) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            kind,
            started_at_ms: now_ms,
            duration_ms,
        });
        id
    }

    /// Advances every task in insertion order and returns the ones that
    /// finished this tick. Tasks scheduled while handling the result first
    /// advance on the next tick.
    pub(crate) fn tick(&mut self, now_ms: u64, target: &mut dyn TaskTarget) -> Vec<Task> {
        let mut finished = Vec::new();
        self.tasks.retain(|task| {
            let t = task.elapsed_fraction(now_ms);
            target.advance(&task.kind, t);
            if t >= 1.0 {
                finished.push(*task);
                false
            } else {
                true
            }
        });
        finished
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
