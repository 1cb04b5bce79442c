//! Bounded worker pool for per-item fetch tasks.
//!
//! A semaphore caps how many tasks run at once; callers wait for a free slot
//! before spawning the next task. Each task's output is queued before its
//! slot is released, so after `reserve` returns, every task that freed a slot
//! has already reported.

use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

/// A reserved run slot. Dropping it without spawning gives the slot back.
#[derive(Debug)]
pub struct Slot(OwnedSemaphorePermit);

/// Everything the pool produced once drained.
#[derive(Debug)]
pub struct Drained<T> {
    pub outputs: Vec<T>,
    /// Tasks that panicked (their output is lost).
    pub panicked: usize,
}

pub struct BoundedPool<T> {
    permits: Arc<Semaphore>,
    tasks: JoinSet<()>,
    tx: mpsc::UnboundedSender<T>,
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T: Send + 'static> BoundedPool<T> {
    /// Pool running at most `size` tasks at once (minimum 1).
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            permits: Arc::new(Semaphore::new(size)),
            tasks: JoinSet::new(),
            tx,
            rx,
        }
    }

    /// Wait until a slot is free.
    pub async fn reserve(&self) -> Result<Slot> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| anyhow::anyhow!("worker pool closed: {}", e))?;
        Ok(Slot(permit))
    }

    /// Spawn `fut` in a previously reserved slot.
    pub fn spawn_in<F>(&mut self, slot: Slot, fut: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.tasks.spawn(async move {
            let out = fut.await;
            // Receiver lives as long as the pool; a send error means the pool was dropped.
            let _ = tx.send(out);
            drop(slot);
        });
    }

    /// Wait for a free slot, then spawn `fut`.
    pub async fn spawn<F>(&mut self, fut: F) -> Result<()>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let slot = self.reserve().await?;
        self.spawn_in(slot, fut);
        Ok(())
    }

    /// Next finished output, if any, without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Wait for every spawned task and collect the outputs not yet taken with `try_next`.
    pub async fn drain(self) -> Drained<T> {
        let BoundedPool {
            mut tasks,
            tx,
            mut rx,
            ..
        } = self;
        drop(tx);

        let mut panicked = 0usize;
        while let Some(res) = tasks.join_next().await {
            if let Err(e) = res {
                tracing::warn!("worker task failed: {}", e);
                panicked += 1;
            }
        }

        let mut outputs = Vec::new();
        while let Some(out) = rx.recv().await {
            outputs.push(out);
        }
        Drained { outputs, panicked }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn never_exceeds_pool_size() {
        let mut pool: BoundedPool<()> = BoundedPool::new(3);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        for _ in 0..12 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            pool.spawn(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            })
            .await
            .unwrap();
        }

        let drained = pool.drain().await;
        assert_eq!(drained.outputs.len(), 12);
        assert_eq!(drained.panicked, 0);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn outputs_reported_before_slot_is_freed() {
        let mut pool: BoundedPool<u32> = BoundedPool::new(1);
        pool.spawn(async { 7 }).await.unwrap();
        // Only one slot: reserving again means the first task finished and reported.
        let slot = pool.reserve().await.unwrap();
        assert_eq!(pool.try_next(), Some(7));
        drop(slot);
        assert_eq!(pool.try_next(), None);
    }

    #[tokio::test]
    async fn panicking_task_is_counted() {
        let mut pool: BoundedPool<u32> = BoundedPool::new(2);
        pool.spawn(async { 1 }).await.unwrap();
        pool.spawn(async {
            if true {
                panic!("boom");
            }
            2
        })
        .await
        .unwrap();
        let drained = pool.drain().await;
        assert_eq!(drained.outputs, vec![1]);
        assert_eq!(drained.panicked, 1);
    }

    #[test]
    fn zero_size_is_clamped() {
        let pool: BoundedPool<()> = BoundedPool::new(0);
        assert_eq!(pool.permits.available_permits(), 1);
    }
}
