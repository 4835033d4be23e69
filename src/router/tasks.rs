//! Deferred task queue.
//!
//! Observers of the navigation state run synchronously inside a commit, so
//! anything that would navigate again or await a fetch is queued here and
//! runs after the current synchronous work has finished.
//!
//! Tasks run concurrently. A task waiting on a slow fetch never holds back
//! the tasks queued after it; ordering between renders is left to the
//! navigation generation.
//!
//! On wasm every task is handed to `wasm_bindgen_futures::spawn_local`.
//! Elsewhere no executor exists and the owner drives the queue with
//! [`TaskQueue::flush`].

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::task::Poll;

#[cfg(not(target_arch = "wasm32"))]
use futures::FutureExt;
use futures::StreamExt;
use futures::future::{LocalBoxFuture, poll_fn};
use futures::stream::FuturesUnordered;

#[derive(Default)]
struct TaskQueueInner {
	pending: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
	// Tasks that were polled but have not finished; they outlive a dropped flush.
	running: RefCell<FuturesUnordered<LocalBoxFuture<'static, ()>>>,
}

/// Queue of local futures run after the current synchronous work.
#[derive(Clone, Default)]
pub struct TaskQueue {
	inner: Rc<TaskQueueInner>,
}

impl std::fmt::Debug for TaskQueue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TaskQueue")
			.field("pending", &self.inner.pending.borrow().len())
			.field(
				"running",
				&self.inner.running.try_borrow().map(|running| running.len()).ok(),
			)
			.finish()
	}
}

impl TaskQueue {
	/// Creates an empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a task to run after the current synchronous work.
	#[cfg(target_arch = "wasm32")]
	pub fn schedule<F>(&self, task: F)
	where
		F: Future<Output = ()> + 'static,
	{
		wasm_bindgen_futures::spawn_local(task);
	}

	/// Queues a task to run after the current synchronous work.
	#[cfg(not(target_arch = "wasm32"))]
	pub fn schedule<F>(&self, task: F)
	where
		F: Future<Output = ()> + 'static,
	{
		self.inner.pending.borrow_mut().push(task.boxed_local());
	}

	/// Returns the number of tasks that have not finished.
	pub fn len(&self) -> usize {
		let running = self
			.inner
			.running
			.try_borrow()
			.map(|running| running.len())
			.unwrap_or_default();
		self.inner.pending.borrow().len() + running
	}

	/// Returns whether every queued task has finished.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Drives queued tasks until all of them have finished.
	///
	/// Tasks queued while flushing join the same flush. Returns the number of
	/// tasks that finished. Dropping the returned future before it completes
	/// keeps unfinished tasks for the next flush. Must not be awaited from
	/// inside a queued task.
	pub async fn flush(&self) -> usize {
		let mut finished = 0;
		poll_fn(|cx| {
			let mut running = self.inner.running.borrow_mut();
			loop {
				running.extend(self.inner.pending.borrow_mut().drain(..));
				match running.poll_next_unpin(cx) {
					Poll::Ready(Some(())) => finished += 1,
					Poll::Ready(None) => return Poll::Ready(()),
					// Polling may have queued more work.
					Poll::Pending if !self.inner.pending.borrow().is_empty() => {}
					Poll::Pending => return Poll::Pending,
				}
			}
		})
		.await;
		finished
	}
}
