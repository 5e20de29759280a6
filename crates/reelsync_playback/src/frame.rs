/// Handle to a requested frame callback, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// One-shot "run on the next frame" callbacks.
///
/// Work is stored as data (`T`) rather than closures so the owner decides what
/// running it means. A callback requested while the current frame is being
/// drained runs on the following frame.
#[derive(Debug)]
pub struct FrameScheduler<T> {
    next_id: u64,
    pending: Vec<(FrameHandle, T)>,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, task: T) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.pending.push((handle, task));
        handle
    }

    /// Returns whether the callback was still pending.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(h, _)| *h != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.iter().any(|(h, _)| *h == handle)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take everything due on this frame, in request order.
    pub fn drain(&mut self) -> Vec<T> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|(_, task)| task)
            .collect()
    }
}
