use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use super::{CanvasHost, Surface, SurfaceCallback, SurfaceSize};

/// In-process host used by tests and headless adapter usage.
///
/// Immediate mode resolves queries on the calling stack, the way a browser
/// DOM lookup behaves. Deferred mode queues every query until [`flush`] runs,
/// reproducing mini-program selector timing, including queries that resolve
/// after the consumer has already been torn down.
///
/// [`flush`]: HeadlessHost::flush
pub struct HeadlessHost {
    deferred: bool,
    device_pixel_ratio: f64,
    viewport: SurfaceSize,
    surfaces: RefCell<HashMap<String, Surface>>,
    queue: RefCell<VecDeque<(String, SurfaceCallback)>>,
}

impl HeadlessHost {
    /// Host resolving queries synchronously.
    #[must_use]
    pub fn immediate() -> Self {
        Self::with_mode(false)
    }

    /// Host queueing queries until [`HeadlessHost::flush`] is called.
    #[must_use]
    pub fn deferred() -> Self {
        Self::with_mode(true)
    }

    fn with_mode(deferred: bool) -> Self {
        Self {
            deferred,
            device_pixel_ratio: 1.0,
            viewport: SurfaceSize::new(375.0, 667.0),
            surfaces: RefCell::new(HashMap::new()),
            queue: RefCell::new(VecDeque::new()),
        }
    }

    #[must_use]
    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = SurfaceSize::new(width, height);
        self
    }

    #[must_use]
    pub fn with_surface(self, surface: Surface) -> Self {
        self.surfaces
            .borrow_mut()
            .insert(surface.canvas_id.clone(), surface);
        self
    }

    /// Mounts a surface after construction, simulating a node appearing on a
    /// later render cycle.
    pub fn mount_surface(&self, surface: Surface) {
        self.surfaces
            .borrow_mut()
            .insert(surface.canvas_id.clone(), surface);
    }

    /// Removes a mounted surface, simulating node teardown between query and
    /// resolution.
    pub fn remove_surface(&self, canvas_id: &str) {
        self.surfaces.borrow_mut().remove(canvas_id);
    }

    /// Resolves queued queries against the current surface table. Returns the
    /// number of callbacks delivered.
    pub fn flush(&self) -> usize {
        let mut delivered = 0;
        // Drain one at a time: a callback may enqueue a follow-up query.
        loop {
            let Some((canvas_id, callback)) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            let found = self.lookup(&canvas_id);
            callback(found);
            delivered += 1;
        }
        delivered
    }

    #[must_use]
    pub fn pending_queries(&self) -> usize {
        self.queue.borrow().len()
    }

    fn lookup(&self, canvas_id: &str) -> Option<Surface> {
        self.surfaces.borrow().get(canvas_id).cloned()
    }
}

impl CanvasHost for HeadlessHost {
    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn viewport_size(&self) -> SurfaceSize {
        self.viewport
    }

    fn find_surface(&self, canvas_id: &str) -> Option<Surface> {
        self.lookup(canvas_id)
    }

    fn query_surface(&self, canvas_id: &str, callback: SurfaceCallback) {
        if self.deferred {
            self.queue
                .borrow_mut()
                .push_back((canvas_id.to_owned(), callback));
        } else {
            callback(self.lookup(canvas_id));
        }
    }
}
