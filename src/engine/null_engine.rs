use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::config::Theme;
use crate::error::{AdapterError, AdapterResult};
use crate::surface::{Surface, SurfaceSize};

use super::{
    ChartEngine, EngineFactory, EngineHandle, EngineInitOptions, EventHandler, ExportOptions,
    HandlerId,
};

/// Recording engine used by tests and headless adapter usage.
///
/// Every forwarded call is logged so suites can assert ordering and call
/// counts; `fail_*` knobs simulate a broken instance for bulk-sweep and
/// error-propagation coverage.
#[derive(Default)]
pub struct NullEngine {
    pub applied_options: Vec<(Value, bool)>,
    pub dispatched_actions: Vec<Value>,
    pub resize_calls: usize,
    pub clear_calls: usize,
    pub loading_shown: bool,
    pub disposed: bool,
    pub fail_set_option: bool,
    pub fail_resize: bool,
    pub fail_dispose: bool,
    pub export_supported: bool,
    handlers: Vec<(String, HandlerId, EventHandler)>,
    next_handler: u64,
}

impl NullEngine {
    #[must_use]
    pub fn bound_handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Delivers `payload` to every handler bound for `event`.
    pub fn emit(&mut self, event: &str, payload: &Value) -> usize {
        let mut delivered = 0;
        for (name, _, handler) in &mut self.handlers {
            if name == event {
                handler(payload);
                delivered += 1;
            }
        }
        delivered
    }
}

impl std::fmt::Debug for NullEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NullEngine")
            .field("applied_options", &self.applied_options.len())
            .field("resize_calls", &self.resize_calls)
            .field("disposed", &self.disposed)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl ChartEngine for NullEngine {
    fn set_option(&mut self, option: &Value, not_merge: bool) -> AdapterResult<()> {
        if self.disposed {
            return Ok(());
        }
        if self.fail_set_option {
            return Err(AdapterError::Engine("option rejected".to_owned()));
        }
        self.applied_options.push((option.clone(), not_merge));
        Ok(())
    }

    fn resize(&mut self, _size: Option<SurfaceSize>) -> AdapterResult<()> {
        if self.disposed {
            return Ok(());
        }
        if self.fail_resize {
            return Err(AdapterError::Engine("resize failed".to_owned()));
        }
        self.resize_calls += 1;
        Ok(())
    }

    fn on(&mut self, event: &str, handler: EventHandler) -> HandlerId {
        self.next_handler += 1;
        let id = HandlerId(self.next_handler);
        self.handlers.push((event.to_owned(), id, handler));
        id
    }

    fn off(&mut self, event: &str, id: Option<HandlerId>) {
        self.handlers
            .retain(|(name, bound, _)| name != event || id.is_some_and(|wanted| *bound != wanted));
    }

    fn dispatch_action(&mut self, action: &Value) -> AdapterResult<()> {
        if !self.disposed {
            self.dispatched_actions.push(action.clone());
        }
        Ok(())
    }

    fn show_loading(&mut self, _opts: Option<&Value>) {
        if !self.disposed {
            self.loading_shown = true;
        }
    }

    fn hide_loading(&mut self) {
        self.loading_shown = false;
    }

    fn get_data_url(&self, opts: &ExportOptions) -> Option<String> {
        if self.disposed || !self.export_supported {
            return None;
        }
        let format = match opts.format {
            super::ImageFormat::Png => "png",
            super::ImageFormat::Jpeg => "jpeg",
        };
        Some(format!("data:image/{format};base64,"))
    }

    fn clear(&mut self) {
        if !self.disposed {
            self.clear_calls += 1;
        }
    }

    fn dispose(&mut self) -> AdapterResult<()> {
        if self.disposed {
            return Ok(());
        }
        if self.fail_dispose {
            return Err(AdapterError::Engine("dispose failed".to_owned()));
        }
        self.disposed = true;
        self.handlers.clear();
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Record of one `EngineFactory::init` call.
#[derive(Debug, Clone)]
pub struct InitRecord {
    pub surface: Surface,
    pub theme: Option<Theme>,
    pub opts: EngineInitOptions,
}

/// Factory producing [`NullEngine`] instances while keeping concrete handles
/// around so tests can inspect engines after the adapter has taken over.
#[derive(Default)]
pub struct NullEngineFactory {
    pub export_supported: bool,
    pub fail_dispose: bool,
    created: RefCell<Vec<Rc<RefCell<NullEngine>>>>,
    init_calls: RefCell<Vec<InitRecord>>,
}

impl NullEngineFactory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            export_supported: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn created(&self) -> Vec<Rc<RefCell<NullEngine>>> {
        self.created.borrow().clone()
    }

    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }

    #[must_use]
    pub fn last_engine(&self) -> Option<Rc<RefCell<NullEngine>>> {
        self.created.borrow().last().cloned()
    }

    #[must_use]
    pub fn init_calls(&self) -> Vec<InitRecord> {
        self.init_calls.borrow().clone()
    }
}

impl EngineFactory for NullEngineFactory {
    fn init(
        &self,
        surface: &Surface,
        theme: Option<&Theme>,
        opts: &EngineInitOptions,
    ) -> EngineHandle {
        self.init_calls.borrow_mut().push(InitRecord {
            surface: surface.clone(),
            theme: theme.cloned(),
            opts: opts.clone(),
        });
        let engine = Rc::new(RefCell::new(NullEngine {
            export_supported: self.export_supported,
            fail_dispose: self.fail_dispose,
            ..NullEngine::default()
        }));
        self.created.borrow_mut().push(Rc::clone(&engine));
        engine
    }
}
