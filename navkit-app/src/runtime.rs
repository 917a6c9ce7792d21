//! Shared state behind the JavaScript handle.
//!
//! Every DOM callback holds a [`WeakRuntime`] and re-enters through
//! [`dispatch`] or [`dispatch_runtime`]. Borrows are fallible so an event
//! raised while the runtime is already borrowed is dropped, not a panic.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use navkit_core::{self_test_requested, Coordinator, CoordinatorConfig, DiagnosticsReport, Key};
use wasm_bindgen::JsCast;
use web_sys::{Document, KeyboardEvent, MediaQueryList, Window};

use crate::error::{AppError, AppResult};
use crate::host::DomHost;
use crate::probe::{self, DomLayout};

pub(crate) type SharedRuntime = Rc<RefCell<Runtime>>;
pub(crate) type WeakRuntime = Weak<RefCell<Runtime>>;

/// Run `f` against the coordinator and its host.
pub(crate) fn dispatch<R>(
    runtime: &WeakRuntime,
    f: impl FnOnce(&mut Coordinator, &mut DomHost) -> R,
) -> Option<R> {
    dispatch_runtime(runtime, |rt| f(&mut rt.coordinator, &mut rt.host))
}

/// Run `f` against the whole runtime.
pub(crate) fn dispatch_runtime<R>(
    runtime: &WeakRuntime,
    f: impl FnOnce(&mut Runtime) -> R,
) -> Option<R> {
    let runtime = runtime.upgrade()?;
    let Ok(mut guard) = runtime.try_borrow_mut() else {
        tracing::warn!("Dropped re-entrant event while the coordinator was busy");
        return None;
    };
    Some(f(&mut guard))
}

pub(crate) struct Runtime {
    coordinator: Coordinator,
    host: DomHost,
    this: WeakRuntime,
    /// Resize, keyboard and media-query listeners owned outside the nav.
    ambient: Vec<EventListener>,
    /// Replaced on every resize; never dropped from its own callback.
    resize_timer: Option<Timeout>,
    ready: Option<EventListener>,
    booted: bool,
}

impl Runtime {
    pub(crate) fn new_shared(
        config: CoordinatorConfig,
        window: Window,
        document: Document,
    ) -> AppResult<SharedRuntime> {
        let capabilities = probe::detect_capabilities(&window);
        let preference = probe::motion_preference(&window, &capabilities);
        let width = probe::viewport_width(&window);
        let coordinator = Coordinator::new(config, capabilities, width, preference)?;

        Ok(Rc::new_cyclic(|this: &WeakRuntime| {
            let host = DomHost::new(window, document, coordinator.config(), this.clone());
            RefCell::new(Self {
                coordinator,
                host,
                this: this.clone(),
                ambient: Vec::new(),
                resize_timer: None,
                ready: None,
                booted: false,
            })
        }))
    }

    pub(crate) const fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Boot now, or once `DOMContentLoaded` fires if the document is still
    /// loading.
    pub(crate) fn start(&mut self) {
        if self.booted || self.ready.is_some() {
            tracing::debug!("Start ignored: already started");
            return;
        }
        if self.host.document().ready_state() == "loading" {
            let this = self.this.clone();
            self.ready = Some(EventListener::once(
                self.host.document(),
                "DOMContentLoaded",
                move |_| {
                    dispatch_runtime(&this, Runtime::boot);
                },
            ));
            tracing::debug!("Waiting for DOMContentLoaded");
            return;
        }
        self.boot();
    }

    fn boot(&mut self) {
        if self.booted {
            return;
        }
        self.booted = true;
        self.coordinator.init(&mut self.host);
        self.register_lazy_images();
        self.install_ambient();

        let search = self.host.window().location().search().unwrap_or_default();
        if self_test_requested(&search) {
            self.run_diagnostics();
        }
    }

    /// Re-run initialization after content changed.
    pub(crate) fn reinit(&mut self) {
        if !self.booted {
            self.boot();
            return;
        }
        self.coordinator.reinit(&mut self.host);
        self.register_lazy_images();
    }

    /// Undo everything [`start`](Self::start) did.
    pub(crate) fn teardown(&mut self) {
        self.coordinator.teardown(&mut self.host);
        self.host.disconnect();
        self.ambient.clear();
        self.resize_timer = None;
        self.ready = None;
        self.booted = false;
    }

    pub(crate) fn run_diagnostics(&mut self) -> DiagnosticsReport {
        let mut layout = DomLayout::new(self.host.window().clone(), self.host.document().clone());
        self.coordinator.run_diagnostics(&mut layout)
    }

    fn register_lazy_images(&mut self) {
        for (id, src) in self.host.collect_lazy_images() {
            self.coordinator
                .register_lazy_image(id, &src, &mut self.host);
        }
    }

    fn on_resize(&mut self) {
        let width = probe::viewport_width(self.host.window());
        let ticket = self.coordinator.on_resize(width);
        let this = self.this.clone();
        self.resize_timer = Some(Timeout::new(self.coordinator.resize_delay_ms(), move || {
            dispatch(&this, |coordinator, host| {
                coordinator.on_resize_settled(ticket, host)
            });
        }));
    }

    fn install_ambient(&mut self) {
        self.ambient.clear();

        let this = self.this.clone();
        self.ambient
            .push(EventListener::new(self.host.window(), "resize", move |_| {
                dispatch_runtime(&this, Runtime::on_resize);
            }));

        // Tab moves focus on keydown, so the newly focused element is only
        // known by keyup.
        let this = self.this.clone();
        self.ambient
            .push(EventListener::new(self.host.document(), "keyup", move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = Key::from_dom_key(&event.key());
                dispatch(&this, |coordinator, host| coordinator.on_key(key, host));
            }));

        match self.reduced_motion_query() {
            Ok(Some(query)) => {
                let this = self.this.clone();
                let source = query.clone();
                self.ambient
                    .push(EventListener::new(&query, "change", move |_| {
                        let preference = navkit_core::MotionPreference::new(source.matches());
                        dispatch(&this, |coordinator, host| {
                            coordinator.on_motion_preference_changed(preference, host);
                        });
                    }));
            }
            Ok(None) => {}
            Err(err) => tracing::warn!("Reduced motion tracking disabled: {err}"),
        }
    }

    fn reduced_motion_query(&self) -> AppResult<Option<MediaQueryList>> {
        if !self
            .coordinator
            .capabilities()
            .supports(navkit_core::Feature::MatchMedia)
        {
            return Ok(None);
        }
        self.host
            .window()
            .match_media(navkit_core::motion::REDUCED_MOTION_QUERY)
            .map_err(|err| AppError::js(&err))
    }
}
